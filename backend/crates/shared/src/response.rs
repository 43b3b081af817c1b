//! Success envelope
//!
//! Every successful response body has the shape
//! `{ "success": true, "message": ..., "code": ..., "data": ... }`.

use serde::Serialize;

/// 成功レスポンスのエンベロープ
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip)]
    status: u16,
}

impl<T> ApiResponse<T> {
    /// 200 OK
    pub fn ok(code: &'static str, message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            code,
            data: Some(data),
            status: 200,
        }
    }

    /// 201 Created
    pub fn created(code: &'static str, message: impl Into<String>, data: T) -> Self {
        Self {
            status: 201,
            ..Self::ok(code, message, data)
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }
}

impl ApiResponse<()> {
    /// `data` を持たない 200 OK
    pub fn message_only(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            code,
            data: None,
            status: 200,
        }
    }
}

#[cfg(feature = "axum")]
impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}
