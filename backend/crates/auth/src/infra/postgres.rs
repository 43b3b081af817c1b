//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::error::conversions::unique_violation;
use kernel::id::{RoleId, UserId};
use platform::password::HashedPassword;
use sqlx::PgPool;

use crate::domain::entity::{NewUser, Permission, RoleRecord, User, UserCredentials};
use crate::domain::repository::{RoleRepository, UserRepository};
use crate::domain::value_object::{Email, FullName, Role};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed credential store and role registry
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = r#"
    u.id,
    u.full_name,
    u.email,
    r.role_name,
    u.is_active,
    u.created_at,
    u.updated_at
"#;

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &NewUser) -> AuthResult<UserId> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (full_name, email, password_hash, role_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(user.full_name.as_str())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(user.role_id.get())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match unique_violation(&e) {
            Some(_) => AuthError::EmailExists,
            None => AuthError::Database(e),
        })?;

        Ok(UserId::new(id))
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users u JOIN roles r ON r.id = u.role_id \
             WHERE u.email = $1 AND u.is_active = TRUE"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_credentials_by_email(
        &self,
        email: &Email,
    ) -> AuthResult<Option<UserCredentials>> {
        let sql = format!(
            "SELECT {USER_COLUMNS}, u.password_hash FROM users u JOIN roles r ON r.id = u.role_id \
             WHERE u.email = $1 AND u.is_active = TRUE"
        );
        let row = sqlx::query_as::<_, CredentialsRow>(&sql)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(CredentialsRow::into_credentials).transpose()
    }

    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users u JOIN roles r ON r.id = u.role_id \
             WHERE u.id = $1 AND u.is_active = TRUE"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn email_exists(&self, email: &Email) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)",
        )
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn delete(&self, id: UserId) -> AuthResult<bool> {
        let affected = sqlx::query(
            r#"
            UPDATE users
            SET is_active = FALSE, updated_at = NOW()
            WHERE id = $1 AND is_active = TRUE
            "#,
        )
        .bind(id.get())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }

    async fn update_role(&self, id: UserId, role_id: RoleId) -> AuthResult<bool> {
        let affected = sqlx::query(
            r#"
            UPDATE users
            SET role_id = $2, updated_at = NOW()
            WHERE id = $1 AND is_active = TRUE
            "#,
        )
        .bind(id.get())
        .bind(role_id.get())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }

    async fn get_all(&self, limit: i64, offset: i64) -> AuthResult<Vec<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users u JOIN roles r ON r.id = u.role_id \
             WHERE u.is_active = TRUE \
             ORDER BY u.created_at DESC, u.id DESC \
             LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }
}

// ============================================================================
// Role Repository Implementation
// ============================================================================

impl RoleRepository for PgAuthRepository {
    async fn find_by_name(&self, name: &str) -> AuthResult<Option<RoleRecord>> {
        let row = sqlx::query_as::<_, RoleRow>(
            "SELECT id, role_name, description, created_at FROM roles WHERE role_name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RoleRow::into_record))
    }

    async fn find_by_id(&self, id: RoleId) -> AuthResult<Option<RoleRecord>> {
        let row = sqlx::query_as::<_, RoleRow>(
            "SELECT id, role_name, description, created_at FROM roles WHERE id = $1",
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RoleRow::into_record))
    }

    async fn get_all(&self) -> AuthResult<Vec<RoleRecord>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            "SELECT id, role_name, description, created_at FROM roles ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RoleRow::into_record).collect())
    }

    async fn has_permission(&self, user_id: UserId, permission: &str) -> AuthResult<bool> {
        let granted = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM user_permissions up
                JOIN permissions p ON p.id = up.permission_id
                WHERE up.user_id = $1 AND p.permission_name = $2
                UNION ALL
                SELECT 1
                FROM users u
                JOIN role_permissions rp ON rp.role_id = u.role_id
                JOIN permissions p ON p.id = rp.permission_id
                WHERE u.id = $1 AND u.is_active = TRUE AND p.permission_name = $2
            )
            "#,
        )
        .bind(user_id.get())
        .bind(permission)
        .fetch_one(&self.pool)
        .await?;

        Ok(granted)
    }

    async fn create(&self, name: &str, description: Option<&str>) -> AuthResult<RoleId> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO roles (role_name, description) VALUES ($1, $2) RETURNING id",
        )
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(role = %name, "Role created");

        Ok(RoleId::new(id))
    }

    async fn get_permissions_by_role(&self, role_id: RoleId) -> AuthResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT p.id, p.permission_name, p.description
            FROM role_permissions rp
            JOIN permissions p ON p.id = rp.permission_id
            WHERE rp.role_id = $1
            ORDER BY p.id
            "#,
        )
        .bind(role_id.get())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Permission {
                id: row.id,
                permission_name: row.permission_name,
                description: row.description,
            })
            .collect())
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    full_name: String,
    email: String,
    role_name: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let role = Role::parse(&self.role_name)
            .ok_or_else(|| AuthError::Internal(format!("Unknown role: {}", self.role_name)))?;

        Ok(User {
            id: UserId::new(self.id),
            full_name: FullName::from_db(self.full_name),
            email: Email::from_db(self.email),
            role,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CredentialsRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

impl CredentialsRow {
    fn into_credentials(self) -> AuthResult<UserCredentials> {
        Ok(UserCredentials {
            user: self.user.into_user()?,
            password_hash: HashedPassword::from_phc_string(self.password_hash)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RoleRow {
    id: i64,
    role_name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl RoleRow {
    fn into_record(self) -> RoleRecord {
        RoleRecord {
            id: RoleId::new(self.id),
            role_name: self.role_name,
            description: self.description,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PermissionRow {
    id: i64,
    permission_name: String,
    description: Option<String>,
}
