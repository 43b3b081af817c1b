//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod login;
pub mod manage_users;
pub mod profile;
pub mod refresh_token;
pub mod register;
pub mod token;

// Re-exports
pub use config::AuthConfig;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use manage_users::{DeleteUserUseCase, ListUsersUseCase, UpdateUserRoleUseCase};
pub use profile::ProfileUseCase;
pub use refresh_token::{RefreshOutput, RefreshTokenUseCase};
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use token::{Claims, TokenService, TokenType};
