//! Entity Module

pub mod credentials;
pub mod role;
pub mod user;

pub use credentials::{NewUser, UserCredentials};
pub use role::{Permission, RoleRecord};
pub use user::User;
