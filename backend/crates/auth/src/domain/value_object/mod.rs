//! Value Object Module

pub mod email;
pub mod full_name;
pub mod role;

pub use email::Email;
pub use full_name::FullName;
pub use role::Role;
