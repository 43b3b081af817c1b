//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password policy (length, character classes, NFKC normalization)
//! - Password hashing (Argon2id, PHC strings) on the blocking pool

pub mod password;
