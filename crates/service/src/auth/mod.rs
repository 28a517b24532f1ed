//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Covers login with session tokens, account registration with a role
//! profile, and resolution of the caller's profile.

pub mod domain;
pub mod errors;
pub mod password;
pub mod token;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::AuthService;
