//! Image module: references to externally hosted assets, the host client used
//! to delete them, and the replace-then-release protocol shared by users and pets.

pub mod domain;
pub mod host;
pub mod repository;
pub mod repo;
pub mod service;

pub use service::ImageService;
