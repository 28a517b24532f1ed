//! Pet module: age derivation, the ordered validation rules shared by
//! registration and edit, persistence seam and the service tying them together.

pub mod age;
pub mod domain;
pub mod rules;
pub mod repository;
pub mod repo;
pub mod service;

pub use service::PetService;
