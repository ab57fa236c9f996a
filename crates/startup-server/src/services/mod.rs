//! Business logic services

pub mod catalog;
pub mod loader;

pub use catalog::CatalogService;
pub use loader::DataLoader;
