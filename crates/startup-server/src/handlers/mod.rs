//! HTTP handlers

pub mod companies;
pub mod health;
pub mod load;
pub mod products;

pub use health::{health, index};
