//! Request extractors that report failures in the service error format

pub mod json;
pub mod pagination;
pub mod path;

pub use json::JsonBody;
pub use pagination::Pagination;
pub use path::PathId;
