//! Request extractors that reject with the API's JSON error body

pub mod id;
pub mod json;

pub use id::EntityId;
pub use json::JsonBody;
