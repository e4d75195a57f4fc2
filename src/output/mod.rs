pub mod schema;

pub use schema::{ApiDescriptor, HttpMethod, NoiseField, UnknownMethod};
