pub mod draft;
pub mod error;
pub mod rules;
pub mod validator;

pub use draft::{ApiDraft, HeaderInput};
pub use error::ValidationError;
pub use validator::{normalize, validate, Validator};
