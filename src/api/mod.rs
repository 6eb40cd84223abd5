pub mod error;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod validation;

pub use error::ApiError;
pub use validation::{
    FieldViolation, Validate, ValidatedJson, ValidationFailure, ValidationResponse,
    ValidationResponseBuilder,
};
