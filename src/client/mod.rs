//! Client side: turn error responses back into typed exceptions

pub mod decoder;
pub mod http;
pub mod mapper;
pub mod reconstruct;
pub mod registry;
pub mod response;

pub use decoder::{decode, DecodeError};
pub use http::{ClientError, ErrorMappingClient};
pub use mapper::{MapperError, ResponseExceptionMapper};
pub use reconstruct::{
    ConstructError, ExceptionReconstructor, ReconstructionError, RemoteException,
    SERVER_ERROR_MESSAGE,
};
pub use registry::{kinds, Category, ExceptionRegistry, ExceptionType};
pub use response::RawResponse;
