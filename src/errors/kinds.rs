//! Well-known exception type identifiers written in `exceptionClassName`

/// Generic error raised when the server did not name a type
pub const SERVER_ERROR: &str = "ServerError";
/// Root of the response-carrying family
pub const WEB_APPLICATION_ERROR: &str = "WebApplicationError";

pub const BAD_REQUEST: &str = "BadRequest";
pub const NOT_AUTHORIZED: &str = "NotAuthorized";
pub const FORBIDDEN: &str = "Forbidden";
pub const NOT_FOUND: &str = "NotFound";
pub const NOT_ALLOWED: &str = "NotAllowed";
pub const NOT_ACCEPTABLE: &str = "NotAcceptable";
pub const INTERNAL_SERVER_ERROR: &str = "InternalServerError";
pub const SERVICE_UNAVAILABLE: &str = "ServiceUnavailable";

pub const VALIDATION: &str = "Validation";
pub const INVALID_ARGUMENT: &str = "InvalidArgument";
pub const INVALID_STATE: &str = "InvalidState";
pub const UNSUPPORTED: &str = "Unsupported";
