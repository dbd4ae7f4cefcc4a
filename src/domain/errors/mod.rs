//! Domain error types.

mod api_error;
mod media_error;

pub use api_error::{ApiError, ApiResult};
pub use media_error::{MediaError, MediaResult};
