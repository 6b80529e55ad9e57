pub mod errors;
pub mod exec;
pub mod ratelimit;
pub mod retry;

pub use errors::{
    AbuseRateLimitError, ApiErrorResponse, HttpStatusError, RateLimitError, UnauthorizedError,
};
pub use exec::{HttpExec, LoggingExec, ReqwestExecutor};
pub use ratelimit::RateLimitExec;
pub use retry::{RetryConfig, RetryExec};
