//! Utility modules.

pub mod retry;
pub mod text;

pub use retry::{RetryConfig, RetryResult, Retryable, with_retry};
pub use text::truncate_chars;
