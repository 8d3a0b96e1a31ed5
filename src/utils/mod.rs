pub mod retry;
pub mod time;

pub use retry::{retry_with_backoff, RetryPolicy};
pub use time::sleep_with_jitter;
