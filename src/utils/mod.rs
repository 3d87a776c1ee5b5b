mod progress_style;
pub mod rate_limiter;

pub use progress_style::ProgressStyleTemplate;
pub use rate_limiter::RateLimiter;
