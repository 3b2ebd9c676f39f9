//! Resilient JSON fetching
//!
//! The only I/O primitive used by the upstream clients. Every request is
//! bounded by a per-attempt timeout and retried with exponential backoff.

mod retry;
mod transport;
mod types;

pub use retry::{ResilientFetcher, Sleeper, TokioSleeper};
pub use transport::{HttpTransport, ReqwestTransport};
pub use types::{FetchError, FetchPolicy};
