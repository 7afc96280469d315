//! Tokio job substrate for herald: a channel-backed [`ChannelQueue`], a
//! bounded [`WorkerPool`] with exponential-backoff retry, and tracing setup.

mod error;
mod logging;
mod pool;
mod queue;
mod retry;

pub use error::WorkerError;
pub use logging::init_tracing;
pub use pool::{build_runtime, WorkerOptions, WorkerPool, WorkerStats};
pub use queue::{ChannelQueue, Delivery};
pub use retry::RetryPolicy;
