use thiserror::Error;

/// Error surface for the worker runtime.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("failed to build tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("channel closed: {0}")]
    ChannelClosed(&'static str),

    #[error("{task} task join failure: {message}")]
    Join { task: &'static str, message: String },
}
