use thiserror::Error;

/// Errors surfaced by the context-local buffer.
#[derive(Debug, Error)]
pub enum BufferError {
    /// The calling thread is tearing down its thread-local storage, so its slot is gone.
    #[error("context slot unavailable: thread-local storage already destroyed")]
    ContextTornDown(#[from] std::thread::AccessError),
}

pub type Result<T> = std::result::Result<T, BufferError>;
