use thiserror::Error;

/// Main error type for smarty operations
#[derive(Error, Debug)]
pub enum SmartyError {
    #[error("Connection error: {0}")]
    Connection(#[from] std::io::Error),

    #[error("Timeout")]
    Timeout,

    #[error("Frame invalid: {0}")]
    FrameInvalid(String),

    #[error("Invalid key configuration: {0}")]
    KeyConfiguration(String),

    #[error("Telegram authentication failed")]
    Authentication,

    #[error("Security error: {0}")]
    Security(String),

    #[error("Decryption failed for {attempts} consecutive telegrams")]
    RetriesExhausted { attempts: u32 },
}

/// Result type alias for smarty operations
pub type SmartyResult<T> = Result<T, SmartyError>;
