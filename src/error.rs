pub type GifstitchResult<T> = Result<T, GifstitchError>;

#[derive(thiserror::Error, Debug)]
pub enum GifstitchError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("discovery error: {0}")]
    Discovery(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("compress error: {0}")]
    Compress(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GifstitchError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn discovery(msg: impl Into<String>) -> Self {
        Self::Discovery(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn compress(msg: impl Into<String>) -> Self {
        Self::Compress(msg.into())
    }
}
