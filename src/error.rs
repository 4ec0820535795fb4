use std::borrow::Cow;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LiterError {
    /// One more element was required, but the source has no more.
    #[error("Source is exhausted.")]
    Exhausted,

    /// A position-based access could not be satisfied even after draining.
    #[error("Index {index} is out of range for length {len}.")]
    OutOfRange { index: usize, len: usize },

    /// A malformed argument, rejected before anything is pulled.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl LiterError {
    pub fn new_out_of_range(index: usize, len: usize) -> Self {
        Self::OutOfRange { index, len }
    }

    pub fn new_invalid_argument<'a>(message: impl Into<Cow<'a, str>>) -> Self {
        Self::InvalidArgument {
            message: message.into().into_owned(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }
}

pub type Result<T> = std::result::Result<T, LiterError>;
