//! Error types for the ODM
//!
//! Every failure is returned to the immediate caller. Driver errors are kept
//! intact inside [`ModelError::Transport`] so callers can downcast them and
//! apply their own retry policy.

use std::error::Error as StdError;

/// Boxed driver error carried by [`ModelError::Transport`]
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// ODM error type alias
pub type OdmError = ModelError;

/// ODM result type alias
pub type OdmResult<T> = ModelResult<T>;

/// Error types for ODM operations
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Session could not be established (malformed address, unreachable server)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Invalid connection configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No document matched (`first`, `find`, `update`)
    #[error("Document not found in collection '{0}'")]
    NotFound(String),

    /// A stored document does not fit the requested type
    #[error("Decode error: {0}")]
    Decode(#[from] bson::de::Error),

    /// An entity could not be encoded into a document
    #[error("Serialization error: {0}")]
    Serialization(#[from] bson::ser::Error),

    /// `with()` named a relation the model never registered
    #[error("Unknown relation '{relation}' on model '{model}'")]
    UnknownRelation {
        model: &'static str,
        relation: String,
    },

    /// Any other failure reported by the underlying driver, unmodified
    #[error("Transport error: {0}")]
    Transport(#[source] BoxError),
}

impl ModelError {
    /// Wrap a driver error without reinterpreting it
    pub fn transport<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        ModelError::Transport(Box::new(err))
    }

    /// True for the zero-match error of `first`, `find` and `update`
    pub fn is_not_found(&self) -> bool {
        matches!(self, ModelError::NotFound(_))
    }

    /// True when the error came from the driver
    pub fn is_transport(&self) -> bool {
        matches!(self, ModelError::Transport(_))
    }
}

impl From<mongodb::error::Error> for ModelError {
    fn from(err: mongodb::error::Error) -> Self {
        ModelError::transport(err)
    }
}
