//! Unified error type for action rule management.
//!
//! The codec, the REST client and the lifecycle handlers all funnel their
//! failures into [`Error`]. Every remote failure carries the rule name and
//! resource group so a message can be diagnosed without further context.

/// Unified error type covering all failure modes of action rule management.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A declared rule failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A resource identifier could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The remote action rule does not exist.
    #[error("Action Rule {name:?} (Resource Group {resource_group:?}) was not found")]
    NotFound {
        /// Name of the action rule.
        name: String,
        /// Resource group the rule was looked up in.
        resource_group: String,
    },

    /// The REST call failed, or returned a status or body we cannot use.
    #[error("{operation} Action Rule {name:?} (Resource Group {resource_group:?}): {message}")]
    Transport {
        /// What was being attempted, e.g. "retrieving".
        operation: String,
        /// Name of the action rule.
        name: String,
        /// Resource group of the action rule.
        resource_group: String,
        /// HTTP status, when a response was received.
        status: Option<u16>,
        /// Error text from the client or the response body.
        message: String,
    },

    /// A rule being created already exists remotely.
    #[error(
        "A resource with the ID {id:?} already exists - to be managed via this tool \
         it needs to be imported into the state"
    )]
    ImportConflict {
        /// ID of the existing remote rule.
        id: String,
    },

    /// The remote rule has a different `type` than the one declared.
    #[error("Action Rule {id:?} is of type {actual}, expected {expected}")]
    TypeMismatch {
        /// ID of the remote rule.
        id: String,
        /// Type the caller asked for.
        expected: String,
        /// Type the API returned.
        actual: String,
    },
}

impl Error {
    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(name: impl Into<String>, resource_group: impl Into<String>) -> Self {
        Error::NotFound {
            name: name.into(),
            resource_group: resource_group.into(),
        }
    }

    /// Convenience constructor for [`Error::Transport`].
    pub fn transport(
        operation: impl Into<String>,
        name: impl Into<String>,
        resource_group: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Error::Transport {
            operation: operation.into(),
            name: name.into(),
            resource_group: resource_group.into(),
            status,
            message: message.into(),
        }
    }

    /// Returns true for [`Error::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
