use thiserror::Error;

/// The result of invoking an arc. Propagation either succeeds, possibly without narrowing
/// anything, or it identifies that the current domains admit no solution.
pub type PropagationStatus = Result<(), PropagationFailure>;

/// Internal marker produced by the node layer when a mutation would leave a domain empty.
///
/// An empty domain is a valid state for a raw [`crate::sets::NumericSet`]; it is the node layer
/// that promotes emptiness to a failure. The marker is converted into a [`PropagationFailure`]
/// at the engine boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmptyDomain;

/// The single failure signal raised by propagation.
///
/// Raised when a domain would become empty or when an arc detects a logical contradiction
/// between bound operands. Callers are expected to treat this as "the current branch is
/// infeasible", not as a recoverable per-node error. The core performs no rollback; undoing the
/// effects of a failed propagation attempt is the responsibility of the search layer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Error)]
pub struct PropagationFailure {
    message: Option<String>,
}

impl PropagationFailure {
    pub fn with_message(message: impl Into<String>) -> Self {
        PropagationFailure {
            message: Some(message.into()),
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl std::fmt::Display for PropagationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(message) => write!(f, "propagation failure: {message}"),
            None => write!(f, "propagation failure"),
        }
    }
}

impl From<EmptyDomain> for PropagationFailure {
    fn from(_: EmptyDomain) -> Self {
        PropagationFailure::default()
    }
}

/// A usage error of the set API.
///
/// Unlike [`PropagationFailure`] this does not mean a search branch is infeasible; it means the
/// caller invoked an operation the receiving set variant does not support.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SetOperationError {
    #[error("operation `{operation}` is not supported by the {variant} set variant")]
    Unsupported {
        operation: &'static str,
        variant: &'static str,
    },
}
