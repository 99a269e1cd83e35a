use cgm_core::{CgmError, Kilovolts};
use thiserror::Error;

/// Fatal merge failures. Any of these aborts the whole merge: no partially
/// merged network is ever returned.
#[derive(Debug, Error)]
pub enum MergeError {
    /// More than two stubs share one boundary identifier
    #[error("boundary '{identifier}' is shared by {count} dangling lines (fragments {fragments:?}); exactly two are required")]
    AmbiguousBoundary {
        identifier: String,
        count: usize,
        fragments: Vec<usize>,
    },

    /// Two entities of the merged network would share an identifier
    #[error("identifier '{identifier}' is defined more than once across the merged fragments")]
    DuplicateIdentifier { identifier: String },

    /// A stub carries no boundary identifier (strict mode only)
    #[error("dangling line '{stub}' of fragment {fragment} has no boundary identifier")]
    MissingIdentifier { stub: String, fragment: usize },

    /// The two voltage levels of a pairable boundary disagree on nominal voltage
    #[error("boundary '{identifier}' joins voltage levels of {first_kv} and {second_kv} (fragments {fragments:?})")]
    MismatchedNominalVoltage {
        identifier: String,
        first_kv: Kilovolts,
        second_kv: Kilovolts,
        fragments: [usize; 2],
    },

    /// Any other rejection from the network model
    #[error(transparent)]
    Network(CgmError),
}

pub type MergeResult<T> = Result<T, MergeError>;

impl From<CgmError> for MergeError {
    fn from(err: CgmError) -> Self {
        match err {
            CgmError::DuplicateId(identifier) => MergeError::DuplicateIdentifier { identifier },
            other => MergeError::Network(other),
        }
    }
}
