//! Unified error type for network model operations
//!
//! [`CgmError`] is raised by the validating construction API of
//! [`Network`](crate::Network) and by [`Network::absorb`](crate::Network::absorb).
//! Higher layers (the merge engine, the JSON document loader) convert or wrap
//! it at their own API boundaries.
//!
//! # Example
//!
//! ```ignore
//! use cgm_core::{CgmError, CgmResult};
//!
//! fn combine(dest: &mut Network, other: Network) -> CgmResult<()> {
//!     dest.absorb(other)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Unified error type for network model operations.
#[derive(Error, Debug)]
pub enum CgmError {
    /// An identifier is already used by another entity of the network
    #[error("identifier '{0}' is already used in the network")]
    DuplicateId(String),

    /// A referenced substation, voltage level or bus does not exist
    #[error("{kind} '{id}' referenced by '{referrer}' does not exist")]
    UnknownReference {
        kind: &'static str,
        id: String,
        referrer: String,
    },

    /// The connection variant of a terminal does not match the voltage level topology
    #[error("terminal of '{entity}' uses a {connection} connection but voltage level '{voltage_level}' is {topology}")]
    TopologyMismatch {
        entity: String,
        voltage_level: String,
        connection: &'static str,
        topology: &'static str,
    },

    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Inconsistent internal state
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using CgmError.
pub type CgmResult<T> = Result<T, CgmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CgmError::DuplicateId("L1".into());
        assert_eq!(err.to_string(), "identifier 'L1' is already used in the network");

        let err = CgmError::UnknownReference {
            kind: "voltage level",
            id: "VL9".into(),
            referrer: "L1".into(),
        };
        assert!(err.to_string().contains("voltage level 'VL9'"));
        assert!(err.to_string().contains("'L1'"));
    }

    #[test]
    fn test_other_display() {
        let err = CgmError::Other("dangling line 'DL1' is gone".into());
        assert_eq!(err.to_string(), "dangling line 'DL1' is gone");
    }
}
