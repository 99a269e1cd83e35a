use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What to do when the two stubs of a boundary sit in voltage levels with
/// different nominal voltages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoltageCheck {
    /// Do not compare nominal voltages
    Ignore,
    /// Record a diagnostic and continue
    #[default]
    Warn,
    /// Abort the merge with `MismatchedNominalVoltage`
    Reject,
}

impl FromStr for VoltageCheck {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ignore" => Ok(VoltageCheck::Ignore),
            "warn" => Ok(VoltageCheck::Warn),
            "reject" => Ok(VoltageCheck::Reject),
            other => Err(format!(
                "unknown voltage check '{other}' (expected ignore, warn or reject)"
            )),
        }
    }
}

/// Merge settings. Every field has a default so partial config files work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    /// Id of the merged network
    pub network_id: String,
    /// Source format recorded on the merged network
    pub source_format: String,
    /// Fail on dangling lines without a boundary identifier instead of
    /// keeping them unmatched
    pub strict_identifiers: bool,
    pub nominal_voltage_check: VoltageCheck,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            network_id: "cgm".to_string(),
            source_format: "merge".to_string(),
            strict_identifiers: false,
            nominal_voltage_check: VoltageCheck::default(),
        }
    }
}

impl MergeOptions {
    pub fn strict() -> Self {
        Self {
            strict_identifiers: true,
            nominal_voltage_check: VoltageCheck::Reject,
            ..Default::default()
        }
    }
}
