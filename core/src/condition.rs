//! Status conditions reported for registered CRDs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Condition type signalling that a CRD is registered and serving.
pub const ESTABLISHED: &str = "Established";

/// Tri-state status of a condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    Unknown,
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            Self::True => "True",
            Self::False => "False",
            Self::Unknown => "Unknown",
        };
        f.write_str(status)
    }
}

/// A single observation about a CRD's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: ConditionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// RFC 3339 timestamp of the last status change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,
}

impl Condition {
    pub fn new(condition_type: impl Into<String>, status: ConditionStatus) -> Self {
        Self {
            condition_type: condition_type.into(),
            status,
            reason: None,
            message: None,
            last_transition_time: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Observed state of a CRD.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomResourceDefinitionStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl CustomResourceDefinitionStatus {
    /// See [`is_established`].
    pub fn is_established(&self) -> bool {
        is_established(&self.conditions)
    }
}

/// Returns `true` if the API server is ready to accept instances of the CRD.
///
/// The first `Established` condition decides: the CRD is established only if
/// that condition's status is `True`. At most one condition per type is
/// expected; later duplicates are ignored.
///
/// # Examples
///
/// ```
/// use xrd_crd_core::{Condition, ConditionStatus, is_established};
///
/// let conditions = vec![
///     Condition::new("NamesAccepted", ConditionStatus::True),
///     Condition::new("Established", ConditionStatus::True),
/// ];
/// assert!(is_established(&conditions));
/// assert!(!is_established(&[]));
/// ```
pub fn is_established(conditions: &[Condition]) -> bool {
    conditions
        .iter()
        .find(|c| c.condition_type == ESTABLISHED)
        .is_some_and(|c| c.status == ConditionStatus::True)
}
