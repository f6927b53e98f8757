//! Element identifiers the toggler binds to.
//!
//! A host page may hand over a partial JSON object, missing fields fall back
//! to the ids used by the review form template.

use serde::Deserialize;
use zoon::serde_json;

use crate::error::{ToggleError, ToggleResult};

pub const DEFAULT_SELECT_ID: &str = "hostelSelect";
pub const DEFAULT_REGION_ID: &str = "newHostelFields";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToggleConfig {
    /// Id of the hostel `<select>`.
    pub select_id: String,
    /// Id of the container holding the new-hostel fields.
    pub region_id: String,
}

impl ToggleConfig {
    pub fn new(select_id: impl Into<String>, region_id: impl Into<String>) -> Self {
        Self {
            select_id: select_id.into(),
            region_id: region_id.into(),
        }
    }

    /// Parses a (possibly partial) JSON object such as `{"selectId":"roomSelect"}`.
    pub fn from_json(json: &str) -> ToggleResult<Self> {
        serde_json::from_str(json).map_err(|error| ToggleError::InvalidConfig {
            message: error.to_string(),
        })
    }
}

impl Default for ToggleConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SELECT_ID, DEFAULT_REGION_ID)
    }
}
