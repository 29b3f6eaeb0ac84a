//! Selection Model

use serde::{Deserialize, Serialize};

use super::catalog::same_id;

/// Current family/color pair. Empty strings mean "nothing selected".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub family_id: String,
    pub color_id: String,
}

impl Selection {
    pub fn new(family_id: impl Into<String>, color_id: impl Into<String>) -> Self {
        Self {
            family_id: family_id.into(),
            color_id: color_id.into(),
        }
    }

    /// Both family and color are set
    pub fn is_complete(&self) -> bool {
        !self.family_id.is_empty() && !self.color_id.is_empty()
    }

    /// Case-insensitive comparison used by search-by-id
    pub fn matches(&self, other: &Selection) -> bool {
        same_id(&self.family_id, &other.family_id) && same_id(&self.color_id, &other.color_id)
    }
}
