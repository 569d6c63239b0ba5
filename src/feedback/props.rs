use serde::{Deserialize, Serialize};
use std::fmt;

use crate::api::ColumnMapping;

pub const DEFAULT_LIST_NAME: &str = "Feedback";
pub const DEFAULT_CATEGORY_FIELD: &str = "Category";

/// Vertical anchor of the floating button
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Top,
    #[default]
    Bottom,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Top => write!(f, "Top"),
            Position::Bottom => write!(f, "Bottom"),
        }
    }
}

/// Everything the host hands the form when it mounts it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackProps {
    pub site_url: String,
    /// Title of the target list; empty means the host forgot to configure one
    pub list_name: String,
    /// Column whose choices become the category chips
    pub category_field: String,
    pub columns: ColumnMapping,
    pub user_display_name: String,
    /// Accepted from the host but never written to the record
    pub user_email: String,
    pub page_name: String,
    pub position: Position,
}

impl Default for FeedbackProps {
    fn default() -> Self {
        Self {
            site_url: String::new(),
            list_name: DEFAULT_LIST_NAME.to_string(),
            category_field: DEFAULT_CATEGORY_FIELD.to_string(),
            columns: ColumnMapping::default(),
            user_display_name: String::new(),
            user_email: String::new(),
            page_name: String::new(),
            position: Position::default(),
        }
    }
}

impl FeedbackProps {
    pub fn has_list(&self) -> bool {
        !self.list_name.trim().is_empty()
    }

    /// Whether switching to `other` requires reloading the category metadata
    pub fn metadata_source_changed(&self, other: &FeedbackProps) -> bool {
        self.list_name != other.list_name
            || self.category_field != other.category_field
            || self.site_url != other.site_url
    }
}
