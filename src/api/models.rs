//! Wire models for the SharePoint list API

use serde::{Deserialize, Serialize};

use super::constants::MULTI_CHOICE_TYPE;

/// Choice metadata for a single list column
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChoiceField {
    #[serde(default)]
    pub choices: Option<Vec<String>>,
    #[serde(default)]
    pub allow_multiple_values: Option<bool>,
    #[serde(default)]
    pub type_as_string: Option<String>,
}

impl ChoiceField {
    /// Multi-select when the column says so or its type is MultiChoice
    pub fn allows_multiple(&self) -> bool {
        self.allow_multiple_values.unwrap_or(false)
            || self.type_as_string.as_deref() == Some(MULTI_CHOICE_TYPE)
    }
}

/// Internal names of the list columns a feedback record is written to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub title: String,
    pub description: String,
    pub submitted_by: String,
    pub rating: String,
    pub page_name: String,
    pub category: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            title: "Title".to_string(),
            description: "FeedbackText".to_string(),
            submitted_by: "SubmittedBy".to_string(),
            rating: "Rating".to_string(),
            page_name: "PageName".to_string(),
            category: "Category".to_string(),
        }
    }
}
