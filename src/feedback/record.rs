//! The outgoing list item built from a draft at submit time

use serde::Serialize;
use serde_json::{Map, Value};

use crate::api::ColumnMapping;

use super::draft::{CategoryFieldConfig, FeedbackDraft};

/// Category column value: an array for multi-choice columns, a bare string otherwise
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CategoryValue {
    Many(Vec<String>),
    Single(String),
}

/// A feedback entry ready to be written to the target list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackRecord {
    pub title: String,
    pub feedback_text: String,
    pub submitted_by: String,
    pub rating: u8,
    pub page_name: String,
    pub category: Option<CategoryValue>,
}

impl FeedbackRecord {
    pub fn from_draft(
        draft: &FeedbackDraft,
        config: &CategoryFieldConfig,
        submitted_by: &str,
        page_name: &str,
    ) -> Self {
        let category = if draft.selected_categories.is_empty() {
            None
        } else if config.allow_multiple {
            Some(CategoryValue::Many(draft.selected_categories.clone()))
        } else {
            draft
                .selected_categories
                .first()
                .cloned()
                .map(CategoryValue::Single)
        };

        Self {
            title: draft.title.clone(),
            feedback_text: draft.description.clone(),
            submitted_by: submitted_by.to_string(),
            rating: draft.rating,
            page_name: page_name.to_string(),
            category,
        }
    }

    /// Serialize into the JSON object posted to the list, keyed by column name
    pub fn to_payload(&self, columns: &ColumnMapping) -> Value {
        let mut body = Map::new();
        body.insert(columns.title.clone(), Value::from(self.title.as_str()));
        body.insert(columns.description.clone(), Value::from(self.feedback_text.as_str()));
        body.insert(columns.submitted_by.clone(), Value::from(self.submitted_by.as_str()));
        body.insert(columns.rating.clone(), Value::from(self.rating));
        body.insert(columns.page_name.clone(), Value::from(self.page_name.as_str()));

        if let Some(category) = &self.category {
            let value = serde_json::to_value(category).unwrap_or(Value::Null);
            body.insert(columns.category.clone(), value);
        }

        Value::Object(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft() -> FeedbackDraft {
        FeedbackDraft {
            title: "Broken link".to_string(),
            description: "The footer link 404s".to_string(),
            rating: 2,
            selected_categories: vec!["Bug".to_string()],
        }
    }

    #[test]
    fn multi_choice_posts_array() {
        let config = CategoryFieldConfig::new(vec!["Bug".to_string()], true);
        let record = FeedbackRecord::from_draft(&draft(), &config, "Ada Lovelace", "Home");

        assert_eq!(
            record.to_payload(&ColumnMapping::default()),
            json!({
                "Title": "Broken link",
                "FeedbackText": "The footer link 404s",
                "SubmittedBy": "Ada Lovelace",
                "Rating": 2,
                "PageName": "Home",
                "Category": ["Bug"]
            })
        );
    }

    #[test]
    fn single_choice_posts_string() {
        let config = CategoryFieldConfig::new(vec!["Bug".to_string()], false);
        let record = FeedbackRecord::from_draft(&draft(), &config, "Ada Lovelace", "Home");
        let payload = record.to_payload(&ColumnMapping::default());
        assert_eq!(payload["Category"], json!("Bug"));
    }

    #[test]
    fn custom_columns_rename_keys() {
        let config = CategoryFieldConfig::new(vec!["Bug".to_string()], false);
        let record = FeedbackRecord::from_draft(&draft(), &config, "Ada", "Home");
        let columns = ColumnMapping {
            category: "Topic".to_string(),
            description: "Body".to_string(),
            ..ColumnMapping::default()
        };

        let payload = record.to_payload(&columns);
        assert_eq!(payload["Topic"], json!("Bug"));
        assert_eq!(payload["Body"], json!("The footer link 404s"));
        assert!(payload.get("Category").is_none());
    }
}
