//! The in-memory feedback entry and the category column configuration

use log::debug;

use crate::api::ChoiceField;

/// Highest selectable star rating
pub const MAX_RATING: u8 = 5;

/// Valid category choices and whether several may be selected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFieldConfig {
    pub available: Vec<String>,
    pub allow_multiple: bool,
}

impl Default for CategoryFieldConfig {
    fn default() -> Self {
        // Multi-select until the server says otherwise
        Self {
            available: Vec::new(),
            allow_multiple: true,
        }
    }
}

impl CategoryFieldConfig {
    pub fn new(available: Vec<String>, allow_multiple: bool) -> Self {
        Self {
            available,
            allow_multiple,
        }
    }

    pub fn contains(&self, category: &str) -> bool {
        self.available.iter().any(|c| c == category)
    }

    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }
}

impl From<ChoiceField> for CategoryFieldConfig {
    fn from(field: ChoiceField) -> Self {
        let allow_multiple = field.allows_multiple();
        Self {
            available: field.choices.unwrap_or_default(),
            allow_multiple,
        }
    }
}

/// The unsaved entry being edited in the modal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackDraft {
    pub title: String,
    pub description: String,
    /// 0 means no rating chosen yet
    pub rating: u8,
    /// Selected categories in the order they were picked, without duplicates
    pub selected_categories: Vec<String>,
}

impl FeedbackDraft {
    pub fn is_selected(&self, category: &str) -> bool {
        self.selected_categories.iter().any(|c| c == category)
    }

    pub fn set_rating(&mut self, rating: u8) {
        self.rating = rating.min(MAX_RATING);
    }

    /// Toggle a category, honouring the column's single/multi mode.
    ///
    /// Categories outside `config.available` are ignored.
    pub fn toggle_category(&mut self, category: &str, config: &CategoryFieldConfig) {
        if !config.contains(category) {
            debug!("Ignoring toggle of unknown category '{}'", category);
            return;
        }

        if self.is_selected(category) {
            self.selected_categories.retain(|c| c != category);
        } else if config.allow_multiple {
            self.selected_categories.push(category.to_string());
        } else {
            self.selected_categories = vec![category.to_string()];
        }
    }

    /// Bring the selection back in line with a freshly loaded config
    pub fn reconcile(&mut self, config: &CategoryFieldConfig) {
        self.selected_categories.retain(|c| config.contains(c));
        if !config.allow_multiple {
            self.selected_categories.truncate(1);
        }
    }

    /// Check every rule; all failures are reported together
    pub fn validate(&self) -> ValidationReport {
        ValidationReport {
            title_missing: self.title.trim().is_empty(),
            description_missing: self.description.trim().is_empty(),
            category_missing: self.selected_categories.is_empty(),
            rating_missing: self.rating == 0,
        }
    }
}

/// Which field rules a draft currently violates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub title_missing: bool,
    pub description_missing: bool,
    pub category_missing: bool,
    pub rating_missing: bool,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        !(self.title_missing || self.description_missing || self.category_missing || self.rating_missing)
    }

    pub fn failure_count(&self) -> usize {
        [
            self.title_missing,
            self.description_missing,
            self.category_missing,
            self.rating_missing,
        ]
        .iter()
        .filter(|failed| **failed)
        .count()
    }
}

/// Inline messages shown beside each failing field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub title: Option<&'static str>,
    pub description: Option<&'static str>,
    pub category: Option<&'static str>,
    pub rating: Option<&'static str>,
}

impl From<ValidationReport> for FieldErrors {
    fn from(report: ValidationReport) -> Self {
        Self {
            title: report.title_missing.then_some("Title is required."),
            description: report.description_missing.then_some("Description is required."),
            category: report.category_missing.then_some("Please select at least one category."),
            rating: report.rating_missing.then_some("Please provide a rating."),
        }
    }
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.category.is_none() && self.rating.is_none()
    }

    pub fn messages(&self) -> Vec<&'static str> {
        [self.title, self.description, self.category, self.rating]
            .into_iter()
            .flatten()
            .collect()
    }
}
