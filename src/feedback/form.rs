//! The feedback form component: modal lifecycle, validation and submission.
//!
//! The form never performs I/O itself. Every operation returns a
//! [`Command`] which the host executes; async results come back as
//! messages tagged with the request generation or modal session that
//! produced them, so stale results can be dropped.

use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;

use crate::api::{ChoiceField, ListClient, ListError};
use crate::tui::{Command, Resource};

use super::draft::{CategoryFieldConfig, FeedbackDraft, FieldErrors};
use super::props::{FeedbackProps, Position};
use super::record::FeedbackRecord;

/// How long the success message stays up before the modal closes itself
pub const AUTO_CLOSE_DELAY: Duration = Duration::from_secs(2);

pub const SUCCESS_MESSAGE: &str = "Feedback submitted successfully!";
pub const NO_LIST_MESSAGE: &str = "Error: No list configured.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Error,
}

/// Message bar content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormMessage {
    pub text: String,
    pub kind: MessageKind,
}

impl FormMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: MessageKind::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: MessageKind::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == MessageKind::Error
    }
}

/// Where the modal is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    Idle,
    Submitting,
    Succeeded,
}

#[derive(Debug, Clone)]
pub enum Msg {
    Open,
    /// Cancel button; ignored while a submission is in flight
    Close,
    /// Dialog close affordance; always honoured
    Dismiss,
    SetTitle(String),
    SetDescription(String),
    SetRating(u8),
    ToggleCategory(String),
    Submit,
    CategoriesLoaded {
        generation: u64,
        result: Result<ChoiceField, ListError>,
    },
    Submitted {
        session: u64,
        result: Result<(), ListError>,
    },
    AutoClose {
        session: u64,
    },
}

pub struct FeedbackForm {
    props: FeedbackProps,
    client: Arc<dyn ListClient>,
    mounted: bool,
    modal_open: bool,
    draft: FeedbackDraft,
    categories: Resource<CategoryFieldConfig>,
    category_config: CategoryFieldConfig,
    submitting: bool,
    succeeded: bool,
    message: Option<FormMessage>,
    validation_touched: bool,
    /// Sequence number of the latest metadata request
    fetch_generation: u64,
    /// Incremented on every open
    session: u64,
}

impl FeedbackForm {
    pub fn new(props: FeedbackProps, client: Arc<dyn ListClient>) -> Self {
        Self {
            props,
            client,
            mounted: false,
            modal_open: false,
            draft: FeedbackDraft::default(),
            categories: Resource::NotAsked,
            category_config: CategoryFieldConfig::default(),
            submitting: false,
            succeeded: false,
            message: None,
            validation_touched: false,
            fetch_generation: 0,
            session: 0,
        }
    }

    // Lifecycle

    pub fn on_mount(&mut self) -> Command<Msg> {
        debug!("Feedback form mounted for list '{}'", self.props.list_name);
        self.mounted = true;
        self.load_categories()
    }

    pub fn on_props_changed(&mut self, props: FeedbackProps) -> Command<Msg> {
        let reload = self.props.metadata_source_changed(&props);
        self.props = props;

        if reload && self.mounted {
            info!("Target list changed to '{}', reloading categories", self.props.list_name);
            self.load_categories()
        } else {
            Command::None
        }
    }

    pub fn on_unmount(&mut self) {
        debug!("Feedback form unmounted");
        self.mounted = false;
    }

    /// Swap the list client, e.g. after the host's site URL changed
    pub fn set_client(&mut self, client: Arc<dyn ListClient>) {
        self.client = client;
    }

    pub fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::Open => {
                self.open();
                Command::None
            }
            Msg::Close => {
                if self.submitting {
                    debug!("Cancel ignored while submitting");
                } else {
                    self.modal_open = false;
                }
                Command::None
            }
            Msg::Dismiss => {
                self.modal_open = false;
                Command::None
            }
            Msg::SetTitle(title) => {
                if self.accepts_edits() {
                    self.draft.title = title;
                }
                Command::None
            }
            Msg::SetDescription(description) => {
                if self.accepts_edits() {
                    self.draft.description = description;
                }
                Command::None
            }
            Msg::SetRating(rating) => {
                if self.accepts_edits() {
                    self.draft.set_rating(rating);
                }
                Command::None
            }
            Msg::ToggleCategory(category) => {
                if self.accepts_edits() {
                    self.draft.toggle_category(&category, &self.category_config);
                }
                Command::None
            }
            Msg::Submit => self.submit(),
            Msg::CategoriesLoaded { generation, result } => {
                self.categories_loaded(generation, result);
                Command::None
            }
            Msg::Submitted { session, result } => self.submitted(session, result),
            Msg::AutoClose { session } => {
                if self.mounted && self.modal_open && session == self.session {
                    debug!("Auto-closing modal after successful submission");
                    self.modal_open = false;
                }
                Command::None
            }
        }
    }

    fn accepts_edits(&self) -> bool {
        self.modal_open && !self.submitting
    }

    fn open(&mut self) {
        self.session += 1;
        self.modal_open = true;
        self.draft = FeedbackDraft::default();
        self.message = None;
        self.validation_touched = false;
        self.succeeded = false;
    }

    fn load_categories(&mut self) -> Command<Msg> {
        if !self.props.has_list() {
            debug!("No target list configured, skipping category fetch");
            self.categories = Resource::NotAsked;
            return Command::None;
        }

        self.fetch_generation += 1;
        self.categories = Resource::Loading;

        let generation = self.fetch_generation;
        let client = Arc::clone(&self.client);
        let list = self.props.list_name.clone();
        let field = self.props.category_field.clone();

        Command::perform(
            async move { client.fetch_choice_field(&list, &field).await },
            move |result| Msg::CategoriesLoaded { generation, result },
        )
    }

    fn categories_loaded(&mut self, generation: u64, result: Result<ChoiceField, ListError>) {
        if !self.mounted {
            debug!("Dropping category metadata received after unmount");
            return;
        }
        if generation != self.fetch_generation {
            debug!(
                "Dropping stale category metadata (generation {}, current {})",
                generation, self.fetch_generation
            );
            return;
        }

        match result {
            Ok(field) if field.choices.is_some() => {
                let config = CategoryFieldConfig::from(field);
                debug!(
                    "Loaded {} categories (multi-select: {})",
                    config.available.len(),
                    config.allow_multiple
                );
                self.draft.reconcile(&config);
                self.category_config = config.clone();
                self.categories = Resource::Success(config);
            }
            Ok(_) => {
                warn!(
                    "Column '{}' on list '{}' reported no choices",
                    self.props.category_field, self.props.list_name
                );
                self.reset_categories(format!("Column '{}' has no choices", self.props.category_field));
            }
            Err(err) => {
                error!("Error fetching category choices: {}", err);
                self.reset_categories(err.to_string());
            }
        }
    }

    fn reset_categories(&mut self, reason: String) {
        self.category_config = CategoryFieldConfig::default();
        self.draft.reconcile(&self.category_config);
        self.categories = Resource::Failure(reason);
    }

    fn submit(&mut self) -> Command<Msg> {
        if self.submitting || !self.modal_open {
            return Command::None;
        }

        self.validation_touched = true;
        self.succeeded = false;

        let report = self.draft.validate();
        if !report.is_valid() {
            debug!("Submission blocked by {} validation failure(s)", report.failure_count());
            return Command::None;
        }

        if !self.props.has_list() {
            self.message = Some(FormMessage::error(NO_LIST_MESSAGE));
            return Command::None;
        }

        self.submitting = true;
        self.message = None;

        let record = FeedbackRecord::from_draft(
            &self.draft,
            &self.category_config,
            &self.props.user_display_name,
            &self.props.page_name,
        );
        let payload = record.to_payload(&self.props.columns);
        info!("Submitting feedback to list '{}'", self.props.list_name);

        let session = self.session;
        let client = Arc::clone(&self.client);
        let list = self.props.list_name.clone();

        Command::perform(
            async move { client.create_item(&list, &payload).await },
            move |result| Msg::Submitted { session, result },
        )
    }

    fn submitted(&mut self, session: u64, result: Result<(), ListError>) -> Command<Msg> {
        if !self.mounted {
            debug!("Dropping submission result received after unmount");
            return Command::None;
        }

        self.submitting = false;

        if session != self.session {
            // The modal was reopened while the request was in flight; the new
            // draft and message belong to the new session.
            match result {
                Ok(()) => info!("Feedback from an earlier session was saved"),
                Err(err) => warn!("Feedback from an earlier session failed: {}", err),
            }
            return Command::None;
        }

        match result {
            Ok(()) => {
                info!("Feedback submitted to list '{}'", self.props.list_name);
                self.message = Some(FormMessage::success(SUCCESS_MESSAGE));
                self.draft = FeedbackDraft::default();
                self.validation_touched = false;
                self.succeeded = true;
                Command::delay(AUTO_CLOSE_DELAY, Msg::AutoClose { session })
            }
            Err(err) => {
                warn!("Feedback submission failed: {}", err);
                self.message = Some(FormMessage::error(format!("Error: {}", err.display_text())));
                Command::None
            }
        }
    }

    // Accessors

    pub fn props(&self) -> &FeedbackProps {
        &self.props
    }

    pub fn position(&self) -> Position {
        self.props.position
    }

    pub fn draft(&self) -> &FeedbackDraft {
        &self.draft
    }

    pub fn categories(&self) -> &Resource<CategoryFieldConfig> {
        &self.categories
    }

    pub fn category_config(&self) -> &CategoryFieldConfig {
        &self.category_config
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn message(&self) -> Option<&FormMessage> {
        self.message.as_ref()
    }

    pub fn validation_touched(&self) -> bool {
        self.validation_touched
    }

    /// Inline field messages; empty until the user has tried to submit
    pub fn field_errors(&self) -> FieldErrors {
        if self.validation_touched {
            FieldErrors::from(self.draft.validate())
        } else {
            FieldErrors::default()
        }
    }

    pub fn phase(&self) -> Phase {
        if !self.modal_open {
            Phase::Closed
        } else if self.submitting {
            Phase::Submitting
        } else if self.succeeded {
            Phase::Succeeded
        } else {
            Phase::Idle
        }
    }
}
