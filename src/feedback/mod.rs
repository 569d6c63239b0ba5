//! Feedback form core
//!
//! Headless state machine for the feedback modal. Hosts construct a
//! [`FeedbackForm`] from [`FeedbackProps`] and a list client, call the
//! lifecycle hooks, and execute the commands it returns.

pub mod draft;
pub mod form;
pub mod headless;
pub mod props;
pub mod record;

pub use draft::{CategoryFieldConfig, FeedbackDraft, FieldErrors, ValidationReport, MAX_RATING};
pub use form::{FeedbackForm, FormMessage, MessageKind, Msg, Phase, AUTO_CLOSE_DELAY};
pub use props::{FeedbackProps, Position, DEFAULT_CATEGORY_FIELD, DEFAULT_LIST_NAME};
pub use record::{CategoryValue, FeedbackRecord};
