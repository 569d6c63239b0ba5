//! SharePoint list REST API module
//!
//! Provides the remote list client the feedback form talks to: reading a
//! choice column's metadata and creating list items, with structured
//! request logging and typed errors the form can turn into user messages.

pub mod client;
pub mod constants;
pub mod error;
pub mod logging;
pub mod models;

pub use client::{ListClient, SharePointClient};
pub use error::ListError;
pub use logging::{ApiLogger, OperationContext};
pub use models::{ChoiceField, ColumnMapping};
