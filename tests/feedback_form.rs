//! Feedback form behaviour driven through its messages, with a scripted list client

use anyhow::Result;
use async_trait::async_trait;
use floating_feedback::api::{ChoiceField, ListClient, ListError};
use floating_feedback::feedback::headless::{dispatch_all, run_until_idle};
use floating_feedback::feedback::{FeedbackForm, FeedbackProps, MessageKind, Msg, Phase};
use floating_feedback::tui::{Command, Resource};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Answers from a fixed script and records every item it is asked to create
struct FakeClient {
    fields: HashMap<String, Result<ChoiceField, ListError>>,
    create_result: Mutex<Result<(), ListError>>,
    created: Mutex<Vec<(String, Value)>>,
}

impl FakeClient {
    fn new() -> Self {
        let mut fields = HashMap::new();
        fields.insert("Feedback".to_string(), Ok(multi_choice(&["Bug", "Idea", "Praise"])));
        Self {
            fields,
            create_result: Mutex::new(Ok(())),
            created: Mutex::new(Vec::new()),
        }
    }

    fn with_field(mut self, list: &str, field: Result<ChoiceField, ListError>) -> Self {
        self.fields.insert(list.to_string(), field);
        self
    }

    fn failing_creates(self, err: ListError) -> Self {
        *self.create_result.lock().unwrap() = Err(err);
        self
    }

    fn created(&self) -> Vec<(String, Value)> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl ListClient for FakeClient {
    async fn fetch_choice_field(&self, list: &str, _field: &str) -> Result<ChoiceField, ListError> {
        self.fields.get(list).cloned().unwrap_or(Err(ListError::Rejected {
            status: 404,
            reason: Some("Not Found".to_string()),
            message: Some(format!("List '{}' does not exist", list)),
        }))
    }

    async fn create_item(&self, list: &str, payload: &Value) -> Result<(), ListError> {
        self.created.lock().unwrap().push((list.to_string(), payload.clone()));
        self.create_result.lock().unwrap().clone()
    }
}

fn multi_choice(choices: &[&str]) -> ChoiceField {
    ChoiceField {
        choices: Some(choices.iter().map(|c| c.to_string()).collect()),
        allow_multiple_values: None,
        type_as_string: Some("MultiChoice".to_string()),
    }
}

fn single_choice(choices: &[&str]) -> ChoiceField {
    ChoiceField {
        choices: Some(choices.iter().map(|c| c.to_string()).collect()),
        allow_multiple_values: Some(false),
        type_as_string: Some("Choice".to_string()),
    }
}

fn props() -> FeedbackProps {
    FeedbackProps {
        site_url: "https://contoso.sharepoint.com/sites/intranet".to_string(),
        user_display_name: "Ada Lovelace".to_string(),
        user_email: "ada@contoso.com".to_string(),
        page_name: "Home".to_string(),
        ..FeedbackProps::default()
    }
}

async fn mounted_form(client: Arc<FakeClient>) -> FeedbackForm {
    let mut form = FeedbackForm::new(props(), client);
    let command = form.on_mount();
    run_until_idle(&mut form, command).await;
    form
}

fn valid_entry() -> Vec<Msg> {
    vec![
        Msg::Open,
        Msg::SetTitle("Slow search".to_string()),
        Msg::SetDescription("Search takes ten seconds".to_string()),
        Msg::ToggleCategory("Bug".to_string()),
        Msg::SetRating(2),
    ]
}

/// Await the single async operation a command carries
async fn resolve(command: Command<Msg>) -> Msg {
    match command {
        Command::Perform(future) => future.await,
        _ => panic!("expected an async command"),
    }
}

#[tokio::test]
async fn mount_loads_categories_and_mode() {
    let form = mounted_form(Arc::new(FakeClient::new())).await;

    assert!(form.is_mounted());
    assert!(form.categories().is_success());
    assert_eq!(form.category_config().available, vec!["Bug", "Idea", "Praise"]);
    assert!(form.category_config().allow_multiple);
    assert!(!form.is_modal_open());
}

#[tokio::test]
async fn empty_submit_flags_every_field_without_calling_the_list() {
    let client = Arc::new(FakeClient::new());
    let mut form = mounted_form(client.clone()).await;

    form.update(Msg::Open);
    assert!(form.field_errors().is_empty());

    let command = form.update(Msg::Submit);
    assert!(command.is_none());
    assert!(client.created().is_empty());
    assert!(form.validation_touched());
    assert_eq!(
        form.field_errors().messages(),
        vec![
            "Title is required.",
            "Description is required.",
            "Please select at least one category.",
            "Please provide a rating.",
        ]
    );
    assert!(form.message().is_none());
}

#[tokio::test(start_paused = true)]
async fn successful_submit_posts_record_then_auto_closes() -> Result<()> {
    let client = Arc::new(FakeClient::new());
    let mut form = mounted_form(client.clone()).await;

    let mut entry = valid_entry();
    entry.push(Msg::ToggleCategory("Idea".to_string()));
    dispatch_all(&mut form, entry).await;

    let command = form.update(Msg::Submit);
    assert_eq!(form.phase(), Phase::Submitting);

    let submitted = resolve(command).await;
    let auto_close = form.update(submitted);

    assert_eq!(form.phase(), Phase::Succeeded);
    let message = form.message().cloned().unwrap();
    assert_eq!(message.kind, MessageKind::Success);
    assert_eq!(message.text, "Feedback submitted successfully!");
    assert!(form.draft().title.is_empty());
    assert!(form.draft().selected_categories.is_empty());
    assert!(form.is_modal_open());

    let created = client.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].0, "Feedback");
    assert_eq!(
        created[0].1,
        json!({
            "Title": "Slow search",
            "FeedbackText": "Search takes ten seconds",
            "SubmittedBy": "Ada Lovelace",
            "Rating": 2,
            "PageName": "Home",
            "Category": ["Bug", "Idea"],
        })
    );

    run_until_idle(&mut form, auto_close).await;
    assert!(!form.is_modal_open());
    Ok(())
}

#[tokio::test]
async fn single_choice_column_posts_a_plain_string() -> Result<()> {
    let client = Arc::new(FakeClient::new().with_field("Feedback", Ok(single_choice(&["Bug", "Idea"]))));
    let mut form = mounted_form(client.clone()).await;
    assert!(!form.category_config().allow_multiple);

    let mut entry = valid_entry();
    entry.push(Msg::ToggleCategory("Idea".to_string()));
    dispatch_all(&mut form, entry).await;
    assert_eq!(form.draft().selected_categories, vec!["Idea"]);

    let command = form.update(Msg::Submit);
    let submitted = resolve(command).await;
    form.update(submitted);

    let created = client.created();
    assert_eq!(created[0].1["Category"], json!("Idea"));
    Ok(())
}

#[tokio::test]
async fn rejected_submit_shows_server_message_and_keeps_draft() -> Result<()> {
    let rejection = ListError::rejected(
        400,
        Some("Bad Request"),
        r#"{"error":{"code":"-1","message":{"lang":"en-US","value":"Bad field"}}}"#,
    );
    let client = Arc::new(FakeClient::new().failing_creates(rejection));
    let mut form = mounted_form(client.clone()).await;

    dispatch_all(&mut form, valid_entry()).await;
    dispatch_all(&mut form, [Msg::Submit]).await;

    let message = form.message().cloned().unwrap();
    assert!(message.is_error());
    assert_eq!(message.text, "Error: Bad field");
    assert_eq!(form.draft().title, "Slow search");
    assert!(form.is_modal_open());
    assert!(!form.is_submitting());

    // Closing and reopening starts from scratch
    dispatch_all(&mut form, [Msg::Close, Msg::Open]).await;
    assert!(form.draft().title.is_empty());
    assert!(form.message().is_none());
    assert!(!form.validation_touched());
    Ok(())
}

#[tokio::test]
async fn cancel_is_ignored_while_submitting_but_dismiss_is_not() {
    let client = Arc::new(FakeClient::new());
    let mut form = mounted_form(client).await;
    dispatch_all(&mut form, valid_entry()).await;

    let in_flight = form.update(Msg::Submit);
    assert!(form.is_submitting());

    form.update(Msg::Close);
    assert!(form.is_modal_open());

    form.update(Msg::SetTitle("changed".to_string()));
    assert_eq!(form.draft().title, "Slow search");

    // A second submit while one is in flight does nothing
    assert!(form.update(Msg::Submit).is_none());

    form.update(Msg::Dismiss);
    assert!(!form.is_modal_open());

    let submitted = resolve(in_flight).await;
    form.update(submitted);
    assert!(!form.is_submitting());
}

#[tokio::test]
async fn metadata_failure_leaves_categories_empty_without_a_message() {
    let failure = Err(ListError::Transport("connection reset".to_string()));
    let client = Arc::new(FakeClient::new().with_field("Feedback", failure));
    let mut form = mounted_form(client).await;

    assert!(form.categories().is_failure());
    assert!(form.category_config().is_empty());

    form.update(Msg::Open);
    form.update(Msg::ToggleCategory("Bug".to_string()));
    assert!(form.draft().selected_categories.is_empty());
    assert!(form.message().is_none());
}

#[tokio::test]
async fn missing_choices_are_treated_as_no_categories() {
    let client = Arc::new(FakeClient::new().with_field("Feedback", Ok(ChoiceField::default())));
    let form = mounted_form(client).await;

    assert!(form.categories().is_failure());
    assert!(form.category_config().is_empty());
}

#[tokio::test]
async fn stale_metadata_after_list_change_is_dropped() {
    let client = Arc::new(FakeClient::new().with_field("Ideas", Ok(single_choice(&["Feature"]))));
    let mut form = FeedbackForm::new(props(), client);

    let first = form.on_mount();
    let second = form.on_props_changed(FeedbackProps {
        list_name: "Ideas".to_string(),
        ..props()
    });

    let newer = resolve(second).await;
    form.update(newer);
    assert_eq!(form.category_config().available, vec!["Feature"]);

    // The request for the previous list completes late
    let older = resolve(first).await;
    form.update(older);
    assert_eq!(form.category_config().available, vec!["Feature"]);
    assert!(!form.category_config().allow_multiple);
}

#[tokio::test]
async fn unchanged_list_does_not_refetch() {
    let mut form = mounted_form(Arc::new(FakeClient::new())).await;
    let command = form.on_props_changed(FeedbackProps {
        page_name: "About".to_string(),
        ..props()
    });
    assert!(command.is_none());
    assert_eq!(form.props().page_name, "About");
}

#[tokio::test]
async fn results_after_unmount_leave_state_untouched() {
    let client = Arc::new(FakeClient::new());
    let mut form = FeedbackForm::new(props(), client);

    let fetch = form.on_mount();
    assert!(form.categories().is_loading());
    form.on_unmount();

    let loaded = resolve(fetch).await;
    form.update(loaded);
    assert!(matches!(form.categories(), Resource::Loading));
    assert!(form.category_config().is_empty());
}

#[tokio::test(start_paused = true)]
async fn auto_close_from_an_earlier_session_keeps_the_reopened_modal() {
    let client = Arc::new(FakeClient::new());
    let mut form = mounted_form(client).await;
    dispatch_all(&mut form, valid_entry()).await;

    let command = form.update(Msg::Submit);
    let submitted = resolve(command).await;
    let auto_close = form.update(submitted);

    form.update(Msg::Dismiss);
    form.update(Msg::Open);
    assert!(form.is_modal_open());

    run_until_idle(&mut form, auto_close).await;
    assert!(form.is_modal_open());
    assert_eq!(form.phase(), Phase::Idle);
}

#[tokio::test]
async fn removed_list_reports_no_list_configured() {
    let client = Arc::new(FakeClient::new());
    let mut form = mounted_form(client.clone()).await;
    dispatch_all(&mut form, valid_entry()).await;

    let command = form.on_props_changed(FeedbackProps {
        list_name: String::new(),
        ..props()
    });
    assert!(command.is_none());

    assert!(form.update(Msg::Submit).is_none());
    let message = form.message().cloned().unwrap();
    assert_eq!(message.text, "Error: No list configured.");
    assert!(client.created().is_empty());
}

#[tokio::test]
async fn rating_is_clamped_and_edits_need_an_open_modal() {
    let mut form = mounted_form(Arc::new(FakeClient::new())).await;

    form.update(Msg::SetTitle("ignored".to_string()));
    assert!(form.draft().title.is_empty());

    dispatch_all(&mut form, [Msg::Open, Msg::SetRating(9)]).await;
    assert_eq!(form.draft().rating, 5);
}
