use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use std::sync::Arc;

use crate::api::ListClient;
use crate::feedback::{self, FeedbackForm, FeedbackProps, MessageKind, Position, MAX_RATING};
use crate::tui::{App, Command, InteractionRegistry, Resource, Subscription, TextInputState, Theme};

pub const BUTTON_LABEL: &str = " ✎ Feedback ";
const MODAL_TITLE: &str = " Submit Feedback ";
const MODAL_INTRO: &str = "We'd love to hear your thoughts! Please share your feedback below.";
const MODAL_MAX_WIDTH: u16 = 72;

/// Which control in the modal receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Title,
    Description,
    Categories,
    Rating,
    Submit,
    Cancel,
}

impl Focus {
    const ORDER: [Focus; 6] = [
        Focus::Title,
        Focus::Description,
        Focus::Categories,
        Focus::Rating,
        Focus::Submit,
        Focus::Cancel,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn previous(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Debug, Clone)]
pub enum Msg {
    Form(feedback::Msg),
    Focus(Focus),
    FocusNext,
    FocusPrevious,
    TitleKey(KeyCode),
    DescriptionKey(KeyCode),
    MoveCategoryCursor(isize),
    ToggleCategoryAtCursor,
    ClickCategory(usize),
    StepRating(i8),
    Quit,
}

/// Terminal host for the feedback form: a page with a floating button and
/// the modal dialog drawn over it.
pub struct FeedbackApp {
    form: FeedbackForm,
    focus: Focus,
    title_input: TextInputState,
    description_input: TextInputState,
    category_cursor: usize,
}

impl FeedbackApp {
    pub fn new(props: FeedbackProps, client: Arc<dyn ListClient>) -> Self {
        Self {
            form: FeedbackForm::new(props, client),
            focus: Focus::Title,
            title_input: TextInputState::new(),
            description_input: TextInputState::multiline(),
            category_cursor: 0,
        }
    }

    pub fn form(&self) -> &FeedbackForm {
        &self.form
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn category_cursor(&self) -> usize {
        self.category_cursor
    }

    pub fn set_client(&mut self, client: Arc<dyn ListClient>) {
        self.form.set_client(client);
    }

    fn update_form(&mut self, msg: feedback::Msg) -> Command<Msg> {
        let opening = matches!(msg, feedback::Msg::Open);
        let command = self.form.update(msg).map(Msg::Form);

        if opening {
            self.focus = Focus::Title;
            self.title_input.reset();
            self.description_input.reset();
            self.category_cursor = 0;
        }
        self.clamp_category_cursor();
        command
    }

    fn clamp_category_cursor(&mut self) {
        let len = self.form.category_config().available.len();
        self.category_cursor = self.category_cursor.min(len.saturating_sub(1));
    }

    fn toggle_category(&mut self, index: usize) -> Command<Msg> {
        match self.form.category_config().available.get(index).cloned() {
            Some(category) => self.update_form(feedback::Msg::ToggleCategory(category)),
            None => Command::None,
        }
    }

    fn render_page(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let props = self.form.props();
        let page_name = if props.page_name.is_empty() {
            "Page"
        } else {
            props.page_name.as_str()
        };

        let site = if props.site_url.is_empty() {
            "(no site configured)"
        } else {
            props.site_url.as_str()
        };

        let lines = vec![
            Line::from(vec![
                Span::styled("Site: ", theme.muted_style()),
                Span::styled(site.to_string(), Style::default().fg(theme.text)),
            ]),
            Line::from(vec![
                Span::styled("List: ", theme.muted_style()),
                Span::styled(props.list_name.clone(), Style::default().fg(theme.text)),
                Span::styled("  Category column: ", theme.muted_style()),
                Span::styled(props.category_field.clone(), Style::default().fg(theme.text)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Press f or click Feedback to share your thoughts.",
                theme.muted_style(),
            )),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.surface1))
            .title(Span::styled(format!(" {} ", page_name), Style::default().fg(theme.text)));

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_modal(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        registry: &mut InteractionRegistry<Msg>,
    ) {
        let submitting = self.form.is_submitting();
        let errors = self.form.field_errors();

        let inner_width = modal_width(area).saturating_sub(2);
        let chips = chip_layout(&self.chip_labels(), inner_width);
        let chip_rows = chips.iter().map(|c| c.row + 1).max().unwrap_or(1);

        let modal = modal_area(area, 17 + chip_rows + 2);
        frame.render_widget(Clear, modal);
        registry.set_modal_area(modal);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.mauve))
            .style(Style::default().bg(theme.mantle))
            .title(Span::styled(
                MODAL_TITLE,
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(modal);
        frame.render_widget(block, modal);

        if modal.width > 5 {
            let close = Rect::new(modal.x + modal.width - 4, modal.y, 3, 1);
            frame.render_widget(Paragraph::new(Span::styled(" ✕ ", theme.muted_style())), close);
            registry.register_click(close, Msg::Form(feedback::Msg::Dismiss));
        }

        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(5),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(chip_rows),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

        frame.render_widget(
            Paragraph::new(Span::styled(MODAL_INTRO, theme.muted_style())),
            rows[0],
        );

        self.render_title_field(frame, rows[1], theme, errors.title.is_some(), submitting);
        registry.register_click(rows[1], Msg::Focus(Focus::Title));
        render_field_error(frame, rows[2], theme, errors.title);

        self.render_description_field(frame, rows[3], theme, errors.description.is_some(), submitting);
        registry.register_click(rows[3], Msg::Focus(Focus::Description));
        render_field_error(frame, rows[4], theme, errors.description);

        frame.render_widget(
            Paragraph::new(label_line("Category", self.focus == Focus::Categories, theme)),
            rows[5],
        );
        self.render_categories(frame, rows[6], theme, registry, &chips, submitting);
        render_field_error(frame, rows[7], theme, errors.category);

        self.render_rating(frame, rows[8], theme, registry, submitting);
        render_field_error(frame, rows[9], theme, errors.rating);

        if let Some(message) = self.form.message() {
            let style = match message.kind {
                MessageKind::Success => theme.success_style(),
                MessageKind::Error => theme.error_style(),
                MessageKind::Info => theme.info_style(),
            };
            frame.render_widget(
                Paragraph::new(Span::styled(message.text.clone(), style.add_modifier(Modifier::BOLD))),
                rows[10],
            );
        }

        self.render_buttons(frame, rows[11], theme, registry, submitting);
    }

    fn render_title_field(&self, frame: &mut Frame, area: Rect, theme: &Theme, invalid: bool, submitting: bool) {
        let focused = self.focus == Focus::Title;
        let value = &self.form.draft().title;
        let width = area.width.saturating_sub(2) as usize;

        let text = if focused && !submitting {
            tail(&self.title_input.with_cursor(value), width)
        } else {
            tail(value, width)
        };

        let content = if value.is_empty() && !focused {
            Span::styled("Enter a short title", theme.muted_style())
        } else {
            Span::styled(text, input_style(theme, submitting))
        };

        let block = field_block(" Title * ", theme, focused, invalid);
        frame.render_widget(Paragraph::new(content).block(block), area);
    }

    fn render_description_field(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        invalid: bool,
        submitting: bool,
    ) {
        let focused = self.focus == Focus::Description;
        let value = &self.form.draft().description;

        let block = field_block(" Description * ", theme, focused, invalid);
        let visible_rows = block.inner(area).height as usize;

        if value.is_empty() && !focused {
            let placeholder = Span::styled("Describe your feedback", theme.muted_style());
            frame.render_widget(Paragraph::new(placeholder).block(block), area);
            return;
        }

        let text = if focused && !submitting {
            self.description_input.with_cursor(value)
        } else {
            value.clone()
        };

        // Keep the end of the text in view
        let line_count = text.split('\n').count();
        let scroll = line_count.saturating_sub(visible_rows) as u16;

        let paragraph = Paragraph::new(text)
            .style(input_style(theme, submitting))
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0))
            .block(block);
        frame.render_widget(paragraph, area);
    }

    fn chip_labels(&self) -> Vec<String> {
        let config = self.form.category_config();
        let draft = self.form.draft();

        config
            .available
            .iter()
            .map(|category| {
                let selected = draft.is_selected(category);
                let mark = match (config.allow_multiple, selected) {
                    (true, true) => "[x]",
                    (true, false) => "[ ]",
                    (false, true) => "(•)",
                    (false, false) => "( )",
                };
                format!(" {} {} ", mark, category)
            })
            .collect()
    }

    fn render_categories(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        registry: &mut InteractionRegistry<Msg>,
        chips: &[ChipPlacement],
        submitting: bool,
    ) {
        let config = self.form.category_config();

        if config.is_empty() {
            let placeholder = match self.form.categories() {
                Resource::Loading => "Loading categories...".to_string(),
                _ => format!(
                    "No categories found in the '{}' column.",
                    self.form.props().category_field
                ),
            };
            frame.render_widget(
                Paragraph::new(Span::styled(placeholder, theme.muted_style())),
                area,
            );
            return;
        }

        let labels = self.chip_labels();
        let draft = self.form.draft();

        for chip in chips {
            let Some(label) = labels.get(chip.index) else {
                continue;
            };
            if chip.row >= area.height || chip.x >= area.width {
                continue;
            }

            let rect = Rect::new(
                area.x + chip.x,
                area.y + chip.row,
                chip.width.min(area.width - chip.x),
                1,
            );

            let selected = config
                .available
                .get(chip.index)
                .is_some_and(|category| draft.is_selected(category));
            let mut style = if submitting {
                theme.muted_style().bg(theme.surface0)
            } else if selected {
                Style::default().fg(theme.base).bg(theme.mauve)
            } else {
                Style::default().fg(theme.text).bg(theme.surface0)
            };
            if self.focus == Focus::Categories && chip.index == self.category_cursor {
                style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }

            frame.render_widget(Paragraph::new(Span::styled(label.clone(), style)), rect);
            registry.register_click(rect, Msg::ClickCategory(chip.index));
        }
    }

    fn render_rating(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        registry: &mut InteractionRegistry<Msg>,
        submitting: bool,
    ) {
        let focused = self.focus == Focus::Rating;
        let rating = self.form.draft().rating;

        let mut label = label_line("Rating", focused, theme);
        label.spans.push(Span::raw("  "));
        let label_width = label.width() as u16;

        for star in 1..=MAX_RATING {
            let (symbol, color) = if star <= rating {
                ("★ ", theme.yellow)
            } else {
                ("☆ ", theme.overlay1)
            };
            let style = if submitting {
                theme.muted_style()
            } else {
                Style::default().fg(color)
            };
            label.spans.push(Span::styled(symbol, style));

            let x = label_width + u16::from(star - 1) * 2;
            if x + 2 <= area.width {
                registry.register_click(
                    Rect::new(area.x + x, area.y, 2, 1),
                    Msg::Form(feedback::Msg::SetRating(star)),
                );
            }
        }

        if rating > 0 {
            label
                .spans
                .push(Span::styled(format!(" {}/{}", rating, MAX_RATING), theme.muted_style()));
        }

        frame.render_widget(Paragraph::new(label), area);
    }

    fn render_buttons(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        registry: &mut InteractionRegistry<Msg>,
        submitting: bool,
    ) {
        let submit_label = if submitting { " Submitting... " } else { " Submit " };
        let cancel_label = " Cancel ";

        let submit_width = submit_label.chars().count() as u16;
        let cancel_width = cancel_label.chars().count() as u16;
        let total = submit_width + 2 + cancel_width;
        if total > area.width {
            return;
        }

        let submit = Rect::new(area.x + area.width - total, area.y, submit_width, 1);
        let cancel = Rect::new(submit.x + submit_width + 2, area.y, cancel_width, 1);

        frame.render_widget(
            Paragraph::new(submit_label)
                .style(theme.primary_button_style(self.focus == Focus::Submit, submitting)),
            submit,
        );
        frame.render_widget(
            Paragraph::new(cancel_label)
                .style(theme.secondary_button_style(self.focus == Focus::Cancel, submitting)),
            cancel,
        );

        registry.register_click(submit, Msg::Form(feedback::Msg::Submit));
        registry.register_click(cancel, Msg::Form(feedback::Msg::Close));
    }
}

impl App for FeedbackApp {
    type Msg = Msg;
    type Props = FeedbackProps;

    fn on_mount(&mut self) -> Command<Msg> {
        self.form.on_mount().map(Msg::Form)
    }

    fn on_props_changed(&mut self, props: FeedbackProps) -> Command<Msg> {
        let command = self.form.on_props_changed(props).map(Msg::Form);
        self.clamp_category_cursor();
        command
    }

    fn on_unmount(&mut self) {
        self.form.on_unmount();
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::Form(msg) => self.update_form(msg),
            Msg::Focus(focus) => {
                self.focus = focus;
                Command::None
            }
            Msg::FocusNext => {
                self.focus = self.focus.next();
                Command::None
            }
            Msg::FocusPrevious => {
                self.focus = self.focus.previous();
                Command::None
            }
            Msg::TitleKey(code) => {
                if self.form.is_submitting() {
                    return Command::None;
                }
                let edited = self.title_input.handle_key(code, &self.form.draft().title);
                match edited {
                    Some(value) => self.update_form(feedback::Msg::SetTitle(value)),
                    None => Command::None,
                }
            }
            Msg::DescriptionKey(code) => {
                if self.form.is_submitting() {
                    return Command::None;
                }
                let edited = self.description_input.handle_key(code, &self.form.draft().description);
                match edited {
                    Some(value) => self.update_form(feedback::Msg::SetDescription(value)),
                    None => Command::None,
                }
            }
            Msg::MoveCategoryCursor(delta) => {
                let len = self.form.category_config().available.len() as isize;
                if len > 0 {
                    self.category_cursor = (self.category_cursor as isize + delta).rem_euclid(len) as usize;
                }
                Command::None
            }
            Msg::ToggleCategoryAtCursor => self.toggle_category(self.category_cursor),
            Msg::ClickCategory(index) => {
                self.focus = Focus::Categories;
                self.category_cursor = index;
                self.toggle_category(index)
            }
            Msg::StepRating(step) => {
                let current = i16::from(self.form.draft().rating);
                let next = (current + i16::from(step)).clamp(1, i16::from(MAX_RATING)) as u8;
                self.update_form(feedback::Msg::SetRating(next))
            }
            Msg::Quit => Command::Quit,
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect, theme: &Theme, registry: &mut InteractionRegistry<Msg>) {
        self.render_page(frame, area, theme);

        let button = floating_button_area(area, self.form.position());
        frame.render_widget(
            Paragraph::new(BUTTON_LABEL).style(theme.primary_button_style(false, false)),
            button,
        );
        registry.register_click(button, Msg::Form(feedback::Msg::Open));

        if self.form.is_modal_open() {
            self.render_modal(frame, area, theme, registry);
        }
    }

    fn on_key(&self, key: KeyEvent) -> Option<Msg> {
        if !self.form.is_modal_open() {
            return None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Some(Msg::Form(feedback::Msg::Dismiss)),
            KeyCode::Tab => return Some(Msg::FocusNext),
            KeyCode::BackTab => return Some(Msg::FocusPrevious),
            KeyCode::Char('s') if ctrl => return Some(Msg::Form(feedback::Msg::Submit)),
            _ => {}
        }

        if ctrl || self.form.is_submitting() {
            return None;
        }

        match self.focus {
            Focus::Title => match key.code {
                KeyCode::Enter => Some(Msg::FocusNext),
                code => Some(Msg::TitleKey(code)),
            },
            Focus::Description => Some(Msg::DescriptionKey(key.code)),
            Focus::Categories => match key.code {
                KeyCode::Left | KeyCode::Up => Some(Msg::MoveCategoryCursor(-1)),
                KeyCode::Right | KeyCode::Down => Some(Msg::MoveCategoryCursor(1)),
                KeyCode::Char(' ') | KeyCode::Enter => Some(Msg::ToggleCategoryAtCursor),
                _ => None,
            },
            Focus::Rating => match key.code {
                KeyCode::Left | KeyCode::Down => Some(Msg::StepRating(-1)),
                KeyCode::Right | KeyCode::Up => Some(Msg::StepRating(1)),
                KeyCode::Char(c @ '1'..='5') => Some(Msg::Form(feedback::Msg::SetRating(c as u8 - b'0'))),
                _ => None,
            },
            Focus::Submit => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => Some(Msg::Form(feedback::Msg::Submit)),
                _ => None,
            },
            Focus::Cancel => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => Some(Msg::Form(feedback::Msg::Close)),
                _ => None,
            },
        }
    }

    fn subscriptions(&self) -> Vec<Subscription<Msg>> {
        if self.form.is_modal_open() {
            vec![
                Subscription::keyboard(KeyCode::Tab, "Next field", Msg::FocusNext),
                Subscription::keyboard(KeyCode::Esc, "Close", Msg::Form(feedback::Msg::Dismiss)),
            ]
        } else {
            vec![
                Subscription::keyboard(KeyCode::Char('f'), "Feedback", Msg::Form(feedback::Msg::Open)),
                Subscription::keyboard(KeyCode::Enter, "Feedback", Msg::Form(feedback::Msg::Open)),
                Subscription::keyboard(KeyCode::Char('q'), "Quit", Msg::Quit),
            ]
        }
    }

    fn title() -> &'static str {
        "Feedback"
    }

    fn status(&self, theme: &Theme) -> Option<Line<'static>> {
        if self.form.is_submitting() {
            Some(Line::from(Span::styled("[Submitting...]", Style::default().fg(theme.yellow))))
        } else {
            match self.form.categories() {
                Resource::Loading => Some(Line::from(Span::styled(
                    "[Loading categories...]",
                    theme.info_style(),
                ))),
                Resource::Failure(_) => Some(Line::from(Span::styled(
                    "[Categories unavailable]",
                    theme.error_style(),
                ))),
                _ => None,
            }
        }
    }
}

/// Where a category chip sits inside the chip area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipPlacement {
    pub index: usize,
    pub x: u16,
    pub row: u16,
    pub width: u16,
}

/// Flow chips left to right, wrapping onto a new row when one would overflow
pub fn chip_layout(labels: &[String], width: u16) -> Vec<ChipPlacement> {
    let mut placements = Vec::with_capacity(labels.len());
    let mut x = 0u16;
    let mut row = 0u16;

    for (index, label) in labels.iter().enumerate() {
        let chip_width = label.chars().count() as u16;
        if x > 0 && x + chip_width > width {
            x = 0;
            row += 1;
        }
        placements.push(ChipPlacement {
            index,
            x,
            row,
            width: chip_width,
        });
        x += chip_width + 1;
    }

    placements
}

/// Floating button in the right corner, above or below per `position`
pub fn floating_button_area(area: Rect, position: Position) -> Rect {
    let width = (BUTTON_LABEL.chars().count() as u16).min(area.width);
    let x = area.x + area.width.saturating_sub(width + 2);
    let y = match position {
        Position::Top => area.y + 1.min(area.height.saturating_sub(1)),
        Position::Bottom => area.y + area.height.saturating_sub(2),
    };
    Rect::new(x, y, width, 1.min(area.height))
}

fn modal_width(area: Rect) -> u16 {
    area.width.saturating_sub(4).min(MODAL_MAX_WIDTH)
}

fn modal_area(area: Rect, height: u16) -> Rect {
    let width = modal_width(area);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn field_block(title: &'static str, theme: &Theme, focused: bool, invalid: bool) -> Block<'static> {
    let border = if invalid {
        theme.error_style()
    } else {
        theme.focus_border_style(focused)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(title, Style::default().fg(theme.text)))
}

fn label_line(text: &'static str, focused: bool, theme: &Theme) -> Line<'static> {
    let style = if focused {
        Style::default().fg(theme.mauve).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    Line::from(vec![
        Span::styled(text, style),
        Span::styled(" *", theme.error_style()),
    ])
}

fn input_style(theme: &Theme, submitting: bool) -> Style {
    if submitting {
        theme.muted_style()
    } else {
        Style::default().fg(theme.text)
    }
}

fn render_field_error(frame: &mut Frame, area: Rect, theme: &Theme, error: Option<&'static str>) {
    if let Some(error) = error {
        frame.render_widget(Paragraph::new(Span::styled(error, theme.error_style())), area);
    }
}

/// Last `width` characters of `text`
fn tail(text: &str, width: usize) -> String {
    let count = text.chars().count();
    text.chars().skip(count.saturating_sub(width)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ChoiceField, ListError};
    use async_trait::async_trait;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use serde_json::Value;

    struct StaticClient;

    #[async_trait]
    impl ListClient for StaticClient {
        async fn fetch_choice_field(&self, _list: &str, _field: &str) -> Result<ChoiceField, ListError> {
            Ok(ChoiceField {
                choices: Some(vec!["Bug".to_string(), "Idea".to_string()]),
                allow_multiple_values: None,
                type_as_string: Some("MultiChoice".to_string()),
            })
        }

        async fn create_item(&self, _list: &str, _payload: &Value) -> Result<(), ListError> {
            Ok(())
        }
    }

    fn app() -> FeedbackApp {
        FeedbackApp::new(FeedbackProps::default(), Arc::new(StaticClient))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn focus_cycles_both_ways() {
        assert_eq!(Focus::Title.previous(), Focus::Cancel);
        assert_eq!(Focus::Cancel.next(), Focus::Title);
        assert_eq!(Focus::Description.next(), Focus::Categories);
    }

    #[test]
    fn keys_are_ignored_while_closed() {
        let app = app();
        assert!(app.on_key(key(KeyCode::Char('a'))).is_none());
        assert_eq!(app.subscriptions().len(), 3);
    }

    #[test]
    fn typing_updates_title_and_enter_advances() {
        let mut app = app();
        app.update(Msg::Form(feedback::Msg::Open));

        for c in "Slow".chars() {
            let msg = app.on_key(key(KeyCode::Char(c))).unwrap();
            app.update(msg);
        }
        assert_eq!(app.form().draft().title, "Slow");

        let msg = app.on_key(key(KeyCode::Enter)).unwrap();
        app.update(msg);
        assert_eq!(app.focus(), Focus::Description);
    }

    #[test]
    fn rating_keys_set_and_step() {
        let mut app = app();
        app.update(Msg::Form(feedback::Msg::Open));
        app.update(Msg::Focus(Focus::Rating));

        let msg = app.on_key(key(KeyCode::Char('4'))).unwrap();
        app.update(msg);
        assert_eq!(app.form().draft().rating, 4);

        app.update(Msg::StepRating(1));
        app.update(Msg::StepRating(1));
        assert_eq!(app.form().draft().rating, 5);
    }

    #[test]
    fn escape_dismisses() {
        let mut app = app();
        app.update(Msg::Form(feedback::Msg::Open));
        let msg = app.on_key(key(KeyCode::Esc)).unwrap();
        app.update(msg);
        assert!(!app.form().is_modal_open());
    }

    #[test]
    fn chips_wrap_onto_new_rows() {
        let labels = vec![" [ ] Bug ".to_string(), " [ ] Idea ".to_string(), " [ ] Praise ".to_string()];
        let placements = chip_layout(&labels, 22);
        assert_eq!(placements[0].row, 0);
        assert_eq!(placements[1].x, 10);
        assert_eq!(placements[2].row, 1);
        assert_eq!(placements[2].x, 0);
    }

    #[test]
    fn button_follows_position() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(floating_button_area(area, Position::Top).y, 1);
        assert_eq!(floating_button_area(area, Position::Bottom).y, 22);
    }

    #[tokio::test]
    async fn renders_modal_with_loaded_categories() {
        let mut app = app();
        let command = app.on_mount();
        if let Command::Perform(future) = command {
            let msg = future.await;
            app.update(msg);
        }
        app.update(Msg::Form(feedback::Msg::Open));
        app.update(Msg::Form(feedback::Msg::Submit));

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let mut registry = InteractionRegistry::new();
        let theme = Theme::default();
        terminal
            .draw(|frame| {
                let area = frame.area();
                app.view(frame, area, &theme, &mut registry)
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Submit Feedback"));
        assert!(text.contains("Bug"));
        assert!(text.contains("Title is required."));
        assert!(text.contains("Please provide a rating."));
        assert!(!registry.is_empty());
    }
}
