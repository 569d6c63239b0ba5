use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use log::debug;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::tui::{App, Command, InteractionRegistry, Subscription, Theme};

/// The runtime manages app lifecycle, event routing, and command execution
pub struct Runtime<A: App> {
    app: A,

    theme: Theme,

    /// Interaction registry for mouse events, rebuilt on every render
    registry: InteractionRegistry<A::Msg>,

    /// Results of spawned commands
    sender: mpsc::UnboundedSender<A::Msg>,
    receiver: mpsc::UnboundedReceiver<A::Msg>,

    /// Spawned commands still running, aborted on unmount
    tasks: Vec<JoinHandle<()>>,

    mounted: bool,
}

impl<A: App> Runtime<A> {
    pub fn new(app: A, theme: Theme) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        Self {
            app,
            theme,
            registry: InteractionRegistry::new(),
            sender,
            receiver,
            tasks: Vec::new(),
            mounted: false,
        }
    }

    /// Attach the app and run its mount command.
    /// Must be called from within a tokio runtime.
    pub fn mount(&mut self) -> Result<bool> {
        if self.mounted {
            return Ok(true);
        }
        self.mounted = true;
        let command = self.app.on_mount();
        self.execute_command(command)
    }

    /// Hand the app new props
    pub fn set_props(&mut self, props: A::Props) -> Result<bool> {
        let command = self.app.on_props_changed(props);
        self.execute_command(command)
    }

    /// Detach the app and abort whatever it still has in flight
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.app.on_unmount();

        for task in self.tasks.drain(..) {
            task.abort();
        }
        while self.receiver.try_recv().is_ok() {}
    }

    pub fn app(&self) -> &A {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut A {
        &mut self.app
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Number of spawned commands that have not finished yet
    pub fn pending_tasks(&self) -> usize {
        self.tasks.iter().filter(|task| !task.is_finished()).count()
    }

    /// Get keyboard bindings for the footer
    pub fn get_key_bindings(&self) -> Vec<(KeyCode, String)> {
        self.app
            .subscriptions()
            .into_iter()
            .map(|sub| match sub {
                Subscription::Keyboard { key, description, .. } => (key, description),
            })
            .collect()
    }

    pub fn get_title(&self) -> &'static str {
        A::title()
    }

    pub fn get_status(&self) -> Option<Line<'static>> {
        self.app.status(&self.theme)
    }

    /// Feed a message straight into the app
    pub fn dispatch(&mut self, msg: A::Msg) -> Result<bool> {
        let command = self.app.update(msg);
        self.execute_command(command)
    }

    /// Process results of commands that finished since the last poll
    pub fn poll_async(&mut self) -> Result<bool> {
        self.tasks.retain(|task| !task.is_finished());

        while let Ok(msg) = self.receiver.try_recv() {
            if !self.dispatch(msg)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Wait for the next command result, then process it.
    /// Returns immediately if nothing is in flight.
    pub async fn next_async(&mut self) -> Result<bool> {
        if let Ok(msg) = self.receiver.try_recv() {
            return self.dispatch(msg);
        }
        if self.pending_tasks() == 0 {
            return Ok(true);
        }
        match self.receiver.recv().await {
            Some(msg) => self.dispatch(msg),
            None => Ok(true),
        }
    }

    /// Handle a keyboard event
    pub fn handle_key(&mut self, key_event: KeyEvent) -> Result<bool> {
        if key_event.kind != KeyEventKind::Press {
            return Ok(true);
        }

        // Whatever has focus gets the key first
        if let Some(msg) = self.app.on_key(key_event) {
            return self.dispatch(msg);
        }

        // Nothing focused handled it, check global subscriptions
        let subscribed = self
            .app
            .subscriptions()
            .into_iter()
            .find(|sub| sub.key() == key_event.code)
            .map(|sub| match sub {
                Subscription::Keyboard { msg, .. } => msg,
            });

        if let Some(msg) = subscribed {
            return self.dispatch(msg);
        }

        Ok(true)
    }

    /// Handle a mouse event
    pub fn handle_mouse(&mut self, mouse_event: MouseEvent) -> Result<bool> {
        if let MouseEventKind::Down(MouseButton::Left) = mouse_event.kind {
            if let Some(msg) = self.registry.find_click(mouse_event.column, mouse_event.row) {
                return self.dispatch(msg);
            }
        }
        Ok(true)
    }

    /// Render the app above a one-line footer
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = if area.height > 1 { 1 } else { 0 };
        let app_area = Rect {
            height: area.height - footer_height,
            ..area
        };

        self.registry.clear();
        self.app.view(frame, app_area, &self.theme, &mut self.registry);

        if footer_height > 0 {
            let footer_area = Rect {
                y: area.y + area.height - 1,
                height: 1,
                ..area
            };
            frame.render_widget(Paragraph::new(self.footer_line()), footer_area);
        }
    }

    fn footer_line(&self) -> Line<'static> {
        let mut spans = vec![Span::styled(
            format!(" {} ", self.get_title()),
            self.theme.primary_button_style(false, false),
        )];

        if let Some(status) = self.get_status() {
            spans.push(Span::raw(" "));
            spans.extend(status.spans);
        }

        for (key, description) in self.get_key_bindings() {
            spans.push(Span::styled(
                format!("  {}", key_label(key)),
                Style::default().fg(self.theme.lavender),
            ));
            spans.push(Span::styled(format!(" {}", description), self.theme.muted_style()));
        }

        Line::from(spans)
    }

    /// Execute a command
    fn execute_command(&mut self, command: Command<A::Msg>) -> Result<bool> {
        match command {
            Command::None => Ok(true),

            Command::Batch(commands) => {
                for cmd in commands {
                    if !self.execute_command(cmd)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }

            Command::Quit => Ok(false),

            Command::Perform(future) => {
                if !self.mounted {
                    debug!("Dropping command issued while unmounted");
                    return Ok(true);
                }
                let sender = self.sender.clone();
                let handle = tokio::spawn(async move {
                    let msg = future.await;
                    // Receiver is gone once the runtime is dropped
                    let _ = sender.send(msg);
                });
                self.tasks.push(handle);
                Ok(true)
            }
        }
    }
}

impl<A: App> Drop for Runtime<A> {
    fn drop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

fn key_label(key: KeyCode) -> String {
    match key {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        other => format!("{:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use std::time::Duration;

    /// Counts key presses and delayed ticks
    struct Counter {
        count: u32,
        mounted: bool,
    }

    #[derive(Clone, Debug)]
    enum CounterMsg {
        Increment,
        Later,
        Quit,
    }

    impl App for Counter {
        type Msg = CounterMsg;
        type Props = u32;

        fn on_mount(&mut self) -> Command<CounterMsg> {
            self.mounted = true;
            Command::None
        }

        fn on_props_changed(&mut self, props: u32) -> Command<CounterMsg> {
            self.count = props;
            Command::None
        }

        fn on_unmount(&mut self) {
            self.mounted = false;
        }

        fn update(&mut self, msg: CounterMsg) -> Command<CounterMsg> {
            match msg {
                CounterMsg::Increment => {
                    self.count += 1;
                    Command::None
                }
                CounterMsg::Later => Command::delay(Duration::from_secs(5), CounterMsg::Increment),
                CounterMsg::Quit => Command::Quit,
            }
        }

        fn view(
            &self,
            _frame: &mut Frame,
            _area: Rect,
            _theme: &Theme,
            _registry: &mut InteractionRegistry<CounterMsg>,
        ) {
        }

        fn subscriptions(&self) -> Vec<Subscription<CounterMsg>> {
            vec![
                Subscription::keyboard(KeyCode::Char('+'), "Add", CounterMsg::Increment),
                Subscription::keyboard(KeyCode::Char('q'), "Quit", CounterMsg::Quit),
            ]
        }

        fn title() -> &'static str {
            "Counter"
        }
    }

    fn press(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn subscriptions_route_keys() {
        let mut runtime = Runtime::new(Counter { count: 0, mounted: false }, Theme::default());
        runtime.mount().unwrap();

        assert!(runtime.handle_key(press('+')).unwrap());
        assert!(runtime.handle_key(press('x')).unwrap());
        assert_eq!(runtime.app().count, 1);
        assert!(!runtime.handle_key(press('q')).unwrap());
        assert_eq!(runtime.get_key_bindings().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_command_delivers_message() {
        let mut runtime = Runtime::new(Counter { count: 0, mounted: false }, Theme::default());
        runtime.mount().unwrap();
        runtime.dispatch(CounterMsg::Later).unwrap();
        assert_eq!(runtime.pending_tasks(), 1);

        runtime.next_async().await.unwrap();
        assert_eq!(runtime.app().count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unmount_aborts_pending_commands() {
        let mut runtime = Runtime::new(Counter { count: 0, mounted: false }, Theme::default());
        runtime.mount().unwrap();
        runtime.dispatch(CounterMsg::Later).unwrap();

        runtime.unmount();
        assert!(!runtime.app().mounted);

        tokio::time::sleep(Duration::from_secs(10)).await;
        runtime.poll_async().unwrap();
        assert_eq!(runtime.app().count, 0);
        assert_eq!(runtime.pending_tasks(), 0);
    }
}
