use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Line;

use crate::tui::{Command, InteractionRegistry, Subscription, Theme};

/// A component the runtime can mount into the terminal.
///
/// This follows the Elm architecture, with explicit lifecycle hooks in place
/// of a framework base class:
/// - `on_mount` / `on_props_changed` / `on_unmount`: called by the host
/// - `update`: handles a message and returns a command for the runtime
/// - `view`: renders the current state and registers click targets
/// - `on_key` / `subscriptions`: declare which keyboard input it wants
pub trait App: Send + 'static {
    /// The component's message type
    type Msg: Clone + Send + 'static;

    /// Configuration the host constructs the component with
    type Props;

    /// Called once after the component is attached
    fn on_mount(&mut self) -> Command<Self::Msg>;

    /// Called when the host supplies new props while mounted
    fn on_props_changed(&mut self, props: Self::Props) -> Command<Self::Msg>;

    /// Called before the host tears the component down
    fn on_unmount(&mut self);

    /// Update the state based on a message and return a command
    fn update(&mut self, msg: Self::Msg) -> Command<Self::Msg>;

    /// Render into `area`, registering clickable regions
    fn view(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        registry: &mut InteractionRegistry<Self::Msg>,
    );

    /// Route a key to whatever currently has focus. Returning None lets the
    /// runtime fall back to the global subscriptions.
    fn on_key(&self, _key: KeyEvent) -> Option<Self::Msg> {
        None
    }

    /// Global key bindings for the current state
    fn subscriptions(&self) -> Vec<Subscription<Self::Msg>>;

    /// Return the app's title (static string for the footer)
    fn title() -> &'static str;

    /// Return optional status text (dynamic, styled based on state)
    fn status(&self, _theme: &Theme) -> Option<Line<'static>> {
        None
    }
}
