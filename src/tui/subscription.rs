use crossterm::event::KeyCode;

/// Subscriptions represent inputs that a component wants to receive
/// regardless of which element has focus.
/// They are registered via the subscriptions() function.
pub enum Subscription<Msg> {
    /// Subscribe to a specific keyboard key
    Keyboard {
        key: KeyCode,
        msg: Msg,
        description: String,
    },
}

impl<Msg> Subscription<Msg> {
    /// Helper to create a keyboard subscription
    pub fn keyboard(key: KeyCode, description: impl Into<String>, msg: Msg) -> Self {
        Subscription::Keyboard {
            key,
            msg,
            description: description.into(),
        }
    }

    pub fn key(&self) -> KeyCode {
        match self {
            Subscription::Keyboard { key, .. } => *key,
        }
    }
}
