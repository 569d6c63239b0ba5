pub mod app;
pub mod apps;
pub mod command;
pub mod interaction;
pub mod resource;
pub mod runtime;
pub mod subscription;
pub mod text_input;
pub mod theme;

pub use app::App;
pub use apps::FeedbackApp;
pub use command::Command;
pub use interaction::InteractionRegistry;
pub use resource::Resource;
pub use runtime::Runtime;
pub use subscription::Subscription;
pub use text_input::TextInputState;
pub use theme::{Theme, ThemeVariant};
