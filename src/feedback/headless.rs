use std::collections::VecDeque;

use crate::tui::Command;

use super::form::{FeedbackForm, Msg};

/// Execute commands inline until the form has nothing left to do.
///
/// Async work is awaited one future at a time and its message fed back into
/// the form, so this also waits out the auto-close delay after a success.
/// Used by the `submit` command and by tests; the terminal host runs the
/// same commands concurrently instead.
pub async fn run_until_idle(form: &mut FeedbackForm, command: Command<Msg>) {
    let mut queue: VecDeque<Command<Msg>> = command.into_vec().into();

    while let Some(command) = queue.pop_front() {
        match command {
            Command::None | Command::Quit => {}
            Command::Batch(commands) => queue.extend(commands),
            Command::Perform(future) => {
                let msg = future.await;
                queue.extend(form.update(msg).into_vec());
            }
        }
    }
}

/// Apply a sequence of messages, running each resulting command to completion
pub async fn dispatch_all(form: &mut FeedbackForm, messages: impl IntoIterator<Item = Msg>) {
    for msg in messages {
        let command = form.update(msg);
        run_until_idle(form, command).await;
    }
}
