use futures::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::time::Duration;

/// Commands represent side effects that components want to perform.
/// They are returned from the update() function and executed by the runtime.
pub enum Command<Msg> {
    /// Do nothing
    None,

    /// Execute multiple commands in sequence
    Batch(Vec<Command<Msg>>),

    /// Perform an async operation and send the result as a message
    Perform(BoxFuture<'static, Msg>),

    /// Quit the application
    Quit,
}

impl<Msg: Send + 'static> Command<Msg> {
    /// Helper to create a command that performs an async operation
    pub fn perform<F, T>(future: F, to_msg: impl FnOnce(T) -> Msg + Send + 'static) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Command::Perform(
            async move {
                let result = future.await;
                to_msg(result)
            }
            .boxed(),
        )
    }

    /// Deliver a message after a fixed delay
    pub fn delay(duration: Duration, msg: Msg) -> Self {
        Command::Perform(
            async move {
                tokio::time::sleep(duration).await;
                msg
            }
            .boxed(),
        )
    }

    /// Helper to batch multiple commands
    pub fn batch(commands: Vec<Command<Msg>>) -> Self {
        Command::Batch(commands)
    }

    /// Wrap the messages this command produces, for embedding a child component
    pub fn map<U: Send + 'static>(self, f: fn(Msg) -> U) -> Command<U> {
        match self {
            Command::None => Command::None,
            Command::Batch(commands) => {
                Command::Batch(commands.into_iter().map(|cmd| cmd.map(f)).collect())
            }
            Command::Perform(future) => Command::Perform(future.map(f).boxed()),
            Command::Quit => Command::Quit,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Command::None)
    }

    /// Flatten into the individual commands, dropping `None`
    pub fn into_vec(self) -> Vec<Command<Msg>> {
        match self {
            Command::None => Vec::new(),
            Command::Batch(commands) => commands.into_iter().flat_map(Command::into_vec).collect(),
            other => vec![other],
        }
    }
}

impl<Msg> Default for Command<Msg> {
    fn default() -> Self {
        Command::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn map_wraps_performed_message() {
        let cmd: Command<u32> = Command::perform(async { 20 }, |n: u32| n + 1);
        let mapped = cmd.map(|n| format!("got {}", n));

        match mapped {
            Command::Perform(future) => assert_eq!(future.await, "got 21"),
            _ => panic!("expected Perform"),
        }
    }

    #[test]
    fn into_vec_flattens_batches() {
        let cmd: Command<u8> = Command::batch(vec![
            Command::None,
            Command::batch(vec![Command::Quit, Command::None]),
            Command::Quit,
        ]);
        assert_eq!(cmd.into_vec().len(), 2);
    }
}
