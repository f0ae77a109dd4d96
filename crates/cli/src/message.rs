//! Messages handled by the event loop and the context tabs run commands in.

use crossterm::event::Event;
use flume::Sender;
use log::debug;
use ptui_core::command::Command;
use ptui_core::event::StreamEvent;
use ptui_core::execution::Executor;
use ptui_core::identity::CommandId;

/// Everything the event loop reacts to, from any thread.
#[derive(Debug)]
pub enum Message {
    /// Terminal input forwarded by the input thread.
    Input(Event),
    /// Progress of a running command.
    Stream(StreamEvent),
    /// Spinner heartbeat, sent whenever no input arrived for a while.
    Tick,
    /// Reload the installed package list.
    Refresh,
}

impl From<StreamEvent> for Message {
    fn from(event: StreamEvent) -> Self {
        Message::Stream(event)
    }
}

/// Handle used by the tabs to start commands.
#[derive(Clone)]
pub struct Context {
    executor: Executor<Sender<Message>>,
    sender: Sender<Message>,
}

impl Context {
    #[must_use]
    pub fn new(executor: Executor<Sender<Message>>, sender: Sender<Message>) -> Self {
        Self { executor, sender }
    }

    pub fn run(&self, command: Command) -> CommandId {
        debug!("Running `{} {}`", self.executor.program(), command);
        command.run(&self.executor)
    }

    /// Follow-up action that asks the event loop to reload the installed list.
    pub fn refresh_installed(&self) -> impl FnOnce() + Send + 'static {
        let sender = self.sender.clone();
        move || {
            if sender.send(Message::Refresh).is_err() {
                debug!("Event loop is gone, skipping refresh");
            }
        }
    }
}
