//! Events produced by running commands.
//!
//! Worker threads never touch view state; everything they learn about a
//! running process is turned into a [`StreamEvent`] and handed to an
//! [`EventSink`], normally the inbound channel of the event loop.

use std::fmt::{Debug, Display, Formatter};

use log::debug;

use crate::error::Result;
use crate::identity::CommandId;

/// Logical destination of a command's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// The installed package list.
    PackageList,
    /// The detail pane for the selected package.
    PackageInfo,
    /// Operations whose output is not shown in a list (upgrades, removals).
    Background,
    /// Results of a sync database search.
    SearchResults,
}

impl Target {
    pub const ALL: [Target; 4] = [
        Target::PackageList,
        Target::PackageInfo,
        Target::Background,
        Target::SearchResults,
    ];

    /// Position of this target in [`Target::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Enough information to identify a spawned process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessHandle {
    pub pid: u32,
    pub argv: Vec<String>,
}

impl Display for ProcessHandle {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "`{}` (pid {})", self.argv.join(" "), self.pid)
    }
}

/// Action run by the event loop after a command completes successfully.
pub struct FollowUp(Box<dyn FnOnce() + Send>);

impl FollowUp {
    pub fn new(action: impl FnOnce() + Send + 'static) -> Self {
        Self(Box::new(action))
    }

    pub fn run(self) {
        (self.0)();
    }
}

impl Debug for FollowUp {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("FollowUp")
    }
}

/// One step in the life of an invocation.
///
/// For a given id the order is always one `Start`, any number of `Chunk`s,
/// then one `Done`. A launch that never got as far as spawning produces a
/// lone `Done`.
#[derive(Debug)]
pub enum StreamEvent {
    Start {
        id: CommandId,
        target: Target,
        long_running: bool,
        process: ProcessHandle,
    },
    Chunk {
        id: CommandId,
        target: Target,
        lines: Vec<String>,
        is_error: bool,
    },
    Done {
        id: CommandId,
        target: Target,
        result: Result<()>,
        follow_up: Option<FollowUp>,
    },
}

impl StreamEvent {
    #[must_use]
    pub fn id(&self) -> CommandId {
        match self {
            StreamEvent::Start { id, .. }
            | StreamEvent::Chunk { id, .. }
            | StreamEvent::Done { id, .. } => *id,
        }
    }

    #[must_use]
    pub fn target(&self) -> Target {
        match self {
            StreamEvent::Start { target, .. }
            | StreamEvent::Chunk { target, .. }
            | StreamEvent::Done { target, .. } => *target,
        }
    }
}

/// Receiver of stream events, safe to use from many threads at once.
pub trait EventSink: Clone + Send + 'static {
    fn emit(&self, event: StreamEvent);
}

impl<T> EventSink for flume::Sender<T>
where
    T: From<StreamEvent> + Send + 'static,
{
    fn emit(&self, event: StreamEvent) {
        let id = event.id();
        if flume::Sender::send(self, T::from(event)).is_err() {
            debug!("Event loop is gone, dropping event for {}", id);
        }
    }
}
