//! Routing of stream events to per-target view state.
//!
//! The router is owned by the event loop and is the only place target
//! content changes. Each target shows the output of at most one invocation,
//! the most recently started one. Output of any other invocation for that
//! target is stale and dropped.

use std::collections::HashMap;

use log::{debug, trace};

use crate::event::{FollowUp, StreamEvent, Target};
use crate::identity::CommandId;

/// One line of command output as shown in a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub is_error: bool,
}

impl Line {
    pub fn output(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Content and ownership of a single target.
#[derive(Debug, Default)]
pub struct TargetState {
    current: Option<CommandId>,
    lines: Vec<Line>,
    finished: bool,
}

impl TargetState {
    /// The invocation whose output this target shows.
    #[must_use]
    pub fn current(&self) -> Option<CommandId> {
        self.current
    }

    #[must_use]
    pub fn is_current(&self, id: CommandId) -> bool {
        self.current == Some(id)
    }

    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Whether the current invocation has completed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// What routing an event did.
#[derive(Debug)]
pub enum Routed {
    /// The target now belongs to `id` and was cleared.
    Started { target: Target, id: CommandId },
    /// Lines were appended to the target.
    Appended { target: Target, count: usize },
    /// The current invocation of the target completed.
    ///
    /// `follow_up` is only ever set when `error` is `None`.
    Finished {
        target: Target,
        id: CommandId,
        error: Option<String>,
        follow_up: Option<FollowUp>,
    },
    /// The invocation never started; nothing was changed.
    Rejected {
        target: Target,
        id: CommandId,
        error: String,
    },
    /// Output or completion of a superseded invocation.
    Stale { target: Target, id: CommandId },
}

/// Per-target state plus the busy counter.
#[derive(Debug, Default)]
pub struct StreamRouter {
    targets: [TargetState; 4],
    in_flight: HashMap<CommandId, bool>,
    busy: usize,
}

impl StreamRouter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self, target: Target) -> &TargetState {
        &self.targets[target.index()]
    }

    /// Number of long-running invocations started and not yet done.
    #[must_use]
    pub fn busy_count(&self) -> usize {
        self.busy
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy > 0
    }

    /// Applies one event.
    ///
    /// Busy bookkeeping happens for every `Done` regardless of whether the
    /// invocation is still current; content is only ever changed by the
    /// current invocation.
    pub fn route(&mut self, event: StreamEvent) -> Routed {
        match event {
            StreamEvent::Start {
                id,
                target,
                long_running,
                process,
            } => {
                debug!("{} owns {:?}: {}", id, target, process);
                if long_running {
                    self.busy += 1;
                }
                self.in_flight.insert(id, long_running);

                let state = &mut self.targets[target.index()];
                state.current = Some(id);
                state.lines.clear();
                state.finished = false;

                Routed::Started { target, id }
            }
            StreamEvent::Chunk {
                id,
                target,
                lines,
                is_error,
            } => {
                let state = &mut self.targets[target.index()];
                if !state.is_current(id) {
                    trace!("Dropping {} stale lines of {}", lines.len(), id);
                    return Routed::Stale { target, id };
                }

                let count = lines.len();
                state
                    .lines
                    .extend(lines.into_iter().map(|text| Line { text, is_error }));

                Routed::Appended { target, count }
            }
            StreamEvent::Done {
                id,
                target,
                result,
                follow_up,
            } => {
                let long_running = match self.in_flight.remove(&id) {
                    Some(long_running) => long_running,
                    None => {
                        let error = match result {
                            Err(error) => error.to_string(),
                            Ok(()) => "Completed without starting".to_string(),
                        };
                        debug!("{} was rejected: {}", id, error);
                        return Routed::Rejected { target, id, error };
                    }
                };

                if long_running {
                    self.busy = self.busy.saturating_sub(1);
                }

                let state = &mut self.targets[target.index()];
                if !state.is_current(id) {
                    debug!("{} completed after being superseded", id);
                    return Routed::Stale { target, id };
                }
                state.finished = true;

                match result {
                    Ok(()) => Routed::Finished {
                        target,
                        id,
                        error: None,
                        follow_up,
                    },
                    Err(error) => {
                        let error = error.to_string();
                        state.lines.push(Line::error(error.clone()));
                        Routed::Finished {
                            target,
                            id,
                            error: Some(error),
                            follow_up: None,
                        }
                    }
                }
            }
        }
    }
}
