//! Launching package manager processes and coordinating their completion.
//!
//! [`Executor::execute`] returns as soon as an identifier is allocated. The
//! rest happens on worker threads: a launcher thread clears the lock, spawns
//! the process and emits `Start`, one reader thread per output pipe emits
//! `Chunk`s, and the launcher thread then stays on as the completion
//! coordinator, emitting `Done` only once both readers have finished and the
//! process has been reaped.

use std::io::Read;
use std::process::{Child, Command as ProcessCommand, Stdio};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, error, info, warn};

use crate::command::Command;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::event::{EventSink, FollowUp, ProcessHandle, StreamEvent, Target};
use crate::identity::CommandId;
use crate::lock::LockArbitrator;
use crate::stream::{StreamBatcher, StreamOrigin};

#[derive(Debug)]
struct Shared {
    program: String,
    arbitrator: LockArbitrator,
    batch_size: usize,
}

/// Runs [`Command`]s and reports their progress to a sink.
pub struct Executor<S> {
    shared: Arc<Shared>,
    sink: S,
}

impl<S: Clone> Clone for Executor<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            sink: self.sink.clone(),
        }
    }
}

impl<S: EventSink> Executor<S> {
    pub fn new(settings: &Settings, sink: S) -> Self {
        Self {
            shared: Arc::new(Shared {
                program: settings.program.clone(),
                arbitrator: LockArbitrator::new(settings.lock_file_path()),
                batch_size: settings.batch_size(),
            }),
            sink,
        }
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.shared.program
    }

    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.shared.batch_size
    }

    /// Allocates an identifier and launches `command` in the background.
    ///
    /// Never blocks on the lock or on the process. Exactly one `Done` is
    /// emitted for the returned identifier, whatever happens.
    pub fn execute(&self, command: Command) -> CommandId {
        let id = CommandId::next();
        let target = command.get_target();
        let shared = Arc::clone(&self.shared);
        let sink = self.sink.clone();

        debug!("{} queued: {}", id, command);

        let spawned = thread::Builder::new()
            .name(format!("launch-{id}"))
            .spawn(move || launch(&shared, id, command, &sink));

        if let Err(original) = spawned {
            error!("Could not start launcher thread for {}: {}", id, original);
            self.sink.emit(StreamEvent::Done {
                id,
                target,
                result: Err(Error::Stdio(original)),
                follow_up: None,
            });
        }

        id
    }
}

fn launch<S: EventSink>(shared: &Shared, id: CommandId, mut command: Command, sink: &S) {
    let target = command.get_target();
    let long_running = command.is_long_running();
    let follow_up = command.take_follow_up();
    let argv = command.argv();

    let fail = |error: Error| {
        sink.emit(StreamEvent::Done {
            id,
            target,
            result: Err(error),
            follow_up: None,
        });
    };

    let clearance = match shared.arbitrator.acquire() {
        Ok(clearance) => clearance,
        Err(error) => return fail(error),
    };

    let spawned = ProcessCommand::new(&shared.program)
        .args(&argv)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn();

    let mut child = match spawned {
        Ok(child) => child,
        Err(original) => return fail(Error::spawn_error(shared.program.clone(), original)),
    };

    let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
        (Some(stdout), Some(stderr)) => (stdout, stderr),
        (stdout, _) => {
            drop(clearance);
            let missing = if stdout.is_none() { "stdout" } else { "stderr" };
            reap(&mut child);
            return fail(Error::MissingPipe(missing));
        }
    };

    let process = ProcessHandle {
        pid: child.id(),
        argv: std::iter::once(shared.program.clone()).chain(argv).collect(),
    };
    info!("{} started {}", id, process);

    sink.emit(StreamEvent::Start {
        id,
        target,
        long_running,
        process,
    });

    let readers = [
        spawn_reader(id, target, StreamOrigin::Stdout, shared.batch_size, sink, stdout),
        spawn_reader(id, target, StreamOrigin::Stderr, shared.batch_size, sink, stderr),
    ];

    drop(clearance);

    coordinate(id, target, readers, || wait(&mut child), follow_up, sink);
}

fn spawn_reader<S, R>(
    id: CommandId,
    target: Target,
    origin: StreamOrigin,
    batch_size: usize,
    sink: &S,
    pipe: R,
) -> Option<JoinHandle<usize>>
where
    S: EventSink,
    R: Read + Send + 'static,
{
    let batcher = StreamBatcher::new(id, target, origin, batch_size, sink.clone());

    match thread::Builder::new()
        .name(format!("{}-{}", id, origin.name()))
        .spawn(move || batcher.drain(pipe))
    {
        Ok(handle) => Some(handle),
        Err(original) => {
            error!("Could not start {} reader for {}: {}", origin.name(), id, original);
            sink.emit(StreamEvent::Chunk {
                id,
                target,
                lines: vec![format!("Could not read {}: {}", origin.name(), original)],
                is_error: true,
            });
            None
        }
    }
}

/// Waits for both readers, then for the process, then emits `Done`.
///
/// A reader that failed or panicked only loses its own stream.
fn coordinate<S, W>(
    id: CommandId,
    target: Target,
    readers: [Option<JoinHandle<usize>>; 2],
    wait_for_exit: W,
    follow_up: Option<FollowUp>,
    sink: &S,
) where
    S: EventSink,
    W: FnOnce() -> Result<()>,
{
    let mut line_count = 0;
    for reader in readers.into_iter().flatten() {
        match reader.join() {
            Ok(lines) => line_count += lines,
            Err(_) => warn!("A stream reader of {} panicked", id),
        }
    }

    let result = wait_for_exit();
    match &result {
        Ok(()) => info!("{} finished after {} lines", id, line_count),
        Err(error) => info!("{} failed after {} lines: {}", id, line_count, error),
    }

    sink.emit(StreamEvent::Done {
        id,
        target,
        result,
        follow_up,
    });
}

fn wait(child: &mut Child) -> Result<()> {
    let status = child.wait().map_err(Error::Wait)?;

    if status.success() {
        Ok(())
    } else {
        Err(Error::SubProcessExit(status))
    }
}

fn reap(child: &mut Child) {
    if let Err(original) = child.kill() {
        debug!("Could not kill pid {}: {}", child.id(), original);
    }
    if let Err(original) = child.wait() {
        debug!("Could not reap pid {}: {}", child.id(), original);
    }
}
