//! Description of a package manager invocation.

use std::fmt::{Display, Formatter};

use indexmap::IndexSet;

use crate::event::{EventSink, FollowUp, Target};
use crate::execution::Executor;
use crate::identity::CommandId;

/// A package manager invocation, built up by value and run once.
///
/// Nothing is validated here; a bad flag or argument is reported by the
/// package manager through its exit status.
///
/// # Examples
///
/// ```
/// use ptui_core::command::Command;
/// use ptui_core::event::Target;
///
/// let command = Command::new()
///     .operation("S")
///     .options("yu")
///     .arguments(["--noconfirm"])
///     .target(Target::Background);
///
/// assert_eq!(command.argv(), vec!["-Syu", "--noconfirm"]);
/// ```
#[derive(Debug)]
pub struct Command {
    operation: String,
    options: IndexSet<char>,
    arguments: Vec<String>,
    target: Target,
    long_running: bool,
    follow_up: Option<FollowUp>,
}

impl Default for Command {
    fn default() -> Self {
        Self {
            operation: String::new(),
            options: IndexSet::new(),
            arguments: Vec::new(),
            target: Target::Background,
            long_running: true,
            follow_up: None,
        }
    }
}

impl Command {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the operation letter(s), e.g. `Q` for `-Q`.
    #[must_use]
    pub fn operation(mut self, operation: &str) -> Self {
        self.operation = operation.to_string();
        self
    }

    /// Adds single letter options; each character is one flag.
    #[must_use]
    pub fn options(mut self, options: &str) -> Self {
        self.options.extend(options.chars());
        self
    }

    #[must_use]
    pub fn arguments<I, A>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.arguments.extend(arguments.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    /// Whether the busy indicator should show while this command runs.
    #[must_use]
    pub fn long_running(mut self, long_running: bool) -> Self {
        self.long_running = long_running;
        self
    }

    /// Action handed back to the event loop when this command succeeds.
    #[must_use]
    pub fn follow_up(mut self, action: impl FnOnce() + Send + 'static) -> Self {
        self.follow_up = Some(FollowUp::new(action));
        self
    }

    #[must_use]
    pub fn get_target(&self) -> Target {
        self.target
    }

    #[must_use]
    pub fn is_long_running(&self) -> bool {
        self.long_running
    }

    /// The argument vector passed to the package manager.
    #[must_use]
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.arguments.len() + 1);

        if !self.operation.is_empty() || !self.options.is_empty() {
            let mut flag = format!("-{}", self.operation);
            flag.extend(self.options.iter());
            argv.push(flag);
        }

        argv.extend(self.arguments.iter().cloned());
        argv
    }

    /// Takes the follow-up action out, leaving the rest for the launcher.
    pub(crate) fn take_follow_up(&mut self) -> Option<FollowUp> {
        self.follow_up.take()
    }

    /// Runs the command. This is the only side-effecting step.
    ///
    /// Returns at once with the allocated identifier; everything else
    /// arrives as events at the executor's sink.
    pub fn run<S: EventSink>(self, executor: &Executor<S>) -> CommandId {
        executor.execute(self)
    }
}

impl Display for Command {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.argv().join(" ").as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_and_options_concatenate() {
        let command = Command::new().operation("Q").options("q").options("e");
        assert_eq!(command.argv(), vec!["-Qqe"]);
    }

    #[test]
    fn test_options_are_an_ordered_set() {
        let command = Command::new().operation("S").options("yu").options("y");
        assert_eq!(command.argv(), vec!["-Syu"]);
    }

    #[test]
    fn test_arguments_follow_flag_in_order() {
        let command = Command::new()
            .operation("R")
            .options("s")
            .arguments(["linux", "--noconfirm"]);
        assert_eq!(command.argv(), vec!["-Rs", "linux", "--noconfirm"]);
    }

    #[test]
    fn test_without_operation_only_arguments() {
        let command = Command::new().arguments(vec!["--version".to_string()]);
        assert_eq!(command.argv(), vec!["--version"]);
    }

    #[test]
    fn test_defaults() {
        let command = Command::new();
        assert_eq!(command.get_target(), Target::Background);
        assert!(command.is_long_running());
        assert!(command.argv().is_empty());
    }

    #[test]
    fn test_target_and_long_running() {
        let command = Command::new()
            .target(Target::PackageInfo)
            .long_running(false);
        assert_eq!(command.get_target(), Target::PackageInfo);
        assert!(!command.is_long_running());
    }

    #[test]
    fn test_follow_up_is_taken_once() {
        let mut command = Command::new().follow_up(|| {});
        assert!(command.take_follow_up().is_some());
        assert!(command.take_follow_up().is_none());
    }

    #[test]
    fn test_display() {
        let command = Command::new().operation("S").options("s").options("q").arguments(["vim"]);
        assert_eq!(command.to_string(), "-Ssq vim");
    }
}
