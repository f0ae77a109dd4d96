//! Allocation of command identifiers.
//!
//! Every invocation gets a [`CommandId`] from the process-wide allocator when
//! it is run. Identifiers are never reused and have nothing to do with OS
//! process ids; they only exist so stale output can be told apart from the
//! output of the invocation a view is currently showing.

use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};

static COMMAND_IDS: IdAllocator = IdAllocator::new();

/// Identifier of a single invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId(u64);

impl CommandId {
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Allocates the next identifier from the process-wide allocator.
    #[must_use]
    pub fn next() -> Self {
        COMMAND_IDS.allocate()
    }
}

impl Display for CommandId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "#{}", self.0)
    }
}

/// Lock-free monotonically increasing counter.
#[derive(Debug)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    pub fn allocate(&self) -> CommandId {
        CommandId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
