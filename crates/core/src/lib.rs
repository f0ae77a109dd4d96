//! pTUI Core Library
//!
//! This crate runs package manager commands in the background and turns
//! their output into a stream of events that a front-end can apply to its
//! views without ever blocking.
//!
//! # Key Features
//!
//! - **Command Descriptors**: Build `-<operation><options> <arguments>` invocations by value
//! - **Lock Arbitration**: Serialise launches and refuse them while the package database is locked
//! - **Stream Batching**: Read stdout and stderr concurrently and forward lines in fixed size chunks
//! - **Completion Coordination**: Report completion only after all output has been forwarded
//! - **Routing**: Keep each view showing only the most recently started invocation
//! - **Configuration Management**: Optional YAML settings with sensible defaults
//!
//! # Examples
//!
//! Listing installed packages and applying the output to a router:
//!
//! ```no_run
//! use ptui_core::command::Command;
//! use ptui_core::config::Settings;
//! use ptui_core::event::{StreamEvent, Target};
//! use ptui_core::execution::Executor;
//! use ptui_core::router::StreamRouter;
//!
//! let (sender, receiver) = flume::unbounded::<StreamEvent>();
//! let executor = Executor::new(&Settings::default(), sender);
//! let mut router = StreamRouter::new();
//!
//! Command::new()
//!     .operation("Q")
//!     .options("q")
//!     .target(Target::PackageList)
//!     .run(&executor);
//! drop(executor);
//!
//! for event in receiver.iter() {
//!     router.route(event);
//! }
//!
//! for line in router.state(Target::PackageList).lines() {
//!     println!("{}", line.text);
//! }
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod execution;
pub mod file_handling;
pub mod identity;
pub mod lock;
pub mod router;
pub mod stream;
