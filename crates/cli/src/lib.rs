//! ptui CLI Library
//!
//! The terminal front-end of ptui, a package manager interface. Everything
//! that touches a subprocess lives in `ptui-core`; this crate turns key
//! presses into commands and stream events into screen content.
//!
//! # Architecture
//!
//! - [`cli_args`]: Command-line argument parsing
//! - [`operations`]: The package manager commands the interface can issue
//! - [`message`]: Messages consumed by the event loop and the shared [`message::Context`]
//! - [`tabs`]: The Installed and Browse tabs, their lists and hotkeys
//! - [`app`]: Application state and the event loop
//! - [`ui`]: Rendering with `crossterm`
//!
//! # Examples
//!
//! ```bash
//! # Run with the settings in ~/.ptui/config.yml
//! sudo ptui
//!
//! # Try it out without root, logging to a file
//! ptui --allow-non-root --log-file /tmp/ptui.log
//! ```

pub mod app;
pub mod cli_args;
pub mod message;
pub mod operations;
pub mod tabs;
pub mod ui;
