//! The tabs of the interface.
//!
//! Tabs hold only view state (cursor, filter, panels). The lines they show
//! live in the [`StreamRouter`], so a tab never sees output from anything
//! but the invocation currently owning a target.

pub mod browse;
pub mod hotkeys;
pub mod installed;
pub mod list;

use crossterm::event::KeyEvent;
use ptui_core::event::Target;
use ptui_core::identity::CommandId;
use ptui_core::router::StreamRouter;

use crate::message::Context;

pub use browse::BrowseTab;
pub use installed::InstalledTab;

/// A command started from a hotkey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Issued {
    pub id: CommandId,
    pub description: &'static str,
}

pub trait Tab {
    fn title(&self) -> &'static str;

    /// Called whenever the tab is selected.
    fn init(&mut self, context: &Context);

    /// Returns the command the key started, if any.
    fn handle_key(
        &mut self,
        key: KeyEvent,
        context: &Context,
        router: &StreamRouter,
    ) -> Option<Issued>;

    /// Called when the current invocation of `target` completes.
    fn on_finished(&mut self, target: Target, context: &Context, router: &StreamRouter);

    /// Number of rows available between the header and the status bar.
    fn resize(&mut self, content_height: usize);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabKind {
    Installed,
    Browse,
}

impl TabKind {
    pub const ALL: [TabKind; 2] = [TabKind::Installed, TabKind::Browse];

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            TabKind::Installed => "Installed",
            TabKind::Browse => "Browse",
        }
    }

    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            TabKind::Installed => Some(TabKind::Browse),
            TabKind::Browse => None,
        }
    }

    #[must_use]
    pub fn previous(self) -> Option<Self> {
        match self {
            TabKind::Installed => None,
            TabKind::Browse => Some(TabKind::Installed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_order_does_not_wrap() {
        assert_eq!(TabKind::Installed.next(), Some(TabKind::Browse));
        assert_eq!(TabKind::Browse.next(), None);
        assert_eq!(TabKind::Browse.previous(), Some(TabKind::Installed));
        assert_eq!(TabKind::Installed.previous(), None);
    }

    #[test]
    fn test_titles() {
        let titles: Vec<&str> = TabKind::ALL.iter().map(|kind| kind.title()).collect();
        assert_eq!(titles, vec!["Installed", "Browse"]);
    }
}
