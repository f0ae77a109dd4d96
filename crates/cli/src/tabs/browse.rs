//! The Browse tab: sync database search results and package details.

use crossterm::event::{KeyCode, KeyEvent};
use ptui_core::event::Target;
use ptui_core::identity::CommandId;
use ptui_core::router::StreamRouter;

use super::hotkeys::{Hotkey, Hotkeys};
use super::list::{CycleDirection, ListView};
use super::{Issued, Tab};
use crate::message::Context;
use crate::operations;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseAction {
    ToggleHotkeys,
    ToggleSearch,
    ViewDetails,
    CloseDetails,
    InstallSelected,
}

#[derive(Debug)]
pub struct BrowseTab {
    list: ListView,
    hotkeys: Hotkeys<BrowseAction>,
    query: String,
    is_viewing_details: bool,
    content_height: usize,
}

impl Default for BrowseTab {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowseTab {
    #[must_use]
    pub fn new() -> Self {
        Self {
            list: ListView::default(),
            hotkeys: Hotkeys::new([
                Hotkey::new(KeyCode::Char('H'), "H", "Toggle Hotkeys", BrowseAction::ToggleHotkeys),
                Hotkey::new(KeyCode::Char('/'), "/", "Toggle Search", BrowseAction::ToggleSearch),
                Hotkey::new(KeyCode::Char('I'), "I", "View Details", BrowseAction::ViewDetails),
                Hotkey::new(KeyCode::Backspace, "Backspace", "Close Details", BrowseAction::CloseDetails),
                Hotkey::new(KeyCode::Enter, "Enter", "Install Selected", BrowseAction::InstallSelected),
            ]),
            query: String::new(),
            is_viewing_details: false,
            content_height: 0,
        }
    }

    #[must_use]
    pub fn list(&self) -> &ListView {
        &self.list
    }

    #[must_use]
    pub fn hotkeys(&self) -> &Hotkeys<BrowseAction> {
        &self.hotkeys
    }

    /// The text of the last database search.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn is_viewing_details(&self) -> bool {
        self.is_viewing_details
    }

    #[must_use]
    pub fn list_height(&self) -> usize {
        self.content_height
            .saturating_sub(self.hotkeys.panel_height())
            .max(1)
    }

    fn search(&mut self, context: &Context) -> CommandId {
        self.list.reset();
        context.run(operations::search_sync_database(&self.query))
    }

    fn handle_filter_key(&mut self, key: KeyEvent, context: &Context) -> Option<Issued> {
        match key.code {
            KeyCode::Esc => {
                self.list.clear_filter();
                self.list.stop_filtering();
            }
            KeyCode::Enter => {
                self.query = self.list.filter_text().to_string();
                self.list.clear_filter();
                self.list.stop_filtering();
                return Some(Issued {
                    id: self.search(context),
                    description: "Search Packages",
                });
            }
            KeyCode::Char('/') => self.list.stop_filtering(),
            KeyCode::Backspace => {
                self.list.pop_filter();
            }
            KeyCode::Char(character) => self.list.push_filter(character),
            _ => {}
        }

        None
    }

    fn perform(
        &mut self,
        action: BrowseAction,
        context: &Context,
        router: &StreamRouter,
    ) -> Option<CommandId> {
        let selected = self.list.selected(router.state(Target::SearchResults).lines());

        match action {
            BrowseAction::ToggleHotkeys => {
                self.hotkeys.toggle();
                let height = self.list_height();
                self.list.scroll_into_view(height);
                None
            }
            BrowseAction::ToggleSearch => {
                if !self.is_viewing_details {
                    self.list.start_filtering();
                }
                None
            }
            BrowseAction::ViewDetails => match selected {
                Some(name) if !self.is_viewing_details => {
                    self.is_viewing_details = true;
                    Some(context.run(operations::sync_info(name)))
                }
                _ => None,
            },
            BrowseAction::CloseDetails => {
                self.is_viewing_details = false;
                None
            }
            BrowseAction::InstallSelected => {
                selected.map(|name| context.run(operations::install_selected(name)))
            }
        }
    }
}

impl Tab for BrowseTab {
    fn title(&self) -> &'static str {
        "Browse"
    }

    fn init(&mut self, context: &Context) {
        self.is_viewing_details = false;
        self.search(context);
    }

    fn handle_key(
        &mut self,
        key: KeyEvent,
        context: &Context,
        router: &StreamRouter,
    ) -> Option<Issued> {
        if self.list.is_filtering() {
            return self.handle_filter_key(key, context);
        }

        let visible_count = self
            .list
            .visible(router.state(Target::SearchResults).lines())
            .len();
        let height = self.list_height();

        match key.code {
            KeyCode::Up | KeyCode::Char('k') if !self.is_viewing_details => {
                self.list.move_cursor(CycleDirection::Up, visible_count, height);
            }
            KeyCode::Down | KeyCode::Char('j') if !self.is_viewing_details => {
                self.list.move_cursor(CycleDirection::Down, visible_count, height);
            }
            code => {
                let hotkey = self.hotkeys.lookup(code)?;
                return self
                    .perform(hotkey.action, context, router)
                    .map(|id| Issued {
                        id,
                        description: hotkey.description,
                    });
            }
        }

        None
    }

    fn on_finished(&mut self, target: Target, _context: &Context, router: &StreamRouter) {
        if target == Target::SearchResults {
            let visible_count = self
                .list
                .visible(router.state(Target::SearchResults).lines())
                .len();
            let height = self.list_height();
            self.list.clamp(visible_count, height);
        }
    }

    fn resize(&mut self, content_height: usize) {
        self.content_height = content_height;
        let height = self.list_height();
        self.list.scroll_into_view(height);
    }
}
