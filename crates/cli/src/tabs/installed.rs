//! The Installed tab: installed packages on the left, details on the right.

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
pub enum InstalledAction {
    ToggleSearch,
    UpgradeAll,
    RemoveSelected,
    ToggleExplicit,
    ToggleHotkeys,
    UpgradeSelected,
}

#[derive(Debug)]
pub struct InstalledTab {
    list: ListView,
    hotkeys: Hotkeys<InstalledAction>,
    is_explicit_only: bool,
    content_height: usize,
}

impl Default for InstalledTab {
    fn default() -> Self {
        Self::new()
    }
}

impl InstalledTab {
    #[must_use]
    pub fn new() -> Self {
        use InstalledAction::*;

        Self {
            list: ListView::default(),
            hotkeys: Hotkeys::new([
                Hotkey::new(KeyCode::Char('/'), "/", "Toggle Search", ToggleSearch),
                Hotkey::new(KeyCode::Char('A'), "A", "Upgrade All", UpgradeAll),
                Hotkey::new(KeyCode::Char('R'), "R", "Remove Selected", RemoveSelected),
                Hotkey::new(KeyCode::Char('E'), "E", "Toggle Explicit", ToggleExplicit),
                Hotkey::new(KeyCode::Char('H'), "H", "Toggle Hotkeys", ToggleHotkeys),
                Hotkey::new(KeyCode::Char('U'), "U", "Upgrade Selected", UpgradeSelected),
            ]),
            is_explicit_only: false,
            content_height: 0,
        }
    }

    #[must_use]
    pub fn list(&self) -> &ListView {
        &self.list
    }

    #[must_use]
    pub fn hotkeys(&self) -> &Hotkeys<InstalledAction> {
        &self.hotkeys
    }

    #[must_use]
    pub fn is_explicit_only(&self) -> bool {
        self.is_explicit_only
    }

    /// Rows left for the package list once the hotkey panel is placed.
    #[must_use]
    pub fn list_height(&self) -> usize {
        self.content_height
            .saturating_sub(self.hotkeys.panel_height())
            .max(1)
    }

    /// Reloads the package list, unless the user is typing a filter.
    pub fn load_packages(&mut self, context: &Context) -> Option<CommandId> {
        if self.list.is_filtering() {
            return None;
        }

        Some(context.run(operations::list_installed(self.is_explicit_only)))
    }

    fn request_info(&self, context: &Context, router: &StreamRouter) {
        if let Some(name) = self.list.selected(router.state(Target::PackageList).lines()) {
            context.run(operations::installed_info(name));
        }
    }

    fn visible_count(&self, router: &StreamRouter) -> usize {
        self.list
            .visible(router.state(Target::PackageList).lines())
            .len()
    }

    fn step(&mut self, direction: CycleDirection, context: &Context, router: &StreamRouter) {
        let visible_count = self.visible_count(router);
        let height = self.list_height();

        if self.list.move_cursor(direction, visible_count, height) {
            self.request_info(context, router);
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent, context: &Context, router: &StreamRouter) {
        match key.code {
            KeyCode::Esc => {
                self.list.clear_filter();
                self.list.stop_filtering();
                self.request_info(context, router);
            }
            KeyCode::Enter | KeyCode::Char('/') => self.list.stop_filtering(),
            KeyCode::Backspace => {
                if self.list.pop_filter() {
                    self.request_info(context, router);
                }
            }
            KeyCode::Char(character) => {
                self.list.push_filter(character);
                self.request_info(context, router);
            }
            _ => {}
        }
    }

    fn perform(
        &mut self,
        action: InstalledAction,
        context: &Context,
        router: &StreamRouter,
    ) -> Option<CommandId> {
        let selected = self.list.selected(router.state(Target::PackageList).lines());

        match action {
            InstalledAction::ToggleSearch => {
                self.list.start_filtering();
                None
            }
            InstalledAction::ToggleHotkeys => {
                self.hotkeys.toggle();
                let height = self.list_height();
                self.list.scroll_into_view(height);
                None
            }
            InstalledAction::ToggleExplicit => {
                self.is_explicit_only = !self.is_explicit_only;
                self.list.reset();
                self.load_packages(context)
            }
            InstalledAction::UpgradeAll => Some(
                context.run(operations::upgrade_all().follow_up(context.refresh_installed())),
            ),
            InstalledAction::UpgradeSelected => {
                selected.map(|name| context.run(operations::upgrade_selected(name)))
            }
            InstalledAction::RemoveSelected => selected.map(|name| {
                context.run(operations::remove_selected(name).follow_up(context.refresh_installed()))
            }),
        }
    }
}

impl Tab for InstalledTab {
    fn title(&self) -> &'static str {
        "Installed"
    }

    fn init(&mut self, context: &Context) {
        self.load_packages(context);
    }

    fn handle_key(
        &mut self,
        key: KeyEvent,
        context: &Context,
        router: &StreamRouter,
    ) -> Option<Issued> {
        if self.list.is_filtering() {
            self.handle_filter_key(key, context, router);
            return None;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.step(CycleDirection::Up, context, router),
            KeyCode::Down | KeyCode::Char('j') => self.step(CycleDirection::Down, context, router),
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

    fn on_finished(&mut self, target: Target, context: &Context, router: &StreamRouter) {
        if target != Target::PackageList {
            return;
        }

        let visible_count = self.visible_count(router);
        let height = self.list_height();
        self.list.clamp(visible_count, height);

        if !self.list.is_filtering() {
            self.request_info(context, router);
        }
    }

    fn resize(&mut self, content_height: usize) {
        self.content_height = content_height;
        let height = self.list_height();
        self.list.scroll_into_view(height);
    }
}
