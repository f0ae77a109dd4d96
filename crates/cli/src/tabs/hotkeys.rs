//! Hotkey tables.

use crossterm::event::KeyCode;
use indexmap::IndexMap;
use itertools::Itertools;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hotkey<A> {
    pub code: KeyCode,
    /// How the key is shown in the hotkey panel
    pub label: &'static str,
    pub description: &'static str,
    pub action: A,
}

impl<A> Hotkey<A> {
    pub const fn new(code: KeyCode, label: &'static str, description: &'static str, action: A) -> Self {
        Self {
            code,
            label,
            description,
            action,
        }
    }
}

/// The hotkeys of a tab, ordered by description, plus whether the panel
/// listing them is shown.
#[derive(Debug)]
pub struct Hotkeys<A> {
    bindings: IndexMap<KeyCode, Hotkey<A>>,
    is_visible: bool,
}

impl<A: Copy> Hotkeys<A> {
    pub fn new(bindings: impl IntoIterator<Item = Hotkey<A>>) -> Self {
        let bindings = bindings
            .into_iter()
            .sorted_by_key(|hotkey| hotkey.description)
            .map(|hotkey| (hotkey.code, hotkey))
            .collect();

        Self {
            bindings,
            is_visible: false,
        }
    }

    #[must_use]
    pub fn lookup(&self, code: KeyCode) -> Option<Hotkey<A>> {
        self.bindings.get(&code).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hotkey<A>> {
        self.bindings.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn toggle(&mut self) {
        self.is_visible = !self.is_visible;
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    /// Rows taken by the panel, separator included.
    #[must_use]
    pub fn panel_height(&self) -> usize {
        if self.is_visible {
            self.len() + 1
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hotkeys() -> Hotkeys<u8> {
        Hotkeys::new([
            Hotkey::new(KeyCode::Char('U'), "U", "Upgrade Selected", 1),
            Hotkey::new(KeyCode::Char('/'), "/", "Toggle Search", 2),
            Hotkey::new(KeyCode::Char('A'), "A", "Upgrade All", 3),
            Hotkey::new(KeyCode::Enter, "Enter", "Install Selected", 4),
        ])
    }

    #[test]
    fn test_sorted_by_description() {
        let descriptions: Vec<&str> = hotkeys().iter().map(|hotkey| hotkey.description).collect();
        assert_eq!(
            descriptions,
            vec!["Install Selected", "Toggle Search", "Upgrade All", "Upgrade Selected"]
        );
    }

    #[test]
    fn test_lookup() {
        let hotkeys = hotkeys();
        assert_eq!(hotkeys.lookup(KeyCode::Char('A')).map(|hotkey| hotkey.action), Some(3));
        assert_eq!(hotkeys.lookup(KeyCode::Enter).map(|hotkey| hotkey.action), Some(4));
        assert!(hotkeys.lookup(KeyCode::Char('a')).is_none());
    }

    #[test]
    fn test_panel_height_follows_visibility() {
        let mut hotkeys = hotkeys();
        assert!(!hotkeys.is_visible());
        assert_eq!(hotkeys.panel_height(), 0);

        hotkeys.toggle();
        assert!(hotkeys.is_visible());
        assert_eq!(hotkeys.panel_height(), 5);
    }
}
