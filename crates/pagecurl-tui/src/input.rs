use crossterm::event::KeyEvent;

use crate::keymap::{KeyBinding, Keymap};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Flick the current page forward
    NextPage,
    /// Flick the current page backward
    PrevPage,
    ToggleStatusBar,
    /// Drop in-flight curls without committing
    Reset,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, keymap: &Keymap) -> Action {
    let binding = KeyBinding::new(key.code, key.modifiers);
    keymap.get(&binding).copied().unwrap_or(Action::None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn test_default_actions() {
        let keymap = Keymap::default();
        let key = |code, modifiers| handle_key_event(KeyEvent::new(code, modifiers), &keymap);

        assert_eq!(key(KeyCode::Char('l'), KeyModifiers::NONE), Action::NextPage);
        assert_eq!(key(KeyCode::Char('h'), KeyModifiers::NONE), Action::PrevPage);
        assert_eq!(key(KeyCode::Right, KeyModifiers::NONE), Action::NextPage);
        assert_eq!(key(KeyCode::Char('c'), KeyModifiers::CONTROL), Action::Quit);
        assert_eq!(key(KeyCode::Esc, KeyModifiers::NONE), Action::Reset);
        assert_eq!(key(KeyCode::Char('z'), KeyModifiers::NONE), Action::None);
    }
}
