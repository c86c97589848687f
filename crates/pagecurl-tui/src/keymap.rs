use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyModifiers};
use pagecurl_core::config::KeymapConfig;
use tracing::warn;

use crate::input::Action;

/// Parsed key binding (key code + modifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn simple(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    pub fn shift(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::SHIFT)
    }
}

/// Runtime keymap for key-to-action lookup
pub struct Keymap {
    bindings: HashMap<KeyBinding, Action>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_config(&KeymapConfig::default())
    }
}

impl Keymap {
    /// Create a keymap from configuration
    pub fn from_config(config: &KeymapConfig) -> Self {
        let mut bindings = HashMap::new();

        let mut add_binding = |key_str: &str, action: Action| match parse_key_binding(key_str) {
            Some(binding) => {
                if let Some(existing) = bindings.get(&binding) {
                    warn!(
                        "Key conflict: '{}' already bound to {:?}, ignoring binding to {:?}",
                        key_str, existing, action
                    );
                } else {
                    bindings.insert(binding, action);
                }
            }
            None => warn!("Invalid key binding: '{}', ignoring", key_str),
        };

        add_binding(&config.quit, Action::Quit);
        add_binding(&config.next_page, Action::NextPage);
        add_binding(&config.prev_page, Action::PrevPage);
        add_binding(&config.toggle_status_bar, Action::ToggleStatusBar);
        add_binding(&config.reset, Action::Reset);

        // Ctrl+C always quits
        bindings.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        // Arrow keys turn pages unless rebound
        bindings.entry(KeyBinding::simple(KeyCode::Right)).or_insert(Action::NextPage);
        bindings.entry(KeyBinding::simple(KeyCode::Left)).or_insert(Action::PrevPage);

        Self { bindings }
    }

    /// Get action for a key binding
    pub fn get(&self, binding: &KeyBinding) -> Option<&Action> {
        self.bindings.get(binding)
    }
}

/// Named keys accepted inside `<...>`, matched case-insensitively
const NAMED_KEYS: &[(&[&str], KeyCode)] = &[
    (&["cr", "enter", "return"], KeyCode::Enter),
    (&["esc", "escape"], KeyCode::Esc),
    (&["tab"], KeyCode::Tab),
    (&["backtab"], KeyCode::BackTab),
    (&["space", "spc"], KeyCode::Char(' ')),
    (&["bs", "backspace"], KeyCode::Backspace),
    (&["left"], KeyCode::Left),
    (&["right"], KeyCode::Right),
    (&["up"], KeyCode::Up),
    (&["down"], KeyCode::Down),
    (&["home"], KeyCode::Home),
    (&["end"], KeyCode::End),
    (&["pageup", "pgup"], KeyCode::PageUp),
    (&["pagedown", "pgdn"], KeyCode::PageDown),
];

/// Parse Vim-style key notation: `l`, `L` (Shift), `<C-n>`, `<S-Tab>`,
/// `<Esc>`, `<Right>`, `<F5>`
pub fn parse_key_binding(s: &str) -> Option<KeyBinding> {
    let s = s.trim();

    match s.strip_prefix('<').and_then(|rest| rest.strip_suffix('>')) {
        Some(inner) if !inner.is_empty() => parse_bracketed(inner),
        _ => {
            let c = single_char(s)?;
            Some(if c.is_ascii_uppercase() {
                KeyBinding::shift(KeyCode::Char(c))
            } else {
                KeyBinding::simple(KeyCode::Char(c))
            })
        }
    }
}

fn parse_bracketed(inner: &str) -> Option<KeyBinding> {
    let (modifiers, name) = match inner.split_once('-') {
        Some(("C", name)) if !name.is_empty() => (KeyModifiers::CONTROL, name),
        Some(("S", name)) if !name.is_empty() => (KeyModifiers::SHIFT, name),
        _ => (KeyModifiers::NONE, inner),
    };
    key_code(name).map(|code| KeyBinding::new(code, modifiers))
}

fn key_code(name: &str) -> Option<KeyCode> {
    let lower = name.to_ascii_lowercase();
    if let Some((_, code)) = NAMED_KEYS.iter().find(|(names, _)| names.contains(&lower.as_str())) {
        return Some(*code);
    }
    if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        return (1..=12).contains(&n).then_some(KeyCode::F(n));
    }
    // Bare letter after a modifier, as in <C-n>
    single_char(&lower).map(KeyCode::Char)
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
