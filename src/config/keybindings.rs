//! Keyboard bindings configuration.

use crate::model::key_action::KeyAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Maps keyboard events to domain actions.
///
/// Provides default vim-style bindings plus arrow keys.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, KeyAction>,
}

impl KeyBindings {
    /// Look up the action for a key event.
    ///
    /// Only the key code and modifiers are matched; event kind and state are ignored.
    pub fn get(&self, key: KeyEvent) -> Option<KeyAction> {
        self.bindings
            .get(&KeyEvent::new(key.code, key.modifiers))
            .copied()
    }

    /// Add the bindings from a `[keybindings]` table of action name to key spec.
    ///
    /// A spec is a key name with optional `ctrl+`, `alt+` or `shift+` prefixes, e.g.
    /// `"x"`, `"ctrl+x"`, `"left"`, `"space"`. A configured key replaces whatever it
    /// was bound to before; the defaults for other keys stay. Unknown actions and
    /// unparsable keys are logged and skipped.
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, String>) -> Self {
        for (name, spec) in overrides {
            let Some(action) = KeyAction::from_name(name) else {
                warn!(action = %name, "Ignoring binding for unknown action");
                continue;
            };
            let Some(key) = parse_key_spec(spec) else {
                warn!(action = %name, key = %spec, "Ignoring unparsable key");
                continue;
            };
            self.bindings.insert(key, action);
        }
        self
    }
}

fn parse_key_spec(spec: &str) -> Option<KeyEvent> {
    let spec = spec.trim();
    if spec.is_empty() {
        return None;
    }
    let mut modifiers = KeyModifiers::NONE;
    let mut rest = spec;
    while let Some((prefix, tail)) = rest.split_once('+').filter(|(_, tail)| !tail.is_empty()) {
        modifiers |= match prefix.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => KeyModifiers::CONTROL,
            "alt" => KeyModifiers::ALT,
            "shift" => KeyModifiers::SHIFT,
            _ => return None,
        };
        rest = tail;
    }

    let code = match rest.to_ascii_lowercase().as_str() {
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "enter" => KeyCode::Enter,
        "esc" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "space" => KeyCode::Char(' '),
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };
    Some(KeyEvent::new(code, modifiers))
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = HashMap::new();
        let mut bind = |code: KeyCode, modifiers: KeyModifiers, action: KeyAction| {
            bindings.insert(KeyEvent::new(code, modifiers), action);
        };

        // Vim-style panning
        bind(KeyCode::Char('h'), KeyModifiers::NONE, KeyAction::PanLeft);
        bind(KeyCode::Char('l'), KeyModifiers::NONE, KeyAction::PanRight);
        bind(KeyCode::Char('k'), KeyModifiers::NONE, KeyAction::PanUp);
        bind(KeyCode::Char('j'), KeyModifiers::NONE, KeyAction::PanDown);

        // Arrow key panning
        bind(KeyCode::Left, KeyModifiers::NONE, KeyAction::PanLeft);
        bind(KeyCode::Right, KeyModifiers::NONE, KeyAction::PanRight);
        bind(KeyCode::Up, KeyModifiers::NONE, KeyAction::PanUp);
        bind(KeyCode::Down, KeyModifiers::NONE, KeyAction::PanDown);

        // View
        bind(KeyCode::Char('f'), KeyModifiers::NONE, KeyAction::FollowHead);
        bind(KeyCode::End, KeyModifiers::NONE, KeyAction::FollowHead);
        bind(
            KeyCode::Char('v'),
            KeyModifiers::NONE,
            KeyAction::ToggleValidators,
        );

        // Application controls
        bind(KeyCode::Char('q'), KeyModifiers::NONE, KeyAction::Quit);
        bind(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyAction::Quit);

        Self { bindings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    #[test]
    fn default_bindings_map_hjkl_and_arrows_to_pans() {
        let bindings = KeyBindings::default();
        for (code, action) in [
            (KeyCode::Char('h'), KeyAction::PanLeft),
            (KeyCode::Left, KeyAction::PanLeft),
            (KeyCode::Char('j'), KeyAction::PanDown),
            (KeyCode::Down, KeyAction::PanDown),
        ] {
            assert_eq!(
                bindings.get(KeyEvent::new(code, KeyModifiers::NONE)),
                Some(action)
            );
        }
    }

    #[test]
    fn ctrl_c_quits() {
        let bindings = KeyBindings::default();
        let key_event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(bindings.get(key_event), Some(KeyAction::Quit));
    }

    #[test]
    fn lookup_ignores_event_kind_and_state() {
        let bindings = KeyBindings::default();
        let key_event = KeyEvent::new_with_kind_and_state(
            KeyCode::Char('v'),
            KeyModifiers::NONE,
            KeyEventKind::Repeat,
            KeyEventState::CAPS_LOCK,
        );
        assert_eq!(bindings.get(key_event), Some(KeyAction::ToggleValidators));
    }

    fn overrides(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(action, key)| (action.to_string(), key.to_string()))
            .collect()
    }

    #[test]
    fn configured_keys_are_added_on_top_of_defaults() {
        let bindings = KeyBindings::default()
            .with_overrides(&overrides(&[("quit", "x"), ("follow_head", "ctrl+space")]));

        assert_eq!(
            bindings.get(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)),
            Some(KeyAction::Quit)
        );
        assert_eq!(
            bindings.get(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::CONTROL)),
            Some(KeyAction::FollowHead)
        );
        assert_eq!(
            bindings.get(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(KeyAction::Quit)
        );
    }

    #[test]
    fn configured_key_replaces_its_default_action() {
        let bindings = KeyBindings::default().with_overrides(&overrides(&[("pan_right", "h")]));
        assert_eq!(
            bindings.get(KeyEvent::new(KeyCode::Char('h'), KeyModifiers::NONE)),
            Some(KeyAction::PanRight)
        );
    }

    #[test]
    fn bad_entries_are_skipped() {
        let bindings = KeyBindings::default().with_overrides(&overrides(&[
            ("zoom", "z"),
            ("quit", "hyper+x"),
            ("pan_up", "f13x"),
        ]));
        assert_eq!(
            bindings.get(KeyEvent::new(KeyCode::Char('z'), KeyModifiers::NONE)),
            None
        );
        assert_eq!(
            bindings.get(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)),
            None
        );
    }

    #[test]
    fn key_specs_parse() {
        assert_eq!(
            parse_key_spec("Left"),
            Some(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE))
        );
        assert_eq!(
            parse_key_spec("alt+shift+k"),
            Some(KeyEvent::new(
                KeyCode::Char('k'),
                KeyModifiers::ALT | KeyModifiers::SHIFT
            ))
        );
        assert_eq!(
            parse_key_spec("+"),
            Some(KeyEvent::new(KeyCode::Char('+'), KeyModifiers::NONE))
        );
        assert_eq!(parse_key_spec(""), None);
    }

    #[test]
    fn unbound_key_has_no_action() {
        let bindings = KeyBindings::default();
        let key_event = KeyEvent::new(KeyCode::Char('z'), KeyModifiers::NONE);
        assert_eq!(bindings.get(key_event), None);
    }
}
