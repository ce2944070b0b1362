//! Domain-level keyboard actions independent of key bindings.

/// Domain-level actions that can be mapped to configurable key bindings.
///
/// These represent user intent, not specific keys. The mapping from
/// `crossterm::event::KeyEvent` to `KeyAction` is handled by `KeyBindings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application. Default: q / Ctrl+C
    Quit,

    // Panning
    /// Pan the chain view towards older slots. Default: h / ←
    PanLeft,
    /// Pan the chain view towards newer slots. Default: l / →
    PanRight,
    /// Pan the chain view up. Default: k / ↑
    PanUp,
    /// Pan the chain view down. Default: j / ↓
    PanDown,

    /// Drop any manual pan and keep the head centred. Default: f / End
    FollowHead,
    /// Show or hide the validator grid and vote edges. Default: v
    ToggleValidators,
}

impl KeyAction {
    /// Every action, in config-name order.
    pub const ALL: [KeyAction; 7] = [
        KeyAction::Quit,
        KeyAction::PanLeft,
        KeyAction::PanRight,
        KeyAction::PanUp,
        KeyAction::PanDown,
        KeyAction::FollowHead,
        KeyAction::ToggleValidators,
    ];

    /// Name used for this action in the `[keybindings]` config table.
    pub fn name(self) -> &'static str {
        match self {
            KeyAction::Quit => "quit",
            KeyAction::PanLeft => "pan_left",
            KeyAction::PanRight => "pan_right",
            KeyAction::PanUp => "pan_up",
            KeyAction::PanDown => "pan_down",
            KeyAction::FollowHead => "follow_head",
            KeyAction::ToggleValidators => "toggle_validators",
        }
    }

    /// Inverse of [`KeyAction::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.name() == name)
    }

    /// Whether this action moves the viewport.
    pub fn is_pan(self) -> bool {
        matches!(
            self,
            KeyAction::PanLeft | KeyAction::PanRight | KeyAction::PanUp | KeyAction::PanDown
        )
    }
}
