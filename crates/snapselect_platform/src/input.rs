//! Keyboard input types

// ============================================================================
// Keyboard Events
// ============================================================================

/// Keyboard event
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    /// The key that was pressed
    pub key: Key,
}

impl KeyboardEvent {
    pub fn pressed(key: Key) -> Self {
        Self { key }
    }
}

/// Key codes the widget distinguishes
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    Enter,
    Escape,
    Backspace,
    Tab,

    // Arrow keys
    Left,
    Right,
    Up,
    Down,

    // Character input (for text input)
    Char(char),

    // Unknown key
    Unknown,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` string to a key code
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            " " | "Spacebar" => Key::Space,
            "Enter" => Key::Enter,
            "Escape" | "Esc" => Key::Escape,
            "Backspace" => Key::Backspace,
            "Tab" => Key::Tab,
            "ArrowLeft" => Key::Left,
            "ArrowRight" => Key::Right,
            "ArrowUp" => Key::Up,
            "ArrowDown" => Key::Down,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Unknown,
                }
            }
        }
    }

    /// Enter or Space - the keys that activate a control
    pub fn is_activation(&self) -> bool {
        matches!(self, Key::Enter | Key::Space)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dom_key() {
        assert_eq!(Key::from_dom_key(" "), Key::Space);
        assert_eq!(Key::from_dom_key("Enter"), Key::Enter);
        assert_eq!(Key::from_dom_key("Escape"), Key::Escape);
        assert_eq!(Key::from_dom_key("ArrowDown"), Key::Down);
        assert_eq!(Key::from_dom_key("ArrowUp"), Key::Up);
        assert_eq!(Key::from_dom_key("a"), Key::Char('a'));
        assert_eq!(Key::from_dom_key("F13"), Key::Unknown);
    }

    #[test]
    fn test_activation_keys() {
        assert!(Key::Enter.is_activation());
        assert!(Key::Space.is_activation());
        assert!(!Key::Escape.is_activation());
        assert!(!Key::Char(' ').is_activation());
    }

    #[test]
    fn test_pressed_carries_key_only() {
        let event = KeyboardEvent::pressed(Key::Down);
        assert_eq!(event, KeyboardEvent { key: Key::Down });
    }
}
