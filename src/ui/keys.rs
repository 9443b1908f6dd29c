use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub fn matches_any(event: &KeyEvent, bindings: &[String]) -> bool {
    bindings.iter().any(|b| matches_single(event, b))
}

/// Like [`matches_any`] but ignores single-character bindings, so typing in
/// the search box never triggers an action.
pub fn matches_any_named(event: &KeyEvent, bindings: &[String]) -> bool {
    bindings
        .iter()
        .filter(|b| b.trim().chars().count() > 1)
        .any(|b| matches_single(event, b))
}

/// Check if the key event matches a single binding string
pub fn matches_single(event: &KeyEvent, binding: &str) -> bool {
    let trimmed = binding.trim();
    if trimmed.is_empty() {
        return false;
    }

    // Ctrl/Alt/Super chords are not bindable
    let disallowed = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER;
    if event.modifiers.intersects(disallowed) {
        return false;
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "enter" => matches!(event.code, KeyCode::Enter),
        "tab" => matches!(event.code, KeyCode::Tab),
        "backtab" | "shift+tab" => matches!(event.code, KeyCode::BackTab),
        "backspace" => matches!(event.code, KeyCode::Backspace),
        "esc" | "escape" => matches!(event.code, KeyCode::Esc),
        "space" => matches!(event.code, KeyCode::Char(' ')),
        "up" => matches!(event.code, KeyCode::Up),
        "down" => matches!(event.code, KeyCode::Down),
        "left" => matches!(event.code, KeyCode::Left),
        "right" => matches!(event.code, KeyCode::Right),
        "pageup" | "page_up" => matches!(event.code, KeyCode::PageUp),
        "pagedown" | "page_down" => matches!(event.code, KeyCode::PageDown),
        "home" => matches!(event.code, KeyCode::Home),
        "end" => matches!(event.code, KeyCode::End),
        name if function_key_number(name).is_some() => {
            function_key_number(name).map(KeyCode::F) == Some(event.code)
        }
        // Single character - case-sensitive (r != R, since R requires Shift)
        _ => {
            let mut chars = trimmed.chars();
            if let (Some(first), None) = (chars.next(), chars.next()) {
                matches!(event.code, KeyCode::Char(c) if c == first)
            } else {
                false
            }
        }
    }
}

/// "f1".."f12" to the function key number.
fn function_key_number(name: &str) -> Option<u8> {
    name.strip_prefix('f')
        .and_then(|n| n.parse::<u8>().ok())
        .filter(|n| (1..=12).contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_named_keys() {
        assert!(matches_single(&key(KeyCode::Esc), "Esc"));
        assert!(matches_single(&key(KeyCode::Esc), "escape"));
        assert!(matches_single(&key(KeyCode::BackTab), "BackTab"));
        assert!(matches_single(&key(KeyCode::F(5)), "F5"));
        assert!(!matches_single(&key(KeyCode::F(5)), "F13"));
        assert!(!matches_single(&key(KeyCode::Down), "Up"));
    }

    #[test]
    fn test_single_chars_are_case_sensitive() {
        assert!(matches_single(&key(KeyCode::Char('r')), "r"));
        assert!(!matches_single(&key(KeyCode::Char('R')), "r"));
    }

    #[test]
    fn test_control_chords_never_match() {
        let event = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(!matches_single(&event, "q"));
    }

    #[test]
    fn test_named_only_skips_characters() {
        let bindings = vec!["Down".to_string(), "j".to_string()];
        assert!(matches_any(&key(KeyCode::Char('j')), &bindings));
        assert!(!matches_any_named(&key(KeyCode::Char('j')), &bindings));
        assert!(matches_any_named(&key(KeyCode::Down), &bindings));
    }
}
