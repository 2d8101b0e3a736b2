//! Platform-specific key bindings

use crossterm::event::{KeyEvent, KeyModifiers};

/// Platform-appropriate modifier for form shortcuts
/// - macOS: SUPER (Cmd key), Ctrl is accepted as well
/// - Linux/Windows: CONTROL (Ctrl key)
#[cfg(target_os = "macos")]
pub const ACTION_MODIFIER: KeyModifiers = KeyModifiers::SUPER;

#[cfg(not(target_os = "macos"))]
pub const ACTION_MODIFIER: KeyModifiers = KeyModifiers::CONTROL;

#[cfg(target_os = "macos")]
pub const SUBMIT_SHORTCUT: &str = "Cmd+S";

#[cfg(not(target_os = "macos"))]
pub const SUBMIT_SHORTCUT: &str = "Ctrl+S";

#[cfg(target_os = "macos")]
pub const NEXT_SHORTCUT: &str = "Cmd+N";

#[cfg(not(target_os = "macos"))]
pub const NEXT_SHORTCUT: &str = "Ctrl+N";

#[cfg(target_os = "macos")]
pub const BACK_SHORTCUT: &str = "Cmd+B";

#[cfg(not(target_os = "macos"))]
pub const BACK_SHORTCUT: &str = "Ctrl+B";

#[cfg(target_os = "macos")]
pub const REFRESH_SHORTCUT: &str = "Cmd+R";

#[cfg(not(target_os = "macos"))]
pub const REFRESH_SHORTCUT: &str = "Ctrl+R";

/// True for `<modifier>+<c>` with the platform action modifier or Ctrl
pub fn is_shortcut(key: &KeyEvent, c: char) -> bool {
    let modified = key.modifiers.contains(ACTION_MODIFIER)
        || key.modifiers.contains(KeyModifiers::CONTROL);
    modified && matches!(key.code, crossterm::event::KeyCode::Char(k) if k.eq_ignore_ascii_case(&c))
}
