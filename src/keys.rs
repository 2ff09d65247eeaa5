// Copyright (C) 2025  Tom Waddington
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Key-name parsing and the key-simulation capability
//!
//! Wraps rdev key injection behind a trait so the press action can be
//! driven by a mock in tests.

use std::thread;
use std::time::Duration;

use rdev::{EventType, Key, SimulateError};
use thiserror::Error;

/// Delay between injected events, useful for macOS.
const DELAY_BETWEEN_SEND: Duration = Duration::from_millis(2);

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("unrecognized key name: {0}")]
    UnknownKey(String),
    #[error("could not simulate key event")]
    Simulate(#[from] SimulateError),
}

/// Host capability for one press-and-release of a named key.
///
/// Failure must be signalled per call so the press action can isolate
/// individual bad keys.
pub trait Keyboard: Send + Sync {
    fn press_and_release(&self, key: &str) -> Result<(), KeyError>;
}

/// rdev-backed key injection.
pub struct RdevKeyboard;

impl Keyboard for RdevKeyboard {
    fn press_and_release(&self, name: &str) -> Result<(), KeyError> {
        let key = parse_key(name).ok_or_else(|| KeyError::UnknownKey(name.to_string()))?;
        send(EventType::KeyPress(key))?;
        send(EventType::KeyRelease(key))?;
        Ok(())
    }
}

fn send(event_type: EventType) -> Result<(), SimulateError> {
    rdev::simulate(&event_type)?;
    // Let the OS catchup.
    thread::sleep(DELAY_BETWEEN_SEND);
    Ok(())
}

/// Map a symbolic key name ("l", "f1", "space", ...) to an rdev key.
/// Case-insensitive; returns `None` for names we do not recognize.
pub fn parse_key(name: &str) -> Option<Key> {
    let key = match name.trim().to_ascii_lowercase().as_str() {
        "a" => Key::KeyA,
        "b" => Key::KeyB,
        "c" => Key::KeyC,
        "d" => Key::KeyD,
        "e" => Key::KeyE,
        "f" => Key::KeyF,
        "g" => Key::KeyG,
        "h" => Key::KeyH,
        "i" => Key::KeyI,
        "j" => Key::KeyJ,
        "k" => Key::KeyK,
        "l" => Key::KeyL,
        "m" => Key::KeyM,
        "n" => Key::KeyN,
        "o" => Key::KeyO,
        "p" => Key::KeyP,
        "q" => Key::KeyQ,
        "r" => Key::KeyR,
        "s" => Key::KeyS,
        "t" => Key::KeyT,
        "u" => Key::KeyU,
        "v" => Key::KeyV,
        "w" => Key::KeyW,
        "x" => Key::KeyX,
        "y" => Key::KeyY,
        "z" => Key::KeyZ,
        "0" => Key::Num0,
        "1" => Key::Num1,
        "2" => Key::Num2,
        "3" => Key::Num3,
        "4" => Key::Num4,
        "5" => Key::Num5,
        "6" => Key::Num6,
        "7" => Key::Num7,
        "8" => Key::Num8,
        "9" => Key::Num9,
        "f1" => Key::F1,
        "f2" => Key::F2,
        "f3" => Key::F3,
        "f4" => Key::F4,
        "f5" => Key::F5,
        "f6" => Key::F6,
        "f7" => Key::F7,
        "f8" => Key::F8,
        "f9" => Key::F9,
        "f10" => Key::F10,
        "f11" => Key::F11,
        "f12" => Key::F12,
        "space" => Key::Space,
        "enter" | "return" => Key::Return,
        "tab" => Key::Tab,
        "esc" | "escape" => Key::Escape,
        "shift" => Key::ShiftLeft,
        "ctrl" => Key::ControlLeft,
        "alt" => Key::Alt,
        "up" => Key::UpArrow,
        "down" => Key::DownArrow,
        "left" => Key::LeftArrow,
        "right" => Key::RightArrow,
        "home" => Key::Home,
        "end" => Key::End,
        "pageup" => Key::PageUp,
        "pagedown" => Key::PageDown,
        "insert" => Key::Insert,
        "delete" => Key::Delete,
        "backspace" => Key::Backspace,
        "capslock" => Key::CapsLock,
        _ => return None,
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_letters_and_digits() {
        assert_eq!(parse_key("l"), Some(Key::KeyL));
        assert_eq!(parse_key("T"), Some(Key::KeyT));
        assert_eq!(parse_key("0"), Some(Key::Num0));
        assert_eq!(parse_key("9"), Some(Key::Num9));
    }

    #[test]
    fn test_parse_function_keys() {
        assert_eq!(parse_key("f1"), Some(Key::F1));
        assert_eq!(parse_key("F12"), Some(Key::F12));
    }

    #[test]
    fn test_parse_named_keys() {
        assert_eq!(parse_key("space"), Some(Key::Space));
        assert_eq!(parse_key("enter"), Some(Key::Return));
        assert_eq!(parse_key("return"), Some(Key::Return));
        assert_eq!(parse_key("esc"), Some(Key::Escape));
        assert_eq!(parse_key("pagedown"), Some(Key::PageDown));
    }

    #[test]
    fn test_parse_trims_and_ignores_case() {
        assert_eq!(parse_key(" F1 "), Some(Key::F1));
        assert_eq!(parse_key("SPACE"), Some(Key::Space));
    }

    #[test]
    fn test_parse_unknown_key() {
        assert_eq!(parse_key("f13"), None);
        assert_eq!(parse_key("meta+x"), None);
        assert_eq!(parse_key(""), None);
    }
}
