#![allow(dead_code)]

use bracket_terminal::prelude::VirtualKeyCode;
use std::{fs, io, path::Path};

/// Replays a fixed sequence of key presses, one per call. Used for headless
/// runs and for driving the engine in tests.
pub struct ScriptedInput {
    keys: Vec<VirtualKeyCode>,
    cursor: usize,
}

impl ScriptedInput {
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(Self::from_script(&fs::read_to_string(path)?))
    }

    /// Parses each non-comment character as a key press. Whitespace is
    /// ignored so scripts can group turns visually.
    pub fn from_script(text: &str) -> Self {
        let mut keys = Vec::new();
        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            for ch in trimmed.chars() {
                if ch.is_whitespace() {
                    continue;
                }
                if let Some(key) = char_to_key(ch) {
                    keys.push(key);
                } else {
                    eprintln!("Warning: unknown key in script: {ch}");
                }
            }
        }
        Self { keys, cursor: 0 }
    }

    pub fn next_key(&mut self) -> Option<VirtualKeyCode> {
        if self.cursor < self.keys.len() {
            let key = self.keys[self.cursor];
            self.cursor += 1;
            Some(key)
        } else {
            None
        }
    }
}

fn char_to_key(c: char) -> Option<VirtualKeyCode> {
    match c {
        'w' | 'W' => Some(VirtualKeyCode::W),
        'a' | 'A' => Some(VirtualKeyCode::A),
        's' | 'S' => Some(VirtualKeyCode::S),
        'd' | 'D' => Some(VirtualKeyCode::D),
        'q' | 'Q' => Some(VirtualKeyCode::Q),
        'f' | 'F' => Some(VirtualKeyCode::F),
        'e' | 'E' => Some(VirtualKeyCode::E),
        'u' | 'U' => Some(VirtualKeyCode::U),
        'v' | 'V' => Some(VirtualKeyCode::V),
        'i' | 'I' => Some(VirtualKeyCode::I),
        '0' => Some(VirtualKeyCode::Key0),
        '1' => Some(VirtualKeyCode::Key1),
        '2' => Some(VirtualKeyCode::Key2),
        '3' => Some(VirtualKeyCode::Key3),
        '4' => Some(VirtualKeyCode::Key4),
        '5' => Some(VirtualKeyCode::Key5),
        '6' => Some(VirtualKeyCode::Key6),
        '7' => Some(VirtualKeyCode::Key7),
        '8' => Some(VirtualKeyCode::Key8),
        '9' => Some(VirtualKeyCode::Key9),
        _ => None,
    }
}
