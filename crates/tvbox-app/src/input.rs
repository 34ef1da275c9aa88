//! Stdin line parsing.
//!
//! Each line is one of: a key name (`ArrowDown`, `Enter`, or a short alias
//! like `down`), `click <section> <tile>`, `quit`, or a `:`-prefixed admin
//! console command.

use tvbox_core::input::{InputEvent, Key};

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Event(InputEvent),
    /// Admin console command, without the leading `:`.
    Command(String),
    Empty,
    Invalid(String),
}

/// Short names accepted alongside the DOM key names.
fn alias(word: &str) -> Option<Key> {
    let key = match word.to_ascii_lowercase().as_str() {
        "left" | "h" => Key::ArrowLeft,
        "right" | "l" => Key::ArrowRight,
        "up" | "k" => Key::ArrowUp,
        "down" | "j" => Key::ArrowDown,
        "enter" | "ok" => Key::Enter,
        "esc" | "back" => Key::Escape,
        _ => return None,
    };
    Some(key)
}

pub fn parse_line(line: &str) -> Line {
    let line = line.trim();
    if line.is_empty() {
        return Line::Empty;
    }
    if let Some(command) = line.strip_prefix(':') {
        return Line::Command(command.trim().to_string());
    }

    let mut words = line.split_whitespace();
    let first = words.next().unwrap_or_default();
    let rest: Vec<&str> = words.collect();
    match first {
        "quit" | "exit" => Line::Event(InputEvent::Quit),
        "click" => {
            match rest.as_slice() {
                [section, tile] => match (section.parse::<usize>(), tile.parse::<usize>()) {
                    (Ok(section), Ok(tile)) => Line::Event(InputEvent::Click { section, tile }),
                    _ => Line::Invalid(format!("bad click coordinates: {line}")),
                },
                [section] => match section.parse::<usize>() {
                    Ok(section) => Line::Event(InputEvent::Click { section, tile: 0 }),
                    Err(_) => Line::Invalid(format!("bad click coordinates: {line}")),
                },
                _ => Line::Invalid("usage: click <section> [tile]".to_string()),
            }
        },
        _ if !rest.is_empty() => Line::Invalid(format!("unrecognised input: {line}")),
        name => {
            let key = alias(name).unwrap_or_else(|| Key::from_name(name));
            Line::Event(InputEvent::KeyDown(key))
        },
    }
}
