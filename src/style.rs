use crate::config::ConfigError;
use crossterm::style::{style, Color, Stylize};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl NamedColor {
    pub const ALL: [NamedColor; 8] = [
        NamedColor::Black,
        NamedColor::Red,
        NamedColor::Green,
        NamedColor::Yellow,
        NamedColor::Blue,
        NamedColor::Magenta,
        NamedColor::Cyan,
        NamedColor::White,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            NamedColor::Black => "BLACK",
            NamedColor::Red => "RED",
            NamedColor::Green => "GREEN",
            NamedColor::Yellow => "YELLOW",
            NamedColor::Blue => "BLUE",
            NamedColor::Magenta => "MAGENTA",
            NamedColor::Cyan => "CYAN",
            NamedColor::White => "WHITE",
        }
    }

    fn terminal_color(&self) -> Color {
        match self {
            NamedColor::Black => Color::Black,
            NamedColor::Red => Color::DarkRed,
            NamedColor::Green => Color::DarkGreen,
            NamedColor::Yellow => Color::DarkYellow,
            NamedColor::Blue => Color::DarkBlue,
            NamedColor::Magenta => Color::DarkMagenta,
            NamedColor::Cyan => Color::DarkCyan,
            NamedColor::White => Color::Grey,
        }
    }
}

impl fmt::Display for NamedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NamedColor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        NamedColor::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::UnknownColor(wanted.to_string()))
    }
}

/// Foreground color plus weight for one kind of calendar text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ink {
    pub color: NamedColor,
    pub bold: bool,
}

impl Ink {
    pub fn new(color: NamedColor, bold: bool) -> Self {
        Ink { color, bold }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    pub fn new(enabled: bool) -> Self {
        Painter { enabled }
    }

    pub fn plain() -> Self {
        Painter { enabled: false }
    }

    pub fn paint(&self, text: &str, ink: Ink) -> String {
        if !self.enabled || text.is_empty() {
            return text.to_string();
        }
        let styled = style(text).with(ink.color.terminal_color());
        if ink.bold {
            styled.bold().to_string()
        } else {
            styled.to_string()
        }
    }
}

/// Columns a piece of unstyled text occupies in the grid. Every char is
/// one column, pin and border glyphs included.
pub fn visible_width(text: &str) -> usize {
    text.chars().count()
}

pub fn pad_right(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(visible_width(text));
    format!("{}{}", text, " ".repeat(fill))
}

pub fn center(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(visible_width(text));
    let left = fill / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(fill - left))
}

#[cfg(test)]
pub fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' && chars.peek() == Some(&'[') {
            chars.next();
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_color_names_ignoring_case() {
        assert_eq!("cyan".parse::<NamedColor>().ok(), Some(NamedColor::Cyan));
        assert_eq!(" WHITE ".parse::<NamedColor>().ok(), Some(NamedColor::White));
        assert!("purple".parse::<NamedColor>().is_err());
    }

    #[test]
    fn plain_painter_leaves_text_alone() {
        let ink = Ink::new(NamedColor::Red, true);
        assert_eq!(Painter::plain().paint("hello", ink), "hello");
    }

    #[test]
    fn enabled_painter_keeps_visible_text() {
        let ink = Ink::new(NamedColor::Green, true);
        let painted = Painter::new(true).paint("hello", ink);
        assert!(painted.contains("hello"));
        assert_eq!(strip_ansi(&painted), "hello");
    }

    #[test]
    fn padding_counts_glyphs_not_bytes() {
        let padded = pad_right("📌 a", 6);
        assert_eq!(visible_width(&padded), 6);
        assert_eq!(padded, "📌 a   ");
        assert_eq!(center("(...)", 9), "  (...)  ");
        assert_eq!(center("(...)", 10), "  (...)   ");
    }
}
