use crate::config::{DisplayConfig, EventDisplay};
use crate::grid::DayCell;
use crate::model::Task;
use crate::style::{center, pad_right, visible_width, Ink, Painter};

pub const PIN: &str = "📌 ";
pub const OVERFLOW_MARKER: &str = "(...)";
const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Blank,
    Badge(usize),
    Event(String),
    Overflow,
}

/// Lays out the inside of day cells. Borders belong to the calendar;
/// every line produced here is exactly `width - 1` visible columns.
#[derive(Debug, Clone, Copy)]
pub struct CellRenderer {
    width: usize,
    height: usize,
    mode: EventDisplay,
    painter: Painter,
    text: Ink,
    events: Ink,
}

impl CellRenderer {
    pub fn new(config: &DisplayConfig, painter: Painter) -> Self {
        CellRenderer {
            width: config.cell_width(),
            height: config.cell_height(),
            mode: config.event_display(),
            painter,
            text: config.text_ink(),
            events: config.events_ink(),
        }
    }

    pub fn inner_width(&self) -> usize {
        self.width.saturating_sub(1)
    }

    pub fn content_rows(&self) -> usize {
        self.height.saturating_sub(3)
    }

    pub fn day_line(&self, cell: Option<&DayCell<'_>>) -> String {
        match cell {
            Some(cell) => {
                let number = format!(" {:>2}", cell.day);
                self.fill(&number, self.text)
            }
            None => " ".repeat(self.inner_width()),
        }
    }

    pub fn content_line(&self, cell: Option<&DayCell<'_>>, row: usize) -> String {
        let events: &[&Task] = cell.map(|c| c.events.as_slice()).unwrap_or(&[]);
        match self.slot(events, row) {
            Slot::Blank => " ".repeat(self.inner_width()),
            Slot::Badge(count) => {
                let badge = self.badge(count);
                self.fill(&badge, self.events)
            }
            Slot::Event(text) => self.fill(&text, self.events),
            Slot::Overflow => {
                let marker = center(OVERFLOW_MARKER, self.inner_width());
                self.painter.paint(&marker, self.events)
            }
        }
    }

    pub fn slot(&self, events: &[&Task], row: usize) -> Slot {
        let available = self.content_rows();
        if row == 0 || row > available || events.is_empty() {
            return Slot::Blank;
        }
        match self.mode {
            EventDisplay::Summary if row == 1 => Slot::Badge(events.len()),
            EventDisplay::Summary => Slot::Blank,
            EventDisplay::Listing => {
                if events.len() > available && row == available {
                    Slot::Overflow
                } else if row <= events.len() {
                    let line = format!("{PIN}{}", events[row - 1].description);
                    Slot::Event(self.truncate(&line))
                } else {
                    Slot::Blank
                }
            }
        }
    }

    pub fn badge(&self, count: usize) -> String {
        let limit = self.width.saturating_sub(2);
        let labels = [
            format!("{PIN}Events: {count}"),
            format!("{PIN}Ev: {count}"),
            format!("{PIN}{count}"),
        ];
        let short = labels[2].clone();
        labels
            .into_iter()
            .find(|label| visible_width(label) <= limit)
            .unwrap_or(short)
    }

    /// Keeps text within `width - 2` columns, cutting to `width - 5`
    /// and appending an ellipsis when it does not fit.
    pub fn truncate(&self, text: &str) -> String {
        let limit = self.width.saturating_sub(2);
        if visible_width(text) <= limit {
            return text.to_string();
        }
        let keep = self.width.saturating_sub(5);
        let mut cut: String = text.chars().take(keep).collect();
        cut.push_str(ELLIPSIS);
        cut
    }

    fn fill(&self, text: &str, ink: Ink) -> String {
        let fill = self.inner_width().saturating_sub(visible_width(text));
        format!("{}{}", self.painter.paint(text, ink), " ".repeat(fill))
    }
}

pub fn header_label(label: &str, width: usize) -> String {
    pad_right(label, width.saturating_sub(1))
}
