use crate::cell::{header_label, CellRenderer};
use crate::config::DisplayConfig;
use crate::dates::{month_from_name, month_name, normalize, DateError};
use crate::grid::{DayCell, MonthGrid, DAYS_PER_WEEK};
use crate::model::{Task, TaskIndex};
use crate::style::{visible_width, Painter};
use chrono::{Datelike, NaiveDate};
use crossterm::cursor::MoveUp;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Write};
use tracing::debug;

const WEEKDAYS: [&str; DAYS_PER_WEEK] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];
const BORDER: &str = "*";

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Date(#[from] DateError),
    #[error("writing calendar: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawState {
    FirstDisplay,
    Redrawing { last_height: usize },
}

/// Prints month calendars for one session. Navigable renders overwrite
/// the previous navigable render in place; name lookups always append.
#[derive(Debug, Clone)]
pub struct CalendarView {
    today: NaiveDate,
    painter: Painter,
    prompt_lines: usize,
    state: RedrawState,
}

impl CalendarView {
    pub fn new(today: NaiveDate, painter: Painter) -> Self {
        CalendarView {
            today,
            painter,
            prompt_lines: 0,
            state: RedrawState::FirstDisplay,
        }
    }

    pub fn with_prompt_lines(mut self, lines: usize) -> Self {
        self.prompt_lines = lines;
        self
    }

    pub fn state(&self) -> RedrawState {
        self.state
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn resolve(&self, month_number: i32) -> Result<(i32, u32), DateError> {
        normalize(month_number, self.today.year())
    }

    pub fn render_month<W: Write>(
        &mut self,
        out: &mut W,
        month_number: i32,
        in_place: bool,
        index: &TaskIndex,
        config: &DisplayConfig,
    ) -> Result<(i32, u32), RenderError> {
        let (year, month) = self.resolve(month_number)?;
        let lines = compose(&MonthGrid::build(year, month, index), config, self.painter);
        if in_place {
            if let RedrawState::Redrawing { last_height } = self.state {
                let up = last_height + self.prompt_lines;
                debug!(lines = up, "redrawing calendar in place");
                queue!(
                    out,
                    MoveUp(u16::try_from(up).unwrap_or(u16::MAX)),
                    Clear(ClearType::FromCursorDown)
                )?;
            }
            self.state = RedrawState::Redrawing {
                last_height: lines.len(),
            };
        }
        write_lines(out, &lines)?;
        Ok((year, month))
    }

    pub fn render_month_named<W: Write>(
        &self,
        out: &mut W,
        name: &str,
        index: &TaskIndex,
        config: &DisplayConfig,
    ) -> Result<(i32, u32), RenderError> {
        let month = month_from_name(name)?;
        let (year, month) = self.resolve(month as i32)?;
        let lines = compose(&MonthGrid::build(year, month, index), config, self.painter);
        write_lines(out, &lines)?;
        Ok((year, month))
    }

    pub fn tasks_for_day<'a>(
        &self,
        index: &'a TaskIndex,
        month_number: i32,
        day: u32,
    ) -> Result<(i32, u32, Vec<&'a Task>), DateError> {
        let (year, month) = self.resolve(month_number)?;
        Ok((year, month, index.tasks_for_day(year, month, day)))
    }
}

pub fn calendar_height(weeks: usize, cell_height: usize) -> usize {
    // banner, top border, weekday header, closing border
    4 + weeks * (cell_height - 1)
}

fn compose(grid: &MonthGrid<'_>, config: &DisplayConfig, painter: Painter) -> Vec<String> {
    let width = config.cell_width();
    let full_width = width * DAYS_PER_WEEK + 1;
    let border_ink = config.border_ink();
    let cells = CellRenderer::new(config, painter);
    let rule = painter.paint(&BORDER.repeat(full_width), border_ink);
    let edge = painter.paint(BORDER, border_ink);

    let mut lines = Vec::with_capacity(calendar_height(grid.weeks(), config.cell_height()));
    let title = format!("{} {}", month_name(grid.month()), grid.year());
    let indent = (width * DAYS_PER_WEEK).saturating_sub(visible_width(&title)) / 2;
    lines.push(format!(
        "{}{}",
        " ".repeat(indent),
        painter.paint(&title, config.text_ink())
    ));
    lines.push(rule.clone());

    let header: Vec<String> = WEEKDAYS
        .iter()
        .map(|d| painter.paint(&header_label(d, width), config.text_ink()))
        .collect();
    lines.push(format!(" {}", header.join(" ")));

    for week in 0..grid.weeks() {
        let days = grid.week(week);
        lines.push(rule.clone());
        lines.push(draw_row(&edge, days, |cell| cells.day_line(cell)));
        for row in 1..=cells.content_rows() {
            lines.push(draw_row(&edge, days, |cell| cells.content_line(cell, row)));
        }
    }
    lines.push(rule);
    lines
}

fn draw_row(
    edge: &str,
    week: &[Option<DayCell<'_>>],
    draw: impl Fn(Option<&DayCell<'_>>) -> String,
) -> String {
    let mut line = edge.to_string();
    for cell in week {
        line.push_str(&draw(cell.as_ref()));
        line.push_str(edge);
    }
    line
}

fn write_lines<W: Write>(out: &mut W, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    out.flush()
}
