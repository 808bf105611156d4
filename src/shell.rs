//! Interactive prompt with the short command set.

use crate::calendar::CalendarView;
use crate::cli::ConfigAction;
use crate::commands::{export_to_calendar, write_day, write_task_table, MonthArg, Workspace};
use crate::model::TaskId;
use crate::style::{NamedColor, Painter};
use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use std::io::{BufRead, Write};
use tracing::debug;

const BANNER: &str = "termcal (type 'h' for commands, 'exit' to quit)";
const PROMPT: &str = "> ";

const GENERAL_HELP: &[(&str, &str)] = &[
    ("nt <description> [deadline]", "Add a new task with optional deadline (YYYY-MM-DD [HH:MM])"),
    ("ls", "List all pending tasks"),
    ("lsa", "List all tasks including completed ones"),
    ("ft <id>", "Mark a task as completed"),
    ("dt <id>", "Delete a task"),
    ("ct", "Clear all tasks"),
    ("h", "Show this help message"),
    ("exit", "Exit the program"),
    ("c", "Display calendar for current month"),
    ("n", "Display calendar for next month"),
    ("p", "Display calendar for previous month"),
    ("dc <month name or number>", "Display calendar for specified month"),
    ("day <month> <day>", "List the tasks due on one day"),
];

const SETTINGS_HELP: &[(&str, &str)] = &[
    ("fetch", "Get your current configurations"),
    ("sh <cell height (5-10)>", "Set a new height for calendar cells"),
    ("sw <cell width (10-40)>", "Set a new width for calendar cells"),
    ("t", "Toggle whether your calendar app is opened upon adding a new task"),
    ("stc <color>", "Change the text color"),
    ("scc <color>", "Change the calendar border color"),
    ("sec <color>", "Change the color of events on the calendar"),
    ("stb", "Change whether the text appears bold"),
    ("scb", "Change whether the calendar borders appear bold"),
    ("sed", "Switch between event counts and event descriptions"),
    ("sort <ID|ASCENDING|DESCENDING>", "Configure how the events are sorted when listed"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Shell {
    ws: Workspace,
    view: CalendarView,
    painter: Painter,
    month_pointer: i32,
}

impl Shell {
    pub fn new(ws: Workspace, today: NaiveDate, painter: Painter) -> Self {
        Shell {
            ws,
            // the echoed command line sits between two in-place renders
            view: CalendarView::new(today, painter).with_prompt_lines(1),
            painter,
            month_pointer: today.month() as i32,
        }
    }

    pub fn month_pointer(&self) -> i32 {
        self.month_pointer
    }

    pub fn workspace(&self) -> &Workspace {
        &self.ws
    }

    /// Reads commands until `exit` or end of input. Command failures are
    /// reported and the loop keeps going.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        writeln!(out, "{}", BANNER)?;
        let mut lines = input.lines();
        loop {
            write!(out, "{}", PROMPT)?;
            out.flush()?;
            let Some(line) = lines.next() else {
                writeln!(out)?;
                break;
            };
            match self.execute(line?.trim(), out) {
                Ok(Flow::Exit) => break,
                Ok(Flow::Continue) => {}
                Err(err) => writeln!(out, "Error: {err:#}")?,
            }
        }
        Ok(())
    }

    pub fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };
        debug!(cmd, "shell command");
        match cmd {
            "" => {}
            "exit" => return Ok(Flow::Exit),
            "nt" => self.new_task(rest, out)?,
            "ls" => write_task_table(out, self.ws.index.tasks(), false)?,
            "lsa" => write_task_table(out, self.ws.index.tasks(), true)?,
            "ft" => {
                let id = parse_id(rest)?;
                self.ws.complete(id)?;
                writeln!(out, "Task {} marked as completed.", id)?;
            }
            "dt" => {
                let id = parse_id(rest)?;
                self.ws.delete(id)?;
                writeln!(out, "Task {} deleted.", id)?;
            }
            "ct" => {
                writeln!(out, "Clearing all tasks...")?;
                self.ws.clear()?;
            }
            "h" => self.help(out)?,
            "c" => self.navigate(self.view.today().month() as i32, out)?,
            "n" => self.navigate(self.month_pointer + 1, out)?,
            "p" => self.navigate(self.month_pointer - 1, out)?,
            "dc" => self.display(rest, out)?,
            "day" => {
                let (month, day) = parse_day(rest)?;
                write_day(out, &self.ws, &self.view, month, day)?;
            }
            "fetch" => self.configure(ConfigAction::Show, out)?,
            "sw" => {
                let value = rest.parse().context("Please enter a number")?;
                self.configure(ConfigAction::Width { value }, out)?;
            }
            "sh" => {
                let value = rest.parse().context("Please enter a number")?;
                self.configure(ConfigAction::Height { value }, out)?;
            }
            "t" => self.configure(ConfigAction::Ics, out)?,
            "stc" => {
                let color = color_arg(cmd, rest)?;
                self.configure(ConfigAction::TextColor { color }, out)?;
            }
            "scc" => {
                let color = color_arg(cmd, rest)?;
                self.configure(ConfigAction::BorderColor { color }, out)?;
            }
            "sec" => {
                let color = color_arg(cmd, rest)?;
                self.configure(ConfigAction::EventsColor { color }, out)?;
            }
            "stb" => self.configure(ConfigAction::TextBold, out)?,
            "scb" => self.configure(ConfigAction::BorderBold, out)?,
            "sed" => self.configure(ConfigAction::EventDisplay, out)?,
            "sort" => {
                if rest.is_empty() {
                    bail!("usage: sort <ID|ASCENDING|DESCENDING>");
                }
                let method = rest.to_string();
                self.configure(ConfigAction::Sort { method }, out)?;
            }
            other => writeln!(
                out,
                "Unknown command '{}'. Type 'h' for available commands.",
                other
            )?,
        }
        Ok(Flow::Continue)
    }

    fn new_task<W: Write>(&mut self, rest: &str, out: &mut W) -> Result<()> {
        let (description, deadline) = split_trailing_deadline(rest);
        let task = self
            .ws
            .add(description, deadline, Local::now().naive_local())?;
        writeln!(out, "Task added with ID {}", task.id)?;
        export_to_calendar(&self.ws, &task, deadline.is_some())
    }

    /// The pointer only moves once the target month rendered.
    fn navigate<W: Write>(&mut self, target: i32, out: &mut W) -> Result<()> {
        self.view
            .render_month(out, target, true, &self.ws.index, &self.ws.config)?;
        self.month_pointer = target;
        Ok(())
    }

    fn display<W: Write>(&mut self, rest: &str, out: &mut W) -> Result<()> {
        if rest.is_empty() {
            bail!("usage: dc <month name or number>");
        }
        match MonthArg::parse(rest) {
            MonthArg::Number(n) => self.navigate(n, out),
            MonthArg::Name(name) => {
                let (_, month) =
                    self.view
                        .render_month_named(out, &name, &self.ws.index, &self.ws.config)?;
                self.month_pointer = month as i32;
                Ok(())
            }
        }
    }

    fn configure<W: Write>(&mut self, action: ConfigAction, out: &mut W) -> Result<()> {
        let message = self.ws.configure(&action)?;
        writeln!(out, "{}", message)?;
        Ok(())
    }

    fn help<W: Write>(&self, out: &mut W) -> Result<()> {
        let ink = self.ws.config.text_ink();
        for (title, entries) in [
            ("General commands:", GENERAL_HELP),
            ("Settings:", SETTINGS_HELP),
        ] {
            writeln!(out)?;
            writeln!(out, "{}", self.painter.paint(title, ink))?;
            writeln!(out)?;
            for (usage, description) in entries {
                let line = format!("  {:<34}- {}", usage, description);
                writeln!(out, "{}", self.painter.paint(&line, ink))?;
            }
        }
        Ok(())
    }
}

/// Splits `"<description> YYYY-MM-DD [HH:MM]"` into its description and
/// deadline. Without a recognizable trailing date the whole text is the
/// description.
pub fn split_trailing_deadline(text: &str) -> (&str, Option<&str>) {
    let text = text.trim();
    let Some((head, last)) = text.rsplit_once(' ') else {
        return (text, None);
    };
    if looks_like_time(last) {
        let head = head.trim_end();
        if let Some((description, date)) = head.rsplit_once(' ') {
            if looks_like_date(date) {
                let start = head.len() - date.len();
                return (description.trim_end(), Some(&text[start..]));
            }
        }
        return (text, None);
    }
    if looks_like_date(last) {
        return (head.trim_end(), Some(last));
    }
    (text, None)
}

fn looks_like_date(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() == 10 && bytes[4] == b'-' && bytes[7] == b'-'
}

fn looks_like_time(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() == 5 && bytes[2] == b':'
}

fn parse_id(raw: &str) -> Result<TaskId> {
    raw.parse()
        .with_context(|| format!("invalid task ID {:?}", raw))
}

fn parse_day(raw: &str) -> Result<(i32, u32)> {
    let mut parts = raw.split_whitespace();
    let (Some(month), Some(day), None) = (parts.next(), parts.next(), parts.next()) else {
        bail!("usage: day <month> <day>");
    };
    let month = month
        .parse()
        .with_context(|| format!("invalid month {:?}", month))?;
    let day = day.parse().with_context(|| format!("invalid day {:?}", day))?;
    Ok((month, day))
}

fn color_arg(cmd: &str, rest: &str) -> Result<String> {
    if rest.is_empty() {
        let names: Vec<&str> = NamedColor::ALL.iter().map(|c| c.name()).collect();
        bail!("usage: {} <color> (one of {})", cmd, names.join(", "));
    }
    Ok(rest.to_string())
}
