use crate::calendar::CalendarView;
use crate::cli::ConfigAction;
use crate::config::{ConfigStore, DisplayConfig};
use crate::dates::month_name;
use crate::ics;
use crate::model::{Task, TaskId, TaskIndex};
use crate::storage::TaskFile;
use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDateTime};
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;

/// Loaded tasks and settings plus where they persist.
pub struct Workspace {
    pub index: TaskIndex,
    pub config: DisplayConfig,
    tasks_file: TaskFile,
    config_store: ConfigStore,
}

/// Where a month argument points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthArg {
    Number(i32),
    Name(String),
}

impl MonthArg {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<i32>() {
            Ok(n) => MonthArg::Number(n),
            Err(_) => MonthArg::Name(trimmed.to_string()),
        }
    }
}

impl Workspace {
    pub fn open(file: Option<PathBuf>, config: Option<PathBuf>) -> Result<Self> {
        let config_store = ConfigStore::locate(config)?;
        let tasks_file = TaskFile::locate(file)?;
        Workspace::load(tasks_file, config_store)
    }

    pub fn load(tasks_file: TaskFile, config_store: ConfigStore) -> Result<Self> {
        let config = config_store.load();
        let tasks = tasks_file.load_all()?;
        let mut index = TaskIndex::from_tasks(tasks, config.sort_method());
        index.sort(config.sort_method());
        Ok(Workspace {
            index,
            config,
            tasks_file,
            config_store,
        })
    }

    pub fn add(&mut self, description: &str, due: Option<&str>, now: NaiveDateTime) -> Result<Task> {
        let task = self
            .index
            .add_task(description, due.unwrap_or_default(), now)?;
        self.save_tasks()?;
        Ok(task)
    }

    pub fn complete(&mut self, id: TaskId) -> Result<()> {
        self.index.complete_task(id)?;
        self.save_tasks()
    }

    pub fn delete(&mut self, id: TaskId) -> Result<Task> {
        let removed = self.index.delete_task(id)?;
        self.save_tasks()?;
        Ok(removed)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.index.clear();
        self.save_tasks()
    }

    /// Applies one settings change and persists it. Returns a message
    /// describing the new value.
    pub fn configure(&mut self, action: &ConfigAction) -> Result<String> {
        let config = &mut self.config;
        let message = match action {
            ConfigAction::Show => return Ok(summary(config)),
            ConfigAction::Width { value } => {
                config.set_cell_width(*value)?;
                format!("The cell width of the calendar has been set to: {}", value)
            }
            ConfigAction::Height { value } => {
                config.set_cell_height(*value)?;
                format!("The cell height of the calendar has been set to: {}", value)
            }
            ConfigAction::BorderColor { color } => {
                config.set_border_color(color)?;
                format!("Calendar border color set to {}", config.border_color())
            }
            ConfigAction::TextColor { color } => {
                config.set_text_color(color)?;
                format!("Text color set to {}", config.text_color())
            }
            ConfigAction::EventsColor { color } => {
                config.set_events_color(color)?;
                format!("Events color set to {}", config.events_color())
            }
            ConfigAction::BorderBold => {
                format!("Bold calendar borders: {}", on_off(config.toggle_border_bold()))
            }
            ConfigAction::TextBold => format!("Bold text: {}", on_off(config.toggle_text_bold())),
            ConfigAction::Ics => format!("ICS export: {}", on_off(config.toggle_ics_export())),
            ConfigAction::EventDisplay => {
                format!("Event display: {:?}", config.toggle_event_display())
            }
            ConfigAction::Sort { method } => {
                let method = config.set_sort_method(method)?;
                self.index.sort(method);
                self.save_tasks()?;
                format!("Tasks sorted {}", method.label().to_lowercase())
            }
        };
        self.config_store.save(&self.config)?;
        debug!(?action, "config updated");
        Ok(message)
    }

    fn save_tasks(&self) -> Result<()> {
        self.tasks_file
            .save_all(self.index.tasks())
            .context("saving tasks")
    }
}

pub fn add(ws: &mut Workspace, description: &str, due: Option<&str>) -> Result<()> {
    let task = ws.add(description, due, Local::now().naive_local())?;
    println!("Task added with ID {}", task.id);
    export_to_calendar(ws, &task, due.map_or(false, |d| !d.trim().is_empty()))
}

/// Tasks added with an explicit deadline go to the calendar app when
/// ICS export is on.
pub fn export_to_calendar(ws: &Workspace, task: &Task, explicit_deadline: bool) -> Result<()> {
    if ws.config.ics_export() && explicit_deadline {
        let path = ics::export(task, &env::current_dir()?)?;
        ics::open_in_calendar(&path);
    }
    Ok(())
}

pub fn list(ws: &Workspace, all: bool) -> Result<()> {
    let mut out = io::stdout().lock();
    write_task_table(&mut out, ws.index.tasks(), all)?;
    Ok(())
}

pub fn complete(ws: &mut Workspace, id: TaskId) -> Result<()> {
    ws.complete(id)?;
    println!("Task {} marked as completed.", id);
    Ok(())
}

pub fn delete(ws: &mut Workspace, id: TaskId) -> Result<()> {
    ws.delete(id)?;
    println!("Task {} deleted.", id);
    Ok(())
}

pub fn clear(ws: &mut Workspace) -> Result<()> {
    println!("Clearing all tasks...");
    ws.clear()
}

/// One-shot calendar output: never repositions the cursor.
pub fn calendar(ws: &Workspace, view: &mut CalendarView, month: Option<&str>) -> Result<()> {
    let mut out = io::stdout().lock();
    let month = month.map(MonthArg::parse);
    match month {
        None => {
            let current = view.today().month() as i32;
            view.render_month(&mut out, current, false, &ws.index, &ws.config)?;
        }
        Some(MonthArg::Number(n)) => {
            view.render_month(&mut out, n, false, &ws.index, &ws.config)?;
        }
        Some(MonthArg::Name(name)) => {
            view.render_month_named(&mut out, &name, &ws.index, &ws.config)?;
        }
    }
    Ok(())
}

pub fn day(ws: &Workspace, view: &CalendarView, month: i32, day: u32) -> Result<()> {
    let mut out = io::stdout().lock();
    write_day(&mut out, ws, view, month, day)
}

pub fn write_day<W: Write>(
    out: &mut W,
    ws: &Workspace,
    view: &CalendarView,
    month: i32,
    day: u32,
) -> Result<()> {
    let (_, month, tasks) = view.tasks_for_day(&ws.index, month, day)?;
    if tasks.is_empty() {
        writeln!(out, "No tasks scheduled for {} {}", month_name(month), day)?;
        return Ok(());
    }
    writeln!(out, "Events for {} {}:", month_name(month), day)?;
    writeln!(out)?;
    write_task_table(out, tasks, true)?;
    Ok(())
}

pub fn configure(ws: &mut Workspace, action: Option<ConfigAction>) -> Result<()> {
    let message = ws.configure(&action.unwrap_or(ConfigAction::Show))?;
    println!("{}", message);
    Ok(())
}

pub fn write_task_table<W: Write>(out: &mut W, tasks: Vec<&Task>, all: bool) -> io::Result<()> {
    if tasks.is_empty() {
        return writeln!(out, "No tasks found.");
    }
    writeln!(
        out,
        "{:<5}   {:<50} {:<17} {}",
        "ID", "Description", "Deadline", "Status"
    )?;
    writeln!(out, "{}", "-".repeat(84))?;
    for task in tasks.into_iter().filter(|t| all || !t.completed) {
        writeln!(
            out,
            "{:<5}   {:<50} {:<17} {}",
            task.id,
            task.description,
            task.deadline_text(),
            if task.completed { "Completed" } else { "Pending" }
        )?;
    }
    Ok(())
}

fn summary(config: &DisplayConfig) -> String {
    [
        "Your current configurations:".to_string(),
        format!("  Grid cell width:        {}", config.cell_width()),
        format!("  Grid cell height:       {}", config.cell_height()),
        format!("  Calendar border color:  {}", config.border_color()),
        format!("  Text color:             {}", config.text_color()),
        format!("  Calendar events color:  {}", config.events_color()),
        format!("  Bold calendar borders:  {}", on_off(config.border_bold())),
        format!("  Bold text:              {}", on_off(config.text_bold())),
        format!("  ICS enabled:            {}", on_off(config.ics_export())),
        format!("  Event display:          {:?}", config.event_display()),
        format!("  Events sorting method:  {}", config.sort_method().label()),
    ]
    .join("\n")
}

fn on_off(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SortMethod;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 18)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .expect("valid now")
    }

    fn workspace(dir: &TempDir) -> Workspace {
        Workspace::load(
            TaskFile::at(dir.path().join("tasks.dat")),
            ConfigStore::at(dir.path().join("config.yml")),
        )
        .expect("load workspace")
    }

    #[test]
    fn mutations_persist_across_reloads() {
        let dir = tempdir().expect("tempdir");
        let mut ws = workspace(&dir);
        ws.add("Submit report", Some("2025-06-02 14:30"), now()).expect("add");
        ws.add("Pay rent", Some("2025-06-01"), now()).expect("add");
        ws.complete(1).expect("complete");

        let reloaded = workspace(&dir);
        let tasks = reloaded.index.tasks();
        assert_eq!(tasks.len(), 2);
        assert!(tasks[0].completed);
        assert_eq!(tasks[1].deadline_text(), "2025-06-01 00:00");

        let mut ws = reloaded;
        ws.delete(2).expect("delete");
        assert!(ws.delete(2).is_err());
        assert_eq!(workspace(&dir).index.len(), 1);
        ws.clear().expect("clear");
        assert!(workspace(&dir).index.is_empty());
    }

    #[test]
    fn duplicate_ids_in_the_file_do_not_clobber_on_save() {
        let dir = tempdir().expect("tempdir");
        fs::write(
            dir.path().join("tasks.dat"),
            "1|first|2025-06-02 14:30|0\n1|second|2025-07-03 10:00|0\n2|other|2025-07-04 09:00|0\n",
        )
        .expect("write");
        let mut ws = workspace(&dir);
        let listed: Vec<&str> = ws
            .index
            .tasks()
            .iter()
            .map(|t| t.description.as_str())
            .collect();
        assert_eq!(listed, ["first", "other"]);

        ws.complete(1).expect("complete");
        let raw = fs::read_to_string(dir.path().join("tasks.dat")).expect("read");
        assert_eq!(
            raw,
            "1|first|2025-06-02 14:30|1\n2|other|2025-07-04 09:00|0\n"
        );
    }

    #[test]
    fn sort_setting_is_saved_and_reapplied() {
        let dir = tempdir().expect("tempdir");
        let mut ws = workspace(&dir);
        ws.add("later", Some("2025-09-01"), now()).expect("add");
        ws.add("sooner", Some("2025-02-01"), now()).expect("add");
        ws.configure(&ConfigAction::Sort {
            method: "ascending".into(),
        })
        .expect("sort");

        let reloaded = workspace(&dir);
        assert_eq!(reloaded.config.sort_method(), SortMethod::Ascending);
        let order: Vec<TaskId> = reloaded.index.tasks().iter().map(|t| t.id).collect();
        assert_eq!(order, [2, 1]);
    }

    #[test]
    fn invalid_settings_leave_the_file_untouched() {
        let dir = tempdir().expect("tempdir");
        let mut ws = workspace(&dir);
        let before = fs::read_to_string(dir.path().join("config.yml")).expect("read");
        assert!(ws.configure(&ConfigAction::Width { value: 50 }).is_err());
        assert!(ws
            .configure(&ConfigAction::TextColor {
                color: "chartreuse".into()
            })
            .is_err());
        let after = fs::read_to_string(dir.path().join("config.yml")).expect("read");
        assert_eq!(before, after);

        ws.configure(&ConfigAction::Height { value: 6 }).expect("height");
        assert_eq!(workspace(&dir).config.cell_height(), 6);
    }

    #[test]
    fn summary_lists_every_setting() {
        let text = summary(&DisplayConfig::default());
        assert!(text.contains("Grid cell width:        28"));
        assert!(text.contains("Events sorting method:  By ID"));
    }

    #[test]
    fn task_table_hides_completed_unless_asked() {
        let deadline = now();
        let mut done = Task::new(1, "done thing", deadline);
        done.completed = true;
        let open = Task::new(2, "open thing", deadline);

        let mut out = Vec::new();
        write_task_table(&mut out, vec![&done, &open], false).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        assert!(!text.contains("done thing"));
        assert!(text.contains("open thing"));

        let mut out = Vec::new();
        write_task_table(&mut out, vec![&done, &open], true).expect("write");
        assert!(String::from_utf8(out).expect("utf8").contains("Completed"));

        let mut out = Vec::new();
        write_task_table(&mut out, vec![], true).expect("write");
        assert_eq!(String::from_utf8(out).expect("utf8"), "No tasks found.\n");
    }

    #[test]
    fn month_args_split_numbers_from_names() {
        assert_eq!(MonthArg::parse("13"), MonthArg::Number(13));
        assert_eq!(MonthArg::parse("-1"), MonthArg::Number(-1));
        assert_eq!(MonthArg::parse(" June "), MonthArg::Name("June".into()));
    }
}
