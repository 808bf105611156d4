use crate::config::SortMethod;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

pub type TaskId = u32;

pub const DEADLINE_FORMAT: &str = "%Y-%m-%d %H:%M";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub description: String,
    pub deadline: NaiveDateTime,
    pub completed: bool,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("task description cannot be empty")]
    EmptyDescription,
    #[error("invalid deadline {0:?} (use YYYY-MM-DD or YYYY-MM-DD HH:MM)")]
    MalformedDeadline(String),
    #[error("task with ID {0} not found")]
    NotFound(TaskId),
}

impl Task {
    pub fn new(id: TaskId, description: impl Into<String>, deadline: NaiveDateTime) -> Self {
        Task {
            id,
            description: description.into(),
            deadline,
            completed: false,
        }
    }

    pub fn day(&self) -> u32 {
        self.deadline.day()
    }

    pub fn month(&self) -> u32 {
        self.deadline.month()
    }

    pub fn year(&self) -> i32 {
        self.deadline.year()
    }

    pub fn deadline_text(&self) -> String {
        self.deadline.format(DEADLINE_FORMAT).to_string()
    }

    pub fn falls_on(&self, year: i32, month: u32, day: u32) -> bool {
        self.year() == year && self.month() == month && self.day() == day
    }

    fn date_key(&self) -> (i32, u32, u32) {
        (self.year(), self.month(), self.day())
    }
}

/// Parses user or file input into a deadline.
///
/// An empty string means "now" (to the minute), a bare date means
/// midnight on that date.
pub fn parse_deadline(raw: &str, now: NaiveDateTime) -> Result<NaiveDateTime, TaskError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(now
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(now));
    }
    let malformed = || TaskError::MalformedDeadline(trimmed.to_string());
    if trimmed.len() == 10 {
        let date = NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| malformed())?;
        return date.and_hms_opt(0, 0, 0).ok_or_else(malformed);
    }
    NaiveDateTime::parse_from_str(trimmed, DEADLINE_FORMAT).map_err(|_| malformed())
}

/// Tasks grouped into month buckets, plus the listing order used by
/// `list` and by persistence.
#[derive(Debug, Clone)]
pub struct TaskIndex {
    buckets: BTreeMap<u32, Vec<Task>>,
    order: Vec<TaskId>,
    sort_method: SortMethod,
}

impl Default for TaskIndex {
    fn default() -> Self {
        TaskIndex::new(SortMethod::Id)
    }
}

impl TaskIndex {
    pub fn new(sort_method: SortMethod) -> Self {
        TaskIndex {
            buckets: BTreeMap::new(),
            order: Vec::new(),
            sort_method,
        }
    }

    /// Builds an index keeping `tasks` in the order given. Ids stay
    /// unique: a later task reusing an id is dropped.
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>, sort_method: SortMethod) -> Self {
        let mut index = TaskIndex::new(sort_method);
        let mut seen = HashSet::new();
        for task in tasks {
            if !seen.insert(task.id) {
                warn!(
                    id = task.id,
                    description = %task.description,
                    "skipping task with duplicate id"
                );
                continue;
            }
            index.insert(task);
        }
        index
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn next_id(&self) -> TaskId {
        self.buckets
            .values()
            .flatten()
            .map(|t| t.id)
            .max()
            .map_or(1, |max| max + 1)
    }

    pub fn add_task(
        &mut self,
        description: &str,
        deadline: &str,
        now: NaiveDateTime,
    ) -> Result<Task, TaskError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(TaskError::EmptyDescription);
        }
        let deadline = parse_deadline(deadline, now)?;
        let task = Task::new(self.next_id(), description.replace(['\n', '\r'], " "), deadline);
        self.insert(task.clone());
        self.sort(self.sort_method);
        Ok(task)
    }

    pub fn complete_task(&mut self, id: TaskId) -> Result<&Task, TaskError> {
        let task = self
            .buckets
            .values_mut()
            .flat_map(|bucket| bucket.iter_mut())
            .find(|t| t.id == id)
            .ok_or(TaskError::NotFound(id))?;
        task.completed = true;
        Ok(task)
    }

    pub fn delete_task(&mut self, id: TaskId) -> Result<Task, TaskError> {
        for bucket in self.buckets.values_mut() {
            if let Some(pos) = bucket.iter().position(|t| t.id == id) {
                let removed = bucket.remove(pos);
                self.order.retain(|other| *other != id);
                return Ok(removed);
            }
        }
        Err(TaskError::NotFound(id))
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
        self.order.clear();
    }

    pub fn find(&self, id: TaskId) -> Option<&Task> {
        self.buckets.values().flatten().find(|t| t.id == id)
    }

    pub fn tasks_for_month(&self, month: u32) -> &[Task] {
        self.buckets.get(&month).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn tasks_for_day(&self, year: i32, month: u32, day: u32) -> Vec<&Task> {
        self.tasks_for_month(month)
            .iter()
            .filter(|t| t.falls_on(year, month, day))
            .collect()
    }

    /// All tasks in listing order.
    pub fn tasks(&self) -> Vec<&Task> {
        self.order.iter().filter_map(|id| self.find(*id)).collect()
    }

    pub fn sort(&mut self, method: SortMethod) {
        self.sort_method = method;
        let mut keyed: Vec<(TaskId, (i32, u32, u32))> = self
            .tasks()
            .into_iter()
            .map(|t| (t.id, t.date_key()))
            .collect();
        match method {
            SortMethod::Id => keyed.sort_by_key(|(id, _)| *id),
            SortMethod::Ascending => keyed.sort_by_key(|(_, date)| *date),
            SortMethod::Descending => keyed.sort_by(|a, b| b.1.cmp(&a.1)),
        }
        self.order = keyed.into_iter().map(|(id, _)| id).collect();
    }

    fn insert(&mut self, task: Task) {
        self.order.push(task.id);
        self.buckets.entry(task.month()).or_default().push(task);
    }
}
