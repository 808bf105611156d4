use crate::model::{parse_deadline, Task, TaskId};
use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDateTime;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const DELIMITER: char = '|';

/// Pipe-delimited task file: `id|description|deadline|completed`.
#[derive(Debug, Clone)]
pub struct TaskFile {
    path: PathBuf,
}

impl TaskFile {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        TaskFile { path: path.into() }
    }

    pub fn locate(override_path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = override_path {
            return Ok(TaskFile::at(path));
        }
        let dirs = ProjectDirs::from("", "", "termcal").context("locating data directory")?;
        Ok(TaskFile::at(dirs.data_dir().join("tasks.dat")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Tasks in file order. Lines that do not parse are skipped.
    pub fn load_all(&self) -> Result<Vec<Task>> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "no task file yet, starting empty");
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {:?}", self.path))?;
        let mut tasks = Vec::new();
        for (lineno, line) in data.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match parse_line(line) {
                Ok(task) => tasks.push(task),
                Err(err) => warn!(
                    path = %self.path.display(),
                    line = lineno + 1,
                    error = %err,
                    "skipping malformed task line"
                ),
            }
        }
        debug!(count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    pub fn save_all<'a>(&self, tasks: impl IntoIterator<Item = &'a Task>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| format!("creating {:?}", parent))?;
            }
        }
        let mut serialized = String::new();
        let mut count = 0usize;
        for task in tasks {
            serialized.push_str(&format_line(task));
            serialized.push('\n');
            count += 1;
        }
        fs::write(&self.path, serialized).with_context(|| format!("writing {:?}", self.path))?;
        debug!(count, path = %self.path.display(), "saved tasks");
        Ok(())
    }
}

fn format_line(task: &Task) -> String {
    format!(
        "{}{d}{}{d}{}{d}{}",
        task.id,
        task.description,
        task.deadline_text(),
        if task.completed { 1 } else { 0 },
        d = DELIMITER
    )
}

/// The description is whatever sits between the id and the last two
/// fields, so it may itself contain the delimiter.
fn parse_line(line: &str) -> Result<Task> {
    let (id, rest) = line
        .split_once(DELIMITER)
        .ok_or_else(|| anyhow!("missing delimiter"))?;
    let mut tail = rest.rsplitn(3, DELIMITER);
    let completed = tail.next().ok_or_else(|| anyhow!("missing completed flag"))?;
    let deadline = tail.next().ok_or_else(|| anyhow!("missing deadline"))?;
    let description = tail.next().ok_or_else(|| anyhow!("missing description"))?;

    let id: TaskId = id
        .trim()
        .parse()
        .with_context(|| format!("invalid id {:?}", id))?;
    let completed = match completed.trim() {
        "0" => false,
        "1" => true,
        other => bail!("invalid completed flag {:?}", other),
    };
    if deadline.trim().is_empty() {
        bail!("empty deadline");
    }
    // The fallback "now" is never used: empty deadlines are rejected above.
    let deadline = parse_deadline(deadline, NaiveDateTime::MIN)?;
    Ok(Task {
        id,
        description: description.to_string(),
        deadline,
        completed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn task(id: TaskId, description: &str, completed: bool) -> Task {
        let deadline = NaiveDate::from_ymd_opt(2025, 6, 2)
            .and_then(|d| d.and_hms_opt(14, 30, 0))
            .expect("valid deadline");
        Task {
            id,
            description: description.to_string(),
            deadline,
            completed,
        }
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().expect("tempdir");
        let file = TaskFile::at(dir.path().join("tasks.dat"));
        assert!(file.load_all().expect("load").is_empty());
    }

    #[test]
    fn writes_the_delimited_format() {
        let dir = tempdir().expect("tempdir");
        let file = TaskFile::at(dir.path().join("sub/tasks.dat"));
        let tasks = [task(1, "Submit report", false), task(2, "a|b", true)];
        file.save_all(&tasks).expect("save");
        let raw = fs::read_to_string(file.path()).expect("read");
        assert_eq!(
            raw,
            "1|Submit report|2025-06-02 14:30|0\n2|a|b|2025-06-02 14:30|1\n"
        );
        assert_eq!(file.load_all().expect("load"), tasks);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("tasks.dat");
        fs::write(
            &path,
            "1|ok|2025-06-02 14:30|0\n\
             x|bad id|2025-06-02 14:30|0\n\
             3|bad date|2025-6-2 xx|0\n\
             4|bad flag|2025-06-02 14:30|maybe\n\
             no delimiters\n\
             \n\
             5|midnight|2025-06-03|1\n",
        )
        .expect("write");
        let loaded = TaskFile::at(&path).load_all().expect("load");
        let ids: Vec<TaskId> = loaded.iter().map(|t| t.id).collect();
        assert_eq!(ids, [1, 5]);
        assert_eq!(loaded[1].deadline_text(), "2025-06-03 00:00");
        assert!(loaded[1].completed);
    }
}
