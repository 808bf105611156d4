use crate::dates::{days_in_month, weekday_of_first};
use crate::model::{Task, TaskIndex};

pub const DAYS_PER_WEEK: usize = 7;
pub const GRID_WEEKS: usize = 6;
pub const GRID_CELLS: usize = DAYS_PER_WEEK * GRID_WEEKS;

#[derive(Debug, Clone)]
pub struct DayCell<'a> {
    pub day: u32,
    pub events: Vec<&'a Task>,
}

#[derive(Debug, Clone)]
pub struct MonthGrid<'a> {
    year: i32,
    month: u32,
    cells: Vec<Option<DayCell<'a>>>,
}

impl<'a> MonthGrid<'a> {
    pub fn build(year: i32, month: u32, index: &'a TaskIndex) -> Self {
        let offset = weekday_of_first(year, month) as usize;
        let mut cells: Vec<Option<DayCell<'a>>> = vec![None; GRID_CELLS];
        for day in 1..=days_in_month(year, month) {
            let slot = offset + day as usize - 1;
            cells[slot] = Some(DayCell {
                day,
                events: index.tasks_for_day(year, month, day),
            });
        }
        MonthGrid { year, month, cells }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn cells(&self) -> &[Option<DayCell<'a>>] {
        &self.cells
    }

    pub fn day_at(&self, idx: usize) -> Option<u32> {
        self.cells.get(idx).and_then(|c| c.as_ref()).map(|c| c.day)
    }

    pub fn has_sixth_week(&self) -> bool {
        self.cells[GRID_CELLS - DAYS_PER_WEEK].is_some()
    }

    pub fn weeks(&self) -> usize {
        if self.has_sixth_week() {
            GRID_WEEKS
        } else {
            GRID_WEEKS - 1
        }
    }

    pub fn week(&self, week: usize) -> &[Option<DayCell<'a>>] {
        let start = week * DAYS_PER_WEEK;
        &self.cells[start..start + DAYS_PER_WEEK]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid now")
    }

    #[test]
    fn days_are_contiguous_from_the_first_weekday() {
        let index = TaskIndex::default();
        for year in [1900, 2000, 2023, 2024, 2025, 2026] {
            for month in 1..=12 {
                let grid = MonthGrid::build(year, month, &index);
                let start = weekday_of_first(year, month) as usize;
                let days = days_in_month(year, month) as usize;
                let filled: Vec<usize> = (0..GRID_CELLS)
                    .filter(|idx| grid.day_at(*idx).is_some())
                    .collect();
                assert_eq!(filled.len(), days, "{year}-{month}");
                assert_eq!(filled.first().copied(), Some(start));
                assert_eq!(filled.last().copied(), Some(start + days - 1));
                for (n, idx) in filled.iter().enumerate() {
                    assert_eq!(grid.day_at(*idx), Some(n as u32 + 1));
                }
            }
        }
    }

    #[test]
    fn sixth_week_only_when_the_month_overflows_five_rows() {
        let index = TaskIndex::default();
        for year in [2023, 2024, 2025, 2026] {
            for month in 1..=12 {
                let grid = MonthGrid::build(year, month, &index);
                let spill = weekday_of_first(year, month) + days_in_month(year, month) > 35;
                assert_eq!(grid.has_sixth_week(), spill, "{year}-{month}");
                assert_eq!(grid.weeks(), if spill { 6 } else { 5 });
            }
        }
    }

    #[test]
    fn august_2026_needs_six_rows() {
        // Saturday start with 31 days.
        let index = TaskIndex::default();
        let grid = MonthGrid::build(2026, 8, &index);
        assert_eq!(grid.day_at(6), Some(1));
        assert!(grid.has_sixth_week());
        assert_eq!(grid.week(5)[0].as_ref().map(|c| c.day), Some(30));
    }

    #[test]
    fn cells_carry_their_tasks() {
        let mut index = TaskIndex::default();
        index.add_task("dentist", "2025-06-02 09:00", now()).expect("add");
        index.add_task("report", "2025-06-02 14:30", now()).expect("add");
        index.add_task("last year", "2024-06-02 14:30", now()).expect("add");
        let grid = MonthGrid::build(2025, 6, &index);
        // June 2025 starts on Sunday, so the 2nd sits in slot 1.
        let cell = grid.cells()[1].as_ref().expect("day cell");
        assert_eq!(cell.day, 2);
        let names: Vec<&str> = cell.events.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(names, ["dentist", "report"]);
        assert!(grid.cells()[2].as_ref().map_or(false, |c| c.events.is_empty()));
    }
}
