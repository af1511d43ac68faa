use crate::calendar::{MAX_DAYS, weekday_abbrev};
use crate::state::{HABIT_COUNT, MonthState};

pub const CHECK_GLYPH: &str = "✓";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCell {
    pub text: String,
    pub disabled: bool,
}

impl LabelCell {
    fn active(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            disabled: false,
        }
    }

    fn disabled(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            disabled: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkCell {
    pub checked: bool,
    pub interactive: bool,
}

impl MarkCell {
    pub fn glyph(&self) -> &'static str {
        if self.checked { CHECK_GLYPH } else { "" }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitRow {
    /// 1-based row number shown in the first column.
    pub number: usize,
    pub name: String,
    pub cells: Vec<MarkCell>,
}

/// Interaction on the grid, addressed by habit row (0-based) and day
/// (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridEvent {
    Toggle { row: usize, day: u32 },
    Rename { row: usize, text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridPatch {
    Mark { row: usize, day: u32, checked: bool },
    Name { row: usize },
    /// The event hit a non-interactive position; nothing changed.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridView {
    pub days_in_month: u32,
    pub days: Vec<LabelCell>,
    pub weekdays: Vec<LabelCell>,
    pub rows: Vec<HabitRow>,
    pub totals: Vec<LabelCell>,
}

impl GridView {
    pub fn build(days_in_month: u32, year: i32, month0: i32, state: &MonthState) -> Self {
        let is_active = |day: u32| day <= days_in_month;

        let days = (1..=MAX_DAYS as u32)
            .map(|day| {
                if is_active(day) {
                    LabelCell::active(day.to_string())
                } else {
                    LabelCell::disabled(day.to_string())
                }
            })
            .collect();

        let weekdays = (1..=MAX_DAYS as u32)
            .map(|day| {
                if is_active(day) {
                    LabelCell::active(weekday_abbrev(year, month0, day))
                } else {
                    LabelCell::disabled("")
                }
            })
            .collect();

        let rows = (0..HABIT_COUNT)
            .map(|row| HabitRow {
                number: row + 1,
                name: state.habits[row].clone(),
                cells: (1..=MAX_DAYS as u32)
                    .map(|day| MarkCell {
                        checked: state.is_marked(row, day),
                        interactive: is_active(day),
                    })
                    .collect(),
            })
            .collect();

        let mut view = Self {
            days_in_month,
            days,
            weekdays,
            rows,
            totals: Vec::with_capacity(MAX_DAYS),
        };
        view.refresh_totals(state);
        view
    }

    pub fn is_interactive(&self, row: usize, day: u32) -> bool {
        self.cell(row, day).is_some_and(|cell| cell.interactive)
    }

    pub fn cell(&self, row: usize, day: u32) -> Option<&MarkCell> {
        let d = (day as usize).checked_sub(1)?;
        self.rows.get(row)?.cells.get(d)
    }

    pub fn set_mark(&mut self, row: usize, day: u32, checked: bool) {
        let Some(d) = (day as usize).checked_sub(1) else {
            return;
        };
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.cells.get_mut(d)) {
            cell.checked = checked;
        }
    }

    pub fn set_name(&mut self, row: usize, name: &str) {
        if let Some(r) = self.rows.get_mut(row) {
            r.name = name.to_string();
        }
    }

    pub fn refresh_totals(&mut self, state: &MonthState) {
        self.totals = (1..=MAX_DAYS as u32)
            .map(|day| {
                if day > self.days_in_month {
                    return LabelCell::disabled("");
                }
                match state.day_total(day, self.days_in_month) {
                    0 => LabelCell::active(""),
                    sum => LabelCell::active(sum.to_string()),
                }
            })
            .collect();
    }

    pub fn total_for(&self, day: u32) -> usize {
        (day as usize)
            .checked_sub(1)
            .and_then(|d| self.totals.get(d))
            .and_then(|cell| cell.text.parse().ok())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn february_2023() -> (MonthState, GridView) {
        let state = MonthState::default();
        let view = GridView::build(28, 2023, 1, &state);
        (state, view)
    }

    #[test]
    fn grid_always_has_full_width() {
        let (_, view) = february_2023();
        assert_eq!(view.days.len(), MAX_DAYS);
        assert_eq!(view.weekdays.len(), MAX_DAYS);
        assert_eq!(view.totals.len(), MAX_DAYS);
        assert_eq!(view.rows.len(), HABIT_COUNT);
        assert!(view.rows.iter().all(|r| r.cells.len() == MAX_DAYS));
        assert_eq!(view.rows[0].number, 1);
        assert_eq!(view.rows[11].number, 12);
    }

    #[test]
    fn days_past_month_end_are_disabled() {
        let (_, view) = february_2023();
        assert!(!view.days[27].disabled);
        assert_eq!(view.days[28], LabelCell::disabled("29"));
        assert_eq!(view.weekdays[28], LabelCell::disabled(""));
        assert!(view.totals[28].disabled);
        assert!(view.is_interactive(0, 28));
        assert!(!view.is_interactive(0, 29));
        assert!(!view.is_interactive(12, 1));
    }

    #[test]
    fn weekday_header_follows_calendar() {
        // 2023-02-01 was a Wednesday.
        let (_, view) = february_2023();
        let labels: Vec<&str> = view.weekdays[..7].iter().map(|c| c.text.as_str()).collect();
        assert_eq!(labels, ["W", "Th", "F", "Sa", "S", "M", "T"]);
    }

    #[test]
    fn totals_are_blank_when_zero_and_ignore_inactive_days() {
        let mut state = MonthState::default();
        state.marks[0][4] = true;
        state.marks[7][4] = true;
        state.marks[3][29] = true;
        let view = GridView::build(28, 2023, 1, &state);
        assert_eq!(view.totals[4].text, "2");
        assert_eq!(view.totals[0].text, "");
        assert_eq!(view.total_for(30), 0);
        assert_eq!(view.totals[29], LabelCell::disabled(""));
        // Stray marks on inactive days still show, but are not clickable.
        assert_eq!(view.rows[3].cells[29].glyph(), CHECK_GLYPH);
        assert!(!view.rows[3].cells[29].interactive);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let mut state = MonthState::default();
        state.habits[1] = "Journal".to_string();
        state.marks[1][2] = true;
        let first = GridView::build(31, 2024, 0, &state);
        let second = GridView::build(31, 2024, 0, &state);
        assert_eq!(first, second);
    }
}
