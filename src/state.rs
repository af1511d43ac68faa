//! Month state: the raw persisted record and its canonical form.
//!
//! A record read back from storage is never trusted. `normalize` always
//! produces exactly `HABIT_COUNT` habit names and `HABIT_COUNT` x `MAX_DAYS`
//! mark cells, whatever was loaded.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use crate::calendar::MAX_DAYS;

pub const HABIT_COUNT: usize = 12;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthState {
    pub habits: [String; HABIT_COUNT],
    pub marks: [[bool; MAX_DAYS]; HABIT_COUNT],
}

impl MonthState {
    pub fn is_marked(&self, row: usize, day: u32) -> bool {
        day_index(day)
            .and_then(|d| self.marks.get(row).map(|cells| cells[d]))
            .unwrap_or(false)
    }

    pub fn toggle(&mut self, row: usize, day: u32) -> Option<bool> {
        let d = day_index(day)?;
        let cell = self.marks.get_mut(row)?.get_mut(d)?;
        *cell = !*cell;
        Some(*cell)
    }

    pub fn rename(&mut self, row: usize, text: &str) -> bool {
        match self.habits.get_mut(row) {
            Some(slot) => {
                *slot = text.trim_end().to_string();
                true
            }
            None => false,
        }
    }

    /// Number of habits marked on `day`; days past `days_in_month` count zero.
    pub fn day_total(&self, day: u32, days_in_month: u32) -> usize {
        if day > days_in_month {
            return 0;
        }
        (0..HABIT_COUNT).filter(|&row| self.is_marked(row, day)).count()
    }
}

fn day_index(day: u32) -> Option<usize> {
    let d = (day as usize).checked_sub(1)?;
    (d < MAX_DAYS).then_some(d)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistedRecord {
    pub habits: Option<Vec<Value>>,
    pub marks: Option<Vec<Option<Vec<Value>>>>,
}

impl PersistedRecord {
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };
        let habits = obj.get("habits").and_then(Value::as_array).cloned();
        let marks = obj
            .get("marks")
            .and_then(Value::as_array)
            .map(|rows| rows.iter().map(|row| row.as_array().cloned()).collect());
        Self { habits, marks }
    }
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn habit_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if is_truthy(value) => n.to_string(),
        Value::Bool(true) => "true".to_string(),
        _ => String::new(),
    }
}

/// Builds canonical state from whatever was loaded.
///
/// Habits are all-or-nothing: a list of exactly `HABIT_COUNT` names is kept,
/// any other length is discarded in favour of empty slots. Marks are padded
/// or truncated row by row, independently of the habits check.
pub fn normalize(record: Option<&PersistedRecord>) -> MonthState {
    let mut state = MonthState::default();
    let Some(record) = record else {
        return state;
    };

    if let Some(habits) = record.habits.as_ref().filter(|h| h.len() == HABIT_COUNT) {
        for (slot, value) in state.habits.iter_mut().zip(habits) {
            *slot = habit_text(value);
        }
    }

    if let Some(rows) = &record.marks {
        for (cells, source) in state.marks.iter_mut().zip(rows) {
            let source = source.as_deref().unwrap_or(&[]);
            for (cell, value) in cells.iter_mut().zip(source) {
                *cell = is_truthy(value);
            }
        }
    }

    state
}
