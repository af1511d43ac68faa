use habitgrid::codec::{parse, serialize};
use habitgrid::{HABIT_COUNT, MAX_DAYS, MonthState, PersistedRecord, normalize};
use serde_json::{Value, json};

fn record(value: Value) -> PersistedRecord {
    PersistedRecord::from_value(&value)
}

fn assert_canonical(state: &MonthState) {
    assert_eq!(state.habits.len(), HABIT_COUNT);
    assert_eq!(state.marks.len(), HABIT_COUNT);
    assert!(state.marks.iter().all(|row| row.len() == MAX_DAYS));
}

fn sample_inputs() -> Vec<Option<PersistedRecord>> {
    vec![
        None,
        Some(record(json!(null))),
        Some(record(json!(42))),
        Some(record(json!({}))),
        Some(record(json!({ "habits": "twelve chars" }))),
        Some(record(json!({ "habits": [1, 2, 3] }))),
        Some(record(json!({ "habits": vec!["x"; 12], "marks": [[1, 0, "yes"], null, 7] }))),
        Some(record(json!({ "marks": vec![vec![true; 40]; 15] }))),
        Some(record(json!({ "habits": vec!["a"; 12], "marks": [] }))),
    ]
}

#[test]
fn normalize_always_yields_canonical_shape() {
    for input in sample_inputs() {
        assert_canonical(&normalize(input.as_ref()));
    }
}

#[test]
fn normalize_is_idempotent_through_storage() {
    for input in sample_inputs() {
        let once = normalize(input.as_ref());
        let stored = parse(&serialize(&once)).expect("serialized state parses");
        assert_eq!(normalize(Some(&stored)), once);
    }
}

#[test]
fn canonical_state_round_trips() {
    let mut state = MonthState::default();
    for row in 0..HABIT_COUNT {
        state.habits[row] = format!("Habit #{row} \"quoted\"");
        state.marks[row][(row * 2) % MAX_DAYS] = true;
        state.marks[row][30] = row % 2 == 0;
    }
    let decoded = parse(&serialize(&state)).unwrap();
    assert_eq!(normalize(Some(&decoded)), state);
}

#[test]
fn ten_habits_are_discarded_entirely() {
    let names: Vec<String> = (1..=10).map(|i| format!("habit {i}")).collect();
    let state = normalize(Some(&record(json!({ "habits": names }))));
    assert_eq!(state.habits.len(), 12);
    assert!(state.habits.iter().all(|h| h.is_empty()));
}

#[test]
fn short_mark_row_is_padded_with_false() {
    let names: Vec<String> = (1..=12).map(|i| format!("habit {i}")).collect();
    let mut marks = vec![json!([]); 12];
    marks[5] = json!([true, 0, "done"]);
    let state = normalize(Some(&record(json!({ "habits": names, "marks": marks }))));

    assert_eq!(state.habits[5], "habit 6");
    assert_eq!(state.marks[5].len(), 31);
    assert_eq!(&state.marks[5][..3], &[true, false, true]);
    assert!(state.marks[5][3..].iter().all(|m| !m));
}

#[test]
fn bad_habits_do_not_affect_marks() {
    let state = normalize(Some(&record(json!({
        "habits": ["only one"],
        "marks": [[true], [false, true]]
    }))));
    assert!(state.habits.iter().all(|h| h.is_empty()));
    assert!(state.marks[0][0]);
    assert!(state.marks[1][1]);
}
