use habitgrid::chart::Primitive;
use habitgrid::{
    ChartTarget, FileStore, GridEvent, GridPatch, KvStore, MemoryStore, MonthKey, Session,
    storage_key,
};
use serde_json::Value;

fn stored_json(store: &impl KvStore, key: &str) -> Value {
    let raw = store.get(key).unwrap().expect("record should be stored");
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn toggle_changes_one_cell_and_one_total() {
    let mut session = Session::new(MemoryStore::new(), MonthKey::new(2024, 3));
    session.render().unwrap();
    session
        .apply(GridEvent::Toggle { row: 0, day: 10 })
        .unwrap();

    let before_state = session.state().clone();
    let before_totals: Vec<usize> = (1..=31).map(|d| session.grid().total_for(d)).collect();

    let patch = session
        .apply(GridEvent::Toggle { row: 3, day: 10 })
        .unwrap();
    assert_eq!(
        patch,
        GridPatch::Mark {
            row: 3,
            day: 10,
            checked: true
        }
    );

    let after = session.state();
    for row in 0..12 {
        for d in 0..31 {
            let flipped = row == 3 && d == 9;
            assert_eq!(after.marks[row][d] != before_state.marks[row][d], flipped);
        }
    }
    for day in 1..=31u32 {
        let before = before_totals[day as usize - 1] as i64;
        let now = session.grid().total_for(day) as i64;
        if day == 10 {
            assert_eq!(now - before, 1);
        } else {
            assert_eq!(now, before);
        }
    }
    assert_eq!(session.grid().rows[3].cells[9].glyph(), "✓");

    session
        .apply(GridEvent::Toggle { row: 3, day: 10 })
        .unwrap();
    assert_eq!(session.grid().total_for(10), 1);
    assert_eq!(session.grid().rows[3].cells[9].glyph(), "");
}

#[test]
fn every_toggle_is_written_through() {
    let mut session = Session::new(MemoryStore::new(), MonthKey::new(2024, 3));
    session.render().unwrap();
    session.apply(GridEvent::Toggle { row: 2, day: 5 }).unwrap();

    let stored = stored_json(session.store(), "habit:v1:2024-03");
    assert_eq!(stored["marks"][2][4], true);
}

#[test]
fn inactive_days_are_not_interactive_and_never_counted() {
    let mut store = MemoryStore::new();
    let mut marks = vec![vec![false; 31]; 12];
    for row in marks.iter_mut() {
        row[29] = true;
        row[30] = true;
    }
    let record = serde_json::json!({ "habits": vec![""; 12], "marks": marks });
    store
        .set(&storage_key(2023, 2), &record.to_string())
        .unwrap();

    let mut session = Session::new(store, MonthKey::new(2023, 2));
    session.render().unwrap();
    assert_eq!(session.grid().total_for(30), 0);
    assert_eq!(session.grid().total_for(31), 0);
    assert!(session.grid().totals[29].disabled);

    let patch = session
        .apply(GridEvent::Toggle { row: 0, day: 30 })
        .unwrap();
    assert_eq!(patch, GridPatch::Ignored);
    assert!(session.state().marks[0][29]);
}

#[test]
fn visiting_a_month_canonicalizes_its_record() {
    let mut store = MemoryStore::new();
    store
        .set(&storage_key(2024, 5), r#"{"habits":["a","b"],"marks":[[1,0,1]]}"#)
        .unwrap();

    let mut session = Session::new(store, MonthKey::new(2024, 5));
    session.render().unwrap();

    let stored = stored_json(session.store(), "habit:v1:2024-05");
    let habits = stored["habits"].as_array().unwrap();
    assert_eq!(habits.len(), 12);
    assert!(habits.iter().all(|h| h == ""));
    let marks = stored["marks"].as_array().unwrap();
    assert_eq!(marks.len(), 12);
    assert!(marks.iter().all(|row| row.as_array().unwrap().len() == 31));
    assert_eq!(marks[0][0], true);
    assert_eq!(marks[0][1], false);
    assert_eq!(marks[0][2], true);
}

#[test]
fn corrupt_record_renders_empty_state() {
    let mut store = MemoryStore::new();
    store.set(&storage_key(2024, 6), "{{{not json").unwrap();
    let mut session = Session::new(store, MonthKey::new(2024, 6));
    session.render().unwrap();
    assert!(session.state().habits.iter().all(String::is_empty));
    // The corrupt text was replaced by a canonical record.
    let stored = stored_json(session.store(), "habit:v1:2024-06");
    assert_eq!(stored["habits"].as_array().unwrap().len(), 12);
}

#[test]
fn switching_months_keeps_records_apart() {
    let mut session = Session::new(MemoryStore::new(), MonthKey::new(2024, 1));
    session.render().unwrap();
    session
        .apply(GridEvent::Rename {
            row: 0,
            text: "Meditate   ".into(),
        })
        .unwrap();
    session
        .apply(GridEvent::Toggle { row: 0, day: 31 })
        .unwrap();

    session.select_month(MonthKey::new(2024, 2)).unwrap();
    assert_eq!(session.days_in_month(), 29);
    assert_eq!(session.state().habits[0], "");
    assert!(!session.state().marks[0][30]);

    session.select_month(MonthKey::new(2024, 1)).unwrap();
    assert_eq!(session.state().habits[0], "Meditate");
    assert!(session.state().marks[0][30]);
    assert_eq!(session.grid().rows[0].name, "Meditate");
}

#[test]
fn file_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = FileStore::open(dir.path()).unwrap();
        let mut session = Session::new(store, MonthKey::new(2024, 7));
        session.render().unwrap();
        session
            .apply(GridEvent::Rename {
                row: 11,
                text: "Read".into(),
            })
            .unwrap();
        session
            .apply(GridEvent::Toggle { row: 11, day: 4 })
            .unwrap();
    }

    let store = FileStore::open(dir.path()).unwrap();
    let mut session = Session::new(store, MonthKey::new(2024, 7));
    session.render().unwrap();
    assert_eq!(session.state().habits[11], "Read");
    assert!(session.state().marks[11][3]);
    assert_eq!(session.grid().total_for(4), 1);
}

#[test]
fn charts_follow_the_selected_month() {
    let mut session = Session::new(MemoryStore::new(), MonthKey::new(2024, 2));
    session.render().unwrap();
    for target in ChartTarget::ALL {
        let scene = session.chart(target).unwrap();
        assert_eq!(scene.days_in_month, 29);
        assert_eq!(scene.gridlines(true).count(), 29);
        let title_drawn = scene.primitives.iter().any(|p| {
            matches!(p, Primitive::Text { content, .. } if content == target.title())
        });
        assert!(title_drawn);
    }
}
