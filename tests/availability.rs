#![forbid(unsafe_code)]
use bau::{
    AvailabilityConfig, Engineer, EngineerQuery, HoursGrouping, MemoryStorage, ShiftAssignment,
    ShiftRepository, ShiftStore,
};
use chrono::{Days, NaiveDate};
use std::collections::HashSet;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn handles(engineers: &[Engineer]) -> Vec<&str> {
    let mut out: Vec<&str> = engineers.iter().map(|e| e.handle.as_str()).collect();
    out.sort_unstable();
    out
}

fn store_with(engineers: &[&Engineer], shifts: Vec<ShiftAssignment>) -> ShiftStore<MemoryStorage> {
    let store = ShiftStore::open(MemoryStorage::default()).unwrap();
    store
        .add_engineers(engineers.iter().map(|e| (*e).clone()).collect())
        .unwrap();
    store.create_assignments(shifts).unwrap();
    store
}

#[test]
fn friday_scenario() {
    let a = Engineer::new("a", "A");
    let b = Engineer::new("b", "B");
    let c = Engineer::new("c", "C");
    let store = store_with(
        &[&a, &b, &c],
        vec![
            ShiftAssignment::new(a.id.clone(), d(2024, 3, 4), 8),
            ShiftAssignment::new(a.id.clone(), d(2024, 3, 6), 8),
            ShiftAssignment::new(b.id.clone(), d(2024, 3, 14), 8),
        ],
    );
    let config = AvailabilityConfig::new(40, 2).unwrap();
    let available = EngineerQuery::new(&store, config)
        .find_available_engineers(d(2024, 3, 15))
        .unwrap();
    assert_eq!(handles(&available), vec!["a", "c"]);
}

#[test]
fn adjacent_business_day_excludes_for_every_weekday() {
    let config = AvailabilityConfig::new(40, 2).unwrap();
    // lundi 11 mars au dimanche 17 mars 2024
    for offset in 0..7u64 {
        let target = d(2024, 3, 11) + Days::new(offset);
        let adjacent = bau::AdjacentDays::around(target);
        for worked in [adjacent.previous, adjacent.next] {
            let busy = Engineer::new("busy", "Busy");
            let store = store_with(
                &[&busy],
                vec![
                    ShiftAssignment::new(busy.id.clone(), d(2024, 3, 1), 8),
                    ShiftAssignment::new(busy.id.clone(), worked, 8),
                ],
            );
            let available = EngineerQuery::new(&store, config)
                .find_available_engineers(target)
                .unwrap();
            assert!(available.is_empty(), "target={target} worked={worked}");
        }
    }
}

#[test]
fn hours_equal_to_cap_excludes() {
    let full = Engineer::new("full", "Full");
    let light = Engineer::new("light", "Light");
    let mut shifts: Vec<ShiftAssignment> = [4, 5, 6, 7, 8]
        .iter()
        .map(|&day| ShiftAssignment::new(full.id.clone(), d(2024, 3, day), 8))
        .collect();
    shifts.push(ShiftAssignment::new(light.id.clone(), d(2024, 3, 4), 8));
    let store = store_with(&[&full, &light], shifts);

    let config = AvailabilityConfig::new(40, 2).unwrap();
    let available = EngineerQuery::new(&store, config)
        .find_available_engineers(d(2024, 3, 20))
        .unwrap();
    assert_eq!(handles(&available), vec!["light"]);

    let relaxed = AvailabilityConfig::new(41, 2).unwrap();
    let available = EngineerQuery::new(&store, relaxed)
        .find_available_engineers(d(2024, 3, 20))
        .unwrap();
    assert_eq!(handles(&available), vec!["full", "light"]);
}

#[test]
fn engineer_grouping_sums_all_durations() {
    let mixed = Engineer::new("mixed", "Mixed");
    let store = store_with(
        &[&mixed],
        vec![
            ShiftAssignment::new(mixed.id.clone(), d(2024, 3, 4), 30),
            ShiftAssignment::new(mixed.id.clone(), d(2024, 3, 6), 10),
        ],
    );
    let target = d(2024, 3, 20);

    let faithful = AvailabilityConfig::new(40, 2).unwrap();
    let available = EngineerQuery::new(&store, faithful)
        .find_available_engineers(target)
        .unwrap();
    assert_eq!(handles(&available), vec!["mixed"]);

    let per_engineer = faithful.with_hours_grouping(HoursGrouping::Engineer);
    let available = EngineerQuery::new(&store, per_engineer)
        .find_available_engineers(target)
        .unwrap();
    assert!(available.is_empty());
}

#[test]
fn never_scheduled_always_available_and_no_duplicates() {
    let idle = Engineer::new("idle", "Idle");
    let busy = Engineer::new("busy", "Busy");
    let shifts: Vec<ShiftAssignment> = (0..60u64)
        .step_by(3)
        .map(|offset| ShiftAssignment::new(busy.id.clone(), d(2024, 2, 1) + Days::new(offset), 4))
        .collect();
    let store = store_with(&[&idle, &busy], shifts);
    let query = EngineerQuery::new(&store, AvailabilityConfig::new(24, 1).unwrap());
    assert_eq!(query.filter().config().max_shift_sum_hours(), 24);

    for offset in 0..90u64 {
        let target = d(2024, 1, 15) + Days::new(offset);
        let available = query.find_available_engineers(target).unwrap();
        let unique: HashSet<_> = available.iter().map(|e| e.id.clone()).collect();
        assert_eq!(unique.len(), available.len(), "duplicates on {target}");
        assert!(available.iter().any(|e| e.handle == "idle"), "idle missing on {target}");
    }
    assert_eq!(handles(&query.never_scheduled_engineers().unwrap()), vec!["idle"]);
}
