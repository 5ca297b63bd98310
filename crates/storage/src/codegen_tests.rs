// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::Executor;
use keel_core::FakeClock;
use std::collections::HashSet;
use std::time::Duration;

const TICKETS_DDL: &str = "CREATE TABLE IF NOT EXISTS tickets (
    id INTEGER PRIMARY KEY,
    ticket_number TEXT NOT NULL UNIQUE
);";

fn store_with_tickets() -> Store {
    let store = Store::open_in_memory().unwrap();
    store.execute(TICKETS_DDL).unwrap();
    store
}

fn insert_ticket(store: &Store, code: &UniqueCode) -> Result<(), StoreError> {
    store.connection().execute(
        "INSERT INTO tickets (ticket_number) VALUES (?1)",
        params![code.to_string()],
    )?;
    Ok(())
}

#[test]
fn first_code_of_the_day_starts_at_one() {
    let store = store_with_tickets();
    let generator = CodeGenerator::new(&store, FakeClock::default());

    let code = generator.next("TKT").unwrap();

    assert_eq!(code.to_string(), "TKT-20260115-001");
}

#[test]
fn next_code_follows_the_highest_issued_today() {
    let store = store_with_tickets();
    store
        .execute(
            "INSERT INTO tickets (ticket_number) VALUES
                ('TKT-20260115-001'), ('TKT-20260115-007'), ('TKT-20260115-003'),
                ('TKT-20260114-042'), ('INS-20260115-090');",
        )
        .unwrap();
    let generator = CodeGenerator::new(&store, FakeClock::default());

    assert_eq!(generator.next("TKT").unwrap().to_string(), "TKT-20260115-008");
    assert_eq!(generator.next("INS").unwrap().to_string(), "INS-20260115-091");
}

#[test]
fn prefix_match_is_case_sensitive() {
    let store = store_with_tickets();
    store
        .execute("INSERT INTO tickets (ticket_number) VALUES ('tkt-20260115-005');")
        .unwrap();
    let generator = CodeGenerator::new(&store, FakeClock::default());

    assert_eq!(generator.next("TKT").unwrap().sequence(), 1);
}

#[test]
fn suffix_grows_past_three_digits() {
    let store = store_with_tickets();
    store
        .execute("INSERT INTO tickets (ticket_number) VALUES ('TKT-20260115-999');")
        .unwrap();
    let generator = CodeGenerator::new(&store, FakeClock::default());

    assert_eq!(generator.next("TKT").unwrap().to_string(), "TKT-20260115-1000");
}

#[test]
fn new_day_restarts_the_series() {
    let store = store_with_tickets();
    let clock = FakeClock::at_date(2026, 3, 31);
    let generator = CodeGenerator::new(&store, clock.clone());

    for _ in 0..3 {
        let code = generator.next("TKT").unwrap();
        insert_ticket(&store, &code).unwrap();
    }
    clock.advance(Duration::from_secs(24 * 60 * 60));

    assert_eq!(generator.next("TKT").unwrap().to_string(), "TKT-20260401-001");
}

#[test]
fn taken_check_matches_the_exact_code() {
    let store = store_with_tickets();
    store
        .execute(
            "INSERT INTO tickets (ticket_number) VALUES
                ('TKT-20260115-001'), ('TKT-20260115-002x');",
        )
        .unwrap();
    let generator = CodeGenerator::new(&store, FakeClock::default());
    let date = DateKey::of(FakeClock::default().now());

    assert!(generator.is_taken(&UniqueCode::new("TKT", date, 1).unwrap()).unwrap());
    assert!(!generator.is_taken(&UniqueCode::new("TKT", date, 2).unwrap()).unwrap());
}

#[test]
fn custom_column_is_scanned() {
    let store = store_with_tickets();
    store
        .execute(
            "CREATE TABLE inspections (id INTEGER PRIMARY KEY, reference TEXT UNIQUE);
             INSERT INTO inspections (reference) VALUES ('INS-20260115-004');",
        )
        .unwrap();
    let generator = CodeGenerator::new(&store, FakeClock::default())
        .for_column(CodeColumn::new("inspections", "reference").unwrap());

    assert_eq!(generator.next("INS").unwrap().to_string(), "INS-20260115-005");
}

#[test]
fn exhausted_attempts_are_reported() {
    let store = store_with_tickets();
    let generator = CodeGenerator::new(&store, FakeClock::default()).max_attempts(3);

    let err = generator
        .issue("TKT", |_| -> Result<(), StoreError> {
            Err(StoreError::UniqueViolation {
                message: "always taken".to_string(),
            })
        })
        .unwrap_err();

    assert!(
        matches!(err, CodeError::Exhausted { attempts: 3, .. }),
        "got {err:?}"
    );
}

#[test]
fn issue_returns_non_unique_errors_unchanged() {
    let store = store_with_tickets();
    let generator = CodeGenerator::new(&store, FakeClock::default());

    let err = generator
        .issue("TKT", |_| -> Result<(), StoreError> {
            Err(StoreError::UnknownCounter("nope".to_string()))
        })
        .unwrap_err();

    assert!(matches!(err, CodeError::Store(StoreError::UnknownCounter(_))));
}

#[test]
fn issue_retries_after_losing_a_race() {
    let store = store_with_tickets();
    let generator = CodeGenerator::new(&store, FakeClock::default());
    let mut raced = false;

    let (code, ()) = generator
        .issue("TKT", |code| {
            if !raced {
                // Another writer claims the candidate first
                raced = true;
                insert_ticket(&store, code)?;
            }
            insert_ticket(&store, code)
        })
        .unwrap();

    assert_eq!(code.to_string(), "TKT-20260115-002");
}

#[yare::parameterized(
    empty       = { "" },
    dash        = { "TK-T" },
    space       = { "TK T" },
    glob_chars  = { "T*" },
    too_long    = { "ABCDEFGHIJKLMNOPQ" },
)]
fn invalid_prefix_is_rejected(prefix: &str) {
    let store = store_with_tickets();
    let generator = CodeGenerator::new(&store, FakeClock::default());

    assert!(matches!(
        generator.next(prefix),
        Err(CodeError::Format(CodeFormatError::InvalidPrefix(_)))
    ));
}

#[test]
fn unsafe_code_column_is_rejected() {
    assert!(CodeColumn::new("tickets; DROP TABLE tickets", "ticket_number").is_err());
    assert!(CodeColumn::new("tickets", "ticket number").is_err());
}

#[test]
fn concurrent_issuers_never_share_a_code() {
    const WORKERS: usize = 50;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keel.db");
    Store::open(&path).unwrap().execute(TICKETS_DDL).unwrap();
    let clock = FakeClock::default();

    let handles: Vec<_> = (0..WORKERS)
        .map(|_| {
            let path = path.clone();
            let clock = clock.clone();
            std::thread::spawn(move || {
                let store = Store::open(&path).unwrap();
                let generator = CodeGenerator::new(&store, clock);
                let (code, ()) = generator
                    .issue("TKT", |code| insert_ticket(&store, code))
                    .unwrap();
                code
            })
        })
        .collect();

    let codes: Vec<UniqueCode> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let distinct: HashSet<String> = codes.iter().map(|c| c.to_string()).collect();
    assert_eq!(distinct.len(), WORKERS);
    let mut suffixes: Vec<u64> = codes.iter().map(|c| c.sequence()).collect();
    suffixes.sort_unstable();
    assert_eq!(suffixes, (1..=WORKERS as u64).collect::<Vec<_>>());
}
