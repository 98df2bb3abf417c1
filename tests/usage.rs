// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use chrono::{Datelike, Local, TimeZone, Utc};

use gitmit::services::usage::{FileLedger, UsageEntry, UsageLedger};

fn entry_line(model: &str, year: i32, month: u32, tokens: u64) -> String {
    let entry = UsageEntry {
        timestamp: Utc.with_ymd_and_hms(year, month, 15, 12, 0, 0).unwrap(),
        year,
        month,
        tokens_used: tokens,
        model: model.into(),
    };
    serde_json::to_string(&entry).unwrap()
}

#[test]
fn missing_ledger_counts_zero() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = FileLedger::new(dir.path().join("usage.jsonl"));
    assert_eq!(ledger.current_month_tokens_used("google/gemini").unwrap(), 0);
    assert!(!ledger.path().exists());
}

#[test]
fn start_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/data/usage.jsonl");
    let ledger = FileLedger::new(&path);

    ledger.start().unwrap();
    ledger.start().unwrap();
    assert!(path.exists());
}

#[test]
fn totals_are_per_model() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = FileLedger::new(dir.path().join("usage.jsonl"));

    ledger.insert_token_usage(100, "google/gemini-2.0-flash").unwrap();
    ledger.insert_token_usage(250, "google/gemini-2.0-flash").unwrap();
    ledger
        .insert_token_usage(40, "openrouter/anthropic/claude-3.5-sonnet")
        .unwrap();

    assert_eq!(
        ledger
            .current_month_tokens_used("google/gemini-2.0-flash")
            .unwrap(),
        350
    );
    assert_eq!(
        ledger
            .current_month_tokens_used("openrouter/anthropic/claude-3.5-sonnet")
            .unwrap(),
        40
    );
    assert_eq!(ledger.current_month_tokens_used("google/other").unwrap(), 0);
}

#[test]
fn other_months_are_excluded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("usage.jsonl");
    let lines = [
        entry_line("google/gemini", 2024, 1, 1000),
        entry_line("google/gemini", 2024, 2, 20),
        entry_line("google/gemini", 2023, 1, 5),
    ];
    std::fs::write(&path, lines.join("\n") + "\n").unwrap();

    let ledger = FileLedger::new(&path);
    assert_eq!(ledger.tokens_used_in("google/gemini", 2024, 1).unwrap(), 1000);
    assert_eq!(ledger.tokens_used_in("google/gemini", 2024, 2).unwrap(), 20);
    assert_eq!(ledger.tokens_used_in("google/gemini", 2024, 3).unwrap(), 0);
}

#[test]
fn malformed_lines_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("usage.jsonl");
    let now = Local::now();
    let content = format!(
        "{}\nnot json\n\n{{\"model\": 1}}\n{}\n",
        entry_line("ollama/x", now.year(), now.month(), 7),
        entry_line("ollama/x", now.year(), now.month(), 3),
    );
    std::fs::write(&path, content).unwrap();

    let ledger = FileLedger::new(&path);
    assert_eq!(ledger.current_month_tokens_used("ollama/x").unwrap(), 10);
}

#[test]
fn entries_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("usage.jsonl");

    {
        let ledger = FileLedger::new(&path);
        ledger.insert_token_usage(12, "google/gemini").unwrap();
        ledger.close().unwrap();
        // closing twice is harmless
        ledger.close().unwrap();
    }

    let ledger = FileLedger::new(&path);
    ledger.insert_token_usage(30, "google/gemini").unwrap();
    assert_eq!(ledger.current_month_tokens_used("google/gemini").unwrap(), 42);

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 2);
}

#[test]
fn entry_layout() {
    let line = entry_line("google/gemini", 2024, 3, 9);
    let value: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(value["year"], 2024);
    assert_eq!(value["month"], 3);
    assert_eq!(value["tokens_used"], 9);
    assert_eq!(value["model"], "google/gemini");
    assert_eq!(value["timestamp"], "2024-03-15T12:00:00Z");
}
