use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use serde_json::{Value, json};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(1);

fn unique_test_home() -> PathBuf {
    let mut path = std::env::temp_dir();
    let stamp = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(value) => value.as_nanos(),
        Err(_) => 0,
    };
    let sequence = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.push(format!(
        "kasa-cli-test-{}-{stamp}-{sequence}",
        std::process::id()
    ));
    path
}

/// Runs `kasa` against `home` and returns (success, exit code, stdout).
fn run_cli_in_home(home: &Path, args: &[&str]) -> (bool, Option<i32>, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_kasa"))
        .args(args)
        .env("KASA_HOME", home)
        .env_remove("RUST_LOG")
        .output();
    assert!(output.is_ok());
    if let Ok(result) = output {
        let stdout = String::from_utf8(result.stdout);
        assert!(stdout.is_ok());
        if let Ok(stdout_text) = stdout {
            return (result.status.success(), result.status.code(), stdout_text);
        }
    }
    (false, None, String::new())
}

fn parse_json(body: &str) -> Value {
    let parsed = serde_json::from_str::<Value>(body);
    assert!(parsed.is_ok(), "not JSON: {body}");
    parsed.unwrap_or(Value::Null)
}

fn assert_json_error_contract(body: &str, code: &str) -> Value {
    let payload = parse_json(body);
    assert_eq!(payload["error"]["code"], Value::String(code.to_string()));
    assert!(payload["error"]["message"].is_string());
    assert!(payload["error"]["recovery_steps"].is_array());
    payload
}

#[test]
fn bare_invocation_prints_short_help() {
    let home = unique_test_home();
    let (ok, _, body) = run_cli_in_home(&home, &[]);
    assert!(ok);
    assert!(body.starts_with("Kasa - small-business income and expense ledger"));
    assert!(body.contains("kasa report"));
}

#[test]
fn top_level_help_lists_every_command() {
    let home = unique_test_home();
    let (ok, _, body) = run_cli_in_home(&home, &["--help"]);
    assert!(ok);
    for command in [
        "kasa income add",
        "kasa expense add",
        "kasa income list",
        "kasa expense list",
        "kasa report",
        "kasa watch",
        "kasa categories",
        "kasa db schema",
    ] {
        assert!(body.contains(command), "help is missing `{command}`");
    }
}

#[test]
fn add_then_list_round_trips_through_json() {
    let home = unique_test_home();
    let (ok, _, body) = run_cli_in_home(
        &home,
        &[
            "income",
            "add",
            "--description",
            "Consulting",
            "--amount",
            "500",
            "--category",
            "Service",
            "--date",
            "2024-01-10",
            "--json",
        ],
    );
    assert!(ok, "add failed: {body}");
    let added = parse_json(&body);
    assert_eq!(added["ok"], json!(true));
    assert_eq!(added["command"], json!("income add"));
    let id = added["data"]["entry"]["id"].clone();
    assert!(id.is_i64());

    let (ok, _, body) = run_cli_in_home(&home, &["income", "list", "--json"]);
    assert!(ok);
    let listed = parse_json(&body);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    assert_eq!(listed[0]["id"], id);
    assert_eq!(listed[0]["description"], json!("Consulting"));
    assert_eq!(listed[0]["amount"], json!(500.0));
    assert_eq!(listed[0]["category"], json!("Service"));
    assert_eq!(listed[0]["date"], json!("2024-01-10"));

    let (ok, _, body) = run_cli_in_home(&home, &["expense", "list", "--json"]);
    assert!(ok);
    assert_eq!(parse_json(&body), json!([]));
}

#[test]
fn form_add_defaults_to_today_and_general() {
    let home = unique_test_home();
    let (ok, _, body) = run_cli_in_home(
        &home,
        &[
            "expense",
            "add",
            "--description",
            "Bulbs",
            "--amount",
            "12,50",
            "--json",
        ],
    );
    assert!(ok, "add failed: {body}");
    let added = parse_json(&body);
    assert_eq!(added["data"]["entry"]["category"], json!("General"));
    assert_eq!(added["data"]["entry"]["amount"], json!(12.5));
    assert_eq!(
        added["data"]["entry"]["date"].as_str().map(str::len),
        Some(10)
    );
}

#[test]
fn rejected_add_exits_one_and_writes_nothing() {
    let home = unique_test_home();
    let (ok, code, body) = run_cli_in_home(
        &home,
        &[
            "expense",
            "add",
            "--description",
            "Rent",
            "--amount",
            "-300",
            "--json",
        ],
    );
    assert!(!ok);
    assert_eq!(code, Some(1));
    let payload = assert_json_error_contract(&body, "validation_failed");
    assert_eq!(payload["data"]["field"], json!("amount"));

    let (ok, _, body) = run_cli_in_home(&home, &["expense", "list", "--json"]);
    assert!(ok);
    assert_eq!(parse_json(&body), json!([]));
}

#[test]
fn rejected_add_text_names_the_field() {
    let home = unique_test_home();
    let (ok, _, body) = run_cli_in_home(
        &home,
        &["income", "add", "--description", "", "--amount", "10"],
    );
    assert!(!ok);
    assert!(body.contains("That entry was not saved."));
    assert!(body.contains("  Error:    validation_failed"));
    assert!(body.contains("  Field:    description"));
    assert!(body.contains("What to do next:"));
}

#[test]
fn report_matches_the_income_and_expense_scenario() {
    let home = unique_test_home();
    for args in [
        [
            "income",
            "add",
            "--description",
            "Consulting",
            "--amount",
            "500",
            "--category",
            "Service",
        ],
        [
            "expense",
            "add",
            "--description",
            "Shop rent",
            "--amount",
            "300",
            "--category",
            "Rent",
        ],
    ] {
        let (ok, _, body) = run_cli_in_home(&home, &args);
        assert!(ok, "add failed: {body}");
    }

    let (ok, _, body) = run_cli_in_home(&home, &["report", "--json"]);
    assert!(ok);
    let report = parse_json(&body);
    assert_eq!(report["total_income"], json!(500.0));
    assert_eq!(report["total_expense"], json!(300.0));
    assert_eq!(report["net"], json!(200.0));
    assert_eq!(report["income_by_category"], json!({"Service": 500.0}));
    assert_eq!(report["expense_by_category"], json!({"Rent": 300.0}));
    assert_eq!(
        report["range_echo"],
        json!({"start": "All time", "end": "All time"})
    );

    let (ok, _, text) = run_cli_in_home(&home, &["report"]);
    assert!(ok);
    assert!(text.contains("Report for All time to All time"));
    assert!(text.contains("200.00"));
}

#[test]
fn report_with_inverted_range_is_an_invalid_argument() {
    let home = unique_test_home();
    let (ok, code, body) = run_cli_in_home(
        &home,
        &["report", "--from", "2024-03-01", "--to", "2024-01-01", "--json"],
    );
    assert!(!ok);
    assert_eq!(code, Some(1));
    assert_json_error_contract(&body, "invalid_argument");
}

#[test]
fn malformed_report_date_is_a_parse_error_with_hint() {
    let home = unique_test_home();
    let (ok, code, body) = run_cli_in_home(&home, &["report", "--from", "01/02/2024", "--json"]);
    assert!(!ok);
    assert_eq!(code, Some(1));
    let payload = assert_json_error_contract(&body, "invalid_argument");
    let steps = payload["error"]["recovery_steps"].to_string();
    assert!(steps.contains("kasa report --help"));
}

#[test]
fn categories_merge_suggested_and_used_labels() {
    let home = unique_test_home();
    let (ok, _, body) = run_cli_in_home(
        &home,
        &[
            "expense",
            "add",
            "--description",
            "Bus",
            "--amount",
            "3",
            "--category",
            "Transport",
        ],
    );
    assert!(ok, "add failed: {body}");

    let (ok, _, body) = run_cli_in_home(&home, &["categories", "expense", "--json"]);
    assert!(ok);
    let payload = parse_json(&body);
    assert_eq!(
        payload["data"]["suggested"],
        json!(["Rent", "Electricity", "Water", "Staff", "Other"])
    );
    assert_eq!(payload["data"]["used"], json!(["Transport"]));
}

#[test]
fn db_schema_reports_tables_and_path() {
    let home = unique_test_home();
    let (ok, _, body) = run_cli_in_home(&home, &["db", "schema", "--json"]);
    assert!(ok);
    let payload = parse_json(&body);
    assert_eq!(payload["command"], json!("db schema"));
    assert_eq!(payload["data"]["schema_version"], json!("v1"));
    let names: Vec<&str> = payload["data"]["tables"]
        .as_array()
        .map(|tables| tables.iter().filter_map(|table| table["name"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(names, vec!["income_entries", "expense_entries"]);
    assert!(
        payload["data"]["db_path"]
            .as_str()
            .is_some_and(|path| path.ends_with("ledger.db"))
    );
}

#[test]
fn watch_with_count_prints_one_snapshot_and_exits() {
    let home = unique_test_home();
    let (ok, _, body) = run_cli_in_home(
        &home,
        &[
            "income",
            "add",
            "--description",
            "Sale",
            "--amount",
            "40",
            "--date",
            "2024-04-01",
        ],
    );
    assert!(ok, "add failed: {body}");

    let (ok, _, body) = run_cli_in_home(
        &home,
        &["watch", "--interval-secs", "1", "--count", "2", "--json"],
    );
    assert!(ok);
    let lines: Vec<&str> = body.lines().filter(|line| !line.is_empty()).collect();
    // The second check sees no change and prints nothing.
    assert_eq!(lines.len(), 1);
    let snapshot = parse_json(lines[0]);
    assert_eq!(snapshot["command"], json!("watch"));
    assert_eq!(snapshot["data"]["report"]["total_income"], json!(40.0));
    assert_eq!(snapshot["data"]["fingerprint"]["income_count"], json!(1));
    assert_eq!(
        snapshot["data"]["recent_income"][0]["description"],
        json!("Sale")
    );
}

#[test]
fn closing_stdout_early_does_not_panic() {
    let home = unique_test_home();
    for _ in 0..3 {
        let (ok, _, _) = run_cli_in_home(
            &home,
            &["income", "add", "--description", "Sale", "--amount", "1"],
        );
        assert!(ok);
    }

    let child = Command::new(env!("CARGO_BIN_EXE_kasa"))
        .args(["income", "list"])
        .env("KASA_HOME", &home)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn();
    assert!(child.is_ok());
    if let Ok(mut producer) = child {
        if let Some(stdout_pipe) = producer.stdout.take() {
            let mut reader = BufReader::new(stdout_pipe);
            let mut first_line = String::new();
            assert!(reader.read_line(&mut first_line).is_ok());
            assert!(!first_line.is_empty());
        }

        let output = producer.wait_with_output();
        assert!(output.is_ok());
        if let Ok(result) = output {
            assert!(result.status.success());
            let stderr = String::from_utf8_lossy(&result.stderr);
            assert!(!stderr.contains("panicked"));
        }
    }
}

#[test]
fn watch_exits_once_its_reader_closes() {
    let home = unique_test_home();
    let (ok, _, _) = run_cli_in_home(
        &home,
        &["income", "add", "--description", "Sale", "--amount", "1"],
    );
    assert!(ok);

    let child = Command::new(env!("CARGO_BIN_EXE_kasa"))
        .args(["watch", "--interval-secs", "1", "--json"])
        .env("KASA_HOME", &home)
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn();
    assert!(child.is_ok());
    if let Ok(mut watcher) = child {
        if let Some(stdout_pipe) = watcher.stdout.take() {
            let mut reader = BufReader::new(stdout_pipe);
            let mut first_line = String::new();
            assert!(reader.read_line(&mut first_line).is_ok());
            assert_eq!(parse_json(&first_line)["command"], json!("watch"));
        }

        // The next changed snapshot is written into a pipe nobody reads.
        let (ok, _, _) = run_cli_in_home(
            &home,
            &["expense", "add", "--description", "Rent", "--amount", "2"],
        );
        assert!(ok);

        let deadline = Instant::now() + Duration::from_secs(15);
        let mut status = None;
        while Instant::now() < deadline {
            match watcher.try_wait() {
                Ok(Some(exit)) => {
                    status = Some(exit);
                    break;
                }
                Ok(None) => thread::sleep(Duration::from_millis(100)),
                Err(_) => break,
            }
        }
        if status.is_none() {
            let _ = watcher.kill();
            let _ = watcher.wait();
        }

        assert!(status.is_some(), "watch kept running after stdout closed");
        if let Some(exit) = status {
            assert!(exit.success());
        }
    }
}
