use kasa_client::ledger::date::{BoundNames, build_range};
use kasa_client::ledger::report::{by_category, totals};
use kasa_client::ledger::{
    AmountInput, DateRange, EntryDefaults, EntryKind, Ledger, RawEntry, validate_entry,
};
use tempfile::tempdir;

fn add(ledger: &Ledger, kind: EntryKind, date: &str, amount: &str, category: &str) {
    let entry = validate_entry(
        RawEntry {
            date: Some(date.to_string()),
            description: format!("{category} on {date}"),
            amount: AmountInput::from(amount),
            category: Some(category.to_string()),
        },
        &EntryDefaults::for_tools(),
    );
    assert!(entry.is_ok());
    if let Ok(entry) = entry {
        assert!(ledger.add(kind, &entry).is_ok());
    }
}

#[test]
fn empty_ledger_totals_are_zero_not_null() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp_dir) = temp {
        let ledger = Ledger::open(Some(temp_dir.path()));
        assert!(ledger.is_ok());
        if let Ok(ledger) = ledger {
            let result = totals(&ledger, &DateRange::all_time());
            assert!(result.is_ok());
            if let Ok(summary) = result {
                assert_eq!(summary.total_income, 0.0);
                assert_eq!(summary.total_expense, 0.0);
                assert_eq!(summary.net, 0.0);
            }

            let groups = by_category(&ledger, EntryKind::Income, &DateRange::all_time());
            assert!(groups.is_ok_and(|groups| groups.is_empty()));
        }
    }
}

#[test]
fn income_and_expense_scenario_nets_out() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp_dir) = temp {
        let ledger = Ledger::open(Some(temp_dir.path()));
        assert!(ledger.is_ok());
        if let Ok(ledger) = ledger {
            add(&ledger, EntryKind::Income, "2024-01-10", "500", "Service");
            add(&ledger, EntryKind::Expense, "2024-01-12", "300", "Rent");

            let result = totals(&ledger, &DateRange::all_time());
            assert!(result.is_ok());
            if let Ok(summary) = result {
                assert_eq!(summary.total_income, 500.0);
                assert_eq!(summary.total_expense, 300.0);
                assert_eq!(summary.net, 200.0);
            }

            let income = by_category(&ledger, EntryKind::Income, &DateRange::all_time());
            assert_eq!(income.ok().and_then(|groups| groups.get("Service")), Some(500.0));
            let expense = by_category(&ledger, EntryKind::Expense, &DateRange::all_time());
            assert_eq!(expense.ok().and_then(|groups| groups.get("Rent")), Some(300.0));
        }
    }
}

#[test]
fn comma_and_dot_amounts_aggregate_identically() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp_dir) = temp {
        let ledger = Ledger::open(Some(temp_dir.path()));
        assert!(ledger.is_ok());
        if let Ok(ledger) = ledger {
            add(&ledger, EntryKind::Income, "2024-01-10", "1.234,56", "Sales");
            add(&ledger, EntryKind::Expense, "2024-01-10", "1234.56", "Staff");

            let result = totals(&ledger, &DateRange::all_time());
            assert!(result.is_ok());
            if let Ok(summary) = result {
                assert_eq!(summary.total_income, 1234.56);
                assert_eq!(summary.total_expense, 1234.56);
                assert_eq!(summary.net, 0.0);
            }
        }
    }
}

#[test]
fn by_category_sums_match_totals_and_repeat_identically() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp_dir) = temp {
        let ledger = Ledger::open(Some(temp_dir.path()));
        assert!(ledger.is_ok());
        if let Ok(ledger) = ledger {
            add(&ledger, EntryKind::Expense, "2024-01-01", "100", "Water");
            add(&ledger, EntryKind::Expense, "2024-01-02", "250.25", "Rent");
            add(&ledger, EntryKind::Expense, "2024-01-03", "149,75", "Electricity");
            add(&ledger, EntryKind::Expense, "2024-01-04", "49,75", "Water");

            let range = DateRange::all_time();
            let first = by_category(&ledger, EntryKind::Expense, &range);
            let second = by_category(&ledger, EntryKind::Expense, &range);
            assert!(first.is_ok() && second.is_ok());
            if let (Ok(first), Ok(second)) = (first, second) {
                assert_eq!(first, second);

                let order: Vec<&str> = first.iter().map(|item| item.category.as_str()).collect();
                // Equal sums fall back to category order.
                assert_eq!(order, vec!["Rent", "Electricity", "Water"]);

                let grouped_sum: f64 = first.iter().map(|item| item.total).sum();
                let summary = totals(&ledger, &range);
                assert!(summary.is_ok());
                if let Ok(summary) = summary {
                    assert!((grouped_sum - summary.total_expense).abs() < 0.005);
                }
            }
        }
    }
}

#[test]
fn date_range_bounds_are_inclusive_and_ignore_time_of_day() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp_dir) = temp {
        let ledger = Ledger::open(Some(temp_dir.path()));
        assert!(ledger.is_ok());
        if let Ok(ledger) = ledger {
            add(&ledger, EntryKind::Income, "2024-01-05", "100", "Sales");
            add(&ledger, EntryKind::Income, "2024-02-05 18:30:00", "200", "Sales");
            add(&ledger, EntryKind::Income, "2024-03-05", "400", "Sales");

            let february = build_range(
                Some("2024-02-01"),
                Some("2024-02-29"),
                BoundNames::CLI,
                "report",
            );
            assert!(february.is_ok());
            if let Ok(range) = february {
                let summary = totals(&ledger, &range);
                assert_eq!(summary.ok().map(|s| s.total_income), Some(200.0));
            }

            let single_day = build_range(
                Some("2024-02-05"),
                Some("2024-02-05"),
                BoundNames::CLI,
                "report",
            );
            assert!(single_day.is_ok());
            if let Ok(range) = single_day {
                let summary = totals(&ledger, &range);
                assert_eq!(summary.ok().map(|s| s.total_income), Some(200.0));
            }

            let open_start = build_range(None, Some("2024-02-05"), BoundNames::CLI, "report");
            assert!(open_start.is_ok());
            if let Ok(range) = open_start {
                let summary = totals(&ledger, &range);
                assert_eq!(summary.ok().map(|s| s.total_income), Some(300.0));
            }

            let open_end = build_range(Some("2024-02-06"), None, BoundNames::CLI, "report");
            assert!(open_end.is_ok());
            if let Ok(range) = open_end {
                let summary = totals(&ledger, &range);
                assert_eq!(summary.ok().map(|s| s.total_income), Some(400.0));
            }
        }
    }
}
