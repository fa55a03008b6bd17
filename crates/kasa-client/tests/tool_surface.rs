use kasa_client::ToolSurface;
use kasa_client::ledger::{AmountInput, DateStamp, EntryDefaults, Ledger};
use kasa_client::tools::{AddEntryRequest, ListEntriesRequest, ReportRequest};
use serde_json::{Value, json};
use tempfile::tempdir;

fn add_request(description: &str, amount: AmountInput, category: Option<&str>) -> AddEntryRequest {
    AddEntryRequest {
        description: description.to_string(),
        amount,
        category: category.map(str::to_string),
        date: None,
    }
}

fn with_surface(test: impl FnOnce(ToolSurface)) {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp_dir) = temp {
        let ledger = Ledger::open(Some(temp_dir.path()));
        assert!(ledger.is_ok());
        if let Ok(ledger) = ledger {
            test(ToolSurface::new(ledger));
        }
    }
}

#[test]
fn add_income_returns_the_stored_record_with_defaults() {
    with_surface(|tools| {
        let record = tools.add_income(add_request("Consulting", AmountInput::from(500.0), None));
        assert!(record.get("error").is_none(), "unexpected error: {record}");
        assert_eq!(record["description"], json!("Consulting"));
        assert_eq!(record["amount"], json!(500.0));
        assert_eq!(record["category"], json!("General"));
        assert!(record["id"].is_i64());
        assert_eq!(record["date"].as_str().map(str::len), Some(19));
        assert!(record["created_at"].is_string());
    });
}

#[test]
fn rejected_add_is_an_error_value_and_stores_nothing() {
    with_surface(|tools| {
        let rejected = tools.add_expense(add_request("Rent", AmountInput::from("-300"), None));
        assert!(rejected["error"].is_string());

        let empty = tools.add_expense(add_request("", AmountInput::from(300.0), None));
        assert!(empty["error"].is_string());

        let bad_date = tools.add_expense(AddEntryRequest {
            date: Some("yesterday".to_string()),
            ..add_request("Rent", AmountInput::from(300.0), None)
        });
        assert!(bad_date["error"].is_string());

        let listed = tools.list_expense(ListEntriesRequest::default());
        assert_eq!(listed, json!([]));
    });
}

#[test]
fn list_tools_filter_by_exact_category() {
    with_surface(|tools| {
        let first = tools.add_income(add_request("Shop", AmountInput::from(10.0), Some("Sales")));
        let second = tools.add_income(add_request("Fix", AmountInput::from(20.0), Some("Service")));
        assert!(first.get("error").is_none() && second.get("error").is_none());

        let sales = tools.list_income(ListEntriesRequest {
            category: Some("Sales".to_string()),
        });
        let rows = sales.as_array().cloned().unwrap_or_default();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["description"], json!("Shop"));

        let all = tools.list_income(ListEntriesRequest::default());
        assert_eq!(all.as_array().map(Vec::len), Some(2));
    });
}

#[test]
fn report_tool_echoes_range_and_orders_categories() {
    with_surface(|tools| {
        let dated = |description: &str, amount: f64, category: &str, date: &str| AddEntryRequest {
            description: description.to_string(),
            amount: AmountInput::from(amount),
            category: Some(category.to_string()),
            date: Some(date.to_string()),
        };
        let writes = [
            tools.add_income(dated("Jan sale", 100.0, "Sales", "2024-01-05")),
            tools.add_income(dated("Feb sale", 200.0, "Sales", "2024-02-05")),
            tools.add_income(dated("Feb fix", 250.0, "Service", "2024-02-10")),
            tools.add_expense(dated("Feb rent", 300.0, "Rent", "2024-02-01")),
        ];
        assert!(writes.iter().all(|value| value.get("error").is_none()));

        let report = tools.report(ReportRequest {
            start_date: Some("2024-02-01".to_string()),
            end_date: Some("2024-02-29".to_string()),
        });
        assert_eq!(report["total_income"], json!(450.0));
        assert_eq!(report["total_expense"], json!(300.0));
        assert_eq!(report["net"], json!(150.0));
        assert_eq!(
            report["range_echo"],
            json!({ "start": "2024-02-01", "end": "2024-02-29" })
        );

        let keys: Vec<&String> = report["income_by_category"]
            .as_object()
            .map(|groups| groups.keys().collect())
            .unwrap_or_default();
        assert_eq!(keys, vec!["Service", "Sales"]);

        let everything = tools.report(ReportRequest::default());
        assert_eq!(everything["total_income"], json!(550.0));
        assert_eq!(
            everything["range_echo"],
            json!({ "start": "All time", "end": "All time" })
        );
    });
}

#[test]
fn report_tool_rejects_inverted_range_as_error_value() {
    with_surface(|tools| {
        let report = tools.report(ReportRequest {
            start_date: Some("2024-03-01".to_string()),
            end_date: Some("2024-01-01".to_string()),
        });
        assert!(report["error"].is_string());
        assert!(report.get("total_income").is_none());
    });
}

#[test]
fn surface_defaults_are_configurable() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp_dir) = temp {
        let ledger = Ledger::open(Some(temp_dir.path()));
        assert!(ledger.is_ok());
        if let Ok(ledger) = ledger {
            let tools = ToolSurface::with_defaults(
                ledger,
                EntryDefaults {
                    category: "Misc".to_string(),
                    date: DateStamp::Today,
                },
            );
            let record: Value =
                tools.add_expense(add_request("Snacks", AmountInput::from("12,5"), None));
            assert_eq!(record["category"], json!("Misc"));
            assert_eq!(record["amount"], json!(12.5));
            assert_eq!(record["date"].as_str().map(str::len), Some(10));
        }
    }
}

#[test]
fn empty_string_parameters_count_as_omitted() {
    with_surface(|tools| {
        let first = tools.add_income(add_request("Shop", AmountInput::from(10.0), Some("Sales")));
        let second = tools.add_income(add_request("Fix", AmountInput::from(20.0), Some("Service")));
        assert!(first.get("error").is_none() && second.get("error").is_none());

        let listed = tools.list_income(ListEntriesRequest {
            category: Some(String::new()),
        });
        assert_eq!(listed.as_array().map(Vec::len), Some(2));

        let report = tools.report(ReportRequest {
            start_date: Some(String::new()),
            end_date: Some(String::new()),
        });
        assert!(report.get("error").is_none(), "unexpected error: {report}");
        assert_eq!(report["total_income"], json!(30.0));
        assert_eq!(
            report["range_echo"],
            json!({ "start": "All time", "end": "All time" })
        );

        let half_open = tools.report(ReportRequest {
            start_date: Some(String::new()),
            end_date: Some("2999-12-31".to_string()),
        });
        assert_eq!(half_open["total_income"], json!(30.0));
        assert_eq!(
            half_open["range_echo"],
            json!({ "start": "All time", "end": "2999-12-31" })
        );
    });
}

#[test]
fn report_tool_errors_name_the_tool_parameters() {
    with_surface(|tools| {
        let inverted = tools.report(ReportRequest {
            start_date: Some("2024-03-01".to_string()),
            end_date: Some("2024-01-01".to_string()),
        });
        let message = inverted["error"].as_str().unwrap_or_default();
        assert!(message.contains("`start_date`"), "message: {message}");
        assert!(message.contains("`end_date`"), "message: {message}");

        let malformed = tools.report(ReportRequest {
            start_date: Some("01/03/2024".to_string()),
            end_date: None,
        });
        let message = malformed["error"].as_str().unwrap_or_default();
        assert!(message.starts_with("`start_date`"), "message: {message}");
    });
}
