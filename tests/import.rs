use pretty_assertions::assert_eq;
use roster_import::roster::IMPORT_DESCRIPTION;
use roster_import::{
    import_roster, AcceptedEntry, DateContext, ImportConfig, ImportError, Page, ShiftType,
    StaffDirectory,
};

mod common;
use common::{date, PageBuilder};

#[test]
fn test_single_row_page_yields_one_entry() {
    let page = PageBuilder::new(1)
        .row(100.0, &["01/07/2025", "Tuesday", "4-10", "NARAYYA"])
        .build();

    let import = import_roster(&[page], &common::registry(), &ImportConfig::default()).unwrap();

    assert_eq!(
        import.entries,
        vec![AcceptedEntry {
            date: date(2025, 7, 1),
            shift_type: ShiftType::EveningShift,
            assigned_name: "NARAYYA".to_string(),
            change_description: IMPORT_DESCRIPTION.to_string(),
        }]
    );
    assert_eq!(import.trace.pages.len(), 1);
    assert_eq!(import.trace.pages[0].chosen, "list");
    assert_eq!(import.trace.date_context, Some(DateContext::new(2025, 7)));
}

fn narayya_evening() -> Vec<AcceptedEntry> {
    vec![AcceptedEntry {
        date: date(2025, 7, 1),
        shift_type: ShiftType::EveningShift,
        assigned_name: "NARAYYA".to_string(),
        change_description: IMPORT_DESCRIPTION.to_string(),
    }]
}

#[test]
fn test_labelled_shift_in_a_row() {
    let page = PageBuilder::new(1)
        .text("01/07/2025", 10.0, 100.0)
        .text("Evening Shift (4-10)", 150.0, 100.0)
        .text("NARAYYA", 300.0, 100.0)
        .build();

    let import = import_roster(&[page], &common::registry(), &ImportConfig::default()).unwrap();

    assert_eq!(import.entries, narayya_evening());
    assert_eq!(import.trace.page(1).map(|p| p.chosen), Some("list"));
}

#[test]
fn test_labelled_shift_in_a_grid() {
    let page = PageBuilder::new(1)
        .text("01/07/2025", 200.0, 50.0)
        .text("Evening Shift (4-10)", 10.0, 100.0)
        .text("NARAYYA", 200.0, 100.0)
        .build();

    let import = import_roster(&[page], &common::registry(), &ImportConfig::default()).unwrap();

    assert_eq!(import.entries, narayya_evening());
    assert_eq!(import.trace.page(1).map(|p| p.chosen), Some("box"));
    assert!(import.trace.page(2).is_none());
}

#[test]
fn test_fragment_without_position_does_not_spoil_the_page() {
    let page = PageBuilder::new(1)
        .text("01/07/2025", 200.0, 50.0)
        .text("Evening Shift (4-10)", 10.0, 100.0)
        .text("NARAYYA", 200.0, 100.0)
        .text("junk", f32::NAN, f32::NAN)
        .build();

    let import = import_roster(&[page], &common::registry(), &ImportConfig::default()).unwrap();

    assert_eq!(import.entries, narayya_evening());
    assert_eq!(import.trace.pages[0].skipped_fragments, 1);
}

#[test]
fn test_empty_document_is_no_entries_found() {
    let err = import_roster(&[], &common::registry(), &ImportConfig::default()).unwrap_err();
    assert!(err.is_no_entries());
}

#[test]
fn test_unresolvable_pages_report_their_trace() {
    let pages = vec![
        PageBuilder::new(1).row(100.0, &["Roster for July"]).build(),
        PageBuilder::new(2)
            .row(100.0, &["01/07/2025", "Tuesday", "4-10", "SOMEONE ELSE"])
            .build(),
    ];

    let err = import_roster(&pages, &common::registry(), &ImportConfig::default()).unwrap_err();

    match err {
        ImportError::NoEntriesFound { trace } => {
            assert_eq!(trace.pages.len(), 2);
            assert_eq!(trace.dropped.len(), 2);
        }
        other => panic!("expected NoEntriesFound, got {other:?}"),
    }
}

#[test]
fn test_pages_are_reconciled_in_order() {
    let pages = vec![
        PageBuilder::new(1)
            .row(100.0, &["01/07/2025", "Tuesday", "4-10", "NARAYYA", "", "", "Page one"])
            .build(),
        PageBuilder::new(2)
            .row(100.0, &["01/07/2025", "Tuesday", "4-10", "NARAYYA", "", "", "Page two"])
            .row(130.0, &["02/07/2025", "Wednesday", "9-4", "RAMESH"])
            .build(),
    ];

    let import = import_roster(&pages, &common::registry(), &ImportConfig::default()).unwrap();

    assert_eq!(import.entries.len(), 2);
    assert_eq!(
        import.entries[0].change_description,
        "Special Date: Page one; Imported from PDF"
    );
    assert_eq!(import.entries[1].assigned_name, "RAMESH");
    assert_eq!(import.trace.duplicates_removed, 1);
}

#[test]
fn test_parallel_pages_match_sequential() {
    let pages: Vec<Page> = (1..=6u32)
        .map(|day| {
            let date = format!("{day:02}/07/2025");
            PageBuilder::new(day)
                .row(100.0, &[date.as_str(), "", "4-10", "NARAYYA"])
                .row(130.0, &[date.as_str(), "", "9-4", "RAMESH"])
                .build()
        })
        .collect();
    let registry = common::registry();

    let sequential = import_roster(&pages, &registry, &ImportConfig::default()).unwrap();
    let parallel = import_roster(
        &pages,
        &registry,
        &ImportConfig {
            parallel_pages: true,
            ..ImportConfig::default()
        },
    )
    .unwrap();

    assert_eq!(parallel.entries, sequential.entries);
    assert_eq!(parallel.trace.pages, sequential.trace.pages);
    assert_eq!(sequential.entries.len(), 12);
}

#[test]
fn test_day_only_dates_use_the_configured_month() {
    let page = PageBuilder::new(1)
        .row(100.0, &["5", "Sat", "Morning", "RAMESH"])
        .row(130.0, &["5", "Sat", "Evening", "NARAYYA"])
        .build();
    let config = ImportConfig::default().with_date_context(DateContext::new(2025, 7));

    let import = import_roster(&[page], &common::registry(), &config).unwrap();

    // A Saturday with a morning shift keeps its evening shift
    let shifts: Vec<ShiftType> = import.entries.iter().map(|e| e.shift_type).collect();
    assert_eq!(shifts, vec![ShiftType::MorningShift, ShiftType::EveningShift]);
    assert!(import.entries.iter().all(|e| e.date == date(2025, 7, 5)));
}

#[test]
fn test_day_only_dates_without_context_are_unresolved() {
    let page = PageBuilder::new(1)
        .row(100.0, &["5", "Sat", "Morning", "RAMESH"])
        .build();

    let err = import_roster(&[page], &common::registry(), &ImportConfig::default()).unwrap_err();
    assert!(err.is_no_entries());
}

#[test]
fn test_inferred_context_completes_day_only_dates() {
    let page = PageBuilder::new(1)
        .row(50.0, &["Roster 01/07/2025"])
        .row(100.0, &["7", "Mon", "4-10", "NARAYYA"])
        .build();

    let import = import_roster(&[page], &common::registry(), &ImportConfig::default()).unwrap();

    assert_eq!(import.entries[0].date, date(2025, 7, 7));
    assert_eq!(import.trace.date_context, Some(DateContext::new(2025, 7)));
}

#[test]
fn test_invalid_config_is_rejected_before_import() {
    let page = PageBuilder::new(1)
        .row(100.0, &["01/07/2025", "Tuesday", "4-10", "NARAYYA"])
        .build();
    let config = ImportConfig {
        row_tolerance: -1.0,
        ..ImportConfig::default()
    };

    let err = import_roster(&[page], &common::registry(), &config).unwrap_err();
    assert!(matches!(err, ImportError::Config(_)));
}

#[test]
fn test_config_from_json_fills_defaults() {
    let config = ImportConfig::from_json(r#"{"row_tolerance": 20, "fuzzy_name_threshold": null}"#)
        .unwrap();

    assert_eq!(config.row_tolerance, 20.0);
    assert_eq!(config.fuzzy_name_threshold, None);
    assert_eq!(config.date_search_dx, 50.0);
    assert!(config.merge_continuation_rows);

    let config =
        ImportConfig::from_json(r#"{"date_context": {"year": 2025, "month": 7}}"#).unwrap();
    assert_eq!(config.date_context, Some(DateContext::new(2025, 7)));
}

#[test]
fn test_config_validation() {
    assert!(ImportConfig::from_json(r#"{"fuzzy_name_threshold": 1.5}"#).is_err());
    assert!(ImportConfig::from_json(r#"{"date_context": {"year": 2025, "month": 13}}"#).is_err());
    assert!(ImportConfig::from_json(r#"{"shift_search_dy": -3}"#).is_err());
    assert!(ImportConfig::default().validate().is_ok());
}

#[test]
fn test_month_argument_parsing() {
    assert_eq!(DateContext::parse("2025-07"), Some(DateContext::new(2025, 7)));
    assert_eq!(DateContext::parse(" 2024-12 "), Some(DateContext::new(2024, 12)));
    assert_eq!(DateContext::parse("2025-13"), None);
    assert_eq!(DateContext::parse("July"), None);
}

#[test]
fn test_fragment_dump_reading() {
    let json = r#"[
        [
            {"text": "01/07/2025", "x": 10, "y": 100},
            {"text": "4-10", "x": 150, "y": 100},
            {"text": "NARAYYA", "x": 220, "y": 100}
        ],
        []
    ]"#;

    let pages = Page::from_json(json).unwrap();

    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].number, 1);
    assert_eq!(pages[0].fragments[2].text, "NARAYYA");
    assert!(pages[1].is_empty());

    let import = import_roster(&pages, &common::registry(), &ImportConfig::default()).unwrap();
    assert_eq!(import.entries.len(), 1);
}

#[test]
fn test_registry_file_formats() {
    let from_lines = StaffDirectory::parse("# day staff\nNARAYYA\n\n  RAMESH  \nNARAYYA\n").unwrap();
    assert_eq!(from_lines, StaffDirectory::new(["NARAYYA", "RAMESH"]));

    let from_json = StaffDirectory::parse(r#"["NARAYYA", "RAMESH(R)"]"#).unwrap();
    assert_eq!(from_json.len(), 2);

    assert!(StaffDirectory::parse("[not json").is_err());
}

#[test]
fn test_trace_serializes() {
    let page = PageBuilder::new(1)
        .row(100.0, &["01/07/2025", "Tuesday", "4-10", "NARAYYA"])
        .text("Nobody", 10.0, 200.0)
        .build();

    let import = import_roster(&[page], &common::registry(), &ImportConfig::default()).unwrap();
    let json = serde_json::to_value(&import.trace).unwrap();

    assert_eq!(json["pages"][0]["chosen"], "list");
    assert_eq!(json["dropped"][0]["source"]["origin"]["kind"], "row");
    assert_eq!(
        json["dropped"][0]["missing"],
        serde_json::json!(["date", "shift_type", "staff_name"])
    );
}
