use pretty_assertions::assert_eq;
use roster_import::recognize::{infer_context, DateRecognizer, ShiftClassifier, StaffMatcher};
use roster_import::{DateContext, ShiftType, StaffDirectory};

mod common;

#[test]
fn test_fully_qualified_dates_round_trip() {
    let recognizer = DateRecognizer::new(None);
    let expected = common::date(2025, 7, 1);

    for text in [
        "2025-07-01",
        "2025-7-1",
        "01/07/2025",
        "1/7/2025",
        "01-07-2025",
        "01.07.2025",
        "01 07 2025",
        "1 Jul 2025",
        "01-July-2025",
        "1st July 2025",
        "01/07/25",
        "01-07-25",
        "01.07.25",
        "1-Jul-25",
    ] {
        assert_eq!(recognizer.recognize(text), Some(expected), "{text}");
    }
}

#[test]
fn test_every_day_of_a_year_round_trips() {
    let recognizer = DateRecognizer::new(None);
    let mut day = common::date(2024, 1, 1);
    while day < common::date(2025, 1, 1) {
        for text in [
            day.format("%Y-%m-%d").to_string(),
            day.format("%d/%m/%Y").to_string(),
            day.format("%d %b %Y").to_string(),
        ] {
            assert_eq!(recognizer.recognize(&text), Some(day), "{text}");
        }
        day = day.succ_opt().unwrap();
    }
}

#[test]
fn test_two_digit_years_pivot() {
    let recognizer = DateRecognizer::new(None);
    assert_eq!(recognizer.recognize("31/12/99"), Some(common::date(1999, 12, 31)));
    assert_eq!(recognizer.recognize("31/12/50"), Some(common::date(2050, 12, 31)));
}

#[test]
fn test_dates_inside_longer_text() {
    let recognizer = DateRecognizer::new(None);
    assert_eq!(
        recognizer.recognize("Date: 05/07/2025 (Sat)"),
        Some(common::date(2025, 7, 5))
    );
}

#[test]
fn test_impossible_dates_are_rejected() {
    let recognizer = DateRecognizer::new(None);
    assert_eq!(recognizer.recognize("31/06/2025"), None);
    assert_eq!(recognizer.recognize("29/02/2025"), None);
    assert_eq!(recognizer.recognize("2025-13-01"), None);
    assert_eq!(recognizer.recognize("NARAYYA"), None);
}

#[test]
fn test_partial_dates_need_a_context() {
    let without = DateRecognizer::new(None);
    assert_eq!(without.recognize("15"), None);
    assert_eq!(without.recognize("15/07"), None);

    let with = DateRecognizer::new(Some(DateContext::new(2025, 7)));
    assert_eq!(with.recognize("15"), Some(common::date(2025, 7, 15)));
    assert_eq!(with.recognize("15th"), Some(common::date(2025, 7, 15)));
    assert_eq!(with.recognize("3/8"), Some(common::date(2025, 8, 3)));
    assert_eq!(with.recognize("15.07"), Some(common::date(2025, 7, 15)));
    assert_eq!(with.recognize("32"), None);
}

#[test]
fn test_shift_ranges_are_not_dates() {
    let with = DateRecognizer::new(Some(DateContext::new(2025, 7)));
    assert_eq!(with.recognize("4-10"), None);
    assert_eq!(with.recognize("9-4"), None);
}

#[test]
fn test_context_inference_picks_the_busiest_month() {
    let texts = ["30/06/2025", "01/07/2025", "NARAYYA", "02/07/2025", "4-10"];
    assert_eq!(infer_context(texts), Some(DateContext::new(2025, 7)));

    // Equal counts keep the earlier month
    assert_eq!(
        infer_context(["01/08/2025", "01/07/2025"]),
        Some(DateContext::new(2025, 7))
    );
    assert_eq!(infer_context(["15", "NARAYYA"]), None);
}

#[test]
fn test_registry_forms_are_distinct_identities() {
    let matcher = StaffMatcher::new(&common::registry(), None);

    assert_eq!(matcher.match_name("NARAYYA"), Some("NARAYYA"));
    assert_eq!(matcher.match_name("  narayya "), Some("NARAYYA"));
    assert_eq!(matcher.match_name("NARAYYA(R)"), Some("NARAYYA(R)"));
    assert_eq!(matcher.match_name("Narayya ( R )"), Some("NARAYYA(R)"));
    assert_eq!(matcher.match_name("Lakshmi   Devi"), Some("LAKSHMI DEVI"));
}

#[test]
fn test_missing_form_is_not_substituted() {
    let relief_only = StaffDirectory::new(["RAMESH(R)"]);
    let matcher = StaffMatcher::new(&relief_only, Some(0.9));
    assert_eq!(matcher.match_name("RAMESH"), None);
    assert_eq!(matcher.match_name("RAMESH (R)"), Some("RAMESH(R)"));

    let plain_only = StaffDirectory::new(["RAMESH"]);
    let matcher = StaffMatcher::new(&plain_only, Some(0.9));
    assert_eq!(matcher.match_name("RAMESH(R)"), None);
}

#[test]
fn test_registry_spelling_is_returned() {
    let directory = StaffDirectory::new(["Narayya"]);
    let matcher = StaffMatcher::new(&directory, None);
    assert_eq!(matcher.match_name("NARAYYA"), Some("Narayya"));
}

#[test]
fn test_structural_tokens_are_not_names() {
    let directory = StaffDirectory::new(["DUTY", "AB", "12345", "RAMESH"]);
    let matcher = StaffMatcher::new(&directory, None);

    for token in ["DUTY", "Shift", "AB", "12345", "Remarks", ""] {
        assert_eq!(matcher.match_name(token), None, "{token}");
    }
    assert_eq!(matcher.match_name("ramesh"), Some("RAMESH"));
}

#[test]
fn test_fuzzy_match_accepts_close_misspellings() {
    let matcher = StaffMatcher::new(&common::registry(), Some(0.9));
    assert_eq!(matcher.match_name("VENKATESWRA"), Some("VENKATESWARA"));
}

#[test]
fn test_fuzzy_match_limits() {
    let registry = common::registry();

    // Disabled
    let exact_only = StaffMatcher::new(&registry, None);
    assert_eq!(exact_only.match_name("VENKATESWRA"), None);

    let matcher = StaffMatcher::new(&registry, Some(0.9));
    // Below the threshold
    assert_eq!(matcher.match_name("RAMESX"), None);
    // Too short to compare
    let short = StaffMatcher::new(&StaffDirectory::new(["RAVI"]), Some(0.5));
    assert_eq!(short.match_name("RAVY"), None);
    // Never crosses the (R) boundary
    assert_eq!(matcher.match_name("VENKATESWRA(R)"), None);
}

#[test]
fn test_fuzzy_tie_between_identities_is_no_match() {
    let directory = StaffDirectory::new(["SRINIVASAN", "SRINIVASAM"]);
    let matcher = StaffMatcher::new(&directory, Some(0.85));
    assert_eq!(matcher.match_name("SRINIVASAX"), None);
    assert_eq!(matcher.match_name("SRINIVASAN"), Some("SRINIVASAN"));
}

#[test]
fn test_shift_classification() {
    let matcher = StaffMatcher::new(&common::registry(), Some(0.9));
    let shifts = ShiftClassifier::new(&matcher);

    let cases = [
        ("Evening Shift (4-10)", ShiftType::EveningShift),
        ("Morning (9-4)", ShiftType::MorningShift),
        ("Saturday Regular (12-10)", ShiftType::SaturdayRegular),
        ("Night Duty (22-9)", ShiftType::NightDuty),
        ("4-10", ShiftType::EveningShift),
        ("4 - 10", ShiftType::EveningShift),
        ("9-4", ShiftType::MorningShift),
        ("12-10", ShiftType::SaturdayRegular),
        ("22-9", ShiftType::NightDuty),
        ("NIGHT", ShiftType::NightDuty),
        ("saturday", ShiftType::SaturdayRegular),
        ("Sunday", ShiftType::SundayOrHolidayOrSpecial),
        ("Holiday", ShiftType::SundayOrHolidayOrSpecial),
        ("Special", ShiftType::SundayOrHolidayOrSpecial),
        ("morning", ShiftType::MorningShift),
        ("Evening", ShiftType::EveningShift),
        ("N", ShiftType::NightDuty),
        ("n", ShiftType::NightDuty),
    ];
    for (text, expected) in cases {
        assert_eq!(shifts.classify(text), Some(expected), "{text}");
    }
}

#[test]
fn test_display_strings_classify_to_themselves() {
    let matcher = StaffMatcher::new(&common::registry(), None);
    let shifts = ShiftClassifier::new(&matcher);
    for shift in ShiftType::ALL {
        assert_eq!(shifts.classify(shift.as_str()), Some(shift), "{shift}");
    }
}

#[test]
fn test_names_and_dates_are_not_shifts() {
    let matcher = StaffMatcher::new(&common::registry(), Some(0.9));
    let shifts = ShiftClassifier::new(&matcher);

    for text in ["NARAYYA", "12-10-2025", "04-10-2025", "1/4-10", "Nightingale", "NN", ""] {
        assert_eq!(shifts.classify(text), None, "{text}");
    }
}

#[test]
fn test_registered_name_shadows_shift_word() {
    let directory = StaffDirectory::new(["MORNING STAR"]);
    let matcher = StaffMatcher::new(&directory, None);
    let shifts = ShiftClassifier::new(&matcher);

    assert_eq!(shifts.classify("Morning Star"), None);
    assert_eq!(shifts.classify("Morning"), Some(ShiftType::MorningShift));
}

#[test]
fn test_predicates_agree_with_recognizers() {
    let dates = DateRecognizer::new(None);
    assert!(dates.is_date("01/07/2025"));
    assert!(!dates.is_date("15"));

    let matcher = StaffMatcher::new(&common::registry(), None);
    let shifts = ShiftClassifier::new(&matcher);
    assert!(shifts.is_shift("Evening Shift (4-10)"));
    assert!(!shifts.is_shift("NARAYYA"));
    assert!(matcher.is_staff("NARAYYA"));
}

#[test]
fn test_field_recognizers_bundle() {
    let fields = common::fields();
    assert_eq!(fields.date("05/07/2025"), Some(common::date(2025, 7, 5)));
    assert_eq!(fields.shift("4-10"), Some(ShiftType::EveningShift));
    assert_eq!(fields.staff("narayya"), Some("NARAYYA"));
    assert!(fields.is_field("15"));
    assert!(!fields.is_field("Replaced by colleague"));
    assert_eq!(fields.date_context(), Some(DateContext::new(2025, 7)));
}
