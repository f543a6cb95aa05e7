use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, NaiveDate, Weekday};
use indexmap::IndexMap;

use crate::logging::ROSTER_RECONCILE;
use crate::roster::{AcceptedEntry, EntryKey, RosterDraft, ShiftType, SATURDAY_NOTE};
use crate::trace::{DroppedDraft, ImportTrace};

/// Turn the kept drafts of every page, in processing order, into accepted
/// entries: drop incomplete drafts, collapse duplicates (first occurrence
/// wins) and apply the Saturday rule.
pub fn reconcile(drafts: Vec<RosterDraft>, trace: &mut ImportTrace) -> Vec<AcceptedEntry> {
    let mut accepted: IndexMap<EntryKey, AcceptedEntry> = IndexMap::new();

    for draft in drafts {
        if !draft.is_complete() {
            trace.dropped.push(DroppedDraft::from_draft(&draft));
            continue;
        }
        let Some(entry) = draft.accept() else {
            continue;
        };

        let key = entry.key();
        if accepted.contains_key(&key) {
            trace.duplicates_removed += 1;
            tracing::debug!(
                target: ROSTER_RECONCILE,
                date = %entry.date,
                shift = %entry.shift_type,
                staff = %entry.assigned_name,
                "Dropped duplicate entry"
            );
            continue;
        }
        accepted.insert(key, entry);
    }

    let entries: Vec<AcceptedEntry> = accepted.into_values().collect();
    let (entries, converted) = apply_saturday_rule(entries, trace);
    trace.saturday_conversions = converted;

    tracing::info!(
        target: ROSTER_RECONCILE,
        accepted = entries.len(),
        dropped = trace.dropped.len(),
        duplicates = trace.duplicates_removed,
        saturday_conversions = converted,
        "Reconciled roster"
    );

    entries
}

/// On an ordinary Saturday the evening slot is booked as Saturday Regular.
/// A Saturday with a morning shift is exceptional and keeps its evening
/// shifts. Returns the entries and the number converted.
pub fn apply_saturday_rule(
    entries: Vec<AcceptedEntry>,
    trace: &mut ImportTrace,
) -> (Vec<AcceptedEntry>, usize) {
    let mut shifts_by_date: BTreeMap<NaiveDate, HashSet<ShiftType>> = BTreeMap::new();
    for entry in &entries {
        shifts_by_date
            .entry(entry.date)
            .or_default()
            .insert(entry.shift_type);
    }

    let ordinary_saturdays: HashSet<NaiveDate> = shifts_by_date
        .iter()
        .filter(|(date, shifts)| {
            date.weekday() == Weekday::Sat && !shifts.contains(&ShiftType::MorningShift)
        })
        .map(|(date, _)| *date)
        .collect();

    let mut seen: HashSet<EntryKey> = HashSet::with_capacity(entries.len());
    let mut result = Vec::with_capacity(entries.len());
    let mut converted = 0;

    // Existing keys win over entries a conversion would collide with.
    for entry in &entries {
        if !(entry.shift_type == ShiftType::EveningShift && ordinary_saturdays.contains(&entry.date)) {
            seen.insert(entry.key());
        }
    }

    for mut entry in entries {
        if entry.shift_type == ShiftType::EveningShift && ordinary_saturdays.contains(&entry.date) {
            entry.shift_type = ShiftType::SaturdayRegular;
            entry.change_description = format!("{}; {SATURDAY_NOTE}", entry.change_description);
            converted += 1;

            if !seen.insert(entry.key()) {
                trace.duplicates_removed += 1;
                tracing::debug!(
                    target: ROSTER_RECONCILE,
                    date = %entry.date,
                    staff = %entry.assigned_name,
                    "Converted Saturday shift already present"
                );
                continue;
            }
        }
        result.push(entry);
    }

    (result, converted)
}
