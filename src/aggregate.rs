use crate::models::{Entry, Person};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Entries with `from <= date <= to`. Lexicographic comparison is enough
/// because dates are fixed-width ISO strings.
pub fn in_range(entries: &[Entry], from: &str, to: &str) -> Vec<Entry> {
    entries
        .iter()
        .filter(|entry| from <= entry.date.as_str() && entry.date.as_str() <= to)
        .cloned()
        .collect()
}

/// Sum of counts per person. Both persons are always present, defaulting to 0.
pub fn totals_by_person(entries: &[Entry]) -> BTreeMap<Person, u64> {
    let mut totals: BTreeMap<Person, u64> =
        Person::ALL.into_iter().map(|person| (person, 0)).collect();
    for entry in entries {
        if let Some(total) = totals.get_mut(&entry.person) {
            *total += u64::from(entry.count);
        }
    }
    totals
}

/// Counts grouped by date, then by person. A person with no entries on a
/// date is simply absent; lookups fall back to 0 at the call site.
pub fn daily_totals(entries: &[Entry]) -> BTreeMap<String, BTreeMap<Person, u64>> {
    let mut days: BTreeMap<String, BTreeMap<Person, u64>> = BTreeMap::new();
    for entry in entries {
        *days
            .entry(entry.date.clone())
            .or_default()
            .entry(entry.person)
            .or_insert(0) += u64::from(entry.count);
    }
    days
}

/// Date keys of `daily_totals` output, newest first.
pub fn sorted_dates_descending(days: &BTreeMap<String, BTreeMap<Person, u64>>) -> Vec<String> {
    days.keys().rev().cloned().collect()
}

/// Display order: date descending, ties broken by numeric id descending when
/// both ids parse as numbers. Non-numeric ties keep their relative order.
pub fn sort_entries_descending(entries: &mut [Entry]) {
    entries.sort_by(|a, b| {
        b.date.cmp(&a.date).then_with(|| {
            match (a.id.parse::<u64>(), b.id.parse::<u64>()) {
                (Ok(a_id), Ok(b_id)) => b_id.cmp(&a_id),
                _ => Ordering::Equal,
            }
        })
    });
}
