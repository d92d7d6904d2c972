use crate::dates::date_key;
use crate::models::WeightEntry;
use crate::units::{Unit, fixed1};
use chrono::NaiveDate;

/// Renders entries (kilograms) as CSV in `unit`, preserving input order.
pub fn entries_to_csv(entries: &[WeightEntry], unit: Unit) -> String {
    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(format!("date,weight_({unit}),notes"));
    for entry in entries {
        lines.push(format!(
            "{},{},{}",
            date_key(entry.date),
            fixed1(unit.from_kg(entry.weight)),
            quote(entry.notes.as_deref().unwrap_or_default()),
        ));
    }
    lines.join("\n")
}

pub fn export_file_name(today: NaiveDate) -> String {
    format!("weight_log_{}.csv", date_key(today))
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
