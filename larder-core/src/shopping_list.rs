//! Shopping-list aggregation over the recipes in a user's cart.

use std::collections::BTreeMap;
use std::fmt::Write;

pub const REPORT_HEADER: &str = "Shopping list:";
pub const REPORT_FILENAME: &str = "shopping_cart.txt";

/// One ingredient line of one recipe currently in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

/// Summed amount for one `(name, unit)` group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListEntry {
    pub name: String,
    pub measurement_unit: String,
    pub total: i64,
}

/// Group lines by `(name, measurement_unit)` and sum their amounts.
///
/// The result is ordered by name, then unit, and does not depend on the
/// order in which lines (or the recipes they came from) are supplied.
pub fn aggregate<I>(lines: I) -> Vec<ShoppingListEntry>
where
    I: IntoIterator<Item = CartLine>,
{
    let mut groups: BTreeMap<(String, String), i64> = BTreeMap::new();
    for line in lines {
        *groups
            .entry((line.name, line.measurement_unit))
            .or_insert(0) += line.amount;
    }

    groups
        .into_iter()
        .map(|((name, measurement_unit), total)| ShoppingListEntry {
            name,
            measurement_unit,
            total,
        })
        .collect()
}

/// Render the plain-text report: a header line, then `name\ttotal (unit)`
/// per entry.
pub fn render_report(entries: &[ShoppingListEntry]) -> String {
    let mut report = String::with_capacity(REPORT_HEADER.len() + 1 + entries.len() * 24);
    report.push_str(REPORT_HEADER);
    report.push('\n');
    for entry in entries {
        // Writing to a String cannot fail.
        let _ = writeln!(
            report,
            "{}\t{} ({})",
            entry.name, entry.total, entry.measurement_unit
        );
    }
    report
}
