//! Group subtotals and grand total over priced rows

use std::collections::BTreeMap;

/// Group label for rows without a value in the grouping column
pub const UNSPECIFIED_GROUP: &str = "Unspecified";

/// What the aggregator needs from a processed row
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateInput<'a> {
    /// `None` for error-tagged or missing totals
    pub total_monthly: Option<f64>,
    pub group: Option<&'a str>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Totals {
    /// Per-group subtotals sorted by label; empty when not grouping
    pub groups: Vec<(String, f64)>,
    /// Sum of every numeric total, `None` when nothing was priced
    pub grand_total: Option<f64>,
}

impl Totals {
    pub fn group(&self, label: &str) -> Option<f64> {
        self.groups
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, total)| *total)
    }
}

/// Sum numeric totals per group and overall.
///
/// Rows without a numeric total are excluded rather than counted as zero, so
/// a group made only of failed rows does not appear at all. A zero grand total
/// is reported as `None`.
pub fn aggregate<'a, I>(rows: I, grouped: bool) -> Totals
where
    I: IntoIterator<Item = AggregateInput<'a>>,
{
    let mut groups: BTreeMap<String, f64> = BTreeMap::new();
    let mut grand_total = 0.0;

    for row in rows {
        let Some(total) = row.total_monthly.filter(|t| t.is_finite()) else {
            continue;
        };
        grand_total += total;
        if grouped {
            let label = row
                .group
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .unwrap_or(UNSPECIFIED_GROUP);
            *groups.entry(label.to_string()).or_insert(0.0) += total;
        }
    }

    Totals {
        groups: groups.into_iter().collect(),
        grand_total: (grand_total > 0.0).then_some(grand_total),
    }
}
