//! Summary statistics over the loaded table.
//!
//! All aggregates are recomputed on demand from the filtered row set; nothing
//! here is cached or persisted.  Region grouping preserves first-seen order so
//! the bar chart and the report table stay in lockstep.

use crate::dataset::Table;

/// Mean `charges` per distinct region, in first-seen order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegionAggregate {
    entries: Vec<(String, f64)>,
}

impl RegionAggregate {
    /// Computes the aggregate from the table.
    pub fn from_table(table: &Table) -> Self {
        let mut totals: Vec<(String, f64, usize)> = Vec::new();
        for record in table {
            match totals.iter_mut().find(|(region, _, _)| *region == record.region) {
                Some((_, sum, count)) => {
                    *sum += record.charges;
                    *count += 1;
                }
                None => totals.push((record.region.clone(), record.charges, 1)),
            }
        }

        Self {
            entries: totals
                .into_iter()
                .map(|(region, sum, count)| (region, sum / count as f64))
                .collect(),
        }
    }

    /// Region/mean pairs in grouping order.
    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The region with the highest mean charges; ties resolve to the first
    /// such region in grouping order.
    pub fn top_region(&self) -> Option<&str> {
        let mut best: Option<&(String, f64)> = None;
        for entry in &self.entries {
            match best {
                Some((_, mean)) if entry.1 <= *mean => {}
                _ => best = Some(entry),
            }
        }
        best.map(|(region, _)| region.as_str())
    }
}

/// Arithmetic mean of the `age` column.
pub fn mean_age(table: &Table) -> f64 {
    mean(table.iter().map(|r| r.age))
}

/// Arithmetic mean of the `charges` column.
pub fn mean_charges(table: &Table) -> f64 {
    mean(table.iter().map(|r| r.charges))
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Formats an amount as `$1,234.56` with thousands separators and two
/// decimal places.
pub fn format_currency(amount: f64) -> String {
    let negative = amount < 0.0;
    let rounded = format!("{:.2}", amount.abs());
    let (whole, fraction) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if negative { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, fraction)
}

#[cfg(test)]
mod tests {
    use super::{format_currency, mean_age, mean_charges, RegionAggregate};
    use crate::dataset::Record;

    fn record(age: f64, region: &str, charges: f64) -> Record {
        Record {
            age,
            region: region.to_owned(),
            charges,
        }
    }

    #[test]
    fn scenario_from_three_rows() {
        let table = vec![
            record(20.0, "northeast", 100.0),
            record(30.0, "northeast", 300.0),
            record(40.0, "southwest", 500.0),
        ];

        assert_eq!(format!("{:.2}", mean_age(&table)), "30.00");

        let aggregate = RegionAggregate::from_table(&table);
        assert_eq!(
            aggregate.entries(),
            &[("northeast".to_owned(), 200.0), ("southwest".to_owned(), 500.0)]
        );
        assert_eq!(aggregate.top_region(), Some("southwest"));
    }

    #[test]
    fn grouping_preserves_first_seen_order() {
        let table = vec![
            record(25.0, "southwest", 10.0),
            record(35.0, "northeast", 20.0),
            record(45.0, "southwest", 30.0),
        ];

        let aggregate = RegionAggregate::from_table(&table);
        let regions: Vec<&str> = aggregate
            .entries()
            .iter()
            .map(|(region, _)| region.as_str())
            .collect();
        assert_eq!(regions, ["southwest", "northeast"]);
    }

    #[test]
    fn top_region_ties_resolve_to_first() {
        let table = vec![
            record(25.0, "east", 100.0),
            record(35.0, "west", 100.0),
        ];

        let aggregate = RegionAggregate::from_table(&table);
        assert_eq!(aggregate.top_region(), Some("east"));
    }

    #[test]
    fn empty_table_has_no_top_region() {
        let aggregate = RegionAggregate::from_table(&Vec::new());
        assert!(aggregate.is_empty());
        assert_eq!(aggregate.top_region(), None);
        assert_eq!(mean_charges(&Vec::new()), 0.0);
    }

    #[test]
    fn currency_formatting() {
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(-42.0), "-$42.00");
    }
}
