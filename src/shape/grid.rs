//! Year × month grid for the monthly-returns heatmap.

use crate::data::{Record, field_f64, field_i64};
use crate::domain::HeatGrid;

/// Build a grid from `(year, month, value)` triples.
///
/// Months outside `1..=12` are ignored, non-finite values stay empty, and a
/// repeated `(year, month)` keeps the last value.
pub fn grid_from_triples(triples: impl IntoIterator<Item = (i32, u32, Option<f64>)>) -> HeatGrid {
    let mut grid = HeatGrid::default();
    for (year, month, value) in triples {
        if !(1..=12).contains(&month) {
            continue;
        }
        let row = grid.years.entry(year).or_insert([None; 12]);
        row[(month - 1) as usize] = value.filter(|v| v.is_finite());
    }
    grid
}

/// Read `year`, `month`, `return` from monthly-return records.
pub fn monthly_grid(records: &[Record]) -> HeatGrid {
    grid_from_triples(records.iter().filter_map(|r| {
        let year = i32::try_from(field_i64(r, "year")?).ok()?;
        let month = u32::try_from(field_i64(r, "month")?).ok()?;
        Some((year, month, field_f64(r, "return")))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::records;
    use serde_json::json;

    #[test]
    fn every_year_has_twelve_slots_with_gaps_as_none() {
        let grid = grid_from_triples([(2023, 1, Some(0.01)), (2023, 12, Some(-0.02)), (2025, 6, Some(0.0))]);
        assert_eq!(grid.years.len(), 2);
        assert!(!grid.years.contains_key(&2024));

        let row = grid.years[&2023];
        assert_eq!(row.len(), 12);
        assert_eq!(row[0], Some(0.01));
        assert_eq!(row[11], Some(-0.02));
        assert!(row[1..11].iter().all(Option::is_none));
        assert_eq!(grid.get(2025, 6), Some(0.0));
    }

    #[test]
    fn ignores_bad_months_and_non_finite_values() {
        let grid = grid_from_triples([(2024, 0, Some(0.1)), (2024, 13, Some(0.1)), (2024, 2, Some(f64::NAN))]);
        assert_eq!(grid.years.len(), 1);
        assert_eq!(grid.get(2024, 2), None);
    }

    #[test]
    fn reads_records_with_string_fields() {
        let rows = records(json!([
            {"year": 2024, "month": 1, "return": 0.031},
            {"year": "2024", "month": "2", "return": "-0.012"},
            {"year": 2024, "month": 3, "return": null},
            {"year": "x", "month": 4, "return": 0.5}
        ]));
        let grid = monthly_grid(&rows);
        assert_eq!(grid.years.len(), 1);
        assert_eq!(grid.get(2024, 1), Some(0.031));
        assert_eq!(grid.get(2024, 2), Some(-0.012));
        assert_eq!(grid.get(2024, 3), None);
    }
}
