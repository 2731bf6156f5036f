//! Pipeline orchestrator: parse, classify, test containment, partition.

use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::clean::{classify, parse};
use crate::error::{GeosieveError, Result};
use crate::models::{Category, Coordinate, Outcome, RecordSet, ResultBundle, ValidRecord};
use crate::pip::{prepare, BoundaryGeometry, PreparedBoundary};

/// Runs the classification pipeline over a record set
#[derive(Debug, Default, Clone)]
pub struct Pipeline {
    cancel: Option<Arc<AtomicBool>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abandon the run with `Cancelled` once the flag is set
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Prepare the boundary, then classify.
    ///
    /// Boundary and field-name errors surface before any record is classified.
    pub fn run(
        &self,
        records: &RecordSet,
        x_field: &str,
        y_field: &str,
        boundary: &BoundaryGeometry,
    ) -> Result<Outcome> {
        let prepared = prepare(boundary)?;
        self.run_prepared(records, x_field, y_field, &prepared)
    }

    /// Classify against an already prepared boundary
    pub fn run_prepared(
        &self,
        records: &RecordSet,
        x_field: &str,
        y_field: &str,
        boundary: &PreparedBoundary,
    ) -> Result<Outcome> {
        let x_pos = records.field_position(x_field)?;
        let y_pos = records.field_position(y_field)?;

        info!(
            "Classifying {} records using fields '{}' / '{}'",
            records.len(),
            x_field,
            y_field
        );

        let labelled: Vec<(Coordinate, Category)> = records
            .records()
            .par_iter()
            .map(|record| {
                self.check_cancelled()?;
                let coord = parse(record.value_at(x_pos), record.value_at(y_pos));
                Ok((coord, classify(&coord)))
            })
            .collect::<Result<_>>()?;

        let mut valid_points = Vec::new();
        let mut valid_records = Vec::new();
        let mut zero = Vec::new();
        let mut invalid = Vec::new();

        for (record, (coord, category)) in records.records().iter().zip(labelled) {
            match (category, coord) {
                (Category::Valid, Coordinate::Parsed { x, y }) => {
                    valid_points.push((x, y));
                    valid_records.push(record);
                }
                (Category::Zero, _) => zero.push(record.clone()),
                _ => invalid.push(record.clone()),
            }
        }

        debug!(
            "Triage: {} valid, {} zero, {} invalid",
            valid_points.len(),
            zero.len(),
            invalid.len()
        );

        if valid_points.is_empty() {
            info!("No usable data: every record is zero or invalid");
            return Ok(Outcome::NoUsableData {
                total: records.len(),
                zero,
                invalid,
            });
        }

        self.check_cancelled()?;
        let statuses = boundary.test_many(&valid_points);

        let valid: Vec<ValidRecord> = valid_records
            .into_iter()
            .zip(valid_points)
            .zip(statuses)
            .map(|((record, (x, y)), status)| ValidRecord {
                record: record.clone(),
                x,
                y,
                status,
            })
            .collect();

        let bundle = ResultBundle {
            valid,
            zero,
            invalid,
            total: records.len(),
        };

        let summary = bundle.summary();
        info!(
            "Classified {} records: {} inside, {} outside, {} zero, {} invalid",
            summary.total, summary.inside, summary.outside, summary.zero, summary.invalid
        );

        Ok(Outcome::Classified(bundle))
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(GeosieveError::Cancelled),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContainmentStatus;
    use geo::polygon;

    fn square_boundary() -> BoundaryGeometry {
        BoundaryGeometry::wgs84(vec![polygon![
            (x: 10.0, y: 20.0), (x: 11.0, y: 20.0), (x: 11.0, y: 21.0), (x: 10.0, y: 21.0), (x: 10.0, y: 20.0)
        ]])
    }

    fn scenario_records() -> RecordSet {
        RecordSet::from_rows(
            ["id", "lon", "lat"],
            vec![
                vec!["r0", "0", "0"],
                vec!["r1", "abc", "abc"],
                vec!["r2", "200", "0"],
                vec!["r3", "10", "20"],
                vec!["r4", "10.5", "20.5"],
            ],
        )
    }

    #[test]
    fn test_partitions_are_total_and_ordered() {
        let records = scenario_records();
        let outcome = Pipeline::new()
            .run(&records, "lon", "lat", &square_boundary())
            .unwrap();
        let bundle = outcome.bundle().unwrap();

        let zero: Vec<usize> = bundle.zero.iter().map(|r| r.index()).collect();
        let invalid: Vec<usize> = bundle.invalid.iter().map(|r| r.index()).collect();
        let valid: Vec<usize> = bundle.valid.iter().map(|v| v.record.index()).collect();

        assert_eq!(zero, vec![0]);
        assert_eq!(invalid, vec![1, 2]);
        assert_eq!(valid, vec![3, 4]);
        assert_eq!(bundle.total, 5);
        assert_eq!(zero.len() + invalid.len() + valid.len(), bundle.total);
    }

    #[test]
    fn test_corner_point_is_inside() {
        let records = scenario_records();
        let outcome = Pipeline::new()
            .run(&records, "lon", "lat", &square_boundary())
            .unwrap();
        let bundle = outcome.bundle().unwrap();

        // (10, 20) is a vertex of the square
        assert_eq!(bundle.valid[0].status, ContainmentStatus::Inside);
        assert_eq!(bundle.valid[1].status, ContainmentStatus::Inside);
    }

    #[test]
    fn test_no_usable_data() {
        let records = RecordSet::from_rows(
            ["lon", "lat"],
            vec![vec!["0", "0"], vec!["", "5"], vec!["91", "91"]],
        );
        let outcome = Pipeline::new()
            .run(&records, "lon", "lat", &square_boundary())
            .unwrap();

        match &outcome {
            Outcome::NoUsableData {
                total,
                zero,
                invalid,
            } => {
                assert_eq!(*total, 3);
                let zero: Vec<usize> = zero.iter().map(|r| r.index()).collect();
                let invalid: Vec<usize> = invalid.iter().map(|r| r.index()).collect();
                assert_eq!(zero, vec![0]);
                assert_eq!(invalid, vec![1, 2]);
            }
            other => panic!("expected no usable data, got {:?}", other),
        }
        assert_eq!(outcome.invalid()[1].get("lon"), Some("91"));
    }

    #[test]
    fn test_empty_input_is_no_usable_data() {
        let records = RecordSet::from_rows(["lon", "lat"], Vec::<Vec<String>>::new());
        let outcome = Pipeline::new()
            .run(&records, "lon", "lat", &square_boundary())
            .unwrap();
        assert!(matches!(outcome, Outcome::NoUsableData { total: 0, .. }));
    }

    #[test]
    fn test_boundary_error_is_fatal() {
        let records = scenario_records();
        let result = Pipeline::new().run(&records, "lon", "lat", &BoundaryGeometry::wgs84(vec![]));
        assert!(matches!(result, Err(GeosieveError::EmptyBoundary)));
    }

    #[test]
    fn test_unknown_field_is_fatal() {
        let records = scenario_records();
        let result = Pipeline::new().run(&records, "longitude", "lat", &square_boundary());
        assert!(matches!(result, Err(GeosieveError::UnknownField { .. })));
    }

    #[test]
    fn test_cancelled_run() {
        let flag = Arc::new(AtomicBool::new(true));
        let result = Pipeline::new()
            .with_cancel_flag(flag)
            .run(&scenario_records(), "lon", "lat", &square_boundary());
        assert!(matches!(result, Err(GeosieveError::Cancelled)));
    }

    #[test]
    fn test_rerun_is_identical() {
        let records = scenario_records();
        let boundary = square_boundary();
        let first = Pipeline::new().run(&records, "lon", "lat", &boundary).unwrap();
        let second = Pipeline::new().run(&records, "lon", "lat", &boundary).unwrap();
        assert_eq!(first, second);
    }
}
