//! Tests for outcome queries
//!
//! These tests verify:
//! - Single and multi-outcome queries with and without age breakdown
//! - Aggregate columns equal the sum of per-age columns
//! - NaN values are zeroed and tensors are re-loaded on every query
//! - Validation and lookup failures happen before any tensor load

use super::fixtures::Fixture;
use crate::config::{ColumnLabels, IndexConfig};
use crate::error::{PolicyAxis, QueryError, TensorAxis};
use crate::index::SweepIndex;
use crate::model::RunId;
use crate::query::{OutcomeQuery, Policy, Selection};

/// Location code at position 2, i.e. tensor location index 1
const LOCATION: i64 = 103;
const LOCATION_INDEX: usize = 1;

fn focus_policy() -> Policy {
    Policy::new(6, 10, 2)
}

#[test]
fn test_single_outcome_single_age() {
    let fixture = Fixture::example();
    let index = fixture.index();
    let run = fixture.run_for(6, 10, 2);

    let query = OutcomeQuery::single(0, focus_policy(), LOCATION).risk(0).age(3);
    let table = index.get_outcome(&query).unwrap();

    assert_eq!(table.num_rows(), index.number_of_time_points());
    assert_eq!(table.num_columns(), 1);
    assert!(table.is_hierarchical());
    assert_eq!(table.labels(), vec!["outcome0/age_group3"]);

    let expected: Vec<f64> = (0..6)
        .map(|t| Fixture::value(run.0, 0, [0, 3, LOCATION_INDEX, t]))
        .collect();
    assert_eq!(table.column(0, Some(3)).unwrap(), expected.as_slice());
}

#[test]
fn test_aggregate_sums_age_groups() {
    let fixture = Fixture::example();
    let index = fixture.index();
    let run = fixture.run_for(6, 10, 2);

    let query = OutcomeQuery::single(0, focus_policy(), LOCATION).risk(0);
    let table = index.get_outcome(&query).unwrap();

    assert!(!table.is_hierarchical());
    assert_eq!(table.labels(), vec!["outcome0"]);
    assert_eq!(table.num_rows(), 6);

    let expected: Vec<f64> = (0..6)
        .map(|t| {
            (0..5)
                .map(|a| Fixture::value(run.0, 0, [0, a, LOCATION_INDEX, t]))
                .sum()
        })
        .collect();
    assert_eq!(table.column(0, None).unwrap(), expected.as_slice());
}

#[test]
fn test_aggregate_matches_explicit_ages() {
    let index = Fixture::all_in_focus().index();

    for risk in 0..2 {
        let base = OutcomeQuery::many(vec![0, 2], Policy::new(5, 9, 2), 104).risk(risk);
        let aggregate = index.get_outcome(&base).unwrap();
        let by_age = index
            .get_outcome(&base.clone().ages(vec![0, 1, 2, 3, 4]))
            .unwrap();

        for outcome in [0, 2] {
            let mut total = vec![0.0; by_age.num_rows()];
            for column in by_age.group(outcome) {
                for (sum, v) in total.iter_mut().zip(&column.values) {
                    *sum += v;
                }
            }
            assert_eq!(aggregate.column(outcome, None).unwrap(), total.as_slice());
        }
    }
}

#[test]
fn test_multi_outcome_multi_age() {
    let fixture = Fixture::example();
    let index = fixture.index();
    let run = fixture.run_for(6, 10, 2);

    let query = OutcomeQuery::many(vec![1, 2], focus_policy(), LOCATION).ages(vec![3, 4]);
    let table = index.get_outcome(&query).unwrap();

    assert_eq!(table.num_rows(), 6);
    assert_eq!(
        table.labels(),
        vec![
            "outcome1/age_group3",
            "outcome1/age_group4",
            "outcome2/age_group3",
            "outcome2/age_group4",
        ]
    );
    assert_eq!(table.group(1).count(), 2);
    assert_eq!(table.group(2).count(), 2);

    let values = table.column(2, Some(4)).unwrap();
    assert_eq!(values[5], Fixture::value(run.0, 2, [0, 4, LOCATION_INDEX, 5]));

    let row = table.row(0).unwrap();
    assert_eq!(row.len(), 4);
    assert_eq!(row[0], Fixture::value(run.0, 1, [0, 3, LOCATION_INDEX, 0]));
}

#[test]
fn test_requested_order_is_kept() {
    let index = Fixture::example().index();

    let query = OutcomeQuery::many(vec![2, 0, 2], focus_policy(), LOCATION);
    let table = index.get_outcome(&query).unwrap();

    // Duplicates are not filtered out
    assert_eq!(table.labels(), vec!["outcome2", "outcome0", "outcome2"]);
    assert_eq!(table.columns()[0].values, table.columns()[2].values);
}

#[test]
fn test_every_focus_triple_has_time_rows() {
    let fixture = Fixture::all_in_focus();
    let index = fixture.index();

    for row in index.focus_table() {
        let policy = Policy::new(row.scenario, row.school_policy, row.social_distancing_policy);
        for &code in index.location_codes() {
            let table = index
                .get_outcome(&OutcomeQuery::single(0, policy, code))
                .unwrap();
            assert_eq!(table.num_rows(), index.number_of_time_points());
        }
    }
}

#[test]
fn test_location_offset() {
    let fixture = Fixture::example();
    let index = fixture.index();
    let run = fixture.run_for(6, 10, 2);

    // Position p reads tensor location p - 1; position 0 wraps to the last one
    for (position, &code) in index.location_codes().iter().enumerate() {
        let expected_location = if position == 0 { 3 } else { position - 1 };
        let query = OutcomeQuery::single(0, focus_policy(), code).age(0);
        let table = index.get_outcome(&query).unwrap();
        assert_eq!(
            table.column(0, Some(0)).unwrap()[0],
            Fixture::value(run.0, 0, [0, 0, expected_location, 0])
        );
    }
}

#[test]
fn test_unknown_location() {
    let index = Fixture::example().index();

    let err = index
        .get_outcome(&OutcomeQuery::single(0, focus_policy(), 999))
        .unwrap_err();
    assert!(matches!(err, QueryError::UnknownLocation(999)));
    assert_eq!(index.container().load_count(), 0);
}

#[test]
fn test_policy_outside_focus() {
    let index = Fixture::all_in_focus().index();
    let cases = [
        (Policy::new(7, 10, 2), PolicyAxis::Scenario, 7),
        (Policy::new(6, 11, 2), PolicyAxis::School, 11),
        (Policy::new(6, 10, 3), PolicyAxis::SocialDistancing, 3),
    ];

    for (policy, axis, value) in cases {
        // Even with an unknown location the focus check comes first
        let err = index
            .get_outcome(&OutcomeQuery::single(0, policy, 999))
            .unwrap_err();
        assert!(
            matches!(err, QueryError::NotInFocus { axis: a, value: v } if a == axis && v == value),
            "{policy:?} gave {err:?}"
        );
    }
    assert_eq!(index.container().load_count(), 0);
}

#[test]
fn test_enumerated_but_unfocused_run() {
    // Run (5, 9, 1) exists in the case table but not in focus
    let index = Fixture::example().index();
    let err = index
        .get_outcome(&OutcomeQuery::single(0, Policy::new(5, 9, 1), LOCATION))
        .unwrap_err();
    assert!(matches!(
        err,
        QueryError::NotInFocus {
            axis: PolicyAxis::Scenario,
            value: 5,
        }
    ));
}

#[test]
fn test_focus_values_without_a_run() {
    let mut fixture = Fixture::all_in_focus();
    fixture.cases.retain(|c| !(c[1] == 5 && c[2] == 9 && c[3] == 1));
    let index = fixture.index();

    let err = index
        .get_outcome(&OutcomeQuery::single(0, Policy::new(5, 9, 1), LOCATION))
        .unwrap_err();
    assert!(matches!(err, QueryError::NoMatchingRun { .. }));
}

#[test]
fn test_nan_is_zeroed() {
    let mut fixture = Fixture::example();
    let run = fixture.run_for(6, 10, 2).0;
    fixture.nans = vec![
        (run, 0, [0, 3, LOCATION_INDEX, 2]),
        (run, 0, [0, 1, LOCATION_INDEX, 4]),
    ];
    let index = fixture.index();

    let explicit = index
        .get_outcome(&OutcomeQuery::single(0, focus_policy(), LOCATION).age(3))
        .unwrap();
    let values = explicit.column(0, Some(3)).unwrap();
    assert_eq!(values[2], 0.0);
    assert!(values.iter().all(|v| !v.is_nan()));

    let aggregate = index
        .get_outcome(&OutcomeQuery::single(0, focus_policy(), LOCATION))
        .unwrap();
    let totals = aggregate.column(0, None).unwrap();
    assert!(totals.iter().all(|v| !v.is_nan()));
    let expected_t4: f64 = [0, 2, 3, 4]
        .iter()
        .map(|&a| Fixture::value(run, 0, [0, a, LOCATION_INDEX, 4]))
        .sum();
    assert_eq!(totals[4], expected_t4);
}

#[test]
fn test_requery_reloads_and_repeats() {
    let mut fixture = Fixture::example();
    let run = fixture.run_for(6, 10, 2).0;
    fixture.nans = vec![(run, 1, [0, 2, LOCATION_INDEX, 0])];
    let index = fixture.index();

    let query = OutcomeQuery::many(vec![0, 1], focus_policy(), LOCATION).ages(vec![2]);
    let first = index.get_outcome(&query).unwrap();
    assert_eq!(index.container().load_count(), 2);

    let second = index.get_outcome(&query).unwrap();
    assert_eq!(index.container().load_count(), 4);
    assert_eq!(first, second);
}

#[test]
fn test_empty_selection() {
    let index = Fixture::example().index();

    let table = index
        .get_outcome(&OutcomeQuery::new(Selection::Many(vec![]), focus_policy(), LOCATION))
        .unwrap();
    assert!(table.is_empty());
    assert_eq!(table.num_rows(), 0);
    assert_eq!(index.container().load_count(), 0);
}

#[test]
fn test_empty_age_selection_keeps_time_rows() {
    let index = Fixture::example().index();

    let query = OutcomeQuery::single(0, focus_policy(), LOCATION).ages(vec![]);
    let table = index.get_outcome(&query).unwrap();

    assert!(table.is_empty());
    assert_eq!(table.num_rows(), index.number_of_time_points());
    assert_eq!(table.row(5), Some(vec![]));
    assert_eq!(table.row(6), None);
    assert_eq!(index.container().load_count(), 1);
}

#[test]
fn test_out_of_range_indices() {
    let index = Fixture::example().index();
    let base = OutcomeQuery::single(0, focus_policy(), LOCATION);

    let err = index.get_outcome(&base.clone().risk(2)).unwrap_err();
    assert!(matches!(
        err,
        QueryError::IndexOutOfRange {
            axis: TensorAxis::Risk,
            index: 2,
            len: 2,
        }
    ));

    let err = index.get_outcome(&base.clone().ages(vec![1, 5])).unwrap_err();
    assert!(matches!(
        err,
        QueryError::IndexOutOfRange {
            axis: TensorAxis::AgeGroup,
            index: 5,
            len: 5,
        }
    ));

    let err = index
        .get_outcome(&OutcomeQuery::single(3, focus_policy(), LOCATION))
        .unwrap_err();
    assert!(matches!(
        err,
        QueryError::IndexOutOfRange {
            axis: TensorAxis::Outcome,
            index: 3,
            len: 3,
        }
    ));
}

#[test]
fn test_location_list_longer_than_axis() {
    let fixture = Fixture {
        locations: vec![101, 102, 103, 104, 105, 106],
        ..Fixture::example()
    };
    let index = fixture.index();

    // Position 5 reads location index 4 of a 4-wide axis
    let err = index
        .get_outcome(&OutcomeQuery::single(0, focus_policy(), 106))
        .unwrap_err();
    assert!(matches!(
        err,
        QueryError::IndexOutOfRange {
            axis: TensorAxis::Location,
            index: 4,
            len: 4,
        }
    ));
}

#[test]
fn test_first_stochastic_iteration_answers() {
    let mut fixture = Fixture::example();
    fixture.cases.push([9, 6, 10, 2, 2]);
    fixture.stochastic = true;
    let index = fixture.index();

    let query = OutcomeQuery::single(0, focus_policy(), LOCATION).age(0);
    let first = index.get_outcome(&query).unwrap();
    assert_eq!(
        first.column(0, Some(0)).unwrap()[0],
        Fixture::value(8, 0, [0, 0, LOCATION_INDEX, 0])
    );

    let second = index.outcome_for_run(RunId(9), &query).unwrap();
    assert_eq!(
        second.column(0, Some(0)).unwrap()[0],
        Fixture::value(9, 0, [0, 0, LOCATION_INDEX, 0])
    );

    let err = index.outcome_for_run(RunId(1), &query).unwrap_err();
    assert!(matches!(err, QueryError::UnknownRun(RunId(1))));
}

#[test]
fn test_custom_labels() {
    let fixture = Fixture::example();
    let config = IndexConfig {
        labels: ColumnLabels {
            outcome_prefix: "Outcome".to_string(),
            age_group_prefix: "age".to_string(),
        },
        ..IndexConfig::default()
    };
    let index = SweepIndex::build(fixture.container(), config).unwrap();

    let table = index
        .get_outcome(&OutcomeQuery::single(1, focus_policy(), LOCATION).ages(vec![0, 4]))
        .unwrap();
    assert_eq!(table.labels(), vec!["Outcome1/age0", "Outcome1/age4"]);
}

#[test]
fn test_table_serializes() {
    let index = Fixture::example().index();
    let table = index
        .get_outcome(&OutcomeQuery::single(0, focus_policy(), LOCATION))
        .unwrap();

    let json = serde_json::to_value(&table).unwrap();
    assert_eq!(json["rows"], 6);
    assert_eq!(json["columns"][0]["outcome_label"], "outcome0");
    assert!(table.to_string().starts_with("t\toutcome0\n"));
}
