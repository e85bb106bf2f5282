#![no_main]

//! Fuzz target for decision lookup and replacement search over arbitrary matrices.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use trmcheck_domain::{QuarterIndex, column_pairs, find_next, lookup};
use trmcheck_types::DECISION_NOT_FOUND;
use trmcheck_types::matrix::{DecisionMatrix, VersionRow};

#[derive(Debug, Arbitrary)]
struct Input {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    target: String,
    version: String,
}

fuzz_target!(|input: Input| {
    let rows = input.rows.into_iter().map(VersionRow::from_cells).collect();
    let matrix = DecisionMatrix::new(input.columns.clone(), rows);
    let index = QuarterIndex::from_labels(input.columns);

    let found = lookup(&matrix, &input.target, &index, &input.version);
    if !found.is_found() {
        assert_eq!(found.decision, DECISION_NOT_FOUND);
    }

    let pairs = column_pairs(&matrix, &index, &input.target);
    let next = find_next(&input.version, &pairs);
    if let Some(version) = &next.version {
        assert!(pairs.iter().any(|(label, _)| label == version));
    }
});
