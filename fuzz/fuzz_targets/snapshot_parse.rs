#![no_main]

//! Fuzz target for matrix snapshot parsing and header expansion.

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    // Must never panic, whatever the table looks like.
    if let Ok(matrix) = trmcheck_matrix::parse_snapshot(s, "fuzz") {
        assert!(!matrix.tool_id.is_empty());
        assert!(!matrix.matrix.columns.is_empty());
    }

    if let Ok(val) = serde_json::from_str::<serde_json::Value>(s) {
        let _ = serde_json::from_value::<trmcheck_types::matrix::MatrixSnapshot>(val);
    }
});
