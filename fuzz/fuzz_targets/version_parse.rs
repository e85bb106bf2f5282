#![no_main]

//! Fuzz target for version label parsing.
//!
//! Both spellings produced by `normalize` must parse to the same number.

use libfuzzer_sys::fuzz_target;
use trmcheck_domain::{VersionToken, normalize};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let token = VersionToken::parse(s);
    let toggled = VersionToken::parse(&normalize(s));
    assert_eq!(token.value(), toggled.value());

    if let Some(value) = token.value() {
        let reparsed = VersionToken::parse(&value.to_string());
        assert_eq!(reparsed.value(), Some(value));
    }
});
