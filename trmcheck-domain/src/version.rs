use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

/// First `major` or `major.minor` run anywhere in the string.
static NUMERIC_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)(?:\.([0-9]+))?").expect("numeric run regex"));

static BARE_MAJOR_MINOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]+$").expect("major.minor regex"));

const WILDCARD_SUFFIX: &str = ".x";

/// Dotted `major.minor` number. A missing minor component reads as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionNumber {
    pub major: u64,
    pub minor: u64,
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// A raw version label paired with its comparable numeric form.
///
/// Tokens without a numeric value (e.g. `"Latest"`) never compare equal, less, or greater than
/// anything, including themselves; callers must leave them out of orderings.
#[derive(Debug, Clone)]
pub struct VersionToken {
    raw: String,
    alternate: String,
    value: Option<VersionNumber>,
}

impl VersionToken {
    pub fn parse(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            alternate: normalize(raw),
            value: numeric_value(raw),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The `.x`-toggled spelling of the raw label, see [`normalize`].
    pub fn alternate(&self) -> &str {
        &self.alternate
    }

    pub fn value(&self) -> Option<VersionNumber> {
        self.value
    }

    pub fn is_orderable(&self) -> bool {
        self.value.is_some()
    }
}

impl PartialEq for VersionToken {
    fn eq(&self, other: &Self) -> bool {
        matches!((self.value, other.value), (Some(a), Some(b)) if a == b)
    }
}

impl PartialOrd for VersionToken {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.value?.cmp(&other.value?))
    }
}

/// Toggles the `.x` wildcard spelling of a version label.
///
/// `"10.x"` becomes `"10"`, a bare `"1.2"` becomes `"1.2.x"`, anything else is returned as is.
/// Both spellings always parse to the same [`VersionNumber`].
pub fn normalize(raw: &str) -> String {
    if let Some(stripped) = raw.strip_suffix(WILDCARD_SUFFIX) {
        stripped.to_string()
    } else if BARE_MAJOR_MINOR.is_match(raw) {
        format!("{raw}{WILDCARD_SUFFIX}")
    } else {
        raw.to_string()
    }
}

fn numeric_value(raw: &str) -> Option<VersionNumber> {
    let caps = NUMERIC_RUN.captures(raw)?;
    let major = caps.get(1)?.as_str().parse().ok()?;
    let minor = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    Some(VersionNumber { major, minor })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(raw: &str) -> Option<VersionNumber> {
        VersionToken::parse(raw).value()
    }

    #[test]
    fn parses_first_numeric_run() {
        assert_eq!(value("1.2"), Some(VersionNumber { major: 1, minor: 2 }));
        assert_eq!(value("Win 10.x"), Some(VersionNumber { major: 10, minor: 0 }));
        assert_eq!(value("v3.14.15"), Some(VersionNumber { major: 3, minor: 14 }));
        assert_eq!(value("2019 R2"), Some(VersionNumber { major: 2019, minor: 0 }));
    }

    #[test]
    fn unparseable_has_no_value() {
        assert_eq!(value("Latest"), None);
        assert_eq!(value(""), None);
        assert_eq!(value("99999999999999999999999"), None);
    }

    #[test]
    fn unparseable_tokens_never_compare() {
        let a = VersionToken::parse("Latest");
        let b = VersionToken::parse("Latest");
        let one = VersionToken::parse("1.0");
        assert!(a != b);
        assert!(a != one);
        assert_eq!(a.partial_cmp(&one), None);
        assert_eq!(one.partial_cmp(&a), None);
    }

    #[test]
    fn ordering_is_major_then_minor() {
        let v1_9 = VersionToken::parse("1.9");
        let v1_10 = VersionToken::parse("1.10");
        let v2 = VersionToken::parse("2");
        assert!(v1_9 < v1_10);
        assert!(v1_10 < v2);
        assert!(VersionToken::parse("10") == VersionToken::parse("10.0"));
    }

    #[test]
    fn normalize_toggles_wildcard_suffix() {
        assert_eq!(normalize("10.x"), "10");
        assert_eq!(normalize("Win 10.x"), "Win 10");
        assert_eq!(normalize("1.2"), "1.2.x");
        assert_eq!(normalize("1.2.3"), "1.2.3");
        assert_eq!(normalize("Win 10"), "Win 10");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn token_keeps_raw_and_alternate() {
        let t = VersionToken::parse("8.x");
        assert_eq!(t.raw(), "8.x");
        assert_eq!(t.alternate(), "8");
        assert!(t.is_orderable());
    }
}
