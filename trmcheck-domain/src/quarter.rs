use chrono::{Datelike, Local, NaiveDate};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A calendar year and quarter, labelled `"CY{year} Q{quarter}"` on decision pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quarter {
    year: i32,
    quarter: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuarterParseError {
    #[error("invalid quarter label '{0}': expected 'CY<year> Q<1-4>'")]
    Format(String),

    #[error("quarter {0} is out of range 1-4")]
    OutOfRange(u8),
}

impl Quarter {
    pub fn new(year: i32, quarter: u8) -> Result<Self, QuarterParseError> {
        if !(1..=4).contains(&quarter) {
            return Err(QuarterParseError::OutOfRange(quarter));
        }
        Ok(Self { year, quarter })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            quarter: (date.month0() / 3 + 1) as u8,
        }
    }

    /// Quarter of today's date on the local clock.
    pub fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn quarter(&self) -> u8 {
        self.quarter
    }

    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CY{} Q{}", self.year, self.quarter)
    }
}

impl FromStr for Quarter {
    type Err = QuarterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format_err = || QuarterParseError::Format(s.to_string());
        let mut parts = s.split_whitespace();
        let (Some(year_part), Some(quarter_part), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(format_err());
        };

        let year = strip_prefix_ignore_case(year_part, "CY")
            .and_then(|y| y.parse::<i32>().ok())
            .ok_or_else(format_err)?;
        let quarter = strip_prefix_ignore_case(quarter_part, "Q")
            .and_then(|q| q.parse::<u8>().ok())
            .ok_or_else(format_err)?;

        Quarter::new(year, quarter)
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

/// Maps quarter labels to zero-based column offsets.
///
/// Offsets count decision columns only; the version label column is not included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuarterIndex {
    labels: Vec<String>,
    offsets: HashMap<String, usize>,
}

impl QuarterIndex {
    /// Three-year window around `year`: Q1 of `year - 1` through Q4 of `year + 1`, oldest first.
    pub fn build(year: i32) -> Self {
        let year = i64::from(year);
        Self::from_labels(
            (year - 1..=year + 1)
                .flat_map(|y| (1..=4).map(move |q| format!("CY{y} Q{q}"))),
        )
    }

    /// Index over a matrix header as published. The first occurrence of a repeated label wins.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let mut offsets = HashMap::with_capacity(labels.len());
        for (offset, label) in labels.iter().enumerate() {
            offsets.entry(label.clone()).or_insert(offset);
        }
        Self { labels, offsets }
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.offsets.get(label).copied()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.offsets.contains_key(label)
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Labels in column order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}
