// ABOUTME: Interval mini-language for addressing layers by position
// ABOUTME: Parses expressions like "#0,#10-#15,#30" and tests index membership

use crate::errors::IntervalError;
use std::fmt;

/// Prefix marking a layer index in an interval expression.
pub const SENTINEL: char = '#';

/// Closed range of layer indexes. A reversed range is kept as written and
/// matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub lower: usize,
    pub upper: usize,
}

impl Interval {
    pub fn new(lower: usize, upper: usize) -> Self {
        Self { lower, upper }
    }

    pub fn single(index: usize) -> Self {
        Self::new(index, index)
    }

    pub fn contains(&self, n: usize) -> bool {
        self.lower <= n && n <= self.upper
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lower == self.upper {
            write!(f, "{}{}", SENTINEL, self.lower)
        } else {
            write!(f, "{}{}-{}{}", SENTINEL, self.lower, SENTINEL, self.upper)
        }
    }
}

/// Parse a comma separated list of `#n` or `#n-#m` items.
///
/// Any malformed item invalidates the whole expression; no partial result is
/// returned.
///
/// ```
/// use inklayers::interval::{parse_interval_expression, Interval};
///
/// let intervals = parse_interval_expression("#0,#10-#15,#30").unwrap();
/// assert_eq!(
///     intervals,
///     vec![Interval::new(0, 0), Interval::new(10, 15), Interval::new(30, 30)]
/// );
/// ```
pub fn parse_interval_expression(text: &str) -> Result<Vec<Interval>, IntervalError> {
    let mut intervals = Vec::new();
    for item in text.split(',') {
        let bounds = item
            .split('-')
            .map(parse_index_token)
            .collect::<Result<Vec<usize>, IntervalError>>()?;
        match bounds.as_slice() {
            [index] => intervals.push(Interval::single(*index)),
            [lower, upper] => intervals.push(Interval::new(*lower, *upper)),
            _ => return Err(IntervalError::TooManyBounds(item.to_string())),
        }
    }
    Ok(intervals)
}

fn parse_index_token(token: &str) -> Result<usize, IntervalError> {
    let token = token.trim();
    let digits = token
        .strip_prefix(SENTINEL)
        .ok_or_else(|| IntervalError::MissingSentinel(token.to_string()))?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(IntervalError::InvalidIndex(token.to_string()));
    }
    digits
        .parse::<usize>()
        .map_err(|_| IntervalError::InvalidIndex(token.to_string()))
}

/// True when any interval contains `n`.
pub fn is_member(n: usize, intervals: &[Interval]) -> bool {
    intervals.iter().any(|interval| interval.contains(n))
}

/// Serialize intervals back into the expression syntax.
pub fn format_intervals(intervals: &[Interval]) -> String {
    intervals
        .iter()
        .map(Interval::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
