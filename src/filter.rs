// ABOUTME: Label filtering for slides using intervals and literal labels
// ABOUTME: Resolves include/exclude specifications against the ordered layer labels

use crate::interval::{is_member, parse_interval_expression, Interval};
use log::debug;
use serde::{Deserialize, Deserializer};

/// Include/exclude tokens. Each token is an interval expression or a literal
/// layer label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
}

impl FilterSpec {
    pub fn new(include: Option<Vec<String>>, exclude: Option<Vec<String>>) -> Self {
        Self { include, exclude }
    }

    /// A spec that only includes `tokens`.
    pub fn include_only(tokens: &[String]) -> Self {
        Self::new(Some(tokens.to_vec()), None)
    }
}

/// How a set of tokens modifies an already resolved label list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterAction {
    Add,
    Exclude,
}

/// Accepts either `"L1"` or `["L1", "L2"]` for a token list.
pub(crate) fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(token)) => Some(vec![token]),
        Some(OneOrMany::Many(tokens)) => Some(tokens),
        None => None,
    })
}

/// Turn tokens into index intervals against `labels`.
///
/// A token that parses as an interval expression is used as such and never
/// looked up as a label. Otherwise the first layer with that exact label
/// contributes its index. Unknown labels contribute nothing.
fn collect_intervals(labels: &[String], tokens: Option<&[String]>) -> Vec<Interval> {
    let mut intervals = Vec::new();
    for token in tokens.unwrap_or_default() {
        match parse_interval_expression(token) {
            Ok(parsed) => intervals.extend(parsed),
            Err(_) => match labels.iter().position(|label| label == token) {
                Some(index) => intervals.push(Interval::single(index)),
                None => debug!("Token '{}' matches no interval and no layer label", token),
            },
        }
    }
    intervals
}

/// Filter `labels` by `spec`, preserving document order.
///
/// Nothing is included unless asked for, and an exclusion always beats an
/// inclusion of the same position.
pub fn resolve_labels(labels: &[String], spec: &FilterSpec) -> Vec<String> {
    let include = collect_intervals(labels, spec.include.as_deref());
    let exclude = collect_intervals(labels, spec.exclude.as_deref());

    labels
        .iter()
        .enumerate()
        .filter(|(i, _)| is_member(*i, &include) && !is_member(*i, &exclude))
        .map(|(_, label)| label.clone())
        .collect()
}

/// Apply `tokens` to an already resolved label list.
///
/// The tokens are matched against the full document `labels`. `Add` appends
/// matches not yet present, in document order; `Exclude` removes matches.
pub fn apply_tokens(
    labels: &[String],
    current: &[String],
    tokens: &[String],
    action: FilterAction,
) -> Vec<String> {
    let matched = resolve_labels(labels, &FilterSpec::include_only(tokens));
    match action {
        FilterAction::Add => {
            let mut result = current.to_vec();
            for label in matched {
                if !result.contains(&label) {
                    result.push(label);
                }
            }
            result
        }
        FilterAction::Exclude => current
            .iter()
            .filter(|label| !matched.contains(label))
            .cloned()
            .collect(),
    }
}
