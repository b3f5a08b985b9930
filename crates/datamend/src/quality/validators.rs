//! Column-specific validity rules.
//!
//! A [`ValidationRegistry`] maps a column matcher (exact name or regex) to a
//! [`FieldValidator`]. The default registry knows about email-like and
//! score-like columns; callers add their own rules with
//! [`ValidationRegistry::with_rule`].

use crate::types::FieldValue;
use regex::Regex;
use std::fmt;

/// Column checked by [`ValidationRegistry::with_study_hours_limit`].
pub const STUDY_HOURS_COLUMN: &str = "weekly_self_study_hours";

/// Hours in a week above which self-study time is implausible.
pub const MAX_WEEKLY_STUDY_HOURS: f64 = 80.0;

/// Predicate over a single non-blank field value.
pub trait FieldValidator: Send + Sync {
    /// Short rule name shown in reports.
    fn name(&self) -> &str;

    /// Return `true` if the value is acceptable.
    fn is_valid(&self, value: &FieldValue) -> bool;
}

/// Value text must contain a substring.
pub struct ContainsValidator {
    name: String,
    needle: String,
}

impl ContainsValidator {
    pub fn new(name: impl Into<String>, needle: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            needle: needle.into(),
        }
    }
}

impl FieldValidator for ContainsValidator {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_valid(&self, value: &FieldValue) -> bool {
        value.to_string().contains(&self.needle)
    }
}

/// Value must parse as a number within `[min, max]`.
pub struct RangeValidator {
    name: String,
    min: f64,
    max: f64,
}

impl RangeValidator {
    pub fn new(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
        }
    }
}

impl FieldValidator for RangeValidator {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_valid(&self, value: &FieldValue) -> bool {
        value
            .as_strict_number()
            .is_some_and(|n| n >= self.min && n <= self.max)
    }
}

/// Numeric values must not exceed `max`. Values that do not parse as a
/// number pass.
pub struct UpperBoundValidator {
    name: String,
    max: f64,
}

impl UpperBoundValidator {
    pub fn new(name: impl Into<String>, max: f64) -> Self {
        Self {
            name: name.into(),
            max,
        }
    }
}

impl FieldValidator for UpperBoundValidator {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_valid(&self, value: &FieldValue) -> bool {
        value.as_strict_number().is_none_or(|n| n <= self.max)
    }
}

/// Value text must match a regular expression.
pub struct PatternValidator {
    name: String,
    pattern: Regex,
}

impl PatternValidator {
    pub fn new(name: impl Into<String>, pattern: Regex) -> Self {
        Self {
            name: name.into(),
            pattern,
        }
    }
}

impl FieldValidator for PatternValidator {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_valid(&self, value: &FieldValue) -> bool {
        self.pattern.is_match(&value.to_string())
    }
}

/// Selects the columns a rule applies to.
#[derive(Debug, Clone)]
pub enum ColumnMatcher {
    /// Exact column name.
    Exact(String),
    /// Any column whose name matches the regex.
    Pattern(Regex),
}

impl ColumnMatcher {
    pub fn matches(&self, column: &str) -> bool {
        match self {
            Self::Exact(name) => name == column,
            Self::Pattern(re) => re.is_match(column),
        }
    }
}

impl fmt::Display for ColumnMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(name) => f.write_str(name),
            Self::Pattern(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

/// A matcher paired with a validator.
pub struct ValidationRule {
    pub matcher: ColumnMatcher,
    pub validator: Box<dyn FieldValidator>,
}

/// Ordered collection of validation rules.
pub struct ValidationRegistry {
    rules: Vec<ValidationRule>,
}

static_assertions::assert_impl_all!(ValidationRegistry: Send, Sync);

impl Default for ValidationRegistry {
    /// Email-like columns must contain `@`; score-like columns must be a
    /// number in `[0, 100]`.
    fn default() -> Self {
        let email = Regex::new(r"(?i)^e-?mail(_address)?$").expect("valid email column regex");
        let score = Regex::new(r"(?i)(^|_)score$").expect("valid score column regex");

        Self::empty()
            .with_rule(
                ColumnMatcher::Pattern(email),
                ContainsValidator::new("email_format", "@"),
            )
            .with_rule(
                ColumnMatcher::Pattern(score),
                RangeValidator::new("score_range", 0.0, 100.0),
            )
    }
}

impl ValidationRegistry {
    /// A registry with no rules.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a rule.
    pub fn with_rule(
        mut self,
        matcher: ColumnMatcher,
        validator: impl FieldValidator + 'static,
    ) -> Self {
        self.rules.push(ValidationRule {
            matcher,
            validator: Box::new(validator),
        });
        self
    }

    /// Add the `study_hours_limit` rule: `weekly_self_study_hours` above 80
    /// is flagged. Not part of the default registry.
    pub fn with_study_hours_limit(self) -> Self {
        self.with_rule(
            ColumnMatcher::Exact(STUDY_HOURS_COLUMN.to_string()),
            UpperBoundValidator::new("study_hours_limit", MAX_WEEKLY_STUDY_HOURS),
        )
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules that apply to `column`, in registration order.
    pub fn rules_for<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a ValidationRule> {
        self.rules.iter().filter(move |r| r.matcher.matches(column))
    }

    /// Names of the rules `value` fails in `column`. Blank values are never
    /// checked.
    pub fn failures<'a>(&'a self, column: &'a str, value: &FieldValue) -> Vec<&'a str> {
        if value.is_blank() {
            return Vec::new();
        }
        self.rules_for(column)
            .filter(|r| !r.validator.is_valid(value))
            .map(|r| r.validator.name())
            .collect()
    }
}

impl fmt::Debug for ValidationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.rules
                    .iter()
                    .map(|r| format!("{} => {}", r.matcher, r.validator.name())),
            )
            .finish()
    }
}
