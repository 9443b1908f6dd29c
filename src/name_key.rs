//! Sort keys derived from a record's display name.

/// Value reported when a name contains no ASCII digits.
pub const NO_NUMBER: i64 = -1;

/// The two keys a display name contributes to record ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameKey {
    pub alpha: String,
    pub number: i64,
}

impl NameKey {
    pub fn extract(name: &str) -> Self {
        Self {
            alpha: alphabetic_prefix(name),
            number: numeric_value(name),
        }
    }
}

/// Leading run of letters. A name that starts with anything other than a
/// letter has an empty prefix; letters further in are not searched for.
pub fn alphabetic_prefix(name: &str) -> String {
    let prefix: String = name.chars().take_while(|c| c.is_alphabetic()).collect();
    prefix.trim().to_string()
}

/// First run of ASCII digits anywhere in the name, or [`NO_NUMBER`].
/// Digits from other scripts (`'٣'`) are not counted. Runs that overflow
/// `i64` saturate at `i64::MAX`.
pub fn numeric_value(name: &str) -> i64 {
    let mut digits = name
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .map_while(|c| c.to_digit(10))
        .peekable();

    if digits.peek().is_none() {
        return NO_NUMBER;
    }

    digits.fold(0i64, |acc, digit| {
        acc.saturating_mul(10).saturating_add(i64::from(digit))
    })
}
