use tracing::debug;

use crate::error::ValidationError;
use crate::models::{AttendanceInput, AttendanceStatus, CalculationResult};

/// Treats `None`, empty and whitespace-only text as "not entered".
pub(crate) fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

/// Parses a whole, non-negative class count. Anything else is rejected
/// rather than coerced.
pub(crate) fn parse_count(raw: &str) -> Result<u32, ValidationError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| ValidationError::InvalidNumber)
}

pub(crate) fn rounded_percentage(part: u32, whole: u32) -> u32 {
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

pub fn parse_input(
    total: Option<&str>,
    attended: Option<&str>,
) -> Result<AttendanceInput, ValidationError> {
    let (total, attended) = match (non_blank(total), non_blank(attended)) {
        (Some(total), Some(attended)) => (total, attended),
        _ => return Err(ValidationError::MissingInput),
    };

    let total_classes = parse_count(total)?;
    let attended_classes = parse_count(attended)?;
    AttendanceInput::new(total_classes, attended_classes)
}

impl AttendanceInput {
    pub fn new(total_classes: u32, attended_classes: u32) -> Result<Self, ValidationError> {
        if total_classes == 0 {
            return Err(ValidationError::InvalidNumber);
        }
        if attended_classes > total_classes {
            return Err(ValidationError::AttendedExceedsTotal);
        }
        Ok(Self {
            total_classes,
            attended_classes,
        })
    }
}

/// Percentage of classes attended, rounded to the nearest whole number.
pub fn evaluate(input: AttendanceInput) -> CalculationResult {
    let percentage = rounded_percentage(input.attended_classes, input.total_classes);
    let result = CalculationResult {
        percentage,
        status: AttendanceStatus::classify(percentage as f64),
    };
    debug!(
        total = input.total_classes,
        attended = input.attended_classes,
        percentage,
        "computed subject attendance"
    );
    result
}

pub fn compute(
    total: Option<&str>,
    attended: Option<&str>,
) -> Result<CalculationResult, ValidationError> {
    parse_input(total, attended).map(evaluate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forty_of_fifty_is_good() {
        let result = compute(Some("50"), Some("40")).unwrap();
        assert_eq!(result.percentage, 80);
        assert_eq!(result.status, AttendanceStatus::Good);
    }

    #[test]
    fn eighteen_of_twenty_is_excellent() {
        let result = compute(Some("20"), Some("18")).unwrap();
        assert_eq!(result.percentage, 90);
        assert_eq!(result.status, AttendanceStatus::Excellent);
    }

    #[test]
    fn rounds_half_up_to_whole_percent() {
        // 1/8 = 12.5%
        assert_eq!(compute(Some("8"), Some("1")).unwrap().percentage, 13);
        // 2/3 = 66.67%
        assert_eq!(compute(Some("3"), Some("2")).unwrap().percentage, 67);
    }

    #[test]
    fn status_follows_rounded_value() {
        // 11/13 = 84.6% rounds to 85
        let result = compute(Some("13"), Some("11")).unwrap();
        assert_eq!(result.percentage, 85);
        assert_eq!(result.status, AttendanceStatus::Excellent);
    }

    #[test]
    fn blank_fields_are_missing() {
        assert_eq!(compute(None, Some("4")), Err(ValidationError::MissingInput));
        assert_eq!(compute(Some("  "), Some("4")), Err(ValidationError::MissingInput));
        assert_eq!(compute(Some("10"), Some("")), Err(ValidationError::MissingInput));
    }

    #[test]
    fn rejects_non_numeric_and_non_positive_totals() {
        assert_eq!(compute(Some("ten"), Some("4")), Err(ValidationError::InvalidNumber));
        assert_eq!(compute(Some("10"), Some("4.5")), Err(ValidationError::InvalidNumber));
        assert_eq!(compute(Some("0"), Some("0")), Err(ValidationError::InvalidNumber));
        assert_eq!(compute(Some("-5"), Some("1")), Err(ValidationError::InvalidNumber));
        assert_eq!(compute(Some("10"), Some("-1")), Err(ValidationError::InvalidNumber));
    }

    #[test]
    fn attended_above_total_always_fails() {
        for total in 1..40u32 {
            for extra in 1..10u32 {
                let attended = total + extra;
                assert_eq!(
                    AttendanceInput::new(total, attended),
                    Err(ValidationError::AttendedExceedsTotal)
                );
                assert_eq!(
                    compute(Some(total.to_string().as_str()), Some(attended.to_string().as_str())),
                    Err(ValidationError::AttendedExceedsTotal)
                );
            }
        }
    }

    #[test]
    fn invalid_number_wins_over_exceeding_total() {
        assert_eq!(compute(Some("0"), Some("3")), Err(ValidationError::InvalidNumber));
    }
}
