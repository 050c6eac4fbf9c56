use tracing::debug;

use crate::attendance::non_blank;
use crate::error::ValidationError;
use crate::models::{AttendanceStatus, Component, ComponentSet, WeightedResult};

fn parse_component(raw: Option<&str>) -> Result<Option<f64>, ValidationError> {
    match non_blank(raw) {
        None => Ok(None),
        Some(value) => value
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ValidationError::InvalidComponentValue),
    }
}

/// Two-decimal text with exact halves rounded up, e.g. 80.125 -> "80.13".
/// Any other value already rounds the same way under `{:.2}`.
pub(crate) fn two_decimals(value: f64) -> String {
    let exact = format!("{value:.60}");
    let is_half = exact
        .split_once('.')
        .map(|(_, fraction)| {
            let rest = &fraction[2..];
            rest.starts_with('5') && rest[1..].bytes().all(|b| b == b'0')
        })
        .unwrap_or(false);

    if is_half {
        let cents = (value * 100.0).round() as u64;
        format!("{}.{:02}", cents / 100, cents % 100)
    } else {
        format!("{value:.2}")
    }
}

fn in_range(value: f64) -> bool {
    (0.0..=100.0).contains(&value)
}

impl ComponentSet {
    /// Builds a set from raw form text. Blank fields stay absent; range
    /// checks happen in [`compute`].
    pub fn parse(
        lecture: Option<&str>,
        tutorial: Option<&str>,
        practical: Option<&str>,
        skilling: Option<&str>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            lecture: parse_component(lecture)?,
            tutorial: parse_component(tutorial)?,
            practical: parse_component(practical)?,
            skilling: parse_component(skilling)?,
        })
    }
}

/// Weighted average over the components that were entered. Omitted
/// components add neither weight nor score.
pub fn compute(components: &ComponentSet) -> Result<WeightedResult, ValidationError> {
    let mut total_weight = 0.0;
    let mut total_score = 0.0;

    for component in Component::ALL {
        if let Some(value) = components.get(component) {
            if !in_range(value) {
                return Err(ValidationError::InvalidComponentValue);
            }
            total_weight += component.weight();
            total_score += value * component.weight();
        }
    }

    if total_weight == 0.0 {
        return Err(ValidationError::NoComponentsProvided);
    }

    let average = total_score / total_weight;
    let values = components.with_defaults();
    let breakdown = Component::ALL
        .iter()
        .filter_map(|component| {
            components
                .get(*component)
                .filter(|value| *value > 0.0)
                .map(|value| format!("{}: {}%", component.label(), value))
        })
        .collect();

    debug!(total_weight, total_score, average, "computed weighted attendance");

    Ok(WeightedResult {
        percentage: two_decimals(average),
        status: AttendanceStatus::classify(average),
        breakdown,
        components: values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lecture_only(value: f64) -> ComponentSet {
        ComponentSet {
            lecture: Some(value),
            ..ComponentSet::default()
        }
    }

    #[test]
    fn single_component_equals_its_value() {
        let result = compute(&lecture_only(100.0)).unwrap();
        assert_eq!(result.percentage, "100.00");
        assert_eq!(result.status, AttendanceStatus::Excellent);
        assert_eq!(result.breakdown, vec!["Lecture: 100%".to_string()]);
    }

    #[test]
    fn weights_lecture_against_tutorial() {
        let set = ComponentSet {
            lecture: Some(80.0),
            tutorial: Some(100.0),
            ..ComponentSet::default()
        };
        let result = compute(&set).unwrap();
        assert_eq!(result.percentage, "84.00");
        assert_eq!(result.status, AttendanceStatus::Good);
    }

    #[test]
    fn omitted_components_are_not_zero() {
        let partial = ComponentSet {
            practical: Some(60.0),
            ..ComponentSet::default()
        };
        let with_zero = ComponentSet {
            lecture: Some(0.0),
            practical: Some(60.0),
            ..ComponentSet::default()
        };
        assert_eq!(compute(&partial).unwrap().percentage, "60.00");
        assert_eq!(compute(&with_zero).unwrap().percentage, "20.00");
    }

    #[test]
    fn keeps_two_decimals() {
        let set = ComponentSet {
            lecture: Some(70.0),
            tutorial: Some(90.0),
            practical: Some(85.0),
            skilling: Some(60.0),
        };
        // (7000 + 2250 + 4250 + 1500) / 200
        let result = compute(&set).unwrap();
        assert_eq!(result.percentage, "75.00");
        assert_eq!(result.status, AttendanceStatus::Good);

        let set = ComponentSet {
            lecture: Some(80.0),
            practical: Some(75.0),
            ..ComponentSet::default()
        };
        // 11750 / 150
        assert_eq!(compute(&set).unwrap().percentage, "78.33");
    }

    #[test]
    fn exact_halves_round_up() {
        let set = ComponentSet::parse(Some("80"), Some("81"), Some("80"), Some("80")).unwrap();
        // 16025 / 200 = 80.125
        assert_eq!(compute(&set).unwrap().percentage, "80.13");
        assert_eq!(compute(&lecture_only(84.375)).unwrap().percentage, "84.38");
        assert_eq!(compute(&lecture_only(0.625)).unwrap().percentage, "0.63");
    }

    #[test]
    fn near_halves_follow_their_binary_value() {
        // 1.005 is stored just below the half
        assert_eq!(two_decimals(1.005), "1.00");
        assert_eq!(two_decimals(1.015), "1.01");
        assert_eq!(two_decimals(99.995), "100.00");
        assert_eq!(two_decimals(100.0), "100.00");
        assert_eq!(two_decimals(0.0), "0.00");
    }

    #[test]
    fn status_uses_unrounded_average() {
        let set = ComponentSet {
            lecture: Some(84.996),
            ..ComponentSet::default()
        };
        let result = compute(&set).unwrap();
        assert_eq!(result.percentage, "85.00");
        assert_eq!(result.status, AttendanceStatus::Good);
    }

    #[test]
    fn breakdown_skips_zero_and_keeps_fixed_order() {
        let set = ComponentSet {
            lecture: Some(0.0),
            tutorial: Some(82.5),
            practical: None,
            skilling: Some(90.0),
        };
        let result = compute(&set).unwrap();
        assert_eq!(
            result.breakdown,
            vec!["Tutorial: 82.5%".to_string(), "Skilling: 90%".to_string()]
        );
        assert_eq!(result.components.practical, 0.0);
        assert_eq!(result.components.tutorial, 82.5);
    }

    #[test]
    fn empty_set_has_no_components() {
        assert_eq!(
            compute(&ComponentSet::default()),
            Err(ValidationError::NoComponentsProvided)
        );
        let blank = ComponentSet::parse(Some(""), None, Some("   "), None).unwrap();
        assert_eq!(compute(&blank), Err(ValidationError::NoComponentsProvided));
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert_eq!(
            compute(&lecture_only(100.5)),
            Err(ValidationError::InvalidComponentValue)
        );
        assert_eq!(
            compute(&lecture_only(-1.0)),
            Err(ValidationError::InvalidComponentValue)
        );
        assert_eq!(
            compute(&lecture_only(f64::NAN)),
            Err(ValidationError::InvalidComponentValue)
        );
    }

    #[test]
    fn rejects_non_numeric_text() {
        assert_eq!(
            ComponentSet::parse(Some("80"), Some("abc"), None, None),
            Err(ValidationError::InvalidComponentValue)
        );
        let parsed = ComponentSet::parse(Some("inf"), None, None, None).unwrap();
        assert_eq!(compute(&parsed), Err(ValidationError::InvalidComponentValue));
    }
}
