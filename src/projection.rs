use tracing::debug;

use crate::attendance::{non_blank, parse_count, rounded_percentage};
use crate::error::ValidationError;
use crate::models::{
    AttendanceInput, AttendanceStatus, CalculationResult, ClassesNeeded, ImprovementPlan,
    ProjectionInput, EXCELLENT_THRESHOLD, GOOD_THRESHOLD,
};

/// Simulated classes tried before the search gives up.
pub const SEARCH_LIMIT: u32 = 200;

impl ProjectionInput {
    pub fn new(total: u32, attended: u32, planned_absences: u32) -> Result<Self, ValidationError> {
        if total == 0 {
            return Err(ValidationError::InvalidNumber);
        }
        if attended > total {
            return Err(ValidationError::AttendedExceedsTotal);
        }
        if planned_absences > attended {
            return Err(ValidationError::AbsencesExceedAttended);
        }
        Ok(Self {
            total,
            attended,
            planned_absences,
        })
    }

    /// Percentage left if `planned_absences` of the attended classes are
    /// missed instead.
    pub fn projected_percentage(&self) -> u32 {
        rounded_percentage(self.attended - self.planned_absences, self.total)
    }
}

pub fn project_with_absences(
    total: u32,
    attended: u32,
    planned_absences: u32,
) -> Result<u32, ValidationError> {
    ProjectionInput::new(total, attended, planned_absences).map(|input| input.projected_percentage())
}

fn ratio_percent(attended: u64, total: u64) -> f64 {
    (attended as f64 / total as f64) * 100.0
}

/// Number of further classes, all attended back to back, before the running
/// percentage reaches `target_percent`. Each simulated class raises both
/// attended and total by one. Counts are checked like [`AttendanceInput::new`].
pub fn classes_needed_for_target(
    attended: u32,
    total: u32,
    target_percent: f64,
) -> Result<ClassesNeeded, ValidationError> {
    let input = AttendanceInput::new(total, attended)?;
    let mut future_attended = u64::from(input.attended_classes);
    let mut future_total = u64::from(input.total_classes);

    if ratio_percent(future_attended, future_total) >= target_percent {
        return Ok(ClassesNeeded::Count(0));
    }

    let mut needed = 0u32;
    while ratio_percent(future_attended, future_total) < target_percent {
        future_attended += 1;
        future_total += 1;
        needed += 1;
        if needed > SEARCH_LIMIT {
            return Ok(ClassesNeeded::Unbounded);
        }
    }
    Ok(ClassesNeeded::Count(needed))
}

/// Current standing, the what-if for planned absences, and the classes
/// needed for both thresholds. A blank absences field skips the what-if.
pub fn plan(
    total: Option<&str>,
    attended: Option<&str>,
    planned_absences: Option<&str>,
) -> Result<ImprovementPlan, ValidationError> {
    let (total, attended) = match (non_blank(total), non_blank(attended)) {
        (Some(total), Some(attended)) => (total, attended),
        _ => return Err(ValidationError::MissingInput),
    };

    let total = parse_count(total)?;
    let attended = parse_count(attended)?;
    let planned_absences = non_blank(planned_absences).map(parse_count).transpose()?;

    let input = ProjectionInput::new(total, attended, planned_absences.unwrap_or(0))?;

    let current_percentage = rounded_percentage(input.attended, input.total);
    let current = CalculationResult {
        percentage: current_percentage,
        status: AttendanceStatus::classify(current_percentage as f64),
    };
    let projected = planned_absences.map(|_| {
        let percentage = input.projected_percentage();
        CalculationResult {
            percentage,
            status: AttendanceStatus::classify(percentage as f64),
        }
    });

    let needed_for_excellent = classes_needed_for_target(attended, total, EXCELLENT_THRESHOLD)?;
    let needed_for_good = classes_needed_for_target(attended, total, GOOD_THRESHOLD)?;

    debug!(
        total,
        attended,
        ?planned_absences,
        %needed_for_excellent,
        %needed_for_good,
        "built improvement plan"
    );

    Ok(ImprovementPlan {
        current,
        projected,
        planned_absences,
        needed_for_excellent,
        needed_for_good,
    })
}
