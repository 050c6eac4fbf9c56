use thiserror::Error;

/// Input problems detected before any arithmetic runs. Only the first
/// violated rule is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter both total and attended classes.")]
    MissingInput,
    #[error("Please enter valid positive numbers.")]
    InvalidNumber,
    #[error("Attended classes cannot be more than total classes.")]
    AttendedExceedsTotal,
    #[error("Projected absences cannot be more than attended classes.")]
    AbsencesExceedAttended,
    #[error("Please enter at least one component percentage.")]
    NoComponentsProvided,
    #[error("Please enter valid percentages (0-100).")]
    InvalidComponentValue,
}
