use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const EXCELLENT_THRESHOLD: f64 = 85.0;
pub const GOOD_THRESHOLD: f64 = 75.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Excellent,
    Good,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
}

impl AttendanceStatus {
    pub fn classify(percentage: f64) -> Self {
        if percentage >= EXCELLENT_THRESHOLD {
            AttendanceStatus::Excellent
        } else if percentage >= GOOD_THRESHOLD {
            AttendanceStatus::Good
        } else {
            AttendanceStatus::NeedsImprovement
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AttendanceStatus::Excellent => "Excellent",
            AttendanceStatus::Good => "Good",
            AttendanceStatus::NeedsImprovement => "Needs Improvement",
        }
    }

    /// Short advice line shown under a percentage.
    pub fn advice(self) -> &'static str {
        match self {
            AttendanceStatus::Excellent => "Excellent! Keep up the great work!",
            AttendanceStatus::Good => "Good, but aim higher for a buffer.",
            AttendanceStatus::NeedsImprovement => "This needs immediate attention!",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validated class counts: `total > 0` and `attended <= total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceInput {
    pub total_classes: u32,
    pub attended_classes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalculationResult {
    pub percentage: u32,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Lecture,
    Tutorial,
    Practical,
    Skilling,
}

impl Component {
    /// Fixed evaluation order, also used for the breakdown.
    pub const ALL: [Component; 4] = [
        Component::Lecture,
        Component::Tutorial,
        Component::Practical,
        Component::Skilling,
    ];

    pub fn weight(self) -> f64 {
        match self {
            Component::Lecture => 100.0,
            Component::Tutorial => 25.0,
            Component::Practical => 50.0,
            Component::Skilling => 25.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Component::Lecture => "Lecture",
            Component::Tutorial => "Tutorial",
            Component::Practical => "Practical",
            Component::Skilling => "Skilling",
        }
    }
}

/// Component percentages; `None` means the field was left blank.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ComponentSet {
    pub lecture: Option<f64>,
    pub tutorial: Option<f64>,
    pub practical: Option<f64>,
    pub skilling: Option<f64>,
}

impl ComponentSet {
    pub fn get(&self, component: Component) -> Option<f64> {
        match component {
            Component::Lecture => self.lecture,
            Component::Tutorial => self.tutorial,
            Component::Practical => self.practical,
            Component::Skilling => self.skilling,
        }
    }

    pub fn with_defaults(&self) -> ComponentValues {
        ComponentValues {
            lecture: self.lecture.unwrap_or(0.0),
            tutorial: self.tutorial.unwrap_or(0.0),
            practical: self.practical.unwrap_or(0.0),
            skilling: self.skilling.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeightedResult {
    /// Weighted average formatted to two decimal places.
    pub percentage: String,
    pub status: AttendanceStatus,
    pub breakdown: Vec<String>,
    pub components: ComponentValues,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionInput {
    pub total: u32,
    pub attended: u32,
    pub planned_absences: u32,
}

/// Result of the classes-needed search.
///
/// `Count` orders before `Unbounded`, so comparisons read as "needs fewer".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ClassesNeeded {
    Count(u32),
    Unbounded,
}

impl fmt::Display for ClassesNeeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassesNeeded::Count(count) => write!(f, "{count}"),
            ClassesNeeded::Unbounded => f.write_str("many"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImprovementPlan {
    pub current: CalculationResult,
    pub projected: Option<CalculationResult>,
    pub planned_absences: Option<u32>,
    pub needed_for_excellent: ClassesNeeded,
    pub needed_for_good: ClassesNeeded,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentValues {
    #[serde(rename = "lect")]
    pub lecture: f64,
    #[serde(rename = "tut")]
    pub tutorial: f64,
    #[serde(rename = "pract")]
    pub practical: f64,
    #[serde(rename = "skill")]
    pub skilling: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "subject")]
    pub subject_label: String,
    pub percentage: String,
    #[serde(rename = "timestamp")]
    pub timestamp_display: String,
    pub components: ComponentValues,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub text: String,
    pub date: String,
}
