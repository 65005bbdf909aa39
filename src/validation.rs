//! Input validation for plane collections.
//!
//! Checks the structural integrity of the planes before any policy runs.
//! Detects:
//! - Empty collections
//! - Empty or duplicate IDs
//! - Non-positive priorities
//! - Missing deadlines (when the policy orders by deadline)
//! - Deadlines that do not fall after the arrival tick
//! - Arrivals too close to the end of the clock range to be served
//!
//! Every problem is reported, not only the first one.

use crate::models::{Plane, Tick};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// No planes were supplied.
    EmptyInput,
    /// A plane has an empty ID.
    EmptyId,
    /// Two planes share the same ID.
    DuplicateId,
    /// A plane's priority is zero.
    InvalidPriority,
    /// The policy orders by deadline but a plane has none.
    MissingDeadline,
    /// A deadline is at or before the arrival tick.
    DeadlineBeforeArrival,
    /// Serving every plane after this arrival would run past `Tick::MAX`.
    HorizonOverflow,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a plane collection.
///
/// Checks:
/// 1. At least one plane
/// 2. Every ID is non-empty and unique
/// 3. Every priority is positive
/// 4. If `require_deadlines`, every plane has a deadline
/// 5. Every deadline present is strictly after the arrival tick
/// 6. `arrival_time + planes.len()` fits in a [`Tick`], so the unit-service
///    policies can finish every plane
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_planes(planes: &[Plane], require_deadlines: bool) -> ValidationResult {
    if planes.is_empty() {
        return Err(vec![ValidationError::new(
            ValidationErrorKind::EmptyInput,
            "No plane data found",
        )]);
    }

    let mut errors = Vec::new();
    let mut ids = HashSet::new();
    let horizon = Tick::try_from(planes.len()).unwrap_or(Tick::MAX);

    for (idx, plane) in planes.iter().enumerate() {
        if plane.id.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyId,
                format!("Plane at index {idx} has an empty ID"),
            ));
        } else if !ids.insert(plane.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate plane ID: {}", plane.id),
            ));
        }

        if plane.priority == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidPriority,
                format!("Plane '{}' has priority 0 (must be positive)", plane.id),
            ));
        }

        if plane.arrival_time.checked_add(horizon).is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::HorizonOverflow,
                format!(
                    "Plane '{}' arrives at {}, too late to serve {} planes before tick {}",
                    plane.id,
                    plane.arrival_time,
                    planes.len(),
                    Tick::MAX
                ),
            ));
        }

        match plane.deadline {
            Some(deadline) if deadline <= plane.arrival_time => {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DeadlineBeforeArrival,
                    format!(
                        "Plane '{}' has deadline {} not after arrival {}",
                        plane.id, deadline, plane.arrival_time
                    ),
                ));
            }
            None if require_deadlines => {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MissingDeadline,
                    format!("Plane '{}' has no deadline", plane.id),
                ));
            }
            _ => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlaneKind;

    fn sample_planes() -> Vec<Plane> {
        vec![
            Plane::new("PL1001")
                .with_kind(PlaneKind::Landing)
                .with_priority(2)
                .with_arrival(0)
                .with_deadline(10),
            Plane::new("PL1002")
                .with_kind(PlaneKind::Takeoff)
                .with_priority(1)
                .with_arrival(3)
                .with_deadline(8),
        ]
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_planes(&sample_planes(), true).is_ok());
        assert!(validate_planes(&sample_planes(), false).is_ok());
    }

    #[test]
    fn test_empty_input() {
        let errors = validate_planes(&[], false).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::EmptyInput);
    }

    #[test]
    fn test_duplicate_id() {
        let planes = vec![Plane::new("PL1"), Plane::new("PL1")];
        let errors = validate_planes(&planes, false).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("PL1")));
    }

    #[test]
    fn test_empty_id() {
        let planes = vec![Plane::new("")];
        let errors = validate_planes(&planes, false).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::EmptyId);
    }

    #[test]
    fn test_zero_priority() {
        let planes = vec![Plane::new("PL1").with_priority(0)];
        let errors = validate_planes(&planes, false).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::InvalidPriority);
    }

    #[test]
    fn test_missing_deadline_only_when_required() {
        let planes = vec![Plane::new("PL1")];
        assert!(validate_planes(&planes, false).is_ok());

        let errors = validate_planes(&planes, true).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::MissingDeadline);
    }

    #[test]
    fn test_deadline_not_after_arrival() {
        let planes = vec![Plane::new("PL1").with_arrival(5).with_deadline(5)];
        let errors = validate_planes(&planes, false).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::DeadlineBeforeArrival);
    }

    #[test]
    fn test_arrival_near_clock_limit() {
        let planes = vec![Plane::new("PL1").with_arrival(Tick::MAX)];
        let errors = validate_planes(&planes, false).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::HorizonOverflow);

        // Two planes need two ticks after the latest arrival.
        let planes = vec![
            Plane::new("PL1").with_arrival(Tick::MAX - 2),
            Plane::new("PL2").with_arrival(Tick::MAX - 1),
        ];
        let errors = validate_planes(&planes, false).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("PL2"));

        let planes = vec![Plane::new("PL1").with_arrival(Tick::MAX - 1)];
        assert!(validate_planes(&planes, false).is_ok());
    }

    #[test]
    fn test_multiple_errors() {
        let planes = vec![
            Plane::new("PL1").with_priority(0),
            Plane::new("PL1").with_arrival(9).with_deadline(2),
        ];
        let errors = validate_planes(&planes, true).unwrap_err();
        // zero priority, duplicate id, bad deadline, missing deadline
        assert_eq!(errors.len(), 4);
    }
}
