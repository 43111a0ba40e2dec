use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum AssignmentError {
    #[error("earned marks must be zero or more (got {0})")]
    NegativeEarned(f64),
    #[error("total marks must be greater than 0 (got {0})")]
    NonPositiveTotal(f64),
    #[error("weight must be zero or more (got {0})")]
    NegativeWeight(f64),
    #[error("marks and weight must be finite numbers")]
    NonFinite,
}

/// One graded item of a course.
///
/// Values can only be built through [`Assignment::new`], which guarantees
/// `total > 0`, `earned >= 0` and `weight >= 0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    name: String,
    earned: f64,
    total: f64,
    weight: f64,
}

impl Assignment {
    pub fn new(
        name: impl Into<String>,
        earned: f64,
        total: f64,
        weight: f64,
    ) -> Result<Self, AssignmentError> {
        if !(earned.is_finite() && total.is_finite() && weight.is_finite()) {
            return Err(AssignmentError::NonFinite);
        }
        if earned < 0.0 {
            return Err(AssignmentError::NegativeEarned(earned));
        }
        if total <= 0.0 {
            return Err(AssignmentError::NonPositiveTotal(total));
        }
        if weight < 0.0 {
            return Err(AssignmentError::NegativeWeight(weight));
        }
        Ok(Self {
            name: name.into(),
            earned,
            total,
            weight,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn earned(&self) -> f64 {
        self.earned
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Fraction of the marks earned, in `0.0..` (not rounded).
    pub fn percentage(&self) -> f64 {
        self.earned / self.total
    }
}
