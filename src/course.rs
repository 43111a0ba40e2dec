use crate::assignment::Assignment;

/// A course and the assignments currently counted towards its grade.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    code: String,
    assignments: Vec<Assignment>,
    average: f64,
}

impl Course {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            assignments: Vec::new(),
            average: 0.0,
        }
    }

    pub fn with_assignments(code: impl Into<String>, assignments: Vec<Assignment>) -> Self {
        let mut course = Self::new(code);
        course.replace_assignments(assignments);
        course
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Average as of the last assignment update.
    pub fn average(&self) -> f64 {
        self.average
    }

    /// Weighted average as a percentage rounded to two decimals.
    ///
    /// Returns `0.0` when the assignments carry no weight at all.
    pub fn calculate_average(&self) -> f64 {
        let mut total_weight = 0.0;
        let mut weighted = 0.0;
        for assignment in &self.assignments {
            total_weight += assignment.weight();
            weighted += assignment.percentage() * assignment.weight();
        }

        if total_weight == 0.0 {
            return 0.0;
        }
        round_to_hundredths(weighted / total_weight * 100.0)
    }

    /// Swaps in a fully validated assignment list and refreshes the average.
    pub fn replace_assignments(&mut self, assignments: Vec<Assignment>) {
        self.assignments = assignments;
        self.average = self.calculate_average();
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(round_to_hundredths(86.004), 86.0);
        assert_eq!(round_to_hundredths(66.666_666), 66.67);
    }
}
