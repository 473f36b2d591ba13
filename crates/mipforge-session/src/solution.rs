//! Solution values returned to callers.

use std::ops::Index;

/// Copy of a session's best solution: one value per column plus the objective.
///
/// # Example
///
/// ```
/// use mipforge_session::SolutionVector;
///
/// let solution = SolutionVector::new(vec![0.0, 5.0], 40.0);
/// assert_eq!(solution.len(), 2);
/// assert_eq!(solution[1], 5.0);
/// assert_eq!(Vec::from(solution), vec![0.0, 5.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionVector {
    values: Vec<f64>,
    objective: f64,
}

impl SolutionVector {
    pub fn new(values: Vec<f64>, objective: f64) -> Self {
        Self { values, objective }
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    pub fn objective(&self) -> f64 {
        self.objective
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, col: usize) -> Option<f64> {
        self.values.get(col).copied()
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }
}

impl Index<usize> for SolutionVector {
    type Output = f64;

    fn index(&self, col: usize) -> &f64 {
        &self.values[col]
    }
}

impl AsRef<[f64]> for SolutionVector {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

impl From<SolutionVector> for Vec<f64> {
    fn from(solution: SolutionVector) -> Self {
        solution.values
    }
}
