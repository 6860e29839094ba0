//! Wall-clock budget for a batch.

use std::time::{Duration, Instant};

/// Optional deadline shared (by reference) by every stage of one batch.
///
/// Stages check [`Deadline::expired`] before starting a new unit of work and keep
/// whatever they already finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// A deadline that never expires.
    pub fn none() -> Self {
        Self { at: None }
    }

    /// A deadline `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now().checked_add(budget),
        }
    }

    /// `after(budget)` when a budget is given, otherwise [`Deadline::none`].
    pub fn from_budget(budget: Option<Duration>) -> Self {
        budget.map(Self::after).unwrap_or_else(Self::none)
    }

    #[inline]
    pub fn expired(&self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }

    pub fn is_bounded(&self) -> bool {
        self.at.is_some()
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_deadline_never_expires() {
        let deadline = Deadline::none();
        assert!(!deadline.expired());
        assert!(!deadline.is_bounded());
    }

    #[test]
    fn test_zero_budget_expires_immediately() {
        let deadline = Deadline::after(Duration::ZERO);
        assert!(deadline.expired());
        assert!(deadline.is_bounded());
    }

    #[test]
    fn test_generous_budget_not_expired() {
        let deadline = Deadline::from_budget(Some(Duration::from_secs(3600)));
        assert!(!deadline.expired());
    }
}
