//! Per-owner project number allocation.
//!
//! Every owner has one counter row holding the next number to hand out. The
//! store reads the row and applies [`advance_counter`] inside a single
//! transaction, so concurrent creations for the same owner serialize on that
//! row and never observe the same value. Counters are never decremented,
//! which keeps numbers unique after projects are deleted.

use crate::error::CoreError;

/// Number handed out on an owner's first allocation.
pub const FIRST_PROJECT_NUMBER: i64 = 1;

/// Result of one allocation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    /// The number issued to the caller.
    pub issued: i64,
    /// The value the counter must hold after this step.
    pub next: i64,
    /// `true` when no counter existed and one must be created.
    pub created: bool,
}

/// Reject empty or whitespace-only owner ids.
pub fn validate_owner_id(owner_id: &str) -> Result<(), CoreError> {
    if owner_id.trim().is_empty() {
        return Err(CoreError::InvalidArgument("Invalid userId provided".into()));
    }
    Ok(())
}

/// Compute the next allocation from the counter's current value.
///
/// `None` means the owner has no counter yet.
pub fn advance_counter(current: Option<i64>) -> Result<Allocation, CoreError> {
    match current {
        None => Ok(Allocation {
            issued: FIRST_PROJECT_NUMBER,
            next: FIRST_PROJECT_NUMBER + 1,
            created: true,
        }),
        Some(n) if n < FIRST_PROJECT_NUMBER => Err(CoreError::CorruptState(
            "Invalid counter state detected".into(),
        )),
        Some(n) => {
            let next = n.checked_add(1).ok_or_else(|| {
                CoreError::CorruptState("Project counter overflow".into())
            })?;
            Ok(Allocation {
                issued: n,
                next,
                created: false,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn first_allocation_issues_one() {
        let alloc = advance_counter(None).unwrap();
        assert_eq!(alloc.issued, 1);
        assert_eq!(alloc.next, 2);
        assert!(alloc.created);
    }

    #[test]
    fn existing_counter_issues_its_value() {
        let alloc = advance_counter(Some(7)).unwrap();
        assert_eq!(alloc.issued, 7);
        assert_eq!(alloc.next, 8);
        assert!(!alloc.created);
    }

    #[test]
    fn repeated_steps_produce_contiguous_sequence() {
        let mut counter = None;
        let mut issued = Vec::new();
        for _ in 0..5 {
            let alloc = advance_counter(counter).unwrap();
            issued.push(alloc.issued);
            counter = Some(alloc.next);
        }
        assert_eq!(issued, vec![1, 2, 3, 4, 5]);
        assert_eq!(counter, Some(6));
    }

    #[test]
    fn zero_or_negative_counter_is_corrupt() {
        assert_matches!(advance_counter(Some(0)), Err(CoreError::CorruptState(_)));
        assert_matches!(advance_counter(Some(-3)), Err(CoreError::CorruptState(_)));
    }

    #[test]
    fn overflowing_counter_is_corrupt() {
        assert_matches!(
            advance_counter(Some(i64::MAX)),
            Err(CoreError::CorruptState(_))
        );
    }

    #[test]
    fn blank_owner_ids_are_rejected() {
        assert_matches!(validate_owner_id(""), Err(CoreError::InvalidArgument(_)));
        assert_matches!(validate_owner_id("   "), Err(CoreError::InvalidArgument(_)));
        assert!(validate_owner_id("u1").is_ok());
    }
}
