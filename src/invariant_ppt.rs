//! Runtime invariants with contract-test support
//!
//! Production code states its invariants with `assert_invariant!`. Every
//! checked invariant is recorded per thread, so a test can drive a code path
//! and then prove with `contract_test` that the invariants it cares about were
//! actually exercised, not merely declared.
//!
//! # Usage
//!
//! ```rust,ignore
//! use docscan::invariant_ppt::*;
//!
//! assert_invariant!(score <= 100, "Quality score stays within 0..=100");
//!
//! #[test]
//! fn contract_analyzer() {
//!     // ... run an analysis ...
//!     contract_test("analyzer", &["Quality score stays within 0..=100"]);
//! }
//! ```

use std::cell::RefCell;
use std::collections::HashSet;
use std::thread_local;

thread_local! {
    static CHECKED: RefCell<HashSet<&'static str>> = RefCell::new(HashSet::new());
}

/// Assert an invariant and record that it was checked.
///
/// Panics with the message and optional context when the condition is false.
#[macro_export]
macro_rules! assert_invariant {
    ($condition:expr, $message:expr) => {
        $crate::invariant_ppt::__assert_invariant_impl($condition, $message, None)
    };
    ($condition:expr, $message:expr, $context:expr) => {
        $crate::invariant_ppt::__assert_invariant_impl($condition, $message, Some($context))
    };
}

#[doc(hidden)]
pub fn __assert_invariant_impl(condition: bool, message: &'static str, context: Option<&str>) {
    CHECKED.with(|checked| {
        checked.borrow_mut().insert(message);
    });

    if !condition {
        panic!(
            "INVARIANT VIOLATION [{}]: {}",
            context.unwrap_or("unknown"),
            message
        );
    }
}

/// Invariants checked so far on this thread
pub fn checked_invariants() -> Vec<&'static str> {
    CHECKED.with(|checked| {
        let mut all: Vec<_> = checked.borrow().iter().copied().collect();
        all.sort_unstable();
        all
    })
}

/// Panic unless every listed invariant was checked on this thread.
pub fn contract_test(test_name: &str, required_invariants: &[&str]) {
    let missing: Vec<&str> = CHECKED.with(|checked| {
        let checked = checked.borrow();
        required_invariants
            .iter()
            .copied()
            .filter(|inv| !checked.contains(*inv))
            .collect()
    });

    if !missing.is_empty() {
        panic!(
            "CONTRACT FAILURE [{}]: invariants never checked:\n  - {}",
            test_name,
            missing.join("\n  - ")
        );
    }
}

/// Forget everything recorded on this thread
pub fn clear_invariant_log() {
    CHECKED.with(|checked| checked.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_invariants_are_recorded() {
        clear_invariant_log();
        assert_invariant!(true, "Recorded invariant");
        assert_eq!(checked_invariants(), vec!["Recorded invariant"]);
        contract_test("recording", &["Recorded invariant"]);
    }

    #[test]
    #[should_panic(expected = "CONTRACT FAILURE")]
    fn test_contract_reports_missing_invariant() {
        clear_invariant_log();
        contract_test("missing", &["Never checked"]);
    }

    #[test]
    #[should_panic(expected = "INVARIANT VIOLATION [unit]")]
    fn test_violation_panics_with_context() {
        assert_invariant!(false, "Always fails", "unit");
    }
}
