//! Testing utilities for tencode.
//!
//! This module provides common assertion helpers that can be used in both
//! unit tests and integration tests.
//!
//! ```ignore
//! use tencode::testing::{assert_slices_approx_eq, DEFAULT_TOLERANCE};
//! use tencode::assert_approx_eq;
//! ```

// =============================================================================
// Constants
// =============================================================================

/// Default tolerance for floating point comparisons.
/// This is appropriate for most encodings where values are O(1).
pub const DEFAULT_TOLERANCE: f32 = 1e-5;

// =============================================================================
// Floating Point Assertions
// =============================================================================

/// Assert that two f32 values are approximately equal.
///
/// Uses absolute difference comparison with the given tolerance.
///
/// # Examples
///
/// ```
/// # use tencode::assert_approx_eq;
/// assert_approx_eq!(1.0f32, 1.0001f32, 0.001);
/// ```
///
/// # Panics
///
/// Panics if the absolute difference exceeds tolerance.
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $tolerance:expr) => {{
        let left_val = $left;
        let right_val = $right;
        let tol = $tolerance;
        let diff = (left_val - right_val).abs();
        if diff > tol {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`\n right: `{:?}`\n  diff: `{:?}` > tolerance `{:?}`",
                left_val, right_val, diff, tol
            );
        }
    }};
    ($left:expr, $right:expr, $tolerance:expr, $($arg:tt)+) => {{
        let left_val = $left;
        let right_val = $right;
        let tol = $tolerance;
        let diff = (left_val - right_val).abs();
        if diff > tol {
            panic!(
                "assertion failed: `(left ≈ right)` - {}\n  left: `{:?}`\n right: `{:?}`\n  diff: `{:?}` > tolerance `{:?}`",
                format_args!($($arg)+), left_val, right_val, diff, tol
            );
        }
    }};
}

/// Assert that two f32 slices are element-wise approximately equal.
///
/// # Panics
///
/// Panics if lengths differ or any element pair differs by more than
/// `tolerance`.
pub fn assert_slices_approx_eq(left: &[f32], right: &[f32], tolerance: f32) {
    assert_eq!(
        left.len(),
        right.len(),
        "slice lengths differ: {} vs {}",
        left.len(),
        right.len()
    );
    for (i, (l, r)) in left.iter().zip(right.iter()).enumerate() {
        let diff = (l - r).abs();
        assert!(
            diff <= tolerance,
            "slices differ at index {i}: left `{l:?}`, right `{r:?}`, diff `{diff:?}` > tolerance `{tolerance:?}`"
        );
    }
}
