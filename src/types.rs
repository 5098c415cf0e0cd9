use std::fmt;

use thiserror::Error;

// ============================================================================
// Constants
//
// Ring buffer capacities are always powers of two so that a logical index
// maps to a physical slot with a single mask: slot = (begin + i) & (cap - 1).
// ============================================================================

pub const MIN_CAPACITY_BITS: u32 = 2;
pub const MIN_CAPACITY: usize = 1 << MIN_CAPACITY_BITS; // 4

pub const DEFAULT_DEMO_SIZE: usize = 20;
pub const DEFAULT_BENCH_COUNT: usize = 1_000_000;
pub const DEFAULT_BENCH_LOOKUPS: usize = 100_000;

// ============================================================================
// Splay policy
// ============================================================================

/// Restructuring heuristic applied after an access.
///
/// The tree itself selects its policy at compile time through a marker type
/// (see [`crate::splay::SplayPolicy`]); this enum is the runtime name of
/// that choice, used for reporting and for the command-line driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Policy {
    /// Rotate the accessed node all the way to the root.
    Full,
    /// Sleator-Tarjan semi-splay: roughly halve the depth of the access path.
    Semi,
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Full => write!(f, "full splay"),
            Policy::Semi => write!(f, "semi splay"),
        }
    }
}

// ============================================================================
// Error type
// ============================================================================

/// Failure while reading integer keys from text input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("line {line}: invalid integer '{token}'")]
    InvalidKey { line: usize, token: String },
    #[error("line {line}: input is not valid UTF-8")]
    Encoding { line: usize },
}

// ============================================================================
// Summary statistics
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeSummary {
    pub policy: Policy,
    pub len: usize,
    pub height: usize,
    /// Height of a perfectly balanced tree with the same number of nodes.
    pub optimal_height: usize,
}

/// ceil(log2(n + 1)): the height of a balanced tree holding `n` nodes.
pub fn optimal_height(n: usize) -> usize {
    (usize::BITS - n.leading_zeros()) as usize
}

impl fmt::Display for TreeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} nodes, height {} (balanced {})",
            self.policy, self.len, self.height, self.optimal_height
        )
    }
}
