pub mod types;
pub mod ring;
pub mod node;
pub mod splay;
pub mod iter;
pub mod input;

// Re-exports for convenience
pub use types::{
    optimal_height, InputError, Policy, TreeSummary, DEFAULT_BENCH_COUNT,
    DEFAULT_BENCH_LOOKUPS, DEFAULT_DEMO_SIZE, MIN_CAPACITY,
};
pub use ring::RingBuffer;
pub use node::Node;
pub use splay::{FullSplay, SemiSplay, SemiSplayTree, SplayPolicy, SplayTree};
pub use iter::Iter;
pub use input::parse_keys;
