// Draw engine: pity state machine, item selection, batches

pub mod batch;
pub mod engine;
pub mod pity;
pub mod random;
pub mod selector;

pub use batch::{BatchOutcome, MAX_BATCH, TEN_PULL};
pub use engine::{draw, effective_rate, rate_table, DrawEngine, DrawResult};
pub use pity::PityState;
pub use random::{seeded, RandomSource, SequenceSource};
pub use selector::ItemSelector;
