//! Staking dashboard store and facade.
//!
//! [`StakingStore`] owns era, validator and account state and performs chain
//! reads and writes through the `stakedash_chain` capabilities.
//! [`StakingFacade`] sequences store calls into user-level operations and
//! reconciles account state after writes.

pub mod events;
pub mod facade;
pub mod log;
pub mod state;
pub mod store;

pub use events::{Notification, Severity, StoreEvent};
pub use facade::{AccountSnapshot, ReconcilePolicy, StakingFacade, TxOutcome};
pub use state::{Section, SectionFlags, StakingState};
pub use store::{
    DEFAULT_IDENTITY_TIMEOUT, Rebag, StakingError, StakingStore, StoreConfig, rebag_skip_reason,
};
