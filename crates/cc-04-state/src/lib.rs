//! # Record Types & Transaction Execution
//!
//! The cell kinds the belief-merge engine (`cc-05-consensus`) operates on —
//! [`block::Block`], [`order::Order`], [`belief::Belief`], [`state::State`],
//! [`account::AccountStatus`]/[`account::PeerStatus`] — plus
//! [`signed::SignedData`] (the generic signed-cell wrapper every gossiped
//! record is wrapped in) and [`transaction::Transaction`] with the
//! [`transaction::Executor`] port state transitions are applied through
//!.

pub mod account;
pub mod belief;
pub mod block;
pub mod error;
pub mod order;
pub mod signed;
pub mod state;
pub mod transaction;

pub use account::{AccountStatus, PeerStatus};
pub use belief::Belief;
pub use block::Block;
pub use error::StateError;
pub use order::Order;
pub use signed::SignedData;
pub use state::State;
pub use transaction::{DefaultExecutor, Executor, Transaction, TransactionPayload, TRANSFER_JUICE};
