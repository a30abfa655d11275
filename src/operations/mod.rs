//! Typed wrappers over requester operations.
//!
//! These are thin: each wrapper checks the provider's documented input
//! limits, builds an [`OperationCall`](crate::clients::OperationCall), runs it
//! through [`MturkClient`](crate::clients::MturkClient) and reads the fields
//! it needs from the result.
//!
//! # Example
//!
//! ```rust,ignore
//! use mturk_api::operations::{Account, Worker};
//!
//! let balance = Account::balance(&client).await?;
//! println!("{}", balance.formatted_price);
//!
//! let mut worker = Worker::new("A3D9BS7QW6ORGG")?;
//! worker.block(&client, "Ignored the instructions").await?;
//!
//! for blocked in Worker::blocked(&client, Some(100)).await? {
//!     println!("{} ({:?})", blocked.id(), blocked.block_reason());
//! }
//! ```

mod account;
mod workers;

use std::fmt;

pub use account::{Account, Price};
pub use workers::{Worker, MAX_MESSAGE_LENGTH, MAX_SUBJECT_LENGTH};

/// Operations with typed wrappers in this module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Reads the requester's available balance.
    GetAccountBalance,
    /// Prevents a worker from accepting the requester's tasks.
    BlockWorker,
    /// Lifts a block.
    UnblockWorker,
    /// Lists blocked workers, paged.
    GetBlockedWorkers,
    /// Emails one or more workers.
    NotifyWorkers,
}

impl Operation {
    /// Returns the wire name of the operation.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GetAccountBalance => "GetAccountBalance",
            Self::BlockWorker => "BlockWorker",
            Self::UnblockWorker => "UnblockWorker",
            Self::GetBlockedWorkers => "GetBlockedWorkers",
            Self::NotifyWorkers => "NotifyWorkers",
        }
    }

    /// Returns the name of the node holding the operation's result.
    #[must_use]
    pub fn result_name(self) -> String {
        format!("{}Result", self.name())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
