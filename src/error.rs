//! # Dispatch errors
//!
//! Every error the dispatch engine can raise. None of them are recoverable inside a
//! tick: a snapshot that fails to apply leaves the fleet in an unknown state, so the
//! driver should treat the run as failed.
//!
//! | Error | Raised by |
//! |-------|-----------|
//! | [`DispatchError::MalformedSnapshot`] | [`Elevator::update_state`](crate::elevator_logic::Elevator::update_state) |
//! | [`DispatchError::IdentityMismatch`] | [`Elevator::update_state`](crate::elevator_logic::Elevator::update_state) |
//! | [`DispatchError::UnknownElevator`] | [`Dispatcher::update`](crate::manager::Dispatcher::update) |
//! | [`DispatchError::InvalidDirection`] | [`Dirn`](crate::world_view::Dirn) conversions and direction queries |

use thiserror::Error;

/// Errors raised while applying snapshots or answering direction-dependent queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// An elevator report in the snapshot carries no `id` field.
    #[error("elevator report #{index} in snapshot has no id")]
    MalformedSnapshot {
        /// Position of the report in the snapshot's `elevators` list
        index: usize,
    },

    /// A report was routed to an elevator with a different id.
    #[error("report for elevator {found} was routed to elevator {expected}")]
    IdentityMismatch {
        /// Id of the elevator that received the report
        expected: u8,
        /// Id carried by the report
        found: u8,
    },

    /// The snapshot lists more elevators than the fleet holds.
    #[error("snapshot reports elevator #{index}, but the fleet has no such elevator")]
    UnknownElevator {
        /// Position of the report in the snapshot's `elevators` list
        index: usize,
    },

    /// A direction that must be +1 or -1 was something else.
    #[error("improper direction {0}, expected +1 or -1")]
    InvalidDirection(i64),
}
