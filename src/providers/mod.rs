//! Production implementations of the relayer's trait abstractions.
//!
//! This module provides the implementations of the traits defined in
//! [`crate::traits`] that talk to real nodes through Alloy and to the system
//! clock. Test code uses the fakes in [`crate::testing`] instead.

mod alloy;
mod delegation;
mod tokio_clock;

pub use self::alloy::AlloyRelayer;
pub use self::delegation::AlloyDelegator;
pub use self::tokio_clock::TokioClock;
