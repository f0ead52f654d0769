// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! EIP-7702 bootstrap of the unified contract
//!
//! The contract owner's account temporarily delegates to the contract code
//! and calls itself three times: `setRecipient`, `setRelayer(owner, true)` and
//! `relayETH`. Each transaction carries a freshly signed authorization.

mod config;
mod runner;

pub use config::{ConfirmationPolling, SettlePolicy, DEFAULT_SETTLE_DELAY};
pub use runner::{Bootstrap, BootstrapReport, BootstrapStep, StepOutcome};
