// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! USDC deposit monitoring
//!
//! One [`ChainMonitor`] per configured chain watches USDC `Transfer` events
//! into the unified contract and relays each deposit with `relayToken` when the
//! relayer account is whitelisted.

mod chain_monitor;
mod config;

pub use chain_monitor::{start_chain_monitors, ChainMonitor, RelayOutcome};
pub use config::DispatchConfig;
