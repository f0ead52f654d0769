//! Contract bindings for the deposit relay flow
//!
//! This module contains Alloy-generated bindings for the two contracts the
//! relayer talks to:
//!
//! - [`erc20`]: the USDC `Transfer` event and the log filter that selects
//!   deposits into the unified contract
//! - [`unified`]: the unified deposit contract's views, relay entry points and
//!   owner-only configuration calls

pub mod erc20;
pub mod unified;
