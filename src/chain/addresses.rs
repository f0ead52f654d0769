// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! USDC token addresses on the chains the relayer watches
//!
//! The unified contract is deployed at the same address on every chain, so only
//! the token side needs a per-chain table.

use alloy_primitives::{address, Address};

/// Chain ID of Ethereum Sepolia
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

/// Chain ID of Arbitrum Sepolia
pub const ARBITRUM_SEPOLIA_CHAIN_ID: u64 = 421_614;

/// <https://sepolia.etherscan.io/address/0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238>
pub const SEPOLIA_USDC_ADDRESS: Address = address!("1c7D4B196Cb0C7B01d743Fbc6116a902379C7238");

/// <https://sepolia.arbiscan.io/address/0x75faf114eafb1BDbe2F0316DF893fd58CE46AA4d>
pub const ARBITRUM_SEPOLIA_USDC_ADDRESS: Address =
    address!("75faf114eafb1BDbe2F0316DF893fd58CE46AA4d");
