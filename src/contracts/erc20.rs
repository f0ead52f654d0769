// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! ERC20 `Transfer` event bindings
//!
//! The monitor only needs the standard three-topic `Transfer` event: topic 0 is
//! the event signature, topics 1 and 2 are the indexed `from` and `to`
//! addresses, and the data word is the amount.

use alloy_primitives::Address;
use alloy_rpc_types::Filter;
use alloy_sol_types::{sol, SolEvent};
use tracing::debug;

pub use Erc20::Transfer;

/// Build the log filter for transfers of `token` into `recipient`
///
/// The filter pins the emitting contract to `token`, topic 0 to the `Transfer`
/// signature and topic 2 (the indexed `to`) to `recipient` left-padded to 32
/// bytes. Topic 1 (`from`) is left open so deposits from any sender match.
pub fn transfer_filter(token: Address, recipient: Address) -> Filter {
    debug!(
        token = %token,
        recipient = %recipient,
        event = "transfer_filter_created"
    );

    Filter::new()
        .address(token)
        .event_signature(Transfer::SIGNATURE_HASH)
        .topic2(recipient.into_word())
}

sol!(
    #[allow(missing_docs)]
    contract Erc20 {
        event Transfer(address indexed from, address indexed to, uint256 value);
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, keccak256};

    #[test]
    fn test_transfer_signature_hash() {
        assert_eq!(
            Transfer::SIGNATURE_HASH,
            keccak256(b"Transfer(address,address,uint256)")
        );
    }

    #[test]
    fn test_transfer_filter_topics() {
        let token = address!("1c7D4B196Cb0C7B01d743Fbc6116a902379C7238");
        let unified = address!("00000000000000000000000000000000000000aa");
        let other = address!("00000000000000000000000000000000000000bb");

        let filter = transfer_filter(token, unified);

        assert!(filter.address.matches(&token));
        assert!(!filter.address.matches(&other));
        assert!(filter.topics[0].matches(&Transfer::SIGNATURE_HASH));
        assert!(filter.topics[1].is_empty(), "from must stay unconstrained");
        assert!(filter.topics[2].matches(&unified.into_word()));
        assert!(!filter.topics[2].matches(&other.into_word()));
        assert!(filter.topics[3].is_empty());
    }
}
