//! ABI encoding of the NFT purchase call.
//!
//! The widget submits `sc_input_data` verbatim as the transaction input, so
//! it must be the exact Solidity ABI encoding of
//! `UsdtBuyNft(address to, uint256 nftQuantity)`.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;

use crate::{UsdtBuyNftCall, WertError};

/// Encodes the purchase into contract call data.
///
/// Implementations must be pure: the same `(to, quantity)` always yields the
/// same bytes.
pub trait CallEncoder: Send + Sync {
    fn encode_purchase(&self, to: Address, quantity: u64) -> Result<Bytes, WertError>;
}

/// Encoder backed by the `sol!`-generated [`UsdtBuyNftCall`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SolCallEncoder;

impl CallEncoder for SolCallEncoder {
    fn encode_purchase(&self, to: Address, quantity: u64) -> Result<Bytes, WertError> {
        if quantity == 0 {
            return Err(WertError::Encoding("nftQuantity must be non-zero".to_string()));
        }
        let call = UsdtBuyNftCall {
            to,
            nftQuantity: U256::from(quantity),
        };
        Ok(Bytes::from(call.abi_encode()))
    }
}

/// Render call data as the `0x`-prefixed lowercase hex string Wert expects.
pub fn call_data_hex(data: &Bytes) -> String {
    alloy::hex::encode_prefixed(data)
}
