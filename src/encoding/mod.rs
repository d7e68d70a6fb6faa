//! Binary encoding primitives for fuse calldata.
//!
//! Two strictly separate encoding schemes live here:
//!
//! - **Padded ABI encoding** for ordinary arguments, delegated to
//!   [`alloy::sol_types::SolValue`]. Struct-style fuse parameters are
//!   encoded with `abi_encode()` on a Rust tuple, which matches the
//!   single-tuple-parameter layout the deployed fuse contracts expect
//!   (a dynamic struct argument is preceded by its head offset).
//! - **Packed encoding** for Uniswap-V3-style swap paths, where each field
//!   is concatenated at its raw width with no padding: 20-byte addresses
//!   interleaved with 3-byte fee tiers. A packed path is then embedded as
//!   an opaque `bytes` argument inside a padded outer tuple; the two
//!   schemes must never be mixed, or the target contract will reject or
//!   misinterpret the payload.
//!
//! Function selectors are always computed from the canonical signature
//! string, never hard-coded.

use alloy::primitives::{aliases::U24, Address, Keccak256};

/// Compute the 4-byte function selector for a canonical signature string.
///
/// The selector is the leading 4 bytes of the keccak-256 hash of the
/// signature, e.g. `selector("transfer(address,uint256)") == 0xa9059cbb`.
pub fn selector(signature: &str) -> [u8; 4] {
    let mut hasher = Keccak256::new();
    hasher.update(signature.as_bytes());

    let digest = hasher.finalize();
    let mut out = [0u8; 4];
    out.copy_from_slice(&digest[..4]);
    out
}

/// Assemble complete calldata from a signature string and pre-encoded
/// arguments: `selector(signature) || encoded_args`.
pub fn function_call(signature: &str, encoded_args: &[u8]) -> Vec<u8> {
    let mut call_data = selector(signature).to_vec();
    call_data.extend_from_slice(encoded_args);
    call_data
}

/// A packed Uniswap-V3-style swap path.
///
/// The path alternates token addresses and pool fee tiers,
/// `token_in ‖ fee ‖ token_out [‖ fee ‖ token ...]`, packed with no
/// padding: one hop is exactly 43 bytes, each further hop adds 23.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapPath {
    bytes: Vec<u8>,
}

impl SwapPath {
    /// Build a single-hop path through one pool.
    pub fn single(token_in: Address, fee: U24, token_out: Address) -> Self {
        let mut bytes = Vec::with_capacity(43);
        bytes.extend_from_slice(token_in.as_slice());
        bytes.extend_from_slice(&fee.to_be_bytes::<3>());
        bytes.extend_from_slice(token_out.as_slice());
        Self { bytes }
    }

    /// Extend the path with another hop through `fee` into `token_out`.
    pub fn hop(mut self, fee: U24, token_out: Address) -> Self {
        self.bytes.extend_from_slice(&fee.to_be_bytes::<3>());
        self.bytes.extend_from_slice(token_out.as_slice());
        self
    }

    /// The packed path bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the path, returning the packed bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Number of pools the path routes through.
    pub fn hops(&self) -> usize {
        (self.bytes.len() - 20) / 23
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_selector_matches_known_values() {
        // Canonical ERC-20 selectors.
        assert_eq!(selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(selector("approve(address,uint256)"), [0x09, 0x5e, 0xa7, 0xb3]);
    }

    #[test]
    fn test_function_call_prefixes_selector() {
        let args = vec![0u8; 64];
        let call = function_call("transfer(address,uint256)", &args);

        assert_eq!(call.len(), 4 + 64);
        assert_eq!(&call[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(&call[4..], &args[..]);
    }

    #[test]
    fn test_single_hop_path_is_43_bytes() {
        let token_in = Address::from_str("0xaf88d065e77c8cc2239327c5edb3a432268e5831").unwrap();
        let token_out = Address::from_str("0xfd086bc7cd5c481dcc9c85ebe478a1c0b69fcbb9").unwrap();

        let path = SwapPath::single(token_in, U24::from(100), token_out);

        assert_eq!(path.as_bytes().len(), 43);
        assert_eq!(path.hops(), 1);
        assert_eq!(&path.as_bytes()[..20], token_in.as_slice());
        // uint24 fee 100 packed big-endian into 3 bytes
        assert_eq!(&path.as_bytes()[20..23], &[0x00, 0x00, 0x64]);
        assert_eq!(&path.as_bytes()[23..], token_out.as_slice());
    }

    #[test]
    fn test_two_hop_path_is_66_bytes() {
        let a = Address::repeat_byte(0x11);
        let b = Address::repeat_byte(0x22);
        let c = Address::repeat_byte(0x33);

        let path = SwapPath::single(a, U24::from(500), b).hop(U24::from(3000), c);

        assert_eq!(path.as_bytes().len(), 66);
        assert_eq!(path.hops(), 2);
        assert_eq!(&path.as_bytes()[43..46], &[0x00, 0x0b, 0xb8]);
        assert_eq!(&path.as_bytes()[46..], c.as_slice());
    }
}
