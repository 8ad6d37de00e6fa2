//! Deterministic deployment address derivation.
//!
//! CREATE2 addresses are computed as
//! `keccak256(0xff ++ factory ++ salt ++ init_code_hash)[12..]`, which must agree
//! bit-for-bit with the EVM opcode of the same name. Candidate salts come from a
//! counter: `salt_i = keccak256(uint256(i))`, the 32-byte big-endian encoding of
//! `i`, i.e. `keccak256(abi.encode(i))` in Solidity.

use alloy_primitives::{Address, B256, Bytes, keccak256};

use crate::error::{Error, Result};

/// Hashes the init code of the minimal proxy a CREATE3 factory deploys
/// before the proxy deploys the real contract.
pub const CREATE3_PROXY_INIT_CODE_HASH: B256 = B256::new([
    0x21, 0xc3, 0x5d, 0xbe, 0x1b, 0x34, 0x4a, 0x24, 0x88, 0xcf, 0x33, 0x21, 0xd6, 0xce, 0x54, 0x2f,
    0x8e, 0x9f, 0x30, 0x55, 0x44, 0xff, 0x09, 0xe4, 0x99, 0x3a, 0x62, 0x31, 0x9a, 0x49, 0x7c, 0x1f,
]);

/// Computes the address a CREATE2 deployment by `factory` lands on.
#[inline]
pub fn create2_address(factory: Address, salt: &B256, init_code_hash: &B256) -> Address {
    factory.create2(*salt, *init_code_hash)
}

/// Same as [`create2_address`], for callers holding untyped byte slices.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `factory` is not 20 bytes or either hash
/// is not 32 bytes.
pub fn create2_address_from_slices(
    factory: &[u8],
    salt: &[u8],
    init_code_hash: &[u8],
) -> Result<Address> {
    let factory = Address::new(fixed("factory", factory)?);
    let salt = B256::new(fixed("salt", salt)?);
    let init_code_hash = B256::new(fixed("init code hash", init_code_hash)?);
    Ok(create2_address(factory, &salt, &init_code_hash))
}

fn fixed<const N: usize>(field: &'static str, bytes: &[u8]) -> Result<[u8; N]> {
    bytes.try_into().map_err(|_| Error::InvalidInput {
        field,
        expected: N,
        actual: bytes.len(),
    })
}

/// Returns the `index`-th salt of the search sequence.
///
/// The sequence is fixed: the same index always yields the same salt, so a
/// search can be resumed or audited from its counter alone.
#[inline]
pub fn generate_salt(index: u64) -> B256 {
    keccak256(B256::left_padding_from(&index.to_be_bytes()))
}

/// Computes the address a CREATE3 factory deploys to when `deployer` calls it
/// with `salt`.
///
/// The factory CREATE2-deploys a proxy under `keccak256(deployer ++ salt)`, and
/// the proxy CREATEs the contract with nonce 1, so the result does not depend
/// on the contract's init code.
pub fn create3_address(factory: Address, deployer: Address, salt: &B256) -> Address {
    let mut preimage = [0u8; 52];
    preimage[..20].copy_from_slice(deployer.as_slice());
    preimage[20..].copy_from_slice(salt.as_slice());

    let proxy = factory.create2(keccak256(preimage), CREATE3_PROXY_INIT_CODE_HASH);
    proxy.create(1)
}

/// Deployment bytecode followed by its ABI-encoded constructor arguments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InitCode(Bytes);

impl InitCode {
    pub fn new(bytecode: impl AsRef<[u8]>, constructor_args: impl AsRef<[u8]>) -> Self {
        Self([bytecode.as_ref(), constructor_args.as_ref()].concat().into())
    }

    /// Decodes bytecode and optional constructor arguments from hex, with or
    /// without a `0x` marker.
    pub fn from_hex(bytecode: &str, constructor_args: Option<&str>) -> Result<Self> {
        let bytecode = decode_hex(bytecode)?;
        let args = constructor_args.map(decode_hex).transpose()?.unwrap_or_default();
        Ok(Self::new(bytecode, args))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The keccak256 hash CREATE2 commits to.
    pub fn hash(&self) -> B256 {
        keccak256(&self.0)
    }
}

fn decode_hex(s: &str) -> Result<Vec<u8>> {
    let s = s.trim();
    let s = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    Ok(hex::decode(s)?)
}

/// Checks that a deployment landed on the address predicted for its salt.
///
/// A mismatch means the derivation and the deploying contract disagree, and
/// must never be ignored.
pub fn verify_deployment(predicted: Address, actual: Address) -> Result<()> {
    if predicted == actual {
        Ok(())
    } else {
        Err(Error::DeploymentMismatch { predicted, actual })
    }
}
