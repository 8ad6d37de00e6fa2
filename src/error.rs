use alloy_primitives::Address;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors produced while deriving addresses or searching for salts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A fixed-width derivation argument had the wrong byte length.
    #[error("invalid {field}: expected {expected} bytes, got {actual}")]
    InvalidInput {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The desired address prefix is not a usable hex string.
    #[error("invalid prefix {prefix:?}: {reason}")]
    InvalidPrefix { prefix: String, reason: String },

    /// Hex supplied for init code or constructor arguments could not be decoded.
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// No salt in the searched counter window produced a matching address.
    #[error("no matching salt found after {checked} iterations")]
    SearchExhausted { checked: u64 },

    /// The deployed contract landed somewhere other than the predicted address.
    #[error("deployed address {actual} does not match predicted address {predicted}")]
    DeploymentMismatch { predicted: Address, actual: Address },

    /// The worker pool for a parallel search could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
