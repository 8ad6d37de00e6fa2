//! Deterministic deployment address derivation and vanity salt mining.
//!
//! [`derive`] computes where a CREATE2 (or CREATE3) deployment lands for a
//! given salt, and [`mine`] walks a reproducible salt sequence until the
//! derived address starts with a requested hex [`Prefix`].

pub mod derive;
pub mod error;
pub mod mine;
pub mod prefix;

pub use derive::{
    InitCode, create2_address, create2_address_from_slices, create3_address, generate_salt,
    verify_deployment,
};
pub use error::{Error, Result};
pub use mine::{
    Create2Miner, Create3Miner, Miner, NoProgress, Progress, Search, SearchOutcome, SearchResult,
    search,
};
pub use prefix::Prefix;
