use std::num::{NonZeroU64, NonZeroUsize};

use alloy_primitives::{Address, B256};
use rand::{Rng, rng};
use saltmine::{Prefix, Search};

/// Command-line interface for the saltmine tool.
///
/// saltmine searches a reproducible salt sequence for a deterministic
/// deployment address starting with a chosen hex prefix.
#[derive(Clone, Debug, clap::Parser)]
#[command(
    name = "saltmine",
    about = "Mines CREATE2 and CREATE3 salts for vanity contract addresses."
)]
pub(super) enum Saltmine {
    /// Mines a CREATE2 salt.
    ///
    /// CREATE2 is an opcode in Ethereum that allows contracts to be deployed
    /// at predetermined addresses.
    Create2 {
        /// Hex digits the contract address must start with.
        prefix: Prefix,

        /// Address of the contract executing CREATE2. Defaults to the
        /// deterministic deployment proxy.
        #[arg(short, long, value_name = "ADDRESS")]
        deployer: Option<Address>,

        /// Hash of the initialization code.
        #[arg(
            long,
            value_name = "HASH",
            required_unless_present = "init_code",
            conflicts_with = "init_code"
        )]
        init_code_hash: Option<B256>,

        /// Deployment bytecode of the contract, hashed to get the init code hash.
        #[arg(short, long, value_name = "HEX")]
        init_code: Option<String>,

        /// ABI-encoded constructor arguments appended to the bytecode.
        #[arg(
            long,
            value_name = "HEX",
            requires = "init_code",
            conflicts_with = "init_code_hash"
        )]
        constructor_args: Option<String>,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Mines a CREATE3 salt.
    ///
    /// CREATE3 is a pattern built on top of CREATE2 that allows for
    /// deterministic deployments that are immune to the contract's
    /// initialization code.
    Create3 {
        /// Hex digits the contract address must start with.
        prefix: Prefix,

        /// Address of the account calling the factory.
        #[arg(short, long, value_name = "ADDRESS")]
        deployer: Address,

        /// Address of the CREATE3 factory. Defaults to LayerZero's factory.
        #[arg(short, long, value_name = "ADDRESS")]
        factory: Option<Address>,

        #[command(flatten)]
        search: SearchArgs,
    },
}

/// Options shared by every search.
#[derive(Clone, Debug, clap::Args)]
pub(super) struct SearchArgs {
    /// Number of salts to try before giving up.
    #[arg(long, value_name = "N", default_value_t = saltmine::mine::DEFAULT_MAX_ITERATIONS)]
    max_iterations: NonZeroU64,

    /// Counter of the first salt to try.
    #[arg(long, value_name = "N", default_value_t = 0, conflicts_with = "random_start")]
    start: u64,

    /// Start from a random counter. The chosen counter is logged so the search
    /// can be repeated with --start.
    #[arg(long)]
    random_start: bool,

    /// Number of threads to use. Defaults to the number of logical cores.
    #[arg(short, long)]
    jobs: Option<NonZeroUsize>,

    /// Number of salts between progress reports.
    #[arg(long, value_name = "N", default_value_t = saltmine::mine::DEFAULT_REPORT_INTERVAL)]
    report_interval: NonZeroU64,
}

impl SearchArgs {
    pub(super) fn into_search(self, prefix: Prefix) -> Search {
        let start = if self.random_start {
            // Keep the whole window below u64::MAX.
            rng().random_range(0..=u64::MAX - self.max_iterations.get())
        } else {
            self.start
        };

        Search::new(prefix)
            .with_start(start)
            .with_max_iterations(self.max_iterations)
            .with_jobs(self.jobs)
            .with_report_interval(self.report_interval)
    }
}
