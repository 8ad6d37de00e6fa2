use std::{
    num::{NonZeroU64, NonZeroUsize},
    ops::Range,
    sync::atomic::{AtomicU64, Ordering},
};

use alloy_primitives::{Address, B256};
use rayon::{
    ThreadPoolBuilder,
    prelude::{IntoParallelIterator, ParallelIterator},
};
use tracing::debug;

use crate::{
    derive::{create2_address, create3_address, generate_salt},
    error::{Error, Result},
    prefix::Prefix,
};

/// Default number of salts tried before a search gives up.
pub const DEFAULT_MAX_ITERATIONS: NonZeroU64 = NonZeroU64::new(100_000_000).unwrap();

/// Default number of salts between two progress reports.
pub const DEFAULT_REPORT_INTERVAL: NonZeroU64 = NonZeroU64::new(100_000).unwrap();

/// Number of consecutive counters a parallel worker scans before picking up
/// the next chunk.
const CHUNK_SIZE: u64 = 4096;

/// Receives the number of salts checked so far while a search runs.
///
/// Reports are informational only and never influence the outcome. In a
/// parallel search they may arrive out of order.
pub trait Progress: Sync {
    fn report(&self, checked: u64);
}

impl<F: Fn(u64) + Sync> Progress for F {
    fn report(&self, checked: u64) {
        self(checked)
    }
}

/// A [`Progress`] observer that ignores every report.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&self, _checked: u64) {}
}

/// A salt and the address it deploys to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchResult {
    /// Counter the salt was generated from, see [`generate_salt`].
    pub index: u64,
    pub salt: B256,
    pub address: Address,
}

/// Outcome of a salt search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub enum SearchOutcome {
    /// The lowest counter in the window whose address matches.
    Found(SearchResult),
    /// Every counter in the window was tried without a match.
    Exhausted { checked: u64 },
}

impl SearchOutcome {
    pub fn found(self) -> Option<SearchResult> {
        match self {
            Self::Found(result) => Some(result),
            Self::Exhausted { .. } => None,
        }
    }

    /// Turns exhaustion into [`Error::SearchExhausted`] for callers that
    /// cannot proceed without a salt.
    pub fn into_result(self) -> Result<SearchResult> {
        match self {
            Self::Found(result) => Ok(result),
            Self::Exhausted { checked } => Err(Error::SearchExhausted { checked }),
        }
    }
}

/// Parameters of a single salt search.
///
/// The search visits counters `start..start + max_iterations` in order; the
/// window end saturates at `u64::MAX`.
#[derive(Clone, Debug)]
pub struct Search {
    pub prefix: Prefix,
    pub start: u64,
    pub max_iterations: NonZeroU64,
    /// Worker threads for [`Miner::mine_parallel`]. `None` uses the global
    /// rayon pool.
    pub jobs: Option<NonZeroUsize>,
    pub report_interval: NonZeroU64,
}

impl Search {
    pub fn new(prefix: Prefix) -> Self {
        Self {
            prefix,
            start: 0,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            jobs: None,
            report_interval: DEFAULT_REPORT_INTERVAL,
        }
    }

    pub fn with_start(mut self, start: u64) -> Self {
        self.start = start;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: NonZeroU64) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_jobs(mut self, jobs: Option<NonZeroUsize>) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn with_report_interval(mut self, report_interval: NonZeroU64) -> Self {
        self.report_interval = report_interval;
        self
    }

    /// The counters this search visits.
    pub fn counters(&self) -> Range<u64> {
        self.start..self.start.saturating_add(self.max_iterations.get())
    }
}

/// Defines the interface for address mining algorithms.
///
/// Implementations only decide how a salt maps to an address; the search
/// itself is shared. They must be thread-safe to enable parallel mining.
pub trait Miner: Sync {
    /// Calculates the contract address that would result from deploying with
    /// the given salt.
    fn compute_address(&self, salt: &B256) -> Address;

    /// Tries the salt generated from `index`.
    #[inline]
    fn try_index(&self, index: u64, prefix: &Prefix) -> Option<SearchResult> {
        let salt = generate_salt(index);
        let address = self.compute_address(&salt);
        prefix.matches(&address).then(|| SearchResult { index, salt, address })
    }

    /// Scans the search window on the current thread and returns the first
    /// match.
    fn mine<P: Progress + ?Sized>(&self, search: &Search, progress: &P) -> SearchOutcome {
        let counters = search.counters();
        let interval = search.report_interval.get();
        debug!(prefix = %search.prefix, ?counters, "mining sequentially");

        for index in counters.clone() {
            if let Some(result) = self.try_index(index, &search.prefix) {
                debug!(index, address = %result.address, "found matching salt");
                return SearchOutcome::Found(result);
            }

            let checked = index - counters.start + 1;
            if checked % interval == 0 {
                progress.report(checked);
            }
        }

        let checked = counters.end - counters.start;
        debug!(checked, "search window exhausted");
        SearchOutcome::Exhausted { checked }
    }

    /// Scans the search window with a pool of workers.
    ///
    /// Workers scan fixed-size chunks of consecutive counters and rayon keeps
    /// the match from the earliest chunk, so the result is always the same as
    /// [`Miner::mine`]. Chunks after a match are abandoned.
    fn mine_parallel<P: Progress + ?Sized>(
        &self,
        search: &Search,
        progress: &P,
    ) -> Result<SearchOutcome> {
        let run = || mine_chunks(self, search, progress);
        let outcome = match search.jobs {
            Some(jobs) => ThreadPoolBuilder::new().num_threads(jobs.get()).build()?.install(run),
            None => run(),
        };
        Ok(outcome)
    }
}

fn mine_chunks<M, P>(miner: &M, search: &Search, progress: &P) -> SearchOutcome
where
    M: Miner + ?Sized,
    P: Progress + ?Sized,
{
    let counters = search.counters();
    let total = counters.end - counters.start;
    let interval = search.report_interval.get();
    let checked = AtomicU64::new(0);
    debug!(
        prefix = %search.prefix,
        ?counters,
        threads = rayon::current_num_threads(),
        "mining in parallel"
    );

    let found = (0..total.div_ceil(CHUNK_SIZE)).into_par_iter().find_map_first(|chunk| {
        let lo = counters.start + chunk * CHUNK_SIZE;
        let hi = lo.saturating_add(CHUNK_SIZE).min(counters.end);

        let hit = (lo..hi).find_map(|index| miner.try_index(index, &search.prefix));
        if hit.is_none() {
            let len = hi - lo;
            let after = checked.fetch_add(len, Ordering::Relaxed) + len;
            if after / interval > (after - len) / interval {
                progress.report(after);
            }
        }
        hit
    });

    match found {
        Some(result) => {
            debug!(index = result.index, address = %result.address, "found matching salt");
            SearchOutcome::Found(result)
        }
        None => {
            debug!(checked = total, "search window exhausted");
            SearchOutcome::Exhausted { checked: total }
        }
    }
}

/// Mines salts for contracts deployed with CREATE2.
///
/// CREATE2 generates deterministic contract addresses from the deploying
/// contract's address, a 32-byte salt and the hash of the init code.
#[derive(Debug, Clone, Copy)]
pub struct Create2Miner {
    /// Address of the contract executing CREATE2
    deployer: Address,
    /// Keccak256 hash of the contract's initialization bytecode
    init_code_hash: B256,
}

impl Create2Miner {
    pub fn new(deployer: Address, init_code_hash: B256) -> Self {
        Self { deployer, init_code_hash }
    }
}

impl Miner for Create2Miner {
    #[inline]
    fn compute_address(&self, salt: &B256) -> Address {
        create2_address(self.deployer, salt, &self.init_code_hash)
    }
}

/// Mines salts for contracts deployed through a CREATE3 factory.
///
/// CREATE3 is a two-step deployment process:
/// 1. The factory deploys a proxy contract using CREATE2 with a salt bound to
///    the caller
/// 2. The proxy then deploys the actual contract using CREATE
///
/// The resulting address does not depend on the contract's init code.
#[derive(Debug, Clone, Copy)]
pub struct Create3Miner {
    /// Address of the account that will call the factory
    deployer: Address,
    /// Address of the CREATE3 factory contract
    factory: Address,
}

impl Create3Miner {
    pub fn new(deployer: Address, factory: Address) -> Self {
        Self { deployer, factory }
    }
}

impl Miner for Create3Miner {
    #[inline]
    fn compute_address(&self, salt: &B256) -> Address {
        create3_address(self.factory, self.deployer, salt)
    }
}

/// Searches counters `0..max_iterations` for the first CREATE2 salt that makes
/// `deployer` deploy `init_code_hash` to an address starting with `prefix`.
pub fn search<P: Progress + ?Sized>(
    deployer: Address,
    init_code_hash: B256,
    prefix: &Prefix,
    max_iterations: NonZeroU64,
    progress: &P,
) -> SearchOutcome {
    let search = Search::new(prefix.clone()).with_max_iterations(max_iterations);
    Create2Miner::new(deployer, init_code_hash).mine(&search, progress)
}
