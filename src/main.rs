mod cli;

use std::{process::ExitCode, time::Instant};

use alloy_primitives::{Address, address};
use clap::Parser;
use saltmine::{Create2Miner, Create3Miner, InitCode, Miner, Result, Search, SearchResult};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use cli::Saltmine;

/// The standard CREATE2 factory address on Ethereum
/// See: https://github.com/Arachnid/deterministic-deployment-proxy
const CREATE2_DEFAULT_FACTORY: Address = address!("0x4e59b44847b379578588920cA78FbF26c0B4956C");

/// The standard CREATE3 factory address on Ethereum
/// See: https://www.npmjs.com/package/@layerzerolabs/create3-factory
const CREATE3_DEFAULT_FACTORY: Address = address!("0x8Cad6A96B0a287e29bA719257d0eF431Ea6D888B");

/// Entry point for the saltmine vanity address miner.
///
/// Prints the discovered salt and address, or logs the error and exits with
/// status 1 if the input is malformed or no salt is found.
fn main() -> ExitCode {
    tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Saltmine::parse()) {
        Ok(SearchResult { salt, address, .. }) => {
            println!("Found salt {salt} ==> {address}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Saltmine) -> Result<SearchResult> {
    match args {
        Saltmine::Create2 {
            prefix,
            deployer,
            init_code_hash,
            init_code,
            constructor_args,
            search,
        } => {
            let deployer = deployer.unwrap_or(CREATE2_DEFAULT_FACTORY);
            let init_code_hash = match init_code_hash {
                Some(hash) => hash,
                None => InitCode::from_hex(
                    init_code.as_deref().unwrap_or_default(),
                    constructor_args.as_deref(),
                )?
                .hash(),
            };
            info!(%deployer, %init_code_hash, "mining CREATE2 salt");

            mine(&Create2Miner::new(deployer, init_code_hash), &search.into_search(prefix))
        }
        Saltmine::Create3 {
            prefix,
            deployer,
            factory,
            search,
        } => {
            let factory = factory.unwrap_or(CREATE3_DEFAULT_FACTORY);
            info!(%deployer, %factory, "mining CREATE3 salt");

            mine(&Create3Miner::new(deployer, factory), &search.into_search(prefix))
        }
    }
}

fn mine(miner: &impl Miner, search: &Search) -> Result<SearchResult> {
    let max_iterations = search.max_iterations.get();
    info!(
        prefix = %search.prefix,
        start = search.start,
        max_iterations,
        threads = search.jobs.map_or_else(rayon::current_num_threads, |jobs| jobs.get()),
        "starting search"
    );

    let expected = search.prefix.expected_iterations();
    if expected > max_iterations as f64 {
        warn!(expected, max_iterations, "search budget is below the expected number of iterations");
    }

    let timer = Instant::now();
    let progress = |checked: u64| info!(checked, "still mining");
    let result = miner.mine_parallel(search, &progress)?.into_result()?;
    info!(index = result.index, elapsed = ?timer.elapsed(), "found matching salt");
    Ok(result)
}
