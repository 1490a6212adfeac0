mod cli;
mod init_code;
mod mine;
mod predict;
mod salt;

use alloy_primitives::{Address, address, keccak256};
use clap::Parser;
use eyre::{WrapErr, eyre};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use {
    cli::{Create2, SearchInitCode},
    mine::{Create2Miner, Pattern},
    predict::PredictError,
};

/// The standard CREATE2 factory address on Ethereum
/// See: https://github.com/Arachnid/deterministic-deployment-proxy
const CREATE2_DEFAULT_FACTORY: Address = address!("0x4e59b44847b379578588920cA78FbF26c0B4956C");

/// Logs go to stderr so that stdout carries only the result.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Entry point for the create2 counterfactual deployment tool.
///
/// `query` prints the address a contract will occupy once deployed through
/// a CREATE2 factory; `search` looks for a salt that places it at an address
/// of a chosen shape.
///
/// # Error
///
/// Returns an error if the init code cannot be loaded, or if the deployer,
/// salt or init code are rejected by the predictor.
fn main() -> eyre::Result<()> {
    init_tracing();

    match Create2::parse() {
        Create2::Query {
            deployer,
            salt,
            init_code: init_code_args,
            constructor_args,
        } => {
            // Use the provided factory or fall back to the default CREATE2 factory
            let deployer = deployer.unwrap_or(CREATE2_DEFAULT_FACTORY);

            let source = init_code_args
                .source()
                .ok_or_else(|| eyre!("no init code source given"))?;
            let init_code = init_code::load(&source, constructor_args.as_ref())
                .wrap_err("failed to load init code")?;

            let address = predict::predict(deployer.as_slice(), &salt, &init_code)
                .wrap_err("failed to predict address")?;

            info!(
                %deployer,
                salt = %predict::pad_salt(&salt)?,
                init_code_hash = %keccak256(&init_code),
                "predicted address"
            );
            println!("{address}");
        }
        Create2::Search {
            deployer,
            caller,
            init_code: init_code_args,
            constructor_args,
            starts_with,
            ends_with,
            case_sensitive,
            seed,
            threads,
        } => {
            // Use the provided factory or fall back to the default CREATE2 factory
            let deployer = deployer.unwrap_or(CREATE2_DEFAULT_FACTORY);

            let pattern = Pattern::new(
                starts_with.as_deref().unwrap_or_default(),
                ends_with.as_deref().unwrap_or_default(),
                case_sensitive,
            )
            .wrap_err("invalid search pattern")?;

            let init_code_hash = match init_code_args
                .resolve()
                .ok_or_else(|| eyre!("no init code source given"))?
            {
                SearchInitCode::Hash(hash) => hash,
                SearchInitCode::Code(source) => {
                    let code = init_code::load(&source, constructor_args.as_ref())
                        .wrap_err("failed to load init code")?;
                    if code.is_empty() {
                        return Err(PredictError::EmptyBytecode.into());
                    }
                    keccak256(&code)
                }
            };

            if let Some(threads) = threads {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build_global()
                    .wrap_err("failed to configure worker threads")?;
            }

            // Mine for an address matching the pattern using CREATE2 deployment
            let (address, salt) =
                Create2Miner::new(deployer, init_code_hash, caller).mine(&pattern, seed);

            // Output the discovered salt and resulting contract address
            println!("Found salt {salt} ==> {address}");
        }
    }

    Ok(())
}
