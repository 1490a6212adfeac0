use std::path::PathBuf;

use alloy_primitives::{Address, B256, Bytes};

use crate::init_code::{InitCodeError, InitCodeSource, decode_hex};

/// Command-line interface for the create2 tool.
///
/// create2 predicts the addresses of contracts deployed through a CREATE2
/// factory before they are deployed, and searches for salts that produce
/// addresses of a desired shape.
#[derive(Clone, Debug, clap::Parser)]
#[command(
    name = "create2",
    version,
    about = "Counterfactual CREATE2 address prediction and salt search."
)]
pub(super) enum Create2 {
    /// Predicts the address a contract will be deployed at.
    ///
    /// The address depends only on the deployer, the salt and the creation
    /// code, so it can be funded or referenced before deployment.
    #[command(visible_alias = "predict")]
    Query {
        /// Address of the factory performing CREATE2. Defaults to the
        /// deterministic deployment proxy.
        #[arg(short, long, env = "CREATE2_DEPLOYER")]
        deployer: Option<Address>,

        /// Salt as a decimal integer or 0x-prefixed hex, left-padded to 32 bytes.
        #[arg(short, long, value_parser = crate::salt::parse)]
        salt: Bytes,

        #[command(flatten)]
        init_code: InitCodeArgs,

        /// ABI-encoded constructor arguments appended to the creation code.
        #[arg(long, value_parser = parse_hex)]
        constructor_args: Option<Bytes>,
    },

    /// Searches for a salt whose predicted address matches a hex pattern.
    Search {
        /// Address of the factory performing CREATE2. Defaults to the
        /// deterministic deployment proxy.
        #[arg(short, long, env = "CREATE2_DEPLOYER")]
        deployer: Option<Address>,

        /// Embed this address in the first 20 bytes of every salt, for
        /// factories that tie salts to `msg.sender`.
        #[arg(long)]
        caller: Option<Address>,

        #[command(flatten)]
        init_code: SearchInitCodeArgs,

        /// ABI-encoded constructor arguments appended to the creation code.
        #[arg(long, value_parser = parse_hex, conflicts_with = "init_code_hash")]
        constructor_args: Option<Bytes>,

        /// Hex characters the address must start with.
        #[arg(long, value_name = "HEX")]
        starts_with: Option<String>,

        /// Hex characters the address must end with.
        #[arg(long, value_name = "HEX")]
        ends_with: Option<String>,

        /// Match letters against the EIP-55 checksummed address.
        #[arg(long)]
        case_sensitive: bool,

        /// Seed for the salt generator, making the search reproducible.
        #[arg(long)]
        seed: Option<u64>,

        /// Number of worker threads. Defaults to one per CPU.
        #[arg(short = 'j', long, env = "CREATE2_THREADS")]
        threads: Option<usize>,
    },
}

/// Creation code, given exactly one way.
#[derive(Clone, Debug, clap::Args)]
#[group(required = true, multiple = false)]
pub(super) struct InitCodeArgs {
    /// Creation code as hex.
    #[arg(long, value_name = "HEX", value_parser = parse_hex)]
    init_code: Option<Bytes>,

    /// File holding the creation code as hex.
    #[arg(long, value_name = "FILE")]
    init_code_path: Option<PathBuf>,

    /// Compiled contract artifact (Hardhat, Truffle or Foundry JSON).
    #[arg(long, value_name = "FILE")]
    artifact: Option<PathBuf>,
}

impl InitCodeArgs {
    pub(super) fn source(self) -> Option<InitCodeSource> {
        match (self.init_code, self.init_code_path, self.artifact) {
            (Some(code), _, _) => Some(InitCodeSource::Hex(code)),
            (_, Some(path), _) => Some(InitCodeSource::File(path)),
            (_, _, Some(path)) => Some(InitCodeSource::Artifact(path)),
            _ => None,
        }
    }
}

/// Creation code or its hash, given exactly one way.
#[derive(Clone, Debug, clap::Args)]
#[group(required = true, multiple = false)]
pub(super) struct SearchInitCodeArgs {
    /// Creation code as hex.
    #[arg(long, value_name = "HEX", value_parser = parse_hex)]
    init_code: Option<Bytes>,

    /// File holding the creation code as hex.
    #[arg(long, value_name = "FILE")]
    init_code_path: Option<PathBuf>,

    /// Compiled contract artifact (Hardhat, Truffle or Foundry JSON).
    #[arg(long, value_name = "FILE")]
    artifact: Option<PathBuf>,

    /// Keccak256 hash of the creation code, constructor arguments included.
    #[arg(long, value_name = "HASH")]
    init_code_hash: Option<B256>,
}

/// The search input once the command line is resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum SearchInitCode {
    Code(InitCodeSource),
    Hash(B256),
}

impl SearchInitCodeArgs {
    pub(super) fn resolve(self) -> Option<SearchInitCode> {
        if let Some(hash) = self.init_code_hash {
            return Some(SearchInitCode::Hash(hash));
        }
        InitCodeArgs {
            init_code: self.init_code,
            init_code_path: self.init_code_path,
            artifact: self.artifact,
        }
        .source()
        .map(SearchInitCode::Code)
    }
}

fn parse_hex(input: &str) -> Result<Bytes, InitCodeError> {
    decode_hex(input, "argument").map(Bytes::from)
}
