use std::fmt;

use alloy_primitives::{Address, B256};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::{IntoParallelIterator, ParallelIterator};

use crate::predict::predict_with_hash;

/// Maximum value for the nonce segment of the salt (6 bytes).
/// We shift u64::MAX right by 16 bits (2 bytes) to get a 6-byte value.
const MAX_NONCE: u64 = u64::MAX >> 16;

/// Number of hex characters in an address.
const ADDRESS_NIBBLES: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(super) enum PatternError {
    #[error("pattern {0:?} contains non-hex characters")]
    InvalidHex(String),

    #[error("prefix and suffix together are {0} characters, an address has only 40")]
    TooLong(usize),

    #[error("at least one of --starts-with or --ends-with is required")]
    Empty,
}

/// Hex prefix and suffix an address must carry.
///
/// Case-insensitive patterns are compared nibble by nibble. Case-sensitive
/// patterns must additionally match the EIP-55 checksummed spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Pattern {
    prefix: String,
    suffix: String,
    prefix_nibbles: Vec<u8>,
    suffix_nibbles: Vec<u8>,
    case_sensitive: bool,
}

fn nibbles(part: &str) -> Result<Vec<u8>, PatternError> {
    part.chars()
        .map(|c| {
            c.to_digit(16)
                .map(|d| d as u8)
                .ok_or_else(|| PatternError::InvalidHex(part.to_owned()))
        })
        .collect()
}

fn nibble_at(address: &Address, index: usize) -> u8 {
    let byte = address[index / 2];
    if index % 2 == 0 { byte >> 4 } else { byte & 0x0f }
}

impl Pattern {
    pub(super) fn new(prefix: &str, suffix: &str, case_sensitive: bool) -> Result<Self, PatternError> {
        let prefix = prefix.strip_prefix("0x").unwrap_or(prefix);
        if prefix.is_empty() && suffix.is_empty() {
            return Err(PatternError::Empty);
        }
        if prefix.len() + suffix.len() > ADDRESS_NIBBLES {
            return Err(PatternError::TooLong(prefix.len() + suffix.len()));
        }

        let (prefix, suffix) = if case_sensitive {
            (prefix.to_owned(), suffix.to_owned())
        } else {
            (prefix.to_ascii_lowercase(), suffix.to_ascii_lowercase())
        };

        Ok(Self {
            prefix_nibbles: nibbles(&prefix)?,
            suffix_nibbles: nibbles(&suffix)?,
            prefix,
            suffix,
            case_sensitive,
        })
    }

    /// Returns `true` when `address` starts and ends with the pattern.
    pub(super) fn matches(&self, address: &Address) -> bool {
        let prefix_ok = self
            .prefix_nibbles
            .iter()
            .enumerate()
            .all(|(i, &n)| nibble_at(address, i) == n);
        if !prefix_ok {
            return false;
        }

        let offset = ADDRESS_NIBBLES - self.suffix_nibbles.len();
        let suffix_ok = self
            .suffix_nibbles
            .iter()
            .enumerate()
            .all(|(i, &n)| nibble_at(address, offset + i) == n);
        if !suffix_ok {
            return false;
        }

        if !self.case_sensitive {
            return true;
        }

        // Only reached for candidates that already match ignoring case.
        let checksummed = address.to_checksum(None);
        let digits = &checksummed[2..];
        digits.starts_with(&self.prefix) && digits.ends_with(&self.suffix)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let wildcard = ADDRESS_NIBBLES - self.prefix.len() - self.suffix.len();
        write!(f, "0x{}{}{}", self.prefix, "*".repeat(wildcard), self.suffix)
    }
}

/// Searches CREATE2 salts for an address matching a [`Pattern`].
///
/// The 32-byte salt used for mining is structured as follows:
/// - Bytes 0-19: Caller address when one is given (for factories that
///   reject salts not bound to `msg.sender`), otherwise random
/// - Bytes 20-25: Random values (prevents collisions between mining sessions)
/// - Bytes 26-31: Nonce values (systematically explored during mining)
#[derive(Debug, Clone, Copy)]
pub(super) struct Create2Miner {
    /// Address of the factory contract that will perform the CREATE2 deployment
    deployer: Address,
    /// Keccak256 hash of the contract's initialization bytecode
    init_code_hash: B256,
    /// Account whose address is embedded in the salt, if any
    caller: Option<Address>,
}

impl Create2Miner {
    pub(super) fn new(deployer: Address, init_code_hash: B256, caller: Option<Address>) -> Self {
        Self {
            deployer,
            init_code_hash,
            caller,
        }
    }

    /// Calculates the contract address that would result from deploying with the given salt.
    pub(super) fn compute_address(&self, salt: &[u8; 32]) -> Address {
        predict_with_hash(self.deployer, B256::from(*salt), self.init_code_hash)
    }

    fn fill_salt_base(&self, rng: &mut StdRng, salt_base: &mut [u8; 32]) {
        match self.caller {
            Some(caller) => {
                salt_base[0..20].copy_from_slice(caller.as_slice());
                rng.fill(&mut salt_base[20..26]);
            }
            None => rng.fill(&mut salt_base[0..26]),
        }
    }

    /// Searches for a salt whose CREATE2 address matches `pattern`.
    ///
    /// Each round draws fresh random bytes, then scans the nonce segment in
    /// parallel. The lowest matching nonce of a round wins, so a fixed
    /// `seed` always yields the same salt.
    pub(super) fn mine(&self, pattern: &Pattern, seed: Option<u64>) -> (Address, B256) {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let mut salt_base = [0u8; 32];

        tracing::info!(
            deployer = %self.deployer,
            init_code_hash = %self.init_code_hash,
            %pattern,
            "mining salt"
        );

        let mut round: u64 = 0;
        loop {
            self.fill_salt_base(&mut rng, &mut salt_base);
            tracing::debug!(round, "starting round");

            let mining_result = (0..MAX_NONCE).into_par_iter().find_map_first(move |nonce| {
                let mut salt = salt_base;

                // Set the nonce segment (bytes 26-31) with the current nonce value
                salt[26..32].copy_from_slice(&nonce.to_be_bytes()[2..]);

                let candidate = self.compute_address(&salt);
                pattern
                    .matches(&candidate)
                    .then(|| (candidate, B256::from(salt)))
            });

            if let Some(found) = mining_result {
                break found;
            }
            round += 1;
        }
    }
}
