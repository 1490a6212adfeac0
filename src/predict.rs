use alloy_primitives::{Address, B256, keccak256};

const DEPLOYER_LEN: usize = 20;
const SALT_LEN: usize = 32;

/// Errors produced while predicting a CREATE2 address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(super) enum PredictError {
    /// The deployer was not 20 bytes, or the salt was longer than 32 bytes.
    #[error("invalid {field} length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        field: &'static str,
        expected: &'static str,
        actual: usize,
    },

    /// Zero-length creation code can never be deployed.
    #[error("init code is empty")]
    EmptyBytecode,
}

/// Left-pads a salt to 32 bytes, treating it as a big-endian number.
pub(super) fn pad_salt(salt: &[u8]) -> Result<B256, PredictError> {
    if salt.len() > SALT_LEN {
        return Err(PredictError::InvalidLength {
            field: "salt",
            expected: "at most 32",
            actual: salt.len(),
        });
    }
    Ok(B256::left_padding_from(salt))
}

/// Predicts the address at which `init_code` will be deployed when the
/// `deployer` account executes CREATE2 with `salt`.
///
/// The address is the low 20 bytes of
/// `keccak256(0xff ++ deployer ++ salt ++ keccak256(init_code))`.
///
/// # Errors
///
/// Returns [`PredictError::InvalidLength`] when `deployer` is not 20 bytes
/// or `salt` is longer than 32 bytes, and [`PredictError::EmptyBytecode`]
/// when `init_code` is empty.
pub(super) fn predict(
    deployer: &[u8],
    salt: &[u8],
    init_code: &[u8],
) -> Result<Address, PredictError> {
    if deployer.len() != DEPLOYER_LEN {
        return Err(PredictError::InvalidLength {
            field: "deployer",
            expected: "20",
            actual: deployer.len(),
        });
    }
    let salt = pad_salt(salt)?;
    if init_code.is_empty() {
        return Err(PredictError::EmptyBytecode);
    }

    Ok(predict_with_hash(
        Address::from_slice(deployer),
        salt,
        keccak256(init_code),
    ))
}

/// Same as [`predict`], for callers that already hold the init code hash.
pub(super) fn predict_with_hash(deployer: Address, salt: B256, init_code_hash: B256) -> Address {
    deployer.create2(salt, init_code_hash)
}
