use std::{
    fs, io,
    path::{Path, PathBuf},
};

use alloy_primitives::Bytes;
use serde::Deserialize;

/// Where the contract creation code comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum InitCodeSource {
    /// Creation code given inline on the command line.
    Hex(Bytes),
    /// A text file holding the creation code as hex.
    File(PathBuf),
    /// A compiled contract artifact (Hardhat, Truffle or Foundry JSON).
    Artifact(PathBuf),
}

#[derive(Debug, thiserror::Error)]
pub(super) enum InitCodeError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid hex in {origin}: {source}")]
    InvalidHex {
        origin: String,
        #[source]
        source: hex::FromHexError,
    },

    #[error("failed to parse artifact {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("artifact {0} has no creation bytecode")]
    MissingBytecode(PathBuf),
}

/// The subset of a compiler artifact needed to recover creation code.
#[derive(Deserialize)]
struct Artifact {
    bytecode: Option<ArtifactBytecode>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ArtifactBytecode {
    /// Hardhat and Truffle store the creation code directly.
    Hex(String),
    /// Foundry nests it under `bytecode.object`.
    Object { object: String },
}

/// Decodes hex text, tolerating surrounding whitespace and a `0x` prefix.
pub(super) fn decode_hex(text: &str, origin: &str) -> Result<Vec<u8>, InitCodeError> {
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    hex::decode(digits).map_err(|source| InitCodeError::InvalidHex {
        origin: origin.to_owned(),
        source,
    })
}

fn read(path: &Path) -> Result<String, InitCodeError> {
    fs::read_to_string(path).map_err(|source| InitCodeError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_artifact(path: &Path) -> Result<Vec<u8>, InitCodeError> {
    let artifact: Artifact =
        serde_json::from_str(&read(path)?).map_err(|source| InitCodeError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    let hex = match artifact.bytecode {
        Some(ArtifactBytecode::Hex(hex)) | Some(ArtifactBytecode::Object { object: hex }) => hex,
        None => return Err(InitCodeError::MissingBytecode(path.to_path_buf())),
    };
    decode_hex(&hex, &path.display().to_string())
}

/// Loads the creation code and appends the ABI-encoded constructor
/// arguments, if any.
///
/// An empty result is not an error here; the predictor rejects it.
pub(super) fn load(
    source: &InitCodeSource,
    constructor_args: Option<&Bytes>,
) -> Result<Bytes, InitCodeError> {
    let mut code = match source {
        InitCodeSource::Hex(bytes) => bytes.to_vec(),
        InitCodeSource::File(path) => decode_hex(&read(path)?, &path.display().to_string())?,
        InitCodeSource::Artifact(path) => load_artifact(path)?,
    };

    if let Some(args) = constructor_args {
        code.extend_from_slice(args);
    }

    tracing::debug!(len = code.len(), "loaded init code");
    Ok(code.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_inline_hex_with_args() {
        let source = InitCodeSource::Hex(Bytes::from_static(&[0x60, 0x80]));
        let args = Bytes::from_static(&[0x00, 0x07]);

        assert_eq!(load(&source, None).unwrap()[..], [0x60, 0x80]);
        assert_eq!(
            load(&source, Some(&args)).unwrap()[..],
            [0x60, 0x80, 0x00, 0x07]
        );
    }

    #[test]
    fn test_hex_file() {
        let file = temp_file("0x6080604052\n");
        let code = load(&InitCodeSource::File(file.path().to_path_buf()), None).unwrap();
        assert_eq!(code[..], [0x60, 0x80, 0x60, 0x40, 0x52]);

        let file = temp_file("  6080  ");
        let code = load(&InitCodeSource::File(file.path().to_path_buf()), None).unwrap();
        assert_eq!(code[..], [0x60, 0x80]);
    }

    #[test]
    fn test_hex_file_invalid() {
        let file = temp_file("0x60zz");
        let err = load(&InitCodeSource::File(file.path().to_path_buf()), None).unwrap_err();
        assert!(matches!(err, InitCodeError::InvalidHex { .. }));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.hex");
        let err = load(&InitCodeSource::File(path), None).unwrap_err();
        assert!(matches!(err, InitCodeError::Io { .. }));
    }

    #[test]
    fn test_hardhat_artifact() {
        let file = temp_file(
            r#"{"contractName":"Counter","abi":[],"bytecode":"0x60806040","deployedBytecode":"0x6080"}"#,
        );
        let code = load(&InitCodeSource::Artifact(file.path().to_path_buf()), None).unwrap();
        assert_eq!(code[..], [0x60, 0x80, 0x60, 0x40]);
    }

    #[test]
    fn test_foundry_artifact() {
        let file = temp_file(
            r#"{"abi":[],"bytecode":{"object":"0x6080604052","linkReferences":{}},"deployedBytecode":{"object":"0x00"}}"#,
        );
        let args = Bytes::from_static(&[0xff]);
        let code = load(
            &InitCodeSource::Artifact(file.path().to_path_buf()),
            Some(&args),
        )
        .unwrap();
        assert_eq!(code[..], [0x60, 0x80, 0x60, 0x40, 0x52, 0xff]);
    }

    #[test]
    fn test_artifact_without_bytecode() {
        let file = temp_file(r#"{"abi":[]}"#);
        let err = load(&InitCodeSource::Artifact(file.path().to_path_buf()), None).unwrap_err();
        assert!(matches!(err, InitCodeError::MissingBytecode(_)));

        let file = temp_file("not json");
        let err = load(&InitCodeSource::Artifact(file.path().to_path_buf()), None).unwrap_err();
        assert!(matches!(err, InitCodeError::Json { .. }));
    }

    #[test]
    fn test_empty_artifact_bytecode_is_loaded() {
        // Abstract contracts and interfaces compile to "0x".
        let file = temp_file(r#"{"bytecode":"0x"}"#);
        let code = load(&InitCodeSource::Artifact(file.path().to_path_buf()), None).unwrap();
        assert!(code.is_empty());
    }
}
