//! Hex digests of UTF-8 strings.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::error::FeatureError;

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgo {
    Sha256,
    Md5,
}

impl HashAlgo {
    /// Length of the lowercase hex digest.
    pub fn hex_len(self) -> usize {
        match self {
            HashAlgo::Sha256 => 64,
            HashAlgo::Md5 => 32,
        }
    }

    pub fn digest(self, data: &str) -> String {
        match self {
            HashAlgo::Sha256 => hash_sha256(data),
            HashAlgo::Md5 => hash_md5(data),
        }
    }
}

impl std::fmt::Display for HashAlgo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashAlgo::Sha256 => write!(f, "sha256"),
            HashAlgo::Md5 => write!(f, "md5"),
        }
    }
}

impl std::str::FromStr for HashAlgo {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "").as_str() {
            "sha256" => Ok(HashAlgo::Sha256),
            "md5" => Ok(HashAlgo::Md5),
            other => Err(FeatureError::InvalidArguments {
                op: "hash".to_string(),
                reason: format!("unknown algorithm '{}'", other),
            }),
        }
    }
}

pub fn hash_sha256(data: &str) -> String {
    hex::encode(Sha256::digest(data.as_bytes()))
}

pub fn hash_md5(data: &str) -> String {
    format!("{:x}", md5::compute(data.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_known_vector() {
        assert_eq!(
            hash_sha256("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(hash_sha256("hello").len(), 64);
    }

    #[test]
    fn md5_known_vector() {
        assert_eq!(hash_md5(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(hash_md5("hello").len(), 32);
    }

    #[test]
    fn digests_are_deterministic_and_input_sensitive() {
        for algo in [HashAlgo::Sha256, HashAlgo::Md5] {
            let a = algo.digest("reconflow");
            assert_eq!(a, algo.digest("reconflow"));
            assert_ne!(a, algo.digest("reconflow!"));
            assert_eq!(a.len(), algo.hex_len());
            assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn algo_parses_case_insensitively() {
        assert_eq!("SHA-256".parse::<HashAlgo>().unwrap(), HashAlgo::Sha256);
        assert_eq!("md5".parse::<HashAlgo>().unwrap(), HashAlgo::Md5);
        let err = "crc32".parse::<HashAlgo>().unwrap_err();
        assert!(err.is_input_error());
        assert!(matches!(
            &err,
            FeatureError::InvalidArguments { op, reason } if op == "hash" && reason.contains("crc32")
        ));
    }
}
