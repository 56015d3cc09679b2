use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ToolbenchError;

/// Hash algorithm offered by the checksum tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    #[serde(rename = "SHA-1", alias = "sha1", alias = "sha-1")]
    Sha1,
    #[serde(rename = "SHA-256", alias = "sha256", alias = "sha-256")]
    Sha256,
    #[serde(rename = "SHA-512", alias = "sha512", alias = "sha-512")]
    Sha512,
}

impl DigestAlgorithm {
    /// Every supported algorithm, in display order.
    pub const ALL: [DigestAlgorithm; 3] = [Self::Sha1, Self::Sha256, Self::Sha512];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha1 => "SHA-1",
            Self::Sha256 => "SHA-256",
            Self::Sha512 => "SHA-512",
        }
    }

    /// Length of the lowercase hex digest
    pub fn hex_len(&self) -> usize {
        match self {
            Self::Sha1 => 40,
            Self::Sha256 => 64,
            Self::Sha512 => 128,
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = ToolbenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha1" | "sha-1" => Ok(Self::Sha1),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            "sha512" | "sha-512" => Ok(Self::Sha512),
            other => Err(ToolbenchError::invalid(format!(
                "unsupported digest algorithm '{other}' (expected sha1, sha256 or sha512)"
            ))),
        }
    }
}

/// Upstream used by the DNS lookup tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DnsProvider {
    /// Whatever the host's resolv.conf (or platform equivalent) says
    #[default]
    System,
    Google,
    Cloudflare,
}

/// Request method used by the header check tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HttpMethod {
    #[default]
    Head,
    Get,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}
