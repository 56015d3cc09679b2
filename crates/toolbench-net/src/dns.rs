//! DNS answer normalization and the resolver boundary
//!
//! A resolver hands back a [`RawAnswer`] whose shape depends on the record
//! type: address lists, name lists, TXT strings, MX pairs, or a single SOA.
//! [`normalize`] flattens each shape into uniform [`NormalizedRecord`] rows.
//! Resolution failures arrive as [`ResolveError`] kinds, never as foreign
//! error-code strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use thiserror::Error;

/// Record types offered by the lookup tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Aaaa,
    Ns,
    Cname,
    Txt,
    Mx,
    Soa,
}

impl RecordType {
    pub const ALL: [RecordType; 7] = [
        Self::A,
        Self::Aaaa,
        Self::Ns,
        Self::Cname,
        Self::Txt,
        Self::Mx,
        Self::Soa,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Ns => "NS",
            Self::Cname => "CNAME",
            Self::Txt => "TXT",
            Self::Mx => "MX",
            Self::Soa => "SOA",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ResolveError::UnsupportedType(wanted.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MxRecord {
    pub priority: u16,
    pub exchange: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoaRecord {
    pub mname: String,
    pub rname: String,
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub minimum: u32,
}

/// Resolver output, tagged by record shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawAnswer {
    /// A / AAAA
    Addresses(Vec<String>),
    /// NS / CNAME
    Names(Vec<String>),
    /// TXT, one entry per record with its character-strings joined
    Text(Vec<String>),
    Mail(Vec<MxRecord>),
    Authority(SoaRecord),
}

impl RawAnswer {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Addresses(v) | Self::Names(v) | Self::Text(v) => v.is_empty(),
            Self::Mail(v) => v.is_empty(),
            Self::Authority(_) => false,
        }
    }
}

/// One display row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedRecord {
    pub record_type: RecordType,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
}

/// Flatten a raw answer into display rows.
///
/// MX rows are ordered by ascending priority; equal priorities keep the
/// order the resolver returned them in.
pub fn normalize(record_type: RecordType, answer: RawAnswer) -> Vec<NormalizedRecord> {
    match answer {
        RawAnswer::Addresses(values) | RawAnswer::Names(values) | RawAnswer::Text(values) => {
            normalize_plain(record_type, values)
        }
        RawAnswer::Mail(records) => normalize_mx(record_type, records),
        RawAnswer::Authority(soa) => vec![normalize_soa(record_type, soa)],
    }
}

fn normalize_plain(record_type: RecordType, values: Vec<String>) -> Vec<NormalizedRecord> {
    values
        .into_iter()
        .map(|value| NormalizedRecord {
            record_type,
            value,
            priority: None,
        })
        .collect()
}

fn normalize_mx(record_type: RecordType, mut records: Vec<MxRecord>) -> Vec<NormalizedRecord> {
    // sort_by_key is stable
    records.sort_by_key(|mx| mx.priority);
    records
        .into_iter()
        .map(|mx| NormalizedRecord {
            record_type,
            value: mx.exchange,
            priority: Some(mx.priority),
        })
        .collect()
}

fn normalize_soa(record_type: RecordType, soa: SoaRecord) -> NormalizedRecord {
    NormalizedRecord {
        record_type,
        value: format!(
            "{} {} {} {} {} {} {}",
            soa.mname, soa.rname, soa.serial, soa.refresh, soa.retry, soa.expire, soa.minimum
        ),
        priority: None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("invalid domain: {0}")]
    InvalidDomain(String),

    #[error("unsupported record type '{0}' (expected A, AAAA, NS, CNAME, TXT, MX or SOA)")]
    UnsupportedType(String),

    /// NXDOMAIN
    #[error("domain not found")]
    NotFound,

    /// The name exists but has no records of the requested type
    #[error("no records of the requested type")]
    NoData,

    #[error("DNS server failure: {0}")]
    ServerFailure(String),
}

impl ResolveError {
    /// Node-style code shown next to the message
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidDomain(_) | Self::UnsupportedType(_) => "EINVAL",
            Self::NotFound => "ENOTFOUND",
            Self::NoData => "ENODATA",
            Self::ServerFailure(_) => "ESERVFAIL",
        }
    }

    /// Explanatory sentence for the person who ran the lookup.
    pub fn user_message(&self, domain: &str, record_type: RecordType) -> String {
        match self {
            Self::InvalidDomain(reason) => {
                format!("'{domain}' is not a valid domain name: {reason}.")
            }
            Self::UnsupportedType(t) => format!("'{t}' is not a supported record type."),
            Self::NotFound => format!(
                "The domain {domain} does not exist. Check the spelling or whether it has been registered."
            ),
            Self::NoData => format!(
                "The domain {domain} exists but has no {record_type} records."
            ),
            Self::ServerFailure(detail) => format!(
                "The DNS server failed while resolving {domain} ({detail}). Try again later."
            ),
        }
    }
}

/// A DNS resolution capability. One call per lookup; implementations must
/// not retry on their own.
pub trait Resolver: Send + Sync {
    fn resolve(
        &self,
        domain: &str,
        record_type: RecordType,
    ) -> impl Future<Output = Result<RawAnswer, ResolveError>> + Send;
}

/// Result of a normalized lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnsLookup {
    pub domain: String,
    pub record_type: RecordType,
    pub records: Vec<NormalizedRecord>,
}

/// Validate `domain`, resolve it once, and normalize the answer.
pub async fn lookup<R: Resolver>(
    resolver: &R,
    domain: &str,
    record_type: RecordType,
) -> Result<DnsLookup, ResolveError> {
    let domain = validate_domain(domain)?;
    tracing::debug!(%domain, %record_type, "resolving");

    let answer = resolver.resolve(&domain, record_type).await?;
    if answer.is_empty() {
        return Err(ResolveError::NoData);
    }

    let records = normalize(record_type, answer);
    tracing::debug!(%domain, %record_type, count = records.len(), "resolved");
    Ok(DnsLookup {
        domain,
        record_type,
        records,
    })
}

/// Check hostname syntax and return it without surrounding whitespace or a
/// trailing root dot.
pub fn validate_domain(input: &str) -> Result<String, ResolveError> {
    let trimmed = input.trim();
    let domain = trimmed.strip_suffix('.').unwrap_or(trimmed);

    if domain.is_empty() {
        return Err(ResolveError::InvalidDomain("empty".into()));
    }
    if domain.len() > 253 {
        return Err(ResolveError::InvalidDomain("longer than 253 characters".into()));
    }
    for label in domain.split('.') {
        if label.is_empty() {
            return Err(ResolveError::InvalidDomain("empty label".into()));
        }
        if label.len() > 63 {
            return Err(ResolveError::InvalidDomain(format!(
                "label '{label}' is longer than 63 characters"
            )));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(ResolveError::InvalidDomain(format!(
                "label '{label}' starts or ends with a hyphen"
            )));
        }
        if let Some(c) = label
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(ResolveError::InvalidDomain(format!(
                "character '{c}' is not allowed"
            )));
        }
    }
    Ok(domain.to_string())
}
