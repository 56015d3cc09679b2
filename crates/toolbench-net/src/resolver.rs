//! Production resolver over hickory-resolver

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError as HickoryError, ResolveErrorKind};
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::rr::{Name, RData, RecordType as WireType};
use hickory_resolver::TokioAsyncResolver;

use toolbench_core::config::DnsConfig;
use toolbench_core::types::DnsProvider;
use toolbench_core::{ToolbenchError, ToolbenchResult};

use crate::dns::{MxRecord, RawAnswer, RecordType, ResolveError, Resolver, SoaRecord};

/// Resolver backed by the host's DNS configuration or a public upstream.
///
/// Must be constructed inside a tokio runtime.
pub struct SystemResolver {
    inner: TokioAsyncResolver,
}

impl SystemResolver {
    pub fn from_config(config: &DnsConfig) -> ToolbenchResult<Self> {
        let inner = match config.provider {
            DnsProvider::System => TokioAsyncResolver::tokio_from_system_conf()
                .map_err(|e| ToolbenchError::Config(format!("reading system DNS config: {e}")))?,
            DnsProvider::Google => {
                TokioAsyncResolver::tokio(ResolverConfig::google(), ResolverOpts::default())
            }
            DnsProvider::Cloudflare => {
                TokioAsyncResolver::tokio(ResolverConfig::cloudflare(), ResolverOpts::default())
            }
        };
        tracing::debug!(provider = ?config.provider, "DNS resolver ready");
        Ok(Self { inner })
    }
}

impl Resolver for SystemResolver {
    async fn resolve(
        &self,
        domain: &str,
        record_type: RecordType,
    ) -> Result<RawAnswer, ResolveError> {
        // Fully qualified so search domains are never appended
        let name = Name::from_ascii(format!("{domain}."))
            .map_err(|e| ResolveError::InvalidDomain(e.to_string()))?;

        let lookup = self
            .inner
            .lookup(name, wire_type(record_type))
            .await
            .map_err(classify)?;
        let rdata: Vec<&RData> = lookup.iter().collect();

        let answer = match record_type {
            RecordType::A | RecordType::Aaaa => RawAnswer::Addresses(
                rdata
                    .iter()
                    .filter_map(|r| match r {
                        RData::A(a) => Some(a.to_string()),
                        RData::AAAA(aaaa) => Some(aaaa.to_string()),
                        _ => None,
                    })
                    .collect(),
            ),
            RecordType::Ns | RecordType::Cname => RawAnswer::Names(
                rdata
                    .iter()
                    .filter_map(|r| match r {
                        RData::NS(ns) => Some(display_name(ns)),
                        RData::CNAME(cname) => Some(display_name(cname)),
                        _ => None,
                    })
                    .collect(),
            ),
            RecordType::Txt => RawAnswer::Text(
                rdata
                    .iter()
                    .filter_map(|r| match r {
                        RData::TXT(txt) => Some(
                            txt.txt_data()
                                .iter()
                                .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
                                .collect::<String>(),
                        ),
                        _ => None,
                    })
                    .collect(),
            ),
            RecordType::Mx => RawAnswer::Mail(
                rdata
                    .iter()
                    .filter_map(|r| match r {
                        RData::MX(mx) => Some(MxRecord {
                            priority: mx.preference(),
                            exchange: display_name(mx.exchange()),
                        }),
                        _ => None,
                    })
                    .collect(),
            ),
            RecordType::Soa => {
                let soa = rdata
                    .iter()
                    .find_map(|r| match r {
                        RData::SOA(soa) => Some(soa),
                        _ => None,
                    })
                    .ok_or(ResolveError::NoData)?;
                RawAnswer::Authority(SoaRecord {
                    mname: display_name(soa.mname()),
                    rname: display_name(soa.rname()),
                    serial: soa.serial(),
                    refresh: soa.refresh() as u32,
                    retry: soa.retry() as u32,
                    expire: soa.expire() as u32,
                    minimum: soa.minimum(),
                })
            }
        };
        Ok(answer)
    }
}

fn wire_type(record_type: RecordType) -> WireType {
    match record_type {
        RecordType::A => WireType::A,
        RecordType::Aaaa => WireType::AAAA,
        RecordType::Ns => WireType::NS,
        RecordType::Cname => WireType::CNAME,
        RecordType::Txt => WireType::TXT,
        RecordType::Mx => WireType::MX,
        RecordType::Soa => WireType::SOA,
    }
}

/// NXDOMAIN and empty NOERROR answers get their own kinds; everything else
/// is an upstream failure.
fn classify(err: HickoryError) -> ResolveError {
    match err.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => match response_code {
            ResponseCode::NXDomain => ResolveError::NotFound,
            ResponseCode::NoError => ResolveError::NoData,
            other => ResolveError::ServerFailure(other.to_string()),
        },
        _ => ResolveError::ServerFailure(err.to_string()),
    }
}

/// Names print fully qualified; drop the root dot for display.
fn display_name(name: &impl std::fmt::Display) -> String {
    name.to_string().trim_end_matches('.').to_string()
}
