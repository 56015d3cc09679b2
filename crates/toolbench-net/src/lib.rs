//! toolbench-net: network calculators and lookup boundaries
//!
//! - `cidr`: the one place prefix/mask/host-count arithmetic lives
//! - `dns`: record-type tagged answers, normalization, resolver trait
//! - `resolver`: hickory-backed production [`dns::Resolver`]
//! - `http`: first-hop header check with redirects left unfollowed

pub mod cidr;
pub mod dns;
pub mod http;
pub mod resolver;

pub use cidr::{Ipv4Network, Prefix, SubnetSummary};
pub use dns::{
    lookup, normalize, DnsLookup, MxRecord, NormalizedRecord, RawAnswer, RecordType,
    ResolveError, Resolver, SoaRecord,
};
pub use http::{check_headers, HeaderFetcher, HeaderReport, HttpCheckError, ReqwestFetcher};
pub use resolver::SystemResolver;
