//! IPv4 prefix arithmetic shared by every subnet tool
//!
//! Covers the subnet/wildcard converters, the host-count calculator and the
//! network summary. Host counting follows RFC 3021 for point-to-point links:
//! a /31 has two usable addresses and a /32 has one.

use serde::Serialize;
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use toolbench_core::{ToolbenchError, ToolbenchResult};

/// An IPv4 prefix length, always within `0..=32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Prefix(u8);

impl Prefix {
    pub const MAX: u8 = 32;

    pub fn new(bits: u8) -> ToolbenchResult<Self> {
        if bits > Self::MAX {
            return Err(out_of_range(bits.to_string()));
        }
        Ok(Self(bits))
    }

    /// Parse `24` or `/24`. Negative and oversized values are rejected.
    pub fn parse(s: &str) -> ToolbenchResult<Self> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('/').unwrap_or(trimmed);
        let value: i64 = digits
            .parse()
            .map_err(|_| ToolbenchError::invalid(format!("'{s}' is not a CIDR prefix")))?;
        u8::try_from(value)
            .ok()
            .filter(|bits| *bits <= Self::MAX)
            .map(Self)
            .ok_or_else(|| out_of_range(value.to_string()))
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    /// Network mask as a host-order integer
    pub fn mask_u32(self) -> u32 {
        match self.0 {
            0 => 0,
            n => u32::MAX << (32 - u32::from(n)),
        }
    }

    pub fn subnet_mask(self) -> Ipv4Addr {
        Ipv4Addr::from(self.mask_u32())
    }

    /// Bitwise complement of the subnet mask (ACL wildcard)
    pub fn wildcard_mask(self) -> Ipv4Addr {
        Ipv4Addr::from(!self.mask_u32())
    }

    /// Every address in the block, network and broadcast included
    pub fn total_hosts(self) -> u64 {
        1u64 << (32 - u32::from(self.0))
    }

    pub fn usable_hosts(self) -> u64 {
        match self.0 {
            32 => 1,
            31 => 2,
            _ => self.total_hosts() - 2,
        }
    }

    /// Recover the prefix from a dotted subnet mask such as `255.255.255.0`.
    pub fn from_mask(mask: Ipv4Addr) -> ToolbenchResult<Self> {
        let bits = u32::from(mask);
        let ones = bits.leading_ones() as u8;
        let prefix = Self(ones);
        if prefix.mask_u32() != bits {
            return Err(ToolbenchError::invalid(format!(
                "{mask} is not a contiguous subnet mask"
            )));
        }
        Ok(prefix)
    }

    /// Recover the prefix from a wildcard mask such as `0.0.0.255`.
    pub fn from_wildcard(wildcard: Ipv4Addr) -> ToolbenchResult<Self> {
        Self::from_mask(Ipv4Addr::from(!u32::from(wildcard))).map_err(|_| {
            ToolbenchError::invalid(format!("{wildcard} is not a contiguous wildcard mask"))
        })
    }

    /// Smallest block (longest prefix) with at least `hosts` usable addresses.
    pub fn for_host_count(hosts: u64) -> ToolbenchResult<Self> {
        if hosts == 0 {
            return Err(ToolbenchError::invalid("host count must be at least 1"));
        }
        (0..=Self::MAX)
            .rev()
            .map(Self)
            .find(|p| p.usable_hosts() >= hosts)
            .ok_or_else(|| {
                ToolbenchError::invalid(format!(
                    "{hosts} hosts do not fit in an IPv4 network (max {})",
                    Self(0).usable_hosts()
                ))
            })
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.0)
    }
}

impl FromStr for Prefix {
    type Err = ToolbenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn out_of_range(value: String) -> ToolbenchError {
    ToolbenchError::invalid(format!(
        "CIDR prefix {value} out of range (expected 0-32)"
    ))
}

/// An address together with its prefix, e.g. `192.168.1.10/24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Network {
    address: Ipv4Addr,
    prefix: Prefix,
}

impl Ipv4Network {
    pub fn new(address: Ipv4Addr, prefix: Prefix) -> Self {
        Self { address, prefix }
    }

    /// Parse `a.b.c.d/24`, `a.b.c.d/255.255.255.0`, or a bare address (/32).
    pub fn parse(s: &str) -> ToolbenchResult<Self> {
        let s = s.trim();
        let (addr_part, prefix_part) = match s.split_once('/') {
            Some((addr, prefix)) => (addr, Some(prefix)),
            None => (s, None),
        };

        let address: Ipv4Addr = addr_part
            .trim()
            .parse()
            .map_err(|_| ToolbenchError::invalid(format!("'{addr_part}' is not an IPv4 address")))?;

        let prefix = match prefix_part {
            None => Prefix(Prefix::MAX),
            Some(p) if p.contains('.') => {
                let mask: Ipv4Addr = p
                    .trim()
                    .parse()
                    .map_err(|_| ToolbenchError::invalid(format!("'{p}' is not a subnet mask")))?;
                Prefix::from_mask(mask)?
            }
            Some(p) => Prefix::parse(p)?,
        };

        Ok(Self { address, prefix })
    }

    pub fn address(&self) -> Ipv4Addr {
        self.address
    }

    pub fn prefix(&self) -> Prefix {
        self.prefix
    }

    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.address) & self.prefix.mask_u32())
    }

    pub fn broadcast(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.address) | !self.prefix.mask_u32())
    }

    pub fn first_usable(&self) -> Ipv4Addr {
        match self.prefix.bits() {
            31 | 32 => self.network(),
            _ => Ipv4Addr::from(u32::from(self.network()) + 1),
        }
    }

    pub fn last_usable(&self) -> Ipv4Addr {
        match self.prefix.bits() {
            31 | 32 => self.broadcast(),
            _ => Ipv4Addr::from(u32::from(self.broadcast()) - 1),
        }
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        u32::from(addr) & self.prefix.mask_u32() == u32::from(self.network())
    }

    pub fn summary(&self) -> SubnetSummary {
        SubnetSummary {
            cidr: self.to_string(),
            network: self.network(),
            broadcast: self.broadcast(),
            subnet_mask: self.prefix.subnet_mask(),
            wildcard_mask: self.prefix.wildcard_mask(),
            first_usable: self.first_usable(),
            last_usable: self.last_usable(),
            total_hosts: self.prefix.total_hosts(),
            usable_hosts: self.prefix.usable_hosts(),
        }
    }
}

impl fmt::Display for Ipv4Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.network(), self.prefix)
    }
}

impl FromStr for Ipv4Network {
    type Err = ToolbenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Everything the subnet calculator displays for one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubnetSummary {
    pub cidr: String,
    pub network: Ipv4Addr,
    pub broadcast: Ipv4Addr,
    pub subnet_mask: Ipv4Addr,
    pub wildcard_mask: Ipv4Addr,
    pub first_usable: Ipv4Addr,
    pub last_usable: Ipv4Addr,
    pub total_hosts: u64,
    pub usable_hosts: u64,
}
