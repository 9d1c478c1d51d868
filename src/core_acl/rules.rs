use crate::config::AclConfig;
use crate::core_acl::error::AclError;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

/// Decides whether a freshly accepted peer may get a session at all.
pub trait AccessPolicy: Send + Sync + std::fmt::Debug {
    fn is_allowed(&self, remote: &SocketAddr) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IpPattern {
    Addr(IpAddr),
    Endpoint(SocketAddr),
    Network { base: IpAddr, prefix: u8 },
}

impl FromStr for IpPattern {
    type Err = AclError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((base, prefix)) = s.split_once('/') {
            let parsed: IpAddr = base
                .parse()
                .map_err(|_| AclError::InvalidPattern(s.to_string()))?;
            let prefix: u8 = prefix
                .parse()
                .map_err(|_| AclError::InvalidPrefix(s.to_string()))?;
            let base = parsed.to_canonical();
            // An IPv4-mapped network keeps its 96-bit `::ffff:` prefix outside the IPv4 mask.
            let prefix = match (parsed, base) {
                (IpAddr::V6(_), IpAddr::V4(_)) => prefix.checked_sub(96),
                _ => Some(prefix),
            };
            let max = if base.is_ipv4() { 32 } else { 128 };
            let prefix = prefix
                .filter(|p| *p <= max)
                .ok_or_else(|| AclError::InvalidPrefix(s.to_string()))?;
            return Ok(IpPattern::Network { base, prefix });
        }
        if let Ok(addr) = s.parse::<IpAddr>() {
            return Ok(IpPattern::Addr(addr.to_canonical()));
        }
        s.parse::<SocketAddr>()
            .map(IpPattern::Endpoint)
            .map_err(|_| AclError::InvalidPattern(s.to_string()))
    }
}

impl IpPattern {
    pub fn matches(&self, remote: &SocketAddr) -> bool {
        let ip = remote.ip().to_canonical();
        match self {
            IpPattern::Addr(addr) => *addr == ip,
            IpPattern::Endpoint(endpoint) => {
                endpoint.ip().to_canonical() == ip && endpoint.port() == remote.port()
            }
            IpPattern::Network { base, prefix } => in_network(*base, *prefix, ip),
        }
    }
}

fn in_network(base: IpAddr, prefix: u8, ip: IpAddr) -> bool {
    match (base, ip) {
        (IpAddr::V4(base), IpAddr::V4(ip)) => match 32u32.checked_sub(prefix as u32) {
            Some(shift) => {
                let mask = u32::MAX.checked_shl(shift).unwrap_or(0);
                u32::from(base) & mask == u32::from(ip) & mask
            }
            None => false,
        },
        (IpAddr::V6(base), IpAddr::V6(ip)) => match 128u32.checked_sub(prefix as u32) {
            Some(shift) => {
                let mask = u128::MAX.checked_shl(shift).unwrap_or(0);
                u128::from(base) & mask == u128::from(ip) & mask
            }
            None => false,
        },
        _ => false,
    }
}

/// Deny rules win; a non-empty allow list admits only its own matches.
#[derive(Debug, Clone, Default)]
pub struct IpRules {
    allow: Vec<IpPattern>,
    deny: Vec<IpPattern>,
}

impl IpRules {
    pub fn new(allow: Vec<IpPattern>, deny: Vec<IpPattern>) -> Self {
        Self { allow, deny }
    }

    pub fn from_config(config: &AclConfig) -> Result<Self, AclError> {
        let parse = |patterns: &[String]| -> Result<Vec<IpPattern>, AclError> {
            patterns.iter().map(|p| p.parse()).collect()
        };
        Ok(Self::new(parse(&config.allow)?, parse(&config.deny)?))
    }
}

impl AccessPolicy for IpRules {
    fn is_allowed(&self, remote: &SocketAddr) -> bool {
        if self.deny.iter().any(|p| p.matches(remote)) {
            return false;
        }
        self.allow.is_empty() || self.allow.iter().any(|p| p.matches(remote))
    }
}
