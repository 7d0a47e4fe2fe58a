use std::net::Ipv4Addr;

use crate::error::{DNSResolverError, Result};

// IPv4 addresses of the IANA root servers, a through m.
pub const ROOT_SERVERS: [Ipv4Addr; 13] = [
    Ipv4Addr::new(198, 41, 0, 4),
    Ipv4Addr::new(199, 9, 14, 201),
    Ipv4Addr::new(192, 33, 4, 12),
    Ipv4Addr::new(199, 7, 91, 13),
    Ipv4Addr::new(192, 203, 230, 10),
    Ipv4Addr::new(192, 5, 5, 241),
    Ipv4Addr::new(192, 112, 36, 4),
    Ipv4Addr::new(198, 97, 190, 53),
    Ipv4Addr::new(192, 36, 148, 17),
    Ipv4Addr::new(192, 58, 128, 30),
    Ipv4Addr::new(193, 0, 14, 129),
    Ipv4Addr::new(199, 7, 83, 42),
    Ipv4Addr::new(202, 12, 27, 33),
];

// The ordered list of root servers a resolution is attempted at, one after
// the other. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootServerList(Vec<Ipv4Addr>);

impl RootServerList {
    pub fn new(servers: Vec<Ipv4Addr>) -> Result<RootServerList> {
        if servers.is_empty() {
            return Err(DNSResolverError::InvalidConfig(String::from(
                "at least one root server is required",
            )));
        }
        Ok(RootServerList(servers))
    }

    pub fn iter(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for RootServerList {
    fn default() -> Self {
        RootServerList(ROOT_SERVERS.to_vec())
    }
}
