use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::slice::Iter;

use itertools::Itertools;

use crate::domain_name::{DomainName, LabelSequenceParser};
use crate::error::{map_decode_err, map_encode_err, truncated, Result};
use crate::query::class_name;
use crate::rr_types::{RRType, CLASS_IN};
use crate::utils;

// The address family of a record value that is an address literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    V4,
    V6,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DNSRecord {
    name: DomainName,
    r_type: u16,
    class: u16,
    ttl: u32,
    data: RData,
}

// The parsed RDATA of a record. Types the resolver has no use for are kept
// as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RData {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    NS(DomainName),
    CNAME(DomainName),
    TXT(Vec<String>),
    SOA {
        mname: DomainName,
        rname: DomainName,
        serial: u32,
        refresh: u32,
        retry: u32,
        expire: u32,
        minimum: u32,
    },
    Unknown(Vec<u8>),
}

impl DNSRecord {
    pub fn new(name: DomainName, r_type: u16, ttl: u32, data: RData) -> DNSRecord {
        DNSRecord {
            name,
            r_type,
            class: CLASS_IN,
            ttl,
            data,
        }
    }

    pub fn a(name: impl Into<DomainName>, ttl: u32, addr: Ipv4Addr) -> DNSRecord {
        DNSRecord::new(name.into(), RRType::A as u16, ttl, RData::A(addr))
    }

    pub fn aaaa(name: impl Into<DomainName>, ttl: u32, addr: Ipv6Addr) -> DNSRecord {
        DNSRecord::new(name.into(), RRType::AAAA as u16, ttl, RData::AAAA(addr))
    }

    pub fn ns(name: impl Into<DomainName>, ttl: u32, ns: impl Into<DomainName>) -> DNSRecord {
        DNSRecord::new(name.into(), RRType::NS as u16, ttl, RData::NS(ns.into()))
    }

    pub fn cname(name: impl Into<DomainName>, ttl: u32, target: impl Into<DomainName>) -> DNSRecord {
        DNSRecord::new(
            name.into(),
            RRType::CNAME as u16,
            ttl,
            RData::CNAME(target.into()),
        )
    }

    pub fn name(&self) -> &DomainName {
        &self.name
    }

    pub fn r_type(&self) -> u16 {
        self.r_type
    }

    pub fn record_type(&self) -> Option<RRType> {
        RRType::try_from(self.r_type).ok()
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    pub fn data(&self) -> &RData {
        &self.data
    }

    // The textual form of the record data, as it appears at the end of a
    // zone file line.
    pub fn value(&self) -> String {
        self.data.to_string()
    }

    // Whether the value is an IPv4 or IPv6 address literal. Judged from the
    // text alone, regardless of the record type.
    pub fn is_address(&self) -> bool {
        self.address_family().is_some()
    }

    pub fn address_family(&self) -> Option<AddressFamily> {
        match self.value().parse::<IpAddr>() {
            Ok(IpAddr::V4(_)) => Some(AddressFamily::V4),
            Ok(IpAddr::V6(_)) => Some(AddressFamily::V6),
            Err(_) => None,
        }
    }

    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        self.value().parse().ok()
    }

    // Returns the domain name carried by a NS or CNAME record.
    pub fn target(&self) -> Option<&DomainName> {
        match &self.data {
            RData::NS(name) | RData::CNAME(name) => Some(name),
            _ => None,
        }
    }

    pub fn decode<'a>(iter: &mut Iter<'a, u8>, message: &'a [u8]) -> Result<DNSRecord> {
        let name = LabelSequenceParser::new(message).construct_domain_name(iter)?;

        let parts = utils::u8_bytes_to_u16_vec(iter, 2).map_err(|e| map_decode_err("rr", &e))?;
        let r_type = parts[0];
        let class = parts[1];
        let ttl = utils::u8_bytes_to_u32(iter).map_err(|e| map_decode_err("rr", &e))?;
        let rd_len = utils::u8_bytes_to_u16_vec(iter, 1).map_err(|e| map_decode_err("rr", &e))?;
        let rd_size = usize::from(rd_len[0]);

        let rest = iter.as_slice();
        if rest.len() < rd_size {
            return Err(truncated("rdata"));
        }
        let (raw, tail) = rest.split_at(rd_size);
        *iter = tail.iter();

        let data = RData::decode(r_type, raw, message)?;
        Ok(DNSRecord {
            name,
            r_type,
            class,
            ttl,
            data,
        })
    }

    pub fn encode(&self, encoded: &mut Vec<u8>) -> Result<()> {
        self.name.encode(encoded)?;
        encoded.extend(self.r_type.to_be_bytes());
        encoded.extend(self.class.to_be_bytes());
        encoded.extend(self.ttl.to_be_bytes());

        let mut rdata = vec![];
        self.data.encode(&mut rdata)?;
        let rd_len = u16::try_from(rdata.len()).map_err(|e| map_encode_err("rdata", &e))?;
        encoded.extend(rd_len.to_be_bytes());
        encoded.extend(rdata);
        Ok(())
    }
}

impl fmt::Display for DNSRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r_type = match self.record_type() {
            Some(r_type) => r_type.to_string(),
            None => format!("TYPE{}", self.r_type),
        };
        write!(
            f,
            "{} {} {} {} {}",
            self.name,
            self.ttl,
            class_name(self.class),
            r_type,
            self.data
        )
    }
}

impl RData {
    fn decode<'a>(r_type: u16, raw: &'a [u8], message: &'a [u8]) -> Result<RData> {
        let name_at = |iter: &mut Iter<'a, u8>| {
            LabelSequenceParser::new(message).construct_domain_name(iter)
        };

        let data = match RRType::try_from(r_type) {
            Ok(RRType::A) => {
                let octets: [u8; 4] = raw.try_into().map_err(|e| map_decode_err("A", &e))?;
                RData::A(Ipv4Addr::from(octets))
            }
            Ok(RRType::AAAA) => {
                let octets: [u8; 16] = raw.try_into().map_err(|e| map_decode_err("AAAA", &e))?;
                RData::AAAA(Ipv6Addr::from(octets))
            }
            Ok(RRType::NS) => RData::NS(name_at(&mut raw.iter())?),
            Ok(RRType::CNAME) => RData::CNAME(name_at(&mut raw.iter())?),
            Ok(RRType::TXT) => {
                let mut iter = raw.iter();
                let mut strings = vec![];
                while let Some(len) = iter.next() {
                    let text = iter.by_ref().take(usize::from(*len)).copied().collect_vec();
                    if text.len() < usize::from(*len) {
                        return Err(truncated("TXT"));
                    }
                    strings.push(String::from_utf8_lossy(&text).into_owned());
                }
                RData::TXT(strings)
            }
            Ok(RRType::SOA) => {
                let mut iter = raw.iter();
                let mname = name_at(&mut iter)?;
                let rname = name_at(&mut iter)?;
                let mut fields = [0u32; 5];
                for field in fields.iter_mut() {
                    *field = utils::u8_bytes_to_u32(&mut iter)
                        .map_err(|e| map_decode_err("SOA", &e))?;
                }
                RData::SOA {
                    mname,
                    rname,
                    serial: fields[0],
                    refresh: fields[1],
                    retry: fields[2],
                    expire: fields[3],
                    minimum: fields[4],
                }
            }
            _ => RData::Unknown(raw.to_vec()),
        };
        Ok(data)
    }

    fn encode(&self, encoded: &mut Vec<u8>) -> Result<()> {
        match self {
            RData::A(addr) => encoded.extend(addr.octets()),
            RData::AAAA(addr) => encoded.extend(addr.octets()),
            RData::NS(name) | RData::CNAME(name) => name.encode(encoded)?,
            RData::TXT(strings) => {
                for text in strings {
                    let len = u8::try_from(text.len()).map_err(|e| map_encode_err("TXT", &e))?;
                    encoded.push(len);
                    encoded.extend(text.as_bytes());
                }
            }
            RData::SOA {
                mname,
                rname,
                serial,
                refresh,
                retry,
                expire,
                minimum,
            } => {
                mname.encode(encoded)?;
                rname.encode(encoded)?;
                for field in [serial, refresh, retry, expire, minimum] {
                    encoded.extend(field.to_be_bytes());
                }
            }
            RData::Unknown(raw) => encoded.extend(raw),
        }
        Ok(())
    }
}

impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RData::A(addr) => write!(f, "{}", addr),
            RData::AAAA(addr) => write!(f, "{}", addr),
            RData::NS(name) | RData::CNAME(name) => write!(f, "{}", name),
            RData::TXT(strings) => {
                write!(f, "{}", strings.iter().map(|s| format!("\"{}\"", s)).join(" "))
            }
            RData::SOA {
                mname,
                rname,
                serial,
                refresh,
                retry,
                expire,
                minimum,
            } => write!(
                f,
                "{} {} {} {} {} {} {}",
                mname, rname, serial, refresh, retry, expire, minimum
            ),
            RData::Unknown(raw) => write!(
                f,
                "\\# {} {}",
                raw.len(),
                raw.iter().map(|b| format!("{:02x}", b)).join("")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DNSResolverError;

    fn round_trip(record: &DNSRecord) -> DNSRecord {
        let mut encoded = vec![];
        record.encode(&mut encoded).unwrap();
        let mut iter = encoded.iter();
        let decoded = DNSRecord::decode(&mut iter, &encoded).unwrap();
        assert!(iter.next().is_none());
        decoded
    }

    #[test]
    fn test_a_record_is_an_ipv4_address() {
        let record = DNSRecord::a("example.com", 300, Ipv4Addr::new(93, 184, 216, 34));
        assert_eq!(record.value(), "93.184.216.34");
        assert!(record.is_address());
        assert_eq!(record.address_family(), Some(AddressFamily::V4));
        assert_eq!(record.ipv4(), Some(Ipv4Addr::new(93, 184, 216, 34)));
        assert_eq!(record.to_string(), "example.com. 300 IN A 93.184.216.34");
        assert_eq!(round_trip(&record), record);
    }

    #[test]
    fn test_aaaa_record_is_an_ipv6_address() {
        let record = DNSRecord::aaaa("example.com", 60, "2001:db8::1".parse().unwrap());
        assert!(record.is_address());
        assert_eq!(record.address_family(), Some(AddressFamily::V6));
        assert_eq!(record.ipv4(), None);
    }

    #[test]
    fn test_cname_record_is_not_an_address() {
        let record = DNSRecord::cname("www.example.com", 60, "example.com");
        assert_eq!(record.value(), "example.com.");
        assert!(!record.is_address());
        assert_eq!(record.target(), Some(&DomainName::new("example.com")));
        assert_eq!(
            record.to_string(),
            "www.example.com. 60 IN CNAME example.com."
        );
    }

    #[test]
    fn test_decode_ns_with_compressed_rdata() {
        // Header-less message: "com" at offset 0, then a NS record for com
        // whose rdata is "a.gtld-servers" + pointer to offset 0.
        let mut message = b"\x03com\x00".to_vec();
        let record_start = message.len();
        message.extend([0xc0, 0x00]);
        message.extend([0, 2, 0, 1, 0, 0, 0x0e, 0x10]);
        let rdata = b"\x01a\x0cgtld-servers\xc0\x00";
        message.extend([0, rdata.len() as u8]);
        message.extend(rdata);

        let mut iter = message[record_start..].iter();
        let record = DNSRecord::decode(&mut iter, &message).unwrap();
        assert_eq!(record.name(), &DomainName::new("com"));
        assert_eq!(record.record_type(), Some(RRType::NS));
        assert_eq!(record.ttl(), 3600);
        assert_eq!(record.value(), "a.gtld-servers.com.");
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_txt_and_soa_round_trip() {
        let txt = DNSRecord::new(
            DomainName::new("example.com"),
            RRType::TXT as u16,
            10,
            RData::TXT(vec![String::from("v=spf1 -all")]),
        );
        assert_eq!(round_trip(&txt).value(), "\"v=spf1 -all\"");

        let soa = DNSRecord::new(
            DomainName::new("example.com"),
            RRType::SOA as u16,
            10,
            RData::SOA {
                mname: DomainName::new("ns.icann.org"),
                rname: DomainName::new("noc.dns.icann.org"),
                serial: 2024,
                refresh: 7200,
                retry: 3600,
                expire: 1209600,
                minimum: 3600,
            },
        );
        assert_eq!(round_trip(&soa), soa);
        assert!(!soa.is_address());
    }

    #[test]
    fn test_unknown_type_keeps_raw_bytes() {
        let record = DNSRecord::new(
            DomainName::new("example.com"),
            65,
            10,
            RData::Unknown(vec![0xab, 0x01]),
        );
        let decoded = round_trip(&record);
        assert_eq!(decoded.record_type(), None);
        assert_eq!(decoded.to_string(), "example.com. 10 IN TYPE65 \\# 2 ab01");
    }

    #[test]
    fn test_a_record_with_wrong_length_is_rejected() {
        let record = DNSRecord::new(
            DomainName::new("example.com"),
            RRType::A as u16,
            10,
            RData::Unknown(vec![1, 2, 3]),
        );
        let mut encoded = vec![];
        record.encode(&mut encoded).unwrap();
        assert!(matches!(
            DNSRecord::decode(&mut encoded.iter(), &encoded),
            Err(DNSResolverError::Decode(step, _)) if step == "A"
        ));
    }

    #[test]
    fn test_rdata_longer_than_message_is_rejected() {
        let mut encoded = vec![];
        DNSRecord::a("example.com", 1, Ipv4Addr::LOCALHOST)
            .encode(&mut encoded)
            .unwrap();
        encoded.truncate(encoded.len() - 1);
        assert!(DNSRecord::decode(&mut encoded.iter(), &encoded).is_err());
    }
}
