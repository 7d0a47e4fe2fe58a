use std::fmt;
use std::slice::Iter;

use crate::error::{map_encode_err, truncated, DNSResolverError, Result};
use itertools::Itertools;

const POINTER_MASK: u8 = 0b1100_0000;
const MAX_LABEL_LEN: usize = 63;
// Bounds how many compression pointers a single name may follow, so that a
// pointer cycle in a hostile message cannot loop forever.
const MAX_POINTER_JUMPS: usize = 32;

// DomainName represents a fully form domain name, stored without the
// trailing root dot.
#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct DomainName(pub String);

// LabelSequenceParser is a parser that knows how to construct
// domain names where a domain name is represented as:
// 1. a sequence of labels ending in a zero octet
// 2. a pointer
// 3. a sequence of labels ending with a pointer
//
// message is the entire DNS message, required to follow a pointer back
// to where it is pointing.
pub struct LabelSequenceParser<'a> {
    message: &'a [u8],
    labels: Vec<String>,
    jumps: usize,
}

impl<'a> LabelSequenceParser<'a> {
    pub fn new(message: &'a [u8]) -> LabelSequenceParser<'a> {
        LabelSequenceParser {
            message,
            labels: vec![],
            jumps: 0,
        }
    }

    // Constructs the domain name from its wire format. iter is left positioned
    // right after the name as it appears at its original location.
    pub fn construct_domain_name(mut self, iter: &mut Iter<'a, u8>) -> Result<DomainName> {
        self.read_labels(iter)?;
        Ok(DomainName(self.labels.join(".")))
    }

    fn read_labels(&mut self, iter: &mut Iter<'a, u8>) -> Result<()> {
        loop {
            let len = *iter.next().ok_or_else(|| truncated("name"))?;
            // If length is 0, then there are no more labels.
            if len == 0 {
                return Ok(());
            }
            if len & POINTER_MASK == POINTER_MASK {
                return self.follow_pointer(len, iter);
            }
            if len & POINTER_MASK != 0 {
                return Err(DNSResolverError::Decode(
                    String::from("name"),
                    format!("unsupported label type {:#04x}", len),
                ));
            }

            let len_usize = usize::from(len);
            let label = iter.by_ref().take(len_usize).copied().collect_vec();
            if label.len() < len_usize {
                return Err(truncated("name"));
            }
            self.labels.push(String::from_utf8_lossy(&label).into_owned());
        }
    }

    fn follow_pointer(&mut self, first: u8, iter: &mut Iter<'a, u8>) -> Result<()> {
        let next = iter.next().ok_or_else(|| truncated("compressed_name"))?;
        self.jumps += 1;
        if self.jumps > MAX_POINTER_JUMPS {
            return Err(DNSResolverError::Decode(
                String::from("compressed_name"),
                String::from("too many compression pointers"),
            ));
        }
        // get offset; the place we need to go to
        let offset = usize::from(u16::from_be_bytes([first & !POINTER_MASK, *next]));
        let message = self.message;
        let mut pointed = message
            .get(offset..)
            .ok_or_else(|| {
                DNSResolverError::Decode(
                    String::from("compressed_name"),
                    format!("pointer {} is outside the message", offset),
                )
            })?
            .iter();
        self.read_labels(&mut pointed)
    }
}

impl DomainName {
    pub fn new(domain: impl Into<String>) -> DomainName {
        let domain = domain.into();
        let trimmed = domain.strip_suffix('.').unwrap_or(&domain);
        DomainName(trimmed.to_owned())
    }

    // Encodes the domain name into a sequence of labels ending in a zero octect.
    pub fn encode(&self, encoded: &mut Vec<u8>) -> Result<()> {
        for part in self.0.split('.').filter(|part| !part.is_empty()) {
            if part.len() > MAX_LABEL_LEN {
                return Err(DNSResolverError::Encode(
                    String::from("name"),
                    format!("label `{}` is longer than {} octets", part, MAX_LABEL_LEN),
                ));
            }
            let len = u8::try_from(part.len()).map_err(|e| map_encode_err("name", &e))?;
            encoded.push(len);
            encoded.extend(part.as_bytes());
        }
        encoded.push(0);
        Ok(())
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.", self.0)
    }
}

impl From<&str> for DomainName {
    fn from(value: &str) -> Self {
        DomainName::new(value)
    }
}
