use std::fmt;
use std::slice::Iter;

use crate::domain_name::{DomainName, LabelSequenceParser};
use crate::error::{map_decode_err, map_encode_err, Result};
use crate::rr_types::{RRType, ResponseCode, CLASS_IN};
use crate::utils;

const FLAG_RESPONSE: u16 = 0b1000_0000_0000_0000;
const RCODE_MASK: u16 = 0x000f;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DNSHeader {
    id: u16,
    flags: u16,
    qd_count: u16,
    an_count: u16,
    ns_count: u16,
    ar_count: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DNSQuestion {
    name: DomainName,
    q_type: RRType,
    class: u16,
}

impl DNSQuestion {
    pub fn new(name: DomainName, q_type: RRType, class: u16) -> DNSQuestion {
        DNSQuestion {
            name,
            q_type,
            class,
        }
    }

    pub fn name(&self) -> &DomainName {
        &self.name
    }

    pub fn q_type(&self) -> RRType {
        self.q_type
    }

    pub fn encode(&self, encoded: &mut Vec<u8>) -> Result<()> {
        self.name
            .encode(encoded)
            .map_err(|e| map_encode_err("question", &e))?;
        let rr_type = self.q_type as u16;
        encoded.extend(rr_type.to_be_bytes());
        encoded.extend(self.class.to_be_bytes());
        Ok(())
    }

    pub fn decode<'a>(iter: &mut Iter<'a, u8>, message: &'a [u8]) -> Result<DNSQuestion> {
        let name = LabelSequenceParser::new(message).construct_domain_name(iter)?;

        let parts =
            utils::u8_bytes_to_u16_vec(iter, 2).map_err(|e| map_decode_err("question", &e))?;
        let q_type: RRType = parts[0].try_into()?;
        Ok(DNSQuestion {
            name,
            q_type,
            class: parts[1],
        })
    }
}

impl fmt::Display for DNSQuestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, class_name(self.class), self.q_type)
    }
}

impl DNSHeader {
    pub fn new(
        id: u16,
        flags: u16,
        qd_count: u16,
        an_count: u16,
        ns_count: u16,
        ar_count: u16,
    ) -> DNSHeader {
        DNSHeader {
            id,
            flags,
            qd_count,
            an_count,
            ns_count,
            ar_count,
        }
    }

    // Header of a response carrying the given rcode and section counts.
    pub fn response(id: u16, rcode: ResponseCode, counts: [u16; 4]) -> DNSHeader {
        let flags = FLAG_RESPONSE | u16::from(u8::from(rcode));
        DNSHeader::new(id, flags, counts[0], counts[1], counts[2], counts[3])
    }

    // A copy of this header with the id and flags kept and the section counts replaced.
    pub fn with_counts(&self, counts: [u16; 4]) -> DNSHeader {
        DNSHeader::new(self.id, self.flags, counts[0], counts[1], counts[2], counts[3])
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn set_id(&mut self, id: u16) {
        self.id = id;
    }

    pub fn is_response(&self) -> bool {
        self.flags & FLAG_RESPONSE != 0
    }

    pub fn response_code(&self) -> ResponseCode {
        // The mask keeps the value within a nibble.
        ResponseCode::from((self.flags & RCODE_MASK) as u8)
    }

    pub fn num_questions(&self) -> u16 {
        self.qd_count
    }

    pub fn num_answers(&self) -> u16 {
        self.an_count
    }

    pub fn num_authorities(&self) -> u16 {
        self.ns_count
    }

    pub fn num_additionals(&self) -> u16 {
        self.ar_count
    }

    pub fn encode(&self, encoded: &mut Vec<u8>) {
        encoded.extend(self.id.to_be_bytes());
        encoded.extend(self.flags.to_be_bytes());
        encoded.extend(self.qd_count.to_be_bytes());
        encoded.extend(self.an_count.to_be_bytes());
        encoded.extend(self.ns_count.to_be_bytes());
        encoded.extend(self.ar_count.to_be_bytes());
    }

    pub fn decode<'a, T>(header_bytes: &mut T) -> Result<DNSHeader>
    where
        T: Iterator<Item = &'a u8>,
    {
        let parts = utils::u8_bytes_to_u16_vec(header_bytes, 6)
            .map_err(|e| map_decode_err("header", &e))?;

        Ok(DNSHeader {
            id: parts[0],
            flags: parts[1],
            qd_count: parts[2],
            an_count: parts[3],
            ns_count: parts[4],
            ar_count: parts[5],
        })
    }
}

// Query is what gets sent to a name server: a single question about a domain.
// A new one is built whenever the domain being resolved changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    domain: DomainName,
    record_type: RRType,
}

impl Query {
    pub fn new(domain: DomainName, record_type: RRType) -> Query {
        Query {
            domain,
            record_type,
        }
    }

    pub fn domain(&self) -> &DomainName {
        &self.domain
    }

    pub fn record_type(&self) -> RRType {
        self.record_type
    }

    // Encodes the query with the given message id. No flags are set, so name
    // servers are not asked to recurse on our behalf.
    pub fn encode(&self, id: u16) -> Result<Vec<u8>> {
        let header = DNSHeader::new(id, 0, 1, 0, 0, 0);
        let question = DNSQuestion::new(self.domain.clone(), self.record_type, CLASS_IN);
        let mut query: Vec<u8> = vec![];
        header.encode(&mut query);
        question.encode(&mut query)?;
        Ok(query)
    }
}

pub(crate) fn class_name(class: u16) -> String {
    if class == CLASS_IN {
        String::from("IN")
    } else {
        format!("CLASS{}", class)
    }
}
