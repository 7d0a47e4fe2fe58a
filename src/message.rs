use std::net::Ipv4Addr;

use crate::domain_name::DomainName;
use crate::error::{map_encode_err, Result};
use crate::resource_record::AddressFamily;
use crate::rr_types::{RRType, ResponseCode, CLASS_IN};
use crate::{
    query::{DNSHeader, DNSQuestion},
    resource_record::DNSRecord,
};

// DNSMessage represents a DNS message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DNSMessage {
    header: DNSHeader,
    questions: Vec<DNSQuestion>,
    answers: Vec<DNSRecord>,
    authorities: Vec<DNSRecord>,
    additionals: Vec<DNSRecord>,
}

impl DNSMessage {
    pub fn new(
        header: DNSHeader,
        questions: Vec<DNSQuestion>,
        answers: Vec<DNSRecord>,
        authorities: Vec<DNSRecord>,
        additionals: Vec<DNSRecord>,
    ) -> DNSMessage {
        DNSMessage {
            header,
            questions,
            answers,
            authorities,
            additionals,
        }
    }

    // An empty response to an A question about domain. Sections are filled in
    // with the with_* methods.
    pub fn response(domain: &str, rcode: ResponseCode) -> DNSMessage {
        let question = DNSQuestion::new(DomainName::new(domain), RRType::A, CLASS_IN);
        DNSMessage::new(
            DNSHeader::response(0, rcode, [1, 0, 0, 0]),
            vec![question],
            vec![],
            vec![],
            vec![],
        )
    }

    pub fn with_answers(mut self, answers: Vec<DNSRecord>) -> DNSMessage {
        self.answers = answers;
        self.sync_counts();
        self
    }

    pub fn with_authorities(mut self, authorities: Vec<DNSRecord>) -> DNSMessage {
        self.authorities = authorities;
        self.sync_counts();
        self
    }

    pub fn with_additionals(mut self, additionals: Vec<DNSRecord>) -> DNSMessage {
        self.additionals = additionals;
        self.sync_counts();
        self
    }

    fn sync_counts(&mut self) {
        let count = |len: usize| u16::try_from(len).unwrap_or(u16::MAX);
        self.header = self.header.with_counts([
            count(self.questions.len()),
            count(self.answers.len()),
            count(self.authorities.len()),
            count(self.additionals.len()),
        ]);
    }

    // Decode the message from its wire format into our representation.
    pub fn decode(message: &[u8]) -> Result<DNSMessage> {
        let mut message_iter = message.iter();
        let mut questions = vec![];
        let mut answers = vec![];
        let mut authorities = vec![];
        let mut additionals = vec![];

        let header = DNSHeader::decode(&mut message_iter)?;
        for _ in 0..header.num_questions() {
            let question = DNSQuestion::decode(&mut message_iter, message)?;
            questions.push(question);
        }
        for _ in 0..header.num_answers() {
            let answer = DNSRecord::decode(&mut message_iter, message)?;
            answers.push(answer);
        }
        for _ in 0..header.num_authorities() {
            let rr = DNSRecord::decode(&mut message_iter, message)?;
            authorities.push(rr);
        }
        for _ in 0..header.num_additionals() {
            let rr = DNSRecord::decode(&mut message_iter, message)?;
            additionals.push(rr);
        }

        Ok(DNSMessage {
            header,
            questions,
            answers,
            authorities,
            additionals,
        })
    }

    // Encode the message into the wire format. Section counts in the header
    // are taken from the sections themselves.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let count = |len: usize| u16::try_from(len).map_err(|e| map_encode_err("header", &e));
        let header = self.header.with_counts([
            count(self.questions.len())?,
            count(self.answers.len())?,
            count(self.authorities.len())?,
            count(self.additionals.len())?,
        ]);

        let mut encoded = vec![];
        header.encode(&mut encoded);
        for question in &self.questions {
            question.encode(&mut encoded)?;
        }
        for answer in &self.answers {
            answer.encode(&mut encoded)?;
        }
        for authority in &self.authorities {
            authority.encode(&mut encoded)?;
        }
        for additional in &self.additionals {
            additional.encode(&mut encoded)?;
        }
        Ok(encoded)
    }

    pub fn id(&self) -> u16 {
        self.header.id()
    }

    pub fn set_id(&mut self, id: u16) {
        self.header.set_id(id);
    }

    pub fn header(&self) -> &DNSHeader {
        &self.header
    }

    pub fn response_code(&self) -> ResponseCode {
        self.header.response_code()
    }

    pub fn questions(&self) -> &[DNSQuestion] {
        &self.questions
    }

    pub fn answers(&self) -> &[DNSRecord] {
        &self.answers
    }

    pub fn authorities(&self) -> &[DNSRecord] {
        &self.authorities
    }

    pub fn additionals(&self) -> &[DNSRecord] {
        &self.additionals
    }

    // Returns the first IPv4 address in the additionals section.
    pub fn ns_ip(&self) -> Option<Ipv4Addr> {
        self.additionals
            .iter()
            .filter(|additional| additional.address_family() == Some(AddressFamily::V4))
            .find_map(|additional| additional.ipv4())
    }

    // Returns the data of the first NS record in the authorities section.
    pub fn nameserver(&self) -> Option<&DomainName> {
        self.authorities
            .iter()
            .filter(|ns| ns.record_type() == Some(RRType::NS))
            .find_map(|ns| ns.target())
    }
}
