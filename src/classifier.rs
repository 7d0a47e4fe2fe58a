
use std::net::Ipv4Addr;

use crate::domain_name::DomainName;
use crate::message::DNSMessage;
use crate::rr_types::ResponseCode;

// What a response means for the resolution, as seen by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    // The answer section holds an address; the response is the answer.
    Final(DNSMessage),
    // The queried name is an alias for this name.
    Cname(DomainName),
    // The zone is served by this name server, whose address is unknown.
    Authority(DomainName),
    // The server returned this status for the named domain.
    NameDoesNotExist(DomainName),
    // Nothing usable came back. The reason is for diagnostics only.
    Error(String),
}

// The verdict on one response. A referral never leaves the delegation walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Terminal(Classification),
    // A glue address to send the same query to next.
    Referral(Ipv4Addr),
}

// classify decides what the resolver does next with one decoded response.
pub fn classify(response: DNSMessage) -> Verdict {
    let rcode = response.response_code();
    if rcode != ResponseCode::NoError {
        if rcode == ResponseCode::NXDomain {
            let name = response
                .questions()
                .first()
                .map(|question| question.name().clone())
                .unwrap_or_else(|| DomainName::new(""));
            return Verdict::Terminal(Classification::NameDoesNotExist(name));
        }
        return Verdict::Terminal(Classification::Error(format!(
            "response returned with faulty rcode {}",
            rcode
        )));
    }

    if let Some(first) = response.answers().first() {
        if first.is_address() {
            return Verdict::Terminal(Classification::Final(response));
        }
        // Anything other than an address in the answer is an alias to follow.
        return match first.target() {
            Some(target) => Verdict::Terminal(Classification::Cname(target.clone())),
            None => Verdict::Terminal(Classification::Cname(DomainName::new(first.value()))),
        };
    }

    if let Some(ns_ip) = response.ns_ip() {
        return Verdict::Referral(ns_ip);
    }

    if let Some(nameserver) = response.nameserver() {
        return Verdict::Terminal(Classification::Authority(nameserver.clone()));
    }

    Verdict::Terminal(Classification::Error(String::from(
        "response has no answer, no usable glue and no authority",
    )))
}
