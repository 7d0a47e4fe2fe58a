#![allow(dead_code)]

use async_trait::async_trait;
use dns_walker::domain_name::DomainName;
use dns_walker::error::{DNSResolverError, Result};
use dns_walker::message::DNSMessage;
use dns_walker::query::Query;
use dns_walker::resource_record::DNSRecord;
use dns_walker::roots::RootServerList;
use dns_walker::rr_types::ResponseCode;
use dns_walker::{ResolverConfig, Transport, Verbosity};
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::Mutex;
use std::time::Duration;

pub const ROOT_1: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 1);
pub const ROOT_2: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 2);
pub const ROOT_3: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 3);

pub enum Reply {
    Respond(DNSMessage),
    Timeout,
}

// A transport that answers from a script keyed by server and domain, and
// remembers every query it was asked to send. A reply scripted without a
// domain applies to every domain sent to that server.
pub struct ScriptedTransport {
    replies: HashMap<(Ipv4Addr, Option<DomainName>), Reply>,
    sent: Mutex<Vec<(Ipv4Addr, String)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            replies: HashMap::new(),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(mut self, server: Ipv4Addr, domain: &str, response: DNSMessage) -> Self {
        self.replies.insert(
            (server, Some(DomainName::new(domain))),
            Reply::Respond(response),
        );
        self
    }

    pub fn time_out(mut self, server: Ipv4Addr, domain: &str) -> Self {
        self.replies
            .insert((server, Some(DomainName::new(domain))), Reply::Timeout);
        self
    }

    pub fn time_out_everything(mut self, server: Ipv4Addr) -> Self {
        self.replies.insert((server, None), Reply::Timeout);
        self
    }

    pub fn sent(&self) -> Vec<(Ipv4Addr, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, server: Ipv4Addr) -> usize {
        self.sent().iter().filter(|(s, _)| *s == server).count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(
        &self,
        query: &Query,
        server: Ipv4Addr,
        timeout: Duration,
    ) -> Result<DNSMessage> {
        self.sent
            .lock()
            .unwrap()
            .push((server, query.domain().0.clone()));

        let reply = self
            .replies
            .get(&(server, Some(query.domain().clone())))
            .or_else(|| self.replies.get(&(server, None)));
        match reply {
            Some(Reply::Respond(response)) => Ok(response.clone()),
            Some(Reply::Timeout) => Err(DNSResolverError::Timeout(
                server.to_string(),
                timeout.as_millis(),
            )),
            None => Err(DNSResolverError::ConnectionFailure(
                server.to_string(),
                format!("nothing scripted for {}", query.domain()),
            )),
        }
    }
}

pub fn config(roots: &[Ipv4Addr], verbosity: Verbosity) -> ResolverConfig {
    ResolverConfig::default()
        .with_root_servers(RootServerList::new(roots.to_vec()).unwrap())
        .with_query_timeout(Duration::from_millis(100))
        .with_verbosity(verbosity)
}

pub fn answer(domain: &str, addr: Ipv4Addr) -> DNSMessage {
    DNSMessage::response(domain, ResponseCode::NoError)
        .with_answers(vec![DNSRecord::a(domain, 300, addr)])
}

pub fn cname(domain: &str, target: &str) -> DNSMessage {
    DNSMessage::response(domain, ResponseCode::NoError)
        .with_answers(vec![DNSRecord::cname(domain, 300, target)])
}

pub fn referral(domain: &str, zone: &str, nameserver: &str, glue: Ipv4Addr) -> DNSMessage {
    DNSMessage::response(domain, ResponseCode::NoError)
        .with_authorities(vec![DNSRecord::ns(zone, 172800, nameserver)])
        .with_additionals(vec![DNSRecord::a(nameserver, 172800, glue)])
}

pub fn authority(domain: &str, zone: &str, nameserver: &str) -> DNSMessage {
    DNSMessage::response(domain, ResponseCode::NoError)
        .with_authorities(vec![DNSRecord::ns(zone, 172800, nameserver)])
}

pub fn nxdomain(domain: &str) -> DNSMessage {
    DNSMessage::response(domain, ResponseCode::NXDomain)
}

pub fn servfail(domain: &str) -> DNSMessage {
    DNSMessage::response(domain, ResponseCode::ServFail)
}

pub fn sent(pairs: &[(Ipv4Addr, &str)]) -> Vec<(Ipv4Addr, String)> {
    pairs
        .iter()
        .map(|(server, domain)| (*server, domain.to_string()))
        .collect()
}
