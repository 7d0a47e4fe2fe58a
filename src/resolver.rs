use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

use crate::classifier::Classification;
use crate::config::ResolverConfig;
use crate::domain_name::DomainName;
use crate::error::DNSResolverError;
use crate::message::DNSMessage;
use crate::query::Query;
use crate::resource_record::DNSRecord;
use crate::rr_types::RRType;
use crate::transport::Transport;
use crate::walker::DelegationWalker;

// What a Final response means depends on what is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionMode {
    // The domain is the one the caller asked about, or an alias of it.
    ResolvingTarget,
    // The domain is a name server whose address is needed to continue.
    ResolvingAuthorityName,
}

// Domains waiting for the address of the authority server they were
// delegated to. One entry per level of nested delegation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingDomains(Vec<DomainName>);

impl PendingDomains {
    pub fn push(&mut self, domain: DomainName) {
        self.0.push(domain);
    }

    pub fn pop(&mut self) -> Option<DomainName> {
        self.0.pop()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ResolutionState is the domain currently being resolved together with the
// stack of domains waiting on it. The mode is derived from the stack, so an
// empty stack always means the target itself is being resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionState {
    domain: DomainName,
    pending: PendingDomains,
}

impl ResolutionState {
    pub fn new(domain: DomainName) -> ResolutionState {
        ResolutionState {
            domain,
            pending: PendingDomains::default(),
        }
    }

    pub fn domain(&self) -> &DomainName {
        &self.domain
    }

    pub fn pending(&self) -> &PendingDomains {
        &self.pending
    }

    pub fn mode(&self) -> ResolutionMode {
        if self.pending.is_empty() {
            ResolutionMode::ResolvingTarget
        } else {
            ResolutionMode::ResolvingAuthorityName
        }
    }

    pub fn query(&self) -> Query {
        Query::new(self.domain.clone(), RRType::A)
    }

    // The current domain is an alias; resolve its target instead. The stack
    // is untouched, so an aliased name server stays a name server.
    pub fn follow_alias(&mut self, target: DomainName) {
        self.domain = target;
    }

    // The current domain is served by nameserver; park it and resolve the
    // name server first.
    pub fn defer_to_authority(&mut self, nameserver: DomainName) {
        let waiting = std::mem::replace(&mut self.domain, nameserver);
        self.pending.push(waiting);
    }

    // The name server being resolved now has an address; go back to the
    // domain that was waiting on it. Returns false if nothing was waiting.
    pub fn resume_pending(&mut self) -> bool {
        match self.pending.pop() {
            Some(domain) => {
                self.domain = domain;
                true
            }
            None => false,
        }
    }
}

// A successful resolution.
#[derive(Debug, Clone)]
pub struct Resolution {
    // The final response; its answer section is the result.
    pub response: DNSMessage,
    pub elapsed: Duration,
    // Local time at which the resolution started.
    pub timestamp: DateTime<Local>,
}

impl Resolution {
    pub fn answers(&self) -> &[DNSRecord] {
        self.response.answers()
    }
}

#[derive(Debug)]
pub enum Outcome {
    Success(Resolution),
    // Some server reported this domain does not exist.
    NameDoesNotExist(DomainName),
    // Every root server was tried without an answer.
    Failure(DNSResolverError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}

// Resolver is an iterative DNS resolver. It walks the delegation chain from
// each root server in turn until one of them leads to an address.
pub struct Resolver<T> {
    transport: T,
    config: ResolverConfig,
}

impl<T: Transport> Resolver<T> {
    pub fn new(transport: T, config: ResolverConfig) -> Resolver<T> {
        Resolver { transport, config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // Resolves domain to its A records.
    pub async fn resolve(&self, domain: &str) -> Outcome {
        let start = Instant::now();
        let timestamp = Local::now();
        let original = DomainName::new(domain);
        let walker = DelegationWalker::new(&self.transport, &self.config);
        let mut state = ResolutionState::new(original.clone());

        for root_server in self.config.root_servers.iter() {
            // start at the root
            let mut server = root_server;
            let mut redirections = 0;

            loop {
                let query = state.query();
                match walker.walk(&query, server).await {
                    Classification::Error(reason) => {
                        verbose!(
                            self.config.verbosity,
                            "Resolution failed ({}), retrying at new server",
                            reason
                        );
                        break;
                    }
                    Classification::NameDoesNotExist(name) => {
                        return Outcome::NameDoesNotExist(name);
                    }
                    Classification::Final(response) => match state.mode() {
                        ResolutionMode::ResolvingTarget => {
                            verbose!(self.config.verbosity, "Query response contains answer!");
                            return Outcome::Success(Resolution {
                                response,
                                elapsed: start.elapsed(),
                                timestamp,
                            });
                        }
                        ResolutionMode::ResolvingAuthorityName => {
                            let address = match response.answers().first().and_then(|a| a.ipv4()) {
                                Some(address) => address,
                                None => {
                                    verbose!(
                                        self.config.verbosity,
                                        "Auth server {} has no IPv4 address, retrying at new server",
                                        state.domain()
                                    );
                                    break;
                                }
                            };
                            verbose!(
                                self.config.verbosity,
                                "Auth server {} resolved to IP address {}",
                                state.domain(),
                                address
                            );
                            state.resume_pending();
                            server = address;
                        }
                    },
                    Classification::Cname(target) => {
                        redirections += 1;
                        if redirections > self.config.max_redirections {
                            verbose!(
                                self.config.verbosity,
                                "Too many redirections, retrying at new server"
                            );
                            break;
                        }
                        verbose!(
                            self.config.verbosity,
                            "Query resolved to CNAME {}. Beginning resolution of CNAME from root",
                            target
                        );
                        state.follow_alias(target);
                        server = root_server;
                    }
                    Classification::Authority(nameserver) => {
                        redirections += 1;
                        if redirections > self.config.max_redirections {
                            verbose!(
                                self.config.verbosity,
                                "Too many redirections, retrying at new server"
                            );
                            break;
                        }
                        verbose!(
                            self.config.verbosity,
                            "Record for {} stored in authority server {}. Beginning resolution of auth server from root",
                            state.domain(),
                            nameserver
                        );
                        state.defer_to_authority(nameserver);
                        server = root_server;
                    }
                }
            }
        }

        verbose!(
            self.config.verbosity,
            "Resolution failed at all root servers. Unable to resolve {}",
            original
        );
        Outcome::Failure(DNSResolverError::LookupFailure(
            original.0,
            self.config.root_servers.len(),
        ))
    }
}
