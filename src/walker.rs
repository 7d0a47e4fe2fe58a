use std::net::Ipv4Addr;

use crate::classifier::{classify, Classification, Verdict};
use crate::config::ResolverConfig;
use crate::query::Query;
use crate::transport::Transport;

// DelegationWalker follows referrals for one query until a server gives a
// response that needs the resolver's attention: an answer, an alias, an
// authority without glue, a missing name or an error.
pub struct DelegationWalker<'r, T: ?Sized> {
    transport: &'r T,
    config: &'r ResolverConfig,
}

impl<'r, T: Transport + ?Sized> DelegationWalker<'r, T> {
    pub fn new(transport: &'r T, config: &'r ResolverConfig) -> DelegationWalker<'r, T> {
        DelegationWalker { transport, config }
    }

    // Sends query to server, then to whichever server each referral names.
    // A failed query ends the walk with an error rather than being retried.
    pub async fn walk(&self, query: &Query, server: Ipv4Addr) -> Classification {
        let mut nameserver = server;
        let mut referrals = 0;

        loop {
            verbose!(
                self.config.verbosity,
                "Sending DNS query for {} to DNS server at {}",
                query.domain(),
                nameserver
            );
            let response = match self
                .transport
                .send(query, nameserver, self.config.query_timeout)
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    verbose!(self.config.verbosity, "DNS query failed: {}", e);
                    return Classification::Error(e.to_string());
                }
            };

            match classify(response) {
                Verdict::Referral(ns_ip) => {
                    referrals += 1;
                    if referrals > self.config.max_referrals {
                        return Classification::Error(format!(
                            "gave up on {} after {} referrals",
                            query.domain(),
                            self.config.max_referrals
                        ));
                    }
                    verbose!(
                        self.config.verbosity,
                        "Name server at address {} found in response",
                        ns_ip
                    );
                    nameserver = ns_ip;
                }
                Verdict::Terminal(classification) => return classification,
            }
        }
    }
}
