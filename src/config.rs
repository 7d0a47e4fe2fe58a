use std::time::Duration;

use strum_macros::{AsRefStr, Display};

use crate::error::{DNSResolverError, Result};
use crate::roots::RootServerList;

pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_MAX_REFERRALS: usize = 32;
pub const DEFAULT_MAX_REDIRECTIONS: usize = 16;

// Whether the resolver reports each step it takes. Passed in with the
// configuration; never read from global state.
#[derive(Debug, Display, AsRefStr, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    #[default]
    Quiet,
    Verbose,
}

impl Verbosity {
    pub fn from_flag(verbose: bool) -> Verbosity {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Quiet
        }
    }

    pub fn is_verbose(&self) -> bool {
        *self == Verbosity::Verbose
    }
}

// Settings for a Resolver. There is no deadline on a whole resolution.
// Every query is bounded by query_timeout and everything else is sequential,
// so the worst case is the sum of all query timeouts over every root attempt.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub root_servers: RootServerList,
    // Bound on a single query, from send until a matching response arrives.
    pub query_timeout: Duration,
    // Referrals one walk may follow before giving up on the root attempt.
    pub max_referrals: usize,
    // CNAME and authority restarts allowed within one root attempt.
    pub max_redirections: usize,
    pub verbosity: Verbosity,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            root_servers: RootServerList::default(),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            max_referrals: DEFAULT_MAX_REFERRALS,
            max_redirections: DEFAULT_MAX_REDIRECTIONS,
            verbosity: Verbosity::Quiet,
        }
    }
}

impl ResolverConfig {
    pub fn with_root_servers(mut self, root_servers: RootServerList) -> ResolverConfig {
        self.root_servers = root_servers;
        self
    }

    pub fn with_query_timeout(mut self, query_timeout: Duration) -> ResolverConfig {
        self.query_timeout = query_timeout;
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> ResolverConfig {
        self.verbosity = verbosity;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.query_timeout.is_zero() {
            return Err(DNSResolverError::InvalidConfig(String::from(
                "query timeout must be greater than zero",
            )));
        }
        if self.root_servers.is_empty() {
            return Err(DNSResolverError::InvalidConfig(String::from(
                "at least one root server is required",
            )));
        }
        Ok(())
    }

    // Upper bound on how long `resolve` can block.
    //
    // A root attempt runs at most one walk for the starting domain plus two
    // per redirection (the restart and, for an authority, the walk that
    // follows once its address is known). Each walk sends at most
    // `max_referrals + 1` queries.
    pub fn worst_case_latency(&self) -> Duration {
        let walks = 1 + 2 * self.max_redirections;
        let queries = walks * (self.max_referrals + 1) * self.root_servers.len();
        self.query_timeout
            .saturating_mul(u32::try_from(queries).unwrap_or(u32::MAX))
    }
}
