use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::UdpSocket;
use tokio::time::timeout;

use crate::error::{DNSResolverError, Result};
use crate::message::DNSMessage;
use crate::query::Query;

pub const DNS_PORT: u16 = 53;
const RECV_BUFFER_SIZE: usize = 4096;

// Transport delivers a query to a name server and hands back its decoded
// response. Failures of any kind, including timeouts, come back as errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        query: &Query,
        server: Ipv4Addr,
        timeout: Duration,
    ) -> Result<DNSMessage>;
}

// UdpTransport sends each query from a fresh ephemeral socket and waits for a
// response carrying the same message id.
#[derive(Debug, Clone)]
pub struct UdpTransport {
    port: u16,
}

impl UdpTransport {
    pub fn new() -> UdpTransport {
        UdpTransport { port: DNS_PORT }
    }

    // Talks to name servers on a port other than 53.
    pub fn with_port(port: u16) -> UdpTransport {
        UdpTransport { port }
    }

    async fn exchange(&self, socket: &UdpSocket, server: &str, id: u16) -> Result<DNSMessage> {
        let mut buf = [0; RECV_BUFFER_SIZE];
        loop {
            let no = socket
                .recv(&mut buf)
                .await
                .map_err(|e| DNSResolverError::IOFailure(String::from("receive"), e.to_string()))?;

            // Stray datagrams are dropped; the timeout bounds the wait.
            let response = match DNSMessage::decode(&buf[..no]) {
                Ok(response) => response,
                Err(e) => {
                    tracing::debug!("dropping undecodable datagram from {}: {}", server, e);
                    continue;
                }
            };
            if response.id() == id && response.header().is_response() {
                return Ok(response);
            }
            tracing::debug!(
                "dropping response from {} with id {}, expected {}",
                server,
                response.id(),
                id
            );
        }
    }
}

impl Default for UdpTransport {
    fn default() -> Self {
        UdpTransport::new()
    }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn send(
        &self,
        query: &Query,
        server: Ipv4Addr,
        query_timeout: Duration,
    ) -> Result<DNSMessage> {
        let nameserver = SocketAddr::from((server, self.port));
        let nameserver_str = nameserver.to_string();
        let local = SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0));
        let socket = UdpSocket::bind(local).await.map_err(|e| {
            DNSResolverError::ConnectionFailure(local.to_string(), e.to_string())
        })?;
        socket.connect(nameserver).await.map_err(|e| {
            DNSResolverError::ConnectionFailure(nameserver_str.clone(), e.to_string())
        })?;

        let id = fastrand::u16(..);
        let q = query.encode(id)?;
        socket
            .send(&q)
            .await
            .map_err(|e| DNSResolverError::IOFailure(String::from("send"), e.to_string()))?;

        let received = timeout(query_timeout, self.exchange(&socket, &nameserver_str, id)).await;
        match received {
            Ok(response) => response,
            Err(_) => Err(DNSResolverError::Timeout(
                nameserver_str,
                query_timeout.as_millis(),
            )),
        }
    }
}
