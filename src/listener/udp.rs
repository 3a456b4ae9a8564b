use super::{LinePipeline, ListenerError, is_transient};
use crate::domain::{RawLine, Transport};
use crate::sender::QuarantineApi;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Largest datagram read in one piece; longer datagrams are truncated.
pub const DEFAULT_MAX_DATAGRAM_SIZE: usize = 8192;

/// Datagram listener. Each datagram is one line; there is no per-peer state.
#[derive(Debug)]
pub struct UdpSyslogListener {
    socket: UdpSocket,
    local_addr: SocketAddr,
    max_datagram_size: usize,
}

impl UdpSyslogListener {
    pub async fn bind(addr: SocketAddr, max_datagram_size: usize) -> Result<Self, ListenerError> {
        let bind_error = |source| ListenerError::Bind {
            transport: Transport::Udp,
            address: addr.to_string(),
            source,
        };

        let socket = UdpSocket::bind(addr).await.map_err(bind_error)?;
        let local_addr = socket.local_addr().map_err(bind_error)?;

        Ok(Self {
            socket,
            local_addr,
            max_datagram_size: max_datagram_size.max(1),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Receive until cancelled. Each datagram is fully processed before the
    /// next one is awaited.
    pub async fn run<C: QuarantineApi>(
        self,
        pipeline: Arc<LinePipeline<C>>,
        cancel: CancellationToken,
    ) -> Result<(), ListenerError> {
        info!("[syslog] UDP server on {}", self.local_addr);

        let mut buf = vec![0u8; self.max_datagram_size];

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                received = self.socket.recv_from(&mut buf) => {
                    match received {
                        Ok((len, peer)) => {
                            let line = RawLine::decode(&buf[..len], Transport::Udp, peer);
                            pipeline.process(line).await;
                        }
                        Err(e) if is_transient(&e) => {
                            warn!(error = %e, "UDP receive error");
                        }
                        Err(source) => {
                            return Err(ListenerError::Io {
                                transport: Transport::Udp,
                                source,
                            });
                        }
                    }
                }
            }
        }

        info!("[syslog] UDP server on {} stopped", self.local_addr);
        Ok(())
    }
}
