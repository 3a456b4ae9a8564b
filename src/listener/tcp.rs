use super::{LinePipeline, ListenerError, is_transient};
use crate::domain::{RawLine, Transport};
use crate::sender::QuarantineApi;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Stream listener for newline-delimited syslog.
///
/// Every accepted connection gets its own task; connections are not limited
/// in number or lifetime, and lines are not limited in length.
#[derive(Debug)]
pub struct TcpSyslogListener {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl TcpSyslogListener {
    pub async fn bind(addr: SocketAddr) -> Result<Self, ListenerError> {
        let bind_error = |source| ListenerError::Bind {
            transport: Transport::Tcp,
            address: addr.to_string(),
            source,
        };

        let listener = TcpListener::bind(addr).await.map_err(bind_error)?;
        let local_addr = listener.local_addr().map_err(bind_error)?;

        Ok(Self {
            listener,
            local_addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accept connections until cancelled.
    pub async fn run<C: QuarantineApi + 'static>(
        self,
        pipeline: Arc<LinePipeline<C>>,
        cancel: CancellationToken,
    ) -> Result<(), ListenerError> {
        info!("[syslog] TCP server on {}", self.local_addr);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            debug!(peer = %peer, "syslog connection opened");
                            let pipeline = Arc::clone(&pipeline);
                            let cancel = cancel.clone();
                            tokio::spawn(async move {
                                read_lines(stream, peer, pipeline, cancel).await;
                            });
                        }
                        // Accept failures (e.g. fd exhaustion) affect one
                        // connection, not the listening socket.
                        Err(e) => warn!(error = %e, "syslog TCP accept error"),
                    }
                }
            }
        }

        info!("[syslog] TCP server on {} stopped", self.local_addr);
        Ok(())
    }
}

/// Read newline-terminated lines from one connection until end of stream.
pub async fn read_lines<R, C>(
    stream: R,
    peer: SocketAddr,
    pipeline: Arc<LinePipeline<C>>,
    cancel: CancellationToken,
) where
    R: AsyncRead + Unpin,
    C: QuarantineApi,
{
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        tokio::select! {
            _ = cancel.cancelled() => break,
            read = reader.read_until(b'\n', &mut buf) => {
                match read {
                    Ok(0) => break,
                    Ok(_) => {
                        let line = RawLine::decode(&buf, Transport::Tcp, peer);
                        pipeline.process(line).await;
                    }
                    Err(e) => {
                        if !is_transient(&e) {
                            warn!(peer = %peer, error = %e, "syslog connection error");
                        }
                        break;
                    }
                }
            }
        }
    }

    debug!(peer = %peer, "syslog connection closed");
}
