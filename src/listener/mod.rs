//! Syslog ingress over UDP and TCP.
//!
//! Both listeners decode each message into a [`RawLine`](crate::domain::RawLine)
//! and hand it to the same [`LinePipeline`], which records it in the shared
//! history buffer and runs extraction and dispatch before the listener reads
//! the next line from that source.

pub mod pipeline;
pub mod tcp;
pub mod udp;

pub use pipeline::LinePipeline;
pub use tcp::TcpSyslogListener;
pub use udp::{DEFAULT_MAX_DATAGRAM_SIZE, UdpSyslogListener};

use crate::domain::Transport;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListenerError {
    #[error("failed to bind {transport} listener to {address}: {source}")]
    Bind {
        transport: Transport,
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{transport} listener I/O error: {source}")]
    Io {
        transport: Transport,
        #[source]
        source: std::io::Error,
    },
}

/// Errors a socket can report without the socket itself being unusable.
pub(crate) fn is_transient(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::Interrupted
            | std::io::ErrorKind::WouldBlock
    )
}
