use std::fmt;
use std::net::SocketAddr;

/// Transport a line arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transport {
    Udp,
    Tcp,
}

impl Transport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Udp => "udp",
            Transport::Tcp => "tcp",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One inbound syslog line, decoded and stripped of trailing whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    text: String,
    transport: Transport,
    peer: String,
}

impl RawLine {
    pub fn new(text: impl Into<String>, transport: Transport, peer: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            transport,
            peer: peer.into(),
        }
    }

    /// Decode raw socket bytes.
    ///
    /// Invalid UTF-8 sequences are replaced with U+FFFD rather than rejected,
    /// and trailing whitespace (including CR/LF terminators) is removed.
    pub fn decode(bytes: &[u8], transport: Transport, peer: SocketAddr) -> Self {
        let decoded = String::from_utf8_lossy(bytes);
        Self::new(decoded.trim_end(), transport, peer.ip().to_string())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }
}
