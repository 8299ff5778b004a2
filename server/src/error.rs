#[derive(Debug)]
/// Error type for a peer that can no longer be talked to.
///
/// Any of these ends the session.
pub enum PeerDisconnected {
    /// The peer closed its side of the connection.
    EndOfStream,
    /// The peer stayed silent for longer than the configured read timeout.
    TimedOut,
    Io(std::io::Error),
}

impl From<std::io::Error> for PeerDisconnected {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut => {
                PeerDisconnected::TimedOut
            }
            std::io::ErrorKind::UnexpectedEof => PeerDisconnected::EndOfStream,
            _ => PeerDisconnected::Io(err),
        }
    }
}

impl std::error::Error for PeerDisconnected {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PeerDisconnected::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for PeerDisconnected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeerDisconnected::EndOfStream => write!(f, "The peer closed the connection"),
            PeerDisconnected::TimedOut => write!(f, "The peer did not send anything in time"),
            PeerDisconnected::Io(_) => write!(f, "Communication with the peer failed"),
        }
    }
}
