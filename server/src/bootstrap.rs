use std::net::{TcpListener, TcpStream};
use std::time::Duration;

use gomoku::{Player, ServerMessage};
use tracing::{info, warn};

use crate::connection::Connection;
use crate::recording::Recorder;

pub type TcpConnection = Connection<TcpStream, TcpStream>;

const RETRY_DELAY: Duration = Duration::from_millis(100);

/// Accepts the next two connections: the first plays black, the second white.
///
/// Each peer is told its side with a `PLAYER` message right after it connects.
pub fn accept_peers(
    listener: &TcpListener,
    read_timeout: Option<Duration>,
    recorder: &mut Option<Recorder>,
) -> anyhow::Result<[TcpConnection; 2]> {
    let black = accept_peer(listener, Player::Black, read_timeout, recorder)?;
    let white = accept_peer(listener, Player::White, read_timeout, recorder)?;
    Ok([black, white])
}

/// Keeps calling [`accept_peers`] until a pair is set up.
///
/// A peer that fails during setup only costs its pair: both connections are
/// dropped and the next two peers get their chance.
pub fn accept_peers_until_paired(
    listener: &TcpListener,
    read_timeout: Option<Duration>,
    recorder: &mut Option<Recorder>,
) -> [TcpConnection; 2] {
    loop {
        match accept_peers(listener, read_timeout, recorder) {
            Ok(peers) => return peers,
            Err(err) => {
                warn!(%err, "Could not set up peers, accepting a new pair");
                if let Some(recorder) = recorder {
                    recorder.discard_messages();
                }
                std::thread::sleep(RETRY_DELAY);
            }
        }
    }
}

fn accept_peer(
    listener: &TcpListener,
    player: Player,
    read_timeout: Option<Duration>,
    recorder: &mut Option<Recorder>,
) -> anyhow::Result<TcpConnection> {
    let (stream, addr) = listener.accept()?;
    stream.set_read_timeout(read_timeout)?;
    stream.set_nodelay(true)?;
    let mut conn = Connection::new(player, stream.try_clone()?, stream);
    conn.send(recorder, &ServerMessage::Player(player))?;
    info!(%player, %addr, "Peer connected");
    Ok(conn)
}
