use std::io::{Read, Write};

use gomoku::{Command, Decoder, MalformedCommand, Player, ServerMessage};
use tracing::trace;

use crate::error::PeerDisconnected;
use crate::recording::{Direction, Recorder};

const READ_BUFFER_SIZE: usize = 256;

/// One of the two peers of a session.
///
/// Generic over the read and write halves so that sessions can run on
/// sockets as well as on in-memory buffers.
pub struct Connection<R, W> {
    pub player: Player,
    reader: R,
    writer: W,
    decoder: Decoder,
    // A re-usable buffer for reads. Whatever is read goes straight into the decoder.
    buf: [u8; READ_BUFFER_SIZE],
}

impl<R: Read, W: Write> Connection<R, W> {
    pub fn new(player: Player, reader: R, writer: W) -> Self {
        Self {
            player,
            reader,
            writer,
            decoder: Decoder::new(),
            buf: [0; READ_BUFFER_SIZE],
        }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn send(
        &mut self,
        recorder: &mut Option<Recorder>,
        msg: &ServerMessage,
    ) -> Result<(), PeerDisconnected> {
        let line = msg.encode();
        trace!(name: "Sending message", player = %self.player, message = %line.trim_end());
        if let Some(recorder) = recorder {
            recorder.store_message(self.player, Direction::Sent, line.trim_end());
        }
        self.writer.write_all(line.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    /// Blocks until the peer has sent a complete, non-blank line, and parses it.
    ///
    /// Every line is recorded as it arrived, blank ones included. The outer
    /// error means the peer is gone; the inner one that the line was not a
    /// command.
    pub fn read_command(
        &mut self,
        recorder: &mut Option<Recorder>,
    ) -> Result<Result<Command, MalformedCommand>, PeerDisconnected> {
        loop {
            while let Some(line) = self.decoder.next_line() {
                trace!(name: "Received line", player = %self.player, line = %line);
                if let Some(recorder) = recorder {
                    recorder.store_message(self.player, Direction::Received, &line);
                }
                if let Some(command) = Command::decode_line(&line) {
                    return Ok(command);
                }
            }
            self.fill()?;
        }
    }

    /// Blocks until the peer has sent its one-byte vote.
    pub fn read_vote(&mut self, recorder: &mut Option<Recorder>) -> Result<u8, PeerDisconnected> {
        loop {
            if let Some(vote) = self.decoder.next_vote() {
                let text = String::from_utf8_lossy(&[vote]).into_owned();
                trace!(name: "Received vote", player = %self.player, vote = %text);
                if let Some(recorder) = recorder {
                    recorder.store_message(self.player, Direction::Received, &text);
                }
                return Ok(vote);
            }
            self.fill()?;
        }
    }

    // One read from the peer into the decoder.
    fn fill(&mut self) -> Result<(), PeerDisconnected> {
        loop {
            match self.reader.read(&mut self.buf) {
                Ok(0) => return Err(PeerDisconnected::EndOfStream),
                Ok(n) => {
                    self.decoder.feed(&self.buf[..n]);
                    return Ok(());
                }
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }
}
