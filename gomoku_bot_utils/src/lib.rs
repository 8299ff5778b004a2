use std::io::{BufRead, Write};

use gomoku::{find_winner, Board, Command, Phase, Player, Scores, ServerMessage, Vote};
use tracing::{debug, trace};

/// A trait to simplify writing bots.
pub trait Bot {
    fn new_match(&mut self, player: Player);
    /// Pick an empty cell for a new stone.
    fn place(&mut self, board: &Board, player: Player) -> (i32, i32);
    /// Pick one of `player`'s stones and an empty cell to move it to.
    fn relocate(&mut self, board: &Board, player: Player) -> ((i32, i32), (i32, i32));
    /// Whether to play another match.
    fn vote(&mut self, scores: Scores, winner: Player) -> bool;

    /// Plays a whole session against the server.
    ///
    /// Returns the final scores, or `None` if the server closed the connection
    /// without sending `END`.
    fn run(
        &mut self,
        mut reader: impl BufRead,
        mut writer: impl Write,
    ) -> anyhow::Result<Option<Scores>> {
        let mut me = None;
        // Set after voting: an empty board then means the rematch started.
        let mut voted = false;
        let mut buf = String::new();

        loop {
            buf.clear(); // because read_line() appends to the buffer
            let num_bytes_read = reader.read_line(&mut buf)?;
            if num_bytes_read == 0 {
                // 0 bytes read means EOF - the server has gone away.
                break Ok(None);
            }
            let line = buf.trim_end();
            if line.is_empty() {
                continue;
            }
            trace!(name: "Received message", message = %line);

            match ServerMessage::decode(line)? {
                ServerMessage::Player(player) => {
                    debug!(%player, "Assigned side");
                    me = Some(player);
                    self.new_match(player);
                }
                ServerMessage::Board(snapshot) => {
                    let Some(player) = me else {
                        anyhow::bail!("Received a board before being told which side to play");
                    };
                    if voted && snapshot.board == Board::new() {
                        voted = false;
                        debug!("Rematch");
                        self.new_match(player);
                    }
                    // A winning board is followed by a vote request, not a move.
                    if snapshot.current_player != player || find_winner(&snapshot.board).is_some() {
                        continue;
                    }
                    let command = match snapshot.phase {
                        Phase::Placing => {
                            let (row, col) = self.place(&snapshot.board, player);
                            Command::Place { row, col }
                        }
                        Phase::Relocating => {
                            let ((from_row, from_col), (to_row, to_col)) =
                                self.relocate(&snapshot.board, player);
                            Command::Relocate {
                                from_row,
                                from_col,
                                to_row,
                                to_col,
                            }
                        }
                    };
                    trace!(name: "Sending command", command = %command);
                    writeln!(writer, "{}", command)?;
                }
                ServerMessage::Vote { scores, winner } => {
                    let vote = Vote::from_accept(self.vote(scores, winner));
                    voted = true;
                    debug!(?vote, "Voting");
                    writer.write_all(&[vote.byte()])?;
                }
                ServerMessage::End { scores } => break Ok(Some(scores)),
            }
            writer.flush()?;
        }
    }
}
