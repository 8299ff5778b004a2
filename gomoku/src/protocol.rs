//! The line-oriented text protocol spoken between the server and its two peers.
//!
//! Server to peer, one line each:
//!
//! ```text
//! PLAYER <1|2>
//! BOARD <current player> <phase> <BOARD_SIZE * BOARD_SIZE cells, row-major> <black score> <white score>
//! VOTE <black score> <white score> <winner>
//! END <black score> <white score>
//! ```
//!
//! Peer to server:
//!
//! ```text
//! MOVE <row> <col>
//! MOVE_FROM <row> <col> MOVE_TO <row> <col>
//! ```
//!
//! and, after a `VOTE`, a single byte `y` or `n` with no terminator required.

use std::fmt::Display;
use std::str::FromStr;

use crate::{
    Board, Cell, MalformedCommand, MalformedServerMessage, Phase, Player, Scores, BOARD_SIZE,
};

/// Terminates every line of the protocol. A `\r` before it is tolerated.
pub const MESSAGE_TERMINATOR: u8 = b'\n';

/// A decoded peer command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Put a new stone on an empty cell.
    Place { row: i32, col: i32 },
    /// Move one of the mover's stones to an empty cell.
    Relocate {
        from_row: i32,
        from_col: i32,
        to_row: i32,
        to_col: i32,
    },
    /// Answer to a rematch request.
    Vote { accept: bool },
}

fn parse_int<T: FromStr>(token: &str) -> Option<T> {
    token.parse().ok()
}

impl Command {
    /// Like [`Command::decode`], but a blank line is no command at all.
    pub fn decode_line(line: &str) -> Option<Result<Self, MalformedCommand>> {
        if line.trim().is_empty() {
            None
        } else {
            Some(Self::decode(line))
        }
    }

    /// Parses one line of peer input, without its terminator.
    ///
    /// Surrounding whitespace is ignored, but the tokens must match a
    /// command exactly.
    pub fn decode(line: &str) -> Result<Self, MalformedCommand> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let command = match tokens.as_slice() {
            ["MOVE", row, col] => parse_int(row)
                .zip(parse_int(col))
                .map(|(row, col)| Command::Place { row, col }),
            ["MOVE_FROM", from_row, from_col, "MOVE_TO", to_row, to_col] => (|| {
                Some(Command::Relocate {
                    from_row: parse_int(from_row)?,
                    from_col: parse_int(from_col)?,
                    to_row: parse_int(to_row)?,
                    to_col: parse_int(to_col)?,
                })
            })(),
            ["y"] => Some(Command::Vote { accept: true }),
            ["n"] => Some(Command::Vote { accept: false }),
            _ => None,
        };
        command.ok_or_else(|| MalformedCommand {
            input: String::from(line),
        })
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Place { row, col } => write!(f, "MOVE {} {}", row, col),
            Command::Relocate {
                from_row,
                from_col,
                to_row,
                to_col,
            } => write!(
                f,
                "MOVE_FROM {} {} MOVE_TO {} {}",
                from_row, from_col, to_row, to_col
            ),
            Command::Vote { accept: true } => write!(f, "y"),
            Command::Vote { accept: false } => write!(f, "n"),
        }
    }
}

/// Everything a peer needs to draw the game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub current_player: Player,
    pub phase: Phase,
    pub board: Board,
    pub scores: Scores,
}

/// A message from the server to the peers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServerMessage {
    /// Tells a freshly connected peer which side it plays.
    Player(Player),
    /// The full state, after every accepted move.
    Board(BoardSnapshot),
    /// Asks both peers whether to play again.
    Vote { scores: Scores, winner: Player },
    /// The session is over.
    End { scores: Scores },
}

impl ServerMessage {
    /// The message as sent on the wire, terminator included.
    pub fn encode(&self) -> String {
        let mut line = self.to_string();
        line.push(MESSAGE_TERMINATOR as char);
        line
    }

    /// Parses one line sent by the server, without its terminator.
    pub fn decode(line: &str) -> Result<Self, MalformedServerMessage> {
        let malformed = || MalformedServerMessage {
            input: String::from(line),
        };
        let mut tokens = line.split_whitespace();
        let keyword = tokens.next().ok_or_else(malformed)?;
        let numbers: Vec<u32> = tokens
            .map(parse_int::<u32>)
            .collect::<Option<_>>()
            .ok_or_else(malformed)?;
        let player = |id: u32| u8::try_from(id).ok().and_then(Player::from_id);
        let message = match (keyword, numbers.as_slice()) {
            ("PLAYER", &[id]) => player(id).map(ServerMessage::Player),
            ("VOTE", &[black, white, winner]) => player(winner).map(|winner| ServerMessage::Vote {
                scores: Scores { black, white },
                winner,
            }),
            ("END", &[black, white]) => Some(ServerMessage::End {
                scores: Scores { black, white },
            }),
            ("BOARD", numbers) => Self::decode_board(numbers),
            _ => None,
        };
        message.ok_or_else(malformed)
    }

    fn decode_board(numbers: &[u32]) -> Option<Self> {
        let [current_player, phase, rest @ ..] = numbers else {
            return None;
        };
        if rest.len() != BOARD_SIZE * BOARD_SIZE + 2 {
            return None;
        }
        let (cells, scores) = rest.split_at(BOARD_SIZE * BOARD_SIZE);
        let cells: Vec<Cell> = cells
            .iter()
            .map(|&id| u8::try_from(id).ok().and_then(Cell::from_id))
            .collect::<Option<_>>()?;
        Some(ServerMessage::Board(BoardSnapshot {
            current_player: Player::from_id(u8::try_from(*current_player).ok()?)?,
            phase: Phase::from_id(u8::try_from(*phase).ok()?)?,
            board: Board::from_cells(&cells)?,
            scores: Scores {
                black: scores[0],
                white: scores[1],
            },
        }))
    }
}

impl Display for ServerMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerMessage::Player(player) => write!(f, "PLAYER {}", player.id()),
            ServerMessage::Board(snapshot) => {
                write!(
                    f,
                    "BOARD {} {}",
                    snapshot.current_player.id(),
                    snapshot.phase.id()
                )?;
                for cell in snapshot.board.cells() {
                    write!(f, " {}", cell.id())?;
                }
                write!(f, " {} {}", snapshot.scores.black, snapshot.scores.white)
            }
            ServerMessage::Vote { scores, winner } => {
                write!(f, "VOTE {} {} {}", scores.black, scores.white, winner.id())
            }
            ServerMessage::End { scores } => write!(f, "END {} {}", scores.black, scores.white),
        }
    }
}

/// Splits a byte stream from a peer into commands and votes.
///
/// Reads from a socket can end anywhere: in the middle of a command, or after
/// several commands. Bytes are buffered with [`Decoder::feed`] until a complete
/// unit can be taken out.
#[derive(Clone, Debug, Default)]
pub struct Decoder {
    buf: Vec<u8>,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends freshly read bytes.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Whether there are buffered bytes that have not been taken out yet.
    pub fn has_pending_bytes(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Takes out the next complete line, without terminator and trailing `\r`.
    ///
    /// Returns `None` if no terminator has arrived yet. Invalid UTF-8 is replaced
    /// rather than rejected, so that it ends up as a [`MalformedCommand`].
    pub fn next_line(&mut self) -> Option<String> {
        let end = self.buf.iter().position(|&b| b == MESSAGE_TERMINATOR)?;
        let mut line: Vec<u8> = self.buf.drain(..=end).collect();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }

    /// Takes out the next byte that is not whitespace, which is how votes arrive.
    ///
    /// Whitespace before it (e.g. the terminator of an earlier line) is dropped.
    pub fn next_vote(&mut self) -> Option<u8> {
        let skip = self
            .buf
            .iter()
            .take_while(|b| b.is_ascii_whitespace())
            .count();
        self.buf.drain(..skip);
        if self.buf.is_empty() {
            None
        } else {
            Some(self.buf.remove(0))
        }
    }
}
