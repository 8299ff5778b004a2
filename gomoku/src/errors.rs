use crate::{Phase, Player};

/// The error type for accessing a cell that is not on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoordinateOutOfRange {
    pub row: i32,
    pub col: i32,
}

impl std::error::Error for CoordinateOutOfRange {}

impl std::fmt::Display for CoordinateOutOfRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Coordinates ({}, {}) are outside of the board", self.row, self.col)
    }
}

/// The error type for peer input that does not match any command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MalformedCommand {
    pub input: String,
}

impl std::error::Error for MalformedCommand {}

impl std::fmt::Display for MalformedCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Could not parse command {:?}", self.input)
    }
}

/// The error type for a server line that does not match any message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MalformedServerMessage {
    pub input: String,
}

impl std::error::Error for MalformedServerMessage {}

impl std::fmt::Display for MalformedServerMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Could not parse server message {:?}", self.input)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// The error type for a well-formed command that the rules do not allow.
pub enum IllegalMove {
    NotYourTurn { player: Player },
    OutOfBounds { row: i32, col: i32 },
    CellOccupied { row: i32, col: i32 },
    NotOwnStone { row: i32, col: i32 },
    WrongPhase { phase: Phase },
    AwaitingVotes,
    NoVoteInProgress,
    AlreadyVoted { player: Player },
}

impl std::error::Error for IllegalMove {}

impl From<CoordinateOutOfRange> for IllegalMove {
    fn from(CoordinateOutOfRange { row, col }: CoordinateOutOfRange) -> Self {
        IllegalMove::OutOfBounds { row, col }
    }
}

impl std::fmt::Display for IllegalMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalMove::NotYourTurn { player } => write!(f, "{} moved out of turn", player),
            IllegalMove::OutOfBounds { row, col } => {
                write!(f, "({}, {}) is outside of the board", row, col)
            }
            IllegalMove::CellOccupied { row, col } => write!(f, "({}, {}) is not empty", row, col),
            IllegalMove::NotOwnStone { row, col } => {
                write!(f, "({}, {}) does not hold a stone of the moving player", row, col)
            }
            IllegalMove::WrongPhase { phase } => {
                write!(f, "That kind of move is not allowed in the {} phase", phase)
            }
            IllegalMove::AwaitingVotes => write!(f, "The match is over and waiting for votes"),
            IllegalMove::NoVoteInProgress => write!(f, "There is no vote in progress"),
            IllegalMove::AlreadyVoted { player } => write!(f, "{} has already voted", player),
        }
    }
}
