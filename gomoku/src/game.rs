use serde::{Deserialize, Serialize};

use crate::{
    check_win, Ballot, Board, BoardSnapshot, Cell, Command, IllegalMove, Player, ServerMessage,
    Vote, VoteOutcome,
};

/// Once both players have placed this many stones, moves relocate stones instead.
pub const RELOCATION_THRESHOLD: u32 = 5;

/// Whether a move adds a new stone or moves an existing one.
///
/// Only ever advances from `Placing` to `Relocating` within a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Placing,
    Relocating,
}

impl Phase {
    /// `0` for placing and `1` for relocating.
    pub fn id(self) -> u8 {
        match self {
            Phase::Placing => 0,
            Phase::Relocating => 1,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Phase::Placing),
            1 => Some(Phase::Relocating),
            _ => None,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Placing => write!(f, "placing"),
            Phase::Relocating => write!(f, "relocating"),
        }
    }
}

/// Matches won per player over a session. Survives rematches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub black: u32,
    pub white: u32,
}

impl Scores {
    pub fn of(&self, player: Player) -> u32 {
        match player {
            Player::Black => self.black,
            Player::White => self.white,
        }
    }

    fn credit(&mut self, player: Player) {
        match player {
            Player::Black => self.black += 1,
            Player::White => self.white += 1,
        }
    }
}

/// What the state machine is waiting for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    AwaitingMove(Phase),
    AwaitingVotes { winner: Player },
}

/// The observable effect of an accepted command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateChange {
    /// The move was applied and it is now `next`'s turn.
    TurnPassed { next: Player, phase: Phase },
    /// The move completed a line. The match now waits for rematch votes.
    Won { winner: Player },
    /// A vote was recorded; the other player has yet to vote.
    VoteRecorded { player: Player },
    /// Both players accepted. Board, phase and stone counts were reset.
    Rematch,
    /// At least one player declined. The session is over.
    Stopped,
}

/// The complete state of one session between two peers.
///
/// Moves and votes go through [`MatchState::try_apply`], which only mutates
/// the state once a command is known to be legal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchState {
    board: Board,
    current_player: Player,
    phase: Phase,
    stones_placed: [u32; 2],
    scores: Scores,
    /// `Some` between a win and the end of the vote.
    voting: Option<(Player, Ballot)>,
}

impl MatchState {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Player::Black,
            phase: Phase::Placing,
            stones_placed: [0; 2],
            scores: Scores::default(),
            voting: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn scores(&self) -> Scores {
        self.scores
    }

    /// How many stones `player` has placed in this match (relocations don't count).
    pub fn stones_placed(&self, player: Player) -> u32 {
        self.stones_placed[player.index()]
    }

    pub fn stage(&self) -> Stage {
        match &self.voting {
            Some((winner, _)) => Stage::AwaitingVotes { winner: *winner },
            None => Stage::AwaitingMove(self.phase),
        }
    }

    /// Applies a command sent by `player`, if it is legal.
    ///
    /// Returns `None` when the command has no effect. Use [`Self::try_apply`]
    /// to learn why.
    pub fn apply(&mut self, player: Player, command: &Command) -> Option<StateChange> {
        self.try_apply(player, command).ok()
    }

    /// Applies a command sent by `player`, or explains why it is illegal.
    ///
    /// The state is left untouched when an error is returned.
    pub fn try_apply(
        &mut self,
        player: Player,
        command: &Command,
    ) -> Result<StateChange, IllegalMove> {
        if let &Command::Vote { accept } = command {
            return self.cast_vote(player, Vote::from_accept(accept));
        }
        if self.voting.is_some() {
            return Err(IllegalMove::AwaitingVotes);
        }
        if player != self.current_player {
            return Err(IllegalMove::NotYourTurn { player });
        }
        match (*command, self.phase) {
            (Command::Place { row, col }, Phase::Placing) => self.place(row, col),
            (
                Command::Relocate {
                    from_row,
                    from_col,
                    to_row,
                    to_col,
                },
                Phase::Relocating,
            ) => self.relocate((from_row, from_col), (to_row, to_col)),
            (_, phase) => Err(IllegalMove::WrongPhase { phase }),
        }
    }

    fn place(&mut self, row: i32, col: i32) -> Result<StateChange, IllegalMove> {
        if !self.board.is_empty(row, col)? {
            return Err(IllegalMove::CellOccupied { row, col });
        }
        self.board.place(row, col, self.current_player)?;
        self.stones_placed[self.current_player.index()] += 1;
        Ok(self.finish_move(row, col))
    }

    fn relocate(&mut self, from: (i32, i32), to: (i32, i32)) -> Result<StateChange, IllegalMove> {
        let (from_row, from_col) = from;
        let (to_row, to_col) = to;
        if self.board.occupant(from_row, from_col)? != Cell::from(self.current_player) {
            return Err(IllegalMove::NotOwnStone {
                row: from_row,
                col: from_col,
            });
        }
        if !self.board.is_empty(to_row, to_col)? {
            return Err(IllegalMove::CellOccupied {
                row: to_row,
                col: to_col,
            });
        }
        self.board.vacate(from_row, from_col)?;
        self.board.place(to_row, to_col, self.current_player)?;
        Ok(self.finish_move(to_row, to_col))
    }

    // Win check, phase transition and turn change after the board was updated.
    fn finish_move(&mut self, row: i32, col: i32) -> StateChange {
        if check_win(&self.board, row, col) {
            self.voting = Some((self.current_player, Ballot::new()));
            return StateChange::Won {
                winner: self.current_player,
            };
        }
        if self.phase == Phase::Placing
            && self
                .stones_placed
                .iter()
                .all(|&placed| placed >= RELOCATION_THRESHOLD)
        {
            self.phase = Phase::Relocating;
        }
        self.current_player = self.current_player.opponent();
        StateChange::TurnPassed {
            next: self.current_player,
            phase: self.phase,
        }
    }

    fn cast_vote(&mut self, player: Player, vote: Vote) -> Result<StateChange, IllegalMove> {
        let Some((winner, ballot)) = &mut self.voting else {
            return Err(IllegalMove::NoVoteInProgress);
        };
        if !ballot.cast(player, vote) {
            return Err(IllegalMove::AlreadyVoted { player });
        }
        if !ballot.is_complete() {
            return Ok(StateChange::VoteRecorded { player });
        }
        let winner = *winner;
        match ballot.outcome() {
            VoteOutcome::Rematch => {
                self.scores.credit(winner);
                self.reset_match();
                Ok(StateChange::Rematch)
            }
            VoteOutcome::Stop => Ok(StateChange::Stopped),
        }
    }

    // Back to a fresh match, keeping the scores.
    fn reset_match(&mut self) {
        self.board.reset();
        self.current_player = Player::Black;
        self.phase = Phase::Placing;
        self.stones_placed = [0; 2];
        self.voting = None;
    }

    /// The `BOARD` broadcast for the current state.
    pub fn board_message(&self) -> ServerMessage {
        ServerMessage::Board(BoardSnapshot {
            current_player: self.current_player,
            phase: self.phase,
            board: self.board.clone(),
            scores: self.scores,
        })
    }

    /// The `VOTE` request, while votes are being collected.
    pub fn vote_request(&self) -> Option<ServerMessage> {
        self.voting.as_ref().map(|&(winner, _)| ServerMessage::Vote {
            scores: self.scores,
            winner,
        })
    }

    /// The `END` message with the current scores.
    pub fn end_message(&self) -> ServerMessage {
        ServerMessage::End {
            scores: self.scores,
        }
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}
