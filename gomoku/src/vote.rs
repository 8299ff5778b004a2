use crate::{MalformedCommand, Player};

/// A peer's answer to the rematch request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Vote {
    Accept,
    Decline,
}

impl Vote {
    /// Parses the single byte a peer sends as its vote, `y` or `n`.
    pub fn decode(byte: u8) -> Result<Self, MalformedCommand> {
        match byte {
            b'y' => Ok(Vote::Accept),
            b'n' => Ok(Vote::Decline),
            other => Err(MalformedCommand {
                input: String::from_utf8_lossy(&[other]).into_owned(),
            }),
        }
    }

    pub fn byte(self) -> u8 {
        match self {
            Vote::Accept => b'y',
            Vote::Decline => b'n',
        }
    }

    pub fn from_accept(accept: bool) -> Self {
        if accept {
            Vote::Accept
        } else {
            Vote::Decline
        }
    }
}

/// What happens after the votes are in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Both peers accepted: the board is reset and a new match begins.
    Rematch,
    /// At least one peer declined (or never answered): the session ends.
    Stop,
}

/// Collects exactly one vote per player.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ballot {
    votes: [Option<Vote>; 2],
}

impl Ballot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the vote of `player`. Only the first vote of each player counts;
    /// returns `false` if `player` had already voted.
    pub fn cast(&mut self, player: Player, vote: Vote) -> bool {
        let slot = &mut self.votes[player.index()];
        if slot.is_some() {
            return false;
        }
        *slot = Some(vote);
        true
    }

    pub fn has_voted(&self, player: Player) -> bool {
        self.votes[player.index()].is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.votes.iter().all(Option::is_some)
    }

    /// A rematch needs both votes to be [`Vote::Accept`]. A missing vote counts as a decline.
    pub fn outcome(&self) -> VoteOutcome {
        if self.votes == [Some(Vote::Accept); 2] {
            VoteOutcome::Rematch
        } else {
            VoteOutcome::Stop
        }
    }
}
