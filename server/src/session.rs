use std::io::{Read, Write};

use gomoku::{
    visualize_board, Command, MatchState, Player, Scores, ServerMessage, StateChange, Vote,
};
use tracing::{debug, info};

use crate::connection::Connection;
use crate::recording::Recorder;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The peers did not agree on a rematch. `END` was sent to both.
    Finished { scores: Scores },
    /// A peer went away outside of a vote. Nobody was told.
    Disconnected { player: Player, scores: Scores },
}

/// Drives one session between two connected peers.
///
/// Only the peer whose turn it is gets read from, so there is never more
/// than one command in flight.
pub struct Session<R, W> {
    peers: [Connection<R, W>; 2],
    state: MatchState,
}

impl<R: Read, W: Write> Session<R, W> {
    pub fn new(black: Connection<R, W>, white: Connection<R, W>) -> Self {
        debug_assert_eq!(black.player, Player::Black);
        debug_assert_eq!(white.player, Player::White);
        Self {
            peers: [black, white],
            state: MatchState::new(),
        }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn into_peers(self) -> [Connection<R, W>; 2] {
        self.peers
    }

    fn peer(&mut self, player: Player) -> &mut Connection<R, W> {
        &mut self.peers[player.index()]
    }

    /// Plays until the peers stop voting for rematches or one of them disconnects.
    ///
    /// Returns an error only if the recording cannot be written, never because of a peer.
    pub fn run(&mut self, recorder: &mut Option<Recorder>) -> anyhow::Result<SessionOutcome> {
        let outcome = self.play(recorder);
        if let Some(rec) = recorder {
            let path = rec.write_session_recording()?;
            debug!(path = %path.display(), "Recorded session");
        }
        Ok(outcome)
    }

    fn play(&mut self, recorder: &mut Option<Recorder>) -> SessionOutcome {
        if let Err(player) = self.broadcast_board(recorder) {
            return self.disconnected(player);
        }

        loop {
            let player = self.state.current_player();
            let command = match self.peer(player).read_command(recorder) {
                Ok(Ok(command)) => command,
                Ok(Err(err)) => {
                    debug!(%player, %err, "Ignoring malformed command");
                    continue;
                }
                Err(err) => {
                    info!(%player, %err, "Peer disconnected");
                    return self.disconnected(player);
                }
            };

            let winner = match self.state.try_apply(player, &command) {
                Ok(StateChange::TurnPassed { next, phase }) => {
                    debug!(%player, %command, %next, %phase, "Move applied");
                    None
                }
                Ok(StateChange::Won { winner }) => Some(winner),
                Ok(change) => {
                    debug!(%player, ?change, "Ignoring command outside of a vote");
                    continue;
                }
                Err(err) => {
                    debug!(%player, %command, %err, "Ignoring illegal move");
                    continue;
                }
            };

            if let Err(player) = self.broadcast_board(recorder) {
                return self.disconnected(player);
            }

            if let Some(winner) = winner {
                info!(%winner, "Match won");
                debug!("\n{}", visualize_board(self.state.board()));
                match self.collect_votes(recorder) {
                    StateChange::Rematch => {
                        info!(scores = ?self.state.scores(), "Rematch");
                        if let Err(player) = self.broadcast_board(recorder) {
                            return self.disconnected(player);
                        }
                    }
                    _ => return self.finish(recorder),
                }
            }
        }
    }

    /// Sends the vote request, then reads one vote from black and one from white.
    ///
    /// Anything but a `y` counts as a decline, including a peer that went away.
    fn collect_votes(&mut self, recorder: &mut Option<Recorder>) -> StateChange {
        if let Some(request) = self.state.vote_request() {
            // A peer that cannot be reached here will fail to vote below.
            let _ = self.broadcast(recorder, &request);
        }

        let mut result = StateChange::Stopped;
        for player in [Player::Black, Player::White] {
            let vote = match self.peer(player).read_vote(recorder) {
                Ok(byte) => Vote::decode(byte).unwrap_or_else(|err| {
                    debug!(%player, %err, "Counting malformed vote as decline");
                    Vote::Decline
                }),
                Err(err) => {
                    info!(%player, %err, "Peer disconnected during vote");
                    Vote::Decline
                }
            };
            debug!(%player, ?vote, "Vote");
            let command = Command::Vote {
                accept: vote == Vote::Accept,
            };
            match self.state.try_apply(player, &command) {
                Ok(change) => result = change,
                Err(err) => debug!(%player, %err, "Vote was not counted"),
            }
        }
        result
    }

    // Best effort: the session is over whether or not the peers get this.
    fn finish(&mut self, recorder: &mut Option<Recorder>) -> SessionOutcome {
        let end = self.state.end_message();
        if let Err(player) = self.broadcast(recorder, &end) {
            debug!(%player, "Could not deliver END");
        }
        SessionOutcome::Finished {
            scores: self.state.scores(),
        }
    }

    fn disconnected(&self, player: Player) -> SessionOutcome {
        SessionOutcome::Disconnected {
            player,
            scores: self.state.scores(),
        }
    }

    fn broadcast_board(&mut self, recorder: &mut Option<Recorder>) -> Result<(), Player> {
        let board = self.state.board_message();
        self.broadcast(recorder, &board)
    }

    /// Sends to black, then white. Returns the first peer that could not be written to.
    fn broadcast(
        &mut self,
        recorder: &mut Option<Recorder>,
        msg: &ServerMessage,
    ) -> Result<(), Player> {
        let mut result = Ok(());
        for peer in self.peers.iter_mut() {
            if let Err(err) = peer.send(recorder, msg) {
                info!(player = %peer.player, %err, "Could not send to peer");
                result = result.and(Err(peer.player));
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use gomoku::{BoardSnapshot, Cell, Phase};

    use super::*;
    use crate::recording::Direction;

    type MemorySession = Session<Cursor<Vec<u8>>, Vec<u8>>;

    fn session(black_input: &str, white_input: &str) -> MemorySession {
        Session::new(
            Connection::new(Player::Black, Cursor::new(black_input.into()), Vec::new()),
            Connection::new(Player::White, Cursor::new(white_input.into()), Vec::new()),
        )
    }

    /// Everything each peer received, black first.
    fn received(session: MemorySession) -> [Vec<ServerMessage>; 2] {
        session.into_peers().map(|peer| {
            String::from_utf8(peer.writer().clone())
                .unwrap()
                .lines()
                .map(|line| ServerMessage::decode(line).unwrap())
                .collect()
        })
    }

    fn boards(messages: &[ServerMessage]) -> Vec<&BoardSnapshot> {
        messages
            .iter()
            .filter_map(|msg| match msg {
                ServerMessage::Board(snapshot) => Some(snapshot),
                _ => None,
            })
            .collect()
    }

    // Black wins horizontally on row 7, columns 7 to 11.
    const BLACK_WINNING_MOVES: &str = "MOVE 7 7\nMOVE 7 8\nMOVE 7 9\nMOVE 7 10\nMOVE 7 11\n";
    const WHITE_LOSING_MOVES: &str = "MOVE 0 0\nMOVE 0 1\nMOVE 0 3\nMOVE 0 4\n";

    #[test]
    fn win_and_rematch() {
        let mut session = session(
            &format!("{}y", BLACK_WINNING_MOVES),
            &format!("{}y\n", WHITE_LOSING_MOVES),
        );
        let outcome = session.run(&mut None).unwrap();
        // After the rematch it is black's turn, and black has nothing more to say.
        assert_eq!(
            outcome,
            SessionOutcome::Disconnected {
                player: Player::Black,
                scores: Scores { black: 1, white: 0 }
            }
        );

        let [black, white] = received(session);
        assert_eq!(black, white);
        // Initial board, nine moves, vote request, fresh board.
        assert_eq!(black.len(), 12);
        assert_eq!(
            black[10],
            ServerMessage::Vote {
                scores: Scores { black: 0, white: 0 },
                winner: Player::Black
            }
        );
        let winning_board = boards(&black)[9];
        assert_eq!(winning_board.current_player, Player::Black);
        assert_eq!(winning_board.board.get(7, 11), Some(Cell::Black));
        assert_eq!(
            black[11],
            ServerMessage::Board(BoardSnapshot {
                current_player: Player::Black,
                phase: Phase::Placing,
                board: gomoku::Board::new(),
                scores: Scores { black: 1, white: 0 },
            })
        );
        assert!(!black.iter().any(|msg| matches!(msg, ServerMessage::End { .. })));
    }

    #[test]
    fn turns_alternate_in_broadcasts() {
        let mut session = session(BLACK_WINNING_MOVES, "MOVE 0 0\n");
        session.run(&mut None).unwrap();
        let [black, _] = received(session);
        let players: Vec<Player> = boards(&black).iter().map(|b| b.current_player).collect();
        assert_eq!(
            players,
            vec![Player::Black, Player::White, Player::Black, Player::White]
        );
    }

    #[test]
    fn declined_rematch_ends_the_session() {
        let mut session = session(
            &format!("{}y", BLACK_WINNING_MOVES),
            &format!("{}n", WHITE_LOSING_MOVES),
        );
        assert_eq!(
            session.run(&mut None).unwrap(),
            SessionOutcome::Finished {
                scores: Scores::default()
            }
        );
        for messages in received(session) {
            assert_eq!(
                messages.last(),
                Some(&ServerMessage::End {
                    scores: Scores::default()
                })
            );
        }
    }

    #[test]
    fn disconnect_during_vote_counts_as_decline() {
        let mut session = session(&format!("{}y", BLACK_WINNING_MOVES), WHITE_LOSING_MOVES);
        assert_eq!(
            session.run(&mut None).unwrap(),
            SessionOutcome::Finished {
                scores: Scores::default()
            }
        );
        let [black, _] = received(session);
        assert!(matches!(black.last(), Some(ServerMessage::End { .. })));
    }

    #[test]
    fn garbled_vote_counts_as_decline() {
        let mut session = session(
            &format!("{}?", BLACK_WINNING_MOVES),
            &format!("{}y", WHITE_LOSING_MOVES),
        );
        assert!(matches!(
            session.run(&mut None).unwrap(),
            SessionOutcome::Finished { .. }
        ));
    }

    #[test]
    fn disconnect_mid_match_sends_no_end() {
        let mut session = session("MOVE 7 7\n", "");
        assert_eq!(
            session.run(&mut None).unwrap(),
            SessionOutcome::Disconnected {
                player: Player::White,
                scores: Scores::default()
            }
        );
        assert_eq!(session.state().board().get(7, 7), Some(Cell::Black));
        let [black, white] = received(session);
        assert_eq!(black.len(), 2);
        assert_eq!(white.len(), 2);
    }

    #[test]
    fn invalid_input_is_ignored() {
        let mut session = session(
            "MOVE 7 7\nMOVE 15 15\nMOVE_FROM 7 7 MOVE_TO 1 1\nMOVE 1 1\n",
            "garbage\n\u{1b}[A\nMOVE 7 7\nMOVE -1 0\ny\nMOVE 2 2\n",
        );
        session.run(&mut None).unwrap();
        let state = session.state();
        assert_eq!(state.board().get(1, 1), Some(Cell::Black));
        assert_eq!(state.board().get(2, 2), Some(Cell::White));
        assert_eq!(state.board().count_stones(Player::Black), 2);
        assert_eq!(state.board().count_stones(Player::White), 1);
        // Only accepted moves are broadcast.
        let [black, _] = received(session);
        assert_eq!(boards(&black).len(), 4);
    }

    #[test]
    fn relocation_phase_over_the_wire() {
        let black = "MOVE 0 0\nMOVE 2 0\nMOVE 4 0\nMOVE 6 0\nMOVE 8 0\nMOVE 0 0\nMOVE_FROM 0 0 MOVE_TO 14 14\n";
        let white = "MOVE 0 2\nMOVE 2 2\nMOVE 4 2\nMOVE 6 2\nMOVE 8 2\n";
        let mut session = session(black, white);
        session.run(&mut None).unwrap();
        let state = session.state();
        assert_eq!(state.phase(), Phase::Relocating);
        assert_eq!(state.board().get(0, 0), Some(Cell::Empty));
        assert_eq!(state.board().get(14, 14), Some(Cell::Black));
        let [black, _] = received(session);
        let last = boards(&black).pop().unwrap().clone();
        assert_eq!(last.phase, Phase::Relocating);
        assert_eq!(last.current_player, Player::White);
    }

    #[test]
    fn records_the_session() {
        let dir = std::env::temp_dir().join(format!("gomoku-session-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let mut recorder = Some(Recorder::new(dir.clone()).unwrap());
        let mut session = session("MOVE 7 7\n", "");
        session.run(&mut recorder).unwrap();

        let text = std::fs::read_to_string(dir.join("session_000001.json")).unwrap();
        let messages: Vec<crate::RecordedMessage> = serde_json::from_str(&text).unwrap();
        // Two initial boards, one command, two boards after it.
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[2].peer, Player::Black);
        assert_eq!(messages[2].direction, Direction::Received);
        assert_eq!(messages[2].message, "MOVE 7 7");
        std::fs::remove_dir_all(dir).unwrap();
    }
}
