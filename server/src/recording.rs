use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use gomoku::Player;
use serde::{Deserialize, Serialize};

/// Collects everything said during a session and writes it out as JSON.
pub struct Recorder {
    num: usize,
    directory: PathBuf,
    messages: Vec<RecordedMessage>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Sent,
    Received,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedMessage {
    pub peer: Player,
    pub direction: Direction,
    pub message: String,
}

impl Recorder {
    pub fn new(directory: PathBuf) -> anyhow::Result<Self> {
        if !directory.is_dir() {
            anyhow::bail!("Directory '{}' does not exist", directory.display());
        }
        Ok(Self {
            num: 1,
            directory,
            messages: Vec::new(),
        })
    }

    pub fn store_message(&mut self, peer: Player, direction: Direction, message: &str) {
        self.messages.push(RecordedMessage {
            peer,
            direction,
            message: String::from(message),
        });
    }

    /// The messages of the session in progress.
    pub fn messages(&self) -> &[RecordedMessage] {
        &self.messages
    }

    /// Forgets the messages recorded so far, e.g. those of a pair that never got to play.
    pub fn discard_messages(&mut self) {
        self.messages.clear();
    }

    /// Writes the messages recorded so far to the next `session_NNNNNN.json`
    /// file and starts a fresh recording.
    pub fn write_session_recording(&mut self) -> anyhow::Result<PathBuf> {
        let filepath = self.directory.join(format!("session_{:0>6}.json", self.num));
        let writer = BufWriter::new(File::create(&filepath)?);
        serde_json::to_writer_pretty(writer, &std::mem::take(&mut self.messages))?;
        self.num += 1;
        Ok(filepath)
    }
}
