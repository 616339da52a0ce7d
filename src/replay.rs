//! Offline replay of recorded event streams.
//!
//! A recording is a JSON-lines file holding one [`Event`] per line, exactly
//! as the transport delivered them:
//!
//! ```text
//! {"event":"set_player_id","id":"bot"}
//! {"event":"game_started","width":3,"height":3}
//! {"event":"game_update","diff":[4,[5,1,3]],"turn":0,"leaderboard":[[1,3,1]]}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. Replaying feeds every
//! event to an [`Agent`] and records what it decided on each turn.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::agent::{Agent, Command, CounterAttack, Event};
use crate::game::Position;

/// Error loading a recording.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The recording could not be read.
    #[error("failed to read recording: {0}")]
    Io(#[from] io::Error),
    /// A line is not a valid event.
    #[error("invalid event on line {line}: {source}")]
    Json {
        /// One-based line number.
        line: usize,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// A recorded sequence of inbound events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recording {
    events: Vec<Event>,
}

impl Recording {
    /// Create a recording from events.
    #[must_use]
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// Parse a JSON-lines recording.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Json`] naming the first line that is not an event.
    pub fn parse(text: &str) -> Result<Self, ReplayError> {
        Self::from_reader(text.as_bytes())
    }

    /// Read a JSON-lines recording.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or a line is not an event.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, ReplayError> {
        let mut events = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let event = serde_json::from_str(trimmed).map_err(|source| ReplayError::Json {
                line: idx + 1,
                source,
            })?;
            events.push(event);
        }
        Ok(Self { events })
    }

    /// Load a JSON-lines recording from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or a line is not an event.
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let recording = Self::from_reader(BufReader::new(File::open(path)?))?;
        debug!(path = %path.display(), events = recording.len(), "recording loaded");
        Ok(recording)
    }

    /// The recorded events in order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the recording holds no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// What the agent did on one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TurnRecord {
    /// Turn index.
    pub turn: u32,
    /// The command sent, if any.
    pub command: Option<Command>,
    /// Moves left in the queue after the turn.
    pub queued: usize,
    /// Tiles we held after the turn's frame.
    pub land: usize,
    /// Army we held after the turn's frame.
    pub army: i64,
    /// Our General, once seen.
    pub own_general: Option<Position>,
    /// Number of enemy Generals sighted so far.
    pub enemy_generals: usize,
    /// The incursion being chased.
    pub counter_attack: Option<CounterAttack>,
}

impl TurnRecord {
    fn capture(agent: &Agent, turn: u32, command: Option<Command>) -> Self {
        let (land, army) = match (agent.map(), agent.color()) {
            (Some(map), Some(me)) => (map.tiles_owned_by(me).count(), map.total_army(me)),
            _ => (0, 0),
        };
        Self {
            turn,
            command,
            queued: agent.queue().len(),
            land,
            army,
            own_general: agent.own_general(),
            enemy_generals: agent.enemy_generals().len(),
            counter_attack: agent.counter_attack(),
        }
    }
}

/// Feed every event of `recording` to `agent`, one record per game update.
pub fn run(agent: &mut Agent, recording: &Recording) -> Vec<TurnRecord> {
    let mut records = Vec::new();
    for event in recording.events() {
        let turn = match event {
            Event::GameUpdate { turn, .. } => Some(*turn),
            _ => None,
        };
        let mut sent: Vec<Command> = Vec::new();
        agent.handle(event.clone(), &mut sent);
        if let Some(turn) = turn {
            records.push(TurnRecord::capture(agent, turn, sent.first().copied()));
        }
    }
    records
}
