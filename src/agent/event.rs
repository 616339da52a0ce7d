//! Inbound events and the outbound command.
//!
//! Events are what the transport hands the agent; [`Command`] is the only
//! thing the agent ever hands back, through a [`CommandSink`].

use serde::{Deserialize, Serialize};

use crate::game::{Color, LeaderboardEntry, MapDiff, Position};

/// A player as listed in a room update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPlayer {
    /// Server-side player id.
    pub id: String,
    /// Color assigned to the player.
    pub color: Color,
    /// Whether the player voted to force-start.
    #[serde(default)]
    pub force_start: bool,
    /// Whether the player hosts the room.
    #[serde(default)]
    pub is_room_host: bool,
}

/// Room state pushed by the server before and between games.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Room id.
    pub id: String,
    /// Players currently in the room.
    #[serde(default)]
    pub players: Vec<RoomPlayer>,
    /// Whether a game is running.
    #[serde(default)]
    pub game_started: bool,
}

impl Room {
    /// Find a player by id.
    #[must_use]
    pub fn player(&self, id: &str) -> Option<&RoomPlayer> {
        self.players.iter().find(|p| p.id == id)
    }
}

/// A player reference in end-of-game notices.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserData {
    /// Display name.
    #[serde(default)]
    pub username: String,
    /// Color, when the server includes it.
    #[serde(default)]
    pub color: Option<Color>,
}

/// An inbound event from the transport.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// The connection is up.
    Connect,
    /// Room membership or settings changed.
    RoomUpdate {
        /// The new room state.
        room: Room,
    },
    /// The server assigned our player id.
    SetPlayerId {
        /// Our player id.
        id: String,
    },
    /// A game started on a map of the given size.
    GameStarted {
        /// Map width in tiles.
        width: u16,
        /// Map height in tiles.
        height: u16,
    },
    /// A new frame for a turn.
    GameUpdate {
        /// Sparse diff of the frame.
        diff: MapDiff,
        /// Zero-based turn index.
        turn: u32,
        /// Current leaderboard.
        #[serde(default)]
        leaderboard: Vec<LeaderboardEntry>,
    },
    /// We were eliminated.
    GameOver {
        /// Who captured our General.
        #[serde(default)]
        captured_by: Option<UserData>,
    },
    /// The game finished.
    GameEnded {
        /// The winner.
        #[serde(default)]
        winner: Option<UserData>,
        /// Link to the replay, if the server published one.
        #[serde(default)]
        replay_link: Option<String>,
    },
}

/// A command for the transport to send to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Move the army on `from` onto the adjacent tile `to`.
    Attack {
        /// Source tile.
        from: Position,
        /// Destination tile.
        to: Position,
        /// Move only half of the army.
        half: bool,
    },
}

impl Command {
    /// A full-army attack.
    #[must_use]
    pub const fn attack(from: Position, to: Position) -> Self {
        Self::Attack {
            from,
            to,
            half: false,
        }
    }
}

/// Receiver of the agent's commands; implemented by the transport.
pub trait CommandSink {
    /// Deliver one command.
    fn send(&mut self, command: Command);
}

impl CommandSink for Vec<Command> {
    fn send(&mut self, command: Command) {
        self.push(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_game_update() {
        let json = r#"{"event":"game_update","diff":[0,[5,1,3]],"turn":4,"leaderboard":[[1,3,1]]}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        let Event::GameUpdate {
            diff,
            turn,
            leaderboard,
        } = event
        else {
            panic!("expected game_update");
        };
        assert_eq!(turn, 4);
        assert_eq!(diff.entries().len(), 1);
        assert_eq!(leaderboard[0].total_army, 3);
    }

    #[test]
    fn test_decode_room_update() {
        let json = r#"{"event":"room_update","room":{"id":"r1","players":[
            {"id":"p1","color":2,"forceStart":true,"isRoomHost":false}],"gameStarted":false}}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        let Event::RoomUpdate { room } = event else {
            panic!("expected room_update");
        };
        let me = room.player("p1").unwrap();
        assert_eq!(me.color, 2);
        assert!(me.force_start);
        assert!(room.player("p2").is_none());
    }

    #[test]
    fn test_decode_unit_events() {
        assert_eq!(
            serde_json::from_str::<Event>(r#"{"event":"connect"}"#).unwrap(),
            Event::Connect
        );
        assert_eq!(
            serde_json::from_str::<Event>(r#"{"event":"game_over"}"#).unwrap(),
            Event::GameOver { captured_by: None }
        );
        assert!(serde_json::from_str::<Event>(r#"{"event":"teleport"}"#).is_err());
    }

    #[test]
    fn test_command_json() {
        let command = Command::attack(Position::new(1, 2), Position::new(1, 3));
        assert_eq!(
            serde_json::to_string(&command).unwrap(),
            r#"{"command":"attack","from":{"x":1,"y":2},"to":{"x":1,"y":3},"half":false}"#
        );
    }

    #[test]
    fn test_vec_sink() {
        let mut sink: Vec<Command> = Vec::new();
        sink.send(Command::attack(Position::new(0, 0), Position::new(0, 1)));
        assert_eq!(sink.len(), 1);
    }
}
