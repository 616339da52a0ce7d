//! The agent: observed state plus the per-turn decision policy.
//!
//! [`Agent`] owns everything the policy reads and writes. Events come in
//! through [`Agent::handle`]; the only output is at most one [`Command`] per
//! turn, delivered to a [`CommandSink`].
//!
//! # Turn order
//!
//! Each `game_update` runs the steps below and stops at the first one that
//! acts:
//! 1. Send the oldest queued move that is still valid
//! 2. Route army toward every sighted enemy General
//! 3. Reinforce our General when an enemy touches it
//! 4. Keep chasing a retreating incursion
//! 5. Look for unseen threats around our General
//! 6. Periodic exploration, land expansion and optional City captures

mod event;
mod expand;
mod planner;
mod queue;
pub mod search;
mod threat;
mod turn;

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::Serialize;
use tracing::{debug, info, warn};

pub use event::{Command, CommandSink, Event, Room, RoomPlayer, UserData};
pub use queue::{MoveItem, MoveQueue, Purpose};
pub use threat::Threat;

use crate::config::AgentConfig;
use crate::game::{Color, EnemyGeneral, Generals, LeaderboardEntry, Map, MapDiff, Position};
use planner::Planner;

/// The incursion being chased: who, and the tile our chase has reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CounterAttack {
    /// Color of the chased player.
    pub color: Color,
    /// Current head of the chase.
    pub position: Position,
}

/// Decision-making agent for one player.
#[derive(Debug)]
pub struct Agent {
    config: AgentConfig,
    map: Option<Map>,
    player_id: Option<String>,
    color: Option<Color>,
    generals: Generals,
    counter_attack: Option<CounterAttack>,
    leaderboard: Vec<LeaderboardEntry>,
    turn: Option<u32>,
    queue: Arc<MoveQueue>,
    rng: SmallRng,
}

impl Agent {
    /// Create an agent whose random choices are reproducible from `seed`.
    #[must_use]
    pub fn new(config: AgentConfig, seed: u64) -> Self {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }

    /// Create an agent seeded from the operating system.
    #[must_use]
    pub fn from_entropy(config: AgentConfig) -> Self {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    fn with_rng(config: AgentConfig, rng: SmallRng) -> Self {
        Self {
            config,
            map: None,
            player_id: None,
            color: None,
            generals: Generals::new(),
            counter_attack: None,
            leaderboard: Vec::new(),
            turn: None,
            queue: Arc::new(MoveQueue::new()),
            rng,
        }
    }

    /// The policy configuration.
    #[must_use]
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// The observed map, once a game has started.
    #[must_use]
    pub const fn map(&self) -> Option<&Map> {
        self.map.as_ref()
    }

    /// Our player id, once assigned.
    #[must_use]
    pub fn player_id(&self) -> Option<&str> {
        self.player_id.as_deref()
    }

    /// Our color, once known.
    #[must_use]
    pub const fn color(&self) -> Option<Color> {
        self.color
    }

    /// Set our color directly (normally derived from room updates).
    pub fn set_color(&mut self, color: Color) {
        self.color = Some(color);
    }

    /// Our General, once seen.
    #[must_use]
    pub const fn own_general(&self) -> Option<Position> {
        self.generals.own()
    }

    /// Enemy General sightings in order of discovery.
    #[must_use]
    pub fn enemy_generals(&self) -> &[EnemyGeneral] {
        self.generals.enemies()
    }

    /// The incursion being chased.
    #[must_use]
    pub const fn counter_attack(&self) -> Option<CounterAttack> {
        self.counter_attack
    }

    /// Start or stop chasing.
    pub fn set_counter_attack(&mut self, counter_attack: Option<CounterAttack>) {
        self.counter_attack = counter_attack;
    }

    /// The latest leaderboard.
    #[must_use]
    pub fn leaderboard(&self) -> &[LeaderboardEntry] {
        &self.leaderboard
    }

    /// The latest turn index seen.
    #[must_use]
    pub const fn turn(&self) -> Option<u32> {
        self.turn
    }

    /// The pending-move queue, shareable with other threads.
    #[must_use]
    pub const fn queue(&self) -> &Arc<MoveQueue> {
        &self.queue
    }

    /// Dispatch one inbound event. Commands, if any, go to `sink`.
    pub fn handle<S: CommandSink + ?Sized>(&mut self, event: Event, sink: &mut S) {
        match event {
            Event::Connect => debug!("connected"),
            Event::RoomUpdate { room } => {
                let me = self.player_id.as_deref().and_then(|id| room.player(id));
                if let Some(player) = me {
                    if self.color != Some(player.color) {
                        info!(room = %room.id, color = player.color, "color assigned");
                    }
                    self.color = Some(player.color);
                }
            }
            Event::SetPlayerId { id } => {
                debug!(%id, "player id assigned");
                self.player_id = Some(id);
            }
            Event::GameStarted { width, height } => self.initialize(width, height),
            Event::GameUpdate {
                diff,
                turn,
                leaderboard,
            } => {
                self.leaderboard = leaderboard;
                self.apply_patch(&diff);
                self.on_turn(turn, sink);
            }
            Event::GameOver { captured_by } => {
                info!(by = ?captured_by.map(|u| u.username), "game over");
            }
            Event::GameEnded {
                winner,
                replay_link,
            } => {
                info!(winner = ?winner.map(|u| u.username), replay = ?replay_link, "game ended");
            }
        }
    }

    /// Start a new game on a `width` x `height` map.
    ///
    /// Everything learned in a previous game is forgotten. Zero dimensions,
    /// or a side longer than [`MAX_SIDE`](crate::game::MAX_SIDE), leave the
    /// agent without a map.
    pub fn initialize(&mut self, width: u16, height: u16) {
        self.map = Map::new(width, height);
        if self.map.is_none() {
            warn!(width, height, "game started with an unusable map size");
        }
        self.generals.reset();
        self.counter_attack = None;
        self.queue.clear();
        self.turn = None;
        info!(width, height, "game started");
    }

    /// Fold a frame diff into the map and refresh General sightings.
    ///
    /// Ignored until a game has started; General bookkeeping waits for our
    /// color to be known.
    pub fn apply_patch(&mut self, diff: &MapDiff) {
        let Some(map) = self.map.as_mut() else {
            debug!("patch before game start ignored");
            return;
        };
        if !map.replace_frame(diff.expand(map.len())) {
            warn!("frame size mismatch, patch ignored");
            return;
        }
        if let Some(me) = self.color {
            self.generals.observe(map, me);
        }
    }

    fn planner(&mut self) -> Option<Planner<'_>> {
        Some(Planner {
            map: self.map.as_ref()?,
            me: self.color?,
            general: self.generals.own(),
            queue: &self.queue,
            config: &self.config,
            rng: &mut self.rng,
        })
    }

    /// Queue the best route toward `goal` within `budget` steps.
    ///
    /// Returns the route length in cells; 0 if nothing was queued or the game
    /// state is incomplete.
    pub fn gather(&mut self, purpose: Purpose, priority: i64, goal: Position, budget: usize) -> usize {
        self.planner()
            .map_or(0, |planner| planner.gather(purpose, priority, goal, budget))
    }

    /// Queue a route from our General out to a sampled unseen cell.
    ///
    /// Returns the route length in cells.
    pub fn quick_expand(&mut self) -> usize {
        self.planner().map_or(0, |mut planner| planner.quick_expand())
    }

    /// Queue narrow gathers toward every Plain tile we do not own.
    ///
    /// Returns whether anything was queued.
    pub fn expand_land(&mut self) -> bool {
        self.planner().is_some_and(|mut planner| planner.expand_land())
    }

    /// Queue a gather toward the cheapest visible City we do not own.
    ///
    /// Returns whether anything was queued.
    pub fn capture_city(&mut self) -> bool {
        self.planner().is_some_and(|planner| planner.capture_city())
    }

    /// Search for an unseen threat near our General and queue a defense.
    ///
    /// A found threat with a known attacker becomes the counter-attack to
    /// chase.
    pub fn detect_threat(&mut self) -> Option<Threat> {
        let threat = self.planner()?.detect_threat()?;
        if let Some(color) = threat.color {
            self.counter_attack = Some(CounterAttack {
                color,
                position: threat.position,
            });
        }
        Some(threat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Tile, TileType};

    fn event(json: &str) -> Event {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_color_from_room_update() {
        let mut agent = Agent::new(AgentConfig::default(), 0);
        let mut sink: Vec<Command> = Vec::new();
        agent.handle(event(r#"{"event":"set_player_id","id":"bot"}"#), &mut sink);
        agent.handle(
            event(
                r#"{"event":"room_update","room":{"id":"r","players":[
                    {"id":"other","color":1},{"id":"bot","color":3}]}}"#,
            ),
            &mut sink,
        );
        assert_eq!(agent.player_id(), Some("bot"));
        assert_eq!(agent.color(), Some(3));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_room_update_without_id_keeps_color_unset() {
        let mut agent = Agent::new(AgentConfig::default(), 0);
        let mut sink: Vec<Command> = Vec::new();
        agent.handle(
            event(r#"{"event":"room_update","room":{"id":"r","players":[{"id":"bot","color":3}]}}"#),
            &mut sink,
        );
        assert_eq!(agent.color(), None);
    }

    #[test]
    fn test_initialize_resets_state() {
        let mut agent = Agent::new(AgentConfig::default(), 0);
        agent.set_color(1);
        agent.initialize(3, 3);
        agent.queue().push_back(MoveItem {
            from: Position::new(0, 0),
            to: Position::new(0, 1),
            purpose: Purpose::Attack,
            priority: 1,
            target: Position::new(0, 1),
        });
        agent.set_counter_attack(Some(CounterAttack {
            color: 2,
            position: Position::new(1, 1),
        }));

        agent.initialize(4, 2);
        let map = agent.map().unwrap();
        assert_eq!((map.width(), map.height()), (4, 2));
        assert!(agent.queue().is_empty());
        assert_eq!(agent.counter_attack(), None);
        assert_eq!(agent.color(), Some(1));
    }

    #[test]
    fn test_zero_sized_game_has_no_map() {
        let mut agent = Agent::new(AgentConfig::default(), 0);
        agent.initialize(0, 5);
        assert!(agent.map().is_none());
        agent.apply_patch(&MapDiff::default());
        assert!(agent.map().is_none());
    }

    #[test]
    fn test_oversized_game_has_no_map() {
        let mut agent = Agent::new(AgentConfig::default(), 0);
        agent.set_color(1);
        agent.initialize(u16::MAX, u16::MAX);
        assert!(agent.map().is_none());
        let mut sink: Vec<Command> = Vec::new();
        agent.on_turn(0, &mut sink);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_apply_patch_records_generals() {
        let mut agent = Agent::new(AgentConfig::default(), 0);
        agent.set_color(1);
        agent.initialize(3, 3);
        let diff = MapDiff::new(vec![
            (4, Tile::with_army(TileType::General, Some(1), 5)),
            (8, Tile::with_army(TileType::General, Some(2), 7)),
        ]);
        agent.apply_patch(&diff);
        assert_eq!(agent.own_general(), Some(Position::new(1, 1)));
        assert_eq!(
            agent.enemy_generals(),
            &[EnemyGeneral {
                position: Position::new(2, 2),
                color: 2
            }]
        );
        assert!(agent.map().unwrap().is_visible(Position::new(2, 2)));
    }

    #[test]
    fn test_apply_patch_skips_generals_without_color() {
        let mut agent = Agent::new(AgentConfig::default(), 0);
        agent.initialize(2, 2);
        agent.apply_patch(&MapDiff::new(vec![(0, Tile::with_army(TileType::General, Some(2), 7))]));
        assert_eq!(agent.own_general(), None);
        assert!(agent.enemy_generals().is_empty());
    }

    #[test]
    fn test_gather_scenario() {
        let mut agent = Agent::new(AgentConfig::default(), 0);
        agent.set_color(1);
        agent.initialize(3, 3);
        agent.apply_patch(&MapDiff::new(vec![
            (1, Tile::with_army(TileType::Plain, Some(2), 2)),
            (4, Tile::with_army(TileType::General, Some(1), 5)),
        ]));
        let len = agent.gather(Purpose::ExpandLand, 10, Position::new(0, 1), 5);
        assert_eq!(len, 2);
        let items = agent.queue().snapshot();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].from, Position::new(1, 1));
        assert_eq!(items[0].to, Position::new(0, 1));
    }

    #[test]
    fn test_planning_needs_color_and_map() {
        let mut agent = Agent::new(AgentConfig::default(), 0);
        assert_eq!(agent.gather(Purpose::Defend, 1, Position::new(0, 0), 5), 0);
        assert_eq!(agent.quick_expand(), 0);
        assert!(!agent.expand_land());
        assert!(!agent.capture_city());
        assert_eq!(agent.detect_threat(), None);
    }

    #[test]
    fn test_detect_threat_records_counter_attack() {
        let mut agent = Agent::new(AgentConfig::default(), 5);
        agent.set_color(1);
        agent.initialize(4, 1);
        agent.apply_patch(&MapDiff::new(vec![
            (0, Tile::with_army(TileType::General, Some(1), 20)),
            (1, Tile::with_army(TileType::Plain, Some(1), 1)),
        ]));
        // Enemy army remembered from an earlier frame, now out of sight.
        if let Some(map) = agent.map.as_mut() {
            map.set(Position::new(2, 0), Tile::with_army(TileType::Plain, Some(2), 1));
        }
        let threat = agent.detect_threat().unwrap();
        assert!(threat.queued > 0);
        let chase = agent.counter_attack().unwrap();
        assert_eq!(chase.color, 2);
        assert_eq!(chase.position, threat.position);
    }
}
