//! The per-turn decision sequence.

use tracing::{debug, info, trace};

use crate::agent::{Agent, CommandSink, CounterAttack, MoveItem, Purpose};
use crate::game::{Map, Position};

impl Agent {
    /// Decide what to do on turn `turn` and send at most one command.
    ///
    /// Does nothing until the map and our color are known.
    pub fn on_turn<S: CommandSink + ?Sized>(&mut self, turn: u32, sink: &mut S) {
        self.turn = Some(turn);
        if self.map.is_none() || self.color.is_none() {
            debug!(turn, "turn skipped, game state incomplete");
            return;
        }

        if let Some(item) = self.next_valid_move() {
            trace!(turn, ?item, "sending queued move");
            sink.send(item.command());
            return;
        }
        if self.attack_generals() {
            debug!(turn, "routing toward enemy Generals");
            return;
        }
        if self.defend_general() {
            return;
        }
        if let Some(item) = self.continue_chase() {
            debug!(turn, x = item.to.x, y = item.to.y, "chasing");
            sink.send(item.command());
            return;
        }
        if self.detect_threat().is_some_and(|threat| threat.queued > 0) {
            return;
        }
        self.explore(turn);
    }

    /// Pop queued moves until one is still worth sending.
    ///
    /// A move is stale once its source is no longer ours, or once the goal of
    /// its route is already ours.
    fn next_valid_move(&self) -> Option<MoveItem> {
        let map = self.map.as_ref()?;
        let me = self.color?;
        while let Some(item) = self.queue.pop_front() {
            if !map.is_owned_by(item.from, me) {
                trace!(?item, "dropping move from lost tile");
                continue;
            }
            if item.purpose.has_goal() && map.is_owned_by(item.target, me) {
                trace!(?item, "dropping move toward reached goal");
                continue;
            }
            return Some(item);
        }
        None
    }

    fn attack_generals(&mut self) -> bool {
        if self.generals.enemies().is_empty() {
            return false;
        }
        let sightings = self.generals.enemies().to_vec();
        let chased = self.counter_attack.map(|chase| chase.color);
        let Some(planner) = self.planner() else {
            return false;
        };
        let budget = 2 * (usize::from(planner.map.width()) + usize::from(planner.map.height()));
        planner.queue.clear();
        for sighting in sightings {
            let priority = if chased == Some(sighting.color) {
                planner.config.counter_general_priority
            } else {
                planner.config.general_priority
            };
            planner.gather(Purpose::AttackGeneral, priority, sighting.position, budget);
        }
        true
    }

    /// Strike the first enemy tile visibly touching our General, then
    /// reinforce the General itself.
    fn defend_general(&mut self) -> bool {
        let Some(planner) = self.planner() else {
            return false;
        };
        let Some(general) = planner.general else {
            return false;
        };
        let map = planner.map;
        let Some(intruder) = general
            .surrounding(map.width(), map.height())
            .find(|&pos| map.is_visible(pos) && map.get(pos).is_some_and(|tile| tile.is_foreign_to(planner.me)))
        else {
            return false;
        };
        info!(x = general.x, y = general.y, enemy_x = intruder.x, enemy_y = intruder.y, "General under attack");
        let priority = planner.config.emergency_priority;
        let budget = planner.config.emergency_budget;
        planner.gather(Purpose::Defend, priority, intruder, budget);
        planner.gather(Purpose::Defend, priority, general, budget);
        true
    }

    /// Advance the chase by one step into the chased player's land.
    ///
    /// The chase ends once its head is no longer ours or has nowhere to go.
    fn continue_chase(&mut self) -> Option<MoveItem> {
        let chase = self.counter_attack?;
        let map = self.map.as_ref()?;
        let me = self.color?;
        let step = if map.is_owned_by(chase.position, me) {
            chase_step(map, chase)
        } else {
            None
        };
        let Some(to) = step else {
            debug!(color = chase.color, "chase ended");
            self.counter_attack = None;
            return None;
        };
        self.counter_attack = Some(CounterAttack { position: to, ..chase });
        Some(MoveItem {
            from: chase.position,
            to,
            purpose: Purpose::Attack,
            priority: self.config.chase_priority,
            target: to,
        })
    }

    fn explore(&mut self, turn: u32) {
        let period = self.config.expansion_period;
        let capture_cities = self.config.capture_cities;
        let next = turn.saturating_add(1);
        let Some(mut planner) = self.planner() else {
            return;
        };
        let queued = if next.checked_rem(period) == Some(0) {
            planner.quick_expand() > 0
        } else if next > period {
            planner.expand_land()
        } else {
            false
        };
        if !queued && capture_cities {
            planner.capture_city();
        }
    }
}

/// Pick the tile the chase moves onto: an unseen tile of the chased color
/// that does not cross a City, else any passable tile of that color.
fn chase_step(map: &Map, chase: CounterAttack) -> Option<Position> {
    let (adjacent, count) = chase.position.adjacent(map.width(), map.height());
    let neighbors = &adjacent[..usize::from(count)];
    let owned = |pos: Position, avoid_cities: bool| {
        map.get(pos)
            .is_some_and(|tile| tile.is_owned_by(chase.color) && tile.tile_type.is_passable(avoid_cities))
    };
    neighbors
        .iter()
        .copied()
        .find(|&pos| !map.is_visible(pos) && owned(pos, true))
        .or_else(|| neighbors.iter().copied().find(|&pos| owned(pos, false)))
}
