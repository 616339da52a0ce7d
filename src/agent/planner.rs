//! Borrowed view of the agent that the route-planning helpers work against.

use rand::rngs::SmallRng;
use tracing::debug;

use crate::agent::search::{Orientation, PathSearch, route_moves};
use crate::agent::{MoveQueue, Purpose};
use crate::config::AgentConfig;
use crate::game::{Color, Map, Position};

/// Everything a planning step reads, plus the queue it fills and the rng it
/// samples with. Only built once the map and our color are known.
#[derive(Debug)]
pub(crate) struct Planner<'a> {
    pub(crate) map: &'a Map,
    pub(crate) me: Color,
    pub(crate) general: Option<Position>,
    pub(crate) queue: &'a MoveQueue,
    pub(crate) config: &'a AgentConfig,
    pub(crate) rng: &'a mut SmallRng,
}

impl<'a> Planner<'a> {
    /// A search from our point of view on the current map.
    pub(crate) const fn search(&self) -> PathSearch<'a> {
        PathSearch::new(self.map, self.me)
    }

    /// Route the most army that can reach `goal` within `budget` steps toward it.
    ///
    /// Queues one move per step of the best route, all targeting `goal`, and
    /// returns the route length in cells (0 when no route gains anything).
    pub(crate) fn gather(&self, purpose: Purpose, priority: i64, goal: Position, budget: usize) -> usize {
        let valuation = self.search().budget(budget).run(goal);
        let Some((source, value)) = valuation.best(false) else {
            debug!(?purpose, x = goal.x, y = goal.y, budget, "gather found no route");
            return 0;
        };
        let path = valuation.path(source);
        for item in route_moves(&path, Orientation::Inward, purpose, priority) {
            self.queue.push_back(item);
        }
        debug!(
            ?purpose,
            priority,
            value,
            from_x = source.x,
            from_y = source.y,
            to_x = goal.x,
            to_y = goal.y,
            len = path.len(),
            "gather queued"
        );
        path.len()
    }
}
