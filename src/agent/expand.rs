//! Territory growth: quick expansion into the unknown, broad land sweeps and
//! City captures.

use rand::seq::SliceRandom;
use tracing::debug;

use crate::agent::Purpose;
use crate::agent::planner::Planner;
use crate::agent::search::{Orientation, route_moves, weighted_pick};
use crate::game::{Position, TileType};

impl Planner<'_> {
    /// Push army from our General out to a never-seen cell.
    ///
    /// The destination is sampled among the positive-valued unseen cells of
    /// an unbounded search. Returns the route length in cells.
    pub(crate) fn quick_expand(&mut self) -> usize {
        let Some(general) = self.general else {
            return 0;
        };
        let valuation = self.search().run(general);
        let Some((destination, value)) =
            weighted_pick(valuation.candidates(true), self.config.sample_retention, self.rng)
        else {
            debug!("quick expand found no unseen destination");
            return 0;
        };
        let path = valuation.path(destination);
        let moves = route_moves(
            &path,
            Orientation::Outward,
            Purpose::ExpandLand,
            self.config.quick_expand_priority,
        );
        for item in moves {
            self.queue.push_back(item);
        }
        debug!(x = destination.x, y = destination.y, value, len = path.len(), "quick expand queued");
        path.len()
    }

    /// Try to take every Plain tile that is not ours yet, one narrow gather
    /// each in random order. If none of them finds a route, force a wider
    /// gather toward the first one.
    ///
    /// Returns whether anything was queued.
    pub(crate) fn expand_land(&mut self) -> bool {
        let mut targets: Vec<Position> = self
            .map
            .iter()
            .filter(|(_, tile)| tile.tile_type == TileType::Plain && !tile.is_owned_by(self.me))
            .map(|(pos, _)| pos)
            .collect();
        if targets.is_empty() {
            return false;
        }
        targets.shuffle(self.rng);

        let mut expanded = 0usize;
        for &target in &targets {
            if self.gather(
                Purpose::ExpandLand,
                self.config.expand_priority,
                target,
                self.config.expand_narrow_budget,
            ) > 0
            {
                expanded += 1;
            }
        }
        debug!(candidates = targets.len(), expanded, "land expansion");
        if expanded > 0 {
            return true;
        }

        self.gather(
            Purpose::ExpandLand,
            self.config.expand_priority,
            targets[0],
            self.config.expand_fallback_budget,
        ) > 0
    }

    /// Gather toward the visible City that is cheapest to take: least army
    /// plus distance from our General.
    ///
    /// Returns whether anything was queued.
    pub(crate) fn capture_city(&self) -> bool {
        let Some(general) = self.general else {
            return false;
        };
        let target = self
            .map
            .iter()
            .filter(|(pos, tile)| {
                tile.tile_type == TileType::City && !tile.is_owned_by(self.me) && self.map.is_visible(*pos)
            })
            .min_by_key(|(pos, tile)| tile.army_count() + i64::from(general.distance(*pos)))
            .map(|(pos, _)| pos);
        let Some(target) = target else {
            return false;
        };
        debug!(x = target.x, y = target.y, "City capture");
        self.gather(
            Purpose::ExpandCity,
            self.config.city_priority,
            target,
            self.config.city_budget,
        ) > 0
    }
}
