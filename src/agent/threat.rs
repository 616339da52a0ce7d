//! Detection of unseen incursions near our General.

use serde::Serialize;
use tracing::debug;

use crate::agent::Purpose;
use crate::agent::planner::Planner;
use crate::agent::search::weighted_pick;
use crate::game::{Color, Position};

/// An unseen cell close enough to our General that routing army to it pays off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Threat {
    /// The cell the incursion was traced to.
    pub position: Position,
    /// Route value minus distance to our General.
    pub score: i64,
    /// Who is attacking, when any tile on the way tells.
    pub color: Option<Color>,
    /// Length of the Defend route queued against it (0 if none).
    pub queued: usize,
}

impl Planner<'_> {
    /// Search around our General for an unseen cell worth defending against and
    /// queue a Defend gather toward it.
    ///
    /// Returns `None` without a General or without a positive unseen cell in
    /// range.
    pub(crate) fn detect_threat(&mut self) -> Option<Threat> {
        let general = self.general?;
        let valuation = self.search().budget(self.config.threat_budget).run(general);
        let candidates = valuation
            .candidates(true)
            .map(|(pos, value)| (pos, value - i64::from(general.distance(pos))));
        let (position, score) = weighted_pick(candidates, self.config.sample_retention, self.rng)?;

        // A fogged cell has no owner; fall back to the closest foreign tile
        // between it and our General.
        let color = valuation
            .path(position)
            .iter()
            .rev()
            .filter_map(|&pos| self.map.get(pos))
            .find(|tile| tile.is_foreign_to(self.me))
            .and_then(|tile| tile.owner);

        let queued = self.gather(Purpose::Defend, score, position, self.config.defend_budget);
        debug!(x = position.x, y = position.y, score, ?color, queued, "threat detected");
        Some(Threat {
            position,
            score,
            color,
            queued,
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::agent::MoveQueue;
    use crate::config::AgentConfig;
    use crate::game::{Map, Tile, TileType};

    const ME: Color = 1;

    fn detect(map: &Map, general: Option<Position>, queue: &MoveQueue) -> Option<Threat> {
        let config = AgentConfig::default();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut planner = Planner {
            map,
            me: ME,
            general,
            queue,
            config: &config,
            rng: &mut rng,
        };
        planner.detect_threat()
    }

    /// A 5x1 strip: our General at x=0 with a big army, everything else in fog.
    fn strip() -> Map {
        let mut map = Map::new(5, 1).unwrap();
        map.replace_frame(vec![
            Tile::with_army(TileType::General, Some(ME), 20),
            Tile::fog(),
            Tile::fog(),
            Tile::fog(),
            Tile::fog(),
        ]);
        map
    }

    #[test]
    fn test_threat_requires_general() {
        let map = strip();
        let queue = MoveQueue::new();
        assert_eq!(detect(&map, None, &queue), None);
    }

    #[test]
    fn test_threat_targets_unseen_cell() {
        let map = strip();
        let queue = MoveQueue::new();
        let threat = detect(&map, Some(Position::new(0, 0)), &queue).unwrap();
        assert!(!map.is_visible(threat.position));
        assert_eq!(
            threat.score,
            20 - i64::from(threat.position.x) - i64::from(threat.position.x)
        );
        // Fog has no owner and nothing on the way is foreign.
        assert_eq!(threat.color, None);
    }

    #[test]
    fn test_threat_color_from_route() {
        let mut map = strip();
        map.set(Position::new(1, 0), Tile::with_army(TileType::Plain, Some(4), 1));
        let queue = MoveQueue::new();
        let threat = detect(&map, Some(Position::new(0, 0)), &queue).unwrap();
        assert_eq!(threat.color, Some(4));
    }

    #[test]
    fn test_no_threat_when_everything_seen() {
        let mut map = Map::new(2, 1).unwrap();
        map.replace_frame(vec![
            Tile::with_army(TileType::General, Some(ME), 20),
            Tile::with_army(TileType::Plain, None, 0),
        ]);
        let queue = MoveQueue::new();
        assert_eq!(detect(&map, Some(Position::new(0, 0)), &queue), None);
        assert!(queue.is_empty());
    }
}
