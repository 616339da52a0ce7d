//! Property-based tests for the observed map, the move queue and the route
//! search.
//!
//! Run with: cargo test --release prop_agent

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use gbot::agent::search::PathSearch;
use gbot::{Agent, AgentConfig, Map, MapDiff, MoveItem, MoveQueue, Position, Purpose, Tile, TileType};

const ME: u8 = 1;

fn tile_strategy() -> impl Strategy<Value = Tile> {
    (0u8..=5, prop::option::of(0u8..3), 0u32..40).prop_map(|(code, owner, army)| {
        let tile_type = TileType::try_from(code).unwrap();
        if tile_type == TileType::Fog {
            Tile::fog()
        } else {
            Tile::with_army(tile_type, owner, army)
        }
    })
}

/// A random frame together with its dimensions.
fn frame_strategy() -> impl Strategy<Value = (u16, u16, Vec<Tile>)> {
    (1u16..9, 1u16..9).prop_flat_map(|(w, h)| {
        (
            Just(w),
            Just(h),
            prop::collection::vec(tile_strategy(), usize::from(w) * usize::from(h)),
        )
    })
}

fn map_from(width: u16, height: u16, tiles: &[Tile]) -> Map {
    let mut map = Map::new(width, height).unwrap();
    assert!(map.replace_frame(tiles.to_vec()));
    map
}

fn diff_of(width: u16, height: u16, tiles: &[Tile]) -> MapDiff {
    MapDiff::from_map(&map_from(width, height, tiles))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Applying the same diff twice leaves the same grid and visibility.
    #[test]
    fn prop_apply_patch_idempotent((w, h, tiles) in frame_strategy()) {
        let mut agent = Agent::new(AgentConfig::default(), 0);
        agent.set_color(ME);
        agent.initialize(w, h);
        let diff = diff_of(w, h, &tiles);

        agent.apply_patch(&diff);
        let once = agent.map().unwrap().clone();
        agent.apply_patch(&diff);
        prop_assert_eq!(agent.map().unwrap(), &once);
        prop_assert_eq!(agent.map().unwrap().tiles(), tiles.as_slice());
    }

    /// A tile once revealed stays revealed, whatever later frames show.
    #[test]
    fn prop_visibility_monotone(
        (w, h, first) in frame_strategy(),
        seed in any::<u64>(),
    ) {
        let mut agent = Agent::new(AgentConfig::default(), seed);
        agent.set_color(ME);
        agent.initialize(w, h);
        agent.apply_patch(&diff_of(w, h, &first));
        let seen: Vec<Position> = agent
            .map()
            .unwrap()
            .iter()
            .map(|(pos, _)| pos)
            .filter(|&pos| agent.map().unwrap().is_visible(pos))
            .collect();

        // An all-fog frame reveals nothing and hides nothing.
        agent.apply_patch(&MapDiff::default());
        for pos in seen {
            prop_assert!(agent.map().unwrap().is_visible(pos));
        }
    }

    /// The queue hands items back in insertion order.
    #[test]
    fn prop_queue_fifo(xs in prop::collection::vec(0u16..100, 0..64)) {
        let queue = MoveQueue::new();
        let items: Vec<MoveItem> = xs
            .iter()
            .map(|&x| MoveItem {
                from: Position::new(x, 0),
                to: Position::new(x, 1),
                purpose: Purpose::ExpandLand,
                priority: i64::from(x),
                target: Position::new(x, 1),
            })
            .collect();
        for item in &items {
            queue.push_back(*item);
        }
        let mut drained = Vec::new();
        while let Some(item) = queue.pop_front() {
            drained.push(item);
        }
        prop_assert_eq!(drained, items);
    }

    /// Every edge of a retained route obeys the value recurrence and the
    /// budget bounds its length.
    #[test]
    fn prop_route_values_follow_recurrence(
        (w, h, tiles) in frame_strategy(),
        sx in 0u16..8,
        sy in 0u16..8,
        budget in 0usize..12,
    ) {
        let map = map_from(w, h, &tiles);
        let start = Position::new(sx % w, sy % h);
        let valuation = PathSearch::new(&map, ME).budget(budget).run(start);

        for (pos, _) in map.iter() {
            let path = valuation.path(pos);
            if path.is_empty() {
                continue;
            }
            prop_assert_eq!(path[0], start);
            prop_assert!(path.len() - 1 <= budget);
            prop_assert_eq!(valuation.steps(pos), Some(path.len() - 1));
            for step in path.windows(2) {
                let (a, b) = (step[0], step[1]);
                prop_assert_eq!(a.distance(b), 1);
                let tile = map.get(b).unwrap();
                prop_assert!(tile.tile_type.is_passable(false));
                let gain = if tile.is_owned_by(ME) {
                    tile.army_count()
                } else {
                    prop_assert!(tile.tile_type != TileType::City);
                    -tile.army_count()
                };
                prop_assert_eq!(
                    valuation.value(b).unwrap(),
                    valuation.value(a).unwrap() - 1 + gain
                );
            }
        }
    }

    /// Quick expansion only ever heads for tiles that were never revealed.
    #[test]
    fn prop_quick_expand_targets_unseen(
        (w, h, tiles) in frame_strategy(),
        gx in 0u16..8,
        gy in 0u16..8,
        army in 1u32..60,
        seed in any::<u64>(),
    ) {
        // Exactly one General of ours: demote any other to plain land.
        let mut tiles: Vec<Tile> = tiles
            .into_iter()
            .map(|t| {
                if t.tile_type == TileType::General && t.is_owned_by(ME) {
                    Tile { tile_type: TileType::Plain, ..t }
                } else {
                    t
                }
            })
            .collect();
        let general = Position::new(gx % w, gy % h);
        let idx = usize::from(general.x) * usize::from(h) + usize::from(general.y);
        tiles[idx] = Tile::with_army(TileType::General, Some(ME), army);

        let mut agent = Agent::new(AgentConfig::default(), seed);
        agent.set_color(ME);
        agent.initialize(w, h);
        agent.apply_patch(&diff_of(w, h, &tiles));
        prop_assert_eq!(agent.own_general(), Some(general));

        let len = agent.quick_expand();
        let items = agent.queue().snapshot();
        if len == 0 {
            prop_assert!(items.is_empty());
        } else {
            prop_assert_eq!(items.len(), len - 1);
            prop_assert_eq!(items[0].from, general);
            let destination = items[items.len() - 1].to;
            prop_assert!(!agent.map().unwrap().is_visible(destination));
            prop_assert!(items.iter().all(|m| m.target == destination));
        }
    }
}
