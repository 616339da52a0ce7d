//! Budget-bounded, value-maximizing route search.
//!
//! A breadth-first expansion from one start cell scores every reachable cell
//! by the army a route would carry: each step costs one unit, our own tiles
//! add their army and everybody else's subtract it. Only the best-scoring
//! parent of each cell is kept, so the routes form a tree rooted at the start
//! and a route is recovered by walking parent links.

use std::collections::VecDeque;

use rand::Rng;

use crate::agent::{MoveItem, Purpose};
use crate::game::{Color, Map, Position, Tile, TileType};

/// Which way the moves of a route run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// From the far end back to the search start; armies converge on it.
    Inward,
    /// From the search start out to the far end.
    Outward,
}

#[derive(Debug, Clone, Copy)]
struct Record {
    value: i64,
    steps: usize,
    parent: Option<usize>,
}

/// Search parameters bound to one observed map.
#[derive(Debug, Clone, Copy)]
pub struct PathSearch<'a> {
    map: &'a Map,
    me: Color,
    budget: Option<usize>,
    avoid_cities: bool,
}

impl<'a> PathSearch<'a> {
    /// An unbounded search from `me`'s point of view.
    #[must_use]
    pub const fn new(map: &'a Map, me: Color) -> Self {
        Self {
            map,
            me,
            budget: None,
            avoid_cities: false,
        }
    }

    /// Stop expanding cells that are `budget` steps from the start.
    #[must_use]
    pub const fn budget(mut self, budget: usize) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Treat every City as impassable, ours included.
    #[must_use]
    pub const fn avoid_cities(mut self, avoid: bool) -> Self {
        self.avoid_cities = avoid;
        self
    }

    /// What entering `tile` adds to a route, or `None` if it cannot be entered.
    fn gain(&self, tile: &Tile) -> Option<i64> {
        if !tile.tile_type.is_passable(self.avoid_cities) {
            return None;
        }
        if tile.is_owned_by(self.me) {
            Some(tile.army_count())
        } else if tile.tile_type == TileType::City {
            None
        } else {
            Some(-tile.army_count())
        }
    }

    /// Score every cell reachable from `start`.
    ///
    /// An out-of-bounds start yields an empty valuation.
    #[must_use]
    pub fn run(&self, start: Position) -> Valuation<'a> {
        let map = self.map;
        let mut records: Vec<Option<Record>> = vec![None; map.len()];
        let Some(origin) = map.index_of(start) else {
            return Valuation {
                map,
                origin: None,
                records,
            };
        };

        let value = map.get(start).map_or(0, |tile| {
            if tile.is_owned_by(self.me) {
                tile.army_count()
            } else {
                -tile.army_count()
            }
        });
        records[origin] = Some(Record {
            value,
            steps: 0,
            parent: None,
        });

        let mut finalized = vec![false; map.len()];
        let mut queued = vec![false; map.len()];
        let mut frontier = VecDeque::from([origin]);
        queued[origin] = true;

        while let Some(idx) = frontier.pop_front() {
            finalized[idx] = true;
            let Some(current) = records[idx] else {
                continue;
            };
            if self.budget.is_some_and(|budget| current.steps >= budget) {
                continue;
            }

            let (adjacent, count) = map.position_of(idx).adjacent(map.width(), map.height());
            for next in &adjacent[..usize::from(count)] {
                let Some(next_idx) = map.index_of(*next) else {
                    continue;
                };
                if finalized[next_idx] {
                    continue;
                }
                let Some(gain) = self.gain(&map.tiles()[next_idx]) else {
                    continue;
                };
                let value = current.value - 1 + gain;
                if records[next_idx].is_some_and(|r| r.value >= value) {
                    continue;
                }
                records[next_idx] = Some(Record {
                    value,
                    steps: current.steps + 1,
                    parent: Some(idx),
                });
                if !queued[next_idx] {
                    queued[next_idx] = true;
                    frontier.push_back(next_idx);
                }
            }
        }

        Valuation {
            map,
            origin: Some(origin),
            records,
        }
    }
}

/// Result of a [`PathSearch`]: a value and a best route for every reached cell.
#[derive(Debug, Clone)]
pub struct Valuation<'a> {
    map: &'a Map,
    origin: Option<usize>,
    records: Vec<Option<Record>>,
}

impl Valuation<'_> {
    fn record(&self, pos: Position) -> Option<Record> {
        self.map.index_of(pos).and_then(|idx| self.records[idx])
    }

    /// Where the search started, if it was on the map.
    #[must_use]
    pub fn start(&self) -> Option<Position> {
        self.origin.map(|idx| self.map.position_of(idx))
    }

    /// Value of the best route reaching `pos`.
    #[must_use]
    pub fn value(&self, pos: Position) -> Option<i64> {
        self.record(pos).map(|r| r.value)
    }

    /// Steps from the start to `pos` along its best route.
    #[must_use]
    pub fn steps(&self, pos: Position) -> Option<usize> {
        self.record(pos).map(|r| r.steps)
    }

    /// The best route from the start to `pos`, start first.
    ///
    /// Empty if `pos` was not reached.
    #[must_use]
    pub fn path(&self, pos: Position) -> Vec<Position> {
        let mut path = Vec::new();
        let mut cursor = self.map.index_of(pos);
        while let Some(idx) = cursor {
            let Some(record) = self.records[idx] else {
                break;
            };
            path.push(self.map.position_of(idx));
            cursor = record.parent;
        }
        path.reverse();
        path
    }

    /// Reached cells other than the start with a positive value, in storage
    /// order. With `unseen_only`, cells that were ever revealed are skipped.
    pub fn candidates(&self, unseen_only: bool) -> impl Iterator<Item = (Position, i64)> + '_ {
        self.records
            .iter()
            .enumerate()
            .filter_map(|(idx, record)| record.map(|r| (idx, r)))
            .filter(|(_, r)| r.steps >= 1 && r.value > 0)
            .map(|(idx, r)| (self.map.position_of(idx), r.value))
            .filter(move |(pos, _)| !unseen_only || !self.map.is_visible(*pos))
    }

    /// The highest-valued candidate; ties go to the first in storage order.
    #[must_use]
    pub fn best(&self, unseen_only: bool) -> Option<(Position, i64)> {
        self.candidates(unseen_only)
            .fold(None, |held: Option<(Position, i64)>, (pos, value)| match held {
                Some((_, best)) if best >= value => held,
                _ => Some((pos, value)),
            })
    }
}

/// Break a start-first route into single-step moves.
///
/// Inward routes run from the far end to the start and target the start;
/// outward routes run the other way and target the far end. Routes shorter
/// than two cells produce nothing.
#[must_use]
pub fn route_moves(
    path: &[Position],
    orientation: Orientation,
    purpose: Purpose,
    priority: i64,
) -> Vec<MoveItem> {
    let (Some(&first), Some(&last)) = (path.first(), path.last()) else {
        return Vec::new();
    };
    match orientation {
        Orientation::Inward => path
            .windows(2)
            .rev()
            .map(|step| MoveItem {
                from: step[1],
                to: step[0],
                purpose,
                priority,
                target: first,
            })
            .collect(),
        Orientation::Outward => path
            .windows(2)
            .map(|step| MoveItem {
                from: step[0],
                to: step[1],
                purpose,
                priority,
                target: last,
            })
            .collect(),
    }
}

/// Pick one item, biased toward later ones.
///
/// The first item is held; every later item replaces the held one with
/// probability `retention`. The rng is only consulted from the second item
/// on. `retention` must lie in `[0, 1]`.
pub fn weighted_pick<T, R>(items: impl IntoIterator<Item = T>, retention: f64, rng: &mut R) -> Option<T>
where
    R: Rng + ?Sized,
{
    let mut held = None;
    for item in items {
        if held.is_none() || rng.gen_bool(retention) {
            held = Some(item);
        }
    }
    held
}
