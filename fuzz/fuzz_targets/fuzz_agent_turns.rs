#![no_main]

//! Multi-turn agent fuzzer.
//!
//! Builds arbitrary frames on a small board and runs the full turn policy
//! over them. Every command must be a single step that starts on a tile the
//! frame shows as ours.

use arbitrary::Arbitrary;
use gbot::{Agent, AgentConfig, Command, MapDiff, Tile, TileType};
use libfuzzer_sys::fuzz_target;

const ME: u8 = 1;

/// A fuzzer-generated tile.
#[derive(Arbitrary, Debug, Clone, Copy)]
struct FuzzTile {
    code: u8,
    owner: Option<u8>,
    army: Option<u16>,
}

/// Structured input: board shape, seed and the frames to play.
#[derive(Arbitrary, Debug)]
struct TurnsInput {
    width: u8,
    height: u8,
    seed: u64,
    capture_cities: bool,
    frames: Vec<Vec<FuzzTile>>,
}

fuzz_target!(|input: TurnsInput| {
    // Cap sizes to keep each run short
    let width = u16::from(input.width % 12);
    let height = u16::from(input.height % 12);
    let len = usize::from(width) * usize::from(height);

    let config = AgentConfig {
        capture_cities: input.capture_cities,
        ..AgentConfig::default()
    };
    let mut agent = Agent::new(config, input.seed);
    agent.set_color(ME);
    agent.initialize(width, height);

    for (turn, frame) in input.frames.iter().take(40).enumerate() {
        let entries: Vec<(usize, Tile)> = frame
            .iter()
            .take(len)
            .enumerate()
            .filter_map(|(idx, t)| {
                let tile_type = TileType::try_from(t.code % 6).ok()?;
                Some((
                    idx,
                    Tile {
                        tile_type,
                        owner: t.owner.map(|o| o % 4),
                        army: t.army.map(u32::from),
                    },
                ))
            })
            .collect();
        let diff = MapDiff::new(entries);
        agent.apply_patch(&diff);

        let mut sink: Vec<Command> = Vec::new();
        agent.on_turn(turn as u32, &mut sink);
        assert!(sink.len() <= 1, "more than one command on turn {turn}");

        if let Some(&Command::Attack { from, to, .. }) = sink.first() {
            assert_eq!(from.distance(to), 1, "non-adjacent move {from:?} -> {to:?}");
            let map = agent.map().expect("commands need a map");
            assert!(map.is_owned_by(from, ME), "move from a tile we do not hold");
            assert!(to.x < width && to.y < height);
        }
    }
});
