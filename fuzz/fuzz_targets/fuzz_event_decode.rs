#![no_main]

//! Inbound event decoder fuzzer.
//!
//! Feeds arbitrary bytes through the event decoder. Whatever decodes is then
//! handed to an agent that already has a color and a small map, so malformed
//! diffs (indices past the end, odd tile codes) reach the map code too.

use gbot::{Agent, AgentConfig, Command, Event};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(event) = serde_json::from_slice::<Event>(data) else {
        return;
    };

    let mut agent = Agent::new(AgentConfig::default(), 0);
    agent.set_color(1);
    agent.initialize(6, 6);

    let mut sink: Vec<Command> = Vec::new();
    agent.handle(event, &mut sink);
    assert!(sink.len() <= 1, "more than one command for one event");
});
