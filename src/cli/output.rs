//! Output formatting utilities for CLI.

use gbot::Command;
use gbot::replay::TurnRecord;
use serde::Serialize;

/// JSON-serializable replay result.
#[derive(Debug, Serialize)]
pub(super) struct JsonReplay<'a> {
    /// Random seed used (null if seeded from entropy).
    pub(super) seed: Option<u64>,
    /// Number of turns replayed.
    pub(super) turns_played: usize,
    /// Number of commands sent.
    pub(super) commands_sent: usize,
    /// Per-turn decisions.
    pub(super) turns: &'a [TurnRecord],
}

impl<'a> JsonReplay<'a> {
    /// Create from replay records.
    pub(super) fn new(seed: Option<u64>, turns: &'a [TurnRecord]) -> Self {
        Self {
            seed,
            turns_played: turns.len(),
            commands_sent: turns.iter().filter(|t| t.command.is_some()).count(),
            turns,
        }
    }
}

/// Format replay records as human-readable text, one line per turn.
pub(super) fn format_text(records: &[TurnRecord]) -> String {
    let mut output = String::new();

    for record in records {
        output.push_str(&format!("turn {:>4}: ", record.turn));
        match record.command {
            Some(Command::Attack { from, to, half }) => {
                output.push_str(&format!("attack ({},{}) -> ({},{})", from.x, from.y, to.x, to.y));
                if half {
                    output.push_str(" half");
                }
            }
            None => output.push_str("idle"),
        }
        output.push_str(&format!(
            "  land {} army {} queued {}",
            record.land, record.army, record.queued
        ));
        if let Some(chase) = record.counter_attack {
            output.push_str(&format!(
                "  chasing {} at ({},{})",
                chase.color, chase.position.x, chase.position.y
            ));
        }
        output.push('\n');
    }

    let sent = records.iter().filter(|r| r.command.is_some()).count();
    output.push_str(&format!("{} turns, {sent} commands\n", records.len()));
    output
}
