#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that enumerates landing tiles and plans
//! hop-by-hop paths across the board.

mod resolver;

pub use resolver::{landing_tiles, landing_tiles_in_order, path_to, DirectedSearch};

use loop_quest_core::{Command, Event};
use loop_quest_world::board::Board;
use tracing::{debug, warn};

/// Pure system that reacts to world events and emits movement commands.
#[derive(Debug, Default)]
pub struct Movement {
    searches: u64,
}

impl Movement {
    /// Consumes world events and the board to emit movement commands.
    ///
    /// A roll is answered with the destinations it can reach; a confirmed
    /// destination is answered with the path that leads there.
    pub fn handle(&mut self, events: &[Event], board: &Board, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::DiceRolled { roll, from, .. } => {
                    self.searches += 1;
                    let destinations = landing_tiles(board, *from, *roll);
                    debug!(%from, roll, count = destinations.len(), "destinations resolved");
                    out.push(Command::OfferDestinations {
                        roll: *roll,
                        destinations,
                    });
                }
                Event::DestinationConfirmed { from, roll, goal } => {
                    self.searches += 1;
                    match path_to(board, *from, *roll, *goal) {
                        Some(path) => {
                            debug!(%from, %goal, hops = path.len(), "path resolved");
                            out.push(Command::FollowPath { path });
                        }
                        None => warn!(%from, %goal, roll, "no path leads to the confirmed goal"),
                    }
                }
                _ => {}
            }
        }
    }

    /// Number of searches run since creation.
    #[must_use]
    pub const fn searches(&self) -> u64 {
        self.searches
    }
}
