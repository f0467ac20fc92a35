//! Headless frame loop that plays the game through the same systems an
//! interactive adapter would drive.

use std::time::Duration;

use clap::ValueEnum;
use loop_quest_core::{
    Command, Event, Modal, Phase, PlayerSnapshot, Stat, TileId, EXCHANGE_THRESHOLD,
};
use loop_quest_system_bootstrap::{Bootstrap, Hud};
use loop_quest_system_controls::{ControlInput, Controls};
use loop_quest_system_movement::Movement;
use loop_quest_world::{self as world, query, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

/// How the autopilot chooses among offered destinations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum Strategy {
    /// Always take the first destination in board order.
    #[default]
    First,
    /// Cycle to a randomly chosen destination.
    Random,
}

/// Result of an autoplay session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) turns: u32,
    pub(crate) frames: u64,
    pub(crate) player: PlayerSnapshot,
}

/// Produces one frame of input from what the HUD shows.
#[derive(Debug)]
struct Autopilot {
    strategy: Strategy,
    rng: ChaCha8Rng,
    target: Option<usize>,
    shopped_at: Option<TileId>,
    purchased: bool,
}

impl Autopilot {
    fn input(&mut self, world: &World, hud: &Hud) -> ControlInput {
        let press = ControlInput::default();
        match hud.modal {
            Modal::Inventory => match exchangeable(world) {
                Some(Stat::Strength) => ControlInput {
                    slot: Some(0),
                    ..press
                },
                Some(Stat::Magic) => ControlInput {
                    slot: Some(1),
                    ..press
                },
                None => ControlInput {
                    cancel: true,
                    ..press
                },
            },
            Modal::Shop => {
                let affordable = hud.shop.as_ref().and_then(|shop| {
                    shop.offers
                        .iter()
                        .position(|offer| offer.price <= hud.player.stats.gold)
                });
                match affordable {
                    Some(slot) if !self.purchased => {
                        self.purchased = true;
                        ControlInput {
                            slot: Some(slot),
                            ..press
                        }
                    }
                    _ => ControlInput {
                        cancel: true,
                        ..press
                    },
                }
            }
            Modal::Card => ControlInput {
                confirm: true,
                ..press
            },
            Modal::Phase(Phase::Idle) => {
                self.purchased = false;
                if exchangeable(world).is_some() {
                    ControlInput {
                        inventory: true,
                        ..press
                    }
                } else if hud.nearby_shop.is_some() && self.shopped_at != Some(hud.player.at) {
                    self.shopped_at = Some(hud.player.at);
                    ControlInput {
                        interact: true,
                        ..press
                    }
                } else {
                    ControlInput {
                        roll: true,
                        ..press
                    }
                }
            }
            Modal::Phase(Phase::TargetSelect) => self.select(hud),
            Modal::Phase(Phase::Animating) => press,
        }
    }

    fn select(&mut self, hud: &Hud) -> ControlInput {
        let press = ControlInput::default();
        let offered = hud.turn.destinations.len();
        if offered == 0 {
            return ControlInput {
                cancel: true,
                ..press
            };
        }
        let target = *self.target.get_or_insert_with(|| match self.strategy {
            Strategy::First => 0,
            Strategy::Random => self.rng.gen_range(0..offered),
        });
        if hud.turn.selected == target {
            self.target = None;
            ControlInput {
                confirm: true,
                ..press
            }
        } else {
            ControlInput {
                next: true,
                ..press
            }
        }
    }
}

fn exchangeable(world: &World) -> Option<Stat> {
    let player = query::player(world);
    [Stat::Strength, Stat::Magic]
        .into_iter()
        .find(|stat| player.trophy_total(*stat) >= EXCHANGE_THRESHOLD)
}

/// Drives a world for a number of turns using scripted input.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    movement: Movement,
    controls: Controls,
    pilot: Autopilot,
    frame: Duration,
}

impl Session {
    pub(crate) fn new(world: World, strategy: Strategy, rng: ChaCha8Rng, frame: Duration) -> Self {
        Self {
            world,
            movement: Movement::default(),
            controls: Controls::default(),
            pilot: Autopilot {
                strategy,
                rng,
                target: None,
                shopped_at: None,
                purchased: false,
            },
            frame,
        }
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Plays until `turns` rolls have completed and the board is idle again,
    /// or until `max_frames` frames have elapsed.
    pub(crate) fn run(&mut self, turns: u32, max_frames: u64) -> Summary {
        let bootstrap = Bootstrap;
        let mut events = Vec::new();
        let mut frames = 0;

        while frames < max_frames {
            let hud = bootstrap.hud(&self.world);
            if hud.turn.turn >= turns && hud.modal == Modal::Phase(Phase::Idle) {
                break;
            }
            frames += 1;

            let input = self.pilot.input(&self.world, &hud);
            let view = bootstrap.control_view(&self.world);
            let mut commands = Vec::new();
            self.controls.handle(&events, input, &view, &mut commands);
            events.clear();

            commands.push(Command::Tick { dt: self.frame });
            for command in commands {
                self.pump(command, &mut events);
            }
            for event in &events {
                if let Event::MovementFinished { at } = event {
                    debug!(%at, frame = frames, "landed");
                }
            }
        }

        let summary = Summary {
            turns: query::turn_snapshot(&self.world).turn,
            frames,
            player: query::player_snapshot(&self.world),
        };
        info!(
            turns = summary.turns,
            frames = summary.frames,
            gold = summary.player.stats.gold,
            "autoplay finished"
        );
        summary
    }

    fn pump(&mut self, command: Command, log: &mut Vec<Event>) {
        let mut pending = vec![command];
        while !pending.is_empty() {
            let mut events = Vec::new();
            for command in pending.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            self.movement.handle(&events, query::board(&self.world), &mut pending);
            log.extend(events);
        }
    }
}
