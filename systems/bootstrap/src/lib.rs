#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the Loop Quest experience for presentation.

use loop_quest_core::{Card, Modal, PlayerSnapshot, Resolution, ShopSnapshot, TileId, TurnSnapshot};
use loop_quest_system_controls::ControlView;
use loop_quest_world::{board::Census, query, World};

/// Summary of a freshly generated board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Overview {
    /// Loop counts by kind.
    pub census: Census,
    /// Region names in theme order.
    pub themes: Vec<String>,
}

/// Everything a heads-up display shows for one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hud {
    /// Player position, attributes and cards.
    pub player: PlayerSnapshot,
    /// Turn progress and destinations.
    pub turn: TurnSnapshot,
    /// Topmost modal.
    pub modal: Modal,
    /// Name of the region the player stands in, if any.
    pub region: Option<String>,
    /// Shop the player could enter from here.
    pub nearby_shop: Option<TileId>,
    /// Open shop overlay.
    pub shop: Option<ShopSnapshot>,
    /// Encounter card and its resolution, once resolved.
    pub card: Option<(Card, Option<Resolution>)>,
}

/// Produces data required to greet and inform the player.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner(&self, world: &World) -> &'static str {
        query::welcome_banner(world)
    }

    /// Summarises the board the world generated.
    #[must_use]
    pub fn overview(&self, world: &World) -> Overview {
        let board = query::board(world);
        Overview {
            census: board.census(),
            themes: query::config(world)
                .generation
                .themes
                .iter()
                .map(|theme| theme.name.clone())
                .collect(),
        }
    }

    /// Captures the heads-up display for the current frame.
    #[must_use]
    pub fn hud(&self, world: &World) -> Hud {
        let player = query::player_snapshot(world);
        let region = query::board(world)
            .theme_of(player.at.loop_index())
            .map(|theme| theme.name.clone());
        Hud {
            region,
            turn: query::turn_snapshot(world),
            modal: query::active_modal(world),
            nearby_shop: query::nearby_shop(world),
            shop: query::open_shop(world),
            card: query::active_card(world)
                .map(|(card, resolution)| (card.clone(), resolution.cloned())),
            player,
        }
    }

    /// Distils the facts the input dispatcher needs from the world.
    #[must_use]
    pub fn control_view(&self, world: &World) -> ControlView {
        ControlView {
            modal: query::active_modal(world),
            destinations: query::turn_snapshot(world).destinations.len(),
            inventory_cards: query::player(world).cards().len(),
            card_resolved: query::active_card(world)
                .is_some_and(|(_, resolution)| resolution.is_some()),
        }
    }
}
