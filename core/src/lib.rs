#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Loop Quest engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Loop Quest.";

/// Number of faces on the movement and combat die.
pub const DIE_FACES: u32 = 6;

/// Number of card slots offered by every shop.
pub const SHOP_SLOTS: usize = 3;

/// Trophy total required before an exchange converts cards into a stat point.
pub const EXCHANGE_THRESHOLD: u32 = 7;

/// Upper bound applied to the player's health.
pub const MAX_HEALTH: u32 = 10;

/// Stage of the turn cycle currently active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No roll is pending; the player may roll or open menus.
    #[default]
    Idle,
    /// Destinations were enumerated and the player is choosing one.
    TargetSelect,
    /// The confirmed path is being played back hop by hop.
    Animating,
}

/// Interaction layer that currently owns player input.
///
/// Layers are ranked `Inventory > Shop > Card > Phase`; the highest open
/// layer consumes input exclusively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Modal {
    /// The inventory and exchange overlay is open.
    Inventory,
    /// A shop overlay is open.
    Shop,
    /// An encounter card awaits resolution or dismissal.
    Card,
    /// No overlay is open; input drives the turn phase.
    Phase(Phase),
}

/// Fixed walking direction used while resolving a roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Travel {
    /// Follows each tile's `next` link.
    Clockwise,
    /// Follows each tile's `prev` link.
    CounterClockwise,
}

impl Travel {
    /// Both directions in resolution priority order.
    pub const ALL: [Travel; 2] = [Travel::Clockwise, Travel::CounterClockwise];

    /// Returns the opposite walking direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
        }
    }
}

/// Cardinal headings on the layout grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Heading {
    /// Toward increasing column indices.
    Right,
    /// Toward decreasing column indices.
    Left,
    /// Toward decreasing row indices.
    Up,
    /// Toward increasing row indices.
    Down,
}

impl Heading {
    /// Every heading in canonical order.
    pub const ALL: [Heading; 4] = [Heading::Right, Heading::Left, Heading::Up, Heading::Down];

    /// Heading pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Right => Self::Left,
            Self::Left => Self::Right,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    /// Unit grid offset associated with the heading.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Right => (1, 0),
            Self::Left => (-1, 0),
            Self::Up => (0, -1),
            Self::Down => (0, 1),
        }
    }
}

/// Identifies a tile by the loop that owns it and its position in that loop.
///
/// Ordering compares the loop index first and the tile index second, which is
/// the presentation order for destination lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId {
    loop_index: usize,
    tile_index: usize,
}

impl TileId {
    /// Creates a new tile identifier.
    #[must_use]
    pub const fn new(loop_index: usize, tile_index: usize) -> Self {
        Self {
            loop_index,
            tile_index,
        }
    }

    /// Index of the loop that owns the tile.
    #[must_use]
    pub const fn loop_index(&self) -> usize {
        self.loop_index
    }

    /// Index of the tile within its loop.
    #[must_use]
    pub const fn tile_index(&self) -> usize {
        self.tile_index
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.loop_index, self.tile_index)
    }
}

/// Signed cell coordinate on the unbounded layout grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    x: i32,
    y: i32,
}

impl GridCell {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the neighbouring cell `distance` steps along `heading`.
    #[must_use]
    pub const fn stepped(self, heading: Heading, distance: i32) -> Self {
        let (dx, dy) = heading.offset();
        Self {
            x: self.x + dx * distance,
            y: self.y + dy * distance,
        }
    }
}

/// Colour assigned to a region loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoopColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl LoopColor {
    /// Creates a new colour from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Category of an encounter or shop card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    /// Fought with strength.
    Monster,
    /// Fought with magic.
    MagicMonster,
    /// Grants its stats immediately.
    Buff,
    /// Bought from a shop; grants its stats on purchase.
    ShopItem,
}

/// Immutable card value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Category of the card.
    pub kind: CardKind,
    /// Strength carried by the card.
    #[serde(default)]
    pub strength: u32,
    /// Magic carried by the card.
    #[serde(default)]
    pub magic: u32,
    /// Headline shown when the card is revealed.
    pub title: String,
    /// Flavour text shown beneath the title.
    #[serde(default)]
    pub text: String,
}

impl Card {
    /// Creates a new card value.
    #[must_use]
    pub fn new(
        kind: CardKind,
        strength: u32,
        magic: u32,
        title: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            strength,
            magic,
            title: title.into(),
            text: text.into(),
        }
    }

    /// Reports whether the card must be fought rather than collected.
    #[must_use]
    pub const fn is_monster(&self) -> bool {
        matches!(self.kind, CardKind::Monster | CardKind::MagicMonster)
    }

    /// Short label used in log lines.
    #[must_use]
    pub fn label(&self) -> String {
        match self.kind {
            CardKind::Monster => format!("Monster(STR {})", self.strength),
            CardKind::MagicMonster => format!("Magic Monster(MAG {})", self.magic),
            CardKind::Buff if self.strength > 0 => format!("Buff(+{} STR)", self.strength),
            CardKind::Buff => format!("Buff(+{} MAG)", self.magic),
            CardKind::ShopItem => self.title.clone(),
        }
    }
}

/// Themed personality running a shop; selects its stock deck and names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeeperKind {
    /// Arcane trinkets, mostly magic.
    Mystic,
    /// Brutal weapons, mostly strength.
    Ogre,
    /// Jungle goods with mixed stats.
    Monkey,
    /// Farmyard curiosities.
    Pig,
    /// Treasures from the deep.
    Dolphin,
}

impl KeeperKind {
    /// Every keeper kind in catalog order.
    pub const ALL: [KeeperKind; 5] = [
        KeeperKind::Mystic,
        KeeperKind::Ogre,
        KeeperKind::Monkey,
        KeeperKind::Pig,
        KeeperKind::Dolphin,
    ];
}

/// Player attribute that exchanges can raise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stat {
    /// Physical power used against monsters.
    Strength,
    /// Arcane power used against magic monsters.
    Magic,
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strength => f.write_str("STR"),
            Self::Magic => f.write_str("MAG"),
        }
    }
}

/// Result of a fight against a monster card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The player's total exceeded the monster's.
    Win,
    /// The monster's total exceeded the player's.
    Loss,
    /// Both totals were equal.
    Tie,
}

/// Numeric player attributes captured at a single moment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Stats {
    /// Strength attribute.
    pub strength: u32,
    /// Magic attribute.
    pub magic: u32,
    /// Remaining health.
    pub health: u32,
    /// Gold carried.
    pub gold: u32,
}

/// Full record of a card interaction, used for modal display and logging.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// Card that was resolved.
    pub card: Card,
    /// Fight result; `None` for cards that are simply collected.
    pub outcome: Option<Outcome>,
    /// Face rolled for the player, zero when no fight took place.
    pub player_die: u32,
    /// Face rolled for the monster, zero when no fight took place.
    pub monster_die: u32,
    /// Player attribute plus die.
    pub player_total: u32,
    /// Monster attribute plus die.
    pub monster_total: u32,
    /// Attributes before the card was applied.
    pub before: Stats,
    /// Attributes after the card was applied.
    pub after: Stats,
    /// One-line summary suitable for a toast.
    pub message: String,
}

/// Read-only snapshot of the player used by presentation layers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Tile currently occupied.
    pub at: TileId,
    /// Numeric attributes.
    pub stats: Stats,
    /// Collected cards in acquisition order.
    pub cards: Vec<Card>,
}

/// Read-only snapshot of turn progress.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnSnapshot {
    /// Number of rolls taken so far.
    pub turn: u32,
    /// Most recent die face.
    pub last_roll: u32,
    /// Hops left in the current roll or animation.
    pub steps_remaining: u32,
    /// Active phase.
    pub phase: Phase,
    /// Candidate landing tiles, sorted by loop then tile.
    pub destinations: Vec<TileId>,
    /// Index into `destinations` of the highlighted candidate.
    pub selected: usize,
    /// Remaining hops of the confirmed path.
    pub path: Vec<TileId>,
}

/// One purchasable offer in a shop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShopOffer {
    /// Card sold in the slot.
    pub card: Card,
    /// Price in gold.
    pub price: u32,
}

/// Read-only snapshot of a shop used by presentation layers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShopSnapshot {
    /// Tile that hosts the shop.
    pub tile: TileId,
    /// Display name.
    pub name: String,
    /// Keeper personality.
    pub keeper: KeeperKind,
    /// Offers in slot order.
    pub offers: Vec<ShopOffer>,
    /// Whether the player has entered the shop before.
    pub discovered: bool,
}

/// Reasons the world refuses a command.
///
/// The `Display` form is the message shown to the player.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// The command is not valid in the current turn phase.
    #[error("cannot do that while {phase:?}")]
    WrongPhase {
        /// Phase that was active.
        phase: Phase,
    },
    /// A different overlay currently owns input.
    #[error("close the {modal:?} first")]
    Blocked {
        /// Overlay that blocked the command.
        modal: Modal,
    },
    /// Confirmation was attempted without any legal destination.
    #[error("no valid moves for this roll")]
    NoDestinations,
    /// A path did not match the confirmed destination.
    #[error("path does not lead to the confirmed destination")]
    MismatchedPath,
    /// No shop is linked to the player's tile.
    #[error("there is no shop here")]
    NoShopNearby,
    /// A shop command arrived while no shop was open.
    #[error("no shop is open")]
    ShopNotOpen,
    /// An exchange was requested outside the inventory overlay.
    #[error("open the inventory first")]
    InventoryNotOpen,
    /// The requested shop slot does not exist.
    #[error("shop slot {slot} does not exist")]
    InvalidSlot {
        /// Slot that was requested.
        slot: usize,
    },
    /// The player cannot afford the selected offer.
    #[error("Not enough gold! Need {price}, have {gold}")]
    InsufficientGold {
        /// Price of the offer.
        price: u32,
        /// Gold carried by the player.
        gold: u32,
    },
    /// Not enough trophies are banked for an exchange.
    #[error("need {required} {stat} trophies to exchange, have {total}")]
    InsufficientTrophies {
        /// Attribute the exchange would raise.
        stat: Stat,
        /// Trophy total currently banked.
        total: u32,
        /// Total required.
        required: u32,
    },
    /// No encounter card is active.
    #[error("no card to resolve")]
    NoActiveCard,
    /// The active card was already resolved.
    #[error("card already resolved")]
    CardAlreadyResolved,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Discards the board and generates a fresh one.
    RegenerateWorld,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Real time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Rolls the movement die.
    RollDice,
    /// Supplies the legal landing tiles for the pending roll.
    OfferDestinations {
        /// Roll the destinations were computed for.
        roll: u32,
        /// Landing tiles sorted by loop then tile.
        destinations: Vec<TileId>,
    },
    /// Moves the highlighted destination, wrapping around the list.
    CycleSelection {
        /// Signed number of entries to move.
        offset: i32,
    },
    /// Confirms the highlighted destination.
    ConfirmSelection,
    /// Abandons destination selection and returns to idle.
    CancelSelection,
    /// Supplies the concrete path toward the confirmed destination.
    FollowPath {
        /// Hops to take, excluding the current tile and ending at the goal.
        path: Vec<TileId>,
    },
    /// Resolves the active encounter card.
    ResolveCard,
    /// Closes the active encounter card, resolved or not.
    DismissCard,
    /// Opens the inventory overlay.
    OpenInventory,
    /// Closes the inventory overlay.
    CloseInventory,
    /// Enters the shop linked to the player's tile.
    EnterShop,
    /// Leaves the open shop.
    CloseShop,
    /// Buys the offer in the given slot of the open shop.
    PurchaseItem {
        /// Zero-based slot index.
        slot: usize,
    },
    /// Converts banked monster trophies into one strength.
    ExchangeMonsterStrength,
    /// Converts banked magic-monster trophies into one magic.
    ExchangeMagicMonster,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A new board replaced the previous one.
    WorldGenerated {
        /// Total loops, including bridges and shops.
        loops: usize,
        /// Ordinary region loops.
        regions: usize,
        /// Bridge loops.
        bridges: usize,
        /// Shop loops.
        shops: usize,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// The movement die was rolled; destinations are required.
    DiceRolled {
        /// Turn number after the roll.
        turn: u32,
        /// Face rolled.
        roll: u32,
        /// Tile the player rolled from.
        from: TileId,
    },
    /// Destinations were accepted for the pending roll.
    DestinationsOffered {
        /// Landing tiles sorted by loop then tile.
        destinations: Vec<TileId>,
    },
    /// The highlighted destination changed.
    SelectionChanged {
        /// Index into the destination list.
        index: usize,
        /// Highlighted tile.
        tile: TileId,
    },
    /// A destination was confirmed; a path is required.
    DestinationConfirmed {
        /// Tile the player is standing on.
        from: TileId,
        /// Roll the path must consume.
        roll: u32,
        /// Chosen landing tile.
        goal: TileId,
    },
    /// Destination selection was abandoned.
    SelectionCancelled,
    /// A path was accepted and playback started.
    PathAssigned {
        /// Number of hops to play back.
        hops: usize,
    },
    /// The player moved one hop.
    PlayerAdvanced {
        /// Tile left behind.
        from: TileId,
        /// Tile entered.
        to: TileId,
    },
    /// Path playback finished.
    MovementFinished {
        /// Landing tile.
        at: TileId,
    },
    /// An encounter card was drawn on landing.
    CardDrawn {
        /// Drawn card.
        card: Card,
    },
    /// The active card was resolved.
    CardResolved {
        /// Details of the interaction.
        resolution: Resolution,
    },
    /// The active card was closed.
    CardDismissed,
    /// The inventory overlay opened.
    InventoryOpened,
    /// The inventory overlay closed.
    InventoryClosed,
    /// A shop overlay opened.
    ShopOpened {
        /// Tile hosting the shop.
        shop: TileId,
        /// Whether this was the first visit.
        first_visit: bool,
    },
    /// The shop overlay closed.
    ShopClosed,
    /// An offer was bought and its slot restocked.
    ItemPurchased {
        /// Tile hosting the shop.
        shop: TileId,
        /// Slot that was bought.
        slot: usize,
        /// Card that was bought.
        card: Card,
        /// Gold paid.
        price: u32,
    },
    /// Trophies were exchanged for a stat point.
    TrophiesExchanged {
        /// Attribute that was raised.
        stat: Stat,
        /// Number of cards consumed.
        consumed: usize,
    },
    /// A command was refused.
    ActionRejected {
        /// Reason shown to the player.
        reason: Rejection,
    },
}
