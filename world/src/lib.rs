#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Loop Quest.
//!
//! The world owns the generated [`board::Board`], the [`player::Player`], the
//! turn state machine and every random number generator. Adapters and systems
//! mutate it exclusively through [`apply`] and observe it through [`query`].

pub mod board;
pub mod cards;
pub mod config;
pub mod dice;
pub mod grid;
pub mod layout;
pub mod player;
pub mod shop;
pub mod sizing;
pub mod topology;

mod log;
mod turn;

use std::time::Duration;

use loop_quest_core::{
    Card, CardKind, Command, Event, Modal, Phase, Rejection, Resolution, Stat, TileId, DIE_FACES,
    WELCOME_BANNER,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::{
    board::Board,
    cards::CardCatalog,
    config::{ConfigError, GameConfig},
    dice::Dice,
    log::MessageLog,
    player::{gain_suffix, Player},
    turn::TurnState,
};

const START_TILE: TileId = TileId::new(0, 0);

/// Fatal failures while building a board.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum GenerationError {
    /// No rectangle with sides of at least two tiles has this perimeter.
    #[error("no rectangle has a perimeter of exactly {tiles} tiles")]
    UnsizeableLoop {
        /// Requested perimeter length.
        tiles: usize,
    },
    /// The configuration was refused before generation started.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug)]
struct ActiveCard {
    card: Card,
    resolution: Option<Resolution>,
}

/// Represents the authoritative Loop Quest world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: GameConfig,
    catalog: CardCatalog,
    board: Board,
    player: Player,
    turn: TurnState,
    card: Option<ActiveCard>,
    open_shop: Option<TileId>,
    inventory_open: bool,
    rng: ChaCha8Rng,
    log: MessageLog,
}

impl World {
    /// Creates a world with the default configuration.
    pub fn new(seed: u64) -> Result<Self, GenerationError> {
        Self::with_config(GameConfig::default(), seed)
    }

    /// Validates `config` and generates a board from `seed`.
    pub fn with_config(config: GameConfig, seed: u64) -> Result<Self, GenerationError> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let catalog = CardCatalog::default();
        let board = topology::generate(&config.generation, &catalog, &mut rng)?;
        Ok(Self::assemble(config, catalog, board, rng))
    }

    /// Wraps an already built board, placing the player on tile (0, 0).
    pub fn from_board(board: Board, config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(seed);
        Ok(Self::assemble(config, CardCatalog::default(), board, rng))
    }

    fn assemble(config: GameConfig, catalog: CardCatalog, board: Board, rng: ChaCha8Rng) -> Self {
        let mut log = MessageLog::new(config.log_capacity);
        log.push(WELCOME_BANNER);
        Self {
            banner: WELCOME_BANNER,
            player: Player::new(START_TILE, &config.player),
            turn: TurnState::default(),
            card: None,
            open_shop: None,
            inventory_open: false,
            config,
            catalog,
            board,
            rng,
            log,
        }
    }

    fn active_modal(&self) -> Modal {
        if self.inventory_open {
            Modal::Inventory
        } else if self.open_shop.is_some() {
            Modal::Shop
        } else if self.card.is_some() {
            Modal::Card
        } else {
            Modal::Phase(self.turn.phase())
        }
    }

    fn require_phase(&self, phase: Phase) -> Result<(), Rejection> {
        match self.active_modal() {
            Modal::Phase(current) if current == phase => Ok(()),
            Modal::Phase(current) => Err(Rejection::WrongPhase { phase: current }),
            modal => Err(Rejection::Blocked { modal }),
        }
    }

    fn reject(&mut self, reason: Rejection, out_events: &mut Vec<Event>) {
        warn!(%reason, "command rejected");
        self.log.push(reason.to_string());
        out_events.push(Event::ActionRejected { reason });
    }

    fn regenerate(&mut self, out_events: &mut Vec<Event>) {
        match topology::generate(&self.config.generation, &self.catalog, &mut self.rng) {
            Ok(board) => self.board = board,
            Err(error) => {
                warn!(%error, "regeneration failed, keeping the current board");
                self.log.push(format!("Regeneration failed: {error}"));
                return;
            }
        }
        self.player.move_to(START_TILE);
        self.turn.reset_to_idle();
        self.card = None;
        self.open_shop = None;
        self.inventory_open = false;

        let census = self.board.census();
        self.log.push(format!(
            "A new world unfolds: {} regions, {} bridges, {} shops.",
            census.regions, census.bridges, census.shops
        ));
        out_events.push(Event::WorldGenerated {
            loops: census.loops(),
            regions: census.regions,
            bridges: census.bridges,
            shops: census.shops,
        });
    }

    fn roll(&mut self, out_events: &mut Vec<Event>) -> Result<(), Rejection> {
        self.require_phase(Phase::Idle)?;
        let roll = self.rng.roll(DIE_FACES);
        self.turn.begin_roll(roll);
        let turn = self.turn.turn();
        info!(turn, roll, from = %self.player.at(), "dice rolled");
        self.log.push(format!("Turn {turn}: rolled a {roll}."));
        out_events.push(Event::DiceRolled {
            turn,
            roll,
            from: self.player.at(),
        });
        Ok(())
    }

    fn offer(&mut self, roll: u32, destinations: Vec<TileId>, out_events: &mut Vec<Event>) {
        if !self.turn.offer(roll, destinations) {
            debug!(roll, "ignoring destinations for a stale roll");
            return;
        }
        let destinations = self.turn.destinations().to_vec();
        debug!(roll, count = destinations.len(), "destinations offered");
        if destinations.is_empty() {
            self.log.push("No valid moves for this roll.");
        }
        out_events.push(Event::DestinationsOffered {
            destinations: destinations.clone(),
        });
        if let Some(tile) = destinations.first() {
            out_events.push(Event::SelectionChanged {
                index: 0,
                tile: *tile,
            });
        }
    }

    fn cycle(&mut self, offset: i32, out_events: &mut Vec<Event>) -> Result<(), Rejection> {
        self.require_phase(Phase::TargetSelect)?;
        let (index, tile) = self.turn.cycle(offset)?;
        out_events.push(Event::SelectionChanged { index, tile });
        Ok(())
    }

    fn confirm(&mut self, out_events: &mut Vec<Event>) -> Result<(), Rejection> {
        self.require_phase(Phase::TargetSelect)?;
        let goal = self.turn.confirm()?;
        out_events.push(Event::DestinationConfirmed {
            from: self.player.at(),
            roll: self.turn.last_roll(),
            goal,
        });
        Ok(())
    }

    fn cancel(&mut self, out_events: &mut Vec<Event>) -> Result<(), Rejection> {
        self.require_phase(Phase::TargetSelect)?;
        self.turn.cancel()?;
        self.log.push("Move cancelled.");
        out_events.push(Event::SelectionCancelled);
        Ok(())
    }

    fn follow(&mut self, path: Vec<TileId>, out_events: &mut Vec<Event>) -> Result<(), Rejection> {
        let hops = self.turn.assign_path(path)?;
        out_events.push(Event::PathAssigned { hops });
        Ok(())
    }

    fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let progress = self.turn.advance(dt, self.config.turn.step_interval());
        for hop in progress.hops {
            let from = self.player.at();
            self.player.move_to(hop);
            out_events.push(Event::PlayerAdvanced { from, to: hop });
        }
        if !progress.finished {
            return;
        }

        let at = self.player.at();
        out_events.push(Event::MovementFinished { at });
        let card = self.draw_encounter(at);
        info!(%at, card = %card.label(), "landed and drew a card");
        self.log.push(format!("Landed on {at}: {}", card.title));
        self.card = Some(ActiveCard {
            card: card.clone(),
            resolution: None,
        });
        out_events.push(Event::CardDrawn { card });
    }

    fn draw_encounter(&mut self, at: TileId) -> Card {
        if self.config.encounters.use_region_decks {
            let deck = self
                .board
                .theme_of(at.loop_index())
                .map(|theme| theme.deck.as_slice())
                .unwrap_or_default();
            if let Some(card) = cards::deck_encounter(deck, &mut self.rng) {
                return card;
            }
        }
        cards::random_encounter(&self.config.encounters, &mut self.rng)
    }

    fn resolve_card(&mut self, out_events: &mut Vec<Event>) -> Result<(), Rejection> {
        match self.active_modal() {
            Modal::Card => {}
            Modal::Phase(_) => return Err(Rejection::NoActiveCard),
            modal => return Err(Rejection::Blocked { modal }),
        }
        let active = self.card.as_mut().ok_or(Rejection::NoActiveCard)?;
        if active.resolution.is_some() {
            return Err(Rejection::CardAlreadyResolved);
        }
        let resolution = self.player.interact(&active.card, &mut self.rng);
        active.resolution = Some(resolution.clone());

        let before = resolution.before;
        let after = resolution.after;
        if resolution.outcome.is_some() {
            let (stat, attribute, opposing) = if active.card.kind == CardKind::Monster {
                (Stat::Strength, before.strength, active.card.strength)
            } else {
                (Stat::Magic, before.magic, active.card.magic)
            };
            self.log.push(format!(
                "Fight! You: {stat} {attribute} + d6({}) = {}",
                resolution.player_die, resolution.player_total
            ));
            self.log.push(format!(
                "Monster: {stat} {opposing} + d6({}) = {}",
                resolution.monster_die, resolution.monster_total
            ));
        } else {
            self.log.push(format!(
                "Buff: {} (STR {} -> {}, MAG {} -> {})",
                gain_suffix(&active.card),
                before.strength,
                after.strength,
                before.magic,
                after.magic
            ));
        }
        self.log.push(resolution.message.clone());
        debug!(outcome = ?resolution.outcome, "card resolved");
        out_events.push(Event::CardResolved { resolution });
        Ok(())
    }

    fn dismiss_card(&mut self, out_events: &mut Vec<Event>) -> Result<(), Rejection> {
        match self.active_modal() {
            Modal::Card => {}
            Modal::Phase(_) => return Err(Rejection::NoActiveCard),
            modal => return Err(Rejection::Blocked { modal }),
        }
        self.card = None;
        out_events.push(Event::CardDismissed);
        Ok(())
    }

    fn open_inventory(&mut self, out_events: &mut Vec<Event>) -> Result<(), Rejection> {
        self.require_phase(Phase::Idle)?;
        self.inventory_open = true;
        out_events.push(Event::InventoryOpened);
        Ok(())
    }

    fn close_inventory(&mut self, out_events: &mut Vec<Event>) -> Result<(), Rejection> {
        if !self.inventory_open {
            return Err(Rejection::InventoryNotOpen);
        }
        self.inventory_open = false;
        out_events.push(Event::InventoryClosed);
        Ok(())
    }

    fn enter_shop(&mut self, out_events: &mut Vec<Event>) -> Result<(), Rejection> {
        self.require_phase(Phase::Idle)?;
        let tile = self
            .board
            .shop_linked_to(self.player.at())
            .ok_or(Rejection::NoShopNearby)?;
        let shop = self.board.shop_mut(tile).ok_or(Rejection::NoShopNearby)?;
        let first_visit = shop.discover();
        if first_visit {
            self.log.push(format!("Discovered {}!", shop.name()));
        } else {
            self.log.push(format!("Welcome back to {}.", shop.name()));
        }
        self.open_shop = Some(tile);
        out_events.push(Event::ShopOpened {
            shop: tile,
            first_visit,
        });
        Ok(())
    }

    fn close_shop(&mut self, out_events: &mut Vec<Event>) -> Result<(), Rejection> {
        if self.inventory_open {
            return Err(Rejection::Blocked {
                modal: Modal::Inventory,
            });
        }
        let _ = self.open_shop.take().ok_or(Rejection::ShopNotOpen)?;
        out_events.push(Event::ShopClosed);
        Ok(())
    }

    fn purchase(&mut self, slot: usize, out_events: &mut Vec<Event>) -> Result<(), Rejection> {
        if self.inventory_open {
            return Err(Rejection::Blocked {
                modal: Modal::Inventory,
            });
        }
        let tile = self.open_shop.ok_or(Rejection::ShopNotOpen)?;
        let shop = self.board.shop_mut(tile).ok_or(Rejection::ShopNotOpen)?;
        let offer = shop
            .offer(slot)
            .cloned()
            .ok_or(Rejection::InvalidSlot { slot })?;
        self.player.purchase(&offer.card, offer.price)?;
        let _ = shop.restock(slot, &self.catalog, &mut self.rng);

        info!(slot, price = offer.price, item = %offer.card.title, "item purchased");
        self.log.push(format!(
            "Purchased {} for {} gold {}",
            offer.card.title,
            offer.price,
            gain_suffix(&offer.card)
        ));
        out_events.push(Event::ItemPurchased {
            shop: tile,
            slot,
            card: offer.card,
            price: offer.price,
        });
        Ok(())
    }

    fn exchange(&mut self, stat: Stat, out_events: &mut Vec<Event>) -> Result<(), Rejection> {
        if !self.inventory_open {
            return Err(Rejection::InventoryNotOpen);
        }
        let consumed = self.player.exchange_trophies(stat)?;
        let line = match stat {
            Stat::Strength => "Exchanged monster strength for +1 STR",
            Stat::Magic => "Exchanged magic monster strength for +1 MAG",
        };
        self.log.push(line);
        out_events.push(Event::TrophiesExchanged { stat, consumed });
        Ok(())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let outcome = match command {
        Command::RegenerateWorld => {
            world.regenerate(out_events);
            Ok(())
        }
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            world.advance(dt, out_events);
            Ok(())
        }
        Command::RollDice => world.roll(out_events),
        Command::OfferDestinations { roll, destinations } => {
            world.offer(roll, destinations, out_events);
            Ok(())
        }
        Command::CycleSelection { offset } => world.cycle(offset, out_events),
        Command::ConfirmSelection => world.confirm(out_events),
        Command::CancelSelection => world.cancel(out_events),
        Command::FollowPath { path } => world.follow(path, out_events),
        Command::ResolveCard => world.resolve_card(out_events),
        Command::DismissCard => world.dismiss_card(out_events),
        Command::OpenInventory => world.open_inventory(out_events),
        Command::CloseInventory => world.close_inventory(out_events),
        Command::EnterShop => world.enter_shop(out_events),
        Command::CloseShop => world.close_shop(out_events),
        Command::PurchaseItem { slot } => world.purchase(slot, out_events),
        Command::ExchangeMonsterStrength => world.exchange(Stat::Strength, out_events),
        Command::ExchangeMagicMonster => world.exchange(Stat::Magic, out_events),
    };

    if let Err(reason) = outcome {
        world.reject(reason, out_events);
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use loop_quest_core::{
        Card, Modal, Phase, PlayerSnapshot, Resolution, ShopSnapshot, TileId, TurnSnapshot,
    };

    use super::World;
    use crate::{board::Board, config::GameConfig, player::Player};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Configuration the world was built with.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Provides read-only access to the generated board.
    #[must_use]
    pub fn board(world: &World) -> &Board {
        &world.board
    }

    /// Provides read-only access to the player.
    #[must_use]
    pub fn player(world: &World) -> &Player {
        &world.player
    }

    /// Captures the player's position, attributes and cards.
    #[must_use]
    pub fn player_snapshot(world: &World) -> PlayerSnapshot {
        world.player.snapshot()
    }

    /// Captures turn progress, destinations and the remaining path.
    #[must_use]
    pub fn turn_snapshot(world: &World) -> TurnSnapshot {
        world.turn.snapshot()
    }

    /// Active turn phase, regardless of open overlays.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.turn.phase()
    }

    /// Highlighted destination and its index, while selecting.
    #[must_use]
    pub fn selected_destination(world: &World) -> Option<(usize, TileId)> {
        world.turn.selection()
    }

    /// Encounter card awaiting resolution or dismissal.
    #[must_use]
    pub fn active_card(world: &World) -> Option<(&Card, Option<&Resolution>)> {
        world
            .card
            .as_ref()
            .map(|active| (&active.card, active.resolution.as_ref()))
    }

    /// Snapshot of the open shop.
    #[must_use]
    pub fn open_shop(world: &World) -> Option<ShopSnapshot> {
        let tile = world.open_shop?;
        world.board.shop(tile).map(|shop| shop.snapshot(tile))
    }

    /// Shop linked to the player's tile, if any.
    #[must_use]
    pub fn nearby_shop(world: &World) -> Option<TileId> {
        world.board.shop_linked_to(world.player.at())
    }

    /// Highest open interaction layer.
    #[must_use]
    pub fn active_modal(world: &World) -> Modal {
        world.active_modal()
    }

    /// Player-facing message history, oldest first.
    #[must_use]
    pub fn log_lines(world: &World) -> Vec<String> {
        world.log.lines().map(str::to_owned).collect()
    }
}
