//! Player attributes, fights, purchases and trophy exchanges.

use loop_quest_core::{
    Card, CardKind, Outcome, PlayerSnapshot, Rejection, Resolution, Stat, Stats, TileId,
    DIE_FACES, EXCHANGE_THRESHOLD, MAX_HEALTH,
};

use crate::{config::PlayerConfig, dice::Dice};

const LOOT_FACES: u32 = 3;

/// The single adventurer walking the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    at: TileId,
    strength: u32,
    magic: u32,
    health: u32,
    gold: u32,
    cards: Vec<Card>,
}

impl Player {
    /// Creates a player at `at` with the configured starting attributes.
    #[must_use]
    pub fn new(at: TileId, config: &PlayerConfig) -> Self {
        Self {
            at,
            strength: config.strength,
            magic: config.magic,
            health: config.health.min(MAX_HEALTH),
            gold: config.gold,
            cards: Vec::new(),
        }
    }

    /// Tile currently occupied.
    #[must_use]
    pub const fn at(&self) -> TileId {
        self.at
    }

    /// Numeric attributes.
    #[must_use]
    pub const fn stats(&self) -> Stats {
        Stats {
            strength: self.strength,
            magic: self.magic,
            health: self.health,
            gold: self.gold,
        }
    }

    /// Collected cards in acquisition order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Read-only view used by presentation layers.
    #[must_use]
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            at: self.at,
            stats: self.stats(),
            cards: self.cards.clone(),
        }
    }

    pub(crate) fn move_to(&mut self, at: TileId) {
        self.at = at;
    }

    /// Applies `card` to the player.
    ///
    /// Monsters are fought: the player's die is rolled first, then the
    /// monster's. A win keeps the card and loots 1 to 3 gold, a loss costs one
    /// health, a tie changes nothing. Buffs and shop items add their stats and
    /// are kept.
    pub fn interact(&mut self, card: &Card, dice: &mut impl Dice) -> Resolution {
        let before = self.stats();
        let mut resolution = Resolution {
            card: card.clone(),
            outcome: None,
            player_die: 0,
            monster_die: 0,
            player_total: 0,
            monster_total: 0,
            before,
            after: before,
            message: String::new(),
        };

        let (attribute, opposing) = match card.kind {
            CardKind::Monster => (self.strength, card.strength),
            CardKind::MagicMonster => (self.magic, card.magic),
            CardKind::Buff | CardKind::ShopItem => {
                self.strength += card.strength;
                self.magic += card.magic;
                self.cards.push(card.clone());
                resolution.after = self.stats();
                resolution.message = format!("{} {}", card.title, gain_suffix(card));
                return resolution;
            }
        };

        resolution.player_die = dice.roll(DIE_FACES);
        resolution.monster_die = dice.roll(DIE_FACES);
        resolution.player_total = attribute + resolution.player_die;
        resolution.monster_total = opposing + resolution.monster_die;

        let outcome = match resolution.player_total.cmp(&resolution.monster_total) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Less => Outcome::Loss,
            std::cmp::Ordering::Equal => Outcome::Tie,
        };
        resolution.message = match outcome {
            Outcome::Win => {
                let loot = dice.roll(LOOT_FACES);
                self.gold += loot;
                self.cards.push(card.clone());
                format!(
                    "Victory! {} vs {}. You keep the card and loot {loot} gold.",
                    resolution.player_total, resolution.monster_total
                )
            }
            Outcome::Loss => {
                self.health = self.health.saturating_sub(1);
                format!(
                    "Defeat! {} vs {}. Health {} -> {}.",
                    resolution.player_total, resolution.monster_total, before.health, self.health
                )
            }
            Outcome::Tie => format!("Stalemate at {}. Nothing happens.", resolution.player_total),
        };
        resolution.outcome = Some(outcome);
        resolution.after = self.stats();
        resolution
    }

    /// Pays for a shop item and applies it immediately.
    pub fn purchase(&mut self, card: &Card, price: u32) -> Result<(), Rejection> {
        if self.gold < price {
            return Err(Rejection::InsufficientGold {
                price,
                gold: self.gold,
            });
        }
        self.gold -= price;
        self.strength += card.strength;
        self.magic += card.magic;
        self.cards.push(card.clone());
        Ok(())
    }

    /// Trophy total banked toward exchanges for `stat`.
    #[must_use]
    pub fn trophy_total(&self, stat: Stat) -> u32 {
        self.cards
            .iter()
            .filter(|card| card.kind == trophy_kind(stat))
            .map(|card| trophy_value(card, stat))
            .sum()
    }

    /// Converts monster strength trophies into one strength.
    pub fn exchange_monster_strength(&mut self) -> bool {
        self.exchange_trophies(Stat::Strength).is_ok()
    }

    /// Converts magic-monster trophies into one magic.
    pub fn exchange_magic_monster(&mut self) -> bool {
        self.exchange_trophies(Stat::Magic).is_ok()
    }

    /// Consumes trophies for `stat` in collection order until their value
    /// first reaches the threshold, then raises `stat` by one.
    ///
    /// Returns the number of cards consumed. Nothing changes when the banked
    /// total is below the threshold.
    pub fn exchange_trophies(&mut self, stat: Stat) -> Result<usize, Rejection> {
        let total = self.trophy_total(stat);
        if total < EXCHANGE_THRESHOLD {
            return Err(Rejection::InsufficientTrophies {
                stat,
                total,
                required: EXCHANGE_THRESHOLD,
            });
        }

        let kind = trophy_kind(stat);
        let mut consumed_value = 0;
        let before = self.cards.len();
        self.cards.retain(|card| {
            if consumed_value >= EXCHANGE_THRESHOLD || card.kind != kind {
                return true;
            }
            consumed_value += trophy_value(card, stat);
            false
        });

        match stat {
            Stat::Strength => self.strength += 1,
            Stat::Magic => self.magic += 1,
        }
        Ok(before - self.cards.len())
    }
}

const fn trophy_kind(stat: Stat) -> CardKind {
    match stat {
        Stat::Strength => CardKind::Monster,
        Stat::Magic => CardKind::MagicMonster,
    }
}

const fn trophy_value(card: &Card, stat: Stat) -> u32 {
    match stat {
        Stat::Strength => card.strength,
        Stat::Magic => card.magic,
    }
}

/// Describes the stats a card grants, e.g. `(+1 STR, +2 MAG)`.
#[must_use]
pub fn gain_suffix(card: &Card) -> String {
    match (card.strength, card.magic) {
        (0, 0) => String::new(),
        (strength, 0) => format!("(+{strength} STR)"),
        (0, magic) => format!("(+{magic} MAG)"),
        (strength, magic) => format!("(+{strength} STR, +{magic} MAG)"),
    }
}
