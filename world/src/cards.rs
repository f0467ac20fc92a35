//! Card factories, keeper stock tables and shop pricing.

use loop_quest_core::{Card, CardKind, KeeperKind};
use rand::{seq::SliceRandom, Rng};

use crate::config::{DeckEntry, EncounterConfig, EncounterKind};

/// Builds a strength monster of the given power.
#[must_use]
pub fn monster_strength(power: u32) -> Card {
    Card::new(
        CardKind::Monster,
        power,
        0,
        "A Monster Appears!",
        format!("A fearsome foe blocks the way.\nMonster Strength: {power}"),
    )
}

/// Builds a magic monster of the given power.
#[must_use]
pub fn monster_magic(power: u32) -> Card {
    Card::new(
        CardKind::MagicMonster,
        0,
        power,
        "A Magic Monster Appears!",
        format!("A fearsome foe blocks the way.\nMonster Magic: {power}"),
    )
}

/// Builds a strength buff of the given power.
#[must_use]
pub fn buff_strength(power: u32) -> Card {
    Card::new(
        CardKind::Buff,
        power,
        0,
        "A Blessing!",
        format!("A boon empowers you.\nGain +{power} Strength."),
    )
}

/// Builds a magic buff of the given power.
#[must_use]
pub fn buff_magic(power: u32) -> Card {
    Card::new(
        CardKind::Buff,
        0,
        power,
        "A Magic Blessing!",
        format!("A boon empowers you.\nGain +{power} Magic."),
    )
}

/// Builds a monster whose stat flavour is chosen by coin flip.
pub fn monster<R: Rng + ?Sized>(power: u32, rng: &mut R) -> Card {
    if rng.gen::<bool>() {
        monster_strength(power)
    } else {
        monster_magic(power)
    }
}

/// Builds a buff whose stat flavour is chosen by coin flip.
pub fn buff<R: Rng + ?Sized>(power: u32, rng: &mut R) -> Card {
    if rng.gen::<bool>() {
        buff_strength(power)
    } else {
        buff_magic(power)
    }
}

/// Draws the encounter revealed after a move from the random table.
pub fn random_encounter<R: Rng + ?Sized>(config: &EncounterConfig, rng: &mut R) -> Card {
    if rng.gen::<f32>() < config.monster_chance {
        let power = config.monster_power.sample(rng);
        monster(power, rng)
    } else {
        let power = config.buff_power.sample(rng);
        buff(power, rng)
    }
}

/// Draws an encounter from a region deck; `None` when the deck is empty.
pub fn deck_encounter<R: Rng + ?Sized>(deck: &[DeckEntry], rng: &mut R) -> Option<Card> {
    let entry = *deck.choose(rng)?;
    Some(match entry.kind {
        EncounterKind::Monster => monster(entry.power, rng),
        EncounterKind::Buff => buff(entry.power, rng),
    })
}

/// Rolls a price for a shop item.
///
/// Mixed items cost `(strength + magic) * 4`, single-stat items
/// `max(strength, magic) * 3`, plus 1 to 5 gold of noise.
pub fn price_for<R: Rng + ?Sized>(card: &Card, rng: &mut R) -> u32 {
    let base = if card.strength > 0 && card.magic > 0 {
        (card.strength + card.magic) * 4
    } else {
        card.strength.max(card.magic) * 3
    };
    base + rng.gen_range(1..=5)
}

/// Stock and shop names of one keeper personality.
#[derive(Clone, Debug)]
pub struct KeeperProfile {
    kind: KeeperKind,
    names: Vec<String>,
    stock: Vec<Card>,
}

impl KeeperProfile {
    /// Keeper personality described by the profile.
    #[must_use]
    pub const fn kind(&self) -> KeeperKind {
        self.kind
    }

    /// Candidate shop names.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Cards the keeper may stock.
    #[must_use]
    pub fn stock(&self) -> &[Card] {
        &self.stock
    }
}

/// Keeper-themed shop stock and naming tables.
#[derive(Clone, Debug)]
pub struct CardCatalog {
    keepers: [KeeperProfile; 5],
}

impl CardCatalog {
    /// Profile of the requested keeper.
    #[must_use]
    pub fn keeper(&self, kind: KeeperKind) -> &KeeperProfile {
        &self.keepers[keeper_slot(kind)]
    }

    /// Draws a random card from the keeper's stock.
    pub fn shop_card<R: Rng + ?Sized>(&self, kind: KeeperKind, rng: &mut R) -> Card {
        self.keeper(kind)
            .stock
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| shop_item(1, 0, "Trinket", "A small keepsake."))
    }

    /// Picks a random name for a shop run by `kind`.
    pub fn shop_name<R: Rng + ?Sized>(&self, kind: KeeperKind, rng: &mut R) -> String {
        self.keeper(kind)
            .names
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| String::from("Shop"))
    }
}

const fn keeper_slot(kind: KeeperKind) -> usize {
    match kind {
        KeeperKind::Mystic => 0,
        KeeperKind::Ogre => 1,
        KeeperKind::Monkey => 2,
        KeeperKind::Pig => 3,
        KeeperKind::Dolphin => 4,
    }
}

type StockRow = (u32, u32, &'static str, &'static str);

const MYSTIC_STOCK: [StockRow; 6] = [
    (
        0,
        2,
        "Wizard's Amulet",
        "An ancient amulet crackling with arcane power.",
    ),
    (
        0,
        3,
        "Staff of Elements",
        "A powerful staff that channels elemental forces.",
    ),
    (
        0,
        1,
        "Mana Potion",
        "A shimmering blue liquid that restores magical essence.",
    ),
    (
        0,
        2,
        "Enchanted Robes",
        "Mystical robes woven with silver thread.",
    ),
    (
        0,
        3,
        "Archmage's Crown",
        "A crown that once belonged to the greatest wizard.",
    ),
    (
        0,
        3,
        "Void Crystal",
        "A dark crystal pulsing with otherworldly energy.",
    ),
];

const OGRE_STOCK: [StockRow; 6] = [
    (
        3,
        0,
        "Ogre's Club",
        "A massive wooden club used by ogre warriors.",
    ),
    (
        2,
        0,
        "Beast Hide Armor",
        "Thick armor made from giant beast hide.",
    ),
    (
        3,
        0,
        "Titan's Hammer",
        "A massive war hammer forged by titans.",
    ),
    (
        2,
        0,
        "Giant's Belt",
        "A leather belt once worn by a mountain giant.",
    ),
    (
        1,
        0,
        "Stone Knuckles",
        "Heavy stone gauntlets that crush enemies.",
    ),
    (
        3,
        0,
        "Berserker's Charm",
        "A wild charm that unleashes inner rage.",
    ),
];

const MONKEY_STOCK: [StockRow; 6] = [
    (
        1,
        1,
        "Banana of Wisdom",
        "A magical fruit that enhances mind and body.",
    ),
    (
        0,
        2,
        "Jungle Vine Staff",
        "A staff made from enchanted jungle vines.",
    ),
    (
        2,
        0,
        "Monkey Paw Gloves",
        "Nimble gloves that increase dexterity.",
    ),
    (
        1,
        2,
        "Scholar's Banana",
        "A fruit inscribed with ancient knowledge.",
    ),
    (
        0,
        1,
        "Chattering Scroll",
        "A scroll that whispers jungle secrets.",
    ),
    (
        1,
        0,
        "Swinging Rope",
        "A rope that increases agility and strength.",
    ),
];

const PIG_STOCK: [StockRow; 6] = [
    (
        1,
        0,
        "Truffle Hunter's Nose",
        "Enhances your ability to find hidden treasures.",
    ),
    (
        0,
        1,
        "Mud Bath Essence",
        "A relaxing potion that clears the mind.",
    ),
    (
        2,
        0,
        "Bacon Shield",
        "A surprisingly sturdy shield made of cured meat.",
    ),
    (
        0,
        2,
        "Snorting Powder",
        "A magical dust that enhances mental abilities.",
    ),
    (
        1,
        1,
        "Farm Fresh Meal",
        "A hearty meal that nourishes body and soul.",
    ),
    (
        2,
        0,
        "Pig Iron Gauntlets",
        "Heavy iron gloves forged in pig-shaped molds.",
    ),
];

const DOLPHIN_STOCK: [StockRow; 6] = [
    (
        0,
        2,
        "Pearl of the Deep",
        "A lustrous pearl containing ocean magic.",
    ),
    (
        2,
        0,
        "Whale Bone Sword",
        "A sword carved from ancient whale bone.",
    ),
    (
        0,
        3,
        "Tidal Wave Orb",
        "An orb that commands the power of the tides.",
    ),
    (
        1,
        2,
        "Dolphin's Wisdom",
        "Ancient knowledge from the ocean depths.",
    ),
    (
        0,
        1,
        "Sea Foam Potion",
        "A bubbly potion made from ocean waves.",
    ),
    (
        1,
        0,
        "Coral Armor",
        "Living coral that protects and strengthens.",
    ),
];

fn shop_item(strength: u32, magic: u32, title: &str, flavour: &str) -> Card {
    let gain = match (strength, magic) {
        (0, magic) => format!("Gain +{magic} Magic."),
        (strength, 0) => format!("Gain +{strength} Strength."),
        (strength, magic) => format!("Gain +{strength} Strength and +{magic} Magic."),
    };
    let text = format!("{flavour}\n{gain}");
    Card::new(CardKind::ShopItem, strength, magic, title, text)
}

fn profile(kind: KeeperKind, names: [&str; 5], stock: &[StockRow]) -> KeeperProfile {
    KeeperProfile {
        kind,
        names: names.iter().map(|name| (*name).to_owned()).collect(),
        stock: stock
            .iter()
            .map(|(strength, magic, title, text)| shop_item(*strength, *magic, title, text))
            .collect(),
    }
}

impl Default for CardCatalog {
    fn default() -> Self {
        Self {
            keepers: [
                profile(
                    KeeperKind::Mystic,
                    [
                        "Mystic Emporium",
                        "Arcane Artifacts",
                        "Crystal Cave",
                        "Wizard's Workshop",
                        "Magic Mirror Shop",
                    ],
                    &MYSTIC_STOCK,
                ),
                profile(
                    KeeperKind::Ogre,
                    [
                        "Ogre's Armory",
                        "Beast & Bone",
                        "Iron Fist Trading",
                        "Brutal Bargains",
                        "Stone Club Store",
                    ],
                    &OGRE_STOCK,
                ),
                profile(
                    KeeperKind::Monkey,
                    [
                        "Banana Bazaar",
                        "Jungle Goods",
                        "Monkey Business",
                        "Vine & Vine",
                        "Treetop Treasures",
                    ],
                    &MONKEY_STOCK,
                ),
                profile(
                    KeeperKind::Pig,
                    [
                        "Pig & Whistle",
                        "Truffle Traders",
                        "Muddy Boots",
                        "Farm Fresh Finds",
                        "Snort & Shop",
                    ],
                    &PIG_STOCK,
                ),
                profile(
                    KeeperKind::Dolphin,
                    [
                        "Ocean's Bounty",
                        "Tidal Treasures",
                        "Deep Sea Depot",
                        "Whale Song Shop",
                        "Coral Curiosities",
                    ],
                    &DOLPHIN_STOCK,
                ),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Bounds;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn profiles_match_their_keeper() {
        let catalog = CardCatalog::default();
        for kind in KeeperKind::ALL {
            let keeper = catalog.keeper(kind);
            assert_eq!(keeper.kind(), kind);
            assert_eq!(keeper.names().len(), 5);
            assert_eq!(keeper.stock().len(), 6);
            assert!(keeper
                .stock()
                .iter()
                .all(|card| card.kind == CardKind::ShopItem));
        }
    }

    #[test]
    fn prices_follow_stat_formula() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mixed = shop_item(1, 2, "Scholar's Banana", "");
        let single = shop_item(0, 3, "Void Crystal", "");
        for _ in 0..50 {
            assert!((13..=17).contains(&price_for(&mixed, &mut rng)));
            assert!((10..=14).contains(&price_for(&single, &mut rng)));
        }
    }

    #[test]
    fn random_encounters_respect_configured_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let config = EncounterConfig::default();
        let mut monsters = 0;
        for _ in 0..500 {
            let card = random_encounter(&config, &mut rng);
            let power = card.strength.max(card.magic);
            if card.is_monster() {
                monsters += 1;
                assert!((2..=8).contains(&power));
            } else {
                assert_eq!(card.kind, CardKind::Buff);
                assert!((1..=3).contains(&power));
            }
        }
        assert!(
            monsters > 200 && monsters < 350,
            "monsters drawn: {monsters}"
        );
    }

    #[test]
    fn certain_monster_chance_always_fights() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let config = EncounterConfig {
            monster_chance: 1.0,
            monster_power: Bounds::new(4, 4),
            ..EncounterConfig::default()
        };
        for _ in 0..20 {
            let card = random_encounter(&config, &mut rng);
            assert!(card.is_monster());
            assert_eq!(card.strength + card.magic, 4);
        }
    }

    #[test]
    fn deck_encounters_draw_from_entries() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let deck = [DeckEntry {
            kind: EncounterKind::Buff,
            power: 6,
        }];
        let card = deck_encounter(&deck, &mut rng).expect("non-empty deck");
        assert_eq!(card.kind, CardKind::Buff);
        assert_eq!(card.strength + card.magic, 6);
        assert!(deck_encounter(&[], &mut rng).is_none());
    }

    #[test]
    fn monster_text_names_its_power() {
        let card = monster_strength(7);
        assert_eq!(card.title, "A Monster Appears!");
        assert!(card.text.ends_with("Monster Strength: 7"));
        assert_eq!(buff_magic(2).magic, 2);
    }
}
