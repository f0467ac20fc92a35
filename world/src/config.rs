//! Tunable parameters for generation, pacing and encounters.
//!
//! Every section deserializes with `#[serde(default)]`, so a configuration
//! file only has to mention the values it overrides.

use std::time::Duration;

use glam::Vec2;
use loop_quest_core::{LoopColor, MAX_HEALTH};
use rand::{distributions::uniform::SampleUniform, Rng};
use serde::Deserialize;

use crate::grid::Grid;

/// Reasons a configuration is refused.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A range has its minimum above its maximum.
    #[error("{field} range is inverted ({min} > {max})")]
    InvertedRange {
        /// Dotted path of the offending setting.
        field: &'static str,
        /// Configured minimum.
        min: u64,
        /// Configured maximum.
        max: u64,
    },
    /// A probability lies outside `[0, 1]`.
    #[error("{field} must lie within [0, 1], got {value}")]
    Probability {
        /// Dotted path of the offending setting.
        field: &'static str,
        /// Configured value.
        value: f32,
    },
    /// Loops need at least one tile per corner.
    #[error("generation.loop_tiles.min must be at least 4, got {min}")]
    LoopTooSmall {
        /// Configured minimum loop size.
        min: usize,
    },
    /// The board must contain at least one loop.
    #[error("generation.loop_count.min must be at least 1")]
    NoLoops,
    /// Tiles must have a positive pixel size.
    #[error("generation.tile_size must be positive, got {size}")]
    TileSize {
        /// Configured tile size.
        size: f32,
    },
    /// At least one region theme is required.
    #[error("generation.themes must not be empty")]
    NoThemes,
    /// Path playback needs a positive interval.
    #[error("turn.step_interval_ms must be positive")]
    ZeroStepInterval,
    /// Starting health exceeds the cap.
    #[error("player.health must not exceed {MAX_HEALTH}, got {health}")]
    HealthAboveCap {
        /// Configured starting health.
        health: u32,
    },
}

/// Inclusive range sampled uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Bounds<T> {
    /// Smallest value that may be drawn.
    pub min: T,
    /// Largest value that may be drawn.
    pub max: T,
}

impl<T> Bounds<T>
where
    T: Copy + PartialOrd + SampleUniform,
{
    /// Creates a new inclusive range.
    #[must_use]
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// Draws a value from the range, collapsing to `min` when the range is empty.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        if self.max > self.min {
            rng.gen_range(self.min..=self.max)
        } else {
            self.min
        }
    }
}

/// Flavour assigned to a region loop.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LoopTheme {
    /// Display name of the region.
    pub name: String,
    /// Colour used to draw the region's tiles.
    pub color: LoopColor,
    /// Encounter deck drawn from when region decks are enabled.
    #[serde(default)]
    pub deck: Vec<DeckEntry>,
}

impl LoopTheme {
    fn new(name: &str, color: LoopColor, deck: Vec<DeckEntry>) -> Self {
        Self {
            name: name.to_owned(),
            color,
            deck,
        }
    }
}

/// Kind of encounter listed in a region deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterKind {
    /// A monster whose stat flavour is chosen on draw.
    Monster,
    /// A buff whose stat flavour is chosen on draw.
    Buff,
}

/// One entry of a region encounter deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct DeckEntry {
    /// Encounter category.
    pub kind: EncounterKind,
    /// Power of the drawn card.
    pub power: u32,
}

impl DeckEntry {
    const fn monster(power: u32) -> Self {
        Self {
            kind: EncounterKind::Monster,
            power,
        }
    }

    const fn buff(power: u32) -> Self {
        Self {
            kind: EncounterKind::Buff,
            power,
        }
    }
}

/// Board generation parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Number of ordinary loops to place.
    pub loop_count: Bounds<usize>,
    /// Requested tile count of each ordinary loop.
    pub loop_tiles: Bounds<usize>,
    /// Chance of trying a random earlier loop before the previous one.
    pub cross_link_chance: f32,
    /// Chance that any perimeter tile sprouts a shop.
    pub shop_chance: f32,
    /// Pixel position of grid cell (0, 0).
    pub grid_origin: [f32; 2],
    /// Pixel side length of one tile.
    pub tile_size: f32,
    /// Region themes; the first three are assigned to loops 0, 1 and 2.
    pub themes: Vec<LoopTheme>,
}

impl GenerationConfig {
    /// Grid used to position tiles.
    #[must_use]
    pub fn grid(&self) -> Grid {
        Grid::new(
            Vec2::new(self.grid_origin[0], self.grid_origin[1]),
            self.tile_size,
        )
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            loop_count: Bounds::new(20, 49),
            loop_tiles: Bounds::new(8, 27),
            cross_link_chance: 0.95,
            shop_chance: 0.2,
            grid_origin: [800.0, 450.0],
            tile_size: 44.0,
            themes: default_themes(),
        }
    }
}

fn default_themes() -> Vec<LoopTheme> {
    use DeckEntry as D;
    vec![
        LoopTheme::new(
            "Outer Fields",
            LoopColor::from_rgb(120, 180, 100),
            vec![D::monster(2), D::buff(1), D::monster(3)],
        ),
        LoopTheme::new(
            "Forest Paths",
            LoopColor::from_rgb(80, 140, 70),
            vec![D::monster(2), D::buff(2), D::monster(5)],
        ),
        LoopTheme::new(
            "Desert Sands",
            LoopColor::from_rgb(200, 160, 80),
            vec![D::monster(10), D::buff(5), D::monster(15)],
        ),
        LoopTheme::new(
            "Mountain Caves",
            LoopColor::from_rgb(120, 110, 140),
            vec![D::monster(8), D::buff(3), D::monster(12), D::monster(10)],
        ),
        LoopTheme::new(
            "Fire Peaks",
            LoopColor::from_rgb(180, 80, 60),
            vec![D::monster(15), D::buff(6), D::monster(18), D::monster(20)],
        ),
        LoopTheme::new(
            "Shadow Realm",
            LoopColor::from_rgb(60, 40, 80),
            vec![D::monster(25), D::buff(8), D::monster(30), D::monster(22)],
        ),
    ]
}

/// Turn pacing parameters.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TurnConfig {
    /// Milliseconds of tick time consumed by one animated hop.
    pub step_interval_ms: u64,
}

impl TurnConfig {
    /// Interval between animated hops.
    #[must_use]
    pub const fn step_interval(&self) -> Duration {
        Duration::from_millis(self.step_interval_ms)
    }
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            step_interval_ms: 180,
        }
    }
}

/// Starting attributes of the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Starting strength.
    pub strength: u32,
    /// Starting magic.
    pub magic: u32,
    /// Starting health.
    pub health: u32,
    /// Starting gold.
    pub gold: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            strength: 3,
            magic: 3,
            health: 5,
            gold: 0,
        }
    }
}

/// Parameters of the encounter drawn after each move.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EncounterConfig {
    /// Chance that a landing draws a monster rather than a buff.
    pub monster_chance: f32,
    /// Power range of random monsters.
    pub monster_power: Bounds<u32>,
    /// Power range of random buffs.
    pub buff_power: Bounds<u32>,
    /// Draw from the landing region's theme deck instead of the random table.
    pub use_region_decks: bool,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            monster_chance: 0.55,
            monster_power: Bounds::new(2, 8),
            buff_power: Bounds::new(1, 3),
            use_region_decks: false,
        }
    }
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board generation parameters.
    pub generation: GenerationConfig,
    /// Turn pacing parameters.
    pub turn: TurnConfig,
    /// Starting attributes of the player.
    pub player: PlayerConfig,
    /// Encounter parameters.
    pub encounters: EncounterConfig,
    /// Number of message log lines retained.
    pub log_capacity: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::default(),
            turn: TurnConfig::default(),
            player: PlayerConfig::default(),
            encounters: EncounterConfig::default(),
            log_capacity: 200,
        }
    }
}

impl GameConfig {
    /// Checks that every value is usable by the generator and the turn loop.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let generation = &self.generation;
        check_range("generation.loop_count", widen(generation.loop_count))?;
        check_range("generation.loop_tiles", widen(generation.loop_tiles))?;
        if generation.loop_count.min == 0 {
            return Err(ConfigError::NoLoops);
        }
        if generation.loop_tiles.min < 4 {
            return Err(ConfigError::LoopTooSmall {
                min: generation.loop_tiles.min,
            });
        }
        check_probability("generation.cross_link_chance", generation.cross_link_chance)?;
        check_probability("generation.shop_chance", generation.shop_chance)?;
        if !generation.tile_size.is_finite() || generation.tile_size <= 0.0 {
            return Err(ConfigError::TileSize {
                size: generation.tile_size,
            });
        }
        if generation.themes.is_empty() {
            return Err(ConfigError::NoThemes);
        }
        if self.turn.step_interval_ms == 0 {
            return Err(ConfigError::ZeroStepInterval);
        }
        if self.player.health > MAX_HEALTH {
            return Err(ConfigError::HealthAboveCap {
                health: self.player.health,
            });
        }
        check_probability("encounters.monster_chance", self.encounters.monster_chance)?;
        check_range(
            "encounters.monster_power",
            widen(self.encounters.monster_power),
        )?;
        check_range("encounters.buff_power", widen(self.encounters.buff_power))
    }
}

fn widen<T: TryInto<u64>>(bounds: Bounds<T>) -> Bounds<u64> {
    Bounds {
        min: bounds.min.try_into().unwrap_or(u64::MAX),
        max: bounds.max.try_into().unwrap_or(u64::MAX),
    }
}

fn check_range(field: &'static str, bounds: Bounds<u64>) -> Result<(), ConfigError> {
    if bounds.min > bounds.max {
        return Err(ConfigError::InvertedRange {
            field,
            min: bounds.min,
            max: bounds.max,
        });
    }
    Ok(())
}

fn check_probability(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Probability { field, value })
    }
}
