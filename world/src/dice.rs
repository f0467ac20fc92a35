//! Source of die rolls for fights and movement.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Produces uniformly distributed die faces.
pub trait Dice {
    /// Rolls a die with `faces` sides and returns a value in `1..=faces`.
    fn roll(&mut self, faces: u32) -> u32;
}

impl Dice for ChaCha8Rng {
    fn roll(&mut self, faces: u32) -> u32 {
        self.gen_range(1..=faces.max(1))
    }
}
