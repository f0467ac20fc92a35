//! Shop stock owned by the board.

use loop_quest_core::{Card, KeeperKind, ShopOffer, ShopSnapshot, TileId, SHOP_SLOTS};
use rand::Rng;

use crate::cards::{price_for, CardCatalog};

/// Persistent shop attached to a shop tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shop {
    name: String,
    keeper: KeeperKind,
    offers: [ShopOffer; SHOP_SLOTS],
    discovered: bool,
}

impl Shop {
    /// Creates an undiscovered shop with the given stock.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        keeper: KeeperKind,
        offers: [ShopOffer; SHOP_SLOTS],
    ) -> Self {
        Self {
            name: name.into(),
            keeper,
            offers,
            discovered: false,
        }
    }

    /// Opens a shop with a random keeper, name and three priced offers.
    pub fn stock<R: Rng + ?Sized>(catalog: &CardCatalog, rng: &mut R) -> Self {
        let keeper = KeeperKind::ALL[rng.gen_range(0..KeeperKind::ALL.len())];
        let name = catalog.shop_name(keeper, rng);
        let offers = std::array::from_fn(|_| fresh_offer(catalog, keeper, rng));
        Self::new(name, keeper, offers)
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Keeper personality.
    #[must_use]
    pub const fn keeper(&self) -> KeeperKind {
        self.keeper
    }

    /// Offers in slot order.
    #[must_use]
    pub fn offers(&self) -> &[ShopOffer] {
        &self.offers
    }

    /// Offer in `slot`, if the slot exists.
    #[must_use]
    pub fn offer(&self, slot: usize) -> Option<&ShopOffer> {
        self.offers.get(slot)
    }

    /// Whether the player has entered the shop before.
    #[must_use]
    pub const fn discovered(&self) -> bool {
        self.discovered
    }

    /// Marks the shop as visited; returns `true` on the first visit.
    pub fn discover(&mut self) -> bool {
        !std::mem::replace(&mut self.discovered, true)
    }

    /// Replaces the offer in `slot` with a fresh card from the keeper's deck
    /// and returns the new offer.
    pub fn restock<R: Rng + ?Sized>(
        &mut self,
        slot: usize,
        catalog: &CardCatalog,
        rng: &mut R,
    ) -> Option<&ShopOffer> {
        let keeper = self.keeper;
        let offer = self.offers.get_mut(slot)?;
        *offer = fresh_offer(catalog, keeper, rng);
        Some(offer)
    }

    /// Read-only view used by presentation layers.
    #[must_use]
    pub fn snapshot(&self, tile: TileId) -> ShopSnapshot {
        ShopSnapshot {
            tile,
            name: self.name.clone(),
            keeper: self.keeper,
            offers: self.offers.to_vec(),
            discovered: self.discovered,
        }
    }
}

fn fresh_offer<R: Rng + ?Sized>(
    catalog: &CardCatalog,
    keeper: KeeperKind,
    rng: &mut R,
) -> ShopOffer {
    let card: Card = catalog.shop_card(keeper, rng);
    let price = price_for(&card, rng);
    ShopOffer { card, price }
}
