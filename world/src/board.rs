//! Immutable-once-built graph of loops, bridges and shop spurs.

use std::collections::BTreeMap;

use glam::Vec2;
use loop_quest_core::{GridCell, TileId, Travel};

use crate::{config::LoopTheme, grid::Grid, layout::RectSpec, shop::Shop};

/// Role of a tile within the movement grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileKind {
    /// Ordinary perimeter tile; a legal stop.
    Path,
    /// One half of a two-tile bridge; never a stop.
    Bridge,
    /// Shop spur; never entered by movement.
    Shop,
}

/// Single board tile.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    position: Vec2,
    cell: GridCell,
    next: TileId,
    prev: TileId,
    links: Vec<TileId>,
    kind: TileKind,
}

impl Tile {
    /// Pixel centre of the tile.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Grid cell occupied by the tile.
    #[must_use]
    pub const fn cell(&self) -> GridCell {
        self.cell
    }

    /// Following tile in the loop's cyclic order.
    #[must_use]
    pub const fn next(&self) -> TileId {
        self.next
    }

    /// Preceding tile in the loop's cyclic order.
    #[must_use]
    pub const fn prev(&self) -> TileId {
        self.prev
    }

    /// Neighbour reached by walking one hop in `travel` direction.
    #[must_use]
    pub const fn step(&self, travel: Travel) -> TileId {
        match travel {
            Travel::Clockwise => self.next,
            Travel::CounterClockwise => self.prev,
        }
    }

    /// Cross-loop connections, in creation order.
    #[must_use]
    pub fn links(&self) -> &[TileId] {
        &self.links
    }

    /// Role of the tile.
    #[must_use]
    pub const fn kind(&self) -> TileKind {
        self.kind
    }
}

/// Category of a loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoopKind {
    /// Ordinary rectangular perimeter.
    Region {
        /// Index into the board's theme list.
        theme: usize,
    },
    /// Two-tile corridor between regions.
    Bridge,
    /// One-tile shop spur.
    Shop,
}

/// Ordered cyclic tile sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct Loop {
    tiles: Vec<Tile>,
    kind: LoopKind,
}

impl Loop {
    /// Tiles in cyclic order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Category of the loop.
    #[must_use]
    pub const fn kind(&self) -> LoopKind {
        self.kind
    }

    /// Number of tiles in the loop.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Reports whether the loop has no tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Index of the tile occupying `cell`, if any.
    #[must_use]
    pub fn position_of(&self, cell: GridCell) -> Option<usize> {
        self.tiles.iter().position(|tile| tile.cell == cell)
    }
}

/// Loop counts by category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Census {
    /// Ordinary region loops.
    pub regions: usize,
    /// Bridge loops.
    pub bridges: usize,
    /// Shop loops.
    pub shops: usize,
    /// Tiles across every loop.
    pub tiles: usize,
}

impl Census {
    /// Total number of loops.
    #[must_use]
    pub const fn loops(&self) -> usize {
        self.regions + self.bridges + self.shops
    }
}

/// The generated world: loops plus the shop inventory keyed by shop tile.
///
/// Loop indices are stable once assigned. Loops are appended regions first,
/// then bridges, then shops.
#[derive(Clone, Debug, Default)]
pub struct Board {
    loops: Vec<Loop>,
    shops: BTreeMap<TileId, Shop>,
    themes: Vec<LoopTheme>,
}

impl Board {
    /// Creates an empty board that resolves region themes from `themes`.
    #[must_use]
    pub fn new(themes: Vec<LoopTheme>) -> Self {
        Self {
            loops: Vec::new(),
            shops: BTreeMap::new(),
            themes,
        }
    }

    /// Every loop in index order.
    #[must_use]
    pub fn loops(&self) -> &[Loop] {
        &self.loops
    }

    /// Loop stored at `index`.
    #[must_use]
    pub fn loop_at(&self, index: usize) -> Option<&Loop> {
        self.loops.get(index)
    }

    /// Tile identified by `id`.
    #[must_use]
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.loops
            .get(id.loop_index())
            .and_then(|owner| owner.tiles.get(id.tile_index()))
    }

    /// Role of the tile identified by `id`.
    #[must_use]
    pub fn kind_of(&self, id: TileId) -> Option<TileKind> {
        self.tile(id).map(Tile::kind)
    }

    /// Reports whether `id` names a path tile, the only legal stop.
    #[must_use]
    pub fn is_stop(&self, id: TileId) -> bool {
        self.kind_of(id) == Some(TileKind::Path)
    }

    /// Reports whether `id` names a bridge tile.
    #[must_use]
    pub fn is_bridge(&self, id: TileId) -> bool {
        self.kind_of(id) == Some(TileKind::Bridge)
    }

    /// Reports whether `id` names a shop tile.
    #[must_use]
    pub fn is_shop(&self, id: TileId) -> bool {
        self.kind_of(id) == Some(TileKind::Shop)
    }

    /// Theme of the region loop at `index`.
    #[must_use]
    pub fn theme_of(&self, index: usize) -> Option<&LoopTheme> {
        match self.loops.get(index)?.kind {
            LoopKind::Region { theme } => self.themes.get(theme),
            LoopKind::Bridge | LoopKind::Shop => None,
        }
    }

    /// Shop hosted on tile `id`.
    #[must_use]
    pub fn shop(&self, id: TileId) -> Option<&Shop> {
        self.shops.get(&id)
    }

    /// Mutable access to the shop hosted on tile `id`.
    pub fn shop_mut(&mut self, id: TileId) -> Option<&mut Shop> {
        self.shops.get_mut(&id)
    }

    /// Every shop ordered by hosting tile.
    pub fn shops(&self) -> impl Iterator<Item = (TileId, &Shop)> {
        self.shops.iter().map(|(id, shop)| (*id, shop))
    }

    /// First shop tile linked to `id`.
    #[must_use]
    pub fn shop_linked_to(&self, id: TileId) -> Option<TileId> {
        self.tile(id)?
            .links
            .iter()
            .copied()
            .find(|link| self.shops.contains_key(link))
    }

    /// Counts loops and tiles by category.
    #[must_use]
    pub fn census(&self) -> Census {
        self.loops
            .iter()
            .fold(Census::default(), |mut census, owner| {
                match owner.kind {
                    LoopKind::Region { .. } => census.regions += 1,
                    LoopKind::Bridge => census.bridges += 1,
                    LoopKind::Shop => census.shops += 1,
                }
                census.tiles += owner.len();
                census
            })
    }

    /// Appends a region loop tracing the perimeter of `spec` and returns its index.
    pub fn add_region(&mut self, spec: &RectSpec, grid: &Grid, theme: usize) -> usize {
        let cells: Vec<GridCell> = spec.perimeter().collect();
        self.push_loop(&cells, grid, TileKind::Path, LoopKind::Region { theme })
    }

    /// Appends a two-tile bridge whose ends link to `ends[0]` and `ends[1]`.
    pub fn add_bridge(&mut self, cells: [GridCell; 2], ends: [TileId; 2], grid: &Grid) -> usize {
        let index = self.push_loop(&cells, grid, TileKind::Bridge, LoopKind::Bridge);
        self.link(TileId::new(index, 0), ends[0]);
        self.link(TileId::new(index, 1), ends[1]);
        index
    }

    /// Appends a one-tile shop spur linked to `host` and stocks it with `shop`.
    pub fn add_shop(&mut self, cell: GridCell, host: TileId, shop: Shop, grid: &Grid) -> TileId {
        let index = self.push_loop(&[cell], grid, TileKind::Shop, LoopKind::Shop);
        let id = TileId::new(index, 0);
        self.link(id, host);
        let _ = self.shops.insert(id, shop);
        id
    }

    fn push_loop(
        &mut self,
        cells: &[GridCell],
        grid: &Grid,
        kind: TileKind,
        loop_kind: LoopKind,
    ) -> usize {
        let index = self.loops.len();
        let count = cells.len();
        let tiles = cells
            .iter()
            .enumerate()
            .map(|(position, cell)| Tile {
                position: grid.center(*cell),
                cell: *cell,
                next: TileId::new(index, (position + 1) % count),
                prev: TileId::new(index, (position + count - 1) % count),
                links: Vec::new(),
                kind,
            })
            .collect();
        self.loops.push(Loop {
            tiles,
            kind: loop_kind,
        });
        index
    }

    fn link(&mut self, a: TileId, b: TileId) {
        for (from, to) in [(a, b), (b, a)] {
            if let Some(tile) = self
                .loops
                .get_mut(from.loop_index())
                .and_then(|owner| owner.tiles.get_mut(from.tile_index()))
            {
                tile.links.push(to);
            }
        }
    }
}
