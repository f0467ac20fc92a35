//! Places rectangular loops on the grid and records the corridors between them.

use std::collections::HashSet;

use loop_quest_core::{GridCell, Heading};
use rand::{seq::SliceRandom, Rng};
use tracing::{debug, warn};

use crate::sizing::RectDims;

/// Rectangle anchored at its top-left grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RectSpec {
    origin: GridCell,
    dims: RectDims,
}

impl RectSpec {
    /// Creates a rectangle with the provided top-left cell and dimensions.
    #[must_use]
    pub const fn new(origin: GridCell, dims: RectDims) -> Self {
        Self { origin, dims }
    }

    /// Top-left cell.
    #[must_use]
    pub const fn origin(&self) -> GridCell {
        self.origin
    }

    /// Width and height in tiles.
    #[must_use]
    pub const fn dims(&self) -> RectDims {
        self.dims
    }

    /// Perimeter cells in loop order: top left to right, right side top to
    /// bottom, bottom right to left, left side bottom to top. Corners appear once.
    pub fn perimeter(&self) -> impl Iterator<Item = GridCell> {
        let (gx, gy) = (self.origin.x(), self.origin.y());
        let (cols, rows) = (self.dims.cols(), self.dims.rows());
        let top = (0..cols).map(move |x| GridCell::new(gx + x, gy));
        let right = (1..rows - 1).map(move |y| GridCell::new(gx + cols - 1, gy + y));
        let bottom = (0..cols)
            .rev()
            .map(move |x| GridCell::new(gx + x, gy + rows - 1));
        let left = (1..rows - 1).rev().map(move |y| GridCell::new(gx, gy + y));
        top.chain(right).chain(bottom).chain(left)
    }

    /// Midpoint cell of the side facing `heading`.
    #[must_use]
    pub const fn side_mid(&self, heading: Heading) -> GridCell {
        let (gx, gy) = (self.origin.x(), self.origin.y());
        let (cols, rows) = (self.dims.cols(), self.dims.rows());
        match heading {
            Heading::Right => GridCell::new(gx + cols - 1, gy + rows / 2),
            Heading::Left => GridCell::new(gx, gy + rows / 2),
            Heading::Up => GridCell::new(gx + cols / 2, gy),
            Heading::Down => GridCell::new(gx + cols / 2, gy + rows - 1),
        }
    }

    /// Direction pointing away from the rectangle at perimeter cell `cell`.
    ///
    /// Side columns excluding corners face horizontally; top and bottom rows,
    /// corners included, face vertically.
    #[must_use]
    pub const fn outward_heading(&self, cell: GridCell) -> Option<Heading> {
        let (gx, gy) = (self.origin.x(), self.origin.y());
        let (right, bottom) = (gx + self.dims.cols() - 1, gy + self.dims.rows() - 1);
        if cell.y() == gy {
            Some(Heading::Up)
        } else if cell.y() == bottom {
            Some(Heading::Down)
        } else if cell.x() == gx {
            Some(Heading::Left)
        } else if cell.x() == right {
            Some(Heading::Right)
        } else {
            None
        }
    }
}

/// Result of positioning a rectangle next to an anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    spec: RectSpec,
    heading: Heading,
    corridor: [GridCell; 2],
    anchor_mid: GridCell,
    far_mid: GridCell,
}

impl Placement {
    /// Rectangle of the placed loop.
    #[must_use]
    pub const fn spec(&self) -> RectSpec {
        self.spec
    }

    /// Direction from the anchor toward the placed loop.
    #[must_use]
    pub const fn heading(&self) -> Heading {
        self.heading
    }

    /// The two corridor cells, anchor side first.
    #[must_use]
    pub const fn corridor(&self) -> [GridCell; 2] {
        self.corridor
    }

    /// Side midpoint of the anchor that the corridor starts from.
    #[must_use]
    pub const fn anchor_mid(&self) -> GridCell {
        self.anchor_mid
    }

    /// Side midpoint of the placed loop that the corridor ends at.
    #[must_use]
    pub const fn far_mid(&self) -> GridCell {
        self.far_mid
    }
}

/// Positions a rectangle of `dims` on the `heading` side of `anchor`, leaving a
/// two-cell corridor between the facing side midpoints.
#[must_use]
pub fn place_around(anchor: &RectSpec, dims: RectDims, heading: Heading) -> Placement {
    let anchor_mid = anchor.side_mid(heading);
    let far_mid = anchor_mid.stepped(heading, 3);
    let (cols, rows) = (dims.cols(), dims.rows());
    let origin = match heading {
        Heading::Right => GridCell::new(far_mid.x(), far_mid.y() - rows / 2),
        Heading::Left => GridCell::new(far_mid.x() - (cols - 1), far_mid.y() - rows / 2),
        Heading::Down => GridCell::new(far_mid.x() - cols / 2, far_mid.y()),
        Heading::Up => GridCell::new(far_mid.x() - cols / 2, far_mid.y() - (rows - 1)),
    };
    Placement {
        spec: RectSpec::new(origin, dims),
        heading,
        corridor: [
            anchor_mid.stepped(heading, 1),
            anchor_mid.stepped(heading, 2),
        ],
        anchor_mid,
        far_mid,
    }
}

/// Accepted connection between two region loops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Corridor {
    anchor: usize,
    far: usize,
    placement: Placement,
}

impl Corridor {
    /// Index of the loop the corridor starts from.
    #[must_use]
    pub const fn anchor(&self) -> usize {
        self.anchor
    }

    /// Index of the loop the corridor ends at.
    #[must_use]
    pub const fn far(&self) -> usize {
        self.far
    }

    /// Geometry of the placement that produced the corridor.
    #[must_use]
    pub const fn placement(&self) -> &Placement {
        &self.placement
    }
}

/// Set of grid cells already claimed by perimeters, corridors or shops.
#[derive(Clone, Debug, Default)]
pub struct Occupancy {
    cells: HashSet<GridCell>,
}

impl Occupancy {
    /// Reports whether `cell` is claimed.
    #[must_use]
    pub fn contains(&self, cell: GridCell) -> bool {
        self.cells.contains(&cell)
    }

    /// Number of claimed cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether nothing has been claimed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub(crate) fn claim(&mut self, cells: impl IntoIterator<Item = GridCell>) {
        self.cells.extend(cells);
    }

    fn any_claimed(&self, mut cells: impl Iterator<Item = GridCell>) -> bool {
        cells.any(|cell| self.cells.contains(&cell))
    }

    fn accepts(&self, placement: &Placement) -> bool {
        !self.any_claimed(placement.corridor.into_iter())
            && !self.any_claimed(placement.spec.perimeter())
    }
}

/// Rectangles, corridors and occupancy produced by the planner.
#[derive(Clone, Debug, Default)]
pub struct Layout {
    specs: Vec<RectSpec>,
    corridors: Vec<Corridor>,
    occupancy: Occupancy,
    forced: usize,
}

impl Layout {
    /// Places one rectangle per entry of `dims`, each attached to an earlier one.
    ///
    /// Loop 0 sits at the grid origin. Loop `i` tries a random earlier loop
    /// first (with probability `cross_link_chance`, for `i >= 2`) and then loop
    /// `i - 1`, each with the four headings in shuffled order. When nothing
    /// fits, the loop is forced to the right of loop `i - 1`.
    pub fn plan<R: Rng + ?Sized>(dims: &[RectDims], cross_link_chance: f32, rng: &mut R) -> Self {
        let mut layout = Self::default();
        let Some((first, rest)) = dims.split_first() else {
            return layout;
        };
        layout.place_root(*first);
        for loop_dims in rest {
            layout.place_next(*loop_dims, cross_link_chance, rng);
        }
        if layout.forced > 0 {
            debug!(
                forced = layout.forced,
                loops = layout.specs.len(),
                "layout needed forced placements"
            );
        }
        layout
    }

    fn place_root(&mut self, dims: RectDims) {
        let root = RectSpec::new(GridCell::new(0, 0), dims);
        self.occupancy.claim(root.perimeter());
        self.specs.push(root);
    }

    fn place_next<R: Rng + ?Sized>(
        &mut self,
        loop_dims: RectDims,
        cross_link_chance: f32,
        rng: &mut R,
    ) {
        let index = self.specs.len();
        let mut anchors = Vec::with_capacity(2);
        if index >= 2 && rng.gen::<f32>() < cross_link_chance {
            anchors.push(rng.gen_range(0..index - 1));
        }
        anchors.push(index - 1);

        let accepted = anchors.into_iter().find_map(|anchor| {
            let mut headings = Heading::ALL;
            headings.shuffle(rng);
            headings
                .into_iter()
                .map(|heading| place_around(&self.specs[anchor], loop_dims, heading))
                .find(|placement| self.occupancy.accepts(placement))
                .map(|placement| (anchor, placement))
        });

        let (anchor, placement) = match accepted {
            Some(found) => found,
            None => {
                warn!(
                    loop_index = index,
                    "no free placement found, forcing loop to the right of its predecessor"
                );
                self.forced += 1;
                let anchor = index - 1;
                (
                    anchor,
                    place_around(&self.specs[anchor], loop_dims, Heading::Right),
                )
            }
        };

        self.occupancy.claim(placement.spec.perimeter());
        self.occupancy.claim(placement.corridor);
        self.specs.push(placement.spec);
        self.corridors.push(Corridor {
            anchor,
            far: index,
            placement,
        });
    }

    /// Adds a corridor between every pair of loops that already sit exactly
    /// one corridor apart, trying Right, Left, Up, Down in that order and
    /// keeping at most one corridor per pair. Returns how many were added.
    pub fn close_cycles(&mut self) -> usize {
        let mut added = 0;
        for anchor in 0..self.specs.len() {
            for far in anchor + 1..self.specs.len() {
                let target = self.specs[far];
                let found = Heading::ALL.into_iter().find_map(|heading| {
                    let placement = place_around(&self.specs[anchor], target.dims(), heading);
                    let free = placement
                        .corridor
                        .iter()
                        .all(|cell| !self.occupancy.contains(*cell));
                    (placement.spec == target && free).then_some(placement)
                });
                if let Some(placement) = found {
                    self.occupancy.claim(placement.corridor);
                    self.corridors.push(Corridor {
                        anchor,
                        far,
                        placement,
                    });
                    added += 1;
                }
            }
        }
        debug!(added, "closed extra cycles between adjacent loops");
        added
    }

    /// Rectangles in loop order.
    #[must_use]
    pub fn specs(&self) -> &[RectSpec] {
        &self.specs
    }

    /// Corridors in creation order: spanning corridors first, then cycles.
    #[must_use]
    pub fn corridors(&self) -> &[Corridor] {
        &self.corridors
    }

    /// Cells claimed so far.
    #[must_use]
    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    /// Number of loops placed to the right of their predecessor because no
    /// free spot was found.
    #[must_use]
    pub fn forced(&self) -> usize {
        self.forced
    }

    pub(crate) fn occupancy_mut(&mut self) -> &mut Occupancy {
        &mut self.occupancy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn square(x: i32, y: i32) -> RectSpec {
        RectSpec::new(GridCell::new(x, y), RectDims::new(3, 3))
    }

    #[test]
    fn perimeter_walks_clockwise_from_top_left() {
        let cells: Vec<GridCell> = square(0, 0).perimeter().collect();
        assert_eq!(
            cells,
            vec![
                GridCell::new(0, 0),
                GridCell::new(1, 0),
                GridCell::new(2, 0),
                GridCell::new(2, 1),
                GridCell::new(2, 2),
                GridCell::new(1, 2),
                GridCell::new(0, 2),
                GridCell::new(0, 1),
            ]
        );
    }

    #[test]
    fn side_mids_sit_on_the_perimeter() {
        let spec = RectSpec::new(GridCell::new(4, -2), RectDims::new(5, 4));
        let perimeter: Vec<GridCell> = spec.perimeter().collect();
        for heading in Heading::ALL {
            assert!(perimeter.contains(&spec.side_mid(heading)));
        }
        assert_eq!(spec.side_mid(Heading::Right), GridCell::new(8, 0));
        assert_eq!(spec.side_mid(Heading::Up), GridCell::new(6, -2));
    }

    #[test]
    fn placements_leave_a_two_cell_corridor() {
        let anchor = square(0, 0);
        for heading in Heading::ALL {
            let placement = place_around(&anchor, RectDims::new(4, 3), heading);
            assert_eq!(
                placement.far_mid(),
                placement.spec().side_mid(heading.opposite())
            );
            assert_eq!(placement.anchor_mid(), anchor.side_mid(heading));
            assert_eq!(
                placement.corridor()[0],
                placement.anchor_mid().stepped(heading, 1)
            );
            assert_eq!(
                placement.corridor()[1],
                placement.far_mid().stepped(heading.opposite(), 1)
            );
        }

        let right = place_around(&anchor, RectDims::new(3, 3), Heading::Right);
        assert_eq!(right.spec(), square(5, 0));
        let up = place_around(&anchor, RectDims::new(3, 3), Heading::Up);
        assert_eq!(up.spec(), square(0, -5));
    }

    #[test]
    fn outward_headings_prefer_vertical_at_corners() {
        let spec = square(0, 0);
        assert_eq!(spec.outward_heading(GridCell::new(0, 0)), Some(Heading::Up));
        assert_eq!(
            spec.outward_heading(GridCell::new(2, 2)),
            Some(Heading::Down)
        );
        assert_eq!(
            spec.outward_heading(GridCell::new(0, 1)),
            Some(Heading::Left)
        );
        assert_eq!(
            spec.outward_heading(GridCell::new(2, 1)),
            Some(Heading::Right)
        );
        assert_eq!(spec.outward_heading(GridCell::new(1, 1)), None);
    }

    #[test]
    fn planned_perimeters_do_not_overlap_when_space_allows() {
        let dims = vec![RectDims::new(3, 3); 6];
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let layout = Layout::plan(&dims, 0.95, &mut rng);

        assert_eq!(layout.specs().len(), 6);
        assert_eq!(layout.corridors().len(), 5);
        let mut seen = HashSet::new();
        for spec in layout.specs() {
            for cell in spec.perimeter() {
                assert!(seen.insert(cell), "cell {cell:?} claimed twice");
            }
        }
        for corridor in layout.corridors() {
            assert!(corridor.anchor() < corridor.far());
            for cell in corridor.placement().corridor() {
                assert!(!seen.contains(&cell));
            }
        }
    }

    #[test]
    fn crowded_loops_are_forced_right_of_their_predecessor() {
        let dims = RectDims::new(4, 3);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut layout = Layout::default();
        layout.place_root(RectDims::new(3, 3));
        layout.place_next(RectDims::new(3, 3), 0.0, &mut rng);
        assert_eq!(layout.forced(), 0);

        let block = (-40..40).flat_map(|x| (-40..40).map(move |y| GridCell::new(x, y)));
        layout.occupancy_mut().claim(block);
        layout.place_next(dims, 1.0, &mut rng);

        assert_eq!(layout.forced(), 1);
        assert_eq!(layout.specs().len(), 3);
        let corridor = layout.corridors()[1];
        assert_eq!(corridor.anchor(), 1);
        assert_eq!(corridor.far(), 2);
        assert_eq!(corridor.placement().heading(), Heading::Right);
        let expected = place_around(&layout.specs()[1], dims, Heading::Right);
        assert_eq!(corridor.placement().spec(), expected.spec());
        assert_eq!(layout.specs()[2], expected.spec());
    }

    #[test]
    fn cycles_close_between_aligned_neighbours() {
        let mut layout = Layout::default();
        // Four squares around a 2x2 block, so 0-1, 1-3, 0-2 and 2-3 are aligned.
        for spec in [square(0, 0), square(5, 0), square(0, 5), square(5, 5)] {
            layout.occupancy.claim(spec.perimeter());
            layout.specs.push(spec);
        }

        assert_eq!(layout.close_cycles(), 4);
        let pairs: Vec<(usize, usize)> = layout
            .corridors()
            .iter()
            .map(|corridor| (corridor.anchor(), corridor.far()))
            .collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 3), (2, 3)]);
        assert_eq!(layout.corridors()[0].placement().heading(), Heading::Right);
        assert_eq!(layout.corridors()[1].placement().heading(), Heading::Down);
        assert_eq!(layout.close_cycles(), 0);
    }
}
