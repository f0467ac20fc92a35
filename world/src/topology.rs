//! Turns a planned layout into a linked board of loops, bridges and shops.

use loop_quest_core::TileId;
use rand::Rng;
use tracing::{info, warn};

use crate::{
    board::Board,
    cards::CardCatalog,
    config::GenerationConfig,
    layout::{Corridor, Layout},
    shop::Shop,
    sizing::{even_tile_count, rect_dims_for_perimeter, RectDims},
    GenerationError,
};

const SEEDED_THEMES: usize = 3;

/// Generates a complete board: random loop sizes, layout, bridges and shops.
pub fn generate<R: Rng + ?Sized>(
    config: &GenerationConfig,
    catalog: &CardCatalog,
    rng: &mut R,
) -> Result<Board, GenerationError> {
    let count = config.loop_count.sample(rng);
    let sizes: Vec<usize> = (0..count).map(|_| config.loop_tiles.sample(rng)).collect();
    build_board(&sizes, config, catalog, rng)
}

/// Builds a board from explicit loop sizes; odd sizes are rounded up.
pub fn build_board<R: Rng + ?Sized>(
    sizes: &[usize],
    config: &GenerationConfig,
    catalog: &CardCatalog,
    rng: &mut R,
) -> Result<Board, GenerationError> {
    let dims = sizes
        .iter()
        .map(|tiles| rect_dims_for_perimeter(even_tile_count(*tiles)))
        .collect::<Result<Vec<RectDims>, _>>()?;

    let mut layout = Layout::plan(&dims, config.cross_link_chance, rng);
    let _ = layout.close_cycles();

    let grid = config.grid();
    let mut board = Board::new(config.themes.clone());
    for (index, spec) in layout.specs().iter().enumerate() {
        let theme = if index < SEEDED_THEMES.min(config.themes.len()) {
            index
        } else {
            rng.gen_range(0..config.themes.len().max(1))
        };
        let _ = board.add_region(spec, &grid, theme);
    }

    for corridor in layout.corridors() {
        match corridor_ends(&board, corridor) {
            Some(ends) => {
                let _ = board.add_bridge(corridor.placement().corridor(), ends, &grid);
            }
            None => warn!(
                anchor = corridor.anchor(),
                far = corridor.far(),
                "corridor endpoints missing from perimeters, skipping bridge"
            ),
        }
    }

    sprout_shops(&mut board, &mut layout, config, catalog, rng);

    let census = board.census();
    info!(
        regions = census.regions,
        bridges = census.bridges,
        shops = census.shops,
        tiles = census.tiles,
        "generated board"
    );
    Ok(board)
}

fn corridor_ends(board: &Board, corridor: &Corridor) -> Option<[TileId; 2]> {
    let placement = corridor.placement();
    let anchor = board
        .loop_at(corridor.anchor())?
        .position_of(placement.anchor_mid())?;
    let far = board
        .loop_at(corridor.far())?
        .position_of(placement.far_mid())?;
    Some([
        TileId::new(corridor.anchor(), anchor),
        TileId::new(corridor.far(), far),
    ])
}

fn sprout_shops<R: Rng + ?Sized>(
    board: &mut Board,
    layout: &mut Layout,
    config: &GenerationConfig,
    catalog: &CardCatalog,
    rng: &mut R,
) {
    let grid = config.grid();
    let specs = layout.specs().to_vec();
    for (loop_index, spec) in specs.iter().enumerate() {
        let cells: Vec<_> = spec.perimeter().collect();
        for (tile_index, cell) in cells.into_iter().enumerate() {
            if rng.gen::<f32>() >= config.shop_chance {
                continue;
            }
            let Some(heading) = spec.outward_heading(cell) else {
                continue;
            };
            let shop_cell = cell.stepped(heading, 1);
            if layout.occupancy().contains(shop_cell) {
                continue;
            }
            let shop = Shop::stock(catalog, rng);
            let _ = board.add_shop(shop_cell, TileId::new(loop_index, tile_index), shop, &grid);
            layout.occupancy_mut().claim([shop_cell]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{LoopKind, TileKind};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn quiet_config() -> GenerationConfig {
        GenerationConfig {
            shop_chance: 0.0,
            ..GenerationConfig::default()
        }
    }

    #[test]
    fn single_loop_has_no_bridges() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let board = build_board(&[8], &quiet_config(), &CardCatalog::default(), &mut rng)
            .expect("sizeable");
        assert_eq!(board.loops().len(), 1);
        assert_eq!(board.loops()[0].kind(), LoopKind::Region { theme: 0 });
        assert_eq!(board.loops()[0].len(), 8);
    }

    #[test]
    fn odd_sizes_round_up() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let board = build_board(&[9], &quiet_config(), &CardCatalog::default(), &mut rng)
            .expect("sizeable");
        assert_eq!(board.loops()[0].len(), 10);
    }

    #[test]
    fn unsizeable_loops_fail() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let error = build_board(&[8, 2], &quiet_config(), &CardCatalog::default(), &mut rng)
            .expect_err("two tiles cannot form a rectangle");
        assert_eq!(error, GenerationError::UnsizeableLoop { tiles: 2 });
    }

    #[test]
    fn first_three_regions_take_the_first_three_themes() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let catalog = CardCatalog::default();
        let board =
            build_board(&[8, 8, 8, 8], &quiet_config(), &catalog, &mut rng).expect("sizeable");
        for index in 0..3 {
            assert_eq!(
                board.loops()[index].kind(),
                LoopKind::Region { theme: index }
            );
        }
        assert_eq!(
            board.theme_of(1).map(|theme| theme.name.as_str()),
            Some("Forest Paths")
        );
    }

    #[test]
    fn certain_shops_fill_free_outward_cells() {
        let config = GenerationConfig {
            shop_chance: 1.0,
            ..GenerationConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let board =
            build_board(&[8], &config, &CardCatalog::default(), &mut rng).expect("sizeable");

        // Every perimeter tile of a lone 3x3 loop has a free outward cell.
        assert_eq!(board.census().shops, 8);
        for (id, shop) in board.shops() {
            let tile = board.tile(id).expect("shop tile");
            assert_eq!(tile.kind(), TileKind::Shop);
            assert_eq!(tile.next(), id);
            assert_eq!(tile.links().len(), 1);
            let host = tile.links()[0];
            assert_eq!(board.shop_linked_to(host), Some(id));
            assert!(!shop.discovered());
        }
    }
}
