use loop_quest_core::{Command, Event, GridCell, KeeperKind, Phase, ShopOffer, TileId, Travel};
use loop_quest_system_movement::{landing_tiles, landing_tiles_in_order, path_to, Movement};
use loop_quest_world::{
    self as world,
    board::{Board, LoopKind},
    cards::{self, CardCatalog},
    config::{Bounds, GameConfig, GenerationConfig},
    layout::RectSpec,
    query,
    shop::Shop,
    sizing::RectDims,
    topology,
    World,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn square(board: &mut Board, x: i32, y: i32) -> usize {
    let config = GenerationConfig::default();
    board.add_region(
        &RectSpec::new(GridCell::new(x, y), RectDims::new(3, 3)),
        &config.grid(),
        0,
    )
}

fn bridge(board: &mut Board, ends: [TileId; 2]) -> usize {
    let grid = GenerationConfig::default().grid();
    let cells = [GridCell::new(-10, -10), GridCell::new(-10, -11)];
    board.add_bridge(cells, ends, &grid)
}

fn tile(loop_index: usize, tile_index: usize) -> TileId {
    TileId::new(loop_index, tile_index)
}

/// Two squares side by side joined by a bridge between their facing midpoints.
fn bridged_pair() -> Board {
    let mut board = Board::default();
    let a = square(&mut board, 0, 0);
    let b = square(&mut board, 5, 0);
    let _ = bridge(&mut board, [tile(a, 3), tile(b, 7)]);
    board
}

#[test]
fn isolated_loop_offers_both_directions() {
    let mut board = Board::default();
    let _ = square(&mut board, 0, 0);
    assert_eq!(
        landing_tiles(&board, tile(0, 0), 3),
        vec![tile(0, 3), tile(0, 5)]
    );
    assert_eq!(
        path_to(&board, tile(0, 0), 3, tile(0, 5)),
        Some(vec![tile(0, 7), tile(0, 6), tile(0, 5)])
    );
}

#[test]
fn bridges_take_two_hops_and_are_never_stops() {
    let board = bridged_pair();
    let start = tile(0, 3);

    assert_eq!(
        landing_tiles(&board, start, 2),
        vec![tile(0, 1), tile(0, 5)]
    );
    assert_eq!(
        landing_tiles(&board, start, 3),
        vec![tile(0, 0), tile(0, 6), tile(1, 7)]
    );
    assert_eq!(
        landing_tiles(&board, start, 4),
        vec![tile(0, 7), tile(1, 0), tile(1, 6)]
    );
    assert_eq!(
        path_to(&board, start, 3, tile(1, 7)),
        Some(vec![tile(2, 0), tile(2, 1), tile(1, 7)])
    );
}

#[test]
fn only_one_bridge_per_roll() {
    let mut board = bridged_pair();
    let c = square(&mut board, 5, 5);
    let _ = bridge(&mut board, [tile(1, 7), tile(c, 1)]);

    for steps in 1..=6 {
        let destinations = landing_tiles(&board, tile(0, 3), steps);
        assert!(
            destinations.iter().all(|id| id.loop_index() != c),
            "crossed two bridges with {steps} steps: {destinations:?}"
        );
    }
    assert_eq!(
        landing_tiles(&board, tile(1, 7), 3),
        vec![tile(0, 3), tile(1, 2), tile(1, 4), tile(c, 1)]
    );
}

#[test]
fn shops_are_never_entered() {
    let mut board = Board::default();
    let _ = square(&mut board, 0, 0);
    let offer = ShopOffer {
        card: cards::buff_strength(1),
        price: 5,
    };
    let shop = Shop::new(
        "Muddy Boots",
        KeeperKind::Pig,
        [offer.clone(), offer.clone(), offer],
    );
    let grid = GenerationConfig::default().grid();
    let spur = board.add_shop(GridCell::new(2, 3), tile(0, 4), shop, &grid);

    let destinations = landing_tiles(&board, tile(0, 4), 1);
    assert_eq!(destinations, vec![tile(0, 3), tile(0, 5)]);
    assert!(!destinations.contains(&spur));
    assert!(landing_tiles(&board, tile(0, 4), 2)
        .iter()
        .all(|id| id.loop_index() == 0));
}

#[test]
fn system_answers_rolls_and_confirmations() {
    let mut board = Board::default();
    let _ = square(&mut board, 0, 0);
    let mut movement = Movement::default();
    let mut commands = Vec::new();

    movement.handle(
        &[Event::DiceRolled {
            turn: 1,
            roll: 3,
            from: tile(0, 0),
        }],
        &board,
        &mut commands,
    );
    movement.handle(
        &[Event::DestinationConfirmed {
            from: tile(0, 0),
            roll: 3,
            goal: tile(0, 3),
        }],
        &board,
        &mut commands,
    );
    movement.handle(
        &[Event::DestinationConfirmed {
            from: tile(0, 0),
            roll: 3,
            goal: tile(0, 4),
        }],
        &board,
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![
            Command::OfferDestinations {
                roll: 3,
                destinations: vec![tile(0, 3), tile(0, 5)],
            },
            Command::FollowPath {
                path: vec![tile(0, 1), tile(0, 2), tile(0, 3)],
            },
        ]
    );
    assert_eq!(movement.searches(), 3);
}

#[test]
fn world_and_system_complete_a_turn() {
    let mut config = GameConfig::default();
    config.generation.loop_count = Bounds::new(4, 8);
    let mut world = World::with_config(config, 0xdecade).expect("generation");
    let mut movement = Movement::default();

    pump_system(&mut world, &mut movement, Command::RollDice);
    let turn = query::turn_snapshot(&world);
    assert_eq!(turn.phase, Phase::TargetSelect);
    assert_eq!(
        turn.destinations,
        landing_tiles(query::board(&world), tile(0, 0), turn.last_roll)
    );
    if turn.destinations.is_empty() {
        pump_system(&mut world, &mut movement, Command::CancelSelection);
        assert_eq!(query::phase(&world), Phase::Idle);
        return;
    }

    let goal = turn.destinations[0];
    pump_system(&mut world, &mut movement, Command::ConfirmSelection);
    let turn = query::turn_snapshot(&world);
    assert_eq!(turn.phase, Phase::Animating);
    assert_eq!(turn.path.len() as u32, turn.last_roll);
    assert_eq!(turn.path.last(), Some(&goal));

    pump_system(
        &mut world,
        &mut movement,
        Command::Tick {
            dt: std::time::Duration::from_secs(5),
        },
    );
    assert_eq!(query::player(&world).at(), goal);
    assert!(query::active_card(&world).is_some());
}

fn pump_system(world: &mut World, movement: &mut Movement, command: Command) {
    let mut pending = vec![command];
    while !pending.is_empty() {
        let mut events = Vec::new();
        for command in pending.drain(..) {
            world::apply(world, command, &mut events);
        }
        movement.handle(&events, query::board(world), &mut pending);
    }
}

fn region_tiles(board: &Board) -> Vec<TileId> {
    board
        .loops()
        .iter()
        .enumerate()
        .filter(|(_, owner)| matches!(owner.kind(), LoopKind::Region { .. }))
        .flat_map(|(loop_index, owner)| {
            (0..owner.len()).map(move |index| tile(loop_index, index))
        })
        .collect()
}

fn generated(seed: u64) -> Board {
    let config = GenerationConfig {
        loop_count: Bounds::new(3, 10),
        shop_chance: 0.3,
        ..GenerationConfig::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    topology::generate(&config, &CardCatalog::default(), &mut rng).expect("sizeable")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn destinations_ignore_search_order(
        seed in any::<u64>(),
        pick in any::<usize>(),
        steps in 1u32..=6
    ) {
        let board = generated(seed);
        let starts = region_tiles(&board);
        let start = starts[pick % starts.len()];

        let forward = landing_tiles_in_order(&board, start, steps, Travel::ALL);
        let backward = landing_tiles_in_order(
            &board,
            start,
            steps,
            [Travel::CounterClockwise, Travel::Clockwise],
        );
        prop_assert_eq!(&forward, &backward);
        prop_assert_eq!(&forward, &landing_tiles(&board, start, steps));

        let again = landing_tiles(&board, start, steps);
        prop_assert_eq!(landing_tiles(&board, start, steps), again);
    }

    #[test]
    fn every_destination_has_an_exact_path(
        seed in any::<u64>(),
        pick in any::<usize>(),
        steps in 1u32..=6
    ) {
        let board = generated(seed);
        let starts = region_tiles(&board);
        let start = starts[pick % starts.len()];

        for goal in landing_tiles(&board, start, steps) {
            prop_assert!(board.is_stop(goal), "{} is not a stop", goal);
            prop_assert_ne!(goal, start);

            let path = path_to(&board, start, steps, goal).expect("destinations have paths");
            prop_assert_eq!(path.len(), steps as usize);
            prop_assert_eq!(path.last(), Some(&goal));

            let mut previous = start;
            for hop in &path {
                let from = board.tile(previous).expect("tile on path");
                let adjacent =
                    from.next() == *hop || from.prev() == *hop || from.links().contains(hop);
                prop_assert!(adjacent, "{} -> {} is not a hop", previous, hop);
                prop_assert!(!board.is_shop(*hop));
                previous = *hop;
            }
            let bridges = path.iter().filter(|hop| board.is_bridge(**hop)).count();
            prop_assert!(bridges == 0 || bridges == 2, "bridge hops: {}", bridges);
        }
    }
}
