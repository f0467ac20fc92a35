use loop_quest_core::{Command, Event, Modal, Phase, TileId};
use loop_quest_system_controls::{ControlInput, ControlView, Controls};

fn press(controls: &mut Controls, input: ControlInput, view: ControlView) -> Vec<Command> {
    let mut commands = Vec::new();
    controls.handle(&[], input, &view, &mut commands);
    commands
}

fn idle() -> ControlView {
    ControlView::new(Modal::Phase(Phase::Idle))
}

#[test]
fn idle_rolls_before_anything_else() {
    let mut controls = Controls::default();
    let commands = press(
        &mut controls,
        ControlInput {
            roll: true,
            inventory: true,
            interact: true,
            ..ControlInput::default()
        },
        idle(),
    );
    assert_eq!(commands, vec![Command::RollDice]);

    let commands = press(
        &mut controls,
        ControlInput {
            interact: true,
            ..ControlInput::default()
        },
        idle(),
    );
    assert_eq!(commands, vec![Command::EnterShop]);
}

#[test]
fn regenerate_bypasses_every_modal() {
    let mut controls = Controls::default();
    for modal in [
        Modal::Inventory,
        Modal::Shop,
        Modal::Card,
        Modal::Phase(Phase::Animating),
    ] {
        let commands = press(
            &mut controls,
            ControlInput {
                regenerate: true,
                confirm: true,
                ..ControlInput::default()
            },
            ControlView::new(modal),
        );
        assert_eq!(commands, vec![Command::RegenerateWorld], "{modal:?}");
    }
}

#[test]
fn inventory_swallows_input_meant_for_the_board() {
    let mut controls = Controls::default();
    let commands = press(
        &mut controls,
        ControlInput {
            roll: true,
            ..ControlInput::default()
        },
        ControlView::new(Modal::Inventory),
    );
    assert!(commands.is_empty());

    let commands = press(
        &mut controls,
        ControlInput {
            inventory: true,
            ..ControlInput::default()
        },
        ControlView::new(Modal::Inventory),
    );
    assert_eq!(commands, vec![Command::CloseInventory]);
}

#[test]
fn inventory_cursor_reaches_the_exchange_buttons() {
    let mut controls = Controls::default();
    let view = ControlView {
        inventory_cards: 2,
        ..ControlView::new(Modal::Inventory)
    };
    let next = ControlInput {
        next: true,
        ..ControlInput::default()
    };
    let confirm = ControlInput {
        confirm: true,
        ..ControlInput::default()
    };

    assert!(press(&mut controls, confirm, view).is_empty());
    let _ = press(&mut controls, next, view);
    let _ = press(&mut controls, next, view);
    assert_eq!(controls.inventory_cursor(), 2);
    assert_eq!(
        press(&mut controls, confirm, view),
        vec![Command::ExchangeMonsterStrength]
    );
    let _ = press(&mut controls, next, view);
    assert_eq!(
        press(&mut controls, confirm, view),
        vec![Command::ExchangeMagicMonster]
    );
    let _ = press(&mut controls, next, view);
    assert_eq!(controls.inventory_cursor(), 0);

    let direct = ControlInput {
        slot: Some(1),
        ..ControlInput::default()
    };
    assert_eq!(
        press(&mut controls, direct, view),
        vec![Command::ExchangeMagicMonster]
    );
}

#[test]
fn inventory_cursor_clamps_when_cards_are_consumed() {
    let mut controls = Controls::default();
    let previous = ControlInput {
        previous: true,
        ..ControlInput::default()
    };
    let full = ControlView {
        inventory_cards: 5,
        ..ControlView::new(Modal::Inventory)
    };
    let _ = press(&mut controls, previous, full);
    assert_eq!(controls.inventory_cursor(), 6);

    let emptied = ControlView {
        inventory_cards: 0,
        ..ControlView::new(Modal::Inventory)
    };
    let confirm = ControlInput {
        confirm: true,
        ..ControlInput::default()
    };
    assert_eq!(
        press(&mut controls, confirm, emptied),
        vec![Command::ExchangeMagicMonster]
    );
    assert_eq!(controls.inventory_cursor(), 1);
}

#[test]
fn shop_cursor_cycles_over_slots_and_exit() {
    let mut controls = Controls::default();
    let view = ControlView::new(Modal::Shop);
    let next = ControlInput {
        next: true,
        ..ControlInput::default()
    };
    let confirm = ControlInput {
        confirm: true,
        ..ControlInput::default()
    };

    assert_eq!(
        press(&mut controls, confirm, view),
        vec![Command::PurchaseItem { slot: 0 }]
    );
    for _ in 0..3 {
        let _ = press(&mut controls, next, view);
    }
    assert_eq!(controls.shop_cursor(), 3);
    assert_eq!(
        press(&mut controls, confirm, view),
        vec![Command::CloseShop]
    );
    let _ = press(&mut controls, next, view);
    assert_eq!(controls.shop_cursor(), 0);

    let direct = ControlInput {
        slot: Some(2),
        ..ControlInput::default()
    };
    assert_eq!(
        press(&mut controls, direct, view),
        vec![Command::PurchaseItem { slot: 2 }]
    );
    assert_eq!(controls.shop_cursor(), 2);

    let mut commands = Vec::new();
    controls.handle(
        &[Event::ShopOpened {
            shop: TileId::new(4, 0),
            first_visit: false,
        }],
        ControlInput::default(),
        &view,
        &mut commands,
    );
    assert!(commands.is_empty());
    assert_eq!(controls.shop_cursor(), 0);
}

#[test]
fn card_confirm_resolves_then_dismisses() {
    let mut controls = Controls::default();
    let confirm = ControlInput {
        confirm: true,
        ..ControlInput::default()
    };
    let fresh = ControlView::new(Modal::Card);
    let resolved = ControlView {
        card_resolved: true,
        ..fresh
    };

    assert_eq!(
        press(&mut controls, confirm, fresh),
        vec![Command::ResolveCard]
    );
    assert_eq!(
        press(&mut controls, confirm, resolved),
        vec![Command::DismissCard]
    );
    let cancel = ControlInput {
        cancel: true,
        ..ControlInput::default()
    };
    assert_eq!(
        press(&mut controls, cancel, fresh),
        vec![Command::DismissCard]
    );
}

#[test]
fn target_selection_needs_destinations_to_confirm() {
    let mut controls = Controls::default();
    let empty = ControlView::new(Modal::Phase(Phase::TargetSelect));
    let offered = ControlView {
        destinations: 2,
        ..empty
    };
    let confirm = ControlInput {
        confirm: true,
        ..ControlInput::default()
    };

    assert!(press(&mut controls, confirm, empty).is_empty());
    assert_eq!(
        press(&mut controls, confirm, offered),
        vec![Command::ConfirmSelection]
    );
    assert_eq!(
        press(
            &mut controls,
            ControlInput {
                previous: true,
                ..ControlInput::default()
            },
            offered,
        ),
        vec![Command::CycleSelection { offset: -1 }]
    );
    assert_eq!(
        press(
            &mut controls,
            ControlInput {
                cancel: true,
                ..ControlInput::default()
            },
            empty,
        ),
        vec![Command::CancelSelection]
    );
}

#[test]
fn animation_ignores_input() {
    let mut controls = Controls::default();
    let everything = ControlInput {
        roll: true,
        confirm: true,
        cancel: true,
        next: true,
        previous: true,
        inventory: true,
        interact: true,
        regenerate: false,
        slot: Some(0),
    };
    assert!(press(
        &mut controls,
        everything,
        ControlView::new(Modal::Phase(Phase::Animating))
    )
    .is_empty());
}
