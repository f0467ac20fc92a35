#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure input system that routes a frame of player input to the topmost modal.
//!
//! Modals are ranked Inventory > Shop > Card > Phase. The topmost one consumes
//! the frame's input exclusively, so a key that closes the inventory never also
//! rolls the dice underneath it.

use loop_quest_core::{Command, Event, Modal, Phase, SHOP_SLOTS};
use tracing::debug;

/// Number of exchange buttons listed after the inventory cards.
const EXCHANGE_BUTTONS: usize = 2;

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlInput {
    /// Roll the dice.
    pub roll: bool,
    /// Confirm the highlighted entry.
    pub confirm: bool,
    /// Back out of the current modal or selection.
    pub cancel: bool,
    /// Move the highlight forward.
    pub next: bool,
    /// Move the highlight backward.
    pub previous: bool,
    /// Toggle the inventory.
    pub inventory: bool,
    /// Interact with the surroundings, such as entering a nearby shop.
    pub interact: bool,
    /// Rebuild the board from scratch.
    pub regenerate: bool,
    /// Direct slot pick, such as a number key.
    pub slot: Option<usize>,
}

/// World facts the dispatcher needs to interpret input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlView {
    /// Topmost modal reported by the world.
    pub modal: Modal,
    /// Number of destinations on offer.
    pub destinations: usize,
    /// Number of cards held by the player.
    pub inventory_cards: usize,
    /// Whether the active card has already been resolved.
    pub card_resolved: bool,
}

impl ControlView {
    /// Creates a view for the given modal with no destinations, cards or resolution.
    #[must_use]
    pub const fn new(modal: Modal) -> Self {
        Self {
            modal,
            destinations: 0,
            inventory_cards: 0,
            card_resolved: false,
        }
    }
}

/// Modal dispatcher translating input into world commands.
#[derive(Clone, Debug, Default)]
pub struct Controls {
    shop_cursor: usize,
    inventory_cursor: usize,
}

impl Controls {
    /// Consumes world events and one frame of input to emit commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        input: ControlInput,
        view: &ControlView,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::ShopOpened { .. } => self.shop_cursor = 0,
                Event::InventoryOpened => self.inventory_cursor = 0,
                _ => {}
            }
        }

        if input.regenerate {
            out.push(Command::RegenerateWorld);
            return;
        }

        let before = out.len();
        match view.modal {
            Modal::Inventory => self.inventory(input, view.inventory_cards, out),
            Modal::Shop => self.shop(input, out),
            Modal::Card => card(input, view.card_resolved, out),
            Modal::Phase(Phase::Idle) => idle(input, out),
            Modal::Phase(Phase::TargetSelect) => target_select(input, view.destinations, out),
            Modal::Phase(Phase::Animating) => {}
        }
        if out.len() > before {
            debug!(modal = ?view.modal, commands = out.len() - before, "input dispatched");
        }
    }

    /// Highlighted shop entry; [`SHOP_SLOTS`] denotes the exit button.
    #[must_use]
    pub const fn shop_cursor(&self) -> usize {
        self.shop_cursor
    }

    /// Highlighted inventory entry; the last two entries are the exchange buttons.
    #[must_use]
    pub const fn inventory_cursor(&self) -> usize {
        self.inventory_cursor
    }

    fn inventory(&mut self, input: ControlInput, cards: usize, out: &mut Vec<Command>) {
        let entries = cards + EXCHANGE_BUTTONS;
        self.inventory_cursor = self.inventory_cursor.min(entries - 1);

        if input.cancel || input.inventory {
            out.push(Command::CloseInventory);
        } else if let Some(slot) = input.slot {
            if let Some(command) = exchange_button(slot) {
                out.push(command);
            }
        } else if input.confirm {
            if let Some(command) = self
                .inventory_cursor
                .checked_sub(cards)
                .and_then(exchange_button)
            {
                out.push(command);
            }
        } else if input.next {
            self.inventory_cursor = (self.inventory_cursor + 1) % entries;
        } else if input.previous {
            self.inventory_cursor = (self.inventory_cursor + entries - 1) % entries;
        }
    }

    fn shop(&mut self, input: ControlInput, out: &mut Vec<Command>) {
        let entries = SHOP_SLOTS + 1;

        if input.cancel || input.interact {
            out.push(Command::CloseShop);
        } else if let Some(slot) = input.slot.filter(|slot| *slot < SHOP_SLOTS) {
            self.shop_cursor = slot;
            out.push(Command::PurchaseItem { slot });
        } else if input.confirm {
            if self.shop_cursor < SHOP_SLOTS {
                out.push(Command::PurchaseItem {
                    slot: self.shop_cursor,
                });
            } else {
                out.push(Command::CloseShop);
            }
        } else if input.next {
            self.shop_cursor = (self.shop_cursor + 1) % entries;
        } else if input.previous {
            self.shop_cursor = (self.shop_cursor + entries - 1) % entries;
        }
    }
}

fn exchange_button(index: usize) -> Option<Command> {
    match index {
        0 => Some(Command::ExchangeMonsterStrength),
        1 => Some(Command::ExchangeMagicMonster),
        _ => None,
    }
}

fn card(input: ControlInput, resolved: bool, out: &mut Vec<Command>) {
    if input.cancel {
        out.push(Command::DismissCard);
    } else if input.confirm {
        out.push(if resolved {
            Command::DismissCard
        } else {
            Command::ResolveCard
        });
    }
}

fn idle(input: ControlInput, out: &mut Vec<Command>) {
    if input.roll {
        out.push(Command::RollDice);
    } else if input.inventory {
        out.push(Command::OpenInventory);
    } else if input.interact {
        out.push(Command::EnterShop);
    }
}

fn target_select(input: ControlInput, destinations: usize, out: &mut Vec<Command>) {
    if input.cancel {
        out.push(Command::CancelSelection);
    } else if input.confirm {
        if destinations > 0 {
            out.push(Command::ConfirmSelection);
        }
    } else if input.next {
        out.push(Command::CycleSelection { offset: 1 });
    } else if input.previous {
        out.push(Command::CycleSelection { offset: -1 });
    }
}
