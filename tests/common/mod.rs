#![allow(dead_code)]
use std::time::Duration;

use trumpet_shop::game::{FAILURE_DELAY, GameState, Note, OrderId};

/// Makes sure an order named `name` is on the book and selects it.
pub fn select_named(state: &mut GameState, name: &str) -> OrderId {
    while !state.orders.orders.iter().any(|o| o.name == name) {
        state.generate_order();
    }
    let id = state
        .orders
        .orders
        .iter()
        .find(|o| o.name == name)
        .map(|o| o.id.clone())
        .unwrap();
    state.select_order(&id).unwrap();
    id
}

pub fn tune_perfectly(state: &mut GameState) {
    let target = state.start_tuning().unwrap().to_vec();
    for note in target {
        state.submit_note(note);
    }
}

pub fn tune_badly(state: &mut GameState) {
    let first = state.start_tuning().unwrap()[0];
    let wrong = Note::ALL.iter().copied().find(|n| *n != first).unwrap();
    state.submit_note(wrong);
    state.advance(FAILURE_DELAY + Duration::from_millis(1));
}
