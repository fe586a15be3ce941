mod common;

use common::{select_named, tune_badly, tune_perfectly};
use rand::SeedableRng;
use rand::rngs::StdRng;
use trumpet_shop::game::{
    ActionError, CraftPhase, GameEvent, GameState, MaterialKey, NoticeKind, PlayerState,
    SoundCue,
};

fn error_notices(events: &[GameEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, GameEvent::Notice(n) if n.kind == NoticeKind::Error))
        .count()
}

#[test]
fn professional_order_at_quality_three_pays_out() {
    let mut state = GameState::with_seed(11);
    let id = select_named(&mut state, "Professional Trumpet");
    state.start_crafting().unwrap();
    assert_eq!(state.inventory.count(MaterialKey::Silver), 0);

    tune_perfectly(&mut state);
    tune_perfectly(&mut state);
    while state.phase() != CraftPhase::Ready {
        tune_badly(&mut state);
    }
    let trumpet = state.trumpet().unwrap();
    assert_eq!(trumpet.quality, 3);
    assert_eq!(trumpet.progress, 100);

    let delivery = state.complete_trumpet().unwrap();
    assert_eq!(delivery.order.id, id);
    assert_eq!(delivery.reward, 1120);
    assert_eq!(state.player.money, 2120);
    assert_eq!(state.player.reputation, 65);
    assert_eq!(state.player.completed, 1);
    assert!(state.orders.get(&id).is_none());
    assert_eq!(state.phase(), CraftPhase::Idle);
}

#[test]
fn crafting_twice_is_refused_without_consuming() {
    let mut state = GameState::with_seed(12);
    select_named(&mut state, "Student Trumpet");
    state.start_crafting().unwrap();
    let before = state.inventory.materials.clone();
    assert_eq!(state.start_crafting(), Err(ActionError::AlreadyCrafting));
    assert_eq!(state.inventory.materials, before);
}

#[test]
fn missing_materials_are_listed() {
    let mut state = GameState::with_seed(13);
    select_named(&mut state, "Orchestra Trumpet");
    let err = state.start_crafting().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Not enough materials. Missing: Gold (1 needed)"
    );
    assert_eq!(state.inventory.count(MaterialKey::Brass), 3);
    assert!(state.trumpet().is_none());
}

#[test]
fn purchases_stop_at_zero_money() {
    let mut state = GameState::new(PlayerState::new(850, 50), StdRng::seed_from_u64(14));
    assert_eq!(state.purchase(MaterialKey::Gold), Ok(800));
    assert_eq!(state.player.money, 50);
    assert_eq!(state.inventory.count(MaterialKey::Gold), 1);
    state.drain_events();

    let err = state.purchase(MaterialKey::Brass).unwrap_err();
    assert!(matches!(err, ActionError::InsufficientFunds { .. }));
    assert_eq!(state.player.money, 50);
    assert_eq!(state.inventory.count(MaterialKey::Brass), 3);
    let events = state.drain_events();
    assert_eq!(events.len(), 1);
    assert_eq!(error_notices(&events), 1);

    assert_eq!(state.purchase(MaterialKey::Leather), Ok(50));
    assert_eq!(state.player.money, 0);
}

#[test]
fn random_purchase_buys_one_unit_of_the_drawn_material() {
    let mut state = GameState::with_seed(16);
    let before: Vec<u32> = MaterialKey::ALL
        .iter()
        .map(|k| state.inventory.count(*k))
        .collect();

    let (key, price) = state.purchase_random().unwrap();
    assert_eq!(price, key.unit_price());
    assert_eq!(state.player.money, 1000 - price);
    for (idx, other) in MaterialKey::ALL.iter().enumerate() {
        let expected = if *other == key { before[idx] + 1 } else { before[idx] };
        assert_eq!(state.inventory.count(*other), expected);
    }
    let events = state.drain_events();
    assert_eq!(events.len(), 1);
    assert_eq!(error_notices(&events), 0);
}

#[test]
fn random_purchase_is_refused_when_broke() {
    let mut state = GameState::new(PlayerState::new(0, 50), StdRng::seed_from_u64(17));
    let before = state.inventory.materials.clone();
    let err = state.purchase_random().unwrap_err();
    assert!(matches!(err, ActionError::InsufficientFunds { money: 0, .. }));
    assert_eq!(state.player.money, 0);
    assert_eq!(state.inventory.materials, before);
    assert_eq!(error_notices(&state.drain_events()), 1);
}

#[test]
fn third_delivery_levels_up_with_fanfare() {
    let mut state = GameState::with_seed(15);
    state.purchase(MaterialKey::Leather).unwrap();
    for round in 1..=3 {
        select_named(&mut state, "Student Trumpet");
        state.start_crafting().unwrap();
        for _ in 0..4 {
            tune_perfectly(&mut state);
        }
        state.drain_events();
        let delivery = state.complete_trumpet().unwrap();
        let events = state.drain_events();
        let fanfare = events.contains(&GameEvent::Sound(SoundCue::LevelUp));
        assert_eq!(delivery.leveled_up, round == 3);
        assert_eq!(fanfare, round == 3);
    }
    assert_eq!(state.player.level, 2);
    assert_eq!(state.player.completed, 3);
}
