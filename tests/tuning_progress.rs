mod common;

use std::time::Duration;

use common::{select_named, tune_badly, tune_perfectly};
use trumpet_shop::game::{
    ActionError, CraftPhase, GameEvent, GameState, NoteVerdict, SoundCue, sequence_length,
};

#[test]
fn three_clean_runs_leave_the_trumpet_one_short() {
    let mut state = GameState::with_seed(21);
    select_named(&mut state, "Student Trumpet");
    state.start_crafting().unwrap();
    for _ in 0..3 {
        tune_perfectly(&mut state);
    }
    let trumpet = state.trumpet().unwrap();
    assert_eq!(trumpet.progress, 99);
    assert_eq!(trumpet.quality, 4);
    assert_eq!(state.phase(), CraftPhase::Crafting);
    assert_eq!(
        state.complete_trumpet().unwrap_err(),
        ActionError::NotReady { progress: 99 }
    );

    tune_perfectly(&mut state);
    assert_eq!(state.trumpet().unwrap().progress, 100);
    assert_eq!(state.phase(), CraftPhase::Ready);
}

#[test]
fn melody_length_follows_difficulty() {
    assert_eq!(sequence_length(1), 4);
    assert_eq!(sequence_length(2), 5);
    assert_eq!(sequence_length(3), 6);

    let mut state = GameState::with_seed(22);
    select_named(&mut state, "Jazz Club Trumpet");
    state.start_crafting().unwrap();
    assert_eq!(state.start_tuning().unwrap().len(), 5);
}

#[test]
fn failures_alone_eventually_finish_the_horn() {
    let mut state = GameState::with_seed(23);
    select_named(&mut state, "Student Trumpet");
    state.start_crafting().unwrap();
    for _ in 0..10 {
        tune_badly(&mut state);
    }
    let trumpet = state.trumpet().unwrap();
    assert_eq!(trumpet.progress, 100);
    assert_eq!(trumpet.quality, 1);
    assert_eq!(state.complete_trumpet().unwrap().reward, 300);
}

#[test]
fn every_accepted_note_is_heard() {
    let mut state = GameState::with_seed(24);
    select_named(&mut state, "Student Trumpet");
    state.start_crafting().unwrap();
    let target = state.start_tuning().unwrap().to_vec();
    state.drain_events();

    assert_eq!(state.submit_note(target[0]), NoteVerdict::Correct);
    assert_eq!(
        state.drain_events(),
        vec![GameEvent::Sound(SoundCue::Note(target[0]))]
    );

    for note in &target[1..] {
        state.submit_note(*note);
    }
    let events = state.drain_events();
    assert!(events.contains(&GameEvent::Sound(SoundCue::Success)));
    assert!(state.tuning().is_none());
}

#[test]
fn notes_without_a_session_are_ignored() {
    let mut state = GameState::with_seed(25);
    assert_eq!(
        state.submit_note(trumpet_shop::game::Note::C),
        NoteVerdict::Ignored
    );
    state.advance(Duration::from_secs(5));
    assert!(state.drain_events().is_empty());
}
