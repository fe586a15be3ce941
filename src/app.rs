use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use log::debug;

use crate::audio::AudioUnit;
use crate::game::{CraftPhase, GameEvent, GameState, Note};
use crate::notify::Notifications;
use crate::tutorial::TutorialController;

const VOLUME_STEP: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneFocus {
    Orders,
    Materials,
    Workshop,
}

impl PaneFocus {
    fn next(self) -> Self {
        match self {
            PaneFocus::Orders => PaneFocus::Materials,
            PaneFocus::Materials => PaneFocus::Workshop,
            PaneFocus::Workshop => PaneFocus::Orders,
        }
    }

    fn prev(self) -> Self {
        match self {
            PaneFocus::Orders => PaneFocus::Workshop,
            PaneFocus::Materials => PaneFocus::Orders,
            PaneFocus::Workshop => PaneFocus::Materials,
        }
    }
}

pub struct App {
    pub focus: PaneFocus,
    pub should_quit: bool,
    pub game: GameState,
    pub audio: AudioUnit,
    pub notifications: Notifications,
    pub tutorial: TutorialController,
    pub debug_enabled: bool,
    pub show_debug: bool,
}

impl App {
    pub fn new(
        game: GameState,
        audio: AudioUnit,
        tutorial: TutorialController,
        debug_enabled: bool,
    ) -> Self {
        Self {
            focus: PaneFocus::Orders,
            should_quit: false,
            game,
            audio,
            notifications: Notifications::default(),
            tutorial,
            debug_enabled,
            show_debug: false,
        }
    }

    pub fn on_tick(&mut self, dt: Duration) {
        self.game.advance(dt);
        self.flush_events();
        self.notifications.on_tick(dt);
        self.tutorial.on_tick(dt);
    }

    /// Hands queued notices to the feed and sound cues to the audio unit.
    fn flush_events(&mut self) {
        for event in self.game.drain_events() {
            match event {
                GameEvent::Notice(notice) => self.notifications.push(notice),
                GameEvent::Sound(cue) => self.audio.play_cue(&cue),
            }
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if self.tutorial.visible {
            self.handle_tutorial_input(key);
            return;
        }
        if self.show_debug {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(12)) {
                self.show_debug = false;
            }
            return;
        }

        match key.code {
            KeyCode::Char('q' | 'Q') => self.should_quit = true,
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            KeyCode::F(12) if self.debug_enabled => self.show_debug = true,
            KeyCode::Char('h' | '?') => self.tutorial.show(),
            KeyCode::Char('n') => {
                self.game.generate_order();
            }
            KeyCode::Char('r') => {
                let _ = self.game.purchase_random();
            }
            KeyCode::Char('s') => {
                if self.game.start_crafting().is_ok() {
                    self.focus = PaneFocus::Workshop;
                }
            }
            KeyCode::Char('t') => {
                let _ = self.game.start_tuning();
            }
            KeyCode::Char('p') => self.game.play_demo(),
            KeyCode::Char('+' | '=') => self.nudge_volume(VOLUME_STEP),
            KeyCode::Char('-') => self.nudge_volume(-VOLUME_STEP),
            KeyCode::Char(c) => {
                if let Some(note) = Note::from_char(c) {
                    let verdict = self.game.submit_note(note);
                    debug!("note {} -> {:?}", note, verdict);
                }
            }
            _ => match self.focus {
                PaneFocus::Orders => self.handle_orders_input(key),
                PaneFocus::Materials => self.handle_materials_input(key),
                PaneFocus::Workshop => self.handle_workshop_input(key),
            },
        }
        self.flush_events();
    }

    fn handle_orders_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.game.orders.cursor_previous(),
            KeyCode::Down => self.game.orders.cursor_next(),
            KeyCode::Enter => {
                let _ = self.game.select_order_at_cursor();
            }
            _ => {}
        }
    }

    fn handle_materials_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.game.inventory.select_previous(),
            KeyCode::Down => self.game.inventory.select_next(),
            KeyCode::Enter => {
                let key = self.game.inventory.selected_key();
                let _ = self.game.purchase(key);
            }
            _ => {}
        }
    }

    fn handle_workshop_input(&mut self, key: KeyEvent) {
        if key.code != KeyCode::Enter {
            return;
        }
        match self.game.phase() {
            CraftPhase::Idle => {
                let _ = self.game.start_crafting();
            }
            CraftPhase::Crafting => {
                let _ = self.game.start_tuning();
            }
            CraftPhase::Tuning => {}
            CraftPhase::Ready => {
                let _ = self.game.complete_trumpet();
            }
        }
    }

    fn handle_tutorial_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.tutorial.hide(),
            KeyCode::Left => self.tutorial.prev(),
            KeyCode::Right => self.tutorial.next(),
            KeyCode::Enter => {
                if self.tutorial.is_last_step() {
                    self.tutorial.finish();
                } else {
                    self.tutorial.next();
                }
            }
            _ => {}
        }
    }

    fn nudge_volume(&mut self, delta: f32) {
        let volume = self.audio.master_volume() + delta;
        self.audio.set_master_volume((volume * 10.0).round() / 10.0);
    }
}

pub fn format_money(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push('¥');
    out
}

pub fn stars(count: u8) -> String {
    "★".repeat(count as usize)
}
