//! Shop state and the crafting state machine.
//!
//! [`GameState`] owns the player, inventory, order book, the trumpet on the bench
//! and the running tuning attempt. Every method is a synchronous transition that
//! either succeeds or returns an [`ActionError`] without touching state. Anything
//! the player should see or hear is queued as a [`GameEvent`] for the front end to
//! drain with [`GameState::drain_events`].

mod crafting;
mod debug;
mod error;
mod inventory;
mod orders;
mod player;
mod tuning;

use std::time::Duration;

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

pub use crafting::{
    CraftPhase, CraftReadiness, FAILURE_PROGRESS, PROGRESS_COMPLETE, SUCCESS_PROGRESS, Trumpet,
    final_reward, quality_label,
};
pub use error::ActionError;
pub use inventory::{Inventory, Material, MaterialKey, Requirement, Shortfall};
pub use orders::{CATALOG, Order, OrderBook, OrderId, OrderTemplate, SEED_ORDER_COUNT};
pub use player::{PlayerState, STARTING_MONEY, STARTING_REPUTATION};
pub use tuning::{
    AttemptOutcome, FAILURE_DELAY, Note, NoteVerdict, TuningSession, UnknownNote,
    format_sequence, generate_sequence, sequence_length,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
}

/// Sounds the game asks for. Rendering and playback live in [`crate::audio`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundCue {
    Note(Note),
    Demo(Vec<Note>),
    Success,
    Error,
    LevelUp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Notice(Notice),
    Sound(SoundCue),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub order: Order,
    pub quality: u32,
    pub reward: u64,
    pub leveled_up: bool,
}

pub struct GameState {
    pub player: PlayerState,
    pub inventory: Inventory,
    pub orders: OrderBook,
    trumpet: Option<Trumpet>,
    tuning: Option<TuningSession>,
    events: Vec<GameEvent>,
    rng: StdRng,
}

impl GameState {
    pub fn new(player: PlayerState, mut rng: StdRng) -> Self {
        let orders = OrderBook::seeded(&mut rng);
        Self {
            player,
            inventory: Inventory::default(),
            orders,
            trumpet: None,
            tuning: None,
            events: Vec::new(),
            rng,
        }
    }

    pub fn from_entropy() -> Self {
        Self::new(PlayerState::default(), StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(PlayerState::default(), StdRng::seed_from_u64(seed))
    }

    pub fn trumpet(&self) -> Option<&Trumpet> {
        self.trumpet.as_ref()
    }

    pub fn tuning(&self) -> Option<&TuningSession> {
        self.tuning.as_ref()
    }

    pub fn phase(&self) -> CraftPhase {
        match (&self.trumpet, &self.tuning) {
            (None, _) => CraftPhase::Idle,
            (Some(_), Some(_)) => CraftPhase::Tuning,
            (Some(trumpet), None) if trumpet.is_ready() => CraftPhase::Ready,
            (Some(_), None) => CraftPhase::Crafting,
        }
    }

    pub fn craft_readiness(&self) -> CraftReadiness {
        CraftReadiness::assess(
            self.orders.selected_order(),
            self.trumpet.as_ref(),
            &self.inventory,
        )
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn notify(&mut self, kind: NoticeKind, message: impl Into<String>) {
        self.events.push(GameEvent::Notice(Notice {
            message: message.into(),
            kind,
        }));
    }

    fn sound(&mut self, cue: SoundCue) {
        self.events.push(GameEvent::Sound(cue));
    }

    fn reject<T>(&mut self, err: ActionError) -> Result<T, ActionError> {
        debug!("rejected: {}", err);
        self.notify(NoticeKind::Error, err.to_string());
        Err(err)
    }

    pub fn select_order(&mut self, id: &OrderId) -> Result<(), ActionError> {
        let selected = self.orders.select(id).map(|order| order.name.clone());
        let name = match selected {
            Ok(name) => name,
            Err(err) => return self.reject(err),
        };
        self.notify(NoticeKind::Success, format!("Selected {}", name));
        Ok(())
    }

    /// Selects whatever order the list cursor is on.
    pub fn select_order_at_cursor(&mut self) -> Result<(), ActionError> {
        match self.orders.order_at_cursor().map(|o| o.id.clone()) {
            Some(id) => self.select_order(&id),
            None => self.reject(ActionError::NoOrderSelected),
        }
    }

    pub fn generate_order(&mut self) -> OrderId {
        let order = self.orders.generate(&mut self.rng);
        let id = order.id.clone();
        info!("new order {} ({}, tier {})", id, order.name, order.difficulty);
        self.notify(NoticeKind::Success, "A new order has arrived!");
        id
    }

    pub fn purchase(&mut self, key: MaterialKey) -> Result<u64, ActionError> {
        match self.inventory.purchase(key, &mut self.player) {
            Ok(price) => {
                info!("bought {} for {}", key, price);
                self.notify(NoticeKind::Success, format!("Bought {}!", key));
                Ok(price)
            }
            Err(err) => self.reject(err),
        }
    }

    /// The shop's "buy materials" button: one unit of a random material.
    pub fn purchase_random(&mut self) -> Result<(MaterialKey, u64), ActionError> {
        let key = MaterialKey::random(&mut self.rng);
        self.purchase(key).map(|price| (key, price))
    }

    pub fn start_crafting(&mut self) -> Result<(), ActionError> {
        if self.trumpet.is_some() {
            return self.reject(ActionError::AlreadyCrafting);
        }
        let Some(order) = self.orders.selected_order().cloned() else {
            return self.reject(ActionError::NoOrderSelected);
        };
        let requirement = Requirement::for_tier(order.difficulty);
        if !self.inventory.has_sufficient(&requirement) {
            let missing = self.inventory.shortfall(&requirement);
            return self.reject(ActionError::InsufficientMaterials { missing });
        }

        self.inventory.consume(&requirement);
        info!("crafting started for {} ({})", order.name, order.id);
        self.trumpet = Some(Trumpet::new(order));
        self.notify(NoticeKind::Success, "Crafting has begun!");
        Ok(())
    }

    /// Opens a new tuning attempt, replacing any running one.
    pub fn start_tuning(&mut self) -> Result<&[Note], ActionError> {
        self.flush_pending_failure();
        let bench = self
            .trumpet
            .as_ref()
            .map(|trumpet| (trumpet.is_ready(), trumpet.order.difficulty));
        let difficulty = match bench {
            None => return self.reject(ActionError::NoTrumpetInProgress),
            Some((true, _)) => return self.reject(ActionError::TrumpetReady),
            Some((false, difficulty)) => difficulty,
        };

        let target = generate_sequence(difficulty, &mut self.rng);
        debug!("tuning target {}", format_sequence(&target));
        let session = self.tuning.insert(TuningSession::new(target));
        Ok(session.target())
    }

    /// Queues the target melody for playback. Session state is untouched.
    pub fn play_demo(&mut self) {
        if let Some(session) = &self.tuning {
            let notes = session.target().to_vec();
            self.sound(SoundCue::Demo(notes));
        }
    }

    pub fn submit_note(&mut self, note: Note) -> NoteVerdict {
        let Some(session) = self.tuning.as_mut() else {
            return NoteVerdict::Ignored;
        };
        let verdict = session.submit(note);
        if verdict == NoteVerdict::Ignored {
            debug!("note {} ignored", note);
            return verdict;
        }
        self.sound(SoundCue::Note(note));
        if verdict == NoteVerdict::Completed {
            self.resolve_tuning_attempt(AttemptOutcome::Success);
        }
        verdict
    }

    /// Advances timers. A wrong note turns into a failed attempt here once its delay is over.
    pub fn advance(&mut self, dt: Duration) {
        let expired = self
            .tuning
            .as_mut()
            .map(|session| session.advance(dt))
            .unwrap_or(false);
        if expired {
            self.resolve_tuning_attempt(AttemptOutcome::Failure);
        }
    }

    fn flush_pending_failure(&mut self) {
        if self.tuning.as_ref().is_some_and(|s| s.failure_pending()) {
            self.resolve_tuning_attempt(AttemptOutcome::Failure);
        }
    }

    /// Ends the running attempt and credits the trumpet. Without a running attempt
    /// nothing happens.
    fn resolve_tuning_attempt(&mut self, outcome: AttemptOutcome) {
        if self.tuning.take().is_none() {
            debug!("no tuning attempt to resolve");
            return;
        }
        let Some(trumpet) = self.trumpet.as_mut().filter(|t| !t.is_ready()) else {
            return;
        };
        match outcome {
            AttemptOutcome::Success => trumpet.record_success(),
            AttemptOutcome::Failure => trumpet.record_failure(),
        }
        let progress = trumpet.progress;
        let quality = trumpet.quality;
        let ready = trumpet.is_ready();
        info!(
            "tuning {:?}: quality {} progress {}",
            outcome, quality, progress
        );

        match outcome {
            AttemptOutcome::Success => {
                self.sound(SoundCue::Success);
                self.notify(
                    NoticeKind::Success,
                    "Wonderful playing! The quality went up!",
                );
            }
            AttemptOutcome::Failure => {
                self.sound(SoundCue::Error);
                self.notify(NoticeKind::Error, "Let's try that again");
            }
        }
        if ready {
            self.notify(
                NoticeKind::Success,
                "The trumpet is finished! Ready to deliver",
            );
        }
    }

    pub fn complete_trumpet(&mut self) -> Result<Delivery, ActionError> {
        let Some(progress) = self.trumpet.as_ref().map(|trumpet| trumpet.progress) else {
            return self.reject(ActionError::CompletionWithoutTrumpet);
        };
        if progress < PROGRESS_COMPLETE {
            return self.reject(ActionError::NotReady { progress });
        }
        let Some(trumpet) = self.trumpet.take() else {
            return self.reject(ActionError::CompletionWithoutTrumpet);
        };
        self.tuning = None;

        let reward = trumpet.final_reward();
        let leveled_up = self.player.record_delivery(reward, trumpet.quality);
        if leveled_up {
            info!("level up: {}", self.player.level);
            self.sound(SoundCue::LevelUp);
            self.notify(
                NoticeKind::Success,
                format!("Level up! You reached level {}!", self.player.level),
            );
        }
        self.notify(
            NoticeKind::Success,
            format!("{} delivered! Earned {}", trumpet.order.name, reward),
        );
        info!(
            "delivered {} quality {} for {}",
            trumpet.order.id, trumpet.quality, reward
        );

        self.orders.remove(&trumpet.order.id);
        self.orders.clear_selection();
        Ok(Delivery {
            order: trumpet.order,
            quality: trumpet.quality,
            reward,
            leveled_up,
        })
    }
}
