use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

pub const TOTAL_STEPS: u8 = 5;
/// Delay before the walkthrough opens on a first visit.
pub const INTRO_DELAY: Duration = Duration::from_secs(1);

/// Part of the screen a tutorial step points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorialFocus {
    Orders,
    Materials,
    Workshop,
    Tuning,
    Stats,
}

pub struct TutorialStep {
    pub title: &'static str,
    pub body: &'static str,
    pub focus: TutorialFocus,
}

pub static STEPS: [TutorialStep; TOTAL_STEPS as usize] = [
    TutorialStep {
        title: "Take an order",
        body: "Customers post orders on the left. Move with ↑/↓ and press Enter to pick one. Harder orders pay more but need better materials.",
        focus: TutorialFocus::Orders,
    },
    TutorialStep {
        title: "Stock materials",
        body: "Every trumpet needs brass and leather. Tier 2 adds silver, tier 3 adds gold and velvet. Enter buys the highlighted material, r buys a random one.",
        focus: TutorialFocus::Materials,
    },
    TutorialStep {
        title: "Start crafting",
        body: "With an order selected and materials in stock, press s to put a trumpet on the bench.",
        focus: TutorialFocus::Workshop,
    },
    TutorialStep {
        title: "Tune it",
        body: "Press t for a melody, p to hear it, then play it back with the a–g keys. A clean run raises quality; a slip still moves the work along.",
        focus: TutorialFocus::Tuning,
    },
    TutorialStep {
        title: "Deliver",
        body: "When the trumpet is finished press Enter on the workshop to deliver. Better quality earns more money and reputation. Every three deliveries raise your level.",
        focus: TutorialFocus::Stats,
    },
];

#[derive(Debug, Default, Serialize, Deserialize)]
struct TutorialRecord {
    tutorial_completed: bool,
}

/// The single persisted flag: whether the walkthrough has been dismissed.
#[derive(Debug, Clone)]
pub struct TutorialStore {
    path: Option<PathBuf>,
}

impl TutorialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A store that remembers nothing; the tutorial shows on every launch.
    pub fn ephemeral() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_completed(&self) -> Result<bool> {
        let Some(path) = &self.path else {
            return Ok(false);
        };
        if !path.exists() {
            return Ok(false);
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read tutorial flag {}", path.display()))?;
        let record: TutorialRecord = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse tutorial flag {}", path.display()))?;
        Ok(record.tutorial_completed)
    }

    pub fn mark_completed(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let record = TutorialRecord {
            tutorial_completed: true,
        };
        let content = serde_json::to_string_pretty(&record)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write tutorial flag {}", path.display()))?;
        Ok(())
    }
}

pub struct TutorialController {
    pub step: u8,
    pub visible: bool,
    intro_in: Option<Duration>,
    store: TutorialStore,
}

impl TutorialController {
    /// Schedules the walkthrough unless the player has already finished it.
    pub fn new(store: TutorialStore) -> Self {
        let completed = store.is_completed().unwrap_or_else(|err| {
            warn!("{:#}", err);
            false
        });
        Self {
            step: 1,
            visible: false,
            intro_in: (!completed).then_some(INTRO_DELAY),
            store,
        }
    }

    pub fn on_tick(&mut self, dt: Duration) {
        if let Some(remaining) = self.intro_in.as_mut() {
            *remaining = remaining.saturating_sub(dt);
            if remaining.is_zero() {
                self.intro_in = None;
                self.show();
            }
        }
    }

    pub fn show(&mut self) {
        self.intro_in = None;
        self.step = 1;
        self.visible = true;
    }

    /// Closes the overlay and records that the player has seen it.
    pub fn hide(&mut self) {
        self.visible = false;
        match self.store.mark_completed() {
            Ok(()) => info!("tutorial marked completed"),
            Err(err) => warn!("{:#}", err),
        }
    }

    pub fn next(&mut self) {
        if self.step < TOTAL_STEPS {
            self.step += 1;
        }
    }

    pub fn prev(&mut self) {
        if self.step > 1 {
            self.step -= 1;
        }
    }

    pub fn is_last_step(&self) -> bool {
        self.step == TOTAL_STEPS
    }

    /// The "start playing" button on the final step.
    pub fn finish(&mut self) {
        self.hide();
    }

    pub fn current(&self) -> &'static TutorialStep {
        &STEPS[usize::from(self.step.clamp(1, TOTAL_STEPS) - 1)]
    }

    pub fn focus(&self) -> Option<TutorialFocus> {
        self.visible.then(|| self.current().focus)
    }

    pub fn indicator(&self) -> String {
        format!("{} / {}", self.step, TOTAL_STEPS)
    }
}
