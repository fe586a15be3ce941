use super::inventory::{Inventory, Requirement, Shortfall};
use super::orders::Order;

pub const PROGRESS_COMPLETE: u32 = 100;
pub const SUCCESS_PROGRESS: u32 = 33;
pub const FAILURE_PROGRESS: u32 = 10;
const QUALITY_BONUS_STEP: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CraftPhase {
    Idle,
    Crafting,
    Tuning,
    Ready,
}

impl CraftPhase {
    pub fn label(self) -> &'static str {
        match self {
            CraftPhase::Idle => "idle",
            CraftPhase::Crafting => "crafting",
            CraftPhase::Tuning => "tuning",
            CraftPhase::Ready => "ready",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trumpet {
    pub quality: u32,
    pub progress: u32,
    pub order: Order,
}

impl Trumpet {
    pub fn new(order: Order) -> Self {
        Self {
            quality: 1,
            progress: 0,
            order,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.progress >= PROGRESS_COMPLETE
    }

    pub fn record_success(&mut self) {
        self.quality += 1;
        self.add_progress(SUCCESS_PROGRESS);
    }

    pub fn record_failure(&mut self) {
        self.add_progress(FAILURE_PROGRESS);
    }

    fn add_progress(&mut self, points: u32) {
        self.progress = (self.progress + points).min(PROGRESS_COMPLETE);
    }

    /// Tuning passes credited so far, out of three.
    pub fn attempts_display(&self) -> u32 {
        self.progress / SUCCESS_PROGRESS
    }

    pub fn quality_label(&self) -> &'static str {
        quality_label(self.quality)
    }

    pub fn final_reward(&self) -> u64 {
        final_reward(self.order.reward, self.quality)
    }
}

pub fn final_reward(base: u64, quality: u32) -> u64 {
    let bonus = f64::from(quality.saturating_sub(1)) * QUALITY_BONUS_STEP;
    (base as f64 * (1.0 + bonus)).floor() as u64
}

pub fn quality_label(quality: u32) -> &'static str {
    match quality {
        0 | 1 => "Standard",
        2 => "Good",
        3 => "Excellent",
        _ => "Finest",
    }
}

/// What the craft button would do right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CraftReadiness {
    Ready,
    NoOrder,
    InsufficientMaterials { missing: Vec<Shortfall> },
    AlreadyCrafting,
}

impl CraftReadiness {
    pub fn assess(order: Option<&Order>, trumpet: Option<&Trumpet>, inventory: &Inventory) -> Self {
        if trumpet.is_some() {
            return CraftReadiness::AlreadyCrafting;
        }
        let Some(order) = order else {
            return CraftReadiness::NoOrder;
        };
        let missing = inventory.shortfall(&Requirement::for_tier(order.difficulty));
        if missing.is_empty() {
            CraftReadiness::Ready
        } else {
            CraftReadiness::InsufficientMaterials { missing }
        }
    }

    pub fn enabled(&self) -> bool {
        !matches!(self, CraftReadiness::AlreadyCrafting)
    }

    pub fn label(&self) -> &'static str {
        match self {
            CraftReadiness::Ready => "Start crafting",
            CraftReadiness::NoOrder => "Start crafting (select an order)",
            CraftReadiness::InsufficientMaterials { .. } => "Start crafting (missing materials)",
            CraftReadiness::AlreadyCrafting => "Crafting...",
        }
    }

    pub fn tooltip(&self) -> String {
        match self {
            CraftReadiness::Ready => "Press s to start crafting".to_string(),
            CraftReadiness::NoOrder => "Select an order first".to_string(),
            CraftReadiness::InsufficientMaterials { missing } => {
                let list: Vec<String> = missing
                    .iter()
                    .map(|s| format!("{} x{}", s.key, s.required))
                    .collect();
                format!("Required materials are missing: {}", list.join(", "))
            }
            CraftReadiness::AlreadyCrafting => "A trumpet is already being crafted".to_string(),
        }
    }
}
