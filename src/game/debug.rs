use std::fmt::Write;

use super::{GameState, MaterialKey, Requirement, format_sequence};

impl GameState {
    /// Plain-text dump of the current state for the debug overlay.
    pub fn debug_snapshot(&self) -> String {
        let order = self.orders.selected_order();
        let requirement = order
            .map(|o| Requirement::for_tier(o.difficulty))
            .unwrap_or_default();
        let readiness = self.craft_readiness();

        let mut out = String::new();
        let _ = writeln!(out, "=== Game state ===");
        let _ = writeln!(
            out,
            "Selected order: {}",
            order.map(|o| o.name.as_str()).unwrap_or("none")
        );
        let _ = writeln!(
            out,
            "Order difficulty: {}",
            order
                .map(|o| o.difficulty.to_string())
                .unwrap_or_else(|| "none".to_string())
        );
        let _ = writeln!(out, "Phase: {}", self.phase().label());
        match self.trumpet() {
            Some(trumpet) => {
                let _ = writeln!(
                    out,
                    "Trumpet: {} quality {} progress {}/100",
                    trumpet.order.name, trumpet.quality, trumpet.progress
                );
            }
            None => {
                let _ = writeln!(out, "Trumpet: none");
            }
        }
        if let Some(session) = self.tuning() {
            let _ = writeln!(
                out,
                "Tuning: target [{}] played [{}]{}",
                format_sequence(session.target()),
                format_sequence(session.played()),
                if session.failure_pending() {
                    " (failure pending)"
                } else {
                    ""
                }
            );
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "=== Materials ===");
        for key in MaterialKey::ALL {
            let _ = writeln!(
                out,
                "{:<8} {:>3} (needed: {})",
                key.display_name(),
                self.inventory.count(key),
                requirement.quantity(key)
            );
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "=== Craft button ===");
        let _ = writeln!(out, "Label: {}", readiness.label());
        let _ = writeln!(out, "Enabled: {}", readiness.enabled());
        let _ = writeln!(out, "Order selected: {}", order.is_some());
        let _ = writeln!(
            out,
            "Materials sufficient: {}",
            match order {
                Some(_) => self.inventory.has_sufficient(&requirement).to_string(),
                None => "no order".to_string(),
            }
        );
        let _ = writeln!(out, "Bench free: {}", self.trumpet().is_none());

        let _ = writeln!(out);
        let _ = writeln!(out, "=== Player ===");
        let _ = writeln!(out, "Money: {}", self.player.money);
        let _ = writeln!(out, "Reputation: {}", self.player.reputation);
        let _ = writeln!(out, "Level: {}", self.player.level);
        let _ = write!(out, "Completed: {}", self.player.completed);
        out
    }
}
