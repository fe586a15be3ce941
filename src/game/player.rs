pub const STARTING_MONEY: u64 = 1000;
pub const STARTING_REPUTATION: u64 = 50;
const COMPLETIONS_PER_LEVEL: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    pub money: u64,
    pub reputation: u64,
    pub level: u32,
    pub completed: u32,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            money: STARTING_MONEY,
            reputation: STARTING_REPUTATION,
            level: 1,
            completed: 0,
        }
    }
}

impl PlayerState {
    pub fn new(money: u64, reputation: u64) -> Self {
        Self {
            money,
            reputation,
            ..Self::default()
        }
    }

    /// Books a delivered trumpet. Returns `true` when the delivery raised the level.
    pub fn record_delivery(&mut self, reward: u64, quality: u32) -> bool {
        self.money += reward;
        self.reputation += u64::from(quality) * 5;
        self.completed += 1;
        let new_level = self.completed / COMPLETIONS_PER_LEVEL + 1;
        if new_level > self.level {
            self.level = new_level;
            true
        } else {
            false
        }
    }
}
