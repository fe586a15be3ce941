use thiserror::Error;

use super::inventory::{MaterialKey, Shortfall};

/// A rejected player action. The message is what the player sees.
///
/// None of these mutate state; the player can simply try again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("A trumpet is already being crafted")]
    AlreadyCrafting,

    #[error("Select an order first")]
    NoOrderSelected,

    #[error("Not enough materials. Missing: {}", format_shortfall(.missing))]
    InsufficientMaterials { missing: Vec<Shortfall> },

    #[error("Start crafting before tuning")]
    NoTrumpetInProgress,

    #[error("The trumpet is finished; deliver it instead")]
    TrumpetReady,

    #[error("There is no trumpet to deliver")]
    CompletionWithoutTrumpet,

    #[error("The trumpet needs more tuning ({progress}/100)")]
    NotReady { progress: u32 },

    #[error("Not enough money for {material} ({price} needed, {money} held)")]
    InsufficientFunds {
        material: MaterialKey,
        price: u64,
        money: u64,
    },

    #[error("No such order: {0}")]
    UnknownOrder(String),
}

fn format_shortfall(missing: &[Shortfall]) -> String {
    missing
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortfall_message_lists_materials() {
        let err = ActionError::InsufficientMaterials {
            missing: vec![
                Shortfall {
                    key: MaterialKey::Gold,
                    required: 1,
                },
                Shortfall {
                    key: MaterialKey::Velvet,
                    required: 1,
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "Not enough materials. Missing: Gold (1 needed), Velvet (1 needed)"
        );
    }
}
