use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;

use super::error::ActionError;
use super::player::PlayerState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MaterialKey {
    Brass,
    Silver,
    Gold,
    Leather,
    Velvet,
}

impl MaterialKey {
    pub const ALL: [MaterialKey; 5] = [
        MaterialKey::Brass,
        MaterialKey::Silver,
        MaterialKey::Gold,
        MaterialKey::Leather,
        MaterialKey::Velvet,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            MaterialKey::Brass => "Brass",
            MaterialKey::Silver => "Silver",
            MaterialKey::Gold => "Gold",
            MaterialKey::Leather => "Leather",
            MaterialKey::Velvet => "Velvet",
        }
    }

    pub fn unit_price(self) -> u64 {
        match self {
            MaterialKey::Brass => 100,
            MaterialKey::Silver => 300,
            MaterialKey::Gold => 800,
            MaterialKey::Leather => 50,
            MaterialKey::Velvet => 200,
        }
    }

    pub fn quality_tier(self) -> u8 {
        match self {
            MaterialKey::Brass | MaterialKey::Leather => 1,
            MaterialKey::Silver | MaterialKey::Velvet => 2,
            MaterialKey::Gold => 3,
        }
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    fn starting_stock(self) -> u32 {
        match self {
            MaterialKey::Brass => 3,
            MaterialKey::Silver => 1,
            MaterialKey::Gold => 0,
            MaterialKey::Leather => 2,
            MaterialKey::Velvet => 1,
        }
    }
}

impl fmt::Display for MaterialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    pub key: MaterialKey,
    pub count: u32,
}

impl Material {
    pub fn name(&self) -> &'static str {
        self.key.display_name()
    }

    pub fn price(&self) -> u64 {
        self.key.unit_price()
    }

    pub fn quality(&self) -> u8 {
        self.key.quality_tier()
    }
}

/// Materials needed to start a craft, keyed by material.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirement(BTreeMap<MaterialKey, u32>);

impl Requirement {
    /// Bill of materials for an order of the given difficulty tier.
    ///
    /// Every tier includes everything the tier below it needs.
    pub fn for_tier(tier: u8) -> Self {
        let mut needs = BTreeMap::new();
        needs.insert(MaterialKey::Brass, 1);
        needs.insert(MaterialKey::Leather, 1);
        if tier >= 2 {
            needs.insert(MaterialKey::Silver, 1);
        }
        if tier >= 3 {
            needs.insert(MaterialKey::Gold, 1);
            needs.insert(MaterialKey::Velvet, 1);
        }
        Self(needs)
    }

    pub fn quantity(&self, key: MaterialKey) -> u32 {
        self.0.get(&key).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MaterialKey, u32)> + '_ {
        self.0.iter().map(|(key, qty)| (*key, *qty))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A material the inventory cannot cover, with the quantity the requirement asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortfall {
    pub key: MaterialKey,
    pub required: u32,
}

impl fmt::Display for Shortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} needed)", self.key, self.required)
    }
}

#[derive(Debug, Clone)]
pub struct Inventory {
    pub materials: Vec<Material>,
    pub selected: usize,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            materials: MaterialKey::ALL
                .iter()
                .map(|&key| Material {
                    key,
                    count: key.starting_stock(),
                })
                .collect(),
            selected: 0,
        }
    }
}

impl Inventory {
    pub fn count(&self, key: MaterialKey) -> u32 {
        self.materials
            .iter()
            .find(|m| m.key == key)
            .map(|m| m.count)
            .unwrap_or(0)
    }

    pub fn set_count(&mut self, key: MaterialKey, count: u32) {
        if let Some(material) = self.material_mut(key) {
            material.count = count;
        }
    }

    fn material_mut(&mut self, key: MaterialKey) -> Option<&mut Material> {
        self.materials.iter_mut().find(|m| m.key == key)
    }

    pub fn has_sufficient(&self, requirement: &Requirement) -> bool {
        requirement
            .iter()
            .all(|(key, qty)| self.count(key) >= qty)
    }

    pub fn shortfall(&self, requirement: &Requirement) -> Vec<Shortfall> {
        requirement
            .iter()
            .filter(|(key, qty)| self.count(*key) < *qty)
            .map(|(key, required)| Shortfall { key, required })
            .collect()
    }

    /// Removes the required quantities. Callers check [`Inventory::has_sufficient`] first.
    pub fn consume(&mut self, requirement: &Requirement) {
        debug_assert!(self.has_sufficient(requirement));
        for (key, qty) in requirement.iter() {
            if let Some(material) = self.material_mut(key) {
                material.count = material.count.saturating_sub(qty);
            }
        }
    }

    /// Buys one unit of `key`, returning the price paid.
    pub fn purchase(
        &mut self,
        key: MaterialKey,
        player: &mut PlayerState,
    ) -> Result<u64, ActionError> {
        let price = key.unit_price();
        if player.money < price {
            return Err(ActionError::InsufficientFunds {
                material: key,
                price,
                money: player.money,
            });
        }
        player.money -= price;
        if let Some(material) = self.material_mut(key) {
            material.count += 1;
        }
        Ok(price)
    }

    pub fn selected_key(&self) -> MaterialKey {
        self.materials
            .get(self.selected)
            .map(|m| m.key)
            .unwrap_or(MaterialKey::Brass)
    }

    pub fn select_next(&mut self) {
        if self.materials.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.materials.len();
    }

    pub fn select_previous(&mut self) {
        if self.materials.is_empty() {
            return;
        }
        if self.selected == 0 {
            self.selected = self.materials.len() - 1;
        } else {
            self.selected -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requirements_grow_with_tier() {
        let tiers: Vec<Requirement> = (1..=3).map(Requirement::for_tier).collect();
        for pair in tiers.windows(2) {
            for key in MaterialKey::ALL {
                assert!(pair[0].quantity(key) <= pair[1].quantity(key));
            }
            assert!(pair[0].len() < pair[1].len());
        }
        assert_eq!(tiers[0].quantity(MaterialKey::Brass), 1);
        assert_eq!(tiers[0].quantity(MaterialKey::Leather), 1);
        assert_eq!(tiers[0].quantity(MaterialKey::Gold), 0);
        assert_eq!(tiers[2].quantity(MaterialKey::Velvet), 1);
    }

    #[test]
    fn consume_takes_exactly_the_bill_of_materials() {
        let mut inventory = Inventory::default();
        for (key, count) in [
            (MaterialKey::Brass, 5),
            (MaterialKey::Silver, 3),
            (MaterialKey::Gold, 2),
            (MaterialKey::Leather, 5),
            (MaterialKey::Velvet, 2),
        ] {
            inventory.set_count(key, count);
        }
        let counts = |inv: &Inventory| -> Vec<u32> {
            MaterialKey::ALL.iter().map(|k| inv.count(*k)).collect()
        };

        inventory.consume(&Requirement::for_tier(1));
        assert_eq!(counts(&inventory), vec![4, 3, 2, 4, 2]);
        inventory.consume(&Requirement::for_tier(2));
        assert_eq!(counts(&inventory), vec![3, 2, 2, 3, 2]);
        inventory.consume(&Requirement::for_tier(3));
        assert_eq!(counts(&inventory), vec![2, 1, 1, 2, 1]);

        let tier_one = Requirement::for_tier(1);
        while inventory.has_sufficient(&tier_one) {
            inventory.consume(&tier_one);
        }
        assert_eq!(counts(&inventory), vec![0, 1, 1, 0, 1]);
    }

    #[test]
    fn shortfall_lists_only_missing_materials() {
        let inventory = Inventory::default();
        let missing = inventory.shortfall(&Requirement::for_tier(3));
        assert_eq!(
            missing,
            vec![Shortfall {
                key: MaterialKey::Gold,
                required: 1
            }]
        );
        assert!(!inventory.has_sufficient(&Requirement::for_tier(3)));
        assert!(inventory.has_sufficient(&Requirement::for_tier(2)));
    }

    #[test]
    fn purchase_debits_money_and_adds_stock() {
        let mut inventory = Inventory::default();
        let mut player = PlayerState::default();
        let paid = inventory.purchase(MaterialKey::Gold, &mut player).unwrap();
        assert_eq!(paid, 800);
        assert_eq!(player.money, 200);
        assert_eq!(inventory.count(MaterialKey::Gold), 1);
    }

    #[test]
    fn purchase_without_funds_changes_nothing() {
        let mut inventory = Inventory::default();
        let mut player = PlayerState {
            money: 299,
            ..PlayerState::default()
        };
        let err = inventory
            .purchase(MaterialKey::Silver, &mut player)
            .unwrap_err();
        assert!(matches!(err, ActionError::InsufficientFunds { price: 300, .. }));
        assert_eq!(player.money, 299);
        assert_eq!(inventory.count(MaterialKey::Silver), 1);
    }
}
