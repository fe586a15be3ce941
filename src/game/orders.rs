use std::fmt;

use nanoid::nanoid;
use rand::Rng;

use super::error::ActionError;

pub const SEED_ORDER_COUNT: usize = 3;
const NANO_ALPHABET: &[char] = &[
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J',
    'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTemplate {
    pub name: &'static str,
    pub difficulty: u8,
    pub reward: u64,
    pub description: &'static str,
}

/// Every order the shop can receive. The first four make up the opening book.
pub const CATALOG: &[OrderTemplate] = &[
    OrderTemplate {
        name: "Student Trumpet",
        difficulty: 1,
        reward: 300,
        description: "For a music school student",
    },
    OrderTemplate {
        name: "Professional Trumpet",
        difficulty: 2,
        reward: 800,
        description: "Played by a touring professional",
    },
    OrderTemplate {
        name: "Orchestra Trumpet",
        difficulty: 3,
        reward: 1500,
        description: "For a special orchestra performance",
    },
    OrderTemplate {
        name: "Jazz Club Trumpet",
        difficulty: 2,
        reward: 600,
        description: "For late sets at a jazz club",
    },
    OrderTemplate {
        name: "Marching Band Trumpet",
        difficulty: 2,
        reward: 700,
        description: "Sturdy enough for a marching band",
    },
    OrderTemplate {
        name: "Competition Trumpet",
        difficulty: 3,
        reward: 1200,
        description: "A high-grade horn for competition day",
    },
];

const OPENING_TEMPLATES: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderId(String);

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub name: String,
    pub difficulty: u8,
    pub reward: u64,
    pub description: String,
    pub deadline_days: u8,
}

#[derive(Debug, Default)]
pub struct OrderBook {
    pub orders: Vec<Order>,
    pub selected: Option<OrderId>,
    /// Cursor row in the order list; independent of the selection.
    pub cursor: usize,
    issued: u32,
}

impl OrderBook {
    /// A fresh book with the opening orders already posted.
    pub fn seeded<R: Rng>(rng: &mut R) -> Self {
        let mut book = Self::default();
        for _ in 0..SEED_ORDER_COUNT {
            let template = CATALOG[rng.gen_range(0..OPENING_TEMPLATES)];
            book.post(template, rng);
        }
        book
    }

    /// Draws a template from the full catalog and posts it.
    pub fn generate<R: Rng>(&mut self, rng: &mut R) -> &Order {
        let template = CATALOG[rng.gen_range(0..CATALOG.len())];
        self.post(template, rng)
    }

    fn post<R: Rng>(&mut self, template: OrderTemplate, rng: &mut R) -> &Order {
        self.issued += 1;
        let order = Order {
            id: generate_order_id(&template, self.issued),
            name: template.name.to_string(),
            difficulty: template.difficulty,
            reward: template.reward,
            description: template.description.to_string(),
            deadline_days: rng.gen_range(3..=7),
        };
        self.orders.push(order);
        &self.orders[self.orders.len() - 1]
    }

    pub fn get(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| &order.id == id)
    }

    pub fn select(&mut self, id: &OrderId) -> Result<&Order, ActionError> {
        let idx = self
            .orders
            .iter()
            .position(|order| &order.id == id)
            .ok_or_else(|| ActionError::UnknownOrder(id.to_string()))?;
        self.selected = Some(id.clone());
        self.cursor = idx;
        Ok(&self.orders[idx])
    }

    pub fn selected_order(&self) -> Option<&Order> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn remove(&mut self, id: &OrderId) -> Option<Order> {
        let idx = self.orders.iter().position(|order| &order.id == id)?;
        let order = self.orders.remove(idx);
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        if self.cursor >= self.orders.len() {
            self.cursor = self.orders.len().saturating_sub(1);
        }
        Some(order)
    }

    pub fn order_at_cursor(&self) -> Option<&Order> {
        self.orders.get(self.cursor)
    }

    pub fn cursor_next(&mut self) {
        if self.orders.is_empty() {
            return;
        }
        self.cursor = (self.cursor + 1) % self.orders.len();
    }

    pub fn cursor_previous(&mut self) {
        if self.orders.is_empty() {
            return;
        }
        if self.cursor == 0 {
            self.cursor = self.orders.len() - 1;
        } else {
            self.cursor -= 1;
        }
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

fn generate_order_id(template: &OrderTemplate, serial: u32) -> OrderId {
    let body = nanoid!(5, NANO_ALPHABET);
    let id_core = format!("T{}{:03}-{}", template.difficulty, serial, body);
    let hash = blake3::hash(id_core.as_bytes());
    let nibble = (hash.as_bytes()[0] >> 4) as u32;
    let checksum = std::char::from_digit(nibble, 16)
        .unwrap_or('0')
        .to_ascii_uppercase();
    OrderId(format!("{}-{}", id_core, checksum))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn seeding_posts_opening_orders() {
        let mut rng = StdRng::seed_from_u64(7);
        let book = OrderBook::seeded(&mut rng);
        assert_eq!(book.len(), SEED_ORDER_COUNT);
        for order in &book.orders {
            assert!(CATALOG[..OPENING_TEMPLATES]
                .iter()
                .any(|t| t.name == order.name));
            assert!((3..=7).contains(&order.deadline_days));
        }
        assert!(book.selected.is_none());
    }

    #[test]
    fn generated_ids_are_unique() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut book = OrderBook::default();
        for _ in 0..200 {
            book.generate(&mut rng);
        }
        let ids: HashSet<_> = book.orders.iter().map(|o| o.id.clone()).collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn ids_carry_the_full_serial() {
        let early = generate_order_id(&CATALOG[0], 7);
        assert!(early.as_str().starts_with("T1007-"));
        let late = generate_order_id(&CATALOG[2], 1234);
        assert!(late.as_str().starts_with("T31234-"));
        let wrapped = generate_order_id(&CATALOG[2], 234);
        assert_ne!(
            late.as_str().split('-').next(),
            wrapped.as_str().split('-').next()
        );
    }

    #[test]
    fn select_keeps_order_in_book() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut book = OrderBook::seeded(&mut rng);
        let id = book.orders[1].id.clone();
        book.select(&id).unwrap();
        book.select(&id).unwrap();
        assert_eq!(book.len(), 3);
        assert_eq!(book.selected_order().map(|o| &o.id), Some(&id));

        let missing = OrderId::from("T1000-XXXXX-0");
        assert!(matches!(
            book.select(&missing),
            Err(ActionError::UnknownOrder(_))
        ));
        assert_eq!(book.selected.as_ref(), Some(&id));
    }

    #[test]
    fn remove_drops_selection_and_clamps_cursor() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut book = OrderBook::seeded(&mut rng);
        let id = book.orders[2].id.clone();
        book.select(&id).unwrap();
        let removed = book.remove(&id).unwrap();
        assert_eq!(removed.id, id);
        assert!(book.selected.is_none());
        assert_eq!(book.cursor, 1);
        assert!(book.remove(&id).is_none());
    }
}
