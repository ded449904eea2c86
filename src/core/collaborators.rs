use super::types::{IngredientId, ToolId};
use log::debug;
use std::collections::{HashMap, HashSet};

/// External ingredient ledger consulted by the cooking pipeline.
///
/// Implementations must keep `consume` consistent with `has_enough`:
/// a consume after a passed check may still fail (the pipeline degrades
/// that to a logged no-op), but must never deduct partially.
pub trait IngredientLedger {
    fn has_enough(&self, ingredient_id: &str, quantity: u32) -> bool;
    /// Deduct the quantity. Returns false (and deducts nothing) when
    /// the stock is insufficient.
    fn consume(&mut self, ingredient_id: &str, quantity: u32) -> bool;
}

/// External tool registry consulted before a tool use is accepted.
pub trait ToolRegistry {
    fn tool_exists(&self, tool_id: &str) -> bool;
    fn is_owned(&self, tool_id: &str) -> bool;
}

/// In-memory ingredient stock for demos and tests.
pub struct Pantry {
    stock: HashMap<IngredientId, u32>,
}

impl Pantry {
    pub fn new() -> Self {
        Self {
            stock: HashMap::new(),
        }
    }

    pub fn restock(&mut self, ingredient_id: &str, quantity: u32) {
        *self.stock.entry(ingredient_id.to_string()).or_insert(0) += quantity;
    }

    pub fn stock_of(&self, ingredient_id: &str) -> u32 {
        self.stock.get(ingredient_id).copied().unwrap_or(0)
    }
}

impl Default for Pantry {
    fn default() -> Self {
        Self::new()
    }
}

impl IngredientLedger for Pantry {
    fn has_enough(&self, ingredient_id: &str, quantity: u32) -> bool {
        self.stock_of(ingredient_id) >= quantity
    }

    fn consume(&mut self, ingredient_id: &str, quantity: u32) -> bool {
        match self.stock.get_mut(ingredient_id) {
            Some(stock) if *stock >= quantity => {
                *stock -= quantity;
                debug!(
                    "[Pantry] Consumed {} x {}, {} left",
                    quantity, ingredient_id, *stock
                );
                true
            }
            _ => false,
        }
    }
}

/// In-memory tool registry for demos and tests.
pub struct ToolShed {
    known: HashSet<ToolId>,
    owned: HashSet<ToolId>,
}

impl ToolShed {
    pub fn new() -> Self {
        Self {
            known: HashSet::new(),
            owned: HashSet::new(),
        }
    }

    /// Register a tool the shop could stock.
    pub fn register(&mut self, tool_id: &str) {
        self.known.insert(tool_id.to_string());
    }

    /// Register and own a tool.
    pub fn acquire(&mut self, tool_id: &str) {
        self.known.insert(tool_id.to_string());
        self.owned.insert(tool_id.to_string());
    }
}

impl Default for ToolShed {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry for ToolShed {
    fn tool_exists(&self, tool_id: &str) -> bool {
        self.known.contains(tool_id)
    }

    fn is_owned(&self, tool_id: &str) -> bool {
        self.owned.contains(tool_id)
    }
}
