//! Recipe types

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::wire::{duration_nanos, nullable_vec};

/// A single ingredient line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub unit: String,
    /// Display order, assigned by the caller
    pub position: u32,
}

/// A single preparation step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub id: String,
    pub step: String,
    /// Display order, assigned by the caller
    pub position: u32,
}

/// A stored recipe record
///
/// The record is always read and written as a whole; stores never merge
/// fields from an earlier version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "duration_nanos")]
    pub prep_time: Duration,
    #[serde(with = "duration_nanos")]
    pub cook_time: Duration,
    pub servings: i32,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub ingredients: Vec<Ingredient>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub instructions: Vec<Instruction>,
}

impl Recipe {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            prep_time: Duration::ZERO,
            cook_time: Duration::ZERO,
            servings: 0,
            ingredients: Vec::new(),
            instructions: Vec::new(),
        }
    }

    pub fn total_time(&self) -> Duration {
        self.prep_time + self.cook_time
    }

    /// Ingredients in display order
    pub fn ordered_ingredients(&self) -> Vec<&Ingredient> {
        let mut items: Vec<&Ingredient> = self.ingredients.iter().collect();
        items.sort_by_key(|i| i.position);
        items
    }

    /// Instructions in display order
    pub fn ordered_instructions(&self) -> Vec<&Instruction> {
        let mut steps: Vec<&Instruction> = self.instructions.iter().collect();
        steps.sort_by_key(|s| s.position);
        steps
    }
}

/// Longest duration the stored layout can hold
pub const MAX_DURATION: Duration = Duration::from_nanos(i64::MAX as u64);

/// Whole minutes (fractions kept) for display and form round-trips
pub fn duration_minutes(d: Duration) -> f64 {
    d.as_secs_f64() / 60.0
}
