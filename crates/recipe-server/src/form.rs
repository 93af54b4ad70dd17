//! Recipe form parsing and validation
//!
//! Bodies are `application/x-www-form-urlencoded`. Ingredients arrive as
//! parallel repeated fields (`ingredient_names[]`, `ingredient_amounts[]`,
//! `ingredient_units[]`), instructions as repeated `instructions[]`.

use recipe_core::{Ingredient, Instruction, Recipe, MAX_DURATION};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Title is required")]
    MissingTitle,

    #[error("Prep time is required")]
    MissingPrepTime,

    #[error("Invalid prep time")]
    InvalidPrepTime,

    #[error("Cook time is required")]
    MissingCookTime,

    #[error("Invalid cook time")]
    InvalidCookTime,

    #[error("Invalid servings")]
    InvalidServings,

    #[error("Invalid ingredient amount")]
    InvalidIngredientAmount,

    #[error("Mismatched ingredient fields")]
    MismatchedIngredients,
}

#[derive(Debug, Default, Clone)]
pub struct RecipeForm {
    pub title: String,
    pub description: String,
    pub prep_time: String,
    pub cook_time: String,
    pub servings: String,
    pub ingredient_names: Vec<String>,
    pub ingredient_amounts: Vec<String>,
    pub ingredient_units: Vec<String>,
    pub instructions: Vec<String>,
}

impl RecipeForm {
    pub fn parse(body: &[u8]) -> Self {
        let mut form = RecipeForm::default();
        for (key, value) in url::form_urlencoded::parse(body) {
            let value = value.into_owned();
            match key.as_ref() {
                "title" => form.title = value,
                "description" => form.description = value,
                "prep_time" => form.prep_time = value,
                "cook_time" => form.cook_time = value,
                "servings" => form.servings = value,
                "ingredient_names[]" => form.ingredient_names.push(value),
                "ingredient_amounts[]" => form.ingredient_amounts.push(value),
                "ingredient_units[]" => form.ingredient_units.push(value),
                "instructions[]" => form.instructions.push(value),
                _ => {}
            }
        }
        form
    }

    /// Validate the fields and build a complete record for `id`
    pub fn into_recipe(self, id: String) -> Result<Recipe, FormError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(FormError::MissingTitle);
        }

        let prep_time = parse_minutes(
            &self.prep_time,
            FormError::MissingPrepTime,
            FormError::InvalidPrepTime,
        )?;
        let cook_time = parse_minutes(
            &self.cook_time,
            FormError::MissingCookTime,
            FormError::InvalidCookTime,
        )?;

        let servings: i32 = self
            .servings
            .trim()
            .parse()
            .map_err(|_| FormError::InvalidServings)?;
        if servings < 0 {
            return Err(FormError::InvalidServings);
        }

        let ingredients = build_ingredients(
            &self.ingredient_names,
            &self.ingredient_amounts,
            &self.ingredient_units,
        )?;

        let instructions = self
            .instructions
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .enumerate()
            .map(|(i, step)| Instruction {
                id: format!("step-{}", i),
                step: step.to_string(),
                position: i as u32,
            })
            .collect();

        Ok(Recipe {
            id,
            title,
            description: self.description.trim().to_string(),
            prep_time,
            cook_time,
            servings,
            ingredients,
            instructions,
        })
    }
}

fn parse_minutes(raw: &str, missing: FormError, invalid: FormError) -> Result<Duration, FormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(missing);
    }
    let minutes: f64 = raw.parse().map_err(|_| invalid.clone())?;
    if !minutes.is_finite() || minutes < 0.0 {
        return Err(invalid);
    }
    match Duration::try_from_secs_f64(minutes * 60.0) {
        Ok(d) if d <= MAX_DURATION => Ok(d),
        _ => Err(invalid),
    }
}

fn build_ingredients(
    names: &[String],
    amounts: &[String],
    units: &[String],
) -> Result<Vec<Ingredient>, FormError> {
    if names.len() != amounts.len() || names.len() != units.len() {
        return Err(FormError::MismatchedIngredients);
    }

    let mut ingredients = Vec::with_capacity(names.len());
    for ((name, amount), unit) in names.iter().zip(amounts).zip(units) {
        let name = name.trim();
        // Blank rows come from the spare inputs on the form
        if name.is_empty() {
            continue;
        }
        let amount: f64 = amount
            .trim()
            .parse()
            .map_err(|_| FormError::InvalidIngredientAmount)?;
        if !amount.is_finite() {
            return Err(FormError::InvalidIngredientAmount);
        }

        let position = ingredients.len();
        ingredients.push(Ingredient {
            id: format!("ing-{}", position),
            name: name.to_string(),
            amount,
            unit: unit.trim().to_string(),
            position: position as u32,
        });
    }
    Ok(ingredients)
}
