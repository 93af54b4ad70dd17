//! Recipe handlers

use crate::form::RecipeForm;
use crate::views;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    response::{Html, Redirect},
};
use tracing::info;

use super::ApiError;

pub async fn list(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let recipes = state.store.list().await?;
    tracing::debug!("Rendering {} recipes", recipes.len());
    Ok(Html(views::list_page(&recipes)))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let recipe = state.store.get(&id).await?;
    Ok(Html(views::recipe_page(&recipe)))
}

pub async fn new_form() -> Html<String> {
    Html(views::new_form())
}

pub async fn create(State(state): State<AppState>, body: Bytes) -> Result<Redirect, ApiError> {
    let id = state.ids.next_id();
    let recipe = RecipeForm::parse(&body).into_recipe(id)?;

    state.store.create(&recipe).await?;
    info!("Created recipe: id={}, title={}", recipe.id, recipe.title);

    Ok(Redirect::to(&views::recipe_path(&recipe.id)))
}

pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let recipe = state.store.get(&id).await?;
    Ok(Html(views::edit_form(&recipe)))
}

/// `PUT /recipes/:id`
pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<&'static str, ApiError> {
    apply_update(&state, id, &body).await?;
    Ok("Recipe updated successfully")
}

/// `POST /recipes/:id`, for plain HTML forms
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Redirect, ApiError> {
    let id = apply_update(&state, id, &body).await?;
    Ok(Redirect::to(&views::recipe_path(&id)))
}

async fn apply_update(state: &AppState, id: String, body: &[u8]) -> Result<String, ApiError> {
    // Unknown IDs are a 404 even when the form is also invalid
    state.store.get(&id).await?;

    let recipe = RecipeForm::parse(body).into_recipe(id)?;
    state.store.update(&recipe).await?;
    info!("Updated recipe: {}", recipe.id);

    Ok(recipe.id)
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, ApiError> {
    state.store.delete(&id).await?;
    info!("Deleted recipe: {}", id);
    Ok(Redirect::to("/recipes"))
}
