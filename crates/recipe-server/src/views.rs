//! HTML pages
//!
//! Every value that came from a user goes through `escape` before it is
//! interpolated.

use recipe_core::{duration_minutes, Recipe};
use std::fmt::Write;

const SPARE_INGREDIENT_ROWS: usize = 3;
const SPARE_STEP_ROWS: usize = 2;

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Path of a recipe page, with the ID percent-encoded as one segment
pub fn recipe_path(id: &str) -> String {
    let segment: String = url::form_urlencoded::byte_serialize(id.as_bytes()).collect();
    // byte_serialize writes spaces as '+', which a path would keep literally
    format!("/recipes/{}", segment.replace('+', "%20"))
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | Recipe Box</title>
</head>
<body>
<header><nav><a href="/recipes">Recipes</a> | <a href="/recipes/new">New recipe</a></nav></header>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
        body = body,
    )
}

/// Rounded minutes for read-only pages
fn minutes(d: std::time::Duration) -> String {
    let m = duration_minutes(d);
    if m.fract() == 0.0 {
        format!("{}", m as u64)
    } else {
        format!("{:.1}", m)
    }
}

/// Exact minutes for form inputs, so an unchanged form saves the same value
fn exact_minutes(d: std::time::Duration) -> String {
    duration_minutes(d).to_string()
}

fn amount(value: f64) -> String {
    value.to_string()
}

pub fn list_page(recipes: &[Recipe]) -> String {
    let mut body = String::from("<h1>Recipes</h1>\n");
    if recipes.is_empty() {
        body.push_str("<p>No recipes yet. <a href=\"/recipes/new\">Add the first one</a>.</p>\n");
        return layout("Recipes", &body);
    }

    body.push_str("<ul class=\"recipes\">\n");
    for recipe in recipes {
        let _ = writeln!(
            body,
            "<li><a href=\"{href}\">{title}</a> <small>{total} min, serves {servings}</small></li>",
            href = escape(&recipe_path(&recipe.id)),
            title = escape(&recipe.title),
            total = minutes(recipe.total_time()),
            servings = recipe.servings,
        );
    }
    body.push_str("</ul>\n");
    layout("Recipes", &body)
}

pub fn recipe_page(recipe: &Recipe) -> String {
    let path = escape(&recipe_path(&recipe.id));
    let mut body = String::new();
    let _ = writeln!(body, "<h1>{}</h1>", escape(&recipe.title));
    if !recipe.description.is_empty() {
        let _ = writeln!(body, "<p>{}</p>", escape(&recipe.description));
    }
    let _ = writeln!(
        body,
        "<p>Prep {} min &middot; Cook {} min &middot; Serves {}</p>",
        minutes(recipe.prep_time),
        minutes(recipe.cook_time),
        recipe.servings
    );

    body.push_str("<h2>Ingredients</h2>\n<ul>\n");
    for ingredient in recipe.ordered_ingredients() {
        let _ = writeln!(
            body,
            "<li>{} {} {}</li>",
            amount(ingredient.amount),
            escape(&ingredient.unit),
            escape(&ingredient.name)
        );
    }
    body.push_str("</ul>\n<h2>Instructions</h2>\n<ol>\n");
    for step in recipe.ordered_instructions() {
        let _ = writeln!(body, "<li>{}</li>", escape(&step.step));
    }
    body.push_str("</ol>\n");

    let _ = writeln!(
        body,
        "<p><a href=\"{path}/edit\">Edit</a></p>\n\
         <form method=\"post\" action=\"{path}/delete\"><button type=\"submit\">Delete</button></form>"
    );
    layout(&recipe.title, &body)
}

pub fn new_form() -> String {
    let body = format!(
        "<h1>New recipe</h1>\n{}",
        recipe_form("/recipes", None, "Create recipe")
    );
    layout("New recipe", &body)
}

pub fn edit_form(recipe: &Recipe) -> String {
    let action = escape(&recipe_path(&recipe.id));
    let body = format!(
        "<h1>Edit {}</h1>\n{}",
        escape(&recipe.title),
        recipe_form(&action, Some(recipe), "Save changes")
    );
    layout(&format!("Edit {}", recipe.title), &body)
}

fn recipe_form(action: &str, recipe: Option<&Recipe>, submit: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<form method=\"post\" action=\"{}\">", action);

    let title = recipe.map(|r| escape(&r.title)).unwrap_or_default();
    let description = recipe.map(|r| escape(&r.description)).unwrap_or_default();
    let prep = recipe.map(|r| exact_minutes(r.prep_time)).unwrap_or_default();
    let cook = recipe.map(|r| exact_minutes(r.cook_time)).unwrap_or_default();
    let servings = recipe.map(|r| r.servings.to_string()).unwrap_or_default();

    let _ = writeln!(
        out,
        "<label>Title <input name=\"title\" value=\"{title}\" required></label>\n\
         <label>Description <textarea name=\"description\">{description}</textarea></label>\n\
         <label>Prep time (min) <input name=\"prep_time\" type=\"number\" min=\"0\" step=\"any\" value=\"{prep}\" required></label>\n\
         <label>Cook time (min) <input name=\"cook_time\" type=\"number\" min=\"0\" step=\"any\" value=\"{cook}\" required></label>\n\
         <label>Servings <input name=\"servings\" type=\"number\" min=\"0\" value=\"{servings}\" required></label>"
    );

    out.push_str("<fieldset><legend>Ingredients</legend>\n");
    let ingredients = recipe.map(|r| r.ordered_ingredients()).unwrap_or_default();
    for ingredient in &ingredients {
        ingredient_row(
            &mut out,
            &escape(&ingredient.name),
            &amount(ingredient.amount),
            &escape(&ingredient.unit),
        );
    }
    for _ in 0..SPARE_INGREDIENT_ROWS {
        ingredient_row(&mut out, "", "", "");
    }
    out.push_str("</fieldset>\n<fieldset><legend>Instructions</legend>\n");
    let steps = recipe.map(|r| r.ordered_instructions()).unwrap_or_default();
    for step in &steps {
        let _ = writeln!(
            out,
            "<textarea name=\"instructions[]\">{}</textarea>",
            escape(&step.step)
        );
    }
    for _ in 0..SPARE_STEP_ROWS {
        out.push_str("<textarea name=\"instructions[]\"></textarea>\n");
    }
    out.push_str("</fieldset>\n");

    let _ = writeln!(out, "<button type=\"submit\">{}</button>\n</form>", submit);
    out
}

fn ingredient_row(out: &mut String, name: &str, amount: &str, unit: &str) {
    let _ = writeln!(
        out,
        "<div class=\"ingredient\">\
         <input name=\"ingredient_names[]\" placeholder=\"Name\" value=\"{name}\">\
         <input name=\"ingredient_amounts[]\" placeholder=\"Amount\" value=\"{amount}\">\
         <input name=\"ingredient_units[]\" placeholder=\"Unit\" value=\"{unit}\">\
         </div>"
    );
}
