use super::{ToppingChoice, price_prompt};
use crate::catalog::{Product, Topping};
use inquire::{CustomType, MultiSelect, Text, validator::Validation};

pub fn edit_product(
    existing: &Product,
    toppings: &[Topping],
) -> inquire::error::InquireResult<Product> {
    let name = Text::new("Product name")
        .with_default(&existing.name)
        .prompt()?;

    let price = price_prompt("Price", existing.price).prompt()?;

    let category = Text::new("Category")
        .with_default(&existing.category)
        .prompt()?;

    let stock = CustomType::<u32>::new("Stock")
        .with_default(existing.stock)
        .with_error_message("Enter a whole number")
        .prompt()?;

    let max_order = CustomType::<u32>::new("Max per order")
        .with_default(existing.max_order)
        .with_error_message("Enter a whole number")
        .with_validator(|value: &u32| match *value {
            0 => Ok(Validation::Invalid("Must be at least 1".into())),
            _ => Ok(Validation::Valid),
        })
        .prompt()?;

    let description = Text::new("Description")
        .with_default(&existing.description)
        .prompt()?;

    let selected = if toppings.is_empty() {
        existing.toppings.clone()
    } else {
        let choices: Vec<ToppingChoice> = toppings.iter().map(ToppingChoice).collect();
        let defaults: Vec<usize> = toppings
            .iter()
            .enumerate()
            .filter(|(_, t)| existing.toppings.contains(&t.id))
            .map(|(i, _)| i)
            .collect();

        let picked = MultiSelect::new("Available toppings", choices)
            .with_default(&defaults)
            .prompt()?
            .into_iter()
            .map(|choice| choice.0.id.clone())
            .collect();
        keep_unknown_toppings(&existing.toppings, toppings, picked)
    };

    Ok(Product {
        id: existing.id.clone(),
        name,
        price,
        description,
        stock,
        max_order,
        category,
        image: existing.image.clone(),
        toppings: selected,
    })
}

/// Ids the product already had that no longer name a topping cannot be
/// offered as choices, so they are carried over unchanged after `picked`.
fn keep_unknown_toppings(
    previous: &[String],
    toppings: &[Topping],
    mut picked: Vec<String>,
) -> Vec<String> {
    for id in previous {
        if !toppings.iter().any(|t| &t.id == id) && !picked.contains(id) {
            picked.push(id.clone());
        }
    }
    picked
}
