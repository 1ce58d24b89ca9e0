mod edit_product;
mod edit_store;
mod edit_topping;

pub use edit_product::edit_product;
pub use edit_store::edit_store;
pub use edit_topping::edit_topping;

use crate::catalog::{Product, Topping};
use inquire::{CustomType, Select, validator::Validation};
use std::fmt;

pub(crate) struct ToppingChoice<'a>(pub &'a Topping);

impl fmt::Display for ToppingChoice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (+{})", self.0.name, self.0.price)
    }
}

struct ProductChoice<'a>(&'a Product);

impl fmt::Display for ProductChoice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} (stock {})", self.0.name, self.0.price, self.0.stock)
    }
}

fn price_prompt(message: &str, default: f64) -> CustomType<'_, f64> {
    CustomType::<f64>::new(message)
        .with_default(default)
        .with_error_message("Enter an amount, e.g. 15000")
        .with_validator(|value: &f64| {
            if value.is_finite() && *value >= 0.0 {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid("Amount cannot be negative".into()))
            }
        })
}

pub fn pick_product(products: &[Product]) -> inquire::error::InquireResult<String> {
    let choices: Vec<ProductChoice> = products.iter().map(ProductChoice).collect();
    let picked = Select::new("Product", choices).prompt()?;
    Ok(picked.0.id.clone())
}

pub fn pick_topping(toppings: &[Topping]) -> inquire::error::InquireResult<String> {
    let choices: Vec<ToppingChoice> = toppings.iter().map(ToppingChoice).collect();
    let picked = Select::new("Topping", choices).prompt()?;
    Ok(picked.0.id.clone())
}
