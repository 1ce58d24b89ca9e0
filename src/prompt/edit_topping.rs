use super::price_prompt;
use crate::catalog::Topping;
use inquire::Text;

pub fn edit_topping(existing: &Topping) -> inquire::error::InquireResult<Topping> {
    let name = Text::new("Topping name")
        .with_default(&existing.name)
        .prompt()?;

    let price = price_prompt("Surcharge", existing.price).prompt()?;

    Ok(Topping {
        id: existing.id.clone(),
        name,
        price,
    })
}
