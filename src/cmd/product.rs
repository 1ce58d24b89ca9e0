use super::{ProductCommand, Session, report_prompt_error};
use crate::{catalog::Product, prompt};
use owo_colors::OwoColorize;
use std::path::Path;
use tabled::{Table, Tabled, settings::Style};

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Price")]
    price: f64,
    #[tabled(rename = "Stock")]
    stock: u32,
    #[tabled(rename = "Category")]
    category: String,
}

pub fn handle(session: &mut Session, action: ProductCommand) -> bool {
    match action {
        ProductCommand::List => {
            list(session);
            true
        }
        ProductCommand::Show { id } => show(session, &id),
        ProductCommand::Add { push } => edit(session, Product::default(), push),
        ProductCommand::Edit { id, push } => match session.catalog.product(&id).cloned() {
            Some(product) => edit(session, product, push),
            None => {
                eprintln!("Product '{id}' not found");
                false
            }
        },
        ProductCommand::Delete { id, push } => delete(session, &id, push),
        ProductCommand::Image { id, path, push } => set_image(session, &id, &path, push),
    }
}

pub fn list(session: &Session) {
    let products = session.catalog.products();
    if products.is_empty() {
        println!("No products yet.");
        return;
    }

    let rows = products.iter().map(|p| ProductRow {
        id: p.id.clone(),
        name: p.name.clone(),
        price: p.price,
        stock: p.stock,
        category: p.category.clone(),
    });
    println!("{}", Table::new(rows).with(Style::rounded()));
}

pub fn show(session: &Session, id: &str) -> bool {
    let Some(product) = session.catalog.product(id) else {
        eprintln!("Product '{id}' not found");
        return false;
    };

    let toppings: Vec<String> = product
        .toppings
        .iter()
        .map(|tid| match session.catalog.topping(tid) {
            Some(t) => format!("{} (+{})", t.name, t.price),
            None => format!("{} {}", tid, "(missing)".red()),
        })
        .collect();

    println!("{:<12} {}", "ID".bold(), product.id);
    println!("{:<12} {}", "Name".bold(), product.name);
    println!("{:<12} {}", "Price".bold(), product.price);
    println!("{:<12} {}", "Category".bold(), product.category);
    println!("{:<12} {}", "Stock".bold(), product.stock);
    println!("{:<12} {}", "Max order".bold(), product.max_order);
    println!("{:<12} {}", "Description".bold(), product.description);
    println!(
        "{:<12} {}",
        "Image".bold(),
        if product.image.is_empty() { "No Image" } else { product.image.as_str() }
    );
    println!("{:<12} {}", "Toppings".bold(), toppings.join(", "));
    true
}

pub fn edit(session: &mut Session, existing: Product, push: bool) -> bool {
    let product = match prompt::edit_product(&existing, session.catalog.toppings()) {
        Ok(product) => product,
        Err(err) => {
            report_prompt_error(err);
            return false;
        }
    };

    match session.catalog.upsert_product(product) {
        Ok(id) => println!("{} {id}", "Product saved locally:".green()),
        Err(err) => {
            eprintln!("Failed to save product: {err}");
            return false;
        }
    }

    !push || session.push("Product")
}

pub fn delete(session: &mut Session, id: &str, push: bool) -> bool {
    match session.catalog.delete_product(id) {
        Ok(true) => println!("Deleted product '{id}'."),
        Ok(false) => {
            println!("No product with id '{id}', nothing deleted.");
            return false;
        }
        Err(err) => {
            eprintln!("Failed to delete product: {err}");
            return false;
        }
    }

    !push || session.push("Product")
}

pub fn set_image(session: &mut Session, id: &str, source: &Path, push: bool) -> bool {
    if session.catalog.product(id).is_none() {
        eprintln!("Product '{id}' not found");
        return false;
    }

    let relative = match session.assets.add_product_image(source) {
        Ok(relative) => relative,
        Err(err) => {
            eprintln!("{} {err}", "Image import failed:".red());
            return false;
        }
    };

    match session.catalog.set_product_image(id, relative.clone()) {
        Ok(()) => println!("{} {relative}", "Product image set:".green()),
        Err(err) => {
            eprintln!("Failed to save product: {err}");
            return false;
        }
    }

    !push || session.push("Product")
}
