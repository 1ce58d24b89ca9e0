use super::{Session, ToppingCommand, report_prompt_error};
use crate::{catalog::Topping, prompt};
use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

#[derive(Tabled)]
struct ToppingRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Price")]
    price: f64,
}

pub fn handle(session: &mut Session, action: ToppingCommand) -> bool {
    match action {
        ToppingCommand::List => {
            list(session);
            true
        }
        ToppingCommand::Add { push } => edit(session, Topping::default(), push),
        ToppingCommand::Edit { id, push } => match session.catalog.topping(&id).cloned() {
            Some(topping) => edit(session, topping, push),
            None => {
                eprintln!("Topping '{id}' not found");
                false
            }
        },
        ToppingCommand::Delete { id, push } => delete(session, &id, push),
    }
}

pub fn list(session: &Session) {
    let toppings = session.catalog.toppings();
    if toppings.is_empty() {
        println!("No toppings yet.");
        return;
    }

    let rows = toppings.iter().map(|t| ToppingRow {
        id: t.id.clone(),
        name: t.name.clone(),
        price: t.price,
    });
    println!("{}", Table::new(rows).with(Style::rounded()));
}

pub fn edit(session: &mut Session, existing: Topping, push: bool) -> bool {
    let topping = match prompt::edit_topping(&existing) {
        Ok(topping) => topping,
        Err(err) => {
            report_prompt_error(err);
            return false;
        }
    };

    match session.catalog.upsert_topping(topping) {
        Ok(id) => println!("{} {id}", "Topping saved locally:".green()),
        Err(err) => {
            eprintln!("Failed to save topping: {err}");
            return false;
        }
    }

    !push || session.push("Topping")
}

pub fn delete(session: &mut Session, id: &str, push: bool) -> bool {
    match session.catalog.delete_topping(id) {
        Ok(true) => println!("Deleted topping '{id}'."),
        Ok(false) => {
            println!("No topping with id '{id}', nothing deleted.");
            return false;
        }
        Err(err) => {
            eprintln!("Failed to delete topping: {err}");
            return false;
        }
    }

    let still_used = session
        .catalog
        .products()
        .iter()
        .filter(|p| p.toppings.iter().any(|t| t == id))
        .count();
    if still_used > 0 {
        println!(
            "{}",
            format!("{still_used} product(s) still reference this topping; run `bitebabe check`.")
                .yellow()
        );
    }

    !push || session.push("Topping")
}
