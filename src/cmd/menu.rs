use super::{Session, check, logo, product, report_prompt_error, store, topping};
use crate::{
    catalog::{Product, Topping},
    prompt,
};
use inquire::{Confirm, InquireError, Select, Text};
use std::{fmt, path::PathBuf};

#[derive(Clone, Copy)]
enum MenuItem {
    Store,
    Products,
    Toppings,
    Logo,
    Check,
    Sync,
    Quit,
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MenuItem::Store => "Store configuration",
            MenuItem::Products => "Products",
            MenuItem::Toppings => "Toppings",
            MenuItem::Logo => "Upload logo",
            MenuItem::Check => "Check catalog",
            MenuItem::Sync => "Push to remote",
            MenuItem::Quit => "Quit",
        })
    }
}

#[derive(Clone, Copy)]
enum Action {
    List,
    Add,
    Edit,
    Delete,
    Image,
    Back,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::List => "List",
            Action::Add => "Add new",
            Action::Edit => "Edit",
            Action::Delete => "Delete",
            Action::Image => "Choose image",
            Action::Back => "Back",
        })
    }
}

/// Interactive editor used when no subcommand is given.
pub fn run(session: &mut Session) {
    let items = vec![
        MenuItem::Store,
        MenuItem::Products,
        MenuItem::Toppings,
        MenuItem::Logo,
        MenuItem::Check,
        MenuItem::Sync,
        MenuItem::Quit,
    ];

    loop {
        let item = match Select::new("BiteBabe Admin", items.clone()).prompt() {
            Ok(item) => item,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => return,
            Err(err) => return report_prompt_error(err),
        };

        match item {
            MenuItem::Store => {
                store::show(session);
                if ask("Edit store configuration?", false) {
                    if store::edit(session, false) {
                        offer_push(session, "Store configuration");
                    }
                }
            }
            MenuItem::Products => products(session),
            MenuItem::Toppings => toppings(session),
            MenuItem::Logo => {
                if let Some(path) = ask_path("Logo image (png/jpg)") {
                    if logo::handle(session, &path, false) {
                        offer_push(session, "Logo");
                    }
                }
            }
            MenuItem::Check => {
                check::handle(session);
            }
            MenuItem::Sync => {
                session.push("Catalog");
            }
            MenuItem::Quit => return,
        }
    }
}

fn products(session: &mut Session) {
    let actions = vec![
        Action::List,
        Action::Add,
        Action::Edit,
        Action::Delete,
        Action::Image,
        Action::Back,
    ];

    loop {
        let Some(action) = choose("Products", actions.clone()) else {
            return;
        };

        if matches!(action, Action::Edit | Action::Delete | Action::Image)
            && session.catalog.products().is_empty()
        {
            println!("No products yet.");
            continue;
        }

        match action {
            Action::List => product::list(session),
            Action::Add => {
                if product::edit(session, Product::default(), false) {
                    offer_push(session, "Product");
                }
            }
            Action::Edit => {
                if let Some(existing) = pick_product(session) {
                    if product::edit(session, existing, false) {
                        offer_push(session, "Product");
                    }
                }
            }
            Action::Delete => {
                if let Some(existing) = pick_product(session) {
                    if ask("Delete this product?", false) {
                        if product::delete(session, &existing.id, false) {
                            offer_push(session, "Product");
                        }
                    }
                }
            }
            Action::Image => {
                if let Some(existing) = pick_product(session) {
                    if let Some(path) = ask_path("Product image (png/jpg)") {
                        if product::set_image(session, &existing.id, &path, false) {
                            offer_push(session, "Product");
                        }
                    }
                }
            }
            Action::Back => return,
        }
    }
}

fn toppings(session: &mut Session) {
    let actions = vec![Action::List, Action::Add, Action::Edit, Action::Delete, Action::Back];

    loop {
        let Some(action) = choose("Toppings", actions.clone()) else {
            return;
        };

        if matches!(action, Action::Edit | Action::Delete) && session.catalog.toppings().is_empty() {
            println!("No toppings yet.");
            continue;
        }

        match action {
            Action::List => topping::list(session),
            Action::Add => {
                if topping::edit(session, Topping::default(), false) {
                    offer_push(session, "Topping");
                }
            }
            Action::Edit => {
                if let Some(existing) = pick_topping(session) {
                    if topping::edit(session, existing, false) {
                        offer_push(session, "Topping");
                    }
                }
            }
            Action::Delete => {
                if let Some(existing) = pick_topping(session) {
                    if topping::delete(session, &existing.id, false) {
                        offer_push(session, "Topping");
                    }
                }
            }
            Action::Image | Action::Back => return,
        }
    }
}

fn choose(title: &str, actions: Vec<Action>) -> Option<Action> {
    match Select::new(title, actions).prompt() {
        Ok(Action::Back) => None,
        Ok(action) => Some(action),
        Err(err) => {
            report_prompt_error(err);
            None
        }
    }
}

fn pick_product(session: &Session) -> Option<Product> {
    match prompt::pick_product(session.catalog.products()) {
        Ok(id) => session.catalog.product(&id).cloned(),
        Err(err) => {
            report_prompt_error(err);
            None
        }
    }
}

fn pick_topping(session: &Session) -> Option<Topping> {
    match prompt::pick_topping(session.catalog.toppings()) {
        Ok(id) => session.catalog.topping(&id).cloned(),
        Err(err) => {
            report_prompt_error(err);
            None
        }
    }
}

fn ask(question: &str, default: bool) -> bool {
    Confirm::new(question)
        .with_default(default)
        .prompt()
        .unwrap_or(false)
}

fn ask_path(message: &str) -> Option<PathBuf> {
    match Text::new(message).prompt() {
        Ok(path) if !path.trim().is_empty() => Some(PathBuf::from(path.trim())),
        Ok(_) => None,
        Err(err) => {
            report_prompt_error(err);
            None
        }
    }
}

// Mirrors the "Save Local" / "Save & Push" choice of the storefront editor.
fn offer_push(session: &Session, description: &str) {
    if ask("Push changes to remote now?", false) {
        session.push(description);
    }
}
