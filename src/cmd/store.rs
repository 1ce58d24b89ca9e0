use super::{Session, StoreCommand, report_prompt_error};
use crate::prompt;
use owo_colors::OwoColorize;

pub fn handle(session: &mut Session, action: StoreCommand) -> bool {
    match action {
        StoreCommand::Show => {
            show(session);
            true
        }
        StoreCommand::Edit { push } => edit(session, push),
    }
}

pub fn show(session: &Session) {
    let config = session.catalog.store_config();
    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".into());

    println!("{:<10} {}", "Name".bold(), field(&config.name));
    println!("{:<10} {}", "Slogan".bold(), field(&config.slogan));
    println!("{:<10} {}", "WhatsApp".bold(), field(&config.whatsapp));
    for (key, value) in &config.extra {
        println!("{:<10} {value}", key.dimmed());
    }
}

pub fn edit(session: &mut Session, push: bool) -> bool {
    let updated = match prompt::edit_store(session.catalog.store_config()) {
        Ok(config) => config,
        Err(err) => {
            report_prompt_error(err);
            return false;
        }
    };

    match session.catalog.save_store_config(updated) {
        Ok(()) => println!("{}", "Store configuration saved locally.".green()),
        Err(err) => {
            eprintln!("Failed to save store configuration: {err}");
            return false;
        }
    }

    !push || session.push("Store configuration")
}
