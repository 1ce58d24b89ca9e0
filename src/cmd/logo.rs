use super::Session;
use owo_colors::OwoColorize;
use std::path::Path;

pub fn handle(session: &Session, source: &Path, push: bool) -> bool {
    match session.assets.set_logo(source) {
        Ok((logo, favicon)) => {
            println!("{}", "Logo updated and favicon generated.".green());
            println!("  {}", logo.display());
            println!("  {}", favicon.display());
        }
        Err(err) => {
            eprintln!("{} {err}", "Logo upload failed:".red());
            return false;
        }
    }

    !push || session.push("Logo")
}
