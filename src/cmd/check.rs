use super::Session;
use owo_colors::OwoColorize;

/// Reports problems without changing anything. Returns `false` when any
/// problem was found or the scan failed.
pub fn handle(session: &Session) -> bool {
    let dangling = session.catalog.dangling_topping_refs();
    if dangling.is_empty() {
        println!("{}", "All topping references resolve.".green());
    } else {
        println!("{}", "Products referencing deleted toppings:".yellow());
        for entry in &dangling {
            println!(
                "  {} ({}) -> {}",
                entry.product_name, entry.product_id, entry.topping_id
            );
        }
    }

    let referenced = session
        .catalog
        .products()
        .iter()
        .map(|p| p.image.as_str())
        .filter(|image| !image.is_empty());

    let images_clean = match session.assets.orphaned_product_images(referenced) {
        Ok(orphans) if orphans.is_empty() => {
            println!("{}", "No unused product images.".green());
            true
        }
        Ok(orphans) => {
            println!("{}", "Product images no product uses:".yellow());
            for path in orphans {
                println!("  {path}");
            }
            false
        }
        Err(err) => {
            eprintln!("Failed to scan product images: {err}");
            false
        }
    };

    dangling.is_empty() && images_clean
}
