use crate::catalog::StoreConfig;
use inquire::Text;

pub fn edit_store(existing: &StoreConfig) -> inquire::error::InquireResult<StoreConfig> {
    let name = Text::new("Store name")
        .with_default(existing.name.as_deref().unwrap_or_default())
        .prompt()?;

    let slogan = Text::new("Slogan")
        .with_default(existing.slogan.as_deref().unwrap_or_default())
        .prompt()?;

    let whatsapp = Text::new("WhatsApp number (62...)")
        .with_default(existing.whatsapp.as_deref().unwrap_or_default())
        .prompt()?;

    Ok(StoreConfig {
        name: Some(name),
        slogan: Some(slogan),
        whatsapp: Some(whatsapp),
        extra: existing.extra.clone(),
    })
}
