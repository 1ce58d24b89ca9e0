use super::store::{CatalogFile, CatalogStore};
use super::{CatalogError, CatalogResult, DanglingRef, Product, StoreConfig, Topping};
use std::path::Path;
use uuid::Uuid;

/// Owns the products, toppings and store configuration of one project and
/// writes every change straight back to the JSON files.
#[derive(Debug)]
pub struct CatalogRepository {
    store: CatalogStore,
    products: Vec<Product>,
    toppings: Vec<Topping>,
    config: StoreConfig,
}

impl CatalogRepository {
    pub fn open(root: &Path) -> Self {
        let store = CatalogStore::new(root);
        let mut repo = Self {
            store,
            products: Vec::new(),
            toppings: Vec::new(),
            config: StoreConfig::default(),
        };
        repo.reload();
        repo
    }

    pub fn reload(&mut self) {
        self.products = self.store.load_records(CatalogFile::Products);
        self.toppings = self.store.load_records(CatalogFile::Toppings);
        self.config = self.store.load(CatalogFile::Store);
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn toppings(&self) -> &[Topping] {
        &self.toppings
    }

    pub fn store_config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn topping(&self, id: &str) -> Option<&Topping> {
        self.toppings.iter().find(|t| t.id == id)
    }

    pub fn save_store_config(&mut self, config: StoreConfig) -> CatalogResult<()> {
        self.store.save(CatalogFile::Store, &config)?;
        self.config = config;
        Ok(())
    }

    /// Inserts a product with a fresh id when `id` is blank, otherwise
    /// replaces the product with the same id in place. Returns the id.
    ///
    /// An unknown non-blank id is appended as a new record keeping that id.
    pub fn upsert_product(&mut self, mut product: Product) -> CatalogResult<String> {
        validate_price("product", product.price)?;
        if product.max_order == 0 {
            return Err(CatalogError::InvalidRecord {
                kind: "product",
                reason: "max order must be at least 1".into(),
            });
        }
        dedup_in_order(&mut product.toppings);

        let id = upsert(&mut self.products, product, |p| &mut p.id, "product");
        self.store.save(CatalogFile::Products, &self.products)?;
        Ok(id)
    }

    pub fn upsert_topping(&mut self, topping: Topping) -> CatalogResult<String> {
        validate_price("topping", topping.price)?;

        let id = upsert(&mut self.toppings, topping, |t| &mut t.id, "topping");
        self.store.save(CatalogFile::Toppings, &self.toppings)?;
        Ok(id)
    }

    /// Removes every product with `id`. Returns whether anything was removed.
    pub fn delete_product(&mut self, id: &str) -> CatalogResult<bool> {
        let before = self.products.len();
        self.products.retain(|p| p.id != id);
        self.store.save(CatalogFile::Products, &self.products)?;
        Ok(self.products.len() != before)
    }

    /// Removes every topping with `id`. Products that reference it keep the id.
    pub fn delete_topping(&mut self, id: &str) -> CatalogResult<bool> {
        let before = self.toppings.len();
        self.toppings.retain(|t| t.id != id);
        self.store.save(CatalogFile::Toppings, &self.toppings)?;
        Ok(self.toppings.len() != before)
    }

    pub fn set_product_image(&mut self, id: &str, image: String) -> CatalogResult<()> {
        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CatalogError::UnknownProduct(id.to_string()))?;

        product.image = image;
        self.store.save(CatalogFile::Products, &self.products)
    }

    pub fn dangling_topping_refs(&self) -> Vec<DanglingRef> {
        self.products
            .iter()
            .flat_map(|product| {
                product
                    .toppings
                    .iter()
                    .filter(|id| self.topping(id).is_none())
                    .map(|id| DanglingRef {
                        product_id: product.id.clone(),
                        product_name: product.name.clone(),
                        topping_id: id.clone(),
                    })
            })
            .collect()
    }
}

fn upsert<T>(
    records: &mut Vec<T>,
    mut record: T,
    id_of: impl Fn(&mut T) -> &mut String,
    kind: &'static str,
) -> String {
    let is_new = id_of(&mut record).trim().is_empty();

    if is_new {
        let id = Uuid::new_v4().to_string();
        *id_of(&mut record) = id.clone();
        records.push(record);
        tracing::debug!(kind, %id, "created record");
        return id;
    }

    let id = id_of(&mut record).clone();
    match records.iter_mut().position(|r| *id_of(r) == id) {
        Some(index) => {
            records[index] = record;
            tracing::debug!(kind, %id, "replaced record");
        }
        None => {
            tracing::warn!(kind, %id, "no record with this id, appending it");
            records.push(record);
        }
    }
    id
}

fn validate_price(kind: &'static str, price: f64) -> CatalogResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(CatalogError::InvalidRecord {
            kind,
            reason: format!("price must be a non-negative amount, got {price}"),
        });
    }
    Ok(())
}

fn dedup_in_order(ids: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(id.clone()));
}
