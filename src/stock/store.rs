use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::StorageError;
use crate::models::StockItem;

/// Header row of the stock file.
pub const STOCK_HEADERS: [&str; 4] = ["Item Name", "Category", "Quantity", "Price (₹)"];

/// Flat CSV file holding every stock item. Each mutation reads the file,
/// changes the rows, and rewrites the whole thing.
#[derive(Debug, Clone)]
pub struct StockStore {
    path: PathBuf,
}

impl StockStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every row. A missing file is an empty inventory.
    pub fn load(&self) -> Result<Vec<StockItem>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)?;
        let items = reader
            .deserialize::<StockItem>()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Rewrite the file through a temporary sibling so a failed write never
    /// leaves a truncated inventory behind.
    pub fn save(&self, items: &[StockItem]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let temp_path = self.path.with_extension("csv.tmp");
        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_path(&temp_path)?;
            writer.write_record(STOCK_HEADERS)?;
            for item in items {
                writer.serialize(item)?;
            }
            writer.flush()?;
        }
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    pub fn add(&self, item: StockItem) -> Result<Vec<StockItem>, StorageError> {
        let mut items = self.load()?;
        info!(name = %item.name, "stock item added");
        items.push(item);
        self.save(&items)?;
        Ok(items)
    }

    /// Set quantity and price on every row named `name`.
    pub fn update(
        &self,
        name: &str,
        quantity: u64,
        price: f64,
    ) -> Result<Vec<StockItem>, StorageError> {
        let mut items = self.load()?;
        let mut touched = 0usize;
        for item in items.iter_mut().filter(|item| item.name == name) {
            item.quantity = quantity;
            item.price = price;
            touched += 1;
        }
        self.save(&items)?;
        info!(name, touched, "stock item updated");
        Ok(items)
    }

    /// Drop every row named `name`.
    pub fn delete(&self, name: &str) -> Result<Vec<StockItem>, StorageError> {
        let mut items = self.load()?;
        let before = items.len();
        items.retain(|item| item.name != name);
        self.save(&items)?;
        info!(name, removed = before - items.len(), "stock item deleted");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn item(name: &str, quantity: u64, price: f64) -> StockItem {
        StockItem {
            name: name.into(),
            category: "Tools".into(),
            quantity,
            price,
        }
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = StockStore::new(dir.path().join("inventory_data.csv"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn add_persists_with_csv_headers() {
        let dir = TempDir::new().unwrap();
        let store = StockStore::new(dir.path().join("inventory_data.csv"));
        store.add(item("Hammer", 3, 250.0)).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.starts_with("Item Name,Category,Quantity,Price (₹)"));
        assert_eq!(store.load().unwrap(), vec![item("Hammer", 3, 250.0)]);
    }

    #[test]
    fn update_and_delete_act_on_every_row_with_the_name() {
        let dir = TempDir::new().unwrap();
        let store = StockStore::new(dir.path().join("inventory_data.csv"));
        store.add(item("Hammer", 3, 250.0)).unwrap();
        store.add(item("Saw", 1, 400.0)).unwrap();
        store.add(item("Hammer", 5, 260.0)).unwrap();

        let items = store.update("Hammer", 10, 199.5).unwrap();
        assert!(items
            .iter()
            .filter(|i| i.name == "Hammer")
            .all(|i| i.quantity == 10 && i.price == 199.5));
        assert_eq!(items[1], item("Saw", 1, 400.0));

        let items = store.delete("Hammer").unwrap();
        assert_eq!(items, vec![item("Saw", 1, 400.0)]);
        assert_eq!(store.load().unwrap(), items);
    }

    #[test]
    fn empty_inventory_keeps_header() {
        let dir = TempDir::new().unwrap();
        let store = StockStore::new(dir.path().join("inventory_data.csv"));
        store.add(item("Saw", 1, 400.0)).unwrap();
        store.delete("Saw").unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw.trim_end(), "Item Name,Category,Quantity,Price (₹)");
        assert!(store.load().unwrap().is_empty());
    }
}
