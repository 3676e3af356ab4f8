//! Record store boundary.
//!
//! The analytics core only sees full snapshots; it never queries
//! incrementally and never mutates stored data. [`RecordStore`] is the
//! seam a real document store would implement; the in-memory
//! implementation backs the service by default and the test suite.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    error::Result,
    types::{InventoryItem, SaleRecord},
};

/// Snapshot reads the analytics core consumes.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch every sale record.
    async fn fetch_all_sale_records(&self) -> Result<Vec<SaleRecord>>;

    /// Fetch every inventory item.
    async fn fetch_all_inventory(&self) -> Result<Vec<InventoryItem>>;
}

/// In-memory record store.
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: RwLock<Vec<SaleRecord>>,
    // Keyed by (category, product_name); rows are never deleted, stock
    // just reaches 0.
    inventory: RwLock<HashMap<(String, String), InventoryItem>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append normalized sale records.
    pub async fn insert_records(&self, new_records: Vec<SaleRecord>) {
        let mut records = self.records.write().await;
        records.extend(new_records);
    }

    /// Number of stored sale records.
    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }

    /// Create or update the inventory row for `(category, product_name)`.
    ///
    /// First write creates the row; later writes mutate stock and
    /// prices and bump `updated_at`.
    pub async fn upsert_inventory(
        &self,
        category: &str,
        product_name: &str,
        stock: u64,
        price: f64,
        net_price: f64,
    ) {
        let mut inventory = self.inventory.write().await;
        let key = (category.to_string(), product_name.to_string());
        inventory
            .entry(key)
            .and_modify(|item| {
                item.stock = stock;
                item.price = price;
                item.net_price = net_price;
                item.updated_at = Utc::now();
            })
            .or_insert_with(|| InventoryItem {
                category: category.to_string(),
                product_name: product_name.to_string(),
                stock,
                price,
                net_price,
                updated_at: Utc::now(),
            });
    }

    /// Reduce stock for a sold item, saturating at 0. Returns the new
    /// stock level, or `None` when the item does not exist.
    pub async fn reduce_stock(
        &self,
        category: &str,
        product_name: &str,
        quantity: u64,
    ) -> Option<u64> {
        let mut inventory = self.inventory.write().await;
        let key = (category.to_string(), product_name.to_string());
        inventory.get_mut(&key).map(|item| {
            item.stock = item.stock.saturating_sub(quantity);
            item.updated_at = Utc::now();
            item.stock
        })
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn fetch_all_sale_records(&self) -> Result<Vec<SaleRecord>> {
        Ok(self.records.read().await.clone())
    }

    async fn fetch_all_inventory(&self) -> Result<Vec<InventoryItem>> {
        let inventory = self.inventory.read().await;
        let mut items: Vec<InventoryItem> = inventory.values().cloned().collect();
        items.sort_by(|a, b| {
            (a.category.as_str(), a.product_name.as_str())
                .cmp(&(b.category.as_str(), b.product_name.as_str()))
        });
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SaleRecordInput;

    #[tokio::test]
    async fn test_insert_and_snapshot() {
        let store = InMemoryRecordStore::new();
        let record = SaleRecord::from_input(SaleRecordInput {
            product_name: Some("Widget".to_string()),
            ..Default::default()
        });
        store.insert_records(vec![record]).await;

        let snapshot = store.fetch_all_sale_records().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.record_count().await, 1);
    }

    #[tokio::test]
    async fn test_upsert_creates_then_mutates() {
        let store = InMemoryRecordStore::new();
        store.upsert_inventory("Gadgets", "Widget", 10, 100.0, 80.0).await;
        store.upsert_inventory("Gadgets", "Widget", 7, 110.0, 80.0).await;

        let items = store.fetch_all_inventory().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].stock, 7);
        assert_eq!(items[0].price, 110.0);
    }

    #[tokio::test]
    async fn test_reduce_stock_saturates_at_zero() {
        let store = InMemoryRecordStore::new();
        store.upsert_inventory("Gadgets", "Widget", 3, 100.0, 80.0).await;

        assert_eq!(store.reduce_stock("Gadgets", "Widget", 5).await, Some(0));
        assert_eq!(store.reduce_stock("Gadgets", "Missing", 1).await, None);

        // row survives at stock 0
        let items = store.fetch_all_inventory().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].stock, 0);
    }
}
