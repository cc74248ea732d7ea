//! The drink ledger: recorded entries, best-value ordering and persistence.
//!
//! The ledger is an explicit service object. The application builds one at
//! startup and hands out references; tests build a fresh one per test.
//!
//! Every mutation writes the whole collection to the attached
//! [`KeyValueStore`] under [`STORAGE_KEY`]. Storage failures never reach the
//! caller: they are logged and recorded in [`StorageStatus`], and the
//! in-memory collection stays authoritative until the next successful write.

use crate::calculator::to_milliliters;
use crate::store::KeyValueStore;
use crate::types::{DerivedMetrics, DrinkEntry, NewDrinkEntry, VolumeOption};
use crate::{Error, Result};
use chrono::{SubsecRound, Utc};
use uuid::Uuid;

/// Key under which the ledger is stored
pub const STORAGE_KEY: &str = "dokabiliteetti-drinks";

/// Outcome of the most recent interaction with the durable store
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageStatus {
    /// No store attached; the ledger never touches storage
    Detached,
    /// Last load or write succeeded
    Synced,
    /// Last load or write failed; memory and storage may have diverged
    Failed(String),
}

/// Recorded drinks, ordered by best value on read
pub struct Ledger {
    drinks: Vec<DrinkEntry>,
    list_open: bool,
    initialized: bool,
    store: Option<Box<dyn KeyValueStore>>,
    status: StorageStatus,
}

impl Ledger {
    /// A ledger with no durable store. Starts empty and performs no I/O.
    pub fn detached() -> Self {
        Self {
            drinks: Vec::new(),
            list_open: false,
            initialized: true,
            store: None,
            status: StorageStatus::Detached,
        }
    }

    /// Attach `store` and load the previously persisted entries
    pub fn open(store: impl KeyValueStore + 'static) -> Self {
        let mut ledger = Self {
            drinks: Vec::new(),
            list_open: false,
            initialized: false,
            store: Some(Box::new(store)),
            status: StorageStatus::Synced,
        };
        ledger.initialize();
        ledger
    }

    /// Load from storage once; later calls are no-ops
    ///
    /// A missing record yields an empty ledger. An unreadable record or one
    /// that is not a JSON array is logged, yields an empty ledger and marks the
    /// status failed. Individual malformed entries are skipped.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        let Some(store) = self.store.as_ref() else {
            return;
        };

        self.drinks = match load_entries(&**store) {
            Ok(drinks) => {
                tracing::debug!("Loaded {} drinks from storage", drinks.len());
                drinks
            }
            Err(e) => {
                tracing::warn!("Failed to load drinks from storage: {}. Starting empty.", e);
                self.status = StorageStatus::Failed(e.to_string());
                Vec::new()
            }
        };
    }

    /// Record a drink and return the created entry
    ///
    /// An empty `name` becomes `"{volume label} {alcohol_percent}%"`. The
    /// volume is stored in milliliters. Adding the first entry opens the list.
    #[allow(clippy::too_many_arguments)]
    pub fn add(
        &mut self,
        name: &str,
        price: f64,
        volume: &VolumeOption,
        alcohol_percent: f64,
        pure_alcohol_ml: f64,
        price_per_cl_alcohol: f64,
        ml_per_euro: Option<f64>,
        dokability_score: Option<i32>,
    ) -> DrinkEntry {
        let name = if name.is_empty() {
            format!("{} {}%", volume.label, alcohol_percent)
        } else {
            name.to_string()
        };

        let drink: DrinkEntry = NewDrinkEntry {
            id: Uuid::new_v4(),
            name,
            price,
            volume: to_milliliters(volume.value, volume.unit),
            volume_unit: volume.unit,
            alcohol_percent,
            pure_alcohol_ml,
            price_per_cl_alcohol,
            ml_per_euro,
            dokability_score,
            created_at: Utc::now().trunc_subsecs(3),
        }
        .into();

        self.drinks.push(drink.clone());
        self.sync();

        if self.drinks.len() == 1 {
            self.list_open = true;
        }

        tracing::info!(
            "Added drink {} ({}), {:.3} per cl of alcohol",
            drink.id(),
            drink.name(),
            drink.price_per_cl_alcohol()
        );
        drink
    }

    /// Record a drink with every calculator metric
    pub fn add_metrics(
        &mut self,
        name: &str,
        price: f64,
        volume: &VolumeOption,
        alcohol_percent: f64,
        metrics: &DerivedMetrics,
    ) -> DrinkEntry {
        self.add(
            name,
            price,
            volume,
            alcohol_percent,
            metrics.pure_alcohol_ml,
            metrics.price_per_cl_alcohol,
            Some(metrics.ml_per_euro),
            Some(metrics.dokability_score),
        )
    }

    /// Remove the entry with `id`; unknown ids leave the ledger untouched
    pub fn remove(&mut self, id: Uuid) {
        if let Some(idx) = self.drinks.iter().position(|d| d.id() == id) {
            let removed = self.drinks.remove(idx);
            self.sync();
            tracing::info!("Removed drink {} ({})", id, removed.name());
        } else {
            tracing::debug!("Remove requested for unknown drink {}", id);
        }
    }

    /// Remove everything and close the list
    pub fn clear(&mut self) {
        let count = self.drinks.len();
        self.drinks.clear();
        self.sync();
        self.list_open = false;
        tracing::info!("Cleared {} drinks", count);
    }

    /// All entries, cheapest alcohol first
    ///
    /// Computed on every call; the stored insertion order is not touched.
    pub fn sorted_view(&self) -> Vec<DrinkEntry> {
        let mut sorted = self.drinks.clone();
        sorted.sort_by(|a, b| a.price_per_cl_alcohol().total_cmp(&b.price_per_cl_alcohol()));
        sorted
    }

    /// The best value entry, if any
    pub fn best(&self) -> Option<DrinkEntry> {
        self.sorted_view().into_iter().next()
    }

    /// Whether `entry` is the current best value
    pub fn is_best_value(&self, entry: &DrinkEntry) -> bool {
        self.best().is_some_and(|best| best.id() == entry.id())
    }

    pub fn count(&self) -> usize {
        self.drinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drinks.is_empty()
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[DrinkEntry] {
        &self.drinks
    }

    pub fn get(&self, id: Uuid) -> Option<&DrinkEntry> {
        self.drinks.iter().find(|d| d.id() == id)
    }

    /// List-visibility flag for the presentation layer
    pub fn is_list_open(&self) -> bool {
        self.list_open
    }

    pub fn toggle_list(&mut self) {
        self.list_open = !self.list_open;
    }

    pub fn storage_status(&self) -> &StorageStatus {
        &self.status
    }

    /// Write the whole collection to the store
    fn persist(&mut self) -> Result<()> {
        let Some(store) = self.store.as_mut() else {
            return Ok(());
        };
        let contents = serde_json::to_string(&self.drinks)?;
        store.set(STORAGE_KEY, &contents)
    }

    /// Persist, logging and recording failures instead of returning them
    fn sync(&mut self) {
        if self.store.is_none() {
            return;
        }
        self.status = match self.persist() {
            Ok(()) => StorageStatus::Synced,
            Err(e) => {
                tracing::error!("Failed to save drinks to storage: {}", e);
                StorageStatus::Failed(e.to_string())
            }
        };
    }
}

fn load_entries(store: &dyn KeyValueStore) -> Result<Vec<DrinkEntry>> {
    let Some(contents) = store.get(STORAGE_KEY)? else {
        return Ok(Vec::new());
    };
    let records: Vec<serde_json::Value> = serde_json::from_str(&contents).map_err(Error::from)?;

    let mut drinks = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<DrinkEntry>(record) {
            Ok(drink) => drinks.push(drink),
            Err(e) => {
                tracing::warn!("Skipping unreadable drink at index {}: {}", index, e);
            }
        }
    }
    Ok(drinks)
}
