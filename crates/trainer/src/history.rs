use std::path::Path;

use chrono::NaiveDate;
use common::{ForecastError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One day of sales for a single store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    /// Promotion running that day (0 or 1).
    #[serde(default)]
    pub promo: f64,
    /// Units sold per item.
    pub sales: IndexMap<String, f64>,
    /// Unit price per item.
    #[serde(default)]
    pub prices: IndexMap<String, f64>,
}

impl DailyRecord {
    /// Units of `item` sold; an item absent from the record sold nothing.
    pub fn sales_of(&self, item: &str) -> f64 {
        self.sales.get(item).copied().unwrap_or(0.0)
    }

    /// Price of `item`, 0 when unknown.
    pub fn price_of(&self, item: &str) -> f64 {
        self.prices.get(item).copied().unwrap_or(0.0)
    }
}

/// Daily records in ascending date order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SalesHistory {
    records: Vec<DailyRecord>,
}

impl SalesHistory {
    pub fn new(mut records: Vec<DailyRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(ForecastError::Training("sales history is empty".into()));
        }
        records.sort_by_key(|r| r.date);
        if let Some(pair) = records.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(ForecastError::Training(format!(
                "duplicate history date {}",
                pair[0].date
            )));
        }
        for record in &records {
            if let Some((item, v)) = record.sales.iter().find(|(_, v)| !v.is_finite()) {
                return Err(ForecastError::Training(format!(
                    "non-finite sales {v} for '{item}' on {}",
                    record.date
                )));
            }
        }
        Ok(Self { records })
    }

    /// Wrap records already known to be non-empty, sorted and unique by date.
    pub(crate) fn from_sorted(records: Vec<DailyRecord>) -> Self {
        Self { records }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<DailyRecord> = serde_json::from_str(json)?;
        Self::new(records)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let history = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            days = history.len(),
            items = history.item_names().len(),
            "Sales history loaded"
        );
        Ok(history)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        debug!(path = %path.display(), days = self.len(), "Sales history written");
        Ok(())
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every item that appears in any record, in first-seen order.
    pub fn item_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for record in &self.records {
            for item in record.sales.keys() {
                if !names.contains(item) {
                    names.push(item.clone());
                }
            }
        }
        names
    }

    /// Sales of `item` per day, in date order.
    pub fn series(&self, item: &str) -> Vec<f64> {
        self.records.iter().map(|r| r.sales_of(item)).collect()
    }
}
