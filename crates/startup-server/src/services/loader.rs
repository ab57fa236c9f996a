//! Bulk loader for generated datasets
//!
//! Companies are matched by name without regard to case; a match is skipped
//! and left untouched. Each new company is written together with its
//! products in one transaction. Records before a failing one stay committed.

use crate::error::{Result, ServiceError};
use crate::storage::db::is_unique_violation;
use crate::storage::Database;
use startup_types::{Dataset, LoadSummary, ValidationError};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct DataLoader {
    db: Arc<Database>,
}

impl DataLoader {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Read a dataset file and load it.
    pub async fn load_file(&self, path: &Path) -> Result<LoadSummary> {
        info!("Loading dataset from {}", path.display());

        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ServiceError::NotFound(format!(
                    "{} file not found",
                    path.display()
                )));
            }
            Err(e) => {
                return Err(ServiceError::Internal(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let dataset = Dataset::from_json(&content).map_err(|e| {
            ValidationError::Malformed(format!("Invalid JSON format in {}: {}", path.display(), e))
        })?;

        self.load(&dataset).await
    }

    pub async fn load(&self, dataset: &Dataset) -> Result<LoadSummary> {
        let mut summary = LoadSummary {
            total: dataset.len(),
            ..Default::default()
        };

        for record in dataset.records() {
            let record = record?;
            let name = &record.company.name;

            if self.db.find_company_by_name(name).await?.is_some() {
                debug!("Skipping existing company '{}'", name);
                summary.skipped += 1;
                continue;
            }

            match self.db.create_company_with_products(&record).await {
                Ok((company, products)) => {
                    debug!(
                        "Loaded company {} ({}) with {} products",
                        company.id,
                        company.name,
                        products.len()
                    );
                    summary.loaded += 1;
                }
                Err(e) if is_unique_violation(&e) => {
                    // Inserted by someone else since the lookup
                    warn!("Company '{}' appeared concurrently, skipping", name);
                    summary.skipped += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }

        info!(
            "Dataset loaded: loaded={}, skipped={}, total={}",
            summary.loaded, summary.skipped, summary.total
        );

        Ok(summary)
    }
}
