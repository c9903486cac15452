// src/skid/mod.rs
//! The extract, map, assemble and load pipeline, run once per invocation.

pub mod logging;
pub mod summary;


use chrono::Local;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::agol::{LoadError, Loader, PublishedItem, Publisher};
use crate::datasets::{self, DatasetDescriptor, DatasetError, DatasetKey};
use crate::fields::map_records;
use crate::notify::{MessageDetails, Notifier, NotifyError};
use crate::salesforce::{ExtractError, Extractor};
use crate::settings::io::SecretsError;
use crate::settings::{Secrets, SKID_NAME};
use crate::spatial::{self, SpatialTable};
use summary::{DatasetCount, RunSummary};

#[derive(Error, Debug)]
pub enum SkidError {
    #[error("Invalid dataset configuration")]
    Dataset(#[from] DatasetError),
    #[error("Could not load secrets")]
    Secrets(#[from] SecretsError),
    #[error("Salesforce extraction failed")]
    Extract(#[from] ExtractError),
    #[error("ArcGIS Online load failed")]
    Load(#[from] LoadError),
    #[error("Notification failed")]
    Notify(#[from] NotifyError),
}

/// Top-level message followed by each `source()` on its own line.
pub fn error_chain(error: &dyn std::error::Error) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        text.push_str("\n  caused by: ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

pub struct Skid<E, L, N> {
    extractor: E,
    loader: L,
    notifier: N,
    item_ids: HashMap<DatasetKey, String>,
    datasets: Vec<DatasetDescriptor>,
    log_path: Option<PathBuf>,
}

impl<E: Extractor, L, N: Notifier> Skid<E, L, N> {
    pub fn new(extractor: E, loader: L, notifier: N, secrets: &Secrets) -> Self {
        let datasets = datasets::all();
        let item_ids = datasets
            .iter()
            .map(|d| (d.key, secrets.item_id(d.key).to_string()))
            .collect();
        Self {
            extractor,
            loader,
            notifier,
            item_ids,
            datasets,
            log_path: None,
        }
    }

    pub fn with_log_file(mut self, path: PathBuf) -> Self {
        self.log_path = Some(path);
        self
    }

    fn build_table(&mut self, dataset: &DatasetDescriptor) -> Result<SpatialTable, SkidError> {
        dataset.validate()?;
        let raw = self.extractor.get_records(dataset)?;
        let records = map_records(&raw, &dataset.fields);
        Ok(spatial::assemble(dataset, records))
    }

    fn failure_details(&self, dataset: DatasetKey, error: &SkidError) -> MessageDetails {
        MessageDetails {
            subject: format!("{} Update Failure", SKID_NAME),
            message: format!("Failed while processing {}.\n\n{}", dataset, error_chain(error)),
            attachment: self.log_path.clone(),
        }
    }

    /// Routine run: every dataset is truncated and reloaded, then a summary
    /// is sent. The first failure stops the run and is reported instead.
    pub fn update(&mut self) -> Result<RunSummary, SkidError>
    where
        L: Loader,
    {
        let start = Local::now();
        let mut counts = Vec::with_capacity(self.datasets.len());

        for dataset in self.datasets.clone() {
            info!("{}: starting", dataset.key);
            match self.update_dataset(&dataset) {
                Ok(rows) => counts.push(DatasetCount {
                    title: dataset.title.to_string(),
                    rows,
                }),
                Err(e) => {
                    error!("{}: {}", dataset.key, error_chain(&e));
                    let details = self.failure_details(dataset.key, &e);
                    if let Err(notify_error) = self.notifier.notify(&details) {
                        error!("Could not send failure notification: {}", error_chain(&notify_error));
                    }
                    return Err(e);
                }
            }
        }

        let summary = RunSummary {
            start,
            end: Local::now(),
            counts,
        };
        info!("Update finished");
        self.notifier.notify(&MessageDetails {
            subject: format!("{} Update Summary", SKID_NAME),
            message: summary.render(),
            attachment: self.log_path.clone(),
        })?;
        Ok(summary)
    }

    fn update_dataset(&mut self, dataset: &DatasetDescriptor) -> Result<usize, SkidError>
    where
        L: Loader,
    {
        let table = self.build_table(dataset)?;
        if table.is_empty() {
            warn!("{}: no rows to load; the layer will be left empty", dataset.key);
        }
        let item_id = self.item_ids.get(&dataset.key).map(String::as_str).unwrap_or_default();
        Ok(self.loader.truncate_and_load(item_id, &table)?)
    }

    /// One-time path that creates a hosted service per dataset.
    pub fn publish(&mut self) -> Result<Vec<(DatasetKey, PublishedItem)>, SkidError>
    where
        L: Publisher,
    {
        let mut published = Vec::with_capacity(self.datasets.len());
        for dataset in self.datasets.clone() {
            let table = self.build_table(&dataset)?;
            let item = self.loader.publish(&dataset, &table)?;
            published.push((dataset.key, item));
        }
        Ok(published)
    }
}
