// src/datasets/mod.rs
//! The four datasets the skid keeps in sync, and what each one reads from
//! Salesforce.

pub mod compartments;
pub mod facilities;
pub mod releases;
pub mod tanks;

use clap::ValueEnum;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

use crate::fields::{FieldConfig, FieldConfigError};
use crate::spatial::CoordinateBounds;

pub const SOQL_QUERY_PATH: &str = "services/data/v60.0/query/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum DatasetKey {
    Facilities,
    Releases,
    Tanks,
    Compartments,
}

impl fmt::Display for DatasetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DatasetKey::Facilities => "facilities",
            DatasetKey::Releases => "releases",
            DatasetKey::Tanks => "tanks",
            DatasetKey::Compartments => "compartments",
        };
        f.write_str(name)
    }
}

/// Where the point geometry of a feature layer comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointSource {
    pub easting_field: &'static str,
    pub northing_field: &'static str,
    pub bounds: CoordinateBounds,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayerKind {
    Layer(PointSource),
    Table,
}

impl LayerKind {
    pub fn is_layer(&self) -> bool {
        matches!(self, LayerKind::Layer(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSource {
    /// Custom Apex REST endpoint that returns the finished records.
    Apex { path: &'static str },
    /// SOQL query against a Salesforce object.
    Soql {
        object: &'static str,
        where_clause: Option<&'static str>,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DatasetError {
    #[error("{dataset}: invalid field configuration")]
    Field {
        dataset: DatasetKey,
        #[source]
        source: FieldConfigError,
    },
    #[error("{dataset}: target field '{field}' is configured more than once")]
    DuplicateTarget { dataset: DatasetKey, field: String },
    #[error("{dataset}: coordinate field '{field}' is not configured")]
    MissingCoordinateField { dataset: DatasetKey, field: String },
}

#[derive(Debug, Clone)]
pub struct DatasetDescriptor {
    pub key: DatasetKey,
    pub table_name: &'static str,
    pub title: &'static str,
    pub kind: LayerKind,
    pub source: RecordSource,
    pub fields: Vec<FieldConfig>,
}

impl DatasetDescriptor {
    pub fn validate(&self) -> Result<(), DatasetError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            field.check().map_err(|source| DatasetError::Field {
                dataset: self.key,
                source,
            })?;
            if !seen.insert(field.agol_field.as_str()) {
                return Err(DatasetError::DuplicateTarget {
                    dataset: self.key,
                    field: field.agol_field.clone(),
                });
            }
        }

        if let LayerKind::Layer(point) = self.kind {
            for coordinate in [point.easting_field, point.northing_field] {
                if !seen.contains(coordinate) {
                    return Err(DatasetError::MissingCoordinateField {
                        dataset: self.key,
                        field: coordinate.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Comma-delimited Salesforce columns for the SOQL select list.
    pub fn columns_string(&self) -> String {
        self.fields
            .iter()
            .filter_map(|f| f.sf_field.as_deref())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// The SOQL statement for query-backed datasets; `None` for Apex sources.
    pub fn soql_query(&self) -> Option<String> {
        match &self.source {
            RecordSource::Apex { .. } => None,
            RecordSource::Soql {
                object,
                where_clause,
            } => {
                let mut query = format!("SELECT {} from {}", self.columns_string(), object);
                if let Some(clause) = where_clause {
                    query.push_str(" WHERE ");
                    query.push_str(clause);
                }
                Some(query)
            }
        }
    }
}

/// All datasets, in the order the skid processes them.
pub fn all() -> Vec<DatasetDescriptor> {
    vec![
        facilities::descriptor(),
        releases::descriptor(),
        tanks::descriptor(),
        compartments::descriptor(),
    ]
}

pub fn by_key(key: DatasetKey) -> DatasetDescriptor {
    match key {
        DatasetKey::Facilities => facilities::descriptor(),
        DatasetKey::Releases => releases::descriptor(),
        DatasetKey::Tanks => tanks::descriptor(),
        DatasetKey::Compartments => compartments::descriptor(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_datasets_validate() {
        for dataset in all() {
            assert!(dataset.validate().is_ok(), "{} failed validation", dataset.key);
        }
    }

    #[test]
    fn test_processing_order() {
        let keys: Vec<_> = all().iter().map(|d| d.key).collect();
        assert_eq!(
            keys,
            vec![
                DatasetKey::Facilities,
                DatasetKey::Releases,
                DatasetKey::Tanks,
                DatasetKey::Compartments,
            ]
        );
    }

    #[test]
    fn test_only_facilities_is_a_layer() {
        for dataset in all() {
            assert_eq!(dataset.kind.is_layer(), dataset.key == DatasetKey::Facilities);
        }
    }

    #[test]
    fn test_duplicate_target_is_rejected() {
        let mut dataset = tanks::descriptor();
        dataset
            .fields
            .push(FieldConfig::text("TANKID", "Other__c", "Again"));
        assert_eq!(
            dataset.validate(),
            Err(DatasetError::DuplicateTarget {
                dataset: DatasetKey::Tanks,
                field: "TANKID".to_string(),
            })
        );
    }

    #[test]
    fn test_layer_requires_coordinate_fields() {
        let mut dataset = facilities::descriptor();
        dataset.fields.retain(|f| f.agol_field != "NORTHING");
        assert!(matches!(
            dataset.validate(),
            Err(DatasetError::MissingCoordinateField { .. })
        ));
    }

    #[test]
    fn test_soql_query_text() {
        let query = releases::descriptor().soql_query().unwrap();
        assert!(query.starts_with("SELECT Alt_Facility_Id__c,Release_Id__c,Project_Manager__r.Name,"));
        assert!(query.ends_with(" from Release__c WHERE LPST_List_Override__c = FALSE"));
        assert_eq!(facilities::descriptor().soql_query(), None);
    }

    #[test]
    fn test_by_key_matches_all() {
        for dataset in all() {
            assert_eq!(by_key(dataset.key).table_name, dataset.table_name);
        }
    }
}
