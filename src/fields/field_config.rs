// src/fields/field_config.rs
use serde::Serialize;
use thiserror::Error;

use super::field_kind::{parse_field_kind, FieldKind};

/// Rules for composite fields. Each composite target names its rule explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CompositeRule {
    /// `{FIELD}` placeholders filled from target fields mapped earlier in the
    /// same record, falling back to top-level source fields.
    Template(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldConfigError {
    #[error("Invalid field type: {0}")]
    InvalidKind(String),
    #[error("Field type 'static' must have a 'static_value'")]
    MissingStaticValue,
    #[error("Field type '{0}' cannot have a 'static_value'")]
    UnexpectedStaticValue(FieldKind),
    #[error("Field type 'composite' must have a 'composite_format'")]
    MissingCompositeRule,
    #[error("Field type '{0}' cannot have a 'composite_format'")]
    UnexpectedCompositeRule(FieldKind),
    #[error("Field '{0}' cannot be flattened without a dot")]
    FlattenWithoutDot(String),
    #[error("Field '{0}' has no Salesforce source field")]
    MissingSource(String),
}

/// Maps one Salesforce field onto one ArcGIS field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldConfig {
    pub agol_field: String,
    pub sf_field: Option<String>,
    pub alias: String,
    pub kind: FieldKind,
    pub static_value: Option<String>,
    pub composite: Option<CompositeRule>,
    /// Walk `sf_field` as a dotted path through related records.
    pub flatten: bool,
}

impl FieldConfig {
    /// Checked constructor for string-typed configuration.
    #[allow(dead_code)]
    pub fn new(
        agol_field: &str,
        sf_field: Option<&str>,
        alias: &str,
        field_type: &str,
        static_value: Option<&str>,
        composite: Option<CompositeRule>,
        flatten: bool,
    ) -> Result<Self, FieldConfigError> {
        let kind = parse_field_kind(field_type)
            .ok_or_else(|| FieldConfigError::InvalidKind(field_type.to_string()))?;
        let config = FieldConfig {
            agol_field: agol_field.to_string(),
            sf_field: sf_field.map(str::to_string),
            alias: alias.to_string(),
            kind,
            static_value: static_value.map(str::to_string),
            composite,
            flatten,
        };
        config.check()?;
        Ok(config)
    }

    fn basic(agol_field: &str, sf_field: &str, alias: &str, kind: FieldKind) -> Self {
        FieldConfig {
            agol_field: agol_field.to_string(),
            sf_field: Some(sf_field.to_string()),
            alias: alias.to_string(),
            kind,
            static_value: None,
            composite: None,
            flatten: false,
        }
    }

    pub fn text(agol_field: &str, sf_field: &str, alias: &str) -> Self {
        Self::basic(agol_field, sf_field, alias, FieldKind::Text)
    }

    pub fn integer(agol_field: &str, sf_field: &str, alias: &str) -> Self {
        Self::basic(agol_field, sf_field, alias, FieldKind::Integer)
    }

    #[allow(dead_code)]
    pub fn float(agol_field: &str, sf_field: &str, alias: &str) -> Self {
        Self::basic(agol_field, sf_field, alias, FieldKind::Float)
    }

    pub fn date(agol_field: &str, sf_field: &str, alias: &str) -> Self {
        Self::basic(agol_field, sf_field, alias, FieldKind::Date)
    }

    #[allow(dead_code)]
    pub fn fixed(agol_field: &str, alias: &str, value: &str) -> Self {
        FieldConfig {
            agol_field: agol_field.to_string(),
            sf_field: None,
            alias: alias.to_string(),
            kind: FieldKind::Static,
            static_value: Some(value.to_string()),
            composite: None,
            flatten: false,
        }
    }

    #[allow(dead_code)]
    pub fn composite(agol_field: &str, alias: &str, rule: CompositeRule) -> Self {
        FieldConfig {
            agol_field: agol_field.to_string(),
            sf_field: None,
            alias: alias.to_string(),
            kind: FieldKind::Composite,
            static_value: None,
            composite: Some(rule),
            flatten: false,
        }
    }

    /// Marks the source as a dotted path into a related record.
    pub fn flattened(mut self) -> Self {
        self.flatten = true;
        self
    }

    pub fn check(&self) -> Result<(), FieldConfigError> {
        match (self.kind, &self.static_value) {
            (FieldKind::Static, None) => return Err(FieldConfigError::MissingStaticValue),
            (kind, Some(_)) if kind != FieldKind::Static => {
                return Err(FieldConfigError::UnexpectedStaticValue(kind))
            }
            _ => {}
        }

        match (self.kind, &self.composite) {
            (FieldKind::Composite, None) => return Err(FieldConfigError::MissingCompositeRule),
            (kind, Some(_)) if kind != FieldKind::Composite => {
                return Err(FieldConfigError::UnexpectedCompositeRule(kind))
            }
            _ => {}
        }

        match self.sf_field.as_deref() {
            Some(path) if self.flatten && !path.contains('.') => {
                Err(FieldConfigError::FlattenWithoutDot(path.to_string()))
            }
            None if self.flatten => Err(FieldConfigError::FlattenWithoutDot(String::new())),
            None if !self.kind.is_derived() => {
                Err(FieldConfigError::MissingSource(self.agol_field.clone()))
            }
            _ => Ok(()),
        }
    }
}
