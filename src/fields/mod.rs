// src/fields/mod.rs

pub mod field_config;
pub mod field_kind;
pub mod mapper;
pub mod value;

mod mapper_tests;

pub use field_config::{CompositeRule, FieldConfig, FieldConfigError};
pub use field_kind::FieldKind;
pub use mapper::map_records;
pub use value::{FieldValue, FlatRecord};
