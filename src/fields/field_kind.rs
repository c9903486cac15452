// src/fields/field_kind.rs
use serde::{
    de::{self, Deserializer},
    Deserialize, Serialize,
};
use std::fmt;

/// How a source value is converted before it lands in the target field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Integer,
    Float,
    Date,
    Static,
    Composite,
}

impl FieldKind {
    #[allow(dead_code)]
    pub const ALL: [FieldKind; 6] = [
        FieldKind::Text,
        FieldKind::Integer,
        FieldKind::Float,
        FieldKind::Date,
        FieldKind::Static,
        FieldKind::Composite,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Date => "date",
            FieldKind::Static => "static",
            FieldKind::Composite => "composite",
        }
    }

    /// Kinds that read nothing from the source record.
    pub fn is_derived(&self) -> bool {
        matches!(self, FieldKind::Static | FieldKind::Composite)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_field_kind(&s).ok_or_else(|| de::Error::custom(format!("Invalid field type: {}", s)))
    }
}

pub fn parse_field_kind(s: &str) -> Option<FieldKind> {
    match s.trim() {
        "text" | "Text" | "string" | "String" => Some(FieldKind::Text),
        "integer" | "Integer" | "int" | "i64" => Some(FieldKind::Integer),
        "float" | "Float" | "double" | "f64" => Some(FieldKind::Float),
        "date" | "Date" | "datetime" => Some(FieldKind::Date),
        "static" | "Static" => Some(FieldKind::Static),
        "composite" | "Composite" => Some(FieldKind::Composite),
        _ => None,
    }
}
