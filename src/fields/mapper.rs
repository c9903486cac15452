// src/fields/mapper.rs
//! Turns nested Salesforce records into flat rows.
//!
//! Every configured target field is present in the output. A value that cannot
//! be resolved or converted becomes `FieldValue::Null`; one bad field never
//! drops the record.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use tracing::trace;

use super::field_config::{CompositeRule, FieldConfig};
use super::field_kind::FieldKind;
use super::value::{FieldValue, FlatRecord};

const SALESFORCE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

pub fn map_records(raw_records: &[Value], configs: &[FieldConfig]) -> Vec<FlatRecord> {
    raw_records
        .iter()
        .map(|raw| map_record(raw, configs))
        .collect()
}

pub fn map_record(raw: &Value, configs: &[FieldConfig]) -> FlatRecord {
    let mut record = FlatRecord::with_capacity(configs.len());

    for config in configs {
        let value = match config.kind {
            FieldKind::Static => config
                .static_value
                .clone()
                .map(FieldValue::Text)
                .unwrap_or_default(),
            FieldKind::Composite => match &config.composite {
                Some(rule) => apply_composite(rule, &record, raw),
                None => FieldValue::Null,
            },
            kind => {
                let source = resolve_source(raw, config);
                let converted = convert(kind, source);
                if converted.is_null() {
                    if let Some(source) = source.filter(|v| !v.is_null()) {
                        trace!(
                            "{}: could not convert {} to {}; storing null",
                            config.agol_field,
                            source,
                            kind
                        );
                    }
                }
                converted
            }
        };
        record.insert(config.agol_field.clone(), value);
    }

    record
}

/// Finds the source value for a config. Flattened paths walk related records
/// and give `None` as soon as a segment is missing or not an object.
pub fn resolve_source<'a>(raw: &'a Value, config: &FieldConfig) -> Option<&'a Value> {
    let path = config.sf_field.as_deref()?;
    if config.flatten {
        flatten(raw, path)
    } else {
        raw.get(path)
    }
}

pub fn flatten<'a>(raw: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(raw, |current, segment| current.as_object()?.get(segment))
}

pub fn convert(kind: FieldKind, source: Option<&Value>) -> FieldValue {
    let Some(value) = source.filter(|v| !v.is_null()) else {
        return FieldValue::Null;
    };
    let converted = match kind {
        FieldKind::Text => Some(FieldValue::Text(to_text(value))),
        FieldKind::Integer => to_integer(value).map(FieldValue::Integer),
        FieldKind::Float => to_float(value).map(FieldValue::Float),
        FieldKind::Date => to_date(value).map(FieldValue::Date),
        FieldKind::Static | FieldKind::Composite => None,
    };
    converted.unwrap_or_default()
}

pub fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        // existing layers hold the capitalised spelling
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        other => other.to_string(),
    }
}

pub fn to_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| truncate(n.as_f64()?)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| truncate(s.parse::<f64>().ok()?))
        }
        _ => None,
    }
}

fn truncate(f: f64) -> Option<i64> {
    if f.is_finite() && f.abs() < i64::MAX as f64 {
        Some(f.trunc() as i64)
    } else {
        None
    }
}

pub fn to_float(value: &Value) -> Option<f64> {
    let f = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    f.is_finite().then_some(f)
}

pub fn to_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_date(s.trim()),
        Value::Number(n) => DateTime::from_timestamp_millis(n.as_i64()?),
        _ => None,
    }
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, SALESFORCE_DATETIME_FORMAT) {
        return Some(dt.with_timezone(&Utc));
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn apply_composite(rule: &CompositeRule, mapped: &FlatRecord, raw: &Value) -> FieldValue {
    match rule {
        CompositeRule::Template(template) => render_template(template, mapped, raw)
            .map(FieldValue::Text)
            .unwrap_or_default(),
    }
}

/// Fills `{NAME}` placeholders; `{{` and `}}` escape braces. `None` when a
/// placeholder is unknown or unterminated.
pub fn render_template(template: &str, mapped: &FlatRecord, raw: &Value) -> Option<String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => return None,
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next()? {
                        '}' => break,
                        ch => name.push(ch),
                    }
                }
                if let Some(value) = mapped.get(&name) {
                    out.push_str(&value.to_string());
                } else {
                    match raw.get(&name)? {
                        Value::Null => {}
                        other => out.push_str(&to_text(other)),
                    }
                }
            }
            ch => out.push(ch),
        }
    }

    Some(out)
}
