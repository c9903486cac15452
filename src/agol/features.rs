// src/agol/features.rs
//! Esri JSON for features and field definitions.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::datasets::{DatasetDescriptor, LayerKind};
use crate::fields::FieldKind;
use crate::spatial::{SpatialRow, SpatialTable};

pub const OBJECT_ID_FIELD: &str = "OBJECTID";
const TEXT_FIELD_LENGTH: u32 = 4000;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: &'static str,
    pub alias: String,
    pub nullable: bool,
    pub editable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
}

pub fn esri_field_type(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Integer => "esriFieldTypeInteger",
        FieldKind::Float => "esriFieldTypeDouble",
        FieldKind::Date => "esriFieldTypeDate",
        FieldKind::Text | FieldKind::Static | FieldKind::Composite => "esriFieldTypeString",
    }
}

/// Field list for a new layer, aliases included, object id first.
pub fn field_definitions(dataset: &DatasetDescriptor) -> Vec<FieldDefinition> {
    let object_id = FieldDefinition {
        name: OBJECT_ID_FIELD.to_string(),
        field_type: "esriFieldTypeOID",
        alias: OBJECT_ID_FIELD.to_string(),
        nullable: false,
        editable: false,
        length: None,
    };

    std::iter::once(object_id)
        .chain(dataset.fields.iter().map(|field| {
            let field_type = esri_field_type(field.kind);
            FieldDefinition {
                name: field.agol_field.clone(),
                field_type,
                alias: field.alias.clone(),
                nullable: true,
                editable: true,
                length: (field_type == "esriFieldTypeString").then_some(TEXT_FIELD_LENGTH),
            }
        }))
        .collect()
}

pub fn feature_json(row: &SpatialRow, wkid: Option<u32>) -> Value {
    let attributes: Map<String, Value> = row
        .attributes
        .iter()
        .map(|(name, value)| (name.clone(), value.to_json()))
        .collect();

    let mut feature = Map::new();
    feature.insert("attributes".to_string(), Value::Object(attributes));
    if let Some(point) = row.geometry {
        let mut geometry = json!({"x": point.x, "y": point.y});
        if let Some(wkid) = wkid {
            geometry["spatialReference"] = json!({ "wkid": wkid });
        }
        feature.insert("geometry".to_string(), geometry);
    }
    Value::Object(feature)
}

pub fn features_json(rows: &[SpatialRow], table: &SpatialTable) -> Value {
    let wkid = table.spatial_reference();
    Value::Array(rows.iter().map(|row| feature_json(row, wkid)).collect())
}

/// Definition passed to `addToDefinition` when publishing.
pub fn layer_definition(dataset: &DatasetDescriptor, wkid: u32) -> Value {
    let mut definition = json!({
        "id": 0,
        "name": dataset.table_name,
        "objectIdField": OBJECT_ID_FIELD,
        "fields": field_definitions(dataset),
        "capabilities": "Query",
        "hasM": false,
        "hasZ": false,
    });

    match dataset.kind {
        LayerKind::Layer(_) => {
            definition["type"] = json!("Feature Layer");
            definition["geometryType"] = json!("esriGeometryPoint");
            definition["extent"] = json!({
                "xmin": -12_700_000.0,
                "ymin": 4_400_000.0,
                "xmax": -12_100_000.0,
                "ymax": 5_200_000.0,
                "spatialReference": { "wkid": wkid },
            });
        }
        LayerKind::Table => {
            definition["type"] = json!("Table");
        }
    }

    let collection = if dataset.kind.is_layer() { "layers" } else { "tables" };
    let mut wrapper = Map::new();
    wrapper.insert(collection.to_string(), Value::Array(vec![definition]));
    Value::Object(wrapper)
}
