// src/datasets/compartments.rs
use super::{DatasetDescriptor, DatasetKey, LayerKind, RecordSource};
use crate::fields::FieldConfig;

pub const API: &str = "Compartment__c";
pub const TABLE_NAME: &str = "pst_facility_compartments";
pub const TITLE: &str = "Utah Petroleum Storage Tank Compartments";
pub const QUERY: &str = "Compartment_Type__c  = 'Federally Regulated UST' OR Compartment_Type__c = 'State Regulated AST' OR Cert_of_Compliance_in_Force__c = TRUE";

pub fn descriptor() -> DatasetDescriptor {
    DatasetDescriptor {
        key: DatasetKey::Compartments,
        table_name: TABLE_NAME,
        title: TITLE,
        kind: LayerKind::Table,
        source: RecordSource::Soql {
            object: API,
            where_clause: Some(QUERY),
        },
        fields: fields(),
    }
}

// Tank details live on the parent Tank__c record.
fn fields() -> Vec<FieldConfig> {
    vec![
        FieldConfig::text("FACILITYID", "Alt_Facility_Id__c", "Facility ID"),
        FieldConfig::text("TANKID", "Tank__r.Name", "Tank ID").flattened(),
        FieldConfig::text("ALTCOMPARTID", "Alt_Compartment_Id__c", "Compartment ID"),
        FieldConfig::text("COMPTYPE", "Compartment_Type__c", "Compartment Type"),
        FieldConfig::text("TANKEMERGE", "Emergency_Gen__c", "Emergency Generator"),
        FieldConfig::text("TANKSTATUS", "Status__c", "Tank Status"),
        FieldConfig::integer("TANKCAPACI", "Compartment_Capacity_Gallons__c", "Tank Capacity"),
        FieldConfig::text("SUBSTANCED", "Substance__c", "Substance"),
        FieldConfig::text("SUBSTANCET", "Substance_Type__c", "Substance Type"),
        FieldConfig::text("TANKMATDES", "Tank__r.Tank_Material__c", "Tank Material").flattened(),
        FieldConfig::date("DATEINSTAL", "Tank__r.Date_Installed__c", "Date Installed").flattened(),
        FieldConfig::date(
            "DATECLOSE",
            "Tank__r.Date_Permanently_Closed__c",
            "Date Permanently Closed",
        )
        .flattened(),
        FieldConfig::text(
            "INCOMPLIAN",
            "Cert_of_Compliance_in_Force__c",
            "Cert. of Compliance in Force",
        ),
        FieldConfig::text("PST_FUND", "FR_Type__c", "Fr Type"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{map_records, FieldValue};
    use serde_json::json;

    #[test]
    fn test_tank_fields_come_from_parent_record() {
        let raw = json!({
            "Alt_Facility_Id__c": "4000123",
            "Tank__r": {
                "attributes": {"type": "Tank__c"},
                "Name": "T-2",
                "Tank_Material__c": "Steel",
                "Date_Installed__c": "1989-06-01",
                "Date_Permanently_Closed__c": null
            },
            "Compartment_Capacity_Gallons__c": 12000.0,
            "Cert_of_Compliance_in_Force__c": true
        });

        let record = &map_records(&[raw], &descriptor().fields)[0];

        assert_eq!(record["TANKID"], FieldValue::Text("T-2".to_string()));
        assert_eq!(record["TANKMATDES"], FieldValue::Text("Steel".to_string()));
        assert!(matches!(record["DATEINSTAL"], FieldValue::Date(_)));
        assert_eq!(record["DATECLOSE"], FieldValue::Null);
        assert_eq!(record["TANKCAPACI"], FieldValue::Integer(12000));
        assert_eq!(record["INCOMPLIAN"], FieldValue::Text("True".to_string()));
        assert_eq!(record.len(), descriptor().fields.len());
    }
}
