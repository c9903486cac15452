// src/datasets/tanks.rs
use super::{DatasetDescriptor, DatasetKey, LayerKind, RecordSource};
use crate::fields::FieldConfig;

pub const API: &str = "Tank__c";
pub const TABLE_NAME: &str = "pst_facility_tanks";
pub const TITLE: &str = "Utah Petroleum Storage Tanks";
pub const QUERY: &str = "Tank_Type__c = 'Federally Regulated UST' OR Tank_Type__c = 'State Regulated AST' OR Cert_of_Compliance_in_Force__c = TRUE";

pub fn descriptor() -> DatasetDescriptor {
    DatasetDescriptor {
        key: DatasetKey::Tanks,
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

fn fields() -> Vec<FieldConfig> {
    vec![
        FieldConfig::text("FACILITYID", "Alt_Facility_ID__c", "Facility ID"),
        FieldConfig::text("TANKID", "Name", "Tank Number"),
        FieldConfig::text("ALTTANKID", "Alt_Tank_Id__c", "Tank ID"),
        FieldConfig::text("TANKTYPE", "Tank_Type__c", "Tank Type"),
        FieldConfig::text("TANKEMERGE", "Emergency_Gen__c", "Emergency Generator"),
        FieldConfig::text("TANKSTATUS", "Status__c", "Tank Status"),
        FieldConfig::integer("TANKCAPACI", "Tank_Capacity__c", "Tank Capacity"),
        FieldConfig::text("SUBSTANCED", "Substance__c", "Substance"),
        FieldConfig::text("SUBSTANCET", "Substance_Type__c", "Substance Type"),
        FieldConfig::text("TANKMATDES", "Tank_Material__c", "Tank Material"),
        FieldConfig::date("DATEINSTAL", "Date_Installed__c", "Date Installed"),
        FieldConfig::date("DATECLOSE", "Date_Permanently_Closed__c", "Date Permanently Closed"),
        FieldConfig::text(
            "INCOMPLIAN",
            "Cert_of_Compliance_in_Force__c",
            "Cert. of Compliance in Force",
        ),
        FieldConfig::text("PST_FUND", "FR_Type__c", "Fr Type"),
    ]
}
