// src/datasets/releases.rs
use super::{DatasetDescriptor, DatasetKey, LayerKind, RecordSource};
use crate::fields::FieldConfig;

pub const API: &str = "Release__c";
pub const TABLE_NAME: &str = "pst_facility_releases";
pub const TITLE: &str = "Utah Petroleum Storage Tank Releases";
pub const QUERY: &str = "LPST_List_Override__c = FALSE";

pub fn descriptor() -> DatasetDescriptor {
    DatasetDescriptor {
        key: DatasetKey::Releases,
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
        FieldConfig::text("FACILITYID", "Alt_Facility_Id__c", "Facility ID"),
        FieldConfig::text("DERRID", "Release_Id__c", "DERR ID"),
        FieldConfig::text("PROJECTMAN", "Project_Manager__r.Name", "Project Manager").flattened(),
        FieldConfig::date("NOTIFICATI", "Notification_Date__c", "Notification Date"),
        FieldConfig::date("DATECLOSED", "Date_Closed__c", "Closure Date"),
        FieldConfig::text("CLOSURETYPE", "Closure_Type__c", "Closure Type"),
        FieldConfig::text("DEPTHGW", "Depth_to_Groundwater__c", "Depth to GW"),
        FieldConfig::text("GWFLOWDIR1", "Groundwater_Flow_Direction_1__c", "GW Flow Dir 1"),
        FieldConfig::text("GWFLOWDIR2", "Groundwater_Flow_Direction_2__c", "GW Flow Dir 2"),
        FieldConfig::text("PSTFUNDSTA", "PST_Eligibility__c", "PST Eligibility"),
        FieldConfig::integer("PSTFUNDPER", "EAP_Coverage_Percentage__c", "EAP Coverage %"),
        FieldConfig::integer("DEDUCTIBLE", "EAP_Deductible_Amount__c", "EAP Deductible"),
        FieldConfig::text("NFAFORM", "NFA_Form__c", "NFA Form"),
        FieldConfig::text("MAPLABEL", "MapLabel__c", "Map Label"),
        FieldConfig::text("BLUESTAKES", "Blue_Stakes__c", "Blue Stakes"),
        FieldConfig::text("ENVCOV", "Environmental_Covenant__c", "Environmental Covenant"),
        FieldConfig::text(
            "RESIDUALCONTAMMAP",
            "Residual_Contamination_Map__c",
            "Residual Contamination Map",
        ),
        FieldConfig::text("FEDREG", "Federally_Regulated__c", "Federally Regulated"),
    ]
}
