// src/datasets/facilities.rs
use super::{DatasetDescriptor, DatasetKey, LayerKind, PointSource, RecordSource};
use crate::fields::FieldConfig;
use crate::spatial::CoordinateBounds;

pub const API: &str = "services/apexrest/facilities";
pub const TABLE_NAME: &str = "pst_facilities";
pub const TITLE: &str = "Utah Petroleum Storage Tanks Facilities";

/// UTM 12N extent that covers Utah; anything outside is a data-entry error.
pub const BOUNDS: CoordinateBounds = CoordinateBounds {
    min_northing: 4_000_000.0,
    max_northing: 4_800_000.0,
    min_easting: 150_000.0,
    max_easting: 750_000.0,
};

pub fn descriptor() -> DatasetDescriptor {
    DatasetDescriptor {
        key: DatasetKey::Facilities,
        table_name: TABLE_NAME,
        title: TITLE,
        kind: LayerKind::Layer(PointSource {
            easting_field: "EASTING",
            northing_field: "NORTHING",
            bounds: BOUNDS,
        }),
        source: RecordSource::Apex { path: API },
        fields: fields(),
    }
}

fn fields() -> Vec<FieldConfig> {
    vec![
        FieldConfig::text("FACILITYID", "Id", "Facility ID"),
        FieldConfig::integer("NORTHING", "UTMNorthing", "UTM Northing"),
        FieldConfig::integer("EASTING", "UTMEasting", "UTM Easting"),
        FieldConfig::text("TANK", "Tank", "Tank"),
        FieldConfig::text("SITEDESC", "SiteDesc", "Site Description"),
        FieldConfig::text("RELEASE", "Release", "Has a Release"),
        FieldConfig::text("REGAST", "REGAST", "Has State Regulated AST(s)"),
        FieldConfig::text("LOCSTR", "PhysicalAddressStreet", "Location Address"),
        FieldConfig::text("LOCSTATE", "PhysicalAddressStateCode", "Location State"),
        FieldConfig::text("LOCZIP", "PhysicalAddressPostalCode", "Location Zip"),
        FieldConfig::text("LOCCITY", "PhysicalAddressCity", "Location City"),
        FieldConfig::text("LOCCOUNTY", "FLCounty", "Location County"),
        FieldConfig::text("OPENTANK", "OpenTank", "Has an Open Tank"),
        FieldConfig::text("OPENRELEASE", "OpenRelease", "Has an Open Release"),
        FieldConfig::text("OPENREGAST", "OpenREGAST", "Has an Open Regulated AST"),
        FieldConfig::text("MAPLABEL", "MapLabel", "Map Label"),
        FieldConfig::text("HEALTHDIST", "HealthDistrict", "Health District"),
        FieldConfig::text("LOCNAME", "FacilityName", "Location Name"),
        FieldConfig::text("FACILITYDE", "FacilityDescription", "Type of Facility"),
        FieldConfig::text("DERRID", "AltFacilityID", "Alt Facility ID"),
        FieldConfig::text("OWNERADDRESS", "AccountShippingStreet", "Owner Address"),
        FieldConfig::text("OWNERSTATE", "AccountShippingState", "Owner State"),
        FieldConfig::text("OWNERZIP", "AccountShippingPostalCode", "Owner Postal Code"),
        FieldConfig::text("OWNERCITY", "AccountShippingCity", "Owner City"),
        FieldConfig::text("OWNERNAME", "AccountName", "Owner Name"),
    ]
}
