// src/spatial/mod.rs
//! Builds the table handed to the loader. Feature layers are filtered to the
//! configured coordinate extent here, once, and get a Web Mercator point.

pub mod projection;

use serde::Serialize;
use tracing::{debug, info};

use crate::datasets::{DatasetDescriptor, LayerKind, PointSource};
use crate::fields::FlatRecord;
pub use projection::Point;

/// Inclusive Northing/Easting extent, in UTM metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoordinateBounds {
    pub min_northing: f64,
    pub max_northing: f64,
    pub min_easting: f64,
    pub max_easting: f64,
}

impl CoordinateBounds {
    pub fn contains(&self, northing: f64, easting: f64) -> bool {
        (self.min_northing..=self.max_northing).contains(&northing)
            && (self.min_easting..=self.max_easting).contains(&easting)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpatialRow {
    pub attributes: FlatRecord,
    pub geometry: Option<Point>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpatialTable {
    pub kind: LayerKind,
    pub rows: Vec<SpatialRow>,
    /// Records removed by the coordinate filter.
    pub dropped: usize,
}

impl SpatialTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn spatial_reference(&self) -> Option<u32> {
        self.kind
            .is_layer()
            .then_some(projection::WEB_MERCATOR_LATEST_WKID)
    }
}

/// Keeps records whose Northing and Easting are both present and in bounds.
pub fn filter_by_bounds(records: Vec<FlatRecord>, point: &PointSource) -> Vec<FlatRecord> {
    records
        .into_iter()
        .filter(|record| coordinates(record, point).is_some())
        .collect()
}

fn coordinates(record: &FlatRecord, point: &PointSource) -> Option<(f64, f64)> {
    let northing = record.get(point.northing_field)?.as_f64()?;
    let easting = record.get(point.easting_field)?.as_f64()?;
    point
        .bounds
        .contains(northing, easting)
        .then_some((northing, easting))
}

pub fn assemble(dataset: &DatasetDescriptor, records: Vec<FlatRecord>) -> SpatialTable {
    let total = records.len();
    let rows: Vec<SpatialRow> = match &dataset.kind {
        LayerKind::Table => records
            .into_iter()
            .map(|attributes| SpatialRow {
                attributes,
                geometry: None,
            })
            .collect(),
        LayerKind::Layer(point) => {
            debug!("{}: filtering records with invalid coordinates", dataset.key);
            filter_by_bounds(records, point)
                .into_iter()
                .filter_map(|attributes| {
                    let (northing, easting) = coordinates(&attributes, point)?;
                    Some(SpatialRow {
                        geometry: Some(projection::utm12n_to_web_mercator(easting, northing)),
                        attributes,
                    })
                })
                .collect()
        }
    };

    let dropped = total - rows.len();
    if dropped > 0 {
        info!(
            "{}: dropped {} of {} records outside the coordinate bounds",
            dataset.key, dropped, total
        );
    }

    SpatialTable {
        kind: dataset.kind,
        rows,
        dropped,
    }
}
