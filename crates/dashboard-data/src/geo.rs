//! Point-geometry projection of customer and seller rows.

use dashboard_core::error::DashboardError;
use dashboard_core::geo::GeoPoint;
use dashboard_core::models::{
    CustomerOrderRecord, GeoFeature, Located, SellerOrderRecord, Timestamped,
};
use serde::Serialize;
use tracing::{debug, warn};

/// A row left off the map because a coordinate was missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRow {
    pub row_index: usize,
    pub entity: String,
}

impl RejectedRow {
    pub fn to_error(&self) -> DashboardError {
        DashboardError::MissingCoordinates {
            entity: self.entity.clone(),
            row_index: self.row_index,
        }
    }
}

/// Rows that could be placed on the map, plus the ones that could not.
#[derive(Debug, Clone, Serialize)]
pub struct GeoPointSet<T> {
    /// Source rows paired with their WGS 84 point, in input order.
    pub features: Vec<GeoFeature<T>>,
    /// Rows dropped for missing latitude or longitude.
    pub rejected: Vec<RejectedRow>,
}

impl<T> GeoPointSet<T> {
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Just the geometries, reprojected to Web Mercator.
    pub fn web_mercator_points(&self) -> Vec<GeoPoint> {
        self.features
            .iter()
            .map(|f| f.geometry.to_web_mercator())
            .collect()
    }
}

/// Project customer rows to points.
pub fn customer_geo_points(rows: &[CustomerOrderRecord]) -> GeoPointSet<CustomerOrderRecord> {
    project_points(rows)
}

/// Project seller rows to points.
pub fn seller_geo_points(rows: &[SellerOrderRecord]) -> GeoPointSet<SellerOrderRecord> {
    project_points(rows)
}

/// Pair every row with a `(lng, lat)` point; rows lacking either coordinate
/// are dropped and reported rather than projected.
fn project_points<T>(rows: &[T]) -> GeoPointSet<T>
where
    T: Located + Timestamped + Clone,
{
    let mut features = Vec::with_capacity(rows.len());
    let mut rejected = Vec::new();

    for row in rows {
        match (row.longitude(), row.latitude()) {
            (Some(lng), Some(lat)) => features.push(GeoFeature {
                record: row.clone(),
                geometry: GeoPoint::from_lng_lat(lng, lat),
            }),
            _ => {
                let miss = RejectedRow {
                    row_index: row.row_index(),
                    entity: row.entity_label(),
                };
                debug!("{}", miss.to_error());
                rejected.push(miss);
            }
        }
    }

    if !rejected.is_empty() {
        warn!(
            "Dropped {} of {} rows without coordinates",
            rejected.len(),
            rows.len()
        );
    }

    GeoPointSet { features, rejected }
}
