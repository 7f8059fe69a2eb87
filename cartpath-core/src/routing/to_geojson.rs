use geo::{LineString, Point};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

use super::assembler::{NavigationStep, OptimizedRoute};
use crate::Error;

impl OptimizedRoute {
    /// Converts the route to a `GeoJSON` `FeatureCollection`
    ///
    /// The stitched path becomes a `route` LineString feature (omitted when it
    /// has fewer than two points), followed by one Point feature per step.
    pub fn to_geojson(&self) -> Result<FeatureCollection, Error> {
        let mut features = Vec::with_capacity(self.steps.len() + 1);

        if self.path.len() >= 2 {
            features.push(self.path_feature()?);
        }

        for (idx, step) in self.steps.iter().enumerate() {
            features.push(step_feature(idx, step)?);
        }

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    pub fn to_geojson_string(&self) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson()?).map_err(|e| Error::GeoJsonError(e.to_string()))
    }

    fn path_feature(&self) -> Result<Feature, Error> {
        let line = LineString::new(self.path.clone());
        let geometry = Geometry::new(GeoJsonValue::from(&line));

        let value = json!({
            "type": "Feature",
            "geometry": geometry,
            "properties": {
                "feature_type": "route",
                "total_distance": self.total_distance,
                "total_time": self.total_time,
                "steps": self.steps.len(),
            }
        });

        Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

fn step_feature(idx: usize, step: &NavigationStep) -> Result<Feature, Error> {
    let geometry = Geometry::new(GeoJsonValue::from(&Point::new(step.x, step.y)));

    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "feature_type": "step",
            "order": idx,
            "section_id": step.section_id,
            "section_name": step.section_name,
            "items": step.items,
            "estimated_time": step.estimated_time,
            "crowd_level": step.crowd_level,
            "distance": step.distance,
            "instructions": step.instructions,
        }
    });

    Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}
