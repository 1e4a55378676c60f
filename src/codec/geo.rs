use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::Result;

/// GeoJSON feature used for geo-typed edges.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// GeoJSON object type, normally `"Feature"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Geometry payload.
    pub geometry: GeoGeometry,
    /// Free-form feature properties.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// GeoJSON geometry block.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoGeometry {
    /// Geometry type, e.g. `"Point"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Coordinates in GeoJSON order (longitude first).
    pub coordinates: Vec<f64>,
}

impl GeoPoint {
    /// Builds a point feature at the given longitude/latitude.
    pub fn point(longitude: f64, latitude: f64) -> Self {
        GeoPoint {
            kind: "Feature".to_owned(),
            geometry: GeoGeometry {
                kind: "Point".to_owned(),
                coordinates: vec![longitude, latitude],
            },
            properties: BTreeMap::new(),
        }
    }

    /// Attaches a feature property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Serializes the feature as embedded JSON text.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses embedded JSON text back into a feature.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
