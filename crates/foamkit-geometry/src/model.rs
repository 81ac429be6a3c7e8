//! Canonical layout model.
//!
//! The persisted, editor-facing description of a foam block and its
//! cavities, possibly stacked across layers. Wire format is camelCase JSON;
//! the cavity shape is a tagged union resolved by exhaustive matching in the
//! classifier and the export pipeline.
//!
//! `stack` is the authoritative multi-layer representation. The flattened
//! `cavities` list exists for single-layer consumers and is always derived
//! from `stack[0]`.

use crate::loops::Point;
use serde::{Deserialize, Serialize};

/// Corner treatment of the block outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CornerStyle {
    Square,
    Chamfer,
}

impl Default for CornerStyle {
    fn default() -> Self {
        Self::Square
    }
}

/// The outer material boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub length_in: f64,
    pub width_in: f64,
    pub thickness_in: f64,
    pub corner_style: CornerStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chamfer_in: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_corners: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_radius_in: Option<f64>,
}

/// Shape-specific payload of a cavity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum CavityShape {
    Rect {
        #[serde(rename = "lengthIn")]
        length_in: f64,
        #[serde(rename = "widthIn")]
        width_in: f64,
    },
    Circle {
        #[serde(rename = "diameterIn")]
        diameter_in: f64,
    },
    Poly {
        points: Vec<Point>,
    },
}

/// An island found inside a cavity, kept as its raw normalized outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedCavity {
    pub points: Vec<Point>,
}

/// A cavity cut into the block.
///
/// Position `(x, y)` is normalized to the unit square with top-left origin:
/// the top-left corner for rects and polys, the center for circles. Owned
/// exclusively by the layout model that contains it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cavity {
    pub id: String,
    #[serde(flatten)]
    pub shape: CavityShape,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nested_cavities: Vec<NestedCavity>,
}

/// One layer of a stacked layout. Layer 1 is the base; increasing index
/// goes upward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: String,
    pub label: String,
    pub thickness_in: f64,
    pub cavities: Vec<Cavity>,
    /// Per-layer corner override; `None` inherits the block treatment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chamfered: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chamfer_in: Option<f64>,
}

/// The canonical layout of a block and its cavities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutModel {
    pub block: Block,
    /// Flattened view of `stack[0]` for single-layer consumers.
    pub cavities: Vec<Cavity>,
    pub stack: Vec<Layer>,
}

impl LayoutModel {
    /// Assemble a model from a block and its layer stack, deriving the
    /// flattened cavity list from the base layer.
    pub fn new(block: Block, stack: Vec<Layer>) -> Self {
        let cavities = stack
            .first()
            .map(|layer| layer.cavities.clone())
            .unwrap_or_default();
        Self {
            block,
            cavities,
            stack,
        }
    }

    /// Safe default returned when the outer loop is empty or unusable:
    /// a 1" cube with no cavities.
    pub fn fallback() -> Self {
        let block = Block {
            length_in: 1.0,
            width_in: 1.0,
            thickness_in: 1.0,
            corner_style: CornerStyle::Square,
            chamfer_in: None,
            round_corners: None,
            round_radius_in: None,
        };
        let layer = Layer {
            id: "L1".to_string(),
            label: "Layer 1".to_string(),
            thickness_in: block.thickness_in,
            cavities: Vec::new(),
            chamfered: None,
            chamfer_in: None,
        };
        Self::new(block, vec![layer])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_cavity() -> Cavity {
        Cavity {
            id: "C1".to_string(),
            shape: CavityShape::Rect {
                length_in: 2.0,
                width_in: 1.0,
            },
            x: 0.25,
            y: 0.125,
            nested_cavities: Vec::new(),
        }
    }

    #[test]
    fn test_cavity_wire_format() {
        let json = serde_json::to_value(sample_cavity()).unwrap();
        assert_eq!(json["shape"], "rect");
        assert_eq!(json["lengthIn"], 2.0);
        assert_eq!(json["widthIn"], 1.0);
        assert_eq!(json["x"], 0.25);
        assert!(json.get("nestedCavities").is_none());

        let back: Cavity = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample_cavity());
    }

    #[test]
    fn test_circle_and_poly_tags() {
        let circle = Cavity {
            id: "C2".to_string(),
            shape: CavityShape::Circle { diameter_in: 1.5 },
            x: 0.5,
            y: 0.5,
            nested_cavities: Vec::new(),
        };
        let json = serde_json::to_value(&circle).unwrap();
        assert_eq!(json["shape"], "circle");
        assert_eq!(json["diameterIn"], 1.5);

        let poly = Cavity {
            id: "C3".to_string(),
            shape: CavityShape::Poly {
                points: vec![Point::new(0.0, 0.0), Point::new(0.1, 0.0), Point::new(0.1, 0.1)],
            },
            x: 0.0,
            y: 0.0,
            nested_cavities: Vec::new(),
        };
        let json = serde_json::to_value(&poly).unwrap();
        assert_eq!(json["shape"], "poly");
        assert_eq!(json["points"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_flattened_cavities_follow_base_layer() {
        let block = LayoutModel::fallback().block;
        let layer = Layer {
            id: "L1".to_string(),
            label: "Layer 1".to_string(),
            thickness_in: 2.0,
            cavities: vec![sample_cavity()],
            chamfered: None,
            chamfer_in: None,
        };
        let model = LayoutModel::new(block, vec![layer]);
        assert_eq!(model.cavities, model.stack[0].cavities);
    }

    #[test]
    fn test_fallback_is_unit_block() {
        let model = LayoutModel::fallback();
        assert_eq!(model.block.length_in, 1.0);
        assert_eq!(model.stack.len(), 1);
        assert!(model.cavities.is_empty());
    }
}
