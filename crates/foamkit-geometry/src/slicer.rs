//! Single-layer extraction from a stacked layout.
//!
//! Slicing is independent of the lock state: any stored layout model can be
//! reduced to one layer for isolated export.

use crate::model::{CornerStyle, Layer, LayoutModel};
use foamkit_core::GeometryError;

/// Chamfer size assumed when a layer requests a chamfer but none was stored.
pub const DEFAULT_LAYER_CHAMFER_IN: f64 = 1.0;

/// Reduce a layout model to the single layer at `index` (zero-based).
///
/// The result's `stack` holds exactly that layer and the flattened
/// `cavities` list mirrors it for single-layer consumers.
pub fn slice_layer(model: &LayoutModel, index: usize) -> Result<LayoutModel, GeometryError> {
    let layer = model
        .stack
        .get(index)
        .ok_or(GeometryError::LayerNotFound {
            index,
            layer_count: model.stack.len(),
        })?
        .clone();
    Ok(LayoutModel::new(model.block.clone(), vec![layer]))
}

/// Effective corner treatment of one layer.
///
/// A layer may override the block's corner style; absent an override it
/// inherits the block. A chamfer request without a stored size falls back
/// to [`DEFAULT_LAYER_CHAMFER_IN`].
pub fn layer_corner_treatment(model: &LayoutModel, layer: &Layer) -> (CornerStyle, Option<f64>) {
    let chamfered = match layer.chamfered {
        Some(flag) => flag,
        None => model.block.corner_style == CornerStyle::Chamfer,
    };
    if !chamfered {
        return (CornerStyle::Square, None);
    }
    let size = layer
        .chamfer_in
        .or(model.block.chamfer_in)
        .unwrap_or(DEFAULT_LAYER_CHAMFER_IN);
    (CornerStyle::Chamfer, Some(size))
}
