//! ISO-10303-21 (STEP) writer.
//!
//! Emits an AP203-flavored subset: each layer's block outline and cavities
//! become planar profiles (POLYLINE / CIRCLE over CARTESIAN_POINT,
//! DIRECTION, AXIS2_PLACEMENT_3D) extruded through the layer thickness with
//! EXTRUDED_AREA_SOLID. Downstream CAM tooling consumes the profiles and
//! depths; full B-rep topology is out of scope.
//!
//! Output is deterministic: entity ids are assigned in emission order and
//! the header timestamp is fixed, so the same layout model always produces
//! byte-identical STEP text.

use foamkit_core::ExportError;
use foamkit_geometry::{
    layer_corner_treatment, slice_layer, Cavity, CavityShape, CornerStyle, Layer, LayoutModel,
};
use std::fmt::Write;

/// Fixed FILE_NAME timestamp; a wall-clock stamp would break reproducibility
/// of the geometry-bound artifact.
const FILE_TIMESTAMP: &str = "2000-01-01T00:00:00";

/// Render a layout model to STEP text.
pub fn render_step(model: &LayoutModel) -> Result<String, ExportError> {
    render(model, None, true)
}

/// Render a layout model to STEP text with the geometry hash carried in the
/// FILE_DESCRIPTION header record.
pub fn render_step_with_hash(model: &LayoutModel, hash: &str) -> Result<String, ExportError> {
    render(model, Some(hash), true)
}

/// Slice out the layer at `index` and render it alone.
pub fn render_layer_step(model: &LayoutModel, index: usize) -> Result<String, ExportError> {
    let sliced = slice_layer(model, index)?;
    render(&sliced, None, true)
}

/// Render the whole block with cavities omitted.
pub fn render_simple_step(model: &LayoutModel) -> Result<String, ExportError> {
    render(model, None, false)
}

/// Filename for a single-layer export, zero-based layer index.
pub fn layer_step_filename(quote_no: &str, index: usize) -> String {
    format!("{}-layer-{}.step", quote_no, index)
}

/// Filename for the simplified whole-block export.
pub fn simple_step_filename(quote_no: &str) -> String {
    format!("{}-simple.step", quote_no)
}

fn render(model: &LayoutModel, hash: Option<&str>, with_cavities: bool) -> Result<String, ExportError> {
    let b = &model.block;
    if !(b.length_in > 0.0 && b.width_in > 0.0 && b.thickness_in > 0.0)
        || !b.length_in.is_finite()
        || !b.width_in.is_finite()
    {
        return Err(ExportError::EmptyModel {
            reason: format!(
                "degenerate block {} x {} x {}",
                b.length_in, b.width_in, b.thickness_in
            ),
        });
    }
    if model.stack.is_empty() {
        return Err(ExportError::EmptyModel {
            reason: "layout has no layers".to_string(),
        });
    }

    let mut w = EntityWriter::new();
    let mut z0 = 0.0;
    for layer in &model.stack {
        write_layer(&mut w, model, layer, z0, with_cavities);
        z0 += layer.thickness_in;
    }

    let mut out = String::new();
    let _ = writeln!(out, "ISO-10303-21;");
    let _ = writeln!(out, "HEADER;");
    match hash {
        Some(hash) => {
            let _ = writeln!(
                out,
                "FILE_DESCRIPTION(('foam layout', 'geometry-hash: {}'), '2;1');",
                hash
            );
        }
        None => {
            let _ = writeln!(out, "FILE_DESCRIPTION(('foam layout'), '2;1');");
        }
    }
    let _ = writeln!(
        out,
        "FILE_NAME('layout.step', '{}', (''), (''), 'foamkit', '', '');",
        FILE_TIMESTAMP
    );
    let _ = writeln!(out, "FILE_SCHEMA(('CONFIG_CONTROL_DESIGN'));");
    let _ = writeln!(out, "ENDSEC;");
    let _ = writeln!(out, "DATA;");
    out.push_str(&w.out);
    let _ = writeln!(out, "ENDSEC;");
    let _ = writeln!(out, "END-ISO-10303-21;");
    Ok(out)
}

fn write_layer(w: &mut EntityWriter, model: &LayoutModel, layer: &Layer, z0: f64, with_cavities: bool) {
    let b = &model.block;
    let (l, wd) = (b.length_in, b.width_in);
    let outline: Vec<(f64, f64)> = match layer_corner_treatment(model, layer) {
        (CornerStyle::Chamfer, size) => {
            let c = size.unwrap_or(0.0).min(l / 2.0).min(wd / 2.0);
            vec![
                (c, 0.0),
                (l - c, 0.0),
                (l, c),
                (l, wd - c),
                (l - c, wd),
                (c, wd),
                (0.0, wd - c),
                (0.0, c),
            ]
        }
        (CornerStyle::Square, _) => vec![(0.0, 0.0), (l, 0.0), (l, wd), (0.0, wd)],
    };
    write_prism(w, &layer.id, &outline, z0, layer.thickness_in);

    if with_cavities {
        for cavity in &layer.cavities {
            write_cavity(w, cavity, model, z0, layer.thickness_in);
        }
    }
}

fn write_cavity(w: &mut EntityWriter, cavity: &Cavity, model: &LayoutModel, z0: f64, depth: f64) {
    let (l, wd) = (model.block.length_in, model.block.width_in);
    match &cavity.shape {
        CavityShape::Rect { length_in, width_in } => {
            // Normalized (x, y) is the top-left corner; STEP is y-up.
            let x0 = cavity.x * l;
            let y1 = (1.0 - cavity.y) * wd;
            let y0 = y1 - width_in;
            write_prism(
                w,
                &cavity.id,
                &[(x0, y0), (x0 + length_in, y0), (x0 + length_in, y1), (x0, y1)],
                z0,
                depth,
            );
        }
        CavityShape::Circle { diameter_in } => {
            let place = w.placement(cavity.x * l, (1.0 - cavity.y) * wd, z0);
            let circle = w.push(&format!(
                "CIRCLE('{}', #{}, {})",
                cavity.id,
                place,
                real(diameter_in / 2.0)
            ));
            w.extrude(&cavity.id, circle, place, depth);
        }
        CavityShape::Poly { points } => {
            let pts: Vec<(f64, f64)> =
                points.iter().map(|p| (p.x * l, (1.0 - p.y) * wd)).collect();
            write_prism(w, &cavity.id, &pts, z0, depth);
        }
    }
    for nested in &cavity.nested_cavities {
        let pts: Vec<(f64, f64)> = nested
            .points
            .iter()
            .map(|p| (p.x * l, (1.0 - p.y) * wd))
            .collect();
        write_prism(w, &format!("{}-island", cavity.id), &pts, z0, depth);
    }
}

/// A closed planar profile extruded through `height` starting at `z0`.
///
/// An empty outline is skipped: a stored model may carry a poly cavity or
/// island with no points, and the solid export degrades rather than fail.
fn write_prism(w: &mut EntityWriter, name: &str, pts: &[(f64, f64)], z0: f64, height: f64) {
    if pts.is_empty() {
        return;
    }
    let ids: Vec<u64> = pts
        .iter()
        .map(|(x, y)| {
            w.push(&format!(
                "CARTESIAN_POINT('', ({}, {}, {}))",
                real(*x),
                real(*y),
                real(z0)
            ))
        })
        .collect();
    let mut refs: Vec<String> = ids.iter().map(|id| format!("#{}", id)).collect();
    // Repeat the first point to close the profile.
    refs.push(format!("#{}", ids[0]));
    let poly = w.push(&format!("POLYLINE('{}', ({}))", name, refs.join(", ")));
    let place = w.placement(0.0, 0.0, z0);
    w.extrude(name, poly, place, height);
}

/// STEP reals always carry a decimal point.
fn real(v: f64) -> String {
    let v = if v == 0.0 { 0.0 } else { v };
    format!("{:.6}", v)
}

struct EntityWriter {
    out: String,
    next_id: u64,
}

impl EntityWriter {
    fn new() -> Self {
        EntityWriter {
            out: String::new(),
            next_id: 1,
        }
    }

    fn push(&mut self, body: &str) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let _ = writeln!(self.out, "#{} = {};", id, body);
        id
    }

    /// z-up placement located at (x, y, z).
    fn placement(&mut self, x: f64, y: f64, z: f64) -> u64 {
        let loc = self.push(&format!(
            "CARTESIAN_POINT('', ({}, {}, {}))",
            real(x),
            real(y),
            real(z)
        ));
        let axis = self.push("DIRECTION('', (0.000000, 0.000000, 1.000000))");
        let refd = self.push("DIRECTION('', (1.000000, 0.000000, 0.000000))");
        self.push(&format!("AXIS2_PLACEMENT_3D('', #{}, #{}, #{})", loc, axis, refd))
    }

    fn extrude(&mut self, name: &str, profile: u64, place: u64, depth: f64) -> u64 {
        let dir = self.push("DIRECTION('', (0.000000, 0.000000, 1.000000))");
        self.push(&format!(
            "EXTRUDED_AREA_SOLID('{}', #{}, #{}, #{}, {})",
            name,
            profile,
            place,
            dir,
            real(depth)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foamkit_core::GeometryError;
    use foamkit_geometry::Block;

    fn sample_model() -> LayoutModel {
        let block = Block {
            length_in: 10.0,
            width_in: 8.0,
            thickness_in: 2.0,
            corner_style: CornerStyle::Square,
            chamfer_in: None,
            round_corners: None,
            round_radius_in: None,
        };
        let cavities = vec![
            Cavity {
                id: "C1".to_string(),
                shape: CavityShape::Rect {
                    length_in: 2.0,
                    width_in: 1.0,
                },
                x: 0.2,
                y: 0.25,
                nested_cavities: Vec::new(),
            },
            Cavity {
                id: "C2".to_string(),
                shape: CavityShape::Circle { diameter_in: 1.5 },
                x: 0.5,
                y: 0.5,
                nested_cavities: Vec::new(),
            },
        ];
        let layer = Layer {
            id: "L1".to_string(),
            label: "Layer 1".to_string(),
            thickness_in: 2.0,
            cavities,
            chamfered: None,
            chamfer_in: None,
        };
        LayoutModel::new(block, vec![layer])
    }

    #[test]
    fn test_step_structure() {
        let step = render_step(&sample_model()).unwrap();
        assert!(step.starts_with("ISO-10303-21;\nHEADER;\n"));
        assert!(step.contains("FILE_SCHEMA(('CONFIG_CONTROL_DESIGN'));"));
        assert!(step.contains("#1 = CARTESIAN_POINT('', (0.000000, 0.000000, 0.000000));"));
        assert!(step.contains("POLYLINE('L1'"));
        assert!(step.contains("CIRCLE('C2'"));
        assert!(step.contains("EXTRUDED_AREA_SOLID('C1'"));
        assert!(step.trim_end().ends_with("END-ISO-10303-21;"));
    }

    #[test]
    fn test_step_deterministic() {
        let a = render_step(&sample_model()).unwrap();
        let b = render_step(&sample_model()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_hash_in_file_description() {
        let step = render_step_with_hash(&sample_model(), "cafe01").unwrap();
        assert!(step.contains("FILE_DESCRIPTION(('foam layout', 'geometry-hash: cafe01'), '2;1');"));
        let plain = render_step(&sample_model()).unwrap();
        assert!(!plain.contains("geometry-hash"));
    }

    #[test]
    fn test_degenerate_block_rejected() {
        let mut model = sample_model();
        model.block.length_in = 0.0;
        match render_step(&model) {
            Err(ExportError::EmptyModel { .. }) => {}
            other => panic!("expected EmptyModel, got {:?}", other),
        }
    }

    #[test]
    fn test_layer_step_out_of_range() {
        let err = render_layer_step(&sample_model(), 3).unwrap_err();
        assert_eq!(
            err,
            ExportError::Geometry(GeometryError::LayerNotFound {
                index: 3,
                layer_count: 1
            })
        );
    }

    #[test]
    fn test_empty_poly_outline_skipped() {
        use foamkit_geometry::NestedCavity;
        let mut model = sample_model();
        model.stack[0].cavities.push(Cavity {
            id: "C3".to_string(),
            shape: CavityShape::Poly { points: Vec::new() },
            x: 0.0,
            y: 0.0,
            nested_cavities: vec![NestedCavity { points: Vec::new() }],
        });
        let step = render_step(&model).unwrap();
        // The degenerate cavity and its island are dropped; the rest of the
        // model still exports.
        assert!(!step.contains("'C3'"));
        assert!(step.contains("EXTRUDED_AREA_SOLID('C1'"));
        assert!(step.contains("CIRCLE('C2'"));
    }

    #[test]
    fn test_simple_step_omits_cavities() {
        let step = render_simple_step(&sample_model()).unwrap();
        assert!(!step.contains("CIRCLE"));
        assert!(!step.contains("'C1'"));
        assert!(step.contains("POLYLINE('L1'"));
    }

    #[test]
    fn test_filenames() {
        assert_eq!(layer_step_filename("Q-1042", 0), "Q-1042-layer-0.step");
        assert_eq!(simple_step_filename("Q-1042"), "Q-1042-simple.step");
    }
}
