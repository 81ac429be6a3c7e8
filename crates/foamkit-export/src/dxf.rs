//! Minimal ASCII DXF writer.
//!
//! Emits an R14-level drawing: HEADER with inch units, ENTITIES holding the
//! block outline and every cavity as LWPOLYLINE/CIRCLE entities. DXF group
//! code 999 is the comment record; the hash variant uses it to carry the
//! geometry hash at the top of the file.
//!
//! DXF is y-up, so normalized top-left coordinates are flipped back through
//! the block height on the way out.

use foamkit_geometry::{Cavity, CavityShape, CornerStyle, LayoutModel, Point};
use std::fmt::Write;

use crate::hash::fmt_num;

/// Render a layout model to DXF text.
pub fn render_dxf(model: &LayoutModel) -> String {
    render(model, None)
}

/// Render a layout model to DXF text with the geometry hash in a 999
/// comment record.
pub fn render_dxf_with_hash(model: &LayoutModel, hash: &str) -> String {
    render(model, Some(hash))
}

fn render(model: &LayoutModel, hash: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(hash) = hash {
        push_pair(&mut out, 999, &format!("geometry-hash: {}", hash));
    }
    // HEADER: DXF version and inch drawing units.
    push_pair(&mut out, 0, "SECTION");
    push_pair(&mut out, 2, "HEADER");
    push_pair(&mut out, 9, "$ACADVER");
    push_pair(&mut out, 1, "AC1014");
    push_pair(&mut out, 9, "$INSUNITS");
    push_pair(&mut out, 70, "1");
    push_pair(&mut out, 0, "ENDSEC");

    push_pair(&mut out, 0, "SECTION");
    push_pair(&mut out, 2, "ENTITIES");

    write_block_outline(&mut out, model);
    for cavity in &model.cavities {
        write_cavity(&mut out, cavity, model);
    }

    push_pair(&mut out, 0, "ENDSEC");
    push_pair(&mut out, 0, "EOF");
    out
}

fn write_block_outline(out: &mut String, model: &LayoutModel) {
    let b = &model.block;
    let (l, w) = (b.length_in, b.width_in);
    let pts: Vec<(f64, f64)> = match b.corner_style {
        CornerStyle::Chamfer => {
            let c = b.chamfer_in.unwrap_or(0.0).min(l / 2.0).min(w / 2.0);
            vec![
                (c, 0.0),
                (l - c, 0.0),
                (l, c),
                (l, w - c),
                (l - c, w),
                (c, w),
                (0.0, w - c),
                (0.0, c),
            ]
        }
        CornerStyle::Square => vec![(0.0, 0.0), (l, 0.0), (l, w), (0.0, w)],
    };
    write_lwpolyline(out, &pts);
}

fn write_cavity(out: &mut String, cavity: &Cavity, model: &LayoutModel) {
    let (l, w) = (model.block.length_in, model.block.width_in);
    match &cavity.shape {
        CavityShape::Rect { length_in, width_in } => {
            // Normalized (x, y) is the top-left corner; flip to y-up.
            let x0 = cavity.x * l;
            let y1 = (1.0 - cavity.y) * w;
            let y0 = y1 - width_in;
            write_lwpolyline(
                out,
                &[(x0, y0), (x0 + length_in, y0), (x0 + length_in, y1), (x0, y1)],
            );
        }
        CavityShape::Circle { diameter_in } => {
            push_pair(out, 0, "CIRCLE");
            push_pair(out, 8, "CAVITIES");
            push_pair(out, 10, &fmt_num(cavity.x * l));
            push_pair(out, 20, &fmt_num((1.0 - cavity.y) * w));
            push_pair(out, 40, &fmt_num(diameter_in / 2.0));
        }
        CavityShape::Poly { points } => {
            write_lwpolyline(out, &denormalize(points, l, w));
        }
    }
    for nested in &cavity.nested_cavities {
        write_lwpolyline(out, &denormalize(&nested.points, l, w));
    }
}

fn denormalize(points: &[Point], l: f64, w: f64) -> Vec<(f64, f64)> {
    points
        .iter()
        .map(|p| (p.x * l, (1.0 - p.y) * w))
        .collect()
}

fn write_lwpolyline(out: &mut String, pts: &[(f64, f64)]) {
    push_pair(out, 0, "LWPOLYLINE");
    push_pair(out, 8, "CAVITIES");
    push_pair(out, 90, &pts.len().to_string());
    push_pair(out, 70, "1"); // closed
    for (x, y) in pts {
        push_pair(out, 10, &fmt_num(*x));
        push_pair(out, 20, &fmt_num(*y));
    }
}

fn push_pair(out: &mut String, code: u16, value: &str) {
    let _ = writeln!(out, "{}", code);
    let _ = writeln!(out, "{}", value);
}
