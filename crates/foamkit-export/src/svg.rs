//! SVG rendering of layout models.
//!
//! Produces a deterministic vector drawing in inch units: the block outline
//! (square, chamfered, or rounded) and every cavity of the base layer,
//! including nested island outlines. The hash-embedding variant lets a
//! human or tool confirm an exported drawing matches a locked geometry
//! state without re-deriving the hash.

use foamkit_geometry::{Cavity, CavityShape, CornerStyle, LayoutModel, Point};
use std::fmt::Write;

use crate::hash::fmt_num;

/// Render a layout model to SVG text.
pub fn render_svg(model: &LayoutModel) -> String {
    render(model, None)
}

/// Render a layout model to SVG text with the geometry hash embedded in a
/// comment and a metadata element.
pub fn render_svg_with_hash(model: &LayoutModel, hash: &str) -> String {
    render(model, Some(hash))
}

fn render(model: &LayoutModel, hash: Option<&str>) -> String {
    let l = model.block.length_in;
    let w = model.block.width_in;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {} {}\" width=\"{}in\" height=\"{}in\">",
        fmt_num(l),
        fmt_num(w),
        fmt_num(l),
        fmt_num(w)
    );
    if let Some(hash) = hash {
        let _ = writeln!(out, "<!-- geometry-hash: {} -->", hash);
        let _ = writeln!(out, "<metadata id=\"geometry-hash\">{}</metadata>", hash);
    }

    out.push_str(&block_outline(model));

    for cavity in &model.cavities {
        out.push_str(&cavity_element(cavity, l, w));
    }

    out.push_str("</svg>\n");
    out
}

/// Block outline as a rect or chamfered polygon.
fn block_outline(model: &LayoutModel) -> String {
    let b = &model.block;
    let (l, w) = (b.length_in, b.width_in);
    match b.corner_style {
        CornerStyle::Chamfer => {
            let c = b.chamfer_in.unwrap_or(0.0).min(l / 2.0).min(w / 2.0);
            let pts = [
                (c, 0.0),
                (l - c, 0.0),
                (l, c),
                (l, w - c),
                (l - c, w),
                (c, w),
                (0.0, w - c),
                (0.0, c),
            ];
            let mut s = String::from("<polygon class=\"block\" points=\"");
            for (i, (x, y)) in pts.iter().enumerate() {
                if i > 0 {
                    s.push(' ');
                }
                let _ = write!(s, "{},{}", fmt_num(*x), fmt_num(*y));
            }
            s.push_str("\" fill=\"none\" stroke=\"black\"/>\n");
            s
        }
        CornerStyle::Square => {
            let rx = match (b.round_corners, b.round_radius_in) {
                (Some(true), Some(r)) => format!(" rx=\"{}\"", fmt_num(r)),
                _ => String::new(),
            };
            format!(
                "<rect class=\"block\" x=\"0\" y=\"0\" width=\"{}\" height=\"{}\"{} fill=\"none\" stroke=\"black\"/>\n",
                fmt_num(l),
                fmt_num(w),
                rx
            )
        }
    }
}

/// One cavity, converted from normalized unit-square coordinates back to
/// inches. SVG's top-left origin matches the normalized convention, so no
/// further flip is needed.
fn cavity_element(cavity: &Cavity, l: f64, w: f64) -> String {
    let mut s = match &cavity.shape {
        CavityShape::Rect { length_in, width_in } => format!(
            "<rect class=\"cavity\" id=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"blue\"/>\n",
            cavity.id,
            fmt_num(cavity.x * l),
            fmt_num(cavity.y * w),
            fmt_num(*length_in),
            fmt_num(*width_in)
        ),
        CavityShape::Circle { diameter_in } => format!(
            "<circle class=\"cavity\" id=\"{}\" cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"none\" stroke=\"blue\"/>\n",
            cavity.id,
            fmt_num(cavity.x * l),
            fmt_num(cavity.y * w),
            fmt_num(diameter_in / 2.0)
        ),
        CavityShape::Poly { points } => polygon_element(
            &format!("<polygon class=\"cavity\" id=\"{}\"", cavity.id),
            points,
            l,
            w,
            "blue",
        ),
    };
    for nested in &cavity.nested_cavities {
        s.push_str(&polygon_element(
            "<polygon class=\"island\"",
            &nested.points,
            l,
            w,
            "green",
        ));
    }
    s
}

fn polygon_element(open: &str, points: &[Point], l: f64, w: f64, stroke: &str) -> String {
    let mut s = format!("{} points=\"", open);
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            s.push(' ');
        }
        let _ = write!(s, "{},{}", fmt_num(p.x * l), fmt_num(p.y * w));
    }
    let _ = writeln!(s, "\" fill=\"none\" stroke=\"{}\"/>", stroke);
    s
}
