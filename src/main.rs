//! Command-line front end: read a loop-set JSON, build the layout model,
//! and write it (or one exported artifact) to stdout.

use anyhow::{bail, Context, Result};
use foamkit::{
    build_layout, geometry_hash, init_logging, render_dxf_with_hash, render_step_with_hash,
    render_svg_with_hash, slice_layer, BuildOptions, LoopSet, BUILD_DATE, VERSION,
};

const USAGE: &str = "usage: foamkit <loops.json> [--svg|--dxf|--step] [--layer N] [--thickness T]";

enum Format {
    Json,
    Svg,
    Dxf,
    Step,
}

fn main() -> Result<()> {
    init_logging()?;

    let mut input: Option<String> = None;
    let mut format = Format::Json;
    let mut layer: Option<usize> = None;
    let mut options = BuildOptions::default();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--svg" => format = Format::Svg,
            "--dxf" => format = Format::Dxf,
            "--step" => format = Format::Step,
            "--layer" => {
                let value = args.next().context("--layer needs a zero-based index")?;
                layer = Some(value.parse().context("--layer index must be an integer")?);
            }
            "--thickness" => {
                let value = args.next().context("--thickness needs a value in inches")?;
                options.thickness_in = value.parse().context("--thickness must be a number")?;
            }
            "--version" => {
                println!("foamkit {} (built {})", VERSION, BUILD_DATE);
                return Ok(());
            }
            "--help" => {
                println!("{}", USAGE);
                return Ok(());
            }
            other if input.is_none() && !other.starts_with('-') => input = Some(other.to_string()),
            other => bail!("unknown argument: {}\n{}", other, USAGE),
        }
    }

    let path = input.context(USAGE)?;
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
    let loops: LoopSet =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path))?;

    let mut model = build_layout(&loops, &options);
    if let Some(index) = layer {
        model = slice_layer(&model, index)?;
    }
    let hash = geometry_hash(&model);

    let out = match format {
        Format::Json => serde_json::to_string_pretty(&model)?,
        Format::Svg => render_svg_with_hash(&model, &hash),
        Format::Dxf => render_dxf_with_hash(&model, &hash),
        Format::Step => render_step_with_hash(&model, &hash)?,
    };
    println!("{}", out);
    Ok(())
}
