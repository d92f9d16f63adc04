// Copyright 2026 the svgcurve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Print the curve geometry reconstructed from an SVG file.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use svgcurve::{import_file, ControlPoint, CurveContainer, CurveSink, HandleKind, ImportOptions};

/// Reconstruct the paths of an SVG file as cubic Bézier control points.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// The SVG file to read.
    file: PathBuf,
    /// Put every path into a single curve instead of one curve per path.
    #[arg(long)]
    merge_paths: bool,
    /// Source-to-scene scale factor.
    #[arg(long, default_value_t = svgcurve::DEFAULT_SCALE)]
    scale: f64,
}

/// Writes containers as indented text.
struct TextSink<W> {
    out: W,
}

fn kind(kind: HandleKind) -> &'static str {
    match kind {
        HandleKind::Vector => "vector",
        HandleKind::Free => "free",
    }
}

impl<W: Write> TextSink<W> {
    fn write_point(&mut self, i: usize, cp: &ControlPoint) -> io::Result<()> {
        writeln!(
            self.out,
            "    {i}: {} in {} ({}) out {} ({})",
            cp.anchor,
            cp.handle_in,
            kind(cp.kind_in),
            cp.handle_out,
            kind(cp.kind_out)
        )
    }
}

impl<W: Write> CurveSink for TextSink<W> {
    type Error = io::Error;

    fn add_curve(&mut self, container: &CurveContainer) -> io::Result<()> {
        match &container.source_id {
            Some(id) => writeln!(self.out, "{} ({id})", container.name)?,
            None => writeln!(self.out, "{}", container.name)?,
        }
        for (i, subpath) in container.subpaths.iter().enumerate() {
            writeln!(
                self.out,
                "  subpath {i}: {}, {} points",
                if subpath.is_closed() { "closed" } else { "open" },
                subpath.len()
            )?;
            for (j, cp) in subpath.points().iter().enumerate() {
                self.write_point(j, cp)?;
            }
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let options = ImportOptions::default()
        .with_separate_paths(!args.merge_paths)
        .with_scale(args.scale);

    let import = import_file(&args.file, &options)?;
    let mut sink = TextSink {
        out: io::stdout().lock(),
    };
    import.drawing.emit(&mut sink).context("writing output")?;

    if !import.diagnostics.is_empty() {
        writeln!(sink.out, "{} problems:", import.diagnostics.len())?;
        for diagnostic in &import.diagnostics {
            writeln!(sink.out, "  {diagnostic}")?;
        }
    }
    Ok(())
}
