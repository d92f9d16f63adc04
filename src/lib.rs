// Copyright 2026 the svgcurve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reconstructing SVG path data as cubic Bézier curves.
//!
//! The svgcurve library reads the `path` elements of an SVG document and turns
//! their path data into subpaths of Bézier control points. Each control point
//! carries an incoming and an outgoing handle, tagged as [`HandleKind::Vector`]
//! for straight segments or [`HandleKind::Free`] for curved ones, which is the
//! form spline-based curve objects in 3D applications expect. Loops are
//! detected and closed, and element transforms are applied on the way.
//!
//! Only the `M`, `L`, `C` and `z` commands (with their relative forms `m`, `l`
//! and `c`) and the `matrix`, `translate` and `scale` transforms are understood.
//! Anything else is skipped and reported as a [`Diagnostic`] rather than
//! guessed at.
//!
//! # Examples
//!
//! Importing a document:
//! ```
//! use svgcurve::{import_str, HandleKind, ImportOptions, Point};
//!
//! let svg = r#"<svg><path id="wedge" d="M0,0 L100,0 L100,100 L0,0"/></svg>"#;
//! let import = import_str(svg, &ImportOptions::default())?;
//!
//! let container = &import.drawing.containers[0];
//! assert_eq!(container.source_id.as_deref(), Some("wedge"));
//!
//! // Returning to the start closes the loop. The y axis is flipped and
//! // everything is scaled by 0.01.
//! let subpath = &container.subpaths[0];
//! assert!(subpath.is_closed());
//! assert_eq!(subpath.len(), 3);
//! assert_eq!(subpath.points()[2].anchor, Point::new(1.0, -1.0));
//! assert_eq!(subpath.points()[2].kind_in, HandleKind::Vector);
//! # Ok::<(), svgcurve::DocumentError>(())
//! ```
//!
//! Interpreting path data on its own, under an explicit transform stack:
//! ```
//! use svgcurve::{interpret_path, ImportError, Point, TransformStack};
//!
//! let mut transforms = TransformStack::new();
//! transforms.push(Some("translate(10, 0)")).unwrap();
//!
//! let output = interpret_path("M0,0 c0,5 5,5 5,0 Q1,1 2,2", &transforms, 1.0);
//! assert_eq!(output.errors, vec![ImportError::UnsupportedCommand { letter: 'Q' }]);
//!
//! let subpath = &output.subpaths[0];
//! assert!(!subpath.is_closed());
//! assert_eq!(subpath.points()[1].anchor, Point::new(15.0, 0.0));
//! assert_eq!(subpath.points()[1].handle_in, Point::new(15.0, -5.0));
//! ```
//!
//! # Features
//!
//! - `serde`: serialization of the value types and of [`Drawing`].
//! - `schemars`: JSON schemas for the same.
//! - `mint`: conversions between [`Point`]/[`Vec2`] and their `mint` counterparts.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod affine;
mod command;
mod document;
mod drawing;
mod error;
mod interpreter;
mod point;
mod resolver;
mod subpath;
mod tokenizer;
mod transform;
mod vec2;

pub use crate::affine::*;
pub use crate::command::*;
pub use crate::document::*;
pub use crate::drawing::*;
pub use crate::error::*;
pub use crate::interpreter::*;
pub use crate::point::*;
pub use crate::resolver::*;
pub use crate::subpath::*;
pub use crate::tokenizer::*;
pub use crate::transform::*;
pub use crate::vec2::*;
