// Copyright 2026 the svgcurve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Assembling cubic Bézier control points, one subpath at a time.
//!
//! A control point needs both its incoming and its outgoing handle, and the
//! outgoing handle is only known once the following segment arrives. The
//! builder therefore keeps the most recent segment in a one-element lookahead
//! buffer and materialises the control point at its end when the next segment
//! (or the end of the subpath) is seen.

use crate::{ImportError, Point};

/// How a handle of a [`ControlPoint`] behaves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HandleKind {
    /// The handle lies on the straight segment it belongs to.
    Vector,
    /// The handle is positioned independently, shaping a curved segment.
    Free,
}

/// A vertex of a cubic Bézier spline: an anchor with its two handles.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlPoint {
    /// The on-curve point.
    pub anchor: Point,
    /// The handle of the segment arriving at the anchor.
    pub handle_in: Point,
    /// The handle of the segment leaving the anchor.
    pub handle_out: Point,
    /// Kind of `handle_in`.
    pub kind_in: HandleKind,
    /// Kind of `handle_out`.
    pub kind_out: HandleKind,
}

impl ControlPoint {
    /// A control point whose handles both sit on the anchor.
    pub fn corner(anchor: Point) -> Self {
        ControlPoint {
            anchor,
            handle_in: anchor,
            handle_out: anchor,
            kind_in: HandleKind::Vector,
            kind_out: HandleKind::Vector,
        }
    }
}

/// A finished, continuous run of control points.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Subpath {
    points: Vec<ControlPoint>,
    closed: bool,
}

impl Subpath {
    /// The control points, in drawing order.
    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    /// Whether the end connects back to the start.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of control points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether there are no control points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether this subpath has too few control points to draw anything.
    ///
    /// A moveto that is never followed by a segment still produces a subpath
    /// with a single control point.
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 2
    }
}

/// Where a [`SubpathBuilder`] is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuilderState {
    /// No subpath is open.
    Idle,
    /// A moveto opened a subpath and no segment has followed yet.
    SubpathOpen,
    /// The subpath has at least one segment.
    SubpathActive,
}

/// A segment whose end has not been materialised as a control point yet.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Segment {
    Line {
        to: Point,
    },
    Curve {
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
    },
}

impl Segment {
    fn end(self) -> Point {
        match self {
            Segment::Line { to } | Segment::Curve { to, .. } => to,
        }
    }

    /// The handle with which this segment arrives at its end.
    fn handle_in(self) -> Point {
        match self {
            Segment::Line { to } => to,
            Segment::Curve { ctrl2, .. } => ctrl2,
        }
    }

    fn kind(self) -> HandleKind {
        match self {
            Segment::Line { .. } => HandleKind::Vector,
            Segment::Curve { .. } => HandleKind::Free,
        }
    }
}

/// The first segment of a subpath, as far as the start vertex is concerned.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Lead {
    handle: Point,
    kind: HandleKind,
}

/// A subpath under construction.
#[derive(Clone, Debug, PartialEq)]
struct OpenSubpath {
    /// Never empty: `points[0]` is the start vertex.
    points: Vec<ControlPoint>,
    lead: Option<Lead>,
    latest: Option<Segment>,
    /// The vertex at the end of `latest` is already the last of `points`.
    settled: bool,
}

impl OpenSubpath {
    fn new(start: Point) -> Self {
        OpenSubpath {
            points: vec![ControlPoint::corner(start)],
            lead: None,
            latest: None,
            settled: false,
        }
    }

    fn start(&self) -> Point {
        self.points[0].anchor
    }

    /// Append the control point at the end of `latest`, leaving it with `handle_out`.
    fn materialize(&mut self, latest: Segment, handle_out: Point, kind_out: HandleKind) {
        self.points.push(ControlPoint {
            anchor: latest.end(),
            handle_in: latest.handle_in(),
            handle_out,
            kind_in: latest.kind(),
            kind_out,
        });
    }

    fn push_segment(&mut self, segment: Segment) {
        match self.latest {
            None => {
                // First segment: it only shapes the start vertex's outgoing side.
                let lead = match segment {
                    Segment::Line { .. } => Lead {
                        handle: self.start(),
                        kind: HandleKind::Vector,
                    },
                    Segment::Curve { ctrl1, .. } => {
                        let first = &mut self.points[0];
                        first.handle_in = ctrl1;
                        first.handle_out = ctrl1;
                        first.kind_out = HandleKind::Free;
                        Lead {
                            handle: ctrl1,
                            kind: HandleKind::Free,
                        }
                    }
                };
                self.lead = Some(lead);
            }
            Some(latest) => {
                let (handle_out, kind_out) = match segment {
                    Segment::Line { .. } => (latest.end(), HandleKind::Vector),
                    Segment::Curve { ctrl1, .. } => (ctrl1, HandleKind::Free),
                };
                if !self.settled {
                    self.materialize(latest, handle_out, kind_out);
                } else if let Some(last) = self.points.last_mut() {
                    last.handle_out = handle_out;
                    last.kind_out = kind_out;
                }
            }
        }
        self.latest = Some(segment);
        self.settled = false;
    }

    /// Materialise the vertex at the end of `latest` ahead of the next segment.
    fn settle(&mut self) {
        if let (Some(latest), false) = (self.latest, self.settled) {
            self.materialize(latest, latest.end(), HandleKind::Free);
            self.settled = true;
        }
    }
}

/// Close `open` into a loop.
///
/// If the last segment ends exactly on the start, the start vertex takes over
/// its incoming handle. Otherwise the last vertex is materialised and the loop
/// is completed with a straight edge back to the start.
fn close_loop(mut open: OpenSubpath) -> Subpath {
    if let (Some(latest), Some(lead)) = (open.latest, open.lead) {
        let start = open.start();
        let (handle_in, kind_in) = if latest.end() == start {
            if open.settled {
                // The settled vertex is the start vertex itself.
                open.points.pop();
            }
            (latest.handle_in(), latest.kind())
        } else {
            if !open.settled {
                open.materialize(latest, latest.end(), HandleKind::Vector);
            }
            (start, HandleKind::Vector)
        };
        let first = &mut open.points[0];
        first.handle_in = handle_in;
        first.kind_in = kind_in;
        first.handle_out = lead.handle;
        first.kind_out = lead.kind;
    }
    Subpath {
        points: open.points,
        closed: true,
    }
}

/// Finish `open` without an explicit close.
///
/// A subpath whose last segment ends exactly on its start point is closed, as
/// if it had ended with a close command. Otherwise the last vertex is
/// materialised and the subpath is left open, with the start vertex's outgoing
/// handle forced to [`HandleKind::Vector`].
fn finalize(mut open: OpenSubpath) -> Subpath {
    let (Some(latest), Some(lead)) = (open.latest, open.lead) else {
        return Subpath {
            points: open.points,
            closed: false,
        };
    };
    if latest.end() == open.start() {
        return close_loop(open);
    }
    let kind = latest.kind();
    if !open.settled {
        open.materialize(latest, latest.end(), kind);
    }
    let first = &mut open.points[0];
    first.handle_in = latest.handle_in();
    first.kind_in = kind;
    first.handle_out = lead.handle;
    first.kind_out = HandleKind::Vector;
    Subpath {
        points: open.points,
        closed: false,
    }
}

/// The subpath state machine.
///
/// Feed it resolved points in drawing order; every method that can end a
/// subpath returns it once it is final.
#[derive(Clone, Debug, Default)]
pub struct SubpathBuilder {
    open: Option<OpenSubpath>,
    /// Start of the most recently closed subpath, where a segment without a
    /// new moveto begins.
    reopen_at: Option<Point>,
}

impl SubpathBuilder {
    /// Create an idle builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current state.
    pub fn state(&self) -> BuilderState {
        match &self.open {
            None => BuilderState::Idle,
            Some(open) if open.latest.is_none() => BuilderState::SubpathOpen,
            Some(_) => BuilderState::SubpathActive,
        }
    }

    /// Start a new subpath at `p`, finalising any open one.
    pub fn move_to(&mut self, p: Point) -> Option<Subpath> {
        let finished = self.finish();
        self.open = Some(OpenSubpath::new(p));
        finished
    }

    /// Add a straight segment to `p`.
    ///
    /// # Errors
    ///
    /// [`ImportError::MissingMoveTo`] if no subpath has been started.
    pub fn line_to(&mut self, p: Point) -> Result<(), ImportError> {
        self.open_for('L')?.push_segment(Segment::Line { to: p });
        Ok(())
    }

    /// Add a cubic segment through `ctrl1` and `ctrl2` to `p`.
    ///
    /// # Errors
    ///
    /// [`ImportError::MissingMoveTo`] if no subpath has been started.
    pub fn curve_to(&mut self, ctrl1: Point, ctrl2: Point, p: Point) -> Result<(), ImportError> {
        self.open_for('C')?
            .push_segment(Segment::Curve { ctrl1, ctrl2, to: p });
        Ok(())
    }

    /// Materialise the control point at the end of the latest segment without
    /// adding a segment, leaving its outgoing handle on the anchor.
    ///
    /// This is what a curve command with no coordinates stands for: the curve
    /// ends where the previous segment did. A following segment only sets the
    /// outgoing handle, and a following close does not repeat the vertex.
    ///
    /// # Errors
    ///
    /// [`ImportError::MissingMoveTo`] if no subpath has been started.
    pub fn settle_curve(&mut self) -> Result<(), ImportError> {
        match &mut self.open {
            Some(open) => {
                open.settle();
                Ok(())
            }
            None if self.reopen_at.is_some() => Ok(()),
            None => Err(ImportError::MissingMoveTo { letter: 'C' }),
        }
    }

    /// Close the open subpath into a loop and return it.
    pub fn close(&mut self) -> Option<Subpath> {
        let open = self.open.take()?;
        self.reopen_at = Some(open.start());
        let subpath = close_loop(open);
        log::debug!("closed subpath with {} control points", subpath.len());
        Some(subpath)
    }

    /// Finalise the open subpath, if any, and return it.
    pub fn finish(&mut self) -> Option<Subpath> {
        let open = self.open.take()?;
        self.reopen_at = None;
        let subpath = finalize(open);
        log::debug!(
            "finalized {} subpath with {} control points",
            if subpath.is_closed() { "closed" } else { "open" },
            subpath.len()
        );
        Some(subpath)
    }

    /// Throw away the open subpath.
    pub fn abort(&mut self) {
        if let Some(open) = self.open.take() {
            log::debug!("discarding subpath with {} control points", open.points.len());
        }
        self.reopen_at = None;
    }

    fn open_for(&mut self, letter: char) -> Result<&mut OpenSubpath, ImportError> {
        if self.open.is_none() {
            let start = self
                .reopen_at
                .take()
                .ok_or(ImportError::MissingMoveTo { letter })?;
            self.open = Some(OpenSubpath::new(start));
        }
        self.open.as_mut().ok_or(ImportError::MissingMoveTo { letter })
    }
}
