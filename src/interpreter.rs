// Copyright 2026 the svgcurve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Driving the subpath builder from path data.

use crate::{
    Command, CoordinateGroup, CoordinateResolver, ImportError, Point, Subpath, SubpathBuilder,
    Token, Tokenizer, TransformStack,
};

/// What interpreting one path's data produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathOutput {
    /// Finalised subpaths, in the order they were finished.
    pub subpaths: Vec<Subpath>,
    /// Everything that was skipped or discarded, in source order.
    pub errors: Vec<ImportError>,
}

/// The letter whose coordinate groups are currently being read.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Current {
    /// No letter yet.
    Start,
    Supported(Command),
    /// A letter outside the supported set; its groups are skipped.
    Unsupported(char),
}

/// Interpreter state for one path element.
///
/// Tokens are fed in order with [`feed`][PathInterpreter::feed]; the command
/// letter carries over between coordinate groups until another letter appears.
#[derive(Clone, Debug)]
pub struct PathInterpreter {
    resolver: CoordinateResolver,
    current: Current,
    /// The current letter has not been followed by a group yet.
    awaiting_group: bool,
    /// Last absolute, untransformed point, for relative commands.
    anchor: Point,
    builder: SubpathBuilder,
    /// Set after a malformed group; cleared by the next moveto.
    skip_to_move: bool,
    output: PathOutput,
}

impl PathInterpreter {
    /// Start interpreting a path under the given transforms.
    pub fn new(transforms: &TransformStack, scale: f64) -> Self {
        PathInterpreter {
            resolver: CoordinateResolver::new(transforms, scale),
            current: Current::Start,
            awaiting_group: false,
            anchor: Point::ZERO,
            builder: SubpathBuilder::new(),
            skip_to_move: false,
            output: PathOutput::default(),
        }
    }

    /// Process one token.
    pub fn feed(&mut self, token: Token<'_>) {
        match token {
            Token::Command(letter) => self.command(letter),
            Token::Coordinates(group) => self.coordinates(&group),
        }
    }

    /// Finalise the open subpath, if any, and return everything produced.
    pub fn finish(mut self) -> PathOutput {
        self.flush_empty();
        if let Some(subpath) = self.builder.finish() {
            self.output.subpaths.push(subpath);
        }
        self.output
    }

    fn command(&mut self, letter: char) {
        self.flush_empty();
        log::trace!("command {letter}");
        match Command::from_letter(letter) {
            Ok(Command::ClosePath) => {
                self.current = Current::Supported(Command::ClosePath);
                if let Some(subpath) = self.builder.close() {
                    self.output.subpaths.push(subpath);
                }
            }
            Ok(command) => {
                self.current = Current::Supported(command);
                self.awaiting_group = true;
            }
            Err(e) => {
                self.current = Current::Unsupported(letter);
                self.report(e);
            }
        }
    }

    /// Handle a supported letter that was never followed by coordinates.
    fn flush_empty(&mut self) {
        if !std::mem::take(&mut self.awaiting_group) {
            return;
        }
        let Current::Supported(command) = self.current else {
            return;
        };
        match command {
            Command::CurveTo | Command::CurveToRel => {
                if self.skip_to_move {
                    return;
                }
                log::trace!("{} without coordinates, curve ends in place", command.letter());
                if let Err(e) = self.builder.settle_curve() {
                    self.report(with_letter(e, command));
                }
            }
            _ => self.discard(ImportError::MalformedCoordinateGroup {
                letter: command.letter(),
                reason: "missing coordinates".into(),
            }),
        }
    }

    fn coordinates(&mut self, group: &CoordinateGroup<'_>) {
        self.awaiting_group = false;
        log::trace!("coordinates {:?}", group.fields());
        let command = match self.current {
            Current::Supported(command) => command,
            Current::Unsupported(letter) => {
                log::trace!("skipping coordinates of unsupported {letter}");
                return;
            }
            Current::Start => {
                self.discard(ImportError::MalformedCoordinateGroup {
                    letter: '?',
                    reason: "coordinates before any command".into(),
                });
                return;
            }
        };
        if command == Command::ClosePath {
            self.discard(ImportError::MalformedCoordinateGroup {
                letter: command.letter(),
                reason: "close takes no coordinates".into(),
            });
            return;
        }
        let values = match group.values(command.letter()) {
            Ok(values) => values,
            Err(e) => return self.discard(e),
        };
        let chunk = 2 * command.arity();
        if values.len() % chunk != 0 {
            return self.discard(ImportError::MalformedCoordinateGroup {
                letter: command.letter(),
                reason: format!(
                    "{} coordinates do not divide into groups of {chunk}",
                    values.len()
                ),
            });
        }
        for (i, chunk) in values.chunks_exact(chunk).enumerate() {
            let command = if i == 0 { command } else { command.repeated() };
            self.event(command, chunk);
        }
    }

    /// One repetition of a command with its coordinates.
    fn event(&mut self, command: Command, values: &[f64]) {
        if self.skip_to_move && !matches!(command, Command::MoveTo | Command::MoveToRel) {
            log::trace!("skipping {} until the next moveto", command.letter());
            return;
        }
        let resolved = match self.resolver.resolve(command, values, self.anchor) {
            Ok(resolved) => resolved,
            Err(e) => return self.discard(e),
        };
        self.anchor = resolved.anchor;
        log::trace!("{} {:?}", command.letter(), resolved.points);
        let result = match (command, resolved.points.as_slice()) {
            (Command::MoveTo | Command::MoveToRel, &[p]) => {
                self.skip_to_move = false;
                if let Some(subpath) = self.builder.move_to(p) {
                    self.output.subpaths.push(subpath);
                }
                Ok(())
            }
            (Command::LineTo | Command::LineToRel, &[p]) => self.builder.line_to(p),
            (Command::CurveTo | Command::CurveToRel, &[c1, c2, p]) => {
                self.builder.curve_to(c1, c2, p)
            }
            (_, points) => Err(ImportError::MalformedCoordinateGroup {
                letter: command.letter(),
                reason: format!("no segment takes {} points", points.len()),
            }),
        };
        match result {
            Ok(()) => (),
            Err(e) if e.is_fatal_for_subpath() => self.discard(e),
            Err(e) => self.report(with_letter(e, command)),
        }
    }

    /// Record a non-fatal error.
    fn report(&mut self, error: ImportError) {
        log::trace!("{error}");
        self.output.errors.push(error);
    }

    /// Record an error that invalidates the open subpath.
    fn discard(&mut self, error: ImportError) {
        self.builder.abort();
        self.skip_to_move = true;
        self.report(error);
    }
}

/// Attribute a builder error to the letter that was actually written.
fn with_letter(error: ImportError, command: Command) -> ImportError {
    match error {
        ImportError::MissingMoveTo { .. } => ImportError::MissingMoveTo {
            letter: command.letter(),
        },
        other => other,
    }
}

/// Interpret the path data `data` under `transforms`.
///
/// The relative anchor starts at the origin, so a leading `m` is absolute.
pub fn interpret_path(data: &str, transforms: &TransformStack, scale: f64) -> PathOutput {
    let mut interpreter = PathInterpreter::new(transforms, scale);
    for token in Tokenizer::new(data) {
        interpreter.feed(token);
    }
    interpreter.finish()
}

#[cfg(test)]
mod tests {
    use super::{interpret_path, PathInterpreter};
    use crate::{Command, HandleKind, ImportError, Point, Subpath, TransformStack, DEFAULT_SCALE};

    fn run(data: &str) -> super::PathOutput {
        interpret_path(data, &TransformStack::new(), 1.0)
    }

    fn anchors(subpath: &Subpath) -> Vec<Point> {
        subpath.points().iter().map(|cp| cp.anchor).collect()
    }

    #[test]
    fn closed_square() {
        let out = run("M0,0 L10,0 L10,10 L0,0");
        assert!(out.errors.is_empty());
        assert_eq!(out.subpaths.len(), 1);
        let sp = &out.subpaths[0];
        assert!(sp.is_closed());
        assert_eq!(
            anchors(sp),
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, -10.0)
            ]
        );
        for cp in sp.points() {
            assert_eq!(cp.kind_in, HandleKind::Vector);
            assert_eq!(cp.kind_out, HandleKind::Vector);
        }
    }

    #[test]
    fn open_triangle() {
        let out = run("M0,0 L10,0 L5,20");
        let sp = &out.subpaths[0];
        assert!(!sp.is_closed());
        assert_eq!(sp.len(), 3);
        assert_eq!(sp.points()[0].kind_out, HandleKind::Vector);
    }

    #[test]
    fn unsupported_commands_leave_subpath_intact() {
        let clean = run("M0,0 L10,0 L10,10 L0,0");
        for data in [
            "M0,0 L10,0 A5,5 0 0 1 20,20 L10,10 L0,0",
            "M0,0 L10,0 Q1,1 2,2 L10,10 L0,0",
            "M0,0 L10,0 S1,1 2,2 L10,10 L0,0",
        ] {
            let out = run(data);
            assert_eq!(out.errors.len(), 1, "{data}");
            assert!(matches!(
                out.errors[0],
                ImportError::UnsupportedCommand { .. }
            ));
            // The letter after the unsupported one picks up normally.
            assert_eq!(out.subpaths, clean.subpaths, "{data}");
        }
    }

    #[test]
    fn letter_repeats_over_group() {
        let out = run("M0,0 L 1,1 2,2");
        assert_eq!(
            anchors(&out.subpaths[0]),
            vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, -1.0),
                Point::new(2.0, -2.0)
            ]
        );
    }

    #[test]
    fn extra_move_pairs_are_lines() {
        let out = run("M0,0 10,0 10,10z");
        assert_eq!(out.subpaths.len(), 1);
        assert_eq!(out.subpaths[0].len(), 3);
        assert!(out.subpaths[0].is_closed());
    }

    #[test]
    fn chained_relative_curves() {
        let out = run("M10,10 c1,1 2,2 3,3 1,1 2,2 3,3");
        let sp = &out.subpaths[0];
        assert_eq!(sp.len(), 3);
        assert_eq!(sp.points()[1].anchor, Point::new(13.0, -13.0));
        assert_eq!(sp.points()[1].handle_out, Point::new(14.0, -14.0));
        assert_eq!(sp.points()[2].anchor, Point::new(16.0, -16.0));
    }

    #[test]
    fn relative_moves_and_lines() {
        let out = run("m10,10 l5,0 0,5");
        assert_eq!(
            anchors(&out.subpaths[0]),
            vec![
                Point::new(10.0, -10.0),
                Point::new(15.0, -10.0),
                Point::new(15.0, -15.0)
            ]
        );
    }

    #[test]
    fn malformed_group_discards_subpath() {
        let out = run("M0,0 L1,1 C1,2,3 L4,4 M5,5 L6,6");
        assert!(matches!(
            out.errors.as_slice(),
            [ImportError::MalformedCoordinateGroup { letter: 'C', .. }]
        ));
        assert_eq!(out.subpaths.len(), 1);
        assert_eq!(
            anchors(&out.subpaths[0]),
            vec![Point::new(5.0, -5.0), Point::new(6.0, -6.0)]
        );

        let out = run("M0,0 L1,1.2.3");
        assert!(matches!(
            out.errors.as_slice(),
            [ImportError::MalformedCoordinateGroup { letter: 'L', .. }]
        ));
        assert!(out.subpaths.is_empty());

        let out = run("M1 2 3");
        assert!(matches!(
            out.errors.as_slice(),
            [ImportError::MalformedCoordinateGroup { letter: 'M', .. }]
        ));
    }

    #[test]
    fn empty_groups() {
        // A bare curve letter ends the curve in place, without a new vertex.
        let out = run("M0,0 C10,0 10,10 0,10 C");
        assert!(out.errors.is_empty());
        assert_eq!(out.subpaths[0].len(), 2);

        let out = run("M0,0 L");
        assert!(matches!(
            out.errors.as_slice(),
            [ImportError::MalformedCoordinateGroup { letter: 'L', .. }]
        ));

        let out = run("M0,0 L1,1 z 3,3");
        assert_eq!(out.subpaths.len(), 1);
        assert!(matches!(
            out.errors.as_slice(),
            [ImportError::MalformedCoordinateGroup { letter: 'z', .. }]
        ));
    }

    #[test]
    fn bare_curve_before_close() {
        let out = run("M0,0 C0,10 10,10 10,0 Cz");
        assert!(out.errors.is_empty());
        assert_eq!(out.subpaths.len(), 1);
        let sp = &out.subpaths[0];
        assert!(sp.is_closed());
        assert_eq!(
            anchors(sp),
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]
        );
        assert_eq!(sp.points()[1].handle_in, Point::new(10.0, -10.0));
        assert_eq!(sp.points()[1].handle_out, Point::new(10.0, 0.0));
        assert_eq!(sp.points()[1].kind_out, HandleKind::Free);

        // Nothing to end: the move stays a single open vertex.
        let out = run("M0,0 c");
        assert_eq!(out.subpaths.len(), 1);
        assert_eq!(out.subpaths[0].len(), 1);
        assert!(!out.subpaths[0].is_closed());
    }

    #[test]
    fn events_need_matching_points() {
        let mut interpreter = PathInterpreter::new(&TransformStack::new(), 1.0);
        interpreter.event(Command::MoveTo, &[0.0, 0.0]);
        interpreter.event(Command::LineTo, &[1.0, 0.0]);
        interpreter.event(Command::ClosePath, &[]);
        interpreter.event(Command::LineTo, &[2.0, 0.0]);
        let out = interpreter.finish();
        assert!(matches!(
            out.errors.as_slice(),
            [ImportError::MalformedCoordinateGroup { letter: 'z', .. }]
        ));
        // The subpath was discarded along with everything up to the next moveto.
        assert!(out.subpaths.is_empty());
    }

    #[test]
    fn segment_without_moveto() {
        let out = run("L1,1 c1,1 2,2 3,3");
        assert_eq!(
            out.errors,
            vec![
                ImportError::MissingMoveTo { letter: 'L' },
                ImportError::MissingMoveTo { letter: 'c' }
            ]
        );
        assert!(out.subpaths.is_empty());
    }

    #[test]
    fn line_after_close_reopens() {
        let out = run("M0,0 L10,0 z L0,10");
        assert_eq!(out.subpaths.len(), 2);
        assert!(out.subpaths[0].is_closed());
        assert_eq!(
            anchors(&out.subpaths[1]),
            vec![Point::new(0.0, 0.0), Point::new(0.0, -10.0)]
        );
    }

    #[test]
    fn each_move_starts_a_subpath() {
        let out = run("M0,0 L1,0 M5,5 L6,5 M9,9");
        assert_eq!(out.subpaths.len(), 3);
        assert!(out.subpaths[2].is_degenerate());
    }

    #[test]
    fn exponent_is_unsupported() {
        let out = run("M0,0 L1e-5,2");
        // "L1" is left with a single field, which discards the subpath.
        assert!(matches!(
            out.errors.as_slice(),
            [
                ImportError::MalformedCoordinateGroup { letter: 'L', .. },
                ImportError::UnsupportedCommand { letter: 'e' }
            ]
        ));
        assert!(out.subpaths.is_empty());
    }

    #[test]
    fn transforms_and_scale_apply() {
        let mut stack = TransformStack::new();
        stack.push(Some("translate(100,0)")).unwrap();
        let out = interpret_path("M0,0 L100,100", &stack, DEFAULT_SCALE);
        let sp = &out.subpaths[0];
        assert_eq!(sp.points()[0].anchor, Point::new(1.0, 0.0));
        assert_eq!(sp.points()[1].anchor, Point::new(2.0, -1.0));
    }
}
