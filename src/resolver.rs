// Copyright 2026 the svgcurve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turning raw coordinates into scene points.

use arrayvec::ArrayVec;

use crate::{Affine, Command, ImportError, Point, TransformStack};

/// The default source-to-scene scale factor.
///
/// Source units are scaled down by this factor and the y axis is flipped, so that
/// a drawing authored in a y-down document ends up y-up at a manageable size.
pub const DEFAULT_SCALE: f64 = 0.01;

/// The result of resolving one repetition of a command.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolved {
    /// The command's points in scene coordinates, in source order.
    pub points: ArrayVec<Point, 3>,
    /// The absolute, untransformed position of the last pair.
    ///
    /// This is what the next relative command is resolved against. For a close
    /// command, which has no pairs, it is the incoming anchor unchanged.
    pub anchor: Point,
}

/// Maps source coordinates to scene coordinates under a fixed transform stack.
///
/// The resolver caches the composition of the stack with the flip-and-scale, so
/// [`resolve`][CoordinateResolver::resolve] depends only on its arguments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateResolver {
    view: Affine,
}

impl CoordinateResolver {
    /// Create a resolver for the transforms currently on `transforms`.
    pub fn new(transforms: &TransformStack, scale: f64) -> Self {
        CoordinateResolver {
            view: Affine::scale(scale) * Affine::FLIP_Y * transforms.compose(),
        }
    }

    /// The full source-to-scene transform.
    pub fn view(&self) -> Affine {
        self.view
    }

    /// Resolve the coordinates of a single repetition of `command`.
    ///
    /// `values` must hold exactly `2 * command.arity()` numbers. Relative commands
    /// add `anchor` to every pair, control points included.
    ///
    /// # Errors
    ///
    /// [`ImportError::MalformedCoordinateGroup`] if `values` has the wrong length.
    pub fn resolve(
        &self,
        command: Command,
        values: &[f64],
        anchor: Point,
    ) -> Result<Resolved, ImportError> {
        let absolute = to_absolute(command, values, anchor)?;
        let anchor = absolute.last().copied().unwrap_or(anchor);
        let points = absolute.into_iter().map(|p| self.view * p).collect();
        Ok(Resolved { points, anchor })
    }
}

/// Interpret one repetition's values as absolute source points.
///
/// # Errors
///
/// [`ImportError::MalformedCoordinateGroup`] if `values` does not hold exactly
/// `2 * command.arity()` numbers.
pub fn to_absolute(
    command: Command,
    values: &[f64],
    anchor: Point,
) -> Result<ArrayVec<Point, 3>, ImportError> {
    let expected = 2 * command.arity();
    if values.len() != expected {
        return Err(ImportError::MalformedCoordinateGroup {
            letter: command.letter(),
            reason: format!("expected {expected} coordinates, found {}", values.len()),
        });
    }
    let pairs = values.chunks_exact(2).map(|xy| Point::new(xy[0], xy[1]));
    Ok(if command.is_relative() {
        let offset = anchor.to_vec2();
        pairs.map(|p| p + offset).collect()
    } else {
        pairs.collect()
    })
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::{to_absolute, CoordinateResolver, DEFAULT_SCALE};
    use crate::{Command, ImportError, Point, TransformStack};

    fn assert_near(p0: Point, p1: Point) {
        assert!(
            (p1 - p0).x.abs() < 1e-9 && (p1 - p0).y.abs() < 1e-9,
            "{p0:?} != {p1:?}"
        );
    }

    #[test]
    fn relative_curve_is_anchor_additive() {
        let points = to_absolute(
            Command::CurveToRel,
            &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            Point::new(100.0, 50.0),
        )
        .unwrap();
        assert_eq!(
            points.as_slice(),
            &[
                Point::new(101.0, 52.0),
                Point::new(103.0, 54.0),
                Point::new(105.0, 56.0)
            ]
        );
    }

    #[test]
    fn absolute_ignores_anchor() {
        let points = to_absolute(
            Command::CurveTo,
            &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            Point::new(100.0, 50.0),
        )
        .unwrap();
        assert_eq!(points[2], Point::new(5.0, 6.0));
    }

    #[test]
    fn anchor_is_last_pair_before_transform() {
        let mut stack = TransformStack::new();
        stack.push(Some("translate(1000,1000)")).unwrap();
        let resolver = CoordinateResolver::new(&stack, 1.0);

        let resolved = resolver
            .resolve(
                Command::CurveToRel,
                &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
                Point::new(100.0, 50.0),
            )
            .unwrap();
        assert_eq!(resolved.anchor, Point::new(105.0, 56.0));
        assert_eq!(resolved.points[2], Point::new(1105.0, -1056.0));

        let closed = resolver
            .resolve(Command::ClosePath, &[], Point::new(7.0, 8.0))
            .unwrap();
        assert!(closed.points.is_empty());
        assert_eq!(closed.anchor, Point::new(7.0, 8.0));
    }

    #[test]
    fn stack_then_flip_and_scale() {
        let mut stack = TransformStack::new();
        stack.push(Some("translate(10,0)")).unwrap();
        stack.push(Some("scale(2,2)")).unwrap();
        let resolver = CoordinateResolver::new(&stack, DEFAULT_SCALE);
        let resolved = resolver
            .resolve(Command::LineTo, &[1.0, 1.0], Point::ZERO)
            .unwrap();
        assert_near(resolved.points[0], Point::new(0.12, -0.02));
        assert_eq!(resolved.anchor, Point::new(1.0, 1.0));
    }

    #[test]
    fn wrong_arity_is_malformed() {
        let resolver = CoordinateResolver::new(&TransformStack::new(), 1.0);
        assert!(matches!(
            resolver.resolve(Command::CurveTo, &[1.0, 2.0, 3.0, 4.0], Point::ZERO),
            Err(ImportError::MalformedCoordinateGroup { letter: 'C', .. })
        ));
        assert!(matches!(
            resolver.resolve(Command::ClosePath, &[1.0, 2.0], Point::ZERO),
            Err(ImportError::MalformedCoordinateGroup { letter: 'z', .. })
        ));
    }

    #[test]
    fn resolve_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut stack = TransformStack::new();
        stack.push(Some("matrix(0.5,0.25,-1,2,30,-40)")).unwrap();
        stack.push(Some("translate(3,4) scale(1.5)")).unwrap();
        let resolver = CoordinateResolver::new(&stack, DEFAULT_SCALE);

        for _ in 0..200 {
            let values: Vec<f64> = (0..6).map(|_| rng.random_range(-1e4..1e4)).collect();
            let anchor = Point::new(rng.random_range(-1e4..1e4), rng.random_range(-1e4..1e4));
            let first = resolver.resolve(Command::CurveToRel, &values, anchor).unwrap();
            let second = resolver.resolve(Command::CurveToRel, &values, anchor).unwrap();
            assert_eq!(first, second);
            // A fresh resolver over the same stack agrees too.
            let fresh = CoordinateResolver::new(&stack, DEFAULT_SCALE);
            assert_eq!(fresh.resolve(Command::CurveToRel, &values, anchor).unwrap(), first);
        }
    }
}
