// Copyright 2026 the svgcurve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transform declarations and the element-scoped transform stack.

use smallvec::SmallVec;

use crate::{Affine, ImportError};

/// One level of the transform stack.
///
/// Every element pushes exactly one entry, so that closing it pops exactly
/// what opening it pushed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StackEntry {
    /// The element declared a transform.
    Transform(Affine),
    /// The element declared no usable transform.
    NoOp,
}

/// The transforms of all currently open elements, outermost first.
#[derive(Clone, Debug, Default)]
pub struct TransformStack {
    entries: Vec<StackEntry>,
}

impl TransformStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter an element with an optional `transform` attribute.
    ///
    /// An absent or blank declaration pushes a [`StackEntry::NoOp`]. So does a
    /// declaration that fails to parse, in which case the error is returned for
    /// reporting; the stack is left balanced either way.
    ///
    /// # Errors
    ///
    /// [`ImportError::UnsupportedTransformKind`] for transforms other than `matrix`,
    /// `translate` and `scale`, and [`ImportError::MalformedTransform`] for
    /// declarations that do not parse.
    pub fn push(&mut self, declaration: Option<&str>) -> Result<(), ImportError> {
        let Some(declaration) = declaration.map(str::trim).filter(|d| !d.is_empty()) else {
            self.entries.push(StackEntry::NoOp);
            return Ok(());
        };
        match parse_transform(declaration) {
            Ok(affine) => {
                self.entries.push(StackEntry::Transform(affine));
                Ok(())
            }
            Err(e) => {
                self.entries.push(StackEntry::NoOp);
                Err(e)
            }
        }
    }

    /// Leave the innermost element, removing the entry it pushed.
    ///
    /// Returns `None` if there is nothing to pop, which means the element
    /// notifications were not balanced.
    pub fn pop(&mut self) -> Option<StackEntry> {
        let entry = self.entries.pop();
        if entry.is_none() {
            log::warn!("transform stack popped while empty; unbalanced element events");
        }
        entry
    }

    /// Number of open elements.
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// The combined transform of all open elements.
    ///
    /// Applying the result to a point applies the innermost element's transform
    /// first and the outermost one last.
    pub fn compose(&self) -> Affine {
        self.entries
            .iter()
            .fold(Affine::IDENTITY, |acc, entry| match entry {
                StackEntry::Transform(affine) => acc * *affine,
                StackEntry::NoOp => acc,
            })
    }
}

/// Parse the value of a `transform` attribute.
///
/// The supported kinds are `matrix(a, b, c, d, e, f)`, `translate(tx [ty])` and
/// `scale(sx [sy])`. Several may be listed; `"A B"` applies `B` first.
///
/// # Errors
///
/// [`ImportError::UnsupportedTransformKind`] if any listed kind is not supported
/// (`rotate`, `skewX`, `skewY`, ...), [`ImportError::MalformedTransform`] if the
/// declaration does not parse, has the wrong number of arguments, or does not
/// describe a finite transform.
pub fn parse_transform(declaration: &str) -> Result<Affine, ImportError> {
    let malformed = || ImportError::MalformedTransform {
        declaration: declaration.to_string(),
    };
    let items = match parser::transform_list(declaration) {
        Ok(("", items)) => items,
        _ => return Err(malformed()),
    };
    let mut affine = Affine::IDENTITY;
    for item in items {
        let next = match (item.name, item.args.as_slice()) {
            ("matrix", &[a, b, c, d, e, f]) => Affine::new([a, b, c, d, e, f]),
            ("translate", &[tx]) => Affine::translate((tx, 0.0)),
            ("translate", &[tx, ty]) => Affine::translate((tx, ty)),
            ("scale", &[s]) => Affine::scale(s),
            ("scale", &[sx, sy]) => Affine::scale_non_uniform(sx, sy),
            ("matrix" | "translate" | "scale", _) => return Err(malformed()),
            (kind, _) => {
                return Err(ImportError::UnsupportedTransformKind {
                    kind: kind.to_string(),
                })
            }
        };
        affine *= next;
    }
    // nom's `double` reads `nan` and `inf`.
    if !affine.is_finite() {
        return Err(malformed());
    }
    Ok(affine)
}

struct TransformItem<'a> {
    name: &'a str,
    args: SmallVec<[f64; 6]>,
}

mod parser {
    use nom::{
        bytes::complete::tag,
        character::complete::{alpha1, multispace0},
        combinator::{opt, recognize},
        multi::{fold_many0, many0},
        number::complete::double,
        sequence::{preceded, tuple},
        IResult,
    };
    use smallvec::{smallvec, SmallVec};

    use super::TransformItem;

    pub(super) fn transform_list(input: &str) -> IResult<&str, Vec<TransformItem<'_>>> {
        let (input, _) = multispace0(input)?;
        let (input, first) = item(input)?;
        let (input, rest) = many0(preceded(comma_or_ws, item))(input)?;
        let (input, _) = comma_or_ws(input)?;
        let mut items = Vec::with_capacity(rest.len() + 1);
        items.push(first);
        items.extend(rest);
        Ok((input, items))
    }

    fn item(input: &str) -> IResult<&str, TransformItem<'_>> {
        let (input, name) = alpha1(input)?;
        let (input, _) = multispace0(input)?;
        let (input, _) = tag("(")(input)?;
        let (input, _) = multispace0(input)?;
        let (input, args) = arguments(input)?;
        let (input, _) = multispace0(input)?;
        let (input, _) = tag(")")(input)?;
        Ok((input, TransformItem { name, args }))
    }

    fn arguments(input: &str) -> IResult<&str, SmallVec<[f64; 6]>> {
        let (input, first) = double(input)?;
        fold_many0(
            preceded(comma_or_ws, double),
            move || smallvec![first],
            |mut acc: SmallVec<[f64; 6]>, value| {
                acc.push(value);
                acc
            },
        )(input)
    }

    fn comma_or_ws(input: &str) -> IResult<&str, &str> {
        recognize(tuple((multispace0, opt(tag(",")), multispace0)))(input)
    }
}
