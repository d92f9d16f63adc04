// Copyright 2026 the svgcurve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Splitting raw path data into command letters and coordinate groups.
//!
//! Any ASCII letter is a token boundary, whether or not it names a supported
//! command. This decides where one command's coordinates end, so it is kept
//! wider than the set of commands [`Command`][crate::Command] accepts. One
//! consequence is that exponent notation (`1e-5`) is not a number here: the
//! `e` becomes a command token of its own.

use std::iter::FusedIterator;

use smallvec::SmallVec;

use crate::ImportError;

/// A token of path data.
#[derive(Clone, Debug, PartialEq)]
pub enum Token<'a> {
    /// A single ASCII letter.
    Command(char),
    /// The coordinate fields between two letters.
    Coordinates(CoordinateGroup<'a>),
}

/// The coordinate fields that follow a command letter, before any numeric parsing.
///
/// A group is never empty when produced by the [`Tokenizer`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CoordinateGroup<'a> {
    fields: SmallVec<[&'a str; 6]>,
}

impl<'a> CoordinateGroup<'a> {
    /// Split a run of text that contains no letters into fields.
    ///
    /// Commas and whitespace separate fields, and a minus sign starts a new field
    /// unless it already begins one, so `"10,20-5"` gives `10`, `20`, `-5`. Text that
    /// cannot be split this way is kept as one trailing field so that numeric parsing
    /// reports it.
    pub fn split(segment: &'a str) -> Self {
        let (rest, mut fields) = parser::fields(segment).unwrap_or((segment, SmallVec::new()));
        let rest = rest.trim_matches(parser::is_separator);
        if !rest.is_empty() {
            fields.push(rest);
        }
        CoordinateGroup { fields }
    }

    /// The raw fields.
    pub fn fields(&self) -> &[&'a str] {
        &self.fields
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the group has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parse every field as a floating point number.
    ///
    /// Integers (`10`), leading signs (`-5`, `+5`) and bare fractions (`.5`) are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::MalformedCoordinateGroup`] naming `letter` for the first
    /// field that is not a number.
    pub fn values(&self, letter: char) -> Result<SmallVec<[f64; 6]>, ImportError> {
        self.fields
            .iter()
            .map(|field| {
                field
                    .parse::<f64>()
                    .map_err(|_| ImportError::MalformedCoordinateGroup {
                        letter,
                        reason: format!("\"{field}\" is not a number"),
                    })
            })
            .collect()
    }
}

/// A lazy iterator over the tokens of a path data string.
#[derive(Clone, Debug)]
pub struct Tokenizer<'a> {
    rest: &'a str,
}

impl<'a> Tokenizer<'a> {
    /// Start tokenizing `data`.
    pub fn new(data: &'a str) -> Self {
        Tokenizer { rest: data }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        while !self.rest.is_empty() {
            // Cannot fail on non-empty input: either a letter or a run without one.
            let (rest, segment) = parser::segment(self.rest).ok()?;
            self.rest = rest;
            match segment {
                parser::Segment::Letter(c) => return Some(Token::Command(c)),
                parser::Segment::Run(run) => {
                    let group = CoordinateGroup::split(run);
                    if !group.is_empty() {
                        return Some(Token::Coordinates(group));
                    }
                }
            }
        }
        None
    }
}

impl FusedIterator for Tokenizer<'_> {}

mod parser {
    use nom::{
        branch::alt,
        bytes::complete::{tag, take_till1, take_while},
        character::complete::satisfy,
        combinator::{map, opt, recognize},
        multi::fold_many0,
        sequence::{pair, preceded},
        IResult,
    };
    use smallvec::SmallVec;

    pub(super) enum Segment<'a> {
        Letter(char),
        Run(&'a str),
    }

    pub(super) fn is_separator(c: char) -> bool {
        c == ',' || c.is_ascii_whitespace()
    }

    /// One letter, or everything up to the next letter.
    pub(super) fn segment(input: &str) -> IResult<&str, Segment<'_>> {
        alt((
            map(satisfy(|c| c.is_ascii_alphabetic()), Segment::Letter),
            map(take_till1(|c: char| c.is_ascii_alphabetic()), Segment::Run),
        ))(input)
    }

    pub(super) fn fields(input: &str) -> IResult<&str, SmallVec<[&str; 6]>> {
        fold_many0(
            preceded(separators, field),
            SmallVec::new,
            |mut acc: SmallVec<[&str; 6]>, field| {
                acc.push(field);
                acc
            },
        )(input)
    }

    fn separators(input: &str) -> IResult<&str, &str> {
        take_while(is_separator)(input)
    }

    fn field(input: &str) -> IResult<&str, &str> {
        recognize(pair(
            opt(tag("-")),
            take_till1(|c: char| c == '-' || is_separator(c)),
        ))(input)
    }
}
