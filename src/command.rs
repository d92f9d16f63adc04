// Copyright 2026 the svgcurve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The supported path commands.

use crate::ImportError;

/// A supported path command.
///
/// Every other ASCII letter in path data is reported as
/// [`ImportError::UnsupportedCommand`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// `M`: start a new subpath at an absolute point.
    MoveTo,
    /// `m`: start a new subpath relative to the current anchor.
    MoveToRel,
    /// `L`: straight line to an absolute point.
    LineTo,
    /// `l`: straight line relative to the current anchor.
    LineToRel,
    /// `C`: cubic Bézier with absolute control points and endpoint.
    CurveTo,
    /// `c`: cubic Bézier with all three pairs relative to the current anchor.
    CurveToRel,
    /// `z`, `Z`: close the current subpath.
    ClosePath,
}

impl Command {
    /// Look up the command for a letter.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::UnsupportedCommand`] for any letter that is not one of
    /// `M m L l C c z Z`.
    pub fn from_letter(letter: char) -> Result<Command, ImportError> {
        match letter {
            'M' => Ok(Command::MoveTo),
            'm' => Ok(Command::MoveToRel),
            'L' => Ok(Command::LineTo),
            'l' => Ok(Command::LineToRel),
            'C' => Ok(Command::CurveTo),
            'c' => Ok(Command::CurveToRel),
            'z' | 'Z' => Ok(Command::ClosePath),
            _ => Err(ImportError::UnsupportedCommand { letter }),
        }
    }

    /// The canonical letter for this command.
    pub fn letter(self) -> char {
        match self {
            Command::MoveTo => 'M',
            Command::MoveToRel => 'm',
            Command::LineTo => 'L',
            Command::LineToRel => 'l',
            Command::CurveTo => 'C',
            Command::CurveToRel => 'c',
            Command::ClosePath => 'z',
        }
    }

    /// Number of coordinate pairs consumed by one repetition of this command.
    pub fn arity(self) -> usize {
        match self {
            Command::MoveTo | Command::MoveToRel | Command::LineTo | Command::LineToRel => 1,
            Command::CurveTo | Command::CurveToRel => 3,
            Command::ClosePath => 0,
        }
    }

    /// Whether coordinates are offsets from the last absolute anchor.
    pub fn is_relative(self) -> bool {
        matches!(
            self,
            Command::MoveToRel | Command::LineToRel | Command::CurveToRel
        )
    }

    /// The command that further coordinate pairs in the same group stand for.
    ///
    /// Extra pairs after a moveto are linetos; every other command repeats itself.
    pub fn repeated(self) -> Command {
        match self {
            Command::MoveTo => Command::LineTo,
            Command::MoveToRel => Command::LineToRel,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Command;
    use crate::ImportError;

    #[test]
    fn supported_letters() {
        for c in ['M', 'm', 'L', 'l', 'C', 'c', 'z', 'Z'] {
            assert!(Command::from_letter(c).is_ok(), "{c} should be supported");
        }
        assert_eq!(Command::from_letter('Z'), Ok(Command::ClosePath));
    }

    #[test]
    fn unsupported_letters() {
        for c in ['A', 'a', 'Q', 'q', 'H', 'h', 'V', 'v', 'S', 's', 'T', 't', 'e', 'x'] {
            assert_eq!(
                Command::from_letter(c),
                Err(ImportError::UnsupportedCommand { letter: c })
            );
        }
    }

    #[test]
    fn repetition() {
        assert_eq!(Command::MoveTo.repeated(), Command::LineTo);
        assert_eq!(Command::MoveToRel.repeated(), Command::LineToRel);
        assert_eq!(Command::CurveToRel.repeated(), Command::CurveToRel);
        assert_eq!(Command::CurveTo.arity(), 3);
        assert!(Command::CurveToRel.is_relative());
        assert!(!Command::CurveTo.is_relative());
    }
}
