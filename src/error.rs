// Copyright 2026 the svgcurve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error and diagnostic types.

use std::{error::Error as StdError, fmt};

/// A problem found while interpreting path data or a transform declaration.
///
/// Every kind except [`MalformedCoordinateGroup`][ImportError::MalformedCoordinateGroup] is
/// recovered from locally: the offending command or declaration is skipped and the import
/// continues. A malformed coordinate group discards the subpath being built.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImportError {
    /// A path command letter outside the supported set (arcs, quadratics, shorthands, ...).
    UnsupportedCommand {
        /// The command letter as written.
        letter: char,
    },
    /// A transform kind that is not `matrix`, `translate` or `scale`.
    UnsupportedTransformKind {
        /// The transform name as written, e.g. `rotate`.
        kind: String,
    },
    /// A transform declaration that could not be parsed.
    MalformedTransform {
        /// The full declaration.
        declaration: String,
    },
    /// A coordinate field that is not a number, or a group whose size does not fit its command.
    MalformedCoordinateGroup {
        /// The command the group belongs to.
        letter: char,
        /// What was wrong with it.
        reason: String,
    },
    /// A line or curve with no current point to start from.
    MissingMoveTo {
        /// The command letter.
        letter: char,
    },
}

impl ImportError {
    /// Whether this error discards the subpath under construction.
    pub fn is_fatal_for_subpath(&self) -> bool {
        matches!(self, ImportError::MalformedCoordinateGroup { .. })
    }
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::UnsupportedCommand { letter } => {
                write!(f, "Unsupported path command \"{letter}\"")
            }
            ImportError::UnsupportedTransformKind { kind } => {
                write!(f, "Unsupported transform \"{kind}\"")
            }
            ImportError::MalformedTransform { declaration } => {
                write!(f, "Unable to parse transform \"{declaration}\"")
            }
            ImportError::MalformedCoordinateGroup { letter, reason } => {
                write!(f, "Malformed coordinates for \"{letter}\": {reason}")
            }
            ImportError::MissingMoveTo { letter } => {
                write!(f, "\"{letter}\" has no current point, expected a moveto first")
            }
        }
    }
}

impl StdError for ImportError {}

/// An [`ImportError`] together with the element it was found in.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    /// The `id` attribute of the element, if it had one.
    pub element_id: Option<String>,
    /// What went wrong.
    pub error: ImportError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.element_id {
            Some(id) => write!(f, "{id}: {}", self.error),
            None => write!(f, "{}", self.error),
        }
    }
}

/// A failure that stops the whole import.
#[derive(Debug)]
pub enum DocumentError {
    /// The markup is not well-formed.
    Xml(quick_xml::Error),
    /// An attribute could not be read or unescaped.
    Attribute(String),
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::Xml(e) => write!(f, "Error when parsing XML: {e}"),
            DocumentError::Attribute(msg) => write!(f, "Invalid attribute: {msg}"),
        }
    }
}

impl StdError for DocumentError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            DocumentError::Xml(e) => Some(e),
            DocumentError::Attribute(_) => None,
        }
    }
}

impl From<quick_xml::Error> for DocumentError {
    fn from(e: quick_xml::Error) -> Self {
        DocumentError::Xml(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let e = ImportError::UnsupportedCommand { letter: 'A' };
        assert_eq!(e.to_string(), "Unsupported path command \"A\"");

        let d = Diagnostic {
            element_id: Some("path42".into()),
            error: ImportError::UnsupportedTransformKind {
                kind: "rotate".into(),
            },
        };
        assert_eq!(d.to_string(), "path42: Unsupported transform \"rotate\"");
    }

    #[test]
    fn only_malformed_groups_are_fatal() {
        assert!(ImportError::MalformedCoordinateGroup {
            letter: 'C',
            reason: "x".into()
        }
        .is_fatal_for_subpath());
        assert!(!ImportError::UnsupportedCommand { letter: 'Q' }.is_fatal_for_subpath());
        assert!(!ImportError::MissingMoveTo { letter: 'L' }.is_fatal_for_subpath());
    }
}
