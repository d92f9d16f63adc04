// Copyright 2026 the svgcurve Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grouping subpaths into curve containers.

use crate::Subpath;

/// A named group of subpaths that becomes one curve object downstream.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurveContainer {
    /// Name for the curve object, `svg_imported_<n>`.
    pub name: String,
    /// The `id` of the source path element, when containers are per path.
    pub source_id: Option<String>,
    /// The subpaths, in the order they were finalised.
    pub subpaths: Vec<Subpath>,
}

impl CurveContainer {
    fn new(index: usize, source_id: Option<String>) -> Self {
        CurveContainer {
            name: format!("svg_imported_{index}"),
            source_id,
            subpaths: Vec::new(),
        }
    }

    /// Whether any subpath is closed.
    pub fn has_closed_subpaths(&self) -> bool {
        self.subpaths.iter().any(Subpath::is_closed)
    }
}

/// Something that turns curve containers into scene objects.
///
/// This is the seam to a host application's curve API: create one object per
/// container, one spline per subpath, mark closed subpaths cyclic.
pub trait CurveSink {
    /// The error a sink can fail with.
    type Error;

    /// Create the curve object for `container`.
    fn add_curve(&mut self, container: &CurveContainer) -> Result<(), Self::Error>;
}

impl CurveSink for Vec<CurveContainer> {
    type Error = std::convert::Infallible;

    fn add_curve(&mut self, container: &CurveContainer) -> Result<(), Self::Error> {
        self.push(container.clone());
        Ok(())
    }
}

/// The containers produced by an import.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Drawing {
    /// Containers in creation order. None of them is empty.
    pub containers: Vec<CurveContainer>,
}

impl Drawing {
    /// Hand every container to `sink`, in order.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error from the sink.
    pub fn emit<S: CurveSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        for container in &self.containers {
            log::debug!(
                "emitting {} with {} subpaths",
                container.name,
                container.subpaths.len()
            );
            sink.add_curve(container)?;
        }
        Ok(())
    }

    /// Total number of subpaths over all containers.
    pub fn subpath_count(&self) -> usize {
        self.containers.iter().map(|c| c.subpaths.len()).sum()
    }

    /// Whether no geometry was produced.
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}

/// Collects subpaths into containers as path elements are encountered.
#[derive(Clone, Debug)]
pub struct DrawingAssembler {
    separate_paths: bool,
    containers: Vec<CurveContainer>,
}

impl DrawingAssembler {
    /// Create an assembler.
    ///
    /// With `separate_paths` each path element gets its own container; without,
    /// everything goes into a single container for the document.
    pub fn new(separate_paths: bool) -> Self {
        let containers = if separate_paths {
            Vec::new()
        } else {
            vec![CurveContainer::new(0, None)]
        };
        DrawingAssembler {
            separate_paths,
            containers,
        }
    }

    /// A path element starts; its subpaths go to the container returned.
    pub fn begin_path(&mut self, id: Option<&str>) -> &mut CurveContainer {
        if self.separate_paths || self.containers.is_empty() {
            let index = self.containers.len();
            let source_id = id.filter(|_| self.separate_paths).map(str::to_string);
            self.containers.push(CurveContainer::new(index, source_id));
        }
        let container = self.containers.len() - 1;
        &mut self.containers[container]
    }

    /// Append a finalised subpath to the current container.
    pub fn push_subpath(&mut self, subpath: Subpath) {
        if self.containers.is_empty() {
            self.begin_path(None);
        }
        if let Some(container) = self.containers.last_mut() {
            container.subpaths.push(subpath);
        }
    }

    /// Finish, dropping containers that received no subpaths.
    pub fn finish(self) -> Drawing {
        let containers = self
            .containers
            .into_iter()
            .filter(|c| {
                if c.subpaths.is_empty() {
                    log::debug!("dropping empty container {}", c.name);
                }
                !c.subpaths.is_empty()
            })
            .collect();
        Drawing { containers }
    }
}

#[cfg(test)]
mod tests {
    use super::{CurveContainer, CurveSink, DrawingAssembler};
    use crate::{interpret_path, Subpath, TransformStack};

    fn subpath(data: &str) -> Subpath {
        interpret_path(data, &TransformStack::new(), 1.0)
            .subpaths
            .remove(0)
    }

    #[test]
    fn separate_containers() {
        let mut assembler = DrawingAssembler::new(true);
        assembler.begin_path(Some("a"));
        assembler.push_subpath(subpath("M0,0 L1,1"));
        assembler.push_subpath(subpath("M2,2 L3,3"));
        assembler.begin_path(None);
        assembler.begin_path(Some("c"));
        assembler.push_subpath(subpath("M0,0 L1,0 L0,0"));
        let drawing = assembler.finish();

        assert_eq!(drawing.containers.len(), 2);
        assert_eq!(drawing.containers[0].name, "svg_imported_0");
        assert_eq!(drawing.containers[0].source_id.as_deref(), Some("a"));
        assert_eq!(drawing.containers[0].subpaths.len(), 2);
        // The empty middle container still took a number.
        assert_eq!(drawing.containers[1].name, "svg_imported_2");
        assert!(drawing.containers[1].has_closed_subpaths());
        assert_eq!(drawing.subpath_count(), 3);
    }

    #[test]
    fn merged_container() {
        let mut assembler = DrawingAssembler::new(false);
        assembler.begin_path(Some("a"));
        assembler.push_subpath(subpath("M0,0 L1,1"));
        assembler.begin_path(Some("b"));
        assembler.push_subpath(subpath("M2,2 L3,3"));
        let drawing = assembler.finish();

        assert_eq!(drawing.containers.len(), 1);
        assert_eq!(drawing.containers[0].source_id, None);
        assert_eq!(drawing.containers[0].subpaths.len(), 2);

        assert!(DrawingAssembler::new(false).finish().is_empty());
    }

    struct Failing(usize);

    impl CurveSink for Failing {
        type Error = String;

        fn add_curve(&mut self, container: &CurveContainer) -> Result<(), String> {
            if self.0 == 0 {
                return Err(format!("no room for {}", container.name));
            }
            self.0 -= 1;
            Ok(())
        }
    }

    #[test]
    fn emit_in_order_and_stop_on_error() {
        let mut assembler = DrawingAssembler::new(true);
        for id in ["a", "b", "c"] {
            assembler.begin_path(Some(id));
            assembler.push_subpath(subpath("M0,0 L1,1"));
        }
        let drawing = assembler.finish();

        let mut collected: Vec<CurveContainer> = Vec::new();
        drawing.emit(&mut collected).unwrap();
        let ids: Vec<_> = collected.iter().map(|c| c.source_id.as_deref()).collect();
        assert_eq!(ids, vec![Some("a"), Some("b"), Some("c")]);

        let mut sink = Failing(1);
        assert_eq!(
            drawing.emit(&mut sink),
            Err("no room for svg_imported_1".to_string())
        );
    }
}
