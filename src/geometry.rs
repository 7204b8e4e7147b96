//! Geometry extraction boundary.
//!
//! A [`GeometrySource`] turns a shape's geometry description into path
//! command lists in shape-local units. [`ModelGeometry`] uses the paths the
//! document reader already extracted and falls back to a small table of
//! preset shapes.

use thiserror::Error;

use crate::model::{GeometryPath, PathCommand, ShapeNode};
use crate::types::{Angle, Emu, pemu};

/// Failure to produce paths for a shape
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("preset geometry `{0}` is not supported")]
    UnknownPreset(String),
}

/// Supplies the local path lists of a shape
pub trait GeometrySource: Sync {
    fn paths(&self, shape: &ShapeNode) -> Result<Vec<GeometryPath>, GeometryError>;
}

/// Geometry read straight off the document model
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelGeometry;

impl GeometrySource for ModelGeometry {
    fn paths(&self, shape: &ShapeNode) -> Result<Vec<GeometryPath>, GeometryError> {
        if !shape.geometry.paths.is_empty() {
            return Ok(shape.geometry.paths.clone());
        }
        match shape.geometry.preset.as_deref() {
            Some(name) => preset_paths(name, shape.extent().w, shape.extent().h)
                .ok_or_else(|| GeometryError::UnknownPreset(name.to_string())),
            None => Ok(Vec::new()),
        }
    }
}

/// Paths for a preset geometry of the given extent, at default adjust values.
pub fn preset_paths(name: &str, w: Emu, h: Emu) -> Option<Vec<GeometryPath>> {
    let (w, h) = (w.raw(), h.raw());
    let move_to = |x, y| PathCommand::MoveTo { pt: pemu(x, y) };
    let line_to = |x, y| PathCommand::LineTo { pt: pemu(x, y) };

    let commands = match name {
        "rect" => vec![
            move_to(0.0, 0.0),
            line_to(w, 0.0),
            line_to(w, h),
            line_to(0.0, h),
            PathCommand::Close,
        ],
        "ellipse" => {
            let quarter = |st_ang| PathCommand::ArcTo {
                w_r: Emu(w / 2.0),
                h_r: Emu(h / 2.0),
                st_ang: Angle(st_ang),
                sw_ang: Angle(90.0),
            };
            vec![
                move_to(0.0, h / 2.0),
                quarter(180.0),
                quarter(270.0),
                quarter(0.0),
                quarter(90.0),
                PathCommand::Close,
            ]
        }
        "line" | "straightConnector1" => vec![move_to(0.0, 0.0), line_to(w, h)],
        "triangle" => vec![
            move_to(0.0, h),
            line_to(w / 2.0, 0.0),
            line_to(w, h),
            PathCommand::Close,
        ],
        "rtTriangle" => vec![
            move_to(0.0, h),
            line_to(0.0, 0.0),
            line_to(w, h),
            PathCommand::Close,
        ],
        "diamond" => vec![
            move_to(0.0, h / 2.0),
            line_to(w / 2.0, 0.0),
            line_to(w, h / 2.0),
            line_to(w / 2.0, h),
            PathCommand::Close,
        ],
        _ => return None,
    };
    Some(vec![GeometryPath::new(commands)])
}
