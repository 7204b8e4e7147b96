//! Path data builder.
//!
//! Walks a geometry path's commands, maps every vertex through the shape's
//! effective transform and accumulates SVG path data. The current point is
//! kept in shape-local units because arcs are continued from it there.
//!
//! # Arcs
//!
//! `arcTo` gives radii plus start and swing angles, and continues from the
//! current point. The end point is found by moving from the current point by
//! the difference between the ellipse points at the two angles. The emitted
//! arc always uses `large-arc = 0`, `sweep = 1`, with its x-axis rotation
//! taken from the transform.

use glam::{DVec2, dvec2};
use thiserror::Error;

use super::svg::fmt_num;
use super::transform::Transform;
use crate::model::PathCommand;
use crate::types::{Angle, Emu, Point, PtEmu};

/// A command that could not be emitted; the path continues without it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("unknown path element `{0}`")]
    Unsupported(String),
    #[error("arc has no current point")]
    NoCurrentPoint,
}

/// Point at angle `theta` (radians) on an axis-aligned ellipse centred at
/// the origin, measured the DrawingML way (visual angle, not parametric).
pub fn ellipse_point(a: f64, b: f64, theta: f64) -> DVec2 {
    let a_sin = a * theta.sin();
    let b_cos = b * theta.cos();
    let radius = (a_sin * a_sin + b_cos * b_cos).sqrt();
    if radius == 0.0 {
        return DVec2::ZERO;
    }
    dvec2(a * b_cos / radius, b * a_sin / radius)
}

/// Accumulates the `d` attribute of one output path
#[derive(Debug)]
pub struct PathBuilder {
    transform: Transform,
    data: Vec<String>,
    current: Option<PtEmu>,
    closed: bool,
}

impl PathBuilder {
    pub fn new(transform: Transform) -> Self {
        Self {
            transform,
            data: Vec::new(),
            current: None,
            closed: false,
        }
    }

    /// Emit one geometry command
    pub fn push(&mut self, command: &PathCommand) -> Result<(), PathError> {
        match command {
            PathCommand::MoveTo { pt } => self.move_to(*pt),
            PathCommand::LineTo { pt } => self.line_to(*pt),
            PathCommand::CubicBezTo { pts } => self.curve_to("C", pts),
            PathCommand::QuadBezTo { pts } => self.curve_to("Q", pts),
            PathCommand::ArcTo { w_r, h_r, st_ang, sw_ang } => {
                self.arc_to(*w_r, *h_r, *st_ang, *sw_ang)?
            }
            PathCommand::Close => self.close(),
            PathCommand::Unsupported { element } => {
                return Err(PathError::Unsupported(element.clone()));
            }
            PathCommand::Unknown => return Err(PathError::Unsupported("unknown".to_string())),
        }
        Ok(())
    }

    pub fn move_to(&mut self, pt: PtEmu) {
        self.command("M");
        self.point(pt);
        self.current = Some(pt);
    }

    pub fn line_to(&mut self, pt: PtEmu) {
        self.command("L");
        self.point(pt);
        self.current = Some(pt);
    }

    fn curve_to(&mut self, command: &str, pts: &[PtEmu]) {
        self.command(command);
        for pt in pts {
            self.point(*pt);
            self.current = Some(*pt);
        }
    }

    pub fn arc_to(&mut self, w_r: Emu, h_r: Emu, st_ang: Angle, sw_ang: Angle) -> Result<(), PathError> {
        let current = self.current.ok_or(PathError::NoCurrentPoint)?;
        let (w_r, h_r) = (w_r.raw(), h_r.raw());
        let start = st_ang.to_radians();
        let p1 = ellipse_point(w_r, h_r, start);
        let p2 = ellipse_point(w_r, h_r, start + sw_ang.to_radians());
        let end = Point::new(
            Emu(current.x.raw() - p1.x + p2.x),
            Emu(current.y.raw() - p1.y + p2.y),
        );

        let radii = self.transform.scale_length(w_r, h_r).abs();
        let phi = self.transform.rotate_angle(0.0).to_degrees();
        self.command("A");
        self.number(radii.x);
        self.number(radii.y);
        self.number(phi);
        self.data.push("0".to_string());
        self.data.push("1".to_string());
        self.point(end);
        self.current = Some(end);
        Ok(())
    }

    pub fn close(&mut self) {
        self.command("Z");
        self.closed = true;
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The accumulated path data
    pub fn build(self) -> String {
        self.data.join(" ")
    }

    fn command(&mut self, command: &str) {
        self.data.push(command.to_string());
    }

    fn point(&mut self, pt: PtEmu) {
        let p = self.transform.transform_point(pt);
        self.number(p.x);
        self.number(p.y);
    }

    fn number(&mut self, value: f64) {
        self.data.push(fmt_num(value));
    }
}
