//! Gradient reconstruction.
//!
//! DrawingML describes gradients relative to the filled shape's bounding box
//! and only partially: a linear angle, or a path shape with fill-to and tile
//! rectangles. These are turned into SVG paint servers in
//! `objectBoundingBox` units.

use glam::{DVec2, dvec2};

use facet_svg::{LinearGradient, RadialGradient, Stop, SvgNode};

use super::color::{ColorError, ColorMap};
use super::svg::fmt_num;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::model::{FillDescriptor, GradientFill, GradientPath, RelativeRect, ShapeNode};
use crate::types::Rgb;

/// A reconstructed gradient paint server
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub id: String,
    pub shape: GradientShape,
    /// Sorted by offset
    pub stops: Vec<ResolvedStop>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GradientShape {
    /// Rotation in degrees about the box centre
    Linear { rotation: f64 },
    Radial {
        center: DVec2,
        radius: f64,
        /// Shape rotation in degrees about the box centre
        rotation: f64,
        /// Squash applied so the gradient stays circular on a non-square box
        scale: Option<DVec2>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedStop {
    pub offset: f64,
    pub color: Rgb,
    pub opacity: f64,
}

impl Gradient {
    /// Reconstruct the gradient of `shape`'s fill.
    ///
    /// Returns `Ok(None)` when the gradient shape cannot be expressed; the
    /// reason is recorded in `diagnostics`.
    pub fn reconstruct(
        id: String,
        fill: &GradientFill,
        shape: &ShapeNode,
        colors: &ColorMap,
        diagnostics: &mut Diagnostics,
    ) -> Result<Option<Gradient>, ColorError> {
        let rot = shape.xfrm.rot.0;
        let gradient_shape = match fill.path {
            None => {
                let mut rotation = fill.angle.0;
                if fill.rot_with_shape {
                    rotation += rot;
                }
                GradientShape::Linear { rotation }
            }
            Some(GradientPath::Circle) => match radial(fill, shape, diagnostics) {
                Some(gradient) => gradient,
                None => {
                    diagnostics.push(
                        DiagnosticKind::UnsupportedFill,
                        &shape.name,
                        "radial gradient on a shape with an empty extent ignored",
                    );
                    return Ok(None);
                }
            },
            Some(GradientPath::Rect) => {
                diagnostics.push(
                    DiagnosticKind::UnsupportedFill,
                    &shape.name,
                    "rectangular path gradient ignored",
                );
                return Ok(None);
            }
            Some(GradientPath::Shape) => {
                let detail = serde_json::to_value(FillDescriptor::Gradient(fill.clone()))
                    .unwrap_or_default();
                diagnostics.push_with_detail(
                    DiagnosticKind::UnsupportedFill,
                    &shape.name,
                    "unknown gradient fill",
                    detail,
                );
                return Ok(None);
            }
        };

        let mut stops = fill
            .stops
            .iter()
            .map(|stop| {
                Ok(ResolvedStop {
                    offset: stop.position,
                    color: colors.resolve(&stop.color)?,
                    opacity: stop.color.alpha,
                })
            })
            .collect::<Result<Vec<_>, ColorError>>()?;
        stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));

        Ok(Some(Gradient { id, shape: gradient_shape, stops }))
    }

    /// Paint reference for a `fill` attribute
    pub fn url(&self) -> String {
        format!("url(#{})", self.id)
    }

    pub fn to_node(&self) -> SvgNode {
        let children = self
            .stops
            .iter()
            .map(|stop| {
                SvgNode::Stop(Stop {
                    offset: Some(fmt_num(stop.offset)),
                    stop_color: Some(stop.color.to_hex()),
                    stop_opacity: Some(fmt_num(stop.opacity)),
                })
            })
            .collect();

        match &self.shape {
            GradientShape::Linear { rotation } => SvgNode::LinearGradient(LinearGradient {
                id: Some(self.id.clone()),
                gradient_transform: (*rotation != 0.0)
                    .then(|| rotate(rotation.rem_euclid(360.0))),
                children,
            }),
            GradientShape::Radial { center, radius, rotation, scale } => {
                let mut transforms = Vec::new();
                if *rotation != 0.0 {
                    transforms.push(rotate(*rotation));
                }
                if let Some(scale) = scale {
                    transforms.push(format!("scale({} {})", fmt_num(scale.x), fmt_num(scale.y)));
                }
                SvgNode::RadialGradient(RadialGradient {
                    id: Some(self.id.clone()),
                    cx: Some(fmt_num(center.x)),
                    cy: Some(fmt_num(center.y)),
                    r: Some(fmt_num(*radius)),
                    gradient_transform: (!transforms.is_empty()).then(|| transforms.join(" ")),
                    children,
                })
            }
        }
    }
}

fn rotate(degrees: f64) -> String {
    format!("rotate({} 0.5 0.5)", fmt_num(degrees))
}

/// Circular path gradient.
///
/// The focus comes from the fill-to rectangle, offset by the tile rectangle
/// for sides the fill-to rectangle leaves out. Coordinates are divided by
/// the aspect squash so the later `scale()` restores them.
/// `None` when the shape has no area to centre the gradient in
fn radial(
    fill: &GradientFill,
    shape: &ShapeNode,
    diagnostics: &mut Diagnostics,
) -> Option<GradientShape> {
    let to = fill.fill_to_rect;
    let tile = fill.tile_rect.unwrap_or_default();
    let side = |primary: Option<f64>, opposite: Option<f64>, tile: Option<f64>| {
        primary.unwrap_or_else(|| opposite.unwrap_or(0.0) + tile.unwrap_or(0.0))
    };
    let cx = side(to.l, to.r, tile.l);
    let cy = side(to.t, to.b, tile.t);
    let sx = side(to.r, to.l, tile.r);
    let sy = side(to.b, to.t, tile.b);

    let (w, h) = (shape.extent().w.raw(), shape.extent().h.raw());
    if w == 0.0 || h == 0.0 {
        return None;
    }
    let (scale_x, scale_y) = if w > h {
        (h / w, 1.0)
    } else if w < h {
        (1.0, w / h)
    } else {
        (1.0, 1.0)
    };

    let radius = if fill.tile_rect.as_ref().is_none_or(RelativeRect::is_empty) {
        if (cx, cy) != (0.5, 0.5) && (sx, sy) != (0.5, 0.5) {
            diagnostics.push(
                DiagnosticKind::RadialGradientEdgeCase,
                &shape.name,
                "off-centre radial gradient without a tile rectangle drawn centred",
            );
        }
        1.0
    } else {
        (((cx - sx) / scale_x).powi(2) + ((cy - sy) / scale_y).powi(2)).sqrt()
    };

    Some(GradientShape::Radial {
        center: dvec2(cx / scale_x, cy / scale_y),
        radius,
        rotation: shape.xfrm.rot.0,
        scale: (w != h).then_some(dvec2(scale_x, scale_y)),
    })
}
