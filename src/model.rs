//! Document model consumed from the presentation reader.
//!
//! A [`Presentation`] is the already-parsed form of a slide deck: slide
//! size, the theme colour table, and one shape tree per slide. It is
//! deserialized from JSON so any OOXML reader can hand it over.
//!
//! Shapes are a strictly owned tree; groups own their children.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Angle, Emu, PtEmu, Rgb, Size, SizeEmu};

/// A parsed presentation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Presentation {
    /// Slide width
    pub width: Emu,
    /// Slide height
    pub height: Emu,
    /// File name of the originating deck, used for the default dataset id
    #[serde(default)]
    pub source_name: Option<String>,
    /// Theme colour scheme (slot name → `RRGGBB`)
    #[serde(default)]
    pub theme: BTreeMap<String, Rgb>,
    #[serde(default)]
    pub slides: Vec<Slide>,
}

impl Presentation {
    pub fn size(&self) -> SizeEmu {
        Size::new(self.width, self.height)
    }
}

/// One slide
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Slide {
    #[serde(default)]
    pub shapes: Vec<ShapeNode>,
    /// Speaker-notes text
    #[serde(default)]
    pub notes: Option<String>,
    /// Slide master colour-key aliases (`bg1` → `lt1`, ...), each looked up
    /// in the theme directly
    #[serde(default)]
    pub color_map: BTreeMap<String, String>,
}

/// A shape or group in a slide's shape tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeNode {
    pub name: String,
    pub kind: ShapeKind,
    #[serde(default)]
    pub xfrm: Xfrm,
    #[serde(default)]
    pub geometry: Geometry,
    #[serde(default)]
    pub fill: FillDescriptor,
    #[serde(default)]
    pub line: LineFormat,
    /// Children (groups only)
    #[serde(default)]
    pub shapes: Vec<ShapeNode>,
}

impl ShapeNode {
    /// A shape of the given kind with an empty geometry and default paint
    pub fn new(name: impl Into<String>, kind: ShapeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            xfrm: Xfrm::default(),
            geometry: Geometry::default(),
            fill: FillDescriptor::default(),
            line: LineFormat::default(),
            shapes: Vec::new(),
        }
    }

    pub fn with_xfrm(mut self, xfrm: Xfrm) -> Self {
        self.xfrm = xfrm;
        self
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_fill(mut self, fill: FillDescriptor) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_line(mut self, line: LineFormat) -> Self {
        self.line = line;
        self
    }

    pub fn with_children(mut self, shapes: Vec<ShapeNode>) -> Self {
        self.shapes = shapes;
        self
    }

    /// Placed size of the shape
    pub fn extent(&self) -> SizeEmu {
        self.xfrm.ext
    }
}

/// Shape kinds as reported by the document reader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    AutoShape,
    Freeform,
    Connector,
    Group,
    TextBox,
    Picture,
    Placeholder,
    Table,
    Chart,
    #[serde(other)]
    Other,
}

/// Two-dimensional transform parameters (`a:xfrm` / `p:grpSpPr/a:xfrm`)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Xfrm {
    #[serde(default)]
    pub off: PtEmu,
    #[serde(default)]
    pub ext: SizeEmu,
    #[serde(default)]
    pub ch_off: Option<PtEmu>,
    #[serde(default)]
    pub ch_ext: Option<SizeEmu>,
    /// Clockwise rotation
    #[serde(default)]
    pub rot: Angle,
    #[serde(default)]
    pub flip_h: bool,
    #[serde(default)]
    pub flip_v: bool,
}

impl Xfrm {
    pub fn placed(off: PtEmu, ext: SizeEmu) -> Self {
        Self { off, ext, ..Default::default() }
    }

    pub fn with_child_space(mut self, ch_off: PtEmu, ch_ext: SizeEmu) -> Self {
        self.ch_off = Some(ch_off);
        self.ch_ext = Some(ch_ext);
        self
    }

    pub fn rotated(mut self, rot: f64) -> Self {
        self.rot = Angle(rot);
        self
    }

    pub fn flipped(mut self, flip_h: bool, flip_v: bool) -> Self {
        self.flip_h = flip_h;
        self.flip_v = flip_v;
        self
    }
}

/// Shape outline description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Preset geometry name (`rect`, `ellipse`, ...)
    #[serde(default)]
    pub preset: Option<String>,
    /// Pre-extracted path lists (custom geometry or expanded presets)
    #[serde(default)]
    pub paths: Vec<GeometryPath>,
}

impl Geometry {
    pub fn preset(name: impl Into<String>) -> Self {
        Self { preset: Some(name.into()), paths: Vec::new() }
    }

    pub fn paths(paths: Vec<GeometryPath>) -> Self {
        Self { preset: None, paths }
    }
}

/// One path of a shape's geometry, in shape-local units
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryPath {
    /// Path coordinate-space width; the shape extent when absent
    #[serde(default)]
    pub w: Option<Emu>,
    /// Path coordinate-space height; the shape extent when absent
    #[serde(default)]
    pub h: Option<Emu>,
    pub commands: Vec<PathCommand>,
}

impl GeometryPath {
    pub fn new(commands: Vec<PathCommand>) -> Self {
        Self { w: None, h: None, commands }
    }

    pub fn with_size(mut self, w: Emu, h: Emu) -> Self {
        self.w = Some(w);
        self.h = Some(h);
        self
    }
}

/// A drawing command of a geometry path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo { pt: PtEmu },
    LineTo { pt: PtEmu },
    CubicBezTo { pts: [PtEmu; 3] },
    QuadBezTo { pts: [PtEmu; 2] },
    /// Elliptical arc continuing from the current point
    ArcTo { w_r: Emu, h_r: Emu, st_ang: Angle, sw_ang: Angle },
    Close,
    /// An element the reader recognised but has no drawing meaning for
    Unsupported { element: String },
    #[serde(other)]
    Unknown,
}

/// Shape interior paint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FillDescriptor {
    /// No fill element at all
    #[default]
    #[serde(rename = "none")]
    Unspecified,
    Solid { color: ColorReference },
    Gradient(GradientFill),
    /// Inherits the enclosing group's fill
    Group,
    /// Explicit no-fill / slide background
    Background,
    Pattern,
    Picture,
}

impl FillDescriptor {
    pub fn solid(color: ColorReference) -> Self {
        FillDescriptor::Solid { color }
    }

    /// Short name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            FillDescriptor::Unspecified => "none",
            FillDescriptor::Solid { .. } => "solid",
            FillDescriptor::Gradient(_) => "gradient",
            FillDescriptor::Group => "group",
            FillDescriptor::Background => "background",
            FillDescriptor::Pattern => "pattern",
            FillDescriptor::Picture => "picture",
        }
    }
}

fn one() -> f64 {
    1.0
}

/// A colour as written in the document, before theme resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorReference {
    pub value: ColorValue,
    #[serde(default = "one")]
    pub lum_mod: f64,
    #[serde(default)]
    pub lum_off: f64,
    #[serde(default = "one")]
    pub sat_mod: f64,
    #[serde(default)]
    pub tint: f64,
    #[serde(default = "one")]
    pub shade: f64,
    #[serde(default = "one")]
    pub alpha: f64,
}

/// Base colour of a [`ColorReference`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorValue {
    Rgb(Rgb),
    /// Theme scheme slot (`accent1`, `bg1`, ...)
    Scheme(String),
    /// A colour kind that cannot be resolved (preset, HSL, system)
    Unsupported(String),
}

impl ColorReference {
    pub fn new(value: ColorValue) -> Self {
        Self {
            value,
            lum_mod: 1.0,
            lum_off: 0.0,
            sat_mod: 1.0,
            tint: 0.0,
            shade: 1.0,
            alpha: 1.0,
        }
    }

    pub fn rgb(rgb: Rgb) -> Self {
        Self::new(ColorValue::Rgb(rgb))
    }

    pub fn scheme(slot: impl Into<String>) -> Self {
        Self::new(ColorValue::Scheme(slot.into()))
    }

    pub fn with_lum(mut self, lum_mod: f64, lum_off: f64) -> Self {
        self.lum_mod = lum_mod;
        self.lum_off = lum_off;
        self
    }

    pub fn with_sat_mod(mut self, sat_mod: f64) -> Self {
        self.sat_mod = sat_mod;
        self
    }

    pub fn with_tint(mut self, tint: f64) -> Self {
        self.tint = tint;
        self
    }

    pub fn with_shade(mut self, shade: f64) -> Self {
        self.shade = shade;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// True when luminance/saturation modulation would change the colour
    pub fn is_modulated(&self) -> bool {
        self.lum_mod != 1.0 || self.lum_off != 0.0 || self.sat_mod != 1.0
    }
}

/// Gradient fill (`a:gradFill`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradientFill {
    /// Linear gradient angle
    #[serde(default)]
    pub angle: Angle,
    #[serde(default)]
    pub rot_with_shape: bool,
    /// Path gradient shape; linear when absent
    #[serde(default)]
    pub path: Option<GradientPath>,
    #[serde(default)]
    pub fill_to_rect: RelativeRect,
    #[serde(default)]
    pub tile_rect: Option<RelativeRect>,
    #[serde(default)]
    pub stops: Vec<GradientStop>,
}

/// Shape of a path gradient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientPath {
    Circle,
    Rect,
    Shape,
}

/// Rectangle given as insets from each side, as fractions of the bounding box
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RelativeRect {
    #[serde(default)]
    pub l: Option<f64>,
    #[serde(default)]
    pub t: Option<f64>,
    #[serde(default)]
    pub r: Option<f64>,
    #[serde(default)]
    pub b: Option<f64>,
}

impl RelativeRect {
    pub fn is_empty(&self) -> bool {
        self.l.is_none() && self.t.is_none() && self.r.is_none() && self.b.is_none()
    }
}

/// One gradient stop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Offset along the gradient in `[0, 1]`
    pub position: f64,
    pub color: ColorReference,
}

/// Shape outline (`a:ln`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineFormat {
    #[serde(default)]
    pub fill: LineFill,
    #[serde(default)]
    pub width: Option<Emu>,
    #[serde(default)]
    pub dash: Option<DashStyle>,
}

impl LineFormat {
    pub fn solid(color: ColorReference, width: Emu) -> Self {
        Self { fill: LineFill::Solid { color }, width: Some(width), dash: None }
    }

    pub fn with_dash(mut self, dash: DashStyle) -> Self {
        self.dash = Some(dash);
        self
    }
}

/// Outline paint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LineFill {
    /// No outline paint given; drawn in the default colour
    #[default]
    Unspecified,
    Solid { color: ColorReference },
    /// Explicitly not stroked
    NoLine,
    Gradient,
    Pattern,
}

/// Preset outline dash styles (`a:prstDash`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashStyle {
    Solid,
    Dash,
    DashDot,
    LongDash,
    SquareDot,
    RoundDot,
    LongDashDot,
    LongDashDotDot,
    SysDash,
    SysDashDot,
    SysDashDotDot,
    #[serde(other)]
    Other,
}
