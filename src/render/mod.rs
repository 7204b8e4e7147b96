//! Slide rendering
//!
//! This module is organized into submodules:
//! - `defaults`: paint fallbacks and naming rules
//! - `transform`: per-shape affine transforms and their composition
//! - `color`: theme colour resolution with luminance/tint/shade
//! - `gradient`: linear and radial gradient reconstruction
//! - `path_builder`: path command emission
//! - `paint`: fill, stroke and dash attributes
//! - `context`: per-slide conversion state
//! - `svg`: SVG document assembly

pub mod color;
pub mod context;
pub mod defaults;
pub mod gradient;
pub mod paint;
pub mod path_builder;
pub mod svg;
pub mod transform;

use std::fs;
use std::path::{Path, PathBuf};

use facet_svg::{Group, Path as SvgPath, Svg, SvgNode};

pub use color::ColorMap;
pub use context::SlideContext;
pub use transform::Transform;

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::errors::ConvertError;
use crate::geometry::GeometrySource;
use crate::log;
use crate::model::{ShapeKind, ShapeNode, Slide};
use crate::theme::Theme;
use crate::types::{Scaler, Size, SizeEmu};

/// Slide id and model annotation read from speaker notes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideAnnotation {
    pub id: Option<String>,
    pub models: Option<String>,
}

/// Parse a notes annotation.
///
/// Only notes starting with `.` are annotations; the rest is split on
/// whitespace and `id(...)` / `models(...)` tokens are picked out.
pub fn parse_notes(text: &str) -> SlideAnnotation {
    let mut annotation = SlideAnnotation::default();
    let Some(markup) = text.strip_prefix('.') else {
        return annotation;
    };
    let (Ok(id_re), Ok(models_re)) = (
        regex_lite::Regex::new(r"^id *\((.*)\)"),
        regex_lite::Regex::new(r"^models *\((.*)\)"),
    ) else {
        return annotation;
    };
    for part in markup.split_whitespace() {
        if let Some(caps) = id_re.captures(part) {
            annotation.id = Some(caps[1].trim().to_string());
        }
        if let Some(caps) = models_re.captures(part) {
            annotation.models = Some(caps[1].trim().to_string());
        }
    }
    annotation
}

/// A converted slide, ready to be saved
#[derive(Debug, Clone)]
pub struct ConvertedSlide {
    /// 1-based slide number
    pub number: usize,
    pub id: String,
    pub models: Option<String>,
    /// `<id>.svg`
    pub filename: String,
    pub svg: Svg,
    pub diagnostics: Vec<Diagnostic>,
}

impl ConvertedSlide {
    pub fn to_xml(&self) -> Result<String, ConvertError> {
        svg::to_xml(&self.svg).map_err(|message| ConvertError::Serialize {
            slide: self.number,
            message,
        })
    }

    /// Write the drawing into `output_dir`, returning its path
    pub fn save(&self, output_dir: &Path) -> Result<PathBuf, ConvertError> {
        let path = output_dir.join(&self.filename);
        let xml = self.to_xml()?;
        fs::write(&path, xml).map_err(|source| ConvertError::Io {
            path: path.clone(),
            source,
        })?;
        log::debug!(slide = self.number, path = %path.display(), "saved slide");
        Ok(path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConverterState {
    Init,
    WalkingTree,
    Finalized,
}

/// Converts one slide's shape tree into a drawing
pub struct SlideConverter<'a> {
    slide: &'a Slide,
    slide_size: SizeEmu,
    scaler: Scaler,
    geometry: &'a dyn GeometrySource,
    ctx: SlideContext,
    state: ConverterState,
}

impl<'a> SlideConverter<'a> {
    pub fn new(
        slide: &'a Slide,
        number: usize,
        slide_size: SizeEmu,
        theme: &Theme,
        geometry: &'a dyn GeometrySource,
    ) -> Self {
        let colors = ColorMap::new(theme, &slide.color_map);
        Self {
            slide,
            slide_size,
            scaler: Scaler::default(),
            geometry,
            ctx: SlideContext::new(number, colors),
            state: ConverterState::Init,
        }
    }

    /// Walk the shape tree and assemble the drawing
    pub fn convert(mut self) -> Result<ConvertedSlide, ConvertError> {
        debug_assert_eq!(self.state, ConverterState::Init);
        let number = self.ctx.slide;
        self.state = ConverterState::WalkingTree;
        log::debug!(slide = number, shapes = self.slide.shapes.len(), "walking shape tree");

        let slide = self.slide;
        let root = Transform::root(&self.scaler);
        let shapes = self.convert_shapes(&slide.shapes, &root)?;

        self.state = ConverterState::Finalized;
        let annotation = slide.notes.as_deref().map(parse_notes).unwrap_or_default();
        let id = annotation
            .id
            .unwrap_or_else(|| format!("{}{:02}", defaults::SLIDE_ID_PREFIX, number));
        let filename = format!("{id}.svg");
        log::debug!(
            slide = number,
            id = %id,
            gradients = self.ctx.gradient_count(),
            diagnostics = self.ctx.diagnostics.len(),
            "slide finalized"
        );

        let svg = svg::build_document(self.scaler.size(self.slide_size), self.ctx.defs, shapes);
        Ok(ConvertedSlide {
            number,
            id,
            models: annotation.models,
            filename,
            svg,
            diagnostics: self.ctx.diagnostics.into_vec(),
        })
    }

    fn convert_shapes(
        &mut self,
        shapes: &[ShapeNode],
        transform: &Transform,
    ) -> Result<Vec<SvgNode>, ConvertError> {
        let mut nodes = Vec::new();
        for shape in shapes {
            match shape.kind {
                ShapeKind::AutoShape | ShapeKind::Freeform | ShapeKind::Connector => {
                    self.convert_drawable(shape, transform, &mut nodes)?;
                }
                ShapeKind::Group => nodes.push(self.convert_group(shape, transform)?),
                ShapeKind::TextBox | ShapeKind::Picture => {}
                ShapeKind::Placeholder | ShapeKind::Table | ShapeKind::Chart | ShapeKind::Other => {
                    self.ctx.diagnostics.push(
                        DiagnosticKind::UnsupportedShape,
                        &shape.name,
                        format!("{:?} shape not processed", shape.kind),
                    );
                }
            }
        }
        Ok(nodes)
    }

    fn convert_group(
        &mut self,
        group: &ShapeNode,
        transform: &Transform,
    ) -> Result<SvgNode, ConvertError> {
        let id = self.ctx.claim_id(svg::id_from_name(&group.name));
        let local = Transform::for_shape(&group.xfrm, group.extent());
        let children = self.convert_shapes(&group.shapes, &(*transform * local))?;
        Ok(SvgNode::G(Group {
            id,
            children,
            ..Default::default()
        }))
    }

    fn convert_drawable(
        &mut self,
        shape: &ShapeNode,
        transform: &Transform,
        nodes: &mut Vec<SvgNode>,
    ) -> Result<(), ConvertError> {
        let paths = match self.geometry.paths(shape) {
            Ok(paths) => paths,
            Err(err) => {
                self.ctx
                    .diagnostics
                    .push(DiagnosticKind::UnsupportedShape, &shape.name, err.to_string());
                return Ok(());
            }
        };

        let mut id = self.ctx.claim_id(svg::id_from_name(&shape.name));
        let mut wrapper = None;
        if id.is_some() && paths.len() > 1 {
            wrapper = Some(Group { id: id.take(), ..Default::default() });
        }

        let mut emitted = Vec::with_capacity(paths.len());
        for path in &paths {
            let ext = shape.extent();
            let bbox = match path.w {
                Some(w) => Size::new(w, path.h.unwrap_or(ext.h)),
                None => ext,
            };
            let effective = *transform * Transform::for_shape(&shape.xfrm, bbox);

            let mut builder = path_builder::PathBuilder::new(effective);
            for command in &path.commands {
                if let Err(err) = builder.push(command) {
                    self.ctx.diagnostics.push(
                        DiagnosticKind::UnsupportedPathCommand,
                        &shape.name,
                        err.to_string(),
                    );
                }
            }

            let mut svg_path = SvgPath {
                id: id.clone(),
                class: Some(defaults::PATH_CLASS.to_string()),
                d: Some(builder.build()),
                fill: Some("none".to_string()),
                ..Default::default()
            };
            paint::apply_fill(&mut svg_path, shape, &mut self.ctx)?;
            paint::apply_stroke(&mut svg_path, shape, &mut self.ctx)?;
            emitted.push(SvgNode::Path(svg_path));
        }

        match wrapper {
            Some(mut group) => {
                group.children = emitted;
                nodes.push(SvgNode::G(group));
            }
            None => nodes.extend(emitted),
        }
        Ok(())
    }
}
