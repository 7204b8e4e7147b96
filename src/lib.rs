//! Convert presentation slides into flattened SVG drawings.
//!
//! A [`Presentation`] document model is walked slide by slide: every drawable
//! shape becomes one or more `<path>` elements with its group transforms
//! baked into the coordinates, and theme colours, gradients and line styles
//! are resolved into plain SVG paint. Shapes that can't be represented are
//! reported as [`Diagnostic`]s and skipped.

pub mod batch;
pub mod diagnostics;
pub mod errors;
pub mod geometry;
pub mod log;
pub mod manifest;
pub mod model;
pub mod render;
pub mod theme;
pub mod types;

pub use batch::{BatchConverter, BatchReport, ConvertOptions, SavedSlide, load_presentation};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use errors::{ConvertError, ManifestError, ThemeError};
pub use geometry::{GeometrySource, ModelGeometry};
pub use manifest::Manifest;
pub use model::{Presentation, Slide};
pub use render::{ConvertedSlide, SlideConverter};
pub use theme::Theme;

/// Render one slide (1-based) of a presentation to SVG markup, using the
/// document's own theme.
pub fn slide_to_svg(presentation: &Presentation, number: usize) -> Result<String, miette::Report> {
    let slide = number
        .checked_sub(1)
        .and_then(|index| presentation.slides.get(index))
        .ok_or_else(|| {
            miette::miette!(
                "slide {number} out of range (presentation has {})",
                presentation.slides.len()
            )
        })?;
    let theme = Theme::from_slots(&presentation.theme);
    let converted =
        SlideConverter::new(slide, number, presentation.size(), &theme, &ModelGeometry).convert()?;
    Ok(converted.to_xml()?)
}
