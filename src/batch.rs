//! Batch conversion of every slide in a presentation.
//!
//! Slides are converted independently, optionally on a rayon pool, then
//! saved as `<id>.svg` in the output directory in slide order.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::diagnostics::Diagnostic;
use crate::errors::ConvertError;
use crate::geometry::{GeometrySource, ModelGeometry};
use crate::log;
use crate::model::Presentation;
use crate::render::defaults::SLIDE_ID_PREFIX;
use crate::render::{ConvertedSlide, SlideConverter};
use crate::theme::Theme;

/// Batch settings
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Where drawings (and debug dumps) are written
    pub output_dir: PathBuf,
    /// Also write each slide's document model as `slide-NN.json`
    pub debug: bool,
    /// Convert slides on the rayon thread pool
    pub parallel: bool,
}

impl ConvertOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            debug: false,
            parallel: false,
        }
    }
}

/// One saved drawing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSlide {
    pub id: String,
    pub filename: String,
}

/// Outcome of a batch run
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Dataset id: the document name, or the first slide's own id
    pub id: Option<String>,
    /// Model annotation of the first slide
    pub models: Option<String>,
    /// Saved drawings by id, in slide order
    pub saved: Vec<SavedSlide>,
    /// Diagnostics of every slide, in slide order
    pub diagnostics: Vec<Diagnostic>,
}

impl BatchReport {
    fn record(&mut self, slide: &ConvertedSlide) {
        if slide.number == 1 {
            if !slide.id.starts_with(SLIDE_ID_PREFIX) {
                self.id = Some(slide.id.clone());
            }
            self.models = slide.models.clone();
        }
        // A repeated id keeps its first position
        match self.saved.iter_mut().find(|saved| saved.id == slide.id) {
            Some(saved) => saved.filename = slide.filename.clone(),
            None => self.saved.push(SavedSlide {
                id: slide.id.clone(),
                filename: slide.filename.clone(),
            }),
        }
        self.diagnostics.extend(slide.diagnostics.iter().cloned());
    }
}

/// Dataset id derived from a document file name: the text before the first
/// `.`, with spaces replaced by `_`.
pub fn dataset_id_from_name(name: &str) -> String {
    let file_name = Path::new(name)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    file_name
        .split('.')
        .next()
        .unwrap_or_default()
        .replace(' ', "_")
}

/// Read a presentation document model from JSON
pub fn load_presentation(path: &Path) -> Result<Presentation, ConvertError> {
    let text = fs::read_to_string(path).map_err(|source| ConvertError::DocumentRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConvertError::Document {
        path: path.to_path_buf(),
        source,
    })
}

/// Drives the slide converter over a whole presentation
pub struct BatchConverter<'a> {
    presentation: &'a Presentation,
    theme: Theme,
    geometry: &'a dyn GeometrySource,
    options: ConvertOptions,
}

impl<'a> BatchConverter<'a> {
    /// Uses the document model's own theme table
    pub fn new(presentation: &'a Presentation, options: ConvertOptions) -> Self {
        Self {
            presentation,
            theme: Theme::from_slots(&presentation.theme),
            geometry: &ModelGeometry,
            options,
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_geometry(mut self, geometry: &'a dyn GeometrySource) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn slide_count(&self) -> usize {
        self.presentation.slides.len()
    }

    /// Convert one slide (1-based)
    fn convert_slide(&self, number: usize) -> Result<ConvertedSlide, ConvertError> {
        let slide = &self.presentation.slides[number - 1];
        if self.options.debug {
            let dump = self.options.output_dir.join(format!("slide-{number:02}.json"));
            let json = serde_json::to_string_pretty(slide).map_err(|e| ConvertError::Serialize {
                slide: number,
                message: e.to_string(),
            })?;
            fs::write(&dump, json).map_err(|source| ConvertError::Io { path: dump, source })?;
        }

        let converted = SlideConverter::new(
            slide,
            number,
            self.presentation.size(),
            &self.theme,
            self.geometry,
        )
        .convert()?;
        log::info!(
            slide = number,
            id = %converted.id,
            diagnostics = converted.diagnostics.len(),
            "converted slide"
        );
        Ok(converted)
    }

    pub fn run(&self) -> Result<BatchReport, ConvertError> {
        self.run_with_progress(&|_| {})
    }

    /// Convert every slide, calling `progress` with each finished slide number.
    pub fn run_with_progress(
        &self,
        progress: &(dyn Fn(usize) + Sync),
    ) -> Result<BatchReport, ConvertError> {
        fs::create_dir_all(&self.options.output_dir).map_err(|source| ConvertError::Io {
            path: self.options.output_dir.clone(),
            source,
        })?;

        let numbers = 1..=self.slide_count();
        let convert = |number| {
            let converted = self.convert_slide(number);
            progress(number);
            converted
        };
        let slides = if self.options.parallel {
            numbers.into_par_iter().map(convert).collect::<Result<Vec<_>, _>>()?
        } else {
            numbers.map(convert).collect::<Result<Vec<_>, _>>()?
        };

        // In slide order: a repeated id keeps the last slide's drawing
        for slide in &slides {
            slide.save(&self.options.output_dir)?;
        }

        let mut report = BatchReport {
            id: self.presentation.source_name.as_deref().map(dataset_id_from_name),
            ..Default::default()
        };
        for slide in &slides {
            report.record(slide);
        }
        log::info!(
            slides = slides.len(),
            diagnostics = report.diagnostics.len(),
            "presentation converted"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_svg::Svg;

    fn converted(number: usize, id: &str, models: Option<&str>) -> ConvertedSlide {
        ConvertedSlide {
            number,
            id: id.to_string(),
            models: models.map(str::to_string),
            filename: format!("{id}.svg"),
            svg: Svg::default(),
            diagnostics: Vec::new(),
        }
    }

    #[test]
    fn dataset_id_is_the_document_stem() {
        assert_eq!(dataset_id_from_name("Rat heart.v2.pptx"), "Rat_heart");
        assert_eq!(dataset_id_from_name("/maps/body/whole body.json"), "whole_body");
    }

    #[test]
    fn first_slide_id_names_the_dataset() {
        let mut report = BatchReport { id: Some("deck".into()), ..Default::default() };
        report.record(&converted(1, "heart", Some("UBERON:0000948")));
        report.record(&converted(2, "slide-02", Some("ignored")));
        assert_eq!(report.id.as_deref(), Some("heart"));
        assert_eq!(report.models.as_deref(), Some("UBERON:0000948"));
    }

    #[test]
    fn generated_first_slide_id_keeps_the_document_name() {
        let mut report = BatchReport { id: Some("deck".into()), ..Default::default() };
        report.record(&converted(1, "slide-01", None));
        assert_eq!(report.id.as_deref(), Some("deck"));
        assert_eq!(report.models, None);
    }

    #[test]
    fn repeated_ids_keep_their_position() {
        let mut report = BatchReport::default();
        report.record(&converted(1, "a", None));
        report.record(&converted(2, "b", None));
        let mut again = converted(3, "a", None);
        again.filename = "a-again.svg".to_string();
        report.record(&again);

        assert_eq!(
            report.saved,
            vec![
                SavedSlide { id: "a".into(), filename: "a-again.svg".into() },
                SavedSlide { id: "b".into(), filename: "b.svg".into() },
            ]
        );
    }
}
