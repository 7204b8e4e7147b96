//! Fatal error types with rich diagnostics using miette
//!
//! Anything that can be reported and skipped is a [`crate::diagnostics::Diagnostic`]
//! instead; the errors here abort the whole run.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

// ============================================================================
// Theme Errors
// ============================================================================

/// Errors that occur while loading the theme colour scheme
#[derive(Error, Diagnostic, Debug)]
pub enum ThemeError {
    #[error("cannot open presentation package {path}")]
    #[diagnostic(code(slidesvg::theme::package))]
    Package {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("presentation package {path} is not a valid zip archive")]
    #[diagnostic(code(slidesvg::theme::archive))]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("presentation package {path} has no theme part")]
    #[diagnostic(
        code(slidesvg::theme::not_found),
        help("a theme part lives under `ppt/theme/` inside the package")
    )]
    NotFound { path: PathBuf },

    #[error("malformed theme XML: {message}")]
    #[diagnostic(code(slidesvg::theme::xml))]
    Xml { message: String },

    #[error("invalid colour `{value}` for theme slot `{slot}`")]
    #[diagnostic(code(slidesvg::theme::invalid_color))]
    InvalidColor { slot: String, value: String },
}

// ============================================================================
// Manifest Errors
// ============================================================================

/// Errors reading or writing a flatmap manifest
#[derive(Error, Diagnostic, Debug)]
pub enum ManifestError {
    #[error("cannot read manifest {path}")]
    #[diagnostic(code(slidesvg::manifest::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write manifest {path}")]
    #[diagnostic(code(slidesvg::manifest::write))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("manifest {path} is not valid JSON")]
    #[diagnostic(code(slidesvg::manifest::json))]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("manifest must be a JSON object")]
    #[diagnostic(code(slidesvg::manifest::not_object))]
    NotObject,

    #[error("manifest `sources` must be a list of objects")]
    #[diagnostic(code(slidesvg::manifest::sources))]
    Sources,

    #[error("manifest has no `slides` source")]
    #[diagnostic(
        code(slidesvg::manifest::no_slides),
        help("add a source with `\"kind\": \"slides\"` pointing at the presentation")
    )]
    NoSlides,
}

// ============================================================================
// Conversion Errors
// ============================================================================

/// Errors that abort a conversion run
#[derive(Error, Diagnostic, Debug)]
pub enum ConvertError {
    #[error("slide {slide}, shape \"{shape}\": theme has no colour `{slot}`")]
    #[diagnostic(
        code(slidesvg::theme::missing_color),
        help("the theme colour scheme is missing a slot, or a colour-map alias points at one")
    )]
    MissingThemeColor {
        slide: usize,
        shape: String,
        slot: String,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Theme(#[from] ThemeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Manifest(#[from] ManifestError),

    #[error("cannot read presentation document {path}")]
    #[diagnostic(code(slidesvg::document::read))]
    DocumentRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid presentation document {path}")]
    #[diagnostic(code(slidesvg::document::json))]
    Document {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot write {path}")]
    #[diagnostic(code(slidesvg::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("slide {slide}: SVG serialization failed: {message}")]
    #[diagnostic(code(slidesvg::render::serialize))]
    Serialize { slide: usize, message: String },
}
