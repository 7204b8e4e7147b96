//! Non-fatal conversion diagnostics.
//!
//! Unsupported input never aborts a slide. Each occurrence is recorded as a
//! [`Diagnostic`] and handed back to the caller alongside the output.

use std::fmt;

use serde::Serialize;

use crate::log;

/// What kind of input could not be converted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Fill or gradient shape that cannot be painted; the paint is omitted
    UnsupportedFill,
    /// Path command that was skipped
    UnsupportedPathCommand,
    /// Dash style drawn as a solid line
    UnsupportedLineStyle,
    /// Outline paint that cannot be drawn
    UnsupportedLineFill,
    /// Shape kind or preset geometry with no output
    UnsupportedShape,
    /// Off-centre radial gradient without a tile rectangle
    RadialGradientEdgeCase,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::UnsupportedFill => "unsupported fill",
            DiagnosticKind::UnsupportedPathCommand => "unsupported path command",
            DiagnosticKind::UnsupportedLineStyle => "unsupported line style",
            DiagnosticKind::UnsupportedLineFill => "unsupported line fill",
            DiagnosticKind::UnsupportedShape => "unsupported shape",
            DiagnosticKind::RadialGradientEdgeCase => "radial gradient edge case",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded condition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// 1-based slide number
    pub slide: usize,
    /// Name of the shape being converted
    pub shape: String,
    pub message: String,
    /// Raw input attached for inspection (e.g. an unrecognised fill)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slide {}, shape \"{}\": {}", self.slide, self.shape, self.message)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({detail})")?;
        }
        Ok(())
    }
}

/// Per-slide diagnostic sink
#[derive(Debug, Default)]
pub struct Diagnostics {
    slide: usize,
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(slide: usize) -> Self {
        Self { slide, entries: Vec::new() }
    }

    pub fn slide(&self) -> usize {
        self.slide
    }

    pub fn push(&mut self, kind: DiagnosticKind, shape: &str, message: impl Into<String>) {
        self.record(kind, shape, message.into(), None);
    }

    pub fn push_with_detail(
        &mut self,
        kind: DiagnosticKind,
        shape: &str,
        message: impl Into<String>,
        detail: serde_json::Value,
    ) {
        self.record(kind, shape, message.into(), Some(detail));
    }

    fn record(
        &mut self,
        kind: DiagnosticKind,
        shape: &str,
        message: String,
        detail: Option<serde_json::Value>,
    ) {
        log::warn!(slide = self.slide, shape = %shape, kind = %kind, "{}", message);
        self.entries.push(Diagnostic {
            kind,
            slide: self.slide,
            shape: shape.to_string(),
            message,
            detail,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_slide_and_shape() {
        let mut diagnostics = Diagnostics::new(3);
        diagnostics.push(DiagnosticKind::UnsupportedLineStyle, "Line 4", "dash style `sys_dash`");
        diagnostics.push_with_detail(
            DiagnosticKind::UnsupportedFill,
            "Shape 2",
            "gradient path `shape`",
            serde_json::json!({ "type": "gradient" }),
        );

        let entries = diagnostics.into_vec();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].slide, 3);
        assert_eq!(entries[0].to_string(), "slide 3, shape \"Line 4\": dash style `sys_dash`");
        assert_eq!(
            entries[1].to_string(),
            "slide 3, shape \"Shape 2\": gradient path `shape` ({\"type\":\"gradient\"})"
        );
    }
}
