//! Conversion context - per-slide state while walking the shape tree

use std::collections::HashSet;

use facet_svg::SvgNode;

use super::color::{ColorError, ColorMap};
use super::defaults;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::errors::ConvertError;
use crate::log;
use crate::model::ColorReference;
use crate::types::Rgb;

/// Mutable state of one slide's conversion
pub struct SlideContext {
    /// 1-based slide number
    pub slide: usize,
    /// Colour table for this slide
    pub colors: ColorMap,
    /// Gradients collected for `<defs>`, in creation order
    pub defs: Vec<SvgNode>,
    /// Non-fatal conditions seen so far
    pub diagnostics: Diagnostics,
    /// Gradient fills seen so far
    gradient_count: usize,
    /// Element ids already given to shapes and groups
    used_ids: HashSet<String>,
}

impl SlideContext {
    pub fn new(slide: usize, colors: ColorMap) -> Self {
        Self {
            slide,
            colors,
            defs: Vec::new(),
            diagnostics: Diagnostics::new(slide),
            gradient_count: 0,
            used_ids: HashSet::new(),
        }
    }

    /// Reserve an element id. Only its first claimant gets it; later
    /// shapes with the same name are emitted without an id.
    pub fn claim_id(&mut self, id: Option<String>) -> Option<String> {
        let id = id?;
        if self.used_ids.insert(id.clone()) {
            Some(id)
        } else {
            log::debug!(slide = self.slide, id = %id, "repeated element id dropped");
            None
        }
    }

    /// Id for the next gradient fill (`gradient-1`, `gradient-2`, ...)
    pub fn next_gradient_id(&mut self) -> String {
        self.gradient_count += 1;
        format!("{}{}", defaults::GRADIENT_ID_PREFIX, self.gradient_count)
    }

    pub fn gradient_count(&self) -> usize {
        self.gradient_count
    }

    /// Resolve a colour for `shape`.
    ///
    /// A missing theme slot aborts the run; an unsupported colour kind is
    /// recorded and yields `None`.
    pub fn color(&mut self, shape: &str, color: &ColorReference) -> Result<Option<Rgb>, ConvertError> {
        let resolved = self.colors.resolve(color);
        self.check_color(shape, resolved)
    }

    /// Sort a colour resolution failure into fatal or recorded
    pub fn check_color<T>(
        &mut self,
        shape: &str,
        resolved: Result<T, ColorError>,
    ) -> Result<Option<T>, ConvertError> {
        match resolved {
            Ok(value) => Ok(Some(value)),
            Err(ColorError::MissingSlot(slot)) => Err(ConvertError::MissingThemeColor {
                slide: self.slide,
                shape: shape.to_string(),
                slot,
            }),
            Err(err @ ColorError::Unsupported(_)) => {
                self.diagnostics.push(DiagnosticKind::UnsupportedFill, shape, err.to_string());
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use std::collections::BTreeMap;

    fn context() -> SlideContext {
        SlideContext::new(1, ColorMap::new(&Theme::new(), &BTreeMap::new()))
    }

    #[test]
    fn ids_are_given_out_once() {
        let mut ctx = context();
        assert_eq!(ctx.claim_id(Some("Heart".into())).as_deref(), Some("Heart"));
        assert_eq!(ctx.claim_id(Some("Heart".into())), None);
        assert_eq!(ctx.claim_id(None), None);
        assert_eq!(ctx.claim_id(Some("Lung".into())).as_deref(), Some("Lung"));
    }

    #[test]
    fn gradient_ids_count_up() {
        let mut ctx = context();
        assert_eq!(ctx.next_gradient_id(), "gradient-1");
        assert_eq!(ctx.next_gradient_id(), "gradient-2");
        assert_eq!(ctx.gradient_count(), 2);
    }
}
