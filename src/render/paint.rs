//! Fill and stroke attributes of emitted paths

use facet_svg::Path;

use super::context::SlideContext;
use super::defaults;
use super::gradient::Gradient;
use super::svg::fmt_num;
use crate::diagnostics::DiagnosticKind;
use crate::errors::ConvertError;
use crate::model::{DashStyle, FillDescriptor, LineFill, LineFormat, ShapeKind, ShapeNode};
use crate::types::Emu;

/// Outline dash pattern
#[derive(Debug, Clone, PartialEq)]
pub enum Dash {
    Solid,
    /// `stroke-dasharray` value
    Pattern(String),
    /// Drawn solid
    Unsupported(DashStyle),
}

/// Stroke width in pixels, never thinner than the minimum
pub fn stroke_width(line: &LineFormat) -> f64 {
    line.width
        .unwrap_or(Emu::ZERO)
        .to_points()
        .max(defaults::MIN_STROKE_WIDTH)
        .to_px()
        .0
}

/// Dash pattern scaled by the stroke width `w`
pub fn dash_array(dash: DashStyle, w: f64) -> Dash {
    let pattern = |lengths: &[f64]| {
        Dash::Pattern(
            lengths
                .iter()
                .map(|n| fmt_num(n * w))
                .collect::<Vec<_>>()
                .join(" "),
        )
    };
    match dash {
        DashStyle::Solid => Dash::Solid,
        DashStyle::Dash => pattern(&[4.0]),
        DashStyle::DashDot => pattern(&[4.0, 1.0, 1.0, 1.0]),
        DashStyle::LongDash => pattern(&[4.0, 1.0]),
        DashStyle::SquareDot => pattern(&[2.0, 1.0]),
        other => Dash::Unsupported(other),
    }
}

/// Set `fill` and `opacity` of a path. Connectors are never filled.
pub fn apply_fill(
    path: &mut Path,
    shape: &ShapeNode,
    ctx: &mut SlideContext,
) -> Result<(), ConvertError> {
    if shape.kind == ShapeKind::Connector {
        return Ok(());
    }
    match &shape.fill {
        FillDescriptor::Solid { color } => {
            if let Some(rgb) = ctx.color(&shape.name, color)? {
                path.fill = Some(rgb.to_hex());
                if color.alpha < 1.0 {
                    path.opacity = Some(fmt_num(color.alpha));
                }
            }
        }
        FillDescriptor::Gradient(fill) => {
            let id = ctx.next_gradient_id();
            let colors = &ctx.colors;
            let gradient =
                Gradient::reconstruct(id, fill, shape, colors, &mut ctx.diagnostics);
            if let Some(Some(gradient)) = ctx.check_color(&shape.name, gradient)? {
                path.fill = Some(gradient.url());
                ctx.defs.push(gradient.to_node());
            }
        }
        FillDescriptor::Unspecified => {
            path.fill = Some(defaults::FALLBACK_FILL.to_string());
            path.opacity = Some("1".to_string());
        }
        FillDescriptor::Group => {
            ctx.diagnostics.push(
                DiagnosticKind::UnsupportedFill,
                &shape.name,
                "group fill ignored",
            );
        }
        FillDescriptor::Background => {}
        other @ (FillDescriptor::Pattern | FillDescriptor::Picture) => {
            ctx.diagnostics.push(
                DiagnosticKind::UnsupportedFill,
                &shape.name,
                format!("unsupported fill type `{}`", other.type_name()),
            );
        }
    }
    Ok(())
}

/// Set the stroke attributes of a path
pub fn apply_stroke(
    path: &mut Path,
    shape: &ShapeNode,
    ctx: &mut SlideContext,
) -> Result<(), ConvertError> {
    let line = &shape.line;
    match &line.fill {
        LineFill::Solid { color } => {
            if let Some(rgb) = ctx.color(&shape.name, color)? {
                path.stroke = Some(rgb.to_hex());
                if color.alpha < 1.0 {
                    path.stroke_opacity = Some(fmt_num(color.alpha));
                }
            }
        }
        LineFill::Unspecified => path.stroke = Some(defaults::DEFAULT_STROKE.to_string()),
        LineFill::NoLine => {}
        LineFill::Gradient | LineFill::Pattern => {
            let kind = if matches!(line.fill, LineFill::Gradient) { "gradient" } else { "pattern" };
            ctx.diagnostics.push(
                DiagnosticKind::UnsupportedLineFill,
                &shape.name,
                format!("unsupported line fill type `{kind}`"),
            );
        }
    }

    let width = stroke_width(line);
    path.stroke_width = Some(fmt_num(width));
    if let Some(dash) = line.dash {
        match dash_array(dash, width) {
            Dash::Solid => {}
            Dash::Pattern(pattern) => path.stroke_dasharray = Some(pattern),
            Dash::Unsupported(style) => ctx.diagnostics.push(
                DiagnosticKind::UnsupportedLineStyle,
                &shape.name,
                format!("unsupported line dash style `{style:?}`"),
            ),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColorReference, GradientFill};
    use crate::render::color::ColorMap;
    use crate::theme::{SchemeSlot, Theme};
    use crate::types::{EMU_PER_POINT, Rgb};
    use std::collections::BTreeMap;

    fn context() -> SlideContext {
        let theme = Theme::new().with(SchemeSlot::Accent1, Rgb::new(0x44, 0x72, 0xC4));
        SlideContext::new(2, ColorMap::new(&theme, &BTreeMap::new()))
    }

    fn line(points: f64) -> LineFormat {
        LineFormat::solid(ColorReference::rgb(Rgb::BLACK), Emu(points * EMU_PER_POINT))
    }

    #[test]
    fn thin_lines_are_floored() {
        let px = stroke_width(&line(0.1));
        assert!((px - 0.5 * 96.0 / 72.0).abs() < 1e-12);
        assert_eq!(fmt_num(px), "0.666667");
        assert_eq!(stroke_width(&LineFormat::default()), px);
        assert_eq!(stroke_width(&line(1.5)), 2.0);
    }

    #[test]
    fn dash_dot_pattern() {
        let Dash::Pattern(pattern) = dash_array(DashStyle::DashDot, 2.0) else {
            panic!("expected a dash pattern");
        };
        insta::assert_snapshot!(pattern, @"8 2 2 2");
    }

    #[test]
    fn dash_patterns() {
        assert_eq!(dash_array(DashStyle::Solid, 2.0), Dash::Solid);
        assert_eq!(dash_array(DashStyle::Dash, 2.0), Dash::Pattern("8".into()));
        assert_eq!(dash_array(DashStyle::LongDash, 1.5), Dash::Pattern("6 1.5".into()));
        assert_eq!(dash_array(DashStyle::SquareDot, 1.0), Dash::Pattern("2 1".into()));
        assert_eq!(
            dash_array(DashStyle::SysDash, 1.0),
            Dash::Unsupported(DashStyle::SysDash)
        );
    }

    #[test]
    fn solid_fill_with_alpha() {
        let shape = ShapeNode::new("Box", ShapeKind::AutoShape)
            .with_fill(FillDescriptor::solid(ColorReference::scheme("accent1").with_alpha(0.25)));
        let mut ctx = context();
        let mut path = Path::default();
        apply_fill(&mut path, &shape, &mut ctx).unwrap();
        assert_eq!(path.fill.as_deref(), Some("#4472C4"));
        assert_eq!(path.opacity.as_deref(), Some("0.25"));
    }

    #[test]
    fn missing_fill_falls_back_to_red() {
        let shape = ShapeNode::new("Box", ShapeKind::Freeform);
        let mut ctx = context();
        let mut path = Path::default();
        apply_fill(&mut path, &shape, &mut ctx).unwrap();
        assert_eq!(path.fill.as_deref(), Some("#FF0000"));
        assert_eq!(path.opacity.as_deref(), Some("1"));
    }

    #[test]
    fn connectors_are_not_filled() {
        let shape = ShapeNode::new("Straight Connector 3", ShapeKind::Connector);
        let mut ctx = context();
        let mut path = Path::default();
        apply_fill(&mut path, &shape, &mut ctx).unwrap();
        assert_eq!(path.fill, None);
    }

    #[test]
    fn gradient_fill_registers_a_definition() {
        let shape = ShapeNode::new("Box", ShapeKind::AutoShape).with_fill(
            FillDescriptor::Gradient(GradientFill::default()),
        );
        let mut ctx = context();
        let mut path = Path::default();
        apply_fill(&mut path, &shape, &mut ctx).unwrap();
        apply_fill(&mut path, &shape, &mut ctx).unwrap();
        assert_eq!(path.fill.as_deref(), Some("url(#gradient-2)"));
        assert_eq!(ctx.defs.len(), 2);
        assert_eq!(ctx.gradient_count(), 2);
    }

    #[test]
    fn missing_theme_colour_is_fatal() {
        let shape = ShapeNode::new("Title", ShapeKind::AutoShape)
            .with_fill(FillDescriptor::solid(ColorReference::scheme("accent4")));
        let mut ctx = context();
        let err = apply_fill(&mut Path::default(), &shape, &mut ctx).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::MissingThemeColor { slide: 2, ref shape, ref slot }
                if shape == "Title" && slot == "accent4"
        ));
    }

    #[test]
    fn stroke_defaults_and_diagnostics() {
        let mut ctx = context();

        let mut path = Path::default();
        apply_stroke(&mut path, &ShapeNode::new("a", ShapeKind::AutoShape), &mut ctx).unwrap();
        assert_eq!(path.stroke.as_deref(), Some("#000000"));

        let no_line = ShapeNode::new("b", ShapeKind::AutoShape)
            .with_line(LineFormat { fill: LineFill::NoLine, ..Default::default() });
        let mut path = Path::default();
        apply_stroke(&mut path, &no_line, &mut ctx).unwrap();
        assert_eq!(path.stroke, None);
        assert!(path.stroke_width.is_some());

        let odd = ShapeNode::new("c", ShapeKind::AutoShape)
            .with_line(line(1.0).with_dash(DashStyle::RoundDot));
        apply_stroke(&mut Path::default(), &odd, &mut ctx).unwrap();

        let entries = ctx.diagnostics.into_vec();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, DiagnosticKind::UnsupportedLineStyle);
        assert_eq!(entries[0].shape, "c");
    }
}
