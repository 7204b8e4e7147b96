//! SVG generation

use facet_svg::{Defs, Svg, SvgNode, facet_xml};

use super::defaults;
use crate::types::{Px, Size};

/// Assemble a slide drawing: `<defs>` with the gradients, then the shapes.
pub fn build_document(size: Size<Px>, defs: Vec<SvgNode>, shapes: Vec<SvgNode>) -> Svg {
    let mut children = Vec::with_capacity(shapes.len() + 1);
    children.push(SvgNode::Defs(Defs { children: defs }));
    children.extend(shapes);
    Svg {
        xmlns: Some(facet_svg::SVG_NS.to_string()),
        width: Some(fmt_num(size.w.0)),
        height: Some(fmt_num(size.h.0)),
        view_box: None,
        children,
    }
}

/// Serialize a drawing to XML text
pub fn to_xml(svg: &Svg) -> Result<String, String> {
    facet_xml::to_string(svg).map_err(|e| format!("XML serialization error: {}", e))
}

/// Element id for a shape name, or `None` for auto-generated and
/// deprecated names.
pub fn id_from_name(name: &str) -> Option<String> {
    if name.is_empty()
        || defaults::EXCLUDED_NAME_MARKUP.contains(&name)
        || defaults::EXCLUDED_NAME_PREFIXES
            .iter()
            .any(|prefix| name.starts_with(prefix))
    {
        return None;
    }
    Some(encode_id(name))
}

/// Encode a name as an id that vector editors keep intact: letters and
/// digits pass through, whitespace becomes `_`, anything else `_xHH_`.
pub fn encode_id(name: &str) -> String {
    let mut id = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            id.push(c);
        } else if matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c') {
            id.push('_');
        } else {
            id.push_str(&format!("_x{:02X}_", c as u32));
        }
    }
    id
}

/// Format a number with 6 significant figures, trailing zeros trimmed.
pub(crate) fn fmt_num(value: f64) -> String {
    fmt_num_precision(value, 6)
}

/// Format a number with specified significant figures, trailing zeros trimmed.
fn fmt_num_precision(value: f64, sig_figs: i32) -> String {
    // Rounding noise from the transforms
    if value.abs() < 1e-9 {
        return "0".to_string();
    }

    // Round to specified significant figures
    let abs_val = value.abs();
    let magnitude = abs_val.log10().floor() as i32;
    let scale = 10_f64.powi(sig_figs - 1 - magnitude);
    let rounded = (value * scale).round() / scale;

    // Format with enough decimal places, then trim
    let decimals = (sig_figs - 1 - magnitude).max(0) as usize;
    let s = format!("{:.prec$}", rounded, prec = decimals);
    if !s.contains('.') {
        return s;
    }
    let s = s.trim_end_matches('0');
    let s = s.trim_end_matches('.');
    s.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Px;
    use facet_svg::{Path, walk};

    #[test]
    fn numbers_are_short() {
        assert_eq!(fmt_num(960.0), "960");
        assert_eq!(fmt_num(0.5), "0.5");
        assert_eq!(fmt_num(2.0 / 3.0), "0.666667");
        assert_eq!(fmt_num(-12.25), "-12.25");
        assert_eq!(fmt_num(6.1e-16), "0");
        assert_eq!(fmt_num(1_234_567.0), "1234570");
    }

    #[test]
    fn default_names_have_no_id() {
        assert_eq!(id_from_name("Freeform 12"), None);
        assert_eq!(id_from_name("Group 7"), None);
        assert_eq!(id_from_name("Oval 3"), None);
        assert_eq!(id_from_name(".siblings"), None);
        assert_eq!(id_from_name(""), None);
        assert_eq!(id_from_name("Rectangle 4").as_deref(), Some("Rectangle_4"));
    }

    #[test]
    fn names_are_encoded_for_editors() {
        assert_eq!(encode_id(".id(heart) models(UBERON:0000948)"),
            "_x2E_id_x28_heart_x29__models_x28_UBERON_x3A_0000948_x29_");
        assert_eq!(encode_id("naïve"), "na_xEF_ve");
    }

    #[test]
    fn document_has_defs_first() {
        let svg = build_document(
            Size::new(Px(960.0), Px(720.0)),
            Vec::new(),
            vec![SvgNode::Path(Path::default())],
        );
        assert_eq!(svg.width.as_deref(), Some("960"));
        assert_eq!(svg.height.as_deref(), Some("720"));
        assert!(matches!(svg.children[0], SvgNode::Defs(_)));

        let mut paths = 0;
        walk(&svg.children, &mut |node| {
            if matches!(node, SvgNode::Path(_)) {
                paths += 1;
            }
        });
        assert_eq!(paths, 1);
    }

    #[test]
    fn serializes_to_svg_markup() {
        let svg = build_document(Size::new(Px(10.0), Px(10.0)), Vec::new(), Vec::new());
        let xml = to_xml(&svg).unwrap();
        assert!(xml.contains("<svg"));
        assert!(xml.contains("width=\"10\""));
    }
}
