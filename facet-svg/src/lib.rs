//! Facet-derived types for SVG serialization and parsing.
//!
//! Only the elements a flattened slide drawing needs are modelled: nested
//! groups, paths, and the gradient paint servers kept in `<defs>`. Numeric
//! attributes are carried as preformatted strings so the producer controls
//! precision.
//!
//! # Example
//!
//! ```rust
//! use facet_svg::{Path, Svg, SvgNode, facet_xml};
//!
//! let svg = Svg {
//!     xmlns: Some(facet_svg::SVG_NS.to_string()),
//!     width: Some("100".to_string()),
//!     height: Some("100".to_string()),
//!     children: vec![SvgNode::Path(Path {
//!         d: Some("M 0 0 L 10 10".to_string()),
//!         ..Default::default()
//!     })],
//!     ..Default::default()
//! };
//! let text = facet_xml::to_string(&svg).unwrap();
//! assert!(text.contains("<path"));
//! ```

use facet::Facet;
use facet_xml as xml;

/// SVG namespace URI
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Root SVG element
#[derive(Facet, Debug, Clone, Default)]
#[facet(xml::ns_all = "http://www.w3.org/2000/svg")]
pub struct Svg {
    #[facet(xml::attribute)]
    pub xmlns: Option<String>,
    #[facet(xml::attribute)]
    pub width: Option<String>,
    #[facet(xml::attribute)]
    pub height: Option<String>,
    #[facet(xml::attribute, rename = "viewBox")]
    pub view_box: Option<String>,
    #[facet(xml::elements)]
    pub children: Vec<SvgNode>,
}

/// Any SVG node a slide drawing can contain
#[derive(Facet, Debug, Clone)]
#[facet(xml::ns_all = "http://www.w3.org/2000/svg")]
#[repr(u8)]
pub enum SvgNode {
    #[facet(rename = "g")]
    G(Group),
    #[facet(rename = "defs")]
    Defs(Defs),
    #[facet(rename = "path")]
    Path(Path),
    #[facet(rename = "linearGradient")]
    LinearGradient(LinearGradient),
    #[facet(rename = "radialGradient")]
    RadialGradient(RadialGradient),
    #[facet(rename = "stop")]
    Stop(Stop),
}

impl SvgNode {
    /// Child nodes of container elements; empty for leaves.
    pub fn children(&self) -> &[SvgNode] {
        match self {
            SvgNode::G(g) => &g.children,
            SvgNode::Defs(d) => &d.children,
            SvgNode::LinearGradient(l) => &l.children,
            SvgNode::RadialGradient(r) => &r.children,
            SvgNode::Path(_) | SvgNode::Stop(_) => &[],
        }
    }
}

/// SVG group element (`<g>`)
#[derive(Facet, Debug, Clone, Default)]
#[facet(xml::ns_all = "http://www.w3.org/2000/svg")]
pub struct Group {
    #[facet(xml::attribute)]
    pub id: Option<String>,
    #[facet(xml::attribute)]
    pub class: Option<String>,
    #[facet(xml::attribute)]
    pub transform: Option<String>,
    #[facet(xml::elements)]
    pub children: Vec<SvgNode>,
}

/// SVG defs element (`<defs>`)
#[derive(Facet, Debug, Clone, Default)]
#[facet(xml::ns_all = "http://www.w3.org/2000/svg")]
pub struct Defs {
    #[facet(xml::elements)]
    pub children: Vec<SvgNode>,
}

/// SVG path element (`<path>`)
#[derive(Facet, Debug, Clone, Default)]
#[facet(xml::ns_all = "http://www.w3.org/2000/svg")]
pub struct Path {
    #[facet(xml::attribute)]
    pub id: Option<String>,
    #[facet(xml::attribute)]
    pub class: Option<String>,
    #[facet(xml::attribute)]
    pub d: Option<String>,
    #[facet(xml::attribute)]
    pub fill: Option<String>,
    #[facet(xml::attribute)]
    pub opacity: Option<String>,
    #[facet(xml::attribute)]
    pub stroke: Option<String>,
    #[facet(xml::attribute, rename = "stroke-opacity")]
    pub stroke_opacity: Option<String>,
    #[facet(xml::attribute, rename = "stroke-width")]
    pub stroke_width: Option<String>,
    #[facet(xml::attribute, rename = "stroke-dasharray")]
    pub stroke_dasharray: Option<String>,
}

/// SVG linear gradient paint server (`<linearGradient>`)
#[derive(Facet, Debug, Clone, Default)]
#[facet(xml::ns_all = "http://www.w3.org/2000/svg")]
pub struct LinearGradient {
    #[facet(xml::attribute)]
    pub id: Option<String>,
    #[facet(xml::attribute, rename = "gradientTransform")]
    pub gradient_transform: Option<String>,
    #[facet(xml::elements)]
    pub children: Vec<SvgNode>,
}

/// SVG radial gradient paint server (`<radialGradient>`)
#[derive(Facet, Debug, Clone, Default)]
#[facet(xml::ns_all = "http://www.w3.org/2000/svg")]
pub struct RadialGradient {
    #[facet(xml::attribute)]
    pub id: Option<String>,
    #[facet(xml::attribute)]
    pub cx: Option<String>,
    #[facet(xml::attribute)]
    pub cy: Option<String>,
    #[facet(xml::attribute)]
    pub r: Option<String>,
    #[facet(xml::attribute, rename = "gradientTransform")]
    pub gradient_transform: Option<String>,
    #[facet(xml::elements)]
    pub children: Vec<SvgNode>,
}

/// Gradient stop (`<stop>`)
#[derive(Facet, Debug, Clone, Default)]
#[facet(xml::ns_all = "http://www.w3.org/2000/svg")]
pub struct Stop {
    #[facet(xml::attribute)]
    pub offset: Option<String>,
    #[facet(xml::attribute, rename = "stop-color")]
    pub stop_color: Option<String>,
    #[facet(xml::attribute, rename = "stop-opacity")]
    pub stop_opacity: Option<String>,
}

/// Walk a node list depth-first, calling `visit` for every node.
pub fn walk<'a>(nodes: &'a [SvgNode], visit: &mut dyn FnMut(&'a SvgNode)) {
    for node in nodes {
        visit(node);
        walk(node.children(), visit);
    }
}

// Re-export facet_xml for convenience
pub use facet_xml;
