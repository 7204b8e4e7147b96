//! Default paint and naming settings

use crate::types::Points;

/// Thinnest stroke ever rendered
pub const MIN_STROKE_WIDTH: Points = Points(0.5);

/// Paint for shapes that declare no fill, so they stay visible
pub const FALLBACK_FILL: &str = "#FF0000";

/// Outline colour when a line declares no paint
pub const DEFAULT_STROKE: &str = "#000000";

/// Class attached to every emitted path
pub const PATH_CLASS: &str = "non-scaling-stroke";

/// Auto-generated shape names that never become element ids
pub const EXCLUDED_NAME_PREFIXES: [&str; 3] = ["Freeform", "Group", "Oval"];

/// Deprecated name markup
pub const EXCLUDED_NAME_MARKUP: [&str; 1] = [".siblings"];

/// Prefix of generated slide ids
pub const SLIDE_ID_PREFIX: &str = "slide-";

/// Prefix of generated gradient ids
pub const GRADIENT_ID_PREFIX: &str = "gradient-";
