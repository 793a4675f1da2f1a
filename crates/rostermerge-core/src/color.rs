//! Background color representation

use std::fmt;

/// A cell background color.
///
/// Both sources paint shifts with background colors; the empty string,
/// `white`, `#FFF`, and `#FFFFFF` all mean "no color" and must compare
/// equal, so they normalize to [`Color::Default`] at parse time. Color
/// strings that are not hex triplets still take part in equality
/// comparison via [`Color::Named`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Color {
    /// Default/white background
    #[default]
    Default,

    /// RGB color
    Rgb { r: u8, g: u8, b: u8 },

    /// A non-hex color string, kept verbatim for comparison
    Named(String),
}

impl Color {
    /// Create an RGB color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }

    /// Parse a color string as it appears in cell data.
    ///
    /// The white/empty sentinels normalize to [`Color::Default`]; `#RRGGBB`
    /// (with or without the `#`) becomes [`Color::Rgb`]; anything else is
    /// carried as [`Color::Named`]. Never fails: grids are user-edited and
    /// a malformed color is data to compare, not an error.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" | "white" | "#fff" | "#ffffff" => return Color::Default,
            _ => {}
        }
        match Self::from_hex(trimmed) {
            Some(color) => color,
            None => Color::Named(trimmed.to_string()),
        }
    }

    /// Create from a hex string (e.g., "#FF0000" or "FF0000")
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        if (r, g, b) == (255, 255, 255) {
            Some(Color::Default)
        } else {
            Some(Color::Rgb { r, g, b })
        }
    }

    /// Convert to the hex string written back to the grid.
    ///
    /// [`Color::Default`] renders as `#FFFFFF`, matching what the
    /// spreadsheet host expects for an uncolored cell.
    pub fn to_hex(&self) -> String {
        match self {
            Color::Default => "#FFFFFF".to_string(),
            Color::Rgb { r, g, b } => format!("#{:02X}{:02X}{:02X}", r, g, b),
            Color::Named(name) => name.clone(),
        }
    }

    /// Check if this is the default/white background
    pub fn is_default(&self) -> bool {
        matches!(self, Color::Default)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
