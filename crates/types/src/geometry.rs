//! Page geometry: units, paper formats, orientation and the resolved
//! [`PageGeometry`] every renderer works in (PDF points).
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Length unit in which margins and custom page formats are expressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Pt,
    #[default]
    Mm,
    Cm,
    In,
    Px,
}

impl Unit {
    /// Number of PDF points in one of this unit.
    pub fn points_per_unit(self) -> f32 {
        match self {
            Unit::Pt => 1.0,
            Unit::Mm => 72.0 / 25.4,
            Unit::Cm => 72.0 / 2.54,
            Unit::In => 72.0,
            // CSS pixels at 96 dpi
            Unit::Px => 0.75,
        }
    }

    pub fn to_pt(self, value: f32) -> f32 {
        value * self.points_per_unit()
    }

    pub fn from_pt(self, value: f32) -> f32 {
        value / self.points_per_unit()
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pt" => Ok(Unit::Pt),
            "mm" => Ok(Unit::Mm),
            "cm" => Ok(Unit::Cm),
            "in" => Ok(Unit::In),
            "px" => Ok(Unit::Px),
            other => Err(format!("Unknown unit: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait" | "p" => Ok(Orientation::Portrait),
            "landscape" | "l" => Ok(Orientation::Landscape),
            other => Err(format!("Unknown orientation: {}", other)),
        }
    }
}

/// Paper format. `Custom` dimensions are portrait width/height in the
/// export's [`Unit`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageFormat {
    A3,
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    Custom { width: f32, height: f32 },
}

impl PageFormat {
    /// Portrait size in points.
    pub fn size_pt(self, unit: Unit) -> Size {
        match self {
            PageFormat::A3 => Size::new(841.89, 1190.55),
            PageFormat::A4 => Size::new(595.28, 841.89),
            PageFormat::A5 => Size::new(419.53, 595.28),
            PageFormat::Letter => Size::new(612.0, 792.0),
            PageFormat::Legal => Size::new(612.0, 1008.0),
            PageFormat::Custom { width, height } => {
                Size::new(unit.to_pt(width), unit.to_pt(height))
            }
        }
    }
}

impl FromStr for PageFormat {
    type Err = String;

    /// Accepts a named format (`a4`, `letter`, ...) or `<width>x<height>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "a3" => Ok(PageFormat::A3),
            "a4" => Ok(PageFormat::A4),
            "a5" => Ok(PageFormat::A5),
            "letter" => Ok(PageFormat::Letter),
            "legal" => Ok(PageFormat::Legal),
            other => {
                let (w, h) = other
                    .split_once('x')
                    .ok_or_else(|| format!("Unknown page format: {}", other))?;
                let width = w
                    .trim()
                    .parse::<f32>()
                    .map_err(|e| format!("Invalid page width: {}", e))?;
                let height = h
                    .trim()
                    .parse::<f32>()
                    .map_err(|e| format!("Invalid page height: {}", e))?;
                Ok(PageFormat::Custom { width, height })
            }
        }
    }
}

impl fmt::Display for PageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageFormat::A3 => write!(f, "a3"),
            PageFormat::A4 => write!(f, "a4"),
            PageFormat::A5 => write!(f, "a5"),
            PageFormat::Letter => write!(f, "letter"),
            PageFormat::Legal => write!(f, "legal"),
            PageFormat::Custom { width, height } => write!(f, "{}x{}", width, height),
        }
    }
}

/// A page size and uniform margin, all in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageGeometry {
    pub fn new(width: f32, height: f32, margin: f32) -> Self {
        Self {
            width,
            height,
            margin,
        }
    }

    pub fn from_format(format: PageFormat, orientation: Orientation, unit: Unit, margin: f32) -> Self {
        let portrait = format.size_pt(unit);
        let (width, height) = match orientation {
            Orientation::Portrait => (portrait.width, portrait.height),
            Orientation::Landscape => (portrait.height, portrait.width),
        };
        Self::new(width, height, unit.to_pt(margin))
    }

    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    pub fn printable_height(&self) -> f32 {
        self.height - 2.0 * self.margin
    }

    /// The area inside the margins, with `y` measured from the top edge.
    pub fn printable_area(&self) -> Rect {
        Rect::new(
            self.margin,
            self.margin,
            self.content_width(),
            self.printable_height(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_conversion() {
        assert_eq!(Unit::Pt.to_pt(10.0), 10.0);
        assert_eq!(Unit::In.to_pt(1.0), 72.0);
        assert!((Unit::Mm.to_pt(25.4) - 72.0).abs() < 1e-3);
        assert!((Unit::Mm.from_pt(Unit::Mm.to_pt(10.0)) - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_landscape_swaps_dimensions() {
        let portrait = PageGeometry::from_format(PageFormat::A4, Orientation::Portrait, Unit::Pt, 0.0);
        let landscape = PageGeometry::from_format(PageFormat::A4, Orientation::Landscape, Unit::Pt, 0.0);
        assert_eq!(portrait.width, landscape.height);
        assert_eq!(portrait.height, landscape.width);
    }

    #[test]
    fn test_custom_format_uses_unit() {
        let geometry = PageGeometry::from_format(
            PageFormat::Custom { width: 1.0, height: 2.0 },
            Orientation::Portrait,
            Unit::In,
            0.5,
        );
        assert_eq!(geometry.width, 72.0);
        assert_eq!(geometry.height, 144.0);
        assert_eq!(geometry.margin, 36.0);
        assert_eq!(geometry.printable_height(), 72.0);
        assert_eq!(geometry.content_width(), 0.0);
    }

    #[test]
    fn test_page_format_from_str() {
        assert_eq!("A4".parse::<PageFormat>().unwrap(), PageFormat::A4);
        assert_eq!(
            "100x200".parse::<PageFormat>().unwrap(),
            PageFormat::Custom { width: 100.0, height: 200.0 }
        );
        assert!("tabloid".parse::<PageFormat>().is_err());
    }
}
