use folio_traits::{ResourceError, SharedResourceData};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Regular 400 and bold 700 Roboto TTFs from the fontsource CDN.
pub const DEFAULT_REGULAR_URL: &str =
    "https://cdn.jsdelivr.net/fontsource/fonts/roboto@latest/latin-400-normal.ttf";
pub const DEFAULT_BOLD_URL: &str =
    "https://cdn.jsdelivr.net/fontsource/fonts/roboto@latest/latin-700-normal.ttf";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Regular,
    Bold,
}

impl FontWeight {
    pub fn numeric(self) -> u16 {
        match self {
            FontWeight::Regular => 400,
            FontWeight::Bold => 700,
        }
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontWeight::Regular => write!(f, "regular"),
            FontWeight::Bold => write!(f, "bold"),
        }
    }
}

/// Where the weights of the report font family come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontFamilySources {
    pub family: String,
    pub regular: String,
    pub bold: String,
}

impl Default for FontFamilySources {
    fn default() -> Self {
        Self {
            family: "Roboto".to_string(),
            regular: DEFAULT_REGULAR_URL.to_string(),
            bold: DEFAULT_BOLD_URL.to_string(),
        }
    }
}

impl FontFamilySources {
    pub fn new(family: impl Into<String>, regular: impl Into<String>, bold: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            regular: regular.into(),
            bold: bold.into(),
        }
    }

    pub fn source_for(&self, weight: FontWeight) -> &str {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }
}

/// A fetched and validated font binary.
#[derive(Debug, Clone)]
pub struct CachedFontAsset {
    pub source_url: String,
    pub weight: FontWeight,
    pub data: SharedResourceData,
}

impl CachedFontAsset {
    /// Checks that `data` parses as an OpenType/TrueType face.
    pub fn validated(
        source_url: &str,
        weight: FontWeight,
        data: SharedResourceData,
    ) -> Result<Self, ResourceError> {
        ttf_parser::Face::parse(&data, 0).map_err(|e| {
            ResourceError::InvalidFormat(format!("{} ({} weight): {}", source_url, weight, e))
        })?;
        Ok(Self {
            source_url: source_url.to_string(),
            weight,
            data,
        })
    }
}

/// The complete family a report is rendered with.
#[derive(Debug, Clone)]
pub struct FontFamily {
    pub name: String,
    pub regular: CachedFontAsset,
    pub bold: CachedFontAsset,
}

impl FontFamily {
    pub fn asset(&self, weight: FontWeight) -> &CachedFontAsset {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }
}
