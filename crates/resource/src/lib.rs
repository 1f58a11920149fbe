//! Font loading for the folio export engine.
//!
//! ## Fetchers
//!
//! - [`FilesystemFontFetcher`]: fonts below a base directory
//! - `HttpFontFetcher`: remote fonts (feature `http`, on by default)
//! - [`InMemoryFontFetcher`]: re-exported from folio-traits
//!
//! ## Registry
//!
//! [`FontRegistry`] owns the font cache for a session and guarantees that
//! concurrent exports share a single registration attempt.

mod filesystem;
mod font;
#[cfg(feature = "http")]
mod http;
mod registry;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

pub use filesystem::FilesystemFontFetcher;
pub use font::{CachedFontAsset, FontFamily, FontFamilySources, FontWeight};
#[cfg(feature = "http")]
pub use http::HttpFontFetcher;
pub use registry::{FontRegistry, FontRegistryConfig};

pub use folio_traits::{FontFetcher, InMemoryFontFetcher, ResourceError, SharedResourceData};
