//! Session-wide font registration.
//!
//! The registry is a small state machine guarded by a mutex that is never
//! held across an await:
//!
//! - `Idle`: nothing registered; the next caller starts an attempt
//! - `InFlight`: an attempt is running; every caller awaits the same shared
//!   future, so each weight is fetched at most once
//! - `Ready`: the family is registered for the lifetime of the registry
//!
//! A failed attempt puts the registry back to `Idle`, so failures are never
//! cached and the next export retries.

use crate::font::{CachedFontAsset, FontFamily, FontFamilySources, FontWeight};
use folio_traits::{FontFetcher, ResourceError};
use futures::future::{BoxFuture, FutureExt, Shared};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

type RegistrationResult = Result<Arc<FontFamily>, ResourceError>;
type Registration = Shared<BoxFuture<'static, RegistrationResult>>;
type AssetCache = Arc<Mutex<HashMap<String, CachedFontAsset>>>;

#[derive(Debug, Clone, Default)]
pub struct FontRegistryConfig {
    /// Upper bound for a single font fetch. `None` waits indefinitely.
    pub fetch_timeout: Option<Duration>,
}

enum State {
    Idle,
    InFlight {
        attempt: u64,
        registration: Registration,
    },
    Ready(Arc<FontFamily>),
}

struct Inner {
    state: State,
    attempts: u64,
}

pub struct FontRegistry {
    fetcher: Arc<dyn FontFetcher>,
    sources: FontFamilySources,
    config: FontRegistryConfig,
    cache: AssetCache,
    inner: Mutex<Inner>,
}

impl fmt::Debug for FontRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontRegistry")
            .field("fetcher", &self.fetcher.name())
            .field("family", &self.sources.family)
            .field("registered", &self.is_registered())
            .finish()
    }
}

impl FontRegistry {
    pub fn new(fetcher: Arc<dyn FontFetcher>, sources: FontFamilySources) -> Self {
        Self::with_config(fetcher, sources, FontRegistryConfig::default())
    }

    pub fn with_config(
        fetcher: Arc<dyn FontFetcher>,
        sources: FontFamilySources,
        config: FontRegistryConfig,
    ) -> Self {
        Self {
            fetcher,
            sources,
            config,
            cache: Arc::new(Mutex::new(HashMap::new())),
            inner: Mutex::new(Inner {
                state: State::Idle,
                attempts: 0,
            }),
        }
    }

    pub fn sources(&self) -> &FontFamilySources {
        &self.sources
    }

    /// Registers the font family once per registry; safe to call from any
    /// number of concurrent exports.
    ///
    /// # Errors
    ///
    /// Every caller that awaited a failing attempt receives its error. The
    /// registry is reset, so a later call fetches again.
    pub async fn ensure_fonts_registered(&self) -> RegistrationResult {
        let (attempt, registration) = {
            let mut inner = self.lock_inner()?;
            let joined = match &inner.state {
                State::Ready(family) => return Ok(family.clone()),
                State::InFlight {
                    attempt,
                    registration,
                } => Some((*attempt, registration.clone())),
                State::Idle => None,
            };
            match joined {
                Some((attempt, registration)) => {
                    debug!("Joining in-flight font registration #{}", attempt);
                    (attempt, registration)
                }
                None => {
                    inner.attempts += 1;
                    let attempt = inner.attempts;
                    debug!(
                        "Starting font registration #{} for family '{}'",
                        attempt, self.sources.family
                    );
                    let registration = register_family(
                        self.fetcher.clone(),
                        self.sources.clone(),
                        self.cache.clone(),
                        self.config.fetch_timeout,
                    )
                    .boxed()
                    .shared();
                    inner.state = State::InFlight {
                        attempt,
                        registration: registration.clone(),
                    };
                    (attempt, registration)
                }
            }
        };

        let result = registration.await;

        let mut inner = self.lock_inner()?;
        let settles_current =
            matches!(&inner.state, State::InFlight { attempt: current, .. } if *current == attempt);
        if settles_current {
            inner.state = match &result {
                Ok(family) => State::Ready(family.clone()),
                Err(e) => {
                    warn!("Font registration #{} failed, will retry on next use: {}", attempt, e);
                    State::Idle
                }
            };
        }
        result
    }

    pub fn is_registered(&self) -> bool {
        self.inner
            .lock()
            .map(|inner| matches!(inner.state, State::Ready(_)))
            .unwrap_or(false)
    }

    /// The cached asset for `source`, if it has been fetched successfully.
    pub fn cached_asset(&self, source: &str) -> Option<CachedFontAsset> {
        self.cache.lock().ok()?.get(source).cloned()
    }

    /// Number of distinct sources currently cached.
    pub fn cached_len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    fn lock_inner(&self) -> Result<MutexGuard<'_, Inner>, ResourceError> {
        self.inner.lock().map_err(|_| ResourceError::LoadFailed {
            path: self.sources.family.clone(),
            message: "font registry lock poisoned".to_string(),
        })
    }
}

async fn register_family(
    fetcher: Arc<dyn FontFetcher>,
    sources: FontFamilySources,
    cache: AssetCache,
    timeout: Option<Duration>,
) -> RegistrationResult {
    let (regular, bold) = futures::try_join!(
        load_asset(fetcher.as_ref(), &cache, sources.source_for(FontWeight::Regular), FontWeight::Regular, timeout),
        load_asset(fetcher.as_ref(), &cache, sources.source_for(FontWeight::Bold), FontWeight::Bold, timeout),
    )?;
    info!(
        "Registered font family '{}' ({} + {} bytes)",
        sources.family,
        regular.data.len(),
        bold.data.len()
    );
    Ok(Arc::new(FontFamily {
        name: sources.family,
        regular,
        bold,
    }))
}

async fn load_asset(
    fetcher: &dyn FontFetcher,
    cache: &AssetCache,
    source: &str,
    weight: FontWeight,
    timeout: Option<Duration>,
) -> Result<CachedFontAsset, ResourceError> {
    let cached = cache
        .lock()
        .map_err(|_| poisoned_cache(source))?
        .get(source)
        .cloned();
    if let Some(asset) = cached {
        debug!("Font cache hit for {}", source);
        return Ok(CachedFontAsset { weight, ..asset });
    }

    debug!("Fetching {} font from {} via {}", weight, source, fetcher.name());
    let data = match timeout {
        Some(limit) => tokio::time::timeout(limit, fetcher.fetch(source))
            .await
            .map_err(|_| ResourceError::TimedOut(source.to_string()))??,
        None => fetcher.fetch(source).await?,
    };

    let asset = CachedFontAsset::validated(source, weight, data)?;
    cache
        .lock()
        .map_err(|_| poisoned_cache(source))?
        .insert(source.to_string(), asset.clone());
    Ok(asset)
}

fn poisoned_cache(source: &str) -> ResourceError {
    ResourceError::LoadFailed {
        path: source.to_string(),
        message: "font cache lock poisoned".to_string(),
    }
}
