//! Memoization options.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use memorise_cache::CacheConfig;
use memorise_core::key::resolve_key;
use memorise_core::traits::BoundedCache;
use memorise_core::types::ToArgs;

/// Cache handle shared between a memoized function and its callers.
pub type SharedCache<R> = Arc<dyn BoundedCache<R>>;

/// Turns the call's argument value into a cache key.
pub type KeyResolverFn<A, E> = Arc<dyn Fn(&A) -> Result<String, E> + Send + Sync>;

/// Observes hits: `(key, cached value, cache)`.
pub type OnHitFn<R> = Arc<dyn Fn(&str, &R, &dyn BoundedCache<R>) + Send + Sync>;

/// Options for [`memoize`](crate::memoize) and friends.
///
/// Every field is independent:
///
/// - `cache`: reuse an existing cache; capacity and TTL are then ignored
/// - `key_resolver`: replace the default key algorithm
/// - `on_hit`: observe cache hits
/// - `capacity` (default 1000, 0 = unbounded) and `time_to_live` (default
///   none) for the cache created when none is supplied
pub struct MemoizeOptions<A, R, E = Infallible> {
    pub(crate) cache: Option<SharedCache<R>>,
    pub(crate) key_resolver: KeyResolverFn<A, E>,
    pub(crate) on_hit: Option<OnHitFn<R>>,
    pub(crate) config: CacheConfig,
}

impl<A, R, E> MemoizeOptions<A, R, E>
where
    A: ToArgs + 'static,
    R: 'static,
    E: 'static,
{
    /// Default options: fresh 1000-entry cache, no TTL, default key resolver.
    pub fn new() -> Self {
        Self::with_try_key_resolver(|args: &A| Ok(resolve_key(args)))
    }
}

impl<A, R, E> Default for MemoizeOptions<A, R, E>
where
    A: ToArgs + 'static,
    R: 'static,
    E: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A: 'static, R: 'static, E: 'static> MemoizeOptions<A, R, E> {
    /// Options with a custom key resolver. `A` need not implement `ToArgs`.
    pub fn with_key_resolver<K>(resolver: K) -> Self
    where
        K: Fn(&A) -> String + Send + Sync + 'static,
    {
        Self::with_try_key_resolver(move |args: &A| Ok(resolver(args)))
    }

    /// Options with a custom key resolver that can fail.
    ///
    /// A failure is returned to the caller before the cache is consulted.
    pub fn with_try_key_resolver<K>(resolver: K) -> Self
    where
        K: Fn(&A) -> Result<String, E> + Send + Sync + 'static,
    {
        Self {
            cache: None,
            key_resolver: Arc::new(resolver),
            on_hit: None,
            config: CacheConfig::default(),
        }
    }

    /// Replaces the key resolver.
    pub fn key_resolver<K>(self, resolver: K) -> Self
    where
        K: Fn(&A) -> String + Send + Sync + 'static,
    {
        self.try_key_resolver(move |args: &A| Ok(resolver(args)))
    }

    /// Replaces the key resolver with one that can fail.
    pub fn try_key_resolver<K>(mut self, resolver: K) -> Self
    where
        K: Fn(&A) -> Result<String, E> + Send + Sync + 'static,
    {
        self.key_resolver = Arc::new(resolver);
        self
    }
}

impl<A, R: 'static, E> MemoizeOptions<A, R, E> {
    /// Uses `cache` instead of creating one.
    pub fn cache<C>(mut self, cache: Arc<C>) -> Self
    where
        C: BoundedCache<R> + 'static,
    {
        self.cache = Some(cache as SharedCache<R>);
        self
    }

    /// Uses an already type-erased cache, e.g. one taken from another
    /// memoized function.
    pub fn shared_cache(mut self, cache: SharedCache<R>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Registers a hit observer.
    pub fn on_hit<H>(mut self, on_hit: H) -> Self
    where
        H: Fn(&str, &R, &dyn BoundedCache<R>) + Send + Sync + 'static,
    {
        self.on_hit = Some(Arc::new(on_hit));
        self
    }

    /// Sets the capacity of the created cache (0 = unbounded).
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.max_entries = capacity;
        self
    }

    /// Sets the time-to-live of the created cache, at full `Duration`
    /// precision. A zero duration disables hits: every call invokes the target.
    pub fn time_to_live(mut self, ttl: Duration) -> Self {
        self.config = self.config.with_ttl(ttl);
        self
    }

    /// Replaces capacity and time-to-live with `config`.
    pub fn config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the cache configuration used when no cache is supplied.
    pub fn cache_config(&self) -> &CacheConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use memorise_cache::LruTtlCache;

    use super::*;

    #[test]
    fn test_defaults() {
        let options: MemoizeOptions<(u32,), u32> = MemoizeOptions::default();
        assert_eq!(options.cache_config().max_entries, 1000);
        assert_eq!(options.cache_config().ttl(), None);
        assert!(options.cache.is_none());
        assert!(options.on_hit.is_none());
        assert_eq!((options.key_resolver)(&(7,)).unwrap(), "7");
    }

    #[test]
    fn test_builder_overrides() {
        let options = MemoizeOptions::<(u32,), u32>::new()
            .capacity(3)
            .time_to_live(Duration::from_millis(100))
            .key_resolver(|(n,): &(u32,)| format!("{n}-key"))
            .on_hit(|_, _, _| {});
        assert_eq!(options.cache_config().max_entries, 3);
        assert_eq!(
            options.cache_config().ttl(),
            Some(Duration::from_millis(100))
        );
        assert_eq!((options.key_resolver)(&(7,)).unwrap(), "7-key");
        assert!(options.on_hit.is_some());
    }

    #[test]
    fn test_custom_resolver_without_to_args() {
        struct Opaque(u32);
        let options: MemoizeOptions<Opaque, u32> =
            MemoizeOptions::with_key_resolver(|o: &Opaque| o.0.to_string());
        assert_eq!((options.key_resolver)(&Opaque(5)).unwrap(), "5");
    }

    #[test]
    fn test_config_replaces_limits() {
        let config = CacheConfig::default()
            .with_max_entries(7)
            .with_ttl(Duration::from_secs(1));
        let options = MemoizeOptions::<(), u32>::new()
            .capacity(3)
            .config(config.clone());
        assert_eq!(options.cache_config(), &config);
    }

    #[test]
    fn test_supplied_cache() {
        let cache = Arc::new(LruTtlCache::<u32>::new());
        let options = MemoizeOptions::<(), u32>::new().cache(cache);
        assert!(options.cache.is_some());
    }
}
