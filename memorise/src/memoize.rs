//! The memoizing wrapper.

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tracing::debug;

use memorise_cache::LruTtlCache;

use crate::options::{KeyResolverFn, MemoizeOptions, OnHitFn, SharedCache};

/// Pending result of a memoized asynchronous call.
///
/// Every caller that hits the same entry gets a clone of the same handle and
/// observes the same outcome, success or failure.
pub type Pending<T> = Shared<BoxFuture<'static, T>>;

type TargetFn<A, R, E> = Arc<dyn Fn(A) -> Result<R, E> + Send + Sync>;

/// A memoized function.
///
/// Built by [`memoize`], [`try_memoize`] or [`memoize_async`]. Each call:
///
/// 1. resolves the key from the arguments (a resolver error is returned as is)
/// 2. on a live entry, returns the stored value and notifies `on_hit`; the
///    target is not invoked
/// 3. otherwise invokes the target, stores an `Ok` value under the key and
///    returns it; an `Err` is returned as is and nothing is stored
///
/// For [`memoize`] and [`try_memoize`] no lock is held while the target runs.
/// Two threads missing the same key at the same moment may both invoke the
/// target; the later store wins. [`memoize_async`] serializes the decision
/// per wrapper, since invoking the target only builds a future, so at most
/// one computation per key is in flight.
pub struct Memoized<A, R, E = Infallible> {
    target: TargetFn<A, R, E>,
    key_resolver: KeyResolverFn<A, E>,
    cache: SharedCache<R>,
    on_hit: Option<OnHitFn<R>>,
    decision: Option<Arc<Mutex<()>>>,
}

impl<A, R, E> Memoized<A, R, E>
where
    R: Clone + Send + 'static,
{
    fn from_parts(target: TargetFn<A, R, E>, options: MemoizeOptions<A, R, E>) -> Self {
        let MemoizeOptions {
            cache,
            key_resolver,
            on_hit,
            config,
        } = options;
        let cache =
            cache.unwrap_or_else(|| Arc::new(LruTtlCache::with_config(config)) as SharedCache<R>);
        Self {
            target,
            key_resolver,
            cache,
            on_hit,
            decision: None,
        }
    }

    fn serialized(mut self) -> Self {
        self.decision = Some(Arc::new(Mutex::new(())));
        self
    }

    /// Calls through the cache, returning the target's error unchanged.
    pub fn try_call(&self, args: A) -> Result<R, E> {
        let key = (self.key_resolver)(&args)?;
        let guard = self.decision.as_deref().map(|decision| decision.lock());

        // Presence is checked separately: a stored value may be `None`, `0`...
        if self.cache.has(&key) {
            if let Some(value) = self.cache.get(&key) {
                drop(guard);
                debug!(key = key.as_str(), "Cache hit");
                if let Some(on_hit) = &self.on_hit {
                    on_hit(&key, &value, self.cache.as_ref());
                }
                return Ok(value);
            }
        }

        debug!(key = key.as_str(), "Cache miss, invoking");

        match (self.target)(args) {
            Ok(value) => {
                self.cache.set(key, value.clone());
                Ok(value)
            }
            Err(err) => {
                debug!(key = key.as_str(), "Call failed, nothing cached");
                Err(err)
            }
        }
    }

    /// Resolves the cache key `args` would use.
    pub fn key_for(&self, args: &A) -> Result<String, E> {
        (self.key_resolver)(args)
    }

    /// Drops the entry for `args`, returning the value if one was live.
    pub fn invalidate(&self, args: &A) -> Result<Option<R>, E> {
        let key = self.key_for(args)?;
        Ok(self.cache.remove(&key))
    }

    /// Returns the backing cache for inspection or manual invalidation.
    pub fn cache(&self) -> &SharedCache<R> {
        &self.cache
    }
}

impl<A, R> Memoized<A, R, Infallible>
where
    R: Clone + Send + 'static,
{
    /// Calls through the cache.
    pub fn call(&self, args: A) -> R {
        match self.try_call(args) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Converts into a plain closure with the target's signature.
    pub fn into_fn(self) -> impl Fn(A) -> R {
        move |args| self.call(args)
    }
}

impl<A, R, E> Clone for Memoized<A, R, E> {
    fn clone(&self) -> Self {
        Self {
            target: Arc::clone(&self.target),
            key_resolver: Arc::clone(&self.key_resolver),
            cache: Arc::clone(&self.cache),
            on_hit: self.on_hit.clone(),
            decision: self.decision.clone(),
        }
    }
}

impl<A, R, E> std::fmt::Debug for Memoized<A, R, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memoized")
            .field("entries", &self.cache.len())
            .field("on_hit", &self.on_hit.is_some())
            .finish()
    }
}

/// Memoizes an infallible function.
///
/// ```rust
/// use memorise::{memoize, MemoizeOptions};
///
/// let square = memoize(|(n,): (u64,)| n * n, MemoizeOptions::new());
/// assert_eq!(square.call((12,)), 144);
/// assert_eq!(square.call((12,)), 144);
/// assert_eq!(square.cache().len(), 1);
/// ```
pub fn memoize<A, R, F>(target: F, options: MemoizeOptions<A, R>) -> Memoized<A, R>
where
    F: Fn(A) -> R + Send + Sync + 'static,
    A: 'static,
    R: Clone + Send + 'static,
{
    Memoized::from_parts(
        Arc::new(move |args: A| Ok::<R, Infallible>(target(args))),
        options,
    )
}

/// Memoizes a fallible function. Only `Ok` results are stored.
pub fn try_memoize<A, R, E, F>(target: F, options: MemoizeOptions<A, R, E>) -> Memoized<A, R, E>
where
    F: Fn(A) -> Result<R, E> + Send + Sync + 'static,
    A: 'static,
    R: Clone + Send + 'static,
    E: 'static,
{
    Memoized::from_parts(Arc::new(target), options)
}

/// Memoizes an asynchronous function.
///
/// The future is wrapped in a [`Pending`] handle and stored as soon as the
/// target is invoked, before it is polled. Calls made before it settles share
/// it, and whatever it settles to, including an `Err`, stays cached until the
/// entry is evicted, expires or is removed.
///
/// Lookup, invocation and store run under a lock held by the wrapper and its
/// clones, so concurrent callers on other threads join the same handle. The
/// target must not call the same memoized function before returning its
/// future; the work inside the future is not covered.
pub fn memoize_async<A, T, F, Fut>(
    target: F,
    options: MemoizeOptions<A, Pending<T>>,
) -> Memoized<A, Pending<T>>
where
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = T> + Send + 'static,
    A: 'static,
    T: Clone + Send + Sync + 'static,
{
    memoize(move |args| target(args).boxed().shared(), options).serialized()
}
