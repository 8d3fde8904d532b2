/// Read-through caching for async lookups.
///
/// Returns the cached value for `$key` when present. Otherwise awaits
/// `$block`, queues the result for a background write with the given TTL and
/// returns it. Errors from the cache read or the block propagate with `?`.
///
/// # Arguments
/// * `$cache`: a [`Cache`](crate::cache::Cache)
/// * `$key`: the [`CacheKey`](crate::cache::CacheKey) to read and write
/// * `$ttl`: time-to-live in seconds
/// * `$block`: future computing the value on a miss
///
/// # Example
/// ```rust,ignore
/// let details: MovieDetails = cached!(self.cache, CacheKey::Details(id), DETAILS_CACHE_TTL, async move {
///     self.get_json(&format!("movie/{}", id), &[]).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(cached) = $cache.get_from_cache(&$key).await? {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&$key, &value, $ttl);
            Ok(value)
        }
    }};
}
