/// Returns the cached value for `$key`, or awaits `$block`, queues its
/// result for caching with `$ttl` seconds and returns it.
///
/// Must be used in a function returning `AppResult<_>`; errors from `$block`
/// are propagated with `?`. A failed cache read is logged and treated as a
/// miss.
///
/// ```ignore
/// async fn lookup(&self, title: &str) -> AppResult<PosterLookup> {
///     cached!(self.cache, CacheKey::Poster(title.to_string()), TTL, async move {
///         self.fetch(title).await
///     })
/// }
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        let hit = match $cache.get_from_cache(&key).await {
            Ok(hit) => hit,
            Err(e) => {
                ::tracing::warn!(error = %e, key = %key, "Cache read failed, bypassing cache");
                None
            }
        };
        match hit {
            Some(cached) => Ok(cached),
            None => {
                let value = $block.await?;
                $cache.set_in_background(&key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::{
        db::redis::{create_redis_client, Cache, CacheKey},
        error::{AppError, AppResult},
    };

    async fn lookup(cache: &Cache, calls: &AtomicUsize) -> AppResult<String> {
        crate::cached!(cache, CacheKey::Poster("Heat".to_string()), 60, async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, AppError>("/heat.jpg".to_string())
        })
    }

    async fn failing_lookup(cache: &Cache) -> AppResult<String> {
        crate::cached!(cache, CacheKey::Poster("Ronin".to_string()), 60, async {
            Err::<String, _>(AppError::ExternalApi("TMDB returned 500".to_string()))
        })
    }

    #[tokio::test]
    async fn test_unreachable_cache_falls_through_to_block() {
        let client = create_redis_client("redis://127.0.0.1:1").unwrap();
        let (cache, handle) = Cache::new(client).await;
        let calls = AtomicUsize::new(0);

        let value = lookup(&cache, &calls).await.unwrap();

        assert_eq!(value, "/heat.jpg");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_block_errors_still_propagate() {
        let client = create_redis_client("redis://127.0.0.1:1").unwrap();
        let (cache, handle) = Cache::new(client).await;

        let result = failing_lookup(&cache).await;

        assert!(matches!(result, Err(AppError::ExternalApi(_))));
        handle.shutdown().await;
    }
}
