//! Page data cache with a revalidation window
//!
//! Posts are kept per slug together with the instant they were fetched.
//! Within the window an entry is served as is. Past the window it is still
//! served, and one background refresh per slug is started. A slug that is not
//! cached is fetched inline, and only found posts are stored.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::content::{ContentStore, Post};
use crate::error::Result;

/// How a lookup was answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Served from cache within the window
    Fresh,
    /// Served from cache past the window, refresh scheduled
    Stale,
    /// Fetched from the store during the request
    Miss,
}

/// A cache answer
#[derive(Debug, Clone)]
pub struct Lookup {
    pub post: Option<Arc<Post>>,
    pub freshness: Freshness,
}

struct CacheEntry {
    post: Arc<Post>,
    fetched_at: Instant,
    refreshing: bool,
}

/// Stale-while-revalidate cache in front of a content store
pub struct PageCache {
    store: Arc<dyn ContentStore>,
    window: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl PageCache {
    pub fn new(store: Arc<dyn ContentStore>, window: Duration) -> Arc<Self> {
        Arc::new(Self {
            store,
            window,
            entries: RwLock::new(HashMap::new()),
        })
    }

    /// Look up a post by slug
    pub async fn get(self: &Arc<Self>, slug: &str) -> Result<Lookup> {
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(slug) {
                if entry.fetched_at.elapsed() < self.window {
                    tracing::debug!("Cache hit for {}", slug);
                    return Ok(Lookup {
                        post: Some(entry.post.clone()),
                        freshness: Freshness::Fresh,
                    });
                }
            }
        }

        {
            let mut entries = self.entries.write().await;
            if let Some(entry) = entries.get_mut(slug) {
                if entry.fetched_at.elapsed() < self.window {
                    return Ok(Lookup {
                        post: Some(entry.post.clone()),
                        freshness: Freshness::Fresh,
                    });
                }

                if !entry.refreshing {
                    entry.refreshing = true;
                    tracing::debug!("Cache entry for {} is stale, revalidating", slug);
                    let cache = Arc::clone(self);
                    let slug = slug.to_string();
                    tokio::spawn(async move { cache.refresh(&slug).await });
                }

                return Ok(Lookup {
                    post: Some(entry.post.clone()),
                    freshness: Freshness::Stale,
                });
            }
        }

        tracing::debug!("Cache miss for {}, fetching", slug);
        let post = self.store.post_by_slug(slug).await?.map(Arc::new);
        if let Some(post) = &post {
            self.insert(slug, post.clone()).await;
        }

        Ok(Lookup {
            post,
            freshness: Freshness::Miss,
        })
    }

    /// Whether no post is cached
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    async fn insert(&self, slug: &str, post: Arc<Post>) {
        self.entries.write().await.insert(
            slug.to_string(),
            CacheEntry {
                post,
                fetched_at: Instant::now(),
                refreshing: false,
            },
        );
    }

    async fn refresh(&self, slug: &str) {
        match self.store.post_by_slug(slug).await {
            Ok(Some(post)) => {
                self.insert(slug, Arc::new(post)).await;
                tracing::debug!("Revalidated {}", slug);
            }
            Ok(None) => {
                self.entries.write().await.remove(slug);
                tracing::warn!("Post {} no longer exists, evicted from cache", slug);
            }
            Err(e) => {
                if let Some(entry) = self.entries.write().await.get_mut(slug) {
                    entry.refreshing = false;
                }
                tracing::error!("Failed to revalidate {}: {}", slug, e);
            }
        }
    }
}
