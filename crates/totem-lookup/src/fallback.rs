//! Ordered "first source that yields a value" combinator.
//!
//! Each source is a future that is only polled once every earlier source
//! has come back empty, so later upstream calls are skipped entirely when
//! an earlier source succeeds.

use std::future::Future;

use futures::future::BoxFuture;

/// A named attribute resolved from an ordered list of sources.
pub struct Fallback<'a, T> {
    attribute: &'static str,
    sources: Vec<(&'static str, BoxFuture<'a, Option<T>>)>,
}

impl<'a, T: Send + 'a> Fallback<'a, T> {
    #[must_use]
    pub fn new(attribute: &'static str) -> Self {
        Self {
            attribute,
            sources: Vec::new(),
        }
    }

    /// Appends a source, tried after every source already added.
    #[must_use]
    pub fn or_from<F>(mut self, source: &'static str, future: F) -> Self
    where
        F: Future<Output = Option<T>> + Send + 'a,
    {
        self.sources.push((source, Box::pin(future)));
        self
    }

    /// Awaits sources in order and returns the first `Some`.
    pub async fn resolve(self) -> Option<T> {
        let attribute = self.attribute;
        for (source, future) in self.sources {
            if let Some(value) = future.await {
                tracing::debug!(attribute, source, "attribute resolved");
                return Some(value);
            }
        }
        tracing::debug!(attribute, "no source produced a value");
        None
    }
}
