//! Cursor-less page aggregation for `{page, limit}` listings
//!
//! The target platform pages every listing with `page`/`limit` query
//! parameters and reports a collection `total` alongside each page. The
//! aggregator reassembles the complete collection, trusting an empty page
//! over the reported total so a stale or shrinking total can never cause an
//! endless fetch loop.

use std::future::Future;

use tracing::debug;

use crate::error::Error;
use crate::models::Paged;

/// Default page size for platform listings
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Largest page size the platform accepts
pub const MAX_PAGE_LIMIT: u32 = 200;

/// Fetch every page of a listing and merge the results.
///
/// Pages are numbered from 1. Aggregation stops as soon as a page comes
/// back empty (the authoritative signal) or the accumulated count reaches
/// the most recently reported total, whichever happens first. Fetch
/// failures propagate unchanged; there is no retry at this layer.
pub async fn fetch_all<T, F, Fut>(limit: u32, mut fetch_page: F) -> Result<Vec<T>, Error>
where
    F: FnMut(u32, u32) -> Fut,
    Fut: Future<Output = Result<Paged<T>, Error>>,
{
    let mut items: Vec<T> = Vec::new();
    let mut page = 1u32;

    loop {
        let batch = fetch_page(page, limit).await?;

        if batch.data.is_empty() {
            break;
        }

        items.extend(batch.data);
        debug!(page, fetched = items.len(), total = batch.total, "aggregated page");

        if items.len() as u64 >= batch.total {
            break;
        }

        page += 1;
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn page_of(items: &[&str], total: u64) -> Paged<String> {
        Paged {
            data: items.iter().map(|s| s.to_string()).collect(),
            total,
        }
    }

    #[tokio::test]
    async fn empty_page_terminates_despite_overstated_total() {
        let calls = AtomicU32::new(0);

        let items = fetch_all(2, |page, _limit| {
            calls.fetch_add(1, Ordering::SeqCst);
            let batch = match page {
                1 => page_of(&["a", "b"], 10),
                2 => page_of(&["c"], 10),
                _ => page_of(&[], 10),
            };
            async move { Ok(batch) }
        })
        .await
        .unwrap();

        assert_eq!(items, ["a", "b", "c"]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn reaching_the_total_stops_after_one_call() {
        let calls = AtomicU32::new(0);

        let items = fetch_all(2, |page, _limit| {
            calls.fetch_add(1, Ordering::SeqCst);
            let batch = match page {
                1 => page_of(&["a", "b"], 2),
                // Further pages would be non-empty, but must never be asked for
                _ => page_of(&["x"], 2),
            };
            async move { Ok(batch) }
        })
        .await
        .unwrap();

        assert_eq!(items, ["a", "b"]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn shrinking_total_cannot_loop() {
        let calls = AtomicU32::new(0);

        // The total drops below what page 1 already delivered
        let items = fetch_all(2, |page, _limit| {
            calls.fetch_add(1, Ordering::SeqCst);
            let batch = match page {
                1 => page_of(&["a", "b"], 5),
                _ => page_of(&["c"], 1),
            };
            async move { Ok(batch) }
        })
        .await
        .unwrap();

        assert_eq!(items, ["a", "b", "c"]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_collection_needs_one_call() {
        let calls = AtomicU32::new(0);

        let items: Vec<String> = fetch_all(50, |_page, _limit| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(page_of(&[], 0)) }
        })
        .await
        .unwrap();

        assert!(items.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fetch_errors_propagate() {
        let result: Result<Vec<String>, Error> = fetch_all(50, |_page, _limit| async {
            Err(Error::Auth("token rejected".to_string()))
        })
        .await;

        assert!(matches!(result, Err(Error::Auth(_))));
    }
}
