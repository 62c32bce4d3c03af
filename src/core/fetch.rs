//! Paginated listing
//!
//! Qase listings are read with `limit`/`offset`. A page shorter than the
//! requested limit, including an empty one, is the last page. There are no
//! retries: one failed page fails the whole fetch.

use crate::adapters::qase::QaseApi;
use crate::domain::{MigrateError, ProjectCode, QaseError, Result, RunId, SourceResult, TestCase};
use std::future::Future;

/// Largest page the listing endpoints serve
pub const PAGE_SIZE: usize = 100;

/// Offset-driven page loop shared by the case and result listings
#[derive(Debug, Clone, Copy)]
pub struct PagedFetcher {
    page_size: usize,
}

impl PagedFetcher {
    /// Create a fetcher; the page size is clamped to `1..=PAGE_SIZE`
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.clamp(1, PAGE_SIZE),
        }
    }

    /// Page size sent as `limit`
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Read every page of a listing and concatenate the entities in order
    ///
    /// `fetch_page` is called with `(limit, offset)` for offsets 0,
    /// `limit`, `2 * limit`, ... until a short page comes back.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::Fetch`] naming `resource` and the offset of
    /// the first page that failed. Remaining pages are not requested.
    pub async fn fetch_all<T, F, Fut>(&self, resource: &str, mut fetch_page: F) -> Result<Vec<T>>
    where
        F: FnMut(usize, usize) -> Fut,
        Fut: Future<Output = std::result::Result<Vec<T>, QaseError>>,
    {
        let mut items = Vec::new();
        let mut offset = 0;

        loop {
            let page = fetch_page(self.page_size, offset)
                .await
                .map_err(|source| MigrateError::Fetch {
                    resource: resource.to_string(),
                    offset,
                    source,
                })?;

            let count = page.len();
            items.extend(page);
            tracing::debug!(resource, offset, count, total = items.len(), "Fetched page");

            if count < self.page_size {
                break;
            }
            offset += self.page_size;
        }

        Ok(items)
    }

    /// All cases of a project
    pub async fn fetch_cases(&self, api: &dyn QaseApi, project: &ProjectCode) -> Result<Vec<TestCase>> {
        let resource = format!("cases of project {project}");
        let cases = self
            .fetch_all(&resource, |limit, offset| api.list_cases(project, limit, offset))
            .await?;

        tracing::info!(project = %project, count = cases.len(), "Fetched cases");
        Ok(cases)
    }

    /// All results recorded in a run
    pub async fn fetch_results(
        &self,
        api: &dyn QaseApi,
        project: &ProjectCode,
        run: RunId,
    ) -> Result<Vec<SourceResult>> {
        let resource = format!("results of run {run} in project {project}");
        let results = self
            .fetch_all(&resource, |limit, offset| {
                api.list_results(project, run, limit, offset)
            })
            .await?;

        tracing::info!(project = %project, run_id = %run, count = results.len(), "Fetched results");
        Ok(results)
    }
}

impl Default for PagedFetcher {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serve `total` numbered items, recording every requested offset
    async fn run_fetch(total: usize, page_size: usize) -> (Vec<usize>, Vec<usize>) {
        let offsets = Mutex::new(Vec::new());
        let fetcher = PagedFetcher::new(page_size);

        let items = fetcher
            .fetch_all("numbers", |limit, offset| {
                offsets.lock().unwrap().push(offset);
                let page: Vec<usize> = (offset..total.min(offset + limit)).collect();
                async move { Ok::<_, QaseError>(page) }
            })
            .await
            .unwrap();

        let offsets = offsets.into_inner().unwrap();
        (items, offsets)
    }

    #[tokio::test]
    async fn test_stops_on_short_page() {
        let (items, offsets) = run_fetch(250, 100).await;
        assert_eq!(items, (0..250).collect::<Vec<_>>());
        assert_eq!(offsets, vec![0, 100, 200]);
    }

    #[tokio::test]
    async fn test_exact_multiple_needs_empty_page() {
        let (items, offsets) = run_fetch(200, 100).await;
        assert_eq!(items.len(), 200);
        assert_eq!(offsets, vec![0, 100, 200]);
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let (items, offsets) = run_fetch(0, 100).await;
        assert!(items.is_empty());
        assert_eq!(offsets, vec![0]);
    }

    #[tokio::test]
    async fn test_failure_aborts_remaining_pages() {
        let calls = Mutex::new(0usize);
        let fetcher = PagedFetcher::new(10);

        let result: Result<Vec<usize>> = fetcher
            .fetch_all("numbers", |limit, offset| {
                *calls.lock().unwrap() += 1;
                async move {
                    if offset == 10 {
                        Err(QaseError::ServerError {
                            status: 502,
                            message: "bad gateway".to_string(),
                        })
                    } else {
                        Ok((offset..offset + limit).collect())
                    }
                }
            })
            .await;

        match result {
            Err(MigrateError::Fetch { resource, offset, .. }) => {
                assert_eq!(resource, "numbers");
                assert_eq!(offset, 10);
            }
            other => panic!("expected fetch error, got {other:?}"),
        }
        assert_eq!(*calls.lock().unwrap(), 2);
    }

    #[test]
    fn test_page_size_clamped() {
        assert_eq!(PagedFetcher::new(0).page_size(), 1);
        assert_eq!(PagedFetcher::new(500).page_size(), PAGE_SIZE);
        assert_eq!(PagedFetcher::default().page_size(), 100);
    }
}
