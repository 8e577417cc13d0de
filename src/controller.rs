// src/controller.rs
//! Interaction state for the analysis list and the fetch cycle around it.
//!
//! Every trigger (mount, page, sort, filter, refresh, post-delete) runs one
//! fetch and then the whole pipeline over the refreshed store. Fetches carry
//! a generation number; a result whose generation is no longer current is
//! dropped, so the latest request always wins.

use tracing::{debug, error, info, warn};

use crate::auth::SessionManager;
use crate::core::AnalysisApi;
use crate::error::ClientError;
use crate::pipeline::{self, FilterCategory, PageResult, SortKey, ViewQuery, ITEMS_PER_PAGE};
use crate::store::RecordStore;
use crate::types::{AnalysisRecord, StatsResponse};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    Loading,
    /// The error view replaces the list; `retry` leaves this state.
    Error(ClientError),
    Ready,
}

/// Handle for one in-flight fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    with_stats: bool,
}

/// What a fetch brought back, before it is applied.
#[derive(Debug)]
pub struct FetchResult {
    pub records: Result<Vec<AnalysisRecord>, ClientError>,
    pub stats: Option<StatsResponse>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer fetch started after this one; its result was dropped.
    Superseded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted,
    /// Logged only; the list is left as it was.
    Failed(ClientError),
}

pub struct ViewController<A: AnalysisApi> {
    api: A,
    session: SessionManager,
    store: RecordStore,
    query: ViewQuery,
    page_size: usize,
    state: ViewState,
    view: Option<PageResult>,
    remote_stats: Option<StatsResponse>,
    refresh_counter: u64,
    generation: u64,
}

impl<A: AnalysisApi> ViewController<A> {
    pub fn new(api: A, session: SessionManager) -> Self {
        Self {
            api,
            session,
            store: RecordStore::new(),
            query: ViewQuery::default(),
            page_size: ITEMS_PER_PAGE,
            state: ViewState::Idle,
            view: None,
            remote_stats: None,
            refresh_counter: 0,
            generation: 0,
        }
    }

    pub fn with_query(mut self, query: ViewQuery) -> Self {
        self.query = ViewQuery {
            page: query.page.max(1),
            ..query
        };
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Derived view of the last applied fetch; `None` while loading for the
    /// first time or after an error.
    pub fn view(&self) -> Option<&PageResult> {
        self.view.as_ref()
    }

    pub fn query(&self) -> &ViewQuery {
        &self.query
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Server-side stats, passed through for the distributions.
    pub fn remote_stats(&self) -> Option<&StatsResponse> {
        self.remote_stats.as_ref()
    }

    pub fn refresh_counter(&self) -> u64 {
        self.refresh_counter
    }

    pub async fn mount(&mut self) -> FetchOutcome {
        self.reload().await
    }

    /// Navigate to `page`. Pages outside `1..=total_pages`, and the current
    /// page, are ignored.
    pub async fn set_page(&mut self, page: usize) -> bool {
        if page == 0 || page == self.query.page {
            return false;
        }
        if let Some(view) = &self.view {
            if page > view.total_pages {
                debug!("Ignoring page {} of {}", page, view.total_pages);
                return false;
            }
        }

        self.query.page = page;
        self.reload().await;
        true
    }

    pub async fn next_page(&mut self) -> bool {
        self.set_page(self.query.page.saturating_add(1)).await
    }

    pub async fn previous_page(&mut self) -> bool {
        match self.query.page {
            0 | 1 => false,
            page => self.set_page(page - 1).await,
        }
    }

    pub async fn set_sort(&mut self, sort: SortKey) -> FetchOutcome {
        self.query.sort = sort;
        self.query.page = 1;
        self.reload().await
    }

    pub async fn set_filter(&mut self, filter: FilterCategory) -> FetchOutcome {
        self.query.filter = filter;
        self.query.page = 1;
        self.reload().await
    }

    pub async fn clear_filters(&mut self) -> FetchOutcome {
        self.query = ViewQuery::default();
        self.reload().await
    }

    pub async fn refresh(&mut self) -> FetchOutcome {
        self.refresh_counter += 1;
        self.query.page = 1;
        self.reload().await
    }

    /// Leave the error view: back to page 1 and fetch again.
    pub async fn retry(&mut self) -> FetchOutcome {
        self.refresh().await
    }

    /// Remote delete, then a full refetch. Failures are logged and leave the
    /// current state untouched.
    pub async fn delete(&mut self, id: &str) -> DeleteOutcome {
        let token = match self.session.require_token() {
            Ok(token) => token.to_string(),
            Err(err) => {
                error!("Cannot delete analysis {}: {}", id, err);
                return DeleteOutcome::Failed(err);
            }
        };

        match self.api.delete_analysis(&token, id).await {
            Ok(()) => {
                info!("Deleted analysis {}", id);
                self.refresh_counter += 1;
                self.reload().await;
                DeleteOutcome::Deleted
            }
            Err(err) => {
                error!("Failed to delete analysis {}: {}", id, err);
                DeleteOutcome::Failed(err)
            }
        }
    }

    /// One full fetch-and-recompute cycle.
    pub async fn reload(&mut self) -> FetchOutcome {
        let ticket = self.begin_fetch();
        let result = self.fetch(ticket).await;
        self.apply_fetch(ticket, result)
    }

    /// Enter `Loading` and supersede any fetch still in flight.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.state = ViewState::Loading;
        FetchTicket {
            generation: self.generation,
            with_stats: self.query.page == 1,
        }
    }

    /// Run the remote calls for `ticket`. Stats ride along on page 1 only.
    pub async fn fetch(&self, ticket: FetchTicket) -> FetchResult {
        let token = match self.session.require_token() {
            Ok(token) => token,
            Err(err) => {
                return FetchResult {
                    records: Err(err),
                    stats: None,
                }
            }
        };

        if !ticket.with_stats {
            return FetchResult {
                records: self.api.list_analyses(token).await,
                stats: None,
            };
        }

        let (records, stats) = tokio::join!(
            self.api.list_analyses(token),
            self.api.fetch_stats(token)
        );
        let stats = match stats {
            Ok(stats) => Some(stats),
            Err(err) => {
                warn!("Stats fetch failed: {}", err);
                None
            }
        };

        FetchResult { records, stats }
    }

    pub fn apply_fetch(&mut self, ticket: FetchTicket, result: FetchResult) -> FetchOutcome {
        if ticket.generation != self.generation {
            debug!(
                "Discarding stale fetch {} (current {})",
                ticket.generation, self.generation
            );
            return FetchOutcome::Superseded;
        }

        match result.records {
            Ok(records) => {
                debug!("Applying {} analyses", records.len());
                self.store.replace(records);
                if let Some(stats) = result.stats {
                    self.remote_stats = Some(stats);
                }
                self.recompute();
                self.state = ViewState::Ready;
            }
            Err(err) => {
                if err.requires_login() {
                    warn!("Not authenticated: {}", err);
                } else {
                    error!("Failed to load analyses: {}", err);
                }
                self.view = None;
                self.state = ViewState::Error(err);
            }
        }

        FetchOutcome::Applied
    }

    fn recompute(&mut self) {
        let mut view = pipeline::view(self.store.records(), &self.query, self.page_size);

        // The filtered set can shrink under the current page after a delete,
        // and a requested page can start out past the end.
        let last_page = view.total_pages.max(1);
        if self.query.page > last_page {
            self.query.page = last_page;
            view = pipeline::view(self.store.records(), &self.query, self.page_size);
        }

        self.view = Some(view);
    }
}
