//! Search execution.
//!
//! Every entry point funnels into the same steps: validate, compose the
//! filter, resolve the sort, fetch a window, and for paged searches resolve
//! the total. No store call is made before all validation has passed.
//!
//! Without a sort, rows come back in store-native order. Nothing makes that
//! order stable across calls; callers paging through a result that may change
//! must pass a sort that identifies rows uniquely.

use roster_proto::{Filter, OrderSpec, Page, ReadQuery, Window};
use tracing::{debug, instrument, warn};

use super::criteria::Criteria;
use super::pagination::{resolve_total, PageRequest, PagingMode, TotalSource};
use super::predicate::PredicateComposer;
use super::projection::ProjectedRow;
use super::sort::{SortResolver, SortSpec};
use crate::config::SearchConfig;
use crate::error::Error;
use crate::store::MemberStore;

/// Runs member searches against a store.
pub struct SearchExecutor<S> {
    store: S,
    resolver: SortResolver,
    config: SearchConfig,
}

impl<S: MemberStore> SearchExecutor<S> {
    /// Create an executor with default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, SearchConfig::default())
    }

    /// Create an executor with the given configuration.
    ///
    /// The sort lookup table is built here, once.
    pub fn with_config(store: S, config: SearchConfig) -> Self {
        let resolver = SortResolver::for_store(&store);
        Self {
            store,
            resolver,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn resolver(&self) -> &SortResolver {
        &self.resolver
    }

    /// Validate criteria and compose them into a filter.
    pub fn compose(&self, criteria: &Criteria) -> Result<Filter, Error> {
        if self.config.reject_inverted_age_range {
            if let Err(e) = criteria.check_age_range() {
                warn!(error = %e, "search rejected");
                return Err(e);
            }
        }
        Ok(PredicateComposer::compose(
            criteria,
            self.config.compose_strategy,
        ))
    }

    /// Every matching row, in store-native order.
    #[instrument(skip(self, criteria))]
    pub fn search(&self, criteria: &Criteria) -> Result<Vec<ProjectedRow>, Error> {
        let filter = self.compose(criteria)?;
        self.read(ReadQuery::new(filter))
    }

    /// Every matching row, ordered by `sort`.
    #[instrument(skip(self, criteria))]
    pub fn search_sorted(
        &self,
        criteria: &Criteria,
        sort: &SortSpec,
    ) -> Result<Vec<ProjectedRow>, Error> {
        let filter = self.compose(criteria)?;
        let orders = self.resolve_sort(sort)?;
        self.read(ReadQuery::new(filter).with_orders(orders))
    }

    /// Every row matching a pre-built filter, in store-native order.
    #[instrument(skip_all, fields(clauses = filter.len()))]
    pub fn search_where(&self, filter: &Filter) -> Result<Vec<ProjectedRow>, Error> {
        self.read(ReadQuery::new(filter.clone()))
    }

    /// A page whose total always comes from a count query.
    pub fn search_page(
        &self,
        criteria: &Criteria,
        offset: u64,
        limit: u32,
    ) -> Result<Page<ProjectedRow>, Error> {
        let request = PageRequest::new(offset, limit)?;
        self.search_page_with(criteria, &request, PagingMode::Naive)
    }

    /// A page whose count query is skipped when the first page is short.
    pub fn search_page_optimized(
        &self,
        criteria: &Criteria,
        offset: u64,
        limit: u32,
    ) -> Result<Page<ProjectedRow>, Error> {
        let request = PageRequest::new(offset, limit)?;
        self.search_page_with(criteria, &request, PagingMode::Optimized)
    }

    /// A page for an explicit request and paging mode.
    #[instrument(
        skip(self, criteria, request),
        fields(offset = request.offset(), limit = request.limit())
    )]
    pub fn search_page_with(
        &self,
        criteria: &Criteria,
        request: &PageRequest,
        mode: PagingMode,
    ) -> Result<Page<ProjectedRow>, Error> {
        let filter = self.compose(criteria)?;
        let orders = self.resolve_sort(request.sort())?;
        let window = self.window(request);

        let query = ReadQuery::new(filter)
            .with_orders(orders)
            .with_window(window);
        let content = self.read(query.clone())?;

        let (total, source) = resolve_total(
            mode,
            window.offset,
            window.limit,
            content.len(),
            || self.store.count(&query.filter),
        )?;
        match source {
            TotalSource::Counted => debug!(total, "count query issued"),
            TotalSource::Derived => debug!(total, "count query skipped"),
        }

        Ok(Page::new(content, window.offset, window.limit, total))
    }

    /// One window of matching rows ordered by `sort`, without a total.
    #[instrument(skip(self, criteria))]
    pub fn search_ordered(
        &self,
        criteria: &Criteria,
        offset: u64,
        limit: u32,
        sort: &SortSpec,
    ) -> Result<Vec<ProjectedRow>, Error> {
        let request = PageRequest::new(offset, limit)?;
        let filter = self.compose(criteria)?;
        let orders = self.resolve_sort(sort)?;
        self.read(
            ReadQuery::new(filter)
                .with_orders(orders)
                .with_window(self.window(&request)),
        )
    }

    fn resolve_sort(&self, sort: &SortSpec) -> Result<Vec<OrderSpec>, Error> {
        match self.resolver.resolve(sort) {
            Ok(orders) => {
                if !orders.is_empty() {
                    let sort = orders
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ");
                    debug!(%sort, "sort resolved");
                }
                Ok(orders)
            }
            Err(e) => {
                warn!(error = %e, "search rejected");
                Err(e)
            }
        }
    }

    /// The request's window, with the limit clamped to `[1, max_limit]`.
    fn window(&self, request: &PageRequest) -> Window {
        let limit = request.limit().min(self.config.max_limit.max(1));
        if limit < request.limit() {
            debug!(
                requested = request.limit(),
                limit, "page limit clamped"
            );
        }
        Window::new(request.offset(), limit)
    }

    fn read(&self, query: ReadQuery) -> Result<Vec<ProjectedRow>, Error> {
        let rows = self.store.fetch(&query)?;
        debug!(rows = rows.len(), clauses = query.filter.len(), "rows fetched");
        Ok(rows.into_iter().map(ProjectedRow::from_joined).collect())
    }
}
