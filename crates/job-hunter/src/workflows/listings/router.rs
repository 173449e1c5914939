use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tracing::debug;

use super::filter::{FilterQuery, ListingFilterEngine, ListingParams};
use super::repository::ListingRepository;
use crate::envelope::{GatewayError, ResponseFormatter};

pub struct ListingsState<R> {
    pub repository: Arc<R>,
    pub engine: ListingFilterEngine,
    pub formatter: ResponseFormatter,
}

impl<R> Clone for ListingsState<R> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            engine: self.engine,
            formatter: self.formatter,
        }
    }
}

/// `GET /jobs` serves filtered pages over the listing dataset.
pub fn listings_router<R>(state: ListingsState<R>) -> Router
where
    R: ListingRepository + 'static,
{
    Router::new()
        .route("/jobs", get(listings_handler::<R>))
        .with_state(state)
}

pub(crate) async fn listings_handler<R>(
    State(state): State<ListingsState<R>>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response
where
    R: ListingRepository + 'static,
{
    let params = match pairs {
        Ok(Query(pairs)) => ListingParams::from_pairs(pairs),
        Err(rejection) => {
            let error = GatewayError::Validation(format!(
                "Invalid query string: {}",
                rejection.body_text()
            ));
            return state.formatter.failure(&error);
        }
    };
    let query = FilterQuery::from_params(&params);

    let listings = match state.repository.all().await {
        Ok(listings) => listings,
        Err(err) => return state.formatter.failure(&GatewayError::from(err)),
    };

    let page = state.engine.apply(&listings, &query);
    debug!(
        total = page.meta.total,
        returned = page.meta.returned,
        role = ?query.role,
        remote = ?query.remote,
        entry_level = ?query.entry_level,
        "listing page served"
    );

    state.formatter.page(page.listings, page.meta, query.echo())
}
