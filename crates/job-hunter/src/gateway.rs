use std::sync::Arc;

use axum::Router;

use crate::config::{AppEnvironment, KestraConfig};
use crate::envelope::ResponseFormatter;
use crate::workflows::apply::{
    apply_router, ApplyState, EngineError, ExecutionLinks, FlowTarget, RequestValidator, RetryPolicy,
    WorkflowEngine, WorkflowStatusProxy, WorkflowTriggerProxy,
};
use crate::workflows::listings::{
    listings_router, ListingFilterEngine, ListingRepository, ListingsState,
};

/// Builds the apply and listing routes, mounted both at the root and under `/api`.
/// Fails only when the engine base URL cannot be parsed.
pub fn gateway_router<E, R>(
    engine: Arc<E>,
    repository: Arc<R>,
    kestra: &KestraConfig,
    environment: AppEnvironment,
) -> Result<Router, EngineError>
where
    E: WorkflowEngine + 'static,
    R: ListingRepository + 'static,
{
    let formatter = ResponseFormatter::new(environment.exposes_error_details());
    let links = ExecutionLinks::new(&kestra.base_url)?;

    let trigger = WorkflowTriggerProxy::new(
        engine.clone(),
        FlowTarget {
            namespace: kestra.namespace.clone(),
            flow_id: kestra.flow_id.clone(),
        },
        links.clone(),
    );
    let status = WorkflowStatusProxy::new(
        engine,
        links,
        RetryPolicy {
            retries: kestra.status_retries,
            backoff: kestra.retry_backoff,
        },
    );

    let apply = apply_router(ApplyState {
        validator: RequestValidator,
        trigger: Arc::new(trigger),
        status: Arc::new(status),
        formatter,
    });
    let listings = listings_router(ListingsState {
        repository,
        engine: ListingFilterEngine,
        formatter,
    });

    let routes = apply.merge(listings);
    Ok(Router::new().merge(routes.clone()).nest("/api", routes))
}
