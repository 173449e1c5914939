//! Application intake: validation, execution start, and status polling against the
//! workflow engine.

pub mod domain;
pub mod engine;
pub mod router;
pub mod status;
pub mod trigger;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationRequest, Candidate, EngineExecution, ExecutionStatusView, RawApplicationRequest,
    RawCandidate, TriggerReceipt,
};
pub use engine::{
    EngineError, ExecutionInputs, ExecutionLinks, KestraClient, StartExecution, WorkflowEngine,
};
pub use router::{apply_router, ApplyState};
pub use status::{RetryPolicy, WorkflowStatusProxy};
pub use trigger::{FlowTarget, WorkflowTriggerProxy};
pub use validation::{RequestValidator, ValidationError};
