//! Shared application state.

use std::sync::Arc;

use auth::IdentityVerifier;
use workflow::OrderWorkflow;

/// State shared by all handlers: the workflow engine and the identity
/// verifier that guards it.
#[derive(Clone)]
pub struct AppState {
    pub workflow: Arc<OrderWorkflow>,
    pub verifier: Arc<dyn IdentityVerifier>,
}

impl AppState {
    /// Creates the application state.
    pub fn new(workflow: Arc<OrderWorkflow>, verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self { workflow, verifier }
    }
}
