use std::sync::Arc;

use corelog_core::CommitLog;

/// Shared state handed to every handler. Depends only on the `CommitLog`
/// capability, not the concrete `Log` engine — the same boundary an
/// out-of-scope RPC layer would depend on. `Log` already serialises its own
/// mutations behind an internal lock, so handlers only need shared
/// ownership of the trait object — no extra `RwLock` wrapper is needed here.
#[derive(Clone)]
pub struct AppState {
    pub log: Arc<dyn CommitLog>,
}

impl AppState {
    pub fn new(log: Arc<dyn CommitLog>) -> Self {
        AppState { log }
    }
}
