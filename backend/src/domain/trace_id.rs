//! Request-scoped trace identifier for correlating logs and error payloads.
//!
//! The identifier lives in Tokio task-local storage. Task locals are not
//! inherited by spawned tasks or blocking threads, so work that leaves the
//! request task must go through [`TraceId::scope`] or
//! [`TraceId::spawn_blocking`].

use std::future::Future;

use tokio::task::JoinError;
use tokio::task_local;
use uuid::Uuid;

task_local! {
    pub(crate) static TRACE_ID: TraceId;
}

/// Per-request trace identifier.
///
/// # Examples
/// ```
/// use todo_backend::TraceId;
///
/// async fn handler() -> Option<String> {
///     TraceId::current().map(|id| id.to_string())
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Identifier of the request currently executing, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        TRACE_ID.try_with(|id| *id).ok()
    }

    /// Borrow the inner UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Run `fut` with `trace_id` in scope.
    ///
    /// # Examples
    /// ```
    /// use todo_backend::TraceId;
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let trace_id: TraceId = "00000000-0000-0000-0000-000000000000".parse().unwrap();
    /// let observed = TraceId::scope(trace_id, async { TraceId::current() }).await;
    /// assert_eq!(observed, Some(trace_id));
    /// # });
    /// ```
    pub async fn scope<Fut>(trace_id: TraceId, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TRACE_ID.scope(trace_id, fut).await
    }

    /// Run CPU-bound work on the blocking pool, carrying the current trace
    /// identifier into the worker thread.
    ///
    /// # Errors
    /// Returns the [`JoinError`] when the closure panics or the runtime is
    /// shutting down.
    pub async fn spawn_blocking<F, T>(work: F) -> Result<T, JoinError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let current = Self::current();
        tokio::task::spawn_blocking(move || match current {
            Some(id) => TRACE_ID.sync_scope(id, work),
            None => work(),
        })
        .await
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}
