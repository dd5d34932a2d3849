//! Lazy, memoized initialisation of the verifier library.

use futures_util::future::BoxFuture;
use std::future::Future;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::collaborator::VerifierHandle;
use crate::error::VerifierError;

type InitFn = Box<dyn Fn() -> BoxFuture<'static, Result<VerifierHandle, VerifierError>> + Send + Sync>;

/// Loads the verifier library at most once.
///
/// Concurrent callers of [`ensure_loaded`](Self::ensure_loaded) wait on the
/// same initialisation. A failed initialisation is not cached; the next call
/// runs the initialiser again.
pub struct VerifierLoader {
    cell: OnceCell<VerifierHandle>,
    init: InitFn,
}

impl VerifierLoader {
    pub fn new<F, Fut>(init: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<VerifierHandle, VerifierError>> + Send + 'static,
    {
        Self {
            cell: OnceCell::new(),
            init: Box::new(move || Box::pin(init())),
        }
    }

    /// A loader whose library is already available.
    pub fn ready(handle: VerifierHandle) -> Self {
        Self {
            cell: OnceCell::new_with(Some(handle)),
            init: Box::new(|| {
                Box::pin(async { Err(VerifierError::Unavailable("loader has no initialiser".into())) })
            }),
        }
    }

    pub async fn ensure_loaded(&self) -> Result<VerifierHandle, VerifierError> {
        let handle = self
            .cell
            .get_or_try_init(|| async {
                debug!("loading verifier library");
                (self.init)().await.inspect_err(|e| {
                    warn!("verifier library failed to load: {e}");
                })
            })
            .await?;
        Ok(handle.clone())
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }
}
