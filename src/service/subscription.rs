use crate::view::Projection;
use std::sync::Arc;
use tokio::sync::watch;

/// A live handle on the projected view.
///
/// Each update replaces the previous view; a slow reader only ever sees the
/// newest one. Dropping the handle unsubscribes, and once no handle is left
/// the service stops recomputing views until the next
/// [`observe`](crate::service::BookmarkService::observe).
#[derive(Debug, Clone)]
pub struct ViewSubscription {
    rx: watch::Receiver<Arc<Projection>>,
}

impl ViewSubscription {
    pub(crate) fn new(rx: watch::Receiver<Arc<Projection>>) -> Self {
        ViewSubscription { rx }
    }

    /// The latest view, without waiting.
    pub fn current(&self) -> Arc<Projection> {
        self.rx.borrow().clone()
    }

    /// Waits for the next view. Returns `None` once the service is gone.
    pub async fn next(&mut self) -> Option<Arc<Projection>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Waits until a view satisfies `predicate`, checking the current one first.
    /// Returns `None` once the service is gone.
    pub async fn wait_for(
        &mut self,
        mut predicate: impl FnMut(&Projection) -> bool,
    ) -> Option<Arc<Projection>> {
        self.rx
            .wait_for(|view| predicate(&**view))
            .await
            .ok()
            .map(|view| Arc::clone(&*view))
    }
}
