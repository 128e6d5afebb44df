//! A chain that reorders itself by hit count.
//!
//! This is opt-in middleware around [`Chain`](crate::Chain) semantics: the
//! order routers are tried in changes at runtime, so two overlapping routes
//! may resolve differently over the life of the process. Use it only for
//! route sets without overlaps.

use std::cmp::Reverse;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::debug;

use crate::request::Request;
use crate::response::Response;
use crate::router::{Handler, Router, SharedHandler, serve_routed};

struct Counted {
    router: Arc<dyn Router>,
    hits: AtomicU64,
}

/// Routers tried most-hit first.
///
/// When a match is found past the first 30% of the current order, the
/// order is re-sorted by descending hit count.
pub struct HitCountingChain {
    routers: Vec<Counted>,
    order: RwLock<Vec<usize>>,
}

impl HitCountingChain {
    /// Creates the chain, initially in the given order.
    pub fn new(routers: impl IntoIterator<Item = Arc<dyn Router>>) -> Self {
        let routers: Vec<Counted> = routers
            .into_iter()
            .map(|router| Counted {
                router,
                hits: AtomicU64::new(0),
            })
            .collect();
        let order = (0..routers.len()).collect();
        Self {
            routers,
            order: RwLock::new(order),
        }
    }

    /// Returns the registration indices of the routers in the order they
    /// are currently tried.
    pub fn order(&self) -> Vec<usize> {
        self.order.read().clone()
    }

    /// Returns the hit count of the router registered at `index`.
    pub fn hits(&self, index: usize) -> u64 {
        self.routers
            .get(index)
            .map_or(0, |r| r.hits.load(Ordering::Relaxed))
    }

    fn resort(&self) {
        // another request is already sorting
        let Some(mut order) = self.order.try_write() else {
            return;
        };
        order.sort_by_key(|&i| Reverse(self.routers[i].hits.load(Ordering::Relaxed)));
        debug!(order = ?*order, "reordered routes by hits");
    }
}

impl Router for HitCountingChain {
    fn route(&self, req: &mut Request) -> Option<SharedHandler> {
        let found = {
            let order = self.order.read();
            let threshold = order.len() * 30 / 100;
            order.iter().enumerate().find_map(|(pos, &i)| {
                let counted = &self.routers[i];
                counted.router.route(req).map(|handler| {
                    counted.hits.fetch_add(1, Ordering::Relaxed);
                    (handler, pos > threshold)
                })
            })
        };

        let (handler, resort) = found?;
        if resort {
            self.resort();
        }
        Some(handler)
    }
}

impl Handler for HitCountingChain {
    fn serve(&self, req: &mut Request, res: &mut Response) {
        serve_routed(self, None, req, res);
    }
}
