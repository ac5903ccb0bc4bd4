use arc_swap::ArcSwapOption;
use std::sync::Arc;

use super::{cached, Materialized, Sequence};
use crate::{utils::tracing::trace, Result};

/// Cache filled by the first consumption of a [`Sequence::force_on_demand`] sequence.
///
/// No lock is held while the source runs. Consumers racing on an empty cache each drain the
/// source, and the first one to store its elements decides what every consumer sees.
struct OnDemand<T> {
    source: Sequence<T>,
    items: ArcSwapOption<Vec<T>>,
}

impl<T: 'static> OnDemand<T> {
    fn items(&self) -> Result<Arc<Vec<T>>> {
        if let Some(items) = self.items.load_full() {
            return Ok(items);
        }
        let drained = Arc::new(self.source.to_list()?);
        let previous = self.items.rcu(|current| match current {
            Some(items) => Some(Arc::clone(items)),
            None => Some(Arc::clone(&drained)),
        });
        match previous {
            Some(items) => Ok(items),
            None => {
                trace!(len = drained.len(), "materialized on demand");
                Ok(drained)
            },
        }
    }
}

impl<T: Send + Sync + 'static> Materialized for OnDemand<T> {
    fn len(&self) -> Result<usize> {
        self.items().map(|items| items.len())
    }
}

impl<T: Send + Sync> Materialized for Vec<T> {
    fn len(&self) -> Result<usize> {
        Ok(Vec::len(self))
    }
}

impl<T: Clone + Send + Sync + 'static> Sequence<T> {
    /// Drains one iteration now and serves every later consumption from the cached elements.
    ///
    /// The source is never touched again, so later changes to it are not observed.
    pub fn force(&self) -> Result<Sequence<T>> {
        if self.is_forced() {
            return Ok(self.clone());
        }
        let items = Arc::new(self.to_list()?);
        trace!(len = items.len(), "forced");
        let mut forced = Sequence::from_cache(Arc::clone(&items));
        forced.materialized = Some(items as Arc<dyn Materialized>);
        Ok(forced)
    }

    /// Like [`force`](Sequence::force), deferring the drain to the first terminal consumption.
    ///
    /// A failed drain is not cached; the next consumption tries the source again.
    pub fn force_on_demand(&self) -> Sequence<T> {
        if self.is_forced() {
            return self.clone();
        }
        let cache = Arc::new(OnDemand {
            source: self.clone(),
            items: ArcSwapOption::from(None),
        });
        let mut forced = Sequence::from_factory({
            let cache = Arc::clone(&cache);
            move || cache.items().map(cached)
        });
        forced.materialized = Some(cache as Arc<dyn Materialized>);
        forced
    }
}
