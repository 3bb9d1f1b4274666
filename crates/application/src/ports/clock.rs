//! Wall clock port.

use chrono::{DateTime, Utc};

/// Source of `created_at`/`updated_at` stamps and history ages.
///
/// The store and the session never read the system time directly, so tests
/// can pin or step it.
pub trait Clock: Send + Sync {
    /// Current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
