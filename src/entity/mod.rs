//! Database entity models for the preferences-backed session store.

/// Key-value entries persisted by [`DatabaseStore`](crate::store::DatabaseStore).
pub mod preference;
