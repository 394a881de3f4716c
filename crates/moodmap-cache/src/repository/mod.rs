//! # Repository Module
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Cache Repositories                              │
//! │                                                                         │
//! │  CollectionRepository            PendingWriteRepository                │
//! │  ├── get::<T>(key)               ├── enqueue(kind, entity_id, json)    │
//! │  ├── get_raw(key)                ├── pending(limit)                    │
//! │  ├── put(key, &value)            └── count_pending()                   │
//! │  └── put_raw(key, json)                  │                              │
//! │       │                                  │                              │
//! │       ▼                                  ▼                              │
//! │  cache_entries                    pending_writes                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod collection;
pub mod pending;
