//! Core of the AtmosVibe weather dashboard: the TTL-cached weather fetch
//! layer (with rate-limit fallback to stale cache and a credential-free demo
//! mode) and the offline service worker modeled as an explicit state machine.

pub mod config;
pub mod format;
pub mod store;
pub mod sw;
pub mod weather;
