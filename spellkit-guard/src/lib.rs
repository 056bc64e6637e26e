//! Spellkit Guard - Request Guardrail
//!
//! Every call to the generation service goes through [`Guardrail::execute`],
//! which enforces a cooldown breaker, a daily cap, a response cache and a
//! minimum gap between calls. Usage counters and cached responses persist
//! through a [`KeyValueStore`] under two fixed keys.

mod cache;
mod clock;
mod guardrail;
mod store;
mod usage;

pub use cache::{CacheEntry, Lookup, ResponseCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use guardrail::{Availability, GuardStatus, Guardrail};
pub use store::{load_json, save_json, FileStore, KeyValueStore, MemoryStore, CACHE_KEY, USAGE_KEY};
pub use usage::UsageStats;
