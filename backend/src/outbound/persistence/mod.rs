//! Key-value store adapters.
//!
//! [`RedisKvStore`] is the production adapter, pooled via `bb8`. The
//! [`InMemoryKvStore`] mirrors its observable semantics (TTL expiry, NX
//! writes, wrong-type errors) closely enough for service-level tests.

mod memory;
mod redis;

pub use memory::InMemoryKvStore;
pub use redis::RedisKvStore;
