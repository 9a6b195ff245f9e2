pub mod lazy_cache;
pub mod memory;
pub mod redis;
pub mod store;

pub use lazy_cache::LazyCache;
pub use memory::MemoryStore;
pub use self::redis::create_redis_client;
pub use self::redis::RedisStore;
pub use store::{KeyValueStore, StoreKey};
