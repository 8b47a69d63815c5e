//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod jobs;
pub mod memory_store;
pub mod redis_store;
pub mod test_dependencies;
pub mod traits;

pub use deps::ServerDeps;
pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;
pub use test_dependencies::TestDependencies;
pub use traits::*;
