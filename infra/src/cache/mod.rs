//! Cache module for the Redis-backed blacklist

pub mod blacklist_store;
pub mod redis_client;


pub use blacklist_store::RedisBlacklistStore;
pub use redis_client::RedisClient;
