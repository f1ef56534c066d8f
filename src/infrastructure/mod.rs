//! Adapters behind the domain ports: storage backends, the Chapa gateway
//! client, and the notification worker.

pub mod chapa;
pub mod in_memory;
pub mod notifier;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
