#[cfg(test)]
pub mod memory_store;
pub mod object_service;
pub mod s3_store;
pub mod store;
