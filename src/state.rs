use crate::{
    models::allow_list::AllowList,
    services::{object_service::ObjectService, store::ObjectStore},
};
use std::sync::Arc;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub public_buckets: Arc<AllowList>,
    pub objects: ObjectService,
}

impl AppState {
    pub fn new(public_buckets: AllowList, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            public_buckets: Arc::new(public_buckets),
            objects: ObjectService::new(store),
        }
    }
}
