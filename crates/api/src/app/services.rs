//! Shared application services handed to handlers via `Extension`.

use std::sync::Arc;

use pessoas_infra::UserStore;

pub struct AppServices {
    store: Arc<dyn UserStore>,
}

impl AppServices {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub fn users(&self) -> &dyn UserStore {
        self.store.as_ref()
    }
}
