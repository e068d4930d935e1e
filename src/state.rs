use crate::controller::Controller;
use crate::remote::HttpRemoteStore;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<Mutex<Controller<HttpRemoteStore>>>,
}

impl AppState {
    pub fn new(controller: Controller<HttpRemoteStore>) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
        }
    }
}
