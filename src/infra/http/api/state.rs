use std::sync::Arc;

use crate::application::{counter::CounterService, users::UserService};

#[derive(Clone)]
pub struct ApiState {
    pub users: Arc<UserService>,
    pub counter: Arc<CounterService>,
}
