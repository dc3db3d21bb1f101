//! Explicitly constructed service graph shared by the HTTP handlers.

use std::sync::Arc;

use crate::application::{
    cache::KeyValueCache,
    counter::{CounterConfig, CounterService},
    health::{Pingable, ReadinessCheck},
    repos::{CounterRepo, UsersRepo},
    users::UserService,
};
use crate::infra::http::{ApiState, HttpState, RouterState};

#[derive(Clone)]
pub struct AppContext {
    pub counter: Arc<CounterService>,
    pub users: Arc<UserService>,
    pub readiness: Arc<ReadinessCheck>,
}

impl AppContext {
    pub fn new(
        counter_repo: Arc<dyn CounterRepo>,
        users_repo: Arc<dyn UsersRepo>,
        cache: Arc<dyn KeyValueCache>,
        dependencies: Vec<Arc<dyn Pingable>>,
        counter_config: CounterConfig,
    ) -> Self {
        Self {
            counter: Arc::new(CounterService::new(counter_repo, cache, counter_config)),
            users: Arc::new(UserService::new(users_repo)),
            readiness: Arc::new(ReadinessCheck::new(dependencies)),
        }
    }

    pub fn router_state(&self) -> RouterState {
        RouterState {
            http: HttpState {
                counter: self.counter.clone(),
                readiness: self.readiness.clone(),
            },
            api: ApiState {
                users: self.users.clone(),
                counter: self.counter.clone(),
            },
        }
    }
}
