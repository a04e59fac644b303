use pathwise_application::AppServices;
use pathwise_execution::RecentEvents;

// Application state
#[derive(Clone)]
pub struct AppState {
    pub services: AppServices,
    pub events: RecentEvents,
}

impl AppState {
    pub fn new(services: AppServices, events: RecentEvents) -> Self {
        Self { services, events }
    }
}
