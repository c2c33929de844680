use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Bills,
    NewBill,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Bills => "#employee/bills",
            Route::NewBill => "#employee/bill/new",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/" | "" => Some(Route::Login),
            "#employee/bills" => Some(Route::Bills),
            "#employee/bill/new" => Some(Route::NewBill),
            _ => None,
        }
    }
}

/// Something able to switch the current screen.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Keeps the last requested route until the main loop picks it up.
#[derive(Default)]
pub struct PendingRoute {
    route: Mutex<Option<Route>>,
}

impl PendingRoute {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Option<Route> {
        self.route.lock().ok().and_then(|mut route| route.take())
    }
}

impl Navigator for PendingRoute {
    fn navigate(&self, route: Route) {
        tracing::debug!(path = route.path(), "navigate");
        if let Ok(mut pending) = self.route.lock() {
            *pending = Some(route);
        }
    }
}
