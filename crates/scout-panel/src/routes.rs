//! Event routing table
//!
//! Composition registers a route for every window and surface label it
//! creates; teardown removes them. Host events for labels without a route
//! belong to something already destroyed and are dropped.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Owner {
    Panel,
    Enrichment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Route {
    PanelWindow,
    PanelChrome,
    PanelContent,
    EnrichmentWindow,
    EnrichmentSurface,
}

impl Route {
    pub(crate) fn owner(&self) -> Owner {
        match self {
            Route::PanelWindow | Route::PanelChrome | Route::PanelContent => Owner::Panel,
            Route::EnrichmentWindow | Route::EnrichmentSurface => Owner::Enrichment,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct EventRoutes {
    routes: HashMap<String, Route>,
}

impl EventRoutes {
    pub(crate) fn register(&mut self, label: &str, route: Route) {
        if let Some(previous) = self.routes.insert(label.to_string(), route) {
            tracing::warn!(label = %label, ?previous, ?route, "Replaced existing event route");
        }
    }

    pub(crate) fn unregister_owner(&mut self, owner: Owner) -> usize {
        let before = self.routes.len();
        self.routes.retain(|_, route| route.owner() != owner);
        before - self.routes.len()
    }

    pub(crate) fn route(&self, label: &str) -> Option<Route> {
        self.routes.get(label).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unregister_owner_keeps_other_routes() {
        let mut routes = EventRoutes::default();
        routes.register("panel", Route::PanelWindow);
        routes.register("chrome", Route::PanelChrome);
        routes.register("hidden", Route::EnrichmentWindow);

        assert_eq!(routes.unregister_owner(Owner::Panel), 2);
        assert_eq!(routes.route("chrome"), None);
        assert_eq!(routes.route("hidden"), Some(Route::EnrichmentWindow));
    }
}
