//! Path routing and back/forward history.
//!
//! Three views exist: `/`, `/furniture` and `/furniture/<id>`. Anything
//! else redirects to the home view instead of erroring.

use crate::transition::Navigator;

/// A view the shell can render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Gallery,
    /// Detail view for a catalog id. The id may not exist in the catalog;
    /// the view renders a not-found state in that case.
    Detail(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => String::from("/"),
            Route::Gallery => String::from("/furniture"),
            Route::Detail(id) => format!("/furniture/{}", id),
        }
    }
}

/// Outcome of resolving a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Render(Route),
    Redirect(Route),
}

impl Resolution {
    pub fn route(&self) -> &Route {
        match self {
            Resolution::Render(r) | Resolution::Redirect(r) => r,
        }
    }
}

/// Map a path to a route. Query strings and fragments are ignored, as is a
/// trailing slash.
pub fn resolve(path: &str) -> Resolution {
    let path = path.split(|c: char| c == '?' || c == '#').next().unwrap_or("");
    if !path.is_empty() && !path.starts_with('/') {
        return Resolution::Redirect(Route::Home);
    }
    let trimmed = path.trim_end_matches('/');
    let segments: Vec<&str> = trimmed.split('/').skip(1).collect();

    match segments.as_slice() {
        [] => Resolution::Render(Route::Home),
        ["furniture"] => Resolution::Render(Route::Gallery),
        ["furniture", id] if !id.is_empty() => {
            Resolution::Render(Route::Detail((*id).to_string()))
        }
        _ => Resolution::Redirect(Route::Home),
    }
}

/// Current location plus browser-style history.
#[derive(Debug, Clone)]
pub struct Router {
    route: Route,
    history: Vec<String>,
    history_idx: usize,
    scroll_reset: bool,
}

impl Router {
    /// Start at `path` (resolved, so an unknown start path lands on home).
    pub fn new(path: &str) -> Self {
        let route = resolve(path).route().clone();
        Self {
            history: vec![route.path()],
            history_idx: 0,
            route,
            scroll_reset: true,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn current_path(&self) -> String {
        self.route.path()
    }

    pub fn can_go_back(&self) -> bool {
        self.history_idx > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.history_idx + 1 < self.history.len()
    }

    /// Push `path` to history and switch views.
    pub fn push(&mut self, path: &str) {
        let resolution = resolve(path);
        if let Resolution::Redirect(ref to) = resolution {
            log::info!("Unknown route {}, redirecting to {}", path, to.path());
        }
        let route = resolution.route().clone();
        let canonical = route.path();
        if self.history[self.history_idx] != canonical {
            // Truncate forward history before pushing
            self.history.truncate(self.history_idx + 1);
            self.history.push(canonical);
            self.history_idx = self.history.len() - 1;
        }
        self.set_route(route);
    }

    /// Step one entry back in history.
    pub fn go_back(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.history_idx -= 1;
        let route = resolve(&self.history[self.history_idx]).route().clone();
        self.set_route(route);
        true
    }

    /// Step one entry forward in history.
    pub fn go_forward(&mut self) -> bool {
        if !self.can_go_forward() {
            return false;
        }
        self.history_idx += 1;
        let route = resolve(&self.history[self.history_idx]).route().clone();
        self.set_route(route);
        true
    }

    /// Returns `true` once after each view change so the shell can scroll
    /// the new view to the top.
    pub fn take_scroll_reset(&mut self) -> bool {
        std::mem::take(&mut self.scroll_reset)
    }

    fn set_route(&mut self, route: Route) {
        if route != self.route {
            log::info!("Route {} -> {}", self.route.path(), route.path());
            self.route = route;
            self.scroll_reset = true;
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for Router {
    fn navigate(&mut self, path: &str) {
        self.push(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_paths() {
        assert_eq!(resolve("/"), Resolution::Render(Route::Home));
        assert_eq!(resolve(""), Resolution::Render(Route::Home));
        assert_eq!(resolve("/furniture"), Resolution::Render(Route::Gallery));
        assert_eq!(resolve("/furniture/"), Resolution::Render(Route::Gallery));
        assert_eq!(
            resolve("/furniture/table1?ref=home#top"),
            Resolution::Render(Route::Detail("table1".into()))
        );
    }

    #[test]
    fn unknown_paths_redirect_home() {
        assert_eq!(resolve("/xyz"), Resolution::Redirect(Route::Home));
        assert_eq!(
            resolve("/furniture/table1/extra"),
            Resolution::Redirect(Route::Home)
        );
        let mut router = Router::new("/furniture");
        router.push("/xyz");
        assert_eq!(router.route(), &Route::Home);
        assert_eq!(router.current_path(), "/");
    }

    #[test]
    fn detail_route_keeps_unknown_ids() {
        // The view decides what "not found" looks like, not the router.
        let router = Router::new("/furniture/sofa99");
        assert_eq!(router.route(), &Route::Detail("sofa99".into()));
    }

    #[test]
    fn history_back_forward_and_truncation() {
        let mut router = Router::new("/");
        router.push("/furniture");
        router.push("/furniture/chair1");
        assert!(router.go_back());
        assert_eq!(router.route(), &Route::Gallery);
        router.push("/furniture/shelf1");
        assert!(!router.can_go_forward());
        assert!(router.go_back());
        assert!(router.go_back());
        assert_eq!(router.route(), &Route::Home);
        assert!(!router.go_back());
        assert!(router.go_forward());
        assert_eq!(router.route(), &Route::Gallery);
    }

    #[test]
    fn scroll_reset_fires_once_per_change() {
        let mut router = Router::new("/");
        assert!(router.take_scroll_reset());
        assert!(!router.take_scroll_reset());
        router.push("/");
        assert!(!router.take_scroll_reset());
        router.push("/furniture");
        assert!(router.take_scroll_reset());
    }
}
