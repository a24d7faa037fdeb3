//! Builds a fresh store for each request.

use prerender_core::{RequestContext, SessionConfig};

use crate::action::{Action, RouterAction};
use crate::store::Store;

/// Creates request-scoped stores.
#[derive(Debug, Clone, Default)]
pub struct StoreFactory {
    session: SessionConfig,
}

impl StoreFactory {
    /// Create a factory with the given session settings.
    pub fn new(session: SessionConfig) -> Self {
        Self { session }
    }

    /// Name of the cookie that identifies the viewer.
    pub fn session_cookie(&self) -> &str {
        &self.session.cookie_name
    }

    /// Build a store seeded from the request.
    ///
    /// The router domain gets the request location. The auth domain gets
    /// the session cookie's value when the cookie is present (even if
    /// empty), otherwise it is explicitly logged out.
    pub fn create(&self, ctx: &RequestContext) -> Store {
        let store = Store::default();

        store.dispatch(Action::Router(RouterAction::LocationChanged {
            pathname: ctx.path.clone(),
            search: ctx.query.clone(),
        }));

        match ctx.cookie(&self.session.cookie_name) {
            Some(value) => store.dispatch(Action::set_current_user(value)),
            None => store.dispatch(Action::logout()),
        }

        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AuthState;
    use prerender_core::Method;

    #[test]
    fn test_no_session_cookie_logged_out() {
        let ctx = RequestContext::new(Method::Get, "/").with_header("cookie", "theme=dark");
        let store = StoreFactory::default().create(&ctx);

        assert_eq!(store.state().auth, AuthState::signed_out());
    }

    #[test]
    fn test_session_cookie_sets_current_user() {
        let ctx = RequestContext::new(Method::Get, "/").with_header("Cookie", "session=v; a=b");
        let store = StoreFactory::default().create(&ctx);

        let auth = store.state().auth;
        assert!(auth.is_authenticated);
        assert_eq!(auth.current_user.as_deref(), Some("v"));
    }

    #[test]
    fn test_custom_cookie_name() {
        let factory = StoreFactory::new(SessionConfig::default().with_cookie_name("sid"));
        let ctx = RequestContext::new(Method::Get, "/").with_header("cookie", "session=x; sid=y");

        assert_eq!(
            factory.create(&ctx).state().auth.current_user.as_deref(),
            Some("y")
        );
    }

    #[test]
    fn test_location_recorded() {
        let ctx = RequestContext::new(Method::Get, "/about?tab=team");
        let state = StoreFactory::default().create(&ctx).state();

        assert_eq!(state.router.location.pathname, "/about");
        assert_eq!(state.router.location.search, "?tab=team");
    }

    #[test]
    fn test_stores_are_isolated() {
        let factory = StoreFactory::default();
        let ctx = RequestContext::new(Method::Get, "/");

        let first = factory.create(&ctx);
        first.dispatch(Action::set_domain("home", serde_json::json!(1)));
        let second = factory.create(&ctx);

        assert!(second.domain("home").is_none());
    }
}
