// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use log::{debug, info};

use crate::{
    error::{self, Result},
    guard::{Attempt, Decision, Guard, SessionSource},
    routes::{RouteLocation, RouteTable},
};

/// Redirects followed for a single navigation before giving up.
const MAX_REDIRECTS: usize = 8;

/// A navigation that has been requested but not yet guarded.
#[derive(Debug)]
pub(crate) struct Pending {
    id: u64,
    to: RouteLocation,
}

/// The result of guarding one navigation attempt.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Navigation {
    pub(crate) id: u64,
    pub(crate) requested: RouteLocation,
    pub(crate) outcome: Attempt,
    /// Where the navigation ended up after following redirects.
    pub(crate) location: RouteLocation,
    /// False when a newer navigation started before this one finished.
    pub(crate) committed: bool,
}

pub(crate) struct Navigator<S> {
    guard: Guard<S>,
    routes: RouteTable,
    current: Option<RouteLocation>,
    latest: u64,
}

impl<S: SessionSource> Navigator<S> {
    pub(crate) const fn new(guard: Guard<S>, routes: RouteTable) -> Self {
        Self {
            guard,
            routes,
            current: None,
            latest: 0,
        }
    }

    pub(crate) const fn current(&self) -> Option<&RouteLocation> {
        self.current.as_ref()
    }

    pub(crate) const fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub(crate) const fn guard(&self) -> &Guard<S> {
        &self.guard
    }

    /// Perform the initial navigation, e.g. for the path the application was
    /// opened at. It is guarded like any other.
    pub(crate) fn start(&mut self, path: &str) -> Result<Navigation> {
        self.current = None;
        self.navigate(path)
    }

    pub(crate) fn navigate(&mut self, path: &str) -> Result<Navigation> {
        let pending = self.begin(path);
        self.finish(pending)
    }

    /// Register a navigation to `path`. Any navigation begun earlier and not
    /// yet finished is superseded by this one.
    pub(crate) fn begin(&mut self, path: &str) -> Pending {
        self.latest += 1;
        Pending {
            id: self.latest,
            to: self.routes.resolve(path),
        }
    }

    /// Guard a navigation and follow any redirects. The final location only
    /// becomes current if no newer navigation has begun in the meantime.
    pub(crate) fn finish(&mut self, pending: Pending) -> Result<Navigation> {
        let from = self.current.clone();
        let outcome = self
            .guard
            .before_each(&pending.to, from.as_ref(), |decision| {
                Attempt::Pending.settle(decision)
            });
        debug_assert!(outcome.is_settled());

        let mut location = pending.to.clone();
        let mut state = outcome.clone();
        let mut hops = 0_usize;
        while let Attempt::Redirected(target) = state {
            hops += 1;
            if hops > MAX_REDIRECTS {
                return Err(error::Navigation::RedirectLoop {
                    path: pending.to.path,
                    hops: MAX_REDIRECTS,
                }
                .into());
            }
            debug!("Following redirect from {} to {}", location.path, target);
            let next = self.routes.resolve(&target);
            state = match self.guard.decide(&next, from.as_ref()) {
                Decision::Proceed => Attempt::Allowed,
                Decision::Redirect(to) => Attempt::Redirected(to),
            };
            location = next;
        }

        let committed = pending.id == self.latest;
        if committed {
            self.current = Some(location.clone());
        } else {
            info!(
                "Navigation to {} was superseded by a newer navigation",
                pending.to.path
            );
        }

        Ok(Navigation {
            id: pending.id,
            requested: pending.to,
            outcome,
            location,
            committed,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{
        guard::{PublicPages, LOGIN_PATH},
        session::tests::alice,
        storage,
        store::SessionStore,
    };

    type Shared = Rc<RefCell<SessionStore<storage::Memory>>>;

    fn navigator() -> (Shared, Navigator<Shared>) {
        let store = Rc::new(RefCell::new(SessionStore::new(storage::Memory::new())));
        let guard = Guard::new(Rc::clone(&store), PublicPages::default(), LOGIN_PATH);
        (store, Navigator::new(guard, RouteTable::default()))
    }

    #[test]
    fn deep_link_without_session_lands_on_login() -> Result<()> {
        let (store, mut nav) = navigator();
        assert!(store.borrow_mut().hydrate().is_none());

        let navigation = nav.start("/profile")?;
        assert_eq!(navigation.outcome, Attempt::Redirected(LOGIN_PATH.to_owned()));
        assert_eq!(navigation.requested.path, "/profile");
        assert_eq!(navigation.location.path, LOGIN_PATH);
        assert_eq!(navigation.location.name, Some("login"));
        assert!(navigation.committed);
        assert_eq!(nav.current().map(|l| l.path.as_str()), Some(LOGIN_PATH));
        Ok(())
    }

    #[test]
    fn login_logout_cycle() -> Result<()> {
        let (store, mut nav) = navigator();
        let _ = nav.start("/login")?;

        let _ = store.borrow_mut().set_user(alice());
        assert_eq!(store.borrow().current_user(), Some(&alice()));
        let navigation = nav.navigate("/profile")?;
        assert_eq!(navigation.outcome, Attempt::Allowed);
        assert_eq!(navigation.location.path, "/profile");

        let _ = store.borrow_mut().clear_user();
        assert!(store.borrow().current_user().is_none());
        let navigation = nav.navigate("/")?;
        assert_eq!(navigation.outcome, Attempt::Redirected(LOGIN_PATH.to_owned()));
        assert_eq!(nav.current().map(|l| l.path.as_str()), Some(LOGIN_PATH));

        let navigation = nav.navigate("/login")?;
        assert_eq!(navigation.outcome, Attempt::Allowed);
        Ok(())
    }

    #[test]
    fn route_params_are_kept() -> Result<()> {
        let (store, mut nav) = navigator();
        let _ = store.borrow_mut().set_user(alice());

        let navigation = nav.navigate("/group/g7")?;
        assert_eq!(navigation.outcome, Attempt::Allowed);
        assert_eq!(
            navigation.location.params.get("groupId").map(String::as_str),
            Some("g7")
        );
        Ok(())
    }

    #[test]
    fn newer_navigation_wins() -> Result<()> {
        let (store, mut nav) = navigator();
        let _ = store.borrow_mut().set_user(alice());

        let first = nav.begin("/profile");
        let second = nav.begin("/group/g1");

        let second = nav.finish(second)?;
        assert!(second.committed);

        let first = nav.finish(first)?;
        assert!(second.id > first.id);
        assert_eq!(first.outcome, Attempt::Allowed);
        assert!(!first.committed);
        assert_eq!(nav.current().map(|l| l.path.as_str()), Some("/group/g1"));
        Ok(())
    }

    #[test]
    fn redirect_loops_are_reported() {
        let store = SessionStore::new(storage::Memory::new());
        // The login page itself is not public, so the redirect never settles.
        let guard = Guard::new(&store, PublicPages::new(["/register"]), LOGIN_PATH);
        let mut nav = Navigator::new(guard, RouteTable::default());

        let err = nav.navigate("/profile").unwrap_err();
        assert!(matches!(
            err,
            error::Error::Navigation(error::Navigation::RedirectLoop { ref path, .. }) if path == "/profile"
        ));
        assert!(nav.current().is_none());
    }
}
