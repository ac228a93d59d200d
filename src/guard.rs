// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! The navigation guard, consulted before every route transition.

use std::{cell::RefCell, collections::BTreeSet, rc::Rc};

use log::{debug, warn};

use crate::{
    error::{self, Result},
    routes::RouteLocation,
    storage::Storage,
    store::SessionStore,
};

pub(crate) const LOGIN_PATH: &str = "/login";
pub(crate) const REGISTER_PATH: &str = "/register";

/// Decides which paths can be visited without a session.
pub(crate) trait Allowlist {
    fn is_public(&self, path: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Allowlist for F {
    fn is_public(&self, path: &str) -> bool {
        self(path)
    }
}

/// Paths that are public by exact string match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PublicPages(BTreeSet<String>);

impl PublicPages {
    pub(crate) fn new<I: IntoIterator<Item = S>, S: Into<String>>(paths: I) -> Self {
        Self(paths.into_iter().map(Into::into).collect())
    }
}

impl Default for PublicPages {
    fn default() -> Self {
        Self::new([LOGIN_PATH, REGISTER_PATH])
    }
}

impl Allowlist for PublicPages {
    fn is_public(&self, path: &str) -> bool {
        self.0.contains(path)
    }
}

/// Something the guard can ask whether a user is logged in.
pub(crate) trait SessionSource {
    fn has_session(&self) -> Result<bool>;
}

impl<S: Storage> SessionSource for SessionStore<S> {
    fn has_session(&self) -> Result<bool> {
        Ok(self.current_user().is_some())
    }
}

impl<T: SessionSource + ?Sized> SessionSource for &T {
    fn has_session(&self) -> Result<bool> {
        (**self).has_session()
    }
}

impl<T: SessionSource + ?Sized> SessionSource for Rc<T> {
    fn has_session(&self) -> Result<bool> {
        (**self).has_session()
    }
}

impl<T: SessionSource + ?Sized> SessionSource for RefCell<T> {
    fn has_session(&self) -> Result<bool> {
        self.try_borrow()
            .map_err(|_| error::Session::Busy)?
            .has_session()
    }
}

/// What the guard tells the router to do with a navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Decision {
    Proceed,
    Redirect(String),
}

/// The state of one navigation attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Attempt {
    Pending,
    Allowed,
    Redirected(String),
}

impl Attempt {
    /// Apply the guard's decision. Only a pending attempt changes state.
    pub(crate) fn settle(self, decision: Decision) -> Self {
        match (self, decision) {
            (Self::Pending, Decision::Proceed) => Self::Allowed,
            (Self::Pending, Decision::Redirect(to)) => Self::Redirected(to),
            (settled, _) => settled,
        }
    }

    pub(crate) const fn is_settled(&self) -> bool {
        !matches!(*self, Self::Pending)
    }
}

pub(crate) struct Guard<S> {
    session: S,
    public: Box<dyn Allowlist>,
    login_path: String,
}

impl<S: SessionSource> Guard<S> {
    pub(crate) fn new<A: Allowlist + 'static>(session: S, public: A, login_path: &str) -> Self {
        Self {
            session,
            public: Box::new(public),
            login_path: login_path.to_owned(),
        }
    }

    pub(crate) fn login_path(&self) -> &str {
        &self.login_path
    }

    pub(crate) fn is_public(&self, path: &str) -> bool {
        self.public.is_public(path)
    }

    /// Decide whether the transition to `to` may go ahead.
    ///
    /// Public paths always proceed. Everything else needs a session; when the
    /// session cannot be looked up, access is denied.
    pub(crate) fn decide(&self, to: &RouteLocation, from: Option<&RouteLocation>) -> Decision {
        let from_path = from.map_or("(start)", |location| location.path.as_str());

        if self.is_public(&to.path) {
            debug!("{} -> {}: public", from_path, to.path);
            return Decision::Proceed;
        }

        match self.session.has_session() {
            Ok(true) => {
                debug!("{} -> {}: logged in", from_path, to.path);
                Decision::Proceed
            }
            Ok(false) => {
                debug!("{} -> {}: not logged in, redirecting to {}", from_path, to.path, self.login_path);
                Decision::Redirect(self.login_path.clone())
            }
            Err(e) => {
                warn!("Denying access to {} because the session could not be checked: {}", to.path, e);
                Decision::Redirect(self.login_path.clone())
            }
        }
    }

    /// Run the guard as an interceptor: `next` is called exactly once with
    /// the decision.
    pub(crate) fn before_each<R, F: FnOnce(Decision) -> R>(
        &self,
        to: &RouteLocation,
        from: Option<&RouteLocation>,
        next: F,
    ) -> R {
        next(self.decide(to, from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        routes::RouteTable,
        session::tests::alice,
        storage,
    };

    struct Broken;

    impl SessionSource for Broken {
        fn has_session(&self) -> Result<bool> {
            Err(error::Storage::Unavailable.into())
        }
    }

    fn at(path: &str) -> RouteLocation {
        RouteTable::default().resolve(path)
    }

    fn redirect_to_login() -> Decision {
        Decision::Redirect(LOGIN_PATH.to_owned())
    }

    #[test]
    fn public_pages_proceed_regardless_of_session() {
        let mut store = SessionStore::new(storage::Memory::new());
        for path in [LOGIN_PATH, REGISTER_PATH] {
            let guard = Guard::new(&store, PublicPages::default(), LOGIN_PATH);
            assert_eq!(guard.decide(&at(path), None), Decision::Proceed);
        }

        let _ = store.set_user(alice());
        for path in [LOGIN_PATH, REGISTER_PATH] {
            let guard = Guard::new(&store, PublicPages::default(), LOGIN_PATH);
            assert_eq!(guard.decide(&at(path), None), Decision::Proceed);
        }

        for path in [LOGIN_PATH, REGISTER_PATH] {
            let guard = Guard::new(Broken, PublicPages::default(), LOGIN_PATH);
            assert_eq!(guard.decide(&at(path), None), Decision::Proceed);
        }
    }

    #[test]
    fn protected_pages_redirect_without_a_session() {
        let store = SessionStore::new(storage::Memory::new());
        let guard = Guard::new(&store, PublicPages::default(), LOGIN_PATH);
        for path in ["/", "/profile", "/group/g1", "/unknown"] {
            assert_eq!(guard.decide(&at(path), Some(&at("/login"))), redirect_to_login());
        }
    }

    #[test]
    fn protected_pages_proceed_with_a_session() {
        let mut store = SessionStore::new(storage::Memory::new());
        let _ = store.set_user(alice());
        let guard = Guard::new(&store, PublicPages::default(), LOGIN_PATH);
        assert_eq!(guard.decide(&at("/profile"), None), Decision::Proceed);
        assert_eq!(guard.decide(&at("/group/g1"), None), Decision::Proceed);
    }

    #[test]
    fn lookup_failure_fails_closed() {
        let guard = Guard::new(Broken, PublicPages::default(), LOGIN_PATH);
        for path in ["/", "/profile", "/group/g1"] {
            assert_eq!(guard.decide(&at(path), None), redirect_to_login());
        }
    }

    #[test]
    fn busy_store_fails_closed() {
        let store = Rc::new(RefCell::new(SessionStore::new(storage::Memory::new())));
        let _ = store.borrow_mut().set_user(alice());
        let guard = Guard::new(Rc::clone(&store), PublicPages::default(), LOGIN_PATH);

        assert_eq!(guard.decide(&at("/profile"), None), Decision::Proceed);

        let _writer = store.borrow_mut();
        assert_eq!(guard.decide(&at("/profile"), None), redirect_to_login());
    }

    #[test]
    fn allowlist_matches_exactly() {
        let pages = PublicPages::default();
        assert!(pages.is_public("/login"));
        assert!(!pages.is_public("/login/"));
        assert!(!pages.is_public("/Login"));
        assert!(!pages.is_public("/"));
    }

    #[test]
    fn allowlist_can_be_a_predicate() {
        let store = SessionStore::new(storage::Memory::new());
        let guard = Guard::new(&store, |path: &str| path.starts_with("/public/"), "/signin");
        assert_eq!(guard.decide(&at("/public/terms"), None), Decision::Proceed);
        assert_eq!(
            guard.decide(&at("/login"), None),
            Decision::Redirect("/signin".to_owned())
        );
        assert_eq!(guard.login_path(), "/signin");
    }

    #[test]
    fn continuation_receives_the_decision() {
        let store = SessionStore::new(storage::Memory::new());
        let guard = Guard::new(&store, PublicPages::default(), LOGIN_PATH);

        let mut calls = Vec::new();
        guard.before_each(&at("/profile"), None, |decision| calls.push(decision));
        guard.before_each(&at("/register"), None, |decision| calls.push(decision));
        assert_eq!(calls, vec![redirect_to_login(), Decision::Proceed]);
    }

    #[test]
    fn attempts_settle_once() {
        let allowed = Attempt::Pending.settle(Decision::Proceed);
        assert_eq!(allowed, Attempt::Allowed);
        assert!(allowed.is_settled());
        assert_eq!(allowed.settle(redirect_to_login()), Attempt::Allowed);

        let redirected = Attempt::Pending.settle(redirect_to_login());
        assert_eq!(redirected, Attempt::Redirected(LOGIN_PATH.to_owned()));
        assert_eq!(redirected.clone().settle(Decision::Proceed), redirected);
        assert!(!Attempt::Pending.is_settled());
    }
}
