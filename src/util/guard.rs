//! Route guards over the current session state.
//!
//! SYSTEM CONTEXT
//! ==============
//! Views apply identical redirect behavior: protected views bounce anonymous
//! users to `/login`, public-only views bounce signed-in users to `/`. Both
//! wait (show a loading indicator) until session initialization settles.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::routes::Route;
use crate::state::session::SessionState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Guard {
    /// Render only for an authenticated session.
    Protected,
    /// Render only for an anonymous session.
    PublicOnly,
}

/// What a guard decided for the current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Loading,
    Render,
    Redirect(Route),
}

impl Guard {
    #[must_use]
    pub fn evaluate(self, state: &SessionState) -> GuardDecision {
        if !state.is_settled() {
            return GuardDecision::Loading;
        }
        match (self, state.is_authenticated()) {
            (Self::Protected, true) | (Self::PublicOnly, false) => GuardDecision::Render,
            (Self::Protected, false) => GuardDecision::Redirect(Route::Login),
            (Self::PublicOnly, true) => GuardDecision::Redirect(Route::Dashboard),
        }
    }

    /// Wrap `child` so it is only produced when this guard allows it.
    pub fn wrap<V>(self, child: V) -> Guarded<V> {
        Guarded { guard: self, child }
    }
}

/// Outcome of rendering a guarded child.
#[derive(Debug, PartialEq, Eq)]
pub enum Gate<V> {
    Loading,
    Show(V),
    Redirect(Route),
}

/// A displayable child behind a [`Guard`].
#[derive(Debug, Clone)]
pub struct Guarded<V> {
    guard: Guard,
    child: V,
}

impl<V> Guarded<V> {
    #[must_use]
    pub fn guard(&self) -> Guard {
        self.guard
    }

    /// Resolve against `state`, handing back the child only when allowed.
    pub fn render(self, state: &SessionState) -> Gate<V> {
        match self.guard.evaluate(state) {
            GuardDecision::Loading => Gate::Loading,
            GuardDecision::Render => Gate::Show(self.child),
            GuardDecision::Redirect(route) => Gate::Redirect(route),
        }
    }
}
