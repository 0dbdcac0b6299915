use crate::auth::{Grant, Session};
use crate::config;

/// Outcome of evaluating a guard for a navigation attempt.
///
/// Both redirects replace the current history entry instead of pushing a
/// new one, so back-navigation cannot land on the guarded page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Render,
    RedirectLogin,
    RedirectUnauthorized,
}

/// Concrete navigation instruction derived from a non-`Render` outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub to: String,
    pub replace: bool,
}

impl GuardOutcome {
    pub fn renders(&self) -> bool {
        matches!(self, GuardOutcome::Render)
    }

    /// Destination for redirect outcomes, from the configured route table.
    pub fn redirect(&self) -> Option<Redirect> {
        let routes = &config::config().routes;
        match self {
            GuardOutcome::Render => None,
            GuardOutcome::RedirectLogin => {
                Some(Redirect { to: routes.login_path.clone(), replace: true })
            }
            GuardOutcome::RedirectUnauthorized => {
                Some(Redirect { to: routes.unauthorized_path.clone(), replace: true })
            }
        }
    }
}

/// Capability gate in front of a route subtree.
///
/// Pure with respect to its inputs: evaluate it on every navigation and
/// whenever the grant set changes. Guards compose by nesting - an outer
/// "any signed-in user" guard wrapping an inner specific-grant guard - via
/// [`evaluate_chain`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteGuard {
    required: Vec<Grant>,
}

impl RouteGuard {
    /// Gate that admits any signed-in user.
    pub fn authenticated() -> Self {
        Self { required: Vec::new() }
    }

    /// Gate that additionally requires at least one of `required` (logical
    /// OR across the pairs, exact equality per pair).
    pub fn require_any(required: Vec<Grant>) -> Self {
        Self { required }
    }

    pub fn required(&self) -> &[Grant] {
        &self.required
    }

    pub fn evaluate(&self, session: &Session) -> GuardOutcome {
        if !session.authenticated {
            return GuardOutcome::RedirectLogin;
        }
        if self.required.is_empty() || self.required.iter().any(|g| session.holds(g)) {
            GuardOutcome::Render
        } else {
            GuardOutcome::RedirectUnauthorized
        }
    }
}

/// Evaluate nested guards outermost-first; the first non-`Render` outcome
/// wins.
pub fn evaluate_chain<'a>(
    guards: impl IntoIterator<Item = &'a RouteGuard>,
    session: &Session,
) -> GuardOutcome {
    for guard in guards {
        let outcome = guard.evaluate(session);
        if !outcome.renders() {
            return outcome;
        }
    }
    GuardOutcome::Render
}
