/// Router Module Index
///
/// Splits the HTTP surface by access level. Authentication is applied as a layer on the
/// whole authenticated router, so no protected endpoint can be mounted without it.

/// Routes reachable without a session: health probe, registration and login.
pub mod public;

/// Routes behind the bearer-token middleware. Owner-only mutations are additionally
/// checked inside the handlers by the ownership rule.
pub mod authenticated;
