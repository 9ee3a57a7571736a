/// Static description of a route the UI can navigate to.
///
/// The table itself lives in [`crate::router::ROUTES`] and is never mutated
/// at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub path: &'static str,
    pub requires_auth: bool,
    /// Static window title used when the backend's app info is unavailable.
    pub title: Option<&'static str>,
    /// Unconditional redirect target, for alias routes like `/`.
    pub redirect: Option<&'static str>,
}
