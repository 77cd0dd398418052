//! Filters applied around matched routes.
//!
//! # Responsibilities
//! - Define the filter capability (`uri`, `priority`, `call`)
//! - Give wrappers and the filters they decorate one identity
//! - Expose the bound filters as an ordered, duplicate-free set
//!
//! # Design Decisions
//! - `uri() == None` means the filter applies to every path
//! - A `uri()` regex must cover the whole path; [`whole_path`] anchors one
//! - Higher priority runs first; equal priorities keep bind order
//! - Identity follows `delegate()` to the innermost filter, so a
//!   [`DelegatingFilter`] is "equal" to the filter it wraps

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::http::{Outcome, RequestContext};
use crate::routing::route::Route;

/// An interceptor layered around route dispatch.
pub trait Filter: Send + Sync {
    /// Intercept a request. `Some` short-circuits the rest of the chain and the action.
    fn call(&self, route: &Route, context: &mut RequestContext) -> Option<Outcome>;

    /// Paths this filter applies to. `None` applies everywhere.
    ///
    /// Tested with `is_match`, so the regex must be anchored at both ends
    /// (see [`whole_path`]) or it applies wherever it occurs in the path.
    fn uri(&self) -> Option<&Regex>;

    fn priority(&self) -> i32;

    /// The filter this one decorates, if any.
    fn delegate(&self) -> Option<&Arc<dyn Filter>> {
        None
    }
}

/// Identity of a filter, seen through any delegation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterId(usize);

impl FilterId {
    pub fn of(filter: &Arc<dyn Filter>) -> Self {
        let mut current = filter;
        while let Some(inner) = current.delegate() {
            current = inner;
        }
        Self(Arc::as_ptr(current) as *const () as usize)
    }
}

/// Compile `pattern` so it only matches an entire path.
pub fn whole_path(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}

/// True if `filter` applies to `path`.
pub fn applies_to(filter: &dyn Filter, path: &str) -> bool {
    filter.uri().map_or(true, |uri| uri.is_match(path))
}

/// Forwards every call to another filter.
pub struct DelegatingFilter {
    inner: Arc<dyn Filter>,
}

impl DelegatingFilter {
    pub fn new(inner: Arc<dyn Filter>) -> Self {
        Self { inner }
    }
}

impl Filter for DelegatingFilter {
    fn call(&self, route: &Route, context: &mut RequestContext) -> Option<Outcome> {
        self.inner.call(route, context)
    }

    fn uri(&self) -> Option<&Regex> {
        self.inner.uri()
    }

    fn priority(&self) -> i32 {
        self.inner.priority()
    }

    fn delegate(&self) -> Option<&Arc<dyn Filter>> {
        Some(&self.inner)
    }
}

type FilterFn = dyn Fn(&Route, &mut RequestContext) -> Option<Outcome> + Send + Sync;

/// A filter backed by a closure.
pub struct FnFilter {
    priority: i32,
    uri: Option<Regex>,
    f: Box<FilterFn>,
}

impl FnFilter {
    /// `uri` is anchored with [`whole_path`]; `None` applies everywhere.
    pub fn new<F>(priority: i32, uri: Option<&str>, f: F) -> Result<Self, regex::Error>
    where
        F: Fn(&Route, &mut RequestContext) -> Option<Outcome> + Send + Sync + 'static,
    {
        Ok(Self {
            priority,
            uri: uri.map(whole_path).transpose()?,
            f: Box::new(f),
        })
    }
}

impl Filter for FnFilter {
    fn call(&self, route: &Route, context: &mut RequestContext) -> Option<Outcome> {
        (self.f)(route, context)
    }

    fn uri(&self) -> Option<&Regex> {
        self.uri.as_ref()
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// Snapshot of the bound filters, highest priority first.
#[derive(Clone, Default)]
pub struct FilterSet {
    filters: Vec<Arc<dyn Filter>>,
}

impl FilterSet {
    pub(crate) fn new(filters: Vec<Arc<dyn Filter>>) -> Self {
        Self { filters }
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Membership by identity; a wrapper counts as the filter it wraps.
    pub fn contains(&self, filter: &Arc<dyn Filter>) -> bool {
        let id = FilterId::of(filter);
        self.filters.iter().any(|f| FilterId::of(f) == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Filter>> {
        self.filters.iter()
    }

    /// Filters whose `uri()` accepts `path`, in priority order.
    pub fn applicable<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a Arc<dyn Filter>> + 'a {
        self.filters
            .iter()
            .filter(move |&filter| applies_to(&**filter, path))
    }
}

impl<'a> IntoIterator for &'a FilterSet {
    type Item = &'a Arc<dyn Filter>;
    type IntoIter = std::slice::Iter<'a, Arc<dyn Filter>>;

    fn into_iter(self) -> Self::IntoIter {
        self.filters.iter()
    }
}

impl fmt::Debug for FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.filters.iter().map(|filter| (FilterId::of(filter), filter.priority())))
            .finish()
    }
}
