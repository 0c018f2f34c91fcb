//! Filter registry consulted by the compiler.
//!
//! The compiler never evaluates a filter; it only needs to know whether an
//! identifier names a known filter and what kind of value that filter yields.
//! Host applications supply that knowledge through [`FilterRegistry`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use strsim::levenshtein;

/// Maximum Levenshtein distance to consider an identifier as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// The kind of value a filter produces.
///
/// Only numerical filters may appear as calculator operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Produces a number (counts, scores).
    Numerical,
    /// Produces text (post body, screen name).
    Text,
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterKind::Numerical => write!(f, "numerical"),
            FilterKind::Text => write!(f, "text"),
        }
    }
}

/// Identity and kind of a registered filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterDescriptor {
    /// Identifier used in query text (e.g. `favorite_count`).
    #[serde(rename = "id")]
    pub identifier: String,
    /// Kind of value the filter produces.
    pub kind: FilterKind,
}

impl FilterDescriptor {
    /// Creates a descriptor.
    pub fn new(identifier: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            identifier: identifier.into(),
            kind,
        }
    }

    /// Creates a numerical filter descriptor.
    pub fn numerical(identifier: impl Into<String>) -> Self {
        Self::new(identifier, FilterKind::Numerical)
    }

    /// Creates a text filter descriptor.
    pub fn text(identifier: impl Into<String>) -> Self {
        Self::new(identifier, FilterKind::Text)
    }
}

/// Read-only lookup of filters by identifier.
///
/// Implementations must be side-effect free: the compiler may call
/// [`lookup`](FilterRegistry::lookup) any number of times per compilation.
pub trait FilterRegistry {
    /// Returns the descriptor registered under `identifier`, if any.
    fn lookup(&self, identifier: &str) -> Option<&FilterDescriptor>;

    /// Returns every registered identifier.
    ///
    /// Used only to build "did you mean" suggestions; the default returns
    /// nothing, which disables suggestions.
    fn identifiers(&self) -> Vec<&str> {
        Vec::new()
    }
}

impl<R: FilterRegistry + ?Sized> FilterRegistry for &R {
    fn lookup(&self, identifier: &str) -> Option<&FilterDescriptor> {
        (**self).lookup(identifier)
    }

    fn identifiers(&self) -> Vec<&str> {
        (**self).identifiers()
    }
}

/// An ordered, owned set of filter descriptors.
///
/// # Example
///
/// ```
/// use twitch_filter_rs::{FilterDescriptor, FilterKind, FilterRegistry, FilterSet};
///
/// let filters = FilterSet::builtin().with(FilterDescriptor::numerical("reply_count"));
/// assert_eq!(filters.lookup("reply_count").map(|f| f.kind), Some(FilterKind::Numerical));
/// assert_eq!(filters.lookup("text").map(|f| f.kind), Some(FilterKind::Text));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    filters: BTreeMap<String, FilterDescriptor>,
}

impl FilterSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set holding the filters shipped with the client.
    pub fn builtin() -> Self {
        Self::new()
            .with(FilterDescriptor::numerical("favorite_count"))
            .with(FilterDescriptor::numerical("followers_count"))
            .with(FilterDescriptor::numerical("friends_count"))
            .with(FilterDescriptor::numerical("listed_count"))
            .with(FilterDescriptor::numerical("retweet_count"))
            .with(FilterDescriptor::numerical("statuses_count"))
            .with(FilterDescriptor::text("text"))
    }

    /// Registers a descriptor, returning the one it replaced.
    pub fn register(&mut self, descriptor: FilterDescriptor) -> Option<FilterDescriptor> {
        self.filters
            .insert(descriptor.identifier.clone(), descriptor)
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, descriptor: FilterDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    /// Returns the descriptor for `identifier`.
    pub fn get(&self, identifier: &str) -> Option<&FilterDescriptor> {
        self.filters.get(identifier)
    }

    /// Number of registered filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether no filter is registered.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Iterates over descriptors in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &FilterDescriptor> {
        self.filters.values()
    }
}

impl Extend<FilterDescriptor> for FilterSet {
    fn extend<I: IntoIterator<Item = FilterDescriptor>>(&mut self, iter: I) {
        for descriptor in iter {
            self.register(descriptor);
        }
    }
}

impl FromIterator<FilterDescriptor> for FilterSet {
    fn from_iter<I: IntoIterator<Item = FilterDescriptor>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl FilterRegistry for FilterSet {
    fn lookup(&self, identifier: &str) -> Option<&FilterDescriptor> {
        self.get(identifier)
    }

    fn identifiers(&self) -> Vec<&str> {
        self.filters.keys().map(String::as_str).collect()
    }
}

/// Finds the registered identifier closest to `identifier`.
///
/// Returns `None` when nothing is within [`MAX_SUGGESTION_DISTANCE`] edits or
/// when the best candidate is an exact match.
pub fn suggest_identifier<R: FilterRegistry + ?Sized>(
    registry: &R,
    identifier: &str,
) -> Option<String> {
    let query = identifier.to_lowercase();

    let (best_match, best_distance) = registry
        .identifiers()
        .into_iter()
        .filter(|name| !name.is_empty())
        .map(|name| (name, levenshtein(&query, &name.to_lowercase())))
        .min_by_key(|(_, distance)| *distance)?;

    if best_distance > 0 && best_distance <= MAX_SUGGESTION_DISTANCE {
        Some(best_match.to_string())
    } else {
        None
    }
}
