//! Route matching logic.
//!
//! # Responsibilities
//! - Match the list path of a resource (`/todos`)
//! - Match the detail path of a resource (`/todos/{id}`)
//! - Honor the trailing slash setting
//! - Split off an optional format suffix (`.json`)
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Prefix match is exact on the first segment; no nesting
//! - Lookup values match `[^/.]+`
//! - No regex to guarantee O(n) matching

/// Captures from a successful path match.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathMatch<'a> {
    /// Detail lookup value, if the route has one.
    pub lookup: Option<&'a str>,
    /// Format suffix without the dot, e.g. `json`.
    pub format: Option<&'a str>,
}

/// Trait for matching request paths against a generated route.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns the captures if `path` matches this route.
    fn match_path<'a>(&self, path: &'a str) -> Option<PathMatch<'a>>;
}

/// Shared shape settings for generated routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathShape {
    pub trailing_slash: bool,
    pub format_suffixes: bool,
}

impl PathShape {
    /// Strip the leading `/`, apply the trailing slash rule and split off the format.
    ///
    /// With trailing slashes enabled, a suffixed path matches with or without the slash.
    fn split<'a>(&self, path: &'a str) -> Option<(&'a str, Option<&'a str>)> {
        let rest = path.strip_prefix('/')?;
        let (body, slash) = match rest.strip_suffix('/') {
            Some(body) => (body, true),
            None => (rest, false),
        };
        if slash && !self.trailing_slash {
            return None;
        }
        let (base, format) = self.split_format(body)?;
        if self.trailing_slash && !slash && format.is_none() {
            return None;
        }
        Some((base, format))
    }

    /// Split `todos.json` into (`todos`, `json`).
    fn split_format<'a>(&self, body: &'a str) -> Option<(&'a str, Option<&'a str>)> {
        match body.rsplit_once('.') {
            None => Some((body, None)),
            Some((base, format)) if self.format_suffixes && is_format(format) => {
                Some((base, Some(format)))
            }
            Some(_) => None,
        }
    }
}

fn is_format(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}

fn is_lookup(s: &str) -> bool {
    !s.is_empty() && !s.contains(['/', '.'])
}

/// Matches the list route of a resource.
#[derive(Debug, Clone)]
pub struct ListMatcher {
    prefix: String,
    shape: PathShape,
}

impl ListMatcher {
    pub fn new(prefix: impl Into<String>, shape: PathShape) -> Self {
        Self {
            prefix: prefix.into(),
            shape,
        }
    }
}

impl Matcher for ListMatcher {
    fn match_path<'a>(&self, path: &'a str) -> Option<PathMatch<'a>> {
        let (base, format) = self.shape.split(path)?;
        (base == self.prefix).then_some(PathMatch {
            lookup: None,
            format,
        })
    }
}

/// Matches the detail route of a resource.
#[derive(Debug, Clone)]
pub struct DetailMatcher {
    prefix: String,
    shape: PathShape,
}

impl DetailMatcher {
    pub fn new(prefix: impl Into<String>, shape: PathShape) -> Self {
        Self {
            prefix: prefix.into(),
            shape,
        }
    }
}

impl Matcher for DetailMatcher {
    fn match_path<'a>(&self, path: &'a str) -> Option<PathMatch<'a>> {
        let (base, format) = self.shape.split(path)?;
        let (prefix, lookup) = base.split_once('/')?;
        (prefix == self.prefix && is_lookup(lookup)).then_some(PathMatch {
            lookup: Some(lookup),
            format,
        })
    }
}

/// Matches the API root (`/`, or `/.json` with format suffixes).
#[derive(Debug, Clone)]
pub struct RootMatcher {
    format_suffixes: bool,
}

impl RootMatcher {
    pub fn new(format_suffixes: bool) -> Self {
        Self { format_suffixes }
    }
}

impl Matcher for RootMatcher {
    fn match_path<'a>(&self, path: &'a str) -> Option<PathMatch<'a>> {
        if path == "/" {
            return Some(PathMatch::default());
        }
        let format = path.strip_prefix("/.")?;
        (self.format_suffixes && is_format(format)).then_some(PathMatch {
            lookup: None,
            format: Some(format),
        })
    }
}
