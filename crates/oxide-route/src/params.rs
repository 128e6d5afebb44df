//! Pooled parameter buffers and the per-request match state.

use std::ops::Range;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::pattern::Pattern;

/// Byte ranges of captured values, in pattern order.
pub(crate) type Binding = Vec<Range<usize>>;

/// A free list of parameter buffers owned by a single pattern.
///
/// Buffers are created on demand with the pattern's parameter count as
/// capacity, so the pool grows to the peak number of requests matching the
/// pattern at the same time.
#[derive(Debug)]
pub struct ParamPool {
    capacity: usize,
    free: Mutex<Vec<Binding>>,
}

impl ParamPool {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity,
            free: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn acquire(&self) -> Binding {
        self.free
            .lock()
            .pop()
            .unwrap_or_else(|| Vec::with_capacity(self.capacity))
    }

    pub(crate) fn release(&self, mut binding: Binding) {
        binding.clear();
        self.free.lock().push(binding);
    }

    /// Returns the capacity of every buffer handed out by this pool.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of buffers currently parked in the pool.
    pub fn idle(&self) -> usize {
        self.free.lock().len()
    }
}

/// The match attached to a request: the pattern that matched and the
/// parameters it bound.
///
/// Dropping a `RouteMatch` hands its buffer back to the pattern's pool.
#[derive(Debug)]
pub struct RouteMatch {
    pattern: Arc<Pattern>,
    binding: Binding,
}

impl RouteMatch {
    pub(crate) fn new(pattern: Arc<Pattern>, binding: Binding) -> Self {
        Self { pattern, binding }
    }

    pub(crate) fn fixed(pattern: Arc<Pattern>) -> Self {
        Self::new(pattern, Binding::new())
    }

    /// Returns the pattern that matched.
    pub fn pattern(&self) -> &Arc<Pattern> {
        &self.pattern
    }

    pub(crate) fn binding(&self) -> &[Range<usize>] {
        &self.binding
    }
}

impl Drop for RouteMatch {
    fn drop(&mut self) {
        if !self.pattern.is_static() {
            self.pattern
                .pool()
                .release(std::mem::take(&mut self.binding));
        }
    }
}

/// Read access to the parameters bound to a request.
///
/// Unknown names read as an empty string.
#[derive(Debug, Clone, Copy)]
pub struct Params<'a> {
    path: &'a str,
    keys: &'a [String],
    ranges: &'a [Range<usize>],
}

impl<'a> Params<'a> {
    pub(crate) fn new(path: &'a str, matched: Option<&'a RouteMatch>) -> Self {
        match matched {
            Some(m) => Self {
                path,
                keys: m.pattern.keys(),
                ranges: m.binding(),
            },
            None => Self {
                path,
                keys: &[],
                ranges: &[],
            },
        }
    }

    /// Returns the value of the first parameter named `key`, or `""`.
    pub fn by_name(&self, key: &str) -> &'a str {
        self.get(key).unwrap_or_default()
    }

    /// Gets a parameter value.
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Parses a parameter as a specific type.
    pub fn parse<T: FromStr>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|v| v.parse().ok())
    }

    /// Returns the parameters in pattern order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        let path = self.path;
        self.keys
            .iter()
            .zip(self.ranges)
            .map(move |(k, r)| (k.as_str(), path.get(r.clone()).unwrap_or_default()))
    }

    /// Returns the parameter values in pattern order.
    pub fn values(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.iter().map(|(_, v)| v)
    }

    /// Returns the number of bound parameters.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Returns true when nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
