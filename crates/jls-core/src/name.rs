//! An owned short-string name type plus a string interner for identifiers
//! that recur heavily (member names, keywords) across a compile task.

use lasso::{Rodeo, Spur};
use smol_str::SmolStr;

#[derive(Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Default)]
#[repr(transparent)]
pub struct Name(SmolStr);

impl Name {
    #[inline]
    pub fn new(text: impl Into<SmolStr>) -> Self {
        Self(text.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Name").field(&self.0.as_str()).finish()
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// A symbolic identifier for a name stored in a [`NameInterner`].
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct InternedName(Spur);

impl std::fmt::Debug for InternedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InternedName({:?})", self.0)
    }
}

/// Not thread-safe by design: each compile task owns one interner for the
/// duration of its lease, matching the single-task-at-a-time model in
/// spec.md §5.
#[derive(Default)]
pub struct NameInterner {
    rodeo: Rodeo,
}

impl NameInterner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, text: &str) -> InternedName {
        InternedName(self.rodeo.get_or_intern(text))
    }

    pub fn resolve(&self, name: InternedName) -> &str {
        self.rodeo.resolve(&name.0)
    }
}
