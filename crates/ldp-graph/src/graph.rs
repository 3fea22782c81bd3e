use std::collections::BTreeSet;

use crate::term::{Quad, Term};

/// An in-memory set of quads.
///
/// Backed by an ordered set so iteration order is deterministic, which keeps
/// serialized output stable across runs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Graph {
    quads: BTreeSet<Quad>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a quad. Returns `true` if it was not already present.
    pub fn insert(&mut self, quad: Quad) -> bool {
        self.quads.insert(quad)
    }

    /// Remove a quad. Returns `true` if it was present.
    pub fn remove(&mut self, quad: &Quad) -> bool {
        self.quads.remove(quad)
    }

    pub fn contains(&self, quad: &Quad) -> bool {
        self.quads.contains(quad)
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Quad> {
        self.quads.iter()
    }

    /// Quads matching a pattern; `None` positions are wildcards.
    pub fn quads_matching<'a>(
        &'a self,
        subject: Option<&'a Term>,
        predicate: Option<&'a Term>,
        object: Option<&'a Term>,
    ) -> impl Iterator<Item = &'a Quad> + 'a {
        self.quads.iter().filter(move |quad| {
            subject.map_or(true, |s| quad.subject == *s)
                && predicate.map_or(true, |p| quad.predicate == *p)
                && object.map_or(true, |o| quad.object == *o)
        })
    }

    /// Whether at least one quad matches the pattern.
    pub fn has_match(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
    ) -> bool {
        self.quads_matching(subject, predicate, object)
            .next()
            .is_some()
    }

    /// Distinct subjects of quads with the given predicate and object.
    pub fn subjects_with(&self, predicate: &Term, object: &Term) -> BTreeSet<Term> {
        self.quads_matching(None, Some(predicate), Some(object))
            .map(|quad| quad.subject.clone())
            .collect()
    }

    /// Every quad whose subject is in `subjects`.
    pub fn describe(&self, subjects: &BTreeSet<Term>) -> Graph {
        self.quads
            .iter()
            .filter(|quad| subjects.contains(&quad.subject))
            .cloned()
            .collect()
    }

    pub fn into_quads(self) -> Vec<Quad> {
        self.quads.into_iter().collect()
    }
}

impl FromIterator<Quad> for Graph {
    fn from_iter<I: IntoIterator<Item = Quad>>(iter: I) -> Self {
        Self {
            quads: iter.into_iter().collect(),
        }
    }
}

impl Extend<Quad> for Graph {
    fn extend<I: IntoIterator<Item = Quad>>(&mut self, iter: I) {
        self.quads.extend(iter);
    }
}

impl IntoIterator for Graph {
    type Item = Quad;
    type IntoIter = std::collections::btree_set::IntoIter<Quad>;

    fn into_iter(self) -> Self::IntoIter {
        self.quads.into_iter()
    }
}
