// src/graph/mod.rs

//! In-memory RDF graph fetched from a metadata endpoint.
//!
//! Documents are parsed (see [`parse`]) into a flat list of triples kept in
//! document order, so every lookup below is deterministic: "the first
//! object" of a predicate is the first one the publisher wrote.

pub mod parse;
pub mod vocab;

use std::collections::HashSet;

pub use parse::RdfFormat;

/// An RDF literal value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    pub value: String,
    pub datatype: Option<String>,
    pub language: Option<String>,
}

/// A node or value in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Iri(String),
    Blank(String),
    Literal(Literal),
}

impl Term {
    /// Build an IRI term.
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    /// Build a plain literal term.
    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal(Literal {
            value: value.into(),
            datatype: None,
            language: None,
        })
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Term::Literal(lit) => Some(&lit.value),
            _ => None,
        }
    }

    /// True for IRIs and blank nodes, i.e. things that can carry properties.
    pub fn is_node(&self) -> bool {
        matches!(self, Term::Iri(_) | Term::Blank(_))
    }

    /// String form used when a term is read as a plain value.
    pub fn value(&self) -> &str {
        match self {
            Term::Iri(iri) => iri,
            Term::Blank(id) => id,
            Term::Literal(lit) => &lit.value,
        }
    }
}

/// A single subject-predicate-object statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: Term,
    pub predicate: String,
    pub object: Term,
}

/// A set of triples with insertion order preserved.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    triples: Vec<Triple>,
    seen: HashSet<Triple>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a triple. Exact duplicates are ignored.
    pub fn insert(&mut self, subject: Term, predicate: impl Into<String>, object: Term) {
        let triple = Triple {
            subject,
            predicate: predicate.into(),
            object,
        };
        if self.seen.insert(triple.clone()) {
            self.triples.push(triple);
        }
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// All objects of `subject --predicate-->`, in document order.
    pub fn objects<'a>(
        &'a self,
        subject: &'a Term,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.triples
            .iter()
            .filter(move |t| &t.subject == subject && t.predicate == predicate)
            .map(|t| &t.object)
    }

    pub fn first_object<'a>(&'a self, subject: &'a Term, predicate: &'a str) -> Option<&'a Term> {
        self.objects(subject, predicate).next()
    }

    /// True if at least one triple has this predicate on the subject.
    pub fn has(&self, subject: &Term, predicate: &str) -> bool {
        self.first_object(subject, predicate).is_some()
    }

    pub fn has_subject(&self, subject: &Term) -> bool {
        self.triples.iter().any(|t| &t.subject == subject)
    }

    /// IRI-valued objects of a predicate. Literals and blank nodes are skipped.
    pub fn iri_objects(&self, subject: &Term, predicate: &str) -> Vec<String> {
        self.objects(subject, predicate)
            .filter_map(Term::as_iri)
            .map(str::to_string)
            .collect()
    }

    /// Lexical forms of every literal object of a predicate.
    pub fn literal_objects(&self, subject: &Term, predicate: &str) -> Vec<String> {
        self.objects(subject, predicate)
            .filter_map(Term::as_literal)
            .map(str::to_string)
            .collect()
    }

    /// Read a predicate as display text.
    ///
    /// A literal object is returned as-is. A node object is replaced by its
    /// `rdfs:label` or `foaf:name`; nodes without either are skipped and the
    /// next object is tried.
    pub fn literal_value(&self, subject: &Term, predicate: &str) -> Option<String> {
        self.objects(subject, predicate).find_map(|object| match object {
            Term::Literal(lit) => Some(lit.value.clone()),
            node => self.node_label(node, &vocab::NODE_LABELS),
        })
    }

    /// First literal found on `node` for any of `predicates`, tried in order.
    pub fn node_label(&self, node: &Term, predicates: &[&str]) -> Option<String> {
        predicates.iter().find_map(|predicate| {
            self.objects(node, predicate)
                .find_map(Term::as_literal)
                .map(str::to_string)
        })
    }

    /// Locate the subject node for a URI.
    ///
    /// Publishers are not consistent about trailing slashes, so when the exact
    /// IRI never appears as a subject the slash-toggled variant is tried.
    pub fn resolve_subject(&self, uri: &str) -> Term {
        let exact = Term::iri(uri);
        if self.has_subject(&exact) {
            return exact;
        }
        let toggled = match uri.strip_suffix('/') {
            Some(trimmed) => Term::iri(trimmed),
            None => Term::iri(format!("{uri}/")),
        };
        if self.has_subject(&toggled) {
            toggled
        } else {
            exact
        }
    }
}
