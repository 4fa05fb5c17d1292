// src/graph/parse.rs

//! RDF serialization handling.
//!
//! Endpoints answer in Turtle, JSON-LD or RDF/XML. The response content type
//! picks the first parser to try; the remaining formats are tried in
//! preference order before giving up.

use std::sync::Arc;
use std::thread;

use sophia_api::parser::{QuadParser, TripleParser};
use sophia_api::quad::Quad;
use sophia_api::source::{QuadSource, TripleSource};
use sophia_api::term::{Term as RdfTerm, TermKind};
use sophia_api::prelude::Iri;
use sophia_api::triple::Triple as RdfTriple;
use sophia_jsonld::JsonLdOptions;
use sophia_jsonld::loader::NoLoader;
use sophia_jsonld::parser::JsonLdParser;
use sophia_turtle::parser::turtle::TurtleParser;
use sophia_xml::parser::RdfXmlParser;

use super::{Graph, Literal, Term};

/// Accepted graph serializations, in content negotiation preference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    Turtle,
    JsonLd,
    RdfXml,
}

impl RdfFormat {
    /// All formats, most preferred first.
    pub const ALL: [RdfFormat; 3] = [RdfFormat::Turtle, RdfFormat::JsonLd, RdfFormat::RdfXml];

    pub fn media_type(self) -> &'static str {
        match self {
            RdfFormat::Turtle => "text/turtle",
            RdfFormat::JsonLd => "application/ld+json",
            RdfFormat::RdfXml => "application/rdf+xml",
        }
    }

    /// Pick a parser from a `Content-Type` header value. Unknown or missing
    /// types default to Turtle.
    pub fn from_content_type(content_type: &str) -> Self {
        let content_type = content_type.to_ascii_lowercase();
        if content_type.contains("turtle") || content_type.contains("n-triples") {
            RdfFormat::Turtle
        } else if content_type.contains("json") {
            RdfFormat::JsonLd
        } else if content_type.contains("xml") {
            RdfFormat::RdfXml
        } else {
            RdfFormat::Turtle
        }
    }

    /// Build an `Accept` header value listing every format with descending
    /// quality weights (1.0, 0.9, 0.8).
    pub fn accept_header() -> String {
        Self::ALL
            .iter()
            .enumerate()
            .map(|(i, format)| match i {
                0 => format.media_type().to_string(),
                _ => format!("{};q=0.{}", format.media_type(), 10 - i),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Parse `text` in a single format. `base` resolves relative IRIs.
pub fn parse_graph(text: &str, format: RdfFormat, base: &str) -> Result<Graph, String> {
    let base_iri = Iri::new(base.to_string()).ok();
    let mut graph = Graph::new();
    match format {
        RdfFormat::Turtle => {
            let mut source = TurtleParser { base: base_iri }.parse_str(text);
            source
                .for_each_triple(|t| push_triple(&mut graph, t.s(), t.p(), t.o()))
                .map_err(|e| e.to_string())?;
        }
        RdfFormat::RdfXml => {
            let mut source = RdfXmlParser { base: base_iri }.parse_str(text);
            source
                .for_each_triple(|t| push_triple(&mut graph, t.s(), t.p(), t.o()))
                .map_err(|e| e.to_string())?;
        }
        RdfFormat::JsonLd => graph = parse_json_ld(text, base)?,
    }
    Ok(graph)
}

/// sophia_jsonld blocks on an internal runtime, which panics on a thread
/// already driving tokio, so JSON-LD is parsed on a scoped thread.
fn parse_json_ld(text: &str, base: &str) -> Result<Graph, String> {
    let mut options = JsonLdOptions::new().with_default_document_loader::<NoLoader>();
    if let Ok(iri) = Iri::new(Arc::<str>::from(base)) {
        options = options.with_base(iri);
    }
    let parser = JsonLdParser::new_with_options(options);

    thread::scope(|scope| {
        scope
            .spawn(move || -> Result<Graph, String> {
                let mut graph = Graph::new();
                parser
                    .parse_str(text)
                    .for_each_quad(|q| push_triple(&mut graph, q.s(), q.p(), q.o()))
                    .map_err(|e| e.to_string())?;
                Ok(graph)
            })
            .join()
            .map_err(|_| "JSON-LD parser panicked".to_string())?
    })
}

/// Parse `text` trying `preferred` first, then the other accepted formats.
///
/// On total failure the error of the preferred format is returned, since
/// that is the one the server claimed to send.
pub fn parse_any(text: &str, preferred: RdfFormat, base: &str) -> Result<(Graph, RdfFormat), String> {
    let first_error = match parse_graph(text, preferred, base) {
        Ok(graph) => return Ok((graph, preferred)),
        Err(e) => e,
    };

    for format in RdfFormat::ALL.into_iter().filter(|f| *f != preferred) {
        match parse_graph(text, format, base) {
            Ok(graph) => {
                log::debug!(
                    "Parsed {} as {:?} after {:?} failed",
                    base,
                    format,
                    preferred
                );
                return Ok((graph, format));
            }
            Err(e) => log::debug!("{base} is not {format:?}: {e}"),
        }
    }

    Err(format!("not valid Turtle, JSON-LD or RDF/XML ({first_error})"))
}

fn push_triple<S, P, O>(graph: &mut Graph, s: S, p: P, o: O)
where
    S: RdfTerm,
    P: RdfTerm,
    O: RdfTerm,
{
    let (Some(subject), Some(predicate), Some(object)) = (convert(s), p.iri(), convert(o)) else {
        return;
    };
    graph.insert(subject, predicate.as_str(), object);
}

fn convert<T: RdfTerm>(term: T) -> Option<Term> {
    match term.kind() {
        TermKind::Iri => term.iri().map(|iri| Term::Iri(iri.as_str().to_string())),
        TermKind::BlankNode => term.bnode_id().map(|id| Term::Blank(id.as_str().to_string())),
        TermKind::Literal => {
            let value = term.lexical_form()?.to_string();
            Some(Term::Literal(Literal {
                value,
                datatype: term.datatype().map(|dt| dt.as_str().to_string()),
                language: term.language_tag().map(|tag| tag.as_str().to_string()),
            }))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::vocab::{dcat, dct};

    const BASE: &str = "https://fdp.example.org/dataset/1";

    #[test]
    fn test_accept_header_weights() {
        assert_eq!(
            RdfFormat::accept_header(),
            "text/turtle, application/ld+json;q=0.9, application/rdf+xml;q=0.8"
        );
    }

    #[test]
    fn test_format_from_content_type() {
        assert_eq!(
            RdfFormat::from_content_type("text/turtle; charset=utf-8"),
            RdfFormat::Turtle
        );
        assert_eq!(
            RdfFormat::from_content_type("application/ld+json"),
            RdfFormat::JsonLd
        );
        assert_eq!(
            RdfFormat::from_content_type("application/rdf+xml"),
            RdfFormat::RdfXml
        );
        assert_eq!(RdfFormat::from_content_type(""), RdfFormat::Turtle);
        assert_eq!(RdfFormat::from_content_type("text/plain"), RdfFormat::Turtle);
    }

    #[test]
    fn test_parse_turtle_with_relative_iris() {
        let ttl = r#"
            @prefix dct: <http://purl.org/dc/terms/> .
            @prefix dcat: <http://www.w3.org/ns/dcat#> .
            <> dct:title "Rainfall Atlas"@en ;
               dcat:keyword "rain", "climate" .
        "#;
        let graph = parse_graph(ttl, RdfFormat::Turtle, BASE).unwrap();
        let subject = Term::iri(BASE);
        assert_eq!(
            graph.literal_value(&subject, dct::TITLE).as_deref(),
            Some("Rainfall Atlas")
        );
        assert_eq!(graph.literal_objects(&subject, dcat::KEYWORD).len(), 2);
    }

    #[test]
    fn test_parse_rdf_xml() {
        let xml = r#"<?xml version="1.0"?>
            <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
                     xmlns:dct="http://purl.org/dc/terms/">
              <rdf:Description rdf:about="https://fdp.example.org/dataset/1">
                <dct:title>Soil pH Survey</dct:title>
              </rdf:Description>
            </rdf:RDF>"#;
        let graph = parse_graph(xml, RdfFormat::RdfXml, BASE).unwrap();
        assert_eq!(
            graph.literal_value(&Term::iri(BASE), dct::TITLE).as_deref(),
            Some("Soil pH Survey")
        );
    }

    const JSON_LD: &str = r#"{
        "@context": {
            "dct": "http://purl.org/dc/terms/",
            "dcat": "http://www.w3.org/ns/dcat#"
        },
        "@id": "",
        "dct:title": "Rainfall Atlas",
        "dcat:keyword": ["rain", "climate"]
    }"#;

    #[test]
    fn test_parse_json_ld_resolves_against_base() {
        let graph = parse_graph(JSON_LD, RdfFormat::JsonLd, BASE).unwrap();
        let subject = Term::iri(BASE);
        assert_eq!(
            graph.literal_value(&subject, dct::TITLE).as_deref(),
            Some("Rainfall Atlas")
        );
        assert_eq!(graph.literal_objects(&subject, dcat::KEYWORD).len(), 2);
    }

    #[tokio::test]
    async fn test_parse_json_ld_inside_async_runtime() {
        let graph = parse_graph(JSON_LD, RdfFormat::JsonLd, BASE).unwrap();
        assert_eq!(graph.len(), 3);
    }

    #[tokio::test]
    async fn test_parse_any_rejects_garbage_inside_async_runtime() {
        let err = parse_any("<html><body>Welcome", RdfFormat::Turtle, BASE).unwrap_err();
        assert!(err.contains("not valid"));
    }

    #[test]
    fn test_parse_any_falls_back_when_content_type_lies() {
        let ttl = r#"<https://fdp.example.org/dataset/1> <http://purl.org/dc/terms/title> "Temperature Index" ."#;
        let (graph, format) = parse_any(ttl, RdfFormat::JsonLd, BASE).unwrap();
        assert_eq!(format, RdfFormat::Turtle);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_parse_any_rejects_garbage() {
        let err = parse_any("<html><body>Not found", RdfFormat::Turtle, BASE).unwrap_err();
        assert!(err.contains("not valid"));
    }
}
