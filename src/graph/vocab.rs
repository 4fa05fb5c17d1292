// src/graph/vocab.rs

//! Predicate IRIs relied on during metadata extraction.

/// Data Catalog Vocabulary.
pub mod dcat {
    pub const DATASET: &str = "http://www.w3.org/ns/dcat#dataset";
    pub const THEME: &str = "http://www.w3.org/ns/dcat#theme";
    pub const THEME_TAXONOMY: &str = "http://www.w3.org/ns/dcat#themeTaxonomy";
    pub const KEYWORD: &str = "http://www.w3.org/ns/dcat#keyword";
    pub const CONTACT_POINT: &str = "http://www.w3.org/ns/dcat#contactPoint";
    pub const LANDING_PAGE: &str = "http://www.w3.org/ns/dcat#landingPage";
    pub const DISTRIBUTION: &str = "http://www.w3.org/ns/dcat#distribution";
}

/// Dublin Core terms.
pub mod dct {
    pub const TITLE: &str = "http://purl.org/dc/terms/title";
    pub const DESCRIPTION: &str = "http://purl.org/dc/terms/description";
    pub const PUBLISHER: &str = "http://purl.org/dc/terms/publisher";
    pub const CREATOR: &str = "http://purl.org/dc/terms/creator";
    pub const ISSUED: &str = "http://purl.org/dc/terms/issued";
    pub const MODIFIED: &str = "http://purl.org/dc/terms/modified";
}

pub mod rdfs {
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
}

pub mod skos {
    pub const PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
}

pub mod foaf {
    pub const NAME: &str = "http://xmlns.com/foaf/0.1/name";
}

/// vCard, used for dataset contact points.
pub mod vcard {
    pub const FN: &str = "http://www.w3.org/2006/vcard/ns#fn";
    pub const HAS_EMAIL: &str = "http://www.w3.org/2006/vcard/ns#hasEmail";
    pub const HAS_URL: &str = "http://www.w3.org/2006/vcard/ns#hasURL";
}

/// FAIR Data Point ontology.
pub mod fdp {
    pub const METADATA_CATALOG: &str = "https://w3id.org/fdp/fdp-o#metadataCatalog";
    /// Links an index FDP to the FDPs it lists.
    pub const METADATA_SERVICE: &str = "https://w3id.org/fdp/fdp-o#metadataService";
}

pub mod ldp {
    pub const CONTAINS: &str = "http://www.w3.org/ns/ldp#contains";
}

/// re3data schema, used by older FDP deployments for catalog links.
pub mod r3d {
    pub const DATA_CATALOG: &str = "http://www.re3data.org/schema/3-0#dataCatalog";
}

/// Predicates that give a human-readable name to a referenced node.
pub const NODE_LABELS: [&str; 2] = [rdfs::LABEL, foaf::NAME];

/// Endpoint catalog links, in lookup order.
pub const CATALOG_LINKS: [&str; 3] = [fdp::METADATA_CATALOG, ldp::CONTAINS, r3d::DATA_CATALOG];

/// Theme label predicates, in lookup order.
pub const THEME_LABELS: [&str; 2] = [rdfs::LABEL, skos::PREF_LABEL];
