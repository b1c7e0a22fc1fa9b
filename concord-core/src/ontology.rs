//! Ontologies as seen by the evaluation code.
//!
//! The evaluation only needs three things from an ontology: whether a URI
//! occurs in it, which resource-valued statements exist for a predicate
//! (`rdfs:subClassOf`, `owl:equivalentClass`, `rdf:type`), and a coarse
//! resource type. [`Ontology`] captures exactly that; [`TripleOntology`] is
//! an in-memory implementation loaded from N-Triples or Turtle.

use crate::error::{Error, Result};
use rio_api::model::{Subject, Term};
use rio_api::parser::TriplesParser;
use rio_turtle::{NTriplesParser, TurtleError, TurtleParser};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::io::BufRead;
use std::path::Path;

/// Well-known vocabulary IRIs.
pub mod vocab {
    /// `rdf:type`
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    /// `rdf:Property`
    pub const RDF_PROPERTY: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Property";
    /// `rdfs:subClassOf`
    pub const RDFS_SUB_CLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
    /// `rdfs:Class`
    pub const RDFS_CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";
    /// `rdfs:domain`
    pub const RDFS_DOMAIN: &str = "http://www.w3.org/2000/01/rdf-schema#domain";
    /// `rdfs:range`
    pub const RDFS_RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";
    /// `owl:equivalentClass`
    pub const OWL_EQUIVALENT_CLASS: &str = "http://www.w3.org/2002/07/owl#equivalentClass";
    /// `owl:Class`
    pub const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
    /// `owl:Thing`
    pub const OWL_THING: &str = "http://www.w3.org/2002/07/owl#Thing";
    /// `owl:ObjectProperty`
    pub const OWL_OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#ObjectProperty";
    /// `owl:DatatypeProperty`
    pub const OWL_DATATYPE_PROPERTY: &str = "http://www.w3.org/2002/07/owl#DatatypeProperty";
    /// `owl:AnnotationProperty`
    pub const OWL_ANNOTATION_PROPERTY: &str = "http://www.w3.org/2002/07/owl#AnnotationProperty";
    /// `owl:TransitiveProperty`
    pub const OWL_TRANSITIVE_PROPERTY: &str = "http://www.w3.org/2002/07/owl#TransitiveProperty";
    /// `owl:SymmetricProperty`
    pub const OWL_SYMMETRIC_PROPERTY: &str = "http://www.w3.org/2002/07/owl#SymmetricProperty";
    /// `owl:inverseOf`
    pub const OWL_INVERSE_OF: &str = "http://www.w3.org/2002/07/owl#inverseOf";
}

use vocab::*;

/// Coarse kind of an ontology resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceType {
    /// A class.
    Class,
    /// A generic `rdf:Property`.
    RdfProperty,
    /// An `owl:DatatypeProperty`.
    DatatypeProperty,
    /// An `owl:ObjectProperty` (or one of its characteristics).
    ObjectProperty,
    /// An `owl:AnnotationProperty`.
    AnnotationProperty,
    /// Typed individual.
    Instance,
    /// Nothing is known about the resource.
    Unknown,
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ResourceType::Class => "CLASS",
            ResourceType::RdfProperty => "RDF_PROPERTY",
            ResourceType::DatatypeProperty => "DATATYPE_PROPERTY",
            ResourceType::ObjectProperty => "OBJECT_PROPERTY",
            ResourceType::AnnotationProperty => "ANNOTATION_PROPERTY",
            ResourceType::Instance => "INSTANCE",
            ResourceType::Unknown => "UNKNOWN",
        };
        write!(f, "{}", s)
    }
}

/// Read access to an ontology.
pub trait Ontology {
    /// Whether `uri` occurs anywhere in the ontology (subject, predicate or object).
    fn contains_resource(&self, uri: &str) -> bool;

    /// `(subject, object)` pairs of statements with the given predicate whose
    /// object is a resource. Literal objects are skipped.
    fn resource_statements(&self, predicate: &str) -> Vec<(&str, &str)>;

    /// Classify a resource by its `rdf:type`s and the way it is used.
    fn resource_type(&self, uri: &str) -> ResourceType {
        let types: HashSet<&str> = self
            .resource_statements(RDF_TYPE)
            .into_iter()
            .filter(|(s, _)| *s == uri)
            .map(|(_, o)| o)
            .collect();

        let used_as_class = uri == OWL_THING
            || self.resource_statements(RDF_TYPE).iter().any(|(_, o)| *o == uri)
            || [RDFS_SUB_CLASS_OF, OWL_EQUIVALENT_CLASS]
                .iter()
                .any(|p| self.resource_statements(p).iter().any(|(s, o)| *s == uri || *o == uri))
            || [RDFS_DOMAIN, RDFS_RANGE]
                .iter()
                .any(|p| self.resource_statements(p).iter().any(|(_, o)| *o == uri));
        if used_as_class || types.contains(OWL_CLASS) || types.contains(RDFS_CLASS) {
            return ResourceType::Class;
        }
        if types.contains(OWL_DATATYPE_PROPERTY) {
            return ResourceType::DatatypeProperty;
        }
        let inverse = self
            .resource_statements(OWL_INVERSE_OF)
            .iter()
            .any(|(s, o)| *s == uri || *o == uri);
        if inverse
            || [OWL_OBJECT_PROPERTY, OWL_TRANSITIVE_PROPERTY, OWL_SYMMETRIC_PROPERTY]
                .iter()
                .any(|t| types.contains(t))
        {
            return ResourceType::ObjectProperty;
        }
        if types.contains(OWL_ANNOTATION_PROPERTY) {
            return ResourceType::AnnotationProperty;
        }
        if types.contains(RDF_PROPERTY) {
            return ResourceType::RdfProperty;
        }
        if !types.is_empty() {
            return ResourceType::Instance;
        }
        ResourceType::Unknown
    }
}

/// Object position of a triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Object {
    /// IRI or blank node.
    Resource(String),
    /// Literal, kept in its lexical N-Triples form.
    Literal(String),
}

/// An in-memory set of triples.
///
/// ```rust
/// use concord_core::{Ontology, TripleOntology};
/// use concord_core::ontology::vocab::RDFS_SUB_CLASS_OF;
///
/// let onto = TripleOntology::from_ntriples_str(
///     "<http://a#Student> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://a#Person> .\n",
/// ).unwrap();
/// assert!(onto.contains_resource("http://a#Person"));
/// assert_eq!(onto.resource_statements(RDFS_SUB_CLASS_OF).len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TripleOntology {
    triples: Vec<(String, String, Object)>,
    by_predicate: HashMap<String, Vec<usize>>,
    resources: HashSet<String>,
}

impl TripleOntology {
    /// Create an empty ontology.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of triples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Whether there are no triples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Add a triple.
    pub fn add(&mut self, subject: impl Into<String>, predicate: impl Into<String>, object: Object) {
        let subject = subject.into();
        let predicate = predicate.into();
        self.resources.insert(subject.clone());
        self.resources.insert(predicate.clone());
        if let Object::Resource(o) = &object {
            self.resources.insert(o.clone());
        }
        self.by_predicate
            .entry(predicate.clone())
            .or_default()
            .push(self.triples.len());
        self.triples.push((subject, predicate, object));
    }

    /// Add a triple whose object is a resource.
    pub fn add_resource(
        &mut self,
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) {
        self.add(subject, predicate, Object::Resource(object.into()));
    }

    /// Declare `sub rdfs:subClassOf sup`.
    pub fn add_sub_class_of(&mut self, sub: impl Into<String>, sup: impl Into<String>) {
        self.add_resource(sub, RDFS_SUB_CLASS_OF, sup);
    }

    /// Declare `uri rdf:type owl:Class`.
    pub fn add_class(&mut self, uri: impl Into<String>) {
        self.add_resource(uri, RDF_TYPE, OWL_CLASS);
    }

    /// Parse N-Triples.
    pub fn from_ntriples<R: BufRead>(reader: R) -> Result<Self> {
        let mut onto = Self::new();
        NTriplesParser::new(reader)
            .parse_all(&mut |t| {
                onto.push_rio(t);
                Ok(()) as std::result::Result<(), TurtleError>
            })
            .map_err(|e| Error::rdf(e.to_string()))?;
        log::debug!("parsed {} triples", onto.len());
        Ok(onto)
    }

    /// Parse Turtle.
    pub fn from_turtle<R: BufRead>(reader: R) -> Result<Self> {
        let mut onto = Self::new();
        TurtleParser::new(reader, None)
            .parse_all(&mut |t| {
                onto.push_rio(t);
                Ok(()) as std::result::Result<(), TurtleError>
            })
            .map_err(|e| Error::rdf(e.to_string()))?;
        log::debug!("parsed {} triples", onto.len());
        Ok(onto)
    }

    /// Parse N-Triples from a string.
    pub fn from_ntriples_str(s: &str) -> Result<Self> {
        Self::from_ntriples(std::io::Cursor::new(s))
    }

    /// Parse Turtle from a string.
    pub fn from_turtle_str(s: &str) -> Result<Self> {
        Self::from_turtle(std::io::Cursor::new(s))
    }

    /// Load a file, choosing the syntax by extension (`.nt` or `.ttl`).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        let reader = std::io::BufReader::new(std::fs::File::open(path)?);
        match ext.as_str() {
            "nt" | "ntriples" => Self::from_ntriples(reader),
            "ttl" | "turtle" => Self::from_turtle(reader),
            other => Err(Error::invalid_input(format!(
                "Unsupported ontology format '{}' for {} (expected .nt or .ttl)",
                other,
                path.display()
            ))),
        }
    }

    fn push_rio(&mut self, t: rio_api::model::Triple<'_>) {
        let subject = match t.subject {
            Subject::NamedNode(n) => n.iri.to_string(),
            Subject::BlankNode(n) => format!("_:{}", n.id),
            other => other.to_string(),
        };
        let object = match t.object {
            Term::NamedNode(n) => Object::Resource(n.iri.to_string()),
            Term::BlankNode(n) => Object::Resource(format!("_:{}", n.id)),
            Term::Literal(l) => Object::Literal(l.to_string()),
            other => Object::Resource(other.to_string()),
        };
        self.add(subject, t.predicate.iri, object);
    }
}

impl Ontology for TripleOntology {
    fn contains_resource(&self, uri: &str) -> bool {
        self.resources.contains(uri)
    }

    fn resource_statements(&self, predicate: &str) -> Vec<(&str, &str)> {
        self.by_predicate
            .get(predicate)
            .into_iter()
            .flatten()
            .filter_map(|&i| match &self.triples[i] {
                (s, _, Object::Resource(o)) => Some((s.as_str(), o.as_str())),
                _ => None,
            })
            .collect()
    }
}

impl<T: Ontology + ?Sized> Ontology for &T {
    fn contains_resource(&self, uri: &str) -> bool {
        (**self).contains_resource(uri)
    }

    fn resource_statements(&self, predicate: &str) -> Vec<(&str, &str)> {
        (**self).resource_statements(predicate)
    }
}
