//! Relations between the two entities of a correspondence.
//!
//! Every relation has a short textual label (`=`, `<`, `>`, ...) and one or
//! more RDF representations. [`CorrespondenceRelation::parse`] accepts any of
//! them, case-insensitively, as well as the variant name itself.

use serde::{Deserialize, Serialize};

const OWL: &str = "http://www.w3.org/2002/07/owl#";
const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";
const DCTERMS: &str = "http://purl.org/dc/terms/";

/// Relation of a correspondence, read from source (entity one) to target (entity two).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum CorrespondenceRelation {
    /// Both entities have the same meaning.
    Equivalence,
    /// Source is the superclass of the target (`Person > Student`).
    Subsume,
    /// Source is the subclass of the target (`Student < Person`).
    Subsumed,
    /// Implication that does not chain.
    NonTransitiveImplication,
    /// Source is an instance of the target class.
    InstanceOf,
    /// Source class has the target as instance.
    HasInstance,
    /// Source is a part of the target (`tire PartOf car`).
    PartOf,
    /// Target is a part of the source (`car HasA tire`).
    HasA,
    /// Loosely related.
    Related,
    /// Interchangeable in some contexts.
    Close,
    /// The two entities must not be matched.
    Incompat,
    /// Unknown relation; also the fallback of [`parse`](Self::parse).
    Unknown,
}

impl CorrespondenceRelation {
    /// All relations, in declaration order.
    pub const ALL: [CorrespondenceRelation; 12] = [
        Self::Equivalence,
        Self::Subsume,
        Self::Subsumed,
        Self::NonTransitiveImplication,
        Self::InstanceOf,
        Self::HasInstance,
        Self::PartOf,
        Self::HasA,
        Self::Related,
        Self::Close,
        Self::Incompat,
        Self::Unknown,
    ];

    /// Short textual label such as `=` or `PartOf`.
    #[must_use]
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Equivalence => "=",
            Self::Subsume => ">",
            Self::Subsumed => "<",
            Self::NonTransitiveImplication => "~>",
            Self::InstanceOf => "InstanceOf",
            Self::HasInstance => "HasInstance",
            Self::PartOf => "PartOf",
            Self::HasA => "HasA",
            Self::Related => "Related",
            Self::Close => "Close",
            Self::Incompat => "%",
            Self::Unknown => "?",
        }
    }

    /// Upper snake case name, e.g. `NON_TRANSITIVE_IMPLICATION`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Equivalence => "EQUIVALENCE",
            Self::Subsume => "SUBSUME",
            Self::Subsumed => "SUBSUMED",
            Self::NonTransitiveImplication => "NON_TRANSITIVE_IMPLICATION",
            Self::InstanceOf => "INSTANCE_OF",
            Self::HasInstance => "HAS_INSTANCE",
            Self::PartOf => "PART_OF",
            Self::HasA => "HAS_A",
            Self::Related => "RELATED",
            Self::Close => "CLOSE",
            Self::Incompat => "INCOMPAT",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// RDF properties that express this relation. The first one is preferred.
    #[must_use]
    pub fn rdf_representations(&self) -> Vec<String> {
        let iris: &[(&str, &str)] = match self {
            Self::Equivalence => &[
                (SKOS, "exactMatch"),
                (OWL, "equivalentClass"),
                (OWL, "equivalentProperty"),
                (OWL, "sameAs"),
            ],
            Self::Subsume => &[(SKOS, "narrowMatch"), (SKOS, "narrower")],
            Self::Subsumed => &[(SKOS, "broadMatch"), (SKOS, "broader"), (RDFS, "subClassOf")],
            Self::InstanceOf => &[(RDF, "type")],
            Self::PartOf => &[(DCTERMS, "isPartOf")],
            Self::HasA => &[(DCTERMS, "hasPart")],
            Self::Related => &[(SKOS, "relatedMatch"), (SKOS, "related")],
            Self::Close => &[(SKOS, "closeMatch")],
            Self::NonTransitiveImplication => &[(RELATION_NS, "NonTransitiveImplicationRelation")],
            Self::HasInstance => &[(RELATION_NS, "HasInstanceRelation")],
            Self::Incompat => &[(RELATION_NS, "IncompatRelation")],
            Self::Unknown => &[(RELATION_NS, "Unknown")],
        };
        iris.iter().map(|(ns, local)| format!("{}{}", ns, local)).collect()
    }

    /// The relation seen from the other side of the correspondence.
    ///
    /// Symmetric relations map to themselves. A non-transitive implication
    /// has no inverse and becomes [`Unknown`](Self::Unknown).
    #[must_use]
    pub fn reverse(&self) -> Self {
        match self {
            Self::Subsume => Self::Subsumed,
            Self::Subsumed => Self::Subsume,
            Self::InstanceOf => Self::HasInstance,
            Self::HasInstance => Self::InstanceOf,
            Self::PartOf => Self::HasA,
            Self::HasA => Self::PartOf,
            Self::NonTransitiveImplication => Self::Unknown,
            other => *other,
        }
    }

    /// Parse a label, a variant name, a full RDF IRI or its prefixed form
    /// (`owl:equivalentClass`). Never fails: unknown input yields `Unknown`.
    #[must_use]
    pub fn parse(label: &str) -> Self {
        let needle = label.trim().to_lowercase();
        if needle.is_empty() {
            return Self::Unknown;
        }
        for relation in Self::ALL {
            if relation.as_label().to_lowercase() == needle || relation.name().to_lowercase() == needle {
                return relation;
            }
            for iri in relation.rdf_representations() {
                if iri.to_lowercase() == needle || compact(&iri).to_lowercase() == needle {
                    return relation;
                }
            }
        }
        log::debug!("unrecognized relation '{}', using UNKNOWN", label);
        Self::Unknown
    }

    /// Whether this relation is [`Equivalence`](Self::Equivalence).
    #[inline]
    #[must_use]
    pub fn is_equivalence(&self) -> bool {
        matches!(self, Self::Equivalence)
    }
}

const RELATION_NS: &str = "http://concord.dev/relation#";

fn compact(iri: &str) -> String {
    for (ns, prefix) in [
        (OWL, "owl:"),
        (RDFS, "rdfs:"),
        (RDF, "rdf:"),
        (DCTERMS, "dcterms:"),
        (SKOS, "skos:"),
    ] {
        if let Some(local) = iri.strip_prefix(ns) {
            return format!("{}{}", prefix, local);
        }
    }
    iri.to_string()
}

impl Default for CorrespondenceRelation {
    fn default() -> Self {
        Self::Equivalence
    }
}

impl std::fmt::Display for CorrespondenceRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

impl std::str::FromStr for CorrespondenceRelation {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for CorrespondenceRelation {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<CorrespondenceRelation> for String {
    fn from(r: CorrespondenceRelation) -> Self {
        r.as_label().to_string()
    }
}
