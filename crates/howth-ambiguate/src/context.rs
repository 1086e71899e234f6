//! State shared by the phases of one ambiguation run.
//!
//! Every phase receives the [`PassContext`] explicitly; nothing is global, so
//! independent compilations never see each other's clusters.

use crate::ast::NodeId;
use crate::eligibility::SkipReason;
use crate::owners::OwnerSet;
use crate::types::TypeId;
use indexmap::IndexMap;
use rustc_hash::FxHashSet;

/// The syntactic form a property name appeared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OccurrenceKind {
    /// `obj.name` or `obj?.name`
    Dot,
    /// `{ name: value }`
    ObjectKey,
    /// `{ name }`
    Shorthand,
    /// `get name() {}` in an object literal or class body
    Getter,
    /// `set name(v) {}` in an object literal or class body
    Setter,
    /// `name() {}` in an object literal or class body
    MemberFunction,
    /// `name = value;` in a class body
    Field,
    /// `const { name: local } = obj`
    PatternKey,
    /// `const { name } = obj`
    PatternShorthand,
    /// A key of `Object.defineProperties(target, {...})` or the string key of
    /// `Object.defineProperty(target, "name", desc)`
    DescriptorKey,
    /// `{ ["name"]: value }` or `["name"]() {}`
    ComputedLiteral,
    /// `obj["name"]` or `{ "name": value }`
    Quoted,
    /// `JSCompiler_renameProperty("name")`
    RenameCall,
}

impl OccurrenceKind {
    /// Quoted and computed-literal keys: the name is observable as a string.
    #[must_use]
    pub fn is_quoted(self) -> bool {
        matches!(self, Self::Quoted | Self::ComputedLiteral)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::ObjectKey => "object-key",
            Self::Shorthand => "shorthand",
            Self::Getter => "getter",
            Self::Setter => "setter",
            Self::MemberFunction => "member-function",
            Self::Field => "field",
            Self::PatternKey => "pattern-key",
            Self::PatternShorthand => "pattern-shorthand",
            Self::DescriptorKey => "descriptor-key",
            Self::ComputedLiteral => "computed-literal",
            Self::Quoted => "quoted",
            Self::RenameCall => "rename-call",
        }
    }
}

/// Index of a cluster in [`PassContext::clusters`], which is also its
/// first-discovery position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(usize);

impl ClusterId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One syntactic appearance of a property name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub cluster: ClusterId,
    pub kind: OccurrenceKind,
    /// Static type of the object the property is read from or defined on.
    pub receiver: TypeId,
    /// The node holding the name token.
    pub node: NodeId,
}

/// All occurrences of one original property name.
#[derive(Debug, Clone)]
pub struct PropertyCluster {
    pub name: String,
    /// Indices into [`PassContext::occurrences`].
    pub occurrences: Vec<usize>,
    /// Set when the name must be kept verbatim.
    pub skip: Option<SkipReason>,
    /// Union of the owner-closures of every occurrence.
    pub owners: OwnerSet,
    pub assigned: Option<String>,
}

impl PropertyCluster {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            occurrences: Vec::new(),
            skip: None,
            owners: OwnerSet::new(),
            assigned: None,
        }
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.occurrences.len()
    }

    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.skip.is_none()
    }
}

/// Clusters, occurrences and reserved names for one run.
#[derive(Debug, Default)]
pub struct PassContext {
    /// Occurrences in traversal order.
    pub occurrences: Vec<Occurrence>,
    /// Clusters keyed by original name, in first-discovery order.
    pub clusters: IndexMap<String, PropertyCluster>,
    /// Names a generated identifier may never take.
    pub reserved: FxHashSet<String>,
}

impl PassContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an occurrence, creating its cluster on first sight.
    pub fn record(&mut self, name: &str, kind: OccurrenceKind, receiver: TypeId, node: NodeId) -> ClusterId {
        let index = match self.clusters.get_index_of(name) {
            Some(index) => index,
            None => {
                self.clusters.insert(name.to_string(), PropertyCluster::new(name));
                self.clusters.len() - 1
            }
        };
        let cluster = ClusterId(index);
        self.clusters[index].occurrences.push(self.occurrences.len());
        self.occurrences.push(Occurrence {
            cluster,
            kind,
            receiver,
            node,
        });
        cluster
    }

    #[must_use]
    pub fn cluster(&self, id: ClusterId) -> &PropertyCluster {
        &self.clusters[id.0]
    }

    pub fn cluster_mut(&mut self, id: ClusterId) -> &mut PropertyCluster {
        &mut self.clusters[id.0]
    }

    /// Cluster ids with their clusters, in first-discovery order.
    pub fn iter_clusters(&self) -> impl Iterator<Item = (ClusterId, &PropertyCluster)> {
        self.clusters.values().enumerate().map(|(i, c)| (ClusterId(i), c))
    }

    /// Occurrences belonging to `id`.
    pub fn occurrences_of(&self, id: ClusterId) -> impl Iterator<Item = &Occurrence> {
        self.clusters[id.0].occurrences.iter().map(|&i| &self.occurrences[i])
    }
}
