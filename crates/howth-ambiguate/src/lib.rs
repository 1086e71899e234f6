//! howth-ambiguate: type-directed property name ambiguation
//!
//! Shortens object property names by letting unrelated properties share the
//! same short identifier. Two names may share an identifier only when no
//! object can ever carry both, which is decided from static types: each name
//! gets the set of nominal types that can own it, names whose owner sets
//! overlap conflict, and the conflict graph is colored greedily with
//! generated identifiers.
//!
//! # Pipeline
//!
//! 1. **Collect**: record every property-name occurrence with its receiver type
//! 2. **Filter**: pin names that are quoted, extern, structural or untyped
//! 3. **Resolve**: compute owner-closures (type plus subtypes, cached per type)
//! 4. **Build**: connect clusters whose owner-closures intersect
//! 5. **Color**: most-used names first, earliest free identifier wins
//! 6. **Rewrite**: rename the recorded tokens in place
//!
//! Anything the pass cannot prove safe keeps its name. The only failure is an
//! alphabet too small for the program, reported before the AST is touched.
//!
//! # Example
//!
//! ```
//! use howth_ambiguate::{ambiguate, Program, TypeRegistry};
//!
//! // Foo.prototype.longName = 0;
//! let mut types = TypeRegistry::new();
//! let foo = types.declare_class("Foo");
//! let mut program = Program::new();
//! let ctor = program.ident("Foo");
//! let ctor = types.typed(ctor, foo.constructor);
//! let proto = program.member(ctor, "prototype");
//! let proto = types.typed(proto, foo.prototype);
//! let access = program.member(proto, "longName");
//! let zero = program.number(0.0);
//! let assign = program.assign(access, zero);
//! let stmt = program.expr_stmt(assign);
//! program.push(stmt);
//!
//! let outcome = ambiguate(&mut program, &types).unwrap();
//! assert_eq!(outcome.map.get("longName"), Some("a"));
//! ```

mod ast;
mod codegen;
mod collect;
mod color;
mod config;
mod context;
mod eligibility;
mod error;
mod externs;
mod graph;
mod owners;
mod rewrite;
mod types;

pub use ast::*;
pub use codegen::{Codegen, CodegenOptions};
pub use color::{Coloring, GreedyColorer, NameGenerator};
pub use config::{AmbiguateConfig, Alphabet};
pub use context::{ClusterId, Occurrence, OccurrenceKind, PassContext, PropertyCluster};
pub use eligibility::SkipReason;
pub use error::AmbiguateError;
pub use externs::ExternProperties;
pub use graph::ConflictGraph;
pub use owners::{OwnerSet, OwnerTable};
pub use rewrite::RenamingMap;
pub use types::{ClassTypes, Inheritance, TypeClass, TypeId, TypeOracle, TypeRegistry};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, debug_span};

/// Counters describing one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AmbiguateStats {
    /// Property names that received a generated identifier.
    pub renamed: usize,
    /// Property names kept verbatim.
    pub skipped: usize,
    /// Distinct generated identifiers in use.
    pub generated: usize,
    /// Name tokens changed in the AST.
    pub rewritten: usize,
}

/// What a run produced besides the rewritten AST.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AmbiguateOutcome {
    pub map: RenamingMap,
    /// Kept names with the first reason found, in discovery order.
    pub skipped: IndexMap<String, SkipReason>,
    pub stats: AmbiguateStats,
}

/// The property ambiguation pass.
#[derive(Debug, Clone, Default)]
pub struct AmbiguateProperties {
    config: AmbiguateConfig,
    externs: ExternProperties,
}

impl AmbiguateProperties {
    #[must_use]
    pub fn new(config: AmbiguateConfig, externs: ExternProperties) -> Self {
        Self { config, externs }
    }

    #[must_use]
    pub fn config(&self) -> &AmbiguateConfig {
        &self.config
    }

    #[must_use]
    pub fn externs(&self) -> &ExternProperties {
        &self.externs
    }

    /// Run the pass over `program`, rewriting it in place.
    ///
    /// On error the program is left unchanged.
    pub fn run(&self, program: &mut Program, oracle: &dyn TypeOracle) -> Result<AmbiguateOutcome, AmbiguateError> {
        self.config.alphabet.validate()?;

        let span = debug_span!("ambiguate_properties", nodes = program.len());
        let _guard = span.enter();

        let mut ctx = PassContext::new();
        collect::collect(program, oracle, &self.config.rename_functions, &mut ctx);
        eligibility::filter(&mut ctx, oracle, &self.externs, &self.config);

        let mut owners = OwnerTable::new(oracle);
        owners::resolve_clusters(&mut ctx, &mut owners);

        let graph = ConflictGraph::build(&ctx);
        let coloring = GreedyColorer::new(&self.config.alphabet, &ctx.reserved).color(&graph, &ctx)?;
        coloring.assign(&graph, &mut ctx);

        let (map, rewritten) = rewrite::rewrite(program, &ctx);

        let skipped: IndexMap<String, SkipReason> = ctx
            .clusters
            .values()
            .filter_map(|cluster| cluster.skip.map(|reason| (cluster.name.clone(), reason)))
            .collect();
        let stats = AmbiguateStats {
            renamed: map.len(),
            skipped: skipped.len(),
            generated: coloring.palette().len(),
            rewritten,
        };

        debug!(
            occurrences = ctx.occurrences.len(),
            edges = graph.edge_count(),
            rewritten,
            "collapsed {} properties into {} names, skipped {}",
            stats.renamed,
            stats.generated,
            stats.skipped
        );

        Ok(AmbiguateOutcome { map, skipped, stats })
    }
}

/// Run the pass with the default configuration and no extra externs.
pub fn ambiguate(program: &mut Program, oracle: &dyn TypeOracle) -> Result<AmbiguateOutcome, AmbiguateError> {
    AmbiguateProperties::default().run(program, oracle)
}
