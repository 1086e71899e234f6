//! Greedy coloring of the conflict graph with generated identifiers.

use crate::config::Alphabet;
use crate::context::PassContext;
use crate::error::AmbiguateError;
use crate::graph::ConflictGraph;
use fixedbitset::FixedBitSet;
use rustc_hash::FxHashSet;
use tracing::trace;

// =============================================================================
// Name Generator
// =============================================================================

/// Enumerates identifiers from an [`Alphabet`]: single leading characters
/// first, then longer names with the first character varying fastest.
#[derive(Debug, Clone)]
pub struct NameGenerator {
    leading: Vec<char>,
    continuing: Vec<char>,
    max_length: usize,
    counter: usize,
}

impl NameGenerator {
    #[must_use]
    pub fn new(alphabet: &Alphabet) -> Self {
        Self {
            leading: alphabet.leading.chars().collect(),
            continuing: alphabet.continuing.chars().collect(),
            max_length: alphabet.max_length,
            counter: 0,
        }
    }

    /// Next identifier that is neither reserved nor a keyword, or `None`
    /// once every name up to the maximum length has been produced.
    pub fn next_name(&mut self, reserved: &FxHashSet<String>) -> Option<String> {
        loop {
            let name = self.encode(self.counter)?;
            self.counter += 1;
            if !is_js_reserved(&name) && !reserved.contains(&name) {
                return Some(name);
            }
        }
    }

    /// The `n`th identifier of the enumeration.
    #[must_use]
    pub fn encode(&self, mut n: usize) -> Option<String> {
        let first_len = self.leading.len();
        let rest_len = self.continuing.len();
        if first_len == 0 || self.max_length == 0 {
            return None;
        }

        let mut name = String::with_capacity(4);
        name.push(self.leading[n % first_len]);
        n /= first_len;

        let mut len = 1;
        while n > 0 {
            if rest_len == 0 || len == self.max_length {
                return None;
            }
            n -= 1;
            name.push(self.continuing[n % rest_len]);
            n /= rest_len;
            len += 1;
        }
        Some(name)
    }
}

/// Words that cannot be used as generated identifiers.
fn is_js_reserved(name: &str) -> bool {
    matches!(
        name,
        "do" | "if" | "in" | "for" | "let" | "new" | "try" | "var" | "case" | "else" | "enum"
            | "eval" | "null" | "this" | "true" | "void" | "with" | "await" | "break"
            | "catch" | "class" | "const" | "false" | "super" | "throw" | "while" | "yield"
            | "delete" | "export" | "import" | "return" | "switch" | "typeof"
            | "default" | "extends" | "finally" | "continue" | "debugger" | "function"
            | "arguments" | "instanceof" | "of"
    )
}

// =============================================================================
// Greedy Colorer
// =============================================================================

/// Result of coloring: a palette index per graph node.
#[derive(Debug, Clone)]
pub struct Coloring {
    colors: Vec<usize>,
    palette: Vec<String>,
}

impl Coloring {
    #[must_use]
    pub fn color_of(&self, node: usize) -> usize {
        self.colors[node]
    }

    /// Generated name for graph node `node`.
    #[must_use]
    pub fn name_of(&self, node: usize) -> &str {
        &self.palette[self.colors[node]]
    }

    /// Distinct identifiers in use, in generation order.
    #[must_use]
    pub fn palette(&self) -> &[String] {
        &self.palette
    }

    /// Store each cluster's generated name on the context.
    pub fn assign(&self, graph: &ConflictGraph, ctx: &mut PassContext) {
        for node in 0..graph.node_count() {
            ctx.cluster_mut(graph.cluster(node)).assigned = Some(self.name_of(node).to_string());
        }
    }
}

/// Colors clusters most-used first, giving each the earliest identifier no
/// already-colored neighbor holds.
pub struct GreedyColorer<'a> {
    names: NameGenerator,
    reserved: &'a FxHashSet<String>,
}

impl<'a> GreedyColorer<'a> {
    #[must_use]
    pub fn new(alphabet: &Alphabet, reserved: &'a FxHashSet<String>) -> Self {
        Self {
            names: NameGenerator::new(alphabet),
            reserved,
        }
    }

    pub fn color(mut self, graph: &ConflictGraph, ctx: &PassContext) -> Result<Coloring, AmbiguateError> {
        let node_count = graph.node_count();

        // Stable sort keeps discovery order among equal counts.
        let mut order: Vec<usize> = (0..node_count).collect();
        order.sort_by(|&a, &b| {
            let count_a = ctx.cluster(graph.cluster(a)).count();
            let count_b = ctx.cluster(graph.cluster(b)).count();
            count_b.cmp(&count_a)
        });

        let mut colors: Vec<Option<usize>> = vec![None; node_count];
        let mut palette: Vec<String> = Vec::new();
        let mut taken = FixedBitSet::new();

        for node in order {
            taken.clear();
            taken.grow(palette.len() + 1);
            for &neighbor in graph.neighbors(node) {
                if let Some(color) = colors[neighbor] {
                    taken.insert(color);
                }
            }

            let color = match (0..palette.len()).find(|&c| !taken.contains(c)) {
                Some(color) => color,
                None => {
                    let name = self.names.next_name(self.reserved).ok_or(AmbiguateError::AlphabetExhausted {
                        clusters: node_count,
                        available: palette.len(),
                    })?;
                    palette.push(name);
                    palette.len() - 1
                }
            };

            trace!(
                property = %ctx.cluster(graph.cluster(node)).name,
                name = %palette[color],
                "colored property"
            );
            colors[node] = Some(color);
        }

        Ok(Coloring {
            colors: colors.into_iter().flatten().collect(),
            palette,
        })
    }
}
