//! Final phase: rename property tokens in place and publish the map.

use crate::ast::{NodeKind, Program, PropertyKey};
use crate::context::{OccurrenceKind, PassContext};
use crate::error::AmbiguateError;
use indexmap::IndexMap;
use serde::Serialize;

/// Original property name to generated identifier, in first-discovery order.
/// Every renamed cluster has exactly one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RenamingMap {
    entries: IndexMap<String, String>,
}

impl RenamingMap {
    #[must_use]
    pub fn get(&self, original: &str) -> Option<&str> {
        self.entries.get(original).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The map as a JSON object, keys in discovery order.
    pub fn to_json(&self) -> Result<String, AmbiguateError> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }
}

/// Rewrite every occurrence of a colored cluster and build the map.
/// Returns the map and the number of name tokens changed.
pub fn rewrite(program: &mut Program, ctx: &PassContext) -> (RenamingMap, usize) {
    let mut map = RenamingMap::default();
    for (_, cluster) in ctx.iter_clusters() {
        if let Some(assigned) = &cluster.assigned {
            map.entries.insert(cluster.name.clone(), assigned.clone());
        }
    }

    let mut changed = 0;
    for occurrence in &ctx.occurrences {
        let cluster = ctx.cluster(occurrence.cluster);
        let Some(assigned) = cluster.assigned.as_deref() else {
            continue;
        };
        if assigned == cluster.name {
            continue;
        }

        let node = program.node_mut(occurrence.node);
        let renamed = match occurrence.kind {
            OccurrenceKind::Dot => rename_member(node, assigned),
            OccurrenceKind::ObjectKey
            | OccurrenceKind::Shorthand
            | OccurrenceKind::Getter
            | OccurrenceKind::Setter
            | OccurrenceKind::MemberFunction
            | OccurrenceKind::Field
            | OccurrenceKind::PatternKey
            | OccurrenceKind::PatternShorthand => rename_key(node, assigned),
            OccurrenceKind::DescriptorKey => rename_key(node, assigned) || rename_literal(node, assigned),
            // Always ineligible.
            OccurrenceKind::ComputedLiteral | OccurrenceKind::Quoted | OccurrenceKind::RenameCall => false,
        };
        if renamed {
            changed += 1;
        }
    }

    (map, changed)
}

fn rename_member(node: &mut NodeKind, name: &str) -> bool {
    match node {
        NodeKind::Member { property, .. } => {
            *property = name.to_string();
            true
        }
        _ => false,
    }
}

/// Rename an identifier key. Shorthand entries become `name: binding`.
fn rename_key(node: &mut NodeKind, name: &str) -> bool {
    let key = PropertyKey::Ident(name.to_string());
    match node {
        NodeKind::Property(prop) => {
            prop.key = key;
            prop.shorthand = false;
            true
        }
        NodeKind::PatternProperty(prop) => {
            prop.key = key;
            prop.shorthand = false;
            true
        }
        NodeKind::ClassMember(member) => {
            member.key = key;
            true
        }
        _ => false,
    }
}

/// `Object.defineProperty(target, "name", ...)`.
fn rename_literal(node: &mut NodeKind, name: &str) -> bool {
    match node {
        NodeKind::String(value) => {
            *value = name.to_string();
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::{Codegen, CodegenOptions};
    use crate::types::TypeRegistry;

    fn print(program: &Program) -> String {
        Codegen::new(program, CodegenOptions::default()).generate()
    }

    #[test]
    fn test_shorthand_expands() {
        // var o = {value}; const {value} = o;
        let mut p = Program::new();
        let short = p.shorthand("value");
        let lit = p.object(vec![short]);
        let o = p.ident("o");
        let decl = p.var(crate::ast::VarKind::Var, o, Some(lit));
        p.push(decl);
        let pattern_short = p.pattern_shorthand("value");
        let pattern = p.object_pattern(vec![pattern_short]);
        let source = p.ident("o");
        let decl = p.var(crate::ast::VarKind::Const, pattern, Some(source));
        p.push(decl);

        let mut ctx = PassContext::new();
        let id = ctx.record("value", OccurrenceKind::Shorthand, TypeRegistry::UNKNOWN, short);
        ctx.record("value", OccurrenceKind::PatternShorthand, TypeRegistry::UNKNOWN, pattern_short);
        ctx.cluster_mut(id).assigned = Some("a".to_string());

        let (map, changed) = rewrite(&mut p, &ctx);
        assert_eq!(changed, 2);
        assert_eq!(map.get("value"), Some("a"));
        assert_eq!(print(&p), "var o = {a: value};\nconst {a: value} = o;");
    }

    #[test]
    fn test_define_property_literal() {
        // Object.defineProperty(t, "long", d);
        let mut p = Program::new();
        let object = p.ident("Object");
        let define = p.member(object, "defineProperty");
        let target = p.ident("t");
        let key = p.string("long");
        let desc = p.ident("d");
        let call = p.call(define, vec![target, key, desc]);
        let stmt = p.expr_stmt(call);
        p.push(stmt);

        let mut ctx = PassContext::new();
        let id = ctx.record("long", OccurrenceKind::DescriptorKey, TypeRegistry::UNKNOWN, key);
        ctx.cluster_mut(id).assigned = Some("a".to_string());

        rewrite(&mut p, &ctx);
        assert_eq!(print(&p), "Object.defineProperty(t, \"a\", d);");
    }

    #[test]
    fn test_unassigned_and_identity_untouched() {
        let mut p = Program::new();
        let o = p.ident("o");
        let keep = p.member(o, "keep");
        let stmt = p.expr_stmt(keep);
        p.push(stmt);
        let o = p.ident("o");
        let same = p.member(o, "a");
        let stmt = p.expr_stmt(same);
        p.push(stmt);

        let mut ctx = PassContext::new();
        ctx.record("keep", OccurrenceKind::Dot, TypeRegistry::UNKNOWN, keep);
        let id = ctx.record("a", OccurrenceKind::Dot, TypeRegistry::UNKNOWN, same);
        ctx.cluster_mut(id).assigned = Some("a".to_string());

        let (map, changed) = rewrite(&mut p, &ctx);
        assert_eq!(changed, 0);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("keep"), None);
        assert_eq!(print(&p), "o.keep;\no.a;");
    }

    #[test]
    fn test_map_json_keeps_order() {
        let mut map = RenamingMap::default();
        map.entries.insert("zeta".into(), "a".into());
        map.entries.insert("alpha".into(), "b".into());
        let json = map.to_json().unwrap();
        assert!(json.find("zeta").unwrap() < json.find("alpha").unwrap());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["alpha"], "b");
    }
}
