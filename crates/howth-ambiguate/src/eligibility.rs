//! Decide which property names may be renamed.
//!
//! A cluster is renamed as a whole or not at all, so a single unsafe
//! occurrence pins the name everywhere. Pinned names also join the reserved
//! set: a generated identifier must never collide with a property that is
//! still present in the program under its original name.

use crate::config::AmbiguateConfig;
use crate::context::{OccurrenceKind, PassContext};
use crate::externs::ExternProperties;
use crate::types::{TypeClass, TypeId, TypeOracle};
use serde::Serialize;
use std::fmt;
use tracing::trace;

/// Names with this prefix belong to the property renaming pass.
const RENAME_PREFIX: &str = "JSAbstractCompiler";

/// Why a property name is kept verbatim. The first reason found wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    /// Declared by an extern definition.
    Extern,
    /// Listed in the configured reserved names.
    Reserved,
    /// Carries the prefix owned by property renaming.
    RenamePrefix,
    /// Declared on, or read through, a structural record type.
    StructuralType,
    /// Appears as a quoted or computed string key.
    Quoted,
    /// Named through a rename-function call.
    RenameFunction,
    /// Read through a type involved in a type mismatch.
    InvalidatedType,
    /// Receiver type is unknown.
    UnknownReceiver,
    /// Receiver is an anonymous object literal type.
    AnonymousReceiver,
    /// Receiver is an autoboxed primitive.
    PrimitiveReceiver,
}

impl SkipReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Extern => "extern",
            Self::Reserved => "reserved",
            Self::RenamePrefix => "rename-prefix",
            Self::StructuralType => "structural-type",
            Self::Quoted => "quoted",
            Self::RenameFunction => "rename-function",
            Self::InvalidatedType => "invalidated-type",
            Self::UnknownReceiver => "unknown-receiver",
            Self::AnonymousReceiver => "anonymous-receiver",
            Self::PrimitiveReceiver => "primitive-receiver",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mark ineligible clusters and fill the reserved set.
pub fn filter(
    ctx: &mut PassContext,
    oracle: &dyn TypeOracle,
    externs: &ExternProperties,
    config: &AmbiguateConfig,
) {
    ctx.reserved.extend(externs.iter().map(str::to_string));
    ctx.reserved.extend(config.reserved.iter().cloned());

    for index in 0..ctx.clusters.len() {
        let cluster = &ctx.clusters[index];
        let name = cluster.name.as_str();

        let reason = if externs.contains(name) {
            Some(SkipReason::Extern)
        } else if config.reserved.iter().any(|r| r == name) {
            Some(SkipReason::Reserved)
        } else if name.starts_with(RENAME_PREFIX) {
            Some(SkipReason::RenamePrefix)
        } else if oracle.is_structural_property(name) {
            Some(SkipReason::StructuralType)
        } else {
            cluster.occurrences.iter().find_map(|&occ| {
                let occurrence = &ctx.occurrences[occ];
                occurrence_skip(oracle, occurrence.kind, occurrence.receiver)
            })
        };

        if let Some(reason) = reason {
            trace!(property = %name, %reason, "keeping property name");
            let name = name.to_string();
            ctx.clusters[index].skip = Some(reason);
            ctx.reserved.insert(name);
        }
    }
}

fn occurrence_skip(oracle: &dyn TypeOracle, kind: OccurrenceKind, receiver: TypeId) -> Option<SkipReason> {
    match kind {
        OccurrenceKind::Quoted | OccurrenceKind::ComputedLiteral => Some(SkipReason::Quoted),
        OccurrenceKind::RenameCall => Some(SkipReason::RenameFunction),
        OccurrenceKind::Dot
        | OccurrenceKind::ObjectKey
        | OccurrenceKind::Shorthand
        | OccurrenceKind::Getter
        | OccurrenceKind::Setter
        | OccurrenceKind::MemberFunction
        | OccurrenceKind::Field
        | OccurrenceKind::PatternKey
        | OccurrenceKind::PatternShorthand
        | OccurrenceKind::DescriptorKey => receiver_skip(oracle, receiver),
    }
}

/// Check a receiver type. Unions pass only if every non-empty alternate does.
fn receiver_skip(oracle: &dyn TypeOracle, ty: TypeId) -> Option<SkipReason> {
    if oracle.is_invalidating(ty) {
        return Some(SkipReason::InvalidatedType);
    }
    match oracle.classify(ty) {
        TypeClass::Unknown | TypeClass::Empty => Some(SkipReason::UnknownReceiver),
        TypeClass::Anonymous => Some(SkipReason::AnonymousReceiver),
        TypeClass::Record => Some(SkipReason::StructuralType),
        TypeClass::Primitive => Some(SkipReason::PrimitiveReceiver),
        TypeClass::Universal | TypeClass::Nominal | TypeClass::Constructor { .. } => None,
        TypeClass::Prototype { instance } => {
            if oracle.is_invalidating(instance) {
                Some(SkipReason::InvalidatedType)
            } else {
                None
            }
        }
        TypeClass::Union(alternates) => {
            let mut present = false;
            for &alt in alternates {
                if oracle.classify(alt) == TypeClass::Empty {
                    continue;
                }
                present = true;
                if let Some(reason) = receiver_skip(oracle, alt) {
                    return Some(reason);
                }
            }
            if present {
                None
            } else {
                Some(SkipReason::UnknownReceiver)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Program;
    use crate::types::TypeRegistry;

    fn record_all(ctx: &mut PassContext, program: &mut Program, entries: &[(&str, OccurrenceKind, TypeId)]) {
        for (name, kind, receiver) in entries {
            let node = program.ident("x");
            ctx.record(name, *kind, *receiver, node);
        }
    }

    fn skip_of(ctx: &PassContext, name: &str) -> Option<SkipReason> {
        ctx.clusters[name].skip
    }

    #[test]
    fn test_one_bad_occurrence_pins_the_name() {
        let mut registry = TypeRegistry::new();
        let foo = registry.declare_class("Foo");
        let mut program = Program::new();
        let mut ctx = PassContext::new();
        record_all(
            &mut ctx,
            &mut program,
            &[
                ("good", OccurrenceKind::Dot, foo.instance),
                ("mixed", OccurrenceKind::Dot, foo.instance),
                ("mixed", OccurrenceKind::Dot, TypeRegistry::UNKNOWN),
            ],
        );

        filter(&mut ctx, &registry, &ExternProperties::new(), &AmbiguateConfig::default());

        assert_eq!(skip_of(&ctx, "good"), None);
        assert_eq!(skip_of(&ctx, "mixed"), Some(SkipReason::UnknownReceiver));
        assert!(ctx.reserved.contains("mixed"));
        assert!(!ctx.reserved.contains("good"));
    }

    #[test]
    fn test_cluster_level_reasons_come_first() {
        let mut registry = TypeRegistry::new();
        let foo = registry.declare_class("Foo");
        registry.declare_record(&["shape"]);
        let mut program = Program::new();
        let mut ctx = PassContext::new();
        record_all(
            &mut ctx,
            &mut program,
            &[
                ("api", OccurrenceKind::Quoted, foo.instance),
                ("keep", OccurrenceKind::Dot, foo.instance),
                ("shape", OccurrenceKind::Dot, foo.instance),
                ("JSAbstractCompilerLabel", OccurrenceKind::Dot, foo.instance),
            ],
        );
        let externs = ExternProperties::from_names(["api"]);
        let config = AmbiguateConfig::default().with_reserved(["keep"]);

        filter(&mut ctx, &registry, &externs, &config);

        assert_eq!(skip_of(&ctx, "api"), Some(SkipReason::Extern));
        assert_eq!(skip_of(&ctx, "keep"), Some(SkipReason::Reserved));
        assert_eq!(skip_of(&ctx, "shape"), Some(SkipReason::StructuralType));
        assert_eq!(skip_of(&ctx, "JSAbstractCompilerLabel"), Some(SkipReason::RenamePrefix));
        assert!(ctx.reserved.contains("prototype"));
    }

    #[test]
    fn test_receiver_classes() {
        let mut registry = TypeRegistry::new();
        let foo = registry.declare_class("Foo");
        let bar = registry.declare_class("Bar");
        let anon = registry.anonymous_object();
        let record = registry.declare_record(&[]);
        let nullable = registry.nullable(foo.instance);
        let only_null = registry.union(&[TypeRegistry::NULL, TypeRegistry::UNDEFINED]);
        let with_anon = registry.union(&[foo.instance, anon]);
        registry.invalidate(bar.instance);

        let cases = [
            (foo.instance, None),
            (foo.constructor, None),
            (foo.prototype, None),
            (TypeRegistry::FUNCTION, None),
            (nullable, None),
            (TypeRegistry::UNKNOWN, Some(SkipReason::UnknownReceiver)),
            (TypeRegistry::NULL, Some(SkipReason::UnknownReceiver)),
            (only_null, Some(SkipReason::UnknownReceiver)),
            (anon, Some(SkipReason::AnonymousReceiver)),
            (with_anon, Some(SkipReason::AnonymousReceiver)),
            (record, Some(SkipReason::StructuralType)),
            (TypeRegistry::STRING, Some(SkipReason::PrimitiveReceiver)),
            (bar.instance, Some(SkipReason::InvalidatedType)),
            (bar.prototype, Some(SkipReason::InvalidatedType)),
        ];
        for (ty, expected) in cases {
            assert_eq!(receiver_skip(&registry, ty), expected, "{}", registry.display(ty));
        }
    }

    #[test]
    fn test_kind_reasons() {
        let mut registry = TypeRegistry::new();
        let foo = registry.declare_class("Foo");
        assert_eq!(
            occurrence_skip(&registry, OccurrenceKind::ComputedLiteral, foo.instance),
            Some(SkipReason::Quoted)
        );
        assert_eq!(
            occurrence_skip(&registry, OccurrenceKind::RenameCall, TypeRegistry::UNKNOWN),
            Some(SkipReason::RenameFunction)
        );
        assert_eq!(occurrence_skip(&registry, OccurrenceKind::DescriptorKey, foo.instance), None);
    }

    #[test]
    fn test_reason_serializes_kebab_case() {
        let json = serde_json::to_string(&SkipReason::UnknownReceiver).unwrap();
        assert_eq!(json, "\"unknown-receiver\"");
        assert_eq!(SkipReason::Extern.to_string(), "extern");
    }
}
