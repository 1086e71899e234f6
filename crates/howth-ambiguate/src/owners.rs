//! Owner-closures: which nominal types can carry a property.
//!
//! An occurrence on a receiver of type `T` may be read from any instance of
//! `T` or of a subtype of `T`, so its owner-closure is `T` together with every
//! transitive subtype. Closures are computed once per type and cached.

use crate::context::PassContext;
use crate::types::{TypeClass, TypeId, TypeOracle};
use fixedbitset::FixedBitSet;
use rustc_hash::{FxHashMap, FxHashSet};

/// Bit reserved for the top function/object type.
const UNIVERSAL_BIT: usize = 0;

/// A set of owner types. Bit 0 is the universal owner; type `t` lives at
/// bit `t + 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerSet {
    bits: FixedBitSet,
}

impl OwnerSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The set holding only the universal owner.
    #[must_use]
    pub fn universal() -> Self {
        let mut set = Self::new();
        set.put(UNIVERSAL_BIT);
        set
    }

    fn put(&mut self, bit: usize) {
        if bit >= self.bits.len() {
            self.bits.grow(bit + 1);
        }
        self.bits.insert(bit);
    }

    pub fn insert(&mut self, ty: TypeId) {
        self.put(ty.index() + 1);
    }

    #[must_use]
    pub fn contains(&self, ty: TypeId) -> bool {
        self.bits.contains(ty.index() + 1)
    }

    #[must_use]
    pub fn is_universal(&self) -> bool {
        self.bits.contains(UNIVERSAL_BIT)
    }

    pub fn union_with(&mut self, other: &OwnerSet) {
        if other.bits.len() > self.bits.len() {
            self.bits.grow(other.bits.len());
        }
        self.bits.union_with(&other.bits);
    }

    /// Whether two properties with these owners could live on the same
    /// object. The universal owner conflicts with everything.
    #[must_use]
    pub fn conflicts_with(&self, other: &OwnerSet) -> bool {
        self.is_universal() || other.is_universal() || !self.bits.is_disjoint(&other.bits)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.count_ones(..) == 0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// Concrete owner types, ascending. The universal owner is not listed.
    pub fn types(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.bits
            .ones()
            .filter(|&bit| bit != UNIVERSAL_BIT)
            .map(|bit| TypeId::new((bit - 1) as u32))
    }
}

/// Memoized owner-closure computation over a [`TypeOracle`].
pub struct OwnerTable<'a> {
    oracle: &'a dyn TypeOracle,
    closures: FxHashMap<TypeId, OwnerSet>,
}

impl<'a> OwnerTable<'a> {
    #[must_use]
    pub fn new(oracle: &'a dyn TypeOracle) -> Self {
        Self {
            oracle,
            closures: FxHashMap::default(),
        }
    }

    /// Owner-closure of a receiver type.
    pub fn resolve(&mut self, ty: TypeId) -> OwnerSet {
        let oracle = self.oracle;
        match oracle.classify(ty) {
            TypeClass::Universal => OwnerSet::universal(),
            TypeClass::Union(alternates) => {
                let mut set = OwnerSet::new();
                for &alt in alternates {
                    if oracle.classify(alt) != TypeClass::Empty {
                        set.union_with(&self.resolve(alt));
                    }
                }
                set
            }
            TypeClass::Prototype { instance } => self.closure(instance),
            TypeClass::Nominal | TypeClass::Constructor { .. } => self.closure(ty),
            // Ineligible receivers never reach here.
            TypeClass::Unknown
            | TypeClass::Empty
            | TypeClass::Primitive
            | TypeClass::Anonymous
            | TypeClass::Record => OwnerSet::new(),
        }
    }

    /// `ty` plus all transitive subtypes. Cycles stop at the first revisit.
    pub fn closure(&mut self, ty: TypeId) -> OwnerSet {
        if let Some(cached) = self.closures.get(&ty) {
            return cached.clone();
        }

        let oracle = self.oracle;
        let mut set = OwnerSet::new();
        let mut visited = FxHashSet::default();
        let mut stack = vec![ty];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            set.insert(current);
            if let Some(cached) = self.closures.get(&current) {
                set.union_with(cached);
                continue;
            }
            stack.extend(oracle.direct_subtypes(current).iter().copied());
        }

        self.closures.insert(ty, set.clone());
        set
    }

    /// Number of cached closures.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.closures.len()
    }
}

/// Fill in the owner-closure of every eligible cluster.
pub fn resolve_clusters(ctx: &mut PassContext, table: &mut OwnerTable<'_>) {
    for index in 0..ctx.clusters.len() {
        if !ctx.clusters[index].is_eligible() {
            continue;
        }
        let mut owners = OwnerSet::new();
        for &occ in &ctx.clusters[index].occurrences {
            owners.union_with(&table.resolve(ctx.occurrences[occ].receiver));
        }
        ctx.clusters[index].owners = owners;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Inheritance, TypeRegistry};

    #[test]
    fn test_closure_includes_transitive_subtypes() {
        let mut registry = TypeRegistry::new();
        let a = registry.declare_class("A");
        let b = registry.declare_subclass("B", &a, Inheritance::Es6);
        let c = registry.declare_subclass("C", &b, Inheritance::Es6);
        let other = registry.declare_class("Other");

        let mut table = OwnerTable::new(&registry);
        let closure = table.closure(a.instance);
        assert!(closure.contains(a.instance));
        assert!(closure.contains(b.instance));
        assert!(closure.contains(c.instance));
        assert!(!closure.contains(other.instance));
        assert_eq!(closure.len(), 3);

        let leaf = table.closure(c.instance);
        assert_eq!(leaf.types().collect::<Vec<_>>(), vec![c.instance]);
    }

    #[test]
    fn test_interface_cycle_terminates() {
        let mut registry = TypeRegistry::new();
        let i = registry.declare_interface("I", &[]);
        let j = registry.declare_interface("J", &[i]);
        registry.add_subtype(j, i);

        let mut table = OwnerTable::new(&registry);
        let closure = table.closure(i);
        assert!(closure.contains(i));
        assert!(closure.contains(j));
        assert_eq!(closure.len(), 2);
    }

    #[test]
    fn test_closures_are_memoized() {
        let mut registry = TypeRegistry::new();
        let a = registry.declare_class("A");
        let b = registry.declare_subclass("B", &a, Inheritance::Es5);

        let mut table = OwnerTable::new(&registry);
        table.closure(b.instance);
        let first = table.closure(a.instance);
        let second = table.closure(a.instance);
        assert_eq!(first, second);
        assert_eq!(table.cached(), 2);
    }

    #[test]
    fn test_resolve_unions_prototypes_and_statics() {
        let mut registry = TypeRegistry::new();
        let foo = registry.declare_class("Foo");
        let bar = registry.declare_class("Bar");
        let es6 = registry.declare_subclass("Es6", &foo, Inheritance::Es6);
        let es5 = registry.declare_subclass("Es5", &foo, Inheritance::Es5);
        let either = registry.union(&[foo.instance, bar.instance, TypeRegistry::NULL]);

        let mut table = OwnerTable::new(&registry);

        let union = table.resolve(either);
        assert!(union.contains(foo.instance));
        assert!(union.contains(bar.instance));
        assert!(!union.is_universal());

        let proto = table.resolve(foo.prototype);
        assert!(proto.contains(foo.instance));
        assert!(proto.contains(es5.instance));

        let statics = table.resolve(foo.constructor);
        assert!(statics.contains(foo.constructor));
        assert!(statics.contains(es6.constructor));
        assert!(!statics.contains(es5.constructor));
        assert!(!statics.contains(foo.instance));

        assert!(table.resolve(TypeRegistry::FUNCTION).is_universal());
    }

    #[test]
    fn test_conflicts() {
        let mut registry = TypeRegistry::new();
        let foo = registry.declare_class("Foo");
        let bar = registry.declare_class("Bar");
        let mut table = OwnerTable::new(&registry);

        let foo_set = table.resolve(foo.instance);
        let bar_set = table.resolve(bar.instance);
        assert!(!foo_set.conflicts_with(&bar_set));
        assert!(foo_set.conflicts_with(&foo_set));
        assert!(OwnerSet::universal().conflicts_with(&bar_set));
        assert!(bar_set.conflicts_with(&OwnerSet::universal()));
    }
}
