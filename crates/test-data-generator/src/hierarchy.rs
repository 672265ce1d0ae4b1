//! Hierarchy-ordered store.
//!
//! Items are registered against a type. Each distinct type owns one node with an ordered item
//! list, and the nodes live in one flat list in which every ancestor type precedes its
//! descendants. The order is maintained on insertion, so a query for a type simply
//! concatenates the lists of all nodes whose type is assignable from it, most general first.

use std::any::TypeId;
use tracing::info;
use type_meta::{is_compatible, TypeDescriptor, TypeUniverse};

/// Item with a concrete-type identity used for deduplication and relative placement.
pub trait Identified {
    fn identity(&self) -> TypeId;
}

/// Where to put a new item inside its node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// End of the list
    Last,
    /// Right before the item with this identity
    Before(TypeId),
    /// Right after the item with this identity
    After(TypeId),
}

/// Items registered for one type.
#[derive(Debug, Clone)]
pub struct HierarchyNode<T> {
    ty: TypeDescriptor,
    items: Vec<T>,
}

impl<T> HierarchyNode<T> {
    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }
}

#[derive(Debug, Clone)]
pub struct HierarchyStore<T> {
    nodes: Vec<HierarchyNode<T>>,
}

impl<T> Default for HierarchyStore<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<T: Identified + Clone> HierarchyStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[HierarchyNode<T>] {
        &self.nodes
    }

    /// Total number of items across all nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().map(|node| node.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register `item` for `ty`.
    ///
    /// Returns `false` without changes when an item of the same identity is already registered
    /// for `ty` or any of its ancestors. A missing placement target appends instead.
    pub fn insert(
        &mut self,
        universe: &TypeUniverse,
        ty: &TypeDescriptor,
        placement: Placement,
        item: T,
    ) -> bool {
        if self.is_already_present(universe, ty, item.identity()) {
            info!("Received item is already present for '{}' so its copy will not be added", ty);
            return false;
        }

        let node_index = match self.node_index(ty) {
            Some(index) => index,
            None => self.insert_node(universe, ty),
        };
        let items = &mut self.nodes[node_index].items;
        let position = match placement {
            Placement::Last => items.len(),
            Placement::Before(target) => position_of(items, target).unwrap_or_else(|| {
                info!("Target item is not present for '{}', adding to list end", ty);
                items.len()
            }),
            Placement::After(target) => position_of(items, target)
                .map(|index| index + 1)
                .unwrap_or_else(|| {
                    info!("Target item is not present for '{}', adding to list end", ty);
                    items.len()
                }),
        };
        items.insert(position, item);
        true
    }

    /// Items applying to `ty`: those of every node whose type is assignable from it, in
    /// node order.
    pub fn get_all(&self, universe: &TypeUniverse, ty: &TypeDescriptor) -> Vec<T> {
        self.nodes
            .iter()
            .filter(|node| is_compatible(universe, &node.ty, ty))
            .flat_map(|node| node.items.iter().cloned())
            .collect()
    }

    fn node_index(&self, ty: &TypeDescriptor) -> Option<usize> {
        self.nodes.iter().position(|node| &node.ty == ty)
    }

    /// Insert an empty node for `ty` keeping ancestors before descendants.
    ///
    /// Scanning from the end, the nearest ancestor node places the new node right after it.
    /// Otherwise the new node goes before the earliest descendant node, or at the end.
    fn insert_node(&mut self, universe: &TypeUniverse, ty: &TypeDescriptor) -> usize {
        let mut index = self.nodes.len();
        for (i, node) in self.nodes.iter().enumerate().rev() {
            if is_compatible(universe, &node.ty, ty) {
                index = i + 1;
                break;
            }
            if is_compatible(universe, ty, &node.ty) {
                index = i;
            }
        }
        self.nodes.insert(
            index,
            HierarchyNode {
                ty: ty.clone(),
                items: Vec::new(),
            },
        );
        index
    }

    fn is_already_present(&self, universe: &TypeUniverse, ty: &TypeDescriptor, identity: TypeId) -> bool {
        self.nodes
            .iter()
            .filter(|node| is_compatible(universe, &node.ty, ty))
            .any(|node| position_of(&node.items, identity).is_some())
    }
}

fn position_of<T: Identified>(items: &[T], identity: TypeId) -> Option<usize> {
    items.iter().position(|item| item.identity() == identity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        identity: TypeId,
        label: &'static str,
    }

    struct First;
    struct Second;
    struct Third;

    fn item<K: 'static>(label: &'static str) -> Item {
        Item {
            identity: TypeId::of::<K>(),
            label,
        }
    }

    impl Identified for Item {
        fn identity(&self) -> TypeId {
            self.identity
        }
    }

    fn labels(items: &[Item]) -> Vec<&'static str> {
        items.iter().map(|item| item.label).collect()
    }

    fn node_types(store: &HierarchyStore<Item>) -> Vec<String> {
        store.nodes().iter().map(|node| node.ty().to_string()).collect()
    }

    #[test]
    fn test_ancestors_precede_descendants() {
        let universe = TypeUniverse::new();
        let mut store = HierarchyStore::new();

        store.insert(&universe, &TypeDescriptor::of("Number"), Placement::Last, item::<First>("number"));
        store.insert(&universe, &TypeDescriptor::of("Integer"), Placement::Last, item::<Second>("integer"));
        store.insert(&universe, &TypeDescriptor::of("Serializable"), Placement::Last, item::<Third>("serializable"));

        assert_eq!(node_types(&store), vec!["Serializable", "Number", "Integer"]);
        assert_eq!(
            labels(&store.get_all(&universe, &TypeDescriptor::of("Integer"))),
            vec!["serializable", "number", "integer"]
        );
        assert_eq!(
            labels(&store.get_all(&universe, &TypeDescriptor::of("Long"))),
            vec!["serializable", "number"]
        );
        assert_eq!(
            labels(&store.get_all(&universe, &TypeDescriptor::of("String"))),
            vec!["serializable"]
        );
    }

    #[test]
    fn test_unrelated_types_append() {
        let universe = TypeUniverse::new();
        let mut store = HierarchyStore::new();

        store.insert(&universe, &TypeDescriptor::of("String"), Placement::Last, item::<First>("a"));
        store.insert(&universe, &TypeDescriptor::of("Integer"), Placement::Last, item::<Second>("b"));
        store.insert(&universe, &TypeDescriptor::of("Object"), Placement::Last, item::<Third>("c"));

        assert_eq!(node_types(&store), vec!["Object", "String", "Integer"]);
    }

    #[test]
    fn test_same_type_shares_node() {
        let universe = TypeUniverse::new();
        let mut store = HierarchyStore::new();
        let integer = TypeDescriptor::of("Integer");

        store.insert(&universe, &integer, Placement::Last, item::<First>("first"));
        store.insert(&universe, &integer, Placement::Last, item::<Second>("second"));

        assert_eq!(store.nodes().len(), 1);
        assert_eq!(labels(store.nodes()[0].items()), vec!["first", "second"]);
    }

    #[test]
    fn test_duplicates_ignored_across_ancestors() {
        let universe = TypeUniverse::new();
        let mut store = HierarchyStore::new();

        assert!(store.insert(&universe, &TypeDescriptor::of("Number"), Placement::Last, item::<First>("a")));
        assert!(!store.insert(&universe, &TypeDescriptor::of("Number"), Placement::Last, item::<First>("b")));
        assert!(!store.insert(&universe, &TypeDescriptor::of("Integer"), Placement::Last, item::<First>("c")));
        assert_eq!(store.len(), 1);

        // a descendant registration does not block the ancestor
        assert!(store.insert(&universe, &TypeDescriptor::of("Long"), Placement::Last, item::<Second>("d")));
        assert!(store.insert(&universe, &TypeDescriptor::of("Number"), Placement::Last, item::<Second>("e")));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_before_and_after_placement() {
        let universe = TypeUniverse::new();
        let mut store = HierarchyStore::new();
        let ty = TypeDescriptor::of("String");

        store.insert(&universe, &ty, Placement::Last, item::<First>("first"));
        store.insert(&universe, &ty, Placement::Before(TypeId::of::<First>()), item::<Second>("second"));
        store.insert(&universe, &ty, Placement::After(TypeId::of::<Second>()), item::<Third>("third"));

        assert_eq!(
            labels(&store.get_all(&universe, &ty)),
            vec!["second", "third", "first"]
        );
    }

    #[test]
    fn test_missing_target_appends() {
        let universe = TypeUniverse::new();
        let mut store = HierarchyStore::new();
        let ty = TypeDescriptor::of("String");

        store.insert(&universe, &ty, Placement::Last, item::<First>("first"));
        store.insert(&universe, &ty, Placement::Before(TypeId::of::<Third>()), item::<Second>("second"));

        assert_eq!(labels(&store.get_all(&universe, &ty)), vec!["first", "second"]);
    }

    #[test]
    fn test_placement_stays_inside_node() {
        let universe = TypeUniverse::new();
        let mut store = HierarchyStore::new();

        store.insert(&universe, &TypeDescriptor::of("Number"), Placement::Last, item::<First>("number"));
        store.insert(
            &universe,
            &TypeDescriptor::of("Integer"),
            Placement::Before(TypeId::of::<First>()),
            item::<Second>("integer"),
        );

        assert_eq!(
            labels(&store.get_all(&universe, &TypeDescriptor::of("Integer"))),
            vec!["number", "integer"]
        );
    }
}
