// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! [`ScopeTree`] is defined here.

use super::{Consumer, NodeId, Scope};
use crate::{Action, DistributionCell, ObserverGuard, Reducer, ScopeConfig, ScopeError,
            ScopeResult, SharedSnapshot, Snapshot, TearDown};
use rustc_hash::FxHashMap;
use std::{any::{Any, TypeId},
          fmt::{Debug, Formatter},
          sync::{Arc,
                 atomic::{AtomicUsize, Ordering}}};

/// A published cell with its types erased. Both fields point to the same
/// [`DistributionCell`].
struct ErasedCell {
    any: Arc<dyn Any + Send + Sync>,
    tear_down: Arc<dyn TearDown>,
}

/// One node of the tree. It may have a parent, and it can hold multiple children, and any
/// number of published cells (at most one per `(state, action)` type pair).
#[derive(Default)]
struct ScopeNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    cells: FxHashMap<TypeId, ErasedCell>,
}

/// The tree of consumers that scopes are published into, and read from.
///
/// A scope published at a node is visible to that node and all of its descendants, and
/// to nothing else. When two nodes on the way to the root published the same
/// `(state, action)` type pair, the nearest one wins (it shadows the outer one for its
/// own subtree).
///
/// ```text
/// root
///  ├─ node#1  publish_scope(CounterState = 0)
///  │   ├─ node#2                              read_scope() ─▶ node#1's scope
///  │   └─ node#3  publish_scope(CounterState = 100)
///  │       └─ node#4                          read_scope() ─▶ node#3's scope
///  └─ node#5                                  read_scope() ─▶ Err(Unbound)
/// ```
///
/// Unmounting a node tears down every scope published at it or below it, even if a
/// [`Scope`] handle to it is still held. Readers that held on to a [`Consumer`] or an
/// [`ObserverGuard`] are detached, and reading from an unmounted node is an error.
pub struct ScopeTree {
    nodes: FxHashMap<NodeId, ScopeNode>,
    root: NodeId,
    atomic_counter: AtomicUsize,
}

impl Default for ScopeTree {
    fn default() -> Self { Self::new() }
}

impl ScopeTree {
    #[must_use]
    pub fn new() -> Self {
        let mut it = Self {
            nodes: FxHashMap::default(),
            root: NodeId::from(0),
            atomic_counter: AtomicUsize::new(0),
        };
        it.root = it.generate_uid();
        it.nodes.insert(it.root, ScopeNode::default());
        it
    }

    #[must_use]
    pub fn root(&self) -> NodeId { self.root }

    /// Add a new leaf under `parent`.
    pub fn mount_child(&mut self, parent: NodeId) -> ScopeResult<NodeId> {
        let new_node_id = self.generate_uid();
        self.node_mut(parent)?.children.push(new_node_id);
        self.nodes.insert(new_node_id, ScopeNode {
            parent: Some(parent),
            ..Default::default()
        });
        Ok(new_node_id)
    }

    /// Remove `node_id` and all its descendants, and tear down every scope published at
    /// them. Returns the ids of the removed nodes, in DFS order.
    pub fn unmount(&mut self, node_id: NodeId) -> ScopeResult<Vec<NodeId>> {
        if node_id == self.root {
            return Err(ScopeError::CannotUnmountRoot { node_id });
        }

        let deletion_list = self.tree_walk_dfs(node_id)?;

        if let Some(parent_id) = self.parent_of(node_id)?
            && let Ok(parent) = self.node_mut(parent_id)
        {
            parent.children.retain(|child_id| *child_id != node_id);
        }

        for id in &deletion_list {
            if let Some(node) = self.nodes.remove(id)
                && !node.cells.is_empty()
            {
                tracing::debug!(
                    message = "🍂 unmounting node with published scopes",
                    node_id = %id,
                    scope_count = node.cells.len()
                );
                for cell in node.cells.values() {
                    cell.tear_down.tear_down();
                }
            }
        }

        Ok(deletion_list)
    }

    /// Publish a new scope at `node_id`: create a [`crate::ReducerAdapter`] from
    /// `reducer` and `initial_state`, and make its `{state, dispatch}` visible to
    /// `node_id` and its descendants. Uses the default [`ScopeConfig`].
    pub fn publish_scope<S, A>(
        &mut self,
        node_id: NodeId,
        reducer: impl Reducer<S, A>,
        initial_state: S,
    ) -> ScopeResult<Scope<S, A>>
    where
        S: PartialEq + Send + Sync + 'static,
        A: Action,
    {
        self.publish_scope_with_config(node_id, reducer, initial_state, ScopeConfig::default())
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(node_id = %node_id, state_type = std::any::type_name::<S>())
    )]
    pub fn publish_scope_with_config<S, A>(
        &mut self,
        node_id: NodeId,
        reducer: impl Reducer<S, A>,
        initial_state: S,
        config: ScopeConfig,
    ) -> ScopeResult<Scope<S, A>>
    where
        S: PartialEq + Send + Sync + 'static,
        A: Action,
    {
        let key = TypeId::of::<DistributionCell<S, A>>();
        let node = self.node_mut(node_id)?;
        if node.cells.contains_key(&key) {
            return Err(ScopeError::already_published::<S>(node_id));
        }

        let cell = DistributionCell::publish(reducer, initial_state, config);
        node.cells.insert(key, ErasedCell {
            any: cell.clone(),
            tear_down: cell.clone(),
        });

        Ok(Scope::new(node_id, cell))
    }

    /// Find the nearest scope for `(S, A)`, starting at `node_id` and walking up to the
    /// root.
    pub fn scope<S, A>(&self, node_id: NodeId) -> ScopeResult<Scope<S, A>>
    where
        S: PartialEq + Send + Sync + 'static,
        A: Action,
    {
        let key = TypeId::of::<DistributionCell<S, A>>();
        for ancestor_id in self.ancestors(node_id)? {
            let cell = self
                .nodes
                .get(&ancestor_id)
                .and_then(|node| node.cells.get(&key))
                .and_then(|it| it.any.clone().downcast::<DistributionCell<S, A>>().ok());
            if let Some(cell) = cell {
                return Ok(Scope::new(ancestor_id, cell));
            }
        }
        Err(ScopeError::unbound::<S>(node_id))
    }

    /// Direct read: the current `{state, dispatch}` snapshot of the nearest scope.
    pub fn read_scope<S, A>(&self, node_id: NodeId) -> ScopeResult<SharedSnapshot<S, A>>
    where
        S: PartialEq + Send + Sync + 'static,
        A: Action,
    {
        Ok(self.scope::<S, A>(node_id)?.read())
    }

    /// Callback read: apply `render` to the current snapshot of the nearest scope.
    pub fn read_scope_with_callback<S, A, R>(
        &self,
        node_id: NodeId,
        render: impl FnOnce(&Snapshot<S, A>) -> R,
    ) -> ScopeResult<R>
    where
        S: PartialEq + Send + Sync + 'static,
        A: Action,
    {
        Ok(self.scope::<S, A>(node_id)?.read_with_callback(render))
    }

    /// Like [`ScopeTree::read_scope_with_callback()`], for consumers that only need the
    /// state.
    pub fn read_state_with_callback<S, A, R>(
        &self,
        node_id: NodeId,
        render: impl FnOnce(&S) -> R,
    ) -> ScopeResult<R>
    where
        S: PartialEq + Send + Sync + 'static,
        A: Action,
    {
        self.read_scope_with_callback::<S, A, R>(node_id, |snapshot| render(snapshot.state()))
    }

    /// Mount a [`Consumer`] at `node_id` that renders the nearest scope right away, and
    /// again every time that scope publishes a new snapshot.
    pub fn consume_scope<S, A, R>(
        &self,
        node_id: NodeId,
        render: impl FnMut(&Snapshot<S, A>) -> R + Send + 'static,
    ) -> ScopeResult<Consumer<S, A, R>>
    where
        S: PartialEq + Send + Sync + 'static,
        A: Action,
        R: Send + 'static,
    {
        let scope = self.scope::<S, A>(node_id)?;
        Ok(Consumer::new(node_id, scope.cell(), render))
    }

    /// Call `observer` with every snapshot the nearest scope publishes from now on.
    pub fn subscribe_scope<S, A>(
        &self,
        node_id: NodeId,
        observer: impl FnMut(&SharedSnapshot<S, A>) + Send + 'static,
    ) -> ScopeResult<ObserverGuard>
    where
        S: PartialEq + Send + Sync + 'static,
        A: Action,
    {
        Ok(self.scope::<S, A>(node_id)?.subscribe(observer))
    }

    /// `None` for the root.
    pub fn parent_of(&self, node_id: NodeId) -> ScopeResult<Option<NodeId>> {
        Ok(self.node(node_id)?.parent)
    }

    pub fn children_of(&self, node_id: NodeId) -> ScopeResult<Vec<NodeId>> {
        Ok(self.node(node_id)?.children.clone())
    }

    /// `node_id` itself, then its parent, and so on up to the root.
    pub fn ancestors(&self, node_id: NodeId) -> ScopeResult<Vec<NodeId>> {
        let mut collected_nodes = vec![node_id];
        let mut current = self.node(node_id)?.parent;
        while let Some(parent_id) = current {
            collected_nodes.push(parent_id);
            current = self.node(parent_id)?.parent;
        }
        Ok(collected_nodes)
    }

    #[must_use]
    pub fn contains(&self, node_id: NodeId) -> bool { self.nodes.contains_key(&node_id) }

    /// Number of mounted nodes, including the root.
    #[must_use]
    pub fn len(&self) -> usize { self.nodes.len() }

    /// Always `false`, since the root can't be unmounted.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    /// DFS tree walking, `node_id` first.
    fn tree_walk_dfs(&self, node_id: NodeId) -> ScopeResult<Vec<NodeId>> {
        self.node(node_id)?;

        let mut collected_nodes = vec![];
        let mut stack = vec![node_id];
        while let Some(node_id) = stack.pop() {
            if let Some(node) = self.nodes.get(&node_id) {
                collected_nodes.push(node_id);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        Ok(collected_nodes)
    }

    fn node(&self, node_id: NodeId) -> ScopeResult<&ScopeNode> {
        self.nodes
            .get(&node_id)
            .ok_or(ScopeError::NodeNotFound { node_id })
    }

    fn node_mut(&mut self, node_id: NodeId) -> ScopeResult<&mut ScopeNode> {
        self.nodes
            .get_mut(&node_id)
            .ok_or(ScopeError::NodeNotFound { node_id })
    }

    fn generate_uid(&self) -> NodeId {
        NodeId::from(self.atomic_counter.fetch_add(1, Ordering::SeqCst))
    }
}

impl Debug for ScopeTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopeTree")
            .field("root", &self.root)
            .field("len", &self.nodes.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{CounterAction, CounterState, counter_action,
                               counter_reducer};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    fn read_counter(tree: &ScopeTree, node_id: NodeId) -> ScopeResult<i32> {
        tree.read_state_with_callback::<CounterState, CounterAction, _>(node_id, |state| {
            state.counter
        })
    }

    #[test]
    fn test_mount_and_walk() -> ScopeResult<()> {
        let mut tree = ScopeTree::new();
        let root = tree.root();
        let a = tree.mount_child(root)?;
        let b = tree.mount_child(a)?;
        let c = tree.mount_child(a)?;

        assert_eq!(tree.len(), 4);
        assert!(!tree.is_empty());
        assert_eq!(tree.parent_of(root)?, None);
        assert_eq!(tree.parent_of(b)?, Some(a));
        assert_eq!(tree.children_of(a)?, vec![b, c]);
        assert_eq!(tree.ancestors(c)?, vec![c, a, root]);
        assert_eq!(tree.tree_walk_dfs(a)?, vec![a, b, c]);
        Ok(())
    }

    #[test]
    fn test_read_without_publisher_is_unbound() -> ScopeResult<()> {
        let mut tree = ScopeTree::new();
        let child = tree.mount_child(tree.root())?;

        let error = read_counter(&tree, child).unwrap_err();
        assert_eq!(error, ScopeError::unbound::<CounterState>(child));
        Ok(())
    }

    #[test]
    fn test_unknown_node_is_not_found() {
        let tree = ScopeTree::new();
        let missing = NodeId::from(99);
        assert_eq!(
            tree.read_scope::<CounterState, CounterAction>(missing).unwrap_err(),
            ScopeError::NodeNotFound { node_id: missing }
        );
    }

    #[test]
    fn test_descendants_see_nearest_publisher() -> ScopeResult<()> {
        let mut tree = ScopeTree::new();
        let outer = tree.mount_child(tree.root())?;
        let outer_leaf = tree.mount_child(outer)?;
        let inner = tree.mount_child(outer)?;
        let inner_leaf = tree.mount_child(inner)?;
        let outside = tree.mount_child(tree.root())?;

        tree.publish_scope(outer, counter_reducer, CounterState::new(0))?;
        tree.publish_scope(inner, counter_reducer, CounterState::new(100))?;

        assert_eq!(read_counter(&tree, outer)?, 0);
        assert_eq!(read_counter(&tree, outer_leaf)?, 0);
        assert_eq!(read_counter(&tree, inner)?, 100);
        assert_eq!(read_counter(&tree, inner_leaf)?, 100);
        assert!(read_counter(&tree, outside).is_err());

        let outer_seen = Arc::new(Mutex::new(vec![]));
        let outer_seen_clone = outer_seen.clone();
        let _outer_guard =
            tree.subscribe_scope::<CounterState, CounterAction>(outer_leaf, move |it| {
                outer_seen_clone.lock().unwrap().push(it.state().counter);
            })?;
        let inner_seen = Arc::new(Mutex::new(vec![]));
        let inner_seen_clone = inner_seen.clone();
        let _inner_guard =
            tree.subscribe_scope::<CounterState, CounterAction>(inner_leaf, move |it| {
                inner_seen_clone.lock().unwrap().push(it.state().counter);
            })?;

        // Dispatching through the inner scope leaves the outer one alone.
        tree.read_scope::<CounterState, CounterAction>(inner_leaf)?
            .dispatcher()
            .invoke(counter_action::Increment);
        assert_eq!(read_counter(&tree, inner_leaf)?, 101);
        assert_eq!(read_counter(&tree, outer_leaf)?, 0);
        assert_eq!(*inner_seen.lock().unwrap(), vec![101]);
        assert!(outer_seen.lock().unwrap().is_empty());

        assert_eq!(tree.scope::<CounterState, CounterAction>(inner_leaf)?.node_id(), inner);
        Ok(())
    }

    #[test]
    fn test_publishing_twice_at_same_node_is_rejected() -> ScopeResult<()> {
        let mut tree = ScopeTree::new();
        let node = tree.mount_child(tree.root())?;
        tree.publish_scope(node, counter_reducer, CounterState::default())?;

        let result = tree.publish_scope(node, counter_reducer, CounterState::new(5));
        assert_eq!(
            result.unwrap_err(),
            ScopeError::already_published::<CounterState>(node)
        );

        // A different state type can share the node.
        tree.publish_scope(node, |it: &u8, _: CounterAction| *it, 7_u8)?;
        assert_eq!(
            tree.read_state_with_callback::<u8, CounterAction, _>(node, |it| *it)?,
            7
        );
        assert_eq!(read_counter(&tree, node)?, 0);
        Ok(())
    }

    #[test]
    fn test_unmount_tears_down_subtree() -> ScopeResult<()> {
        let mut tree = ScopeTree::new();
        let parent = tree.mount_child(tree.root())?;
        let child = tree.mount_child(parent)?;
        let grandchild = tree.mount_child(child)?;
        let scope = tree.publish_scope(child, counter_reducer, CounterState::default())?;

        let consumer = tree.consume_scope::<CounterState, CounterAction, _>(
            grandchild,
            |snapshot| snapshot.state().counter,
        )?;
        let observer = tree.subscribe_scope::<CounterState, CounterAction>(grandchild, |_| {})?;
        drop(scope);

        assert_eq!(tree.unmount(child)?, vec![child, grandchild]);
        assert_eq!(tree.children_of(parent)?, vec![]);
        assert!(!tree.contains(grandchild));
        assert_eq!(tree.len(), 2);

        assert!(!consumer.is_bound());
        assert!(!observer.is_attached());
        assert_eq!(
            consumer.refresh().unwrap_err(),
            ScopeError::unbound::<CounterState>(grandchild)
        );
        assert!(read_counter(&tree, grandchild).is_err());
        Ok(())
    }

    #[test]
    fn test_unmount_tears_down_scope_while_handle_is_held() -> ScopeResult<()> {
        let mut tree = ScopeTree::new();
        let app = tree.mount_child(tree.root())?;
        let view = tree.mount_child(app)?;
        let scope = tree.publish_scope(app, counter_reducer, CounterState::default())?;

        let consumer = tree.consume_scope::<CounterState, CounterAction, _>(view, |snapshot| {
            snapshot.state().counter
        })?;
        let seen = Arc::new(Mutex::new(vec![]));
        let seen_clone = seen.clone();
        let observer = tree.subscribe_scope::<CounterState, CounterAction>(view, move |it| {
            seen_clone.lock().unwrap().push(it.state().counter);
        })?;

        tree.unmount(app)?;
        scope.dispatcher().invoke(counter_action::Increment);

        assert!(scope.cell().is_torn_down());
        assert!(!consumer.is_bound());
        assert_eq!(
            consumer.refresh().unwrap_err(),
            ScopeError::unbound::<CounterState>(view)
        );
        assert!(!observer.is_attached());
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(consumer.latest(), 0);
        assert_eq!(consumer.render_count(), 1);
        assert_eq!(*scope.dispatcher().state(), CounterState::new(1));
        assert!(read_counter(&tree, view).is_err());
        Ok(())
    }

    #[test]
    fn test_root_cannot_be_unmounted() {
        let mut tree = ScopeTree::new();
        let root = tree.root();
        assert_eq!(
            tree.unmount(root).unwrap_err(),
            ScopeError::CannotUnmountRoot { node_id: root }
        );
    }

    #[test]
    fn test_consumer_renders_on_change_only() -> ScopeResult<()> {
        let mut tree = ScopeTree::new();
        let app = tree.mount_child(tree.root())?;
        let view = tree.mount_child(app)?;
        let scope = tree.publish_scope(app, counter_reducer, CounterState::default())?;

        let consumer = tree.consume_scope::<CounterState, CounterAction, _>(view, |snapshot| {
            format!("count: {}", snapshot.state().counter)
        })?;
        assert_eq!(consumer.latest(), "count: 0");
        assert_eq!(consumer.render_count(), 1);

        scope.dispatcher().invoke(counter_action::Increment);
        assert_eq!(consumer.latest(), "count: 1");
        assert_eq!(consumer.render_count(), 2);

        scope.dispatcher().invoke(counter_action::Noop);
        assert_eq!(consumer.render_count(), 2);

        consumer.refresh()?;
        assert_eq!(consumer.latest(), "count: 1");
        assert_eq!(consumer.render_count(), 3);
        Ok(())
    }

    #[test]
    fn test_consumer_render_can_dispatch() -> ScopeResult<()> {
        let mut tree = ScopeTree::new();
        let node = tree.mount_child(tree.root())?;
        let scope = tree.publish_scope(node, counter_reducer, CounterState::new(3))?;

        // Counts down to zero from inside its own render.
        let consumer = tree.consume_scope::<CounterState, CounterAction, _>(node, |snapshot| {
            if snapshot.state().counter > 0 {
                snapshot.dispatcher().invoke(counter_action::Decrement);
            }
            snapshot.state().counter
        })?;

        assert_eq!(*scope.read().state(), CounterState::new(0));
        assert_eq!(consumer.latest(), 0);
        Ok(())
    }

    #[test]
    fn test_subscribe_scope_sees_every_publish() -> ScopeResult<()> {
        let mut tree = ScopeTree::new();
        let node = tree.mount_child(tree.root())?;
        let scope = tree.publish_scope(node, counter_reducer, CounterState::default())?;

        let seen = Arc::new(Mutex::new(vec![]));
        let seen_clone = seen.clone();
        let _guard = tree.subscribe_scope::<CounterState, CounterAction>(node, move |it| {
            seen_clone.lock().unwrap().push(it.state().counter);
        })?;

        scope.dispatcher().invoke_with(counter_action::AddValue, 2);
        scope.dispatcher().invoke_with(counter_action::AddValue, 0);
        scope.dispatcher().invoke(counter_action::Decrement);

        assert_eq!(*seen.lock().unwrap(), vec![2, 1]);
        Ok(())
    }

    #[test]
    fn test_scope_handle_round_trips() -> ScopeResult<()> {
        let mut tree = ScopeTree::new();
        let node = tree.mount_child(tree.root())?;
        let published = tree.publish_scope(node, counter_reducer, CounterState::new(4))?;
        let found: Scope<CounterState, CounterAction> = tree.scope(node)?;

        assert!(Arc::ptr_eq(published.cell(), found.cell()));
        assert_eq!(
            found.read_with_callback(|snapshot| snapshot.state().counter),
            4
        );
        Ok(())
    }
}
