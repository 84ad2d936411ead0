// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Whole-subtree rewrites: position clearing, id assignment and edit-by-id.

use std::marker::PhantomData;

use super::dispatch::Walk;
use super::traits::{VisitResult, Visitor, VisitorMut};
use crate::nodes::{Node, NodeId, NodeIdGenerator, NodeMut, NodeRef, Pos};

/// Resets every position to [`Pos::NONE`] and every id to `None`.
///
/// A subtree moved to another place in a file must not keep the positions of
/// its old place, or the printer would lay it out against the wrong lines.
#[derive(Debug, Default)]
pub struct ClearPositions;

impl VisitorMut for ClearPositions {
    fn visit_node_id(&mut self, id: &mut Option<NodeId>) {
        *id = None;
    }

    fn visit_pos(&mut self, pos: &mut Pos) {
        *pos = Pos::NONE;
    }
}

/// Strip positions and ids from `node` and everything below it.
pub fn clear_positions<T: Walk + ?Sized>(node: &mut T) {
    node.walk_mut(&mut ClearPositions);
}

/// Gives every node a fresh id from a generator.
#[derive(Debug)]
pub struct AssignIds<'g> {
    ids: &'g mut NodeIdGenerator,
}

impl<'g> AssignIds<'g> {
    pub fn new(ids: &'g mut NodeIdGenerator) -> Self {
        AssignIds { ids }
    }
}

impl VisitorMut for AssignIds<'_> {
    fn visit_node_id(&mut self, id: &mut Option<NodeId>) {
        *id = Some(self.ids.next_id());
    }
}

/// Give `node` and everything below it fresh ids.
pub fn assign_ids<T: Walk + ?Sized>(node: &mut T, ids: &mut NodeIdGenerator) {
    node.walk_mut(&mut AssignIds::new(ids));
}

/// Gives fresh ids to the nodes that have none, leaving existing ids alone.
#[derive(Debug)]
struct FillIds<'g> {
    ids: &'g mut NodeIdGenerator,
}

impl VisitorMut for FillIds<'_> {
    fn visit_node_id(&mut self, id: &mut Option<NodeId>) {
        if id.is_none() {
            *id = Some(self.ids.next_id());
        }
    }
}

/// Give fresh ids to the nodes under `node` that were built without one.
///
/// Nodes that already have an id keep it, so comments attached to them stay
/// attached.
pub fn assign_missing_ids<T: Walk + ?Sized>(node: &mut T, ids: &mut NodeIdGenerator) {
    node.walk_mut(&mut FillIds { ids });
}

struct FindById<T> {
    id: NodeId,
    found: Option<T>,
}

impl<T: Node> Visitor for FindById<T> {
    fn enter_node(&mut self, node: NodeRef<'_>) -> VisitResult {
        if node.node_id() != Some(self.id) {
            return VisitResult::Continue;
        }
        if let Some(target) = T::from_ref(node) {
            self.found = Some(target.clone());
            return VisitResult::Stop;
        }
        VisitResult::Continue
    }
}

/// A copy of the node of type `T` with id `id` under `root`.
pub fn find_by_id<T: Node, R: Walk + ?Sized>(root: &R, id: NodeId) -> Option<T> {
    let mut finder = FindById { id, found: None };
    root.walk(&mut finder);
    finder.found
}

struct EditById<T, F, U> {
    id: NodeId,
    edit: Option<F>,
    result: Option<U>,
    _node: PhantomData<fn(&mut T)>,
}

impl<T, F, U> VisitorMut for EditById<T, F, U>
where
    T: Node,
    F: FnOnce(&mut T) -> U,
{
    fn enter_node(&mut self, node: NodeMut<'_>) -> VisitResult {
        if node.node_id() != Some(self.id) {
            return VisitResult::Continue;
        }
        if let Some(target) = T::from_mut(node) {
            if let Some(edit) = self.edit.take() {
                self.result = Some(edit(target));
            }
            return VisitResult::Stop;
        }
        VisitResult::Continue
    }
}

/// Apply `edit` to the node of type `T` with id `id` under `root`.
///
/// Returns `None` when no such node exists.
pub fn edit_by_id<T, R, F, U>(root: &mut R, id: NodeId, edit: F) -> Option<U>
where
    T: Node,
    R: Walk + ?Sized,
    F: FnOnce(&mut T) -> U,
{
    let mut editor = EditById {
        id,
        edit: Some(edit),
        result: None,
        _node: PhantomData,
    };
    root.walk_mut(&mut editor);
    editor.result
}
