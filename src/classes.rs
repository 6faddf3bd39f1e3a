//! C2: ClassStore — the current candidate-equivalence classes, as a
//! representative/next intrusive linked list per node.

use crate::ir::aig::{Aig, NodeId};

/// `repr[i] = Some(r)` means `i` is a member of `r`'s class; `None` means
/// `i` is either a class head or not yet classified at all (the two are
/// told apart by whether `i` appears in [`ClassStore::heads`]).
#[derive(Debug)]
pub(crate) struct ClassStore {
    repr: Vec<Option<NodeId>>,
    next: Vec<Option<NodeId>>,
    heads: Vec<NodeId>,
}

impl ClassStore {
    pub(crate) fn new(num_nodes: usize) -> Self {
        Self { repr: vec![None; num_nodes], next: vec![None; num_nodes], heads: Vec::new() }
    }

    pub(crate) fn set_repr(&mut self, i: NodeId, r: Option<NodeId>) {
        self.repr[i.to_usize()] = r;
    }

    pub(crate) fn get_repr(&self, i: NodeId) -> Option<NodeId> {
        self.repr[i.to_usize()]
    }

    pub(crate) fn set_next(&mut self, i: NodeId, n: Option<NodeId>) {
        self.next[i.to_usize()] = n;
    }

    pub(crate) fn get_next(&self, i: NodeId) -> Option<NodeId> {
        self.next[i.to_usize()]
    }

    /// Registers `head` as a class head. Idempotent is not enforced by
    /// callers; `build_initial`/`refine_one` only ever call this once per
    /// freshly created head.
    pub(crate) fn add_head(&mut self, head: NodeId) {
        self.heads.push(head);
    }

    pub(crate) fn heads(&self) -> &[NodeId] {
        &self.heads
    }

    /// Walks a class from its head following `next` links.
    pub(crate) fn iterate_class(&self, head: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(head), move |&n| self.get_next(n))
    }
}

impl ClassStore {
    /// Const0's class always exists and is always headed by node 0, per
    /// the invariant that the constant never migrates out of its own class.
    pub(crate) fn with_const0_head(num_nodes: usize) -> Self {
        let mut store = Self::new(num_nodes);
        store.add_head(Aig::const0_id());
        store
    }
}
