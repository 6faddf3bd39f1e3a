//! The structurally hashed "rebuilt" AIG that SweepLoop incrementally
//! constructs as it proves and merges nodes.
//!
//! This is a second, separate node space from the original `Aig`: a node's
//! `value` in the original graph is a `Lit` pointing into this one. Building
//! it incrementally with a structural-hash table means two original nodes
//! that the sweep has already shown equivalent always collapse onto the
//! very same rebuilt literal, which is what lets `SweepLoop` skip a SAT call
//! whenever the two candidates already share a rebuilt node.

use fxhash::FxHashMap;

use super::aig::{Lit, NodeId as OrigNodeId};
use super::map::{DenseMap, Id};

pub(crate) type RebuiltId = Id<RebuiltNode>;

#[derive(Debug, Clone, Copy)]
pub(crate) enum RebuiltKind {
    Const0,
    Ci,
    And { fanin0: Lit, fanin1: Lit },
}

#[derive(Debug, Clone)]
pub(crate) struct RebuiltNode {
    pub(crate) kind: RebuiltKind,
    /// Set when this node's two fanins form a MUX/ITE pattern; read by
    /// CnfBuilder to pick the six-clause ITE encoding over the super-gate
    /// encoding.
    pub(crate) mark0: bool,
    /// SAT variable assigned to this node, if any. Kept across queries:
    /// the rebuilt AIG is structurally hashed, so a node's CNF encoding is
    /// a permanent fact about it and is only ever emitted once (see
    /// DESIGN.md for why this differs from a per-query teardown).
    pub(crate) sat_var: Option<u32>,
}

/// Structurally hashed AND-inverter graph, built on demand by `SweepLoop`.
#[derive(Debug, Clone, Default)]
pub(crate) struct RebuiltAig {
    nodes: DenseMap<RebuiltNode>,
    // Canonicalized (fanin0, fanin1) -> the And node already built for it.
    strash: FxHashMap<(Lit, Lit), RebuiltId>,
}

impl RebuiltAig {
    pub(crate) fn new() -> Self {
        let mut nodes = DenseMap::default();
        nodes.insert(RebuiltNode { kind: RebuiltKind::Const0, mark0: false, sat_var: None });
        Self { nodes, strash: FxHashMap::default() }
    }

    pub(crate) fn const0_lit() -> Lit {
        Lit::const0()
    }

    /// Allocates a fresh CI node, mirroring one CI of the original AIG.
    pub(crate) fn alloc_ci(&mut self) -> Lit {
        let id = self.nodes.insert(RebuiltNode { kind: RebuiltKind::Ci, mark0: false, sat_var: None });
        Lit::positive(id_to_orig(id))
    }

    /// Structurally hashed AND with constant propagation, matching the
    /// strashing an incremental SAT sweep depends on: two calls with the
    /// same (unordered) fanin pair always return the same literal.
    pub(crate) fn hash_and(&mut self, mut a: Lit, mut b: Lit) -> Lit {
        let const0 = Self::const0_lit();
        let const1 = const0.negate();

        if a == const0 || b == const0 {
            return const0;
        }
        if a == const1 {
            return b;
        }
        if b == const1 {
            return a;
        }
        if a == b {
            return a;
        }
        if a == b.negate() {
            return const0;
        }

        if a.raw() > b.raw() {
            std::mem::swap(&mut a, &mut b);
        }

        if let Some(existing) = self.strash.get(&(a, b)) {
            return Lit::positive(id_to_orig(*existing));
        }

        let id = self.nodes.insert(RebuiltNode {
            kind: RebuiltKind::And { fanin0: a, fanin1: b },
            mark0: is_mux_pattern(self, a, b),
            sat_var: None,
        });
        self.strash.insert((a, b), id);
        Lit::positive(id_to_orig(id))
    }

    pub(crate) fn kind(&self, lit: Lit) -> RebuiltKind {
        self[lit].kind
    }

    pub(crate) fn mark0(&self, lit: Lit) -> bool {
        self[lit].mark0
    }

    pub(crate) fn sat_var(&self, lit: Lit) -> Option<u32> {
        self[lit].sat_var
    }

    pub(crate) fn set_sat_var(&mut self, lit: Lit, var: Option<u32>) {
        self.nodes[lit_to_id(lit)].sat_var = var;
    }

}

impl std::ops::Index<Lit> for RebuiltAig {
    type Output = RebuiltNode;

    fn index(&self, lit: Lit) -> &Self::Output {
        &self.nodes[lit_to_id(lit)]
    }
}

fn lit_to_id(lit: Lit) -> RebuiltId {
    Id::from_index(lit.node().to_u32())
}

fn id_to_orig(id: RebuiltId) -> OrigNodeId {
    Id::from_index(id.to_u32())
}

/// Recognizes whether the AND of (a, b) forms one half of a MUX: both are
/// themselves ANDs sharing a common, oppositely-complemented selector
/// literal, i.e. `a = s & t`, `b = ~s & e` for some selector `s`.
fn is_mux_pattern(graph: &RebuiltAig, a: Lit, b: Lit) -> bool {
    let (RebuiltKind::And { fanin0: a0, fanin1: a1 }, RebuiltKind::And { fanin0: b0, fanin1: b1 }) =
        (graph.kind(a), graph.kind(b))
    else {
        return false;
    };
    let a_fanins = [a0, a1];
    let b_fanins = [b0, b1];
    a_fanins.iter().any(|&x| b_fanins.iter().any(|&y| x == y.negate()))
}
