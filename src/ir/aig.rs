//! The original, immutable AIG structure the engine sweeps over.
//!
//! Node 0 is always the constant-zero sentinel (`Gia_ManConst0` in the
//! original ABC sources this design is grounded on); CI nodes carry no
//! fanins, And nodes carry two fanin literals, and Co nodes (primary
//! outputs, or latch-data-inputs treated as combinational boundaries)
//! carry one driver literal.

use super::map::{DenseMap, Id};

pub type NodeId = Id<AigNode>;

/// A literal: a node id plus a complement bit, packed as `(index << 1) | c`
/// the way the original C sources pack them, but typed here instead of a
/// bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lit(u32);

impl Lit {
    pub fn new(node: NodeId, complement: bool) -> Self {
        Lit((node.to_u32() << 1) | complement as u32)
    }

    pub fn positive(node: NodeId) -> Self {
        Lit::new(node, false)
    }

    pub(crate) fn node(self) -> NodeId {
        Id::from_index(self.0 >> 1)
    }

    pub(crate) fn is_complemented(self) -> bool {
        self.0 & 1 == 1
    }

    pub fn negate(self) -> Self {
        Lit(self.0 ^ 1)
    }

    pub(crate) fn maybe_negate(self, flip: bool) -> Self {
        if flip { self.negate() } else { self }
    }

    /// The literal for the permanent constant-0 node, uncomplemented.
    pub(crate) fn const0() -> Self {
        Lit::new(Id::from_index(0), false)
    }

    /// The raw packed representation, used only to impose a canonical
    /// ordering when normalizing commutative AND fanins.
    pub(crate) fn raw(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum NodeKind {
    Const0,
    Ci,
    And { fanin0: Lit, fanin1: Lit },
    Co { driver: Lit },
}

/// A single AIG node plus the per-iteration bookkeeping the sweep needs.
#[derive(Debug, Clone)]
pub struct AigNode {
    pub(crate) kind: NodeKind,
    /// Value of this node under the all-zero CI assignment, precomputed.
    pub(crate) phase: bool,
    /// Transient per-iteration flag: set on nodes in the transitive fanout
    /// of a node disproved this iteration, to skip redundant SAT calls.
    pub(crate) mark1: bool,
    /// This node's literal in the rebuilt, structurally hashed AIG, once
    /// it has been swept. `None` means "not yet merged into the rebuilt AIG".
    pub(crate) value: Option<Lit>,
    pub(crate) proved: bool,
    pub(crate) failed: bool,
    /// The representative node this one was proved equivalent to, once
    /// `sweep` has run. `None` until proved.
    pub(crate) repr: Option<NodeId>,
}

impl AigNode {
    fn new(kind: NodeKind, phase: bool) -> Self {
        Self { kind, phase, mark1: false, value: None, proved: false, failed: false, repr: None }
    }
}

/// The input AIG: CIs, And gates, and Co nodes (outputs), index-addressed.
#[derive(Debug, Clone, Default)]
pub struct Aig {
    nodes: DenseMap<AigNode>,
    cis: Vec<NodeId>,
    cos: Vec<NodeId>,
}

impl Aig {
    /// Creates a fresh AIG with node 0 reserved as the constant.
    pub fn new() -> Self {
        let mut nodes = DenseMap::default();
        nodes.insert(AigNode::new(NodeKind::Const0, false));
        Self { nodes, cis: Vec::new(), cos: Vec::new() }
    }

    /// The id of the permanent constant-zero node, node 0.
    pub fn const0_id() -> NodeId {
        Id::from_index(0)
    }

    /// Adds a combinational input (a primary input or latch output).
    pub fn add_ci(&mut self) -> NodeId {
        let id = self.nodes.insert(AigNode::new(NodeKind::Ci, false));
        self.cis.push(id);
        id
    }

    /// Adds an And node, computing its phase from its fanins' phases.
    pub fn add_and(&mut self, fanin0: Lit, fanin1: Lit) -> NodeId {
        let phase = self.eval_lit_phase(fanin0) && self.eval_lit_phase(fanin1);
        self.nodes.insert(AigNode::new(NodeKind::And { fanin0, fanin1 }, phase))
    }

    /// Adds a combinational output (a primary output or latch data input).
    pub fn add_co(&mut self, driver: Lit) -> NodeId {
        let phase = self.eval_lit_phase(driver);
        let id = self.nodes.insert(AigNode::new(NodeKind::Co { driver }, phase));
        self.cos.push(id);
        id
    }

    fn eval_lit_phase(&self, lit: Lit) -> bool {
        self[lit.node()].phase ^ lit.is_complemented()
    }

    pub(crate) fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn cis(&self) -> &[NodeId] {
        &self.cis
    }

    pub(crate) fn cos(&self) -> &[NodeId] {
        &self.cos
    }

    /// Node ids in topological (index) order, skipping the constant.
    pub(crate) fn topo_order(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.ids().skip(1)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut AigNode {
        &mut self.nodes[id]
    }

    /// Whether `sweep` proved this node equivalent to another node (or to
    /// constant-0).
    pub fn proved(&self, id: NodeId) -> bool {
        self.nodes[id].proved
    }

    /// The representative node this one was proved equivalent to, once
    /// `sweep` has run. `None` if the node was never proved, or `sweep`
    /// hasn't run.
    pub fn repr(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].repr
    }
}

impl std::ops::Index<NodeId> for Aig {
    type Output = AigNode;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id]
    }
}

impl std::ops::IndexMut<NodeId> for Aig {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        &mut self.nodes[id]
    }
}
