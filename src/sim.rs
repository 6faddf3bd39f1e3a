//! C1: BitPackSim — parallel 64-bit-word simulation of AIG nodes.

use rand::RngCore;

use crate::ir::aig::{Aig, Lit, NodeId, NodeKind};

/// Word-packed simulation state for every node of an [`Aig`]. Column 0 of
/// word 0 is reserved for the all-zero CI pattern; its bit always mirrors
/// the node's precomputed `phase`.
#[derive(Debug)]
pub(crate) struct BitPackSim {
    words_per_node: u32,
    // Flat storage: node i's words live at [i * words_per_node, (i+1) * words_per_node).
    words: Vec<u64>,
    /// Next free simulation column to be overwritten by a SAT-derived
    /// counter-example pattern. Always in `[1, 64 * words_per_node)`.
    next_pattern_col: usize,
}

impl BitPackSim {
    pub(crate) fn new(num_nodes: usize, words_per_node: u32) -> Self {
        Self {
            words_per_node,
            words: vec![0u64; num_nodes * words_per_node as usize],
            next_pattern_col: 1,
        }
    }

    fn word(&self, node: NodeId, w: u32) -> u64 {
        self.words[node.to_usize() * self.words_per_node as usize + w as usize]
    }

    fn set_word(&mut self, node: NodeId, w: u32, value: u64) {
        self.words[node.to_usize() * self.words_per_node as usize + w as usize] = value;
    }

    fn eval_lit_word(&self, lit: Lit, w: u32) -> u64 {
        let word = self.word(lit.node(), w);
        if lit.is_complemented() { !word } else { word }
    }

    /// Assigns fresh random words to every CI, preserving the reserved
    /// all-zero bit at column 0.
    pub(crate) fn randomize_cis(&mut self, aig: &Aig, rng: &mut impl RngCore) {
        for &ci in aig.cis() {
            for w in 0..self.words_per_node {
                let mut word = rng.next_u64();
                if w == 0 {
                    word &= !1u64;
                }
                self.set_word(ci, w, word);
            }
        }
    }

    /// Propagates simulation words through every AND node in topological order.
    pub(crate) fn propagate_ands(&mut self, aig: &Aig) {
        for node in aig.topo_order() {
            if let NodeKind::And { fanin0, fanin1 } = aig[node].kind {
                for w in 0..self.words_per_node {
                    let value = self.eval_lit_word(fanin0, w) & self.eval_lit_word(fanin1, w);
                    self.set_word(node, w, value);
                }
            }
        }
    }

    /// Evaluates every Co (primary output) node from its driver's simulation.
    pub(crate) fn eval_cos(&mut self, aig: &Aig) {
        for node in aig.topo_order() {
            if let NodeKind::Co { driver } = aig[node].kind {
                for w in 0..self.words_per_node {
                    let value = self.eval_lit_word(driver, w);
                    self.set_word(node, w, value);
                }
            }
        }
    }

    /// True iff the simulation vectors of `i` and `j` are equal or exactly
    /// bitwise-complementary, with the expected polarity picked from the
    /// two nodes' phases.
    pub(crate) fn equal(&self, aig: &Aig, i: NodeId, j: NodeId) -> bool {
        let complement = aig[i].phase != aig[j].phase;
        (0..self.words_per_node).all(|w| {
            let a = self.word(i, w);
            let b = self.word(j, w);
            a == if complement { !b } else { b }
        })
    }

    /// The first column (lowest index) at which `node`'s simulation bit is 1,
    /// or `None` if the node simulates to all-zero.
    pub(crate) fn first_one_bit(&self, node: NodeId) -> Option<usize> {
        for w in 0..self.words_per_node {
            let word = self.word(node, w);
            if word != 0 {
                let bit = word.trailing_zeros();
                return Some(w as usize * 64 + bit as usize);
            }
        }
        None
    }

    pub(crate) fn bit_at(&self, node: NodeId, col: usize) -> bool {
        let w = (col / 64) as u32;
        let bit = col % 64;
        (self.word(node, w) >> bit) & 1 == 1
    }

    /// Writes a single simulation bit, used to fold a SAT counter-example
    /// pattern back into the simulator.
    pub(crate) fn set_input_bit(&mut self, node: NodeId, col: usize, value: bool) {
        let w = (col / 64) as u32;
        let bit = col % 64;
        let mut word = self.word(node, w);
        if value {
            word |= 1 << bit;
        } else {
            word &= !(1 << bit);
        }
        self.set_word(node, w, word);
    }

    /// Folds this node's simulation words (canonicalized by `invert`, so
    /// that a node and its complement hash to the same bucket) into a
    /// single signature, mixed with the given odd primes. Used by the
    /// classifier to bucket candidate-equivalent nodes before the exact
    /// `equal` check confirms or refutes each bucket.
    pub(crate) fn signature(&self, invert: bool, node: NodeId, primes: &[u64; 16]) -> u64 {
        let mut acc: u64 = 0;
        for w in 0..self.words_per_node {
            let mut word = self.word(node, w);
            if invert {
                word = !word;
            }
            let prime = primes[w as usize % primes.len()];
            acc = acc.wrapping_add(word.wrapping_mul(prime));
            acc = acc.rotate_left(13) ^ word;
        }
        acc
    }

    /// Returns the next free pattern column and advances the counter,
    /// wrapping within `[1, 64 * words_per_node)`.
    pub(crate) fn alloc_pattern_column(&mut self) -> usize {
        let col = self.next_pattern_col;
        let limit = 64 * self.words_per_node as usize;
        self.next_pattern_col = if self.next_pattern_col + 1 >= limit { 1 } else { self.next_pattern_col + 1 };
        col
    }
}
