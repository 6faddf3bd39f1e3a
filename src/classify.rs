//! C3: Classifier — initial signature-based classing and per-round refinement.

use fxhash::FxHashMap;

use crate::classes::ClassStore;
use crate::ir::aig::{Aig, NodeId, NodeKind};
use crate::sim::BitPackSim;

/// 16 fixed odd primes used to mix simulation words into a bucketing
/// signature. Their exact values don't matter for correctness (every
/// bucket is confirmed or split by an exact `BitPackSim::equal` check);
/// they only need to be odd and spread across the word range.
const SIGNATURE_PRIMES: [u64; 16] = [
    0x9e3779b97f4a7c15,
    0xbf58476d1ce4e5b9,
    0x94d049bb133111eb,
    0xff51afd7ed558ccd,
    0xc4ceb9fe1a85ec53,
    0x2545f4914f6cdd1d,
    0x27d4eb2f165667c5,
    0x85ebca6b,
    0xc2b2ae35,
    0x165667b1,
    0xd3a2646c,
    0xfd7046c5,
    0xb55a4f09,
    0x9e3779b1,
    0x1000193,
    0x811c9dc5,
];

pub(crate) struct Classifier;

impl Classifier {
    /// Builds the initial classes from one round of simulation. Runs
    /// exactly once, right after the first `PropagateAnds`.
    pub(crate) fn build_initial(store: &mut ClassStore, sim: &BitPackSim, aig: &Aig) {
        let mut tails: FxHashMap<NodeId, NodeId> = FxHashMap::default();
        let mut buckets: FxHashMap<u64, NodeId> = FxHashMap::default();

        // Const0 (node 0) is skipped by `topo_order`, but it must still seed
        // the all-zero signature bucket: any node that simulates to all-zero
        // words is a constant-0 candidate and belongs in Const0's class,
        // which `ClassStore::with_const0_head` has already registered as a
        // permanent head.
        let const0 = Aig::const0_id();
        let const0_sig = sim.signature(aig[const0].phase, const0, &SIGNATURE_PRIMES);
        buckets.insert(const0_sig, const0);
        tails.insert(const0, const0);

        for node in aig.topo_order() {
            if matches!(aig[node].kind, NodeKind::Co { .. }) {
                continue;
            }
            let invert = aig[node].phase;
            let sig = sim.signature(invert, node, &SIGNATURE_PRIMES);

            match buckets.get(&sig) {
                None => {
                    buckets.insert(sig, node);
                    store.set_repr(node, None);
                    store.add_head(node);
                    tails.insert(node, node);
                }
                Some(&head) => {
                    let tail = tails[&head];
                    store.set_next(tail, Some(node));
                    store.set_repr(node, Some(head));
                    tails.insert(head, node);
                }
            }
        }

        for head in store.heads().to_vec() {
            refine_one(store, sim, aig, head);
        }
    }

    /// Re-checks every existing class head against current simulation,
    /// splitting off any members that are no longer candidate-equivalent.
    pub(crate) fn refine_all(store: &mut ClassStore, sim: &BitPackSim, aig: &Aig) {
        for head in store.heads().to_vec() {
            refine_one(store, sim, aig, head);
        }
    }
}

/// Splits `head`'s class into "still equal to head" and "now different",
/// the latter becoming a fresh class headed by its first (lowest-index)
/// disequal member, then recursively refines that new head.
fn refine_one(store: &mut ClassStore, sim: &BitPackSim, aig: &Aig, head: NodeId) {
    let mut keep_last = head;
    let mut new_head: Option<NodeId> = None;
    let mut new_last: Option<NodeId> = None;

    let mut cur = store.get_next(head);
    while let Some(node) = cur {
        let next = store.get_next(node);
        if sim.equal(aig, head, node) {
            store.set_next(keep_last, Some(node));
            keep_last = node;
        } else {
            match new_head {
                None => {
                    store.set_repr(node, None);
                    store.add_head(node);
                    new_head = Some(node);
                    new_last = Some(node);
                }
                Some(nh) => {
                    store.set_repr(node, Some(nh));
                    store.set_next(new_last.unwrap(), Some(node));
                    new_last = Some(node);
                }
            }
        }
        cur = next;
    }
    store.set_next(keep_last, None);
    if let Some(last) = new_last {
        store.set_next(last, None);
    }

    if let Some(nh) = new_head {
        refine_one(store, sim, aig, nh);
    }
}
