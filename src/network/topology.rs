//! Static wiring of the eight-input odd-even merge network.
//!
//! Each row names where a node's two inputs come from and where its min and
//! max results go. Entry nodes read raw input slots handed out by the
//! coordinator; every other node reads one selected result from each of two
//! earlier nodes. Results addressed to the coordinator are terminal outputs,
//! picked up by the collection step in [`COLLECTION_ORDER`].
//!
//! ```text
//!  raw ─► 0 ─┬► 4 ─┬► 10 ─────────► coord / 14
//!  raw ─► 1 ─┤     └► 8 ─┬► 12 ─┬► 16 ─► coord
//!  raw ─► 2 ─┬► 6 ─┬► 9 ─┴► 11 ─┼► 14 ─► 16 / 17
//!  raw ─► 3 ─┘     └► ...       └► 15 ─► 17 / 18
//! ```

use crate::network::error::{TopologyError, TopologyResult};
use crate::network::id::Selector::{Max, Min};
use crate::network::id::{NodeId, Selector, Value};
use crate::network::node::compare_exchange;
use std::collections::VecDeque;

/// Number of values one run sorts.
pub const RAW_INPUTS: usize = 8;

/// Number of nodes that read raw input slots.
pub const ENTRY_NODES: usize = 4;

/// Number of compare-exchange nodes in the network.
pub const NETWORK_NODES: usize = 19;

/// Sources of the coordinator's final receives, in output order.
pub const COLLECTION_ORDER: [NodeId; RAW_INPUTS] = [
    NodeId(10),
    NodeId(16),
    NodeId(16),
    NodeId(17),
    NodeId(17),
    NodeId(18),
    NodeId(18),
    NodeId(13),
];

/// Where a node's two positional inputs come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSpec {
    /// Raw input slots, delivered by the coordinator in slot order.
    Raw([usize; 2]),
    /// One selected result from each of two earlier nodes.
    Wired([(NodeId, Selector); 2]),
}

impl InputSpec {
    /// The node each positional input is received from.
    pub fn sources(&self) -> [NodeId; 2] {
        match self {
            InputSpec::Raw(_) => [NodeId::COORDINATOR; 2],
            InputSpec::Wired([(a, _), (b, _)]) => [*a, *b],
        }
    }

    pub fn is_entry(&self) -> bool {
        matches!(self, InputSpec::Raw(_))
    }
}

/// Where a node sends its two results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSpec {
    pub min_to: NodeId,
    pub max_to: NodeId,
}

impl OutputSpec {
    pub fn target(&self, selector: Selector) -> NodeId {
        match selector {
            Selector::Min => self.min_to,
            Selector::Max => self.max_to,
        }
    }

    /// Outgoing edges in send order: min first, then max.
    pub fn edges(&self) -> [(Selector, NodeId); 2] {
        Selector::SEND_ORDER.map(|selector| (selector, self.target(selector)))
    }
}

/// One row of the wiring table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeSpec {
    pub id: NodeId,
    pub inputs: InputSpec,
    pub outputs: OutputSpec,
}

const fn raw(id: u32, a: usize, b: usize, min_to: u32, max_to: u32) -> NodeSpec {
    NodeSpec {
        id: NodeId(id),
        inputs: InputSpec::Raw([a, b]),
        outputs: OutputSpec {
            min_to: NodeId(min_to),
            max_to: NodeId(max_to),
        },
    }
}

const fn wired(
    id: u32,
    a: (u32, Selector),
    b: (u32, Selector),
    min_to: u32,
    max_to: u32,
) -> NodeSpec {
    NodeSpec {
        id: NodeId(id),
        inputs: InputSpec::Wired([(NodeId(a.0), a.1), (NodeId(b.0), b.1)]),
        outputs: OutputSpec {
            min_to: NodeId(min_to),
            max_to: NodeId(max_to),
        },
    }
}

/// Batcher's odd-even merge network for eight values.
const ODD_EVEN_MERGE_8: [NodeSpec; NETWORK_NODES] = [
    raw(0, 0, 4, 4, 5),
    raw(1, 1, 5, 4, 5),
    raw(2, 2, 6, 6, 7),
    raw(3, 3, 7, 6, 7),
    wired(4, (0, Min), (1, Min), 10, 8),
    wired(5, (0, Max), (1, Max), 8, 13),
    wired(6, (2, Min), (3, Min), 10, 9),
    wired(7, (2, Max), (3, Max), 9, 13),
    wired(8, (4, Max), (5, Min), 12, 11),
    wired(9, (6, Max), (7, Min), 12, 11),
    wired(10, (4, Min), (6, Min), 0, 14),
    wired(11, (8, Max), (9, Max), 14, 18),
    wired(12, (8, Min), (9, Min), 16, 15),
    wired(13, (5, Max), (7, Max), 15, 0),
    wired(14, (10, Max), (11, Min), 16, 17),
    wired(15, (12, Max), (13, Min), 17, 18),
    wired(16, (14, Min), (12, Min), 0, 0),
    wired(17, (14, Max), (15, Min), 0, 0),
    wired(18, (11, Max), (15, Max), 0, 0),
];

/// Immutable wiring table indexed by `NodeId`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    nodes: Vec<NodeSpec>,
    collection_order: Vec<NodeId>,
}

impl Topology {
    /// Build a topology from raw rows. Call [`Topology::validate`] before running it.
    pub fn new(nodes: Vec<NodeSpec>, collection_order: Vec<NodeId>) -> Self {
        Self {
            nodes,
            collection_order,
        }
    }

    /// The fixed 19-node network that sorts eight values.
    pub fn odd_even_merge_8() -> Self {
        Self::new(ODD_EVEN_MERGE_8.to_vec(), COLLECTION_ORDER.to_vec())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn spec(&self, id: NodeId) -> Option<&NodeSpec> {
        self.nodes.get(id.index())
    }

    pub fn nodes(&self) -> &[NodeSpec] {
        &self.nodes
    }

    pub fn collection_order(&self) -> &[NodeId] {
        &self.collection_order
    }

    /// Entry nodes in id order.
    pub fn entry_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .filter(|spec| spec.inputs.is_entry())
            .map(|spec| spec.id)
    }

    /// Number of raw values one run consumes.
    pub fn raw_input_count(&self) -> usize {
        self.entry_nodes().count() * 2
    }

    /// Entry node that receives raw slot `index`.
    pub fn entry_for_slot(&self, index: usize) -> NodeId {
        let entries = self.entry_nodes().count().max(1);
        NodeId((index % entries) as u32)
    }

    /// Check the table for closure and acyclicity.
    ///
    /// Returns the nodes in a topological order on success.
    pub fn validate(&self) -> TopologyResult<Vec<NodeId>> {
        let n = self.nodes.len();

        for (index, spec) in self.nodes.iter().enumerate() {
            if spec.id.index() != index {
                return Err(TopologyError::MisplacedNode {
                    index,
                    found: spec.id,
                });
            }
            for (selector, target) in spec.outputs.edges() {
                if target.index() >= n {
                    return Err(TopologyError::UnknownTarget {
                        node: spec.id,
                        selector,
                        target,
                    });
                }
            }
        }

        self.validate_entries()?;

        // Inputs must be matched by the source's own routing.
        for spec in &self.nodes {
            let InputSpec::Wired([(a, sel_a), (b, sel_b)]) = spec.inputs else {
                continue;
            };
            if a == b {
                return Err(TopologyError::SharedSource {
                    node: spec.id,
                    from: a,
                });
            }
            for (from, selector) in [(a, sel_a), (b, sel_b)] {
                let routed = self
                    .spec(from)
                    .map(|source| source.outputs.target(selector) == spec.id)
                    .unwrap_or(false);
                if !routed {
                    return Err(TopologyError::DanglingInput {
                        node: spec.id,
                        from,
                        selector,
                    });
                }
            }
        }

        // Every output is read by its target or by the collection step.
        let mut terminal = vec![0usize; n];
        for spec in &self.nodes {
            for (selector, target) in spec.outputs.edges() {
                if target.is_coordinator() {
                    terminal[spec.id.index()] += 1;
                    continue;
                }
                let consumed = match self.nodes[target.index()].inputs {
                    InputSpec::Wired(inputs) => inputs.contains(&(spec.id, selector)),
                    InputSpec::Raw(_) => false,
                };
                if !consumed {
                    return Err(TopologyError::UnconsumedOutput {
                        node: spec.id,
                        selector,
                        target,
                    });
                }
            }
        }

        let mut collected = vec![0usize; n];
        for &from in &self.collection_order {
            match collected.get_mut(from.index()) {
                Some(count) => *count += 1,
                None => {
                    return Err(TopologyError::CollectionMismatch {
                        node: from,
                        expected: 0,
                        actual: 1,
                    })
                }
            }
        }
        for (index, (&expected, &actual)) in terminal.iter().zip(&collected).enumerate() {
            if expected != actual {
                return Err(TopologyError::CollectionMismatch {
                    node: NodeId(index as u32),
                    expected,
                    actual,
                });
            }
        }

        self.topological_order()
    }

    /// Entry nodes lead the table and consume every raw slot once, slot `i`
    /// landing on entry `i mod entries` in increasing slot order.
    fn validate_entries(&self) -> TopologyResult<()> {
        let entries: Vec<NodeId> = self.entry_nodes().collect();
        for (position, id) in entries.iter().enumerate() {
            if id.index() != position {
                return Err(TopologyError::EntryOutOfPlace(*id));
            }
        }

        let raw_count = entries.len() * 2;
        let mut seen = vec![false; raw_count];
        for spec in &self.nodes {
            let InputSpec::Raw([first, second]) = spec.inputs else {
                continue;
            };
            for slot in [first, second] {
                let fits = slot < raw_count
                    && !seen[slot]
                    && self.entry_for_slot(slot) == spec.id;
                if !fits {
                    return Err(TopologyError::RawSlot { slot });
                }
                seen[slot] = true;
            }
            // Distribution sends slots in index order; positions must agree.
            if first > second {
                return Err(TopologyError::RawSlot { slot: second });
            }
        }
        Ok(())
    }

    // ── Topological sort (Kahn's algorithm) ──

    fn topological_order(&self) -> TopologyResult<Vec<NodeId>> {
        let n = self.nodes.len();
        let mut in_degree = vec![0u32; n];
        let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n];

        for spec in &self.nodes {
            if let InputSpec::Wired(inputs) = spec.inputs {
                for (from, _) in inputs {
                    adj[from.index()].push(spec.id.index());
                    in_degree[spec.id.index()] += 1;
                }
            }
        }

        let mut queue: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(n);

        while let Some(node) = queue.pop_front() {
            order.push(NodeId(node as u32));
            for &next in &adj[node] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    queue.push_back(next);
                }
            }
        }

        if order.len() != n {
            tracing::warn!(
                "Wiring graph has a cycle! Only {} of {} nodes ordered.",
                order.len(),
                n
            );
            return Err(TopologyError::CycleDetected);
        }

        Ok(order)
    }

    /// Run the network sequentially on one thread.
    ///
    /// Terminal outputs are queued per source in send order, which is the
    /// same order the coordinator's per-link receives observe.
    pub fn evaluate(&self, inputs: &[Value]) -> TopologyResult<Vec<Value>> {
        let order = self.validate()?;
        let expected = self.raw_input_count();
        if inputs.len() != expected {
            return Err(TopologyError::InputLength {
                expected,
                actual: inputs.len(),
            });
        }

        let n = self.nodes.len();
        let mut results: Vec<Option<(Value, Value)>> = vec![None; n];
        let mut terminal: Vec<VecDeque<Value>> = vec![VecDeque::new(); n];

        for id in order {
            let spec = &self.nodes[id.index()];
            let (a, b) = match spec.inputs {
                InputSpec::Raw([x, y]) => (inputs[x], inputs[y]),
                InputSpec::Wired([x, y]) => (pick(&results, x)?, pick(&results, y)?),
            };
            let (lo, hi) = compare_exchange(a, b);
            results[id.index()] = Some((lo, hi));

            for (selector, target) in spec.outputs.edges() {
                if target.is_coordinator() {
                    terminal[id.index()].push_back(match selector {
                        Selector::Min => lo,
                        Selector::Max => hi,
                    });
                }
            }
        }

        self.collection_order
            .iter()
            .map(|&from| {
                terminal[from.index()]
                    .pop_front()
                    .ok_or(TopologyError::CollectionMismatch {
                        node: from,
                        expected: 0,
                        actual: 1,
                    })
            })
            .collect()
    }
}

impl Default for Topology {
    fn default() -> Self {
        Self::odd_even_merge_8()
    }
}

fn pick(
    results: &[Option<(Value, Value)>],
    (from, selector): (NodeId, Selector),
) -> TopologyResult<Value> {
    let (lo, hi) = results[from.index()].ok_or(TopologyError::CycleDetected)?;
    Ok(match selector {
        Selector::Min => lo,
        Selector::Max => hi,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_shape() {
        let topo = Topology::odd_even_merge_8();
        assert_eq!(topo.len(), NETWORK_NODES);
        assert_eq!(topo.entry_nodes().count(), ENTRY_NODES);
        assert_eq!(topo.raw_input_count(), RAW_INPUTS);
        assert_eq!(topo.collection_order(), &COLLECTION_ORDER);
    }

    #[test]
    fn test_lookup_by_id() {
        let topo = Topology::odd_even_merge_8();
        let spec = topo.spec(NodeId(13)).unwrap();
        assert_eq!(
            spec.inputs,
            InputSpec::Wired([(NodeId(5), Max), (NodeId(7), Max)])
        );
        assert_eq!(spec.outputs.min_to, NodeId(15));
        assert_eq!(spec.outputs.max_to, NodeId::COORDINATOR);
        assert!(topo.spec(NodeId(19)).is_none());
    }

    #[test]
    fn test_entry_slots_follow_mod_four() {
        let topo = Topology::odd_even_merge_8();
        for slot in 0..RAW_INPUTS {
            let entry = topo.entry_for_slot(slot);
            match topo.spec(entry).unwrap().inputs {
                InputSpec::Raw(slots) => assert!(slots.contains(&slot)),
                other => panic!("{entry} is not an entry node: {other:?}"),
            }
        }
    }

    #[test]
    fn test_validate_yields_topological_order() {
        let topo = Topology::odd_even_merge_8();
        let order = topo.validate().unwrap();
        assert_eq!(order.len(), NETWORK_NODES);

        let mut position = vec![0usize; NETWORK_NODES];
        for (i, id) in order.iter().enumerate() {
            position[id.index()] = i;
        }
        for spec in topo.nodes() {
            for from in spec.inputs.sources() {
                if spec.inputs.is_entry() {
                    continue;
                }
                assert!(
                    position[from.index()] < position[spec.id.index()],
                    "{from} must run before {}",
                    spec.id
                );
            }
        }
    }

    #[test]
    fn test_every_wired_input_is_routed_by_its_source() {
        let topo = Topology::odd_even_merge_8();
        for spec in topo.nodes() {
            if let InputSpec::Wired(inputs) = spec.inputs {
                for (from, selector) in inputs {
                    let source = topo.spec(from).unwrap();
                    assert_eq!(source.outputs.target(selector), spec.id);
                }
            }
        }
    }

    #[test]
    fn test_dangling_input_rejected() {
        let mut nodes = ODD_EVEN_MERGE_8.to_vec();
        // Node 8 now claims 4:min, which node 4 sends to node 10.
        nodes[8].inputs = InputSpec::Wired([(NodeId(4), Min), (NodeId(5), Min)]);
        let topo = Topology::new(nodes, COLLECTION_ORDER.to_vec());
        assert!(matches!(
            topo.validate(),
            Err(TopologyError::DanglingInput { node: NodeId(8), .. })
        ));
    }

    #[test]
    fn test_unconsumed_output_rejected() {
        let mut nodes = ODD_EVEN_MERGE_8.to_vec();
        nodes[16].outputs.max_to = NodeId(17);
        let topo = Topology::new(nodes, COLLECTION_ORDER.to_vec());
        assert!(matches!(
            topo.validate(),
            Err(TopologyError::UnconsumedOutput { node: NodeId(16), .. })
        ));
    }

    #[test]
    fn test_collection_mismatch_rejected() {
        let mut order = COLLECTION_ORDER.to_vec();
        order[7] = NodeId(10);
        let topo = Topology::new(ODD_EVEN_MERGE_8.to_vec(), order);
        assert!(matches!(
            topo.validate(),
            Err(TopologyError::CollectionMismatch { .. })
        ));
    }

    #[test]
    fn test_cycle_rejected() {
        // Two nodes feeding each other.
        let nodes = vec![
            raw(0, 0, 1, 1, 2),
            wired(1, (0, Min), (2, Min), 2, 0),
            wired(2, (0, Max), (1, Min), 1, 0),
        ];
        let topo = Topology::new(nodes, vec![NodeId(1), NodeId(2)]);
        assert_eq!(topo.validate(), Err(TopologyError::CycleDetected));
    }

    #[test]
    fn test_raw_slot_order_enforced() {
        let mut nodes = ODD_EVEN_MERGE_8.to_vec();
        nodes[2].inputs = InputSpec::Raw([6, 2]);
        let topo = Topology::new(nodes, COLLECTION_ORDER.to_vec());
        assert!(matches!(topo.validate(), Err(TopologyError::RawSlot { .. })));
    }

    #[test]
    fn test_evaluate_scenarios() {
        let topo = Topology::odd_even_merge_8();
        assert_eq!(
            topo.evaluate(&[5, 3, 8, 1, 9, 2, 7, 4]).unwrap(),
            vec![1, 2, 3, 4, 5, 7, 8, 9]
        );
        assert_eq!(topo.evaluate(&[0; 8]).unwrap(), vec![0; 8]);
        assert_eq!(
            topo.evaluate(&[9, 8, 7, 6, 5, 4, 3, 2]).unwrap(),
            vec![2, 3, 4, 5, 6, 7, 8, 9]
        );
        assert_eq!(
            topo.evaluate(&[5, 5, 1, 1, 9, 9, 0, 0]).unwrap(),
            vec![0, 0, 1, 1, 5, 5, 9, 9]
        );
    }

    #[test]
    fn test_evaluate_rejects_wrong_length() {
        let topo = Topology::odd_even_merge_8();
        assert_eq!(
            topo.evaluate(&[1, 2, 3]),
            Err(TopologyError::InputLength {
                expected: 8,
                actual: 3
            })
        );
    }

    #[test]
    fn test_zero_one_principle() {
        // A comparator network sorts everything iff it sorts every 0/1 input.
        let topo = Topology::odd_even_merge_8();
        for bits in 0u32..256 {
            let input: Vec<Value> = (0..8).map(|i| ((bits >> i) & 1) as Value).collect();
            let output = topo.evaluate(&input).unwrap();
            assert!(output.windows(2).all(|w| w[0] <= w[1]), "{input:?} -> {output:?}");
            assert_eq!(
                output.iter().sum::<Value>(),
                input.iter().sum::<Value>()
            );
        }
    }
}
