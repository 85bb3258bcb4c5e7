//! Property tests for the determinism and multigraph guarantees

use archdot::prelude::*;
use proptest::prelude::*;

/// One construction step, picked by the fuzzer. Node and edge payloads are
/// drawn from small pools so labels repeat, which the model must tolerate.
#[derive(Debug, Clone)]
enum Op {
    Node(u8),
    Open(u8),
    Close,
    Connect(u8, u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..5).prop_map(Op::Node),
        (0u8..3).prop_map(Op::Open),
        Just(Op::Close),
        (any::<u8>(), any::<u8>()).prop_map(|(a, b)| Op::Connect(a, b)),
    ]
}

/// Interpret a fuzzed op sequence into a well-formed diagram: scopes close
/// in stack order, leftover scopes are closed at the end, and connects pick
/// endpoints among the nodes created so far.
fn build(ops: &[Op]) -> Diagram {
    let mut diagram = Diagram::new("property");
    let mut nodes: Vec<NodeId> = Vec::new();
    let mut open: Vec<ClusterHandle> = Vec::new();

    for op in ops {
        match op {
            Op::Node(tag) => {
                nodes.push(diagram.node(format!("node {}", tag), Category::Service));
            }
            Op::Open(tag) => {
                open.push(diagram.open_cluster(format!("group {}", tag)));
            }
            Op::Close => {
                if let Some(handle) = open.pop() {
                    diagram.close_cluster(handle).expect("stack-ordered close");
                }
            }
            Op::Connect(a, b) => {
                if !nodes.is_empty() {
                    let from = nodes[*a as usize % nodes.len()];
                    let to = nodes[*b as usize % nodes.len()];
                    diagram
                        .connect_labeled(from, to, format!("{}-{}", a, b))
                        .expect("endpoints exist");
                }
            }
        }
    }

    while let Some(handle) = open.pop() {
        diagram.close_cluster(handle).expect("stack-ordered close");
    }
    if diagram.node_count() == 0 {
        diagram.node("fallback", Category::Generic);
    }
    diagram
}

proptest! {
    #[test]
    fn export_twice_is_byte_identical(ops in prop::collection::vec(op_strategy(), 1..80)) {
        let diagram = build(&ops);
        let first = diagram.export().expect("balanced non-empty diagram exports");
        let second = diagram.export().expect("second export succeeds");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn node_ids_are_unique(ops in prop::collection::vec(op_strategy(), 1..80)) {
        let mut diagram = Diagram::new("ids");
        let mut seen = std::collections::HashSet::new();
        for op in &ops {
            if let Op::Node(tag) = op {
                let id = diagram.node(format!("node {}", tag), Category::Service);
                prop_assert!(seen.insert(id), "duplicate id {:?}", id);
            }
        }
    }

    #[test]
    fn every_edge_line_appears_once_per_connect(
        pairs in prop::collection::vec((0u8..4, 0u8..4), 1..20)
    ) {
        let mut diagram = Diagram::new("multigraph");
        let nodes: Vec<NodeId> = (0..4)
            .map(|i| diagram.node(format!("n{}", i), Category::Service))
            .collect();
        for (a, b) in &pairs {
            diagram
                .connect(nodes[*a as usize], nodes[*b as usize])
                .expect("endpoints exist");
        }

        let dot = diagram.export().expect("exports");
        let edge_lines = dot.lines().filter(|l| l.contains("->")).count();
        prop_assert_eq!(edge_lines, pairs.len());
    }
}
