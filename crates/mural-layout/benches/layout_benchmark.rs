use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mural_core::{HStackNode, Node, NodeId, NodeKind, Screen, TextNode, VStackNode};
use mural_layout::{compute_layout, LayoutOptions};

/// Alternating horizontal/vertical stacks with text leaves, the shape
/// that drives the iterative distribution passes hardest.
fn nested_screen(depth: u32, fanout: u64) -> Screen {
    let mut nodes = Vec::new();
    let mut next_id = 1u64;
    let root = build_level(&mut nodes, &mut next_id, depth, fanout);
    Screen::new(root, nodes)
}

fn build_level(nodes: &mut Vec<Node>, next_id: &mut u64, depth: u32, fanout: u64) -> NodeId {
    let id = NodeId(*next_id);
    *next_id += 1;

    if depth == 0 {
        nodes.push(Node::new(
            id,
            NodeKind::Text(TextNode::new("lorem ipsum dolor sit amet")),
        ));
        return id;
    }

    let children: Vec<NodeId> = (0..fanout)
        .map(|_| build_level(nodes, next_id, depth - 1, fanout))
        .collect();
    let kind = if depth % 2 == 0 {
        NodeKind::VStack(VStackNode::default())
    } else {
        NodeKind::HStack(HStackNode::default())
    };
    nodes.push(Node::new(id, kind).with_children(children));
    id
}

fn bench_layout(c: &mut Criterion) {
    let screen = nested_screen(5, 3);
    let options = LayoutOptions::default();

    c.bench_function("layout_nested_stacks", |b| {
        b.iter(|| compute_layout(black_box(&screen), &options).unwrap());
    });
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);
