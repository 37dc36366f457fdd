use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use dotlock_core::{AllocationState, Edge, EngineConfig, Node, SafetyEngine, WaitForGraphAnalyzer};

/// Staircase state: process i can only finish after every process above it,
/// so each sweep completes exactly one process
fn staircase_state(processes: usize, resources: usize) -> AllocationState {
    let allocation = vec![vec![1u32; resources]; processes];
    let max = (0..processes).map(|i| vec![1 + (processes - i) as u32; resources]).collect();
    let available = vec![1u32; resources];
    AllocationState::new(allocation, max, available).unwrap()
}

/// Ring of processes each waiting on the next one's resource
fn ring_graph(processes: usize) -> (Vec<Node>, Vec<Edge>) {
    let mut nodes = Vec::with_capacity(processes * 2);
    let mut edges = Vec::with_capacity(processes * 2);
    for i in 0..processes {
        nodes.push(Node::process(format!("P{i}")));
        nodes.push(Node::resource(format!("R{i}")));
        edges.push(Edge::assignment(format!("R{i}"), format!("P{i}")));
        edges.push(Edge::request(format!("P{i}"), format!("R{}", (i + 1) % processes)));
    }
    (nodes, edges)
}

fn benchmark_safety_check(c: &mut Criterion) {
    let engine = SafetyEngine::default();
    let mut group = c.benchmark_group("safety_check");
    for processes in [10, 50, 200] {
        let state = staircase_state(processes, 8);
        group.bench_with_input(BenchmarkId::from_parameter(processes), &state, |b, state| {
            b.iter(|| engine.check_state(black_box(state)).unwrap());
        });
    }
    group.finish();
}

fn benchmark_cycle_detection(c: &mut Criterion) {
    let analyzer = WaitForGraphAnalyzer::new(EngineConfig::new().with_max_resource_types(4096));
    let mut group = c.benchmark_group("cycle_detection");
    for processes in [10, 100, 1000] {
        let (nodes, edges) = ring_graph(processes);
        group.bench_with_input(BenchmarkId::from_parameter(processes), &(nodes, edges), |b, (nodes, edges)| {
            b.iter(|| {
                let wait_for = analyzer.build_wait_for_graph(black_box(nodes), black_box(edges)).unwrap();
                analyzer.detect_cycle(wait_for.adjacency(), wait_for.processes()).unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(engine_benches, benchmark_safety_check, benchmark_cycle_detection);
criterion_main!(engine_benches);
