use criterion::{black_box, criterion_group, criterion_main, Criterion};
use strata_graph::{
    barabasi_albert, erdos_renyi, watts_strogatz, Directionality, EdgeType, Network, Nodeset,
    RngHandle,
};

fn network(n: usize) -> Network {
    let mut net = Network::new("bench", Nodeset::with_nodes("nodes", n).unwrap());
    net.add_layer_one_mode("l", Directionality::Undirected, EdgeType::Binary, false)
        .unwrap();
    net
}

fn generators_bench(c: &mut Criterion) {
    let mut sparse = network(20_000);
    c.bench_function("erdos_renyi_sparse_20k", |b| {
        let mut rng = RngHandle::from_seed(7);
        b.iter(|| black_box(erdos_renyi(&mut sparse, "l", 0.0005, &mut rng).unwrap()));
    });

    let mut attachment = network(5_000);
    c.bench_function("barabasi_albert_5k_m3", |b| {
        let mut rng = RngHandle::from_seed(7);
        b.iter(|| black_box(barabasi_albert(&mut attachment, "l", 3, &mut rng).unwrap()));
    });

    let mut ring = network(5_000);
    c.bench_function("watts_strogatz_5k_k6", |b| {
        let mut rng = RngHandle::from_seed(7);
        b.iter(|| black_box(watts_strogatz(&mut ring, "l", 6, 0.1, &mut rng).unwrap()));
    });
}

criterion_group!(benches, generators_bench);
criterion_main!(benches);
