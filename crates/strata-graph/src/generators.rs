//! Random structure generators.
//!
//! Every generator validates the target layer and its parameters first, then
//! clears the layer and populates it. A failed precondition leaves the
//! network untouched.

use std::collections::BTreeSet;

use rand::seq::index;
use rand::Rng;
use strata_core::errors::{codes, StrataError};
use strata_core::{EdgeTraversal, NodeId, RngHandle};
use tracing::{info, warn};

use crate::errors::{constraint, invalid_argument, shape};
use crate::layer::{possible_edges, Directionality, EdgeType, Layer};
use crate::network::Network;
use crate::one_mode::LayerOneMode;

/// Populates a one-mode layer with a G(n, p) random graph.
///
/// Candidate slots are enumerated as one linear index and visited with
/// geometric skips, so the work is proportional to the number of edges drawn.
/// Edges carry the value 1. Returns the number of edges created.
pub fn erdos_renyi(
    network: &mut Network,
    layer: &str,
    p: f64,
    rng: &mut RngHandle,
) -> Result<usize, StrataError> {
    if !(0.0..=1.0).contains(&p) {
        return Err(invalid_argument("probability out of range")
            .with_context("p", p)
            .with_hint("probability must lie in [0, 1]"));
    }
    let (nodeset, target) = network.parts_mut(layer)?;
    let target = target.as_one_mode_mut()?;
    let nodes = nodeset.node_ids();
    let directionality = target.directionality();
    let selfties = target.selfties();
    let total = possible_edges(nodes.len(), directionality, selfties);
    target.clear();

    if p > 0.0 && total > 0 {
        // ln(1 - p) without cancellation for tiny p.
        let log_q = (-p).ln_1p();
        let mut slots = SlotIndex::new(nodes.len(), directionality, selfties);
        let mut k: u64 = 0;
        loop {
            if p < 1.0 {
                let r: f64 = rng.gen();
                k = k.saturating_add(((-r).ln_1p() / log_q).floor() as u64);
            }
            if k >= total {
                break;
            }
            let (row, col) = slots.locate(k);
            target.insert_edge(nodes[row], nodes[col], 1.0);
            k += 1;
        }
    }
    let edges = target.edge_count();
    info!(layer, nodes = nodes.len(), p, edges, "erdos-renyi layer generated");
    Ok(edges)
}

/// Maps a linear slot index onto `(row, col)` positions.
///
/// Lookups must be issued with non-decreasing indices; the row cursor only
/// moves forward.
struct SlotIndex {
    n: usize,
    directionality: Directionality,
    selfties: bool,
    row: usize,
    row_start: u64,
}

impl SlotIndex {
    fn new(n: usize, directionality: Directionality, selfties: bool) -> Self {
        Self {
            n,
            directionality,
            selfties,
            row: 0,
            row_start: 0,
        }
    }

    fn row_len(&self, row: usize) -> u64 {
        let len = match (self.directionality, self.selfties) {
            (Directionality::Directed, false) => self.n - 1,
            (Directionality::Directed, true) => self.n,
            (Directionality::Undirected, false) => self.n - 1 - row,
            (Directionality::Undirected, true) => self.n - row,
        };
        len as u64
    }

    fn locate(&mut self, k: u64) -> (usize, usize) {
        while k >= self.row_start + self.row_len(self.row) {
            self.row_start += self.row_len(self.row);
            self.row += 1;
        }
        let c = (k - self.row_start) as usize;
        let col = match (self.directionality, self.selfties) {
            (Directionality::Directed, false) if c >= self.row => c + 1,
            (Directionality::Directed, _) => c,
            (Directionality::Undirected, false) => self.row + 1 + c,
            (Directionality::Undirected, true) => self.row + c,
        };
        (self.row, col)
    }
}

/// Populates a layer by preferential attachment.
///
/// The first `m + 1` nodes form a clique; every later node attaches to `m`
/// distinct earlier nodes drawn from the multiset of edge endpoints. Produces
/// exactly `m(m+1)/2 + m(n-m-1)` edges.
pub fn barabasi_albert(
    network: &mut Network,
    layer: &str,
    m: usize,
    rng: &mut RngHandle,
) -> Result<usize, StrataError> {
    let (nodeset, target) = network.parts_mut(layer)?;
    let target = simple_undirected(target)?;
    let nodes = nodeset.node_ids();
    if m == 0 {
        return Err(invalid_argument("m must be at least 1").with_context("m", m));
    }
    if nodes.len() < m + 1 {
        return Err(invalid_argument("m must be smaller than the node count")
            .with_context("m", m)
            .with_context("nodes", nodes.len()));
    }
    target.clear();

    let mut endpoints: Vec<NodeId> = Vec::with_capacity(2 * m * nodes.len());
    for (i, a) in nodes[..=m].iter().enumerate() {
        for b in &nodes[i + 1..=m] {
            target.insert_edge(*a, *b, 1.0);
            endpoints.push(*a);
            endpoints.push(*b);
        }
    }
    for node in &nodes[m + 1..] {
        let mut chosen = BTreeSet::new();
        while chosen.len() < m {
            chosen.insert(endpoints[rng.gen_range(0..endpoints.len())]);
        }
        for other in chosen {
            target.insert_edge(*node, other, 1.0);
            endpoints.push(*node);
            endpoints.push(other);
        }
    }
    let edges = target.edge_count();
    info!(layer, nodes = nodes.len(), m, edges, "barabasi-albert layer generated");
    Ok(edges)
}

/// Populates a layer with a Watts–Strogatz small world.
///
/// Builds a ring where each node links to its `k / 2` forward neighbours,
/// then rewires every lattice edge with probability `beta` to a uniformly
/// drawn node that is neither the source nor already adjacent to it. The
/// edge count `n * k / 2` is preserved.
pub fn watts_strogatz(
    network: &mut Network,
    layer: &str,
    k: usize,
    beta: f64,
    rng: &mut RngHandle,
) -> Result<usize, StrataError> {
    let (nodeset, target) = network.parts_mut(layer)?;
    let target = simple_undirected(target)?;
    let nodes = nodeset.node_ids();
    let n = nodes.len();
    if k < 2 || k % 2 != 0 {
        return Err(invalid_argument("k must be an even number of at least 2").with_context("k", k));
    }
    if k >= n {
        return Err(invalid_argument("k must be smaller than the node count")
            .with_context("k", k)
            .with_context("nodes", n));
    }
    if !(0.0..=1.0).contains(&beta) {
        return Err(invalid_argument("beta out of range")
            .with_context("beta", beta)
            .with_hint("rewiring probability must lie in [0, 1]"));
    }
    target.clear();

    let half = k / 2;
    for i in 0..n {
        for step in 1..=half {
            target.insert_edge(nodes[i], nodes[(i + step) % n], 1.0);
        }
    }
    let mut saturated = 0usize;
    for i in 0..n {
        let source = nodes[i];
        for step in 1..=half {
            if rng.gen::<f64>() >= beta {
                continue;
            }
            let old = nodes[(i + step) % n];
            if !target.has_edge(source, old) {
                continue;
            }
            if target.degree(source, EdgeTraversal::Both) >= n - 1 {
                saturated += 1;
                continue;
            }
            let fresh = loop {
                let candidate = nodes[rng.gen_range(0..n)];
                if candidate != source && !target.has_edge(source, candidate) {
                    break candidate;
                }
            };
            target.remove_edge(source, old)?;
            target.insert_edge(source, fresh, 1.0);
        }
    }
    if saturated > 0 {
        warn!(layer, saturated, "rewiring skipped for nodes adjacent to every other node");
    }
    let edges = target.edge_count();
    info!(layer, nodes = n, k, beta, edges, "watts-strogatz layer generated");
    Ok(edges)
}

/// Populates a two-mode layer with `hyperedges` hyperedges named
/// `{prefix}{i}` and random affiliations.
///
/// Each node's affiliation count is drawn from a Poisson distribution with
/// mean `average`, capped at `hyperedges`; the hyperedges themselves are then
/// drawn without replacement. Returns the number of affiliations created.
pub fn random_two_mode(
    network: &mut Network,
    layer: &str,
    hyperedges: usize,
    average: f64,
    prefix: &str,
    rng: &mut RngHandle,
) -> Result<usize, StrataError> {
    let (nodeset, target) = network.parts_mut(layer)?;
    let target = target.as_two_mode_mut()?;
    if hyperedges == 0 {
        return Err(invalid_argument("at least one hyperedge is required"));
    }
    if !(1.0..=hyperedges as f64).contains(&average) {
        return Err(invalid_argument("average affiliation count out of range")
            .with_context("average", average)
            .with_context("hyperedges", hyperedges));
    }
    let nodes = nodeset.node_ids();
    let names: Vec<String> = (0..hyperedges).map(|i| format!("{prefix}{i}")).collect();
    let cdf = capped_poisson_cdf(average, hyperedges);
    target.clear();

    for name in &names {
        target.insert_hyperedge(name, &[]);
    }
    let mut affiliations = 0usize;
    for node in &nodes {
        let draw: f64 = rng.gen();
        let count = cdf.iter().position(|bound| draw < *bound).unwrap_or(hyperedges);
        for picked in index::sample(rng, hyperedges, count) {
            if target.insert_affiliation(*node, &names[picked]) {
                affiliations += 1;
            }
        }
    }
    info!(
        layer,
        nodes = nodes.len(),
        hyperedges,
        average,
        affiliations,
        "two-mode layer generated"
    );
    Ok(affiliations)
}

/// Cumulative Poisson(lambda) over `0..=cap`, with the tail mass folded into `cap`.
fn capped_poisson_cdf(lambda: f64, cap: usize) -> Vec<f64> {
    // Masses are tracked in log space; exp(-lambda) alone underflows for large lambda.
    let mut cdf = Vec::with_capacity(cap + 1);
    let log_lambda = lambda.ln();
    let mut log_mass = -lambda;
    let mut running = 0.0;
    for k in 0..cap {
        running += log_mass.exp();
        cdf.push(running);
        log_mass += log_lambda - ((k + 1) as f64).ln();
    }
    cdf.push(1.0);
    cdf
}

/// Checks the shape required by the lattice and attachment models.
fn simple_undirected(layer: &mut Layer) -> Result<&mut LayerOneMode, StrataError> {
    let target = layer.as_one_mode_mut()?;
    if target.edge_type() != EdgeType::Binary {
        return Err(shape(codes::INVALID_LAYER_VALUE_TYPE, "generator requires a binary layer")
            .with_context("layer", target.name()));
    }
    if target.directionality().is_directed() {
        return Err(shape(
            codes::INVALID_LAYER_EDGE_DIRECTION,
            "generator requires an undirected layer",
        )
        .with_context("layer", target.name()));
    }
    if target.selfties() {
        return Err(constraint(
            codes::CONSTRAINT_LAYER_SELFTIES,
            "generator requires a layer without self-ties",
        )
        .with_context("layer", target.name()));
    }
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_index_covers_every_directed_slot_once() {
        let mut slots = SlotIndex::new(4, Directionality::Directed, false);
        let cells: Vec<_> = (0..12).map(|k| slots.locate(k)).collect();
        assert_eq!(cells[0], (0, 1));
        assert_eq!(cells[2], (0, 3));
        assert_eq!(cells[3], (1, 0));
        assert_eq!(cells[4], (1, 2));
        assert_eq!(cells[11], (3, 2));
        assert!(cells.iter().all(|(r, c)| r != c));
    }

    #[test]
    fn slot_index_walks_upper_triangle() {
        let mut slots = SlotIndex::new(4, Directionality::Undirected, true);
        let cells: Vec<_> = (0..10).map(|k| slots.locate(k)).collect();
        assert_eq!(cells[0], (0, 0));
        assert_eq!(cells[3], (0, 3));
        assert_eq!(cells[4], (1, 1));
        assert_eq!(cells[9], (3, 3));
    }

    #[test]
    fn capped_cdf_ends_at_one() {
        let cdf = capped_poisson_cdf(2.0, 4);
        assert_eq!(cdf.len(), 5);
        assert!(cdf.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(cdf[4], 1.0);
        assert!((cdf[0] - (-2.0_f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn capped_cdf_survives_large_lambda() {
        let cdf = capped_poisson_cdf(800.0, 1000);
        assert!(cdf[700] < 0.01);
        assert!((cdf[800] - 0.5).abs() < 0.05);
        assert!(cdf[900] > 0.99);
    }
}
