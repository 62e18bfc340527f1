// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This example packs a fixed number of equal-radius circles into the unit
//! square without overlap, as a client of `factorsolve`. Each circle
//! contributes two continuous variables (its center's `x` and `y`); two
//! factor families keep it legal:
//!
//! - an *in-range* factor per coordinate, clamping it back into
//!   `[radius, 1 - radius]`;
//! - a pairwise *intersection* factor per pair of circles, which -- when
//!   the two centers are closer than `2 * radius` -- pushes them apart
//!   along the line connecting them until they just touch.
//!
//! The RNG used to seed the initial layout is a tiny deterministic
//! xorshift generator defined in this file; `factorsolve` itself has no
//! opinion on where initial variable values come from.

use factorsolve::{Algorithm, GraphConfigBuilder, MessageWeight, ObjectiveGraph, VariableId, WeightedValue};

const NUM_CIRCLES: usize = 100;
const RADIUS: f64 = 0.0504;

/// A minimal deterministic PRNG (xorshift64*) so this demo reproduces the
/// same initial layout across runs without pulling in a `rand` dependency
/// for what is, in the end, just a handful of `f64`s.
struct SeededRng(u64);

impl SeededRng {
    fn new(seed: u64) -> Self {
        SeededRng(seed ^ 0x9E3779B97F4A7C15)
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.0 = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// A uniform `f64` in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, low: f64, high: f64) -> f64 {
        low + self.next_f64() * (high - low)
    }
}

/// Clamps a single coordinate back into `[radius, 1 - radius]`.
fn in_range_minimizer(buffer: &mut [WeightedValue]) {
    let clamped = buffer[0].value.clamp(RADIUS, 1.0 - RADIUS);
    buffer[0] = WeightedValue::new(clamped, MessageWeight::Std);
}

/// Given `(x_i, y_i, x_j, y_j)` in that order, pushes the two points apart
/// along the line connecting them until they are exactly `2 * radius`
/// apart, splitting the correction evenly. Leaves already-legal pairs
/// untouched (the identity map costs nothing to converge on).
fn intersection_minimizer(buffer: &mut [WeightedValue]) {
    let (xi, yi, xj, yj) = (buffer[0].value, buffer[1].value, buffer[2].value, buffer[3].value);
    let dx = xj - xi;
    let dy = yj - yi;
    let dist = (dx * dx + dy * dy).sqrt();
    let min_dist = 2.0 * RADIUS;

    if dist >= min_dist {
        for slot in buffer.iter_mut() {
            slot.weight = MessageWeight::Std;
        }
        return;
    }

    let (ux, uy) = if dist > 1e-9 {
        (dx / dist, dy / dist)
    } else {
        (1.0, 0.0)
    };
    let correction = (min_dist - dist) / 2.0;

    buffer[0] = WeightedValue::new(xi - correction * ux, MessageWeight::Std);
    buffer[1] = WeightedValue::new(yi - correction * uy, MessageWeight::Std);
    buffer[2] = WeightedValue::new(xj + correction * ux, MessageWeight::Std);
    buffer[3] = WeightedValue::new(yj + correction * uy, MessageWeight::Std);
}

struct Layout {
    x: Vec<VariableId>,
    y: Vec<VariableId>,
}

fn build_graph(algorithm: Algorithm, learning_rate: f64, delta: f64, seed: u64) -> (ObjectiveGraph, Layout) {
    let config = GraphConfigBuilder::default()
        .algorithm(algorithm)
        .learning_rate(learning_rate)
        .convergence_delta(delta)
        .build()
        .unwrap();
    let mut graph = ObjectiveGraph::new(config);
    let mut rng = SeededRng::new(seed);

    let mut x = Vec::with_capacity(NUM_CIRCLES);
    let mut y = Vec::with_capacity(NUM_CIRCLES);
    for _ in 0..NUM_CIRCLES {
        x.push(graph.create_variable(rng.range(RADIUS, 1.0 - RADIUS), MessageWeight::Zero));
        y.push(graph.create_variable(rng.range(RADIUS, 1.0 - RADIUS), MessageWeight::Zero));
    }

    for i in 0..NUM_CIRCLES {
        let ex = graph.create_edge(x[i]).unwrap();
        graph.create_factor(&[ex], in_range_minimizer).unwrap();
        let ey = graph.create_edge(y[i]).unwrap();
        graph.create_factor(&[ey], in_range_minimizer).unwrap();
    }

    for i in 0..NUM_CIRCLES {
        for j in (i + 1)..NUM_CIRCLES {
            let edges = [
                graph.create_edge(x[i]).unwrap(),
                graph.create_edge(y[i]).unwrap(),
                graph.create_edge(x[j]).unwrap(),
                graph.create_edge(y[j]).unwrap(),
            ];
            graph.create_factor(&edges, intersection_minimizer).unwrap();
        }
    }

    (graph, Layout { x, y })
}

/// The largest pairwise overlap still present in the current layout (a
/// negative or zero value means every pair is legally separated).
fn max_overlap(graph: &ObjectiveGraph, layout: &Layout) -> f64 {
    let mut worst = f64::NEG_INFINITY;
    for i in 0..NUM_CIRCLES {
        for j in (i + 1)..NUM_CIRCLES {
            let xi = graph.value(layout.x[i]).unwrap();
            let yi = graph.value(layout.y[i]).unwrap();
            let xj = graph.value(layout.x[j]).unwrap();
            let yj = graph.value(layout.y[j]).unwrap();
            let dist = ((xj - xi).powi(2) + (yj - yi).powi(2)).sqrt();
            let overlap = 2.0 * RADIUS - dist;
            worst = worst.max(overlap);
        }
    }
    worst
}

fn solve(algorithm: Algorithm, learning_rate: f64, delta: f64, seed: u64, max_iterations: u64) -> (ObjectiveGraph, Layout) {
    let (mut graph, layout) = build_graph(algorithm, learning_rate, delta, seed);
    while !graph.iterate() && graph.iterations() < max_iterations {}
    (graph, layout)
}

fn main() {
    env_logger::init();

    let delta = 1e-5;
    let (admm_graph, admm_layout) = solve(Algorithm::Admm, 0.07, delta, 777, 50_000);
    println!(
        "ADMM: {} iterations, max overlap {:.6}",
        admm_graph.iterations(),
        max_overlap(&admm_graph, &admm_layout)
    );

    let (twa_graph, twa_layout) = solve(Algorithm::Twa, 0.07, delta, 777, 50_000);
    println!(
        "TWA:  {} iterations, max overlap {:.6}",
        twa_graph.iterations(),
        max_overlap(&twa_graph, &twa_layout)
    );
}
