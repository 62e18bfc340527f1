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

//! This example shows how to encode a 16x16 Sudoku as a one-hot factor graph
//! on top of `factorsolve`. It is a client of the library, not part of it:
//! the library only ever sees plain variables, edges and factors.
//!
//! One boolean variable per `(cell, candidate value)` pair is relaxed into a
//! continuous `[0, 1]`-valued variable. Four families of "exactly one of
//! these is true" factors (cell, row, column, box) share a single
//! minimizer: project the incoming messages onto the nearest one-hot
//! vector by setting the largest entry to `1.0` and every other to `0.0`.
//! A puzzle's given digits are additionally pinned with a single-edge,
//! `Inf`-weighted factor, so the one-hot factors push every other
//! candidate in that cell down to `0.0` without further help.

use factorsolve::{Algorithm, GraphConfigBuilder, MessageWeight, ObjectiveGraph, VariableId, WeightedValue};

/// Sudoku side length; 16 so that boxes are themselves 4x4 (`BOX = 4`).
const SIZE: usize = 16;
/// Side length of a box (a 16x16 Sudoku is tiled by 4x4 boxes).
const BOX: usize = 4;

/// Projects the incoming messages onto the nearest one-hot vector: the
/// largest entry becomes `1.0`, every other becomes `0.0`. The same
/// minimizer realizes every "exactly one of N" constraint in this puzzle
/// (one candidate per cell, one cell per row/column/box for a given
/// value) -- only the edge grouping differs between the four factor
/// families, not the rule itself.
fn one_hot(buffer: &mut [WeightedValue]) {
    let argmax = buffer
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.value.partial_cmp(&b.value).unwrap())
        .map(|(i, _)| i)
        .unwrap();
    for (i, slot) in buffer.iter_mut().enumerate() {
        slot.value = if i == argmax { 1.0 } else { 0.0 };
        slot.weight = MessageWeight::Std;
    }
}

/// A known-value factor: a single-edge factor that unconditionally
/// broadcasts "true" with `Inf` weight, pinning one candidate variable on
/// regardless of what the rest of the graph thinks.
fn known_true(buffer: &mut [WeightedValue]) {
    buffer[0] = WeightedValue::new(1.0, MessageWeight::Inf);
}

/// A fully solved 16x16 Sudoku grid, built with the standard band-shift
/// construction for `n = k^2` Sudokus (`k = BOX`): row `r`, column `c`
/// holds `(BOX*(r % BOX) + r / BOX + c) % SIZE`. This produces a grid
/// where every row, column and box is itself a permutation of
/// `0..SIZE`, which is exactly the invariant the one-hot factors above
/// enforce.
fn reference_solution() -> Vec<Vec<usize>> {
    (0..SIZE)
        .map(|r| {
            (0..SIZE)
                .map(|c| (BOX * (r % BOX) + r / BOX + c) % SIZE)
                .collect()
        })
        .collect()
}

/// Builds the one-hot factor graph for a 16x16 Sudoku puzzle. `givens` is
/// `Some(value)` for the cells whose value is fixed in the puzzle,
/// `None` for the cells left for the solver to fill in.
fn build_graph(algorithm: Algorithm, learning_rate: f64, givens: &[Vec<Option<usize>>]) -> (ObjectiveGraph, Vec<Vec<Vec<VariableId>>>) {
    let config = GraphConfigBuilder::default()
        .algorithm(algorithm)
        .learning_rate(learning_rate)
        .build()
        .unwrap();
    let mut graph = ObjectiveGraph::new(config);

    // vars[row][col][value] is the "cell (row, col) holds value" variable.
    let mut vars: Vec<Vec<Vec<VariableId>>> = Vec::with_capacity(SIZE);
    for _ in 0..SIZE {
        let mut row_vars = Vec::with_capacity(SIZE);
        for _ in 0..SIZE {
            let mut cell_vars = Vec::with_capacity(SIZE);
            for _ in 0..SIZE {
                cell_vars.push(graph.create_variable(1.0 / SIZE as f64, MessageWeight::Zero));
            }
            row_vars.push(cell_vars);
        }
        vars.push(row_vars);
    }

    // One cell one-hot factor per (row, col): exactly one candidate value
    // is true in that cell.
    for r in 0..SIZE {
        for c in 0..SIZE {
            let edges: Vec<_> = (0..SIZE)
                .map(|v| graph.create_edge(vars[r][c][v]).unwrap())
                .collect();
            graph.create_factor(&edges, one_hot).unwrap();
        }
    }
    // One row one-hot factor per (row, value): exactly one column holds
    // that value in that row.
    for r in 0..SIZE {
        for v in 0..SIZE {
            let edges: Vec<_> = (0..SIZE)
                .map(|c| graph.create_edge(vars[r][c][v]).unwrap())
                .collect();
            graph.create_factor(&edges, one_hot).unwrap();
        }
    }
    // One column one-hot factor per (col, value).
    for c in 0..SIZE {
        for v in 0..SIZE {
            let edges: Vec<_> = (0..SIZE)
                .map(|r| graph.create_edge(vars[r][c][v]).unwrap())
                .collect();
            graph.create_factor(&edges, one_hot).unwrap();
        }
    }
    // One box one-hot factor per (box, value).
    for box_r in 0..BOX {
        for box_c in 0..BOX {
            for v in 0..SIZE {
                let edges: Vec<_> = (0..BOX)
                    .flat_map(|dr| (0..BOX).map(move |dc| (dr, dc)))
                    .map(|(dr, dc)| graph.create_edge(vars[box_r * BOX + dr][box_c * BOX + dc][v]).unwrap())
                    .collect();
                graph.create_factor(&edges, one_hot).unwrap();
            }
        }
    }

    // Pin the puzzle's given digits with a known-value factor each.
    for r in 0..SIZE {
        for c in 0..SIZE {
            if let Some(v) = givens[r][c] {
                let e = graph.create_edge(vars[r][c][v]).unwrap();
                graph.create_factor(&[e], known_true).unwrap();
            }
        }
    }

    (graph, vars)
}

/// Reads off the solved grid: the candidate value with the largest
/// current variable value wins each cell.
fn read_solution(graph: &ObjectiveGraph, vars: &[Vec<Vec<VariableId>>]) -> Vec<Vec<usize>> {
    vars.iter()
        .map(|row| {
            row.iter()
                .map(|cell| {
                    cell.iter()
                        .enumerate()
                        .max_by(|(_, a), (_, b)| {
                            graph.value(**a).unwrap().partial_cmp(&graph.value(**b).unwrap()).unwrap()
                        })
                        .map(|(v, _)| v)
                        .unwrap()
                })
                .collect()
        })
        .collect()
}

fn solve(algorithm: Algorithm, learning_rate: f64, givens: &[Vec<Option<usize>>], max_iterations: u64) -> (Vec<Vec<usize>>, u64) {
    let (mut graph, vars) = build_graph(algorithm, learning_rate, givens);
    while !graph.iterate() && graph.iterations() < max_iterations {}
    (read_solution(&graph, &vars), graph.iterations())
}

fn main() {
    env_logger::init();

    let solution = reference_solution();
    // Reveal roughly a third of the cells as givens; leave the rest for
    // the solver to fill in.
    let givens: Vec<Vec<Option<usize>>> = (0..SIZE)
        .map(|r| {
            (0..SIZE)
                .map(|c| if (r * SIZE + c) % 3 == 0 { Some(solution[r][c]) } else { None })
                .collect()
        })
        .collect();

    let (admm_solution, admm_iterations) = solve(Algorithm::Admm, 0.1, &givens, 20_000);
    println!("ADMM converged (or capped) after {} iterations", admm_iterations);
    print_grid(&admm_solution);

    let (twa_solution, twa_iterations) = solve(Algorithm::Twa, 0.1, &givens, 20_000);
    println!("TWA converged (or capped) after {} iterations", twa_iterations);
    print_grid(&twa_solution);
}

fn print_grid(grid: &[Vec<usize>]) {
    for row in grid {
        let line: Vec<String> = row.iter().map(|v| format!("{:>3}", v + 1)).collect();
        println!("{}", line.join(" "));
    }
}
