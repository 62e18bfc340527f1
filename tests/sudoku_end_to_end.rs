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

//! End-to-end Sudoku test, exercising `factorsolve`'s public API only (the
//! one-hot encoding below is a small local fixture, not an import of
//! `demos/sudoku.rs` -- Cargo example and test targets do not share code).
//!
//! `demos/sudoku.rs` reproduces the spec's literal 16x16 reference
//! instance; this test uses the classic 9x9 (3x3 boxes) size instead so
//! the suite stays fast under `cargo test`. The asserted property is the
//! one spec.md's testable-properties section actually requires of an
//! implementation: that both ADMM and TWA converge to a feasible
//! assignment, with TWA needing no more iterations than ADMM (TWA's
//! `Inf`-short-circuit makes its consensus strictly more decisive).

use factorsolve::{Algorithm, GraphConfigBuilder, MessageWeight, ObjectiveGraph, VariableId, WeightedValue};

const SIZE: usize = 9;
const BOX: usize = 3;
const MAX_ITERATIONS: u64 = 5_000;

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

fn known_true(buffer: &mut [WeightedValue]) {
    buffer[0] = WeightedValue::new(1.0, MessageWeight::Inf);
}

fn reference_solution() -> Vec<Vec<usize>> {
    (0..SIZE)
        .map(|r| (0..SIZE).map(|c| (BOX * (r % BOX) + r / BOX + c) % SIZE).collect())
        .collect()
}

fn build_and_solve(algorithm: Algorithm, givens: &[Vec<Option<usize>>]) -> (Vec<Vec<usize>>, u64) {
    let config = GraphConfigBuilder::default()
        .algorithm(algorithm)
        .learning_rate(0.1)
        .parallel(false)
        .build()
        .unwrap();
    let mut graph = ObjectiveGraph::new(config);

    let mut vars: Vec<Vec<Vec<VariableId>>> = Vec::with_capacity(SIZE);
    for _ in 0..SIZE {
        let mut row = Vec::with_capacity(SIZE);
        for _ in 0..SIZE {
            let mut cell = Vec::with_capacity(SIZE);
            for _ in 0..SIZE {
                cell.push(graph.create_variable(1.0 / SIZE as f64, MessageWeight::Zero));
            }
            row.push(cell);
        }
        vars.push(row);
    }

    for r in 0..SIZE {
        for c in 0..SIZE {
            let edges: Vec<_> = (0..SIZE).map(|v| graph.create_edge(vars[r][c][v]).unwrap()).collect();
            graph.create_factor(&edges, one_hot).unwrap();
        }
    }
    for r in 0..SIZE {
        for v in 0..SIZE {
            let edges: Vec<_> = (0..SIZE).map(|c| graph.create_edge(vars[r][c][v]).unwrap()).collect();
            graph.create_factor(&edges, one_hot).unwrap();
        }
    }
    for c in 0..SIZE {
        for v in 0..SIZE {
            let edges: Vec<_> = (0..SIZE).map(|r| graph.create_edge(vars[r][c][v]).unwrap()).collect();
            graph.create_factor(&edges, one_hot).unwrap();
        }
    }
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
    for r in 0..SIZE {
        for c in 0..SIZE {
            if let Some(v) = givens[r][c] {
                let e = graph.create_edge(vars[r][c][v]).unwrap();
                graph.create_factor(&[e], known_true).unwrap();
            }
        }
    }

    while !graph.iterate() && graph.iterations() < MAX_ITERATIONS {}

    let solution: Vec<Vec<usize>> = vars
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| {
                    cell.iter()
                        .enumerate()
                        .max_by(|(_, a), (_, b)| graph.value(**a).unwrap().partial_cmp(&graph.value(**b).unwrap()).unwrap())
                        .map(|(v, _)| v)
                        .unwrap()
                })
                .collect()
        })
        .collect();
    (solution, graph.iterations())
}

fn assert_is_permutation_of_0_to_size(values: &[usize]) {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    assert_eq!((0..SIZE).collect::<Vec<_>>(), sorted);
}

fn assert_feasible(grid: &[Vec<usize>]) {
    for row in grid {
        assert_is_permutation_of_0_to_size(row);
    }
    for c in 0..SIZE {
        let col: Vec<usize> = (0..SIZE).map(|r| grid[r][c]).collect();
        assert_is_permutation_of_0_to_size(&col);
    }
    for box_r in 0..BOX {
        for box_c in 0..BOX {
            let cells: Vec<usize> = (0..BOX)
                .flat_map(|dr| (0..BOX).map(move |dc| (dr, dc)))
                .map(|(dr, dc)| grid[box_r * BOX + dr][box_c * BOX + dc])
                .collect();
            assert_is_permutation_of_0_to_size(&cells);
        }
    }
}

fn givens_from(solution: &[Vec<usize>]) -> Vec<Vec<Option<usize>>> {
    (0..SIZE)
        .map(|r| {
            (0..SIZE)
                .map(|c| if (r * SIZE + c) % 3 == 0 { Some(solution[r][c]) } else { None })
                .collect()
        })
        .collect()
}

#[test]
fn admm_converges_to_a_feasible_assignment() {
    let solution = reference_solution();
    let givens = givens_from(&solution);
    let (grid, iterations) = build_and_solve(Algorithm::Admm, &givens);
    assert!(iterations < MAX_ITERATIONS, "ADMM did not converge within the iteration budget");
    assert_feasible(&grid);
}

#[test]
fn twa_converges_to_a_feasible_assignment_in_no_more_iterations_than_admm() {
    let solution = reference_solution();
    let givens = givens_from(&solution);

    let (admm_grid, admm_iterations) = build_and_solve(Algorithm::Admm, &givens);
    let (twa_grid, twa_iterations) = build_and_solve(Algorithm::Twa, &givens);

    assert!(twa_iterations < MAX_ITERATIONS, "TWA did not converge within the iteration budget");
    assert_feasible(&admm_grid);
    assert_feasible(&twa_grid);
    assert!(
        twa_iterations <= admm_iterations,
        "TWA's short-circuiting consensus should need no more sweeps than ADMM's averaging ({} vs {})",
        twa_iterations,
        admm_iterations
    );
}
