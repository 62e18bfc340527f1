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

//! # factorsolve
//! `factorsolve` is a small, generic framework to solve constraint-satisfaction
//! and combinatorial problems by message passing over a bipartite factor graph.
//! It implements two closely related consensus algorithms: the Alternating
//! Direction Method of Multipliers (**ADMM**) and the Three-Weight Algorithm
//! (**TWA**, an ADMM variant that additionally admits edges asserting zero or
//! infinite confidence).
//!
//! You describe your problem as a set of *variables* (the unknowns you want a
//! value for) and *factors* (local sub-objectives, each supplying its own
//! minimizer over the variables it touches). The graph does the rest: it wires
//! up the edges, runs the iteration schedule, and tells you when the variables
//! have converged to a consensus value.
//!
//! ## Side benefit
//! Both sweeps of an iteration are embarrassingly parallel by construction, so
//! `factorsolve` uses all of your hardware whenever the `parallel` flag is set
//! (the default).
//!
//! ## Quick example
//! The following solves a toy problem: three variables that must all agree on
//! the same value, driven towards `10.0` by one factor and towards `4.0` by
//! another, each factor trusted equally.
//!
//! ```
//! use factorsolve::{Algorithm, GraphConfigBuilder, MessageWeight, ObjectiveGraph, WeightedValue};
//!
//! // 1. Configure the graph: algorithm, learning rate, and the rest at
//! //    their defaults (convergence_delta = 1e-5, parallel = true).
//! let config = GraphConfigBuilder::default()
//!     .algorithm(Algorithm::Admm)
//!     .learning_rate(0.1)
//!     .build()
//!     .unwrap();
//! let mut graph = ObjectiveGraph::new(config);
//!
//! // 2. Create one variable, initially at 0.0 with no information yet.
//! let v = graph.create_variable(0.0, MessageWeight::Zero);
//!
//! // 3. Create the edges that will connect that variable to its two factors.
//! let e1 = graph.create_edge(v).unwrap();
//! let e2 = graph.create_edge(v).unwrap();
//!
//! // 4. Create the factors. Each minimizer receives a buffer of
//! //    (value, weight) slots -- one per edge it was created with, in order
//! //    -- and writes back the value it wants to pull its variables towards.
//! graph.create_factor(&[e1], |buf: &mut [WeightedValue]| {
//!     buf[0] = WeightedValue::new(10.0, MessageWeight::Std);
//! }).unwrap();
//! graph.create_factor(&[e2], |buf: &mut [WeightedValue]| {
//!     buf[0] = WeightedValue::new(4.0, MessageWeight::Std);
//! }).unwrap();
//!
//! // 5. Drive the graph until it converges.
//! while !graph.iterate() {}
//!
//! // 6. Read off the consensus value: the mean of 10.0 and 4.0.
//! assert!((graph.value(v).unwrap() - 7.0).abs() < 1e-6);
//! ```
//!
//! #### Note
//! The `demos` folder of this repository contains two complete examples
//! (Sudoku as one-hot assignment, circle packing as pairwise non-overlap
//! constraints) built entirely on top of the public API above, in addition
//! to this toy one.
//!
//! ## Going further / Getting a grasp on the codebase
//! Start with [`ObjectiveGraph`], the root container and scheduler, then look
//! at [`Minimizer`] (the one trait a client implements, usually via a plain
//! closure) and at [`MessageWeight`]/[`WeightedValue`] for the exchange
//! vocabulary. [`Algorithm`] selects between ADMM and TWA consensus at
//! construction time.

#![allow(clippy::needless_doctest_main)]

mod common;
mod error;
mod abstraction;
mod implementation;

pub use common::*;
pub use error::*;
pub use abstraction::*;
pub use implementation::*;
