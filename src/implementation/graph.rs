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

//! [`ObjectiveGraph`]: the root container, construction API and two-phase
//! iteration scheduler.

use std::cell::Cell;
use std::sync::Arc;

use fxhash::FxHashSet;
use rayon::prelude::*;

use crate::implementation::edge::EdgeData;
use crate::implementation::equality::{admm_rule, twa_rule};
#[cfg(debug_assertions)]
use crate::implementation::equality::debug_check_twa_conflicts;
use crate::implementation::factor::FactorData;
use crate::implementation::variable::VariableData;
use crate::{Algorithm, EdgeId, FactorId, GraphError, MessageWeight, Minimizer, VariableId, WeightedValue};

/// Below this ratio of `enabled factors / total factors`, the factor sweep
/// iterates the enumerated enabled-index set instead of the full `0..len`
/// range; see [`ObjectiveGraph`]'s scheduler docs.
const SPARSE_SWEEP_THRESHOLD: f64 = 0.15;

/// Configuration bound to a graph at construction time: which algorithm
/// drives its variable-side consensus, the ADMM/TWA learning rate, the
/// convergence threshold, and whether sweeps run in parallel.
#[derive(Debug, Clone, derive_builder::Builder)]
#[builder(pattern = "owned")]
pub struct GraphConfig {
    /// Selects the variable equality rule; bound once, never branched on
    /// in the per-iteration hot path (the rule itself is resolved to a
    /// plain `fn` pointer in [`ObjectiveGraph::new`]).
    pub algorithm: Algorithm,
    /// The ADMM/TWA dual step size `alpha`.
    pub learning_rate: f64,
    /// Convergence is declared once every enabled edge's message-to-factor
    /// moved by no more than this across the last completed iteration.
    #[builder(default = "1e-5")]
    pub convergence_delta: f64,
    /// Whether the factor and variable sweeps run on a `rayon` thread pool
    /// or serially on the driver thread.
    #[builder(default = "true")]
    pub parallel: bool,
}

type EqualityRule = fn(&[WeightedValue]) -> Option<WeightedValue>;
type IterateCallback = Box<dyn FnMut(&mut ObjectiveGraph)>;
type ReinitCallback = Box<dyn FnMut(&mut ObjectiveGraph)>;

/// The bipartite factor graph and its scheduler. Owns contiguous vectors of
/// variables, factors and edges addressed by dense integer ids that never
/// change once handed out -- nothing is ever removed, only enabled or
/// disabled.
pub struct ObjectiveGraph {
    variables: Vec<VariableData>,
    factors: Vec<FactorData>,
    edges: Vec<EdgeData>,
    /// Index set of currently-enabled factors, kept in lockstep with each
    /// `FactorData::enabled` flag so the sparse sweep never has to scan.
    enabled_factors: FxHashSet<usize>,
    config: GraphConfig,
    equality_rule: EqualityRule,
    iterations: u64,
    converged: bool,
    on_iterate: Vec<IterateCallback>,
    on_reinit: Vec<ReinitCallback>,
    /// Debug-only reentrancy guard: set for the duration of a sweep so
    /// `debug_assert!`s on `set_factor_enabled`/`set_learning_rate` can
    /// catch a client calling back into the graph from inside a
    /// minimizer, which `spec.md` §5/§7 documents as undefined behavior.
    /// Always `false` on the driver thread between sweeps, including
    /// while post-iteration callbacks run.
    sweeping: Cell<bool>,
}

impl ObjectiveGraph {
    /// Creates an empty graph bound to `config`. The equality rule is
    /// resolved once here from `config.algorithm` and stored as a plain
    /// function pointer (see the Design Notes on algorithm specialization
    /// in this crate's module docs).
    pub fn new(config: GraphConfig) -> Self {
        let equality_rule: EqualityRule = match config.algorithm {
            Algorithm::Admm => admm_rule,
            Algorithm::Twa => twa_rule,
        };
        ObjectiveGraph {
            variables: Vec::new(),
            factors: Vec::new(),
            edges: Vec::new(),
            enabled_factors: FxHashSet::default(),
            config,
            equality_rule,
            iterations: 0,
            converged: false,
            on_iterate: Vec::new(),
            on_reinit: Vec::new(),
            sweeping: Cell::new(false),
        }
    }

    // ------------------------------------------------------------------
    // --- construction ---------------------------------------------------
    // ------------------------------------------------------------------

    /// Creates a new variable at `initial_value` with `initial_weight`,
    /// returning the id used to reference it thereafter. The value is
    /// meaningful only after the variable's first equality sweep; before
    /// then `value()` returns `initial_value` unchanged.
    pub fn create_variable(&mut self, initial_value: f64, initial_weight: MessageWeight) -> VariableId {
        self.variables.push(VariableData::new(initial_value, initial_weight));
        VariableId(self.variables.len() - 1)
    }

    /// Creates a new edge bound to `variable`. The edge has no factor yet;
    /// it is bound to one the moment that factor is created with it in its
    /// edge list.
    pub fn create_edge(&mut self, variable: VariableId) -> Result<EdgeId, GraphError> {
        let v = self
            .variables
            .get_mut(variable.id())
            .ok_or(GraphError::UnknownVariable(variable))?;
        let initial_value = v.initial_value();
        // ADMM edges are logically pinned to Std on both sides (spec.md
        // §3/§8's "ADMM weight invariance") regardless of the weight the
        // client passed at variable creation -- that weight only matters
        // for TWA.
        let initial_weight = if matches!(self.config.algorithm, Algorithm::Admm) {
            MessageWeight::Std
        } else {
            v.initial_weight()
        };
        self.edges.push(EdgeData::new(variable, initial_value, initial_weight));
        let edge_id = EdgeId(self.edges.len() - 1);
        v.add_edge(edge_id);
        Ok(edge_id)
    }

    /// Creates a new factor over `edges`, in that declared order -- the
    /// order the minimizer's buffer will see on every call. The factor
    /// starts enabled.
    pub fn create_factor<M>(&mut self, edges: &[EdgeId], minimizer: M) -> Result<FactorId, GraphError>
    where
        M: Minimizer + 'static,
    {
        for &e in edges {
            if e.id() >= self.edges.len() {
                return Err(GraphError::UnknownEdge(e));
            }
        }
        let factor_id = FactorId(self.factors.len());
        for &e in edges {
            self.edges[e.id()].factor = Some(factor_id);
        }
        self.factors.push(FactorData::new(edges.to_vec(), Arc::new(minimizer)));
        self.enabled_factors.insert(factor_id.id());
        Ok(factor_id)
    }

    // ------------------------------------------------------------------
    // --- queries ----------------------------------------------------------
    // ------------------------------------------------------------------

    /// The current value of `variable`.
    pub fn value(&self, variable: VariableId) -> Result<f64, GraphError> {
        self.variables
            .get(variable.id())
            .map(|v| v.value)
            .ok_or(GraphError::UnknownVariable(variable))
    }

    pub fn factor_enabled(&self, factor: FactorId) -> Result<bool, GraphError> {
        self.factors
            .get(factor.id())
            .map(|f| f.enabled)
            .ok_or(GraphError::UnknownFactor(factor))
    }

    /// Enables or disables `factor`; returns whether this call actually
    /// changed anything (both directions are idempotent -- see
    /// [`ObjectiveGraph`]'s enable/disable docs below).
    pub fn set_factor_enabled(&mut self, factor: FactorId, enabled: bool) -> Result<bool, GraphError> {
        debug_assert!(!self.sweeping.get(), "set_factor_enabled called reentrantly from inside a sweep");
        if factor.id() >= self.factors.len() {
            return Err(GraphError::UnknownFactor(factor));
        }
        if enabled {
            Ok(self.enable_factor(factor))
        } else {
            Ok(self.disable_factor(factor))
        }
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_factors(&self) -> usize {
        self.factors.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn num_enabled_factors(&self) -> usize {
        self.enabled_factors.len()
    }

    pub fn num_enabled_edges(&self) -> usize {
        self.edges.iter().filter(|e| e.enabled).count()
    }

    pub fn learning_rate(&self) -> f64 {
        self.config.learning_rate
    }

    /// Writing the learning rate during an active `iterate()` call is
    /// undefined behavior per spec -- in practice this is simply
    /// unreachable, since `iterate` holds `&mut self` for its whole
    /// duration and the only way to reach this setter mid-iteration is
    /// from inside a post-iteration callback, which already runs after
    /// the sweeps complete.
    pub fn set_learning_rate(&mut self, learning_rate: f64) {
        debug_assert!(!self.sweeping.get(), "set_learning_rate called reentrantly from inside a sweep");
        self.config.learning_rate = learning_rate;
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    pub fn on_iterate<F>(&mut self, callback: F)
    where
        F: FnMut(&mut ObjectiveGraph) + 'static,
    {
        self.on_iterate.push(Box::new(callback));
    }

    pub fn on_reinit<F>(&mut self, callback: F)
    where
        F: FnMut(&mut ObjectiveGraph) + 'static,
    {
        self.on_reinit.push(Box::new(callback));
    }

    // ------------------------------------------------------------------
    // --- driving ------------------------------------------------------
    // ------------------------------------------------------------------

    /// Runs one iteration: factor sweep, variable sweep, convergence test,
    /// then fires every `onIterate` callback. A no-op on an already
    /// converged graph: returns `true` immediately and fires nothing.
    pub fn iterate(&mut self) -> bool {
        if self.converged {
            return true;
        }

        self.sweeping.set(true);
        self.factor_sweep();
        self.variable_sweep();
        self.sweeping.set(false);

        self.iterations += 1;
        self.converged = self.compute_converged();
        log::trace!(
            "iteration {} complete: converged={}, enabled_factors={}/{}",
            self.iterations,
            self.converged,
            self.enabled_factors.len(),
            self.factors.len()
        );
        self.fire_callbacks(true);
        self.converged
    }

    /// Restores every variable and edge to its construction-time value,
    /// re-enables every factor, zeroes every dual accumulator, clears
    /// message history, resets `iterations`/`converged`, then fires every
    /// `onReinit` callback.
    pub fn reinitialize(&mut self) {
        let admm = matches!(self.config.algorithm, Algorithm::Admm);
        let initial: Vec<(f64, MessageWeight)> = self
            .variables
            .iter()
            .map(|v| (v.initial_value(), if admm { MessageWeight::Std } else { v.initial_weight() }))
            .collect();

        for variable in self.variables.iter_mut() {
            variable.reset();
        }
        for factor in self.factors.iter_mut() {
            factor.enabled = true;
        }
        self.enabled_factors = (0..self.factors.len()).collect();
        for edge in self.edges.iter_mut() {
            let (value, weight) = initial[edge.variable.id()];
            edge.reset_to(value, weight);
        }

        self.iterations = 0;
        self.converged = false;
        self.fire_callbacks(false);
    }

    fn fire_callbacks(&mut self, iterate: bool) {
        let mut callbacks = std::mem::take(if iterate { &mut self.on_iterate } else { &mut self.on_reinit });
        for callback in callbacks.iter_mut() {
            callback(self);
        }
        if iterate {
            self.on_iterate = callbacks;
        } else {
            self.on_reinit = callbacks;
        }
    }

    // ------------------------------------------------------------------
    // --- enable / disable -----------------------------------------------
    // ------------------------------------------------------------------

    /// Disabling is cheap: flag the factor, drop it from the enabled-index
    /// set, disable its edges, and mark each owning variable's
    /// `enabledEdges` cache dirty for lazy rebuild at the next variable
    /// sweep. A no-op (returns `false`) if the factor was already
    /// disabled.
    fn disable_factor(&mut self, factor: FactorId) -> bool {
        let i = factor.id();
        if !self.factors[i].enabled {
            return false;
        }
        self.factors[i].enabled = false;
        self.enabled_factors.remove(&i);

        let edges = self.factors[i].edges.clone();
        for edge in edges {
            self.edges[edge.id()].enabled = false;
            let owner = self.edges[edge.id()].variable;
            self.variables[owner.id()].mark_dirty();
        }
        log::debug!("factor {} disabled ({} enabled of {})", i, self.enabled_factors.len(), self.factors.len());
        true
    }

    /// Enabling pays the initialization cost disabling skips: each edge is
    /// reset to `(value = variable.currentValue, weight = Std)` with
    /// cleared `u`/history, and appended directly to its variable's
    /// `enabledEdges` cache. If that cache is already pending a rebuild
    /// (a prior disable on the same variable was never followed by a
    /// sweep), the append is skipped in favor of a full rebuild so the
    /// cache never ends up with a duplicate entry. A no-op (returns
    /// `false`) if the factor was already enabled.
    fn enable_factor(&mut self, factor: FactorId) -> bool {
        let i = factor.id();
        if self.factors[i].enabled {
            return false;
        }
        self.factors[i].enabled = true;
        self.enabled_factors.insert(i);

        let edges = self.factors[i].edges.clone();
        for edge in edges {
            let owner = self.edges[edge.id()].variable;
            let value = self.variables[owner.id()].value;
            self.edges[edge.id()].reset_to(value, MessageWeight::Std);

            if self.variables[owner.id()].needs_rebuild() {
                self.variables[owner.id()].rebuild_enabled(&self.edges);
            } else {
                self.variables[owner.id()].append_enabled(edge);
            }
        }
        log::debug!("factor {} enabled ({} enabled of {})", i, self.enabled_factors.len(), self.factors.len());
        true
    }

    // ------------------------------------------------------------------
    // --- the two sweeps -------------------------------------------------
    // ------------------------------------------------------------------

    /// Chooses dense (`0..len`, skip disabled inline) or sparse (walk the
    /// enabled-index set) iteration by the `enabled/total` ratio, fills
    /// each enabled factor's exchange buffer from its edges'
    /// message-to-factor, runs the minimizer, then absorbs the result back
    /// into every edge (§4.1's factor-side absorption).
    fn factor_sweep(&mut self) {
        if self.factors.is_empty() {
            return;
        }
        let ratio = self.enabled_factors.len() as f64 / self.factors.len() as f64;
        let indices: Vec<usize> = if ratio >= SPARSE_SWEEP_THRESHOLD {
            log::trace!("factor sweep: dense strategy, ratio={:.3}", ratio);
            (0..self.factors.len()).filter(|&i| self.factors[i].enabled).collect()
        } else {
            log::trace!("factor sweep: sparse strategy, ratio={:.3}", ratio);
            let mut v: Vec<usize> = self.enabled_factors.iter().copied().collect();
            v.sort_unstable();
            v
        };

        let factors = &self.factors;
        let edges = &self.edges;
        let compute = |&i: &usize| -> Vec<WeightedValue> {
            let factor = &factors[i];
            let mut buffer: Vec<WeightedValue> = factor
                .edges
                .iter()
                .map(|e| edges[e.id()].message_to_factor())
                .collect();
            factor.minimizer.minimize(&mut buffer);
            buffer
        };

        let results: Vec<Vec<WeightedValue>> = if self.config.parallel {
            indices.par_iter().map(compute).collect()
        } else {
            indices.iter().map(compute).collect()
        };

        let admm = matches!(self.config.algorithm, Algorithm::Admm);
        for (&i, buffer) in indices.iter().zip(results.into_iter()) {
            let factor_edges = self.factors[i].edges.clone();
            for (edge_id, result) in factor_edges.into_iter().zip(buffer.into_iter()) {
                let weight = if admm { MessageWeight::Std } else { result.weight };
                self.edges[edge_id.id()].factor_side_absorb(result.value, weight);
            }
        }
    }

    /// For every variable whose `enabledEdges` cache is stale, rebuilds it;
    /// then evaluates the bound equality rule over each variable's enabled
    /// edges' messages-to-variable and absorbs the result back into every
    /// one of those edges (§4.2/§4.1's variable-side absorption). A
    /// variable with zero enabled edges is left untouched.
    fn variable_sweep(&mut self) {
        if self.variables.is_empty() {
            return;
        }
        {
            let (variables, edges) = (&mut self.variables, &self.edges);
            for variable in variables.iter_mut() {
                if variable.needs_rebuild() {
                    variable.rebuild_enabled(edges);
                }
            }
        }

        let algorithm = self.config.algorithm;
        let rule = self.equality_rule;
        let variables = &self.variables;
        let edges = &self.edges;
        let compute = |i: usize| -> Option<WeightedValue> {
            let incoming: Vec<WeightedValue> = variables[i]
                .enabled_edges()
                .iter()
                .map(|e| edges[e.id()].message_to_variable())
                .collect();
            #[cfg(debug_assertions)]
            if matches!(algorithm, Algorithm::Twa) {
                debug_check_twa_conflicts(&incoming);
            }
            rule(&incoming)
        };

        let indices: Vec<usize> = (0..self.variables.len()).collect();
        let results: Vec<Option<WeightedValue>> = if self.config.parallel {
            indices.par_iter().map(|&i| compute(i)).collect()
        } else {
            indices.iter().map(|&i| compute(i)).collect()
        };

        let alpha = self.config.learning_rate;
        for (i, result) in results.into_iter().enumerate() {
            if let Some(new_value) = result {
                self.variables[i].value = new_value.value;
                let enabled_edges = self.variables[i].enabled_edges().to_vec();
                for edge_id in enabled_edges {
                    self.edges[edge_id.id()].variable_side_absorb(new_value.value, new_value.weight, alpha);
                }
            }
        }
    }

    /// Convergence: every enabled edge must have a recorded `msg_diff` no
    /// greater than `convergence_delta`. An edge with no recorded
    /// `msg_diff` yet (fewer than one full iteration behind it) means
    /// "not converged," not "vacuously converged."
    fn compute_converged(&self) -> bool {
        self.edges
            .iter()
            .filter(|e| e.enabled)
            .all(|e| matches!(e.msg_diff, Some(d) if d <= self.config.convergence_delta))
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GraphConfigBuilder;

    fn admm_graph(alpha: f64) -> ObjectiveGraph {
        let config = GraphConfigBuilder::default()
            .algorithm(Algorithm::Admm)
            .learning_rate(alpha)
            .parallel(false)
            .build()
            .unwrap();
        ObjectiveGraph::new(config)
    }

    fn twa_graph(alpha: f64) -> ObjectiveGraph {
        let config = GraphConfigBuilder::default()
            .algorithm(Algorithm::Twa)
            .learning_rate(alpha)
            .parallel(false)
            .build()
            .unwrap();
        ObjectiveGraph::new(config)
    }

    #[test]
    fn admm_consensus_converges_to_the_mean() {
        let mut g = admm_graph(0.2);
        let v = g.create_variable(0.0, MessageWeight::Zero);
        let e1 = g.create_edge(v).unwrap();
        let e2 = g.create_edge(v).unwrap();
        g.create_factor(&[e1], |buf: &mut [WeightedValue]| {
            buf[0] = WeightedValue::new(10.0, MessageWeight::Std);
        })
        .unwrap();
        g.create_factor(&[e2], |buf: &mut [WeightedValue]| {
            buf[0] = WeightedValue::new(4.0, MessageWeight::Std);
        })
        .unwrap();

        let mut guard = 0;
        while !g.iterate() {
            guard += 1;
            assert!(guard < 100_000, "did not converge");
        }
        assert!((g.value(v).unwrap() - 7.0).abs() < 1e-4);
    }

    #[test]
    fn twa_inf_factor_pins_the_variable_immediately() {
        let mut g = twa_graph(0.3);
        let v = g.create_variable(0.0, MessageWeight::Zero);
        let e1 = g.create_edge(v).unwrap();
        let e2 = g.create_edge(v).unwrap();
        g.create_factor(&[e1], |buf: &mut [WeightedValue]| {
            buf[0] = WeightedValue::new(5.0, MessageWeight::Inf);
        })
        .unwrap();
        g.create_factor(&[e2], |buf: &mut [WeightedValue]| {
            buf[0] = WeightedValue::new(999.0, MessageWeight::Std);
        })
        .unwrap();

        g.iterate();
        assert!((g.value(v).unwrap() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn iterate_on_converged_graph_is_a_no_op() {
        let mut g = admm_graph(0.1);
        let v = g.create_variable(3.0, MessageWeight::Std);
        let e1 = g.create_edge(v).unwrap();
        g.create_factor(&[e1], |buf: &mut [WeightedValue]| {
            buf[0] = WeightedValue::new(3.0, MessageWeight::Std);
        })
        .unwrap();

        let mut guard = 0;
        while !g.iterate() {
            guard += 1;
            assert!(guard < 1000);
        }
        let iterations_at_convergence = g.iterations();
        let fired = std::rc::Rc::new(std::cell::Cell::new(false));
        let fired2 = fired.clone();
        g.on_iterate(move |_| fired2.set(true));

        assert!(g.iterate());
        assert_eq!(iterations_at_convergence, g.iterations());
        assert!(!fired.get());
    }

    #[test]
    fn reinitialize_restores_construction_time_state() {
        let mut g = admm_graph(0.1);
        let v = g.create_variable(1.0, MessageWeight::Std);
        let e1 = g.create_edge(v).unwrap();
        let f = g
            .create_factor(&[e1], |buf: &mut [WeightedValue]| {
                buf[0] = WeightedValue::new(5.0, MessageWeight::Std);
            })
            .unwrap();

        let mut guard = 0;
        while !g.iterate() {
            guard += 1;
            assert!(guard < 1000);
        }
        g.set_factor_enabled(f, false).unwrap();

        g.reinitialize();
        assert_eq!(0, g.iterations());
        assert!(!g.converged());
        assert!(g.factor_enabled(f).unwrap());
        assert_eq!(1.0, g.value(v).unwrap());
        assert_eq!(1, g.num_enabled_factors());
        assert_eq!(1, g.num_enabled_edges());
    }

    #[test]
    fn disable_then_enable_without_iterating_is_a_pure_reset() {
        let mut g = admm_graph(0.1);
        let v = g.create_variable(2.0, MessageWeight::Std);
        let e1 = g.create_edge(v).unwrap();
        let f = g
            .create_factor(&[e1], |buf: &mut [WeightedValue]| {
                buf[0] = WeightedValue::new(9.0, MessageWeight::Std);
            })
            .unwrap();

        assert!(g.set_factor_enabled(f, false).unwrap());
        assert!(!g.set_factor_enabled(f, false).unwrap()); // idempotent
        assert!(g.set_factor_enabled(f, true).unwrap());
        assert!(!g.set_factor_enabled(f, true).unwrap()); // idempotent

        assert!(g.factor_enabled(f).unwrap());
        assert_eq!(1, g.num_enabled_edges());
        assert_eq!(2.0, g.value(v).unwrap());
    }

    #[test]
    fn disabled_factor_minimizer_is_never_invoked() {
        let mut g = admm_graph(0.1);
        let v = g.create_variable(0.0, MessageWeight::Std);
        let e1 = g.create_edge(v).unwrap();
        let calls = std::rc::Rc::new(std::cell::Cell::new(0));
        let calls2 = calls.clone();
        let f = g
            .create_factor(&[e1], move |buf: &mut [WeightedValue]| {
                calls2.set(calls2.get() + 1);
                buf[0] = WeightedValue::new(1.0, MessageWeight::Std);
            })
            .unwrap();
        g.set_factor_enabled(f, false).unwrap();

        g.iterate();
        assert_eq!(0, calls.get());
    }

    #[test]
    fn sparse_and_dense_sweeps_invoke_the_same_minimizers() {
        // 20 factors, only 2 enabled: ratio 0.1 < 0.15, exercises the
        // sparse path. Every enabled factor's minimizer must still fire
        // exactly once, and disabled ones never.
        let mut g = admm_graph(0.1);
        let v = g.create_variable(0.0, MessageWeight::Std);
        let mut factors = Vec::new();
        let mut calls = Vec::new();
        for _ in 0..20 {
            let e = g.create_edge(v).unwrap();
            let count = std::rc::Rc::new(std::cell::Cell::new(0));
            let count2 = count.clone();
            let f = g
                .create_factor(&[e], move |buf: &mut [WeightedValue]| {
                    count2.set(count2.get() + 1);
                    buf[0] = WeightedValue::new(1.0, MessageWeight::Std);
                })
                .unwrap();
            factors.push(f);
            calls.push(count);
        }
        for f in &factors[2..] {
            g.set_factor_enabled(*f, false).unwrap();
        }
        g.iterate();
        assert_eq!(1, calls[0].get());
        assert_eq!(1, calls[1].get());
        for count in &calls[2..] {
            assert_eq!(0, count.get());
        }
    }

    #[test]
    fn admm_edges_pin_weight_to_std_even_if_the_variable_was_created_with_a_different_weight() {
        // spec.md §3/§8: "in ADMM mode both weights are logically pinned to
        // Std" -- this must hold from the moment the edge is created, not
        // just after the first factor-side absorb overwrites it.
        let mut g = admm_graph(0.1);
        let v_zero = g.create_variable(0.0, MessageWeight::Zero);
        let v_inf = g.create_variable(0.0, MessageWeight::Inf);
        let e_zero = g.create_edge(v_zero).unwrap();
        let e_inf = g.create_edge(v_inf).unwrap();

        assert_eq!(MessageWeight::Std, g.edges[e_zero.id()].message_to_factor().weight);
        assert_eq!(MessageWeight::Std, g.edges[e_zero.id()].message_to_variable().weight);
        assert_eq!(MessageWeight::Std, g.edges[e_inf.id()].message_to_factor().weight);
        assert_eq!(MessageWeight::Std, g.edges[e_inf.id()].message_to_variable().weight);

        g.create_factor(&[e_zero], |buf: &mut [WeightedValue]| {
            buf[0] = WeightedValue::new(2.0, MessageWeight::Zero);
        })
        .unwrap();
        g.create_factor(&[e_inf], |buf: &mut [WeightedValue]| {
            buf[0] = WeightedValue::new(3.0, MessageWeight::Inf);
        })
        .unwrap();
        g.iterate();
        g.reinitialize();

        assert_eq!(MessageWeight::Std, g.edges[e_zero.id()].weight_to_left);
        assert_eq!(MessageWeight::Std, g.edges[e_zero.id()].weight_to_right);
        assert_eq!(MessageWeight::Std, g.edges[e_inf.id()].weight_to_left);
        assert_eq!(MessageWeight::Std, g.edges[e_inf.id()].weight_to_right);
    }

    #[test]
    fn unknown_variable_id_is_an_error() {
        let mut g = admm_graph(0.1);
        let bogus = VariableId(42);
        assert!(g.create_edge(bogus).is_err());
        assert!(g.value(bogus).is_err());
    }

    #[test]
    fn unknown_edge_id_rejects_factor_creation() {
        let mut g = admm_graph(0.1);
        assert!(g
            .create_factor(&[EdgeId(7)], |_: &mut [WeightedValue]| {})
            .is_err());
    }
}
