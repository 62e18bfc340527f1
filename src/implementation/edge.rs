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

//! An edge is the channel between one factor and one variable. It carries
//! two directional weighted messages per iteration and absorbs whichever
//! side last wrote to it.

use crate::{FactorId, MessageWeight, VariableId, WeightedValue};

/// Per-edge state. Bound to exactly one variable at creation, and to
/// exactly one factor once that factor is created.
#[derive(Debug, Clone)]
pub(crate) struct EdgeData {
    pub variable: VariableId,
    pub factor: Option<FactorId>,
    /// Last value written by the factor.
    pub x: f64,
    /// Last value written by the variable.
    pub z: f64,
    /// Scaled dual accumulator.
    pub u: f64,
    /// Weight of the message to the factor (`n = z - u`).
    pub weight_to_left: MessageWeight,
    /// Weight of the message to the variable (`m = x + u`).
    pub weight_to_right: MessageWeight,
    pub enabled: bool,
    /// Previous message-to-factor; `None` until one full iteration
    /// completes.
    old_msg: Option<f64>,
    /// `|current - previous|` message-to-factor; `None` until one full
    /// iteration completes.
    pub msg_diff: Option<f64>,
}

impl EdgeData {
    pub fn new(variable: VariableId, initial_value: f64, initial_weight: MessageWeight) -> Self {
        EdgeData {
            variable,
            factor: None,
            x: initial_value,
            z: initial_value,
            u: 0.0,
            weight_to_left: initial_weight,
            weight_to_right: initial_weight,
            enabled: true,
            old_msg: None,
            msg_diff: None,
        }
    }

    /// The message handed to the factor: `n = z - u`.
    pub fn message_to_factor(&self) -> WeightedValue {
        WeightedValue::new(self.z - self.u, self.weight_to_left)
    }

    /// The message handed to the variable: `m = x + u`.
    pub fn message_to_variable(&self) -> WeightedValue {
        WeightedValue::new(self.x + self.u, self.weight_to_right)
    }

    /// Applied once a factor's minimizer has written `(value, weight)`
    /// into this edge's slot of the exchange buffer. `msg_diff` is
    /// sampled here, at a fixed point in the iteration, so the
    /// convergence test stays well-defined regardless of later variable
    /// writes.
    pub fn factor_side_absorb(&mut self, value: f64, weight: MessageWeight) {
        self.x = value;
        self.weight_to_right = weight;

        let new_msg = self.z - self.u;
        if let Some(old) = self.old_msg {
            self.msg_diff = Some((new_msg - old).abs());
        }
        self.old_msg = Some(new_msg);

        if weight.is_inf() {
            self.u = 0.0;
        }
    }

    /// Applied once the variable's equality rule has produced
    /// `(new_z, new_weight)`. Certainty on the variable side
    /// short-circuits the dual accumulator to zero: no residual
    /// correction should persist past a statement of fact.
    pub fn variable_side_absorb(&mut self, new_z: f64, new_weight: MessageWeight, alpha: f64) {
        self.z = new_z;
        self.weight_to_left = new_weight;

        if new_weight.is_inf() {
            self.u = 0.0;
        } else {
            self.u += alpha * (self.x - self.z);
        }
    }

    /// Restores this edge to the state it had right after creation, using
    /// `value` as both `x` and `z` (the variable's current value at the
    /// time its owning factor is re-enabled) and `Std` as both weights.
    /// Used both by `ObjectiveGraph::reinitialize` and by re-enabling a
    /// disabled factor.
    pub fn reset_to(&mut self, value: f64, weight: MessageWeight) {
        self.x = value;
        self.z = value;
        self.weight_to_left = weight;
        self.weight_to_right = weight;
        self.u = 0.0;
        self.old_msg = None;
        self.msg_diff = None;
        self.enabled = true;
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
