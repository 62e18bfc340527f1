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

use crate::WeightedValue;

/// A factor's local minimizer: given a mutable buffer of `(value, weight)`
/// slots prefilled with the incoming messages-to-factor, in the order the
/// factor's edges were declared at creation, write the outgoing
/// `(value, weight)` into each slot.
///
/// The buffer length always equals the number of edges the factor was
/// created with. The minimizer is called at most once per factor per
/// iteration, only while the factor is enabled, and must be pure with
/// respect to any state other than the buffer it is handed -- the graph
/// relies on that purity to run the factor sweep in parallel.
pub trait Minimizer: Send + Sync {
    /// Writes the outgoing messages for this factor into `buffer`.
    fn minimize(&self, buffer: &mut [WeightedValue]);
}

/// Any plain closure of the right shape is a [`Minimizer`]; this is the
/// common case, and what every `ObjectiveGraph::create_factor` call in
/// practice passes.
impl<X: Fn(&mut [WeightedValue]) + Send + Sync> Minimizer for X {
    fn minimize(&self, buffer: &mut [WeightedValue]) {
        self(buffer)
    }
}
