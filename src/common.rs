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

//! This module defines the most basic data types that are used throughout all
//! the code of our library (both at the abstraction and implementation levels).
//! These are also the types your client code is likely to work with.

// ----------------------------------------------------------------------------
// --- IDENTIFIERS --------------------------------------------------------------
// ----------------------------------------------------------------------------
/// This type denotes a variable of the factor graph. Variables are identified
/// with a dense integer ranging from 0 until `graph.num_variables()`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct VariableId(pub usize);
impl VariableId {
    #[inline]
    /// Returns the id (numeric value) of the variable.
    ///
    /// # Examples:
    /// ```
    /// # use factorsolve::VariableId;
    /// assert_eq!(0, VariableId(0).id());
    /// assert_eq!(1, VariableId(1).id());
    /// ```
    pub fn id(self) -> usize {
        self.0
    }
}

/// This type denotes a factor of the factor graph. Factors are identified
/// with a dense integer ranging from 0 until `graph.num_factors()`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct FactorId(pub usize);
impl FactorId {
    #[inline]
    pub fn id(self) -> usize {
        self.0
    }
}

/// This type denotes an edge of the factor graph, bound to exactly one
/// variable and (once its owning factor is created) exactly one factor.
/// Edges are identified with a dense integer ranging from 0 until
/// `graph.num_edges()`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct EdgeId(pub usize);
impl EdgeId {
    #[inline]
    pub fn id(self) -> usize {
        self.0
    }
}

// ----------------------------------------------------------------------------
// --- MESSAGE WEIGHT -----------------------------------------------------------
// ----------------------------------------------------------------------------
/// The confidence tag carried by a message. `Zero` means "no information",
/// `Std` is the standard ADMM weight, and `Inf` means "certainty" -- a fact
/// that dominates any averaging. The tag, not a numeric stand-in, is always
/// the source of truth the equality rules branch on; [`MessageWeight::as_f64`]
/// only exists for clients that want the numeric projection.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MessageWeight {
    /// No information carried by this message.
    Zero,
    /// Standard ADMM confidence.
    Std,
    /// Absolute certainty; dominates averaging.
    Inf,
}

impl MessageWeight {
    /// Projects the tag onto its numeric value: `Zero -> 0.0`, `Std -> 1.0`,
    /// `Inf -> +infinity`. Used only by clients; internal logic always
    /// branches on the tag itself.
    ///
    /// ```
    /// # use factorsolve::MessageWeight;
    /// assert_eq!(0.0, MessageWeight::Zero.as_f64());
    /// assert_eq!(1.0, MessageWeight::Std.as_f64());
    /// assert_eq!(f64::INFINITY, MessageWeight::Inf.as_f64());
    /// ```
    pub fn as_f64(self) -> f64 {
        match self {
            MessageWeight::Zero => 0.0,
            MessageWeight::Std => 1.0,
            MessageWeight::Inf => f64::INFINITY,
        }
    }

    /// True iff this weight is [`MessageWeight::Inf`].
    pub fn is_inf(self) -> bool {
        matches!(self, MessageWeight::Inf)
    }
}

// ----------------------------------------------------------------------------
// --- WEIGHTED VALUE -----------------------------------------------------------
// ----------------------------------------------------------------------------
/// A `(value, weight)` pair: the unit exchanged across an edge, and the slot
/// type a factor's minimizer reads from and writes into.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WeightedValue {
    pub value: f64,
    pub weight: MessageWeight,
}

impl WeightedValue {
    pub fn new(value: f64, weight: MessageWeight) -> Self {
        WeightedValue { value, weight }
    }
}

// ----------------------------------------------------------------------------
// --- ALGORITHM ----------------------------------------------------------------
// ----------------------------------------------------------------------------
/// Selects the variable-side equality rule a graph uses. Bound once at
/// construction time (see `ObjectiveGraph::new`) so the per-iteration hot
/// path never branches on it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Algorithm {
    /// Alternating Direction Method of Multipliers: equality by averaging.
    Admm,
    /// Three-Weight Algorithm: equality with `{Zero, Std, Inf}` confidence
    /// levels, `Inf` dominating.
    Twa,
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_ids {
    use crate::VariableId;

    #[test]
    fn test_variable_id() {
        assert_eq!(0, VariableId(0).id());
        assert_eq!(1, VariableId(1).id());
        assert_eq!(2, VariableId(2).id());
    }
}
