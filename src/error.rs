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

//! The core has few error modes; most client mistakes surface as
//! `debug_assert!` failures or are simply undefined behavior (see the crate
//! root docs). [`GraphError`] covers the one kind of mistake that is always
//! checked regardless of build profile: being handed an id that does not
//! belong to this graph.

use crate::{EdgeId, FactorId, VariableId};
use thiserror::Error;

/// Errors a client can recover from. Every other misuse documented on
/// [`crate::ObjectiveGraph`] is either a no-op (empty enabled-edge set) or
/// undefined behavior guarded only in debug builds (reentrant structural
/// mutation during a sweep).
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum GraphError {
    /// A [`VariableId`] that was never returned by `create_variable` on this
    /// graph (or that belongs to a different graph entirely).
    #[error("unknown variable id {0:?}")]
    UnknownVariable(VariableId),
    /// A [`FactorId`] that was never returned by `create_factor` on this
    /// graph.
    #[error("unknown factor id {0:?}")]
    UnknownFactor(FactorId),
    /// An [`EdgeId`] that was never returned by `create_edge` on this graph.
    #[error("unknown edge id {0:?}")]
    UnknownEdge(EdgeId),
}
