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

//! A factor owns its minimizer and the ordered list of edges that
//! minimizer reads from and writes into.

use std::sync::Arc;

use crate::{EdgeId, Minimizer};

/// Per-factor state: the declared edge order (which also fixes the
/// minimizer buffer's slot order) and the user-supplied rule.
pub(crate) struct FactorData {
    pub edges: Vec<EdgeId>,
    pub minimizer: Arc<dyn Minimizer>,
    pub enabled: bool,
}

impl FactorData {
    pub fn new(edges: Vec<EdgeId>, minimizer: Arc<dyn Minimizer>) -> Self {
        FactorData {
            edges,
            minimizer,
            enabled: true,
        }
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
