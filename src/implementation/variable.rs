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

//! A variable owns the set of edges incident to it and the current
//! consensus value those edges agree on.

use crate::implementation::edge::EdgeData;
use crate::{EdgeId, MessageWeight};

/// Per-variable state. `enabled_edges` is a lazily-rebuilt cache over
/// `edges`, kept in step with each edge's owning factor's enabled flag so
/// the variable sweep never has to scan disabled edges.
#[derive(Debug, Clone)]
pub(crate) struct VariableData {
    pub edges: Vec<EdgeId>,
    enabled_edges: Vec<EdgeId>,
    enabled_needs_update: bool,
    pub value: f64,
    initial_value: f64,
    initial_weight: MessageWeight,
}

impl VariableData {
    pub fn new(initial_value: f64, initial_weight: MessageWeight) -> Self {
        VariableData {
            edges: Vec::new(),
            enabled_edges: Vec::new(),
            enabled_needs_update: false,
            value: initial_value,
            initial_value,
            initial_weight,
        }
    }

    pub fn initial_value(&self) -> f64 {
        self.initial_value
    }

    pub fn initial_weight(&self) -> MessageWeight {
        self.initial_weight
    }

    pub fn add_edge(&mut self, edge: EdgeId) {
        self.edges.push(edge);
        // A freshly created edge belongs to a factor that was just
        // created too, and new factors start enabled, so it is always
        // safe to append directly rather than forcing a full rebuild.
        self.enabled_edges.push(edge);
    }

    /// Marks the enabled-edge cache stale. O(1); the next sweep that
    /// needs the cache will pay for `rebuild_enabled` once.
    pub fn mark_dirty(&mut self) {
        self.enabled_needs_update = true;
    }

    /// Appends `edge` directly to the cache without a full rebuild --
    /// used when a single factor is re-enabled and its edges are known
    /// to all be absent from the current cache.
    pub fn append_enabled(&mut self, edge: EdgeId) {
        self.enabled_edges.push(edge);
    }

    pub fn enabled_edges(&self) -> &[EdgeId] {
        &self.enabled_edges
    }

    pub fn needs_rebuild(&self) -> bool {
        self.enabled_needs_update
    }

    /// Full rescan of `edges` against each edge's `enabled` flag, used
    /// only when a disable has left the cache in an unknown state (the
    /// cache does not track which specific edges a disable removed, only
    /// that *some* subset did, so the disable path always forces a
    /// rebuild rather than trying to splice the cache in place).
    pub fn rebuild_enabled(&mut self, edges: &[EdgeData]) {
        self.enabled_edges.clear();
        self.enabled_edges
            .extend(self.edges.iter().copied().filter(|e| edges[e.id()].enabled));
        self.enabled_needs_update = false;
    }

    /// Restores the value to its construction-time default and the
    /// enabled-edge cache to the full edge list, matching
    /// `ObjectiveGraph::reinitialize`'s "re-enable every factor"
    /// guarantee.
    pub fn reset(&mut self) {
        self.value = self.initial_value;
        self.enabled_edges = self.edges.clone();
        self.enabled_needs_update = false;
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod tests {
    use super::*;
    use crate::implementation::edge::EdgeData;
    use crate::VariableId;

    fn edge_fixture(enabled: bool) -> EdgeData {
        let mut e = EdgeData::new(VariableId(0), 0.0, MessageWeight::Std);
        e.enabled = enabled;
        e
    }

    #[test]
    fn new_edges_are_appended_directly_to_the_enabled_cache() {
        let mut v = VariableData::new(0.0, MessageWeight::Std);
        v.add_edge(EdgeId(0));
        v.add_edge(EdgeId(1));
        assert_eq!(&[EdgeId(0), EdgeId(1)], v.enabled_edges());
        assert!(!v.needs_rebuild());
    }

    #[test]
    fn mark_dirty_then_rebuild_drops_disabled_edges() {
        let mut v = VariableData::new(0.0, MessageWeight::Std);
        v.add_edge(EdgeId(0));
        v.add_edge(EdgeId(1));
        v.mark_dirty();
        assert!(v.needs_rebuild());

        let edges = vec![edge_fixture(true), edge_fixture(false)];
        v.rebuild_enabled(&edges);
        assert_eq!(&[EdgeId(0)], v.enabled_edges());
        assert!(!v.needs_rebuild());
    }

    #[test]
    fn reset_restores_initial_value() {
        let mut v = VariableData::new(3.0, MessageWeight::Std);
        v.value = 99.0;
        v.reset();
        assert_eq!(3.0, v.value);
        assert_eq!(3.0, v.initial_value());
    }

    #[test]
    fn reset_also_restores_the_full_enabled_edge_set() {
        let mut v = VariableData::new(0.0, MessageWeight::Std);
        v.add_edge(EdgeId(0));
        v.add_edge(EdgeId(1));
        v.mark_dirty();
        let edges = vec![edge_fixture(true), edge_fixture(false)];
        v.rebuild_enabled(&edges);
        assert_eq!(&[EdgeId(0)], v.enabled_edges());

        v.reset();
        assert_eq!(&[EdgeId(0), EdgeId(1)], v.enabled_edges());
        assert!(!v.needs_rebuild());
    }
}
