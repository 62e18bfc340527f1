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

//! The variable-side equality rules. Bound once, as a plain `fn` pointer,
//! into `ObjectiveGraph` at construction time -- see `graph.rs`'s
//! `equality_rule` field -- so the variable sweep never pays for dynamic
//! dispatch.

use crate::{MessageWeight, WeightedValue};

/// ADMM's consensus value: the mean of every `Std`-weighted incoming
/// message. `Zero`-weighted messages are ignored (no information); a
/// `Zero` result (empty input, or every message `Zero`) means "no
/// constraint changed this variable," which the caller reads as "leave
/// the variable's value as it was."
pub(crate) fn admm_rule(incoming: &[WeightedValue]) -> Option<WeightedValue> {
    let (sum, count) = incoming
        .iter()
        .filter(|m| matches!(m.weight, MessageWeight::Std))
        .fold((0.0, 0usize), |(sum, count), m| (sum + m.value, count + 1));

    if count == 0 {
        return None;
    }
    Some(WeightedValue::new(sum / count as f64, MessageWeight::Std))
}

/// TWA's consensus value: the first `Inf`-weighted message short-circuits
/// the scan and wins outright (certainty dominates). Absent any `Inf`,
/// averages over every message that is not `Zero`; if every message
/// *is* `Zero` (no information anywhere), falls back to averaging all of
/// them rather than reporting "no constraint" the way ADMM does -- a TWA
/// variable with only `Zero`-weighted neighbors still has to broadcast
/// something.
pub(crate) fn twa_rule(incoming: &[WeightedValue]) -> Option<WeightedValue> {
    if incoming.is_empty() {
        return None;
    }
    if let Some(certain) = incoming.iter().find(|m| m.weight.is_inf()) {
        return Some(*certain);
    }

    let (nz_sum, nz_count) = incoming
        .iter()
        .filter(|m| !matches!(m.weight, MessageWeight::Zero))
        .fold((0.0, 0usize), |(sum, count), m| (sum + m.value, count + 1));

    if nz_count > 0 {
        Some(WeightedValue::new(nz_sum / nz_count as f64, MessageWeight::Std))
    } else {
        let all_sum: f64 = incoming.iter().map(|m| m.value).sum();
        Some(WeightedValue::new(all_sum / incoming.len() as f64, MessageWeight::Std))
    }
}

/// Debug-only cross-check: scans for a *second* `Inf` message that
/// disagrees with the first, and warns rather than letting the
/// contradiction pass silently. Never called from `twa_rule` itself so
/// release builds never pay for the extra scan; see Open Question 1 in
/// DESIGN.md for why this warns instead of aborting the process.
#[cfg(debug_assertions)]
pub(crate) fn debug_check_twa_conflicts(incoming: &[WeightedValue]) {
    let mut certain = incoming.iter().filter(|m| m.weight.is_inf());
    if let Some(first) = certain.next() {
        for other in certain {
            if (other.value - first.value).abs() > 1e-9 {
                log::warn!(
                    "conflicting INF messages at a variable: {} vs {}",
                    first.value,
                    other.value
                );
            }
        }
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
