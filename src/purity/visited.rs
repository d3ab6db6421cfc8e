//! Cycle guard for recursive resolution
//!
//! Tracks the functions on the active resolution path. A function found on
//! the path again is a recursion cycle: the resolver answers it with a
//! provisional pure verdict. Every function analyzed while a cycle back to a
//! function *below* it on the path was open depends on that provisional
//! answer, so its own verdict must not be cached. The function that started
//! the cycle is the one whose verdict becomes authoritative.
//!
//! A path cut short by the call depth limit is truncated: the verdict of
//! every function on it depends on how deep the path happened to be when the
//! function was reached, so none of them is cached.

use crate::model::FunctionId;
use std::collections::HashMap;

/// How much a verdict computed on the path can be trusted once its function
/// leaves the path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathOutcome {
    /// Independent of anything still on the path
    Final,
    /// Depended on a provisional verdict for a function still on the path
    Provisional,
    /// Depended on the call depth limit
    Truncated,
}

#[derive(Debug)]
struct Frame {
    function: FunctionId,
    /// Lowest path position reached by a cycle from within this frame
    lowest_cycle_target: Option<usize>,
    truncated: bool,
}

#[derive(Debug, Default)]
pub struct VisitedSet {
    frames: Vec<Frame>,
    positions: HashMap<FunctionId, usize>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, function: FunctionId) -> bool {
        self.positions.contains_key(&function)
    }

    /// Number of functions on the active path
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn enter(&mut self, function: FunctionId) {
        self.positions.insert(function, self.frames.len());
        self.frames.push(Frame {
            function,
            lowest_cycle_target: None,
            truncated: false,
        });
    }

    /// Note that the function on top of the path called back into `function`.
    pub fn record_cycle(&mut self, function: FunctionId) {
        let Some(&target) = self.positions.get(&function) else {
            return;
        };
        if let Some(top) = self.frames.last_mut() {
            top.lowest_cycle_target = Some(
                top.lowest_cycle_target
                    .map_or(target, |lowest| lowest.min(target)),
            );
        }
    }

    /// Note that the function on top of the path made a call past the depth
    /// limit. The mark spreads to every caller as the path unwinds.
    pub fn record_truncation(&mut self) {
        if let Some(top) = self.frames.last_mut() {
            top.truncated = true;
        }
    }

    /// Leave `function`, which must be on top of the path.
    pub fn exit(&mut self, function: FunctionId) -> PathOutcome {
        let Some(frame) = self.frames.pop() else {
            return PathOutcome::Final;
        };
        debug_assert_eq!(frame.function, function, "resolution path out of order");
        self.positions.remove(&frame.function);

        let position = self.frames.len();
        let open_cycle = frame
            .lowest_cycle_target
            .filter(|&lowest| lowest < position);
        if let Some(parent) = self.frames.last_mut() {
            if let Some(lowest) = open_cycle {
                parent.lowest_cycle_target = Some(
                    parent
                        .lowest_cycle_target
                        .map_or(lowest, |current| current.min(lowest)),
                );
            }
            parent.truncated |= frame.truncated;
        }

        if frame.truncated {
            PathOutcome::Truncated
        } else if open_cycle.is_some() {
            PathOutcome::Provisional
        } else {
            PathOutcome::Final
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: FunctionId = FunctionId(0);
    const B: FunctionId = FunctionId(1);
    const C: FunctionId = FunctionId(2);

    #[test]
    fn test_no_cycle_is_final() {
        let mut visited = VisitedSet::new();
        visited.enter(A);
        visited.enter(B);
        assert!(visited.contains(A));
        assert_eq!(visited.exit(B), PathOutcome::Final);
        assert_eq!(visited.exit(A), PathOutcome::Final);
        assert_eq!(visited.depth(), 0);
    }

    #[test]
    fn test_self_recursion_is_final() {
        let mut visited = VisitedSet::new();
        visited.enter(A);
        visited.record_cycle(A);
        assert_eq!(visited.exit(A), PathOutcome::Final);
    }

    #[test]
    fn test_mutual_recursion_only_starter_is_final() {
        let mut visited = VisitedSet::new();
        visited.enter(A);
        visited.enter(B);
        visited.enter(C);
        // C calls back into A
        visited.record_cycle(A);
        assert_eq!(visited.exit(C), PathOutcome::Provisional);
        assert_eq!(visited.exit(B), PathOutcome::Provisional);
        assert_eq!(visited.exit(A), PathOutcome::Final);
        assert!(!visited.contains(A));
    }

    #[test]
    fn test_cycle_to_middle_frame() {
        let mut visited = VisitedSet::new();
        visited.enter(A);
        visited.enter(B);
        visited.enter(C);
        // C calls back into B, A is unaffected
        visited.record_cycle(B);
        assert_eq!(visited.exit(C), PathOutcome::Provisional);
        assert_eq!(visited.exit(B), PathOutcome::Final);
        assert_eq!(visited.exit(A), PathOutcome::Final);
    }

    #[test]
    fn test_truncation_reaches_every_caller() {
        let mut visited = VisitedSet::new();
        visited.enter(A);
        visited.enter(B);
        visited.enter(C);
        visited.record_truncation();
        assert_eq!(visited.exit(C), PathOutcome::Truncated);
        assert_eq!(visited.exit(B), PathOutcome::Truncated);
        assert_eq!(visited.exit(A), PathOutcome::Truncated);
    }

    #[test]
    fn test_truncation_wins_over_cycle() {
        let mut visited = VisitedSet::new();
        visited.enter(A);
        visited.enter(B);
        visited.record_cycle(A);
        visited.record_truncation();
        assert_eq!(visited.exit(B), PathOutcome::Truncated);
        assert_eq!(visited.exit(A), PathOutcome::Truncated);
    }
}
