//! Property-based tests for machines and executors.
//!
//! These tests use proptest to build random trees and drive random sequences
//! of state changes through them.

use proptest::prelude::*;
use proptest::sample::Index;
use statecore::{
    ConditionalTransitionExecutor, FnState, HierarchicalStateMachine, State, Transition,
};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Hook {
    Enter(usize),
    Exit(usize),
}

type Log = Rc<RefCell<Vec<Hook>>>;

struct Tracked {
    id: usize,
    log: Log,
}

impl State for Tracked {
    fn enter(&mut self) {
        self.log.borrow_mut().push(Hook::Enter(self.id));
    }

    fn exit(&mut self) {
        self.log.borrow_mut().push(Hook::Exit(self.id));
    }
}

/// Node `i + 1` hangs under a node picked from `0..=i`, so any parent list
/// yields a valid tree rooted at 0.
fn build(parents: &[Index], log: &Log) -> HierarchicalStateMachine<usize, Tracked> {
    let tracked = |id| Tracked {
        id,
        log: Rc::clone(log),
    };

    let mut builder = HierarchicalStateMachine::builder(0, tracked(0));
    for (i, parent) in parents.iter().enumerate() {
        let id = i + 1;
        builder = builder
            .add_state(parent.index(id), id, tracked(id))
            .expect("parent is always registered first");
    }
    builder.build()
}

fn ancestors_of(machine: &HierarchicalStateMachine<usize, Tracked>, id: usize) -> Vec<usize> {
    let mut chain = vec![id];
    let mut current = id;
    while let Some(&parent) = machine.parent_id(&current) {
        chain.push(parent);
        current = parent;
    }
    chain
}

prop_compose! {
    fn arbitrary_tree()(parents in prop::collection::vec(any::<Index>(), 0..12)) -> Vec<Index> {
        parents
    }
}

proptest! {
    #[test]
    fn entered_states_match_active_path(
        parents in arbitrary_tree(),
        targets in prop::collection::vec(any::<Index>(), 1..30),
    ) {
        let log = Log::default();
        let mut machine = build(&parents, &log);
        let size = machine.len();

        for target in targets {
            machine.change_state(&target.index(size));
        }

        let mut balance = vec![0i64; size];
        for hook in log.borrow().iter() {
            match *hook {
                Hook::Enter(id) => balance[id] += 1,
                Hook::Exit(id) => balance[id] -= 1,
            }
        }

        let entered: BTreeSet<usize> = (0..size).filter(|&id| balance[id] > 0).collect();
        let active: BTreeSet<usize> = machine.active_path().into_iter().copied().collect();
        prop_assert!(balance.iter().all(|&b| b == 0 || b == 1));
        prop_assert_eq!(entered, active);
    }

    #[test]
    fn lowest_common_ancestor_is_symmetric(
        parents in arbitrary_tree(),
        a in any::<Index>(),
        b in any::<Index>(),
    ) {
        let log = Log::default();
        let machine = build(&parents, &log);
        let (a, b) = (a.index(machine.len()), b.index(machine.len()));

        let ab = machine.lowest_common_ancestor(&a, &b);
        prop_assert!(ab.is_some());
        prop_assert_eq!(ab, machine.lowest_common_ancestor(&b, &a));

        let ancestor = *ab.unwrap();
        prop_assert!(ancestors_of(&machine, a).contains(&ancestor));
        prop_assert!(ancestors_of(&machine, b).contains(&ancestor));
    }

    #[test]
    fn change_to_active_state_is_silent(
        parents in arbitrary_tree(),
        target in any::<Index>(),
    ) {
        let log = Log::default();
        let mut machine = build(&parents, &log);
        let target = target.index(machine.len());
        let notified = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&notified);
        machine.subscribe(move |_| *counter.borrow_mut() += 1);

        prop_assert!(machine.change_state(&target));
        log.borrow_mut().clear();

        prop_assert!(!machine.change_state(&target));
        prop_assert!(log.borrow().is_empty());
        prop_assert_eq!(*notified.borrow(), 1);
    }

    #[test]
    fn shared_ancestors_are_never_touched(
        parents in arbitrary_tree(),
        a in any::<Index>(),
        b in any::<Index>(),
    ) {
        let log = Log::default();
        let mut machine = build(&parents, &log);
        let (a, b) = (a.index(machine.len()), b.index(machine.len()));
        prop_assume!(a != b);

        machine.change_state(&a);
        log.borrow_mut().clear();
        prop_assert!(machine.change_state(&b));

        let shared = ancestors_of(&machine, *machine.lowest_common_ancestor(&a, &b).unwrap());
        let hooks = log.borrow().clone();
        for hook in &hooks {
            let (Hook::Enter(id) | Hook::Exit(id)) = *hook;
            prop_assert!(!shared.contains(&id));
        }

        // Exits run deepest first, then enters run shallowest first.
        let depth = |id: usize| machine.depth_of(&id).unwrap();
        let exits: Vec<usize> = hooks
            .iter()
            .filter_map(|h| if let Hook::Exit(id) = h { Some(depth(*id)) } else { None })
            .collect();
        let enters: Vec<usize> = hooks
            .iter()
            .filter_map(|h| if let Hook::Enter(id) = h { Some(depth(*id)) } else { None })
            .collect();
        let first_enter = hooks.iter().position(|h| matches!(h, Hook::Enter(_)));
        let last_exit = hooks.iter().rposition(|h| matches!(h, Hook::Exit(_)));
        if let (Some(first_enter), Some(last_exit)) = (first_enter, last_exit) {
            prop_assert!(last_exit < first_enter);
        }
        prop_assert!(exits.windows(2).all(|w| w[0] > w[1]));
        prop_assert!(enters.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn active_state_implies_in_state(
        parents in arbitrary_tree(),
        target in any::<Index>(),
    ) {
        let log = Log::default();
        let mut machine = build(&parents, &log);
        let target = target.index(machine.len());
        machine.change_state(&target);

        let path = ancestors_of(&machine, target);
        for id in 0..machine.len() {
            if machine.is_active_state(&id) {
                prop_assert!(machine.is_in_state(&id));
            }
            prop_assert_eq!(machine.is_in_state(&id), path.contains(&id));
            prop_assert_eq!(machine.is_active_state(&id), id == target);
        }
    }

    #[test]
    fn fresh_machine_reports_nothing_active(parents in arbitrary_tree()) {
        let log = Log::default();
        let machine = build(&parents, &log);

        for id in 0..machine.len() {
            prop_assert!(!machine.is_in_state(&id));
            prop_assert!(!machine.is_active_state(&id));
        }
    }

    #[test]
    fn first_true_condition_wins(results in prop::collection::vec(any::<bool>(), 1..8)) {
        let mut builder = statecore::FiniteStateMachine::builder()
            .add_state(0usize, FnState::noop())
            .unwrap();
        for id in 1..=results.len() {
            builder = builder.add_state(id, FnState::noop()).unwrap();
        }
        let mut machine = builder.build();
        machine.change_state(&0);

        let mut executor = ConditionalTransitionExecutor::new(&mut machine);
        for (i, &result) in results.iter().enumerate() {
            executor.add(Transition::new(0, i + 1), move || result).unwrap();
        }

        let fired = executor.tick();
        let expected = results.iter().position(|&r| r).map(|i| i + 1);
        prop_assert_eq!(fired, expected.is_some());
        prop_assert_eq!(machine.active_state_id().copied(), Some(expected.unwrap_or(0)));
    }
}
