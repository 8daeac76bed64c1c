//! Character Controller
//!
//! This example nests movement states in a hierarchy and drives it from two
//! executors that share one machine: player input through triggers, and
//! physics through polled conditions.
//!
//! Key concepts:
//! - Enter/exit hooks only run below the common ancestor
//! - `is_in_state` versus `is_active_state`
//! - Sharing a machine through `Rc<RefCell<_>>`
//!
//! Run with: RUST_LOG=statecore=trace cargo run --example character_controller

use statecore::{
    BuildError, ConditionalTransitionExecutor, FnState, HierarchicalStateMachine, Transition,
    TriggerTransitionExecutor,
};
use std::cell::Cell;
use std::cell::RefCell;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Pose {
    Root,
    Grounded,
    Standing,
    Crouching,
    Airborne,
    Rising,
    Falling,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Input {
    Jump,
    Crouch,
    Stand,
}

fn announce(pose: Pose) -> FnState {
    FnState::new(
        move || println!("  enter {pose:?}"),
        move || println!("  exit  {pose:?}"),
    )
}

fn main() -> Result<(), BuildError> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    println!("=== Character Controller ===\n");

    let machine = HierarchicalStateMachine::builder(Pose::Root, announce(Pose::Root))
        .add_state(Pose::Root, Pose::Grounded, announce(Pose::Grounded))?
        .add_state(Pose::Grounded, Pose::Standing, announce(Pose::Standing))?
        .add_state(Pose::Grounded, Pose::Crouching, announce(Pose::Crouching))?
        .add_state(Pose::Root, Pose::Airborne, announce(Pose::Airborne))?
        .add_state(Pose::Airborne, Pose::Rising, announce(Pose::Rising))?
        .add_state(Pose::Airborne, Pose::Falling, announce(Pose::Falling))?
        .build();
    let machine = Rc::new(RefCell::new(machine));

    println!("Spawn:");
    machine.borrow_mut().change_state(&Pose::Standing);

    let mut input = TriggerTransitionExecutor::new(Rc::clone(&machine));
    input
        .add(Transition::new(Pose::Standing, Pose::Rising), Input::Jump)?
        .add(Transition::new(Pose::Crouching, Pose::Rising), Input::Jump)?
        .add(Transition::new(Pose::Standing, Pose::Crouching), Input::Crouch)?
        .add(Transition::new(Pose::Crouching, Pose::Standing), Input::Stand)?;

    let velocity = Rc::new(Cell::new(0i32));
    let mut physics = ConditionalTransitionExecutor::new(Rc::clone(&machine));
    {
        let v = Rc::clone(&velocity);
        physics.add(Transition::new(Pose::Rising, Pose::Falling), move || v.get() <= 0)?;
        let v = Rc::clone(&velocity);
        physics.add(Transition::new(Pose::Falling, Pose::Standing), move || v.get() == 0)?;
    }

    println!("\nCrouch (Grounded stays entered):");
    input.execute(&Input::Crouch);
    println!(
        "  in Grounded: {}, active Crouching: {}",
        machine.borrow().is_in_state(&Pose::Grounded),
        machine.borrow().is_active_state(&Pose::Crouching)
    );

    println!("\nJump from a crouch:");
    input.execute(&Input::Jump);

    println!("\nSimulate the arc:");
    for v in [2, 1, 0, -1, -2, 0] {
        velocity.set(v);
        if physics.tick() {
            let active = machine.borrow().active_state_id().copied();
            println!("  velocity {v}: now {active:?}");
        }
    }

    println!("\nJump is ignored mid-air:");
    machine.borrow_mut().change_state(&Pose::Falling);
    let fired = input.execute(&Input::Jump);
    println!("  fired: {fired}");

    println!("\nActive path: {:?}", machine.borrow().active_path());

    println!("\n=== Example Complete ===");
    Ok(())
}
