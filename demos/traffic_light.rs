//! Traffic Light State Machine
//!
//! This example drives a flat state machine with discrete triggers.
//!
//! Key concepts:
//! - Cyclic state transitions (states repeat)
//! - One trigger leaving several states
//! - Listeners observing every change
//!
//! Run with: cargo run --example traffic_light

use statecore::{BuildError, FiniteStateMachine, FnState, Transition, TriggerTransitionExecutor};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum TrafficLight {
    Red,
    Yellow,
    Green,
    FlashingYellow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Signal {
    Timer,
    Fault,
    Repaired,
}

fn lamp(name: &'static str) -> FnState {
    FnState::new(
        move || println!("  [{name}] lamp on"),
        move || println!("  [{name}] lamp off"),
    )
}

fn main() -> Result<(), BuildError> {
    println!("=== Traffic Light State Machine ===\n");

    let mut machine = FiniteStateMachine::builder()
        .add_state(TrafficLight::Red, lamp("red"))?
        .add_state(TrafficLight::Yellow, lamp("yellow"))?
        .add_state(TrafficLight::Green, lamp("green"))?
        .add_state(TrafficLight::FlashingYellow, lamp("flashing yellow"))?
        .build();

    machine.subscribe(|change| {
        println!("  changed: {:?} -> {:?}", change.previous, change.active);
    });

    println!("Initial state:");
    machine.change_state(&TrafficLight::Red);

    let mut controller = TriggerTransitionExecutor::new(&mut machine);
    controller
        .add(Transition::new(TrafficLight::Red, TrafficLight::Green), Signal::Timer)?
        .add(Transition::new(TrafficLight::Green, TrafficLight::Yellow), Signal::Timer)?
        .add(Transition::new(TrafficLight::Yellow, TrafficLight::Red), Signal::Timer)?
        .add(
            Transition::new(TrafficLight::Red, TrafficLight::FlashingYellow),
            Signal::Fault,
        )?
        .add(
            Transition::new(TrafficLight::Green, TrafficLight::FlashingYellow),
            Signal::Fault,
        )?
        .add(
            Transition::new(TrafficLight::Yellow, TrafficLight::FlashingYellow),
            Signal::Fault,
        )?
        .add(
            Transition::new(TrafficLight::FlashingYellow, TrafficLight::Red),
            Signal::Repaired,
        )?;

    println!("\nOne full cycle:");
    for _ in 0..3 {
        controller.execute(&Signal::Timer);
    }

    println!("\nFault while green:");
    controller.execute(&Signal::Timer);
    controller.execute(&Signal::Fault);

    println!("\nTimer is ignored while flashing:");
    let fired = controller.execute(&Signal::Timer);
    println!("  fired: {fired}");

    println!("\nRepair:");
    controller.execute(&Signal::Repaired);

    println!("\nKey Characteristics:");
    println!("- Each trigger has at most one transition per source state");
    println!("- Unmatched triggers are silent no-ops");
    println!("- The machine never reaches a final state");

    println!("\n=== Example Complete ===");
    Ok(())
}
