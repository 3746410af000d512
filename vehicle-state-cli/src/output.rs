//! Human-readable rendering of parser configurations and decoded state

use vehicle_state_decoder::{BusSpec, NormalizedVehicleState, ParserConfig};

/// Print the three per-bus subscription tables
pub fn print_parser_config(config: &ParserConfig) {
    print_bus_spec("Primary bus", &config.primary);
    match &config.body {
        Some(spec) => print_bus_spec("Secondary (body) bus", spec),
        None => println!("\nSecondary (body) bus: not subscribed\n"),
    }
    print_bus_spec("Camera-relay bus", &config.camera);
}

fn print_bus_spec(title: &str, spec: &BusSpec) {
    println!("\n{} (engine bus {})", title, spec.bus as u8);
    println!("───────────────────────────────────────────────");

    println!("  Signals ({}):", spec.signals.len());
    for request in &spec.signals {
        println!("    {:<16} {}", request.message, request.signal);
    }

    println!("  Liveness checks ({}):", spec.checks.len());
    for check in &spec.checks {
        println!("    {:<16} {:>3} Hz", check.message, check.min_frequency_hz);
    }
}

/// Print a one-line-per-field summary of the decoded state
pub fn print_state(state: &NormalizedVehicleState) {
    println!("Decoded vehicle state");
    println!("───────────────────────────────────────────────");
    println!(
        "  throttle      {:.3} (pressed: {})",
        state.throttle, state.throttle_pressed
    );
    println!("  brake pressed {}", state.brake_pressed);
    println!(
        "  wheel speeds  fl {:.2}  fr {:.2}  rl {:.2}  rr {:.2}",
        state.wheel_speeds.fl, state.wheel_speeds.fr, state.wheel_speeds.rl, state.wheel_speeds.rr
    );
    println!(
        "  speed         raw {:.2}  filtered {:.2}  accel {:.2}  standstill {}",
        state.speed_raw, state.speed, state.accel, state.standstill
    );
    println!(
        "  blinkers      left {}  right {}",
        state.left_blinker, state.right_blinker
    );
    if let (Some(left), Some(right)) = (state.left_blind_spot, state.right_blind_spot) {
        println!("  blind spot    left {}  right {}", left, right);
    }
    println!("  gear          {}", state.gear);
    println!(
        "  steering      angle {:.2} deg  torque {:.1} (pressed: {})",
        state.steering_angle_deg, state.steering_torque, state.steering_pressed
    );
    println!(
        "  steer faults  permanent {}  temporary {:?}",
        state.steer_fault_permanent, state.steer_fault_temporary
    );
    println!(
        "  cruise        enabled {}  available {}  speed {:.2} m/s  non-adaptive {:?}",
        state.cruise.enabled, state.cruise.available, state.cruise.speed, state.cruise.non_adaptive
    );
    println!(
        "  cabin         seatbelt unlatched {}  door open {}",
        state.seatbelt_unlatched, state.door_open
    );
}
