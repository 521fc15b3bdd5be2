//! ## Printing Module
//!
//! Makes the terminal log easier to read. Every line is tagged and coloured by
//! category, and each category can be switched off through the flags in
//! [`config`]. Also provides a table view of the fleet for step mode.
use crate::{
    config::{self, Plan},
    manager::Dispatcher,
    world_view::{BuildingState, Command, Dirn, Speed},
};
use ansi_term::Colour::{self, Cyan, Green, Purple, Red, White, Yellow};

use unicode_width::UnicodeWidthStr;

/// Prints a message in a specified color to the terminal.
///
/// Gated by `PRINT_ELSE_ON`.
///
/// ## Terminal output
/// - "\[CUSTOM\]:  {}", msg
pub fn color(msg: String, color: Colour) {
    if config::flag(&config::PRINT_ELSE_ON) {
        println!("{}{}\n", color.paint("[CUSTOM]:  "), color.paint(msg));
    }
}

/// Prints an error message in red to the terminal.
///
/// Gated by `PRINT_ERR_ON`.
///
/// ## Terminal output
/// - "\[ERROR\]:   {}", msg
///
/// ## Example
/// ```
/// use liftdispatch::print;
///
/// print::err("Something went wrong!".to_string());
/// ```
pub fn err(msg: String) {
    if config::flag(&config::PRINT_ERR_ON) {
        println!("{}{}\n", Red.paint("[ERROR]:   "), Red.paint(msg));
    }
}

/// Prints a warning message in yellow to the terminal.
///
/// Gated by `PRINT_WARN_ON`.
///
/// ## Terminal output
/// - "\[WARNING\]: {}", msg
pub fn warn(msg: String) {
    if config::flag(&config::PRINT_WARN_ON) {
        println!("{}{}\n", Yellow.paint("[WARNING]: "), Yellow.paint(msg));
    }
}

/// Prints a success message in green to the terminal.
///
/// Gated by `PRINT_OK_ON`.
///
/// ## Terminal output
/// - "\[OK\]:      {}", msg
pub fn ok(msg: String) {
    if config::flag(&config::PRINT_OK_ON) {
        println!("{}{}\n", Green.paint("[OK]:      "), Green.paint(msg));
    }
}

/// Prints an informational message in light blue to the terminal.
///
/// Gated by `PRINT_INFO_ON`.
///
/// ## Terminal output
/// - "\[INFO\]:    {}", msg
pub fn info(msg: String) {
    let light_blue = Colour::RGB(102, 178, 255);
    if config::flag(&config::PRINT_INFO_ON) {
        println!("{}{}\n", light_blue.paint("[INFO]:    "), light_blue.paint(msg));
    }
}

/// Prints the commands about to be sent, one per line.
pub fn commands(commands: &[Command]) {
    if !config::flag(&config::PRINT_ELSE_ON) {
        return;
    }
    println!("{}", Purple.paint("--- Commands ---"));
    if commands.is_empty() {
        println!("  (none)");
    }
    for command in commands {
        println!("  {}", command);
    }
    println!();
}

/// Prints `Iteration cnt/n_iters` every [`config::LOOP_PRINT_EVERY`] iterations.
pub fn loop_counter(cnt: u32, n_iters: u32) {
    if cnt % config::LOOP_PRINT_EVERY == 0 && config::flag(&config::PRINT_ELSE_ON) {
        println!("{}", White.bold().paint(format!("Iteration {}/{}", cnt, n_iters)));
    }
}

/// Prints the banner shown before the first round.
pub fn simulation_header(plan: &Plan, strategy: &str, seed: u64) {
    info(format!(
        "Starting BoxLift simulation\n           plan: {} ({} elevators, {} floors, {} iterations)\n           strategy: {}, shuffle seed: {}",
        plan.name, plan.n_els, plan.n_floors, plan.n_iters, strategy, seed
    ));
}

/// Prints the score once the server reports the game as finished.
pub fn simulation_results(state: &BuildingState) {
    let score = state
        .score
        .as_ref()
        .map(|score| score.to_string())
        .unwrap_or_else(|| "none".to_string());
    ok(format!("Simulation finished. Score: {}", score));
    if let Some(code) = &state.event_code {
        ok(format!("You won something! Event code: {}", code));
    }
}

/// Pads the input text to a fixed display width using spaces.
///
/// Accounts for characters that take more than one column, so the table borders
/// stay aligned.
fn pad_text(text: &str, width: usize) -> String {
    let visible_width = UnicodeWidthStr::width(text);
    let padding = width.saturating_sub(visible_width);
    format!("{}{}", text, " ".repeat(padding))
}

/// Pads first, then paints, so escape codes do not count towards the width.
fn painted(colour: Colour, text: &str, width: usize) -> String {
    colour.paint(pad_text(text, width)).to_string()
}

fn motion_label(speed: Speed, direction: Dirn) -> (Colour, &'static str) {
    match (speed, direction) {
        (Speed::Stopped, Dirn::Stop) => (Green, "Idle"),
        (Speed::Stopped, Dirn::Up) => (Green, "Halted ↑"),
        (Speed::Stopped, Dirn::Down) => (Green, "Halted ↓"),
        (Speed::Moving, Dirn::Up) => (Yellow, "Moving ↑"),
        (Speed::Moving, Dirn::Down) => (Yellow, "Moving ↓"),
        (Speed::Moving, Dirn::Stop) => (Red, "Moving ?"),
    }
}

fn join<T: ToString>(items: &[T]) -> String {
    items.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
}

/// Logs the fleet as a table: position, motion, home, lit buttons and held calls of
/// every car.
///
/// Gated by `PRINT_STATUS_ON`. Meant for step mode; printing it every round at full
/// speed floods the terminal.
pub fn fleet(dispatcher: &Dispatcher) {
    if !config::flag(&config::PRINT_STATUS_ON) {
        return;
    }

    println!("{}", Cyan.bold().paint("┌────────────────────────────────┐"));
    println!("{}", Cyan.bold().paint("│          FLEET STATUS          │"));
    println!("{}", Cyan.bold().paint("└────────────────────────────────┘"));

    println!("┌──────┬───────┬────────────┬──────┬──────────────────┬──────────────────────────┐");
    println!(
        "{}",
        White.bold().paint("│ ID   │ Floor │ Motion     │ Home │ Buttons          │ Calls                    │")
    );
    println!("├──────┼───────┼────────────┼──────┼──────────────────┼──────────────────────────┤");

    for elevator in dispatcher.elevators() {
        let (colour, label) = motion_label(elevator.speed(), elevator.direction());
        let home = elevator
            .home_floor()
            .map(|h| h.to_string())
            .unwrap_or_else(|| "-".to_string());
        let calls: Vec<String> = elevator.requests().iter().map(ToString::to_string).collect();

        println!(
            "│ {} │ {} │ {} │ {} │ {} │ {} │",
            pad_text(&elevator.id().to_string(), 4),
            pad_text(&elevator.floor().to_string(), 5),
            painted(colour, label, 10),
            pad_text(&home, 4),
            pad_text(&join(elevator.buttons_pressed()), 16),
            pad_text(&calls.join(" "), 24),
        );
    }

    println!("└──────┴───────┴────────────┴──────┴──────────────────┴──────────────────────────┘");
    println!();
}
