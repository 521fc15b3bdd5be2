use std::process::ExitCode;

use ansi_term::Colour;
use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use liftdispatch::config;
use liftdispatch::init::{self, Args, Credentials};
use liftdispatch::manager::Dispatcher;
use liftdispatch::network::BoxLift;
use liftdispatch::print;
use liftdispatch::world_view::{BuildingState, Command};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse_normalized();
    init::apply_print_flags(&args);

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print::err(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<()> {
    let plan = args.plan()?;
    let credentials = Credentials::from_env()?;
    let mut dispatcher = Dispatcher::new(&args.dispatch_settings(&plan));

    let mut lift = BoxLift::connect(&credentials, &plan, args.sandbox, args.verbose)
        .await
        .context("could not start a game")?;
    print::ok(format!("Connected to game {} ({})", lift.game_id(), lift.status()));
    print::color(format!("visualization url: {}", lift.visualization_url()), Colour::Cyan);

    let state = send_with_retry(&mut lift, &[])
        .await
        .context("could not fetch the first building state")?;
    let mut commands = next_commands(&mut dispatcher, &state)?;

    print::simulation_header(&plan, dispatcher.strategy().name(), dispatcher.seed());

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut loop_counter: u32 = 0;
    loop {
        loop_counter += 1;
        print::loop_counter(loop_counter, plan.n_iters);

        if args.debug {
            print::fleet(&dispatcher);
            print::commands(&commands);
            println!(" --- Continue ---");
            stdin.next_line().await.context("failed to read from stdin")?;
        }

        let state = send_with_retry(&mut lift, &commands).await?;
        if state.is_finished() {
            print::simulation_results(&state);
            return Ok(());
        }

        commands = next_commands(&mut dispatcher, &state)?;
        tokio::time::sleep(config::POLL_PERIOD).await;
    }
}

/// Runs one dispatch tick. Dispatch errors end the run.
fn next_commands(dispatcher: &mut Dispatcher, state: &BuildingState) -> Result<Vec<Command>> {
    dispatcher.tick(state).context("dispatch failed")
}

/// Sends `commands`, retrying transport failures and error states up to
/// [`config::SEND_RETRIES`] times. No commands is a plain state fetch.
async fn send_with_retry(lift: &mut BoxLift, commands: &[Command]) -> Result<BuildingState> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        let outcome = if commands.is_empty() {
            lift.get_building_state().await
        } else {
            lift.send_commands(commands).await
        };

        let reason = match outcome {
            Ok(state) if !state.is_error() => return Ok(state),
            Ok(state) => state.message.unwrap_or_else(|| "unknown server error".to_string()),
            Err(e) => format!("{:#}", e),
        };

        if attempt >= config::SEND_RETRIES {
            anyhow::bail!("giving up after {} attempts: {}", attempt, reason);
        }
        print::warn(format!(
            "send attempt {}/{} failed: {}",
            attempt,
            config::SEND_RETRIES,
            reason
        ));
        tokio::time::sleep(config::RETRY_DELAY).await;
    }
}
