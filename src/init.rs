//! # Startup
//!
//! Command line parsing, credentials and print-flag setup. Everything here runs once,
//! before the first command round.

use std::env;

use anyhow::{bail, Context, Result};
use clap::Parser;

use crate::config::{self, DispatchSettings, Plan};
use crate::elevator_logic::IdlePolicy;
use crate::manager::strategy::StrategyKind;
use crate::manager::OnTheWayPolicy;

/// Elevator dispatcher for the BoxLift simulation
#[derive(Debug, Clone, Parser)]
#[command(name = "liftdispatch", version, about)]
pub struct Args {
    /// The plan to use for the simulation
    #[arg(default_value = "training_1")]
    pub plan: String,

    /// Step mode: print the fleet and wait for Enter before every round. Implies --sandbox
    #[arg(short, long)]
    pub debug: bool,

    /// Log every API request and response
    #[arg(short, long)]
    pub verbose: bool,

    /// Stay off the leader board; tokens do not expire
    #[arg(short, long)]
    pub sandbox: bool,

    /// Cost function and fleet setup
    #[arg(long, value_enum, default_value_t = StrategyKind::Default)]
    pub strategy: StrategyKind,

    /// Idle cars stay where they are instead of returning home
    #[arg(long)]
    pub stay_put: bool,

    /// Only cars already heading for a call may pick it up on the way
    #[arg(long)]
    pub heading_only: bool,

    /// Seed for the call shuffle order, for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parses the process arguments. Debug mode switches sandbox on.
    pub fn parse_normalized() -> Self {
        Self::parse().normalized()
    }

    /// Applies the implications between flags.
    pub fn normalized(mut self) -> Self {
        if self.debug {
            self.sandbox = true;
        }
        self
    }

    /// The plan named on the command line.
    ///
    /// ## Errors
    /// The name is not a known plan.
    pub fn plan(&self) -> Result<Plan> {
        match Plan::by_name(&self.plan) {
            Some(plan) => Ok(plan),
            None => bail!("no plan exists for name {:?} (known: {})", self.plan, Plan::names()),
        }
    }

    /// Dispatcher settings for `plan` with the policies chosen on the command line.
    pub fn dispatch_settings(&self, plan: &Plan) -> DispatchSettings {
        DispatchSettings {
            strategy: self.strategy,
            idle_policy: if self.stay_put { IdlePolicy::StayPut } else { IdlePolicy::ReturnHome },
            on_the_way_policy: if self.heading_only {
                OnTheWayPolicy::HeadingOnly
            } else {
                OnTheWayPolicy::IdleOrHeading
            },
            shuffle_seed: self.seed,
            ..DispatchSettings::for_plan(plan)
        }
    }
}

/// Sets the print flags in [`config`] from the command line.
///
/// `--quiet` leaves only errors. The fleet table is only printed in step mode.
pub fn apply_print_flags(args: &Args) {
    let loud = !args.quiet;
    config::set_flag(&config::PRINT_ERR_ON, true);
    config::set_flag(&config::PRINT_WARN_ON, loud);
    config::set_flag(&config::PRINT_OK_ON, loud);
    config::set_flag(&config::PRINT_INFO_ON, loud);
    config::set_flag(&config::PRINT_ELSE_ON, loud);
    config::set_flag(&config::PRINT_STATUS_ON, loud && args.debug);
}

/// Who is playing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Bot name
    pub username: String,
    /// Contact email
    pub email: String,
    /// Event registration id, may be empty
    pub registration_id: String,
}

impl Credentials {
    /// Reads the credentials from the environment.
    ///
    /// ## Errors
    /// Username or email is unset or empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .with_context(|| format!("environment variable {} is not set", key))
        };

        Ok(Credentials {
            username: required(config::ENV_USERNAME)?,
            email: required(config::ENV_EMAIL)?,
            registration_id: lookup(config::ENV_REGISTRATION_ID).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn debug_implies_sandbox() {
        let args = Args::parse_from(["liftdispatch", "-d", "training_2"]).normalized();
        assert!(args.sandbox);
        assert_eq!(args.plan().unwrap().n_els, 4);
    }

    #[test]
    fn defaults() {
        let args = Args::parse_from(["liftdispatch"]).normalized();
        assert_eq!(args.plan, "training_1");
        assert!(!args.sandbox);
        let settings = args.dispatch_settings(&args.plan().unwrap());
        assert_eq!(settings.strategy, StrategyKind::Default);
        assert_eq!(settings.idle_policy, IdlePolicy::ReturnHome);
        assert_eq!(settings.on_the_way_policy, OnTheWayPolicy::IdleOrHeading);
    }

    #[test]
    fn policies_and_seed_reach_the_settings() {
        let args = Args::parse_from([
            "liftdispatch",
            "--strategy",
            "split_home",
            "--stay-put",
            "--heading-only",
            "--seed",
            "42",
        ]);
        let settings = args.dispatch_settings(&args.plan().unwrap());
        assert_eq!(settings.strategy, StrategyKind::SplitHome);
        assert_eq!(settings.idle_policy, IdlePolicy::StayPut);
        assert_eq!(settings.on_the_way_policy, OnTheWayPolicy::HeadingOnly);
        assert_eq!(settings.shuffle_seed, Some(42));
        assert_eq!(settings.n_floors, 10);
    }

    #[test]
    fn unknown_plan_is_an_error() {
        let args = Args::parse_from(["liftdispatch", "Training1"]);
        let err = args.plan().unwrap_err().to_string();
        assert!(err.contains("training_1, training_2"), "{}", err);
    }

    #[test]
    fn credentials_need_username_and_email() {
        let vars: HashMap<&str, &str> =
            [("BOXLIFT_USERNAME", "bot"), ("BOXLIFT_EMAIL", "bot@example.com")].into();
        let creds = Credentials::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(creds.username, "bot");
        assert_eq!(creds.registration_id, "");

        let err = Credentials::from_lookup(|k| {
            (k == "BOXLIFT_USERNAME").then(|| "bot".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("BOXLIFT_EMAIL"));
    }
}
