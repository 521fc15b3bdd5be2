//! # config.rs – Centralized Parameter Store
//!
//! Static program parameters: where the BoxLift server lives, how often the driver
//! polls it, which building plans exist, and which terminal prints are enabled.

use std::sync::Mutex;
use std::time::Duration;
use once_cell::sync::Lazy;

use crate::elevator_logic::IdlePolicy;
use crate::manager::strategy::StrategyKind;
use crate::manager::OnTheWayPolicy;

//
// ──────────────────────────────────────────────────────────────
//   1. SERVER SETTINGS
// ──────────────────────────────────────────────────────────────
//

/// Base address of the BoxLift server
pub static HOST: &str = "http://codelift.org";

/// Path of the building collection. A game lives at `{BUILDINGS_PATH}/{id}`
pub static BUILDINGS_PATH: &str = "/v1/buildings";

/// Event the runs are entered into
pub static EVENT_NAME: &str = "pycon2015";

/// Environment variable holding the bot name shown on the leader board
pub static ENV_USERNAME: &str = "BOXLIFT_USERNAME";

/// Environment variable holding the contact email
pub static ENV_EMAIL: &str = "BOXLIFT_EMAIL";

/// Environment variable holding the event registration id. Optional
pub static ENV_REGISTRATION_ID: &str = "BOXLIFT_REGISTRATION_ID";

//
// ──────────────────────────────────────────────────────────────
//   2. TIMING
// ──────────────────────────────────────────────────────────────
//

/// Pause between two command rounds
pub const POLL_PERIOD: Duration = Duration::from_millis(100);

/// Timeout for a single HTTP round trip
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Attempts at sending one command round before giving up
pub const SEND_RETRIES: u32 = 5;

/// Delay between two send attempts
pub const RETRY_DELAY: Duration = Duration::from_millis(500);

/// The loop counter is printed every this many iterations
pub const LOOP_PRINT_EVERY: u32 = 5;

//
// ──────────────────────────────────────────────────────────────
//   3. BUILDING PLANS
// ──────────────────────────────────────────────────────────────
//

/// A building layout offered by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    /// Name the server knows the plan by
    pub name: &'static str,
    /// Number of elevators
    pub n_els: u8,
    /// Top floor
    pub n_floors: i32,
    /// Command rounds until the game finishes
    pub n_iters: u32,
}

/// Every known plan
pub static PLANS: [Plan; 2] = [
    Plan { name: "training_1", n_els: 2, n_floors: 10, n_iters: 30 },
    Plan { name: "training_2", n_els: 4, n_floors: 20, n_iters: 40 },
];

impl Plan {
    /// Looks a plan up by its server name.
    pub fn by_name(name: &str) -> Option<Plan> {
        PLANS.iter().copied().find(|plan| plan.name == name)
    }

    /// Comma separated list of plan names, for error messages
    pub fn names() -> String {
        PLANS.iter().map(|plan| plan.name).collect::<Vec<_>>().join(", ")
    }
}

//
// ──────────────────────────────────────────────────────────────
//   4. DISPATCH SETTINGS
// ──────────────────────────────────────────────────────────────
//

/// Everything the [`Dispatcher`](crate::manager::Dispatcher) needs to build its fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSettings {
    /// Number of elevators
    pub n_els: u8,
    /// Top floor
    pub n_floors: i32,
    /// Cost function and fleet setup
    pub strategy: StrategyKind,
    /// What idle cars do
    pub idle_policy: IdlePolicy,
    /// Which cars may pick up a new call on the way
    pub on_the_way_policy: OnTheWayPolicy,
    /// Seed for the shuffle order. Entropy when `None`
    pub shuffle_seed: Option<u64>,
}

impl DispatchSettings {
    /// Default settings for the building in `plan`.
    pub fn for_plan(plan: &Plan) -> Self {
        DispatchSettings {
            n_els: plan.n_els,
            n_floors: plan.n_floors,
            strategy: StrategyKind::default(),
            idle_policy: IdlePolicy::default(),
            on_the_way_policy: OnTheWayPolicy::default(),
            shuffle_seed: None,
        }
    }
}

//
// ──────────────────────────────────────────────────────────────
//   5. LOGGING CONFIGURATION
// ──────────────────────────────────────────────────────────────
//

/// Enable/disable printing of the fleet status table
pub static PRINT_STATUS_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of errors
pub static PRINT_ERR_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of warnings
pub static PRINT_WARN_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of success messages
pub static PRINT_OK_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of general info
pub static PRINT_INFO_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable miscellaneous prints (commands, loop counter)
pub static PRINT_ELSE_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Reads a print flag. A poisoned lock still holds a valid `bool`.
pub fn flag(flag: &Mutex<bool>) -> bool {
    match flag.lock() {
        Ok(on) => *on,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// Sets a print flag.
pub fn set_flag(flag: &Mutex<bool>, on: bool) {
    match flag.lock() {
        Ok(mut guard) => *guard = on,
        Err(poisoned) => *poisoned.into_inner() = on,
    }
}
