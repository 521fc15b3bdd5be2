//! Pluggable dispatch strategies.
//!
//! A [`Strategy`] decides two things the dispatcher itself has no opinion on: how
//! expensive it is to hand a call to a given car, and how the fleet is set up before
//! the first tick (home floors, mostly). The dispatcher holds exactly one strategy for
//! its lifetime.

use std::fmt;

use clap::ValueEnum;

use crate::elevator_logic::Elevator;
use crate::world_view::Request;

/// Cost and initialization hooks used by the [`Dispatcher`](super::Dispatcher).
pub trait Strategy: fmt::Debug + Send {
    /// Short name for status output.
    fn name(&self) -> &'static str;

    /// One-time setup of the fleet, run when the dispatcher is built.
    fn init_elevators(&self, _elevators: &mut [Elevator]) {}

    /// Cost of assigning `request` to `elevator`. Lower is better.
    fn cost_metric(&self, elevator: &Elevator, request: &Request) -> f64 {
        congestion_cost(elevator, request)
    }

    /// Whether the dispatcher runs the shuffle pass every tick.
    fn do_shuffle(&self) -> bool {
        true
    }
}

/// Distance to the call, weighted by how busy the car already is.
///
/// `|distance| * (1 + (requests + buttons)^2)`. The squared load term makes a busy car
/// lose against an idle one even when it is a lot closer.
pub fn congestion_cost(elevator: &Elevator, request: &Request) -> f64 {
    let load = (elevator.requests().len() + elevator.buttons_pressed().len()) as f64;
    let distance = elevator.distance_to(request.floor).abs() as f64;
    distance * (1.0 + load * load)
}

/// Every car parks on the ground floor. Cost is [`congestion_cost`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStrategy;

impl Strategy for DefaultStrategy {
    fn name(&self) -> &'static str {
        "default"
    }
}

/// Half the fleet parks on the ground floor, the other half on the top floor.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplitHomeStrategy;

impl Strategy for SplitHomeStrategy {
    fn name(&self) -> &'static str {
        "split_home"
    }

    fn init_elevators(&self, elevators: &mut [Elevator]) {
        let half = elevators.len() / 2;
        for elevator in elevators.iter_mut() {
            let home = if (elevator.id() as usize) < half { 0 } else { elevator.n_floors() };
            elevator.set_home_floor(Some(home));
        }
    }
}

/// Strategy selection by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StrategyKind {
    /// [`DefaultStrategy`]
    #[default]
    Default,
    /// [`SplitHomeStrategy`]
    #[value(alias = "split_home")]
    SplitHome,
}

impl StrategyKind {
    /// Builds the selected strategy.
    pub fn build(self) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Default => Box::new(DefaultStrategy),
            StrategyKind::SplitHome => Box::new(SplitHomeStrategy),
        }
    }
}
