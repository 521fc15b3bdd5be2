//! Picks which car takes which call.
//!
//! Pure functions over a fleet slice; the [`Dispatcher`](super::Dispatcher) applies
//! their answers. Cars are addressed by their index in the slice, which is also their
//! id.
//!
//! ## Assignment
//! 1. **On the way**: cars sorted by distance to the call, nearest first; the first one
//!    that qualifies under the [`OnTheWayPolicy`] takes it.
//! 2. **Metric**: otherwise the car with the lowest strategy cost takes it. Equal
//!    costs go to the lowest id.
//!
//! ## Shuffle
//! A car pointing away from a call it holds gives it up to another car that is
//! stopped or already heading for the call, if there is one.

use crate::elevator_logic::Elevator;
use crate::manager::strategy::Strategy;
use crate::world_view::{Request, Speed};

/// Which cars count as being "on the way" to a new call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnTheWayPolicy {
    /// A car with no buttons and no calls, or one already heading for the call's
    /// floor in the call's direction.
    #[default]
    IdleOrHeading,
    /// Only a car already heading for the call's floor in the call's direction.
    HeadingOnly,
}

/// `true` if `elevator` points at the call's floor and the call wants to go the same way.
fn is_heading_for(elevator: &Elevator, request: &Request) -> bool {
    elevator.is_heading_towards(request.floor) && elevator.direction() == request.direction
}

/// Finds a car that can take `request` without a dedicated trip.
///
/// ## Returns
/// - `Some(index)` of the nearest qualifying car.
/// - `None` if no car qualifies, or the fleet is empty.
pub fn find_elevator_on_the_way(
    elevators: &[Elevator],
    request: &Request,
    policy: OnTheWayPolicy,
) -> Option<usize> {
    let mut by_distance: Vec<usize> = (0..elevators.len()).collect();
    // Stable sort: equal distances stay in id order
    by_distance.sort_by_key(|&i| elevators[i].distance_to(request.floor).abs());

    by_distance.into_iter().find(|&i| {
        let elevator = &elevators[i];
        match policy {
            OnTheWayPolicy::IdleOrHeading => {
                !elevator.has_any_requests() || is_heading_for(elevator, request)
            }
            OnTheWayPolicy::HeadingOnly => is_heading_for(elevator, request),
        }
    })
}

/// Finds the car with the lowest `strategy` cost for `request`.
///
/// Returns `None` only for an empty fleet.
pub fn find_elevator_by_metric(
    elevators: &[Elevator],
    request: &Request,
    strategy: &dyn Strategy,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, elevator) in elevators.iter().enumerate() {
        let cost = strategy.cost_metric(elevator, request);
        // Strictly lower only, so ties stay with the lower id
        if best.map_or(true, |(_, best_cost)| cost.total_cmp(&best_cost).is_lt()) {
            best = Some((i, cost));
        }
    }
    best.map(|(i, _)| i)
}

/// Every `(car index, call)` pair where the car points away from a call it holds.
pub fn find_misassigned(elevators: &[Elevator]) -> Vec<(usize, Request)> {
    elevators
        .iter()
        .enumerate()
        .flat_map(|(i, elevator)| {
            elevator
                .requests()
                .iter()
                .filter(move |r| elevator.is_moving_away_from(r.floor))
                .map(move |r| (i, *r))
        })
        .collect()
}

/// The first car in `scan_order` that is stopped or heading for the call's floor.
pub fn find_better_elevator(
    elevators: &[Elevator],
    scan_order: &[usize],
    request: &Request,
) -> Option<usize> {
    scan_order.iter().copied().find(|&i| {
        let elevator = &elevators[i];
        elevator.speed() == Speed::Stopped || elevator.is_heading_towards(request.floor)
    })
}
