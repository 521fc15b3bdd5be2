//! # Manager
//!
//! Fleet-level orchestration. The [`Dispatcher`] owns every [`Elevator`], ingests
//! snapshots, hands new floor calls to cars, rebalances calls held by cars moving away
//! from them, and collects the commands to send.
//!
//! One tick is always, in this order:
//! 1. [`Dispatcher::update`]: every car report is applied, then every new call is assigned.
//! 2. [`Dispatcher::shuffle_requests`]: calls move from cars pointing away to better cars.
//! 3. [`Dispatcher::get_commands`]: each car decides its command.
//!
//! [`Dispatcher::tick`] runs the three steps.

pub mod strategy;
pub mod task_allocator;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::DispatchSettings;
use crate::elevator_logic::Elevator;
use crate::error::DispatchError;
use crate::world_view::{BuildingState, Command, Request};
use strategy::Strategy;
pub use task_allocator::OnTheWayPolicy;

/// Owner of the fleet and of every call assignment.
#[derive(Debug)]
pub struct Dispatcher {
    elevators: Vec<Elevator>,
    strategy: Box<dyn Strategy>,
    on_the_way_policy: OnTheWayPolicy,
    rng: ChaCha8Rng,
    seed: u64,
}

impl Dispatcher {
    /// Builds the fleet described by `settings` with the strategy it names.
    pub fn new(settings: &DispatchSettings) -> Self {
        Self::with_strategy(settings, settings.strategy.build())
    }

    /// Builds the fleet described by `settings`, using `strategy` instead of the one
    /// `settings` names.
    ///
    /// Cars get ids `0..n_els`, start stopped on floor 0, and are then handed to
    /// [`Strategy::init_elevators`].
    pub fn with_strategy(settings: &DispatchSettings, strategy: Box<dyn Strategy>) -> Self {
        let mut elevators: Vec<Elevator> = (0..settings.n_els)
            .map(|id| {
                let mut elevator = Elevator::new(id, settings.n_floors);
                elevator.set_idle_policy(settings.idle_policy);
                elevator
            })
            .collect();
        strategy.init_elevators(&mut elevators);

        let seed = settings.shuffle_seed.unwrap_or_else(rand::random::<u64>);
        Dispatcher {
            elevators,
            strategy,
            on_the_way_policy: settings.on_the_way_policy,
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The fleet, in id order
    pub fn elevators(&self) -> &[Elevator] {
        &self.elevators
    }

    /// The car with `id`, if the fleet has one
    pub fn elevator(&self, id: u8) -> Option<&Elevator> {
        self.elevators.get(id as usize)
    }

    /// The strategy in use
    pub fn strategy(&self) -> &dyn Strategy {
        self.strategy.as_ref()
    }

    /// Seed of the shuffle order, for reproducing a run
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Id of the car holding `request`, if any.
    pub fn owner_of(&self, request: &Request) -> Option<u8> {
        self.elevators
            .iter()
            .find(|e| e.is_request_assigned(request.floor, Some(request.direction)))
            .map(|e| e.id())
    }

    /// Applies a snapshot.
    ///
    /// Report `i` goes to car `i`. All reports are applied before any call is
    /// assigned, so assignment always sees the fresh positions.
    ///
    /// ## Errors
    /// - [`DispatchError::UnknownElevator`] when there are more reports than cars.
    /// - Whatever [`Elevator::update_state`] rejects.
    pub fn update(&mut self, state: &BuildingState) -> Result<(), DispatchError> {
        for (index, report) in state.elevators.iter().enumerate() {
            let elevator = self
                .elevators
                .get_mut(index)
                .ok_or(DispatchError::UnknownElevator { index })?;
            elevator.update_state(report)?;
        }

        for request in &state.requests {
            self.assign_request(*request);
        }
        Ok(())
    }

    /// Hands `request` to a car and returns its id.
    ///
    /// A call already held by some car stays where it is. Otherwise the nearest car on
    /// the way gets it, falling back to the cheapest car by the strategy's metric.
    /// Returns `None` only when the fleet is empty.
    pub fn assign_request(&mut self, request: Request) -> Option<u8> {
        if let Some(owner) = self.owner_of(&request) {
            return Some(owner);
        }

        let chosen = task_allocator::find_elevator_on_the_way(
            &self.elevators,
            &request,
            self.on_the_way_policy,
        )
        .or_else(|| {
            task_allocator::find_elevator_by_metric(&self.elevators, &request, self.strategy.as_ref())
        })?;

        let elevator = &mut self.elevators[chosen];
        elevator.assign_request(request);
        Some(elevator.id())
    }

    /// Moves calls away from cars whose indicated direction points away from them.
    ///
    /// For each such call the other cars are visited in a random order, and the first
    /// one that is stopped or heading for the call's floor takes it over. A call with no
    /// taker stays where it is. Returns the number of calls moved.
    pub fn shuffle_requests(&mut self) -> usize {
        let mut moved = 0;
        for (from, request) in task_allocator::find_misassigned(&self.elevators) {
            let mut scan_order: Vec<usize> =
                (0..self.elevators.len()).filter(|&i| i != from).collect();
            scan_order.shuffle(&mut self.rng);

            let Some(to) =
                task_allocator::find_better_elevator(&self.elevators, &scan_order, &request)
            else {
                continue;
            };
            if let Some(request) =
                self.elevators[from].remove_request(request.floor, Some(request.direction))
            {
                self.elevators[to].assign_request(request);
                moved += 1;
            }
        }
        moved
    }

    /// Each car's command for this tick. Cars with nothing to say are left out.
    pub fn get_commands(&mut self) -> Vec<Command> {
        self.elevators
            .iter_mut()
            .filter_map(|elevator| elevator.get_command())
            .collect()
    }

    /// One full tick: update, shuffle (when the strategy wants it), commands.
    pub fn tick(&mut self, state: &BuildingState) -> Result<Vec<Command>, DispatchError> {
        self.update(state)?;
        if self.strategy.do_shuffle() {
            self.shuffle_requests();
        }
        Ok(self.get_commands())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elevator_logic::IdlePolicy;
    use crate::manager::strategy::StrategyKind;
    use crate::world_view::{Dirn, ElevatorReport, Speed};

    fn req(floor: i32, direction: Dirn) -> Request {
        Request::new(floor, direction).unwrap()
    }

    fn settings(n_els: u8) -> DispatchSettings {
        DispatchSettings {
            n_els,
            n_floors: 10,
            strategy: StrategyKind::Default,
            idle_policy: IdlePolicy::ReturnHome,
            on_the_way_policy: OnTheWayPolicy::IdleOrHeading,
            shuffle_seed: Some(7),
        }
    }

    fn report(id: u8, floor: i32, buttons: &[i32]) -> ElevatorReport {
        ElevatorReport { id: Some(id), floor: Some(floor), buttons_pressed: buttons.to_vec() }
    }

    fn assert_single_owner(dispatcher: &Dispatcher) {
        for elevator in dispatcher.elevators() {
            for request in elevator.requests() {
                let holders = dispatcher
                    .elevators()
                    .iter()
                    .filter(|e| e.requests().contains(request))
                    .count();
                assert_eq!(holders, 1, "{} held by {} cars", request, holders);
            }
        }
    }

    #[test]
    fn builds_the_configured_fleet() {
        let dispatcher = Dispatcher::new(&settings(3));
        assert_eq!(dispatcher.elevators().len(), 3);
        assert_eq!(dispatcher.elevator(2).map(|e| e.id()), Some(2));
        assert!(dispatcher.elevator(3).is_none());
        assert_eq!(dispatcher.seed(), 7);
        assert_eq!(dispatcher.strategy().name(), "default");
    }

    #[test]
    fn split_home_strategy_is_applied_at_construction() {
        let mut s = settings(2);
        s.strategy = StrategyKind::SplitHome;
        let dispatcher = Dispatcher::new(&s);
        assert_eq!(dispatcher.elevators()[0].home_floor(), Some(0));
        assert_eq!(dispatcher.elevators()[1].home_floor(), Some(10));
    }

    #[test]
    fn assignment_is_idempotent_across_the_fleet() {
        let mut dispatcher = Dispatcher::new(&settings(2));
        let first = dispatcher.assign_request(req(3, Dirn::Down));
        let second = dispatcher.assign_request(req(3, Dirn::Down));
        assert_eq!(first, second);
        let total: usize = dispatcher.elevators().iter().map(|e| e.requests().len()).sum();
        assert_eq!(total, 1);
        assert_single_owner(&dispatcher);
    }

    #[test]
    fn metric_fallback_prefers_the_idle_car() {
        let mut s = settings(2);
        s.on_the_way_policy = OnTheWayPolicy::HeadingOnly;
        let mut dispatcher = Dispatcher::new(&s);
        dispatcher.elevators[0].floor = 9;
        dispatcher.elevators[1].floor = 3;
        dispatcher.elevators[1].buttons_pressed = vec![1, 2];
        dispatcher.elevators[1].assign_request(req(0, Dirn::Up));
        dispatcher.elevators[1].assign_request(req(8, Dirn::Down));

        assert_eq!(dispatcher.assign_request(req(5, Dirn::Up)), Some(0));
    }

    #[test]
    fn empty_fleet_assigns_nothing_and_commands_nothing() {
        let mut dispatcher = Dispatcher::new(&settings(0));
        assert_eq!(dispatcher.assign_request(req(5, Dirn::Up)), None);
        assert_eq!(dispatcher.shuffle_requests(), 0);
        assert!(dispatcher.get_commands().is_empty());
    }

    #[test]
    fn update_applies_reports_before_assigning() {
        let mut dispatcher = Dispatcher::new(&settings(2));
        let state = BuildingState {
            elevators: vec![report(0, 0, &[]), report(1, 6, &[])],
            requests: vec![req(5, Dirn::Up)],
            ..Default::default()
        };
        dispatcher.update(&state).unwrap();
        // Car 1 only qualifies as nearest once its new floor is known
        assert_eq!(dispatcher.owner_of(&req(5, Dirn::Up)), Some(1));
    }

    #[test]
    fn update_rejects_bad_reports() {
        let mut dispatcher = Dispatcher::new(&settings(1));

        let extra = BuildingState {
            elevators: vec![report(0, 0, &[]), report(1, 0, &[])],
            ..Default::default()
        };
        assert_eq!(dispatcher.update(&extra), Err(DispatchError::UnknownElevator { index: 1 }));

        let swapped = BuildingState { elevators: vec![report(4, 0, &[])], ..Default::default() };
        assert_eq!(
            dispatcher.update(&swapped),
            Err(DispatchError::IdentityMismatch { expected: 0, found: 4 })
        );

        let anonymous = BuildingState {
            elevators: vec![ElevatorReport::default()],
            ..Default::default()
        };
        assert_eq!(
            dispatcher.update(&anonymous),
            Err(DispatchError::MalformedSnapshot { index: 0 })
        );
    }

    #[test]
    fn shuffle_hands_a_call_behind_a_moving_car_to_a_stopped_one() {
        let mut dispatcher = Dispatcher::new(&settings(3));
        {
            let away = &mut dispatcher.elevators[0];
            away.floor = 5;
            away.speed = Speed::Moving;
            away.direction = Dirn::Up;
            away.assign_request(req(2, Dirn::Up));
        }
        {
            let busy = &mut dispatcher.elevators[1];
            busy.floor = 8;
            busy.speed = Speed::Moving;
            busy.direction = Dirn::Up;
        }
        dispatcher.elevators[2].floor = 1;

        assert_eq!(dispatcher.shuffle_requests(), 1);
        assert_eq!(dispatcher.owner_of(&req(2, Dirn::Up)), Some(2));
        assert_single_owner(&dispatcher);
    }

    #[test]
    fn shuffle_keeps_the_call_when_nobody_is_better_placed() {
        let mut dispatcher = Dispatcher::new(&settings(2));
        for (i, floor) in [(0usize, 5), (1, 7)] {
            let el = &mut dispatcher.elevators[i];
            el.floor = floor;
            el.speed = Speed::Moving;
            el.direction = Dirn::Up;
        }
        dispatcher.elevators[0].assign_request(req(2, Dirn::Down));

        assert_eq!(dispatcher.shuffle_requests(), 0);
        assert_eq!(dispatcher.owner_of(&req(2, Dirn::Down)), Some(0));
    }

    #[test]
    fn shuffle_leaves_no_call_behind_a_car_when_a_taker_exists() {
        let mut dispatcher = Dispatcher::new(&settings(4));
        let calls = [req(0, Dirn::Up), req(1, Dirn::Up), req(2, Dirn::Down), req(9, Dirn::Down)];
        {
            let el = &mut dispatcher.elevators[0];
            el.floor = 5;
            el.speed = Speed::Moving;
            el.direction = Dirn::Up;
            for call in calls {
                el.assign_request(call);
            }
        }
        {
            let el = &mut dispatcher.elevators[3];
            el.floor = 6;
            el.speed = Speed::Moving;
            el.direction = Dirn::Down;
        }

        dispatcher.shuffle_requests();

        let car0 = &dispatcher.elevators()[0];
        assert_eq!(car0.requests(), &[req(9, Dirn::Down)]);
        for call in &calls[..3] {
            assert_ne!(dispatcher.owner_of(call), Some(0));
        }
        assert_single_owner(&dispatcher);
    }

    #[test]
    fn same_seed_same_shuffle() {
        let run = || {
            let mut dispatcher = Dispatcher::new(&settings(5));
            {
                let el = &mut dispatcher.elevators[0];
                el.floor = 5;
                el.speed = Speed::Moving;
                el.direction = Dirn::Up;
                el.assign_request(req(1, Dirn::Up));
                el.assign_request(req(2, Dirn::Up));
            }
            dispatcher.shuffle_requests();
            dispatcher
                .elevators()
                .iter()
                .map(|e| e.requests().to_vec())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn tick_returns_commands_only_for_cars_with_something_to_do() {
        let mut dispatcher = Dispatcher::new(&settings(2));
        let state = BuildingState {
            elevators: vec![report(0, 0, &[4]), report(1, 0, &[])],
            ..Default::default()
        };
        let commands = dispatcher.tick(&state).unwrap();
        assert_eq!(commands, vec![Command { id: 0, direction: Dirn::Up, speed: Speed::Moving }]);
    }
}
