//! # Elevator logic
//!
//! State and decision rule for a single car.
//!
//! An [`Elevator`] knows where it is, which cabin buttons are lit, which floor calls it
//! has accepted, and what it last told the server to do. Every tick the dispatcher
//! asks it for a [`Command`](crate::world_view::Command) through
//! [`Elevator::get_command`] (see [`fsm`]).
//!
//! ## Overview
//! - **mod.rs**: the elevator state, request bookkeeping and snapshot updates.
//! - **request**: queries over held requests and buttons (closest, furthest, sorted).
//! - **fsm**: the per-tick decision rule.

pub mod fsm;
pub mod request;

use crate::error::DispatchError;
use crate::world_view::{Dirn, ElevatorReport, Request, Speed};

/// What a car with nothing to do should do when it is away from home.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdlePolicy {
    /// Drive back to the home floor.
    #[default]
    ReturnHome,
    /// Stay where the last call left it.
    StayPut,
}

/// One car, its accepted calls, and the motion it last commanded.
#[derive(Debug, Clone, PartialEq)]
pub struct Elevator {
    pub(crate) id: u8,
    pub(crate) n_floors: i32,
    pub(crate) floor: i32,
    pub(crate) speed: Speed,
    pub(crate) direction: Dirn,
    pub(crate) buttons_pressed: Vec<i32>,
    pub(crate) requests: Vec<Request>,
    pub(crate) home_floor: Option<i32>,
    pub(crate) idle_policy: IdlePolicy,
}

impl Elevator {
    /// A stopped car on the ground floor, homed there, with no calls.
    pub fn new(id: u8, n_floors: i32) -> Self {
        Elevator {
            id,
            n_floors,
            floor: 0,
            speed: Speed::Stopped,
            direction: Dirn::Stop,
            buttons_pressed: Vec::new(),
            requests: Vec::new(),
            home_floor: Some(0),
            idle_policy: IdlePolicy::default(),
        }
    }

    /// Stable id, equal to the car's index in the fleet
    pub fn id(&self) -> u8 {
        self.id
    }

    /// Top floor of the building
    pub fn n_floors(&self) -> i32 {
        self.n_floors
    }

    /// Floor from the latest snapshot
    pub fn floor(&self) -> i32 {
        self.floor
    }

    /// Speed from the last issued command
    pub fn speed(&self) -> Speed {
        self.speed
    }

    /// Indicated direction from the last issued command
    pub fn direction(&self) -> Dirn {
        self.direction
    }

    /// Lit cabin buttons
    pub fn buttons_pressed(&self) -> &[i32] {
        &self.buttons_pressed
    }

    /// Accepted floor calls, in the order they were assigned
    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    /// Preferred parking floor, if any
    pub fn home_floor(&self) -> Option<i32> {
        self.home_floor
    }

    /// Sets or clears the parking floor. Used by strategies at fleet initialization.
    pub fn set_home_floor(&mut self, home_floor: Option<i32>) {
        self.home_floor = home_floor;
    }

    /// Sets what the car does once it runs out of work.
    pub fn set_idle_policy(&mut self, idle_policy: IdlePolicy) {
        self.idle_policy = idle_policy;
    }

    /// Accepts a call. Assigning a call the car already holds changes nothing.
    pub fn assign_request(&mut self, request: Request) {
        if !self.requests.contains(&request) {
            self.requests.push(request);
        }
    }

    /// Drops a call and returns it.
    ///
    /// With `direction: None` the first call held at `floor` goes, whatever its
    /// direction. Returns `None` when nothing matched.
    pub fn remove_request(&mut self, floor: i32, direction: Option<Dirn>) -> Option<Request> {
        let idx = self.position_of(floor, direction)?;
        Some(self.requests.remove(idx))
    }

    /// `true` if a call matching `floor` (and `direction`, when given) is held.
    pub fn is_request_assigned(&self, floor: i32, direction: Option<Dirn>) -> bool {
        self.position_of(floor, direction).is_some()
    }

    fn position_of(&self, floor: i32, direction: Option<Dirn>) -> Option<usize> {
        self.requests
            .iter()
            .position(|r| r.floor == floor && direction.map_or(true, |d| r.direction == d))
    }

    /// `true` if the cabin button for `floor` is lit.
    pub fn is_button_pressed(&self, floor: i32) -> bool {
        self.buttons_pressed.contains(&floor)
    }

    /// `true` if any cabin button is lit.
    pub fn has_buttons(&self) -> bool {
        !self.buttons_pressed.is_empty()
    }

    /// `true` if any floor call is held.
    pub fn has_requests(&self) -> bool {
        !self.requests.is_empty()
    }

    /// `true` if the car has any commitment at all, buttons or calls.
    pub fn has_any_requests(&self) -> bool {
        self.has_buttons() || self.has_requests()
    }

    /// Signed number of floors from here to `floor`.
    pub fn distance_to(&self, floor: i32) -> i32 {
        floor - self.floor
    }

    /// Direction from here to `floor`, [`Dirn::Stop`] when already there.
    pub fn direction_to(&self, floor: i32) -> Dirn {
        Dirn::from_delta(self.distance_to(floor))
    }

    /// Applies this car's part of a snapshot.
    ///
    /// Buttons are replaced, not merged. Held calls are never touched here.
    ///
    /// ## Errors
    /// - [`DispatchError::MalformedSnapshot`] when the report has no id.
    /// - [`DispatchError::IdentityMismatch`] when it belongs to another car.
    pub fn update_state(&mut self, report: &ElevatorReport) -> Result<(), DispatchError> {
        let id = report
            .id
            .ok_or(DispatchError::MalformedSnapshot { index: self.id as usize })?;
        if id != self.id {
            return Err(DispatchError::IdentityMismatch { expected: self.id, found: id });
        }

        if let Some(floor) = report.floor {
            self.floor = floor;
        }
        self.buttons_pressed = report.buttons_pressed.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(floor: i32, direction: Dirn) -> Request {
        Request::new(floor, direction).unwrap()
    }

    #[test]
    fn request_crud() {
        let mut el = Elevator::new(0, 10);
        assert!(!el.is_request_assigned(1, Some(Dirn::Down)));
        assert!(!el.has_requests());

        el.assign_request(req(1, Dirn::Down));
        assert!(el.is_request_assigned(1, Some(Dirn::Down)));
        assert!(el.is_request_assigned(1, None));
        assert!(!el.is_request_assigned(1, Some(Dirn::Up)));
        assert!(el.has_requests());

        assert_eq!(el.remove_request(1, Some(Dirn::Up)), None);
        assert_eq!(el.remove_request(1, Some(Dirn::Down)), Some(req(1, Dirn::Down)));
        assert!(!el.is_request_assigned(1, None));
    }

    #[test]
    fn assigning_twice_keeps_one_copy() {
        let mut el = Elevator::new(0, 10);
        el.assign_request(req(4, Dirn::Up));
        el.assign_request(req(4, Dirn::Up));
        assert_eq!(el.requests().len(), 1);

        el.assign_request(req(4, Dirn::Down));
        assert_eq!(el.requests().len(), 2);
    }

    #[test]
    fn remove_by_floor_takes_the_first_match() {
        let mut el = Elevator::new(0, 10);
        el.assign_request(req(5, Dirn::Down));
        el.assign_request(req(5, Dirn::Up));

        assert_eq!(el.remove_request(5, None), Some(req(5, Dirn::Down)));
        assert_eq!(el.requests(), &[req(5, Dirn::Up)]);
    }

    #[test]
    fn buttons() {
        let mut el = Elevator::new(0, 10);
        assert!(!el.is_button_pressed(2));
        assert!(!el.has_buttons());
        assert!(!el.has_any_requests());

        el.buttons_pressed = vec![2, 5, 8];
        assert!(el.is_button_pressed(2));
        assert!(!el.is_button_pressed(3));
        assert!(el.has_buttons());
        assert!(el.has_any_requests());
    }

    #[test]
    fn distance_and_direction() {
        let mut el = Elevator::new(0, 10);
        el.floor = 2;
        assert_eq!(el.distance_to(3), 1);
        assert_eq!(el.distance_to(0), -2);
        assert_eq!(el.direction_to(5), Dirn::Up);
        assert_eq!(el.direction_to(0), Dirn::Down);
        assert_eq!(el.direction_to(2), Dirn::Stop);
    }

    #[test]
    fn update_state_checks_identity() {
        let mut el = Elevator::new(0, 10);

        let anonymous = ElevatorReport { id: None, floor: Some(1), buttons_pressed: vec![] };
        assert_eq!(
            el.update_state(&anonymous),
            Err(DispatchError::MalformedSnapshot { index: 0 })
        );

        let wrong = ElevatorReport { id: Some(1), floor: Some(1), buttons_pressed: vec![] };
        assert_eq!(
            el.update_state(&wrong),
            Err(DispatchError::IdentityMismatch { expected: 0, found: 1 })
        );
        assert_eq!(el.floor(), 0);

        let good = ElevatorReport { id: Some(0), floor: Some(1), buttons_pressed: vec![3, 5] };
        el.update_state(&good).unwrap();
        assert_eq!(el.floor(), 1);
        assert_eq!(el.buttons_pressed(), &[3, 5]);
    }

    #[test]
    fn update_state_replaces_buttons_and_keeps_requests() {
        let mut el = Elevator::new(0, 10);
        el.buttons_pressed = vec![3, 5];
        el.assign_request(req(7, Dirn::Down));

        let report = ElevatorReport { id: Some(0), floor: Some(4), buttons_pressed: vec![9] };
        el.update_state(&report).unwrap();
        assert_eq!(el.buttons_pressed(), &[9]);
        assert_eq!(el.requests(), &[req(7, Dirn::Down)]);
    }
}
