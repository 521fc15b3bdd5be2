//! Request evaluation for a single elevator.
//!
//! Stateless queries over the calls an [`Elevator`] holds and the buttons lit in its
//! cabin. The decision rule in [`fsm`](super::fsm) is built from these.
//!
//! Ties are broken the same way everywhere: lowest floor first, then down before up.

use std::cmp::Reverse;

use super::Elevator;
use crate::error::DispatchError;
use crate::world_view::{Dirn, Request};

impl Elevator {
    /// The held call nearest to the car, if any.
    ///
    /// ## Example
    /// With calls `(0, up)`, `(2, down)`, `(6, down)` and the car on floor 3, the answer is
    /// `(2, down)`: one floor away, against three for the other two.
    pub fn closest_request(&self) -> Option<Request> {
        self.requests
            .iter()
            .copied()
            .min_by_key(|r| (self.distance_to(r.floor).abs(), r.floor, r.direction))
    }

    /// The held call farthest from the car, if any.
    pub fn furthest_request(&self) -> Option<Request> {
        self.requests
            .iter()
            .copied()
            .min_by_key(|r| (Reverse(self.distance_to(r.floor).abs()), r.floor, r.direction))
    }

    /// Floors of the held calls travelling in `direction`, in the order the car would
    /// pass them: ascending for up, descending for down.
    ///
    /// ## Errors
    /// [`DispatchError::InvalidDirection`] for [`Dirn::Stop`].
    pub fn requests_along_direction(&self, direction: Dirn) -> Result<Vec<i32>, DispatchError> {
        let direction = direction.travelling()?;

        let mut floors: Vec<i32> = self
            .requests
            .iter()
            .filter(|r| r.direction == direction)
            .map(|r| r.floor)
            .collect();
        floors.sort_unstable();
        if direction == Dirn::Down {
            floors.reverse();
        }
        Ok(floors)
    }

    /// The held call at the current floor going the way the car points, if any.
    pub fn request_here(&self) -> Option<Request> {
        let direction = self.direction.travelling().ok()?;
        let here = Request { floor: self.floor, direction };
        self.requests.contains(&here).then_some(here)
    }

    /// `true` if a lit button lies beyond the current floor in `direction`.
    pub fn has_button_along(&self, direction: Dirn) -> bool {
        direction != Dirn::Stop
            && self
                .buttons_pressed
                .iter()
                .any(|&floor| self.direction_to(floor) == direction)
    }

    /// `true` if the car points away from `floor`: it indicates a direction, and
    /// `floor` lies the other way.
    pub fn is_moving_away_from(&self, floor: i32) -> bool {
        let towards = self.direction_to(floor);
        self.direction != Dirn::Stop && towards != Dirn::Stop && towards != self.direction
    }

    /// `true` if the car points at `floor`.
    pub fn is_heading_towards(&self, floor: i32) -> bool {
        self.direction != Dirn::Stop && self.direction_to(floor) == self.direction
    }
}
