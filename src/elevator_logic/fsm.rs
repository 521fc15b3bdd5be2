//! The per-tick decision rule of a single car.
//!
//! A car is either stopped or moving; its indicated direction carries over between
//! the two. Every tick the rule is evaluated fresh from the current state and the
//! resulting speed and direction are written back onto the car before the command is
//! handed out, so the car always reflects the last command it issued.
//!
//! Stopping at a floor that holds a call in the indicated direction clears that call.

use super::{Elevator, IdlePolicy};
use crate::world_view::{Command, Dirn, Speed};

impl Elevator {
    /// Decides this tick's command.
    ///
    /// Returns `None` when the car is stopped with nothing to do; it then sends nothing
    /// and keeps its state on the server.
    pub fn get_command(&mut self) -> Option<Command> {
        let (speed, direction) = match self.speed {
            Speed::Stopped => self.decide_when_stopped()?,
            Speed::Moving => self.decide_when_moving(),
        };

        self.speed = speed;
        self.direction = direction;
        Some(Command { id: self.id, direction, speed })
    }

    fn decide_when_stopped(&mut self) -> Option<(Speed, Dirn)> {
        // Passengers first
        let floor = self.floor;
        if let Some(target) = self.buttons_pressed.iter().copied().find(|&b| b != floor) {
            return Some((Speed::Moving, self.direction_to(target)));
        }

        // Longest trip next, so the car does not dither around its own floor
        if let Some(furthest) = self.furthest_request() {
            if furthest.floor == floor {
                self.remove_request(furthest.floor, Some(furthest.direction));
                return Some((Speed::Stopped, furthest.direction));
            }
            return Some((Speed::Moving, self.direction_to(furthest.floor)));
        }

        self.idle_target()
            .map(|home| (Speed::Moving, self.direction_to(home)))
    }

    fn decide_when_moving(&mut self) -> (Speed, Dirn) {
        let floor = self.floor;
        let has_button = self.is_button_pressed(floor);
        let request_here = self.request_here();
        let closest = self.closest_request();
        let furthest = self.furthest_request();

        if has_button {
            let direction = if self.has_button_along(self.direction) {
                self.direction
            } else if let Some(closest) = closest.filter(|r| r.floor != floor) {
                self.direction_to(closest.floor)
            } else {
                // End of the run
                self.direction.reversed()
            };
            if let Ok(boarding) = direction.travelling() {
                self.remove_request(floor, Some(boarding));
            }
            return (Speed::Stopped, direction);
        }

        if let Some(here) = request_here {
            self.remove_request(here.floor, Some(here.direction));
            return (Speed::Stopped, self.direction);
        }

        if let Some(closest) = closest.filter(|r| r.floor == floor) {
            self.remove_request(closest.floor, Some(closest.direction));
            return (Speed::Stopped, closest.direction);
        }

        // Every call is elsewhere by now
        if let Some(furthest) = furthest {
            return (Speed::Moving, self.direction_to(furthest.floor));
        }

        if !self.has_any_requests() {
            return match self.idle_target() {
                Some(home) => (Speed::Moving, self.direction_to(home)),
                None => (Speed::Stopped, self.direction),
            };
        }

        // Only buttons left, none of them here
        if self.has_button_along(self.direction) {
            return (Speed::Moving, self.direction);
        }
        match self.buttons_pressed.first() {
            Some(&target) => (Speed::Moving, self.direction_to(target)),
            None => (Speed::Moving, self.direction),
        }
    }

    /// The floor an idle car should head for, if it is not already there.
    fn idle_target(&self) -> Option<i32> {
        match (self.idle_policy, self.home_floor) {
            (IdlePolicy::ReturnHome, Some(home)) if home != self.floor => Some(home),
            _ => None,
        }
    }
}
