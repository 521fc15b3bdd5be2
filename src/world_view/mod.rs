//! # World view
//!
//! The building as the server reports it, and the commands sent back.
//!
//! A [`BuildingState`] is one snapshot: where every car is, which cabin buttons are lit
//! and which floor calls are waiting. The dispatcher only ever reads it; the only thing
//! flowing the other way is a list of [`Command`]s.

pub mod serial;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DispatchError;

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
/// Direction an elevator is indicating or a call is travelling in.
///
/// An elevator keeps its direction while stopped; passengers read it before boarding.
pub enum Dirn {
    Down = -1,
    Stop = 0,
    Up = 1,
}

impl Dirn {
    /// Sign of `delta` as a direction. Zero maps to [`Dirn::Stop`].
    pub fn from_delta(delta: i32) -> Dirn {
        match delta.signum() {
            1 => Dirn::Up,
            -1 => Dirn::Down,
            _ => Dirn::Stop,
        }
    }

    /// The opposite direction. [`Dirn::Stop`] stays [`Dirn::Stop`].
    pub fn reversed(self) -> Dirn {
        match self {
            Dirn::Up => Dirn::Down,
            Dirn::Down => Dirn::Up,
            Dirn::Stop => Dirn::Stop,
        }
    }

    /// `Ok(self)` for up and down, [`DispatchError::InvalidDirection`] for stop.
    pub fn travelling(self) -> Result<Dirn, DispatchError> {
        match self {
            Dirn::Stop => Err(DispatchError::InvalidDirection(0)),
            dirn => Ok(dirn),
        }
    }
}

impl TryFrom<i64> for Dirn {
    type Error = DispatchError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Dirn::Down),
            0 => Ok(Dirn::Stop),
            1 => Ok(Dirn::Up),
            other => Err(DispatchError::InvalidDirection(other)),
        }
    }
}

impl From<Dirn> for i64 {
    fn from(dirn: Dirn) -> i64 {
        dirn as i64
    }
}

impl fmt::Display for Dirn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as i8)
    }
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
/// Speed of a car. The simulation only knows halted and moving.
pub enum Speed {
    Stopped = 0,
    Moving = 1,
}

impl TryFrom<u8> for Speed {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Speed::Stopped),
            1 => Ok(Speed::Moving),
            other => Err(format!("speed must be 0 or 1, got {}", other)),
        }
    }
}

impl From<Speed> for u8 {
    fn from(speed: Speed) -> u8 {
        speed as u8
    }
}

/// A floor call: someone at `floor` wants to travel in `direction`.
///
/// Two requests are the same call when floor and direction agree, so a building never
/// holds more than one outstanding request per pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRequest")]
pub struct Request {
    /// Floor the call button was pressed on
    pub floor: i32,
    /// Requested travel direction, never [`Dirn::Stop`]
    pub direction: Dirn,
}

impl Request {
    /// Builds a request, rejecting [`Dirn::Stop`].
    pub fn new(floor: i32, direction: Dirn) -> Result<Self, DispatchError> {
        Ok(Request { floor, direction: direction.travelling()? })
    }
}

#[derive(Deserialize)]
struct RawRequest {
    floor: i32,
    direction: Dirn,
}

impl TryFrom<RawRequest> for Request {
    type Error = DispatchError;

    fn try_from(raw: RawRequest) -> Result<Self, Self::Error> {
        Request::new(raw.floor, raw.direction)
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = if self.direction == Dirn::Up { "up" } else { "down" };
        write!(f, "({}, {})", self.floor, arrow)
    }
}

/// One car's part of a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElevatorReport {
    /// Elevator id. Missing ids make the snapshot malformed.
    #[serde(default, deserialize_with = "serial::lenient_id")]
    pub id: Option<u8>,

    /// Floor the car is at. Left untouched on the elevator when absent.
    #[serde(default)]
    pub floor: Option<i32>,

    /// Lit cabin buttons, in the order the server lists them
    #[serde(default)]
    pub buttons_pressed: Vec<i32>,
}

/// A full snapshot of the building, as returned after every command round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildingState {
    /// Per-car reports. Missing key means no cars reported
    #[serde(default)]
    pub elevators: Vec<ElevatorReport>,

    /// Pending floor calls. Missing key means no calls
    #[serde(default)]
    pub requests: Vec<Request>,

    /// Game status, e.g. `"in_progress"`, `"finished"` or `"error"`
    #[serde(default)]
    pub status: String,

    /// Fresh token, when the server rotated it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Human readable message from the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Final score, present once the game has finished
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<serde_json::Value>,

    /// Prize code handed out to the top finishers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_code: Option<String>,
}

impl BuildingState {
    /// Status reported once the iteration budget is used up.
    pub const FINISHED: &'static str = "finished";
    /// Status used for a state synthesized from a failed request.
    pub const ERROR: &'static str = "error";

    /// A state standing in for a failed round trip.
    pub fn error(message: impl Into<String>) -> Self {
        BuildingState {
            status: Self::ERROR.to_string(),
            message: Some(message.into()),
            ..Default::default()
        }
    }

    /// `true` once the game is over.
    pub fn is_finished(&self) -> bool {
        self.status == Self::FINISHED
    }

    /// `true` for states built by [`BuildingState::error`] or reported as errors.
    pub fn is_error(&self) -> bool {
        self.status == Self::ERROR
    }
}

/// A command to one car: which direction to indicate and whether to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Command {
    /// Target elevator
    pub id: u8,
    /// Indicated direction, also while halted
    pub direction: Dirn,
    /// Halt at the current floor or move one floor along `direction`
    pub speed: Speed,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "set car {} (direction={}, speed={})",
            self.id, self.direction, self.speed as u8
        )
    }
}
