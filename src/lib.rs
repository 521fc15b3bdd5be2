#![warn(missing_docs)]
//! # liftdispatch
//!
//! Dispatch engine for the BoxLift elevator simulation. Each round the server reports
//! where the cars are, which cabin buttons are lit and which floor calls wait; the
//! engine decides which car serves which call and what every car does next.
//!
//! ## Overview
//! - **config**: Constants, building plans, dispatch settings and print flags.
//! - **error**: Errors raised by the dispatch engine.
//! - **init**: Command line, credentials and print-flag setup.
//! - **print**: Colour-coded terminal output.
//! - **world_view**: The building snapshot and the commands sent back.
//! - **elevator_logic**: State and decision rule of a single car.
//! - **manager**: The fleet dispatcher and its pluggable strategies.
//! - **network**: HTTP client for the BoxLift server.

pub mod config;

pub mod error;

pub mod init;

pub mod print;

pub mod manager;

pub mod network;

pub mod world_view;

pub mod elevator_logic;
