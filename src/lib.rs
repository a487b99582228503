//! Container Network Simulation Library
//!
//! Terminals, scheduled services, barges and container requests, advanced
//! tick by tick by a deterministic assignment engine.

pub mod simulation;
