//! Discrete-event simulation of the pipelined, multi-banked DRAM-backed
//! short-read alignment accelerator: input reader, interval/position table
//! controllers, stitchers, and the top-level driver that wires them
//! together and ticks the shared clock.
//!
//! Every component here is [`sim_core::Tickable`] (or exposes an equivalent
//! `tick` method taking its upstream neighbours by mutable reference, where
//! a component's borrowed dependencies prevent it from being `Tickable` on
//! its own). The [`driver::Driver`] owns the whole network and is the only
//! caller of each component's per-cycle update.

pub mod bank_layout;
pub mod driver;
pub mod input_reader;
pub mod interval_table_ctrl;
pub mod model;
pub mod params;
pub mod position_table_ctrl;
pub mod stitcher;
