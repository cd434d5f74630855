//! Sensor drivers.

pub mod tcs34725;
