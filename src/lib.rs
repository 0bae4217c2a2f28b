#![cfg_attr(not(test), no_std)]

/*
 * Board-agnostic logic for a two-road junction with a pedestrian crossing.
 *
 * Nothing in here touches a register. Time, the ADC and the signal lamps are
 * reached through small ports so that the whole controller can be driven by a
 * virtual clock on the host. The device-specific glue lives in the firmware
 * binary.
 */

pub mod clock;
pub mod config;
pub mod demand;
pub mod sensor;
pub mod signal_bank;
pub mod trafficlight;

pub use clock::Clock;
pub use config::{Config, Timings};
pub use demand::DemandLatch;
pub use sensor::{AnalogInput, Road, SensorMonitor};
pub use signal_bank::{Lamp, SignalBank, WAIT_INDICATOR_COUNT, decode};
pub use trafficlight::{Decision, Inputs, Phase, TrafficLight};
