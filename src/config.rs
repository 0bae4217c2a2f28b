/*
 * Junction configuration. The defaults are the timings the junction was
 * commissioned with; a different installation can build its own `Config` and
 * hand it to the controller and the sensor monitor.
 */

use embassy_time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timings {
    /// Minimum main road green before demand is looked at.
    pub main_green_min: Duration,
    /// Extra wait in main road green when nobody is asking for a change.
    pub no_demand_poll: Duration,
    pub amber: Duration,
    pub all_red: Duration,
    pub ped_cross: Duration,
    pub ped_clear: Duration,
    /// Red and amber together, just before a road goes green.
    pub red_amber: Duration,
    pub side_green_min: Duration,
    /// Side road green is held this much longer while only the side road has
    /// traffic.
    pub side_green_extension: Duration,
}

impl Timings {
    pub const DEFAULT: Timings = Timings {
        main_green_min: Duration::from_millis(5000),
        no_demand_poll: Duration::from_millis(100),
        amber: Duration::from_millis(3000),
        all_red: Duration::from_millis(2000),
        ped_cross: Duration::from_millis(10000),
        ped_clear: Duration::from_millis(3000),
        red_amber: Duration::from_millis(2000),
        side_green_min: Duration::from_millis(5000),
        side_green_extension: Duration::from_millis(5000),
    };
}

impl Default for Timings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub timings: Timings,
    /// Raw 10-bit reading a loop sensor must exceed to count as occupied.
    /// 1.4V of a 5V reference is about 286.
    pub occupancy_threshold: u16,
    /// Settling time between selecting an ADC channel and converting.
    pub acquisition: Duration,
}

impl Config {
    pub const DEFAULT: Config = Config {
        timings: Timings::DEFAULT,
        occupancy_threshold: 286,
        acquisition: Duration::from_millis(2),
    };
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}
