/*
 * Roadway occupancy from the analog loop sensors.
 *
 * Every road has two sensors on their own ADC channel. A road is occupied when
 * either reading is strictly above the threshold. Readings are never cached:
 * each question samples the hardware again.
 *
 * A sample is a blocking sequence: select the channel, let it settle, start a
 * conversion and spin until the converter says it is done. The spin has no
 * timeout, so a converter that never finishes stalls the whole junction.
 */

use crate::{clock::Clock, config::Config};
use embassy_time::Duration;

/// The register-level steps of one conversion.
pub trait AnalogInput {
    fn select(&mut self, channel: u8);
    fn start_conversion(&mut self);
    fn conversion_done(&mut self) -> bool;
    /// The 10-bit result of the last conversion.
    fn result(&mut self) -> u16;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Road {
    Main,
    Side,
}

impl Road {
    /// ADC channels of the road's two sensors, in sampling order.
    pub const fn channels(&self) -> [u8; 2] {
        match self {
            Road::Main => [0, 2],
            Road::Side => [1, 3],
        }
    }
}

pub struct SensorMonitor<A> {
    adc: A,
    threshold: u16,
    acquisition: Duration,
}

impl<A: AnalogInput> SensorMonitor<A> {
    pub fn new(adc: A, config: &Config) -> Self {
        SensorMonitor {
            adc,
            threshold: config.occupancy_threshold,
            acquisition: config.acquisition,
        }
    }

    pub async fn sample<C: Clock>(&mut self, channel: u8, clock: &mut C) -> u16 {
        self.adc.select(channel);
        clock.delay(self.acquisition).await;

        self.adc.start_conversion();
        while !self.adc.conversion_done() {
            core::hint::spin_loop();
        }

        self.adc.result()
    }

    /*
     * The second sensor is only sampled when the first one is quiet.
     */
    pub async fn road_occupied<C: Clock>(&mut self, road: Road, clock: &mut C) -> bool {
        for channel in road.channels() {
            if self.sample(channel, clock).await > self.threshold {
                return true;
            }
        }
        false
    }

    #[cfg(test)]
    pub(crate) fn adc_mut(&mut self) -> &mut A {
        &mut self.adc
    }
}
