/*
 * The timing source for dwells and ADC acquisition.
 *
 * In order to keep the state machine testable we keep all time and delay
 * functions outside of it. The firmware hands in a clock backed by the Embassy
 * timer, the tests hand in a virtual clock that only records what was asked.
 */

use embassy_time::Duration;

#[allow(async_fn_in_trait)]
pub trait Clock {
    /// Wait out `duration`. Nothing is read from the junction while waiting.
    async fn delay(&mut self, duration: Duration);
}

#[cfg(test)]
pub(crate) mod virtual_clock {
    use super::Clock;
    use embassy_time::Duration;

    /// Returns immediately and keeps a log of every delay requested.
    #[derive(Default)]
    pub struct VirtualClock {
        pub delays: Vec<Duration>,
    }

    impl VirtualClock {
        pub fn elapsed(&self) -> Duration {
            self.delays
                .iter()
                .fold(Duration::from_ticks(0), |total, delay| total + *delay)
        }

        /// Delays that are not ADC acquisition time.
        pub fn dwells(&self, acquisition: Duration) -> Vec<Duration> {
            self.delays
                .iter()
                .copied()
                .filter(|delay| *delay != acquisition)
                .collect()
        }

        pub fn clear(&mut self) {
            self.delays.clear();
        }
    }

    impl Clock for VirtualClock {
        async fn delay(&mut self, duration: Duration) {
            self.delays.push(duration);
        }
    }
}
