/*
 * The I/O module for the junction.
 *
 * This is the only part of the program that is device-specific. It lights the
 * signal heads, implements the clock and ADC ports for the controller, and
 * runs the tasks that watch the pedestrian button and light the wait lamps.
 */

use embassy_stm32::{
    adc::Adc,
    exti::ExtiInput,
    gpio::{Flex, Level, Output},
    pac,
    peripherals::ADC1,
};
use embassy_time::{Duration, Timer};
use enum_ordinalize::Ordinalize;
use junction::{AnalogInput, Clock, DemandLatch, Lamp, SignalBank, WAIT_INDICATOR_COUNT};

// All lamps are active-high.
fn light(output: &mut Output, on: bool) {
    output.set_level(if on { Level::High } else { Level::Low });
}

/// The eight signal lamps on PD0..PD7, lamp `n` on pin `n`.
pub struct SignalHeads {
    // Configured as push-pull outputs, then written as one port.
    _outputs: [Output<'static>; Lamp::VARIANT_COUNT],
}

impl SignalHeads {
    pub fn new(outputs: [Output<'static>; Lamp::VARIANT_COUNT]) -> Self {
        Self { _outputs: outputs }
    }

    /*
     * A single BSRR write sets and resets all eight lines in the same bus
     * cycle, so no mix of the old and the new phase is ever on the street.
     */
    pub fn show(&mut self, bank: &SignalBank) {
        let bits = bank.bits();
        pac::GPIOD.bsrr().write(|w| {
            for n in 0..Lamp::VARIANT_COUNT {
                let on = bits & (1 << n) != 0;
                w.set_bs(n, on);
                w.set_br(n, !on);
            }
        });
    }
}

pub struct EmbassyClock;

impl Clock for EmbassyClock {
    async fn delay(&mut self, duration: Duration) {
        Timer::after(duration).await;
    }
}

/*
 * ADC1 driven at register level, so that the sensor monitor owns the
 * select/settle/convert/spin sequence. Power-up and calibration are done by
 * the HAL driver before this takes over.
 */
pub struct LoopSensorAdc {
    // Kept so nothing else can claim the converter or the sensor pins.
    _adc: Adc<'static, ADC1>,
    _sensors: [Flex<'static>; 4],
}

impl LoopSensorAdc {
    /// `sensors` are the pins of ADC channels 0 to 3, in channel order.
    pub fn new(adc: Adc<'static, ADC1>, mut sensors: [Flex<'static>; 4]) -> Self {
        for pin in sensors.iter_mut() {
            pin.set_as_analog();
        }
        pac::ADC1.cr2().modify(|w| {
            // Software start only.
            w.set_exttrig(true);
            w.set_extsel(0b111);
        });
        Self {
            _adc: adc,
            _sensors: sensors,
        }
    }
}

impl AnalogInput for LoopSensorAdc {
    fn select(&mut self, channel: u8) {
        pac::ADC1.sqr3().modify(|w| w.set_sq(0, channel));
    }

    fn start_conversion(&mut self) {
        pac::ADC1.cr2().modify(|w| w.set_swstart(true));
    }

    fn conversion_done(&mut self) -> bool {
        pac::ADC1.sr().read().eoc()
    }

    fn result(&mut self) -> u16 {
        // The F1 converter is 12 bits wide, the thresholds are 10 bits.
        (pac::ADC1.dr().read().0 as u16 & 0x0fff) >> 2
    }
}

/*
 * The button edge only sets the latch. The wait future is created again right
 * after a press and is never dropped for anything else, so only a bounce
 * within that moment can go unseen, and a repeat press changes nothing anyway.
 */
#[embassy_executor::task]
pub async fn button_task(mut button: ExtiInput<'static>, demand: &'static DemandLatch) -> ! {
    loop {
        button.wait_for_falling_edge().await;
        demand.set();
    }
}

/*
 * Lights the wait lamps with whatever the latch published last, both after a
 * press and after the controller took the demand.
 */
#[embassy_executor::task]
pub async fn wait_lamp_task(
    mut wait_lamps: [Output<'static>; WAIT_INDICATOR_COUNT],
    demand: &'static DemandLatch,
) -> ! {
    loop {
        let waiting = demand.indicator().await;
        defmt::debug!("wait lamps {}", waiting);
        for lamp in wait_lamps.iter_mut() {
            light(lamp, waiting);
        }
    }
}
