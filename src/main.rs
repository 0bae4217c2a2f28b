#![no_std]
#![no_main]

use defmt::info;
use embassy_executor::Spawner;
use embassy_stm32::{
    adc::Adc,
    exti::{Channel, ExtiInput},
    gpio::{Flex, Level, Output, Pin, Pull, Speed},
};
use junction::{Config, DemandLatch, TrafficLight};
use {defmt_rtt as _, panic_halt as _};

mod io;
use io::{EmbassyClock, LoopSensorAdc, SignalHeads};

static DEMAND: DemandLatch = DemandLatch::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_stm32::init(Default::default());

    // In port bit order, see `Lamp`.
    let mut heads = SignalHeads::new([
        Output::new(p.PD0.degrade(), Level::Low, Speed::Low), // pedestrian green
        Output::new(p.PD1.degrade(), Level::Low, Speed::Low), // pedestrian red
        Output::new(p.PD2.degrade(), Level::Low, Speed::Low), // side green
        Output::new(p.PD3.degrade(), Level::Low, Speed::Low), // side amber
        Output::new(p.PD4.degrade(), Level::Low, Speed::Low), // side red
        Output::new(p.PD5.degrade(), Level::Low, Speed::Low), // main green
        Output::new(p.PD6.degrade(), Level::Low, Speed::Low), // main amber
        Output::new(p.PD7.degrade(), Level::Low, Speed::Low), // main red
    ]);

    let wait_lamps = [
        Output::new(p.PE2.degrade(), Level::Low, Speed::Low),
        Output::new(p.PE3.degrade(), Level::Low, Speed::Low),
        Output::new(p.PE4.degrade(), Level::Low, Speed::Low),
        Output::new(p.PE5.degrade(), Level::Low, Speed::Low),
    ];

    // Active-low push button, so we want the falling edge.
    let button = ExtiInput::new(p.PB0.degrade(), p.EXTI0.degrade(), Pull::Up);

    spawner.spawn(io::button_task(button, &DEMAND)).unwrap();
    spawner.spawn(io::wait_lamp_task(wait_lamps, &DEMAND)).unwrap();

    // Loop sensors on PA0 (main), PA1 (side), PA2 (main) and PA3 (side).
    let adc = LoopSensorAdc::new(
        Adc::new(p.ADC1),
        [
            Flex::new(p.PA0.degrade()),
            Flex::new(p.PA1.degrade()),
            Flex::new(p.PA2.degrade()),
            Flex::new(p.PA3.degrade()),
        ],
    );
    let config = Config::DEFAULT;
    let mut trafficlight = TrafficLight::new(&config, &DEMAND, adc, EmbassyClock);

    loop {
        info!("phase {}", trafficlight.phase());
        heads.show(&trafficlight.signals());
        trafficlight.advance().await;
    }
}
