/*
 * The phase state machine of the junction.
 *
 * The main road rests on green. It only gives way when a pedestrian has
 * pressed the button or the side road has traffic waiting. Whichever of the
 * two it was, the machine goes through amber and an all-red gap first, and only
 * then decides who is served: a waiting pedestrian always goes before the side
 * road. Any road that is about to get green shows red and amber first.
 *
 * Inputs are only read at the decision points, after the dwell of the phase
 * has run out in full. New demand never shortens a dwell.
 */

use crate::{
    clock::Clock,
    config::{Config, Timings},
    demand::DemandLatch,
    sensor::{AnalogInput, Road, SensorMonitor},
    signal_bank::{SignalBank, decode},
};
use embassy_time::Duration;
use enum_ordinalize::Ordinalize;

#[derive(Debug, Ordinalize, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Phase {
    MainGreen,
    MainAmber,
    AllRed1,
    PedCross,
    PedClear,
    SidePrep,
    SideGreen,
    SideAmber,
    AllRed2,
    MainPrep,
}

/// What was seen at a decision point. Inputs a phase does not consult are left
/// `false` and are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Inputs {
    pub demand: bool,
    pub main_occupied: bool,
    pub side_occupied: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Decision {
    pub next: Phase,
    /// Time the current lamps stay up after the decision, before `next` takes
    /// over.
    pub hold: Option<Duration>,
}

impl Decision {
    const fn to(next: Phase) -> Self {
        Decision { next, hold: None }
    }

    const fn after(hold: Duration, next: Phase) -> Self {
        Decision {
            next,
            hold: Some(hold),
        }
    }
}

impl Phase {
    pub const INITIAL: Phase = Phase::MainGreen;

    pub fn dwell(&self, timings: &Timings) -> Duration {
        match self {
            Phase::MainGreen => timings.main_green_min,
            Phase::MainAmber | Phase::SideAmber => timings.amber,
            Phase::AllRed1 | Phase::AllRed2 => timings.all_red,
            Phase::PedCross => timings.ped_cross,
            Phase::PedClear => timings.ped_clear,
            Phase::SidePrep | Phase::MainPrep => timings.red_amber,
            Phase::SideGreen => timings.side_green_min,
        }
    }

    /*
     * Determine the next phase from what was seen once the dwell ran out,
     * without changing the phase that we are in.
     *
     * AllRed1 does not look at the side road again. MainGreen only lets go when
     * there is a pedestrian or side traffic, so without a pedestrian it must
     * have been the side road.
     */
    pub fn decide(&self, inputs: Inputs, timings: &Timings) -> Decision {
        match self {
            Phase::MainGreen if inputs.demand || inputs.side_occupied => {
                Decision::to(Phase::MainAmber)
            }
            // Nobody is waiting: stay on main road green.
            Phase::MainGreen => Decision::after(timings.no_demand_poll, Phase::MainGreen),
            Phase::MainAmber => Decision::to(Phase::AllRed1),
            Phase::AllRed1 if inputs.demand => Decision::to(Phase::PedCross),
            Phase::AllRed1 => Decision::to(Phase::SidePrep),
            Phase::PedCross => Decision::to(Phase::PedClear),
            Phase::PedClear if inputs.side_occupied => Decision::to(Phase::SidePrep),
            Phase::PedClear => Decision::to(Phase::MainPrep),
            Phase::SidePrep => Decision::to(Phase::SideGreen),
            Phase::SideGreen if inputs.main_occupied || !inputs.side_occupied => {
                Decision::to(Phase::SideAmber)
            }
            Phase::SideGreen => Decision::after(timings.side_green_extension, Phase::SideAmber),
            Phase::SideAmber => Decision::to(Phase::AllRed2),
            Phase::AllRed2 => Decision::to(Phase::MainPrep),
            Phase::MainPrep => Decision::to(Phase::MainGreen),
        }
    }
}

pub struct TrafficLight<'a, A, C> {
    phase: Phase,
    timings: Timings,
    demand: &'a DemandLatch,
    sensors: SensorMonitor<A>,
    clock: C,
    last_decision: Option<(Inputs, Decision)>,
}

impl<'a, A: AnalogInput, C: Clock> TrafficLight<'a, A, C> {
    pub fn new(config: &Config, demand: &'a DemandLatch, adc: A, clock: C) -> Self {
        TrafficLight {
            phase: Phase::INITIAL,
            timings: config.timings,
            demand,
            sensors: SensorMonitor::new(adc, config),
            clock,
            last_decision: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The lamps for the current phase.
    pub fn signals(&self) -> SignalBank {
        decode(self.phase)
    }

    /// What the last `advance` saw at its decision point, and what it made of
    /// it.
    pub fn last_decision(&self) -> Option<(Inputs, Decision)> {
        self.last_decision
    }

    #[cfg(test)]
    pub(crate) fn sensors_mut(&mut self) -> &mut SensorMonitor<A> {
        &mut self.sensors
    }

    #[cfg(test)]
    pub(crate) fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /*
     * Run the current phase to its end and move on. Blocks for the dwell, any
     * hold the decision asks for and the ADC conversions in between, so the
     * lamps must already show `signals()` when this is called.
     */
    pub async fn advance(&mut self) -> Phase {
        if self.phase == Phase::PedCross {
            self.demand.take_and_clear();
        }

        self.clock.delay(self.phase.dwell(&self.timings)).await;

        let inputs = self.read_inputs().await;
        let decision = self.phase.decide(inputs, &self.timings);
        #[cfg(feature = "defmt")]
        defmt::debug!("{} saw {}, next {}", self.phase, inputs, decision);
        self.last_decision = Some((inputs, decision));

        if let Some(hold) = decision.hold {
            self.clock.delay(hold).await;
        }

        self.phase = decision.next;
        self.phase
    }

    /*
     * Only what the current phase looks at is read, in the same order as its
     * condition, and a sensor is not sampled once the answer is known.
     */
    async fn read_inputs(&mut self) -> Inputs {
        let mut inputs = Inputs::default();
        match self.phase {
            Phase::MainGreen => {
                inputs.demand = self.demand.is_set();
                if !inputs.demand {
                    inputs.side_occupied = self.occupied(Road::Side).await;
                }
            }
            Phase::AllRed1 => inputs.demand = self.demand.is_set(),
            Phase::PedClear => inputs.side_occupied = self.occupied(Road::Side).await,
            Phase::SideGreen => {
                inputs.main_occupied = self.occupied(Road::Main).await;
                if !inputs.main_occupied {
                    inputs.side_occupied = self.occupied(Road::Side).await;
                }
            }
            Phase::MainAmber
            | Phase::PedCross
            | Phase::SidePrep
            | Phase::SideAmber
            | Phase::AllRed2
            | Phase::MainPrep => {}
        }
        inputs
    }

    async fn occupied(&mut self, road: Road) -> bool {
        self.sensors.road_occupied(road, &mut self.clock).await
    }
}
