/*
 * The signal lamps and the decoder that lights them for a phase.
 *
 * The decoder always starts from a dark bank and only switches on what the
 * phase needs, so nothing from the previous phase can leak into the next one.
 * Red and amber together announce a green (the "prep" phases); amber on its
 * own, without red, follows a green.
 */

use crate::trafficlight::Phase;
use enum_ordinalize::Ordinalize;

/// The eight lamp lines, in output port bit order.
#[derive(Debug, Ordinalize, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(usize)]
pub enum Lamp {
    PedestrianGreen,
    PedestrianRed,
    SideGreen,
    SideAmber,
    SideRed,
    MainGreen,
    MainAmber,
    MainRed,
}

/// The "wait" lamps on the pedestrian push button units. They all show the
/// same thing.
pub const WAIT_INDICATOR_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SignalBank {
    lamps: [bool; Lamp::VARIANT_COUNT],
}

impl SignalBank {
    pub const fn dark() -> Self {
        SignalBank {
            lamps: [false; Lamp::VARIANT_COUNT],
        }
    }

    pub fn is_on(&self, lamp: Lamp) -> bool {
        self.lamps[lamp.ordinal()]
    }

    fn switch_on(&mut self, lamps: &[Lamp]) {
        for lamp in lamps {
            self.lamps[lamp.ordinal()] = true;
        }
    }

    /// The bank as one byte, lamp `n` on bit `n`.
    pub fn bits(&self) -> u8 {
        self.lamps
            .iter()
            .enumerate()
            .fold(0, |bits, (i, on)| if *on { bits | (1 << i) } else { bits })
    }

    /// Number of conflicting movements given a go signal at the same time.
    pub fn conflicting_greens(&self) -> usize {
        [Lamp::MainGreen, Lamp::SideGreen, Lamp::PedestrianGreen]
            .iter()
            .filter(|lamp| self.is_on(**lamp))
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Lamp, bool)> + '_ {
        Lamp::VARIANTS.iter().map(|lamp| (*lamp, self.is_on(*lamp)))
    }
}

pub fn decode(phase: Phase) -> SignalBank {
    use Lamp::*;

    let mut bank = SignalBank::dark();
    match phase {
        Phase::MainGreen => bank.switch_on(&[MainGreen, SideRed, PedestrianRed]),
        Phase::MainAmber => bank.switch_on(&[MainAmber, SideRed, PedestrianRed]),
        Phase::AllRed1 | Phase::AllRed2 | Phase::PedClear => {
            bank.switch_on(&[MainRed, SideRed, PedestrianRed])
        }
        Phase::PedCross => bank.switch_on(&[MainRed, SideRed, PedestrianGreen]),
        Phase::SidePrep => bank.switch_on(&[MainRed, PedestrianRed, SideRed, SideAmber]),
        Phase::SideGreen => bank.switch_on(&[MainRed, PedestrianRed, SideGreen]),
        Phase::SideAmber => bank.switch_on(&[MainRed, PedestrianRed, SideAmber]),
        Phase::MainPrep => bank.switch_on(&[SideRed, PedestrianRed, MainRed, MainAmber]),
    }
    bank
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_two_greens() {
        for phase in Phase::VARIANTS {
            assert!(decode(*phase).conflicting_greens() <= 1, "{:?}", phase);
        }
    }

    #[test]
    fn test_green_only_where_expected() {
        for phase in Phase::VARIANTS {
            let bank = decode(*phase);
            assert_eq!(bank.is_on(Lamp::MainGreen), *phase == Phase::MainGreen);
            assert_eq!(bank.is_on(Lamp::SideGreen), *phase == Phase::SideGreen);
            assert_eq!(bank.is_on(Lamp::PedestrianGreen), *phase == Phase::PedCross);
        }
    }

    #[test]
    fn test_every_head_shows_something() {
        for phase in Phase::VARIANTS {
            let bank = decode(*phase);
            assert!(bank.is_on(Lamp::MainRed) || bank.is_on(Lamp::MainAmber) || bank.is_on(Lamp::MainGreen));
            assert!(bank.is_on(Lamp::SideRed) || bank.is_on(Lamp::SideAmber) || bank.is_on(Lamp::SideGreen));
            assert_ne!(bank.is_on(Lamp::PedestrianRed), bank.is_on(Lamp::PedestrianGreen));
        }
    }

    #[test]
    fn test_prep_is_red_and_amber() {
        let side = decode(Phase::SidePrep);
        assert!(side.is_on(Lamp::SideRed) && side.is_on(Lamp::SideAmber));
        assert!(!side.is_on(Lamp::MainAmber));

        let main = decode(Phase::MainPrep);
        assert!(main.is_on(Lamp::MainRed) && main.is_on(Lamp::MainAmber));
        assert!(!main.is_on(Lamp::SideAmber));
    }

    #[test]
    fn test_amber_after_green_has_no_red() {
        let main = decode(Phase::MainAmber);
        assert!(main.is_on(Lamp::MainAmber));
        assert!(!main.is_on(Lamp::MainRed));

        let side = decode(Phase::SideAmber);
        assert!(side.is_on(Lamp::SideAmber));
        assert!(!side.is_on(Lamp::SideRed));
    }

    #[test]
    fn test_port_bits() {
        assert_eq!(SignalBank::dark().bits(), 0);
        assert_eq!(decode(Phase::MainGreen).bits(), 0b0011_0010);
        assert_eq!(decode(Phase::PedCross).bits(), 0b1001_0001);
        assert_eq!(decode(Phase::SidePrep).bits(), 0b1001_1010);
        assert_eq!(decode(Phase::AllRed1).bits(), 0b1001_0010);
    }

    #[test]
    fn test_port_bits_match_lamps() {
        for phase in Phase::VARIANTS {
            let bank = decode(*phase);
            for (lamp, on) in bank.iter() {
                assert_eq!(bank.bits() & (1 << lamp.ordinal()) != 0, on, "{:?} {:?}", phase, lamp);
            }
        }
    }

    #[test]
    fn test_iter_covers_all_lamps_in_order() {
        let bank = decode(Phase::SideGreen);
        let lamps: Vec<(Lamp, bool)> = bank.iter().collect();
        assert_eq!(lamps.len(), Lamp::VARIANT_COUNT);
        assert_eq!(lamps[0], (Lamp::PedestrianGreen, false));
        assert_eq!(lamps[2], (Lamp::SideGreen, true));
        assert_eq!(lamps[7], (Lamp::MainRed, true));
    }
}
