//! Supply rail and reset line sequencing.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use tc358764_hal::{Panel, RailFault, Regulator, SupplyRails};

use crate::config::{PowerPolicy, ResetTiming};
use crate::error::PowerError;

/// Supply names in bulk-switch order.
pub const SUPPLY_NAMES: [&str; 5] = ["vddc", "vddio", "vddmipi", "vddlvds133", "vddlvds112"];

/// The bridge's five supplies, switched all-or-nothing.
pub struct SupplySet<R: Regulator> {
    rails: [(&'static str, R); 5],
}

impl<R: Regulator> SupplySet<R> {
    /// Regulators in [`SUPPLY_NAMES`] order.
    pub fn new(regulators: [R; 5]) -> Self {
        let mut names = SUPPLY_NAMES.iter();
        Self {
            rails: regulators.map(|r| (*names.next().unwrap_or(&"?"), r)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&R> {
        self.rails.iter().find(|(n, _)| *n == name).map(|(_, r)| r)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &R)> {
        self.rails.iter().map(|(n, r)| (*n, r))
    }

    pub fn into_inner(self) -> [R; 5] {
        self.rails.map(|(_, r)| r)
    }
}

impl<R: Regulator> SupplyRails for SupplySet<R> {
    type Error = R::Error;

    fn bulk_enable(&mut self) -> Result<(), RailFault<R::Error>> {
        for i in 0..self.rails.len() {
            let (name, rail) = &mut self.rails[i];
            if let Err(cause) = rail.enable() {
                let rail = *name;
                for (done, r) in self.rails[..i].iter_mut().rev() {
                    if let Err(e) = r.disable() {
                        log::warn!("failed to roll back supply {done}: {e:?}");
                    }
                }
                return Err(RailFault { rail, cause });
            }
        }
        Ok(())
    }

    fn bulk_disable(&mut self) -> Result<(), RailFault<R::Error>> {
        for i in 0..self.rails.len() {
            let (name, rail) = &mut self.rails[i];
            if let Err(cause) = rail.disable() {
                let rail = *name;
                for (done, r) in self.rails[..i].iter_mut().rev() {
                    if let Err(e) = r.enable() {
                        log::warn!("failed to roll back supply {done}: {e:?}");
                    }
                }
                return Err(RailFault { rail, cause });
            }
        }
        Ok(())
    }
}

pub fn power_on<S: SupplyRails + ?Sized>(rails: &mut S) -> Result<(), PowerError> {
    rails.bulk_enable().map_err(|f| PowerError::Enable {
        rail: f.rail,
        detail: format!("{:?}", f.cause),
    })
}

pub fn power_off<S: SupplyRails + ?Sized>(rails: &mut S) -> Result<(), PowerError> {
    rails.bulk_disable().map_err(|f| PowerError::Disable {
        rail: f.rail,
        detail: format!("{:?}", f.cause),
    })
}

/// Pulse the active-low reset line. Blocks for [`ResetTiming::pulse_ms`].
///
/// A pin error is logged and the pulse still runs its full timing.
pub fn reset_pulse<L, D>(line: &mut L, delay: &mut D, timing: &ResetTiming)
where
    L: OutputPin + ?Sized,
    D: DelayNs + ?Sized,
{
    delay.delay_ms(timing.pre_delay_ms());
    if let Err(e) = line.set_low() {
        log::warn!("reset line: failed to drive low: {e:?}");
    }
    delay.delay_ms(timing.low_ms());
    if let Err(e) = line.set_high() {
        log::warn!("reset line: failed to drive high: {e:?}");
    }
    delay.delay_ms(timing.high_ms());
}

/// Borrowed power-path hardware for the duration of one sequence.
pub struct Sequencer<'a, S: ?Sized, L: ?Sized, D: ?Sized> {
    pub rails: &'a mut S,
    pub reset: &'a mut L,
    pub delay: &'a mut D,
    pub timing: ResetTiming,
    pub policy: PowerPolicy,
}

impl<S, L, D> Sequencer<'_, S, L, D>
where
    S: SupplyRails + ?Sized,
    L: OutputPin + ?Sized,
    D: DelayNs + ?Sized,
{
    /// Rails on, reset pulse, panel on, settle.
    ///
    /// Only fails under [`PowerPolicy::Strict`], before anything past the
    /// rails has been touched.
    pub fn enable_sequence<P: Panel + ?Sized>(&mut self, panel: &mut P) -> Result<(), PowerError> {
        if let Err(e) = power_on(self.rails) {
            log::error!("error enabling regulators: {e}");
            if self.policy == PowerPolicy::Strict {
                return Err(e);
            }
        }

        reset_pulse(self.reset, self.delay, &self.timing);

        if let Err(e) = panel.enable() {
            log::warn!("downstream panel enable failed: {e:?}");
        }
        self.delay.delay_ms(self.timing.settle_ms());
        Ok(())
    }

    /// Reset pulse, panel off, settle, rails off.
    ///
    /// Runs every step regardless of failures; the returned error is the
    /// rail failure, if any.
    pub fn disable_sequence<P: Panel + ?Sized>(&mut self, panel: &mut P) -> Result<(), PowerError> {
        reset_pulse(self.reset, self.delay, &self.timing);

        if let Err(e) = panel.disable() {
            log::warn!("downstream panel disable failed: {e:?}");
        }
        self.delay.delay_ms(self.timing.settle_ms());

        power_off(self.rails).inspect_err(|e| log::error!("error disabling regulators: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Rail {
        name: &'static str,
        fail_enable: bool,
        fail_disable: bool,
        log: Log,
    }

    impl Regulator for Rail {
        type Error = &'static str;

        fn enable(&mut self) -> Result<(), Self::Error> {
            if self.fail_enable {
                return Err("enable refused");
            }
            self.log.borrow_mut().push(format!("+{}", self.name));
            Ok(())
        }

        fn disable(&mut self) -> Result<(), Self::Error> {
            if self.fail_disable {
                return Err("disable refused");
            }
            self.log.borrow_mut().push(format!("-{}", self.name));
            Ok(())
        }
    }

    fn supplies(log: &Log, failing: Option<&str>) -> SupplySet<Rail> {
        SupplySet::new(SUPPLY_NAMES.map(|name| Rail {
            name,
            fail_enable: Some(name) == failing,
            fail_disable: Some(name) == failing,
            log: log.clone(),
        }))
    }

    #[test]
    fn bulk_enable_all_rails_in_order() {
        let log = Log::default();
        let mut set = supplies(&log, None);
        power_on(&mut set).unwrap();
        assert_eq!(
            *log.borrow(),
            ["+vddc", "+vddio", "+vddmipi", "+vddlvds133", "+vddlvds112"]
        );
    }

    #[test]
    fn bulk_enable_rolls_back_and_names_first_failure() {
        let log = Log::default();
        let mut set = supplies(&log, Some("vddmipi"));
        let err = power_on(&mut set).unwrap_err();
        assert_eq!(
            err,
            PowerError::Enable {
                rail: "vddmipi",
                detail: "\"enable refused\"".into()
            }
        );
        assert_eq!(*log.borrow(), ["+vddc", "+vddio", "-vddio", "-vddc"]);
    }

    #[test]
    fn bulk_disable_rolls_back_and_names_first_failure() {
        let log = Log::default();
        let mut set = supplies(&log, Some("vddlvds133"));
        let err = power_off(&mut set).unwrap_err();
        assert_eq!(err.rail(), "vddlvds133");
        assert_eq!(
            *log.borrow(),
            ["-vddc", "-vddio", "-vddmipi", "+vddmipi", "+vddio", "+vddc"]
        );
    }

    #[test]
    fn supply_lookup_by_name() {
        let log = Log::default();
        let set = supplies(&log, None);
        assert_eq!(set.get("vddlvds112").map(|r| r.name), Some("vddlvds112"));
        assert!(set.get("vdd").is_none());
        let names: Vec<_> = set.iter().map(|(n, _)| n).collect();
        assert_eq!(names, SUPPLY_NAMES);
    }
}
