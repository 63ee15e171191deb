//! Pin map table and its compile-time validation
//!
//! A map is built with [`PinMap::new`] inside a `const` item. Any aliasing,
//! out-of-range GPIO or misordered row panics during const evaluation, which
//! turns a wiring mistake into a build error instead of a runtime fault.

use core::fmt;

use super::role::{BusRole, Role};

/// Highest GPIO broken out on the board
///
/// GPIO29 exists on the RP2040 but is wired to the VSYS sense divider.
pub const MAX_BOARD_GPIO: u8 = 28;

/// One row of the pin map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinBinding {
    role: Role,
    pin: u8,
    bus: BusRole,
}

impl PinBinding {
    /// Bind a role to a GPIO; the bus follows from the role
    pub const fn new(role: Role, pin: u8) -> Self {
        Self {
            role,
            pin,
            bus: role.bus(),
        }
    }

    /// Logical role
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Physical GPIO number
    pub const fn pin(&self) -> u8 {
        self.pin
    }

    /// Hardware block the pin is routed to
    pub const fn bus(&self) -> BusRole {
        self.bus
    }
}

/// GPS UART pin pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartPins {
    pub tx: PinBinding,
    pub rx: PinBinding,
}

/// Host SPI pin quad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiPins {
    pub rx: PinBinding,
    pub cs: PinBinding,
    pub sck: PinBinding,
    pub tx: PinBinding,
}

/// Reasons a pin table is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMapError {
    /// Row `index` holds `found` instead of the role with that index
    RoleMismatch { index: usize, found: Role },
    /// GPIO number outside `0..=MAX_BOARD_GPIO`
    InvalidPin { role: Role, pin: u8 },
    /// Two roles bound to the same GPIO
    Conflict { pin: u8, first: Role, second: Role },
}

impl fmt::Display for PinMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinMapError::RoleMismatch { index, found } => {
                write!(f, "row {} holds {}, expected {}", index, found, Role::ALL[*index])
            }
            PinMapError::InvalidPin { role, pin } => {
                write!(f, "{} on gpio{} is outside 0..={}", role, pin, MAX_BOARD_GPIO)
            }
            PinMapError::Conflict { pin, first, second } => {
                write!(f, "gpio{} bound to both {} and {}", pin, first, second)
            }
        }
    }
}

/// Role → GPIO table for one board revision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinMap {
    bindings: [PinBinding; Role::COUNT],
}

impl PinMap {
    /// Build a validated map, panicking on any error
    ///
    /// Use from a `const` item so the panic surfaces at compile time:
    ///
    /// ```
    /// use podboard_core::pins::{PinBinding, PinMap, Role};
    ///
    /// const PINS: PinMap = PinMap::new([
    ///     PinBinding::new(Role::Led, 25),
    ///     PinBinding::new(Role::GpsTx, 0),
    ///     PinBinding::new(Role::GpsRx, 1),
    ///     PinBinding::new(Role::SensorSda, 2),
    ///     PinBinding::new(Role::SpiRx, 8),
    ///     PinBinding::new(Role::SpiCs, 9),
    ///     PinBinding::new(Role::SpiSck, 10),
    ///     PinBinding::new(Role::SpiTx, 11),
    ///     PinBinding::new(Role::LedStripPio, 3),
    /// ]);
    /// assert_eq!(PINS.pin(Role::Led), 25);
    /// ```
    ///
    /// Two roles on one GPIO fail the build:
    ///
    /// ```compile_fail
    /// use podboard_core::pins::{PinBinding, PinMap, Role};
    ///
    /// const PINS: PinMap = PinMap::new([
    ///     PinBinding::new(Role::Led, 25),
    ///     PinBinding::new(Role::GpsTx, 0),
    ///     PinBinding::new(Role::GpsRx, 1),
    ///     PinBinding::new(Role::SensorSda, 2),
    ///     PinBinding::new(Role::SpiRx, 8),
    ///     PinBinding::new(Role::SpiCs, 9),
    ///     PinBinding::new(Role::SpiSck, 10),
    ///     PinBinding::new(Role::SpiTx, 11),
    ///     PinBinding::new(Role::LedStripPio, 2),
    /// ]);
    /// assert_eq!(PINS.pin(Role::LedStripPio), 2);
    /// ```
    pub const fn new(bindings: [PinBinding; Role::COUNT]) -> Self {
        match Self::try_new(bindings) {
            Ok(map) => map,
            Err(PinMapError::RoleMismatch { .. }) => {
                panic!("pin map must list every role exactly once, in Role order")
            }
            Err(PinMapError::InvalidPin { .. }) => {
                panic!("pin map binds a role to a GPIO the board does not break out")
            }
            Err(PinMapError::Conflict { .. }) => {
                panic!("pin map binds two roles to the same GPIO")
            }
        }
    }

    /// Build a map, reporting the first problem found
    pub const fn try_new(bindings: [PinBinding; Role::COUNT]) -> Result<Self, PinMapError> {
        let mut i = 0;
        while i < Role::COUNT {
            let binding = bindings[i];
            if binding.role as usize != i {
                return Err(PinMapError::RoleMismatch {
                    index: i,
                    found: binding.role,
                });
            }
            if binding.pin > MAX_BOARD_GPIO {
                return Err(PinMapError::InvalidPin {
                    role: binding.role,
                    pin: binding.pin,
                });
            }

            let mut j = 0;
            while j < i {
                if bindings[j].pin == binding.pin {
                    return Err(PinMapError::Conflict {
                        pin: binding.pin,
                        first: bindings[j].role,
                        second: binding.role,
                    });
                }
                j += 1;
            }
            i += 1;
        }

        Ok(Self { bindings })
    }

    /// GPIO bound to `role`
    pub const fn pin(&self, role: Role) -> u8 {
        self.bindings[role.index()].pin
    }

    /// Full binding for `role`
    pub const fn binding(&self, role: Role) -> PinBinding {
        self.bindings[role.index()]
    }

    /// Role bound to `pin`, if any
    pub fn role_of(&self, pin: u8) -> Option<Role> {
        self.bindings.iter().find(|b| b.pin == pin).map(|b| b.role)
    }

    /// All bindings in role order
    pub fn iter(&self) -> impl Iterator<Item = &PinBinding> {
        self.bindings.iter()
    }

    /// GPS UART pair
    pub const fn gps_uart(&self) -> UartPins {
        UartPins {
            tx: self.binding(Role::GpsTx),
            rx: self.binding(Role::GpsRx),
        }
    }

    /// Host SPI quad
    pub const fn host_spi(&self) -> SpiPins {
        SpiPins {
            rx: self.binding(Role::SpiRx),
            cs: self.binding(Role::SpiCs),
            sck: self.binding(Role::SpiSck),
            tx: self.binding(Role::SpiTx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn table(pins: [u8; Role::COUNT]) -> [PinBinding; Role::COUNT] {
        let mut bindings = [PinBinding::new(Role::Led, 0); Role::COUNT];
        for (i, role) in Role::ALL.iter().enumerate() {
            bindings[i] = PinBinding::new(*role, pins[i]);
        }
        bindings
    }

    const REFERENCE: PinMap = PinMap::new([
        PinBinding::new(Role::Led, 25),
        PinBinding::new(Role::GpsTx, 0),
        PinBinding::new(Role::GpsRx, 1),
        PinBinding::new(Role::SensorSda, 2),
        PinBinding::new(Role::SpiRx, 8),
        PinBinding::new(Role::SpiCs, 9),
        PinBinding::new(Role::SpiSck, 10),
        PinBinding::new(Role::SpiTx, 11),
        PinBinding::new(Role::LedStripPio, 3),
    ]);

    #[test]
    fn test_reference_lookup() {
        assert_eq!(REFERENCE.pin(Role::Led), 25);
        assert_eq!(REFERENCE.pin(Role::LedStripPio), 3);
        assert_eq!(REFERENCE.binding(Role::SensorSda).bus(), BusRole::I2c);
        assert_eq!(REFERENCE.role_of(10), Some(Role::SpiSck));
        assert_eq!(REFERENCE.role_of(4), None);

        let uart = REFERENCE.gps_uart();
        assert_eq!((uart.tx.pin(), uart.rx.pin()), (0, 1));

        let spi = REFERENCE.host_spi();
        assert_eq!(
            (spi.rx.pin(), spi.cs.pin(), spi.sck.pin(), spi.tx.pin()),
            (8, 9, 10, 11)
        );
    }

    #[test]
    fn test_reference_pins_are_distinct() {
        for a in REFERENCE.iter() {
            for b in REFERENCE.iter() {
                if a.role() != b.role() {
                    assert_ne!(a.pin(), b.pin());
                }
            }
        }
    }

    #[test]
    fn test_conflict_rejected() {
        let mut pins = [25, 0, 1, 2, 8, 9, 10, 11, 3];
        pins[8] = 2; // strip onto the sensor line
        assert_eq!(
            PinMap::try_new(table(pins)),
            Err(PinMapError::Conflict {
                pin: 2,
                first: Role::SensorSda,
                second: Role::LedStripPio,
            })
        );
    }

    #[test]
    fn test_out_of_range_rejected() {
        let pins = [29, 0, 1, 2, 8, 9, 10, 11, 3];
        assert_eq!(
            PinMap::try_new(table(pins)),
            Err(PinMapError::InvalidPin {
                role: Role::Led,
                pin: 29
            })
        );
    }

    #[test]
    fn test_misordered_rows_rejected() {
        let mut bindings = table([25, 0, 1, 2, 8, 9, 10, 11, 3]);
        bindings.swap(1, 2);
        assert_eq!(
            PinMap::try_new(bindings),
            Err(PinMapError::RoleMismatch {
                index: 1,
                found: Role::GpsRx
            })
        );
    }

    #[test]
    #[should_panic(expected = "same GPIO")]
    fn test_new_panics_on_conflict() {
        let _ = PinMap::new(table([25, 0, 0, 2, 8, 9, 10, 11, 3]));
    }

    proptest! {
        #[test]
        fn prop_accepted_maps_never_alias(pins in proptest::array::uniform9(0u8..40)) {
            let in_range = pins.iter().all(|p| *p <= MAX_BOARD_GPIO);
            let mut sorted = pins;
            sorted.sort_unstable();
            let distinct = sorted.windows(2).all(|w| w[0] != w[1]);

            match PinMap::try_new(table(pins)) {
                Ok(map) => {
                    prop_assert!(in_range && distinct);
                    for role in Role::ALL {
                        prop_assert_eq!(map.role_of(map.pin(role)), Some(role));
                    }
                }
                Err(_) => prop_assert!(!(in_range && distinct)),
            }
        }
    }
}
