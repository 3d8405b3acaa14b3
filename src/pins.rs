//! GPIO pin resolution.
//!
//! The sensor tool takes a BCM GPIO number on the command line. Only a handful
//! of lines are wired on the lab boards; anything else is a configuration
//! mistake and is rejected before the sensor is touched.

/// A resolved GPIO line the sensor driver can open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusHandle {
    /// BCM line offset on the GPIO controller
    pub line: u8,
}

/// Maps a user-supplied pin number to a bus handle.
pub trait PinMap {
    /// Returns `None` when the pin is not supported on this board.
    fn resolve(&self, pin: i32) -> Option<BusHandle>;
}

/// GPIO lines that can carry the DHT11 data wire on the lab's Pi boards.
///
/// GPIO 4 (physical pin 7) is the default and the most stable choice.
pub const SUPPORTED_LINES: [u8; 5] = [4, 6, 17, 18, 27];

/// Pin map for the Raspberry Pi 40-pin header as wired in the lab.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoardPinMap;

impl PinMap for BoardPinMap {
    fn resolve(&self, pin: i32) -> Option<BusHandle> {
        let line = u8::try_from(pin).ok()?;
        SUPPORTED_LINES
            .contains(&line)
            .then_some(BusHandle { line })
    }
}

/// Convert a BCM GPIO number to its physical header pin, for log messages.
pub fn gpio_to_header_pin(line: u8) -> Option<u8> {
    match line {
        4 => Some(7),
        6 => Some(31),
        17 => Some(11),
        18 => Some(12),
        27 => Some(13),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_lines_resolve_to_themselves() {
        for line in SUPPORTED_LINES {
            assert_eq!(
                BoardPinMap.resolve(i32::from(line)),
                Some(BusHandle { line })
            );
        }
    }

    #[test]
    fn unwired_and_out_of_range_pins_are_unsupported() {
        for pin in [-1, 0, 5, 22, 255, 256, 1000] {
            assert_eq!(BoardPinMap.resolve(pin), None, "pin {pin}");
        }
    }

    #[test]
    fn header_pin_lookup_covers_every_supported_line() {
        for line in SUPPORTED_LINES {
            assert!(gpio_to_header_pin(line).is_some());
        }
        assert_eq!(gpio_to_header_pin(4), Some(7));
    }
}
