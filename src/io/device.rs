use std::{collections::BTreeSet, thread, time::Duration};

use log::info;

use crate::io::{
    ServiceError, ServiceResult,
    keymap::{char_key, key_code},
};

/// Keyboard and pointer control.
///
/// Durations are wall-clock time the action should take; implementations
/// may block for them.
pub trait Device {
    /// Presses every button, waits `duration`, then releases them.
    fn press(&mut self, buttons: &[String], duration: Duration) -> ServiceResult<()>;

    /// Presses every button without releasing.
    fn hold(&mut self, buttons: &[String]) -> ServiceResult<()>;

    /// Releases every button.
    fn release(&mut self, buttons: &[String]) -> ServiceResult<()>;

    /// Moves the pointer to `(x, y)` over `duration`.
    fn move_to(&mut self, x: i64, y: i64, duration: Duration) -> ServiceResult<()>;

    /// Moves the pointer by `(dx, dy)` over `duration`.
    fn move_by(&mut self, dx: i64, dy: i64, duration: Duration) -> ServiceResult<()> {
        let (x, y) = self.cursor()?;
        self.move_to(x.saturating_add(dx), y.saturating_add(dy), duration)
    }

    /// Turns the wheel by `amount` notches over `duration`. Positive is up.
    fn scroll(&mut self, amount: i64, duration: Duration) -> ServiceResult<()>;

    /// Types `text`, pausing `delay` after each character.
    fn type_text(&mut self, text: &str, delay: Duration) -> ServiceResult<()>;

    /// Whether `button` is currently down.
    fn is_pressed(&mut self, button: &str) -> ServiceResult<bool>;

    /// The pointer position.
    fn cursor(&mut self) -> ServiceResult<(i64, i64)>;
}

/// Number of intermediate positions a timed movement passes through.
const TWEEN_STEPS: u32 = 100;

/// A headless device that tracks pointer and button state and logs every
/// action.
///
/// Timed actions really sleep, so scripts keep their pacing when run
/// without an input backend.
#[derive(Debug, Clone, Default)]
pub struct VirtualDevice {
    cursor: (i64, i64),
    held:   BTreeSet<u16>,
}

impl VirtualDevice {
    fn codes(buttons: &[String]) -> ServiceResult<Vec<u16>> {
        buttons.iter()
               .map(|b| key_code(b).ok_or_else(|| ServiceError::UnknownButton(b.clone())))
               .collect()
    }
}

impl Device for VirtualDevice {
    fn press(&mut self, buttons: &[String], duration: Duration) -> ServiceResult<()> {
        let codes = Self::codes(buttons)?;
        info!("press {buttons:?} for {duration:?}");
        self.held.extend(&codes);
        thread::sleep(duration);
        for code in codes {
            self.held.remove(&code);
        }
        Ok(())
    }

    fn hold(&mut self, buttons: &[String]) -> ServiceResult<()> {
        let codes = Self::codes(buttons)?;
        info!("hold {buttons:?}");
        self.held.extend(codes);
        Ok(())
    }

    fn release(&mut self, buttons: &[String]) -> ServiceResult<()> {
        let codes = Self::codes(buttons)?;
        info!("release {buttons:?}");
        for code in codes {
            self.held.remove(&code);
        }
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_precision_loss)]
    fn move_to(&mut self, x: i64, y: i64, duration: Duration) -> ServiceResult<()> {
        info!("move to ({x}, {y}) over {duration:?}");
        if !duration.is_zero() {
            let (start_x, start_y) = self.cursor;
            let step = duration / TWEEN_STEPS;
            for i in 1..=TWEEN_STEPS {
                let t = f64::from(i) / f64::from(TWEEN_STEPS);
                self.cursor = (start_x + (x.saturating_sub(start_x) as f64 * t) as i64,
                               start_y + (y.saturating_sub(start_y) as f64 * t) as i64);
                thread::sleep(step);
            }
        }
        self.cursor = (x, y);
        Ok(())
    }

    fn scroll(&mut self, amount: i64, duration: Duration) -> ServiceResult<()> {
        info!("scroll {amount} over {duration:?}");
        let notches = u32::try_from(amount.unsigned_abs()).unwrap_or(u32::MAX).max(1);
        thread::sleep(duration / notches);
        Ok(())
    }

    fn type_text(&mut self, text: &str, delay: Duration) -> ServiceResult<()> {
        for c in text.chars() {
            let (code, shift) = char_key(c).ok_or_else(|| ServiceError::UnknownButton(c.to_string()))?;
            info!("type {c:?} (key {code:#04x}{})", if shift { ", shift" } else { "" });
            thread::sleep(delay);
        }
        Ok(())
    }

    fn is_pressed(&mut self, button: &str) -> ServiceResult<bool> {
        let code = key_code(button).ok_or_else(|| ServiceError::UnknownButton(button.to_string()))?;
        Ok(self.held.contains(&code))
    }

    fn cursor(&mut self) -> ServiceResult<(i64, i64)> {
        Ok(self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(buttons: &[&str]) -> Vec<String> {
        buttons.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn held_buttons_are_tracked_until_released() {
        let mut device = VirtualDevice::default();
        device.hold(&names(&["shift", "a"])).unwrap();

        assert!(device.is_pressed("SHIFT").unwrap());
        device.release(&names(&["SHIFT"])).unwrap();
        assert!(!device.is_pressed("shift").unwrap());
        assert!(device.is_pressed("A").unwrap());
    }

    #[test]
    fn unknown_buttons_are_rejected() {
        let mut device = VirtualDevice::default();

        assert!(matches!(device.press(&names(&["NOPE"]), Duration::ZERO),
                         Err(ServiceError::UnknownButton(name)) if name == "NOPE"));
    }

    #[test]
    fn relative_moves_start_from_the_cursor() {
        let mut device = VirtualDevice::default();
        device.move_to(100, 50, Duration::ZERO).unwrap();
        device.move_by(-20, 5, Duration::ZERO).unwrap();

        assert_eq!(device.cursor().unwrap(), (80, 55));
    }
}
