pub const FULL_BATTERY: u8 = 100;

/// Display band of the battery gauge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatteryBand {
    /// Above 50%
    Green,
    /// 11% to 50%
    Orange,
    /// 10% and below
    Red,
}

/// Simulated battery, drained by one percent per playback tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Battery {
    level: u8,
}

impl Default for Battery {
    fn default() -> Self {
        Self { level: FULL_BATTERY }
    }
}

impl Battery {
    pub fn with_level(level: u8) -> Self {
        Self {
            level: level.min(FULL_BATTERY),
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn is_empty(&self) -> bool {
        self.level == 0
    }

    /// Takes one percent off, never going below zero. Returns the new level.
    pub fn drain(&mut self) -> u8 {
        self.level = self.level.saturating_sub(1);
        self.level
    }

    pub fn band(&self) -> BatteryBand {
        match self.level {
            51.. => BatteryBand::Green,
            11..=50 => BatteryBand::Orange,
            _ => BatteryBand::Red,
        }
    }
}
