//! Bridge configuration.

/// Delay before the reset line is driven low.
pub const RESET_PRE_DELAY_MS: u32 = 20;
/// Minimum time the reset line is held low.
pub const RESET_LOW_MS: u32 = 20;
/// Minimum time after reset release before the first register access.
pub const RESET_HIGH_MS: u32 = 40;
/// Settle time after the downstream panel is switched.
pub const PANEL_SETTLE_MS: u32 = 40;

/// How supply rail failures affect the power sequences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PowerPolicy {
    /// Log the failure and carry on with reset and init.
    #[default]
    Lenient,
    /// Abort bring-up on the first rail failure.
    Strict,
}

/// Reset and settle delays in milliseconds.
///
/// Every delay is at least its hardware minimum; [`ResetTiming::new`] raises
/// anything shorter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetTiming {
    pre_delay_ms: u32,
    low_ms: u32,
    high_ms: u32,
    settle_ms: u32,
}

impl ResetTiming {
    pub const MINIMUM: Self = Self {
        pre_delay_ms: RESET_PRE_DELAY_MS,
        low_ms: RESET_LOW_MS,
        high_ms: RESET_HIGH_MS,
        settle_ms: PANEL_SETTLE_MS,
    };

    pub fn new(pre_delay_ms: u32, low_ms: u32, high_ms: u32, settle_ms: u32) -> Self {
        Self {
            pre_delay_ms: pre_delay_ms.max(RESET_PRE_DELAY_MS),
            low_ms: low_ms.max(RESET_LOW_MS),
            high_ms: high_ms.max(RESET_HIGH_MS),
            settle_ms: settle_ms.max(PANEL_SETTLE_MS),
        }
    }

    pub fn pre_delay_ms(&self) -> u32 {
        self.pre_delay_ms
    }

    pub fn low_ms(&self) -> u32 {
        self.low_ms
    }

    pub fn high_ms(&self) -> u32 {
        self.high_ms
    }

    pub fn settle_ms(&self) -> u32 {
        self.settle_ms
    }

    /// Total blocking time of one reset pulse.
    pub fn pulse_ms(&self) -> u32 {
        self.pre_delay_ms + self.low_ms + self.high_ms
    }
}

impl Default for ResetTiming {
    fn default() -> Self {
        Self::MINIMUM
    }
}

/// Per-device driver configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BridgeConfig {
    /// DSI virtual channel of the bridge.
    pub channel: u8,
    pub power_policy: PowerPolicy,
    pub timing: ResetTiming,
}

/// Pixel format the bridge expects on its DSI input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb888,
}

/// DSI peripheral parameters the host must be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DsiDeviceConfig {
    pub lanes: u8,
    pub format: PixelFormat,
    pub video_mode: bool,
    pub burst: bool,
    pub auto_vertical: bool,
}

impl DsiDeviceConfig {
    /// Four data lanes of RGB888 burst video, matching the init program.
    pub const TC358764: Self = Self {
        lanes: 4,
        format: PixelFormat::Rgb888,
        video_mode: true,
        burst: true,
        auto_vertical: true,
    };
}
