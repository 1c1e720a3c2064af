use crate::cfg::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [PowerMode] requested by measurement clients (V1.1 and later).
/// Besides [PowerMode::Invalid], each mode trades measurement
/// availability against power consumption.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PowerMode {
    /// Sentinel: no particular power mode requested.
    /// The engine then runs with its own defaults and the
    /// time between measurements is not forwarded.
    #[default]
    Invalid,

    /// [PowerMode::M1]: improved accuracy, full power
    #[cfg_attr(feature = "serde", serde(alias = "m1"))]
    M1,

    /// [PowerMode::M2]: normal mode, full power
    #[cfg_attr(feature = "serde", serde(alias = "m2"))]
    M2,

    /// [PowerMode::M3]: low power, reduced availability
    #[cfg_attr(feature = "serde", serde(alias = "m3"))]
    M3,

    /// [PowerMode::M4]: duty cycled, measurements every
    /// "time between measurements"
    #[cfg_attr(feature = "serde", serde(alias = "m4"))]
    M4,

    /// [PowerMode::M5]: background keep alive
    #[cfg_attr(feature = "serde", serde(alias = "m5"))]
    M5,
}

impl PowerMode {
    /// Builds [PowerMode] from its raw (interface) value.
    /// Unknown values fall back to [PowerMode::Invalid].
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => Self::M1,
            2 => Self::M2,
            3 => Self::M3,
            4 => Self::M4,
            5 => Self::M5,
            _ => Self::Invalid,
        }
    }

    /// Returns the raw (interface) value
    pub fn raw(&self) -> u32 {
        match self {
            Self::Invalid => 0,
            Self::M1 => 1,
            Self::M2 => 2,
            Self::M3 => 3,
            Self::M4 => 4,
            Self::M5 => 5,
        }
    }

    /// True when an actual power mode was requested
    pub fn is_valid(&self) -> bool {
        *self != Self::Invalid
    }
}

impl std::str::FromStr for PowerMode {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "invalid" => Ok(Self::Invalid),
            "m1" => Ok(Self::M1),
            "m2" => Ok(Self::M2),
            "m3" => Ok(Self::M3),
            "m4" => Ok(Self::M4),
            "m5" => Ok(Self::M5),
            _ => Err(Error::InvalidPowerMode),
        }
    }
}

impl std::fmt::Display for PowerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid => write!(f, "invalid"),
            Self::M1 => write!(f, "M1"),
            Self::M2 => write!(f, "M2"),
            Self::M3 => write!(f, "M3"),
            Self::M4 => write!(f, "M4"),
            Self::M5 => write!(f, "M5"),
        }
    }
}

/// Positioning mode the engine should be started in.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PositioningMode {
    /// Autonomous receiver, no assistance
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "standalone"))]
    Standalone,

    /// Mobile station based: assistance data, position computed locally
    #[cfg_attr(feature = "serde", serde(alias = "msb", alias = "ms-based"))]
    MsBased,

    /// Mobile station assisted: position computed by the network
    #[cfg_attr(feature = "serde", serde(alias = "msa", alias = "ms-assisted"))]
    MsAssisted,
}

impl std::str::FromStr for PositioningMode {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standalone" => Ok(Self::Standalone),
            "msb" | "ms-based" => Ok(Self::MsBased),
            "msa" | "ms-assisted" => Ok(Self::MsAssisted),
            _ => Err(Error::InvalidPositioningMode),
        }
    }
}

impl std::fmt::Display for PositioningMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standalone => write!(f, "standalone"),
            Self::MsBased => write!(f, "ms-based"),
            Self::MsAssisted => write!(f, "ms-assisted"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{PositioningMode, PowerMode};
    use std::str::FromStr;

    #[test]
    fn power_mode_raw_values() {
        for raw in 0..6 {
            assert_eq!(PowerMode::from_raw(raw).raw(), raw);
        }
        assert_eq!(PowerMode::from_raw(42), PowerMode::Invalid);
        assert!(!PowerMode::Invalid.is_valid());
        assert!(PowerMode::M4.is_valid());
    }

    #[test]
    fn power_mode_parsing() {
        assert_eq!(PowerMode::from_str(" M3 ").unwrap(), PowerMode::M3);
        assert_eq!(PowerMode::from_str("invalid").unwrap(), PowerMode::Invalid);
        assert!(PowerMode::from_str("m6").is_err());
    }

    #[test]
    fn positioning_mode_parsing() {
        assert_eq!(
            PositioningMode::from_str("MSB").unwrap(),
            PositioningMode::MsBased
        );
        assert_eq!(
            PositioningMode::from_str("ms-assisted").unwrap(),
            PositioningMode::MsAssisted
        );
        assert!(PositioningMode::from_str("rtk").is_err());

        let mode = PositioningMode::Standalone;
        assert_eq!(PositioningMode::from_str(&mode.to_string()).unwrap(), mode);
    }
}
