//! Logical carrier selection.
//!
//! The carrier names where the RF sink should centre its transmission. It is
//! separate from the baseband offset the RF channel applies to its samples.

use serde::{Deserialize, Serialize};

use crate::constants::HYDROGEN_LINE_HZ;

/// Licence-free ISM band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IsmBand {
    /// 433.92 MHz.
    #[serde(rename = "433")]
    Ism433,
    /// 868 MHz.
    #[serde(rename = "868")]
    Ism868,
    /// 2.4 GHz.
    #[serde(rename = "2400")]
    Ism2400,
}

impl IsmBand {
    /// All bands in ascending frequency order.
    pub const ALL: [IsmBand; 3] = [IsmBand::Ism433, IsmBand::Ism868, IsmBand::Ism2400];

    /// Returns the band name used in configuration.
    pub fn name(&self) -> &'static str {
        match self {
            IsmBand::Ism433 => "433",
            IsmBand::Ism868 => "868",
            IsmBand::Ism2400 => "2400",
        }
    }

    /// Centre frequency in Hz.
    pub fn frequency_hz(&self) -> f64 {
        match self {
            IsmBand::Ism433 => 433.92e6,
            IsmBand::Ism868 => 868e6,
            IsmBand::Ism2400 => 2.4e9,
        }
    }

    /// Maximum licence-free radiated power in mW.
    pub fn max_power_mw(&self) -> u32 {
        match self {
            IsmBand::Ism433 => 25,
            IsmBand::Ism868 => 500,
            IsmBand::Ism2400 => 100,
        }
    }

    /// Regulatory region.
    pub fn region(&self) -> &'static str {
        match self {
            IsmBand::Ism433 | IsmBand::Ism868 => "EU",
            IsmBand::Ism2400 => "Global",
        }
    }
}

/// Carrier the RF sink is asked to transmit on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarrierSelector {
    /// The 21 cm hydrogen line.
    Hydrogen,
    /// A named ISM band.
    Ism(IsmBand),
    /// An explicit frequency in Hz.
    Custom(f64),
}

impl Default for CarrierSelector {
    fn default() -> Self {
        CarrierSelector::Hydrogen
    }
}

impl CarrierSelector {
    /// Resolves a band name (`hydrogen`, `433`, `868`, `2400`).
    ///
    /// # Example
    /// ```
    /// use hlb_spec::carrier::{CarrierSelector, IsmBand};
    ///
    /// assert_eq!(CarrierSelector::from_name("868"), Some(CarrierSelector::Ism(IsmBand::Ism868)));
    /// assert_eq!(CarrierSelector::from_name("vhf"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("hydrogen") {
            return Some(CarrierSelector::Hydrogen);
        }
        IsmBand::ALL
            .into_iter()
            .find(|band| band.name() == name)
            .map(CarrierSelector::Ism)
    }

    /// Carrier frequency in Hz.
    pub fn frequency_hz(&self) -> f64 {
        match self {
            CarrierSelector::Hydrogen => HYDROGEN_LINE_HZ,
            CarrierSelector::Ism(band) => band.frequency_hz(),
            CarrierSelector::Custom(hz) => *hz,
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> String {
        match self {
            CarrierSelector::Hydrogen => "hydrogen".to_string(),
            CarrierSelector::Ism(band) => format!("ism-{}", band.name()),
            CarrierSelector::Custom(hz) => format!("{} Hz", hz),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hydrogen_default() {
        let carrier = CarrierSelector::default();
        assert_eq!(carrier.frequency_hz(), 1_420_405_751.768);
        assert_eq!(CarrierSelector::from_name("Hydrogen"), Some(carrier));
    }

    #[test]
    fn test_band_metadata() {
        assert_eq!(IsmBand::Ism433.frequency_hz(), 433.92e6);
        assert_eq!(IsmBand::Ism868.max_power_mw(), 500);
        assert_eq!(IsmBand::Ism2400.region(), "Global");
    }

    #[test]
    fn test_custom_frequency() {
        let carrier = CarrierSelector::Custom(915e6);
        assert_eq!(carrier.frequency_hz(), 915e6);
        assert_eq!(carrier.label(), "915000000 Hz");
    }
}
