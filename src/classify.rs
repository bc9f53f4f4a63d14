//! Threshold tables that turn measurements into descriptive text.

use std::fmt;

use crate::error::ClassifyError;

/// Upper bounds (inclusive) of the first five AQI categories, in µg/m³ of PM2.5.
pub const PM25_BREAKPOINTS: [f64; 5] = [12.0, 35.4, 55.4, 150.4, 250.4];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How a temperature in Fahrenheit feels, from hottest to coldest.
pub enum Mood {
    Sweltering,
    Hot,
    Perfect,
    Chilly,
    Cold,
    ReallyCold,
    ReallyReallyCold,
    BelowZero,
}

impl Mood {
    /// Picks the band for a temperature, checking from the top down.
    ///
    /// The `> 80` band is strict, so 80 itself is still "a little hot". Every
    /// other threshold belongs to the band above it (70 is hot, 50 is
    /// perfect). Anything failing every comparison, NaN included, ends up in
    /// the coldest band.
    pub fn from_fahrenheit(temp: f64) -> Self {
        if temp > 80.0 {
            Mood::Sweltering
        } else if temp >= 70.0 {
            Mood::Hot
        } else if temp >= 50.0 {
            Mood::Perfect
        } else if temp >= 32.0 {
            Mood::Chilly
        } else if temp >= 20.0 {
            Mood::Cold
        } else if temp >= 10.0 {
            Mood::ReallyCold
        } else if temp >= 0.0 {
            Mood::ReallyReallyCold
        } else {
            Mood::BelowZero
        }
    }

    pub fn statement(&self) -> &'static str {
        match self {
            Mood::Sweltering => "Better know how to make a swamp air conditioner",
            Mood::Hot => "Grab a beer 'cause its a little hot",
            Mood::Perfect => "Perfection... sunglasses and chill",
            Mood::Chilly => "Chilly but all is good. Nothing a beer cant handle.",
            Mood::Cold => "COLD",
            Mood::ReallyCold => "Really COLD",
            Mood::ReallyReallyCold => "Yeah Really Really COLD",
            Mood::BelowZero => "Stay home... alcohol is friend",
        }
    }
}

/// Returns the mood statement for a Fahrenheit temperature.
pub fn classify_temperature(temp: impl Into<f64>) -> &'static str {
    Mood::from_fahrenheit(temp.into()).statement()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
/// US EPA air quality categories, numbered 1 to 6.
pub enum AqiCategory {
    Good = 1,
    Moderate = 2,
    UnhealthyForSensitiveGroups = 3,
    Unhealthy = 4,
    VeryUnhealthy = 5,
    Hazardous = 6,
}

impl AqiCategory {
    /// Maps a category code. Codes above 5 all collapse to `Hazardous`.
    pub fn from_code(code: i64) -> Result<Self, ClassifyError> {
        match code {
            i64::MIN..=0 => Err(ClassifyError::InvalidAqiCode(code)),
            1 => Ok(AqiCategory::Good),
            2 => Ok(AqiCategory::Moderate),
            3 => Ok(AqiCategory::UnhealthyForSensitiveGroups),
            4 => Ok(AqiCategory::Unhealthy),
            5 => Ok(AqiCategory::VeryUnhealthy),
            _ => Ok(AqiCategory::Hazardous),
        }
    }

    /// Finds the category for an average PM2.5 concentration.
    ///
    /// The first breakpoint the value does not exceed decides the category;
    /// values above the last breakpoint are `Hazardous`.
    pub fn from_pm25(average: f64) -> Result<Self, ClassifyError> {
        if average.is_nan() {
            return Err(ClassifyError::NotANumber);
        }

        let index = PM25_BREAKPOINTS
            .iter()
            .position(|&upper| average <= upper)
            .unwrap_or(PM25_BREAKPOINTS.len());

        Self::from_code(index as i64 + 1)
    }

    pub fn code(&self) -> i64 {
        *self as i64
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }
}

impl fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returns the label for an AQI category code.
pub fn classify_aqi(code: i64) -> Result<&'static str, ClassifyError> {
    AqiCategory::from_code(code).map(|c| c.label())
}

// -- Tests -------------------------------------------------------------------
