use std::fmt;
use std::fmt::Formatter;
use chrono::NaiveDate;

/// Unit the forecast provider reports temperatures in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemperatureUnit {
    Fahrenheit,
    Celsius,
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            TemperatureUnit::Fahrenheit => write!(f, "fahrenheit"),
            TemperatureUnit::Celsius => write!(f, "celsius"),
        }
    }
}

/// The set of fields and the unit to ask the forecast provider for
#[derive(Clone, Debug, PartialEq)]
pub struct ForecastRequest {
    pub daily: &'static [&'static str],
    pub hourly: &'static [&'static str],
    pub unit: TemperatureUnit,
}

impl ForecastRequest {
    /// Fields needed for the HTML brief, where today's apparent temperature max
    /// stands in for the heat index
    pub fn html() -> ForecastRequest {
        ForecastRequest {
            daily: &[
                "apparent_temperature_max",
                "temperature_2m_max",
                "temperature_2m_min",
                "weathercode",
                "precipitation_probability_max",
            ],
            hourly: &[],
            unit: TemperatureUnit::Fahrenheit,
        }
    }

    /// Fields needed for the slide, where the heat index is computed from hourly samples
    pub fn slide() -> ForecastRequest {
        ForecastRequest {
            daily: &["temperature_2m_max", "relative_humidity_2m_max"],
            hourly: &["temperature_2m", "relative_humidity_2m"],
            unit: TemperatureUnit::Celsius,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub high: f64,
    pub low: Option<f64>,
    pub apparent_high: Option<f64>,
    pub weather_code: Option<u8>,
    pub precipitation_probability: Option<u8>,
    pub humidity_max: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HourlySample {
    pub temperature: f64,
    pub relative_humidity: f64,
}

/// A parsed forecast, daily records in date order and hourly samples from the first hour on
#[derive(Clone, Debug, PartialEq)]
pub struct Forecast {
    pub unit: TemperatureUnit,
    pub daily: Vec<DailyRecord>,
    pub hourly: Vec<HourlySample>,
}
