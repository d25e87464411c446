pub mod errors;

use std::time::Duration;
use log::debug;
use ureq::Agent;
use crate::models::forecast::{DailyRecord, Forecast, ForecastRequest, HourlySample, TemperatureUnit};
use crate::models::open_meteo::{DailyBlock, ForecastResponse, HourlyBlock};
pub use errors::OpenMeteoError;

const BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";
const FORECAST_DAYS: &str = "10";

/// Anything that can deliver a parsed forecast for the configured location
pub trait ForecastSource {
    fn get_forecast(&self, request: &ForecastRequest) -> Result<Forecast, OpenMeteoError>;
}

/// Struct for fetching forecasts from Open-Meteo for one fixed location
pub struct OpenMeteo {
    agent: Agent,
    base_url: String,
    lat: f64,
    long: f64,
    timezone: String,
}

impl OpenMeteo {
    /// Returns an OpenMeteo struct ready for fetching forecasts
    ///
    /// # Arguments
    ///
    /// * 'lat' - latitude for the point to get forecasts for
    /// * 'long' - longitude for the point to get forecasts for
    /// * 'timezone' - IANA timezone the daily values are aggregated in
    pub fn new(lat: f64, long: f64, timezone: &str) -> OpenMeteo {
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(15)))
            .build();

        let agent = config.into();

        Self { agent, base_url: BASE_URL.to_string(), lat, long, timezone: timezone.to_string() }
    }

    #[cfg(test)]
    fn with_base_url(self, base_url: &str) -> OpenMeteo {
        Self { base_url: base_url.to_string(), ..self }
    }
}

impl ForecastSource for OpenMeteo {
    /// Retrieves a 10 day forecast with the fields and unit given in the request.
    /// The agent keeps ureq's default `http_status_as_error`, so any non 2xx status
    /// comes back as `OpenMeteoError::Http`.
    ///
    /// # Arguments
    ///
    /// * 'request' - daily and hourly fields plus temperature unit to ask for
    fn get_forecast(&self, request: &ForecastRequest) -> Result<Forecast, OpenMeteoError> {
        let lat = self.lat.to_string();
        let long = self.long.to_string();
        let daily = request.daily.join(",");
        let unit = request.unit.to_string();

        let mut req = self.agent
            .get(self.base_url.as_str())
            .query("latitude", lat.as_str())
            .query("longitude", long.as_str())
            .query("daily", daily.as_str())
            .query("forecast_days", FORECAST_DAYS)
            .query("temperature_unit", unit.as_str())
            .query("timezone", self.timezone.as_str());

        if !request.hourly.is_empty() {
            let hourly = request.hourly.join(",");
            req = req.query("hourly", hourly.as_str());
        }

        debug!("requesting forecast for {},{} ({})", lat, long, unit);

        let json = req
            .call()?
            .body_mut()
            .read_to_string()?;

        parse_forecast(&json, request.unit)
    }
}

/// Parses a forecast document and checks that every daily column lines up with the dates
///
/// # Arguments
///
/// * 'json' - the raw response body
/// * 'unit' - the temperature unit the forecast was requested in
pub fn parse_forecast(json: &str, unit: TemperatureUnit) -> Result<Forecast, OpenMeteoError> {
    let response: ForecastResponse = serde_json::from_str(json)?;

    let daily = match response.daily {
        Some(block) => daily_records(block)?,
        None => return Err(OpenMeteoError::Shape("response has no daily block".to_string())),
    };

    let hourly = match response.hourly {
        Some(block) => hourly_samples(block)?,
        None => Vec::new(),
    };

    Ok(Forecast { unit, daily, hourly })
}

fn daily_records(block: DailyBlock) -> Result<Vec<DailyRecord>, OpenMeteoError> {
    let len = block.time.len();
    if len == 0 {
        return Err(OpenMeteoError::Shape("daily block has no dates".to_string()));
    }

    let highs = column("temperature_2m_max", block.temperature_2m_max, len)?
        .ok_or_else(|| OpenMeteoError::Shape("daily block lacks temperature_2m_max".to_string()))?;
    let lows = column("temperature_2m_min", block.temperature_2m_min, len)?;
    let apparent = column("apparent_temperature_max", block.apparent_temperature_max, len)?;
    let codes = column("weathercode", block.weathercode, len)?;
    let rain = column("precipitation_probability_max", block.precipitation_probability_max, len)?;
    let humidity = column("relative_humidity_2m_max", block.relative_humidity_2m_max, len)?;

    let mut records: Vec<DailyRecord> = Vec::with_capacity(len);
    for (i, date) in block.time.into_iter().enumerate() {
        let high = highs[i].ok_or_else(|| {
            OpenMeteoError::Shape(format!("no temperature_2m_max for {}", date))
        })?;

        records.push(DailyRecord {
            date,
            high,
            low: cell(&lows, i),
            apparent_high: cell(&apparent, i),
            weather_code: cell(&codes, i).map(whole),
            precipitation_probability: cell(&rain, i).map(whole),
            humidity_max: cell(&humidity, i),
        });
    }

    Ok(records)
}

fn hourly_samples(block: HourlyBlock) -> Result<Vec<HourlySample>, OpenMeteoError> {
    if block.temperature_2m.len() != block.relative_humidity_2m.len() {
        return Err(OpenMeteoError::Shape(format!(
            "hourly block has {} temperatures but {} humidity values",
            block.temperature_2m.len(), block.relative_humidity_2m.len())));
    }

    block.temperature_2m
        .into_iter()
        .zip(block.relative_humidity_2m)
        .enumerate()
        .map(|(hour, pair)| match pair {
            (Some(temperature), Some(relative_humidity)) => Ok(HourlySample { temperature, relative_humidity }),
            _ => Err(OpenMeteoError::Shape(format!("hourly sample {} is incomplete", hour))),
        })
        .collect()
}

/// Checks an optional daily column against the number of dates
fn column<T>(name: &str, values: Option<Vec<Option<T>>>, len: usize) -> Result<Option<Vec<Option<T>>>, OpenMeteoError> {
    match values {
        Some(v) if v.len() != len => Err(OpenMeteoError::Shape(
            format!("daily {} has {} values, expected {}", name, v.len(), len))),
        other => Ok(other),
    }
}

/// Integer valued columns may arrive as floats, out of range values saturate
fn whole(value: f64) -> u8 {
    value.round() as u8
}

fn cell<T: Copy>(values: &Option<Vec<Option<T>>>, i: usize) -> Option<T> {
    values.as_ref().and_then(|v| v[i])
}
