use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct DailyBlock {
    pub time: Vec<NaiveDate>,
    pub apparent_temperature_max: Option<Vec<Option<f64>>>,
    pub temperature_2m_max: Option<Vec<Option<f64>>>,
    pub temperature_2m_min: Option<Vec<Option<f64>>>,
    pub weathercode: Option<Vec<Option<f64>>>,
    pub precipitation_probability_max: Option<Vec<Option<f64>>>,
    pub relative_humidity_2m_max: Option<Vec<Option<f64>>>,
}

#[derive(Deserialize, Debug)]
pub struct HourlyBlock {
    pub temperature_2m: Vec<Option<f64>>,
    pub relative_humidity_2m: Vec<Option<f64>>,
}

/// Response document from the Open-Meteo forecast endpoint.
/// Only the blocks asked for in the request are present.
#[derive(Deserialize, Debug)]
pub struct ForecastResponse {
    pub daily: Option<DailyBlock>,
    pub hourly: Option<HourlyBlock>,
}
