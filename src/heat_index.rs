use crate::models::forecast::{HourlySample, TemperatureUnit};

/// Number of hourly samples the heat index maximum is taken over
pub const HOURS: usize = 24;

pub fn celsius_to_fahrenheit(temp_c: f64) -> f64 {
    temp_c * 9.0 / 5.0 + 32.0
}

/// Calculates the heat index using the Rothfusz multiple regression as published
/// by the US National Weather Service:
/// https://www.wpc.ncep.noaa.gov/html/heatindex_equation.shtml
///
/// The NWS low-humidity and high-humidity adjustments are not applied, and there is no
/// guard for the range where the regression is valid (roughly above 80 °F and 40 % RH).
/// Results outside that range are returned as-is.
///
/// # Arguments
///
/// * 'temp_f' - air temperature in Fahrenheit
/// * 'rh' - relative humidity in percent
pub fn heat_index(temp_f: f64, rh: f64) -> f64 {
    let t = temp_f;
    let t2 = t * t;
    let rh2 = rh * rh;

    -42.379
        + 2.04901523 * t
        + 10.14333127 * rh
        - 0.22475541 * t * rh
        - 0.00683783 * t2
        - 0.05481717 * rh2
        + 0.00122874 * t2 * rh
        + 0.00085282 * t * rh2
        - 0.00000199 * t2 * rh2
}

/// Returns the maximum heat index over the first 24 hourly samples, rounded to
/// whole degrees Fahrenheit, or None if there are no samples
///
/// # Arguments
///
/// * 'samples' - hourly temperature and humidity samples
/// * 'unit' - the unit the sample temperatures are given in
pub fn max_heat_index(samples: &[HourlySample], unit: TemperatureUnit) -> Option<i32> {
    samples
        .iter()
        .take(HOURS)
        .map(|s| {
            let temp_f = match unit {
                TemperatureUnit::Fahrenheit => s.temperature,
                TemperatureUnit::Celsius => celsius_to_fahrenheit(s.temperature),
            };
            heat_index(temp_f, s.relative_humidity)
        })
        .reduce(f64::max)
        .map(round_degrees)
}

/// Rounds a temperature to whole degrees, ties going to the even neighbour
pub fn round_degrees(value: f64) -> i32 {
    value.round_ties_even() as i32
}
