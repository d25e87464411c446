use chrono::NaiveDate;
use log::{info, warn};
use crate::config::Config;
use crate::errors::BriefError;
use crate::heat_index::{max_heat_index, round_degrees};
use crate::manager_mail::Mail;
use crate::manager_open_meteo::{ForecastSource, OpenMeteoError};
use crate::models::forecast::Forecast;
use crate::policy::assess;
use crate::report::{Document, Report, ReportFormat};
use crate::storage;

/// Runs the brief once: fetch, classify, render and send. Either one mail is sent
/// or the run fails without sending anything.
///
/// # Arguments
///
/// * 'config' - the loaded configuration
/// * 'source' - where to get the forecast from
/// * 'mail' - mail manager holding sender, recipients and transport
/// * 'today' - the date the brief is for
pub fn run(config: &Config, source: &dyn ForecastSource, mail: &Mail, today: NaiveDate) -> Result<&'static str, BriefError> {
    let format = config.report.format;

    info!("fetching forecast for {} ({}, {})", config.geo_ref.location, config.geo_ref.lat, config.geo_ref.long);
    let forecast = source.get_forecast(&format.forecast_request())?;
    info!("forecast received with {} days", forecast.daily.len());

    let heat_index = todays_heat_index(format, &forecast)?;
    let assessment = assess(heat_index)?;
    match assessment.tier {
        Some(tier) => info!("heat index {} °F, tier {}", heat_index, tier.label),
        None => info!("heat index {} °F is below the lowest heat-stress tier", heat_index),
    }

    let report = Report {
        location: &config.geo_ref.location,
        date: today,
        forecast: &forecast,
        assessment,
    };
    let document = match format.renderer()?.render(&report)? {
        Document::Attachment(attachment) => {
            let (attachment, path) = storage::persist(&config.files.output_dir, attachment)?;
            info!("slide saved to {}", path.display());
            prune_slides(config, today);
            Document::Attachment(attachment)
        }
        html => html,
    };

    let subject = format!("{} — {}", config.report.subject_prefix, today.format("%Y-%m-%d"));
    mail.send_document(subject, document, today)?;
    info!("brief sent to {} recipient(s)", mail.recipients().len());

    Ok(format.completion_message())
}

/// Today's heat index, taken from the apparent temperature max for the HTML brief
/// and computed from the hourly samples for the slide
fn todays_heat_index(format: ReportFormat, forecast: &Forecast) -> Result<i32, OpenMeteoError> {
    let value = match format {
        ReportFormat::Html => forecast.daily
            .first()
            .and_then(|d| d.apparent_high)
            .map(round_degrees),
        ReportFormat::Slide => max_heat_index(&forecast.hourly, forecast.unit),
    };

    value.ok_or_else(|| OpenMeteoError::Shape(format!("forecast has no data for today's heat index ({})", format)))
}

fn prune_slides(config: &Config, today: NaiveDate) {
    match storage::prune(&config.files.output_dir, config.files.keep_days, today) {
        Ok(0) => {}
        Ok(n) => info!("removed {} old slide(s)", n),
        Err(e) => warn!("could not prune old slides: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::{env, fs};
    use crate::config::load_config;
    use crate::manager_mail::tests::RecordingTransport;
    use crate::manager_open_meteo::parse_forecast;
    use crate::models::forecast::{ForecastRequest, TemperatureUnit};

    /// Serves a canned forecast document and counts requests
    struct CannedSource {
        json: &'static str,
        calls: Cell<usize>,
    }

    impl ForecastSource for CannedSource {
        fn get_forecast(&self, request: &ForecastRequest) -> Result<Forecast, OpenMeteoError> {
            self.calls.set(self.calls.get() + 1);
            parse_forecast(self.json, request.unit)
        }
    }

    struct FailingSource;

    impl ForecastSource for FailingSource {
        fn get_forecast(&self, _request: &ForecastRequest) -> Result<Forecast, OpenMeteoError> {
            Err(OpenMeteoError::Shape("provider down".to_string()))
        }
    }

    const HTML_JSON: &str = r#"{"daily": {
        "apparent_temperature_max": [95],
        "time": ["2025-07-14"],
        "temperature_2m_max": [90],
        "temperature_2m_min": [70],
        "weathercode": [0],
        "precipitation_probability_max": [10]
    }}"#;

    const SLIDE_JSON: &str = r#"{
        "daily": {
            "time": ["2025-07-14", "2025-07-15"],
            "temperature_2m_max": [32.2, 30.1],
            "relative_humidity_2m_max": [55, 61]
        },
        "hourly": {
            "temperature_2m": [25.0, 32.2222, 30.0],
            "relative_humidity_2m": [60, 50, 40]
        }
    }"#;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 14).unwrap()
    }

    fn config(extra: &[(&str, &str)]) -> Config {
        let mut pairs = vec![
            ("SENDGRID_API_KEY", "SG.key".to_string()),
            ("EMAIL_FROM", "wx@example.com".to_string()),
            ("EMAIL_TO", "crew@example.com".to_string()),
        ];
        pairs.extend(extra.iter().map(|(k, v)| (*k, v.to_string())));
        load_config(None, move |key| pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| v.clone())).unwrap()
    }

    fn mail(transport: &RecordingTransport) -> Mail {
        Mail::new(Box::new(transport.clone()), "wx@example.com", &["crew@example.com".to_string()]).unwrap()
    }

    #[test]
    fn test_html_brief_end_to_end() {
        let config = config(&[]);
        let source = CannedSource { json: HTML_JSON, calls: Cell::new(0) };
        let transport = RecordingTransport::default();

        let message = run(&config, &source, &mail(&transport), today()).unwrap();

        assert_eq!(message, "HTML weather e-mail sent.");
        assert_eq!(source.calls.get(), 1);
        let sent = transport.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, vec!["crew@example.com"]);
        assert_eq!(sent[0].1, "WX Brief — 2025-07-14");
        assert_eq!(sent[0].2, None);
    }

    #[test]
    fn test_slide_brief_end_to_end() {
        let dir = env::temp_dir().join(format!("wx_brief_run_{}", std::process::id()));
        let dir_str = dir.to_string_lossy().to_string();
        let mut config = config(&[("REPORT_FORMAT", "slide")]);
        config.files.output_dir = dir_str.clone();
        let source = CannedSource { json: SLIDE_JSON, calls: Cell::new(0) };
        let transport = RecordingTransport::default();

        let message = run(&config, &source, &mail(&transport), today()).unwrap();

        assert_eq!(message, "Heat-stress slide e-mail sent.");
        let sent = transport.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].2.as_deref(), Some("wx_brief_2025-07-14.fodp"));

        let xml = fs::read_to_string(dir.join("wx_brief_2025-07-14.fodp")).unwrap();
        assert!(xml.contains("24-h Max Heat Index: 95 °F (Extreme Caution)"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_forecast_failure_sends_nothing() {
        let config = config(&[]);
        let transport = RecordingTransport::default();

        let result = run(&config, &FailingSource, &mail(&transport), today());

        assert!(matches!(result, Err(BriefError::ForecastUnavailable(_))));
        assert!(transport.sent.borrow().is_empty());
    }

    #[test]
    fn test_missing_heat_index_input_sends_nothing() {
        let config = config(&[("REPORT_FORMAT", "slide")]);
        let source = CannedSource { json: HTML_JSON, calls: Cell::new(0) };
        let transport = RecordingTransport::default();

        let result = run(&config, &source, &mail(&transport), today());

        assert!(matches!(result, Err(BriefError::ForecastUnavailable(OpenMeteoError::Shape(_)))));
        assert!(transport.sent.borrow().is_empty());
    }

    #[test]
    fn test_todays_heat_index() {
        let html = parse_forecast(HTML_JSON, TemperatureUnit::Fahrenheit).unwrap();
        assert_eq!(todays_heat_index(ReportFormat::Html, &html).unwrap(), 95);

        let slide = parse_forecast(SLIDE_JSON, TemperatureUnit::Celsius).unwrap();
        assert_eq!(todays_heat_index(ReportFormat::Slide, &slide).unwrap(), 95);
    }
}
