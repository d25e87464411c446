use serde::Serialize;
use tera::{Context, Tera};
use crate::heat_index::round_degrees;
use crate::models::forecast::DailyRecord;
use crate::policy::{HeatAssessment, POLICY};
use crate::report::{title, Document, RenderError, Renderer, Report};

const TEMPLATE_NAME: &str = "brief.html";

/// Policy columns are fixed literals from POLICY and are written unescaped.
const BRIEF_TEMPLATE: &str = r#"
<h2 style='margin-bottom:4px'>{{ title }}</h2>
<p style='margin:0;font-size:16px'><b>Peak Heat Index Today:</b> {{ heat_index }} °F ({{ label }})</p>
<p style='margin:0 0 8px;font-size:14px;color:#555'>Guidance below ⬇︎</p>
<table border='1' cellpadding='4' cellspacing='0' style='border-collapse:collapse'>
  <thead style='background:#4f81bd;color:#fff'>
    <tr><th>Date</th><th>High °F</th><th>Low °F</th><th>Cond</th><th>Precip %</th></tr>
  </thead><tbody>{% for day in days %}<tr><td>{{ day.date }}</td><td>{{ day.high }}</td><td>{{ day.low }}</td><td style='text-align:center;font-size:1.2em'>{{ day.glyph }}</td><td>{{ day.rain }}</td></tr>{% endfor %}</tbody>
</table>
<h3 style='margin:14px 0 4px'>Heat‑Stress Work Practices</h3>
<table border='1' cellpadding='4' cellspacing='0' style='border-collapse:collapse'>
  <thead style='background:#4f81bd;color:#fff'>
    <tr><th>Warning</th><th>HI °F</th><th>Work max</th><th>Hydration</th><th>Work/Rest</th><th>Checks/hr</th></tr>
  </thead><tbody>{% for tier in tiers %}<tr{% if tier.current %} style='background:#ffcc66'{% endif %}><td>{{ tier.label }}</td><td>{{ tier.range }}°</td><td>{{ tier.work_max | safe }}</td><td>{{ tier.hydration | safe }}</td><td>{{ tier.work_rest | safe }}</td><td>{{ tier.checks_per_hour | safe }}</td></tr>{% endfor %}</tbody>
</table>
"#;

#[derive(Serialize)]
struct ForecastRow {
    date: String,
    high: String,
    low: String,
    glyph: &'static str,
    rain: String,
}

#[derive(Serialize)]
struct PolicyRow {
    label: &'static str,
    range: String,
    work_max: &'static str,
    hydration: &'static str,
    work_rest: &'static str,
    checks_per_hour: &'static str,
    current: bool,
}

/// Renders the brief as an HTML fragment for the mail body
pub struct HtmlRenderer {
    templates: Tera,
}

impl HtmlRenderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut templates = Tera::default();
        templates.add_raw_template(TEMPLATE_NAME, BRIEF_TEMPLATE)?;

        Ok(Self { templates })
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, report: &Report) -> Result<Document, RenderError> {
        let days: Vec<ForecastRow> = report.forecast.daily.iter().map(forecast_row).collect();

        let mut context = Context::new();
        context.insert("title", &title(report.location, report.date));
        context.insert("heat_index", &report.assessment.heat_index);
        context.insert("label", report.assessment.label());
        context.insert("days", &days);
        context.insert("tiers", &policy_rows(&report.assessment));

        let html = self.templates.render(TEMPLATE_NAME, &context)?;
        Ok(Document::Html(html))
    }
}

/// Maps WMO weather codes to a condition glyph, unknown codes give an empty string
pub fn weather_glyph(code: Option<u8>) -> &'static str {
    match code {
        Some(0) => "☀️",
        Some(1) => "🌤️",
        Some(2) => "⛅",
        Some(3) => "☁️",
        Some(45) | Some(48) => "🌫️",
        Some(51) | Some(61) | Some(80) => "🌦️",
        Some(53) | Some(55) | Some(63) | Some(65) | Some(81) => "🌧️",
        Some(71) | Some(73) => "🌨️",
        Some(75) => "❄️",
        Some(95) | Some(96) | Some(99) => "⛈️",
        _ => "",
    }
}

fn forecast_row(day: &DailyRecord) -> ForecastRow {
    ForecastRow {
        date: day.date.format("%Y-%m-%d").to_string(),
        high: format!("{}°", round_degrees(day.high)),
        low: day.low.map_or("-".to_string(), |l| format!("{}°", round_degrees(l))),
        glyph: weather_glyph(day.weather_code),
        rain: day.precipitation_probability.map_or("-".to_string(), |p| format!("{}%", p)),
    }
}

fn policy_rows(assessment: &HeatAssessment) -> Vec<PolicyRow> {
    POLICY.iter()
        .map(|tier| PolicyRow {
            label: tier.label,
            range: tier.to_string(),
            work_max: tier.work_max,
            hydration: tier.hydration,
            work_rest: tier.work_rest,
            checks_per_hour: tier.checks_per_hour,
            current: assessment.is_current(tier),
        })
        .collect()
}
