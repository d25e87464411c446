pub mod html;
pub mod markup;
pub mod slide;

use std::fmt;
use std::fmt::Formatter;
use std::str::FromStr;
use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use crate::models::forecast::{Forecast, ForecastRequest};
use crate::policy::HeatAssessment;
use crate::report::html::HtmlRenderer;
use crate::report::slide::SlideRenderer;

/// Everything a renderer needs, the policy table itself is the static POLICY
pub struct Report<'a> {
    pub location: &'a str,
    pub date: NaiveDate,
    pub forecast: &'a Forecast,
    pub assessment: HeatAssessment,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// A rendered brief, either an HTML mail body or a file to attach
#[derive(Clone, Debug, PartialEq)]
pub enum Document {
    Html(String),
    Attachment(Attachment),
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

/// Turns a report into a document. Implementations must be pure, the same report
/// always renders to the same bytes.
pub trait Renderer {
    fn render(&self, report: &Report) -> Result<Document, RenderError>;
}

/// Available output formats
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Html,
    Slide,
}

impl ReportFormat {
    pub fn renderer(&self) -> Result<Box<dyn Renderer>, RenderError> {
        let renderer: Box<dyn Renderer> = match self {
            ReportFormat::Html => Box::new(HtmlRenderer::new()?),
            ReportFormat::Slide => Box::new(SlideRenderer),
        };

        Ok(renderer)
    }

    pub fn forecast_request(&self) -> ForecastRequest {
        match self {
            ReportFormat::Html => ForecastRequest::html(),
            ReportFormat::Slide => ForecastRequest::slide(),
        }
    }

    pub fn completion_message(&self) -> &'static str {
        match self {
            ReportFormat::Html => "HTML weather e-mail sent.",
            ReportFormat::Slide => "Heat-stress slide e-mail sent.",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ReportFormat::Html => write!(f, "html"),
            ReportFormat::Slide => write!(f, "slide"),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(ReportFormat::Html),
            "slide" => Ok(ReportFormat::Slide),
            other => Err(format!("unknown report format '{}'", other)),
        }
    }
}

/// Title shared by both output formats
pub fn title(location: &str, date: NaiveDate) -> String {
    format!("{} Weather — {}", location, date.format("%Y-%m-%d"))
}
