use chrono::NaiveDate;
use crate::heat_index::round_degrees;
use crate::models::forecast::DailyRecord;
use crate::report::markup::Markup;
use crate::report::{title, Attachment, Document, RenderError, Renderer, Report};

pub const MIME_TYPE: &str = "application/vnd.oasis.opendocument.presentation";
pub const FILE_PREFIX: &str = "wx_brief_";
pub const FILE_EXTENSION: &str = "fodp";

/// Number of forecast rows on the slide, short forecasts are padded with empty rows
const TABLE_ROWS: usize = 10;
const HEADERS: [&str; 3] = ["Date", "Max °C", "Max RH %"];

const NAMESPACES: [(&str, &str); 9] = [
    ("xmlns:office", "urn:oasis:names:tc:opendocument:xmlns:office:1.0"),
    ("xmlns:style", "urn:oasis:names:tc:opendocument:xmlns:style:1.0"),
    ("xmlns:text", "urn:oasis:names:tc:opendocument:xmlns:text:1.0"),
    ("xmlns:table", "urn:oasis:names:tc:opendocument:xmlns:table:1.0"),
    ("xmlns:draw", "urn:oasis:names:tc:opendocument:xmlns:drawing:1.0"),
    ("xmlns:svg", "urn:oasis:names:tc:opendocument:xmlns:svg-compatible:1.0"),
    ("xmlns:presentation", "urn:oasis:names:tc:opendocument:xmlns:presentation:1.0"),
    ("office:version", "1.3"),
    ("office:mimetype", MIME_TYPE),
];

/// Renders the brief as a single slide OpenDocument presentation in flat XML form
pub struct SlideRenderer;

impl Renderer for SlideRenderer {
    fn render(&self, report: &Report) -> Result<Document, RenderError> {
        let mut m = Markup::new();

        m.raw("<?xml version='1.0' encoding='UTF-8'?>\n")
            .open("office:document", &NAMESPACES)
            .open("office:body", &[])
            .open("office:presentation", &[])
            .raw("\n")
            .open("draw:page", &[("draw:name", "Heat Stress")])
            .raw("\n");

        text_frame(&mut m, &[
            ("presentation:class", "title"),
            ("svg:x", "1cm"), ("svg:y", "0.8cm"), ("svg:width", "26cm"), ("svg:height", "2cm"),
        ], &title(report.location, report.date));

        text_frame(&mut m, &[
            ("svg:x", "1cm"), ("svg:y", "3cm"), ("svg:width", "26cm"), ("svg:height", "1.5cm"),
        ], &format!("24-h Max Heat Index: {} °F ({})", report.assessment.heat_index, report.assessment.label()));

        m.open("draw:frame", &[("svg:x", "1cm"), ("svg:y", "5cm"), ("svg:width", "20cm"), ("svg:height", "12cm")])
            .open("table:table", &[("table:name", "Forecast")])
            .empty("table:table-column", &[("table:number-columns-repeated", "3")])
            .raw("\n");

        table_row(&mut m, &HEADERS.map(String::from));
        for i in 0..TABLE_ROWS {
            table_row(&mut m, &forecast_cells(report.forecast.daily.get(i)));
        }

        m.close("table:table")
            .close("draw:frame")
            .raw("\n")
            .close("draw:page")
            .raw("\n")
            .close("office:presentation")
            .close("office:body")
            .close("office:document")
            .raw("\n");

        Ok(Document::Attachment(Attachment {
            file_name: file_name(report.date),
            mime_type: MIME_TYPE,
            bytes: m.finish().into_bytes(),
        }))
    }
}

/// File name for the slide of the given date
pub fn file_name(date: NaiveDate) -> String {
    format!("{}{}.{}", FILE_PREFIX, date.format("%Y-%m-%d"), FILE_EXTENSION)
}

fn text_frame(m: &mut Markup, attrs: &[(&str, &str)], text: &str) {
    m.open("draw:frame", attrs)
        .open("draw:text-box", &[])
        .element("text:p", &[], text)
        .close("draw:text-box")
        .close("draw:frame")
        .raw("\n");
}

fn table_row(m: &mut Markup, cells: &[String; 3]) {
    m.open("table:table-row", &[]);
    for c in cells {
        m.open("table:table-cell", &[])
            .element("text:p", &[], c)
            .close("table:table-cell");
    }
    m.close("table:table-row").raw("\n");
}

fn forecast_cells(day: Option<&DailyRecord>) -> [String; 3] {
    match day {
        Some(d) => [
            d.date.format("%Y-%m-%d").to_string(),
            round_degrees(d.high).to_string(),
            d.humidity_max.map_or(String::new(), |h| round_degrees(h).to_string()),
        ],
        None => [String::new(), String::new(), String::new()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::forecast::{Forecast, TemperatureUnit};
    use crate::policy::assess;

    fn days(n: usize) -> Vec<DailyRecord> {
        let start = NaiveDate::from_ymd_opt(2025, 7, 14).unwrap();
        (0..n)
            .map(|i| DailyRecord {
                date: start + chrono::Days::new(i as u64),
                high: 30.0 + i as f64,
                low: None,
                apparent_high: None,
                weather_code: None,
                precipitation_probability: None,
                humidity_max: Some(60.4 + i as f64),
            })
            .collect()
    }

    fn render(daily: Vec<DailyRecord>, heat_index: i32) -> Attachment {
        let forecast = Forecast { unit: TemperatureUnit::Celsius, daily, hourly: Vec::new() };
        let report = Report {
            location: "Inwood",
            date: NaiveDate::from_ymd_opt(2025, 7, 14).unwrap(),
            forecast: &forecast,
            assessment: assess(heat_index).unwrap(),
        };
        match SlideRenderer.render(&report).unwrap() {
            Document::Attachment(a) => a,
            other => panic!("expected attachment, got {:?}", other),
        }
    }

    #[test]
    fn test_slide_content() {
        let slide = render(days(10), 97);
        let xml = String::from_utf8(slide.bytes).unwrap();

        assert_eq!(slide.file_name, "wx_brief_2025-07-14.fodp");
        assert_eq!(slide.mime_type, MIME_TYPE);
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<text:p>Inwood Weather — 2025-07-14</text:p>"));
        assert!(xml.contains("<text:p>24-h Max Heat Index: 97 °F (Extreme Caution)</text:p>"));
        assert!(xml.contains("<text:p>2025-07-14</text:p></table:table-cell><table:table-cell><text:p>30</text:p></table:table-cell><table:table-cell><text:p>60</text:p>"));
        assert!(xml.contains("<text:p>2025-07-23</text:p>"));
    }

    #[test]
    fn test_table_has_header_and_ten_rows() {
        for n in [3, 10, 14] {
            let xml = String::from_utf8(render(days(n), 85).bytes).unwrap();
            assert_eq!(xml.matches("<table:table-row>").count(), 11, "{} days", n);
            assert_eq!(xml.matches("<table:table-cell>").count(), 33, "{} days", n);
        }
    }

    #[test]
    fn test_short_forecast_is_padded() {
        let xml = String::from_utf8(render(days(3), 85).bytes).unwrap();
        assert_eq!(xml.matches("<text:p></text:p>").count(), 21);
    }

    #[test]
    fn test_slide_is_deterministic() {
        assert_eq!(render(days(10), 104), render(days(10), 104));
    }
}
