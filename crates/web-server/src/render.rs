// In crates/web-server/src/render.rs

use analytics::{Recommendation, TickerReport};
use core_types::PriceSeries;

const CHART_WIDTH: f64 = 720.0;
const CHART_HEIGHT: f64 = 260.0;
const CHART_PAD: f64 = 32.0;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 800px; margin: 2rem auto; padding: 0 1rem; color: #222; }
form { display: flex; gap: .5rem; margin: 1rem 0; }
input[type=text] { flex: 1; padding: .5rem; font-size: 1rem; }
button { padding: .5rem 1rem; font-size: 1rem; }
.flash { background: #fdecea; border: 1px solid #f5c2c0; padding: .75rem; border-radius: 4px; }
.badge { display: inline-block; padding: .25rem .75rem; border-radius: 4px; color: #fff; font-weight: bold; }
.buy { background: #2e7d32; }
.avoid { background: #c62828; }
table { border-collapse: collapse; margin: 1rem 0; }
td { padding: .25rem 1rem .25rem 0; }
svg { background: #fafafa; border: 1px solid #ddd; }
"#;

/// Escapes text for use in HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        STYLE,
        body
    )
}

fn ticker_form() -> &'static str {
    r#"<form method="post" action="/">
<input type="text" name="ticker" placeholder="Ticker symbol, e.g. AAPL or RELIANCE.NS" autofocus>
<button type="submit">Analyze</button>
</form>"#
}

/// The ticker entry page, optionally showing a message above the form.
pub fn index_page(message: Option<&str>) -> String {
    let mut body = String::from("<h1>200-Week Moving Average</h1>\n");
    if let Some(message) = message {
        body.push_str(&format!("<p class=\"flash\">{}</p>\n", escape_html(message)));
    }
    body.push_str(ticker_form());
    page("200-Week Moving Average", &body)
}

/// The result page for one analyzed ticker.
pub fn result_page(report: &TickerReport) -> String {
    let analysis = &report.analysis;
    let badge_class = match analysis.recommendation {
        Recommendation::Buy => "buy",
        Recommendation::Avoid => "avoid",
    };

    let mut body = format!(
        "<h1>{ticker}</h1>\n\
         <p><span class=\"badge {badge_class}\">{recommendation}</span> {summary}</p>\n\
         <table>\n\
         <tr><td>{window}-week average</td><td>{avg:.2}</td></tr>\n\
         <tr><td>Latest price</td><td>{latest:.2}</td></tr>\n\
         <tr><td>Deviation</td><td>{dev:+.2}%</td></tr>\n\
         <tr><td>Weeks used</td><td>{used} of {available} available</td></tr>\n\
         </table>\n\
         <h2>Weekly closes</h2>\n",
        ticker = escape_html(report.ticker.as_str()),
        recommendation = analysis.recommendation,
        summary = escape_html(&report.summary),
        window = report.window,
        avg = analysis.window_average,
        latest = analysis.latest_price,
        dev = analysis.deviation_pct,
        used = report.weeks_used,
        available = report.weeks_available,
    );
    body.push_str(&line_chart(&report.weekly, Some(analysis.window_average)));
    body.push_str("\n<h2>Daily closes, last year</h2>\n");
    body.push_str(&line_chart(&report.daily, None));
    body.push_str("\n<h2>Analyze another ticker</h2>\n");
    body.push_str(ticker_form());

    page(&format!("{} | 200-Week Moving Average", report.ticker), &body)
}

/// Renders a series as an inline SVG line chart.
///
/// `reference` draws a dashed horizontal line (the window average).
pub fn line_chart(series: &PriceSeries, reference: Option<f64>) -> String {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return "<p>No data to chart.</p>".to_string();
    };

    let mut low = series.closes().fold(f64::INFINITY, f64::min);
    let mut high = series.closes().fold(f64::NEG_INFINITY, f64::max);
    if let Some(r) = reference {
        low = low.min(r);
        high = high.max(r);
    }
    if high - low < f64::EPSILON {
        low -= 1.0;
        high += 1.0;
    }

    let plot_w = CHART_WIDTH - 2.0 * CHART_PAD;
    let plot_h = CHART_HEIGHT - 2.0 * CHART_PAD;
    let steps = (series.len().max(2) - 1) as f64;
    let x = |i: usize| CHART_PAD + plot_w * i as f64 / steps;
    let y = |v: f64| CHART_PAD + plot_h * (high - v) / (high - low);

    let points: Vec<String> = series
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{:.1},{:.1}", x(i), y(p.close)))
        .collect();

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n\
         <polyline fill=\"none\" stroke=\"#1565c0\" stroke-width=\"1.5\" points=\"{points}\"/>\n",
        w = CHART_WIDTH,
        h = CHART_HEIGHT,
        points = points.join(" "),
    );
    if let Some(r) = reference {
        svg.push_str(&format!(
            "<line x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#ef6c00\" stroke-dasharray=\"6 4\"/>\n",
            CHART_PAD,
            CHART_WIDTH - CHART_PAD,
            y = y(r)
        ));
    }
    svg.push_str(&axis_label(2.0, CHART_PAD - 8.0, "", &format!("{:.2}", high)));
    svg.push_str(&axis_label(2.0, CHART_HEIGHT - CHART_PAD + 14.0, "", &format!("{:.2}", low)));
    svg.push_str(&axis_label(CHART_PAD, CHART_HEIGHT - 4.0, "", &first.date.to_string()));
    svg.push_str(&axis_label(
        CHART_WIDTH - CHART_PAD,
        CHART_HEIGHT - 4.0,
        " text-anchor=\"end\"",
        &last.date.to_string(),
    ));
    svg.push_str("</svg>");
    svg
}

fn axis_label(x: f64, y: f64, extra: &str, text: &str) -> String {
    format!("<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\"{}>{}</text>\n", x, y, extra, text)
}
