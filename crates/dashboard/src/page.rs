// =============================================================================
// GangaWatch Dashboard - HTML Page
// =============================================================================
// Table of Contents:
// 1. Page Model
// 2. Rendering
// 3. Helpers
// 4. Tests
// =============================================================================

use std::fmt::Write;

use crate::artifacts::{Availability, ChartKind, TableStatus};
use crate::catalog::{self, Selection};
use crate::forecast::ForecastTable;

// -----------------------------------------------------------------------------
// 1. Page Model
// -----------------------------------------------------------------------------

/// Everything the dashboard page shows for one selection.
#[derive(Debug, Clone)]
pub struct DashboardPage {
    pub selection: Selection,
    pub availability: Availability,
    pub table: TableStatus,
}

// -----------------------------------------------------------------------------
// 2. Rendering
// -----------------------------------------------------------------------------

const STYLE: &str = r#"
    * { box-sizing: border-box; }
    body { margin: 0; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; color: #1f2933; background: #ffffff; display: flex; min-height: 100vh; }
    aside { width: 280px; padding: 2rem 1.25rem; background: #f0f2f6; }
    main { flex: 1; padding: 2rem 3rem; max-width: 1100px; }
    label { display: block; font-size: 0.875rem; margin: 1rem 0 0.35rem; }
    select { width: 100%; padding: 0.5rem; border: 1px solid #cbd2d9; border-radius: 6px; background: #fff; font-size: 0.95rem; }
    h1 { font-size: 2.2rem; margin: 0 0 1rem; }
    h2 { font-size: 1.6rem; margin: 1.5rem 0 0.5rem; }
    h3 { font-size: 1.25rem; margin: 2rem 0 0.75rem; }
    .warning { background: #fffce7; border-left: 4px solid #f0c419; padding: 0.85rem 1rem; border-radius: 4px; margin: 1rem 0; }
    .note { color: #616e7c; font-size: 0.85rem; }
    .table-wrap { overflow: auto; max-height: 420px; border: 1px solid #e4e7eb; border-radius: 4px; }
    table { border-collapse: collapse; font-size: 0.875rem; width: 100%; }
    th, td { padding: 0.35rem 0.75rem; border-bottom: 1px solid #e4e7eb; text-align: left; white-space: nowrap; }
    th { background: #f5f7fa; position: sticky; top: 0; }
    tr.selected td { background: #e3f2fd; font-weight: 600; }
    figure { margin: 0; }
    figure img { max-width: 100%; }
    figcaption { color: #616e7c; font-size: 0.875rem; text-align: center; margin-top: 0.35rem; }
"#;

/// Render the full dashboard document.
pub fn render(page: &DashboardPage) -> String {
    let selection = &page.selection;
    let scenario = selection.scenario;
    let city = escape(selection.city);
    let parameter = escape(selection.parameter);
    let scenario_name = escape(scenario.name);

    let mut html = String::with_capacity(16 * 1024);
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Water Quality Forecasting for {city}</title>
    <style>{style}</style>
</head>
<body>
<form method="get" action="/" style="display: contents;">
<aside>
    <label for="city">Select a City</label>
    <select id="city" name="city" onchange="this.form.submit()">
{city_options}    </select>
    <label for="scenario">Select a Scenario</label>
    <select id="scenario" name="scenario" onchange="this.form.submit()">
{scenario_options}    </select>
</aside>
<main>
    <h1>Water Quality Forecasting for {city}</h1>
    <h2>Scenario: {scenario_name}</h2>
    <p>{description}</p>
    <label for="parameter">Select a Parameter</label>
    <select id="parameter" name="parameter" onchange="this.form.submit()">
{parameter_options}    </select>
    <noscript><p><button type="submit">Show</button></p></noscript>
"#,
        style = STYLE,
        city_options = options(catalog::cities().iter().copied(), selection.city),
        scenario_options = options(catalog::scenarios().iter().map(|s| s.name), scenario.name),
        parameter_options = options(scenario.parameters(), selection.parameter),
        description = escape(scenario.description),
    );

    render_effects(&mut html, selection);
    render_table_section(&mut html, page);

    for kind in [ChartKind::Forecast, ChartKind::Predictions] {
        let present = page.availability.get(kind.into());
        render_chart_section(&mut html, selection, kind, present);
    }

    let _ = write!(
        html,
        r#"</main>
</form>
</body>
</html>
"#
    );

    tracing::trace!(
        bytes = html.len(),
        city = %city,
        parameter = %parameter,
        scenario = %scenario_name,
        "Rendered dashboard"
    );
    html
}

fn render_effects(html: &mut String, selection: &Selection) {
    let _ = write!(
        html,
        r#"    <h3>Expected Effects</h3>
    <div class="table-wrap"><table>
        <thead><tr><th>Parameter</th><th>Effect</th></tr></thead>
        <tbody>
"#
    );
    for (param, effect) in selection.scenario.affected_params {
        let class = if *param == selection.parameter {
            r#" class="selected""#
        } else {
            ""
        };
        let _ = writeln!(
            html,
            "            <tr{class}><td>{}</td><td>{}</td></tr>",
            escape(param),
            escape(effect)
        );
    }
    html.push_str("        </tbody>\n    </table></div>\n");
}

fn render_table_section(html: &mut String, page: &DashboardPage) {
    let parameter = escape(page.selection.parameter);
    let scenario = escape(page.selection.scenario.name);

    let missing = TableStatus::Missing;
    let status = if page.availability.forecast_table {
        &page.table
    } else {
        &missing
    };

    match status {
        TableStatus::Loaded(table) => {
            let _ = writeln!(html, "    <h3>Forecast Data for {parameter}</h3>");
            render_table(html, table);
        }
        TableStatus::Missing => {
            warning(
                html,
                &format!("No forecast data available for {parameter} in {scenario}."),
            );
        }
        TableStatus::Unreadable(detail) => {
            warning(
                html,
                &format!(
                    "Forecast data for {parameter} in {scenario} could not be read: {}",
                    escape(detail)
                ),
            );
        }
    }
}

fn render_table(html: &mut String, table: &ForecastTable) {
    let columns = table.column_count();

    html.push_str("    <div class=\"table-wrap\"><table>\n        <thead><tr>");
    for i in 0..columns {
        let header = table.headers.get(i).map(String::as_str).unwrap_or_default();
        let _ = write!(html, "<th>{}</th>", escape(header));
    }
    html.push_str("</tr></thead>\n        <tbody>\n");

    for row in &table.rows {
        html.push_str("            <tr>");
        for i in 0..columns {
            let cell = row.get(i).map(String::as_str).unwrap_or_default();
            let _ = write!(html, "<td>{}</td>", escape(cell));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("        </tbody>\n    </table></div>\n");

    if table.is_truncated() {
        let _ = writeln!(
            html,
            "    <p class=\"note\">Showing {} of {} rows.</p>",
            table.rows.len(),
            table.total_rows
        );
    }
}

fn render_chart_section(html: &mut String, selection: &Selection, kind: ChartKind, present: bool) {
    let parameter = escape(selection.parameter);
    let scenario = escape(selection.scenario.name);

    if !present {
        let message = match kind {
            ChartKind::Forecast => {
                format!("No forecast visualization available for {parameter} in {scenario}.")
            }
            ChartKind::Predictions => {
                format!("No Actual vs Predicted graph available for {parameter} in {scenario}.")
            }
        };
        warning(html, &message);
        return;
    }

    let (heading, caption) = match kind {
        ChartKind::Forecast => (
            format!("Forecast Visualization for {parameter}"),
            format!("{parameter} Forecast Visualization"),
        ),
        ChartKind::Predictions => (
            format!("Actual vs Predicted Visualization for {parameter}"),
            format!("{parameter} Actual vs Predicted Graph"),
        ),
    };

    let _ = write!(
        html,
        r#"    <h3>{heading}</h3>
    <figure>
        <img src="{src}" alt="{caption}">
        <figcaption>{caption}</figcaption>
    </figure>
"#,
        src = escape(&chart_url(selection, kind)),
    );
}

// -----------------------------------------------------------------------------
// 3. Helpers
// -----------------------------------------------------------------------------

/// URL of the chart endpoint for a selection.
pub fn chart_url(selection: &Selection, kind: ChartKind) -> String {
    format!("/charts/{}?{}", kind.as_str(), query_string(selection))
}

/// `city=..&scenario=..&parameter=..`, percent-encoded.
pub fn query_string(selection: &Selection) -> String {
    format!(
        "city={}&scenario={}&parameter={}",
        urlencoding::encode(selection.city),
        urlencoding::encode(selection.scenario.name),
        urlencoding::encode(selection.parameter),
    )
}

fn options<'a>(values: impl Iterator<Item = &'a str>, selected: &str) -> String {
    let mut out = String::new();
    for value in values {
        let value = escape(value);
        let marker = if value == escape(selected) { " selected" } else { "" };
        let _ = writeln!(out, "        <option value=\"{value}\"{marker}>{value}</option>");
    }
    out
}

fn warning(html: &mut String, message: &str) {
    let _ = writeln!(html, "    <div class=\"warning\">⚠️ {message}</div>");
}

/// Escape text for HTML element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

// -----------------------------------------------------------------------------
// 4. Tests
// -----------------------------------------------------------------------------
