//! CSV serialization of a calculation result.
//!
//! Excel-compatible output: UTF-8 byte-order mark, CRLF line endings,
//! quote-escaped fields, and a leading `#` comment block recording the pool
//! split and the cash total.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::payload::{CalcResponse, RowOut};

const BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

const COLUMNS: [&str; 10] = [
    "Name",
    "Role",
    "Payment",
    "Base %",
    "Role %",
    "Property %",
    "Equity %",
    "Profit %",
    "Sale Value",
    "Profit Value",
];

/// Quote a single field, doubling embedded quotes.
fn esc(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn format_row(row: &RowOut) -> String {
    [
        esc(&row.name),
        esc(row.role.as_str()),
        format!("{:.2}", row.payment),
        format!("{:.2}", row.base_share_pct),
        format!("{:.2}", row.role_share_pct),
        format!("{:.2}", row.property_share_pct),
        format!("{:.2}", row.total_equity_pct),
        format!("{:.2}", row.total_profit_pct),
        format!("{:.2}", row.final_value),
        format!("{:.2}", row.profit_value),
    ]
    .join(",")
}

/// Serialize the response rows into a CSV document, BOM included.
pub fn to_csv(response: &CalcResponse, generated_at: DateTime<Utc>) -> Vec<u8> {
    let mut lines: Vec<String> = Vec::with_capacity(response.results.len() + 6);
    lines.push("# Investment Share Calculator".to_string());
    lines.push(format!(
        "# Generated: {}",
        generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    ));
    lines.push(format!(
        "# Pools: base={:.2}%, role={:.2}%, property={:.2}%",
        response.pools.base_pct, response.pools.role_pct, response.pools.property_pct
    ));
    lines.push(format!("# Cash total: {:.2}", response.totals.cash_total));
    lines.push(
        COLUMNS
            .iter()
            .map(|c| esc(c))
            .collect::<Vec<_>>()
            .join(","),
    );
    for row in &response.results {
        lines.push(format_row(row));
    }

    let body = lines.join("\r\n");
    let mut out = Vec::with_capacity(BOM.len() + body.len() + 2);
    out.extend_from_slice(BOM);
    out.extend_from_slice(body.as_bytes());
    out.extend_from_slice(b"\r\n");
    out
}
