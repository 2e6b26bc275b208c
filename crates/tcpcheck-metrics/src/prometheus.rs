//! Prometheus text exposition format.
//!
//! Renders the registry snapshot as exposition format 0.0.4 for scraping
//! by a Prometheus server or compatible agent.

use tcpcheck_core::TargetLabels;

/// Name of the per-endpoint status gauge.
pub const UP_METRIC: &str = "tcp_endpoint_up";

const UP_HELP: &str = "TCP endpoint connectivity status (1 for up, 0 for down)";

/// Render `(labels, value)` pairs as the `tcp_endpoint_up` gauge family.
///
/// HELP and TYPE lines are always written, even with no series.
pub fn render_prometheus(series: &[(TargetLabels, f64)]) -> String {
    let mut out = String::new();

    out.push_str(&format!("# HELP {UP_METRIC} {UP_HELP}\n"));
    out.push_str(&format!("# TYPE {UP_METRIC} gauge\n"));
    for (labels, value) in series {
        let rendered: Vec<String> = TargetLabels::NAMES
            .iter()
            .zip(labels.values())
            .map(|(name, value)| format!("{name}=\"{}\"", escape_label_value(value)))
            .collect();
        out.push_str(&format!("{UP_METRIC}{{{}}} {value}\n", rendered.join(",")));
    }

    out
}

fn escape_label_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            c => escaped.push(c),
        }
    }
    escaped
}
