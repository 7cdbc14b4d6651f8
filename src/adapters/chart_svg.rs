//! SVG line charts of a bar series.

use crate::domain::bar_series::BarSeries;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 320.0;
const PADDING: f64 = 40.0;
const PALETTE: [&str; 5] = ["#d62728", "#2ca02c", "#ff7f0e", "#9467bd", "#8c564b"];

/// Renders the close price plus the named columns as polylines.
/// Undefined column values break the line.
pub fn format_series_chart(series: &BarSeries, columns: &[&str], title: &str) -> String {
    let mut lines: Vec<(&str, &str, Vec<Option<f64>>)> =
        vec![("close", "#1f77b4", series.closes().into_iter().map(Some).collect())];
    for (i, name) in columns.iter().enumerate() {
        if let Some(values) = series.column(name) {
            lines.push((*name, PALETTE[i % PALETTE.len()], values.to_vec()));
        }
    }

    let (min, max) = lines
        .iter()
        .flat_map(|(_, _, values)| values.iter().flatten())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">
<rect width="100%" height="100%" fill="white"/>
<text x="{pad:.0}" y="{ty:.0}" font-family="sans-serif" font-size="14">{title}</text>
<line x1="{pad:.0}" y1="{bottom:.0}" x2="{right:.0}" y2="{bottom:.0}" stroke="black"/>
<line x1="{pad:.0}" y1="{pad:.0}" x2="{pad:.0}" y2="{bottom:.0}" stroke="black"/>
"#,
        w = WIDTH,
        h = HEIGHT,
        pad = PADDING,
        ty = PADDING / 2.0,
        bottom = HEIGHT - PADDING,
        right = WIDTH - PADDING,
        title = escape(title),
    );

    if series.is_empty() || !min.is_finite() {
        svg.push_str(r#"<text x="50%" y="50%" text-anchor="middle">No data available.</text>"#);
        svg.push_str("\n</svg>\n");
        return svg;
    }

    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;
    let range = max - min;
    let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };
    let scale_x = if series.len() > 1 {
        plot_width / (series.len() - 1) as f64
    } else {
        0.0
    };

    for (idx, (name, color, values)) in lines.iter().enumerate() {
        for segment in segments(values) {
            let points: Vec<String> = segment
                .iter()
                .map(|&(i, v)| {
                    let x = PADDING + i as f64 * scale_x;
                    let y = HEIGHT - PADDING - (v - min) * scale_y;
                    format!("{:.1},{:.1}", x, y)
                })
                .collect();
            svg.push_str(&format!(
                "<polyline fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\" points=\"{}\"/>\n",
                color,
                points.join(" ")
            ));
        }
        svg.push_str(&format!(
            "<text x=\"{:.0}\" y=\"{:.0}\" font-family=\"sans-serif\" font-size=\"11\" fill=\"{}\">{}</text>\n",
            WIDTH - PADDING - 120.0,
            PADDING + 14.0 * idx as f64,
            color,
            escape(name)
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

/// Runs of consecutive defined values, as (position, value) pairs.
fn segments(values: &[Option<f64>]) -> Vec<Vec<(usize, f64)>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for (i, value) in values.iter().enumerate() {
        match value {
            Some(v) => current.push((i, *v)),
            None if !current.is_empty() => out.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
