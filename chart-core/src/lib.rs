use aro_core::{ReferenceEntry, ring_radius};
use png::{BitDepth, ColorType, Encoder};

mod labels;

pub use labels::{Labels, Lang};

/// Side of the square viewBox the ring is drawn in.
pub const RING_VIEWBOX: f64 = 120.0;
const RING_STROKE: f64 = 3.0;
const MEASURE_COLOR: &str = "#6b7280";

/// Default row height of the printable chart (px).
pub const DEFAULT_ROW_PX: f64 = 36.0;

// Shared PNG encoder: RGBA -> PNG bytes (deterministic for same input)
pub fn encode_rgba_to_png_bytes(
    width: u32,
    height: u32,
    rgba: &[u8],
) -> Result<Vec<u8>, png::EncodingError> {
    let mut buf = Vec::new();
    {
        let mut enc = Encoder::new(&mut buf, width, height);
        enc.set_color(ColorType::Rgba);
        enc.set_depth(BitDepth::Eight);
        {
            let mut writer = enc.write_header()?;
            writer.write_image_data(rgba)?;
        }
    }
    Ok(buf)
}

/// Escape text for use inside SVG/HTML element content or attributes.
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn measure_line(s: &mut String, x1: f64, y1: f64, x2: f64, y2: f64, extra: &str) {
    s.push_str(&format!(
        "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" {}/>\n",
        x1, y1, x2, y2, extra
    ));
}

/// Ring drawing for a diameter in mm. The radius follows the clamped visual
/// scale; the measurement line and tooltip only appear for positive values.
pub fn build_ring_svg(diameter: f64) -> String {
    let c = RING_VIEWBOX / 2.0;
    let r = ring_radius(diameter);
    let mut s = String::new();
    s.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {v} {v}\" class=\"ring\">\n",
        v = RING_VIEWBOX
    ));
    s.push_str(
        "<style>.tip{opacity:0;transition:opacity .2s}.dia:hover+.tip{opacity:1}</style>\n",
    );
    s.push_str("<defs><linearGradient id=\"goldGradient\" x1=\"0%\" y1=\"0%\" x2=\"100%\" y2=\"100%\">");
    s.push_str("<stop offset=\"0%\" stop-color=\"#FDE047\"/><stop offset=\"100%\" stop-color=\"#F59E0B\"/>");
    s.push_str("</linearGradient></defs>\n");
    s.push_str(&format!(
        "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"none\" stroke=\"url(#goldGradient)\" stroke-width=\"{}\"/>\n",
        c, c, r, RING_STROKE
    ));
    if diameter > 0.0 {
        s.push_str("<g class=\"dia\">\n");
        // wide transparent hit area for hovering
        measure_line(
            &mut s,
            c - r,
            c,
            c + r,
            c,
            "stroke=\"transparent\" stroke-width=\"12\"",
        );
        let stroke = format!("stroke=\"{MEASURE_COLOR}\" stroke-width=\"1\"");
        measure_line(
            &mut s,
            c - r,
            c,
            c + r,
            c,
            &format!("{stroke} stroke-dasharray=\"2 2\""),
        );
        measure_line(&mut s, c - r, c - 4.0, c - r, c + 4.0, &stroke);
        measure_line(&mut s, c + r, c - 4.0, c + r, c + 4.0, &stroke);
        s.push_str("</g>\n");
        s.push_str(&format!(
            "<g class=\"tip\" transform=\"translate({:.2} {:.2})\" pointer-events=\"none\">\n",
            c,
            c - 12.0
        ));
        s.push_str(
            "<rect x=\"-32\" y=\"-13\" width=\"64\" height=\"20\" rx=\"5\" fill=\"#111827\" fill-opacity=\"0.85\"/>\n",
        );
        s.push_str(&format!(
            "<text text-anchor=\"middle\" dominant-baseline=\"middle\" fill=\"#e5e7eb\" font-size=\"11\" font-weight=\"600\" font-family=\"sans-serif\">{:.2} mm</text>\n",
            diameter
        ));
        s.push_str("</g>\n");
    }
    s.push_str("</svg>\n");
    s
}

/// Reference table as an HTML fragment for the details panel.
pub fn build_chart_html(table: &[ReferenceEntry], labels: &Labels) -> String {
    let mut s = String::from("<table class=\"chart\">\n<thead><tr>");
    s.push_str(&format!(
        "<th>{}</th><th>{}</th>",
        escape(&labels.size_header),
        escape(&labels.diameter_header)
    ));
    s.push_str("</tr></thead>\n<tbody>\n");
    for e in table {
        s.push_str(&format!(
            "<tr><td>{}</td><td>{:.1}</td></tr>\n",
            e.size, e.diameter
        ));
    }
    s.push_str("</tbody>\n</table>\n");
    s
}

/// Printable two-column chart. Returns the SVG text and its pixel size.
pub fn build_chart_svg(table: &[ReferenceEntry], labels: &Labels, row_px: f64) -> (String, u32, u32) {
    let row_px = if row_px.is_finite() && row_px > 0.0 {
        row_px
    } else {
        DEFAULT_ROW_PX
    };
    let pad = 20.0;
    let col_w = 10.0 * row_px.max(18.0) / 1.5;
    let font = (row_px * 0.5).round().max(8.0);
    let title_h = row_px * 1.5;
    let total_w = pad * 2.0 + col_w * 2.0;
    // title + header + rows
    let total_h = pad * 2.0 + title_h + row_px * (table.len() as f64 + 1.0);
    let w_px = total_w.ceil() as u32;
    let h_px = total_h.ceil() as u32;

    let mut s = String::new();
    s.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    s.push_str(&format!("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\" font-family=\"sans-serif\" font-size=\"{}\">\n", w_px, h_px, w_px, h_px, font));
    s.push_str("<rect x=\"0\" y=\"0\" width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>\n");
    s.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"middle\" fill=\"#111\" font-size=\"{}\" font-weight=\"700\">{}</text>\n",
        total_w / 2.0,
        pad + title_h / 2.0,
        font * 1.4,
        escape(&labels.title)
    ));

    let top = pad + title_h;
    let x_size = pad + col_w / 2.0;
    let x_dia = pad + col_w * 1.5;
    s.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"#fef3c7\"/>\n",
        pad,
        top,
        col_w * 2.0,
        row_px
    ));
    let header_y = top + row_px / 2.0;
    for (x, text) in [(x_size, &labels.size_header), (x_dia, &labels.diameter_header)] {
        s.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"middle\" fill=\"#92400e\" font-weight=\"600\">{}</text>\n",
            x,
            header_y,
            escape(text)
        ));
    }
    for (i, e) in table.iter().enumerate() {
        let y = top + row_px * (i as f64 + 1.0);
        if i % 2 == 1 {
            s.push_str(&format!(
                "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"#f5f5f4\"/>\n",
                pad,
                y,
                col_w * 2.0,
                row_px
            ));
        }
        let ty = y + row_px / 2.0;
        s.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"middle\" fill=\"#333\">{}</text>\n",
            x_size, ty, e.size
        ));
        s.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"middle\" fill=\"#333\">{:.1}</text>\n",
            x_dia, ty, e.diameter
        ));
    }
    let bottom = top + row_px * (table.len() as f64 + 1.0);
    s.push_str(&format!(
        "<path d=\"M {:.2} {:.2} L {:.2} {:.2}\" stroke=\"#ddd\" stroke-width=\"1\"/>\n",
        pad + col_w,
        top,
        pad + col_w,
        bottom
    ));
    s.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"none\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        pad,
        top,
        col_w * 2.0,
        bottom - top
    ));
    s.push_str("</svg>\n");
    (s, w_px, h_px)
}
