//! Grid rendering of the report (`Link` / `Status` columns).

use imgdl_core::report::Report;

const HEADERS: [&str; 2] = ["Link", "Status"];

fn border(widths: &[usize; 2], fill: char) -> String {
    let mut s = String::from("+");
    for w in widths {
        s.extend(std::iter::repeat(fill).take(w + 2));
        s.push('+');
    }
    s.push('\n');
    s
}

fn line(widths: &[usize; 2], cells: [&str; 2]) -> String {
    let mut s = String::from("|");
    for (w, cell) in widths.iter().zip(cells) {
        s.push_str(&format!(" {:<width$} |", cell, width = *w));
    }
    s.push('\n');
    s
}

/// Renders `report` as a grid table, one row per URL in report order.
pub fn render_grid(report: &Report) -> String {
    let rows: Vec<(String, String)> = report
        .iter()
        .map(|r| (r.url.clone(), r.outcome.to_string()))
        .collect();
    let mut widths = HEADERS.map(|h| h.chars().count());
    for (link, status) in &rows {
        widths[0] = widths[0].max(link.chars().count());
        widths[1] = widths[1].max(status.chars().count());
    }

    let mut out = border(&widths, '-');
    out.push_str(&line(&widths, HEADERS));
    out.push_str(&border(&widths, '='));
    for (link, status) in &rows {
        out.push_str(&line(&widths, [link.as_str(), status.as_str()]));
        out.push_str(&border(&widths, '-'));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgdl_core::report::StatusRow;

    #[test]
    fn renders_rows_with_padding() {
        let mut report = Report::default();
        report.push(StatusRow::success(1, "http://a/1.jpg"));
        report.push(StatusRow::error(2, "http://example.com/b.jpg", "HTTP 404"));
        let expected = "\
+--------------------------+---------+
| Link                     | Status  |
+==========================+=========+
| http://a/1.jpg           | Success |
+--------------------------+---------+
| http://example.com/b.jpg | Error   |
+--------------------------+---------+
";
        assert_eq!(render_grid(&report), expected);
    }

    #[test]
    fn empty_report_renders_header_only() {
        let expected = "\
+------+--------+
| Link | Status |
+======+========+
";
        assert_eq!(render_grid(&Report::default()), expected);
    }
}
