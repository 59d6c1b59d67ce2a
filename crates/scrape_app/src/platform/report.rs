use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use scrape_core::{escape_html, AppViewModel};
use scrape_engine::AtomicFileWriter;

/// Lay out the three display regions as a standalone page. Region markup is
/// already escaped by the core; only the header values are escaped here.
pub fn build_report(view: &AppViewModel, generated_utc: &str) -> String {
    let mut page = String::new();
    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str("<title>Scrape report</title>\n</head>\n<body>\n");
    page.push_str(&format!(
        "<header><h1>Scrape report</h1><p>URL: {} | generated {}</p></header>\n",
        escape_html(view.url_input.trim()),
        escape_html(generated_utc)
    ));
    page.push_str(&format!(
        "<section id=\"rawContent\"><h2>Raw content</h2>\n{}\n</section>\n",
        view.raw_content_html
    ));
    page.push_str(&format!(
        "<section id=\"analysis\"><h2>Analysis</h2>\n{}\n</section>\n",
        view.analysis_html
    ));
    page.push_str("<section id=\"results\"><h2>Results</h2>\n");
    for fragment in &view.results_log {
        page.push_str(fragment);
        page.push('\n');
    }
    page.push_str("</section>\n");
    if let Some(path) = &view.last_export {
        page.push_str(&format!(
            "<footer>CSV saved to {}</footer>\n",
            escape_html(&path.display().to_string())
        ));
    }
    page.push_str("</body>\n</html>\n");
    page
}

pub fn write_report(path: &Path, html: &str) -> anyhow::Result<PathBuf> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("report path {} has no file name", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    AtomicFileWriter::new(dir)
        .write(filename, html.as_bytes())
        .with_context(|| format!("failed to write report {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sample_view() -> AppViewModel {
        AppViewModel {
            url_input: "https://hotel.example/?a=1&b=2".to_string(),
            raw_content_html: "<div class=\"code-text\">raw</div>".to_string(),
            analysis_html: "<div class=\"code-text\">analysis</div>".to_string(),
            results_log: vec![
                "<div class=\"step-indicator\">Step 1</div>".to_string(),
                "<div class=\"error\">Error: bad url</div>".to_string(),
            ],
            last_export: Some(PathBuf::from("out/hotel_rooms.csv")),
            ..AppViewModel::default()
        }
    }

    #[test]
    fn report_contains_all_regions_in_order() {
        let html = build_report(&sample_view(), "2026-10-19T08:00:00+00:00");

        assert!(html.contains("URL: https://hotel.example/?a=1&amp;b=2"));
        let raw = html.find("id=\"rawContent\"").unwrap();
        let analysis = html.find("id=\"analysis\"").unwrap();
        let results = html.find("id=\"results\"").unwrap();
        assert!(raw < analysis && analysis < results);
        let step = html.find("Step 1").unwrap();
        let error = html.find("Error: bad url").unwrap();
        assert!(results < step && step < error);
        assert!(html.contains("CSV saved to out/hotel_rooms.csv"));
    }

    #[test]
    fn report_is_written_to_requested_path() {
        let temp = tempfile::TempDir::new().unwrap();
        let target = temp.path().join("reports").join("run.html");

        let written = write_report(&target, "<html></html>").unwrap();

        assert_eq!(written, target);
        assert_eq!(fs::read_to_string(&target).unwrap(), "<html></html>");
    }
}
