//! Server-side HTML for the search form and report page.

use ammonia::clean_text;
use coursedigest_pipeline::{CourseReport, PostSummary, StructuredSummary};
use pulldown_cmark::{html, Options, Parser};
use std::fmt::Write;

const STYLE: &str = r#"
        body { font-family: 'Segoe UI', sans-serif; background: #0f172a; color: #e5e7eb; max-width: 800px; margin: auto; padding: 2rem; }
        h1 { text-align: center; font-size: 2.5rem; color: #c084fc; }
        form { text-align: center; margin: 2rem 0; }
        input[type="text"] { padding: 0.5rem; width: 60%; font-size: 1rem; border: none; border-radius: 0.5rem; background-color: #1e293b; color: #f9fafb; }
        button { padding: 0.5rem 1rem; font-size: 1rem; background: #9333ea; color: white; border: none; border-radius: 0.5rem; cursor: pointer; margin-left: 0.5rem; }
        .summary-box, .post { background: #1e293b; padding: 1.5rem; border-radius: 1rem; box-shadow: 0 0 10px rgba(168, 85, 247, 0.3); }
        .post { margin-top: 1rem; padding: 1rem 1.5rem; }
        .meta { margin-top: 1rem; font-size: 1rem; }
        .tags span { background: #4c1d95; padding: 0.25rem 0.75rem; border-radius: 9999px; margin-right: 0.5rem; display: inline-block; color: #facc15; }
        .notice { text-align: center; color: #fca5a5; }
        .sources { margin-top: 2rem; }
        .sources ul { padding-left: 1.2rem; }
        .sources li { margin-bottom: 0.5rem; }
        a { color: #93c5fd; }
"#;

/// Markdown to sanitised HTML
pub fn markdown_to_html(text: &str) -> String {
    let mut out = String::new();
    html::push_html(&mut out, Parser::new_ext(text, Options::empty()));
    ammonia::clean(&out)
}

/// Full page: form, plus the report when there is one
pub fn page(query: &str, report: Option<&CourseReport>, notice: Option<&'static str>) -> String {
    let mut body = String::new();

    if let Some(notice) = notice {
        let _ = write!(body, r#"<p class="notice">{}</p>"#, notice);
    }
    if let Some(report) = report {
        render_summary(&mut body, &report.query, &report.summary);
        render_posts(&mut body, &report.posts);
        render_sources(&mut body, &report.sources);
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Reddit Class Summary Tool</title>
    <style>{style}</style>
</head>
<body>
    <h1>🔮 Reddit Class Summary Tool</h1>
    <form method="POST" action="/">
        <input type="text" name="query" placeholder="Enter course code (e.g. CS577)" value="{query}" required>
        <button type="submit">Summarize</button>
    </form>
{body}
</body>
</html>"#,
        style = STYLE,
        query = clean_text(query),
        body = body,
    )
}

fn render_summary(out: &mut String, query: &str, summary: &StructuredSummary) {
    let _ = write!(
        out,
        r#"<div class="summary-box"><h2>🧠 Summary for {}</h2><div>{}</div><div class="meta">"#,
        clean_text(query),
        markdown_to_html(&summary.narrative)
    );

    // Tags and estimate that still carry their label mean the model echoed the template
    let tags: Vec<&String> = summary.tags.iter().filter(|t| !t.contains("Tags:")).collect();
    if !tags.is_empty() {
        out.push_str(r#"<div class="tags">🏷️ Tags: "#);
        for tag in tags {
            let _ = write!(out, "<span>{}</span>", clean_text(tag));
        }
        out.push_str("</div>");
    }
    if !summary.estimate.is_empty() && !summary.estimate.contains("Estimated A Chance") {
        let _ = write!(
            out,
            "<p>📊 Estimated A Chance: <strong>{}</strong></p>",
            clean_text(&summary.estimate)
        );
    }
    out.push_str("</div></div>");
}

fn render_posts(out: &mut String, posts: &[PostSummary]) {
    if posts.is_empty() {
        return;
    }
    out.push_str("<h3>📝 Post Summaries</h3>");
    for post in posts {
        let _ = write!(
            out,
            r#"<div class="post"><a href="{}" target="_blank">{}</a><div>{}</div></div>"#,
            safe_href(&post.url),
            clean_text(&post.title),
            markdown_to_html(&post.summary)
        );
    }
}

fn render_sources(out: &mut String, sources: &[String]) {
    if sources.is_empty() {
        return;
    }
    out.push_str(r#"<div class="sources"><h3>🔗 Sources (Reddit Posts)</h3><ul>"#);
    for link in sources {
        let _ = write!(
            out,
            r#"<li><a href="{}" target="_blank">{}</a></li>"#,
            safe_href(link),
            clean_text(link)
        );
    }
    out.push_str("</ul></div>");
}

/// Escaped href, or `#` for anything that is not an http(s) URL
fn safe_href(url: &str) -> String {
    let lower = url.trim_start().to_ascii_lowercase();
    if lower.starts_with("https://") || lower.starts_with("http://") {
        clean_text(url)
    } else {
        "#".to_string()
    }
}
