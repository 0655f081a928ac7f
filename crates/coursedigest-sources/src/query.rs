use regex::Regex;
use std::sync::OnceLock;

fn course_code() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Z]+)[\s\-]?(\d+)").expect("static regex"))
}

/// Rewrite a raw course code into a site-scoped search query.
///
/// `cs 577` becomes `site:reddit.com/r/UWMadison "CS577" OR "CS 577" OR "CS-577"`
/// so that every spelling students use is matched. Input that does not look
/// like a course code is searched as-is.
pub fn optimize_search_query(raw: &str, subreddit: &str) -> String {
    let clean = raw.trim().to_uppercase();
    let scope = format!("site:reddit.com/r/{}", subreddit);

    let Some(caps) = course_code().captures(&clean) else {
        return format!("{} {}", scope, clean);
    };

    let dept = &caps[1];
    let num = &caps[2];
    let variations = [
        format!("{}{}", dept, num),
        format!("{} {}", dept, num),
        format!("{}-{}", dept, num),
    ];

    let alternatives = variations
        .iter()
        .map(|v| format!("\"{}\"", v))
        .collect::<Vec<_>>()
        .join(" OR ");

    format!("{} {}", scope, alternatives)
}
