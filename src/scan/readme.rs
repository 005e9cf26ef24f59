use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

const DEFAULT_DESCRIPTION: &str = "No description available.";
const MAX_DESCRIPTION_CHARS: usize = 300;

static PARAGRAPH_RE: OnceLock<Regex> = OnceLock::new();
static MARKUP_RE: OnceLock<Regex> = OnceLock::new();

fn paragraph_regex() -> &'static Regex {
    PARAGRAPH_RE.get_or_init(|| Regex::new(r"\n\s*\n").expect("invalid regex"))
}

fn markup_regex() -> &'static Regex {
    MARKUP_RE.get_or_init(|| {
        Regex::new(r"(\*\*|\*|__|_|`|\[.*\]\(.*\))").expect("invalid regex")
    })
}

/// Pull a short description from the repository README: the first paragraph
/// that is not a heading, markdown formatting stripped, capped at 300 chars.
pub fn extract(repo_path: &Path) -> String {
    for readme_name in ["README.md", "readme.md"] {
        let readme = repo_path.join(readme_name);
        if !readme.exists() {
            continue;
        }
        let content = match std::fs::read_to_string(&readme) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Could not read {}: {}", readme.display(), e);
                continue;
            }
        };
        for paragraph in paragraph_regex().split(&content) {
            let trimmed = paragraph.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let clean = markup_regex().replace_all(trimmed, "").trim().to_string();
            return truncate(&clean);
        }
    }
    DEFAULT_DESCRIPTION.to_string()
}

fn truncate(text: &str) -> String {
    if text.chars().count() > MAX_DESCRIPTION_CHARS {
        let head: String = text.chars().take(MAX_DESCRIPTION_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
