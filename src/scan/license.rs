use std::path::PathBuf;

const LICENSE_FILE_NAMES: [&str; 4] = ["LICENSE", "LICENSE.md", "LICENSE.txt", "COPYING"];

/// Classify the repository's own license from the first recognizable license
/// file, searched in name-preference order across the whole tree.
pub fn identify(files: &[PathBuf]) -> String {
    for file_name in LICENSE_FILE_NAMES {
        for path in files
            .iter()
            .filter(|p| p.file_name().and_then(|n| n.to_str()) == Some(file_name))
        {
            let content = match std::fs::read_to_string(path) {
                Ok(c) => c.to_lowercase(),
                Err(_) => continue,
            };
            return classify(&content);
        }
    }
    "Unknown".to_string()
}

fn classify(content: &str) -> String {
    if content.contains("mit license") {
        "MIT"
    } else if content.contains("apache license") {
        "Apache-2.0"
    } else if content.contains("gnu general public license") {
        "GPL"
    } else if content.contains("mozilla public license") {
        "MPL-2.0"
    } else {
        "Custom"
    }
    .to_string()
}
