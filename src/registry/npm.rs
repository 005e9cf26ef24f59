use super::RegistryClient;
use crate::utils::error::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct NpmPackage {
    license: Option<NpmLicense>,
    homepage: Option<String>,
    repository: Option<NpmRepository>,
}

/// npm serves `license` either as an SPDX string or as `{"type": ..., "url": ...}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NpmLicense {
    Expression(String),
    Object {
        #[serde(rename = "type")]
        kind: Option<String>,
    },
}

/// Older packages publish `repository` as a bare string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NpmRepository {
    Url(String),
    Object { url: Option<String> },
}

impl NpmRepository {
    fn url(self) -> Option<String> {
        match self {
            NpmRepository::Url(url) => Some(url),
            NpmRepository::Object { url } => url,
        }
    }
}

pub(crate) async fn lookup(client: &RegistryClient, name: &str) -> Result<Option<(String, String)>> {
    let request_url = format!("{}/{}", client.endpoints().npm, name);
    let Some(package) = client.get::<NpmPackage>(&request_url).await? else {
        return Ok(None);
    };

    let license = match package.license {
        Some(NpmLicense::Expression(expr)) if !expr.is_empty() => expr,
        Some(NpmLicense::Object { kind }) => kind.unwrap_or_else(|| "Unknown".to_string()),
        _ => "Unknown".to_string(),
    };

    let url = package
        .homepage
        .filter(|u| !u.is_empty())
        .or_else(|| {
            package
                .repository
                .and_then(NpmRepository::url)
                .map(|u| clean_repository_url(&u))
        })
        .unwrap_or_default();

    Ok(Some((license, url)))
}

/// Strip the `git+` prefix and `.git` suffix npm repository URLs carry.
fn clean_repository_url(url: &str) -> String {
    let url = url.strip_prefix("git+").unwrap_or(url);
    url.strip_suffix(".git").unwrap_or(url).to_string()
}
