use super::RegistryClient;
use crate::utils::error::Result;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
struct PypiResponse {
    info: Option<PypiInfo>,
}

#[derive(Debug, Deserialize)]
struct PypiInfo {
    license: Option<String>,
    #[serde(default)]
    classifiers: Vec<String>,
    // The API serves `"project_urls": null` for some packages; both the map
    // and its values must tolerate null.
    project_urls: Option<HashMap<String, Option<String>>>,
    home_page: Option<String>,
}

pub(crate) async fn lookup(client: &RegistryClient, name: &str) -> Result<Option<(String, String)>> {
    let request_url = format!("{}/pypi/{}/json", client.endpoints().pypi, name);
    let Some(response) = client.get::<PypiResponse>(&request_url).await? else {
        return Ok(None);
    };
    let Some(info) = response.info else {
        return Ok(None);
    };

    let mut license = info
        .license
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| "Unknown".to_string());
    if license == "Unknown" {
        for classifier in &info.classifiers {
            if classifier.starts_with("License ::") {
                if let Some(last) = classifier.rsplit("::").next() {
                    license = last.trim().to_string();
                }
                break;
            }
        }
    }

    let homepage = info
        .project_urls
        .and_then(|urls| urls.get("Homepage").cloned().flatten())
        .filter(|u| !u.is_empty())
        .or(info.home_page)
        .unwrap_or_default();

    Ok(Some((license, homepage)))
}
