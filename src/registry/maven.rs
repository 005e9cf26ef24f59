use super::RegistryClient;
use crate::utils::error::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct MavenSearch {
    response: Option<MavenResponse>,
}

#[derive(Debug, Deserialize)]
struct MavenResponse {
    #[serde(rename = "numFound", default)]
    num_found: u64,
    #[serde(default)]
    docs: Vec<MavenDoc>,
}

#[derive(Debug, Deserialize)]
struct MavenDoc {
    homepage: Option<String>,
}

/// Maven Central's search API has no license field, so any hit resolves to
/// "See URL" with the best documentation link available.
pub(crate) async fn lookup(client: &RegistryClient, name: &str) -> Result<Option<(String, String)>> {
    let Some((group, artifact)) = name.split_once(':') else {
        return Ok(None);
    };

    let request_url = format!(
        "{}/solrsearch/select?q=g:\"{}\"+AND+a:\"{}\"&wt=json",
        client.endpoints().maven,
        group,
        artifact
    );
    let Some(search) = client.get::<MavenSearch>(&request_url).await? else {
        return Ok(None);
    };
    let Some(response) = search.response else {
        return Ok(None);
    };
    if response.num_found == 0 {
        return Ok(None);
    }
    let Some(doc) = response.docs.first() else {
        return Ok(None);
    };

    let url = doc
        .homepage
        .clone()
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| format!("https://mvnrepository.com/artifact/{}/{}", group, artifact));
    Ok(Some(("See URL".to_string(), url)))
}
