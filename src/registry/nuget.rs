use super::RegistryClient;
use crate::utils::error::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct NugetIndex {
    #[serde(default)]
    items: Vec<NugetPage>,
}

// Registration pages only inline their leaves for small packages; an absent
// `items` array means another fetch would be needed, which we treat as
// unresolved, like the original tool.
#[derive(Debug, Deserialize)]
struct NugetPage {
    #[serde(default)]
    items: Vec<NugetLeaf>,
}

#[derive(Debug, Deserialize)]
struct NugetLeaf {
    #[serde(rename = "catalogEntry")]
    catalog_entry: Option<NugetCatalogRef>,
}

#[derive(Debug, Deserialize)]
struct NugetCatalogRef {
    #[serde(rename = "@id")]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NugetCatalogEntry {
    #[serde(rename = "licenseExpression")]
    license_expression: Option<String>,
    #[serde(rename = "projectUrl")]
    project_url: Option<String>,
}

/// Walk the registration index to the newest catalog entry, then fetch it
/// for the license expression and project URL.
pub(crate) async fn lookup(client: &RegistryClient, name: &str) -> Result<Option<(String, String)>> {
    let index_url = format!(
        "{}/v3/registration5-semver1/{}/index.json",
        client.endpoints().nuget,
        name.to_lowercase()
    );
    let Some(index) = client.get::<NugetIndex>(&index_url).await? else {
        return Ok(None);
    };

    let Some(entry_url) = index
        .items
        .last()
        .and_then(|page| page.items.last())
        .and_then(|leaf| leaf.catalog_entry.as_ref())
        .and_then(|entry| entry.id.clone())
    else {
        return Ok(None);
    };

    let Some(entry) = client.get::<NugetCatalogEntry>(&entry_url).await? else {
        return Ok(None);
    };

    let license = entry
        .license_expression
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| "Unknown".to_string());
    Ok(Some((license, entry.project_url.unwrap_or_default())))
}
