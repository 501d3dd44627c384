use super::{PublishedRelease, ReleaseHost, ReleaseRequest, RepositorySlug};
use crate::config::PublishConfig;
use crate::error::{ReleaseError, Result};
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Releases hosted on GitHub, created through the REST API.
pub struct GitHubReleases {
    api_url: String,
    uploads_url: String,
    token_env: String,
    slug: RepositorySlug,
}

#[derive(Serialize)]
struct CreateRelease<'a> {
    tag_name: &'a str,
    name: &'a str,
    body: &'a str,
    draft: bool,
    prerelease: bool,
}

#[derive(Deserialize)]
struct CreatedRelease {
    id: u64,
    html_url: String,
    #[serde(default)]
    upload_url: Option<String>,
}

impl GitHubReleases {
    pub fn new(config: &PublishConfig, slug: RepositorySlug) -> Self {
        GitHubReleases {
            api_url: config.api_url.trim_end_matches('/').to_string(),
            uploads_url: config.uploads_url.trim_end_matches('/').to_string(),
            token_env: config.token_env.clone(),
            slug,
        }
    }

    pub fn releases_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases",
            self.api_url, self.slug.owner, self.slug.name
        )
    }

    pub fn asset_upload_url(&self, release_id: u64) -> String {
        format!(
            "{}/repos/{}/{}/releases/{}/assets",
            self.uploads_url, self.slug.owner, self.slug.name, release_id
        )
    }

    /// Where to upload the archive for a created release.
    ///
    /// Prefers the `upload_url` the API returned (an RFC 6570 template such as
    /// `.../assets{?name,label}`) and falls back to the configured uploads host.
    fn upload_target(&self, release_id: u64, upload_url: Option<&str>) -> String {
        upload_url
            .and_then(|template| template.split('{').next())
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.asset_upload_url(release_id))
    }

    fn token(&self) -> Result<String> {
        env::var(&self.token_env)
            .ok()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                ReleaseError::publish(format!(
                    "No API token: environment variable {} is not set",
                    self.token_env
                ))
            })
    }

    fn client() -> Result<Client> {
        Ok(Client::builder()
            .user_agent(format!("toolbox-release/{}", env!("CARGO_PKG_VERSION")))
            .build()?)
    }
}

impl ReleaseHost for GitHubReleases {
    fn create_release(&self, request: &ReleaseRequest) -> Result<PublishedRelease> {
        let token = self.token()?;
        let archive = fs::read(&request.archive_path)?;
        let client = Self::client()?;

        let response = client
            .post(self.releases_url())
            .bearer_auth(&token)
            .header(ACCEPT, GITHUB_ACCEPT)
            .json(&CreateRelease {
                tag_name: &request.tag,
                name: &request.title,
                body: &request.body,
                draft: false,
                prerelease: false,
            })
            .send()?;
        let created: CreatedRelease = check_status(response, "Creating release")?.json()?;

        let response = client
            .post(self.upload_target(created.id, created.upload_url.as_deref()))
            .query(&[("name", request.archive_name.as_str())])
            .bearer_auth(&token)
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(CONTENT_TYPE, "application/zip")
            .body(archive)
            .send()?;
        check_status(response, "Uploading archive")?;

        Ok(PublishedRelease {
            id: created.id,
            html_url: created.html_url,
        })
    }
}

fn check_status(response: Response, action: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(ReleaseError::publish(format!(
        "{} returned HTTP {}: {}",
        action,
        status.as_u16(),
        body.trim()
    )))
}
