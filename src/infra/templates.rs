//! Template source adapters.

use std::{io, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use include_dir::{Dir, include_dir};
use reqwest::{Client, Url};
use tracing::debug;

use crate::application::templates::{TemplateError, TemplateSource, template_file_name};
use crate::config::TemplateSourceSettings;

use super::error::InfraError;

static BUNDLED_TEMPLATES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// Build the configured template source.
pub fn from_settings(
    settings: &TemplateSourceSettings,
) -> Result<Arc<dyn TemplateSource>, InfraError> {
    let source: Arc<dyn TemplateSource> = match settings {
        TemplateSourceSettings::Embedded => Arc::new(EmbeddedTemplates),
        TemplateSourceSettings::Directory(root) => Arc::new(DirectoryTemplates::new(root.clone())),
        TemplateSourceSettings::Http(base) => Arc::new(HttpTemplates::new(base.clone())?),
    };
    Ok(source)
}

/// Templates compiled into the binary from `templates/`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedTemplates;

#[async_trait]
impl TemplateSource for EmbeddedTemplates {
    async fn fetch(&self, name: &str) -> Result<String, TemplateError> {
        let file_name = template_file_name(name)?;
        BUNDLED_TEMPLATES
            .get_file(&file_name)
            .and_then(|file| file.contents_utf8())
            .map(str::to_string)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))
    }
}

/// Templates read from `<root>/<name>.html` on every fetch.
#[derive(Debug, Clone)]
pub struct DirectoryTemplates {
    root: PathBuf,
}

impl DirectoryTemplates {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl TemplateSource for DirectoryTemplates {
    async fn fetch(&self, name: &str) -> Result<String, TemplateError> {
        let path = self.root.join(template_file_name(name)?);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(TemplateError::NotFound(name.to_string()))
            }
            Err(source) => Err(TemplateError::Io {
                name: name.to_string(),
                source,
            }),
        }
    }
}

/// Templates served over HTTP at `<origin>/templates/<name>.html`.
#[derive(Debug, Clone)]
pub struct HttpTemplates {
    client: Client,
    base: Url,
}

impl HttpTemplates {
    pub fn new(base: Url) -> Result<Self, InfraError> {
        let client = Client::builder()
            .user_agent(concat!("mediashelf/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| {
                InfraError::configuration(format!("failed to build template HTTP client: {err}"))
            })?;
        Ok(Self { client, base })
    }

    fn url_for(&self, file_name: &str) -> Result<Url, url::ParseError> {
        self.base.join(&format!("/templates/{file_name}"))
    }
}

#[async_trait]
impl TemplateSource for HttpTemplates {
    async fn fetch(&self, name: &str) -> Result<String, TemplateError> {
        let transport = |message: String| TemplateError::Transport {
            name: name.to_string(),
            message,
        };

        let url = self
            .url_for(&template_file_name(name)?)
            .map_err(|err| transport(err.to_string()))?;
        debug!(template = name, url = %url, "fetching remote template");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TemplateError::Fetch {
                name: name.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|err| transport(err.to_string()))
    }
}
