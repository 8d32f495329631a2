use std::sync::Arc;

use futures::future::try_join_all;
use time::OffsetDateTime;

use crate::{
    application::templates::{TemplateCache, TemplateError},
    domain::media::{MediaItem, MediaType},
    presentation::html::{badge, escape_html, featured_badge, youtube_embed_url},
};

use super::vars::{TemplateVars, apply_vars};

const DESCRIPTION_PREVIEW_CHARS: usize = 120;
const EMPTY_GRID: &str = r#"<p class="text-slate-600">Geen items nie.</p>"#;
const HOME_TITLE: &str = "Kinderklub";
const NOT_FOUND_TITLE: &str = "404";

/// Frame around a rendered page body.
#[derive(Debug, Clone, Copy)]
pub struct LayoutPage<'a> {
    /// Plain text; escaped on render.
    pub title: &'a str,
    /// Rendered markup, inserted as is.
    pub body: &'a str,
    pub auth_link: &'a str,
}

/// How the media list arranges its cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListLayout {
    Grid,
    List,
}

impl ListLayout {
    pub fn for_type(media_type: MediaType) -> Self {
        match media_type {
            MediaType::Video => ListLayout::Grid,
            MediaType::Audio => ListLayout::List,
        }
    }

    fn container_class(self) -> &'static str {
        match self {
            ListLayout::Grid => "grid gap-4 sm:grid-cols-2 lg:grid-cols-4",
            ListLayout::List => "flex flex-col gap-4",
        }
    }
}

/// One page of a video or audio listing.
#[derive(Debug, Clone, Copy)]
pub struct ListPage<'a> {
    pub title: &'a str,
    pub media_type: MediaType,
    pub items: &'a [MediaItem],
    pub category: Option<&'a str>,
    /// Rendered pagination markup.
    pub pagination: &'a str,
    pub auth_link: &'a str,
}

/// Pages whose body is a template used verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticPage {
    Contact,
    Shop,
    Terms,
}

impl StaticPage {
    pub fn template_name(self) -> &'static str {
        match self {
            StaticPage::Contact => "contact",
            StaticPage::Shop => "shop",
            StaticPage::Terms => "terms",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            StaticPage::Contact => "Kontak",
            StaticPage::Shop => "Winkel",
            StaticPage::Terms => "Terme",
        }
    }
}

/// Renders site pages and fragments from cached templates.
#[derive(Clone)]
pub struct SiteRenderer {
    templates: Arc<TemplateCache>,
}

impl SiteRenderer {
    pub fn new(templates: Arc<TemplateCache>) -> Self {
        Self { templates }
    }

    /// Load template `name` and substitute `vars` into it.
    pub async fn render(&self, name: &str, vars: &TemplateVars) -> Result<String, TemplateError> {
        let template = self.templates.load(name).await?;
        Ok(apply_vars(&template, vars))
    }

    pub async fn card(&self, item: &MediaItem) -> Result<String, TemplateError> {
        let template = match item.media_type {
            MediaType::Video => "card",
            MediaType::Audio => "card_audio",
        };
        let description: String = escape_html(item.description.as_deref().unwrap_or_default())
            .chars()
            .take(DESCRIPTION_PREVIEW_CHARS)
            .collect();
        let featured = if item.featured { featured_badge() } else { "" };

        let vars = TemplateVars::new()
            .with("thumb", escape_html(item.thumbnail()))
            .with("title", escape_html(&item.title))
            .with("description", description)
            .with("link", item.link())
            .with("featured_badge", featured)
            .with("category_badge", category_badge(item.category.as_deref()));
        self.render(template, &vars).await
    }

    /// Cards for `items` in order, or a placeholder when there are none.
    pub async fn grid(&self, items: &[MediaItem]) -> Result<String, TemplateError> {
        let cards = try_join_all(items.iter().map(|item| self.card(item))).await?;
        if cards.is_empty() {
            return Ok(EMPTY_GRID.to_string());
        }
        Ok(cards.concat())
    }

    pub async fn layout(&self, page: LayoutPage<'_>) -> Result<String, TemplateError> {
        let vars = TemplateVars::new()
            .with("title", escape_html(page.title))
            .with("body", page.body)
            .with("year", OffsetDateTime::now_utc().year().to_string())
            .with("auth_link", page.auth_link);
        self.render("layout", &vars).await
    }

    pub async fn home(&self, auth_link: &str) -> Result<String, TemplateError> {
        let body = self.render("home", &TemplateVars::new()).await?;
        self.layout(LayoutPage {
            title: HOME_TITLE,
            body: &body,
            auth_link,
        })
        .await
    }

    /// Fragment with the newest videos and audio, loaded into the home page.
    pub async fn home_latest(
        &self,
        videos: &[MediaItem],
        audio: &[MediaItem],
    ) -> Result<String, TemplateError> {
        let (latest_videos, latest_audio) =
            futures::try_join!(self.grid(videos), self.grid(audio))?;
        let vars = TemplateVars::new()
            .with("latest_videos", latest_videos)
            .with("latest_audio", latest_audio);
        self.render("home_latest", &vars).await
    }

    pub async fn list_page(&self, page: ListPage<'_>) -> Result<String, TemplateError> {
        let template = match page.media_type {
            MediaType::Video => "list",
            MediaType::Audio => "list_audio",
        };
        let media_list = self
            .media_list_content(
                page.items,
                Some(page.pagination),
                ListLayout::for_type(page.media_type),
            )
            .await?;
        let vars = TemplateVars::new()
            .with("title", escape_html(page.title))
            .with("type_path", page.media_type.type_path())
            .with("category_options", category_options(page.category))
            .with("media_list", media_list);
        let body = self.render(template, &vars).await?;
        self.layout(LayoutPage {
            title: page.title,
            body: &body,
            auth_link: page.auth_link,
        })
        .await
    }

    /// The `#media-list` block: pagination on top of the card container.
    ///
    /// This is also the htmx swap target, so partial requests get exactly
    /// this markup.
    pub async fn media_list_content(
        &self,
        items: &[MediaItem],
        pagination: Option<&str>,
        layout: ListLayout,
    ) -> Result<String, TemplateError> {
        let grid = self.grid(items).await?;
        Ok(format!(
            r#"<div id="media-list">{top}<div id="media-grid" class="{class}">{grid}</div></div>"#,
            top = pagination.unwrap_or_default(),
            class = layout.container_class(),
        ))
    }

    pub async fn detail_page(
        &self,
        item: &MediaItem,
        auth_link: &str,
    ) -> Result<String, TemplateError> {
        let template = match item.media_type {
            MediaType::Video => "detail",
            MediaType::Audio => "detail_audio",
        };
        let vars = TemplateVars::new()
            .with("title", escape_html(&item.title))
            .with(
                "description",
                escape_html(item.description.as_deref().unwrap_or_default()),
            )
            .with("embed_url", escape_html(&youtube_embed_url(&item.stream_url)))
            .with("audio_url", escape_html(&item.stream_url));
        let body = self.render(template, &vars).await?;
        self.layout(LayoutPage {
            title: &item.title,
            body: &body,
            auth_link,
        })
        .await
    }

    pub async fn static_page(
        &self,
        page: StaticPage,
        auth_link: &str,
    ) -> Result<String, TemplateError> {
        let body = self.templates.load(page.template_name()).await?;
        self.layout(LayoutPage {
            title: page.title(),
            body: &body,
            auth_link,
        })
        .await
    }

    pub async fn not_found(&self, auth_link: &str) -> Result<String, TemplateError> {
        let body = self.templates.load("not_found").await?;
        self.layout(LayoutPage {
            title: NOT_FOUND_TITLE,
            body: &body,
            auth_link,
        })
        .await
    }
}

/// Filterable categories: query value and label.
const CATEGORIES: [(&str, &str); 2] = [("story", "Stories"), ("film", "Flieks")];

fn category_badge(category: Option<&str>) -> String {
    CATEGORIES
        .iter()
        .find(|(value, _)| Some(*value) == category)
        .map(|(_, label)| badge(label))
        .unwrap_or_default()
}

fn category_options(selected: Option<&str>) -> String {
    let mut options = String::from(r#"<option value="">Alle</option>"#);
    for (value, label) in CATEGORIES {
        let mark = if selected == Some(value) { " selected" } else { "" };
        options.push_str(&format!(r#"<option value="{value}"{mark}>{label}</option>"#));
    }
    options
}
