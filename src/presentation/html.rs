//! Escaping and small markup helpers.

use url::Url;

/// Replace `& < > ' "` with their HTML entities.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\'' => escaped.push_str("&#39;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Embed URL for a YouTube watch or short link.
///
/// `youtu.be/<id>` and `...?v=<id>` become `https://www.youtube.com/embed/<id>`;
/// anything else, including unparsable input, is returned unchanged.
pub fn youtube_embed_url(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    let Ok(parsed) = Url::parse(url) else {
        return url.to_string();
    };

    if parsed
        .host_str()
        .is_some_and(|host| host.contains("youtu.be"))
    {
        let id = parsed.path().replacen('/', "", 1);
        return format!("https://www.youtube.com/embed/{id}");
    }

    match parsed
        .query_pairs()
        .find(|(name, _)| name == "v")
        .map(|(_, value)| value.into_owned())
    {
        Some(id) if !id.is_empty() => format!("https://www.youtube.com/embed/{id}"),
        _ => url.to_string(),
    }
}

/// Neutral pill label.
pub fn badge(text: &str) -> String {
    format!(
        r#"<span class="inline-flex items-center rounded-full bg-slate-200 text-slate-700 text-xs font-semibold px-2 py-1">{}</span>"#,
        escape_html(text)
    )
}

/// Highlight pill for featured entries.
pub fn featured_badge() -> &'static str {
    r#"<span class="inline-flex items-center rounded-full bg-amber-400 text-slate-900 text-xs font-semibold px-2 py-1">Nuut</span>"#
}

/// Header slot: a signed-in marker, or a link to the sign-in page.
pub fn auth_link(signed_in: bool, sign_in_url: &str) -> String {
    if signed_in {
        return r#"<span class="text-xs bg-white/10 rounded-full px-3 py-1">Ingeteken</span>"#
            .to_string();
    }
    format!(
        r#"<a class="hover:underline" href="{}">Teken in</a>"#,
        escape_html(sign_in_url)
    )
}
