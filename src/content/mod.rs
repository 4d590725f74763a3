//! Rendering of class content and the public landing page.
//!
//! Video classes become an embedded player, text classes become sanitized
//! HTML. Fragments are produced with askama so every interpolated value is
//! escaped unless it went through [`sanitize_html`] first.

mod sanitize;

pub use sanitize::sanitize_html;

use askama::Template;

use crate::domain::{Class, ClassContent, Course};

const VIDEO_UNAVAILABLE: &str = r#"<p class="placeholder">Video not available</p>"#;
const CONTENT_UNAVAILABLE: &str = "<p>Content not available</p>";

/// Path prefix under which uploaded videos are served
pub const MEDIA_PREFIX: &str = "/media";

#[derive(Template)]
#[template(
    source = r#"<iframe src="{{ src }}" title="{{ title }}" frameborder="0" allow="accelerometer; autoplay; encrypted-media; picture-in-picture" allowfullscreen></iframe>"#,
    ext = "html"
)]
struct EmbedTemplate<'a> {
    src: &'a str,
    title: &'a str,
}

#[derive(Template)]
#[template(
    source = r#"<video controls preload="metadata" src="{{ src }}">{{ title }}</video>"#,
    ext = "html"
)]
struct NativeVideoTemplate<'a> {
    src: &'a str,
    title: &'a str,
}

#[derive(Template)]
#[template(source = r#"<article class="lesson-text">{{ html|safe }}</article>"#, ext = "html")]
struct TextTemplate<'a> {
    html: &'a str,
}

#[derive(Template)]
#[template(
    source = r#"{% if let Some(name) = user_name %}<p class="greeting">Welcome back, {{ name }}</p>
{% endif -%}
<section class="courses">
{%- for course in courses %}
<article class="course" data-icon="{{ course.icon }}"><h3>{{ course.name }}</h3><p>{{ course.description }}</p></article>
{%- endfor %}
</section>"#,
    ext = "html"
)]
struct LandingTemplate<'a> {
    courses: &'a [Course],
    user_name: Option<&'a str>,
}

/// How a video URL is played back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Player {
    /// Third-party iframe player (YouTube, Vimeo)
    Embed(String),
    /// Browser `<video>` element
    Native(String),
}

/// Resolve a video URL into a player source. Non-http(s) URLs are refused.
pub fn player_for_url(url: &str) -> Option<Player> {
    let url = url.trim();
    let lower = url.to_ascii_lowercase();
    if !(lower.starts_with("https://") || lower.starts_with("http://")) {
        return None;
    }

    if let Some(pos) = lower.find("youtu.be/") {
        let id = &url[pos + "youtu.be/".len()..];
        let id = id.split(['?', '&', '#']).next().unwrap_or_default();
        if id.is_empty() {
            return None;
        }
        return Some(Player::Embed(format!("https://www.youtube.com/embed/{}", id)));
    }
    if lower.contains("youtube.com") {
        let embed = url.replace("watch?v=", "embed/");
        let embed = embed.split('&').next().unwrap_or_default().to_string();
        return Some(Player::Embed(embed));
    }
    if lower.contains("vimeo.com") && !lower.contains("player.vimeo.com") {
        return Some(Player::Embed(url.replacen("vimeo.com/", "player.vimeo.com/video/", 1)));
    }
    if lower.contains("player.vimeo.com") {
        return Some(Player::Embed(url.to_string()));
    }
    Some(Player::Native(url.to_string()))
}

/// Render the body of a class as an HTML fragment.
///
/// An uploaded file takes precedence over a URL, matching the editor where
/// choosing a file replaces the URL field.
pub fn render_class(class: &Class) -> Result<String, askama::Error> {
    match &class.content {
        ClassContent::Video {
            file: Some(file), ..
        } => {
            let src = format!("{}/{}", MEDIA_PREFIX, file.id);
            NativeVideoTemplate {
                src: &src,
                title: &class.title,
            }
            .render()
        }
        ClassContent::Video { url, file: None } => {
            match url.as_deref().and_then(player_for_url) {
                Some(Player::Embed(src)) => EmbedTemplate {
                    src: &src,
                    title: &class.title,
                }
                .render(),
                Some(Player::Native(src)) => NativeVideoTemplate {
                    src: &src,
                    title: &class.title,
                }
                .render(),
                None => Ok(VIDEO_UNAVAILABLE.to_string()),
            }
        }
        ClassContent::Text { html } => {
            let clean = sanitize_html(html);
            if clean.trim().is_empty() {
                return Ok(CONTENT_UNAVAILABLE.to_string());
            }
            TextTemplate { html: &clean }.render()
        }
    }
}

/// Public course catalog shown on the landing page
pub fn render_landing(courses: &[Course], user_name: Option<&str>) -> Result<String, askama::Error> {
    LandingTemplate { courses, user_name }.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CourseIcon, VideoFile};
    use chrono::Utc;

    fn class_with(content: ClassContent) -> Class {
        Class {
            id: "c1".into(),
            title: "Intro <1>".into(),
            description: String::new(),
            course_id: "1".into(),
            content,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_youtube_watch_url_becomes_embed() {
        assert_eq!(
            player_for_url("https://www.youtube.com/watch?v=abc123&t=10"),
            Some(Player::Embed("https://www.youtube.com/embed/abc123".into()))
        );
        assert_eq!(
            player_for_url("https://youtu.be/abc123?si=x"),
            Some(Player::Embed("https://www.youtube.com/embed/abc123".into()))
        );
    }

    #[test]
    fn test_vimeo_url_becomes_player() {
        assert_eq!(
            player_for_url("https://vimeo.com/76979871"),
            Some(Player::Embed("https://player.vimeo.com/video/76979871".into()))
        );
        assert_eq!(
            player_for_url("https://player.vimeo.com/video/1"),
            Some(Player::Embed("https://player.vimeo.com/video/1".into()))
        );
    }

    #[test]
    fn test_other_urls_play_natively_and_bad_schemes_refused() {
        assert_eq!(
            player_for_url("https://cdn.example.com/a.mp4"),
            Some(Player::Native("https://cdn.example.com/a.mp4".into()))
        );
        assert_eq!(player_for_url("javascript:alert(1)"), None);
        assert_eq!(player_for_url("blob:https://x/y"), None);
    }

    #[test]
    fn test_render_video_embed_escapes_title() {
        let html = render_class(&class_with(ClassContent::video_url(
            "https://www.youtube.com/watch?v=abc",
        )))
        .unwrap();
        assert!(html.starts_with("<iframe"));
        assert!(html.contains(r#"src="https://www.youtube.com/embed/abc""#));
        assert!(html.contains("Intro &#60;1&#62;") || html.contains("Intro &lt;1&gt;"));
    }

    #[test]
    fn test_uploaded_file_wins_over_url() {
        let html = render_class(&class_with(ClassContent::Video {
            url: Some("https://vimeo.com/1".into()),
            file: Some(VideoFile {
                id: "f9".into(),
                file_name: "intro.mp4".into(),
                content_type: "video/mp4".into(),
                size: 10,
            }),
        }))
        .unwrap();
        assert!(html.starts_with("<video"));
        assert!(html.contains(r#"src="/media/f9""#));
    }

    #[test]
    fn test_video_without_source_shows_placeholder() {
        let html = render_class(&class_with(ClassContent::Video {
            url: None,
            file: None,
        }))
        .unwrap();
        assert_eq!(html, VIDEO_UNAVAILABLE);
    }

    #[test]
    fn test_text_is_sanitized() {
        let html = render_class(&class_with(ClassContent::text(
            "<p>Hi</p><script>alert(1)</script>",
        )))
        .unwrap();
        assert_eq!(html, r#"<article class="lesson-text"><p>Hi</p></article>"#);
    }

    #[test]
    fn test_empty_text_shows_placeholder() {
        let html = render_class(&class_with(ClassContent::text("<script>x</script>"))).unwrap();
        assert_eq!(html, CONTENT_UNAVAILABLE);
    }

    #[test]
    fn test_landing_lists_courses() {
        let courses = vec![Course {
            id: "1".into(),
            name: "Web & Co".into(),
            description: "Learn".into(),
            icon: CourseIcon::Code,
        }];
        let html = render_landing(&courses, None).unwrap();
        assert!(!html.contains("greeting"));
        assert!(html.contains(r#"data-icon="Code""#));
        assert!(html.contains("Web &#38; Co") || html.contains("Web &amp; Co"));

        let html = render_landing(&courses, Some("Ana")).unwrap();
        assert!(html.contains("Welcome back, Ana"));
    }
}
