//! Server-side HTML rendering.
//!
//! Plain string building; every catalog- or user-provided value goes through
//! [`escape`] before it reaches the output.

use marquee_common::images::image_url;
use marquee_common::text::{strip_html, truncate_chars};
use marquee_common::{Movie, MovieDetail, NamedRef};
use marquee_player::{Playlist, EPISODES_PER_CHUNK};
use std::fmt::Write;

use crate::catalog::{ListSource, CATEGORIES, GENRES};
use crate::listing::FIRST_INCREMENTAL_PAGE;

const NOT_UPDATED: &str = "Đang cập nhật";

/// Browser player script, served from the static directory.
pub const PLAYER_SCRIPT: &str = "/player.js";

/// Escape text for use in HTML content and double- or single-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Serialize a value for an inline `<script type="application/json">` block.
pub fn json_script<T: serde::Serialize>(value: &T) -> serde_json::Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// Shared page chrome.
pub struct Page<'a> {
    pub site_name: &'a str,
    pub image_base: &'a str,
}

impl Page<'_> {
    pub fn layout(&self, title: &str, body: &str) -> String {
        let mut nav = String::new();
        for (slug, name) in CATEGORIES {
            let _ = write!(
                nav,
                r#"<a href="/danh-sach/{slug}">{}</a>"#,
                escape(name)
            );
        }

        format!(
            r#"<!DOCTYPE html>
<html lang="vi">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} - {site}</title>
</head>
<body>
<header class="site-header">
<a class="logo" href="/">{site}</a>
<nav><a href="/">Trang Chủ</a>{nav}</nav>
<form class="header-search" action="/tim-kiem" method="GET" data-suggest="/api/suggest">
<input type="text" name="keyword" placeholder="Tên phim, diễn viên..." autocomplete="off">
</form>
</header>
<main>
{body}
</main>
<footer class="site-footer">{site}</footer>
</body>
</html>
"#,
            title = escape(title),
            site = escape(self.site_name),
        )
    }

    pub fn movie_card(&self, movie: &Movie) -> String {
        let slug = urlencoding::encode(&movie.slug);
        let thumb = image_url(self.image_base, &movie.thumb_url);
        let mut card = format!(
            r#"<div class="movie-card"><a href="/phim/{slug}"><img src="{}" alt="{}" loading="lazy"></a><a class="play" href="/xem-phim/{slug}">Xem</a><h3>{}</h3>"#,
            escape(&thumb),
            escape(&movie.name),
            escape(&movie.name),
        );
        if let Some(year) = movie.year {
            let _ = write!(card, r#"<span class="year">{year}</span>"#);
        }
        card.push_str("</div>");
        card
    }

    pub fn movie_grid(&self, movies: &[Movie]) -> String {
        let mut grid = String::from(r#"<div class="movie-grid">"#);
        for movie in movies {
            grid.push_str(&self.movie_card(movie));
        }
        grid.push_str("</div>");
        grid
    }

    /// Horizontal row on the home page; empty rows are omitted.
    pub fn movie_row(&self, title: &str, href: &str, movies: &[Movie]) -> String {
        if movies.is_empty() {
            return String::new();
        }
        let mut row = format!(
            r#"<section class="movie-row"><h2><a href="{}">{}</a></h2><div class="row-items">"#,
            escape(href),
            escape(title)
        );
        for movie in movies {
            row.push_str(&self.movie_card(movie));
        }
        row.push_str("</div></section>");
        row
    }

    pub fn hero(&self, movie: &Movie) -> String {
        let slug = urlencoding::encode(&movie.slug);
        let backdrop = if movie.thumb_url.is_empty() {
            &movie.poster_url
        } else {
            &movie.thumb_url
        };
        format!(
            r#"<section class="hero" style="background-image:url('{}')"><h1>{}</h1><p>{}</p><a class="btn-play" href="/xem-phim/{slug}">Phát</a><a class="btn-info" href="/phim/{slug}">Thông tin khác</a></section>"#,
            escape(&image_url(self.image_base, backdrop)),
            escape(&movie.name),
            escape(&movie.original_name),
        )
    }

    pub fn home(&self, hero: Option<&Movie>, rows: &[(&str, &str, &[Movie])]) -> String {
        let mut body = String::new();
        if let Some(movie) = hero {
            body.push_str(&self.hero(movie));
        }
        for (title, href, movies) in rows {
            body.push_str(&self.movie_row(title, href, movies));
        }
        self.layout("Trang Chủ", &body)
    }

    /// Category or genre listing with its first page and a load-more sentinel.
    pub fn listing(&self, title: &str, source: &ListSource, movies: &[Movie], sidebar: bool) -> String {
        let mut body = String::new();
        if sidebar {
            body.push_str(&genre_sidebar(source.slug()));
        }
        let _ = write!(body, r#"<section class="listing"><h1>{}</h1>"#, escape(title));

        if movies.is_empty() {
            body.push_str(
                r#"<div class="empty-state"><p>Đang cập nhật hoặc không tìm thấy phim nào trong mục này.</p><p>Vui lòng thử lại sau.</p></div>"#,
            );
        } else {
            body.push_str(&self.movie_grid(movies));
            body.push_str(&load_more_sentinel(source));
        }
        body.push_str("</section>");
        self.layout(title, &body)
    }

    pub fn search(&self, keyword: Option<&str>, movies: &[Movie]) -> String {
        let mut body = format!(
            r#"<section class="search"><h1>Tìm Kiếm Phim</h1><form action="/tim-kiem" method="GET"><input type="text" name="keyword" value="{}" placeholder="Nhập tên phim, đạo diễn, diễn viên..." required><button type="submit">Tìm</button></form>"#,
            escape(keyword.unwrap_or_default())
        );

        if let Some(keyword) = keyword {
            let _ = write!(
                body,
                r#"<h2>Kết quả tìm kiếm cho: <strong>&quot;{}&quot;</strong></h2>"#,
                escape(keyword)
            );
            if movies.is_empty() {
                body.push_str(
                    r#"<div class="empty-state no-results"><p>Rất tiếc, không tìm thấy phim nào phù hợp.</p><p>Vui lòng thử lại với từ khóa khác.</p></div>"#,
                );
            } else {
                body.push_str(&self.movie_grid(movies));
                body.push_str(&load_more_sentinel(&ListSource::Search(keyword.to_string())));
            }
        }
        body.push_str("</section>");

        let title = match keyword {
            Some(k) => format!("Tìm kiếm: {k}"),
            None => "Tìm Kiếm".to_string(),
        };
        self.layout(&title, &body)
    }

    pub fn detail(&self, movie: &MovieDetail, has_episodes: bool) -> String {
        let summary = &movie.summary;
        let slug = urlencoding::encode(&summary.slug);
        let backdrop = if summary.thumb_url.is_empty() {
            &summary.poster_url
        } else {
            &summary.thumb_url
        };
        let content = strip_html(&movie.content);
        let content = if content.is_empty() {
            "Không có tóm tắt".to_string()
        } else {
            content
        };

        let mut body = format!(
            r#"<article class="movie-detail" style="background-image:url('{}')"><img class="poster" src="{}" alt="{}"><div class="info"><h1>{}</h1>"#,
            escape(&image_url(self.image_base, backdrop)),
            escape(&image_url(self.image_base, &summary.poster_url)),
            escape(&summary.name),
            escape(&summary.name),
        );

        let year = summary.year.map(|y| format!(" ({y})")).unwrap_or_default();
        let _ = write!(
            body,
            r#"<h2>{}{}</h2><div class="badges">"#,
            escape(&summary.original_name),
            year
        );
        for badge in [&movie.quality, &movie.lang, &movie.time, &movie.episode_current] {
            if !badge.is_empty() {
                let _ = write!(body, r#"<span class="badge">{}</span>"#, escape(badge));
            }
        }
        let _ = write!(body, r#"</div><p class="content">{}</p>"#, escape(&content));

        if has_episodes {
            let _ = write!(body, r#"<a class="btn-play" href="/xem-phim/{slug}">Xem Phim</a>"#);
        } else {
            body.push_str(r#"<p class="no-episodes">Phim đang được cập nhật.</p>"#);
        }

        body.push_str(r#"<dl class="credits">"#);
        push_credit(&mut body, "Diễn viên", &join_or_pending(&movie.actor));
        push_credit(&mut body, "Đạo diễn", &join_or_pending(&movie.director));
        push_credit(&mut body, "Thể loại", &genre_links(&movie.category));
        push_credit(&mut body, "Quốc gia", &join_or_pending(&names(&movie.country)));
        body.push_str("</dl></div></article>");

        self.layout(&summary.name, &body)
    }

    /// "Not found" page for an unknown slug. Has no play affordance.
    pub fn not_found(&self) -> String {
        self.layout(
            "Không tìm thấy phim",
            r#"<section class="not-found"><h1>Không tìm thấy phim</h1><p>Phim bạn tìm không tồn tại hoặc đã bị xóa.</p><a href="/">Về trang chủ</a></section>"#,
        )
    }

    pub fn watch(&self, movie: &MovieDetail, playlist: &Playlist, plan_json: &str) -> String {
        let summary = &movie.summary;
        let slug = urlencoding::encode(&summary.slug);
        let mut body = String::from(r#"<section class="watch">"#);

        match playlist.current() {
            Some(episode) => {
                let _ = write!(
                    body,
                    r#"<div class="player" data-plan="watch-plan"><video id="player" playsinline controls preload="metadata" src="{}"></video></div>"#,
                    escape(&episode.link_m3u8)
                );
                let _ = write!(body, r#"<script src="{PLAYER_SCRIPT}" defer></script>"#);
            }
            None => body.push_str(r#"<div class="player-placeholder">Không có dữ liệu phim.</div>"#),
        }

        let _ = write!(
            body,
            r#"<script type="application/json" id="watch-plan">{plan_json}</script><h1>{}</h1>"#,
            escape(&summary.name)
        );
        if let Some(episode) = playlist.current() {
            let _ = write!(body, r#"<h2 class="episode-name">{}</h2>"#, escape(&episode.name));
        }

        body.push_str(r#"<nav class="episode-nav">"#);
        if let Some(prev) = playlist.previous() {
            let _ = write!(body, r#"<a class="prev" href="/xem-phim/{slug}?tap={prev}">Tập trước</a>"#);
        }
        if let Some(next) = playlist.next() {
            let _ = write!(body, r#"<a class="next" href="/xem-phim/{slug}?tap={next}">Tập tiếp</a>"#);
        }
        body.push_str("</nav>");

        if playlist.len() > 1 {
            body.push_str(&episode_list(&slug, playlist));
        }

        let _ = write!(
            body,
            r#"<p class="content">{}</p></section>"#,
            escape(&truncate_chars(&strip_html(&movie.content), 400))
        );

        self.layout(&format!("Xem phim {}", summary.name), &body)
    }
}

fn episode_list(slug: &str, playlist: &Playlist) -> String {
    let mut out = String::from(r#"<section class="episodes"><h3>Danh sách tập</h3>"#);

    let chunks = playlist.chunks(EPISODES_PER_CHUNK);
    if chunks.len() > 1 {
        out.push_str(r#"<div class="episode-tabs">"#);
        for chunk in &chunks {
            let class = if chunk.active { "tab active" } else { "tab" };
            let _ = write!(
                out,
                r#"<a class="{class}" href="/xem-phim/{slug}?tap={}">{} - {}</a>"#,
                chunk.first, chunk.first, chunk.last
            );
        }
        out.push_str("</div>");
    }

    out.push_str(r#"<div class="episode-grid">"#);
    for (index, episode) in playlist.active_chunk(EPISODES_PER_CHUNK) {
        let class = if index == playlist.index() {
            "episode active"
        } else {
            "episode"
        };
        let _ = write!(
            out,
            r#"<a class="{class}" href="/xem-phim/{slug}?tap={}">{}</a>"#,
            index + 1,
            escape(&episode.name)
        );
    }
    out.push_str("</div></section>");
    out
}

fn load_more_sentinel(source: &ListSource) -> String {
    format!(
        r#"<div class="load-more" data-endpoint="/api/more" data-source="{}" data-slug="{}" data-page="{FIRST_INCREMENTAL_PAGE}"></div>"#,
        source.kind(),
        escape(source.slug().unwrap_or_default()),
    )
}

fn genre_sidebar(active: Option<&str>) -> String {
    let mut out = String::from(r#"<aside class="sidebar"><h2>Khám Phá</h2><h3>Danh Mục</h3><ul>"#);
    for (slug, name) in CATEGORIES {
        let _ = write!(out, r#"<li><a href="/danh-sach/{slug}">{}</a></li>"#, escape(name));
    }
    out.push_str("</ul><h3>Thể Loại</h3><ul>");
    for (slug, name) in GENRES {
        let class = if active == Some(*slug) { r#" class="active""# } else { "" };
        let _ = write!(
            out,
            r#"<li><a{class} href="/the-loai/{slug}">{}</a></li>"#,
            escape(name)
        );
    }
    out.push_str("</ul></aside>");
    out
}

fn push_credit(out: &mut String, label: &str, value_html: &str) {
    let _ = write!(out, "<dt>{label}</dt><dd>{value_html}</dd>");
}

fn names(refs: &[NamedRef]) -> Vec<String> {
    refs.iter().map(|r| r.name.clone()).collect()
}

fn join_or_pending(values: &[String]) -> String {
    let joined = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(escape)
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        NOT_UPDATED.to_string()
    } else {
        joined
    }
}

fn genre_links(categories: &[NamedRef]) -> String {
    if categories.is_empty() {
        return NOT_UPDATED.to_string();
    }
    categories
        .iter()
        .map(|c| {
            format!(
                r#"<a href="/the-loai/{}">{}</a>"#,
                urlencoding::encode(&c.slug),
                escape(&c.name)
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Page<'static> {
        Page {
            site_name: "Marquee",
            image_base: "https://img.example",
        }
    }

    fn movie(name: &str, slug: &str) -> Movie {
        Movie {
            id: slug.to_string(),
            name: name.to_string(),
            slug: slug.to_string(),
            original_name: String::new(),
            thumb_url: "upload/a.jpg".to_string(),
            poster_url: String::new(),
            year: Some(2023),
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<script>alert("x" & 'y')</script>"#),
            "&lt;script&gt;alert(&quot;x&quot; &amp; &#39;y&#39;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_json_script_cannot_close_tag() {
        let json = json_script(&serde_json::json!({"name": "</script><b>"})).unwrap();
        assert!(!json.contains("</script>"));
    }

    #[test]
    fn test_card_escapes_and_resolves_image() {
        let html = page().movie_card(&movie("<b>Phim</b>", "ten-phim"));
        assert!(html.contains("&lt;b&gt;Phim&lt;/b&gt;"));
        assert!(!html.contains("<b>Phim"));
        assert!(html.contains("https://img.example/upload/a.jpg"));
        assert!(html.contains(r#"href="/phim/ten-phim""#));
    }

    #[test]
    fn test_empty_listing_has_no_sentinel() {
        let html = page().listing(
            "Thể loại: Kinh Di",
            &ListSource::Genre("kinh-di".to_string()),
            &[],
            true,
        );
        assert!(html.contains("empty-state"));
        assert!(!html.contains("load-more"));
        assert!(html.contains(r#"<a class="active" href="/the-loai/kinh-di">"#));
    }

    #[test]
    fn test_listing_sentinel_starts_at_second_page() {
        let html = page().listing(
            "phim bo",
            &ListSource::Category("phim-bo".to_string()),
            &[movie("A", "a")],
            false,
        );
        assert!(html.contains(r#"data-source="category" data-slug="phim-bo" data-page="2""#));
    }

    #[test]
    fn test_search_without_keyword_shows_only_form() {
        let html = page().search(None, &[]);
        assert!(html.contains(r#"name="keyword""#));
        assert!(!html.contains("no-results"));
    }

    #[test]
    fn test_watch_video_has_playable_source() {
        let detail: MovieDetail = serde_json::from_value(serde_json::json!({
            "_id": "1",
            "name": "Ten Phim",
            "slug": "ten-phim"
        }))
        .unwrap();
        let episodes = vec![marquee_common::Episode {
            name: "Tập 1".to_string(),
            slug: "tap-1".to_string(),
            filename: String::new(),
            link_embed: String::new(),
            link_m3u8: "https://cdn/a.m3u8?t=1&x=2".to_string(),
        }];
        let playlist = Playlist::select(episodes, Some(1));

        let html = page().watch(&detail, &playlist, "{}");
        assert!(html.contains(
            r#"<video id="player" playsinline controls preload="metadata" src="https://cdn/a.m3u8?t=1&amp;x=2">"#
        ));
        assert!(html.contains(r#"<script src="/player.js" defer></script>"#));
    }

    #[test]
    fn test_watch_without_episodes_has_no_player() {
        let detail: MovieDetail = serde_json::from_value(serde_json::json!({
            "_id": "1",
            "name": "Ten Phim",
            "slug": "ten-phim"
        }))
        .unwrap();
        let html = page().watch(&detail, &Playlist::select(Vec::new(), None), "{}");
        assert!(html.contains("player-placeholder"));
        assert!(!html.contains(PLAYER_SCRIPT));
    }

    #[test]
    fn test_home_skips_empty_rows() {
        let movies = vec![movie("A", "a")];
        let empty: Vec<Movie> = Vec::new();
        let html = page().home(
            None,
            &[
                ("Row A", "/danh-sach/a", movies.as_slice()),
                ("Row B", "/danh-sach/b", empty.as_slice()),
            ],
        );
        assert!(html.contains("Row A"));
        assert!(!html.contains("Row B"));
    }
}
