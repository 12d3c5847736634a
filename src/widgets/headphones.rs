//! Wanted albums from the music downloader.

use serde::Deserialize;

use super::{present, CarouselItem, RenderContext, WidgetView, MAX_CAROUSEL_ITEMS};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WantedAlbum {
    pub album_title: Option<String>,
    pub artist_name: Option<String>,
    pub release_date: Option<String>,
    #[serde(rename = "ArtworkURL")]
    pub artwork_url: Option<String>,
}

json_loader!(WantedAlbums, Vec<WantedAlbum>, render_wanted);

/// ` (2014) ` for a usable release date, two spaces otherwise.
fn release_year(date: Option<&str>) -> String {
    match present(date) {
        Some(date) => format!(" ({}) ", date.chars().take(4).collect::<String>()),
        None => "  ".to_string(),
    }
}

pub fn render_wanted(data: Option<Vec<WantedAlbum>>, ctx: &RenderContext) -> WidgetView {
    let Some(albums) = data else {
        return WidgetView::placeholder("No data returned from headphones");
    };
    if albums.is_empty() {
        return WidgetView::placeholder("No wanted albums");
    }

    let items = albums
        .iter()
        .take(MAX_CAROUSEL_ITEMS)
        .map(|album| {
            let image = ctx.artwork("headphones", album.artwork_url.as_deref(), 240, 430);
            let artist = present(album.artist_name.as_deref()).unwrap_or_default();
            let title = format!(
                "{}{}",
                album.album_title.as_deref().unwrap_or_default(),
                release_year(album.release_date.as_deref())
            );

            let mut details = Vec::new();
            if !artist.is_empty() {
                details.push(("Artist".to_string(), artist.to_string()));
            }

            CarouselItem {
                image,
                title,
                link: ctx.path("headphones/#wanted"),
                details,
                plot: None,
                stretched: false,
            }
        })
        .collect();

    WidgetView::Carousel(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn album(json: serde_json::Value) -> WantedAlbum {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_null_and_empty_payloads() {
        let ctx = RenderContext::new("/");
        assert_eq!(
            render_wanted(None, &ctx),
            WidgetView::placeholder("No data returned from headphones")
        );
        assert_eq!(
            render_wanted(Some(vec![]), &ctx),
            WidgetView::placeholder("No wanted albums")
        );
    }

    #[test]
    fn test_release_date_and_artwork_fallbacks() {
        let ctx = RenderContext::new("/");
        let albums = vec![
            album(serde_json::json!({
                "AlbumTitle": "Dummy",
                "ArtistName": "Portishead",
                "ReleaseDate": "1994-08-22",
                "ArtworkURL": "http://img/1.jpg"
            })),
            album(serde_json::json!({
                "AlbumTitle": "Untitled",
                "ArtistName": "None",
                "ReleaseDate": "None",
                "ArtworkURL": null
            })),
        ];

        let WidgetView::Carousel(items) = render_wanted(Some(albums), &ctx) else {
            panic!("expected carousel");
        };
        assert_eq!(items[0].title, "Dummy (1994) ");
        assert_eq!(
            items[0].image,
            "/headphones/GetThumb?h=240&w=430&thumb=http%3A%2F%2Fimg%2F1.jpg"
        );
        assert_eq!(items[0].details, vec![("Artist".into(), "Portishead".into())]);
        assert_eq!(items[0].link, "/headphones/#wanted");

        assert_eq!(items[1].title, "Untitled  ");
        assert_eq!(items[1].image, "/img/no-cover-art.svg");
        assert!(items[1].details.is_empty());
    }

    #[test]
    fn test_carousel_is_capped() {
        let ctx = RenderContext::new("/");
        let albums = (0..8)
            .map(|i| album(serde_json::json!({ "AlbumTitle": format!("A{}", i) })))
            .collect();
        let WidgetView::Carousel(items) = render_wanted(Some(albums), &ctx) else {
            panic!("expected carousel");
        };
        assert_eq!(items.len(), MAX_CAROUSEL_ITEMS);
    }
}
