use serde::Deserialize;

/// Envelope status value that signals a successful API response.
///
/// The API reports success through a string field in the JSON body, not the
/// HTTP status line; anything other than the literal `"200"` is a failure.
pub(crate) const STATUS_OK: &str = "200";

/// A navigable topic node, used to organize content.
///
/// Categories are immutable once fetched. `parent` is `None` for top-level
/// nodes; `weight` is the server's sort priority.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub weight: i64,
    pub parent: Option<i64>,
    pub web_logo: String,
    pub mobile_logo: String,
}

impl Category {
    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }
}

/// A single article/document record, optionally with an attached
/// downloadable file.
///
/// `description` and `body` are HTML markup. `content_type` is an opaque
/// integer code the server defines; it is carried but never validated.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Content {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(rename = "content")]
    pub body: String,
    pub content_type: i64,
    pub category: i64,
    pub is_published: bool,
    pub file_name: Option<String>,
    pub file_path: Option<String>,
    pub file_url: Option<String>,
    pub has_download: bool,
}

impl Content {
    /// URL of the attached file, if a download is actually available.
    ///
    /// `has_download` should imply a file URL but the server does not
    /// guarantee it, so both are checked.
    pub fn download_url(&self) -> Option<&str> {
        if self.has_download {
            self.file_url.as_deref()
        } else {
            None
        }
    }
}

/// Wire envelope for `GET /v1/category/all/`.
#[derive(Debug, Deserialize)]
pub(crate) struct CategoryListResponse {
    pub status: String,
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// Wire envelope for `GET /v1/content/data/{id}/`.
#[derive(Debug, Deserialize)]
pub(crate) struct ContentResponse {
    pub status: String,
    pub data: Option<Content>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(has_download: bool, file_url: Option<&str>) -> Content {
        Content {
            id: 1,
            title: "t".into(),
            description: String::new(),
            body: String::new(),
            content_type: 1,
            category: 2,
            is_published: true,
            file_name: None,
            file_path: None,
            file_url: file_url.map(String::from),
            has_download,
        }
    }

    #[test]
    fn test_download_url_requires_both_flag_and_url() {
        assert_eq!(
            content(true, Some("https://cdn.example.com/f.pdf")).download_url(),
            Some("https://cdn.example.com/f.pdf")
        );
        // Flag set but URL absent: tolerated, no download offered
        assert_eq!(content(true, None).download_url(), None);
        assert_eq!(content(false, Some("https://x.example/f")).download_url(), None);
    }

    #[test]
    fn test_category_deserializes_wire_shape() {
        let json = r#"{
            "id": 5, "name": "Mathematics", "weight": 10, "parent": null,
            "web_logo": "https://img.example.com/w.png",
            "mobile_logo": "https://img.example.com/m.png"
        }"#;
        let cat: Category = serde_json::from_str(json).unwrap();
        assert_eq!(cat.id, 5);
        assert!(cat.is_top_level());
    }

    #[test]
    fn test_content_body_maps_from_content_field() {
        let json = r#"{
            "id": 7, "title": "Sample", "description": "<p>d</p>", "content": "<p>b</p>",
            "content_type": 3, "category": 5, "is_published": false,
            "file_name": null, "file_path": null, "file_url": null, "has_download": false
        }"#;
        let c: Content = serde_json::from_str(json).unwrap();
        assert_eq!(c.body, "<p>b</p>");
        assert!(!c.is_published);
    }
}
