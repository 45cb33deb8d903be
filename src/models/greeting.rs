//! Greeting model and the request/view shapes built around it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One message posted to a guestbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Greeting {
    pub id: String,
    pub guestbook_name: String,
    /// Poster's email, `None` when anonymous
    pub author: Option<String>,
    pub content: Option<String>,
    /// Assigned by the store at write time
    pub created_at: DateTime<Utc>,
}

/// Query string accepted by `GET /` and `POST /sign`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuestbookQuery {
    #[serde(default)]
    pub guestbook_name: Option<String>,
}

impl GuestbookQuery {
    /// The requested guestbook, falling back to `default` when missing or empty.
    pub fn name_or<'a>(&'a self, default: &'a str) -> &'a str {
        match self.guestbook_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => default,
        }
    }
}

/// Form body of `POST /sign`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignForm {
    #[serde(default)]
    pub content: Option<String>,
}

/// Everything the guestbook page needs to render.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestbookView {
    pub user: Option<String>,
    pub greetings: Vec<Greeting>,
    pub guestbook_name: String,
    pub url: String,
    pub url_linktext: String,
}
