pub mod auth;
pub mod config;
pub mod doc;
pub mod health;
pub mod user;

use serde::{Deserialize, Serialize};

/// A user as returned by the server, without credentials.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role_id: i64,
    #[serde(default)]
    pub created_at: String,
}

impl UserInfo {
    pub fn role_name(&self) -> &'static str {
        match self.role_id {
            1 => "admin",
            _ => "regular",
        }
    }
}

/// Server-side `pagination` block of list responses.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total_count: u64,
    pub limit: u64,
    pub offset: u64,
    pub page: u64,
    pub page_count: u64,
}

impl PageInfo {
    pub fn summary(&self) -> String {
        format!("Page {} of {} ({} total)", self.page, self.page_count, self.total_count)
    }
}

/// Build a `?limit=..&offset=..` query string from the set options.
pub fn list_query(limit: Option<u64>, offset: Option<u64>, page: Option<u64>, search: Option<&str>) -> String {
    let mut params = Vec::new();
    if let Some(limit) = limit {
        params.push(format!("limit={}", limit));
    }
    if let Some(offset) = offset {
        params.push(format!("offset={}", offset));
    }
    if let Some(page) = page {
        params.push(format!("page={}", page));
    }
    if let Some(search) = search {
        params.push(format!("search={}", encode(search)));
    }

    if params.is_empty() {
        String::new()
    } else {
        format!("?{}", params.join("&"))
    }
}

fn encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => (b as char).to_string(),
            _ => format!("%{:02X}", b),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query() {
        assert_eq!(list_query(None, None, None, None), "");
        assert_eq!(list_query(Some(5), None, Some(2), None), "?limit=5&page=2");
        assert_eq!(
            list_query(None, Some(10), None, Some("annual report")),
            "?offset=10&search=annual%20report"
        );
    }
}
