use serde::{Deserialize, Deserializer};

fn first_page() -> usize {
    1
}

// a malformed page number is not an error, the client just gets the first page.
// A number too large for usize still points past the end of any listing.
fn parse_page(value: &str) -> usize {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return first_page();
    }
    value.parse().unwrap_or(usize::MAX)
}

fn deserialize_page<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().map(parse_page).unwrap_or_else(first_page))
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page", deserialize_with = "deserialize_page")]
    pub page: usize,
}

#[cfg(test)]
mod tests {
    use axum::extract::Query;
    use axum::http::Uri;

    use super::PageQuery;

    fn page_of(uri: &str) -> usize {
        let uri: Uri = uri.parse().unwrap();
        Query::<PageQuery>::try_from_uri(&uri).unwrap().page
    }

    #[test]
    fn defaults_to_first_page() {
        assert_eq!(page_of("/questions"), 1);
        assert_eq!(page_of("/questions?other=3"), 1);
    }

    #[test]
    fn reads_page_number() {
        assert_eq!(page_of("/questions?page=2"), 2);
        assert_eq!(page_of("/questions?page=0"), 0);
    }

    #[test]
    fn garbage_falls_back_to_first_page() {
        assert_eq!(page_of("/questions?page=abc"), 1);
        assert_eq!(page_of("/questions?page=-3"), 1);
        assert_eq!(page_of("/questions?page="), 1);
        assert_eq!(page_of("/questions?page=12abc"), 1);
    }

    #[test]
    fn overflowing_page_points_past_the_end() {
        assert_eq!(
            page_of("/questions?page=99999999999999999999999"),
            usize::MAX
        );
    }
}
