use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{error::ProviderError, model::NewsArticle};

use super::NewsProvider;

const BASE_URL: &str = "https://newsapi.org/v2";
const SERVICE: &str = "newsapi";

/// Headlines are US-scoped; NewsAPI requires a country (or source) filter on
/// the top-headlines endpoint.
const HEADLINES_COUNTRY: &str = "us";

#[derive(Debug, Clone)]
pub struct NewsApiProvider {
    api_key: String,
    http: Client,
}

impl NewsApiProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            http: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let res = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                service: SERVICE,
                source,
            })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| ProviderError::Transport {
                service: SERVICE,
                source,
            })?;

        if !status.is_success() {
            return Err(ProviderError::status(SERVICE, status, &body));
        }

        serde_json::from_str(&body).map_err(|source| ProviderError::Decode {
            service: SERVICE,
            source,
        })
    }
}

#[derive(Debug, Deserialize)]
struct NaArticle {
    title: String,
    // NewsAPI serializes a missing description as null.
    description: Option<String>,
    url: String,
}

#[derive(Debug, Deserialize)]
struct NaResponse {
    articles: Vec<NaArticle>,
}

fn articles_from_response(parsed: NaResponse) -> Vec<NewsArticle> {
    parsed
        .articles
        .into_iter()
        .map(|article| NewsArticle {
            title: article.title,
            description: article.description.unwrap_or_default(),
            url: article.url,
        })
        .collect()
}

#[async_trait]
impl NewsProvider for NewsApiProvider {
    async fn top_headlines(&self) -> Result<Vec<NewsArticle>, ProviderError> {
        let url = format!("{BASE_URL}/top-headlines");

        let parsed: NaResponse = self
            .get_json(
                &url,
                &[
                    ("country", HEADLINES_COUNTRY),
                    ("apiKey", self.api_key.as_str()),
                ],
            )
            .await?;

        Ok(articles_from_response(parsed))
    }

    async fn search(&self, query: &str) -> Result<Vec<NewsArticle>, ProviderError> {
        let url = format!("{BASE_URL}/everything");

        let parsed: NaResponse = self
            .get_json(&url, &[("q", query), ("apiKey", self.api_key.as_str())])
            .await?;

        Ok(articles_from_response(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn articles_map_in_order() {
        let body = r#"{
            "status": "ok",
            "totalResults": 2,
            "articles": [
                {"title": "First", "description": "one", "url": "https://example.com/1"},
                {"title": "Second", "description": "two", "url": "https://example.com/2"}
            ]
        }"#;

        let parsed: NaResponse = serde_json::from_str(body).unwrap();
        let articles = articles_from_response(parsed);

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "First");
        assert_eq!(articles[1].url, "https://example.com/2");
    }

    #[test]
    fn null_description_becomes_empty_string() {
        let body = r#"{
            "articles": [
                {"title": "Untitled", "description": null, "url": "https://example.com"}
            ]
        }"#;

        let parsed: NaResponse = serde_json::from_str(body).unwrap();
        let articles = articles_from_response(parsed);

        assert_eq!(articles[0].description, "");
    }
}
