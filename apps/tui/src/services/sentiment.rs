use crate::domain::Article;
use crate::services::{check_status, parse_base_url, BoxFuture, ServiceError};
use std::collections::{HashMap, HashSet};

pub trait SentimentSource: Send + Sync {
    fn articles(&self) -> BoxFuture<'_, Result<Vec<Article>, ServiceError>>;
}

/// `GET {base}/api/news-sentiment`
#[derive(Debug, Clone)]
pub struct HttpSentimentSource {
    client: reqwest::Client,
    endpoint: reqwest::Url,
}

impl HttpSentimentSource {
    pub fn new(client: reqwest::Client, base_url: &str) -> Result<Self, ServiceError> {
        let mut endpoint = parse_base_url(base_url)?;
        endpoint
            .path_segments_mut()
            .map_err(|()| ServiceError::Url(base_url.to_string()))?
            .pop_if_empty()
            .push("api")
            .push("news-sentiment");
        Ok(Self { client, endpoint })
    }
}

impl SentimentSource for HttpSentimentSource {
    fn articles(&self) -> BoxFuture<'_, Result<Vec<Article>, ServiceError>> {
        Box::pin(async move {
            let response =
                check_status("sentiment service", self.client.get(self.endpoint.clone()).send().await?)?;
            Ok(response.json::<Vec<Article>>().await?)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordWeight {
    pub word: String,
    pub count: usize,
}

/// Keyword frequencies for the word cloud. A keyword counts once per
/// article; case and surrounding whitespace are ignored. Sorted by count,
/// then alphabetically.
pub fn keyword_cloud(articles: &[Article]) -> Vec<KeywordWeight> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for article in articles {
        let unique: HashSet<String> = article
            .keywords
            .iter()
            .map(|keyword| keyword.trim().to_lowercase())
            .filter(|keyword| !keyword.is_empty())
            .collect();
        for keyword in unique {
            *counts.entry(keyword).or_default() += 1;
        }
    }

    let mut cloud: Vec<KeywordWeight> = counts
        .into_iter()
        .map(|(word, count)| KeywordWeight { word, count })
        .collect();
    cloud.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    cloud
}

pub fn format_sentiment(score: f64) -> String {
    format!("{score:.2}")
}

pub fn sentiment_label(score: f64) -> &'static str {
    if score > 0.05 {
        "positive"
    } else if score < -0.05 {
        "negative"
    } else {
        "neutral"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, sentiment: f64, keywords: &[&str]) -> Article {
        Article {
            title: title.to_string(),
            sentiment,
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        }
    }

    #[test]
    fn cloud_counts_once_per_article() {
        let articles = vec![
            article("Heatwave", -0.4, &["heat", "Climate", "climate"]),
            article("Solar boom", 0.6, &["solar", "climate "]),
            article("Quiet week", 0.0, &[]),
        ];

        let cloud = keyword_cloud(&articles);
        assert_eq!(
            cloud,
            vec![
                KeywordWeight { word: "climate".into(), count: 2 },
                KeywordWeight { word: "heat".into(), count: 1 },
                KeywordWeight { word: "solar".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn sentiment_is_shown_with_two_decimals() {
        assert_eq!(format_sentiment(0.456), "0.46");
        assert_eq!(format_sentiment(-1.0), "-1.00");
        assert_eq!(sentiment_label(0.3), "positive");
        assert_eq!(sentiment_label(-0.3), "negative");
        assert_eq!(sentiment_label(0.01), "neutral");
    }

    #[test]
    fn articles_parse_without_keywords() {
        let json = r#"[{"title": "A", "sentiment": 0.25}]"#;
        let parsed: Vec<Article> = serde_json::from_str(json).unwrap();
        assert!(parsed[0].keywords.is_empty());
    }

    #[test]
    fn endpoint_is_built_from_base() {
        let source = HttpSentimentSource::new(reqwest::Client::new(), "http://127.0.0.1:5000/").unwrap();
        assert_eq!(source.endpoint.as_str(), "http://127.0.0.1:5000/api/news-sentiment");
    }
}
