mod pexels;
mod unsplash;

pub use pexels::PexelsSearch;
pub use unsplash::UnsplashSearch;

use crate::config::ImageConfig;
use crate::error::{BoxError, RecipeError};
use crate::model::RecipeRecord;
use async_trait::async_trait;
use futures::future::join_all;
use log::{debug, warn};
use std::time::Duration;

/// Stock photo lookup used to illustrate recipes
#[async_trait]
pub trait ImageSearch: Send + Sync {
    fn provider_name(&self) -> &str;

    /// URL of the best match for `query`, or `None` when nothing was found
    async fn search(&self, query: &str) -> Result<Option<String>, BoxError>;
}

/// Create the configured image search, or `None` when images are disabled
pub fn create_image_search(
    config: &ImageConfig,
    timeout: Duration,
) -> Result<Option<Box<dyn ImageSearch>>, RecipeError> {
    let provider_name = match config.provider.as_deref().map(str::trim) {
        None | Some("") => return Ok(None),
        Some(name) => name,
    };

    let search: Box<dyn ImageSearch> = match provider_name {
        "unsplash" => Box::new(
            UnsplashSearch::new(config, timeout)
                .map_err(|e| RecipeError::Provider(format!("unsplash: {}", e)))?,
        ),
        "pexels" => Box::new(
            PexelsSearch::new(config, timeout)
                .map_err(|e| RecipeError::Provider(format!("pexels: {}", e)))?,
        ),
        other => {
            return Err(RecipeError::Provider(format!(
                "Unknown image provider: {}",
                other
            )))
        }
    };

    Ok(Some(search))
}

fn image_query(title: &str, qualifier: &str) -> String {
    let qualifier = qualifier.trim();
    if qualifier.is_empty() {
        title.to_string()
    } else {
        format!("{} {}", title, qualifier)
    }
}

/// Attach an image to one recipe, best effort.
///
/// Any failure leaves `image` empty; nothing is retried or propagated.
pub async fn enrich(
    mut record: RecipeRecord,
    search: Option<&dyn ImageSearch>,
    qualifier: &str,
) -> RecipeRecord {
    let Some(search) = search else {
        return record;
    };

    let query = image_query(&record.title, qualifier);
    match search.search(&query).await {
        Ok(Some(url)) => {
            debug!("Found image for '{}' via {}", record.title, search.provider_name());
            record.image = Some(url);
        }
        Ok(None) => {
            debug!("No image found for '{}'", record.title);
            record.image = None;
        }
        Err(e) => {
            warn!(
                "Image lookup for '{}' via {} failed: {}",
                record.title,
                search.provider_name(),
                e
            );
            record.image = None;
        }
    }
    record
}

/// Enrich every recipe concurrently; output order matches input order
pub async fn enrich_all(
    records: Vec<RecipeRecord>,
    search: Option<&dyn ImageSearch>,
    qualifier: &str,
) -> Vec<RecipeRecord> {
    if search.is_none() {
        return records;
    }

    join_all(
        records
            .into_iter()
            .map(|record| enrich(record, search, qualifier)),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns a URL derived from the query, except for titles containing "壞"
    struct StubSearch {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ImageSearch for StubSearch {
        fn provider_name(&self) -> &str {
            "stub"
        }

        async fn search(&self, query: &str) -> Result<Option<String>, BoxError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if query.contains("壞") {
                return Err("connection reset".into());
            }
            if query.contains("無") {
                return Ok(None);
            }
            Ok(Some(format!("https://img.test/{}", query)))
        }
    }

    fn stub() -> StubSearch {
        StubSearch {
            calls: AtomicUsize::new(0),
        }
    }

    #[test]
    fn test_image_query() {
        assert_eq!(image_query("番茄炒蛋", "food"), "番茄炒蛋 food");
        assert_eq!(image_query("番茄炒蛋", "  "), "番茄炒蛋");
    }

    #[tokio::test]
    async fn test_enrich_sets_image() {
        let search = stub();
        let record = enrich(RecipeRecord::new("番茄炒蛋", "", ""), Some(&search), "food").await;
        assert_eq!(record.image.as_deref(), Some("https://img.test/番茄炒蛋 food"));
    }

    #[tokio::test]
    async fn test_enrich_without_search_leaves_image_absent() {
        let record = enrich(RecipeRecord::new("番茄炒蛋", "", ""), None, "food").await;
        assert!(record.image.is_none());
    }

    #[tokio::test]
    async fn test_failures_are_isolated_and_order_kept() {
        let search = stub();
        let records = vec![
            RecipeRecord::new("鮭魚炒飯", "a", "1"),
            RecipeRecord::new("壞掉的菜", "b", "2"),
            RecipeRecord::new("無圖料理", "c", "3"),
            RecipeRecord::new("蒜炒高麗菜", "d", "4"),
        ];

        let enriched = enrich_all(records, Some(&search), "food").await;

        let titles: Vec<&str> = enriched.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["鮭魚炒飯", "壞掉的菜", "無圖料理", "蒜炒高麗菜"]);
        assert!(enriched[0].image.is_some());
        assert!(enriched[1].image.is_none());
        assert_eq!(enriched[1].description, "b");
        assert!(enriched[2].image.is_none());
        assert!(enriched[3].image.is_some());
        assert_eq!(search.calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_disabled_when_no_provider() {
        let config = ImageConfig::default();
        let search = create_image_search(&config, Duration::from_secs(5)).unwrap();
        assert!(search.is_none());
    }

    #[test]
    fn test_unknown_provider() {
        let config = ImageConfig {
            provider: Some("flickr".to_string()),
            ..Default::default()
        };
        let result = create_image_search(&config, Duration::from_secs(5));
        assert!(result.is_err());
    }

    #[test]
    fn test_create_configured_provider() {
        let config = ImageConfig {
            provider: Some("pexels".to_string()),
            api_key: Some("test-key".to_string()),
            ..Default::default()
        };
        let search = create_image_search(&config, Duration::from_secs(5))
            .unwrap()
            .unwrap();
        assert_eq!(search.provider_name(), "pexels");
    }
}
