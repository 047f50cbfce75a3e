//! Lazy nearby-search pager: one upstream request per `next_page` call.
//!
//! - First call fetches without a token
//! - Each following call waits `token_delay` first (the upstream token is not valid immediately)
//! - Stops when no `next_page_token` is returned

use crate::domain::{Coordinate, DomainError, RawPlace};
use crate::ports::{PlacesGateway, Sleeper};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

enum Cursor {
    First,
    Token(String),
    Exhausted,
}

pub struct NearbyPager<'a> {
    places: &'a dyn PlacesGateway,
    sleeper: &'a dyn Sleeper,
    origin: Coordinate,
    radius_meters: u32,
    token_delay: Duration,
    cursor: Cursor,
    pages_fetched: usize,
}

impl<'a> NearbyPager<'a> {
    pub fn new(
        places: &'a dyn PlacesGateway,
        sleeper: &'a dyn Sleeper,
        origin: Coordinate,
        radius_meters: u32,
        token_delay: Duration,
    ) -> Self {
        Self {
            places,
            sleeper,
            origin,
            radius_meters,
            token_delay,
            cursor: Cursor::First,
            pages_fetched: 0,
        }
    }

    /// Next page of places, or `None` once the tokens are exhausted.
    pub async fn next_page(&mut self) -> Result<Option<Vec<RawPlace>>, DomainError> {
        let token = match std::mem::replace(&mut self.cursor, Cursor::Exhausted) {
            Cursor::Exhausted => return Ok(None),
            Cursor::First => None,
            Cursor::Token(token) => {
                self.sleeper.sleep(self.token_delay).await;
                Some(token)
            }
        };

        let page = self
            .places
            .nearby_search(self.origin, self.radius_meters, token.as_deref())
            .await?;
        self.pages_fetched += 1;

        // An empty page ends the walk even if a token came back with it.
        if !page.places.is_empty() {
            if let Some(next) = page.next_page_token.filter(|t| !t.is_empty()) {
                self.cursor = Cursor::Token(next);
            }
        }

        debug!(
            page = self.pages_fetched,
            results = page.places.len(),
            has_more = matches!(self.cursor, Cursor::Token(_)),
            "nearby search page fetched"
        );
        Ok(Some(page.places))
    }

    /// Drain pages until exhausted or `cap` places are collected, then truncate to `cap`.
    pub async fn collect(
        mut self,
        cap: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<RawPlace>, DomainError> {
        let mut collected = Vec::new();
        while collected.len() < cap {
            let page = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(DomainError::Cancelled),
                page = self.next_page() => page?,
            };
            match page {
                Some(places) => collected.extend(places),
                None => break,
            }
        }
        collected.truncate(cap);
        Ok(collected)
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NearbyPage, PlaceDetail};
    use std::sync::Mutex;

    /// Serves `pages` in order; page `i` links to page `i + 1`.
    struct PagedPlaces {
        pages: Vec<usize>,
        requests: Mutex<Vec<Option<String>>>,
    }

    impl PagedPlaces {
        fn new(pages: Vec<usize>) -> Self {
            Self {
                pages,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl PlacesGateway for PagedPlaces {
        async fn nearby_search(
            &self,
            _origin: Coordinate,
            _radius_meters: u32,
            page_token: Option<&str>,
        ) -> Result<NearbyPage, DomainError> {
            self.requests
                .lock()
                .unwrap()
                .push(page_token.map(str::to_string));
            let index: usize = page_token.map_or(0, |t| t.parse().unwrap());
            let places = (0..self.pages[index])
                .map(|n| RawPlace {
                    place_id: format!("p{index}-{n}"),
                    name: format!("Place {n}"),
                    vicinity: None,
                    location: Coordinate { lat: 0.0, lng: 0.0 },
                })
                .collect();
            let next_page_token = (index + 1 < self.pages.len()).then(|| (index + 1).to_string());
            Ok(NearbyPage {
                places,
                next_page_token,
            })
        }

        async fn place_details(&self, _place_id: &str) -> Result<PlaceDetail, DomainError> {
            unreachable!("pager never fetches details")
        }
    }

    #[derive(Default)]
    struct RecordingSleeper {
        sleeps: Mutex<Vec<Duration>>,
    }

    #[async_trait::async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.sleeps.lock().unwrap().push(duration);
        }
    }

    /// Fires the token when the page-token wait starts, then never wakes.
    struct CancellingSleeper(CancellationToken);

    #[async_trait::async_trait]
    impl Sleeper for CancellingSleeper {
        async fn sleep(&self, _duration: Duration) {
            self.0.cancel();
            std::future::pending::<()>().await;
        }
    }

    const ORIGIN: Coordinate = Coordinate { lat: 1.0, lng: 2.0 };
    const DELAY: Duration = Duration::from_millis(2000);

    #[tokio::test]
    async fn test_follows_tokens_until_exhausted() {
        let places = PagedPlaces::new(vec![20, 20, 5]);
        let sleeper = RecordingSleeper::default();
        let pager = NearbyPager::new(&places, &sleeper, ORIGIN, 40_000, DELAY);

        let result = pager.collect(100, &CancellationToken::new()).await.unwrap();

        assert_eq!(result.len(), 45);
        assert_eq!(
            *places.requests.lock().unwrap(),
            vec![None, Some("1".to_string()), Some("2".to_string())]
        );
        assert_eq!(*sleeper.sleeps.lock().unwrap(), vec![DELAY, DELAY]);
    }

    #[tokio::test]
    async fn test_stops_at_cap_and_truncates() {
        let places = PagedPlaces::new(vec![60, 60, 60]);
        let sleeper = RecordingSleeper::default();
        let pager = NearbyPager::new(&places, &sleeper, ORIGIN, 40_000, DELAY);

        let result = pager.collect(100, &CancellationToken::new()).await.unwrap();

        assert_eq!(result.len(), 100);
        assert_eq!(places.requests.lock().unwrap().len(), 2);
        // no wait for a page that is never requested
        assert_eq!(sleeper.sleeps.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_next_page_is_lazy() {
        let places = PagedPlaces::new(vec![3, 3]);
        let sleeper = RecordingSleeper::default();
        let mut pager = NearbyPager::new(&places, &sleeper, ORIGIN, 1_000, DELAY);

        assert_eq!(places.requests.lock().unwrap().len(), 0);
        assert_eq!(pager.next_page().await.unwrap().map(|p| p.len()), Some(3));
        assert!(sleeper.sleeps.lock().unwrap().is_empty());
        assert_eq!(pager.next_page().await.unwrap().map(|p| p.len()), Some(3));
        assert!(pager.next_page().await.unwrap().is_none());
        assert_eq!(pager.pages_fetched(), 2);
    }

    #[tokio::test]
    async fn test_empty_page_ends_walk() {
        let places = PagedPlaces::new(vec![0, 10]);
        let sleeper = RecordingSleeper::default();
        let pager = NearbyPager::new(&places, &sleeper, ORIGIN, 1_000, DELAY);

        let result = pager.collect(100, &CancellationToken::new()).await.unwrap();
        assert!(result.is_empty());
        assert_eq!(places.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_before_first_page() {
        let places = PagedPlaces::new(vec![10]);
        let sleeper = RecordingSleeper::default();
        let pager = NearbyPager::new(&places, &sleeper, ORIGIN, 1_000, DELAY);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = pager.collect(100, &cancel).await;
        assert!(matches!(result, Err(DomainError::Cancelled)));
        assert!(places.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_during_token_wait() {
        let places = PagedPlaces::new(vec![20, 20, 20]);
        let cancel = CancellationToken::new();
        let sleeper = CancellingSleeper(cancel.clone());
        let pager = NearbyPager::new(&places, &sleeper, ORIGIN, 1_000, DELAY);

        let result = pager.collect(100, &cancel).await;

        assert!(matches!(result, Err(DomainError::Cancelled)));
        assert_eq!(*places.requests.lock().unwrap(), vec![None]);
    }
}
