//! Hero carousel - the latest published articles as rotating slides

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::model::{Article, ArticleQuery};
use crate::ports::{ArticleStore, GatewayError};

pub const SLIDE_COUNT: usize = 3;
pub const DEFAULT_ROTATION_PERIOD: Duration = Duration::from_secs(5);
pub const MIN_ROTATION_PERIOD: Duration = Duration::from_millis(100);

const SUBTITLE: &str = "Nos derniers articles";
const ACCENTS: [&str; SLIDE_COUNT] = ["from-indigo-500", "from-blue-500", "from-purple-500"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slide {
    pub title: String,
    pub subtitle: String,
    pub image_url: String,
    pub accent: String,
    /// Empty for the placeholder slide
    pub slug: String,
}

impl Slide {
    fn placeholder(image_url: &str) -> Self {
        Self {
            title: "Chargement...".to_string(),
            subtitle: "Veuillez patienter".to_string(),
            image_url: image_url.to_string(),
            accent: ACCENTS[0].to_string(),
            slug: String::new(),
        }
    }

    fn from_article(index: usize, article: &Article, image_url: &str) -> Self {
        Self {
            title: article.title.clone(),
            subtitle: SUBTITLE.to_string(),
            image_url: image_url.to_string(),
            accent: ACCENTS[index % ACCENTS.len()].to_string(),
            slug: article.slug.clone(),
        }
    }
}

#[derive(Debug)]
struct CarouselState {
    slides: Vec<Slide>,
    active: usize,
}

/// Carousel state, shareable with its rotation task
#[derive(Debug, Clone)]
pub struct Carousel {
    state: Arc<Mutex<CarouselState>>,
    banner_url: String,
}

impl Carousel {
    /// A carousel holding the loading placeholder
    pub fn new(banner_url: impl Into<String>) -> Self {
        let banner_url = banner_url.into();
        Self {
            state: Arc::new(Mutex::new(CarouselState {
                slides: vec![Slide::placeholder(&banner_url)],
                active: 0,
            })),
            banner_url,
        }
    }

    fn state(&self) -> MutexGuard<'_, CarouselState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the slides with the latest published articles.
    ///
    /// An empty result keeps the current slides. Returns the number of slides
    /// loaded.
    pub async fn load<S>(&self, store: &S) -> Result<usize, GatewayError>
    where
        S: ArticleStore + ?Sized,
    {
        let articles = match store
            .list_articles(&ArticleQuery::published().with_limit(SLIDE_COUNT))
            .await
        {
            Ok(articles) => articles,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load carousel articles");
                return Err(e);
            }
        };

        if articles.is_empty() {
            tracing::debug!("No published articles for the carousel");
            return Ok(0);
        }

        let slides: Vec<Slide> = articles
            .iter()
            .take(SLIDE_COUNT)
            .enumerate()
            .map(|(i, article)| Slide::from_article(i, article, &self.banner_url))
            .collect();
        let count = slides.len();

        let mut state = self.state();
        state.slides = slides;
        state.active = 0;
        Ok(count)
    }

    pub fn slides(&self) -> Vec<Slide> {
        self.state().slides.clone()
    }

    pub fn active(&self) -> usize {
        self.state().active
    }

    pub fn current(&self) -> Slide {
        let state = self.state();
        state.slides[state.active].clone()
    }

    /// Advance one slide, wrapping to the first
    pub fn next(&self) -> usize {
        let mut state = self.state();
        state.active = (state.active + 1) % state.slides.len();
        state.active
    }

    /// Go back one slide, wrapping to the last
    pub fn prev(&self) -> usize {
        let mut state = self.state();
        let len = state.slides.len();
        state.active = (state.active + len - 1) % len;
        state.active
    }

    /// Jump to a slide; out-of-range indices clamp to the last one
    pub fn select(&self, index: usize) -> usize {
        let mut state = self.state();
        state.active = index.min(state.slides.len() - 1);
        state.active
    }

    /// Advance every `period` on a background task until the handle is stopped or dropped.
    ///
    /// Periods shorter than [`MIN_ROTATION_PERIOD`] are raised to it.
    pub fn spawn_rotation(&self, period: Duration) -> RotationHandle {
        let period = period.max(MIN_ROTATION_PERIOD);
        let carousel = self.clone();
        let task = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(start, period);
            loop {
                interval.tick().await;
                let active = carousel.next();
                tracing::trace!(active, "Carousel advanced");
            }
        });
        RotationHandle { task: Some(task) }
    }
}

/// Owns the rotation task
#[derive(Debug)]
pub struct RotationHandle {
    task: Option<JoinHandle<()>>,
}

impl RotationHandle {
    pub fn stop(mut self) {
        self.abort();
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for RotationHandle {
    fn drop(&mut self) {
        self.abort();
    }
}
