//! Vibe query → meme gallery.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

use crate::backend::{ClientError, MemeResult, RecommendResponse, VibeApi};

pub const MSG_EMPTY_QUERY: &str = "Please describe a vibe first!";
pub const MSG_SEARCHING: &str = "AI is searching for memes...";
pub const MSG_NO_RESULTS: &str = "No memes found. Try a different vibe!";
pub const MSG_ERROR: &str = "Error connecting to server.";

#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    pub src: String,
    pub alt: String,
    pub subreddit: Option<String>,
    pub post_link: Option<String>,
}

impl From<MemeResult> for Thumbnail {
    fn from(meme: MemeResult) -> Self {
        Self {
            src: meme.url,
            alt: meme.name,
            subreddit: meme.subreddit,
            post_link: meme.post_link,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Grid {
    #[default]
    Empty,
    Loading,
    Thumbnails(Vec<Thumbnail>),
    NoResults,
    Error,
}

impl Grid {
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Grid::Loading => Some(MSG_SEARCHING),
            Grid::NoResults => Some(MSG_NO_RESULTS),
            Grid::Error => Some(MSG_ERROR),
            Grid::Empty | Grid::Thumbnails(_) => None,
        }
    }

    pub fn thumbnails(&self) -> &[Thumbnail] {
        match self {
            Grid::Thumbnails(thumbs) => thumbs,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryRejected {
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryTicket {
    pub id: u64,
    pub text: String,
}

#[derive(Debug)]
pub enum RecommendEvent {
    Completed {
        request: u64,
        result: Result<RecommendResponse, ClientError>,
    },
}

#[derive(Debug, Error)]
pub enum OpenError {
    #[error("no meme #{0}")]
    NoSuchMeme(usize),
    #[error("could not open browser: {0}")]
    Launch(#[from] std::io::Error),
}

/// Opens a URL in a new browsing context.
pub trait UrlOpener {
    fn open(&self, url: &str) -> std::io::Result<()>;
}

pub struct SystemBrowser;

impl UrlOpener for SystemBrowser {
    fn open(&self, url: &str) -> std::io::Result<()> {
        webbrowser::open(url)
    }
}

#[derive(Debug, Default)]
pub struct RecommendController {
    pub query: String,
    grid: Grid,
    selected: Option<usize>,
    pub vibe_score: Option<f64>,
    requests: u64,
}

impl RecommendController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Validate the query and show the loading placeholder. The caller
    /// performs the request for the returned ticket.
    pub fn get_recommendations(&mut self) -> Result<QueryTicket, QueryRejected> {
        if self.query.trim().is_empty() {
            return Err(QueryRejected::Empty);
        }

        self.requests += 1;
        self.replace_grid(Grid::Loading);
        Ok(QueryTicket {
            id: self.requests,
            text: self.query.clone(),
        })
    }

    /// Responses land in arrival order; the last one wins.
    pub fn apply(&mut self, event: RecommendEvent) {
        let RecommendEvent::Completed { request, result } = event;
        match result {
            Ok(response) => {
                self.vibe_score = response.sentiment_score;
                let memes = response.into_memes();
                info!(request, count = memes.len(), "recommendations received");
                if memes.is_empty() {
                    self.replace_grid(Grid::NoResults);
                } else {
                    self.replace_grid(Grid::Thumbnails(memes.into_iter().map(Thumbnail::from).collect()));
                }
            }
            Err(e) => {
                error!(request, "recommend failed: {}", e);
                self.vibe_score = None;
                self.replace_grid(Grid::Error);
            }
        }
    }

    fn replace_grid(&mut self, grid: Grid) {
        self.grid = grid;
        self.selected = None;
    }

    pub fn select_next(&mut self) {
        let len = self.grid.thumbnails().len();
        if len == 0 {
            return;
        }
        self.selected = match self.selected {
            None => Some(0),
            Some(n) if n + 1 >= len => Some(n),
            Some(n) => Some(n + 1),
        };
    }

    /// Moving up past the first thumbnail leaves the gallery.
    pub fn select_prev(&mut self) {
        self.selected = match self.selected {
            None | Some(0) => None,
            Some(n) => Some(n - 1),
        };
    }

    pub fn open(&self, index: usize, opener: &dyn UrlOpener) -> Result<String, OpenError> {
        let thumb = self
            .grid
            .thumbnails()
            .get(index)
            .ok_or(OpenError::NoSuchMeme(index + 1))?;
        opener.open(&thumb.src)?;
        info!(url = %thumb.src, "opened meme");
        Ok(thumb.src.clone())
    }
}

pub async fn run_query<F>(ticket: QueryTicket, api: Arc<dyn VibeApi>, emit: F)
where
    F: Fn(RecommendEvent) + Send,
{
    let result = api.recommend(&ticket.text).await;
    emit(RecommendEvent::Completed {
        request: ticket.id,
        result,
    });
}
