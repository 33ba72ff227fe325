//! Blog post lookup
//!
//! Blog posts live in the website's database; the calendar only needs to
//! read them to seed LinkedIn drafts.

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    /// Markdown body
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured_image: Option<String>,
    pub published_at: DateTime<Utc>,
}

/// Source of stored blog posts
#[async_trait]
pub trait BlogPostSource: Send + Sync {
    async fn list_posts(&self) -> Result<Vec<BlogPost>>;
}

/// Blog posts held in memory
#[derive(Clone, Default)]
pub struct InMemoryBlogPosts {
    posts: Arc<RwLock<Vec<BlogPost>>>,
}

impl InMemoryBlogPosts {
    pub fn new(posts: Vec<BlogPost>) -> Self {
        Self {
            posts: Arc::new(RwLock::new(posts)),
        }
    }

    pub async fn add_post(&self, post: BlogPost) {
        self.posts.write().await.push(post);
    }
}

#[async_trait]
impl BlogPostSource for InMemoryBlogPosts {
    async fn list_posts(&self) -> Result<Vec<BlogPost>> {
        Ok(self.posts.read().await.clone())
    }
}
