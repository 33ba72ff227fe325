//! Content draft generator
//!
//! Produces a starting point for each content type on demand. LinkedIn
//! drafts are derived from a stored blog post; the other types use fixed
//! templates the team fills in.

use super::blog::BlogPostSource;
use super::repurpose::{linkedin_post, ContentExtract};
use crate::error::{AppError, Result};
use crate::store::{ContentDraft, EventType, Stat};
use chrono::{Datelike, Local};
use rand::seq::SliceRandom;
use std::sync::Arc;

/// Stateless draft generator
#[derive(Clone)]
pub struct DraftGenerator {
    posts: Arc<dyn BlogPostSource>,
    base_url: String,
}

impl DraftGenerator {
    pub fn new(posts: Arc<dyn BlogPostSource>, base_url: impl Into<String>) -> Self {
        Self {
            posts,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Generate a draft for a content type name such as `"case-study"`
    pub async fn generate(&self, content_type: &str) -> Result<ContentDraft> {
        let event_type: EventType = content_type.parse()?;
        self.generate_for(event_type).await
    }

    pub async fn generate_for(&self, event_type: EventType) -> Result<ContentDraft> {
        match event_type {
            EventType::Linkedin => self.linkedin_draft().await,
            EventType::Blog => Ok(blog_draft()),
            EventType::CaseStudy => Ok(case_study_draft()),
            EventType::ClientContact => Ok(client_contact_draft()),
            EventType::Custom => Err(AppError::UnsupportedContentType(
                event_type.as_str().to_string(),
            )),
        }
    }

    async fn linkedin_draft(&self) -> Result<ContentDraft> {
        let posts = self.posts.list_posts().await?;

        let chosen = {
            let mut rng = rand::thread_rng();
            posts.choose(&mut rng).cloned()
        };

        let Some(post) = chosen else {
            tracing::debug!("No blog posts available, using LinkedIn placeholder");
            return Ok(ContentDraft::Linkedin {
                text: linkedin_placeholder(),
                source_post: None,
            });
        };

        let extract = ContentExtract::from_post(&post);
        let link = format!("{}/blog/{}", self.base_url, post.slug);

        Ok(ContentDraft::Linkedin {
            text: linkedin_post(&extract, &link),
            source_post: Some(post.slug),
        })
    }
}

fn linkedin_placeholder() -> String {
    [
        "What's one marketing change that moved the needle for your business this year?",
        "",
        "For one of our clients it was fixing the basics: accurate listings, fast pages and a steady stream of reviews.",
        "",
        "Share a recent win, a lesson learned or a before/after result from a client project.",
        "",
        "#DigitalMarketing #SmallBusiness #LocalSEO",
    ]
    .join("\n")
}

fn blog_draft() -> ContentDraft {
    let month = Local::now().format("%B").to_string();
    ContentDraft::Blog {
        title: format!("{} Marketing Checklist for Local Businesses", month),
        outline: vec![
            "Introduction: what's changing this month".to_string(),
            "Quick wins for your Google Business Profile".to_string(),
            "Content ideas that match seasonal search demand".to_string(),
            "A client example with before/after numbers".to_string(),
            "Call to action: book a free marketing audit".to_string(),
        ],
        keywords: vec![
            "local seo".to_string(),
            "small business marketing".to_string(),
            format!("{} marketing tips", month.to_lowercase()),
        ],
    }
}

fn case_study_draft() -> ContentDraft {
    let year = Local::now().year();
    ContentDraft::CaseStudy {
        title: format!("Client Success Story ({})", year),
        client: "[Client name and industry]".to_string(),
        challenge: "[What problem was the client facing before working with us?]".to_string(),
        solution: "[Which services did we deliver: SEO, web design, paid ads, content?]"
            .to_string(),
        results: vec![
            Stat::new("Organic traffic", "[+X%]"),
            Stat::new("Leads per month", "[before → after]"),
            Stat::new("Search ranking", "[keyword and position]"),
        ],
    }
}

fn client_contact_draft() -> ContentDraft {
    ContentDraft::ClientContact {
        subject: "Quick check-in from your marketing team".to_string(),
        body: [
            "Hi [Client name],",
            "",
            "It's been a little while since we wrapped up your project and we wanted to see how things are going.",
            "",
            "If you've been happy with the results, a short review would mean a lot to us. And if there's anything new on your plate this quarter, we'd love to help.",
            "",
            "Best regards,",
            "[Your name]",
        ]
        .join("\n"),
    }
}
