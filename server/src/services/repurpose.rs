//! Content repurposing
//!
//! Pulls the reusable parts out of a blog post and reshapes them for
//! LinkedIn.

use super::blog::BlogPost;
use crate::store::Stat;
use serde::Serialize;

const MAX_KEY_POINTS: usize = 5;
const MAX_HASHTAGS: usize = 5;
const SUMMARY_MAX_CHARS: usize = 280;

/// The reusable parts of a piece of content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentExtract {
    pub title: String,
    pub summary: String,
    pub key_points: Vec<String>,
    pub images: Vec<String>,
    pub stats: Vec<Stat>,
    pub tags: Vec<String>,
}

impl ContentExtract {
    pub fn from_post(post: &BlogPost) -> Self {
        let summary = post
            .excerpt
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| first_paragraph(&post.content));

        let mut images: Vec<String> = post.featured_image.iter().cloned().collect();
        images.extend(markdown_images(&post.content));

        Self {
            title: post.title.clone(),
            summary: truncate(&summary, SUMMARY_MAX_CHARS),
            key_points: key_points(&post.content),
            images,
            stats: Vec::new(),
            tags: post.tags.clone(),
        }
    }
}

/// Render a LinkedIn post linking back to `link`
pub fn linkedin_post(extract: &ContentExtract, link: &str) -> String {
    let mut out = format!("{}\n\n{}\n", extract.title, extract.summary);

    if !extract.key_points.is_empty() {
        out.push_str("\nKey takeaways:\n");
        for point in &extract.key_points {
            out.push_str(&format!("→ {}\n", point));
        }
    }

    if !extract.stats.is_empty() {
        out.push('\n');
        for stat in &extract.stats {
            out.push_str(&format!("📈 {}: {}\n", stat.label, stat.value));
        }
    }

    out.push_str(&format!("\nRead the full post: {}\n", link));

    let hashtags: Vec<String> = extract
        .tags
        .iter()
        .filter_map(|t| hashtag(t))
        .take(MAX_HASHTAGS)
        .collect();
    if !hashtags.is_empty() {
        out.push_str(&format!("\n{}", hashtags.join(" ")));
    }

    out
}

/// "local seo" -> "#LocalSeo"
fn hashtag(tag: &str) -> Option<String> {
    let body: String = tag
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect();

    if body.is_empty() {
        None
    } else {
        Some(format!("#{}", body))
    }
}

fn first_paragraph(markdown: &str) -> String {
    markdown
        .split("\n\n")
        .map(str::trim)
        .find(|p| !p.is_empty() && !p.starts_with('#') && !p.starts_with("!["))
        .unwrap_or_default()
        .replace('\n', " ")
}

/// Section headings and bullet items, in document order
fn key_points(markdown: &str) -> Vec<String> {
    markdown
        .lines()
        .map(str::trim)
        .filter_map(|line| {
            line.strip_prefix("## ")
                .or_else(|| line.strip_prefix("### "))
                .or_else(|| line.strip_prefix("- "))
                .or_else(|| line.strip_prefix("* "))
        })
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .take(MAX_KEY_POINTS)
        .map(str::to_string)
        .collect()
}

/// URLs of `![alt](url)` images
fn markdown_images(markdown: &str) -> Vec<String> {
    let mut images = Vec::new();
    let mut rest = markdown;

    while let Some(start) = rest.find("![") {
        rest = &rest[start + 2..];
        let Some(close) = rest.find("](") else {
            break;
        };
        rest = &rest[close + 2..];
        let Some(end) = rest.find(')') else {
            break;
        };
        let url = rest[..end].trim();
        if !url.is_empty() {
            images.push(url.to_string());
        }
        rest = &rest[end + 1..];
    }

    images
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_post() -> BlogPost {
        BlogPost {
            id: "1".to_string(),
            title: "How We Doubled Organic Leads".to_string(),
            slug: "doubled-organic-leads".to_string(),
            excerpt: None,
            content: "Local search changed this year.\nHere is what worked.\n\n\
                      ![chart](https://cdn.example.com/chart.png)\n\n\
                      ## Fix your Google Business Profile\n\
                      - Claim every location\n\
                      - Answer reviews weekly\n\
                      ## Publish service pages\n"
                .to_string(),
            tags: vec!["local seo".to_string(), "lead-gen".to_string()],
            featured_image: Some("https://cdn.example.com/hero.jpg".to_string()),
            published_at: Utc::now(),
        }
    }

    #[test]
    fn test_extract_from_post() {
        let extract = ContentExtract::from_post(&sample_post());

        assert_eq!(
            extract.summary,
            "Local search changed this year. Here is what worked."
        );
        assert_eq!(
            extract.key_points,
            vec![
                "Fix your Google Business Profile",
                "Claim every location",
                "Answer reviews weekly",
                "Publish service pages",
            ]
        );
        assert_eq!(
            extract.images,
            vec![
                "https://cdn.example.com/hero.jpg",
                "https://cdn.example.com/chart.png",
            ]
        );
    }

    #[test]
    fn test_excerpt_preferred_over_body() {
        let mut post = sample_post();
        post.excerpt = Some("  Short version.  ".to_string());

        assert_eq!(ContentExtract::from_post(&post).summary, "Short version.");
    }

    #[test]
    fn test_linkedin_post_layout() {
        let mut extract = ContentExtract::from_post(&sample_post());
        extract.stats.push(Stat::new("Organic leads", "+104%"));

        let text = linkedin_post(&extract, "https://agency.example/blog/doubled-organic-leads");

        assert!(text.starts_with("How We Doubled Organic Leads\n"));
        assert!(text.contains("→ Claim every location"));
        assert!(text.contains("Organic leads: +104%"));
        assert!(text.contains("Read the full post: https://agency.example/blog/doubled-organic-leads"));
        assert!(text.ends_with("#LocalSeo #LeadGen"));
    }

    #[test]
    fn test_hashtag_normalization() {
        assert_eq!(hashtag("web design").as_deref(), Some("#WebDesign"));
        assert_eq!(hashtag("SEO").as_deref(), Some("#SEO"));
        assert_eq!(hashtag(" -- "), None);
    }

    #[test]
    fn test_truncate_long_summary() {
        let long = "a".repeat(400);
        let cut = truncate(&long, 10);

        assert_eq!(cut.chars().count(), 10);
        assert!(cut.ends_with('…'));
    }
}
