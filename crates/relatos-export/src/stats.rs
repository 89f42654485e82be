use relatos_core::Category;
use std::collections::BTreeMap;

use crate::feed::{WebFeed, WebStory};

/// How many stories the top list shows.
pub const TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct FeedStats {
    pub total: usize,
    /// Count per category, largest first.
    pub by_category: Vec<(Category, usize)>,
    pub mean_wtf: Option<f64>,
    pub top: Vec<WebStory>,
}

impl FeedStats {
    pub fn from_feed(feed: &WebFeed) -> Self {
        let mut counts: BTreeMap<Category, usize> = BTreeMap::new();
        for story in &feed.stories {
            *counts.entry(story.category).or_default() += 1;
        }
        let mut by_category: Vec<(Category, usize)> = counts.into_iter().collect();
        by_category.sort_by(|a, b| b.1.cmp(&a.1));

        let mean_wtf = (!feed.stories.is_empty()).then(|| {
            feed.stories.iter().map(|s| s.wtf_score).sum::<f64>() / feed.stories.len() as f64
        });

        Self {
            total: feed.stories.len(),
            by_category,
            mean_wtf,
            top: feed.stories.iter().take(TOP_N).cloned().collect(),
        }
    }

    pub fn render(&self) -> String {
        let mut out = format!("Total stories: {}\n", self.total);
        if !self.by_category.is_empty() {
            out.push_str("\nBy category:\n");
            for (category, count) in &self.by_category {
                out.push_str(&format!("  {category}: {count}\n"));
            }
        }
        if let Some(mean) = self.mean_wtf {
            out.push_str(&format!("\nMean wtf score: {mean:.2}\n"));
        }
        if !self.top.is_empty() {
            out.push_str(&format!("\nTop {}:\n", self.top.len()));
            for story in &self.top {
                let title: String = story.title.chars().take(50).collect();
                out.push_str(&format!("  [{:.2}] {title}\n", story.wtf_score));
            }
        }
        out
    }
}
