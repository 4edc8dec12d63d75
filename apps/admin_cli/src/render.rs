//! Plain-text rendering of list views for the terminal.

use client_core::{ListState, ViewError};
use shared::protocol::{CommentSummary, PostSummary};

pub trait RowDisplay {
    fn row(&self) -> String;
}

impl RowDisplay for PostSummary {
    fn row(&self) -> String {
        let categories = self
            .categories
            .iter()
            .map(|category| category.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "#{:<6} {}  {}  likes={} replies={}  [{}]",
            self.id,
            self.publish_date.format("%Y-%m-%d"),
            truncate(&self.title, 48),
            self.likes_count,
            self.replies_count,
            categories
        )
    }
}

impl RowDisplay for CommentSummary {
    fn row(&self) -> String {
        format!(
            "#{:<6} {}  on post {} ({})  likes={} replies={}  {}",
            self.id,
            self.publish_date.format("%Y-%m-%d"),
            self.post_id,
            self.post_title.as_deref().unwrap_or("untitled"),
            self.likes_count,
            self.replies_count,
            truncate(&self.content, 48)
        )
    }
}

pub fn render_list<T: RowDisplay>(state: &ListState<T>) -> String {
    let mut out = String::new();
    if state.items().is_empty() {
        out.push_str("(no items)\n");
    }
    for item in state.items() {
        out.push_str(&item.row());
        out.push('\n');
    }
    if let Some(pagination) = state.pagination() {
        out.push_str(&format!(
            "page {}/{} · {} items · sort {}\n",
            pagination.current_page,
            pagination.total_pages.max(1),
            pagination.total_items,
            state.query().sort()
        ));
    }
    out
}

pub fn render_error(error: &ViewError) -> String {
    let mut out = match error.code {
        Some(code) => format!("error [{code}]: {}", error.message),
        None => format!("error: {}", error.message),
    };
    if let Some(details) = &error.details {
        out.push_str(&format!(" ({details})"));
    }
    if error.requires_reauth() {
        out.push_str("\nhint: the backend rejected the auth token; set BLOG_ADMIN_TOKEN");
    }
    out
}

fn truncate(text: &str, max_chars: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut shortened: String = flat.chars().take(max_chars.saturating_sub(1)).collect();
    shortened.push('…');
    shortened
}
