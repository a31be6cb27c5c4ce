// SPDX-License-Identifier: MIT

//! Markdown persistence for generated posts

use crate::adk::error::BlogsmithError;
use crate::blog::workflow::state::Blog;
use chrono::Local;
use std::path::{Path, PathBuf};

const MAX_STEM_CHARS: usize = 50;
const UNTITLED: &str = "untitled-blog";

/// Render a post as a Markdown document with the title as top heading
pub fn render_markdown(blog: &Blog) -> String {
    format!("# {}\n\n{}", blog.title, blog.content)
}

/// File-name-safe form of a title: ASCII alphanumerics, `_` and `-` survive,
/// everything else becomes `_`.
pub fn safe_file_stem(title: &str) -> String {
    let title = if title.trim().is_empty() { UNTITLED } else { title };
    title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .take(MAX_STEM_CHARS)
        .collect()
}

/// Write `blog` into `dir` and return the file path.
///
/// The file is named `{safe_title}_{YYYYmmdd_HHMMSS}.md`; `dir` is created if
/// needed.
pub async fn save_markdown(blog: &Blog, dir: &Path) -> Result<PathBuf, BlogsmithError> {
    tokio::fs::create_dir_all(dir).await?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("{}_{}.md", safe_file_stem(&blog.title), timestamp));
    tokio::fs::write(&path, render_markdown(blog)).await?;

    log::info!("Blog saved to {}", path.display());
    Ok(path)
}
