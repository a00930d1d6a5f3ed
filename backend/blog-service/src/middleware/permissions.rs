/// Request-level guards built on the policy module.
///
/// Handlers and services call these instead of the raw predicates so that a
/// denial always produces the same client response (404 for hidden posts,
/// 303 to the post for non-owners) and is counted.
use crate::error::{AppError, Result};
use crate::metrics::POLICY_DECISIONS_TOTAL;
use crate::models::{Comment, Post, PostDetail};
use crate::policy::{self, Viewer};
use chrono::{DateTime, Utc};

fn record(check: &str, allowed: bool) {
    let outcome = if allowed { "allowed" } else { "denied" };
    POLICY_DECISIONS_TOTAL
        .with_label_values(&[check, outcome])
        .inc();
}

/// The viewer may read this post.
pub fn check_post_visible(post: &PostDetail, viewer: &Viewer, now: DateTime<Utc>) -> Result<()> {
    let result = policy::ensure_can_view(post, viewer, now);
    record("view_post", result.is_ok());
    result.map_err(|err| AppError::from_policy(err, post.id))
}

/// Only the author edits or deletes a post.
pub fn check_post_modify(post: &Post, actor: &Viewer) -> Result<()> {
    let result = policy::ensure_can_modify(post, actor);
    record("modify_post", result.is_ok());
    if result.is_err() {
        tracing::info!(post_id = %post.id, actor = ?actor.id(), "post modification refused");
    }
    result.map_err(|err| AppError::from_policy(err, post.id))
}

/// Only the author edits or deletes a comment; refusal redirects to the post.
pub fn check_comment_modify(comment: &Comment, actor: &Viewer) -> Result<()> {
    let result = policy::ensure_can_modify(comment, actor);
    record("modify_comment", result.is_ok());
    if result.is_err() {
        tracing::info!(comment_id = %comment.id, actor = ?actor.id(), "comment modification refused");
    }
    result.map_err(|err| AppError::from_policy(err, comment.post_id))
}
