/// Post visibility and ownership policy
///
/// Every read path (index, category listing, profile listing, post detail,
/// commenting) and every write path (edit/delete of posts and comments) goes
/// through the functions in this module. They are pure: the caller supplies
/// the records and the current time, nothing here touches the database.
///
/// - A post is publicly visible when it is published, belongs to a published
///   category and its publication date is not in the future.
/// - The author of a post can always see it.
/// - Only the author of a post or comment can modify it.
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Who is asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Anonymous,
    User(Uuid),
}

impl Viewer {
    pub fn id(&self) -> Option<Uuid> {
        match self {
            Viewer::Anonymous => None,
            Viewer::User(id) => Some(*id),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Viewer::User(_))
    }

    /// True when the viewer is the given user.
    pub fn is(&self, user_id: Uuid) -> bool {
        self.id() == Some(user_id)
    }
}

impl From<Option<Uuid>> for Viewer {
    fn from(id: Option<Uuid>) -> Self {
        id.map(Viewer::User).unwrap_or(Viewer::Anonymous)
    }
}

/// Anything with an author: posts and comments.
pub trait Authored {
    fn author_id(&self) -> Uuid;
}

/// The inputs of the visibility predicate.
pub trait Publishable: Authored {
    fn id(&self) -> Uuid;
    fn is_published(&self) -> bool;
    fn pub_date(&self) -> DateTime<Utc>;
    /// `None` when the post has no category.
    fn category_published(&self) -> Option<bool>;
}

/// Why a policy check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    /// Reported to clients exactly like a missing record.
    #[error("not found")]
    NotVisible,
    /// Reported as a redirect to the canonical read view.
    #[error("not the author")]
    NotOwner,
}

pub fn is_publicly_visible<P: Publishable + ?Sized>(post: &P, now: DateTime<Utc>) -> bool {
    post.is_published() && post.category_published() == Some(true) && post.pub_date() <= now
}

pub fn can_view<P: Publishable + ?Sized>(post: &P, viewer: &Viewer, now: DateTime<Utc>) -> bool {
    viewer.is(post.author_id()) || is_publicly_visible(post, now)
}

pub fn can_modify<E: Authored + ?Sized>(entity: &E, actor: &Viewer) -> bool {
    actor.is(entity.author_id())
}

/// Publicly visible posts, newest `pub_date` first, ties broken by id
/// descending.
pub fn list_published<'a, P, I>(posts: I, now: DateTime<Utc>) -> impl Iterator<Item = &'a P>
where
    P: Publishable + 'a,
    I: IntoIterator<Item = &'a P>,
{
    let mut visible: Vec<&'a P> = posts
        .into_iter()
        .filter(|post| is_publicly_visible(*post, now))
        .collect();
    visible.sort_by(|a, b| {
        b.pub_date()
            .cmp(&a.pub_date())
            .then_with(|| b.id().cmp(&a.id()))
    });
    visible.into_iter()
}

/// Owned variant of [`list_published`] for rows fetched from the database.
pub fn retain_published<P: Publishable>(posts: Vec<P>, now: DateTime<Utc>) -> Vec<P> {
    let mut visible: Vec<P> = posts
        .into_iter()
        .filter(|post| is_publicly_visible(post, now))
        .collect();
    visible.sort_by(|a, b| {
        b.pub_date()
            .cmp(&a.pub_date())
            .then_with(|| b.id().cmp(&a.id()))
    });
    visible
}

pub fn ensure_can_view<P: Publishable + ?Sized>(
    post: &P,
    viewer: &Viewer,
    now: DateTime<Utc>,
) -> Result<(), PolicyError> {
    if can_view(post, viewer, now) {
        Ok(())
    } else {
        Err(PolicyError::NotVisible)
    }
}

pub fn ensure_can_modify<E: Authored + ?Sized>(entity: &E, actor: &Viewer) -> Result<(), PolicyError> {
    if can_modify(entity, actor) {
        Ok(())
    } else {
        Err(PolicyError::NotOwner)
    }
}
