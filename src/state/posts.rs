//! Pet post listing, lookup, and authoring.

use super::note_failure;
use super::session::Session;
use crate::error::ClientError;
use crate::net::types::{Category, Post, PostDraft, PostId, PostStatus};

/// Fetched posts plus the post currently opened for detail.
#[derive(Clone, Debug, Default)]
pub struct PostsState {
    pub posts: Vec<Post>,
    pub current: Option<Post>,
    pub loading: bool,
    pub error: Option<String>,
}

impl PostsState {
    /// Replace `posts` with every post on the platform.
    ///
    /// # Errors
    ///
    /// Returns the transport failure; `posts` is left untouched.
    pub async fn get_all_posts(&mut self, session: &Session) -> Result<(), ClientError> {
        let backend = session.backend()?;
        self.loading = true;
        let result = backend.get_all_posts().await;
        self.loading = false;
        self.replace_posts("getAllPosts", result)
    }

    /// Replace `posts` with the lost or the found posts.
    ///
    /// # Errors
    ///
    /// Returns the transport failure.
    pub async fn get_posts_by_category(&mut self, session: &Session, category: Category) -> Result<(), ClientError> {
        let backend = session.backend()?;
        self.loading = true;
        let result = backend.get_posts_by_category(category).await;
        self.loading = false;
        self.replace_posts("getPostsByCategory", result)
    }

    /// Replace `posts` with the posts in one area.
    ///
    /// # Errors
    ///
    /// Returns the transport failure.
    pub async fn get_posts_by_area(&mut self, session: &Session, area: &str) -> Result<(), ClientError> {
        let backend = session.backend()?;
        self.loading = true;
        let result = backend.get_posts_by_area(area).await;
        self.loading = false;
        self.replace_posts("getPostsByArea", result)
    }

    /// Replace `posts` with the backend's full-text search results.
    ///
    /// # Errors
    ///
    /// Returns the transport failure.
    pub async fn search_posts(&mut self, session: &Session, query: &str) -> Result<(), ClientError> {
        let backend = session.backend()?;
        self.loading = true;
        let result = backend.search_posts(query).await;
        self.loading = false;
        self.replace_posts("searchPosts", result)
    }

    /// Replace `posts` with the caller's own posts. A rejection (caller not
    /// registered) clears the list instead of failing.
    ///
    /// # Errors
    ///
    /// Returns the transport failure.
    pub async fn get_user_posts(&mut self, session: &Session) -> Result<(), ClientError> {
        let backend = session.backend()?;
        self.loading = true;
        let result = backend.get_user_posts().await;
        self.loading = false;
        match result {
            Err(e) if e.is_rejection() => {
                self.posts.clear();
                Ok(())
            }
            other => self.replace_posts("getUserPosts", other),
        }
    }

    /// Open one post. A rejection clears `current` and yields `None`.
    ///
    /// # Errors
    ///
    /// Returns the transport failure.
    pub async fn get_post(&mut self, session: &Session, id: &PostId) -> Result<Option<Post>, ClientError> {
        let backend = session.backend()?;
        self.loading = true;
        let result = backend.get_post(id).await;
        self.loading = false;
        match result {
            Ok(post) => {
                self.current = Some(post.clone());
                Ok(Some(post))
            }
            Err(e) if e.is_rejection() => {
                self.current = None;
                Ok(None)
            }
            Err(e) => Err(note_failure(&mut self.error, "getPost", e)),
        }
    }

    /// Publish a new post, then reload every post.
    ///
    /// # Errors
    ///
    /// Returns the backend rejection or the transport failure of the
    /// `createPost` call itself. A failed reload leaves the id intact.
    pub async fn create_post(&mut self, session: &Session, draft: &PostDraft) -> Result<PostId, ClientError> {
        let backend = session.backend()?;
        self.loading = true;
        let result = backend.create_post(draft).await;
        self.loading = false;
        let id = result.map_err(|e| note_failure(&mut self.error, "createPost", e))?;
        // The post is committed; a failed reload is already recorded in `error`.
        let _ = self.get_all_posts(session).await;
        Ok(id)
    }

    /// Mark a post active or resolved, then reload every post.
    ///
    /// # Errors
    ///
    /// Returns the backend rejection or the transport failure.
    pub async fn update_post_status(
        &mut self,
        session: &Session,
        id: &PostId,
        status: PostStatus,
    ) -> Result<(), ClientError> {
        let backend = session.backend()?;
        self.loading = true;
        let result = backend.update_post_status(id, status).await;
        self.loading = false;
        result.map_err(|e| note_failure(&mut self.error, "updatePostStatus", e))?;
        let _ = self.get_all_posts(session).await;
        Ok(())
    }

    fn replace_posts(&mut self, operation: &'static str, result: Result<Vec<Post>, ClientError>) -> Result<(), ClientError> {
        match result {
            Ok(posts) => {
                self.posts = posts;
                Ok(())
            }
            Err(e) => Err(note_failure(&mut self.error, operation, e)),
        }
    }
}

#[cfg(test)]
#[path = "posts_test.rs"]
mod tests;
