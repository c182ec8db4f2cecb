use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Faq {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Store policy (warranty, returns, shipping, privacy...), addressed by slug
#[derive(Debug, Clone, PartialEq)]
pub struct Policy {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub summary: Option<String>,
    pub content: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Testimonial {
    pub id: String,
    pub name: String,
    pub position: Option<String>,
    pub content: String,
    /// 1..=5 stars
    pub rating: i32,
    pub avatar_url: Option<String>,
    pub is_published: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Testimonial {
    pub const MIN_RATING: i32 = 1;
    pub const MAX_RATING: i32 = 5;

    pub fn rating_in_range(rating: i32) -> bool {
        (Self::MIN_RATING..=Self::MAX_RATING).contains(&rating)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlogArticle {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub author: Option<String>,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewsletterSubscriber {
    pub id: String,
    /// Stored lower-cased
    pub email: String,
    pub name: Option<String>,
    pub is_active: bool,
    pub subscribed_at: DateTime<Utc>,
    pub unsubscribed_at: Option<DateTime<Utc>>,
}

impl Faq {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            question: question.into(),
            answer: answer.into(),
            category: None,
            sort_order: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Policy {
    pub fn new(slug: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            slug: slug.into(),
            title: title.into(),
            summary: None,
            content: content.into(),
            is_published: true,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Testimonial {
    pub fn new(name: impl Into<String>, content: impl Into<String>, rating: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            position: None,
            content: content.into(),
            rating,
            avatar_url: None,
            is_published: true,
            sort_order: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Page {
    pub fn new(slug: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            slug: slug.into(),
            title: title.into(),
            content: content.into(),
            meta_title: None,
            meta_description: None,
            is_published: true,
            created_at: now,
            updated_at: now,
        }
    }
}

impl BlogArticle {
    /// Drafts start unpublished with no `published_at`.
    pub fn new(slug: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            slug: slug.into(),
            title: title.into(),
            excerpt: None,
            content: content.into(),
            author: None,
            cover_image: None,
            tags: Vec::new(),
            is_published: false,
            published_at: None,
            view_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn publish(&mut self) {
        self.is_published = true;
        if self.published_at.is_none() {
            self.published_at = Some(Utc::now());
        }
    }
}

impl NewsletterSubscriber {
    pub fn new(email: &str, name: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.trim().to_lowercase(),
            name,
            is_active: true,
            subscribed_at: Utc::now(),
            unsubscribed_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds() {
        assert!(Testimonial::rating_in_range(1));
        assert!(Testimonial::rating_in_range(5));
        assert!(!Testimonial::rating_in_range(0));
        assert!(!Testimonial::rating_in_range(6));
    }

    #[test]
    fn subscriber_email_is_normalized() {
        let s = NewsletterSubscriber::new("  Khach@Example.COM ", None);
        assert_eq!(s.email, "khach@example.com");
        assert!(s.is_active);
    }

    #[test]
    fn publish_keeps_first_timestamp() {
        let mut a = BlogArticle::new("huong-dan", "Hướng dẫn", "...");
        a.publish();
        let first = a.published_at;
        a.publish();
        assert_eq!(a.published_at, first);
    }
}
