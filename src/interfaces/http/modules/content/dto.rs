//! Content DTOs: FAQ, policies, testimonials, pages, blog and newsletter

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::services::content::{
    ArticleInput, FaqInput, PageInput, PolicyInput, TestimonialInput,
};
use crate::domain::content::{BlogArticle, Faq, NewsletterSubscriber, Page, Policy, Testimonial};
use crate::shared::validate_slug;

// ── FAQ ────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct FaqDto {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

impl From<Faq> for FaqDto {
    fn from(f: Faq) -> Self {
        Self {
            id: f.id,
            question: f.question,
            answer: f.answer,
            category: f.category,
            sort_order: f.sort_order,
            is_active: f.is_active,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct FaqQuery {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct FaqRequest {
    #[validate(length(min = 1, max = 500, message = "question is required"))]
    pub question: String,
    #[validate(length(min = 1, message = "answer is required"))]
    pub answer: String,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

impl From<FaqRequest> for FaqInput {
    fn from(r: FaqRequest) -> Self {
        Self {
            question: r.question,
            answer: r.answer,
            category: r.category,
            sort_order: r.sort_order,
            is_active: r.is_active,
        }
    }
}

// ── Policies ───────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct PolicyDto {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub summary: Option<String>,
    pub content: String,
    pub is_published: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<Policy> for PolicyDto {
    fn from(p: Policy) -> Self {
        Self {
            id: p.id,
            slug: p.slug,
            title: p.title,
            summary: p.summary,
            content: p.content,
            is_published: p.is_published,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PolicyRequest {
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[validate(length(min = 1, max = 200, message = "title is required"))]
    pub title: String,
    #[validate(length(max = 500))]
    pub summary: Option<String>,
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
    pub is_published: Option<bool>,
}

impl From<PolicyRequest> for PolicyInput {
    fn from(r: PolicyRequest) -> Self {
        Self {
            slug: r.slug,
            title: r.title,
            summary: r.summary,
            content: r.content,
            is_published: r.is_published,
        }
    }
}

// ── Testimonials ───────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct TestimonialDto {
    pub id: String,
    pub name: String,
    pub position: Option<String>,
    pub content: String,
    pub rating: i32,
    pub avatar_url: Option<String>,
    pub is_published: bool,
    pub sort_order: i32,
}

impl From<Testimonial> for TestimonialDto {
    fn from(t: Testimonial) -> Self {
        Self {
            id: t.id,
            name: t.name,
            position: t.position,
            content: t.content,
            rating: t.rating,
            avatar_url: t.avatar_url,
            is_published: t.is_published,
            sort_order: t.sort_order,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TestimonialRequest {
    #[validate(length(min = 1, max = 120, message = "name is required"))]
    pub name: String,
    #[validate(length(max = 120))]
    pub position: Option<String>,
    #[validate(length(min = 1, max = 2000, message = "content is required"))]
    pub content: String,
    #[validate(range(min = 1, max = 5, message = "rating must be 1–5"))]
    pub rating: i32,
    #[validate(url)]
    pub avatar_url: Option<String>,
    pub is_published: Option<bool>,
    pub sort_order: Option<i32>,
}

impl From<TestimonialRequest> for TestimonialInput {
    fn from(r: TestimonialRequest) -> Self {
        Self {
            name: r.name,
            position: r.position,
            content: r.content,
            rating: r.rating,
            avatar_url: r.avatar_url,
            is_published: r.is_published,
            sort_order: r.sort_order,
        }
    }
}

// ── Pages ──────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct PageDto {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub is_published: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<Page> for PageDto {
    fn from(p: Page) -> Self {
        Self {
            id: p.id,
            slug: p.slug,
            title: p.title,
            content: p.content,
            meta_title: p.meta_title,
            meta_description: p.meta_description,
            is_published: p.is_published,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PageRequest {
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[validate(length(min = 1, max = 200, message = "title is required"))]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[validate(length(max = 200))]
    pub meta_title: Option<String>,
    #[validate(length(max = 500))]
    pub meta_description: Option<String>,
    pub is_published: Option<bool>,
}

impl From<PageRequest> for PageInput {
    fn from(r: PageRequest) -> Self {
        Self {
            slug: r.slug,
            title: r.title,
            content: r.content,
            meta_title: r.meta_title,
            meta_description: r.meta_description,
            is_published: r.is_published,
        }
    }
}

// ── Blog ───────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct ArticleDto {
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
}

impl From<BlogArticle> for ArticleDto {
    fn from(a: BlogArticle) -> Self {
        Self {
            id: a.id,
            slug: a.slug,
            title: a.title,
            excerpt: a.excerpt,
            content: a.content,
            author: a.author,
            cover_image: a.cover_image,
            tags: a.tags,
            is_published: a.is_published,
            published_at: a.published_at,
            view_count: a.view_count,
            created_at: a.created_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ArticleListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Admins only; ignored for anonymous callers
    pub include_drafts: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ArticleRequest {
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[validate(length(min = 1, max = 200, message = "title is required"))]
    pub title: String,
    #[validate(length(max = 500))]
    pub excerpt: Option<String>,
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
    pub author: Option<String>,
    #[validate(url)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_published: Option<bool>,
}

impl From<ArticleRequest> for ArticleInput {
    fn from(r: ArticleRequest) -> Self {
        Self {
            slug: r.slug,
            title: r.title,
            excerpt: r.excerpt,
            content: r.content,
            author: r.author,
            cover_image: r.cover_image,
            tags: r.tags,
            is_published: r.is_published,
        }
    }
}

// ── Newsletter ─────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct SubscriberDto {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub is_active: bool,
    pub subscribed_at: DateTime<Utc>,
    pub unsubscribed_at: Option<DateTime<Utc>>,
}

impl From<NewsletterSubscriber> for SubscriberDto {
    fn from(s: NewsletterSubscriber) -> Self {
        Self {
            id: s.id,
            email: s.email,
            name: s.name,
            is_active: s.is_active,
            subscribed_at: s.subscribed_at,
            unsubscribed_at: s.unsubscribed_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubscribeRequest {
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(max = 120))]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UnsubscribeRequest {
    #[validate(email(message = "Invalid email"))]
    pub email: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SubscriberListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Defaults to true
    pub active_only: Option<bool>,
}
