//! Storefront content: FAQ, policies, testimonials, pages, blog, newsletter
//!
//! Updates take the same input shape as creation and replace every
//! editable field; slugs default to the title when omitted.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use validator::ValidateEmail;

use super::catalog::resolve_slug;
use crate::domain::content::{BlogArticle, Faq, NewsletterSubscriber, Page, Policy, Testimonial};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::{PaginatedResult, PaginationParams};

#[derive(Debug, Clone, Default)]
pub struct FaqInput {
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct PolicyInput {
    pub slug: Option<String>,
    pub title: String,
    pub summary: Option<String>,
    pub content: String,
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct TestimonialInput {
    pub name: String,
    pub position: Option<String>,
    pub content: String,
    pub rating: i32,
    pub avatar_url: Option<String>,
    pub is_published: Option<bool>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct PageInput {
    pub slug: Option<String>,
    pub title: String,
    pub content: String,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct ArticleInput {
    pub slug: Option<String>,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub author: Option<String>,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub is_published: Option<bool>,
}

fn require(value: &str, field: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn check_rating(rating: i32) -> DomainResult<()> {
    if !Testimonial::rating_in_range(rating) {
        return Err(DomainError::Validation(format!(
            "Rating must be between 1 and 5, got {}",
            rating
        )));
    }
    Ok(())
}

fn normalize_email(email: &str) -> DomainResult<String> {
    let email = email.trim().to_lowercase();
    if !email.validate_email() {
        return Err(DomainError::Validation(format!("Invalid email: {}", email)));
    }
    Ok(email)
}

pub struct ContentService {
    repos: Arc<dyn RepositoryProvider>,
}

impl ContentService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    // ── FAQ ─────────────────────────────────────────────────────

    pub async fn list_faqs(&self, category: Option<&str>) -> DomainResult<Vec<Faq>> {
        self.repos.faqs().list(category, true).await
    }

    pub async fn get_faq(&self, id: &str) -> DomainResult<Faq> {
        self.repos
            .faqs()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Faq", "id", id))
    }

    pub async fn create_faq(&self, input: FaqInput) -> DomainResult<Faq> {
        require(&input.question, "question")?;
        require(&input.answer, "answer")?;
        let mut faq = Faq::new(input.question.trim(), input.answer.trim());
        faq.category = input.category;
        faq.sort_order = input.sort_order.unwrap_or(0);
        faq.is_active = input.is_active.unwrap_or(true);
        let faq = self.repos.faqs().create(faq).await?;
        info!(faq_id = %faq.id, "FAQ created");
        Ok(faq)
    }

    pub async fn update_faq(&self, id: &str, input: FaqInput) -> DomainResult<Faq> {
        require(&input.question, "question")?;
        require(&input.answer, "answer")?;
        let mut faq = self.get_faq(id).await?;
        faq.question = input.question.trim().to_string();
        faq.answer = input.answer.trim().to_string();
        faq.category = input.category;
        faq.sort_order = input.sort_order.unwrap_or(faq.sort_order);
        faq.is_active = input.is_active.unwrap_or(faq.is_active);
        faq.updated_at = Utc::now();
        self.repos.faqs().update(faq).await
    }

    pub async fn delete_faq(&self, id: &str) -> DomainResult<()> {
        self.get_faq(id).await?;
        self.repos.faqs().delete(id).await
    }

    // ── Policies ────────────────────────────────────────────────

    pub async fn list_policies(&self) -> DomainResult<Vec<Policy>> {
        self.repos.policies().list(true).await
    }

    pub async fn get_policy_by_slug(&self, slug: &str) -> DomainResult<Policy> {
        match self.repos.policies().find_by_slug(slug).await? {
            Some(p) if p.is_published => Ok(p),
            _ => Err(DomainError::not_found("Policy", "slug", slug)),
        }
    }

    fn build_policy(input: PolicyInput) -> DomainResult<Policy> {
        require(&input.title, "title")?;
        require(&input.content, "content")?;
        let slug = resolve_slug(input.slug, &input.title)?;
        let mut policy = Policy::new(slug, input.title.trim(), input.content);
        policy.summary = input.summary;
        policy.is_published = input.is_published.unwrap_or(true);
        Ok(policy)
    }

    pub async fn create_policy(&self, input: PolicyInput) -> DomainResult<Policy> {
        let policy = self.repos.policies().create(Self::build_policy(input)?).await?;
        info!(slug = %policy.slug, "Policy created");
        Ok(policy)
    }

    pub async fn update_policy(&self, id: &str, input: PolicyInput) -> DomainResult<Policy> {
        let existing = self
            .repos
            .policies()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Policy", "id", id))?;
        let mut policy = Self::build_policy(input)?;
        policy.id = existing.id;
        policy.created_at = existing.created_at;
        self.repos.policies().update(policy).await
    }

    pub async fn upsert_policy(&self, input: PolicyInput) -> DomainResult<Policy> {
        self.repos.policies().upsert_by_slug(Self::build_policy(input)?).await
    }

    pub async fn delete_policy(&self, id: &str) -> DomainResult<()> {
        if self.repos.policies().find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("Policy", "id", id));
        }
        self.repos.policies().delete(id).await
    }

    // ── Testimonials ────────────────────────────────────────────

    pub async fn list_testimonials(&self, published_only: bool) -> DomainResult<Vec<Testimonial>> {
        self.repos.testimonials().list(published_only).await
    }

    pub async fn get_testimonial(&self, id: &str) -> DomainResult<Testimonial> {
        self.repos
            .testimonials()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Testimonial", "id", id))
    }

    pub async fn create_testimonial(&self, input: TestimonialInput) -> DomainResult<Testimonial> {
        require(&input.name, "name")?;
        require(&input.content, "content")?;
        check_rating(input.rating)?;
        let mut t = Testimonial::new(input.name.trim(), input.content.trim(), input.rating);
        t.position = input.position;
        t.avatar_url = input.avatar_url;
        t.is_published = input.is_published.unwrap_or(true);
        t.sort_order = input.sort_order.unwrap_or(0);
        self.repos.testimonials().create(t).await
    }

    pub async fn update_testimonial(&self, id: &str, input: TestimonialInput) -> DomainResult<Testimonial> {
        require(&input.name, "name")?;
        require(&input.content, "content")?;
        check_rating(input.rating)?;
        let mut t = self.get_testimonial(id).await?;
        t.name = input.name.trim().to_string();
        t.content = input.content.trim().to_string();
        t.rating = input.rating;
        t.position = input.position;
        t.avatar_url = input.avatar_url;
        t.is_published = input.is_published.unwrap_or(t.is_published);
        t.sort_order = input.sort_order.unwrap_or(t.sort_order);
        t.updated_at = Utc::now();
        self.repos.testimonials().update(t).await
    }

    pub async fn delete_testimonial(&self, id: &str) -> DomainResult<()> {
        self.get_testimonial(id).await?;
        self.repos.testimonials().delete(id).await
    }

    // ── Pages ───────────────────────────────────────────────────

    pub async fn list_pages(&self) -> DomainResult<Vec<Page>> {
        self.repos.pages().list().await
    }

    pub async fn get_page_by_slug(&self, slug: &str) -> DomainResult<Page> {
        match self.repos.pages().find_by_slug(slug).await? {
            Some(p) if p.is_published => Ok(p),
            _ => Err(DomainError::not_found("Page", "slug", slug)),
        }
    }

    fn build_page(input: PageInput) -> DomainResult<Page> {
        require(&input.title, "title")?;
        let slug = resolve_slug(input.slug, &input.title)?;
        let mut page = Page::new(slug, input.title.trim(), input.content);
        page.meta_title = input.meta_title;
        page.meta_description = input.meta_description;
        page.is_published = input.is_published.unwrap_or(true);
        Ok(page)
    }

    pub async fn create_page(&self, input: PageInput) -> DomainResult<Page> {
        let page = self.repos.pages().create(Self::build_page(input)?).await?;
        info!(slug = %page.slug, "Page created");
        Ok(page)
    }

    pub async fn update_page(&self, id: &str, input: PageInput) -> DomainResult<Page> {
        let existing = self
            .repos
            .pages()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Page", "id", id))?;
        let mut page = Self::build_page(input)?;
        page.id = existing.id;
        page.created_at = existing.created_at;
        self.repos.pages().update(page).await
    }

    pub async fn upsert_page(&self, input: PageInput) -> DomainResult<Page> {
        self.repos.pages().upsert_by_slug(Self::build_page(input)?).await
    }

    pub async fn delete_page(&self, id: &str) -> DomainResult<()> {
        if self.repos.pages().find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("Page", "id", id));
        }
        self.repos.pages().delete(id).await
    }

    // ── Blog ────────────────────────────────────────────────────

    pub async fn list_articles(
        &self,
        published_only: bool,
        pagination: PaginationParams,
    ) -> DomainResult<PaginatedResult<BlogArticle>> {
        self.repos.blog().list(published_only, pagination).await
    }

    /// Public read of a published article; counts a view.
    pub async fn get_article_by_slug(&self, slug: &str) -> DomainResult<BlogArticle> {
        let mut article = match self.repos.blog().find_by_slug(slug).await? {
            Some(a) if a.is_published => a,
            _ => return Err(DomainError::not_found("BlogArticle", "slug", slug)),
        };
        self.repos.blog().increment_views(&article.id).await?;
        article.view_count += 1;
        Ok(article)
    }

    pub async fn get_article(&self, id: &str) -> DomainResult<BlogArticle> {
        self.repos
            .blog()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("BlogArticle", "id", id))
    }

    fn apply_article(article: &mut BlogArticle, input: ArticleInput) {
        article.title = input.title.trim().to_string();
        article.excerpt = input.excerpt;
        article.content = input.content;
        article.author = input.author;
        article.cover_image = input.cover_image;
        article.tags = input.tags;
        match input.is_published {
            Some(true) => article.publish(),
            Some(false) => article.is_published = false,
            None => {}
        }
    }

    pub async fn create_article(&self, input: ArticleInput) -> DomainResult<BlogArticle> {
        require(&input.title, "title")?;
        require(&input.content, "content")?;
        let slug = resolve_slug(input.slug.clone(), &input.title)?;
        let mut article = BlogArticle::new(slug, "", "");
        Self::apply_article(&mut article, input);
        let article = self.repos.blog().create(article).await?;
        info!(slug = %article.slug, published = article.is_published, "Blog article created");
        Ok(article)
    }

    pub async fn update_article(&self, id: &str, input: ArticleInput) -> DomainResult<BlogArticle> {
        require(&input.title, "title")?;
        require(&input.content, "content")?;
        let mut article = self.get_article(id).await?;
        if input.slug.is_some() {
            article.slug = resolve_slug(input.slug.clone(), &input.title)?;
        }
        Self::apply_article(&mut article, input);
        article.updated_at = Utc::now();
        self.repos.blog().update(article).await
    }

    pub async fn delete_article(&self, id: &str) -> DomainResult<()> {
        self.get_article(id).await?;
        self.repos.blog().delete(id).await
    }

    // ── Newsletter ──────────────────────────────────────────────

    /// Subscribing twice is a no-op; a previous unsubscribe is undone.
    pub async fn subscribe(&self, email: &str, name: Option<String>) -> DomainResult<NewsletterSubscriber> {
        let email = normalize_email(email)?;
        let repo = self.repos.newsletter();

        let subscriber = match repo.find_by_email(&email).await? {
            Some(existing) if existing.is_active => return Ok(existing),
            Some(mut existing) => {
                existing.is_active = true;
                existing.unsubscribed_at = None;
                existing.subscribed_at = Utc::now();
                if name.is_some() {
                    existing.name = name;
                }
                repo.update(existing).await?
            }
            None => repo.create(NewsletterSubscriber::new(&email, name)).await?,
        };

        metrics::counter!("newsletter_subscriptions_total").increment(1);
        info!(email = %subscriber.email, "Newsletter subscription");
        Ok(subscriber)
    }

    pub async fn unsubscribe(&self, email: &str) -> DomainResult<()> {
        let email = normalize_email(email)?;
        let repo = self.repos.newsletter();
        let mut subscriber = repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| DomainError::not_found("NewsletterSubscriber", "email", &email))?;
        if subscriber.is_active {
            subscriber.is_active = false;
            subscriber.unsubscribed_at = Some(Utc::now());
            repo.update(subscriber).await?;
            info!(email = %email, "Newsletter unsubscribe");
        }
        Ok(())
    }

    pub async fn list_subscribers(
        &self,
        active_only: bool,
        pagination: PaginationParams,
    ) -> DomainResult<PaginatedResult<NewsletterSubscriber>> {
        self.repos.newsletter().list(active_only, pagination).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
    use crate::infrastructure::database::test_connection;

    async fn service() -> ContentService {
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(test_connection().await));
        ContentService::new(repos)
    }

    #[tokio::test]
    async fn testimonial_rating_bounds() {
        let svc = service().await;
        let input = |rating| TestimonialInput {
            name: "Anh Tuấn".into(),
            content: "Âm thanh rất hay".into(),
            rating,
            ..Default::default()
        };
        assert!(matches!(
            svc.create_testimonial(input(0)).await.unwrap_err(),
            DomainError::Validation(_)
        ));
        assert!(svc.create_testimonial(input(6)).await.is_err());
        let t = svc.create_testimonial(input(5)).await.unwrap();
        assert_eq!(t.rating, 5);
    }

    #[tokio::test]
    async fn subscribe_is_idempotent_and_reactivates() {
        let svc = service().await;
        let a = svc.subscribe(" Khach@Example.com ", None).await.unwrap();
        let b = svc.subscribe("khach@example.com", None).await.unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(b.email, "khach@example.com");

        svc.unsubscribe("khach@example.com").await.unwrap();
        let active = svc
            .list_subscribers(true, PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(active.total, 0);

        let c = svc
            .subscribe("khach@example.com", Some("Khách".into()))
            .await
            .unwrap();
        assert_eq!(c.id, a.id);
        assert!(c.is_active);
        assert!(c.unsubscribed_at.is_none());
    }

    #[tokio::test]
    async fn subscribe_rejects_bad_email() {
        let svc = service().await;
        assert!(matches!(
            svc.subscribe("not-an-email", None).await.unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn policy_upsert_by_slug_does_not_duplicate() {
        let svc = service().await;
        let input = || PolicyInput {
            slug: Some("chinh-sach-bao-hanh".into()),
            title: "Chính sách bảo hành".into(),
            content: "Bảo hành 12 tháng".into(),
            ..Default::default()
        };
        let a = svc.upsert_policy(input()).await.unwrap();
        let b = svc.upsert_policy(input()).await.unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(svc.list_policies().await.unwrap().len(), 1);
        assert_eq!(
            svc.get_policy_by_slug("chinh-sach-bao-hanh").await.unwrap().title,
            "Chính sách bảo hành"
        );
    }

    #[tokio::test]
    async fn drafts_are_not_public_until_published() {
        let svc = service().await;
        let draft = svc
            .create_article(ArticleInput {
                title: "Cách chọn loa karaoke".into(),
                content: "...".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(draft.slug, "cach-chon-loa-karaoke");
        assert!(svc.get_article_by_slug(&draft.slug).await.is_err());

        svc.update_article(
            &draft.id,
            ArticleInput {
                title: draft.title.clone(),
                content: "Nội dung".into(),
                is_published: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let read = svc.get_article_by_slug(&draft.slug).await.unwrap();
        assert_eq!(read.view_count, 1);
        assert!(read.published_at.is_some());
    }

    #[tokio::test]
    async fn faq_listing_by_category() {
        let svc = service().await;
        for (q, cat) in [("Giao hàng?", "shipping"), ("Bảo hành?", "warranty")] {
            svc.create_faq(FaqInput {
                question: q.into(),
                answer: "Có".into(),
                category: Some(cat.into()),
                ..Default::default()
            })
            .await
            .unwrap();
        }
        assert_eq!(svc.list_faqs(Some("shipping")).await.unwrap().len(), 1);
        assert_eq!(svc.list_faqs(None).await.unwrap().len(), 2);
    }
}
