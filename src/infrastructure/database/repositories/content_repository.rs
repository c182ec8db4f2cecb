//! SeaORM implementations of the storefront content repositories

use async_trait::async_trait;
use chrono::Utc;
use log::info;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::{db_err, decode_list, encode_list, write_err};
use crate::domain::content::{
    BlogArticle, BlogRepository, Faq, FaqRepository, NewsletterRepository, NewsletterSubscriber,
    Page, PageRepository, Policy, PolicyRepository, Testimonial, TestimonialRepository,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{
    blog_article, faq, newsletter_subscriber, page, policy, testimonial,
};
use crate::shared::{PaginatedResult, PaginationParams};

// ── Conversion helpers ──────────────────────────────────────────

fn faq_to_domain(m: faq::Model) -> Faq {
    Faq {
        id: m.id,
        question: m.question,
        answer: m.answer,
        category: m.category,
        sort_order: m.sort_order,
        is_active: m.is_active,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn faq_to_active(f: Faq) -> faq::ActiveModel {
    faq::ActiveModel {
        id: Set(f.id),
        question: Set(f.question),
        answer: Set(f.answer),
        category: Set(f.category),
        sort_order: Set(f.sort_order),
        is_active: Set(f.is_active),
        created_at: Set(f.created_at),
        updated_at: Set(f.updated_at),
    }
}

fn policy_to_domain(m: policy::Model) -> Policy {
    Policy {
        id: m.id,
        slug: m.slug,
        title: m.title,
        summary: m.summary,
        content: m.content,
        is_published: m.is_published,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn policy_to_active(p: Policy) -> policy::ActiveModel {
    policy::ActiveModel {
        id: Set(p.id),
        slug: Set(p.slug),
        title: Set(p.title),
        summary: Set(p.summary),
        content: Set(p.content),
        is_published: Set(p.is_published),
        created_at: Set(p.created_at),
        updated_at: Set(p.updated_at),
    }
}

fn testimonial_to_domain(m: testimonial::Model) -> Testimonial {
    Testimonial {
        id: m.id,
        name: m.name,
        position: m.position,
        content: m.content,
        rating: m.rating,
        avatar_url: m.avatar_url,
        is_published: m.is_published,
        sort_order: m.sort_order,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn testimonial_to_active(t: Testimonial) -> testimonial::ActiveModel {
    testimonial::ActiveModel {
        id: Set(t.id),
        name: Set(t.name),
        position: Set(t.position),
        content: Set(t.content),
        rating: Set(t.rating),
        avatar_url: Set(t.avatar_url),
        is_published: Set(t.is_published),
        sort_order: Set(t.sort_order),
        created_at: Set(t.created_at),
        updated_at: Set(t.updated_at),
    }
}

fn page_to_domain(m: page::Model) -> Page {
    Page {
        id: m.id,
        slug: m.slug,
        title: m.title,
        content: m.content,
        meta_title: m.meta_title,
        meta_description: m.meta_description,
        is_published: m.is_published,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn page_to_active(p: Page) -> page::ActiveModel {
    page::ActiveModel {
        id: Set(p.id),
        slug: Set(p.slug),
        title: Set(p.title),
        content: Set(p.content),
        meta_title: Set(p.meta_title),
        meta_description: Set(p.meta_description),
        is_published: Set(p.is_published),
        created_at: Set(p.created_at),
        updated_at: Set(p.updated_at),
    }
}

fn article_to_domain(m: blog_article::Model) -> BlogArticle {
    BlogArticle {
        id: m.id,
        slug: m.slug,
        title: m.title,
        excerpt: m.excerpt,
        content: m.content,
        author: m.author,
        cover_image: m.cover_image,
        tags: decode_list(&m.tags),
        is_published: m.is_published,
        published_at: m.published_at,
        view_count: m.view_count,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn article_to_active(a: BlogArticle) -> blog_article::ActiveModel {
    blog_article::ActiveModel {
        id: Set(a.id),
        slug: Set(a.slug),
        title: Set(a.title),
        excerpt: Set(a.excerpt),
        content: Set(a.content),
        author: Set(a.author),
        cover_image: Set(a.cover_image),
        tags: Set(encode_list(&a.tags)),
        is_published: Set(a.is_published),
        published_at: Set(a.published_at),
        view_count: Set(a.view_count),
        created_at: Set(a.created_at),
        updated_at: Set(a.updated_at),
    }
}

fn subscriber_to_domain(m: newsletter_subscriber::Model) -> NewsletterSubscriber {
    NewsletterSubscriber {
        id: m.id,
        email: m.email,
        name: m.name,
        is_active: m.is_active,
        subscribed_at: m.subscribed_at,
        unsubscribed_at: m.unsubscribed_at,
    }
}

fn subscriber_to_active(s: NewsletterSubscriber) -> newsletter_subscriber::ActiveModel {
    newsletter_subscriber::ActiveModel {
        id: Set(s.id),
        email: Set(s.email),
        name: Set(s.name),
        is_active: Set(s.is_active),
        subscribed_at: Set(s.subscribed_at),
        unsubscribed_at: Set(s.unsubscribed_at),
    }
}

// ── SeaOrmFaqRepository ─────────────────────────────────────────

pub struct SeaOrmFaqRepository {
    db: DatabaseConnection,
}

impl SeaOrmFaqRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FaqRepository for SeaOrmFaqRepository {
    async fn list(&self, category: Option<&str>, active_only: bool) -> DomainResult<Vec<Faq>> {
        let mut query = faq::Entity::find();
        if let Some(category) = category {
            query = query.filter(faq::Column::Category.eq(category));
        }
        if active_only {
            query = query.filter(faq::Column::IsActive.eq(true));
        }
        let models = query
            .order_by_asc(faq::Column::SortOrder)
            .order_by_asc(faq::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(faq_to_domain).collect())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Faq>> {
        let model = faq::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(faq_to_domain))
    }

    async fn find_by_question(&self, question: &str) -> DomainResult<Option<Faq>> {
        let model = faq::Entity::find()
            .filter(faq::Column::Question.eq(question))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(faq_to_domain))
    }

    async fn create(&self, f: Faq) -> DomainResult<Faq> {
        let result = faq_to_active(f).insert(&self.db).await.map_err(db_err)?;
        info!("FAQ created: {}", result.id);
        Ok(faq_to_domain(result))
    }

    async fn update(&self, mut f: Faq) -> DomainResult<Faq> {
        if self.find_by_id(&f.id).await?.is_none() {
            return Err(DomainError::not_found("Faq", "id", f.id));
        }
        f.updated_at = Utc::now();
        let result = faq_to_active(f).update(&self.db).await.map_err(db_err)?;
        info!("FAQ updated: {}", result.id);
        Ok(faq_to_domain(result))
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = faq::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Faq", "id", id));
        }
        info!("FAQ deleted: {}", id);
        Ok(())
    }

    async fn count(&self) -> DomainResult<u64> {
        faq::Entity::find().count(&self.db).await.map_err(db_err)
    }
}

// ── SeaOrmPolicyRepository ──────────────────────────────────────

pub struct SeaOrmPolicyRepository {
    db: DatabaseConnection,
}

impl SeaOrmPolicyRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PolicyRepository for SeaOrmPolicyRepository {
    async fn list(&self, published_only: bool) -> DomainResult<Vec<Policy>> {
        let mut query = policy::Entity::find();
        if published_only {
            query = query.filter(policy::Column::IsPublished.eq(true));
        }
        let models = query
            .order_by_asc(policy::Column::Title)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(policy_to_domain).collect())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Policy>> {
        let model = policy::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(policy_to_domain))
    }

    async fn find_by_slug(&self, slug: &str) -> DomainResult<Option<Policy>> {
        let model = policy::Entity::find()
            .filter(policy::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(policy_to_domain))
    }

    async fn create(&self, p: Policy) -> DomainResult<Policy> {
        let slug = p.slug.clone();
        let result = policy_to_active(p)
            .insert(&self.db)
            .await
            .map_err(|e| write_err(e, || format!("Policy slug '{}' already exists", slug)))?;
        info!("Policy created: {}", result.slug);
        Ok(policy_to_domain(result))
    }

    async fn update(&self, mut p: Policy) -> DomainResult<Policy> {
        if self.find_by_id(&p.id).await?.is_none() {
            return Err(DomainError::not_found("Policy", "id", p.id));
        }
        p.updated_at = Utc::now();
        let slug = p.slug.clone();
        let result = policy_to_active(p)
            .update(&self.db)
            .await
            .map_err(|e| write_err(e, || format!("Policy slug '{}' already exists", slug)))?;
        info!("Policy updated: {}", result.slug);
        Ok(policy_to_domain(result))
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = policy::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Policy", "id", id));
        }
        info!("Policy deleted: {}", id);
        Ok(())
    }

    async fn upsert_by_slug(&self, mut p: Policy) -> DomainResult<Policy> {
        match self.find_by_slug(&p.slug).await? {
            Some(existing) => {
                p.id = existing.id;
                p.created_at = existing.created_at;
                self.update(p).await
            }
            None => self.create(p).await,
        }
    }

    async fn count(&self) -> DomainResult<u64> {
        policy::Entity::find().count(&self.db).await.map_err(db_err)
    }
}

// ── SeaOrmTestimonialRepository ─────────────────────────────────

pub struct SeaOrmTestimonialRepository {
    db: DatabaseConnection,
}

impl SeaOrmTestimonialRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TestimonialRepository for SeaOrmTestimonialRepository {
    async fn list(&self, published_only: bool) -> DomainResult<Vec<Testimonial>> {
        let mut query = testimonial::Entity::find();
        if published_only {
            query = query.filter(testimonial::Column::IsPublished.eq(true));
        }
        let models = query
            .order_by_asc(testimonial::Column::SortOrder)
            .order_by_desc(testimonial::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(testimonial_to_domain).collect())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Testimonial>> {
        let model = testimonial::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(testimonial_to_domain))
    }

    async fn create(&self, t: Testimonial) -> DomainResult<Testimonial> {
        let result = testimonial_to_active(t)
            .insert(&self.db)
            .await
            .map_err(db_err)?;
        info!("Testimonial created: {} ({})", result.id, result.name);
        Ok(testimonial_to_domain(result))
    }

    async fn update(&self, mut t: Testimonial) -> DomainResult<Testimonial> {
        if self.find_by_id(&t.id).await?.is_none() {
            return Err(DomainError::not_found("Testimonial", "id", t.id));
        }
        t.updated_at = Utc::now();
        let result = testimonial_to_active(t)
            .update(&self.db)
            .await
            .map_err(db_err)?;
        info!("Testimonial updated: {}", result.id);
        Ok(testimonial_to_domain(result))
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = testimonial::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Testimonial", "id", id));
        }
        info!("Testimonial deleted: {}", id);
        Ok(())
    }
}

// ── SeaOrmPageRepository ────────────────────────────────────────

pub struct SeaOrmPageRepository {
    db: DatabaseConnection,
}

impl SeaOrmPageRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PageRepository for SeaOrmPageRepository {
    async fn list(&self) -> DomainResult<Vec<Page>> {
        let models = page::Entity::find()
            .order_by_asc(page::Column::Slug)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(page_to_domain).collect())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Page>> {
        let model = page::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(page_to_domain))
    }

    async fn find_by_slug(&self, slug: &str) -> DomainResult<Option<Page>> {
        let model = page::Entity::find()
            .filter(page::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(page_to_domain))
    }

    async fn create(&self, p: Page) -> DomainResult<Page> {
        let slug = p.slug.clone();
        let result = page_to_active(p)
            .insert(&self.db)
            .await
            .map_err(|e| write_err(e, || format!("Page slug '{}' already exists", slug)))?;
        info!("Page created: {}", result.slug);
        Ok(page_to_domain(result))
    }

    async fn update(&self, mut p: Page) -> DomainResult<Page> {
        if self.find_by_id(&p.id).await?.is_none() {
            return Err(DomainError::not_found("Page", "id", p.id));
        }
        p.updated_at = Utc::now();
        let slug = p.slug.clone();
        let result = page_to_active(p)
            .update(&self.db)
            .await
            .map_err(|e| write_err(e, || format!("Page slug '{}' already exists", slug)))?;
        info!("Page updated: {}", result.slug);
        Ok(page_to_domain(result))
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = page::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Page", "id", id));
        }
        info!("Page deleted: {}", id);
        Ok(())
    }

    async fn upsert_by_slug(&self, mut p: Page) -> DomainResult<Page> {
        match self.find_by_slug(&p.slug).await? {
            Some(existing) => {
                p.id = existing.id;
                p.created_at = existing.created_at;
                self.update(p).await
            }
            None => self.create(p).await,
        }
    }

    async fn count(&self) -> DomainResult<u64> {
        page::Entity::find().count(&self.db).await.map_err(db_err)
    }
}

// ── SeaOrmBlogRepository ────────────────────────────────────────

pub struct SeaOrmBlogRepository {
    db: DatabaseConnection,
}

impl SeaOrmBlogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BlogRepository for SeaOrmBlogRepository {
    async fn list(
        &self,
        published_only: bool,
        pagination: PaginationParams,
    ) -> DomainResult<PaginatedResult<BlogArticle>> {
        let mut query = blog_article::Entity::find();
        if published_only {
            query = query.filter(blog_article::Column::IsPublished.eq(true));
        }
        let total = query.clone().count(&self.db).await.map_err(db_err)?;
        let models = query
            .order_by_desc(blog_article::Column::PublishedAt)
            .order_by_desc(blog_article::Column::CreatedAt)
            .offset(pagination.offset())
            .limit(pagination.limit as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(PaginatedResult::new(
            models.into_iter().map(article_to_domain).collect(),
            total,
            pagination.page,
            pagination.limit,
        ))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<BlogArticle>> {
        let model = blog_article::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(article_to_domain))
    }

    async fn find_by_slug(&self, slug: &str) -> DomainResult<Option<BlogArticle>> {
        let model = blog_article::Entity::find()
            .filter(blog_article::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(article_to_domain))
    }

    async fn create(&self, a: BlogArticle) -> DomainResult<BlogArticle> {
        let slug = a.slug.clone();
        let result = article_to_active(a)
            .insert(&self.db)
            .await
            .map_err(|e| write_err(e, || format!("Article slug '{}' already exists", slug)))?;
        info!("Blog article created: {}", result.slug);
        Ok(article_to_domain(result))
    }

    async fn update(&self, mut a: BlogArticle) -> DomainResult<BlogArticle> {
        if self.find_by_id(&a.id).await?.is_none() {
            return Err(DomainError::not_found("BlogArticle", "id", a.id));
        }
        a.updated_at = Utc::now();
        let slug = a.slug.clone();
        let result = article_to_active(a)
            .update(&self.db)
            .await
            .map_err(|e| write_err(e, || format!("Article slug '{}' already exists", slug)))?;
        info!("Blog article updated: {}", result.slug);
        Ok(article_to_domain(result))
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = blog_article::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("BlogArticle", "id", id));
        }
        info!("Blog article deleted: {}", id);
        Ok(())
    }

    async fn increment_views(&self, id: &str) -> DomainResult<()> {
        blog_article::Entity::update_many()
            .col_expr(
                blog_article::Column::ViewCount,
                Expr::col(blog_article::Column::ViewCount).add(1),
            )
            .filter(blog_article::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}

// ── SeaOrmNewsletterRepository ──────────────────────────────────

pub struct SeaOrmNewsletterRepository {
    db: DatabaseConnection,
}

impl SeaOrmNewsletterRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NewsletterRepository for SeaOrmNewsletterRepository {
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<NewsletterSubscriber>> {
        let model = newsletter_subscriber::Entity::find()
            .filter(newsletter_subscriber::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(subscriber_to_domain))
    }

    async fn create(&self, s: NewsletterSubscriber) -> DomainResult<NewsletterSubscriber> {
        let email = s.email.clone();
        let result = subscriber_to_active(s)
            .insert(&self.db)
            .await
            .map_err(|e| write_err(e, || format!("{} is already subscribed", email)))?;
        info!("Newsletter subscriber added: {}", result.email);
        Ok(subscriber_to_domain(result))
    }

    async fn update(&self, s: NewsletterSubscriber) -> DomainResult<NewsletterSubscriber> {
        let result = subscriber_to_active(s)
            .update(&self.db)
            .await
            .map_err(db_err)?;
        info!(
            "Newsletter subscriber {} active={}",
            result.email, result.is_active
        );
        Ok(subscriber_to_domain(result))
    }

    async fn list(
        &self,
        active_only: bool,
        pagination: PaginationParams,
    ) -> DomainResult<PaginatedResult<NewsletterSubscriber>> {
        let mut query = newsletter_subscriber::Entity::find();
        if active_only {
            query = query.filter(newsletter_subscriber::Column::IsActive.eq(true));
        }
        let total = query.clone().count(&self.db).await.map_err(db_err)?;
        let models = query
            .order_by_desc(newsletter_subscriber::Column::SubscribedAt)
            .offset(pagination.offset())
            .limit(pagination.limit as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(PaginatedResult::new(
            models.into_iter().map(subscriber_to_domain).collect(),
            total,
            pagination.page,
            pagination.limit,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_connection;

    #[tokio::test]
    async fn policy_upsert_is_idempotent() {
        let repo = SeaOrmPolicyRepository::new(test_connection().await);
        let first = repo
            .upsert_by_slug(Policy::new("bao-hanh", "Chính sách bảo hành", "12 tháng"))
            .await
            .unwrap();
        let second = repo
            .upsert_by_slug(Policy::new("bao-hanh", "Chính sách bảo hành", "24 tháng"))
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.content, "24 tháng");
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn newsletter_email_is_unique() {
        let repo = SeaOrmNewsletterRepository::new(test_connection().await);
        repo.create(NewsletterSubscriber::new("a@b.vn", None))
            .await
            .unwrap();
        let err = repo
            .create(NewsletterSubscriber::new("A@B.vn", None))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn blog_views_increment_and_drafts_are_hidden() {
        let repo = SeaOrmBlogRepository::new(test_connection().await);
        let mut published = BlogArticle::new("chon-loa", "Chọn loa", "...");
        published.publish();
        let published = repo.create(published).await.unwrap();
        repo.create(BlogArticle::new("nhap", "Bản nháp", "..."))
            .await
            .unwrap();

        repo.increment_views(&published.id).await.unwrap();
        repo.increment_views(&published.id).await.unwrap();

        let page = repo
            .list(true, PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].view_count, 2);
    }

    #[tokio::test]
    async fn faq_filters_by_category() {
        let repo = SeaOrmFaqRepository::new(test_connection().await);
        let mut a = Faq::new("Giao hàng bao lâu?", "2-3 ngày");
        a.category = Some("shipping".into());
        repo.create(a).await.unwrap();
        repo.create(Faq::new("Bảo hành?", "12 tháng")).await.unwrap();

        assert_eq!(repo.list(Some("shipping"), true).await.unwrap().len(), 1);
        assert_eq!(repo.list(None, true).await.unwrap().len(), 2);
    }
}
