//! Storefront content
//!
//! FAQ entries, store policies, testimonials, static pages, blog articles
//! and the newsletter subscriber list.

pub mod model;
pub mod repository;

pub use model::{BlogArticle, Faq, NewsletterSubscriber, Page, Policy, Testimonial};
pub use repository::{
    BlogRepository, FaqRepository, NewsletterRepository, PageRepository, PolicyRepository,
    TestimonialRepository,
};
