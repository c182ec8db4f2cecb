//! Database entities module

pub mod blog_article;
pub mod booking;
pub mod category;
pub mod faq;
pub mod language;
pub mod newsletter_subscriber;
pub mod order;
pub mod order_item;
pub mod page;
pub mod payment;
pub mod payment_intent;
pub mod policy;
pub mod product;
pub mod refund;
pub mod service;
pub mod service_review;
pub mod stored_file;
pub mod technician;
pub mod technician_schedule;
pub mod testimonial;
pub mod translation;
pub mod user;

pub use booking::Entity as Booking;
pub use category::Entity as Category;
pub use order::Entity as Order;
pub use payment::Entity as Payment;
pub use product::Entity as Product;
pub use service::Entity as Service;
pub use technician::Entity as Technician;
pub use translation::Entity as Translation;
pub use user::Entity as User;
