//! Idempotent demo/bootstrap data
//!
//! Every record is keyed by a natural unique value (slug, phone, question,
//! locale+context+key), so running the seed again updates rows in place.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use super::services::catalog::{CatalogService, CategoryInput, ProductInput, ServiceInput};
use super::services::content::{ContentService, PageInput, PolicyInput};
use crate::domain::content::Faq;
use crate::domain::i18n::{Language, Translation};
use crate::domain::{DomainResult, RepositoryProvider, Technician};

/// Rows touched per record type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub languages: usize,
    pub translations: usize,
    pub categories: usize,
    pub products: usize,
    pub services: usize,
    pub technicians: usize,
    pub faqs: usize,
    pub policies: usize,
    pub pages: usize,
}

fn languages() -> Vec<Language> {
    vec![
        Language {
            code: "vi".into(),
            name: "Vietnamese".into(),
            native_name: "Tiếng Việt".into(),
            flag: Some("🇻🇳".into()),
            is_default: true,
            is_active: true,
            sort_order: 0,
        },
        Language {
            code: "en".into(),
            name: "English".into(),
            native_name: "English".into(),
            flag: Some("🇺🇸".into()),
            is_default: false,
            is_active: true,
            sort_order: 1,
        },
    ]
}

const COMMON_TRANSLATIONS: &[(&str, &str, &str)] = &[
    ("nav.home", "Trang chủ", "Home"),
    ("nav.products", "Sản phẩm", "Products"),
    ("nav.services", "Dịch vụ", "Services"),
    ("nav.contact", "Liên hệ", "Contact"),
    ("cart.add", "Thêm vào giỏ", "Add to cart"),
    ("cart.total", "Tổng cộng: {amount}", "Total: {amount}"),
    ("booking.success", "Đặt lịch thành công", "Booking confirmed"),
    ("greeting", "Xin chào {name}", "Hello {name}"),
];

const CATEGORIES: &[(&str, &str, &str)] = &[
    ("loa", "Loa", "Loa karaoke, loa hội trường và loa sân khấu"),
    ("amply", "Amply", "Amply karaoke và cục đẩy công suất"),
    ("micro", "Micro", "Micro không dây và micro có dây"),
    ("tai-nghe", "Tai nghe", "Tai nghe kiểm âm và tai nghe nghe nhạc"),
];

/// (slug, name, category slug, price, stock, featured)
const PRODUCTS: &[(&str, &str, &str, i64, i32, bool)] = &[
    ("loa-jbl-pasion-12", "Loa JBL Pasion 12", "loa", 18_500_000, 6, true),
    ("loa-bose-s1-pro", "Loa Bose S1 Pro", "loa", 15_900_000, 4, false),
    ("amply-jarguar-506n", "Amply Jarguar 506N", "amply", 7_200_000, 10, true),
    ("micro-shure-ulxd24", "Micro Shure ULXD24", "micro", 32_000_000, 2, true),
    ("tai-nghe-sony-mdr-7506", "Tai nghe Sony MDR-7506", "tai-nghe", 2_650_000, 15, false),
];

/// (slug, name, description, base price, minutes)
const SERVICES: &[(&str, &str, &str, i64, i32)] = &[
    ("lap-dat-dan-karaoke", "Lắp đặt dàn karaoke", "Thi công và cân chỉnh dàn karaoke gia đình", 1_500_000, 180),
    ("bao-tri-he-thong-am-thanh", "Bảo trì hệ thống âm thanh", "Vệ sinh, kiểm tra và thay thế linh kiện", 800_000, 120),
    ("tu-van-thiet-ke", "Tư vấn thiết kế âm thanh", "Khảo sát và đề xuất cấu hình phù hợp", 300_000, 60),
];

/// (name, phone, specialties)
const TECHNICIANS: &[(&str, &str, &[&str])] = &[
    ("Nguyễn Văn Tài", "0901000001", &["karaoke", "installation"]),
    ("Trần Minh Lộc", "0901000002", &["repair", "maintenance"]),
    ("Lê Hoàng Phúc", "0901000003", &["consultation", "installation"]),
];

const FAQS: &[(&str, &str, &str)] = &[
    (
        "Audio Tài Lộc có giao hàng toàn quốc không?",
        "Chúng tôi giao hàng toàn quốc, miễn phí nội thành TP.HCM.",
        "shipping",
    ),
    (
        "Sản phẩm được bảo hành bao lâu?",
        "Tất cả sản phẩm chính hãng được bảo hành từ 12 đến 24 tháng.",
        "warranty",
    ),
    (
        "Tôi có thể thanh toán bằng những hình thức nào?",
        "VNPAY, ví MoMo, chuyển khoản PayOS hoặc thanh toán khi nhận hàng.",
        "payment",
    ),
];

const POLICIES: &[(&str, &str, &str)] = &[
    ("chinh-sach-bao-hanh", "Chính sách bảo hành", "Bảo hành chính hãng 12 tháng, đổi mới trong 7 ngày đầu nếu lỗi nhà sản xuất."),
    ("chinh-sach-doi-tra", "Chính sách đổi trả", "Đổi trả trong vòng 7 ngày với sản phẩm còn nguyên hộp."),
    ("chinh-sach-bao-mat", "Chính sách bảo mật", "Thông tin khách hàng chỉ được dùng để xử lý đơn hàng."),
];

const PAGES: &[(&str, &str, &str)] = &[
    ("gioi-thieu", "Giới thiệu", "Audio Tài Lộc chuyên cung cấp thiết bị âm thanh và dịch vụ lắp đặt karaoke."),
    ("lien-he", "Liên hệ", "Hotline: 0909 000 000. Showroom mở cửa 8:00 - 21:00 hằng ngày."),
];

pub async fn run_seed(repos: Arc<dyn RepositoryProvider>) -> DomainResult<SeedReport> {
    let catalog = CatalogService::new(repos.clone());
    let content = ContentService::new(repos.clone());
    let mut report = SeedReport::default();

    for language in languages() {
        repos.translations().upsert_language(language).await?;
        report.languages += 1;
    }

    for (key, vi, en) in COMMON_TRANSLATIONS {
        for (locale, value) in [("vi", vi), ("en", en)] {
            repos
                .translations()
                .upsert(Translation::new(locale, "common", *key, *value))
                .await?;
            report.translations += 1;
        }
    }

    for (slug, name, description) in CATEGORIES {
        let category = catalog
            .upsert_category_by_slug(CategoryInput {
                slug: Some((*slug).into()),
                name: (*name).into(),
                description: Some((*description).into()),
                ..Default::default()
            })
            .await?;
        repos
            .translations()
            .upsert(Translation::new(
                "en",
                format!("category:{}", category.id),
                "name",
                english_category_name(slug),
            ))
            .await?;
        report.categories += 1;
        report.translations += 1;
    }

    for (slug, name, category_slug, price, stock, featured) in PRODUCTS {
        let category_id = repos
            .categories()
            .find_by_slug(category_slug)
            .await?
            .map(|c| c.id);
        catalog
            .upsert_product_by_slug(ProductInput {
                slug: Some((*slug).into()),
                name: (*name).into(),
                price_cents: *price,
                stock_quantity: Some(*stock),
                featured: Some(*featured),
                category_id,
                specifications: Some(json!({ "warranty_months": 12 })),
                ..Default::default()
            })
            .await?;
        report.products += 1;
    }

    for (slug, name, description, price, minutes) in SERVICES {
        catalog
            .upsert_service_by_slug(ServiceInput {
                slug: Some((*slug).into()),
                name: (*name).into(),
                description: Some((*description).into()),
                base_price_cents: *price,
                duration_minutes: Some(*minutes),
                is_active: Some(true),
            })
            .await?;
        report.services += 1;
    }

    for (name, phone, specialties) in TECHNICIANS {
        let specialties: Vec<String> = specialties.iter().map(|s| s.to_string()).collect();
        match repos.technicians().find_by_phone(phone).await? {
            Some(mut existing) => {
                existing.name = (*name).into();
                existing.specialties = specialties;
                repos.technicians().update(existing).await?;
            }
            None => {
                let mut technician = Technician::new(*name, *phone);
                technician.specialties = specialties;
                repos.technicians().create(technician).await?;
            }
        }
        report.technicians += 1;
    }

    for (i, (question, answer, category)) in FAQS.iter().enumerate() {
        let existing = repos.faqs().find_by_question(question).await?;
        let is_new = existing.is_none();
        let mut faq = existing.unwrap_or_else(|| Faq::new(*question, *answer));
        faq.answer = (*answer).into();
        faq.category = Some((*category).into());
        faq.sort_order = i as i32;
        if is_new {
            repos.faqs().create(faq).await?;
        } else {
            repos.faqs().update(faq).await?;
        }
        report.faqs += 1;
    }

    for (slug, title, body) in POLICIES {
        content
            .upsert_policy(PolicyInput {
                slug: Some((*slug).into()),
                title: (*title).into(),
                content: (*body).into(),
                ..Default::default()
            })
            .await?;
        report.policies += 1;
    }

    for (slug, title, body) in PAGES {
        content
            .upsert_page(PageInput {
                slug: Some((*slug).into()),
                title: (*title).into(),
                content: (*body).into(),
                ..Default::default()
            })
            .await?;
        report.pages += 1;
    }

    info!(
        categories = report.categories,
        products = report.products,
        services = report.services,
        technicians = report.technicians,
        translations = report.translations,
        "Seed completed"
    );
    Ok(report)
}

fn english_category_name(slug: &str) -> &'static str {
    match slug {
        "loa" => "Speakers",
        "amply" => "Amplifiers",
        "micro" => "Microphones",
        "tai-nghe" => "Headphones",
        _ => "Audio",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
    use crate::infrastructure::database::test_connection;

    #[tokio::test]
    async fn seeding_twice_keeps_counts() {
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(test_connection().await));

        run_seed(repos.clone()).await.unwrap();
        let counts = || async {
            (
                repos.categories().count().await.unwrap(),
                repos.products().count().await.unwrap(),
                repos.services().count().await.unwrap(),
                repos.technicians().find_all().await.unwrap().len(),
                repos.translations().count().await.unwrap(),
                repos.faqs().count().await.unwrap(),
                repos.policies().count().await.unwrap(),
                repos.pages().count().await.unwrap(),
            )
        };
        let first = counts().await;
        assert_eq!(first.0, CATEGORIES.len() as u64);
        assert_eq!(first.1, PRODUCTS.len() as u64);

        run_seed(repos.clone()).await.unwrap();
        assert_eq!(counts().await, first);
        assert_eq!(repos.translations().languages(true).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn seeded_products_are_linked_to_categories() {
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(test_connection().await));
        run_seed(repos.clone()).await.unwrap();

        let loa = repos.categories().find_by_slug("loa").await.unwrap().unwrap();
        assert_eq!(repos.products().count_by_category(&loa.id).await.unwrap(), 2);
    }
}
