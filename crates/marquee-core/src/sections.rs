//! Section schemas and the registry
//!
//! Every logical content section maps to one storage collection and one
//! typed shape. Singleton sections (hero, services, FAQs, team, contact)
//! live in a single document with the fixed id [`SINGLETON_ID`]; entry
//! sections (projects, testimonials) are one document per entry.
//!
//! Wire shape is camelCase JSON, authored by admin tooling and read back by
//! the public site. Array elements and entry documents all carry an integer
//! `order` field defining their display order.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Fixed document id for singleton sections
pub const SINGLETON_ID: &str = "main";

/// How a section is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// One document at the fixed id `"main"`
    Singleton,
    /// Many documents sharing one schema
    Collection,
}

/// A named content section with a fixed storage mapping
pub trait Section: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Storage collection identifier
    const COLLECTION: &'static str;
    /// Singleton document or per-entry collection
    const KIND: SectionKind;
}

/// Registry row for name-based lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionInfo {
    /// Logical section name as used by visibility keys and tooling
    pub name: &'static str,
    pub collection: &'static str,
    pub kind: SectionKind,
}

/// All known sections
pub const REGISTRY: &[SectionInfo] = &[
    SectionInfo {
        name: "hero",
        collection: Hero::COLLECTION,
        kind: Hero::KIND,
    },
    SectionInfo {
        name: "services",
        collection: Services::COLLECTION,
        kind: Services::KIND,
    },
    SectionInfo {
        name: "projects",
        collection: Project::COLLECTION,
        kind: Project::KIND,
    },
    SectionInfo {
        name: "testimonials",
        collection: Testimonial::COLLECTION,
        kind: Testimonial::KIND,
    },
    SectionInfo {
        name: "faqs",
        collection: Faqs::COLLECTION,
        kind: Faqs::KIND,
    },
    SectionInfo {
        name: "team",
        collection: Team::COLLECTION,
        kind: Team::KIND,
    },
    SectionInfo {
        name: "contact",
        collection: Contact::COLLECTION,
        kind: Contact::KIND,
    },
];

/// Look up a section by its logical name
pub fn section_info(name: &str) -> Option<&'static SectionInfo> {
    REGISTRY.iter().find(|info| info.name == name)
}

/// Anything with an explicit display order
pub trait Ordered {
    fn order(&self) -> i64;
}

/// Sort by `order` ascending; ties keep their original position
pub fn sort_by_order<T: Ordered>(items: &mut [T]) {
    items.sort_by_key(|item| item.order());
}

// ==================== Singleton sections ====================

/// Landing hero section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub cta_label: String,
    #[serde(default)]
    pub cta_url: String,
    #[serde(default)]
    pub image_url: String,
}

impl Section for Hero {
    const COLLECTION: &'static str = "hero";
    const KIND: SectionKind = SectionKind::Singleton;
}

/// Services section: a heading plus an ordered list of offerings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Services {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub items: Vec<ServiceItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServiceItem {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon_url: String,
    #[serde(default)]
    pub order: i64,
}

impl Section for Services {
    const COLLECTION: &'static str = "services";
    const KIND: SectionKind = SectionKind::Singleton;
}

impl Ordered for ServiceItem {
    fn order(&self) -> i64 {
        self.order
    }
}

/// FAQ section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Faqs {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub items: Vec<FaqItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FaqItem {
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub order: i64,
}

impl Section for Faqs {
    const COLLECTION: &'static str = "faqs";
    const KIND: SectionKind = SectionKind::Singleton;
}

impl Ordered for FaqItem {
    fn order(&self) -> i64 {
        self.order
    }
}

/// Team section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub members: Vec<TeamMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub photo_url: String,
    #[serde(default)]
    pub order: i64,
}

impl Section for Team {
    const COLLECTION: &'static str = "team";
    const KIND: SectionKind = SectionKind::Singleton;
}

impl Ordered for TeamMember {
    fn order(&self) -> i64 {
        self.order
    }
}

/// Contact section with ordered social links
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub social_links: Vec<SocialLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    pub label: String,
    pub url: String,
    #[serde(default)]
    pub order: i64,
}

impl Section for Contact {
    const COLLECTION: &'static str = "contact";
    const KIND: SectionKind = SectionKind::Singleton;
}

impl Ordered for SocialLink {
    fn order(&self) -> i64 {
        self.order
    }
}

// ==================== Entry sections ====================

/// A portfolio project, one document per project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub link_url: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Section for Project {
    const COLLECTION: &'static str = "projects";
    const KIND: SectionKind = SectionKind::Collection;
}

impl Ordered for Project {
    fn order(&self) -> i64 {
        self.order
    }
}

/// A client testimonial, one document per quote
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    #[serde(default)]
    pub id: String,
    pub author: String,
    #[serde(default)]
    pub role: String,
    pub quote: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Section for Testimonial {
    const COLLECTION: &'static str = "testimonials";
    const KIND: SectionKind = SectionKind::Collection;
}

impl Ordered for Testimonial {
    fn order(&self) -> i64 {
        self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_registry_lookup() {
        let info = section_info("projects").unwrap();
        assert_eq!(info.collection, "projects");
        assert_eq!(info.kind, SectionKind::Collection);

        let info = section_info("hero").unwrap();
        assert_eq!(info.kind, SectionKind::Singleton);

        assert!(section_info("nonsense").is_none());
    }

    #[test]
    fn test_registry_names_are_unique() {
        for (i, a) in REGISTRY.iter().enumerate() {
            for b in &REGISTRY[i + 1..] {
                assert_ne!(a.name, b.name);
                assert_ne!(a.collection, b.collection);
            }
        }
    }

    #[test]
    fn test_hero_decodes_camel_case() {
        let hero: Hero = serde_json::from_value(json!({
            "title": "Build with us",
            "subtitle": "We ship",
            "ctaLabel": "Get started",
            "ctaUrl": "/contact",
            "imageUrl": "https://img.example/hero.png"
        }))
        .unwrap();
        assert_eq!(hero.title, "Build with us");
        assert_eq!(hero.cta_label, "Get started");
    }

    #[test]
    fn test_services_items_default_empty() {
        let services: Services = serde_json::from_value(json!({ "heading": "What we do" })).unwrap();
        assert!(services.items.is_empty());
    }

    #[test]
    fn test_project_serializes_camel_case() {
        let project = Project {
            title: "Brochure site".to_string(),
            image_url: "https://img.example/p.png".to_string(),
            order: 3,
            ..Default::default()
        };
        let value = serde_json::to_value(&project).unwrap();
        assert_eq!(value["imageUrl"], json!("https://img.example/p.png"));
        assert_eq!(value["order"], json!(3));
        // Unset creation timestamp is omitted, not serialized as null
        assert!(value.get("createdAt").is_none());
    }

    #[test]
    fn test_sort_by_order_is_stable() {
        let mut items = vec![
            FaqItem {
                question: "b".to_string(),
                order: 1,
                ..Default::default()
            },
            FaqItem {
                question: "c".to_string(),
                order: 0,
                ..Default::default()
            },
            FaqItem {
                question: "a".to_string(),
                order: 1,
                ..Default::default()
            },
        ];
        sort_by_order(&mut items);
        let questions: Vec<_> = items.iter().map(|i| i.question.as_str()).collect();
        // Ties (b, a at order 1) keep their original relative position
        assert_eq!(questions, vec!["c", "b", "a"]);
    }
}
