//! Informational storefront pages.
//!
//! Every store starts with the same six pages, created together with the
//! store record so a store never exists without them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::types::LocalizedText;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Home,
    About,
    Contact,
    Terms,
    Privacy,
    Shipping,
}

impl PageKind {
    /// Creation order of the default page set.
    pub const DEFAULTS: [PageKind; 6] = [
        PageKind::Home,
        PageKind::About,
        PageKind::Contact,
        PageKind::Terms,
        PageKind::Privacy,
        PageKind::Shipping,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            PageKind::Home => "home",
            PageKind::About => "about",
            PageKind::Contact => "contact",
            PageKind::Terms => "terms",
            PageKind::Privacy => "privacy",
            PageKind::Shipping => "shipping",
        }
    }

    fn title(&self) -> LocalizedText {
        match self {
            PageKind::Home => LocalizedText::new("Inicio", "Home"),
            PageKind::About => LocalizedText::new("Sobre nosotros", "About us"),
            PageKind::Contact => LocalizedText::new("Contacto", "Contact"),
            PageKind::Terms => LocalizedText::new("Términos y condiciones", "Terms and conditions"),
            PageKind::Privacy => LocalizedText::new("Política de privacidad", "Privacy policy"),
            PageKind::Shipping => LocalizedText::new("Envíos y entregas", "Shipping and delivery"),
        }
    }

    fn content(&self, store_name: &str) -> LocalizedText {
        match self {
            PageKind::Home => LocalizedText::new(
                format!("Bienvenido a {}", store_name),
                format!("Welcome to {}", store_name),
            ),
            PageKind::About => LocalizedText::new(
                format!("Conoce la historia de {}.", store_name),
                format!("Learn the story behind {}.", store_name),
            ),
            PageKind::Contact => LocalizedText::new(
                "Escríbenos y te responderemos pronto.",
                "Write to us and we will get back to you soon.",
            ),
            PageKind::Terms => LocalizedText::new(
                format!("Términos de uso de {}.", store_name),
                format!("Terms of use for {}.", store_name),
            ),
            PageKind::Privacy => LocalizedText::new(
                format!("Cómo {} protege tus datos.", store_name),
                format!("How {} protects your data.", store_name),
            ),
            PageKind::Shipping => LocalizedText::new(
                "Consulta nuestras opciones de envío y plazos de entrega.",
                "See our shipping options and delivery times.",
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub store_id: String,
    pub kind: PageKind,
    pub slug: String,
    pub title: LocalizedText,
    pub content: LocalizedText,
    pub is_published: bool,
    pub order: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// The baseline page set for a new store, numbered `1..=6`.
pub fn default_pages(store_id: &str, store_name: &str, now: DateTime<Utc>) -> Vec<Page> {
    PageKind::DEFAULTS
        .iter()
        .enumerate()
        .map(|(idx, kind)| Page {
            id: Uuid::new_v4().to_string(),
            store_id: store_id.to_string(),
            kind: *kind,
            slug: kind.slug().to_string(),
            title: kind.title(),
            content: kind.content(store_name),
            is_published: true,
            order: idx as i64 + 1,
            created_at: now,
            updated_at: now,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pages() {
        let pages = default_pages("s1", "Bodega Rosa", Utc::now());

        let slugs: Vec<&str> = pages.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["home", "about", "contact", "terms", "privacy", "shipping"]);
        assert_eq!(pages.iter().map(|p| p.order).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6]);
        assert!(pages.iter().all(|p| p.store_id == "s1" && p.is_published));
        assert!(pages[0].content.es.contains("Bodega Rosa"));

        let mut ids: Vec<&str> = pages.iter().map(|p| p.id.as_str()).collect();
        ids.dedup();
        assert_eq!(ids.len(), 6);
    }
}
