/// Catalog service - categories and locations, plus the default set an
/// operator can seed into an empty database.
use crate::db::{category_repo, location_repo};
use crate::error::{AppError, Result};
use crate::models::{Category, Location};
use sqlx::PgPool;

pub const DEFAULT_CATEGORIES: [&str; 8] = [
    "Travel",
    "Tourism",
    "Entertainment",
    "Food",
    "Sport",
    "Technology",
    "Study",
    "Music",
];

pub const DEFAULT_LOCATIONS: [&str; 12] = [
    "Moscow",
    "Saint Petersburg",
    "Omsk",
    "Saratov",
    "Kazan",
    "Novosibirsk",
    "Yekaterinburg",
    "Samara",
    "Nizhny Novgorod",
    "Rostov-on-Don",
    "Krasnodar",
    "Ufa",
];

/// Slugs are limited to 64 characters by the schema.
const MAX_SLUG_LEN: usize = 64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub categories_created: usize,
    pub locations_created: usize,
}

/// Lowercase ASCII letters and digits, everything else collapsed into
/// single hyphens.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if ch == '_' || ch == '-' || ch.is_whitespace() {
            if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
    }
    let slug = slug.trim_end_matches('-');
    slug.chars().take(MAX_SLUG_LEN).collect()
}

pub struct CatalogService {
    pool: PgPool,
}

impl CatalogService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(category_repo::list_published(&self.pool).await?)
    }

    /// A published category; unpublished and unknown slugs are both 404.
    pub async fn get_category(&self, slug: &str) -> Result<Category> {
        category_repo::find_published_by_slug(&self.pool, slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))
    }

    pub async fn list_locations(&self) -> Result<Vec<Location>> {
        Ok(location_repo::list_published(&self.pool).await?)
    }

    /// Insert the default categories and locations that are not there yet.
    pub async fn seed_defaults(&self) -> Result<SeedReport> {
        let mut report = SeedReport::default();

        for title in DEFAULT_CATEGORIES {
            let slug = slugify(title);
            if category_repo::insert_if_missing(&self.pool, title, &slug, "").await? {
                report.categories_created += 1;
            }
        }

        for name in DEFAULT_LOCATIONS {
            if location_repo::insert_if_missing(&self.pool, name).await? {
                report.locations_created += 1;
            }
        }

        tracing::info!(
            categories_created = report.categories_created,
            locations_created = report.locations_created,
            "default catalog seeded"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn slugify_basic_titles() {
        assert_eq!(slugify("Travel"), "travel");
        assert_eq!(slugify("Street Food"), "street-food");
        assert_eq!(slugify("  Rock & Roll!  "), "rock-roll");
    }

    #[test]
    fn slugify_truncates_to_schema_limit() {
        let long = "a".repeat(100);
        assert_eq!(slugify(&long).len(), MAX_SLUG_LEN);
    }

    #[test]
    fn default_category_slugs_are_unique() {
        let slugs: HashSet<String> = DEFAULT_CATEGORIES.iter().map(|t| slugify(t)).collect();
        assert_eq!(slugs.len(), DEFAULT_CATEGORIES.len());
        assert!(slugs.iter().all(|s| !s.is_empty()));
    }
}
