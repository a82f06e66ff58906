//! Product collection to category transformation.

use crate::omnisend::{Category, ProductCategory};
use crate::surecart::Collection;

/// Transform a SureCart collection into an Omnisend category.
#[must_use]
pub fn transform_category(collection: &Collection) -> Category {
    Category {
        category_id: collection.id.clone(),
        title: collection.name.clone(),
    }
}

/// Transform a page of collections.
#[must_use]
pub fn transform_categories(collections: &[Collection]) -> Vec<Category> {
    collections.iter().map(transform_category).collect()
}

/// Category reference embedded in event line items.
#[must_use]
pub fn event_category(collection: &Collection) -> ProductCategory {
    ProductCategory {
        id: collection.id.clone(),
        title: collection.name.clone(),
    }
}
