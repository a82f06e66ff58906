//! Product transformation, including variant synthesis and gallery rules.

use omnisend_bridge_core::{StockStatus, epoch_to_iso8601};

use crate::omnisend::{Product, ProductVariant, ViewedProduct, ViewedProductEvent};
use crate::surecart;
use crate::transform::category;

/// Transform a SureCart product into an Omnisend product.
///
/// Products without variants get a single synthetic variant built from the
/// product itself, since Omnisend requires at least one.
#[must_use]
pub fn transform_product(product: &surecart::Product) -> Product {
    Product {
        id: product.id.clone(),
        title: product.name.clone(),
        status: product.stock_status().as_str().to_owned(),
        currency: product.metrics.currency.to_uppercase(),
        description: product.description.clone(),
        url: product.permalink.clone(),
        default_image_url: product.featured_image_url().map(str::to_owned),
        images: gallery_images(product),
        category_ids: product
            .product_collections
            .data
            .iter()
            .map(|c| c.id.clone())
            .collect(),
        created_at: epoch_to_iso8601(product.created_at),
        updated_at: epoch_to_iso8601(product.updated_at),
        variants: transform_variants(product),
    }
}

/// Transform a page of products.
#[must_use]
pub fn transform_products(products: &[surecart::Product]) -> Vec<Product> {
    products.iter().map(transform_product).collect()
}

/// Viewed-product event properties. Unlike the catalog mapping, the archived
/// flag does not factor into the status here; a buyer is looking at the page
/// either way.
#[must_use]
pub fn viewed_product_event(product: &surecart::Product) -> ViewedProductEvent {
    let status = if product.has_unlimited_stock() || product.available_stock > 0 {
        StockStatus::InStock
    } else {
        StockStatus::OutOfStock
    };

    ViewedProductEvent {
        product: ViewedProduct {
            id: product.id.clone(),
            title: product.name.clone(),
            status: status.as_str().to_owned(),
            currency: product.metrics.currency.to_uppercase(),
            price: product.metrics.min_price_amount.to_decimal(),
            image_url: product.featured_image_url().map(str::to_owned),
            url: product.permalink.clone(),
            categories: product
                .product_collections
                .data
                .iter()
                .map(category::event_category)
                .collect(),
        },
    }
}

fn transform_variants(product: &surecart::Product) -> Vec<ProductVariant> {
    let variants = &product.variants.data;

    if variants.is_empty() {
        return vec![ProductVariant {
            id: product.id.clone(),
            title: product.name.clone(),
            status: product.stock_status().as_str().to_owned(),
            price: product.metrics.min_price_amount.to_decimal(),
            sku: product.sku.clone(),
            description: product.description.clone(),
            url: product.permalink.clone(),
            default_image_url: product.featured_image_url().map(str::to_owned),
        }];
    }

    variants
        .iter()
        .map(|variant| {
            let title = variant.option_1.as_ref().map_or_else(
                || product.name.clone(),
                |option| format!("{} - {option}", product.name),
            );

            ProductVariant {
                id: variant.id.clone(),
                title,
                status: product.variant_stock_status(variant).as_str().to_owned(),
                price: variant.amount.to_decimal(),
                sku: variant.sku.clone(),
                description: product.description.clone(),
                url: product.permalink.clone(),
                default_image_url: None,
            }
        })
        .collect()
}

/// Gallery images beyond the featured one. A single-image gallery adds
/// nothing over the default image, so it is skipped entirely.
fn gallery_images(product: &surecart::Product) -> Vec<String> {
    if product.gallery.len() <= 1 {
        return Vec::new();
    }

    let featured = product.featured_image_url();

    product
        .gallery
        .iter()
        .filter_map(|image| image.src.as_deref())
        .filter(|src| Some(*src) != featured)
        .map(str::to_owned)
        .collect()
}
