//! Line item transformation for cart, checkout, and order events.

use crate::omnisend;
use crate::surecart::LineItem;
use crate::transform::category;

/// Transform a line item for cart and started-checkout events.
///
/// The item keeps its own id; the variant id falls back to the product id
/// when the buyer never picked a variant.
#[must_use]
pub fn transform_cart_item(item: &LineItem) -> omnisend::LineItem {
    let product = &item.price.product;

    omnisend::LineItem {
        id: item.id.clone(),
        title: product.name.clone(),
        price: item.total_amount.to_decimal(),
        quantity: item.quantity,
        discount: item.discount_amount.to_decimal_abs(),
        description: product.description.clone(),
        sku: product.sku.clone(),
        url: product.permalink.clone(),
        image_url: product.featured_image_url().map(str::to_owned),
        strike_through_price: Some(item.full_amount.to_decimal()),
        variant_id: Some(variant_id(item)),
        variant_title: None,
        variant_image_url: None,
        weight: None,
        categories: event_categories(item),
    }
}

/// Transform a line item for order lifecycle events.
///
/// Order events identify items by product id, carry the weight, and name
/// the chosen variant through the first variant option.
#[must_use]
pub fn transform_order_item(item: &LineItem) -> omnisend::LineItem {
    let product = &item.price.product;
    let image = product.featured_image_url().map(str::to_owned);

    let (variant_id, variant_title) = match &item.variant {
        None => (product.id.clone(), Some(product.name.clone())),
        Some(variant) => (
            variant.id().to_owned(),
            item.variant_options.first().cloned(),
        ),
    };

    omnisend::LineItem {
        id: product.id.clone(),
        title: product.name.clone(),
        price: item.total_amount.to_decimal(),
        quantity: item.quantity,
        discount: item.discount_amount.to_decimal_abs(),
        description: product.description.clone(),
        sku: product.sku.clone(),
        url: product.permalink.clone(),
        image_url: image.clone(),
        strike_through_price: None,
        variant_id: Some(variant_id),
        variant_title,
        variant_image_url: image,
        weight: product.weight,
        categories: event_categories(item),
    }
}

fn variant_id(item: &LineItem) -> String {
    item.variant.as_ref().map_or_else(
        || item.price.product.id.clone(),
        |variant| variant.id().to_owned(),
    )
}

fn event_categories(item: &LineItem) -> Vec<omnisend::ProductCategory> {
    item.price
        .product
        .product_collections
        .data
        .iter()
        .map(category::event_category)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn item(json: serde_json::Value) -> LineItem {
        serde_json::from_value(json).unwrap()
    }

    fn base_json() -> serde_json::Value {
        serde_json::json!({
            "id": "li_1",
            "quantity": 2,
            "total_amount": 3998,
            "full_amount": 4398,
            "discount_amount": -400,
            "price": { "product": {
                "id": "prod_1",
                "name": "Mug",
                "sku": "MUG-1",
                "permalink": "https://shop.example/mug",
                "weight": 0.4,
                "product_collections": { "data": [ { "id": "col_1", "name": "Kitchen" } ] }
            }}
        })
    }

    #[test]
    fn cart_item_keeps_line_item_id() {
        let result = transform_cart_item(&item(base_json()));
        assert_eq!(result.id, "li_1");
        assert_eq!(result.variant_id.as_deref(), Some("prod_1"));
        assert_eq!(result.price, Decimal::new(3998, 2));
        assert_eq!(result.strike_through_price, Some(Decimal::new(4398, 2)));
        assert_eq!(result.discount, Decimal::new(400, 2));
    }

    #[test]
    fn order_item_uses_product_id_and_weight() {
        let result = transform_order_item(&item(base_json()));
        assert_eq!(result.id, "prod_1");
        assert_eq!(result.weight, Some(0.4));
        assert_eq!(result.variant_id.as_deref(), Some("prod_1"));
        assert_eq!(result.variant_title.as_deref(), Some("Mug"));
        assert_eq!(result.categories.len(), 1);
    }

    #[test]
    fn order_item_reads_variant_reference() {
        let mut json = base_json();
        json["variant"] = serde_json::json!("var_9");
        json["variant_options"] = serde_json::json!(["Blue"]);
        let result = transform_order_item(&item(json));
        assert_eq!(result.variant_id.as_deref(), Some("var_9"));
        assert_eq!(result.variant_title.as_deref(), Some("Blue"));
    }
}
