//! Normalization from the two storefront product layouts to
//! [`quickview_core::Product`].

use std::str::FromStr;

use quickview_core::{Product, ProductOption, Variant, VariantId};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::StorefrontError;
use crate::types::{CatalogOption, JsProduct, JsVariant, JsonProduct, JsonVariant};

/// Normalizes a product from the `.json` layout.
///
/// # Errors
///
/// Returns [`StorefrontError::Normalization`] if the product has no
/// variants, a price is not a decimal, or a variant lacks a value for one
/// of the product's options.
pub fn normalize_json_product(product: JsonProduct) -> Result<Product, StorefrontError> {
    let handle = product.handle;
    if product.variants.is_empty() {
        return Err(no_variants(&handle));
    }

    let options = normalize_options(product.options);

    let variants = product
        .variants
        .into_iter()
        .map(|v| normalize_json_variant(v, &options, &handle))
        .collect::<Result<Vec<_>, _>>()?;

    let image_url = product
        .image
        .map(|i| i.src)
        .or_else(|| product.images.into_iter().next().map(|i| i.src))
        .map(|src| absolute_image_url(&src));

    // The .json layout has no product-level price; show the first variant's.
    let price = variants.first().map_or(0, |v| v.price);

    Ok(Product {
        id: product.id,
        handle,
        title: product.title,
        description: product.body_html.filter(|s| !s.is_empty()),
        image_url,
        price,
        options,
        variants,
    })
}

/// Normalizes a product from the `.js` layout.
///
/// # Errors
///
/// Returns [`StorefrontError::Normalization`] if the product has no
/// variants or a variant's `options` array is shorter than the product's
/// option list.
pub fn normalize_js_product(product: JsProduct) -> Result<Product, StorefrontError> {
    let handle = product.handle;
    if product.variants.is_empty() {
        return Err(no_variants(&handle));
    }

    let options = normalize_options(product.options);

    let variants = product
        .variants
        .into_iter()
        .map(|v| normalize_js_variant(v, &options, &handle))
        .collect::<Result<Vec<_>, _>>()?;

    let price = product
        .price
        .or_else(|| variants.first().map(|v| v.price))
        .unwrap_or(0);

    Ok(Product {
        id: product.id,
        handle,
        title: product.title,
        description: product.description.filter(|s| !s.is_empty()),
        image_url: product
            .featured_image
            .filter(|s| !s.is_empty())
            .map(|src| absolute_image_url(&src)),
        price,
        options,
        variants,
    })
}

/// Orders options by their 1-based catalog position and rewrites
/// `position` as the 0-based slot index. Options without a position keep
/// their array order after any positioned ones.
fn normalize_options(options: Vec<CatalogOption>) -> Vec<ProductOption> {
    let mut indexed: Vec<(u32, usize, CatalogOption)> = options
        .into_iter()
        .enumerate()
        .map(|(idx, o)| (o.position.unwrap_or(u32::MAX), idx, o))
        .collect();
    indexed.sort_by_key(|(pos, idx, _)| (*pos, *idx));

    indexed
        .into_iter()
        .enumerate()
        .map(|(slot, (_, _, o))| ProductOption {
            name: o.name,
            values: o.values,
            position: slot,
        })
        .collect()
}

fn normalize_json_variant(
    variant: JsonVariant,
    options: &[ProductOption],
    handle: &str,
) -> Result<Variant, StorefrontError> {
    let price = parse_decimal_price(&variant.price).ok_or_else(|| {
        StorefrontError::Normalization {
            handle: handle.to_owned(),
            reason: format!("variant {} has unparseable price \"{}\"", variant.id, variant.price),
        }
    })?;

    let slots = variant.option_slots();
    let values = options
        .iter()
        .map(|option| {
            slots
                .get(option.position)
                .copied()
                .flatten()
                .map(str::to_owned)
                .ok_or_else(|| missing_value(handle, variant.id, &option.name))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Variant {
        id: VariantId(variant.id),
        title: variant.title,
        price,
        available: variant.available,
        options: values,
    })
}

fn normalize_js_variant(
    variant: JsVariant,
    options: &[ProductOption],
    handle: &str,
) -> Result<Variant, StorefrontError> {
    if let Some(option) = options.get(variant.options.len()) {
        return Err(missing_value(handle, variant.id, &option.name));
    }

    let mut values = variant.options;
    values.truncate(options.len());

    Ok(Variant {
        id: VariantId(variant.id),
        title: variant.title,
        price: variant.price,
        available: variant.available,
        options: values,
    })
}

/// Parses a decimal price string (`"27.00"`, `"27"`) into minor units.
fn parse_decimal_price(raw: &str) -> Option<i64> {
    let amount = Decimal::from_str(raw.trim()).ok()?;
    (amount * Decimal::ONE_HUNDRED).round().to_i64()
}

/// Protocol-relative image URLs (`//cdn...`) are given an `https:` scheme.
fn absolute_image_url(src: &str) -> String {
    if src.starts_with("//") {
        format!("https:{src}")
    } else {
        src.to_owned()
    }
}

fn no_variants(handle: &str) -> StorefrontError {
    StorefrontError::Normalization {
        handle: handle.to_owned(),
        reason: "product has no variants".into(),
    }
}

fn missing_value(handle: &str, variant_id: u64, option: &str) -> StorefrontError {
    StorefrontError::Normalization {
        handle: handle.to_owned(),
        reason: format!("variant {variant_id} has no value for option \"{option}\""),
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
