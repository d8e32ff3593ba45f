//! Pure operations on the items of a shopping list.
//!
//! Item names are compared after trimming and lower-casing, and a list never
//! holds two items with the same name.

use crate::model::ShoppingItem;

use super::model::ItemInput;

pub fn normalize_name(name: &str) -> String {
	name.trim().to_lowercase()
}

/// Normalizes incoming items, dropping blank names and repeated names after
/// the first. Items not marked otherwise are unpurchased.
pub fn normalize(items: Vec<ItemInput>) -> Vec<ShoppingItem> {
	let mut normalized: Vec<ShoppingItem> = Vec::with_capacity(items.len());

	for item in items {
		let name = normalize_name(&item.name);

		if name.is_empty() || normalized.iter().any(|i| i.name == name) {
			continue;
		}

		normalized.push(ShoppingItem {
			name,
			quantity: item.quantity.trim().to_owned(),
			purchased: item.purchased.unwrap_or(false),
		});
	}

	normalized
}

/// Adds the items whose names are not on the list yet, keeping the existing ones untouched.
pub fn append(list: &mut Vec<ShoppingItem>, items: Vec<ShoppingItem>) {
	for item in items {
		if !list.iter().any(|i| i.name == item.name) {
			list.push(item);
		}
	}
}

/// Sets the purchased flag of every listed item named in `items`, returning
/// how many were changed. Names not on the list are ignored, and an item
/// without an explicit flag is marked purchased.
pub fn mark_purchased(list: &mut [ShoppingItem], items: &[ItemInput]) -> usize {
	let mut changed = 0;

	for update in items {
		let name = normalize_name(&update.name);
		let purchased = update.purchased.unwrap_or(true);

		if let Some(item) = list.iter_mut().find(|i| i.name == name) {
			if item.purchased != purchased {
				item.purchased = purchased;
				changed += 1;
			}
		}
	}

	changed
}
