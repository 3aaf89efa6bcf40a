//! Deterministic merging of parameter and value mappings.
//!
//! Two modes are supported:
//! - Shallow: overlay keys replace same-named base keys at the top level only
//! - Deep: nested mappings present on both sides are merged key-wise; any other
//!   combination lets the overlay value replace the base value wholesale
//!
//! Inputs are never modified. The result is a fresh mapping whose key order is
//! the base order followed by keys only present in the overlay.

use serde_yaml::{Mapping, Value};

/// Merge `overlay` onto `base`, recursing into nested mappings when `deep` is set.
pub fn merge(base: &Mapping, overlay: &Mapping, deep: bool) -> Mapping {
	let mut merged = base.clone();
	if deep {
		deep_merge_into(&mut merged, overlay);
	} else {
		for (key, value) in overlay {
			merged.insert(key.clone(), value.clone());
		}
	}
	merged
}

/// Merge two loosely typed values.
///
/// `Null` counts as an empty mapping. Returns `None` if either side is some
/// other non-mapping value.
pub fn merge_values(base: &Value, overlay: &Value, deep: bool) -> Option<Value> {
	let empty = Mapping::new();
	let base = as_mapping_or_empty(base, &empty)?;
	let overlay = as_mapping_or_empty(overlay, &empty)?;
	Some(Value::Mapping(merge(base, overlay, deep)))
}

fn as_mapping_or_empty<'a>(value: &'a Value, empty: &'a Mapping) -> Option<&'a Mapping> {
	match value {
		Value::Mapping(mapping) => Some(mapping),
		Value::Null => Some(empty),
		_ => None,
	}
}

fn deep_merge_into(target: &mut Mapping, overlay: &Mapping) {
	for (key, value) in overlay {
		match (target.get_mut(key), value) {
			(Some(Value::Mapping(existing)), Value::Mapping(incoming)) => {
				deep_merge_into(existing, incoming);
			}
			(Some(slot), _) => *slot = value.clone(),
			(None, _) => {
				target.insert(key.clone(), value.clone());
			}
		}
	}
}
