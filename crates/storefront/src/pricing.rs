//! Option pricing resolution and selection validation.
//!
//! [`resolve_unit_price`] is the pure pricing rule: base price plus the
//! deltas of every selected option value, with unknown (option, value)
//! pairs contributing zero. [`validate_selections`] is the stricter gate the
//! cart store applies before a line is inserted; it rejects unknown pairs
//! and cardinality violations instead of truncating them.

use rust_decimal::Decimal;
use thiserror::Error;

use samovar_core::{OptionId, OptionMode, OptionValueId, Price, Product, SelectedOption};

/// A selection set that does not fit the product's option definitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// The selection references an option the product does not have.
    #[error("product '{product}' has no option '{option}'")]
    UnknownOption { product: String, option: OptionId },

    /// The selection references a value the option does not offer.
    #[error("option '{option}' has no value '{value}'")]
    UnknownValue {
        option: OptionId,
        value: OptionValueId,
    },

    /// More than one value selected for a single-choice option.
    #[error("option '{option}' admits exactly one value, got {got}")]
    MultipleForSingle { option: OptionId, got: usize },

    /// The same value selected twice.
    #[error("value '{value}' of option '{option}' selected more than once")]
    DuplicateValue {
        option: OptionId,
        value: OptionValueId,
    },

    /// A multi-choice option exceeded its declared maximum.
    #[error("option '{option}' admits at most {max} values, got {got}")]
    TooManyChoices {
        option: OptionId,
        max: u32,
        got: usize,
    },
}

/// Resolve the unit price of `product` under the given option selections.
///
/// Pure and deterministic: `product.price + Σ price_delta` over every
/// selection found on the product's own option list. Pairs that do not
/// resolve contribute zero rather than erroring; callers that want strict
/// behavior run [`validate_selections`] first, as the cart store does.
#[must_use]
pub fn resolve_unit_price(product: &Product, selections: &[SelectedOption]) -> Price {
    let delta: Decimal = selections
        .iter()
        .filter_map(|s| {
            product
                .option(&s.option_id)
                .and_then(|option| option.value(&s.value_id))
                .map(|value| value.price_delta)
        })
        .sum();

    Price::new(product.price.amount() + delta)
}

/// Check a selection set against the product's option definitions.
///
/// Enforced here: every pair must exist, a `single` option takes at most
/// one value, no value repeats, and a `multiple` option stays within its
/// declared `max_choices`. Whether a `required` option has a selection at
/// all remains a UI concern and is not checked.
///
/// # Errors
///
/// Returns the first violation found.
pub fn validate_selections(
    product: &Product,
    selections: &[SelectedOption],
) -> Result<(), SelectionError> {
    for selection in selections {
        let option =
            product
                .option(&selection.option_id)
                .ok_or_else(|| SelectionError::UnknownOption {
                    product: product.name.clone(),
                    option: selection.option_id.clone(),
                })?;
        if option.value(&selection.value_id).is_none() {
            return Err(SelectionError::UnknownValue {
                option: selection.option_id.clone(),
                value: selection.value_id.clone(),
            });
        }
    }

    for option in &product.options {
        let chosen: Vec<&OptionValueId> = selections
            .iter()
            .filter(|s| s.option_id == option.id)
            .map(|s| &s.value_id)
            .collect();

        if chosen.is_empty() {
            continue;
        }

        for (i, value) in chosen.iter().enumerate() {
            if chosen.iter().skip(i + 1).any(|other| other == value) {
                return Err(SelectionError::DuplicateValue {
                    option: option.id.clone(),
                    value: (*value).clone(),
                });
            }
        }

        match option.mode {
            OptionMode::Single => {
                if chosen.len() > 1 {
                    return Err(SelectionError::MultipleForSingle {
                        option: option.id.clone(),
                        got: chosen.len(),
                    });
                }
            }
            OptionMode::Multiple => {
                if let Some(max) = option.max_choices
                    && chosen.len() > max as usize
                {
                    return Err(SelectionError::TooManyChoices {
                        option: option.id.clone(),
                        max,
                        got: chosen.len(),
                    });
                }
            }
        }
    }

    Ok(())
}
