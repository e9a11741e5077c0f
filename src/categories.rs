//! Static category registry: the classification table is fixed at build time
//! and never mutated at runtime.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Whether a category counts against or towards the balance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Expense,
    Income,
}

/// Categorises transactions for aggregation and display.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub kind: TransactionType,
}

/// Fallback id used when an imported row resolves to no known category.
pub const DEFAULT_CATEGORY_ID: &str = "exp_ocio";

const fn expense(id: &'static str, name: &'static str, icon: &'static str, color: &'static str) -> Category {
    Category {
        id,
        name,
        icon,
        color,
        kind: TransactionType::Expense,
    }
}

const fn income(id: &'static str, name: &'static str, icon: &'static str, color: &'static str) -> Category {
    Category {
        id,
        name,
        icon,
        color,
        kind: TransactionType::Income,
    }
}

pub static EXPENSE_CATEGORIES: &[Category] = &[
    expense("exp_asesor", "ASESOR", "⚖️", "#FF7043"),
    expense("exp_sustituciones", "SUSTITUCIONES", "🔄", "#FFA726"),
    expense("exp_loteria", "LOTERIA", "🎰", "#AB47BC"),
    expense("exp_bicicleta", "BICICLETA", "🚲", "#26C6DA"),
    expense("exp_salud", "SALUD", "🏥", "#EF5350"),
    expense("exp_coche", "COCHE", "🚗", "#78909C"),
    expense("exp_restaurante", "RESTAURANTE", "🍴", "#FFCA28"),
    expense("exp_ocio", "OCIO", "🎭", "#5C6BC0"),
    expense("exp_impuestos", "IMPUESTOS", "💸", "#8D6E63"),
    expense("exp_viajes", "VIAJES", "✈️", "#42A5F5"),
    expense("exp_ropa", "ROPA", "👕", "#EC407A"),
];

pub static INCOME_CATEGORIES: &[Category] = &[
    income("inc_minuta", "MINUTA", "📄", "#66BB6A"),
    income("inc_sustituciones", "SUSTITUCIONES", "🔄", "#9CCC65"),
    income("inc_costas", "COSTAS", "🏛️", "#26A69A"),
    income("inc_turnos", "TURNOS", "📅", "#29B6F6"),
    income("inc_devoluciones", "DEVOLUCIONES", "💰", "#7E57C2"),
];

pub static ALL_CATEGORIES: Lazy<Vec<&'static Category>> = Lazy::new(|| {
    EXPENSE_CATEGORIES
        .iter()
        .chain(INCOME_CATEGORIES.iter())
        .collect()
});

/// Exact-id lookup. Unknown ids are not an error; callers degrade gracefully.
pub fn category_by_id(id: &str) -> Option<&'static Category> {
    ALL_CATEGORIES.iter().copied().find(|c| c.id == id)
}

/// Case-insensitive display-name lookup, used by the import fallback path.
/// Expense names shadow income names on collision (registry order).
pub fn category_by_name(name: &str) -> Option<&'static Category> {
    ALL_CATEGORIES
        .iter()
        .copied()
        .find(|c| c.name.eq_ignore_ascii_case(name))
}

/// The fixed fallback category for unresolvable imports.
pub fn default_category() -> &'static Category {
    category_by_id(DEFAULT_CATEGORY_ID).unwrap()
}
