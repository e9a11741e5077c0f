//! CSV backup/restore for the transaction list.
//!
//! Export writes a fixed 7-field layout; import is deliberately tolerant
//! because the files come back user-edited or from foreign exports. Every
//! fallback is an explicit branch: row rejection, category resolution order,
//! and short-id regeneration are all spelled out below.

use tracing::warn;

use crate::{
    categories::{category_by_id, category_by_name, default_category, TransactionType},
    ledger::{transaction::fresh_id, Transaction},
    period::parse_iso_date,
};

const HEADER: &str = "ID,Fecha,Tipo,Categoria,Cantidad,Nota,CategoriaID";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Imported ids this short are assumed to be blank/damaged and regenerated,
/// preventing collisions while preserving identity for well-formed exports.
const MIN_VALID_ID_LEN: usize = 6;

/// Renders the list as delimited text: one header line plus one row per
/// transaction. `Tipo` and the category name come from the resolved category;
/// unresolved references export as expense/"Desconocido".
pub fn serialize(transactions: &[Transaction]) -> String {
    let mut lines = Vec::with_capacity(transactions.len() + 1);
    lines.push(HEADER.to_string());
    for transaction in transactions {
        let category = category_by_id(&transaction.category_id);
        let name = category.map(|c| c.name).unwrap_or("Desconocido");
        let tipo = match category.map(|c| c.kind) {
            Some(TransactionType::Income) => "Ingreso",
            _ => "Gasto",
        };
        let note = if transaction.note.is_empty() {
            String::new()
        } else {
            quote(&transaction.note)
        };
        lines.push(format!(
            "{},{},{},{},{},{},{}",
            transaction.id,
            transaction.date.format(DATE_FORMAT),
            tipo,
            quote(name),
            transaction.amount,
            note,
            transaction.category_id,
        ));
    }
    lines.join("\n")
}

/// Parses delimited text back into transactions. Line 0 is always treated as
/// the header. Malformed rows (too few fields, bad amount, bad date) are
/// skipped, never fatal; an empty or header-only input yields an empty list.
pub fn deserialize(text: &str) -> Vec<Transaction> {
    let mut transactions = Vec::new();
    for (index, line) in text.trim().lines().enumerate() {
        if index == 0 || line.trim().is_empty() {
            continue;
        }
        match parse_row(line) {
            Some(transaction) => transactions.push(transaction),
            None => warn!(line = index + 1, "skipping malformed import row"),
        }
    }
    transactions
}

fn parse_row(line: &str) -> Option<Transaction> {
    let cols = split_quoted(line);
    // Layout: [0]id [1]date [2]type [3]category name [4]amount [5]note [6]category id
    if cols.len() < 5 {
        return None;
    }

    let amount: f64 = cols[4].parse().ok()?;
    if !amount.is_finite() || amount < 0.0 {
        return None;
    }

    let date = parse_iso_date(&cols[1]).ok()?;
    let category_id = resolve_category(cols.get(6).map(String::as_str), &cols[3]);

    let id = if cols[0].len() >= MIN_VALID_ID_LEN {
        cols[0].clone()
    } else {
        fresh_id()
    };

    let mut transaction = Transaction::new(amount, category_id, date, "");
    transaction.id = id;
    transaction.note = cols.get(5).cloned().unwrap_or_default();
    Some(transaction)
}

/// Resolution order: (a) the row's own category id when registered, (b) a
/// case-insensitive name match, (c) the fixed default category.
fn resolve_category(category_id: Option<&str>, category_name: &str) -> String {
    if let Some(id) = category_id {
        if category_by_id(id).is_some() {
            return id.to_string();
        }
    }
    if let Some(category) = category_by_name(category_name) {
        return category.id.to_string();
    }
    default_category().id.to_string()
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Splits on commas outside quoted spans, then strips wrapping quotes and
/// collapses doubled quotes in each field.
fn split_quoted(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields.iter().map(|field| unquote(field)).collect()
}

fn unquote(field: &str) -> String {
    let trimmed = field.trim();
    let inner = if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };
    inner.replace("\"\"", "\"")
}
