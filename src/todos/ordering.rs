use std::{cmp::Ordering, collections::HashMap};

use super::{
    model::{Category, Status, Todo},
    validation::{FieldError, FieldErrorCode, FieldErrors, parse_choice_str},
};

/// Listing order: priority weight desc, deadline asc (undated last),
/// created_at desc, then id so the order is total.
pub fn compare_for_listing(a: &Todo, b: &Todo) -> Ordering {
    b.priority
        .weight()
        .cmp(&a.priority.weight())
        .then_with(|| match (a.deadline, b.deadline) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Optional narrowing of a listing. Owner scoping is applied separately and
/// always.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub status: Option<Status>,
    pub category: Option<Category>,
    pub placed: Option<bool>,
}

impl ListFilter {
    pub fn from_query(params: &HashMap<String, String>) -> Result<Self, FieldErrors> {
        let mut errors = Vec::new();
        let mut filter = Self::default();

        if let Some(raw) = params.get("status") {
            match parse_choice_str::<Status>("status", raw) {
                Ok(status) => filter.status = Some(status),
                Err(mut err) => errors.append(&mut err),
            }
        }
        if let Some(raw) = params.get("category") {
            match parse_choice_str::<Category>("category", raw) {
                Ok(category) => filter.category = Some(category),
                Err(mut err) => errors.append(&mut err),
            }
        }
        if let Some(raw) = params.get("placed") {
            match raw.as_str() {
                "true" => filter.placed = Some(true),
                "false" => filter.placed = Some(false),
                other => errors.push(FieldError::new(
                    "placed",
                    format!("Expected 'true' or 'false', received '{other}'"),
                    FieldErrorCode::InvalidType,
                )),
            }
        }

        if errors.is_empty() {
            Ok(filter)
        } else {
            Err(errors)
        }
    }

    pub fn matches(&self, todo: &Todo) -> bool {
        self.status.is_none_or(|status| todo.status == status)
            && self.category.is_none_or(|category| todo.category == category)
            && self.placed.is_none_or(|placed| todo.pos.is_some() == placed)
    }
}

/// Restricts `records` to `owner_id`, applies `filter`, and sorts.
pub fn owner_listing(records: Vec<Todo>, owner_id: &str, filter: &ListFilter) -> Vec<Todo> {
    let mut visible: Vec<Todo> = records
        .into_iter()
        .filter(|todo| todo.is_owned_by(owner_id) && filter.matches(todo))
        .collect();
    visible.sort_by(compare_for_listing);
    visible
}
