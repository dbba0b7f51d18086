//! Input events and their application to form state.
//!
//! Widgets report edits as an event carrying the field's dotted path and
//! the raw value. Before storage the value may be coerced (text inputs
//! backed by numeric fields, checkboxes with a fixed polarity), and a
//! select input's chosen option may cascade into further edits.

use crate::form::{set_path_value, Edit, FormValue, Leaf};

/// An edit reported by an input widget. `name` carries the dotted path of
/// the edited field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
    pub name: String,
    pub value: Leaf,
}

impl InputEvent {
    pub fn new(name: impl Into<String>, value: impl Into<Leaf>) -> Self {
        InputEvent {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// How a raw input value is converted before storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Coercion {
    /// Store the value as reported.
    #[default]
    Unchanged,

    /// Parse string values as integers.
    Number,

    /// Store the given boolean regardless of the reported value.
    Force(bool),
}

/// Applies `coercion` to a raw input value.
///
/// A string that fails to parse as an integer is stored unchanged so
/// validation can flag the field instead of the value silently changing.
pub fn coerce(value: Leaf, coercion: Coercion) -> Leaf {
    match coercion {
        Coercion::Unchanged => value,
        Coercion::Force(fixed) => Leaf::Bool(fixed),
        Coercion::Number => match value {
            Leaf::Int(_) => value,
            Leaf::Bool(value) => Leaf::Int(i64::from(value)),
            Leaf::Str(text) => match text.trim().parse::<i64>() {
                Ok(number) => Leaf::Int(number),
                Err(_) => Leaf::Str(text),
            },
        },
    }
}

/// One choice offered by a select input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Stored value when this option is chosen.
    pub value: Leaf,

    /// Human-readable label.
    pub name: String,

    /// Follow-up edits applied after the primary one.
    pub also_set: Vec<AlsoSet>,
}

impl SelectOption {
    pub fn new(value: impl Into<Leaf>, name: impl Into<String>) -> Self {
        SelectOption {
            value: value.into(),
            name: name.into(),
            also_set: Vec::new(),
        }
    }

    pub fn also_set(mut self, path: impl Into<String>, value: Edit) -> Self {
        self.also_set.push(AlsoSet {
            path: path.into(),
            value,
        });
        self
    }
}

/// A secondary edit carried by a [`SelectOption`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlsoSet {
    pub path: String,
    pub value: Edit,
}

/// Applies one input event to `root` and returns the replacement tree.
///
/// The primary edit is applied first. If the stored value matches one of
/// `options`, that option's `also_set` edits are then folded over the
/// result in list order, so each cascade step sees the previous one.
pub fn apply_input(
    root: &FormValue,
    event: &InputEvent,
    coercion: Coercion,
    options: &[SelectOption],
) -> FormValue {
    let value = coerce(event.value.clone(), coercion);
    let mut next = set_path_value(root, &event.name, &Edit::Set(value.clone()));

    if let Some(option) = options.iter().find(|option| option.value == value) {
        for also in &option.also_set {
            next = set_path_value(&next, &also.path, &also.value);
        }
    }

    next
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn tree(value: serde_json::Value) -> FormValue {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_coerce_unchanged() {
        assert_eq!(
            coerce(Leaf::from("8443"), Coercion::Unchanged),
            Leaf::from("8443"),
        );
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce(Leaf::from("8443"), Coercion::Number), Leaf::Int(8443));
        assert_eq!(coerce(Leaf::from(" 17 "), Coercion::Number), Leaf::Int(17));
        assert_eq!(coerce(Leaf::Int(4), Coercion::Number), Leaf::Int(4));
        assert_eq!(coerce(Leaf::Bool(true), Coercion::Number), Leaf::Int(1));
    }

    #[test]
    fn test_coerce_number_keeps_unparseable_text() {
        assert_eq!(
            coerce(Leaf::from("not-a-port"), Coercion::Number),
            Leaf::from("not-a-port"),
        );
    }

    #[test]
    fn test_coerce_force() {
        assert_eq!(coerce(Leaf::from("on"), Coercion::Force(true)), Leaf::Bool(true));
        assert_eq!(coerce(Leaf::Bool(true), Coercion::Force(false)), Leaf::Bool(false));
    }

    #[test]
    fn test_apply_input_plain() {
        let root = tree(json!({"dataToSubmit": {"name": "old"}}));

        let next = apply_input(
            &root,
            &InputEvent::new("dataToSubmit.name", "new"),
            Coercion::Unchanged,
            &[],
        );

        assert_eq!(next, tree(json!({"dataToSubmit": {"name": "new"}})));
    }

    #[test]
    fn test_also_set_cascade_ordering() {
        let root = tree(json!({
            "dataToSubmit": {
                "private_key_id": -1,
                "algorithm_value": "ecdsap256"
            }
        }));

        // choosing an existing key clears the algorithm selection
        let options = vec![
            SelectOption::new(3_i64, "existing key (id 3)")
                .also_set("dataToSubmit.algorithm_value", Edit::Unset),
            SelectOption::new(-1_i64, "Generate New Key")
                .also_set("dataToSubmit.algorithm_value", Edit::set("")),
        ];

        let next = apply_input(
            &root,
            &InputEvent::new("dataToSubmit.private_key_id", "3"),
            Coercion::Number,
            &options,
        );

        assert_eq!(
            next,
            tree(json!({"dataToSubmit": {"private_key_id": 3}})),
        );
    }

    #[test]
    fn test_also_set_folds_sequentially() {
        let root = FormValue::default();

        let options = vec![SelectOption::new("custom", "Custom")
            .also_set("nested.first", Edit::set(1_i64))
            .also_set("nested.second", Edit::set(2_i64))];

        let next = apply_input(
            &root,
            &InputEvent::new("mode", "custom"),
            Coercion::Unchanged,
            &options,
        );

        assert_eq!(
            next,
            tree(json!({"mode": "custom", "nested": {"first": 1, "second": 2}})),
        );
    }

    #[test]
    fn test_unmatched_option_applies_primary_only() {
        let root = FormValue::default();

        let options =
            vec![SelectOption::new("a", "A").also_set("other", Edit::set("cascade"))];

        let next = apply_input(
            &root,
            &InputEvent::new("mode", "b"),
            Coercion::Unchanged,
            &options,
        );

        assert_eq!(next, tree(json!({"mode": "b"})));
    }
}
