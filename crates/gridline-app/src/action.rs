// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{KeySymbol, RowSelection};
use serde_json::{Map, Value, json};

pub type Payload = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    RowSelected,
    Keypress,
    Back,
    NavigateBack,
}

impl ActionKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RowSelected => "rowSelected",
            Self::Keypress => "keypress",
            Self::Back => "back",
            Self::NavigateBack => "navigate_back",
        }
    }
}

/// A controller-originated event handed to the host's action callback.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionEvent {
    pub kind: ActionKind,
    pub payload: Payload,
}

/// The host's answer to an action. Only the help key cares: a claimed
/// help keypress suppresses the built-in help toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Claim {
    Claimed,
    #[default]
    Declined,
}

impl ActionEvent {
    pub fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    pub fn keypress(key: KeySymbol) -> Self {
        let mut payload = Payload::new();
        payload.insert("key".to_owned(), Value::String(key.label()));
        Self {
            kind: ActionKind::Keypress,
            payload,
        }
    }

    pub fn row_selected(selection: &RowSelection) -> Self {
        let payload = match serde_json::to_value(selection) {
            Ok(Value::Object(map)) => map,
            _ => Payload::new(),
        };
        Self {
            kind: ActionKind::RowSelected,
            payload,
        }
    }

    pub fn back(from: &str, to: Option<&str>) -> Self {
        Self::navigation(ActionKind::Back, from, to)
    }

    pub fn navigate_back(from: &str, to: Option<&str>) -> Self {
        Self::navigation(ActionKind::NavigateBack, from, to)
    }

    fn navigation(kind: ActionKind, from: &str, to: Option<&str>) -> Self {
        let payload = match json!({ "from": from, "to": to }) {
            Value::Object(map) => map,
            _ => Payload::new(),
        };
        Self { kind, payload }
    }

    pub fn key(&self) -> Option<&str> {
        self.payload.get("key").and_then(Value::as_str)
    }

    pub fn row_index(&self) -> Option<usize> {
        self.payload
            .get("index")
            .and_then(Value::as_u64)
            .and_then(|index| usize::try_from(index).ok())
    }

    pub fn field(&self, header: &str) -> Option<&str> {
        self.payload
            .get("fields")
            .and_then(|fields| fields.get(header))
            .and_then(Value::as_str)
    }
}
