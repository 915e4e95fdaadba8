//! Wire models of the notes service.

use serde::{Deserialize, Serialize};

/// A memo category.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
}

/// Light memo entry used in listings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct MemoSummary {
    pub id: u64,
    pub title: String,
}

/// Full memo.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Memo {
    pub id: u64,
    pub category_id: u64,
    pub title: String,
    pub content: String,
}

/// Body of memo create and update calls.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct MemoParams {
    pub category_id: u64,
    pub title: String,
    pub content: String,
}

impl From<&Memo> for MemoParams {
    fn from(memo: &Memo) -> Self {
        Self {
            category_id: memo.category_id,
            title: memo.title.clone(),
            content: memo.content.clone(),
        }
    }
}
