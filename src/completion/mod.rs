pub mod discover;
pub mod trigger;

pub use discover::discover;
pub use trigger::should_trigger;

use tower_lsp::lsp_types::{CompletionItem, CompletionItemKind, CompletionList};

/// How a discovered member should be presented and inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Method,
    Enum,
}

impl From<MemberKind> for CompletionItemKind {
    fn from(kind: MemberKind) -> Self {
        match kind {
            MemberKind::Field => CompletionItemKind::FIELD,
            MemberKind::Method => CompletionItemKind::METHOD,
            MemberKind::Enum => CompletionItemKind::ENUM,
        }
    }
}

/// One completion record per unique member label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRecord {
    pub label: String,
    pub kind: MemberKind,
    pub insert_text: String,
}

impl MemberRecord {
    pub fn field(label: &str) -> Self {
        MemberRecord {
            label: label.to_string(),
            kind: MemberKind::Field,
            insert_text: label.to_string(),
        }
    }

    pub fn method(label: &str) -> Self {
        MemberRecord {
            label: label.to_string(),
            kind: MemberKind::Method,
            insert_text: format!("{label}()"),
        }
    }

    pub fn enum_like(label: &str) -> Self {
        MemberRecord {
            label: label.to_string(),
            kind: MemberKind::Enum,
            insert_text: label.to_string(),
        }
    }
}

/// Builds the completion response, preserving traversal-discovery order.
/// No alphabetical or relevance sorting is applied; the client renders the
/// list as given.
pub fn to_completion_list(members: Vec<MemberRecord>) -> CompletionList {
    let items = members
        .into_iter()
        .map(|member| CompletionItem {
            label: member.label,
            kind: Some(member.kind.into()),
            insert_text: Some(member.insert_text),
            ..Default::default()
        })
        .collect();
    CompletionList {
        is_incomplete: false,
        items,
    }
}
