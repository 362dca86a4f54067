// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Comment entity attached to a host or service (spec.md §3) — both
//! operator-authored comments and the system-generated ones left behind by
//! acknowledgements, downtime, and flap detection.

use serde::{Deserialize, Serialize};

crate::define_numeric_id! {
    pub struct CommentId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentSource {
    /// Submitted directly by an operator via the external command router.
    User,
    /// Left behind automatically (acknowledgement, downtime, flapping).
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Acknowledgement,
    Downtime,
    FlapDetection,
    UserComment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub host_name: String,
    pub service_description: Option<String>,
    pub source: CommentSource,
    pub entry_type: EntryType,
    pub author: String,
    pub text: String,
    pub entry_time: i64,
    pub persistent: bool,
    /// Expires (and should be removed) at this time, if set.
    pub expire_time: Option<i64>,
}

impl Comment {
    pub fn new(
        id: CommentId,
        host_name: impl Into<String>,
        source: CommentSource,
        entry_type: EntryType,
        author: impl Into<String>,
        text: impl Into<String>,
        entry_time: i64,
    ) -> Self {
        Self {
            id,
            host_name: host_name.into(),
            service_description: None,
            source,
            entry_type,
            author: author.into(),
            text: text.into(),
            entry_time,
            persistent: false,
            expire_time: None,
        }
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expire_time.map(|t| now >= t).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_expires_once_past_expire_time() {
        let mut c = Comment::new(
            CommentId::new(1),
            "web1",
            CommentSource::System,
            EntryType::Downtime,
            "ward",
            "downtime started",
            1000,
        );
        assert!(!c.is_expired_at(1500));
        c.expire_time = Some(1500);
        assert!(c.is_expired_at(1500));
    }
}
