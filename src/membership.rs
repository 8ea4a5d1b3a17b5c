//! # Membership Gate Module
//!
//! Restricts the bot to users subscribed to a configured channel. The gate
//! fails closed: if the provider cannot be asked, the user is treated as a
//! non-member.

use std::sync::Arc;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, ChatMemberKind, Recipient, UserId};
use tracing::{debug, error};

/// A user's status in the required channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStatus {
    Creator,
    Administrator,
    Member,
    Restricted,
    Left,
    Banned,
}

impl MemberStatus {
    /// Whether this status grants access to the bot
    pub fn grants_access(self) -> bool {
        matches!(
            self,
            MemberStatus::Creator | MemberStatus::Administrator | MemberStatus::Member
        )
    }
}

impl From<&ChatMemberKind> for MemberStatus {
    fn from(kind: &ChatMemberKind) -> Self {
        match kind {
            ChatMemberKind::Owner { .. } => MemberStatus::Creator,
            ChatMemberKind::Administrator { .. } => MemberStatus::Administrator,
            ChatMemberKind::Member { .. } => MemberStatus::Member,
            ChatMemberKind::Restricted { .. } => MemberStatus::Restricted,
            ChatMemberKind::Banned { .. } => MemberStatus::Banned,
            _ => MemberStatus::Left,
        }
    }
}

/// Source of channel membership information
#[async_trait]
pub trait MembershipSource: Send + Sync {
    async fn member_status(&self, user_id: UserId) -> anyhow::Result<MemberStatus>;
}

/// Membership lookups through the Telegram Bot API
#[derive(Clone)]
pub struct TelegramMembership {
    bot: Bot,
    channel: Recipient,
}

impl TelegramMembership {
    pub fn new(bot: Bot, channel: &str) -> Self {
        Self {
            bot,
            channel: channel_recipient(channel),
        }
    }
}

#[async_trait]
impl MembershipSource for TelegramMembership {
    async fn member_status(&self, user_id: UserId) -> anyhow::Result<MemberStatus> {
        let member = self
            .bot
            .get_chat_member(self.channel.clone(), user_id)
            .await?;
        Ok(MemberStatus::from(&member.kind))
    }
}

/// Parse a channel identifier: numeric chat ids become `Recipient::Id`,
/// anything else is treated as a public `@username`
pub fn channel_recipient(channel: &str) -> Recipient {
    let channel = channel.trim();
    match channel.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) if channel.starts_with('@') => Recipient::ChannelUsername(channel.to_string()),
        Err(_) => Recipient::ChannelUsername(format!("@{channel}")),
    }
}

/// Public invite link for a `@username` channel
///
/// Numeric chat ids have no public link, so `None` is returned for them.
pub fn channel_join_url(channel: &str) -> Option<String> {
    let name = channel.trim().trim_start_matches('@');
    if name.is_empty() || name.parse::<i64>().is_ok() {
        return None;
    }
    Some(format!("https://t.me/{name}"))
}

/// Fail-closed membership check
#[derive(Clone)]
pub struct MembershipGate {
    source: Arc<dyn MembershipSource>,
}

impl MembershipGate {
    pub fn new(source: Arc<dyn MembershipSource>) -> Self {
        Self { source }
    }

    /// True iff the user is a member, administrator or creator
    pub async fn is_member(&self, user_id: UserId) -> bool {
        match self.source.member_status(user_id).await {
            Ok(status) => {
                debug!(user_id = %user_id, status = ?status, "Checked channel membership");
                status.grants_access()
            }
            Err(e) => {
                error!(user_id = %user_id, error = %e, "Failed to check channel membership");
                false
            }
        }
    }
}
