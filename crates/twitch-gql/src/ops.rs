//! Typed operation wrappers over the GQL executor.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::warn;

use crate::client::{transaction_id, GqlClient};
use crate::error::GqlError;
use crate::operation::{templates, RequestTemplate};
use crate::pagination::{paginate_cursor, CursorPage};
use crate::response::{
    decode, AvailableDropsEnvelope, ChannelFollowsData, ChannelPointsContextData,
    ClaimCommunityPointsData, ClaimDropRewardsData, ClaimDropRewardsResult, ClaimMomentData,
    CommunityGoal, ContributeToGoalData, DashboardCampaign, DashboardEnvelope,
    DropCampaignDetails, DropCampaignDetailsData, DropCampaignRef, Inventory, InventoryEnvelope,
    JoinRaidData, MakePredictionData, OperationAck, PlaybackAccessToken, PlaybackAccessTokenData,
    StreamInfoOverlay, UserLookup, UserPointsContributionData,
};

/// Order in which followed channels are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FollowsOrder {
    /// Oldest follow first.
    #[default]
    Asc,
    /// Newest follow first.
    Desc,
}

impl FollowsOrder {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Campaign-details requests are batched in chunks of this size.
const CAMPAIGN_CHUNK_SIZE: usize = 20;

impl GqlClient {
    async fn execute_template<T: DeserializeOwned>(
        &self,
        template: &RequestTemplate,
        variables: Value,
    ) -> Result<T, GqlError> {
        let name = template.operation_name();
        self.execute_single(name, template.build(variables), |value| decode(name, value))
            .await
    }

    /// Stream overlay info for the channel with the given login.
    pub async fn stream_info_overlay(
        &self,
        channel_login: &str,
    ) -> Result<StreamInfoOverlay, GqlError> {
        self.execute_template(
            &templates::VIDEO_PLAYER_STREAM_INFO_OVERLAY_CHANNEL,
            json!({ "channel": channel_login }),
        )
        .await
    }

    /// Resolve a user id from a login name. `None` if no such user exists.
    pub async fn get_id_from_login(&self, login: &str) -> Result<Option<String>, GqlError> {
        let lookup: UserLookup = self
            .execute_template(&templates::GET_ID_FROM_LOGIN, json!({ "login": login }))
            .await?;
        Ok(lookup.user.map(|user| user.id))
    }

    /// Logins of every channel the user follows, walking all pages.
    pub async fn channel_follows(
        &self,
        page_size: u32,
        order: FollowsOrder,
    ) -> Result<Vec<String>, GqlError> {
        let template = &templates::CHANNEL_FOLLOWS;
        paginate_cursor(move |cursor| async move {
            let data: ChannelFollowsData = self
                .execute_template(
                    template,
                    json!({
                        "limit": page_size,
                        "order": order.as_str(),
                        "cursor": cursor,
                    }),
                )
                .await?;
            let connection = data.user.follows;
            let last_cursor = connection.edges.last().map(|edge| edge.cursor.clone());
            let items = connection
                .edges
                .into_iter()
                .map(|edge| edge.node.login)
                .collect();
            Ok(CursorPage {
                items,
                cursor: last_cursor,
                has_next_page: connection.page_info.has_next_page,
            })
        })
        .await
    }

    /// Join the raid with the given id.
    pub async fn join_raid(&self, raid_id: &str) -> Result<(), GqlError> {
        let _: JoinRaidData = self
            .execute_template(
                &templates::JOIN_RAID,
                json!({ "input": { "raidID": raid_id } }),
            )
            .await?;
        Ok(())
    }

    /// Playback access token for the streamer with the given login.
    pub async fn playback_access_token(
        &self,
        login: &str,
    ) -> Result<PlaybackAccessToken, GqlError> {
        let data: PlaybackAccessTokenData = self
            .execute_template(
                &templates::PLAYBACK_ACCESS_TOKEN,
                json!({
                    "login": login,
                    "isLive": true,
                    "isVod": false,
                    "vodID": "",
                    "playerType": "site",
                }),
            )
            .await?;
        Ok(data.stream_playback_access_token)
    }

    /// Channel-points context for the channel with the given login.
    pub async fn channel_points_context(
        &self,
        channel_login: &str,
    ) -> Result<ChannelPointsContextData, GqlError> {
        self.execute_template(
            &templates::CHANNEL_POINTS_CONTEXT,
            json!({ "channelLogin": channel_login }),
        )
        .await
    }

    /// Wager `points` on a prediction outcome.
    ///
    /// The transaction token is generated once here, before the retry loop,
    /// so a retried submission after a lost response is deduplicated by the
    /// server instead of double-applied.
    pub async fn make_prediction(
        &self,
        event_id: &str,
        outcome_id: &str,
        points: u32,
    ) -> Result<OperationAck, GqlError> {
        let transaction = transaction_id();
        let data: MakePredictionData = self
            .execute_template(
                &templates::MAKE_PREDICTION,
                json!({
                    "input": {
                        "eventID": event_id,
                        "outcomeID": outcome_id,
                        "points": points,
                        "transactionID": transaction,
                    }
                }),
            )
            .await?;
        Ok(data.make_prediction)
    }

    /// Claim the community-points bonus with the given claim id.
    pub async fn claim_community_points(
        &self,
        channel_id: &str,
        claim_id: &str,
    ) -> Result<(), GqlError> {
        let _: ClaimCommunityPointsData = self
            .execute_template(
                &templates::CLAIM_COMMUNITY_POINTS,
                json!({ "input": { "channelID": channel_id, "claimID": claim_id } }),
            )
            .await?;
        Ok(())
    }

    /// Claim the community moment with the given id.
    pub async fn claim_moment(&self, moment_id: &str) -> Result<(), GqlError> {
        let _: ClaimMomentData = self
            .execute_template(
                &templates::COMMUNITY_MOMENT_CALLOUT_CLAIM,
                json!({ "input": { "momentID": moment_id } }),
            )
            .await?;
        Ok(())
    }

    /// Drop campaigns currently available on the given channel.
    pub async fn available_drops(
        &self,
        channel_id: &str,
    ) -> Result<Vec<DropCampaignRef>, GqlError> {
        let data: AvailableDropsEnvelope = self
            .execute_template(
                &templates::DROPS_HIGHLIGHT_SERVICE_AVAILABLE_DROPS,
                json!({ "channelID": channel_id }),
            )
            .await?;
        Ok(data.channel.viewer_drop_campaigns.unwrap_or_default())
    }

    /// The user's drops inventory.
    pub async fn inventory(&self) -> Result<Inventory, GqlError> {
        let data: InventoryEnvelope = self
            .execute_template(&templates::INVENTORY, json!({ "fetchRewardCampaigns": true }))
            .await?;
        Ok(data.current_user.inventory)
    }

    /// Campaigns on the viewer drops dashboard.
    pub async fn viewer_drops_dashboard(&self) -> Result<Vec<DashboardCampaign>, GqlError> {
        let data: DashboardEnvelope = self
            .execute_template(&templates::VIEWER_DROPS_DASHBOARD, json!({}))
            .await?;
        Ok(data.current_user.drop_campaigns.unwrap_or_default())
    }

    /// Details for the drop campaigns with the given ids.
    ///
    /// Ids are batched in order-preserving chunks of 20, one sub-request per
    /// id. A failing chunk is logged and skipped while the remaining chunks
    /// still proceed; null per-campaign results are filtered out.
    pub async fn drop_campaign_details(
        &self,
        campaign_ids: &[String],
        channel_login: &str,
    ) -> Result<Vec<DropCampaignDetails>, GqlError> {
        let template = &templates::DROP_CAMPAIGN_DETAILS;
        let name = template.operation_name();
        let mut details = Vec::new();
        for chunk in campaign_ids.chunks(CAMPAIGN_CHUNK_SIZE) {
            let bodies: Vec<Value> = chunk
                .iter()
                .map(|id| {
                    template.build(json!({
                        "dropID": id,
                        "channelLogin": channel_login,
                    }))
                })
                .collect();
            match self
                .execute_batch(name, bodies, |value| {
                    decode::<DropCampaignDetailsData>(name, value)
                })
                .await
            {
                Ok(items) => details.extend(
                    items
                        .into_iter()
                        .filter_map(|data| data.user.and_then(|user| user.drop_campaign)),
                ),
                Err(error) => {
                    warn!(operation = name, %error, "skipping campaign details chunk");
                }
            }
        }
        Ok(details)
    }

    /// Claim the rewards for the drop instance with the given id.
    pub async fn claim_drop_rewards(
        &self,
        drop_instance_id: &str,
    ) -> Result<ClaimDropRewardsResult, GqlError> {
        let data: ClaimDropRewardsData = self
            .execute_template(
                &templates::DROPS_PAGE_CLAIM_DROP_REWARDS,
                json!({ "input": { "dropInstanceID": drop_instance_id } }),
            )
            .await?;
        Ok(data.claim_drop_rewards)
    }

    /// Community goals for the channel with the given login.
    pub async fn user_points_contribution(
        &self,
        channel_login: &str,
    ) -> Result<Vec<CommunityGoal>, GqlError> {
        let data: UserPointsContributionData = self
            .execute_template(
                &templates::USER_POINTS_CONTRIBUTION,
                json!({ "channelLogin": channel_login }),
            )
            .await?;
        Ok(data.community.channel.community_points_settings.goals)
    }

    /// Contribute `amount` points to a community goal.
    ///
    /// Like [`GqlClient::make_prediction`], the transaction token is
    /// generated once per logical call, never per attempt.
    pub async fn contribute_to_community_goal(
        &self,
        channel_id: &str,
        goal_id: &str,
        amount: u32,
    ) -> Result<OperationAck, GqlError> {
        let transaction = transaction_id();
        let data: ContributeToGoalData = self
            .execute_template(
                &templates::CONTRIBUTE_COMMUNITY_POINTS_COMMUNITY_GOAL,
                json!({
                    "input": {
                        "amount": amount,
                        "channelID": channel_id,
                        "goalID": goal_id,
                        "transactionID": transaction,
                    }
                }),
            )
            .await?;
        Ok(data.contribute_community_points_community_goal)
    }
}
