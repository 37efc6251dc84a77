//! Typed response payloads for the GQL operations.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{GqlError, PathSegment, ResponseError};

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Envelope<T> {
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    errors: Vec<RawError>,
}

#[derive(Debug, Deserialize)]
struct RawError {
    message: String,
}

/// Decode one response object for `operation_name`.
///
/// A well-formed error payload becomes [`GqlError::ResponseErrors`] with each
/// item classified individually; a response with neither data nor errors is a
/// shape error.
pub(crate) fn decode<T: DeserializeOwned>(
    operation_name: &str,
    value: Value,
) -> Result<T, GqlError> {
    let envelope: Envelope<T> = serde_json::from_value(value)?;
    if !envelope.errors.is_empty() {
        let errors = envelope
            .errors
            .into_iter()
            .map(|raw| ResponseError::from_message(raw.message))
            .collect();
        return Err(GqlError::ResponseErrors {
            operation_name: operation_name.to_string(),
            errors,
        });
    }
    envelope.data.ok_or_else(|| GqlError::InvalidShape {
        path: vec![PathSegment::Key("data".to_string())],
        message: "missing response data".to_string(),
    })
}

/// Stream overlay info for a channel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StreamInfoOverlay {
    /// The channel owner, absent for unknown logins.
    #[serde(default)]
    pub user: Option<OverlayUser>,
}

/// Channel owner in the stream overlay.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OverlayUser {
    /// User id.
    pub id: String,
    /// Login name.
    pub login: String,
    /// Live stream state, absent when offline.
    #[serde(default)]
    pub stream: Option<OverlayStream>,
}

/// Live stream state.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayStream {
    /// Current viewer count.
    pub viewers_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct UserLookup {
    #[serde(default)]
    pub user: Option<UserRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct UserRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct ChannelFollowsData {
    pub user: FollowsUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct FollowsUser {
    pub follows: FollowsConnection,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FollowsConnection {
    pub edges: Vec<FollowEdge>,
    pub page_info: PageInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct FollowEdge {
    pub cursor: String,
    pub node: FollowNode,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct FollowNode {
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageInfo {
    pub has_next_page: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaybackAccessTokenData {
    pub stream_playback_access_token: PlaybackAccessToken,
}

/// Signed token authorizing stream playback.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlaybackAccessToken {
    /// Token value.
    pub value: String,
    /// Token signature.
    pub signature: String,
}

/// Channel-points context for a channel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChannelPointsContextData {
    /// Community the context belongs to.
    pub community: Community,
}

/// Community wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Community {
    /// The community's channel.
    pub channel: CommunityChannel,
}

/// Channel inside the community context.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommunityChannel {
    /// The requesting user's edge to the channel.
    #[serde(rename = "self")]
    pub self_edge: ChannelSelfEdge,
}

/// The requesting user's relation to a channel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSelfEdge {
    /// Community-points state.
    pub community_points: CommunityPoints,
}

/// Community-points state for the requesting user on one channel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityPoints {
    /// Current balance.
    pub balance: i64,
    /// Claimable bonus, if one is pending.
    #[serde(default)]
    pub available_claim: Option<PointsClaim>,
}

/// A pending community-points claim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PointsClaim {
    /// Claim id.
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MakePredictionData {
    pub make_prediction: OperationAck,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct ClaimCommunityPointsData {
    #[serde(rename = "claimCommunityPoints")]
    pub claim_community_points: OperationAck,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ClaimMomentData {
    pub claim_community_moment: OperationAck,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JoinRaidData {
    pub join_raid: OperationAck,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ContributeToGoalData {
    pub contribute_community_points_community_goal: OperationAck,
}

/// Acknowledgement payload shared by the mutating operations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OperationAck {
    /// Error code reported by the operation, if it was rejected.
    #[serde(default)]
    pub error: Option<OperationErrorCode>,
}

/// Domain-level rejection code inside an otherwise successful response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OperationErrorCode {
    /// Error code.
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct AvailableDropsEnvelope {
    pub channel: DropsChannel,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DropsChannel {
    #[serde(default)]
    pub viewer_drop_campaigns: Option<Vec<DropCampaignRef>>,
}

/// Drops currently available on a channel.
pub type AvailableDropsData = Vec<DropCampaignRef>;

/// Reference to a drop campaign.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DropCampaignRef {
    /// Campaign id.
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InventoryEnvelope {
    pub current_user: InventoryUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct InventoryUser {
    pub inventory: Inventory,
}

/// The user's drops inventory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    /// Campaigns the user is progressing in.
    #[serde(default)]
    pub drop_campaigns_in_progress: Option<Vec<DropCampaignProgress>>,
}

/// Progress within one drop campaign.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropCampaignProgress {
    /// Campaign id.
    pub id: String,
    /// Time-based drops within the campaign.
    #[serde(default)]
    pub time_based_drops: Vec<TimeBasedDrop>,
}

/// One time-based drop and the user's progress towards it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimeBasedDrop {
    /// Drop id.
    pub id: String,
    /// The requesting user's progress edge.
    #[serde(rename = "self")]
    pub self_edge: DropProgress,
}

/// The user's progress on one drop.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropProgress {
    /// Minutes watched so far.
    pub current_minutes_watched: u64,
    /// Whether the drop was already claimed.
    pub is_claimed: bool,
    /// Claimable instance id, present once the drop is earned.
    #[serde(default)]
    pub drop_instance_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DashboardEnvelope {
    pub current_user: DashboardUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DashboardUser {
    #[serde(default)]
    pub drop_campaigns: Option<Vec<DashboardCampaign>>,
}

/// One campaign on the viewer drops dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DashboardCampaign {
    /// Campaign id.
    pub id: String,
    /// Campaign status, e.g. `ACTIVE`.
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct DropCampaignDetailsData {
    #[serde(default)]
    pub user: Option<CampaignDetailsUser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CampaignDetailsUser {
    #[serde(default)]
    pub drop_campaign: Option<DropCampaignDetails>,
}

/// Details for one drop campaign.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DropCampaignDetails {
    /// Campaign id.
    pub id: String,
    /// Campaign display name.
    pub name: String,
    /// Campaign status.
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ClaimDropRewardsData {
    pub claim_drop_rewards: ClaimDropRewardsResult,
}

/// Outcome of a drop-rewards claim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClaimDropRewardsResult {
    /// Claim status, e.g. `ELIGIBLE_FOR_ALL`.
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct UserPointsContributionData {
    pub community: GoalCommunity,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct GoalCommunity {
    pub channel: GoalChannel,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GoalChannel {
    pub community_points_settings: CommunityPointsSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct CommunityPointsSettings {
    #[serde(default)]
    pub goals: Vec<CommunityGoal>,
}

/// A community goal viewers can contribute points to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityGoal {
    /// Goal id.
    pub id: String,
    /// Goal status, e.g. `STARTED`.
    pub status: String,
    /// Points contributed so far.
    pub points_contributed: i64,
    /// Points needed to complete the goal.
    pub amount_needed: i64,
}
