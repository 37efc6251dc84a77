//! Persisted-query operation templates.

use serde_json::{json, Value};

/// A named persisted-query operation.
///
/// Templates are process-wide constants shared by every call, so they are
/// never mutated: [`RequestTemplate::build`] assembles a fresh request body
/// per call instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTemplate {
    operation_name: &'static str,
    sha256_hash: &'static str,
}

impl RequestTemplate {
    /// Create a template.
    #[must_use]
    pub const fn new(operation_name: &'static str, sha256_hash: &'static str) -> Self {
        Self {
            operation_name,
            sha256_hash,
        }
    }

    /// The operation name.
    #[must_use]
    pub const fn operation_name(&self) -> &'static str {
        self.operation_name
    }

    /// Build a request body carrying the given variables.
    #[must_use]
    pub fn build(&self, variables: Value) -> Value {
        json!({
            "operationName": self.operation_name,
            "extensions": {
                "persistedQuery": {
                    "version": 1,
                    "sha256Hash": self.sha256_hash,
                }
            },
            "variables": variables,
        })
    }
}

/// The fixed set of operations the client knows how to invoke.
pub mod templates {
    use super::RequestTemplate;

    /// Stream overlay info for a channel.
    pub const VIDEO_PLAYER_STREAM_INFO_OVERLAY_CHANNEL: RequestTemplate = RequestTemplate::new(
        "VideoPlayerStreamInfoOverlayChannel",
        "a5f2e34d626a9f4f5c0204f910bab2194948a9502089be558bb6e779a9e1b3d2",
    );

    /// Resolve a user id from a login name.
    pub const GET_ID_FROM_LOGIN: RequestTemplate = RequestTemplate::new(
        "ReportMenuItem",
        "8f3628981255345ca5e5453dfd844efffb01d6413a9931498836e6268692a30c",
    );

    /// One page of the channels the user follows.
    pub const CHANNEL_FOLLOWS: RequestTemplate = RequestTemplate::new(
        "ChannelFollows",
        "eecf815273d3d949e5cf0085cc5084cd8a1b5b7b6f7990cf43cb0beadf546907",
    );

    /// Join an ongoing raid.
    pub const JOIN_RAID: RequestTemplate = RequestTemplate::new(
        "JoinRaid",
        "c6a332a86d1087fbbb1a8623aa01bd1313d2386e7c63be60fdb2d1901f01a4ae",
    );

    /// Playback access token for a stream.
    pub const PLAYBACK_ACCESS_TOKEN: RequestTemplate = RequestTemplate::new(
        "PlaybackAccessToken",
        "0828119ded1c13477966434e15800ff57ddacf13ba1911c129dc2200705b0712",
    );

    /// Channel-points context for a channel.
    pub const CHANNEL_POINTS_CONTEXT: RequestTemplate = RequestTemplate::new(
        "ChannelPointsContext",
        "9988086babc615a918a1e9a722ff41d98847acac822645209ac7379eecb27152",
    );

    /// Wager points on a prediction outcome. Mutating.
    pub const MAKE_PREDICTION: RequestTemplate = RequestTemplate::new(
        "MakePrediction",
        "b44682ecc88358817009f20e69d75081b1e58825bb40aa53d5dbadcc17c881d8",
    );

    /// Claim an available community-points bonus.
    pub const CLAIM_COMMUNITY_POINTS: RequestTemplate = RequestTemplate::new(
        "ClaimCommunityPoints",
        "46aaeebe02c99afdf4fc97c7c0cba964124bf6b0af229395f1f6d1feed05b3d0",
    );

    /// Claim a community moment.
    pub const COMMUNITY_MOMENT_CALLOUT_CLAIM: RequestTemplate = RequestTemplate::new(
        "CommunityMomentCallout_Claim",
        "e2d67415aead910f7f9ceb45a77b750a1e1d9622c936d832328a0689e054db62",
    );

    /// Drops currently available on a channel.
    pub const DROPS_HIGHLIGHT_SERVICE_AVAILABLE_DROPS: RequestTemplate = RequestTemplate::new(
        "DropsHighlightService_AvailableDrops",
        "9a62a09bce5b53e26e64a671e530bc599cb6aab1e5ba3cbd5d85966d3940716f",
    );

    /// The user's drops inventory.
    pub const INVENTORY: RequestTemplate = RequestTemplate::new(
        "Inventory",
        "37fea486d6179047c41d0f549088a4c3a7dd60c05c70956a1490262f532dccd9",
    );

    /// The viewer drops dashboard.
    pub const VIEWER_DROPS_DASHBOARD: RequestTemplate = RequestTemplate::new(
        "ViewerDropsDashboard",
        "8d5d9b5e3f088f9d1ff39eb2caab11f7a4cf7a3353da1ce82c3b8d8d7b52a2e1",
    );

    /// Details for one drop campaign. Sent positionally batched.
    pub const DROP_CAMPAIGN_DETAILS: RequestTemplate = RequestTemplate::new(
        "DropCampaignDetails",
        "f6396f5ffdde867a8f6f6da18286e4baf02e5b98d14689a69b5af320a4c7b7b8",
    );

    /// Claim the rewards for a completed drop.
    pub const DROPS_PAGE_CLAIM_DROP_REWARDS: RequestTemplate = RequestTemplate::new(
        "DropsPage_ClaimDropRewards",
        "a455deea71bdc9015b78eb49f4acfbce8baa7ccbedd28e549bb025bd0f751930",
    );

    /// The user's contribution state for a channel's community goals.
    pub const USER_POINTS_CONTRIBUTION: RequestTemplate = RequestTemplate::new(
        "UserPointsContribution",
        "6111f3d883a6c0e6a3b4c29a3e1fa31d9f43c1b1f7ebd4e22c9b9e9f0e18b5a7",
    );

    /// Contribute points to a community goal. Mutating.
    pub const CONTRIBUTE_COMMUNITY_POINTS_COMMUNITY_GOAL: RequestTemplate = RequestTemplate::new(
        "ContributeCommunityPointsCommunityGoal",
        "5774f8f7a367d183a3b4e0a1b2d3ff6f1098d9a40c1d9e2f7ebaf7b1872b9a44",
    );
}
