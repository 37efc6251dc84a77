//! Resilient execution engine for Twitch's GraphQL (GQL) API.
//!
//! This crate provides:
//! - A bounded attempt/retry engine driven by per-error recoverability.
//! - A closed error taxonomy with a `recoverable` predicate per variant.
//! - Single and positionally batched request execution over immutable
//!   persisted-query templates.
//! - Cursor pagination and chunked-batch drivers built on those primitives,
//!   plus one typed wrapper per GQL operation the miner uses.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::too_many_lines)]

mod client;
mod error;
mod operation;
mod ops;
mod pagination;
mod response;
mod retry;
mod session;
mod transport;

pub use client::GqlClient;
pub use error::{GqlError, HttpErrorInfo, PathSegment, ResponseError};
pub use operation::{templates, RequestTemplate};
pub use ops::FollowsOrder;
pub use pagination::{paginate_cursor, CursorPage};
pub use response::{
    AvailableDropsData, ChannelPointsContextData, ChannelSelfEdge, ClaimDropRewardsResult,
    Community, CommunityChannel, CommunityGoal, CommunityPoints, DashboardCampaign,
    DropCampaignDetails, DropCampaignProgress, DropCampaignRef, DropProgress, Inventory,
    OperationAck, OperationErrorCode, OverlayStream, OverlayUser, PlaybackAccessToken,
    PointsClaim, StreamInfoOverlay, TimeBasedDrop,
};
pub use retry::{AttemptError, AttemptOutcome, AttemptStrategy};
pub use session::{ClientSession, CLIENT_ID, GQL_URL};
pub use transport::{HttpTransport, Transport, TransportReply};
