//! Point recommendations over HTTP.
//!
//! [`HttpRecommendationClient`] posts a [`easytrip_core::RouteRequest`] as
//! JSON to the recommendation service and returns the points it selected.

mod client;
mod wire;

pub use client::{
    DEFAULT_RECOMMEND_PATH, DEFAULT_RECOMMENDER_URL, HttpRecommendationClient, RecommenderConfig,
};
