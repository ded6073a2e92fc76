//! Concurrent restaurant storage with per-restaurant locking.
//!
//! [`RestaurantRegistry`] stores every restaurant in a `HashMap` where each
//! entry is individually protected by a [`tokio::sync::RwLock`]. Owner
//! commands and dashboard writes take the entry's write lock for the whole
//! read-modify-write; the customer path only reads.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::ChannelId;
use super::restaurant::{RestaurantEntry, RestaurantSummary};
use crate::error::GatewayError;

/// Central store for all configured restaurants.
///
/// # Concurrency
///
/// - Multiple tasks may read the same restaurant concurrently.
/// - Writes to different restaurants are concurrent.
/// - Writes to the same restaurant are serialized.
#[derive(Debug, Default)]
pub struct RestaurantRegistry {
    restaurants: RwLock<HashMap<ChannelId, Arc<RwLock<RestaurantEntry>>>>,
}

impl RestaurantRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a restaurant under its channel id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if the channel is already
    /// registered.
    pub async fn insert(&self, entry: RestaurantEntry) -> Result<ChannelId, GatewayError> {
        let channel_id = entry.profile.channel_id.clone();
        let mut map = self.restaurants.write().await;
        if map.contains_key(&channel_id) {
            return Err(GatewayError::InvalidRequest(format!(
                "channel {channel_id} already registered"
            )));
        }
        map.insert(channel_id.clone(), Arc::new(RwLock::new(entry)));
        Ok(channel_id)
    }

    /// Returns the entry behind its per-restaurant lock.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ChannelNotFound`] if no restaurant uses this
    /// channel.
    pub async fn get(
        &self,
        channel_id: &ChannelId,
    ) -> Result<Arc<RwLock<RestaurantEntry>>, GatewayError> {
        let map = self.restaurants.read().await;
        map.get(channel_id)
            .cloned()
            .ok_or_else(|| GatewayError::ChannelNotFound(channel_id.clone()))
    }

    /// Returns summaries of all restaurants, sorted by channel id.
    pub async fn list(&self) -> Vec<RestaurantSummary> {
        let map = self.restaurants.read().await;
        let mut summaries = Vec::with_capacity(map.len());
        for entry_lock in map.values() {
            let entry = entry_lock.read().await;
            summaries.push(RestaurantSummary::from(&*entry));
        }
        summaries.sort_by(|a, b| a.channel_id.cmp(&b.channel_id));
        summaries
    }

    /// Returns the number of restaurants in the registry.
    pub async fn len(&self) -> usize {
        self.restaurants.read().await.len()
    }

    /// Returns `true` if the registry contains no restaurant.
    pub async fn is_empty(&self) -> bool {
        self.restaurants.read().await.is_empty()
    }
}
