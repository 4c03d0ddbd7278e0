use std::cmp::Reverse;
use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::db::DiscoveryStore;
use crate::errors::AppError;
use crate::models::{
    CreatorListResponse, CreatorRecord, CreatorStats, CreatorSummary, LeaderboardEntry,
    LeaderboardResponse, ResourceType, TopByCategoryResponse, TypeCreatorAggregate,
    CATEGORY_LEADER_STATUSES,
};

/// Ranks and samples marketplace creators.
pub struct CreatorService<'a> {
    store: &'a dyn DiscoveryStore,
}

impl<'a> CreatorService<'a> {
    pub fn new(store: &'a dyn DiscoveryStore) -> Self {
        Self { store }
    }

    /// Top creators by downloads summed over their approved resources.
    ///
    /// Totals are all-time. `previous_rank` equals `rank` and `weekly_change`
    /// is zero because rank history is not recorded.
    pub async fn weekly_leaderboard(&self, limit: usize) -> Result<LeaderboardResponse, AppError> {
        let creators = self.store.eligible_creators().await?;
        let leaderboard = rank_creators(creators, limit);

        tracing::debug!(entries = leaderboard.len(), "Computed creator leaderboard");

        Ok(LeaderboardResponse { leaderboard })
    }

    /// The creator with the most downloads in each resource type.
    ///
    /// Types without any qualifying creator are left out of the map.
    pub async fn top_creators_by_category(&self) -> Result<TopByCategoryResponse, AppError> {
        let rows = self
            .store
            .creator_totals_by_type(&ResourceType::ALL, &CATEGORY_LEADER_STATUSES)
            .await?;

        Ok(TopByCategoryResponse {
            top_by_category: leaders_by_type(rows),
        })
    }

    /// Up to `limit` eligible creators in uniformly random order.
    pub async fn random_creators(&self, limit: usize) -> Result<CreatorListResponse, AppError> {
        let creators = self.store.eligible_creators().await?;
        let creators = shuffle_creators(creators, limit, &mut rand::rng());

        Ok(CreatorListResponse { creators })
    }
}

fn rank_creators(mut creators: Vec<CreatorRecord>, limit: usize) -> Vec<LeaderboardEntry> {
    // Stable sort: equal totals keep the store's order.
    creators.sort_by_key(|c| Reverse(c.total_downloads()));
    creators.truncate(limit);

    creators
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let rank = index + 1;
            let downloads = record.total_downloads();
            LeaderboardEntry {
                rank,
                previous_rank: rank,
                creator: record.into(),
                weekly_downloads: downloads,
                weekly_change: 0,
            }
        })
        .collect()
}

fn leaders_by_type(rows: Vec<TypeCreatorAggregate>) -> BTreeMap<String, CreatorSummary> {
    let mut best: BTreeMap<ResourceType, TypeCreatorAggregate> = BTreeMap::new();
    for row in rows {
        let replace = match best.get(&row.kind) {
            None => true,
            Some(current) => {
                row.downloads > current.downloads
                    || (row.downloads == current.downloads && row.profile.id < current.profile.id)
            }
        };
        if replace {
            best.insert(row.kind, row);
        }
    }

    best.into_values()
        .map(|row| {
            let stats = CreatorStats {
                resources: row.resources,
                downloads: row.downloads,
                followers: row.followers,
            };
            (row.kind.slug(), CreatorSummary::new(row.profile, stats))
        })
        .collect()
}

fn shuffle_creators<R: Rng + ?Sized>(
    mut creators: Vec<CreatorRecord>,
    limit: usize,
    rng: &mut R,
) -> Vec<CreatorSummary> {
    creators.shuffle(rng);
    creators.truncate(limit);
    creators.into_iter().map(CreatorSummary::from).collect()
}
