//! Hierarchical view model derived from the flat resource collections.
//!
//! `join` is a pure function: identical inputs always produce a structurally
//! identical tree, no matter how often or in what order it is called. The
//! tree is rebuilt from scratch on every refresh; nothing is patched in
//! place.

use std::collections::HashMap;

use serde::Serialize;

use crate::backend::models::{Channel, Playlist, RunRecord, Schedule};

/// One playlist with its bucketed schedules and recent runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistNode {
    pub playlist: Playlist,
    pub schedules: Vec<Schedule>,
    pub recent_runs: Vec<RunRecord>,
}

/// One channel with its playlists, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelNode {
    pub channel: Channel,
    pub playlists: Vec<PlaylistNode>,
}

/// The joined dashboard tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardViewModel {
    pub channels: Vec<ChannelNode>,
}

impl DashboardViewModel {
    /// Look up a playlist anywhere in the tree by id.
    pub fn find_playlist(&self, playlist_id: i64) -> Option<&Playlist> {
        self.channels
            .iter()
            .flat_map(|node| node.playlists.iter())
            .map(|node| &node.playlist)
            .find(|playlist| playlist.id == playlist_id)
    }

    /// Total number of playlists attached to the tree.
    pub fn playlist_count(&self) -> usize {
        self.channels.iter().map(|node| node.playlists.len()).sum()
    }
}

/// Display label for a playlist: its title, falling back to the external
/// source identifier.
pub fn playlist_label(playlist: &Playlist) -> &str {
    playlist
        .title
        .as_deref()
        .filter(|title| !title.is_empty())
        .unwrap_or(&playlist.youtube_playlist_id)
}

/// Fold the flat collections into the channel/playlist tree.
///
/// Children whose foreign key references a missing parent are left out of
/// the tree; the input collections are never mutated, so orphans stay
/// visible to any consumer of the flat lists.
pub fn join(
    channels: &[Channel],
    playlists: &[Playlist],
    schedules: &[Schedule],
    runs: &[RunRecord],
) -> DashboardViewModel {
    // Index maps preserve the relative order of the inputs per key.
    let mut schedules_by_playlist: HashMap<i64, Vec<Schedule>> = HashMap::new();
    for schedule in schedules {
        schedules_by_playlist
            .entry(schedule.playlist_id)
            .or_default()
            .push(schedule.clone());
    }

    let mut runs_by_playlist: HashMap<i64, Vec<RunRecord>> = HashMap::new();
    for run in runs {
        runs_by_playlist
            .entry(run.playlist_id)
            .or_default()
            .push(run.clone());
    }

    let mut playlists_by_channel: HashMap<i64, Vec<Playlist>> = HashMap::new();
    for playlist in playlists {
        playlists_by_channel
            .entry(playlist.channel_id)
            .or_default()
            .push(playlist.clone());
    }

    let channels = channels
        .iter()
        .map(|channel| {
            let playlists = playlists_by_channel
                .remove(&channel.id)
                .unwrap_or_default()
                .into_iter()
                .map(|playlist| {
                    let schedules = schedules_by_playlist
                        .get(&playlist.id)
                        .cloned()
                        .unwrap_or_default();
                    let recent_runs = runs_by_playlist
                        .get(&playlist.id)
                        .cloned()
                        .unwrap_or_default();
                    PlaylistNode {
                        playlist,
                        schedules,
                        recent_runs,
                    }
                })
                .collect();
            ChannelNode {
                channel: channel.clone(),
                playlists,
            }
        })
        .collect();

    DashboardViewModel { channels }
}
