//! Canned entities for seeding the mock automation service.

use automation_console::backend::models::{
    Channel, Job, PipelineStatus, Playlist, PodcastTarget, RunRecord, Schedule,
};

pub fn channel(id: i64, slug: &str, title: &str) -> Channel {
    Channel {
        id,
        slug: slug.to_string(),
        title: title.to_string(),
        description: None,
    }
}

pub fn playlist(id: i64, channel_id: i64, title: Option<&str>) -> Playlist {
    Playlist {
        id,
        channel_id,
        youtube_playlist_id: format!("PL{:08}", id),
        title: title.map(str::to_string),
        is_active: true,
        castopod_slug: None,
        castopod_uuid: None,
    }
}

pub fn schedule(id: i64, playlist_id: i64) -> Schedule {
    Schedule {
        id,
        playlist_id,
        days_of_week: vec!["mon".to_string(), "thu".to_string()],
        run_time: "06:30".to_string(),
        timezone: "Asia/Seoul".to_string(),
        is_active: true,
        next_run_at: None,
        last_run_at: None,
    }
}

pub fn run(id: i64, playlist_id: i64, status: &str) -> RunRecord {
    RunRecord {
        id,
        playlist_id,
        status: status.to_string(),
        message: None,
        started_at: "2025-11-02T06:30:00".to_string(),
        finished_at: None,
        progress_total: 0,
        progress_completed: 0,
        current_task: None,
        progress_message: None,
    }
}

pub fn job(id: i64, playlist_id: i64, note: Option<&str>, created_at: &str) -> Job {
    Job {
        id,
        playlist_id,
        action: "sync".to_string(),
        status: "queued".to_string(),
        castopod_slug: None,
        castopod_playlist_uuid: None,
        note: note.map(str::to_string),
        should_castopod_upload: false,
        progress_total: 0,
        progress_completed: 0,
        current_task: None,
        progress_message: None,
        created_at: created_at.to_string(),
        updated_at: created_at.to_string(),
    }
}

pub fn podcast_target(id: i64, slug: &str) -> PodcastTarget {
    PodcastTarget {
        id,
        uuid: format!("00000000-0000-0000-0000-{:012}", id),
        title: format!("Podcast {}", slug),
        slug: slug.to_string(),
    }
}

pub fn idle_pipeline() -> PipelineStatus {
    PipelineStatus {
        running: false,
        pid: None,
        command: "pipeline-runner --drain".to_string(),
        started_at: None,
        last_started_at: Some("2025-11-02T06:00:00".to_string()),
        last_finished_at: Some("2025-11-02T06:10:00".to_string()),
        last_exit_code: Some(0),
        log_path: None,
    }
}
