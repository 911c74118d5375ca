//! Replay recorded feeds through an event holder.

use anyhow::{Context, Result};
use holdback_feed_core::{EventHolder, HolderChange};
use holdback_feed_types::FeedEvent;
use std::cell::Cell;
use std::collections::HashSet;
use std::path::PathBuf;
use std::rc::Rc;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::feed;

/// Outcome of a replay.
#[derive(Debug, Default)]
pub struct ReplayReport {
    /// Events delivered by all feeds, duplicates included.
    pub received: usize,
    /// Events the holder accepted.
    pub admitted: usize,
    /// Events rejected as already seen.
    pub duplicates: usize,
    /// Feed lines that could not be decoded.
    pub malformed: usize,
    /// Events that went through the incoming queue.
    pub held: usize,
    /// Flushes that changed the timeline.
    pub flushes: usize,
    /// Final timeline, newest first, mute list applied.
    pub timeline: Vec<FeedEvent>,
}

/// Stream every feed into one holder and return the resulting timeline.
pub async fn replay(paths: &[PathBuf], config: &Config) -> Result<ReplayReport> {
    let (tx, mut rx) = mpsc::channel(config.feed.channel_capacity.max(1));
    let readers = feed::spawn_readers(paths, tx);

    let held = Rc::new(Cell::new(0usize));
    let held_counter = Rc::clone(&held);
    let mut holder = EventHolder::with_on_queue(move |event: &FeedEvent| {
        tracing::trace!(id = %event.id, "event held back");
        held_counter.set(held_counter.get() + 1);
    });

    let flushes = Rc::new(Cell::new(0usize));
    let flush_counter = Rc::clone(&flushes);
    holder.subscribe(move |change| match change {
        HolderChange::Flushed { revealed, visible } => {
            tracing::info!(revealed, visible, "new events revealed");
            flush_counter.set(flush_counter.get() + 1);
        }
    });

    let holder_config = &config.holder;
    let mut report = ReplayReport::default();

    while let Some(event) = rx.recv().await {
        report.received += 1;

        if !holder.should_queue()
            && holder_config.queue_after_initial_load
            && report.admitted >= holder_config.initial_load
        {
            tracing::info!(visible = holder.len(), "initial load complete, holding new events");
            holder.set_should_queue(true);
        }

        if !holder.insert(event) {
            report.duplicates += 1;
            continue;
        }
        report.admitted += 1;

        if holder.should_queue()
            && holder_config.flush_every > 0
            && holder.pending_count() >= holder_config.flush_every
        {
            holder.flush();
        }
    }

    for reader in readers {
        let stats = reader.await.context("feed reader task failed")??;
        report.malformed += stats.malformed;
    }

    holder.flush();

    let muted: HashSet<&str> = config.display.muted.iter().map(String::as_str).collect();
    if !muted.is_empty() {
        holder.retain(|event| !muted.contains(event.pubkey.as_str()));
    }

    report.held = held.get();
    report.flushes = flushes.get();
    report.timeline = holder.events().to_vec();
    Ok(report)
}

/// Run the replay command.
pub async fn run(paths: &[PathBuf], config: &Config) -> Result<()> {
    let report = replay(paths, config).await?;
    let limit = config.display.limit;

    for event in report.timeline.iter().take(limit) {
        println!(
            "{}  {}  {}",
            event.created_at,
            &event.id.to_hex()[..8],
            event.content
        );
    }
    if report.timeline.len() > limit {
        println!("... {} older events", report.timeline.len() - limit);
    }

    println!();
    println!(
        "received {}  admitted {}  duplicates {}  malformed {}  held {}  flushes {}",
        report.received,
        report.admitted,
        report.duplicates,
        report.malformed,
        report.held,
        report.flushes
    );

    Ok(())
}
