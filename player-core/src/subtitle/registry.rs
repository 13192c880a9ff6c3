//! Subtitle track registry
//!
//! Holds one track per language code and answers "which cue is showing
//! now". Every requested language is present once loading finishes, so
//! lookups never need a missing-key fallback.

use futures_util::future::join_all;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::cue::Cue;
use super::fetch::SubtitleFetcher;
use super::parser;
use super::track::{LoadState, Track, TrackSelection, TrackSummary, OFF};

/// Caller-supplied mapping: language code -> source location (or none for
/// a disabled track)
pub type TrackSources = BTreeMap<String, Option<String>>;

/// Language code -> track
#[derive(Debug, Clone, Default)]
pub struct TrackRegistry {
    tracks: BTreeMap<String, Track>,
}

impl TrackRegistry {
    /// A registry with every source track marked `Loading`
    pub fn loading(sources: &TrackSources) -> Self {
        let tracks = sources
            .iter()
            .map(|(lang, source)| {
                (lang.clone(), Track::new(lang.clone(), source.clone()).into_loading())
            })
            .collect();
        Self { tracks }
    }

    /// Fetch and parse every track concurrently.
    ///
    /// Never fails as a whole: a track whose fetch fails resolves to
    /// `Failed` with no cues and its siblings are unaffected. Resolves only
    /// after every track has settled.
    pub async fn load<F: SubtitleFetcher>(sources: &TrackSources, fetcher: &F) -> Self {
        let pending = sources.iter().map(|(lang, source)| async move {
            let track = Track::new(lang.clone(), source.clone());
            let Some(location) = source else {
                return track;
            };

            match fetcher.fetch(location).await {
                Ok(text) => {
                    let cues = parser::parse(&text);
                    tracing::debug!(
                        language = %lang,
                        cues = cues.len(),
                        "Loaded subtitle track from {}",
                        location
                    );
                    track.into_loaded(cues)
                }
                Err(e) => {
                    tracing::warn!(language = %lang, "Failed to load subtitle track: {}", e);
                    track.into_failed()
                }
            }
        });

        let tracks = join_all(pending)
            .await
            .into_iter()
            .map(|track| (track.language().to_string(), track))
            .collect();

        Self { tracks }
    }

    pub fn get(&self, language: &str) -> Option<&Track> {
        self.tracks.get(language)
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.tracks.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// The source set this registry was built from
    pub fn sources(&self) -> TrackSources {
        self.tracks
            .iter()
            .map(|(lang, track)| (lang.clone(), track.source().map(str::to_string)))
            .collect()
    }

    /// Cue showing on `language` at `time`
    pub fn active_cue(&self, language: &str, time: f64) -> Option<&Cue> {
        if language == OFF {
            return None;
        }
        self.tracks.get(language)?.cue_at(time)
    }

    /// Text of the cue showing on `language` at `time`.
    ///
    /// `None` for "off", unknown languages, and gaps between cues.
    pub fn active_cue_text(&self, language: &str, time: f64) -> Option<&str> {
        self.active_cue(language, time).map(|cue| cue.text.as_str())
    }

    /// Same as [`active_cue_text`](Self::active_cue_text) for a selection
    pub fn selected_cue_text(&self, selection: &TrackSelection, time: f64) -> Option<&str> {
        self.active_cue_text(selection.language()?, time)
    }

    /// True once no track is still `Loading`
    pub fn is_settled(&self) -> bool {
        self.tracks
            .values()
            .all(|track| track.load_state() != LoadState::Loading)
    }

    pub fn summaries(&self) -> Vec<TrackSummary> {
        self.tracks.values().map(Track::summary).collect()
    }
}

/// Result of [`SubtitleTracks::load`]
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// The new registry is now current
    Applied(Arc<TrackRegistry>),
    /// Same source set as the current registry; nothing was fetched
    Unchanged(Arc<TrackRegistry>),
    /// A newer load started while this one was in flight; its result was
    /// thrown away
    Superseded,
}

/// Owner of the current registry.
///
/// Each load takes a generation number. A load only installs its result if
/// no newer load has started since, so a slow request for an old source set
/// can never overwrite a newer one.
pub struct SubtitleTracks<F> {
    fetcher: F,
    current: RwLock<Arc<TrackRegistry>>,
    generation: AtomicU64,
}

impl<F: SubtitleFetcher> SubtitleTracks<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            current: RwLock::new(Arc::new(TrackRegistry::default())),
            generation: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current registry
    pub fn current(&self) -> Arc<TrackRegistry> {
        self.current.read().clone()
    }

    /// Replace the track set with `sources`.
    pub async fn load(&self, sources: TrackSources) -> LoadOutcome {
        {
            let current = self.current.read();
            // A registry still loading may belong to a load that was dropped
            if !current.is_empty() && current.is_settled() && current.sources() == sources {
                return LoadOutcome::Unchanged(current.clone());
            }
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let previous = std::mem::replace(
            &mut *self.current.write(),
            Arc::new(TrackRegistry::loading(&sources)),
        );
        let mut pending = PendingLoad {
            tracks: self,
            generation,
            previous: Some(previous),
        };

        let registry = TrackRegistry::load(&sources, &self.fetcher).await;
        pending.previous = None;

        let mut current = self.current.write();
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "Discarding stale subtitle load");
            return LoadOutcome::Superseded;
        }

        let registry = Arc::new(registry);
        *current = registry.clone();
        tracing::info!(
            generation,
            tracks = registry.len(),
            "Subtitle tracks ready"
        );
        LoadOutcome::Applied(registry)
    }
}

/// Puts the previous registry back if a load is dropped before it
/// finishes, unless a newer load has taken over.
struct PendingLoad<'a, F> {
    tracks: &'a SubtitleTracks<F>,
    generation: u64,
    previous: Option<Arc<TrackRegistry>>,
}

impl<F> Drop for PendingLoad<'_, F> {
    fn drop(&mut self) {
        let Some(previous) = self.previous.take() else {
            return;
        };
        let mut current = self.tracks.current.write();
        if self.tracks.generation.load(Ordering::SeqCst) == self.generation {
            *current = previous;
            tracing::debug!(generation = self.generation, "Subtitle load cancelled");
        }
    }
}
