//! Track state controller
//!
//! [`Store`] owns the [`StoreState`] and the source adapters. Actions spawn
//! adapter calls; their outcomes come back through the event channel and are
//! applied by the owner, one at a time.
//!
//! Every request is stamped with a generation. Selecting a track aborts the
//! previous selection's lyric and URL fetches, and any outcome whose
//! generation is no longer current is dropped, so a slow response can never
//! overwrite a newer selection or search.

pub mod actions;
pub mod events;
pub mod state;

use crate::source::{HttpGet, SourceKind, Sources, Track};
use actions::Action;
use events::{Event, NetworkEvent, PlayerEvent, RequestKind};
use state::StoreState;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Default)]
struct Generations {
    search: u64,
    suggest: u64,
    selection: u64,
}

pub struct Store<H> {
    state: StoreState,
    sources: Sources<H>,
    tx: mpsc::Sender<Event>,
    rx: mpsc::Receiver<Event>,
    generations: Generations,
    selection_tasks: Vec<JoinHandle<()>>,
}

impl<H> Store<H>
where
    H: HttpGet + Clone + 'static,
{
    pub fn new(sources: Sources<H>, source: SourceKind) -> Self {
        let (tx, rx) = mpsc::channel::<Event>(256);
        Self {
            state: StoreState::new(source),
            sources,
            tx,
            rx,
            generations: Generations::default(),
            selection_tasks: Vec::new(),
        }
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn sources(&self) -> &Sources<H> {
        &self.sources
    }

    /// Handle for collaborators (e.g. the audio player) to post events.
    pub fn sender(&self) -> mpsc::Sender<Event> {
        self.tx.clone()
    }

    /// Wait for the next event and apply it.
    pub async fn pump(&mut self) {
        // The store keeps its own sender alive, so the channel never closes.
        if let Some(ev) = self.rx.recv().await {
            self.handle_event(ev);
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::SwitchSource(kind) => self.switch_source(kind),
            Action::Search(keyword) => self.spawn_search(keyword),
            Action::Suggest(keyword) => self.spawn_suggest(keyword),
            Action::SelectResult(index) => match self.state.results().get(index).cloned() {
                Some(track) => self.select(track),
                None => tracing::debug!(index, "select out of range"),
            },
            Action::SelectTrack(track) => self.select(track),
            Action::ClearSelection => {
                self.abort_selection();
                self.generations.selection += 1;
                self.state.clear_current();
            }
            Action::Tick { seconds } => {
                self.state.update_lyric_index(seconds);
            }
        }
    }

    pub fn handle_event(&mut self, ev: Event) {
        match ev {
            Event::Player(pe) => self.handle_player(pe),
            Event::Network(ne) => self.handle_network(ne),
        }
    }

    fn handle_player(&mut self, pe: PlayerEvent) {
        match pe {
            PlayerEvent::Position { seconds } => {
                self.state.update_lyric_index(seconds);
            }
            PlayerEvent::Ended => {
                self.state.reset_cursor();
            }
        }
    }

    fn handle_network(&mut self, ne: NetworkEvent) {
        match ne {
            NetworkEvent::SearchResults {
                generation,
                source,
                keyword,
                tracks,
            } => {
                if generation != self.generations.search {
                    tracing::debug!(%keyword, "dropping stale search results");
                    return;
                }
                tracing::debug!(%source, %keyword, count = tracks.len(), "search results");
                self.state.set_results(tracks);
            }
            NetworkEvent::Suggestions {
                generation,
                keyword,
                suggestions,
            } => {
                if generation != self.generations.suggest {
                    tracing::debug!(%keyword, "dropping stale suggestions");
                    return;
                }
                self.state.set_suggestions(suggestions);
            }
            NetworkEvent::StreamResolved {
                generation,
                track_id,
                url,
            } => {
                if generation != self.generations.selection {
                    tracing::debug!(%track_id, "dropping stale stream url");
                    return;
                }
                self.state.set_current_url(url);
            }
            NetworkEvent::LyricLoaded {
                generation,
                track_id,
                lyric,
            } => {
                if generation != self.generations.selection {
                    tracing::debug!(%track_id, "dropping stale lyric");
                    return;
                }
                self.state.set_lyric(lyric);
            }
            NetworkEvent::Failed {
                generation,
                request,
                message,
            } => {
                let current = match request {
                    RequestKind::Search => self.generations.search,
                    RequestKind::Suggest => self.generations.suggest,
                    RequestKind::StreamUrl | RequestKind::Lyric => self.generations.selection,
                };
                if generation != current {
                    return;
                }
                tracing::warn!(?request, "{message}");
                match request {
                    RequestKind::Search => self.state.searching = false,
                    RequestKind::Suggest => {}
                    RequestKind::StreamUrl => self.state.resolving_url = false,
                    RequestKind::Lyric => self.state.lyric_loading = false,
                }
                self.state.last_error = Some(message);
            }
        }
    }

    fn switch_source(&mut self, kind: SourceKind) {
        if !kind.is_enabled() {
            tracing::warn!(%kind, "switching to a disabled source");
        }
        // Results from the old source are meaningless now
        self.generations.search += 1;
        self.generations.suggest += 1;
        self.state.set_source(kind);
        self.state.clear_results();
    }

    fn spawn_search(&mut self, keyword: String) {
        let keyword = keyword.trim().to_string();
        if keyword.is_empty() {
            return;
        }
        self.generations.search += 1;
        let generation = self.generations.search;
        let source = self.state.current_source();
        self.state.searching = true;

        let sources = self.sources.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let ev = match sources.search(source, &keyword).await {
                Ok(tracks) => NetworkEvent::SearchResults {
                    generation,
                    source,
                    keyword,
                    tracks,
                },
                Err(e) => NetworkEvent::Failed {
                    generation,
                    request: RequestKind::Search,
                    message: format!("{e:#}"),
                },
            };
            let _ = tx.send(Event::Network(ev)).await;
        });
    }

    fn spawn_suggest(&mut self, keyword: String) {
        let keyword = keyword.trim().to_string();
        self.generations.suggest += 1;
        if keyword.is_empty() {
            self.state.set_suggestions(Vec::new());
            return;
        }
        let generation = self.generations.suggest;
        let source = self.state.current_source();

        let sources = self.sources.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let ev = match sources.suggest(source, &keyword).await {
                Ok(suggestions) => NetworkEvent::Suggestions {
                    generation,
                    keyword,
                    suggestions,
                },
                Err(e) => NetworkEvent::Failed {
                    generation,
                    request: RequestKind::Suggest,
                    message: format!("{e:#}"),
                },
            };
            let _ = tx.send(Event::Network(ev)).await;
        });
    }

    fn select(&mut self, track: Track) {
        self.abort_selection();
        self.generations.selection += 1;
        let generation = self.generations.selection;
        self.state.select_track(&track);
        self.state.lyric_loading = true;

        // Lyric
        let sources = self.sources.clone();
        let tx = self.tx.clone();
        let kind = track.source;
        let track_id = track.id.clone();
        self.selection_tasks.push(tokio::spawn(async move {
            let ev = match sources.fetch_lyric_track(kind, &track_id).await {
                Ok(lyric) => NetworkEvent::LyricLoaded {
                    generation,
                    track_id,
                    lyric,
                },
                Err(e) => NetworkEvent::Failed {
                    generation,
                    request: RequestKind::Lyric,
                    message: format!("lyric: {e:#}"),
                },
            };
            let _ = tx.send(Event::Network(ev)).await;
        }));

        // Stream URL, unless the search already carried one
        if track.url.as_deref().is_some_and(|u| !u.is_empty()) {
            return;
        }
        self.state.resolving_url = true;
        let sources = self.sources.clone();
        let tx = self.tx.clone();
        let track_id = track.id;
        self.selection_tasks.push(tokio::spawn(async move {
            let ev = match sources.resolve_stream_url(kind, &track_id).await {
                Ok(url) => NetworkEvent::StreamResolved {
                    generation,
                    track_id,
                    url,
                },
                Err(e) => NetworkEvent::Failed {
                    generation,
                    request: RequestKind::StreamUrl,
                    message: format!("stream url: {e:#}"),
                },
            };
            let _ = tx.send(Event::Network(ev)).await;
        }));
    }

    fn abort_selection(&mut self) {
        for task in self.selection_tasks.drain(..) {
            task.abort();
        }
    }
}

impl<H> Drop for Store<H> {
    fn drop(&mut self) {
        for task in self.selection_tasks.drain(..) {
            task.abort();
        }
    }
}
