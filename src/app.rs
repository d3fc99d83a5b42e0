use anyhow::Result;
use crate::api::{Recommendations, Trail, WeatherInfo};

pub const VALIDATION_ERROR: &str = "Please describe your hiking preferences";

/// Loading text shown while a search is in flight. The first message
/// appears immediately; the later ones replace it at fixed offsets if
/// the request is still outstanding.
pub const LOADING_MESSAGES: [&str; 3] = [
    "Finding trails for you...",
    "Checking the weather forecast...",
    "Still searching, hang tight...",
];

/// Canned preferences offered on the welcome view. Selecting one only
/// pre-fills the input; it never triggers a search.
pub const PRESET_PREFERENCES: [&str; 3] = [
    "Easy hikes near MTR stations",
    "Challenging full-day mountain trails",
    "Family-friendly coastal walks with good views",
];

/// Message sent back from a background task over the event channel.
#[derive(Debug)]
pub enum BackendMsg {
    /// The readiness probe succeeded. Sent at most once.
    Ready,
    /// A loading-message stage elapsed while the search was pending.
    LoadingStage {
        generation: u64,
        message: &'static str,
    },
    /// The recommend request settled.
    SearchDone {
        generation: u64,
        result: Result<Recommendations>,
    },
}

/// Search lifecycle. Success and failure both land back in `Idle` with
/// the result fields on `App` updated; there are no independent
/// loading/error flags to fall out of sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Loading {
        generation: u64,
        message: &'static str,
    },
}

/// Everything a spawned search task needs from the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub generation: u64,
    pub preference: String,
}

pub struct App {
    pub should_quit: bool,

    /// Set once by the readiness poller, never cleared.
    pub backend_ready: bool,

    pub phase: SearchPhase,
    pub preference: String,
    pub cursor: usize, // char position in preference

    pub weather: Option<WeatherInfo>,
    pub results: Vec<Trail>,
    pub error: Option<String>,

    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Body scrolling (updated during render)
    pub body_scroll: u16,
    pub body_height: u16,
    pub total_body_lines: u16,

    next_generation: u64,
}

impl App {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            backend_ready: false,
            phase: SearchPhase::Idle,
            preference: String::new(),
            cursor: 0,
            weather: None,
            results: Vec::new(),
            error: None,
            animation_frame: 0,
            body_scroll: 0,
            body_height: 0,
            total_body_lines: 0,
            next_generation: 0,
        }
    }

    pub fn scroll_results_down(&mut self) {
        if self.body_scroll < self.total_body_lines.saturating_sub(self.body_height) {
            self.body_scroll = self.body_scroll.saturating_add(1);
        }
    }

    pub fn scroll_results_up(&mut self) {
        self.body_scroll = self.body_scroll.saturating_sub(1);
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, SearchPhase::Loading { .. })
    }

    pub fn loading_message(&self) -> Option<&'static str> {
        match self.phase {
            SearchPhase::Loading { message, .. } => Some(message),
            SearchPhase::Idle => None,
        }
    }

    /// An empty recommendation list renders the same as no list at all.
    pub fn has_results(&self) -> bool {
        !self.results.is_empty()
    }

    /// Welcome view is shown only when nothing else is on screen.
    pub fn show_welcome(&self) -> bool {
        self.weather.is_none() && !self.has_results() && !self.is_loading()
    }

    /// Validate and begin a search. Returns the request for the caller to
    /// spawn, or `None` when nothing should be sent: empty input sets the
    /// validation error without any network I/O, and a submit while a
    /// search is already in flight is ignored.
    pub fn submit(&mut self) -> Option<SearchRequest> {
        if self.is_loading() {
            return None;
        }

        if self.preference.trim().is_empty() {
            self.error = Some(VALIDATION_ERROR.to_string());
            return None;
        }

        self.error = None;
        let generation = self.next_generation;
        self.next_generation += 1;
        self.phase = SearchPhase::Loading {
            generation,
            message: LOADING_MESSAGES[0],
        };

        Some(SearchRequest {
            generation,
            preference: self.preference.clone(),
        })
    }

    /// Apply a background-task message. Stage and completion messages
    /// carry the generation of the search that produced them and are
    /// dropped unless that search is still the one in flight.
    pub fn apply(&mut self, msg: BackendMsg) {
        match msg {
            BackendMsg::Ready => {
                self.backend_ready = true;
            }
            BackendMsg::LoadingStage { generation, message } => {
                if let SearchPhase::Loading { generation: current, message: slot } =
                    &mut self.phase
                {
                    if *current == generation {
                        *slot = message;
                    }
                }
            }
            BackendMsg::SearchDone { generation, result } => {
                let current = matches!(
                    self.phase,
                    SearchPhase::Loading { generation: g, .. } if g == generation
                );
                if !current {
                    return;
                }

                self.phase = SearchPhase::Idle;
                match result {
                    Ok(data) => {
                        self.weather = data.weather;
                        self.results = data.recommendations;
                        self.error = None;
                        self.body_scroll = 0;
                    }
                    // Previous weather/results stay mounted under the banner.
                    Err(e) => {
                        self.error = Some(format!("Error: {}", e));
                    }
                }
            }
        }
    }

    /// Header/logo action: back to the welcome view. An in-flight search
    /// becomes stale and its completion is dropped by `apply`.
    pub fn reset(&mut self) {
        self.phase = SearchPhase::Idle;
        self.preference.clear();
        self.cursor = 0;
        self.weather = None;
        self.results.clear();
        self.error = None;
        self.body_scroll = 0;
    }

    pub fn preset(&mut self, idx: usize) {
        if let Some(text) = PRESET_PREFERENCES.get(idx) {
            self.preference = text.to_string();
            self.cursor = self.preference.chars().count();
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_loading() || !self.backend_ready {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn empty_response() -> Recommendations {
        Recommendations {
            weather: None,
            recommendations: Vec::new(),
        }
    }

    fn one_trail_response() -> Recommendations {
        Recommendations {
            weather: None,
            recommendations: vec![Trail::Freeform {
                description: "A gentle ridge walk.".to_string(),
            }],
        }
    }

    #[test]
    fn whitespace_submit_sets_validation_error_without_request() {
        let mut app = App::new();
        app.preference = "   \t ".to_string();

        let request = app.submit();

        assert!(request.is_none());
        assert_eq!(app.error.as_deref(), Some(VALIDATION_ERROR));
        assert!(!app.is_loading());
    }

    #[test]
    fn submit_clears_prior_error_and_enters_loading() {
        let mut app = App::new();
        app.error = Some(VALIDATION_ERROR.to_string());
        app.preference = "Easy hikes near MTR".to_string();

        let request = app.submit().expect("request should be issued");

        assert!(app.error.is_none());
        assert_eq!(request.preference, "Easy hikes near MTR");
        assert_eq!(app.loading_message(), Some(LOADING_MESSAGES[0]));
    }

    #[test]
    fn submit_while_loading_is_ignored() {
        let mut app = App::new();
        app.preference = "waterfalls".to_string();
        let first = app.submit().unwrap();

        assert!(app.submit().is_none());
        // Still the first search's message slot.
        assert_eq!(
            app.phase,
            SearchPhase::Loading {
                generation: first.generation,
                message: LOADING_MESSAGES[0]
            }
        );
    }

    #[test]
    fn loading_stages_apply_in_order_for_current_generation() {
        let mut app = App::new();
        app.preference = "sunset ridges".to_string();
        let request = app.submit().unwrap();

        app.apply(BackendMsg::LoadingStage {
            generation: request.generation,
            message: LOADING_MESSAGES[1],
        });
        assert_eq!(app.loading_message(), Some(LOADING_MESSAGES[1]));

        app.apply(BackendMsg::LoadingStage {
            generation: request.generation,
            message: LOADING_MESSAGES[2],
        });
        assert_eq!(app.loading_message(), Some(LOADING_MESSAGES[2]));
    }

    #[test]
    fn stale_stage_message_is_dropped() {
        let mut app = App::new();
        app.preference = "old search".to_string();
        let first = app.submit().unwrap();
        app.apply(BackendMsg::SearchDone {
            generation: first.generation,
            result: Ok(one_trail_response()),
        });

        app.preference = "new search".to_string();
        let second = app.submit().unwrap();

        // A timer from the settled first search must not touch the
        // second search's message.
        app.apply(BackendMsg::LoadingStage {
            generation: first.generation,
            message: LOADING_MESSAGES[2],
        });
        assert_eq!(app.loading_message(), Some(LOADING_MESSAGES[0]));

        app.apply(BackendMsg::LoadingStage {
            generation: second.generation,
            message: LOADING_MESSAGES[1],
        });
        assert_eq!(app.loading_message(), Some(LOADING_MESSAGES[1]));
    }

    #[test]
    fn no_stage_message_after_completion() {
        let mut app = App::new();
        app.preference = "fast response".to_string();
        let request = app.submit().unwrap();

        app.apply(BackendMsg::SearchDone {
            generation: request.generation,
            result: Ok(one_trail_response()),
        });
        assert!(!app.is_loading());

        app.apply(BackendMsg::LoadingStage {
            generation: request.generation,
            message: LOADING_MESSAGES[1],
        });
        assert!(!app.is_loading());
        assert!(app.loading_message().is_none());
    }

    #[test]
    fn empty_recommendations_render_as_absent() {
        let mut app = App::new();
        app.preference = "anything".to_string();
        let request = app.submit().unwrap();

        app.apply(BackendMsg::SearchDone {
            generation: request.generation,
            result: Ok(empty_response()),
        });

        assert!(!app.has_results());
        assert!(app.show_welcome());
    }

    #[test]
    fn error_keeps_previous_results_mounted() {
        let mut app = App::new();
        app.preference = "first".to_string();
        let first = app.submit().unwrap();
        app.apply(BackendMsg::SearchDone {
            generation: first.generation,
            result: Ok(one_trail_response()),
        });
        assert!(app.has_results());

        app.preference = "second".to_string();
        let second = app.submit().unwrap();
        app.apply(BackendMsg::SearchDone {
            generation: second.generation,
            result: Err(anyhow!("Server responded with 500")),
        });

        assert_eq!(app.error.as_deref(), Some("Error: Server responded with 500"));
        assert!(app.has_results());
    }

    #[test]
    fn ready_flag_is_set_once_and_never_cleared() {
        let mut app = App::new();
        assert!(!app.backend_ready);

        app.apply(BackendMsg::Ready);
        assert!(app.backend_ready);

        app.preference = "hike".to_string();
        let request = app.submit().unwrap();
        app.apply(BackendMsg::SearchDone {
            generation: request.generation,
            result: Err(anyhow!("connection refused")),
        });
        app.reset();
        assert!(app.backend_ready);
    }

    #[test]
    fn reset_drops_in_flight_search() {
        let mut app = App::new();
        app.preference = "long search".to_string();
        let request = app.submit().unwrap();

        app.reset();
        assert!(!app.is_loading());
        assert!(app.preference.is_empty());

        app.apply(BackendMsg::SearchDone {
            generation: request.generation,
            result: Ok(one_trail_response()),
        });
        assert!(!app.has_results());
        assert!(app.show_welcome());
    }

    #[test]
    fn preset_fills_input_without_searching() {
        let mut app = App::new();
        app.preset(0);

        assert_eq!(app.preference, PRESET_PREFERENCES[0]);
        assert_eq!(app.cursor, PRESET_PREFERENCES[0].chars().count());
        assert!(!app.is_loading());
    }
}
